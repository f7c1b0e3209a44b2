//! Unit-carrying values and min/preferred/max size ranges.
//!
//! A [`UnitValue`] is an immutable scalar that resolves to pixels on demand.
//! Resolution needs a reference length (for percentages and alignment) and
//! the container the value is evaluated in; without a container every value
//! resolves to zero.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::component::{ComponentWrapper, ContainerWrapper};
use crate::errors::{LayoutError, Result};
use crate::link::{LinkField, LinkHandler};
use crate::platform::PlatformDefaults;
use crate::types::{round_px, MinPrefMax, SizeType, INF};

/// Units that resolve from the host context alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Pixel,
    /// Pixels scaled by the container's pixel unit factor.
    LogicalPixel,
    Point,
    Millimeter,
    Centimeter,
    Inch,
    /// Percent of the reference length.
    Percent,
    /// Percent of the screen size along the value's axis.
    ScreenPercent,
}

/// Named alignments. They resolve against the free space left in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignKeyword {
    Left,
    Right,
    Leading,
    Trailing,
    Top,
    Bottom,
    Center,
    Baseline,
    /// Platform label alignment.
    Label,
}

/// Arithmetic combining two sub-values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Min,
    Max,
    Mid,
}

/// The variant a [`UnitValue`] resolves through.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitKind {
    Static(Unit),
    /// The min, preferred or max size of the component being laid out.
    Component(SizeType),
    /// One field of a named target's bounds in the link registry.
    Link { target: Arc<str>, field: LinkField },
    /// A named unit such as `r` or `para`, resolved by converters or platform defaults.
    Lookup(Arc<str>),
    Keyword(AlignKeyword),
    /// Fraction of the `visual` link bounds, offset by their start.
    VisualAlign,
    Operation {
        op: Operator,
        left: Box<UnitValue>,
        right: Box<UnitValue>,
    },
}

/// A scalar with a unit, bound to the horizontal or vertical axis.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitValue {
    value: f32,
    kind: UnitKind,
    horizontal: bool,
}

/// Pluggable resolution for named units.
pub trait UnitConverter: Send + Sync {
    /// Returns `None` when the unit is not handled by this converter.
    fn convert_to_pixels(
        &self,
        value: f32,
        unit: &str,
        horizontal: bool,
        ref_value: f32,
        container: Option<&dyn ContainerWrapper>,
        comp: Option<&dyn ComponentWrapper>,
    ) -> Option<f32>;
}

fn converters() -> &'static RwLock<Vec<Arc<dyn UnitConverter>>> {
    static CONVERTERS: OnceLock<RwLock<Vec<Arc<dyn UnitConverter>>>> = OnceLock::new();
    CONVERTERS.get_or_init(|| RwLock::new(Vec::new()))
}

impl UnitValue {
    pub const ZERO: UnitValue = UnitValue::px(0.0);
    pub const INF: UnitValue = UnitValue::px(INF as f32);

    pub const LEFT: UnitValue = UnitValue::keyword(AlignKeyword::Left, true);
    pub const RIGHT: UnitValue = UnitValue::keyword(AlignKeyword::Right, true);
    pub const LEADING: UnitValue = UnitValue::keyword(AlignKeyword::Leading, true);
    pub const TRAILING: UnitValue = UnitValue::keyword(AlignKeyword::Trailing, true);
    pub const TOP: UnitValue = UnitValue::keyword(AlignKeyword::Top, false);
    pub const BOTTOM: UnitValue = UnitValue::keyword(AlignKeyword::Bottom, false);
    pub const CENTER: UnitValue = UnitValue::keyword(AlignKeyword::Center, true);
    pub const BASELINE: UnitValue = UnitValue::keyword(AlignKeyword::Baseline, false);
    pub const LABEL: UnitValue = UnitValue::keyword(AlignKeyword::Label, true);

    /// Plain pixels, horizontal.
    pub const fn px(value: f32) -> Self {
        Self::with_unit(value, Unit::Pixel, true)
    }

    pub const fn with_unit(value: f32, unit: Unit, horizontal: bool) -> Self {
        Self {
            value,
            kind: UnitKind::Static(unit),
            horizontal,
        }
    }

    /// Logical pixels along the x axis.
    pub const fn lpx(value: f32) -> Self {
        Self::with_unit(value, Unit::LogicalPixel, true)
    }

    /// Logical pixels along the y axis.
    pub const fn lpy(value: f32) -> Self {
        Self::with_unit(value, Unit::LogicalPixel, false)
    }

    pub const fn percent(value: f32, horizontal: bool) -> Self {
        Self::with_unit(value, Unit::Percent, horizontal)
    }

    pub const fn keyword(keyword: AlignKeyword, horizontal: bool) -> Self {
        Self {
            value: 0.0,
            kind: UnitKind::Keyword(keyword),
            horizontal,
        }
    }

    /// The component's own min, preferred or max size.
    pub const fn component_size(size: SizeType, horizontal: bool) -> Self {
        Self {
            value: 0.0,
            kind: UnitKind::Component(size),
            horizontal,
        }
    }

    /// Fraction (0..1) of the space in the `visual` link bounds.
    pub const fn visual_align(fraction: f32, horizontal: bool) -> Self {
        Self {
            value: fraction,
            kind: UnitKind::VisualAlign,
            horizontal,
        }
    }

    /// A reference like `button.x2` or `visual.width`.
    pub fn link(reference: &str, horizontal: bool) -> Result<Self> {
        let (target, field) =
            reference
                .rsplit_once('.')
                .ok_or_else(|| LayoutError::UnknownLinkField {
                    reference: reference.to_owned(),
                })?;
        let field = LinkField::parse(field).ok_or_else(|| LayoutError::UnknownLinkField {
            reference: reference.to_owned(),
        })?;
        if target.is_empty() {
            return Err(LayoutError::UnknownLinkField {
                reference: reference.to_owned(),
            });
        }
        Ok(Self::link_field(target, field, horizontal))
    }

    pub fn link_field(target: &str, field: LinkField, horizontal: bool) -> Self {
        Self {
            value: 0.0,
            kind: UnitKind::Link {
                target: Arc::from(target),
                field,
            },
            horizontal,
        }
    }

    /// A named unit resolved at layout time.
    pub fn lookup(value: f32, unit: &str, horizontal: bool) -> Self {
        Self {
            value,
            kind: UnitKind::Lookup(Arc::from(unit)),
            horizontal,
        }
    }

    /// Like [`UnitValue::lookup`], but rejects units nothing can resolve.
    pub fn lookup_checked(value: f32, unit: &str, horizontal: bool) -> Result<Self> {
        let known = PlatformDefaults::current().knows_unit(unit)
            || converters_snapshot()
                .iter()
                .any(|c| c.convert_to_pixels(1.0, unit, horizontal, 0.0, None, None).is_some());
        if known {
            Ok(Self::lookup(value, unit, horizontal))
        } else {
            Err(LayoutError::UnknownUnit {
                unit: unit.to_owned(),
            })
        }
    }

    /// Combines two values. The axis is taken from `left`.
    pub fn operation(op: Operator, left: UnitValue, right: UnitValue) -> Self {
        let horizontal = left.horizontal;
        Self {
            value: 0.0,
            kind: UnitKind::Operation {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            horizontal,
        }
    }

    /// The same value bound to another axis.
    pub fn with_horizontal(mut self, horizontal: bool) -> Self {
        self.horizontal = horizontal;
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn kind(&self) -> &UnitKind {
        &self.kind
    }

    pub fn unit(&self) -> Option<Unit> {
        match self.kind {
            UnitKind::Static(unit) => Some(unit),
            _ => None,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.horizontal
    }

    pub fn is_keyword(&self, keyword: AlignKeyword) -> bool {
        self.kind == UnitKind::Keyword(keyword)
    }

    /// True for the component's own size of the given kind.
    pub fn is_component_size(&self, size: SizeType) -> bool {
        self.kind == UnitKind::Component(size)
    }

    /// Resolves without needing a reference length.
    pub fn is_absolute(&self) -> bool {
        matches!(self.kind, UnitKind::Static(unit) if !matches!(unit, Unit::Percent | Unit::ScreenPercent))
    }

    pub fn is_absolute_deep(&self) -> bool {
        match &self.kind {
            UnitKind::Operation { left, right, .. } => {
                left.is_absolute_deep() && right.is_absolute_deep()
            }
            _ => self.is_absolute(),
        }
    }

    pub fn is_linked(&self) -> bool {
        matches!(self.kind, UnitKind::Link { .. })
    }

    pub fn is_linked_deep(&self) -> bool {
        match &self.kind {
            UnitKind::Operation { left, right, .. } => {
                left.is_linked_deep() || right.is_linked_deep()
            }
            _ => self.is_linked(),
        }
    }

    /// Every link target referenced by this value or its operands.
    pub fn link_targets(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_link_targets(&mut out);
        out
    }

    fn collect_link_targets<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            UnitKind::Link { target, .. } => out.push(target),
            UnitKind::Operation { left, right, .. } => {
                left.collect_link_targets(out);
                right.collect_link_targets(out);
            }
            _ => {}
        }
    }

    /// Resolves to whole pixels, rounding half up.
    pub fn pixels(
        &self,
        ref_value: f32,
        container: Option<&dyn ContainerWrapper>,
        comp: Option<&dyn ComponentWrapper>,
    ) -> i32 {
        round_px(self.pixels_exact(ref_value, container, comp))
    }

    pub fn pixels_exact(
        &self,
        ref_value: f32,
        container: Option<&dyn ContainerWrapper>,
        comp: Option<&dyn ComponentWrapper>,
    ) -> f32 {
        let Some(parent) = container else {
            return 0.0;
        };

        match &self.kind {
            UnitKind::Static(unit) => self.resolve_static(*unit, ref_value, parent),
            UnitKind::Component(size) => match comp {
                Some(comp) => self.component_pixels(comp, *size) as f32,
                None => 0.0,
            },
            UnitKind::Link { target, field } => {
                LinkHandler::value(parent.layout_token(), target, *field).unwrap_or(0) as f32
            }
            UnitKind::Lookup(unit) => {
                self.resolve_lookup(unit, ref_value, parent, comp)
            }
            UnitKind::Keyword(keyword) => self.resolve_keyword(*keyword, ref_value, parent),
            UnitKind::VisualAlign => {
                let token = parent.layout_token();
                let (start_field, size_field) = if self.horizontal {
                    (LinkField::X, LinkField::Width)
                } else {
                    (LinkField::Y, LinkField::Height)
                };
                match (
                    LinkHandler::value(token, "visual", start_field),
                    LinkHandler::value(token, "visual", size_field),
                ) {
                    (Some(start), Some(size)) => {
                        self.value * (size.max(0) as f32 - ref_value) + start as f32
                    }
                    _ => 0.0,
                }
            }
            UnitKind::Operation { op, left, right } => {
                let l = left.pixels_exact(ref_value, container, comp);
                let r = right.pixels_exact(ref_value, container, comp);
                match op {
                    Operator::Add => l + r,
                    Operator::Sub => l - r,
                    Operator::Mul => l * r,
                    Operator::Div if r == 0.0 => 0.0,
                    Operator::Div => l / r,
                    Operator::Min => l.min(r),
                    Operator::Max => l.max(r),
                    Operator::Mid => (l + r) * 0.5,
                }
            }
        }
    }

    fn resolve_static(&self, unit: Unit, ref_value: f32, parent: &dyn ContainerWrapper) -> f32 {
        let dpi = || {
            let dpi = if self.horizontal {
                parent.horizontal_screen_dpi()
            } else {
                parent.vertical_screen_dpi()
            };
            dpi as f32
        };
        match unit {
            Unit::Pixel => self.value,
            Unit::LogicalPixel => parent.pixel_unit_factor(self.horizontal) * self.value,
            Unit::Point => dpi() / 72.0 * self.value,
            Unit::Millimeter => dpi() / 25.4 * self.value,
            Unit::Centimeter => dpi() / 2.54 * self.value,
            Unit::Inch => dpi() * self.value,
            Unit::Percent => self.value * ref_value * 0.01,
            Unit::ScreenPercent => {
                let screen = if self.horizontal {
                    parent.screen_width()
                } else {
                    parent.screen_height()
                };
                self.value * screen as f32 * 0.01
            }
        }
    }

    fn component_pixels(&self, comp: &dyn ComponentWrapper, size: SizeType) -> i32 {
        match (size, self.horizontal) {
            (SizeType::Min, true) => comp.minimum_width(comp.height()),
            (SizeType::Min, false) => comp.minimum_height(comp.width()),
            (SizeType::Pref, true) => comp.preferred_width(comp.height()),
            (SizeType::Pref, false) => comp.preferred_height(comp.width()),
            (SizeType::Max, true) => comp.maximum_width(comp.height()),
            (SizeType::Max, false) => comp.maximum_height(comp.width()),
        }
    }

    fn resolve_lookup(
        &self,
        unit: &str,
        ref_value: f32,
        parent: &dyn ContainerWrapper,
        comp: Option<&dyn ComponentWrapper>,
    ) -> f32 {
        for converter in converters_snapshot() {
            if let Some(px) = converter.convert_to_pixels(
                self.value,
                unit,
                self.horizontal,
                ref_value,
                Some(parent),
                comp,
            ) {
                return px;
            }
        }
        PlatformDefaults::current()
            .convert_to_pixels(self.value, unit, self.horizontal, ref_value, parent, comp)
            .unwrap_or_else(|| {
                tracing::trace!(unit, "unresolved unit, using 0");
                0.0
            })
    }

    fn resolve_keyword(
        &self,
        keyword: AlignKeyword,
        ref_value: f32,
        parent: &dyn ContainerWrapper,
    ) -> f32 {
        let ltr = !self.horizontal || parent.is_left_to_right();
        match keyword {
            AlignKeyword::Left | AlignKeyword::Top | AlignKeyword::Baseline => 0.0,
            AlignKeyword::Right | AlignKeyword::Bottom => ref_value,
            AlignKeyword::Center => ref_value * 0.5,
            AlignKeyword::Leading if ltr => 0.0,
            AlignKeyword::Leading => ref_value,
            AlignKeyword::Trailing if ltr => ref_value,
            AlignKeyword::Trailing => 0.0,
            AlignKeyword::Label => PlatformDefaults::current().label_align_percentage * ref_value,
        }
    }

    /// Registers a converter consulted before the platform defaults.
    pub fn add_global_converter(converter: Arc<dyn UnitConverter>) {
        converters()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(converter);
    }

    /// Removes a converter previously added. Returns whether it was registered.
    pub fn remove_global_converter(converter: &Arc<dyn UnitConverter>) -> bool {
        let mut list = converters().write().unwrap_or_else(PoisonError::into_inner);
        let before = list.len();
        list.retain(|c| !same_converter(c, converter));
        list.len() != before
    }

    pub fn global_converters() -> Vec<Arc<dyn UnitConverter>> {
        converters_snapshot()
    }
}

fn converters_snapshot() -> Vec<Arc<dyn UnitConverter>> {
    converters()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

fn same_converter(a: &Arc<dyn UnitConverter>, b: &Arc<dyn UnitConverter>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// A min/preferred/max range of [`UnitValue`]s plus a gap push flag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundSize {
    min: Option<UnitValue>,
    preferred: Option<UnitValue>,
    max: Option<UnitValue>,
    gap_push: bool,
}

impl BoundSize {
    pub const NULL: BoundSize = BoundSize {
        min: None,
        preferred: None,
        max: None,
        gap_push: false,
    };

    pub const ZERO_PIXEL: BoundSize = BoundSize {
        min: Some(UnitValue::ZERO),
        preferred: Some(UnitValue::ZERO),
        max: Some(UnitValue::ZERO),
        gap_push: false,
    };

    pub fn new(min: Option<UnitValue>, preferred: Option<UnitValue>, max: Option<UnitValue>) -> Self {
        Self {
            min,
            preferred,
            max,
            gap_push: false,
        }
    }

    /// min, preferred and max all set to `value`.
    pub fn fixed(value: UnitValue) -> Self {
        Self::new(Some(value.clone()), Some(value.clone()), Some(value))
    }

    /// A gap of `value` that may grow but never shrinks below it.
    pub fn gap(value: UnitValue) -> Self {
        Self::new(Some(value.clone()), Some(value), None)
    }

    /// Only a preferred size.
    pub fn preferred_only(value: UnitValue) -> Self {
        Self::new(None, Some(value), None)
    }

    /// A gap that takes all push space.
    pub fn push() -> Self {
        Self::NULL.with_gap_push(true)
    }

    pub fn with_gap_push(mut self, gap_push: bool) -> Self {
        self.gap_push = gap_push;
        self
    }

    pub fn with_min(mut self, min: Option<UnitValue>) -> Self {
        self.min = min;
        self
    }

    pub fn with_preferred(mut self, preferred: Option<UnitValue>) -> Self {
        self.preferred = preferred;
        self
    }

    pub fn with_max(mut self, max: Option<UnitValue>) -> Self {
        self.max = max;
        self
    }

    pub fn min(&self) -> Option<&UnitValue> {
        self.min.as_ref()
    }

    pub fn preferred(&self) -> Option<&UnitValue> {
        self.preferred.as_ref()
    }

    pub fn max(&self) -> Option<&UnitValue> {
        self.max.as_ref()
    }

    pub fn size(&self, size: SizeType) -> Option<&UnitValue> {
        match size {
            SizeType::Min => self.min(),
            SizeType::Pref => self.preferred(),
            SizeType::Max => self.max(),
        }
    }

    pub fn is_gap_push(&self) -> bool {
        self.gap_push
    }

    /// No sizes and no push.
    pub fn is_unset(&self) -> bool {
        !self.gap_push && self.min.is_none() && self.preferred.is_none() && self.max.is_none()
    }

    /// All set sizes resolve without a reference length.
    pub fn is_absolute(&self) -> bool {
        [&self.min, &self.preferred, &self.max]
            .into_iter()
            .flatten()
            .all(UnitValue::is_absolute)
    }

    /// Clamps `size` into the set min and max.
    pub fn constrain(&self, size: i32, ref_value: f32, container: &dyn ContainerWrapper) -> i32 {
        let mut size = size;
        if let Some(max) = &self.max {
            size = size.min(max.pixels(ref_value, Some(container), Some(container.as_component())));
        }
        if let Some(min) = &self.min {
            size = size.max(min.pixels(ref_value, Some(container), Some(container.as_component())));
        }
        size
    }

    /// Resolved triple with unset min and preferred as 0 and unset max as [`INF`].
    pub fn pixel_sizes(
        &self,
        ref_value: f32,
        container: Option<&dyn ContainerWrapper>,
        comp: Option<&dyn ComponentWrapper>,
    ) -> MinPrefMax {
        [
            self.min.as_ref().map_or(0, |v| v.pixels(ref_value, container, comp)),
            self.preferred.as_ref().map_or(0, |v| v.pixels(ref_value, container, comp)),
            self.max.as_ref().map_or(INF, |v| v.pixels(ref_value, container, comp)),
        ]
    }
}

impl From<UnitValue> for BoundSize {
    fn from(value: UnitValue) -> Self {
        Self::preferred_only(value)
    }
}
