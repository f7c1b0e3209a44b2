//! Per-axis constraints.

use crate::component::{ComponentWrapper, ContainerWrapper};
use crate::platform::PlatformDefaults;
use crate::types::{MinPrefMax, Side, NOT_SET};
use crate::units::{BoundSize, UnitValue};

/// The default grow and shrink weight.
pub const WEIGHT_100: f32 = 100.0;

/// Grow and shrink behaviour of one entry in a size distribution.
///
/// Lower priority numbers are serviced first. A `None` weight means the
/// entry does not take part in that direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeConstraint {
    pub shrink_priority: i32,
    pub shrink: Option<f32>,
    pub grow_priority: i32,
    pub grow: Option<f32>,
}

impl ResizeConstraint {
    pub const DEFAULT_PRIORITY: i32 = 100;

    /// Gap slots shrink before components and grow after them.
    pub const GAP: ResizeConstraint = ResizeConstraint::new(0, Some(WEIGHT_100), 200, None);

    /// Gap slots that soak up push space.
    pub const GAP_PUSH: ResizeConstraint =
        ResizeConstraint::new(0, Some(WEIGHT_100), 200, Some(WEIGHT_100));

    pub const fn new(
        shrink_priority: i32,
        shrink: Option<f32>,
        grow_priority: i32,
        grow: Option<f32>,
    ) -> Self {
        Self {
            shrink_priority,
            shrink,
            grow_priority,
            grow,
        }
    }

    pub fn priority(&self, growing: bool) -> i32 {
        if growing {
            self.grow_priority
        } else {
            self.shrink_priority
        }
    }

    pub fn weight(&self, growing: bool) -> Option<f32> {
        if growing {
            self.grow
        } else {
            self.shrink
        }
    }
}

impl Default for ResizeConstraint {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_PRIORITY,
            Some(WEIGHT_100),
            Self::DEFAULT_PRIORITY,
            None,
        )
    }
}

/// Constraint for one row, one column, or one axis of a component.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DimConstraint {
    pub resize: ResizeConstraint,
    /// Entries sharing a size group get the same min/preferred/max.
    pub size_group: Option<String>,
    pub size: BoundSize,
    pub gap_before: Option<BoundSize>,
    pub gap_after: Option<BoundSize>,
    pub align: Option<UnitValue>,
    /// Components sharing an end group end at the same coordinate.
    pub end_group: Option<String>,
    pub fill: bool,
    pub no_grid: bool,
}

impl DimConstraint {
    /// Constraint used for dock rows and columns.
    pub const DOCK: DimConstraint = DimConstraint {
        resize: ResizeConstraint::new(
            ResizeConstraint::DEFAULT_PRIORITY,
            Some(WEIGHT_100),
            200,
            None,
        ),
        size_group: None,
        size: BoundSize::NULL,
        gap_before: None,
        gap_after: None,
        align: None,
        end_group: None,
        fill: false,
        no_grid: false,
    };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grow(mut self, weight: Option<f32>) -> Self {
        self.resize.grow = weight;
        self
    }

    pub fn with_grow_priority(mut self, priority: i32) -> Self {
        self.resize.grow_priority = priority;
        self
    }

    pub fn with_shrink(mut self, weight: Option<f32>) -> Self {
        self.resize.shrink = weight;
        self
    }

    pub fn with_shrink_priority(mut self, priority: i32) -> Self {
        self.resize.shrink_priority = priority;
        self
    }

    pub fn with_size(mut self, size: BoundSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_size_group(mut self, group: impl Into<String>) -> Self {
        self.size_group = Some(group.into());
        self
    }

    pub fn with_end_group(mut self, group: impl Into<String>) -> Self {
        self.end_group = Some(group.into());
        self
    }

    pub fn with_gap_before(mut self, gap: BoundSize) -> Self {
        self.gap_before = Some(gap);
        self
    }

    pub fn with_gap_after(mut self, gap: BoundSize) -> Self {
        self.gap_after = Some(gap);
        self
    }

    pub fn with_align(mut self, align: UnitValue) -> Self {
        self.align = Some(align);
        self
    }

    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_no_grid(mut self, no_grid: bool) -> Self {
        self.no_grid = no_grid;
        self
    }

    pub fn has_grow(&self) -> bool {
        self.resize.grow.is_some()
    }

    /// Alignment, falling back to leading for columns and to center or
    /// baseline for rows.
    pub fn align_or_default(&self, is_cols: bool) -> UnitValue {
        if let Some(align) = &self.align {
            return align.clone();
        }
        if is_cols {
            UnitValue::LEADING
        } else if self.fill || !PlatformDefaults::current().default_row_alignment_baseline {
            UnitValue::CENTER
        } else {
            UnitValue::BASELINE
        }
    }

    pub fn is_gap_before_push(&self) -> bool {
        self.gap_before.as_ref().is_some_and(BoundSize::is_gap_push)
    }

    pub fn is_gap_after_push(&self) -> bool {
        self.gap_after.as_ref().is_some_and(BoundSize::is_gap_push)
    }

    /// Resolved gap before or after a row or column, if one is set.
    pub fn row_gaps(
        &self,
        container: &dyn ContainerWrapper,
        ref_value: f32,
        before: bool,
    ) -> Option<MinPrefMax> {
        let gap = if before {
            &self.gap_before
        } else {
            &self.gap_after
        };
        gap.as_ref()
            .filter(|g| !g.is_unset())
            .map(|g| g.pixel_sizes(ref_value, Some(container), None))
    }

    /// Resolved gap between a component and its neighbour on `side`.
    ///
    /// Falls back to the platform's component gap when neither this
    /// constraint nor the neighbour's (`adjacent_gap`) specify one.
    /// Unset slots are [`NOT_SET`].
    pub fn component_gaps(
        &self,
        container: &dyn ContainerWrapper,
        comp: &dyn ComponentWrapper,
        adjacent_gap: Option<&BoundSize>,
        adjacent: Option<&dyn ComponentWrapper>,
        ref_value: f32,
        side: Side,
    ) -> Option<MinPrefMax> {
        let own = if matches!(side, Side::Top | Side::Left) {
            self.gap_before.as_ref()
        } else {
            self.gap_after.as_ref()
        };
        let has_push = own.is_some_and(BoundSize::is_gap_push);

        let fallback;
        let gap = if own.map_or(true, BoundSize::is_unset)
            && adjacent_gap.map_or(true, BoundSize::is_unset)
        {
            fallback = PlatformDefaults::current().default_component_gap(adjacent, side.is_horizontal());
            fallback.as_ref()
        } else {
            own
        };

        let Some(gap) = gap else {
            return has_push.then_some([0, 0, NOT_SET]);
        };
        let resolve = |v: Option<&UnitValue>| {
            v.map_or(NOT_SET, |v| v.pixels(ref_value, Some(container), Some(comp)))
        };
        Some([
            resolve(gap.min()),
            resolve(gap.preferred()),
            resolve(gap.max()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_defaults() {
        let rc = ResizeConstraint::default();
        assert_eq!(rc.shrink, Some(100.0));
        assert_eq!(rc.grow, None);
        assert_eq!(rc.priority(true), 100);
        assert_eq!(rc.priority(false), 100);
    }

    #[test]
    fn test_gap_priorities_bracket_components() {
        let comp = ResizeConstraint::default();
        assert!(ResizeConstraint::GAP.shrink_priority < comp.shrink_priority);
        assert!(ResizeConstraint::GAP.grow_priority > comp.grow_priority);
        assert_eq!(ResizeConstraint::GAP.grow, None);
        assert_eq!(ResizeConstraint::GAP_PUSH.grow, Some(WEIGHT_100));
    }

    #[test]
    fn test_align_defaults() {
        let dc = DimConstraint::new();
        assert_eq!(dc.align_or_default(true), UnitValue::LEADING);
        assert_eq!(dc.with_fill(true).align_or_default(false), UnitValue::CENTER);

        let explicit = DimConstraint::new().with_align(UnitValue::RIGHT);
        assert_eq!(explicit.align_or_default(true), UnitValue::RIGHT);
    }

    #[test]
    fn test_builders() {
        let dc = DimConstraint::new()
            .with_grow(Some(50.0))
            .with_grow_priority(10)
            .with_size_group("sg")
            .with_gap_before(BoundSize::push());
        assert!(dc.has_grow());
        assert_eq!(dc.resize.grow_priority, 10);
        assert_eq!(dc.size_group.as_deref(), Some("sg"));
        assert!(dc.is_gap_before_push());
        assert!(!dc.is_gap_after_push());
    }

    #[test]
    fn test_dock_constraint() {
        assert_eq!(DimConstraint::DOCK.resize.grow_priority, 200);
        assert!(DimConstraint::DOCK.size.is_unset());
    }
}
