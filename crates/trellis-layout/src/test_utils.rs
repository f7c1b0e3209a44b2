//! In-memory components and containers for unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis_core::{
    ComponentKey, ComponentWrapper, ConstraintMap, ContainerWrapper, ContentBias, LayoutCallback,
    LayoutToken, AC, CC, LC,
};

use crate::bounds::Bounds;
use crate::grid::Grid;

pub(crate) struct TestComponent {
    min: (i32, i32),
    pref: (i32, i32),
    bounds: Cell<Bounds>,
    baseline: Cell<Option<i32>>,
    visual_padding: Cell<Option<[i32; 4]>>,
    visible: Cell<bool>,
    link_id: RefCell<Option<String>>,
    /// Area kept constant when a horizontal content bias is set.
    area: Cell<Option<i32>>,
}

impl TestComponent {
    pub(crate) fn new(min_w: i32, pref_w: i32, min_h: i32, pref_h: i32) -> Rc<Self> {
        Rc::new(Self {
            min: (min_w, min_h),
            pref: (pref_w, pref_h),
            bounds: Cell::new(Bounds::default()),
            baseline: Cell::new(None),
            visual_padding: Cell::new(None),
            visible: Cell::new(true),
            link_id: RefCell::new(None),
            area: Cell::new(None),
        })
    }

    pub(crate) fn with_baseline(self: Rc<Self>, baseline: i32) -> Rc<Self> {
        self.baseline.set(Some(baseline));
        self
    }

    pub(crate) fn with_visual_padding(self: Rc<Self>, padding: [i32; 4]) -> Rc<Self> {
        self.visual_padding.set(Some(padding));
        self
    }

    pub(crate) fn with_link_id(self: Rc<Self>, id: &str) -> Rc<Self> {
        *self.link_id.borrow_mut() = Some(id.to_owned());
        self
    }

    /// Height becomes `area / width`, like wrapping text.
    pub(crate) fn with_area(self: Rc<Self>, area: i32) -> Rc<Self> {
        self.area.set(Some(area));
        self
    }

    pub(crate) fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    pub(crate) fn bounds(&self) -> Bounds {
        self.bounds.get()
    }
}

impl ComponentWrapper for TestComponent {
    fn x(&self) -> i32 {
        self.bounds.get().x
    }

    fn y(&self) -> i32 {
        self.bounds.get().y
    }

    fn width(&self) -> i32 {
        self.bounds.get().width
    }

    fn height(&self) -> i32 {
        self.bounds.get().height
    }

    fn minimum_width(&self, _height_hint: i32) -> i32 {
        self.min.0
    }

    fn minimum_height(&self, width_hint: i32) -> i32 {
        self.min.1.min(self.preferred_height(width_hint))
    }

    fn preferred_width(&self, _height_hint: i32) -> i32 {
        self.pref.0
    }

    fn preferred_height(&self, width_hint: i32) -> i32 {
        match self.area.get() {
            Some(area) if width_hint > 0 => area / width_hint,
            _ => self.pref.1,
        }
    }

    fn set_bounds(&self, x: i32, y: i32, width: i32, height: i32) {
        self.bounds.set(Bounds::new(x, y, width, height));
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn baseline(&self, _width: i32, _height: i32) -> Option<i32> {
        self.baseline.get()
    }

    fn has_baseline(&self) -> bool {
        self.baseline.get().is_some()
    }

    fn link_id(&self) -> Option<String> {
        self.link_id.borrow().clone()
    }

    fn visual_padding(&self) -> Option<[i32; 4]> {
        self.visual_padding.get()
    }

    fn content_bias(&self) -> ContentBias {
        if self.area.get().is_some() {
            ContentBias::Horizontal
        } else {
            ContentBias::None
        }
    }
}

pub(crate) struct TestContainer {
    width: i32,
    height: i32,
    token: LayoutToken,
    children: RefCell<Vec<Rc<dyn ComponentWrapper>>>,
    ltr: Cell<bool>,
    pub(crate) debug_cells: RefCell<Vec<Bounds>>,
}

impl TestContainer {
    pub(crate) fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            token: LayoutToken::new(),
            children: RefCell::new(Vec::new()),
            ltr: Cell::new(true),
            debug_cells: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn add(&self, comp: Rc<dyn ComponentWrapper>) {
        self.children.borrow_mut().push(comp);
    }

    pub(crate) fn set_left_to_right(&self, ltr: bool) {
        self.ltr.set(ltr);
    }
}

impl ComponentWrapper for TestContainer {
    fn x(&self) -> i32 {
        0
    }

    fn y(&self) -> i32 {
        0
    }

    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn minimum_width(&self, _height_hint: i32) -> i32 {
        0
    }

    fn minimum_height(&self, _width_hint: i32) -> i32 {
        0
    }

    fn preferred_width(&self, _height_hint: i32) -> i32 {
        self.width
    }

    fn preferred_height(&self, _width_hint: i32) -> i32 {
        self.height
    }

    fn set_bounds(&self, _x: i32, _y: i32, _width: i32, _height: i32) {}
}

impl ContainerWrapper for TestContainer {
    fn components(&self) -> Vec<Rc<dyn ComponentWrapper>> {
        self.children.borrow().clone()
    }

    fn layout_token(&self) -> &LayoutToken {
        &self.token
    }

    fn is_left_to_right(&self) -> bool {
        self.ltr.get()
    }

    fn paint_debug_cell(&self, x: i32, y: i32, width: i32, height: i32) {
        self.debug_cells
            .borrow_mut()
            .push(Bounds::new(x, y, width, height));
    }

    fn as_component(&self) -> &dyn ComponentWrapper {
        self
    }
}

/// Constraint map for `entries`.
pub(crate) fn constraints(entries: &[(Rc<TestComponent>, CC)]) -> ConstraintMap {
    entries
        .iter()
        .map(|(comp, cc)| {
            let comp: Rc<dyn ComponentWrapper> = comp.clone();
            (ComponentKey::of(&comp), cc.clone())
        })
        .collect()
}

/// Adds `entries` to `container` in order and builds a grid over them.
pub(crate) fn grid(
    container: &Rc<TestContainer>,
    lc: &LC,
    rows: &AC,
    cols: &AC,
    entries: &[(Rc<TestComponent>, CC)],
) -> Grid {
    grid_with_callbacks(container, lc, rows, cols, entries, &[])
}

pub(crate) fn grid_with_callbacks(
    container: &Rc<TestContainer>,
    lc: &LC,
    rows: &AC,
    cols: &AC,
    entries: &[(Rc<TestComponent>, CC)],
    callbacks: &[Rc<dyn LayoutCallback>],
) -> Grid {
    for (comp, _) in entries {
        container.add(comp.clone());
    }
    let parent: Rc<dyn ContainerWrapper> = container.clone();
    Grid::new(parent, lc, rows, cols, &constraints(entries), callbacks).expect("valid grid")
}

/// Layout without insets or gaps, so sizes add up exactly.
pub(crate) fn tight_lc() -> LC {
    LC::new().no_insets().grid_gap(
        trellis_core::BoundSize::ZERO_PIXEL,
        trellis_core::BoundSize::ZERO_PIXEL,
    )
}
