//! Minimal host toolkit for driving the grid through its public API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis_core::{
    ComponentKey, ComponentWrapper, ConstraintMap, ContainerWrapper, LayoutToken, AC, CC, LC,
};
use trellis_layout::{Bounds, Grid};

pub struct Widget {
    pub name: &'static str,
    min: (i32, i32),
    pref: (i32, i32),
    bounds: Cell<Bounds>,
}

impl Widget {
    pub fn new(name: &'static str, pref_w: i32, pref_h: i32) -> Rc<Self> {
        Rc::new(Self {
            name,
            min: (pref_w.min(10), pref_h.min(10)),
            pref: (pref_w, pref_h),
            bounds: Cell::new(Bounds::default()),
        })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds.get()
    }
}

impl ComponentWrapper for Widget {
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

    fn minimum_height(&self, _width_hint: i32) -> i32 {
        self.min.1
    }

    fn preferred_width(&self, _height_hint: i32) -> i32 {
        self.pref.0
    }

    fn preferred_height(&self, _width_hint: i32) -> i32 {
        self.pref.1
    }

    fn set_bounds(&self, x: i32, y: i32, width: i32, height: i32) {
        self.bounds.set(Bounds::new(x, y, width, height));
    }
}

pub struct Panel {
    size: (i32, i32),
    token: LayoutToken,
    children: RefCell<Vec<Rc<dyn ComponentWrapper>>>,
}

impl Panel {
    pub fn new(width: i32, height: i32) -> Rc<Self> {
        Rc::new(Self {
            size: (width, height),
            token: LayoutToken::new(),
            children: RefCell::new(Vec::new()),
        })
    }
}

impl ComponentWrapper for Panel {
    fn x(&self) -> i32 {
        0
    }

    fn y(&self) -> i32 {
        0
    }

    fn width(&self) -> i32 {
        self.size.0
    }

    fn height(&self) -> i32 {
        self.size.1
    }

    fn minimum_width(&self, _height_hint: i32) -> i32 {
        0
    }

    fn minimum_height(&self, _width_hint: i32) -> i32 {
        0
    }

    fn preferred_width(&self, _height_hint: i32) -> i32 {
        self.size.0
    }

    fn preferred_height(&self, _width_hint: i32) -> i32 {
        self.size.1
    }

    fn set_bounds(&self, _x: i32, _y: i32, _width: i32, _height: i32) {}
}

impl ContainerWrapper for Panel {
    fn components(&self) -> Vec<Rc<dyn ComponentWrapper>> {
        self.children.borrow().clone()
    }

    fn layout_token(&self) -> &LayoutToken {
        &self.token
    }

    fn as_component(&self) -> &dyn ComponentWrapper {
        self
    }
}

/// Adds the widgets to `panel` in order and builds a grid over them.
pub fn build(panel: &Rc<Panel>, lc: &LC, rows: &AC, cols: &AC, entries: &[(Rc<Widget>, CC)]) -> Grid {
    let mut ccs = ConstraintMap::new();
    for (widget, cc) in entries {
        let comp: Rc<dyn ComponentWrapper> = widget.clone();
        panel.children.borrow_mut().push(Rc::clone(&comp));
        ccs.insert(ComponentKey::of(&comp), cc.clone());
    }
    let parent: Rc<dyn ContainerWrapper> = panel.clone();
    Grid::new(parent, lc, rows, cols, &ccs, &[]).expect("valid grid")
}

/// A layout without insets or gaps.
pub fn tight() -> LC {
    LC::new().no_insets().grid_gap(
        trellis_core::BoundSize::ZERO_PIXEL,
        trellis_core::BoundSize::ZERO_PIXEL,
    )
}
