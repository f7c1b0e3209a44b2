//! Host-facing interfaces.
//!
//! The layout engine never owns widgets. Hosts expose their components and
//! containers through these traits and receive final bounds via
//! [`ComponentWrapper::set_bounds`].

use std::rc::Rc;

use indexmap::IndexMap;

use crate::constraints::CC;
use crate::link::LayoutToken;
use crate::platform::PlatformDefaults;
use crate::types::{ContentBias, INF};
use crate::units::{BoundSize, UnitValue};

/// A single laid-out component as seen by the engine.
///
/// Size queries take a hint for the other dimension, or `-1` for none.
pub trait ComponentWrapper {
    fn x(&self) -> i32;
    fn y(&self) -> i32;
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn minimum_width(&self, height_hint: i32) -> i32;
    fn minimum_height(&self, width_hint: i32) -> i32;
    fn preferred_width(&self, height_hint: i32) -> i32;
    fn preferred_height(&self, width_hint: i32) -> i32;

    fn maximum_width(&self, _height_hint: i32) -> i32 {
        INF
    }

    fn maximum_height(&self, _width_hint: i32) -> i32 {
        INF
    }

    /// Commits final bounds. Hosts use interior mutability.
    fn set_bounds(&self, x: i32, y: i32, width: i32, height: i32);

    fn is_visible(&self) -> bool {
        true
    }

    /// Position on screen, used by screen-relative units.
    fn screen_location_x(&self) -> i32 {
        self.x()
    }

    fn screen_location_y(&self) -> i32 {
        self.y()
    }

    /// Baseline offset from the top for the given size, if the component has one.
    fn baseline(&self, _width: i32, _height: i32) -> Option<i32> {
        None
    }

    fn has_baseline(&self) -> bool {
        false
    }

    /// Scale factor applied to logical pixels.
    fn pixel_unit_factor(&self, horizontal: bool) -> f32 {
        let dpi = if horizontal {
            self.horizontal_screen_dpi()
        } else {
            self.vertical_screen_dpi()
        };
        dpi as f32 / PlatformDefaults::current().dpi_base
    }

    fn horizontal_screen_dpi(&self) -> i32 {
        96
    }

    fn vertical_screen_dpi(&self) -> i32 {
        96
    }

    fn screen_width(&self) -> i32 {
        1920
    }

    fn screen_height(&self) -> i32 {
        1080
    }

    /// Id used for links when the component's constraint has none.
    fn link_id(&self) -> Option<String> {
        None
    }

    /// Decoration drawn outside the logical bounds, as top, left, bottom, right.
    fn visual_padding(&self) -> Option<[i32; 4]> {
        None
    }

    fn content_bias(&self) -> ContentBias {
        ContentBias::None
    }

    fn paint_debug_outline(&self, _show_visual_padding: bool) {}
}

/// A component that holds other components and owns a layout.
pub trait ContainerWrapper: ComponentWrapper {
    /// Children in layout order.
    fn components(&self) -> Vec<Rc<dyn ComponentWrapper>>;

    fn component_count(&self) -> usize {
        self.components().len()
    }

    /// Identity of the layout instance that owns this container's links.
    fn layout_token(&self) -> &LayoutToken;

    fn is_left_to_right(&self) -> bool {
        true
    }

    fn paint_debug_cell(&self, _x: i32, _y: i32, _width: i32, _height: i32) {}

    /// This container viewed as a plain component.
    fn as_component(&self) -> &dyn ComponentWrapper;
}

/// Hooks that let a host adjust positions and sizes without touching constraints.
pub trait LayoutCallback {
    /// Absolute position override as x, y, x2, y2.
    fn position(&self, _comp: &dyn ComponentWrapper) -> Option<[Option<UnitValue>; 4]> {
        None
    }

    /// Size override as horizontal, vertical. Unset parts fall back to the component.
    fn size(&self, _comp: &dyn ComponentWrapper) -> Option<[Option<BoundSize>; 2]> {
        None
    }

    /// Called after bounds have been committed to `comp`.
    fn correct_bounds(&self, _comp: &dyn ComponentWrapper) {}
}

/// Pointer identity of a component, used to key its constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentKey(usize);

impl ComponentKey {
    pub fn of(comp: &Rc<dyn ComponentWrapper>) -> Self {
        Self(Rc::as_ptr(comp) as *const () as usize)
    }

    pub fn of_ref(comp: &dyn ComponentWrapper) -> Self {
        Self(comp as *const dyn ComponentWrapper as *const () as usize)
    }
}

/// Per-component constraints in insertion order.
pub type ConstraintMap = IndexMap<ComponentKey, CC>;
