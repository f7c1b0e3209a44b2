//! Layout-wide constraints.

use crate::types::{HideMode, INF};
use crate::units::{BoundSize, UnitValue};

/// Settings for a whole layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LC {
    pub fill_x: bool,
    pub fill_y: bool,
    /// Components flow along rows when true, along columns otherwise.
    pub flow_x: bool,
    /// Wrap after this many cells. 0 wraps after the number of defined
    /// lines; [`INF`] never wraps.
    pub wrap_after: i32,
    /// top, left, bottom, right. `None` uses the platform insets.
    pub insets: Option<[UnitValue; 4]>,
    pub align_x: Option<UnitValue>,
    pub align_y: Option<UnitValue>,
    pub grid_gap_x: Option<BoundSize>,
    pub grid_gap_y: Option<BoundSize>,
    /// Overrides the container's computed width.
    pub width: BoundSize,
    pub height: BoundSize,
    pub pack_width: BoundSize,
    pub pack_height: BoundSize,
    pub pack_width_align: f32,
    pub pack_height_align: f32,
    pub hide_mode: HideMode,
    /// Debug repaint interval. 0 turns debug painting off.
    pub debug_millis: u32,
    pub top_to_bottom: bool,
    /// `None` follows the container.
    pub left_to_right: Option<bool>,
    pub visual_padding: bool,
    pub no_grid: bool,
    pub no_cache: bool,
}

impl Default for LC {
    fn default() -> Self {
        Self {
            fill_x: false,
            fill_y: false,
            flow_x: true,
            wrap_after: INF,
            insets: None,
            align_x: None,
            align_y: None,
            grid_gap_x: None,
            grid_gap_y: None,
            width: BoundSize::NULL,
            height: BoundSize::NULL,
            pack_width: BoundSize::NULL,
            pack_height: BoundSize::NULL,
            pack_width_align: 0.5,
            pack_height_align: 1.0,
            hide_mode: HideMode::Normal,
            debug_millis: 0,
            top_to_bottom: true,
            left_to_right: None,
            visual_padding: true,
            no_grid: false,
            no_cache: false,
        }
    }
}

impl LC {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(self) -> Self {
        self.fill_x().fill_y()
    }

    pub fn fill_x(mut self) -> Self {
        self.fill_x = true;
        self
    }

    pub fn fill_y(mut self) -> Self {
        self.fill_y = true;
        self
    }

    pub fn flow_x(mut self) -> Self {
        self.flow_x = true;
        self
    }

    pub fn flow_y(mut self) -> Self {
        self.flow_x = false;
        self
    }

    pub fn wrap_after(mut self, count: i32) -> Self {
        self.wrap_after = count;
        self
    }

    /// Wraps after the number of defined rows or columns.
    pub fn wrap(self) -> Self {
        self.wrap_after(0)
    }

    pub fn insets(mut self, insets: [UnitValue; 4]) -> Self {
        self.insets = Some(insets);
        self
    }

    pub fn insets_all(self, inset: UnitValue) -> Self {
        let vertical = inset.clone().with_horizontal(false);
        let horizontal = inset.with_horizontal(true);
        self.insets([vertical.clone(), horizontal.clone(), vertical, horizontal])
    }

    pub fn no_insets(self) -> Self {
        self.insets_all(UnitValue::ZERO)
    }

    pub fn align_x(mut self, align: UnitValue) -> Self {
        self.align_x = Some(align);
        self
    }

    pub fn align_y(mut self, align: UnitValue) -> Self {
        self.align_y = Some(align);
        self
    }

    pub fn grid_gap(self, x: BoundSize, y: BoundSize) -> Self {
        self.grid_gap_x(x).grid_gap_y(y)
    }

    pub fn grid_gap_x(mut self, gap: BoundSize) -> Self {
        self.grid_gap_x = Some(gap);
        self
    }

    pub fn grid_gap_y(mut self, gap: BoundSize) -> Self {
        self.grid_gap_y = Some(gap);
        self
    }

    pub fn width(mut self, size: BoundSize) -> Self {
        self.width = size;
        self
    }

    pub fn height(mut self, size: BoundSize) -> Self {
        self.height = size;
        self
    }

    pub fn pack(mut self, width: BoundSize, height: BoundSize) -> Self {
        self.pack_width = width;
        self.pack_height = height;
        self
    }

    pub fn pack_align(mut self, width_align: f32, height_align: f32) -> Self {
        self.pack_width_align = width_align;
        self.pack_height_align = height_align;
        self
    }

    pub fn hide_mode(mut self, mode: HideMode) -> Self {
        self.hide_mode = mode;
        self
    }

    pub fn debug(mut self, millis: u32) -> Self {
        self.debug_millis = millis;
        self
    }

    pub fn bottom_to_top(mut self) -> Self {
        self.top_to_bottom = false;
        self
    }

    pub fn left_to_right(mut self, ltr: bool) -> Self {
        self.left_to_right = Some(ltr);
        self
    }

    pub fn visual_padding(mut self, on: bool) -> Self {
        self.visual_padding = on;
        self
    }

    pub fn no_grid(mut self) -> Self {
        self.no_grid = true;
        self
    }

    pub fn no_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }
}
