//! Grid layout computation for Trellis.
//!
//! This crate places a container's components into a sparse grid of rows
//! and columns and computes their final bounds from the layout, row, column
//! and component constraints defined in `trellis-core`.
//!
//! # Architecture
//!
//! 1. **Placement**: components flow into cells, honouring wrap, skip,
//!    span, split, explicit cells, docking and absolute positions
//! 2. **Grouping**: the components of every row and column are divided into
//!    serial, parallel and baseline groups
//! 3. **Sizing**: line sizes, gaps and insets are merged into one flat size
//!    list per axis and spanning components widen the lines they cover
//! 4. **Layout**: each axis is distributed with `trellis-constraint`, then
//!    absolute positions and links are resolved and bounds are committed
//!
//! # Example
//!
//! ```ignore
//! use trellis_core::{ComponentKey, ConstraintMap, AC, CC, LC};
//! use trellis_layout::{Bounds, Grid};
//!
//! let mut ccs = ConstraintMap::new();
//! ccs.insert(ComponentKey::of(&label), CC::new());
//! ccs.insert(ComponentKey::of(&field), CC::new().grow_x(100.0).wrap());
//!
//! let mut grid = Grid::new(panel, &LC::new(), &AC::new(), &AC::new(), &ccs, &[])?;
//! let [_, pref_width, _] = grid.width();
//! let result = grid.layout(Bounds::new(0, 0, 400, 300), None, None, false, false);
//! if result.layout_again {
//!     grid.invalidate_container_size();
//! }
//! ```

mod absolute;
mod bounds;
mod cell;
mod comp_wrap;
mod flow;
mod grid;
mod group;
mod sizing;

#[cfg(test)]
mod test_utils;

pub use bounds::Bounds;
pub use grid::{Grid, LayoutResult};
