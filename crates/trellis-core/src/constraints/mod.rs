//! Constraint records consumed by the grid.
//!
//! - [`LC`]: one per layout, container-wide settings.
//! - [`AC`]: one per axis, a [`DimConstraint`] per row or column.
//! - [`CC`]: one per component.

mod ac;
mod cc;
mod dim;
mod lc;

pub use ac::AC;
pub use cc::{AbsolutePlacement, CellPlacement, CC};
pub use dim::{DimConstraint, ResizeConstraint, WEIGHT_100};
pub use lc::LC;
