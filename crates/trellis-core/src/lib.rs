//! Core types for the Trellis grid layout engine.
//!
//! This crate provides the foundation shared by the solver and the grid:
//! - Unit values and min/preferred/max ranges
//! - Constraint records for layouts, rows/columns and components
//! - Host interfaces for components and containers
//! - The link registry and process-wide platform defaults
//! - Error types

pub mod component;
pub mod constraints;
pub mod errors;
pub mod link;
pub mod platform;
pub mod types;
pub mod units;

pub use component::{ComponentKey, ComponentWrapper, ConstraintMap, ContainerWrapper, LayoutCallback};
pub use constraints::{AbsolutePlacement, CellPlacement, DimConstraint, ResizeConstraint, AC, CC, LC};
pub use errors::{LayoutError, Result};
pub use link::{LayoutToken, LinkField, LinkHandler, LinkRegistry};
pub use platform::PlatformDefaults;
pub use types::*;
pub use units::{AlignKeyword, BoundSize, Operator, Unit, UnitConverter, UnitKind, UnitValue};
