//! Size distribution for Trellis layouts.
//!
//! The grid turns every row, column and in-cell group into a list of
//! min/preferred/max sizes with resize priorities, then asks
//! [`calculate_serial`] to fit them into a target length.
//!
//! # Example
//!
//! ```
//! use trellis_constraint::calculate_serial;
//! use trellis_core::{ResizeConstraint, SizeType, INF};
//!
//! let grow = ResizeConstraint::new(100, Some(100.0), 100, Some(100.0));
//! let sizes = [Some([0, 50, INF]), Some([0, 50, INF])];
//! let result = calculate_serial(&sizes, &[Some(grow), Some(grow)], None, SizeType::Pref, 200);
//! assert_eq!(result, vec![100, 100]);
//! ```

mod serial;
mod sizes;

pub use serial::{broken_boundary, calculate_serial, round_sizes};
pub use sizes::{constrain_size, correct_min_max, merge_sizes, sum};
