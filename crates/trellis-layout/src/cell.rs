//! Grid cells.

use smallvec::SmallVec;

/// One occupied grid cell. Holds indexes into the grid's component list.
#[derive(Debug, Clone)]
pub(crate) struct Cell {
    pub(crate) span_x: i32,
    pub(crate) span_y: i32,
    /// Split components flow horizontally inside the cell.
    pub(crate) flow_x: bool,
    pub(crate) wraps: SmallVec<[usize; 2]>,
}

impl Cell {
    pub(crate) fn new(span_x: i32, span_y: i32, flow_x: bool) -> Self {
        Self {
            span_x,
            span_y,
            flow_x,
            wraps: SmallVec::new(),
        }
    }

    pub(crate) fn with_wrap(wrap: usize, span_x: i32, span_y: i32, flow_x: bool) -> Self {
        let mut cell = Self::new(span_x, span_y, flow_x);
        cell.wraps.push(wrap);
        cell
    }

    pub(crate) fn span(&self, horizontal: bool) -> i32 {
        if horizontal {
            self.span_x
        } else {
            self.span_y
        }
    }
}

/// A rectangle of cells covered by a spanning cell, as `[col, row, span_x, span_y]`.
pub(crate) type SpannedRect = [i32; 4];

pub(crate) fn rect_covers(rect: &SpannedRect, row: i32, col: i32) -> bool {
    let [x, y, w, h] = *rect;
    x <= col && y <= row && x + w > col && y + h > row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers() {
        let rect = [1, 0, 2, 2];
        assert!(rect_covers(&rect, 0, 1));
        assert!(rect_covers(&rect, 1, 2));
        assert!(!rect_covers(&rect, 0, 3));
        assert!(!rect_covers(&rect, 2, 1));
        assert!(!rect_covers(&rect, 0, 0));
    }

    #[test]
    fn test_cell_span() {
        let cell = Cell::with_wrap(4, 3, 1, true);
        assert_eq!(cell.span(true), 3);
        assert_eq!(cell.span(false), 1);
        assert_eq!(cell.wraps.as_slice(), &[4]);
    }
}
