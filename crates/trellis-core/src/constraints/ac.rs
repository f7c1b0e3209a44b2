//! Row and column constraints.

use crate::constraints::dim::DimConstraint;
use crate::units::{BoundSize, UnitValue};

/// Constraints for the rows or columns of a layout, one per index.
///
/// Builder calls apply to the current indexes. [`AC::index`] selects an
/// index and [`AC::gap`] moves on to the next one, so
/// `AC::new().size(a).gap(g).size(b)` describes two lines separated by `g`.
#[derive(Debug, Clone, PartialEq)]
pub struct AC {
    constraints: Vec<DimConstraint>,
    current: usize,
}

impl Default for AC {
    fn default() -> Self {
        Self {
            constraints: vec![DimConstraint::default()],
            current: 0,
        }
    }
}

impl AC {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds from explicit constraints. An empty list yields one default line.
    pub fn from_constraints(constraints: Vec<DimConstraint>) -> Self {
        if constraints.is_empty() {
            return Self::default();
        }
        Self {
            constraints,
            current: 0,
        }
    }

    pub fn constraints(&self) -> &[DimConstraint] {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DimConstraint> {
        self.constraints.get(index)
    }

    /// The constraint for `index`, reusing the last one past the end.
    pub fn constraint_or_last(&self, index: i32) -> &DimConstraint {
        let last = self.constraints.len() - 1;
        &self.constraints[(index.max(0) as usize).min(last)]
    }

    fn ensure(&mut self, len: usize) {
        if self.constraints.len() < len {
            self.constraints.resize_with(len, DimConstraint::default);
        }
    }

    fn current_mut(&mut self) -> &mut DimConstraint {
        self.ensure(self.current + 1);
        &mut self.constraints[self.current]
    }

    /// Sets the number of lines, truncating or adding defaults.
    pub fn count(mut self, count: usize) -> Self {
        let count = count.max(1);
        self.constraints.resize_with(count, DimConstraint::default);
        self.current = self.current.min(count - 1);
        self
    }

    /// Makes `index` the line further calls apply to.
    pub fn index(mut self, index: usize) -> Self {
        self.current = index;
        self.ensure(index + 1);
        self
    }

    pub fn push(mut self, dc: DimConstraint) -> Self {
        self.constraints.push(dc);
        self
    }

    pub fn grow(self, weight: f32) -> Self {
        self.edit(|dc| dc.resize.grow = Some(weight))
    }

    pub fn grow_prio(self, priority: i32) -> Self {
        self.edit(|dc| dc.resize.grow_priority = priority)
    }

    pub fn shrink(self, weight: Option<f32>) -> Self {
        self.edit(|dc| dc.resize.shrink = weight)
    }

    pub fn shrink_prio(self, priority: i32) -> Self {
        self.edit(|dc| dc.resize.shrink_priority = priority)
    }

    pub fn fill(self) -> Self {
        self.edit(|dc| dc.fill = true)
    }

    pub fn no_grid(self) -> Self {
        self.edit(|dc| dc.no_grid = true)
    }

    pub fn size(self, size: BoundSize) -> Self {
        self.edit(|dc| dc.size = size)
    }

    pub fn size_group(self, group: impl Into<String>) -> Self {
        let group = group.into();
        self.edit(|dc| dc.size_group = Some(group))
    }

    pub fn end_group(self, group: impl Into<String>) -> Self {
        let group = group.into();
        self.edit(|dc| dc.end_group = Some(group))
    }

    pub fn align(self, align: UnitValue) -> Self {
        self.edit(|dc| dc.align = Some(align))
    }

    /// Gap after the current line; then moves to the next line.
    pub fn gap(mut self, gap: BoundSize) -> Self {
        self.current_mut().gap_after = Some(gap);
        self.current += 1;
        self.ensure(self.current + 1);
        self
    }

    fn edit(mut self, f: impl FnOnce(&mut DimConstraint)) -> Self {
        f(self.current_mut());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_one_line() {
        let ac = AC::new();
        assert_eq!(ac.len(), 1);
        assert_eq!(ac.constraint_or_last(5), &DimConstraint::default());
    }

    #[test]
    fn test_gap_advances() {
        let ac = AC::new()
            .size(BoundSize::fixed(UnitValue::px(50.0)))
            .gap(BoundSize::gap(UnitValue::px(10.0)))
            .size(BoundSize::fixed(UnitValue::px(60.0)))
            .grow(100.0);

        assert_eq!(ac.len(), 2);
        assert!(ac.constraints()[0].gap_after.is_some());
        assert!(!ac.constraints()[0].has_grow());
        assert!(ac.constraints()[1].has_grow());
    }

    #[test]
    fn test_count_and_index() {
        let ac = AC::new().count(3).index(2).fill();
        assert_eq!(ac.len(), 3);
        assert!(ac.constraints()[2].fill);
        assert!(!ac.constraints()[0].fill);

        let ac = ac.count(1);
        assert_eq!(ac.len(), 1);
        assert_eq!(ac.constraint_or_last(-3), &ac.constraints()[0]);

        let ac = AC::new().index(4).no_grid();
        assert_eq!(ac.len(), 5);
        assert!(ac.get(4).unwrap().no_grid);
    }

    #[test]
    fn test_from_constraints() {
        assert_eq!(AC::from_constraints(Vec::new()).len(), 1);
        let ac = AC::from_constraints(vec![DimConstraint::new(), DimConstraint::new().with_fill(true)]);
        assert!(ac.constraint_or_last(9).fill);
    }
}
