//! Components that share one row or column and are laid out together.

use smallvec::SmallVec;
use trellis_constraint::{calculate_serial, constrain_size, merge_sizes, sum};
use trellis_core::{
    constraints::WEIGHT_100, ContainerWrapper, DimConstraint, MinPrefMax, ResizeConstraint,
    SizeType, UnitValue, INF, MAX, MIN, PREF,
};

use crate::comp_wrap::CompWrap;
use crate::flow::FlowSizeSpec;

/// How the members of a group share the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GroupKind {
    /// One after another along the axis.
    Serial,
    /// Side by side, each filling the whole line.
    Parallel,
    /// Vertically lined up on their baselines.
    Baseline,
}

/// What single components are grouped by inside one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkContext {
    Shared,
    Baseline,
}

const FILL_PUSH: [Option<f32>; 1] = [Some(WEIGHT_100)];

#[derive(Debug, Clone)]
pub(crate) struct LinkedDimGroup {
    /// `None` for a group that holds exactly one cell.
    pub(crate) context: Option<LinkContext>,
    /// Number of lines covered, counted over occupied lines only.
    pub(crate) span: i32,
    pub(crate) kind: GroupKind,
    pub(crate) horizontal: bool,
    pub(crate) from_end: bool,
    pub(crate) wraps: SmallVec<[usize; 4]>,
    pub(crate) start: i32,
    pub(crate) size: i32,
}

impl LinkedDimGroup {
    pub(crate) fn new(
        context: Option<LinkContext>,
        span: i32,
        kind: GroupKind,
        horizontal: bool,
        from_end: bool,
    ) -> Self {
        Self {
            context,
            span,
            kind,
            horizontal,
            from_end,
            wraps: SmallVec::new(),
            start: 0,
            size: 0,
        }
    }

    pub(crate) fn min_pref_max(&self, wraps: &[CompWrap]) -> MinPrefMax {
        if self.wraps.is_empty() {
            return [0, 0, INF];
        }
        let mut sizes = [0, 0, INF];
        for slot in [MIN, PREF] {
            sizes[slot] = match self.kind {
                GroupKind::Parallel => self.total_size_parallel(wraps, slot),
                GroupKind::Baseline => {
                    let (above, below) = self.baseline_above_below(wraps, slot);
                    above + below
                }
                GroupKind::Serial => self.total_size_serial(wraps, slot),
            };
        }
        sizes
    }

    fn members<'a>(&'a self, wraps: &'a [CompWrap]) -> impl Iterator<Item = &'a CompWrap> + 'a {
        self.wraps.iter().map(move |&ix| &wraps[ix])
    }

    fn total_size_parallel(&self, wraps: &[CompWrap], slot: usize) -> i32 {
        let mut size = if slot == MAX { INF } else { 0 };
        for cw in self.members(wraps) {
            let cw_size = cw.size_incl_gaps(slot, self.horizontal);
            if cw_size >= INF {
                return INF;
            }
            if if slot == MAX { cw_size < size } else { cw_size > size } {
                size = cw_size;
            }
        }
        constrain_size(size)
    }

    fn total_size_serial(&self, wraps: &[CompWrap], slot: usize) -> i32 {
        let mut total = 0;
        let mut last_gap_after = 0;
        for cw in self.members(wraps) {
            let gap_before = cw.gap_size(slot, self.horizontal, true);
            if gap_before > last_gap_after {
                total += gap_before - last_gap_after;
            }
            total += cw.size(slot, self.horizontal);
            last_gap_after = cw.gap_size(slot, self.horizontal, false);
            total += last_gap_after;
            if total >= INF {
                return INF;
            }
        }
        constrain_size(total)
    }

    /// Largest extent above and below the baseline, gaps included.
    fn baseline_above_below(&self, wraps: &[CompWrap], slot: usize) -> (i32, i32) {
        let mut above = i32::MIN;
        let mut below = i32::MIN;
        for cw in self.members(wraps) {
            let height = cw.size(slot, false);
            if height >= INF {
                return (INF / 2, INF / 2);
            }
            let baseline = cw.baseline(slot);
            above = above.max(baseline + cw.gap_size(slot, false, true));
            below = below.max(height - baseline + cw.gap_size(slot, false, false));
        }
        (above, below)
    }

    /// Places the members within `[start, start + size)` (or ending at `start`
    /// when laid out from the end).
    pub(crate) fn layout(
        &mut self,
        wraps: &mut [CompWrap],
        dc: &DimConstraint,
        start: i32,
        size: i32,
        container: &dyn ContainerWrapper,
    ) {
        self.start = start;
        self.size = size;
        if self.wraps.is_empty() {
            return;
        }
        match self.kind {
            GroupKind::Parallel => self.layout_parallel(wraps, dc, start, size, container),
            GroupKind::Baseline => self.layout_baseline(wraps, dc, start, size, container),
            GroupKind::Serial => self.layout_serial(wraps, dc, start, size, container),
        }
    }

    fn layout_baseline(
        &self,
        wraps: &mut [CompWrap],
        dc: &DimConstraint,
        start: i32,
        size: i32,
        container: &dyn ContainerWrapper,
    ) {
        let (above, below) = self.baseline_above_below(wraps, PREF);
        for &ix in &self.wraps {
            let cw = &mut wraps[ix];
            let height = cw.size(PREF, false);
            let baseline = cw.baseline(PREF);
            cw.set_dim_bounds(-baseline, height, false);
        }

        let first = &wraps[self.wraps[0]];
        let mut align = first.cc.vertical.align.clone();
        if self.span == 1 && align.is_none() {
            align = Some(dc.align_or_default(false));
        }
        let align = align.map(|a| {
            if a.is_keyword(trellis_core::AlignKeyword::Baseline) {
                UnitValue::CENTER
            } else {
                a
            }
        });
        let slack = align.map_or(0, |a| {
            a.pixels((size - above - below) as f32, Some(container), None).max(0)
        });
        let offset = start + above + slack;

        for &ix in &self.wraps {
            let cw = &mut wraps[ix];
            cw.y += offset;
            if cw.y + cw.h > start + size {
                cw.h = start + size - cw.y;
            }
        }
    }

    fn layout_serial(
        &self,
        wraps: &mut [CompWrap],
        dc: &DimConstraint,
        start: i32,
        size: i32,
        container: &dyn ContainerWrapper,
    ) {
        let hor = self.horizontal;
        let members: Vec<&CompWrap> = self.wraps.iter().map(|&ix| &wraps[ix]).collect();

        let constraints: Vec<ResizeConstraint> =
            members.iter().map(|cw| cw.cc.dim(hor).resize).collect();
        let gap_push: Vec<bool> = (0..=members.len())
            .map(|i| {
                (i > 0 && members[i - 1].is_push_gap(hor, false))
                    || (i < members.len() && members[i].is_push_gap(hor, true))
            })
            .collect();
        let sizes: Vec<MinPrefMax> = members.iter().map(|cw| *cw.sizes(hor)).collect();
        let mut gaps = Vec::with_capacity(members.len() + 1);
        gaps.push(members[0].gaps(hor, true));
        for (i, cw) in members.iter().enumerate() {
            let next = members.get(i + 1).and_then(|n| n.gaps(hor, true));
            gaps.push(merge_sizes(cw.gaps(hor, false), next, true));
        }

        let fss = FlowSizeSpec::merge(&constraints, &gap_push, &sizes, &gaps);
        let push = dc.fill.then_some(&FILL_PUSH[..]);
        let all = calculate_serial(
            &fss.optional_sizes(),
            &fss.constraints,
            push,
            SizeType::Pref,
            size,
        );

        let align = correct_align(&members[0].cc.dim(hor).align, &dc.align_or_default(hor), hor, self.from_end);
        let mut pos = start;
        let slack = size - sum(&all);
        if slack > 0 {
            if let Some(align) = align {
                let al = slack.min(align.pixels(slack as f32, Some(container), None).max(0));
                pos += if self.from_end { -al } else { al };
            }
        }

        let mut b = 0;
        for &ix in &self.wraps {
            let cw = &mut wraps[ix];
            if self.from_end {
                pos -= all[b];
                b += 1;
                cw.set_dim_bounds(pos - all[b], all[b], hor);
                pos -= all[b];
                b += 1;
            } else {
                pos += all[b];
                b += 1;
                cw.set_dim_bounds(pos, all[b], hor);
                pos += all[b];
                b += 1;
            }
        }
    }

    fn layout_parallel(
        &self,
        wraps: &mut [CompWrap],
        dc: &DimConstraint,
        start: i32,
        size: i32,
        container: &dyn ContainerWrapper,
    ) {
        let hor = self.horizontal;
        let push = dc.fill.then_some(&FILL_PUSH[..]);
        let row_align = dc.align_or_default(hor);

        for &ix in &self.wraps {
            let cw = &mut wraps[ix];
            let gap_rc = |push: bool| {
                Some(if push {
                    ResizeConstraint::GAP_PUSH
                } else {
                    ResizeConstraint::GAP
                })
            };
            let constraints = [
                gap_rc(cw.is_push_gap(hor, true)),
                Some(cw.cc.dim(hor).resize),
                gap_rc(cw.is_push_gap(hor, false)),
            ];
            let sizes = [cw.gaps(hor, true), Some(*cw.sizes(hor)), cw.gaps(hor, false)];
            let [gap_before, comp_size, gap_after] = match calculate_serial(
                &sizes,
                &constraints,
                push,
                SizeType::Pref,
                size,
            )[..]
            {
                [a, b, c] => [a, b, c],
                _ => [0, 0, 0],
            };

            let align = correct_align(&cw.cc.dim(hor).align, &row_align, hor, self.from_end);
            let mut pos = if self.from_end {
                start - gap_before
            } else {
                start + gap_before
            };
            let slack = size - comp_size - gap_before - gap_after;
            if slack > 0 {
                if let Some(align) = align {
                    let al = slack.min(align.pixels(slack as f32, Some(container), None).max(0));
                    pos += if self.from_end { -al } else { al };
                }
            }
            let start = if self.from_end { pos - comp_size } else { pos };
            cw.set_dim_bounds(start, comp_size, hor);
        }
    }
}

/// Alignment to use for a component in a line. Baseline turns into center.
///
/// From the end, offsets are measured backwards: left and right swap, and
/// leading (the end in that direction) maps to an offset of zero.
fn correct_align(
    own: &Option<UnitValue>,
    line: &UnitValue,
    horizontal: bool,
    from_end: bool,
) -> Option<UnitValue> {
    use trellis_core::AlignKeyword::{Baseline, Leading, Left, Right, Trailing};

    let align = own.clone().unwrap_or_else(|| line.clone());
    if align.is_keyword(Baseline) {
        return Some(UnitValue::CENTER);
    }
    if horizontal && from_end {
        if align.is_keyword(Left) || align.is_keyword(Trailing) {
            return Some(UnitValue::RIGHT);
        }
        if align.is_keyword(Right) || align.is_keyword(Leading) {
            return Some(UnitValue::LEFT);
        }
    }
    Some(align)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestComponent, TestContainer};
    use trellis_core::{BoundSize, CC};

    fn wrap(container: &TestContainer, min: i32, pref: i32, cc: CC) -> CompWrap {
        let mut cw = CompWrap::new(TestComponent::new(min, pref, min, pref), cc, None, false);
        cw.validate(container, None);
        cw
    }

    #[test]
    fn test_parallel_sizes_take_largest() {
        let container = TestContainer::new(400, 300);
        let wraps = vec![
            wrap(&container, 10, 30, CC::new()),
            wrap(&container, 20, 50, CC::new()),
        ];
        let mut group = LinkedDimGroup::new(Some(LinkContext::Shared), 1, GroupKind::Parallel, true, false);
        group.wraps.extend([0, 1]);
        assert_eq!(group.min_pref_max(&wraps), [20, 50, INF]);
    }

    #[test]
    fn test_serial_sizes_add_up() {
        let container = TestContainer::new(400, 300);
        let gap = BoundSize::gap(UnitValue::px(6.0));
        let mut wraps = vec![
            wrap(&container, 10, 30, CC::new()),
            wrap(&container, 20, 50, CC::new().gap_left(gap)),
        ];
        let prev = wraps[0].comp.clone();
        wraps[1].calc_gaps(&container, Some((prev.as_ref(), None)), None, true);

        let mut group = LinkedDimGroup::new(None, 1, GroupKind::Serial, true, false);
        group.wraps.extend([0, 1]);
        assert_eq!(group.min_pref_max(&wraps), [36, 86, INF]);
    }

    #[test]
    fn test_serial_layout_places_in_order() {
        let container = TestContainer::new(400, 300);
        let mut wraps = vec![
            wrap(&container, 10, 30, CC::new()),
            wrap(&container, 20, 50, CC::new()),
        ];
        let mut group = LinkedDimGroup::new(None, 1, GroupKind::Serial, true, false);
        group.wraps.extend([0, 1]);
        group.layout(&mut wraps, &DimConstraint::default(), 5, 200, &container);
        assert_eq!((wraps[0].x, wraps[0].w), (5, 30));
        assert_eq!((wraps[1].x, wraps[1].w), (35, 50));
        assert_eq!((group.start, group.size), (5, 200));
    }

    #[test]
    fn test_parallel_layout_aligns() {
        let container = TestContainer::new(400, 300);
        let mut wraps = vec![wrap(&container, 10, 30, CC::new().align_x(UnitValue::CENTER))];
        let mut group = LinkedDimGroup::new(Some(LinkContext::Shared), 1, GroupKind::Parallel, true, false);
        group.wraps.push(0);
        group.layout(&mut wraps, &DimConstraint::default(), 0, 100, &container);
        assert_eq!((wraps[0].x, wraps[0].w), (35, 30));
    }

    #[test]
    fn test_parallel_layout_from_end() {
        let container = TestContainer::new(400, 300);
        let mut wraps = vec![wrap(&container, 10, 30, CC::new())];
        let mut group = LinkedDimGroup::new(Some(LinkContext::Shared), 1, GroupKind::Parallel, true, true);
        group.wraps.push(0);
        group.layout(&mut wraps, &DimConstraint::default(), 100, 100, &container);
        // Leading alignment from the end hugs the end of the line.
        assert_eq!((wraps[0].x, wraps[0].w), (70, 30));
    }

    #[test]
    fn test_fill_stretches_grow_less_components() {
        let container = TestContainer::new(400, 300);
        let mut wraps = vec![wrap(&container, 10, 30, CC::new())];
        let mut group = LinkedDimGroup::new(Some(LinkContext::Shared), 1, GroupKind::Parallel, false, false);
        group.wraps.push(0);
        let dc = DimConstraint::default().with_fill(true);
        group.layout(&mut wraps, &dc, 0, 80, &container);
        assert_eq!((wraps[0].y, wraps[0].h), (0, 80));
    }

    #[test]
    fn test_baseline_group() {
        let container = TestContainer::new(400, 300);
        let mut wraps = vec![
            {
                let mut cw = CompWrap::new(
                    TestComponent::new(0, 10, 20, 20).with_baseline(15),
                    CC::new(),
                    None,
                    false,
                );
                cw.validate(&container, None);
                cw
            },
            {
                let mut cw = CompWrap::new(
                    TestComponent::new(0, 10, 30, 30).with_baseline(20),
                    CC::new(),
                    None,
                    false,
                );
                cw.validate(&container, None);
                cw
            },
        ];
        let mut group = LinkedDimGroup::new(Some(LinkContext::Baseline), 1, GroupKind::Baseline, false, false);
        group.wraps.extend([0, 1]);
        assert_eq!(group.min_pref_max(&wraps), [30, 30, INF]);

        group.layout(&mut wraps, &DimConstraint::default(), 0, 30, &container);
        assert_eq!(wraps[0].y + 15, wraps[1].y + 20);
        assert_eq!((wraps[1].y, wraps[1].h), (0, 30));
    }
}
