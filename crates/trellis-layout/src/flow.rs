//! Interleaved gap/line size lists for one axis.
//!
//! An axis with `n` lines is described by `2n + 1` entries: gap, line, gap,
//! line, ..., gap. Odd indexes are lines.

use trellis_constraint::calculate_serial;
use trellis_core::{
    DimConstraint, MinPrefMax, ResizeConstraint, SizeType, MAX, MIN, PREF,
};

/// A row or column constraint together with whether the line holds docked components.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineSpec<'a> {
    pub(crate) dc: &'a DimConstraint,
    pub(crate) dock: bool,
}

fn spec_or_last<'s, 'a>(specs: &'s [LineSpec<'a>], ix: usize) -> &'s LineSpec<'a> {
    &specs[ix.min(specs.len() - 1)]
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FlowSizeSpec {
    pub(crate) sizes: Vec<MinPrefMax>,
    pub(crate) constraints: Vec<Option<ResizeConstraint>>,
}

impl FlowSizeSpec {
    /// Interleaves `gaps` (`n + 1` entries) with the `n` component or line sizes.
    ///
    /// Gap entries get the gap resize constraint, or the pushing one where
    /// `gap_push` says so. Missing gaps become fixed zero entries.
    pub(crate) fn merge(
        constraints: &[ResizeConstraint],
        gap_push: &[bool],
        sizes: &[MinPrefMax],
        gaps: &[Option<MinPrefMax>],
    ) -> Self {
        let len = (sizes.len() << 1) + 1;
        let mut merged = Vec::with_capacity(len);
        let mut res = vec![None; len];
        let gap_rc = |ix: usize| {
            let push = gap_push.get(ix).or(gap_push.last()).copied().unwrap_or(false);
            Some(if push {
                ResizeConstraint::GAP_PUSH
            } else {
                ResizeConstraint::GAP
            })
        };

        for (ix, gap) in gaps.iter().take(sizes.len() + 1).enumerate() {
            if gap.is_some() {
                res[ix << 1] = gap_rc(ix);
            }
        }
        for (ix, size) in sizes.iter().enumerate() {
            merged.push(gaps.get(ix).copied().flatten().unwrap_or([0; 3]));
            merged.push(*size);
            res[(ix << 1) + 1] = constraints.get(ix).copied();
        }
        merged.push(gaps.get(sizes.len()).copied().flatten().unwrap_or([0; 3]));

        Self {
            sizes: merged,
            constraints: res,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.sizes.len()
    }

    pub(crate) fn optional_sizes(&self) -> Vec<Option<MinPrefMax>> {
        self.sizes.iter().copied().map(Some).collect()
    }

    /// Distributes `target` over `len` entries starting at `from` and stores the
    /// result in slot `slot`. Returns the new total.
    ///
    /// Eagerness widens what may change: at 0 and 1 lines with an explicit
    /// size in `slot` keep it. At 1 and 3 push weights apply, or the last
    /// non-dock line absorbs the rest when there are none.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn expand_sizes(
        &mut self,
        specs: &[LineSpec<'_>],
        default_push: Option<&[Option<f32>]>,
        target: i32,
        from: usize,
        len: usize,
        slot: usize,
        eagerness: u8,
    ) -> i32 {
        let mut constraints = vec![None; len];
        let mut to_expand = Vec::with_capacity(len);
        for (i, rc) in constraints.iter_mut().enumerate() {
            let current = self.sizes[i + from];
            to_expand.push(Some([current[slot], current[PREF], current[MAX]]));

            if eagerness <= 1 && i % 2 == 0 {
                let size = &spec_or_last(specs, (i + from - 1) >> 1).dc.size;
                let explicit = match slot {
                    MIN => size.min().is_some_and(|v| !v.is_component_size(SizeType::Min)),
                    PREF => size
                        .preferred()
                        .is_some_and(|v| !v.is_component_size(SizeType::Pref)),
                    _ => false,
                };
                if explicit {
                    continue;
                }
            }
            *rc = self.constraints.get(i + from).copied().flatten();
        }

        let push = (eagerness == 1 || eagerness == 3)
            .then(|| push_slice(specs, default_push, from, len));
        let resolved = calculate_serial(
            &to_expand,
            &constraints,
            push.as_deref(),
            SizeType::Pref,
            target,
        );

        let mut total = 0;
        for (i, &size) in resolved.iter().enumerate() {
            let entry = &mut self.sizes[i + from];
            entry[slot] = size;
            if slot == MIN && entry[PREF] < size {
                entry[PREF] = size;
            }
            total += size;
        }
        total
    }
}

/// Push weights for `len` entries from `from`. Without per-line weights the
/// last non-dock line in the range gets the full weight.
fn push_slice(
    specs: &[LineSpec<'_>],
    weights: Option<&[Option<f32>]>,
    from: usize,
    len: usize,
) -> Vec<Option<f32>> {
    if let Some(weights) = weights.filter(|w| w.len() >= from + len) {
        return weights[from..from + len].to_vec();
    }

    let mut out = vec![None; len];
    let mut i = from + len - 1;
    loop {
        if !spec_or_last(specs, i >> 1).dock {
            out[i - from] = Some(trellis_core::constraints::WEIGHT_100);
            break;
        }
        if i < from + 2 {
            break;
        }
        i -= 2;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{BoundSize, UnitValue, INF};

    fn line(dc: &DimConstraint) -> LineSpec<'_> {
        LineSpec { dc, dock: false }
    }

    #[test]
    fn test_merge_interleaves() {
        let fss = FlowSizeSpec::merge(
            &[ResizeConstraint::default(), ResizeConstraint::default()],
            &[false, true, false],
            &[[1, 2, 3], [4, 5, 6]],
            &[Some([7, 7, 7]), None, Some([8, 8, 8])],
        );
        assert_eq!(
            fss.sizes,
            vec![[7, 7, 7], [1, 2, 3], [0, 0, 0], [4, 5, 6], [8, 8, 8]]
        );
        assert_eq!(fss.constraints[0], Some(ResizeConstraint::GAP));
        assert_eq!(fss.constraints[1], Some(ResizeConstraint::default()));
        assert_eq!(fss.constraints[2], None);
        assert_eq!(fss.constraints[4], Some(ResizeConstraint::GAP));
        assert_eq!(fss.len(), 5);
    }

    #[test]
    fn test_expand_prefers_last_line() {
        let dc = DimConstraint::default();
        let specs = [line(&dc), line(&dc)];
        let mut fss = FlowSizeSpec::merge(
            &[ResizeConstraint::default(), ResizeConstraint::default()],
            &[false],
            &[[0, 40, INF], [0, 40, INF]],
            &[Some([0, 0, 0]), Some([0, 0, 0]), Some([0, 0, 0])],
        );

        // No grow weights: nothing moves until push weights are allowed.
        assert_eq!(fss.expand_sizes(&specs, None, 120, 1, 3, PREF, 0), 80);
        assert_eq!(fss.expand_sizes(&specs, None, 120, 1, 3, PREF, 1), 120);
        assert_eq!(fss.sizes[1][PREF], 40);
        assert_eq!(fss.sizes[3][PREF], 80);
    }

    #[test]
    fn test_expand_skips_explicit_sizes() {
        let fixed = DimConstraint::default()
            .with_size(BoundSize::preferred_only(UnitValue::px(40.0)))
            .with_grow(Some(100.0));
        let growing = DimConstraint::default().with_grow(Some(100.0));
        let specs = [line(&fixed), line(&growing)];
        let mut fss = FlowSizeSpec::merge(
            &[fixed.resize, growing.resize],
            &[false],
            &[[0, 40, INF], [0, 40, INF]],
            &[None, None, None],
        );
        assert_eq!(fss.expand_sizes(&specs, None, 100, 1, 3, PREF, 0), 100);
        assert_eq!(fss.sizes[1][PREF], 40);
        assert_eq!(fss.sizes[3][PREF], 60);
    }

    #[test]
    fn test_expand_min_raises_pref() {
        let dc = DimConstraint::default().with_grow(Some(100.0));
        let specs = [line(&dc)];
        let mut fss = FlowSizeSpec::merge(&[dc.resize], &[false], &[[10, 20, INF]], &[None, None]);
        assert_eq!(fss.expand_sizes(&specs, None, 50, 1, 1, MIN, 0), 50);
        assert_eq!(fss.sizes[1], [50, 50, INF]);
    }

    #[test]
    fn test_push_slice_skips_docks() {
        let dc = DimConstraint::default();
        let specs = [line(&dc), LineSpec { dc: &dc, dock: true }];
        assert_eq!(push_slice(&specs, None, 1, 3), vec![Some(100.0), None, None]);
        let weights = [None, Some(5.0), None, Some(7.0), None];
        assert_eq!(
            push_slice(&specs, Some(&weights), 1, 3),
            vec![Some(5.0), None, Some(7.0)]
        );
    }
}
