//! Row and column sizes: per-line totals, gaps, spanning components and the
//! grid's own min/preferred/max.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;
use trellis_constraint::{correct_min_max, merge_sizes};
use trellis_core::{
    BoundSize, MinPrefMax, PlatformDefaults, ResizeConstraint, Side, SizeType, UnitKind, INF, MAX, MIN, NOT_SET,
    PREF,
};

use crate::bounds::Bounds;
use crate::comp_wrap::CompWrap;
use crate::flow::{FlowSizeSpec, LineSpec};
use crate::grid::{is_dock_index, line_constraint, Grid};
use crate::group::LinkedDimGroup;

/// Largest size of the single-line groups in one line.
fn total_groups_size_parallel(groups: &[LinkedDimGroup], wraps: &[CompWrap], slot: usize) -> i32 {
    let mut size = if slot == MAX { INF } else { 0 };
    for group in groups.iter().filter(|g| g.span == 1) {
        let group_size = group.min_pref_max(wraps)[slot];
        if group_size >= INF {
            return INF;
        }
        if (slot == MAX && group_size < size) || (slot != MAX && group_size > size) {
            size = group_size;
        }
    }
    trellis_constraint::constrain_size(size)
}

impl Grid {
    /// Re-measures components and recomputes every row and column.
    pub(crate) fn calc_grid_sizes(&mut self, ref_width: i32, ref_height: i32) {
        self.validate_sizes();

        self.col_flow = Some(self.calc_rows_or_cols_sizes(true, ref_width));
        self.row_flow = Some(self.calc_rows_or_cols_sizes(false, ref_height));
        self.width = self.min_pref_max_sum(true);
        self.height = self.min_pref_max_sum(false);

        if self.link_targets.is_empty() {
            self.reset_link_values(None, true);
        } else {
            // Absolute positions may depend on the links a layout publishes.
            self.layout_pass(Bounds::default(), None, None, true);
            self.reset_link_values(None, false);
        }

        self.adjust_size_for_absolute(true);
        self.adjust_size_for_absolute(false);
        trace!(width = ?self.width, height = ?self.height, "grid sizes computed");
    }

    fn validate_sizes(&mut self) {
        let container = Rc::clone(&self.container);
        for cw in &mut self.wraps {
            let callback_size = self
                .callbacks
                .iter()
                .find_map(|cb| cb.size(cw.comp.as_ref()));
            cw.validate(container.as_ref(), callback_size);
        }
        self.apply_size_groups(true);
        self.apply_size_groups(false);
    }

    /// Every component in a size group gets the largest sizes of the group.
    fn apply_size_groups(&mut self, horizontal: bool) {
        let mut groups: IndexMap<String, MinPrefMax> = IndexMap::new();
        for cw in &self.wraps {
            if let Some(name) = &cw.cc.dim(horizontal).size_group {
                let merged = merge_sizes(groups.get(name).copied(), Some(*cw.sizes(horizontal)), true);
                if let Some(merged) = merged {
                    groups.insert(name.clone(), merged);
                }
            }
        }
        if groups.is_empty() {
            return;
        }
        for cw in &mut self.wraps {
            let sizes = cw
                .cc
                .dim(horizontal)
                .size_group
                .as_ref()
                .and_then(|name| groups.get(name))
                .copied();
            if let Some(sizes) = sizes {
                cw.set_sizes(sizes, horizontal);
            }
        }
    }

    /// Flat gap/line sizes for one axis at reference length `ref_size`.
    pub(crate) fn calc_rows_or_cols_sizes(&self, is_hor: bool, ref_size: i32) -> FlowSizeSpec {
        let (indexes, ac, lines) = if is_hor {
            (&self.col_indexes, &self.col_constr, &self.col_groups)
        } else {
            (&self.row_indexes, &self.row_constr, &self.row_groups)
        };
        let container = self.container.as_ref();
        let lc_size = if is_hor { &self.lc.width } else { &self.lc.height };
        let ref_size = if lc_size.is_unset() {
            ref_size
        } else {
            lc_size.constrain(ref_size, self.parent_size(is_hor) as f32, container)
        };

        let specs: Vec<LineSpec<'_>> = indexes
            .iter()
            .map(|&ix| LineSpec {
                dc: line_constraint(ac, ix),
                dock: is_dock_index(ix),
            })
            .collect();

        let mut line_sizes = Vec::with_capacity(specs.len());
        let mut size_groups: IndexMap<&str, MinPrefMax> = IndexMap::new();
        for (spec, groups) in specs.iter().zip(lines) {
            let mut group_sizes = [
                total_groups_size_parallel(groups, &self.wraps, MIN),
                total_groups_size_parallel(groups, &self.wraps, PREF),
                INF,
            ];
            correct_min_max(&mut group_sizes);

            let mut sizes = [0; 3];
            for slot in [SizeType::Min, SizeType::Pref, SizeType::Max] {
                let i = slot.index();
                sizes[i] = match spec.dc.size.size(slot).map(|uv| (uv, uv.kind())) {
                    Some((_, UnitKind::Component(SizeType::Min))) => group_sizes[MIN],
                    Some((_, UnitKind::Component(SizeType::Pref))) => group_sizes[PREF],
                    Some((_, UnitKind::Component(SizeType::Max))) => group_sizes[MAX],
                    Some((uv, _)) => uv.pixels(ref_size as f32, Some(container), None),
                    None => group_sizes[i],
                };
            }
            correct_min_max(&mut sizes);
            if let Some(name) = &spec.dc.size_group {
                let merged = merge_sizes(size_groups.get(name.as_str()).copied(), Some(sizes), true);
                if let Some(merged) = merged {
                    size_groups.insert(name, merged);
                }
            }
            line_sizes.push(sizes);
        }
        for (sizes, spec) in line_sizes.iter_mut().zip(&specs) {
            if let Some(merged) = spec.dc.size_group.as_deref().and_then(|n| size_groups.get(n)) {
                *sizes = *merged;
            }
        }

        let constraints: Vec<ResizeConstraint> = specs.iter().map(|s| s.dc.resize).collect();
        let (gaps, gap_push) = self.row_gaps(&specs, &indexes.iter().copied().collect::<Vec<_>>(), ref_size, is_hor);
        let mut flow = FlowSizeSpec::merge(&constraints, &gap_push, &line_sizes, &gaps);

        let push = if is_hor { &self.push_xs } else { &self.push_ys };
        self.adjust_min_pref_for_spanning(&specs, push.as_deref(), &mut flow, lines);
        flow
    }

    /// Gaps before, between and after the lines, plus which of them push.
    fn row_gaps(
        &self,
        specs: &[LineSpec<'_>],
        indexes: &[i32],
        ref_size: i32,
        is_hor: bool,
    ) -> (Vec<Option<MinPrefMax>>, Vec<bool>) {
        let container = self.container.as_ref();
        let lc_gap = if is_hor {
            &self.lc.grid_gap_x
        } else {
            &self.lc.grid_gap_y
        };
        let default_gap = lc_gap.clone().unwrap_or_else(|| {
            let platform = PlatformDefaults::current();
            if is_hor {
                platform.grid_gap_x
            } else {
                platform.grid_gap_y
            }
        });
        let default_sizes = default_gap.pixel_sizes(ref_size as f32, Some(container), None);

        let platform_insets = !self.has_docks();
        let first_inset = self
            .inset(Side::leading(is_hor), platform_insets)
            .pixels(ref_size as f32, Some(container), None);
        let last_inset = self
            .inset(Side::trailing(is_hor), platform_insets)
            .pixels(ref_size as f32, Some(container), None);
        let use_wrap_gaps = is_hor != self.lc.flow_x;

        let mut gaps = vec![None; specs.len() + 1];
        let mut push = vec![false; specs.len() + 1];
        for i in 0..=specs.len() {
            let before = i.checked_sub(1).map(|b| &specs[b]).filter(|s| !s.dock);
            let after = specs.get(i).filter(|s| !s.dock);
            if before.is_none() && after.is_none() {
                continue;
            }

            let wrap_gap: Option<&BoundSize> = if use_wrap_gaps {
                indexes.get(i).and_then(|ix| self.wrap_gaps.get(ix))
            } else {
                None
            };
            if let Some(gap) = wrap_gap {
                gaps[i] = Some(if gap.is_unset() {
                    default_sizes
                } else {
                    gap.pixel_sizes(ref_size as f32, Some(container), None)
                });
                push[i] = gap.is_gap_push();
                continue;
            }

            let gap_before = before.and_then(|s| s.dc.row_gaps(container, ref_size as f32, false));
            let gap_after = after.and_then(|s| s.dc.row_gaps(container, ref_size as f32, true));
            gaps[i] = Some(if before.is_none() && gap_after.is_none() {
                [first_inset; 3]
            } else if after.is_none() && gap_before.is_none() {
                [last_inset; 3]
            } else {
                merge_sizes(gap_after, gap_before, true).unwrap_or(default_sizes)
            });
            push[i] = before.is_some_and(|s| s.dc.is_gap_after_push())
                || after.is_some_and(|s| s.dc.is_gap_before_push());
        }
        (gaps, push)
    }

    /// Widens spanned lines until every spanning component fits, last
    /// lines first.
    fn adjust_min_pref_for_spanning(
        &self,
        specs: &[LineSpec<'_>],
        default_push: Option<&[Option<f32>]>,
        flow: &mut FlowSizeSpec,
        lines: &[Vec<LinkedDimGroup>],
    ) {
        for (r, groups) in lines.iter().enumerate().rev() {
            for group in groups.iter().filter(|g| g.span > 1) {
                let sizes = group.min_pref_max(&self.wraps);
                for slot in [MIN, PREF] {
                    let required = sizes[slot];
                    if required == NOT_SET {
                        continue;
                    }
                    let from = (r << 1) + 1;
                    let len = ((group.span as usize) << 1).min(flow.len() - from) - 1;
                    let current: i32 = flow.sizes[from..from + len]
                        .iter()
                        .map(|s| s[slot])
                        .filter(|&s| s != NOT_SET)
                        .sum();
                    if current >= required || len == 0 {
                        continue;
                    }
                    let mut total = 0;
                    let mut eagerness = 0;
                    while eagerness < 4 && total < required {
                        total = flow.expand_sizes(specs, default_push, required, from, len, slot, eagerness);
                        eagerness += 1;
                    }
                    trace!(line = r, span = group.span, required, total, "spanning component reconciled");
                }
            }
        }
    }

    /// Sum of the flat sizes, or the layout's explicit width or height.
    fn min_pref_max_sum(&self, is_hor: bool) -> MinPrefMax {
        let Some(flow) = (if is_hor { &self.col_flow } else { &self.row_flow }) else {
            return [0, 0, INF];
        };
        let lc_size = if is_hor { &self.lc.width } else { &self.lc.height };
        let mut out = [0; 3];
        for (i, size) in flow.sizes.iter().enumerate() {
            for slot in [SizeType::Min, SizeType::Pref, SizeType::Max] {
                let s = slot.index();
                if let Some(uv) = lc_size.size(slot) {
                    if i == 0 {
                        out[s] = uv.pixels(
                            self.parent_size(is_hor) as f32,
                            Some(self.container.as_ref()),
                            None,
                        );
                    }
                    continue;
                }
                let mut v = size[s];
                if v != NOT_SET {
                    if s == PREF {
                        if size[MAX] != NOT_SET && size[MAX] < v {
                            v = size[MAX];
                        }
                        v = v.max(size[MIN]);
                    }
                    out[s] = out[s].saturating_add(v);
                }
                if size[MAX] == NOT_SET || out[MAX] > INF {
                    out[MAX] = INF;
                }
            }
        }
        correct_min_max(&mut out);
        out
    }

    /// Reference length for the layout's own width or height.
    pub(crate) fn parent_size(&self, is_hor: bool) -> i32 {
        if is_hor {
            self.container.width()
        } else {
            self.container.height()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use trellis_core::{BoundSize, DimConstraint, UnitValue, AC, CC, INF, LC};

    use crate::test_utils::{grid, tight_lc, TestComponent, TestContainer};

    #[test]
    fn test_line_sizes_take_largest_component() {
        let container = Rc::new(TestContainer::new(400, 300));
        let a = TestComponent::new(10, 40, 10, 20);
        let b = TestComponent::new(20, 30, 10, 25);
        let mut grid = grid(
            &container,
            &tight_lc(),
            &AC::new(),
            &AC::new(),
            &[(a, CC::new().wrap()), (b, CC::new())],
        );
        assert_eq!(grid.width(), [20, 40, INF]);
        assert_eq!(grid.height(), [20, 45, INF]);
    }

    #[test]
    fn test_explicit_column_size() {
        let container = Rc::new(TestContainer::new(400, 300));
        let cols = AC::from_constraints(vec![
            DimConstraint::new().with_size(BoundSize::fixed(UnitValue::px(70.0)))
        ]);
        let mut grid = grid(
            &container,
            &tight_lc(),
            &AC::new(),
            &cols,
            &[(TestComponent::new(10, 40, 10, 20), CC::new())],
        );
        assert_eq!(grid.width(), [70, 70, 70]);
    }

    #[test]
    fn test_size_groups_share_sizes() {
        let container = Rc::new(TestContainer::new(400, 300));
        let mut grid = grid(
            &container,
            &tight_lc(),
            &AC::new(),
            &AC::new(),
            &[
                (TestComponent::new(10, 40, 10, 20), CC::new().size_group_x("buttons")),
                (TestComponent::new(10, 90, 10, 20), CC::new().size_group_x("buttons")),
            ],
        );
        assert_eq!(grid.width()[1], 180);
    }

    #[test]
    fn test_row_size_groups() {
        let container = Rc::new(TestContainer::new(400, 300));
        let rows = AC::new().size_group("rows").index(1).size_group("rows");
        let mut grid = grid(
            &container,
            &tight_lc(),
            &rows,
            &AC::new(),
            &[
                (TestComponent::new(10, 40, 10, 20), CC::new().wrap()),
                (TestComponent::new(10, 40, 10, 35), CC::new()),
            ],
        );
        assert_eq!(grid.height()[1], 70);
    }

    #[test]
    fn test_insets_and_grid_gap() {
        let container = Rc::new(TestContainer::new(400, 300));
        let lc = LC::new()
            .insets_all(UnitValue::px(5.0))
            .grid_gap_x(BoundSize::gap(UnitValue::px(10.0)));
        let mut grid = grid(
            &container,
            &lc,
            &AC::new(),
            &AC::new(),
            &[
                (TestComponent::new(0, 40, 0, 20), CC::new()),
                (TestComponent::new(0, 40, 0, 20), CC::new()),
            ],
        );
        assert_eq!(grid.width()[1], 5 + 40 + 10 + 40 + 5);
    }

    #[test]
    fn test_wrap_gap_between_rows() {
        let container = Rc::new(TestContainer::new(400, 300));
        let mut grid = grid(
            &container,
            &tight_lc(),
            &AC::new(),
            &AC::new(),
            &[
                (TestComponent::new(0, 40, 0, 20), CC::new().wrap_gap(BoundSize::fixed(UnitValue::px(15.0)))),
                (TestComponent::new(0, 40, 0, 20), CC::new()),
            ],
        );
        assert_eq!(grid.height()[1], 20 + 15 + 20);
    }

    #[test]
    fn test_explicit_layout_width() {
        let container = Rc::new(TestContainer::new(400, 300));
        let lc = tight_lc().width(BoundSize::fixed(UnitValue::px(250.0)));
        let mut grid = grid(
            &container,
            &lc,
            &AC::new(),
            &AC::new(),
            &[(TestComponent::new(0, 40, 0, 20), CC::new())],
        );
        assert_eq!(grid.width(), [250, 250, 250]);
    }
}
