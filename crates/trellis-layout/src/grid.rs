//! The grid: places components into cells, sizes rows and columns and
//! commits the resulting bounds.

use std::collections::BTreeSet;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace};
use trellis_constraint::calculate_serial;
use trellis_core::{
    AlignKeyword, BoundSize, ComponentKey, ComponentWrapper, ConstraintMap, ContainerWrapper,
    DimConstraint, DockSide, HideMode, LayoutCallback, LayoutError, MinPrefMax, Result, Side,
    SizeType, UnitValue, AC, CC, INF, LC, MAX_DOCK_GRID, MAX_GRID,
};

use crate::bounds::Bounds;
use crate::cell::{rect_covers, Cell, SpannedRect};
use crate::comp_wrap::CompWrap;
use crate::flow::FlowSizeSpec;
use crate::group::{GroupKind, LinkContext, LinkedDimGroup};

static DOCK: DimConstraint = DimConstraint::DOCK;

/// Outcome of one [`Grid::layout`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutResult {
    /// A component's preferred size depends on the bounds it just got, or a
    /// position refers to the container itself. Lay out once more.
    pub layout_again: bool,
    /// At least one component's bounds differ from what it had before.
    pub changed: bool,
    /// Passes needed to settle absolute positions and links.
    pub link_passes: usize,
    /// The link passes hit their cap without settling.
    pub unstable_links: bool,
}

pub(crate) fn is_dock_index(ix: i32) -> bool {
    !(-MAX_GRID..=MAX_GRID).contains(&ix)
}

pub(crate) fn line_constraint(ac: &AC, ix: i32) -> &DimConstraint {
    if is_dock_index(ix) {
        &DOCK
    } else {
        ac.constraint_or_last(ix)
    }
}

/// Whether a component's push weight takes part in its hide mode.
fn counts_push(hidden: Option<HideMode>) -> bool {
    hidden.map_or(true, |mode| mode <= HideMode::ZeroSize)
}

fn cc_for(ccs: &ConstraintMap, comp: &Rc<dyn ComponentWrapper>) -> CC {
    ccs.get(&ComponentKey::of(comp)).cloned().unwrap_or_default()
}

/// Sparse span: how many occupied lines `span` covers starting at `start`.
fn sparse_span(start: i32, span: i32, indexes: &BTreeSet<i32>) -> i32 {
    let end = start.saturating_add(span);
    1 + indexes.range(start + 1..end).count() as i32
}

/// A laid-out grid for one container.
///
/// Built from the container's children and their constraints. Sizes are
/// computed lazily and cached until [`Grid::invalidate_container_size`].
pub struct Grid {
    pub(crate) container: Rc<dyn ContainerWrapper>,
    pub(crate) lc: LC,
    pub(crate) row_constr: AC,
    pub(crate) col_constr: AC,
    pub(crate) callbacks: Vec<Rc<dyn LayoutCallback>>,
    pub(crate) wraps: Vec<CompWrap>,
    /// Keyed by `(row, col)`.
    pub(crate) cells: IndexMap<(i32, i32), Cell>,
    /// Components positioned outside the grid.
    pub(crate) absolute: Vec<usize>,
    pub(crate) row_indexes: BTreeSet<i32>,
    pub(crate) col_indexes: BTreeSet<i32>,
    /// Gap before a line, set by `wrap` or `newline` with a size.
    pub(crate) wrap_gaps: IndexMap<i32, BoundSize>,
    /// Referenced link ids. `true` marks a group id.
    pub(crate) link_targets: IndexMap<String, bool>,
    pub(crate) col_groups: Vec<Vec<LinkedDimGroup>>,
    pub(crate) row_groups: Vec<Vec<LinkedDimGroup>>,
    pub(crate) col_flow: Option<FlowSizeSpec>,
    pub(crate) row_flow: Option<FlowSizeSpec>,
    pub(crate) width: MinPrefMax,
    pub(crate) height: MinPrefMax,
    pub(crate) push_xs: Option<Vec<Option<f32>>>,
    pub(crate) push_ys: Option<Vec<Option<f32>>>,
    has_push_x: bool,
    has_push_y: bool,
    /// Reference size the cached sizes were computed for.
    last_ref: (i32, i32),
    debug_rects: Vec<Bounds>,
}

impl Grid {
    /// Places every child of `container` into the grid.
    ///
    /// Fails when automatic placement runs past the maximum grid size.
    pub fn new(
        container: Rc<dyn ContainerWrapper>,
        lc: &LC,
        row_constr: &AC,
        col_constr: &AC,
        ccs: &ConstraintMap,
        callbacks: &[Rc<dyn LayoutCallback>],
    ) -> Result<Self> {
        let mut grid = Self {
            container,
            lc: lc.clone(),
            row_constr: row_constr.clone(),
            col_constr: col_constr.clone(),
            callbacks: callbacks.to_vec(),
            wraps: Vec::new(),
            cells: IndexMap::new(),
            absolute: Vec::new(),
            row_indexes: BTreeSet::new(),
            col_indexes: BTreeSet::new(),
            wrap_gaps: IndexMap::new(),
            link_targets: IndexMap::new(),
            col_groups: Vec::new(),
            row_groups: Vec::new(),
            col_flow: None,
            row_flow: None,
            width: [0, 0, INF],
            height: [0, 0, INF],
            push_xs: None,
            push_ys: None,
            has_push_x: false,
            has_push_y: false,
            last_ref: (0, 0),
            debug_rects: Vec::new(),
        };

        grid.place_components(ccs)?;
        grid.calc_cell_gaps();
        grid.ensure_index_sizes(grid.col_constr.len() as i32, grid.row_constr.len() as i32);
        grid.col_groups = grid.divide_into_linked_groups(false);
        grid.row_groups = grid.divide_into_linked_groups(true);
        grid.push_xs = (grid.has_push_x || grid.lc.fill_x).then(|| grid.default_push_weights(false));
        grid.push_ys = (grid.has_push_y || grid.lc.fill_y).then(|| grid.default_push_weights(true));

        debug!(
            components = grid.wraps.len(),
            cells = grid.cells.len(),
            rows = grid.row_indexes.len(),
            cols = grid.col_indexes.len(),
            "grid built"
        );
        Ok(grid)
    }

    fn place_components(&mut self, ccs: &ConstraintMap) -> Result<()> {
        let comps = self.container.components();
        let flow_x = self.lc.flow_x;
        let wrap_after = if self.lc.wrap_after != 0 {
            self.lc.wrap_after
        } else {
            (if flow_x { &self.col_constr } else { &self.row_constr }).len() as i32
        };

        // [col, row]
        let mut cursor = [0i32; 2];
        let mut spanned: Vec<SpannedRect> = Vec::new();
        let mut dock_insets: Option<[i32; 4]> = None;
        let mut hit_end_of_row = false;

        let mut i = 0;
        while i < comps.len() {
            let comp = &comps[i];
            let root_cc = cc_for(ccs, comp);
            self.add_link_ids(&root_cc);
            let hidden = self.hidden_mode(comp.as_ref(), &root_cc);

            if hidden == Some(HideMode::Ignore) {
                let id = link_id(comp.as_ref(), &root_cc);
                self.set_linked_bounds(id, current_bounds(comp.as_ref()), root_cc.absolute.external);
                i += 1;
                continue;
            }

            let absolute = self.position_of(comp.as_ref(), &root_cc).is_some()
                || root_cc.absolute.external;
            if absolute && (!root_cc.absolute.bounds_in_grid || root_cc.absolute.external) {
                let id = link_id(comp.as_ref(), &root_cc);
                let external = root_cc.absolute.external;
                let ix = self.push_wrap(comp, root_cc, hidden);
                self.absolute.push(ix);
                self.set_linked_bounds(id, current_bounds(comp.as_ref()), external);
                i += 1;
                continue;
            }

            if let Some(side) = root_cc.dock {
                let insets = dock_insets.get_or_insert([
                    -MAX_DOCK_GRID,
                    -MAX_DOCK_GRID,
                    MAX_DOCK_GRID,
                    MAX_DOCK_GRID,
                ]);
                let ix = self.push_wrap(comp, root_cc, hidden);
                self.add_docking_cell(insets, side, ix);
                i += 1;
                continue;
            }

            if let Some(gap) = &root_cc.placement.newline {
                self.wrap(&mut cursor, Some(gap));
            } else if hit_end_of_row {
                self.wrap(&mut cursor, None);
            }
            hit_end_of_row = false;

            let line_ac = if flow_x { &self.row_constr } else { &self.col_constr };
            let line_ix = if flow_x { cursor[1] } else { cursor[0] };
            let row_in_grid = !self.lc.no_grid && !line_constraint(line_ac, line_ix).no_grid;

            let placement = &root_cc.placement;
            match placement.cell() {
                Some((cx, cy)) => {
                    cursor = [cx, cy];
                    self.ensure_index_sizes(cx, cy);
                }
                None if row_in_grid && placement.skip == 0 => {
                    while !self.is_cell_free(cursor[1], cursor[0], &spanned) {
                        if self.increase(&mut cursor, 1).abs() >= wrap_after {
                            self.wrap(&mut cursor, None);
                        }
                    }
                }
                None => {}
            }
            for _ in 0..placement.skip {
                loop {
                    if self.increase(&mut cursor, 1).abs() >= wrap_after {
                        self.wrap(&mut cursor, None);
                    }
                    if self.is_cell_free(cursor[1], cursor[0], &spanned) {
                        break;
                    }
                }
            }

            let key = (cursor[1], cursor[0]);
            if !self.cells.contains_key(&key) {
                let span_x = if !row_in_grid && flow_x {
                    INF
                } else {
                    placement.span_x
                }
                .min(MAX_GRID - cursor[0]);
                let span_y = if !row_in_grid && !flow_x {
                    INF
                } else {
                    placement.span_y
                }
                .min(MAX_GRID - cursor[1]);
                let cell_flow = placement.flow_x.unwrap_or(flow_x);
                self.set_cell(key.0, key.1, Cell::new(span_x, span_y, cell_flow))?;
                if span_x > 1 || span_y > 1 {
                    spanned.push([cursor[0], cursor[1], span_x, span_y]);
                }
            }

            let mut wrap_handled = false;
            let mut split_exit = false;
            let mut split_left = if row_in_grid { placement.split - 1 } else { INF };
            let span_rest = (if flow_x { placement.span_x } else { placement.span_y }) == INF;
            let root_ix = i;

            while split_left >= 0 && i < comps.len() {
                let comp_add = &comps[i];
                let is_root = i == root_ix;
                let cc = if is_root {
                    root_cc.clone()
                } else {
                    cc_for(ccs, comp_add)
                };
                if !is_root {
                    self.add_link_ids(&cc);
                }
                let hidden = self.hidden_mode(comp_add.as_ref(), &cc);

                if !is_root {
                    if hidden == Some(HideMode::Ignore) {
                        let id = link_id(comp_add.as_ref(), &cc);
                        self.set_linked_bounds(id, current_bounds(comp_add.as_ref()), false);
                        i += 1;
                        continue;
                    }
                    if cc.placement.newline.is_some()
                        || !cc.absolute.bounds_in_grid
                        || cc.absolute.external
                        || cc.dock.is_some()
                    {
                        break;
                    }
                    if split_left > 0 && cc.placement.skip > 0 {
                        split_exit = true;
                        break;
                    }
                }

                if counts_push(hidden) {
                    self.has_push_x |= cc.push_x.is_some();
                    self.has_push_y |= cc.push_y.is_some();
                }
                let wrap_gap = cc.placement.wrap.clone();
                let ix = self.push_wrap(comp_add, cc, hidden);
                if let Some(cell) = self.cells.get_mut(&key) {
                    cell.wraps.push(ix);
                }
                i += 1;

                if wrap_gap.is_some() || (span_rest && split_left == 0) {
                    match wrap_gap {
                        Some(gap) => self.wrap(&mut cursor, Some(&gap)),
                        None => hit_end_of_row = true,
                    }
                    wrap_handled = true;
                    break;
                }
                split_left -= 1;
            }

            if !wrap_handled && row_in_grid {
                let span = self.cells.get(&key).map_or(1, |c| c.span(flow_x));
                let pos = if flow_x { cursor[0] } else { cursor[1] };
                if pos.abs() + span >= wrap_after {
                    hit_end_of_row = true;
                } else {
                    self.increase(&mut cursor, if split_exit { span - 1 } else { span });
                }
            }
        }
        Ok(())
    }

    fn push_wrap(&mut self, comp: &Rc<dyn ComponentWrapper>, cc: CC, hidden: Option<HideMode>) -> usize {
        self.wraps.push(CompWrap::new(
            Rc::clone(comp),
            cc,
            hidden,
            self.lc.visual_padding,
        ));
        self.wraps.len() - 1
    }

    fn hidden_mode(&self, comp: &dyn ComponentWrapper, cc: &CC) -> Option<HideMode> {
        if comp.is_visible() {
            None
        } else {
            Some(cc.hide_mode.unwrap_or(self.lc.hide_mode))
        }
    }

    fn add_link_ids(&mut self, cc: &CC) {
        for target in cc.link_targets() {
            if !self.link_targets.contains_key(target) {
                self.link_targets.insert(target.to_owned(), false);
            }
        }
    }

    fn is_cell_free(&self, row: i32, col: i32, spanned: &[SpannedRect]) -> bool {
        !self.cells.contains_key(&(row, col)) && !spanned.iter().any(|r| rect_covers(r, row, col))
    }

    /// Moves the cursor along the flow and returns the new position on that axis.
    fn increase(&self, cursor: &mut [i32; 2], count: i32) -> i32 {
        let axis = if self.lc.flow_x { 0 } else { 1 };
        cursor[axis] += count;
        cursor[axis]
    }

    fn wrap(&mut self, cursor: &mut [i32; 2], gap: Option<&BoundSize>) {
        let line = if self.lc.flow_x {
            cursor[0] = 0;
            cursor[1] += 1;
            cursor[1]
        } else {
            cursor[0] += 1;
            cursor[1] = 0;
            cursor[0]
        };
        if let Some(gap) = gap.filter(|g| !g.is_unset()) {
            self.wrap_gaps.insert(line, gap.clone());
        }
        // Keep the line so a gap before an empty last line survives.
        if self.lc.flow_x {
            self.row_indexes.insert(line);
        } else {
            self.col_indexes.insert(line);
        }
    }

    fn set_cell(&mut self, row: i32, col: i32, cell: Cell) -> Result<()> {
        if !(0..=MAX_GRID).contains(&row) || !(0..=MAX_GRID).contains(&col) {
            return Err(LayoutError::InvalidCell { row, col });
        }
        self.row_indexes.insert(row);
        self.col_indexes.insert(col);
        self.cells.insert((row, col), cell);
        Ok(())
    }

    /// `insets` are the next free dock lines: top, left, bottom, right.
    fn add_docking_cell(&mut self, insets: &mut [i32; 4], side: DockSide, wrap: usize) {
        let (row, col, span_x, span_y);
        match side {
            DockSide::North | DockSide::South => {
                row = if side == DockSide::North {
                    insets[0] += 1;
                    insets[0] - 1
                } else {
                    insets[2] -= 1;
                    insets[2] + 1
                };
                col = insets[1];
                span_x = insets[3] - insets[1] + 1;
                span_y = 1;
                self.col_indexes.insert(insets[3]);
            }
            DockSide::West | DockSide::East => {
                col = if side == DockSide::West {
                    insets[1] += 1;
                    insets[1] - 1
                } else {
                    insets[3] -= 1;
                    insets[3] + 1
                };
                row = insets[0];
                span_x = 1;
                span_y = insets[2] - insets[0] + 1;
                self.row_indexes.insert(insets[2]);
            }
        }
        trace!(?side, row, col, "docked component");
        self.row_indexes.insert(row);
        self.col_indexes.insert(col);
        self.cells
            .insert((row, col), Cell::with_wrap(wrap, span_x, span_y, span_x > 1));
    }

    fn ensure_index_sizes(&mut self, cols: i32, rows: i32) {
        self.col_indexes.extend(0..cols);
        self.row_indexes.extend(0..rows);
    }

    /// Resolves the gaps between neighbours inside every cell.
    fn calc_cell_gaps(&mut self) {
        let container = Rc::clone(&self.container);
        let wraps = &mut self.wraps;
        for cell in self.cells.values() {
            let flow_x = cell.flow_x;
            for (i, &ix) in cell.wraps.iter().enumerate() {
                let before = i.checked_sub(1).map(|p| {
                    let cw = &wraps[cell.wraps[p]];
                    (Rc::clone(&cw.comp), cw.cc.dim(flow_x).gap_after.clone())
                });
                let after = cell.wraps.get(i + 1).map(|&n| {
                    let cw = &wraps[n];
                    (Rc::clone(&cw.comp), cw.cc.dim(flow_x).gap_before.clone())
                });
                wraps[ix].calc_gaps(
                    container.as_ref(),
                    before.as_ref().map(|(c, g)| (c.as_ref(), g.as_ref())),
                    after.as_ref().map(|(c, g)| (c.as_ref(), g.as_ref())),
                    flow_x,
                );
            }
        }
    }

    pub(crate) fn is_ltr(&self) -> bool {
        self.lc
            .left_to_right
            .unwrap_or_else(|| self.container.is_left_to_right())
    }

    pub(crate) fn has_docks(&self) -> bool {
        let outside = |set: &BTreeSet<i32>| {
            set.first().is_some_and(|&i| i < -MAX_GRID) || set.last().is_some_and(|&i| i > MAX_GRID)
        };
        outside(&self.row_indexes) || outside(&self.col_indexes)
    }

    /// Inset on `side`: the layout's own, the platform's when `platform_default`,
    /// else zero.
    pub(crate) fn inset(&self, side: Side, platform_default: bool) -> UnitValue {
        match &self.lc.insets {
            Some(insets) => insets[side.index()].clone(),
            None if platform_default => trellis_core::PlatformDefaults::current()
                .panel_inset(side)
                .clone(),
            None => UnitValue::ZERO,
        }
    }

    fn divide_into_linked_groups(&self, is_rows: bool) -> Vec<Vec<LinkedDimGroup>> {
        let from_end = !(if is_rows {
            self.lc.top_to_bottom
        } else {
            self.is_ltr()
        });
        let (prim, sec, ac) = if is_rows {
            (&self.row_indexes, &self.col_indexes, &self.row_constr)
        } else {
            (&self.col_indexes, &self.row_indexes, &self.col_constr)
        };

        let mut lists = Vec::with_capacity(prim.len());
        for &i in prim {
            let dc = line_constraint(ac, i);
            let row_baseline = is_rows
                && self.lc.top_to_bottom
                && dc.align_or_default(false).is_keyword(AlignKeyword::Baseline);
            let mut groups: Vec<LinkedDimGroup> = Vec::new();

            for &j in sec {
                let key = if is_rows { (i, j) } else { (j, i) };
                let Some(cell) = self.cells.get(&key) else {
                    continue;
                };
                if cell.wraps.is_empty() {
                    continue;
                }

                let mut span = cell.span(!is_rows);
                if span > 1 {
                    span = sparse_span(i, span, prim);
                }
                let parallel = cell.flow_x == is_rows;

                if (!parallel && cell.wraps.len() > 1) || span > 1 {
                    let kind = if parallel {
                        GroupKind::Parallel
                    } else {
                        GroupKind::Serial
                    };
                    let mut group = LinkedDimGroup::new(None, span, kind, !is_rows, from_end);
                    group.wraps.extend(cell.wraps.iter().copied());
                    groups.push(group);
                    continue;
                }

                for &ix in &cell.wraps {
                    let baseline = is_rows && self.wraps[ix].is_baseline_align(row_baseline);
                    let context = if baseline {
                        LinkContext::Baseline
                    } else {
                        LinkContext::Shared
                    };
                    match groups.iter_mut().find(|g| g.context == Some(context)) {
                        Some(group) => group.wraps.push(ix),
                        None => {
                            let kind = if baseline {
                                GroupKind::Baseline
                            } else {
                                GroupKind::Parallel
                            };
                            let mut group =
                                LinkedDimGroup::new(Some(context), 1, kind, !is_rows, from_end);
                            group.wraps.push(ix);
                            groups.push(group);
                        }
                    }
                }
            }
            lists.push(groups);
        }
        lists
    }

    /// Push weights per flat gap/line entry. The strongest push in a line
    /// wins. Without any push every entry gets the default weight.
    fn default_push_weights(&self, is_rows: bool) -> Vec<Option<f32>> {
        let lines = if is_rows {
            &self.row_groups
        } else {
            &self.col_groups
        };
        let mut weights: Option<Vec<Option<f32>>> = None;
        for (i, groups) in lines.iter().enumerate() {
            let mut line_weight: Option<f32> = None;
            for &ix in groups.iter().flat_map(|g| g.wraps.iter()) {
                let cw = &self.wraps[ix];
                let push = if counts_push(cw.hidden) {
                    if is_rows {
                        cw.cc.push_y
                    } else {
                        cw.cc.push_x
                    }
                } else {
                    None
                };
                if line_weight.is_none() || push.zip(line_weight).is_some_and(|(p, l)| p > l) {
                    line_weight = push;
                }
            }
            if let Some(weight) = line_weight {
                weights.get_or_insert_with(|| vec![None; (lines.len() << 1) + 1])[(i << 1) + 1] =
                    Some(weight);
            }
        }
        weights.unwrap_or_else(|| vec![Some(trellis_core::constraints::WEIGHT_100)])
    }

    /// Computes sizes unless they are cached for this reference size. A
    /// zero reference accepts whatever is cached.
    pub(crate) fn check_size_calcs(&mut self, ref_width: i32, ref_height: i32) {
        let stale = (ref_width > 0 && ref_width != self.last_ref.0)
            || (ref_height > 0 && ref_height != self.last_ref.1);
        if self.col_flow.is_none() || self.row_flow.is_none() || stale {
            self.calc_grid_sizes(ref_width, ref_height);
            self.last_ref = (ref_width, ref_height);
        }
    }

    /// Min, preferred and max width of the whole grid, insets included.
    pub fn width(&mut self) -> MinPrefMax {
        self.check_size_calcs(0, 0);
        self.width
    }

    /// Min, preferred and max height of the whole grid, insets included.
    pub fn height(&mut self) -> MinPrefMax {
        self.check_size_calcs(0, 0);
        self.height
    }

    /// Drops cached sizes so the next query or layout measures again.
    pub fn invalidate_container_size(&mut self) {
        self.col_flow = None;
        self.row_flow = None;
        self.last_ref = (0, 0);
    }

    /// Lays the grid out in `bounds` and hands every component its bounds.
    ///
    /// `align_x` and `align_y` place the grid when it is smaller than
    /// `bounds`; `None` uses the layout's own alignment.
    ///
    /// With `check_only` nothing is written to the components; the result
    /// still reports whether anything would change. With `debug` the cell
    /// rectangles are recorded and painted.
    pub fn layout(
        &mut self,
        bounds: Bounds,
        align_x: Option<&UnitValue>,
        align_y: Option<&UnitValue>,
        debug: bool,
        check_only: bool,
    ) -> LayoutResult {
        self.debug_rects.clear();
        self.check_size_calcs(bounds.width, bounds.height);
        let align_x = align_x.or(self.lc.align_x.as_ref()).cloned();
        let align_y = align_y.or(self.lc.align_y.as_ref()).cloned();
        let result = self.layout_pass(bounds, align_x.as_ref(), align_y.as_ref(), check_only);

        if debug {
            self.collect_debug_rects(bounds);
            if !check_only {
                self.paint_debug();
            }
        }
        debug!(
            x = bounds.x,
            y = bounds.y,
            width = bounds.width,
            height = bounds.height,
            changed = result.changed,
            layout_again = result.layout_again,
            link_passes = result.link_passes,
            "grid laid out"
        );
        result
    }

    pub(crate) fn layout_pass(
        &mut self,
        bounds: Bounds,
        align_x: Option<&UnitValue>,
        align_y: Option<&UnitValue>,
        check_only: bool,
    ) -> LayoutResult {
        self.reset_link_values(Some((bounds.width, bounds.height)), true);
        self.layout_in_one_dim(bounds.width, align_x, false);
        self.layout_in_one_dim(bounds.height, align_y, true);

        let mut result = LayoutResult::default();
        if self.wraps.is_empty() {
            return result;
        }

        let (passes, unstable) = self.resolve_absolute(bounds);
        result.link_passes = passes;
        result.unstable_links = unstable;
        self.apply_end_groups();

        for cw in &mut self.wraps {
            cw.x += bounds.x;
            cw.y += bounds.y;
        }
        for cw in &self.wraps {
            result.changed |= cw.differs_from_component();
            if !check_only {
                result.layout_again |= cw.transfer_bounds();
                for callback in &self.callbacks {
                    callback.correct_bounds(cw.comp.as_ref());
                }
            }
        }
        if self.link_targets.contains_key("visual") || self.link_targets.contains_key("container") {
            result.layout_again = true;
        }
        result
    }

    fn layout_in_one_dim(&mut self, ref_size: i32, align: Option<&UnitValue>, is_rows: bool) {
        let from_end = !(if is_rows {
            self.lc.top_to_bottom
        } else {
            self.is_ltr()
        });
        let (flow, push) = if is_rows {
            (&self.row_flow, &self.push_ys)
        } else {
            (&self.col_flow, &self.push_xs)
        };
        let Some(flow) = flow else { return };
        let sizes = calculate_serial(
            &flow.optional_sizes(),
            &flow.constraints,
            push.as_deref(),
            SizeType::Pref,
            ref_size,
        );

        let container = Rc::clone(&self.container);
        let mut pos = align.map_or(0, |a| {
            a.pixels(
                (ref_size - trellis_constraint::sum(&sizes)) as f32,
                Some(container.as_ref()),
                None,
            )
        });
        if from_end {
            pos = ref_size - pos;
        }

        let (indexes, ac, lines) = if is_rows {
            (&self.row_indexes, &self.row_constr, &mut self.row_groups)
        } else {
            (&self.col_indexes, &self.col_constr, &mut self.col_groups)
        };
        let wraps = &mut self.wraps;
        for ((i, groups), &line_ix) in lines.iter_mut().enumerate().zip(indexes.iter()) {
            let b = i << 1;
            pos += if from_end { -sizes[b] } else { sizes[b] };
            let dc = line_constraint(ac, line_ix);
            let line_size = sizes[b + 1];
            for group in groups.iter_mut() {
                let group_size = if group.span > 1 {
                    let len = (((group.span as usize) << 1) - 1).min(sizes.len() - b - 1);
                    trellis_constraint::sum(&sizes[b + 1..b + 1 + len])
                } else {
                    line_size
                };
                group.layout(wraps.as_mut_slice(), dc, pos, group_size, container.as_ref());
            }
            pos += if from_end { -line_size } else { line_size };
        }
    }

    fn apply_end_groups(&mut self) {
        let mut ends_x: IndexMap<String, i32> = IndexMap::new();
        let mut ends_y: IndexMap<String, i32> = IndexMap::new();
        for cw in &self.wraps {
            if let Some(group) = &cw.cc.horizontal.end_group {
                let end = ends_x.entry(group.clone()).or_insert(i32::MIN);
                *end = (*end).max(cw.x + cw.w);
            }
            if let Some(group) = &cw.cc.vertical.end_group {
                let end = ends_y.entry(group.clone()).or_insert(i32::MIN);
                *end = (*end).max(cw.y + cw.h);
            }
        }
        if ends_x.is_empty() && ends_y.is_empty() {
            return;
        }
        for cw in &mut self.wraps {
            let end_x = cw.cc.horizontal.end_group.as_ref().and_then(|g| ends_x.get(g)).copied();
            if let Some(end) = end_x {
                cw.w = end - cw.x;
            }
            let end_y = cw.cc.vertical.end_group.as_ref().and_then(|g| ends_y.get(g)).copied();
            if let Some(end) = end_y {
                cw.h = end - cw.y;
            }
        }
    }

    fn group_containing(lines: &[Vec<LinkedDimGroup>], ix: usize) -> Option<&LinkedDimGroup> {
        lines
            .iter()
            .flatten()
            .find(|g| g.wraps.contains(&ix))
    }

    fn collect_debug_rects(&mut self, bounds: Bounds) {
        let mut rects = Vec::new();
        for &ix in self.cells.values().flat_map(|c| c.wraps.iter()) {
            let h = Self::group_containing(&self.col_groups, ix);
            let v = Self::group_containing(&self.row_groups, ix);
            if let (Some(h), Some(v)) = (h, v) {
                let x = h.start - if h.from_end { h.size } else { 0 };
                let y = v.start - if v.from_end { v.size } else { 0 };
                let rect = Bounds::new(bounds.x + x, bounds.y + y, h.size, v.size);
                if !rects.contains(&rect) {
                    rects.push(rect);
                }
            }
        }
        self.debug_rects = rects;
    }

    /// Paints the recorded cell rectangles and every component's outline.
    pub fn paint_debug(&self) {
        for r in &self.debug_rects {
            self.container.paint_debug_cell(r.x, r.y, r.width, r.height);
        }
        for &ix in self.cells.values().flat_map(|c| c.wraps.iter()) {
            self.wraps[ix].comp.paint_debug_outline(self.lc.visual_padding);
        }
    }

    /// Occupied row indexes in ascending order, dock rows included.
    pub fn row_indexes(&self) -> impl Iterator<Item = i32> + '_ {
        self.row_indexes.iter().copied()
    }

    /// Occupied column indexes in ascending order, dock columns included.
    pub fn col_indexes(&self) -> impl Iterator<Item = i32> + '_ {
        self.col_indexes.iter().copied()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// `(col, row)` of the cell holding `comp`.
    pub fn cell_of(&self, comp: &Rc<dyn ComponentWrapper>) -> Option<(i32, i32)> {
        let key = ComponentKey::of(comp);
        self.cells.iter().find_map(|(&(row, col), cell)| {
            cell.wraps
                .iter()
                .any(|&ix| ComponentKey::of(&self.wraps[ix].comp) == key)
                .then_some((col, row))
        })
    }

    /// Cell rectangles recorded by the last debug layout.
    pub fn debug_rects(&self) -> &[Bounds] {
        &self.debug_rects
    }

    /// Link ids referenced by any component's position.
    pub fn link_target_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.link_targets.keys().map(String::as_str)
    }
}

pub(crate) fn link_id(comp: &dyn ComponentWrapper, cc: &CC) -> Option<String> {
    cc.id.clone().or_else(|| comp.link_id())
}

pub(crate) fn current_bounds(comp: &dyn ComponentWrapper) -> Bounds {
    Bounds::new(comp.x(), comp.y(), comp.width(), comp.height())
}
