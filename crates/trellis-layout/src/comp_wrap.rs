//! A component bound to its constraint and its computed sizes.

use std::rc::Rc;

use trellis_constraint::{constrain_size, correct_min_max};
use trellis_core::{
    BoundSize, ComponentWrapper, ContainerWrapper, ContentBias, HideMode, MinPrefMax, Side,
    SizeType, CC, INF, MAX, MIN, NOT_SET, PREF,
};

use crate::bounds::Bounds;

/// Neighbour of a component inside a cell, with the gap it asks for on the shared side.
pub(crate) type Neighbour<'a> = (&'a dyn ComponentWrapper, Option<&'a BoundSize>);

pub(crate) struct CompWrap {
    pub(crate) comp: Rc<dyn ComponentWrapper>,
    pub(crate) cc: CC,
    /// Hide mode in effect when the component is invisible.
    pub(crate) hidden: Option<HideMode>,
    use_visual_padding: bool,
    horizontal: MinPrefMax,
    vertical: MinPrefMax,
    /// top, left, bottom, right.
    gaps: [Option<MinPrefMax>; 4],
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) w: i32,
    pub(crate) h: i32,
}

impl CompWrap {
    pub(crate) fn new(
        comp: Rc<dyn ComponentWrapper>,
        cc: CC,
        hidden: Option<HideMode>,
        use_visual_padding: bool,
    ) -> Self {
        Self {
            comp,
            cc,
            hidden,
            use_visual_padding,
            horizontal: [0, 0, INF],
            vertical: [0, 0, INF],
            gaps: [None; 4],
            x: 0,
            y: 0,
            w: 0,
            h: 0,
        }
    }

    fn zero_size(&self) -> bool {
        matches!(
            self.hidden,
            Some(HideMode::ZeroSize | HideMode::ZeroSizeNoGaps)
        )
    }

    /// Re-reads min/preferred/max from the constraint, callback or component.
    pub(crate) fn validate(
        &mut self,
        container: &dyn ContainerWrapper,
        callback_size: Option<[Option<BoundSize>; 2]>,
    ) {
        if self.zero_size() {
            self.horizontal = [0; 3];
            self.vertical = [0; 3];
            return;
        }

        let bias = self.comp.content_bias();
        let hint = match bias {
            ContentBias::None => -1,
            ContentBias::Horizontal if self.w != 0 => self.w,
            ContentBias::Horizontal => self.comp.width(),
            ContentBias::Vertical if self.h != 0 => self.h,
            ContentBias::Vertical => self.comp.height(),
        };

        let [h_callback, v_callback] = callback_size.unwrap_or_default();
        let h_size = h_callback.unwrap_or_else(|| self.cc.horizontal.size.clone());
        let v_size = v_callback.unwrap_or_else(|| self.cc.vertical.size.clone());

        let mut hor = [0; 3];
        let mut ver = [0; 3];
        for slot in [SizeType::Min, SizeType::Pref, SizeType::Max] {
            let i = slot.index();
            match bias {
                ContentBias::None => {
                    hor[i] = self.size_for(&h_size, slot, true, -1, container);
                    ver[i] = self.size_for(&v_size, slot, false, -1, container);
                }
                ContentBias::Horizontal => {
                    hor[i] = self.size_for(&h_size, slot, true, -1, container);
                    let hint = if hint > 0 { hint } else { hor[i] };
                    ver[i] = self.size_for(&v_size, slot, false, hint, container);
                }
                ContentBias::Vertical => {
                    ver[i] = self.size_for(&v_size, slot, false, -1, container);
                    let hint = if hint > 0 { hint } else { ver[i] };
                    hor[i] = self.size_for(&h_size, slot, true, hint, container);
                }
            }
        }
        correct_min_max(&mut hor);
        correct_min_max(&mut ver);
        self.horizontal = hor;
        self.vertical = ver;
    }

    fn size_for(
        &self,
        size: &BoundSize,
        slot: SizeType,
        horizontal: bool,
        hint: i32,
        container: &dyn ContainerWrapper,
    ) -> i32 {
        if let Some(uv) = size.size(slot) {
            let reference = if horizontal {
                container.width()
            } else {
                container.height()
            };
            return uv.pixels(reference as f32, Some(container), Some(self.comp.as_ref()));
        }

        let comp = self.comp.as_ref();
        let mut px = match (slot, horizontal) {
            (SizeType::Min, true) => comp.minimum_width(hint),
            (SizeType::Min, false) => comp.minimum_height(hint),
            (SizeType::Pref, true) => comp.preferred_width(hint),
            (SizeType::Pref, false) => comp.preferred_height(hint),
            (SizeType::Max, true) => comp.maximum_width(hint),
            (SizeType::Max, false) => comp.maximum_height(hint),
        };
        if self.use_visual_padding {
            if let Some([top, left, bottom, right]) = comp.visual_padding() {
                px -= if horizontal { left + right } else { top + bottom };
            }
        }
        px
    }

    pub(crate) fn sizes(&self, horizontal: bool) -> &MinPrefMax {
        if horizontal {
            &self.horizontal
        } else {
            &self.vertical
        }
    }

    /// Overrides sizes, used to even out size groups.
    pub(crate) fn set_sizes(&mut self, sizes: MinPrefMax, horizontal: bool) {
        if horizontal {
            self.horizontal = sizes;
        } else {
            self.vertical = sizes;
        }
    }

    /// One size slot with unset values mapped to 0 (or [`INF`] for max).
    pub(crate) fn size(&self, slot: usize, horizontal: bool) -> i32 {
        filter(slot, self.sizes(horizontal)[slot])
    }

    pub(crate) fn gaps(&self, horizontal: bool, before: bool) -> Option<MinPrefMax> {
        let side = match (horizontal, before) {
            (true, true) => Side::Left,
            (true, false) => Side::Right,
            (false, true) => Side::Top,
            (false, false) => Side::Bottom,
        };
        self.gaps[side.index()]
    }

    pub(crate) fn gap_size(&self, slot: usize, horizontal: bool, before: bool) -> i32 {
        self.gaps(horizontal, before)
            .map_or(0, |g| if g[slot] == NOT_SET { 0 } else { g[slot] })
    }

    pub(crate) fn size_incl_gaps(&self, slot: usize, horizontal: bool) -> i32 {
        filter(
            slot,
            self.gap_size(slot, horizontal, true)
                + self.size(slot, horizontal)
                + self.gap_size(slot, horizontal, false),
        )
    }

    pub(crate) fn is_push_gap(&self, horizontal: bool, before: bool) -> bool {
        let dc = self.cc.dim(horizontal);
        if before {
            dc.is_gap_before_push()
        } else {
            dc.is_gap_after_push()
        }
    }

    /// Baseline for the sizes in `slot`, or 0 when the component reports none.
    pub(crate) fn baseline(&self, slot: usize) -> i32 {
        self.comp
            .baseline(self.size(slot, true), self.size(slot, false))
            .unwrap_or(0)
    }

    /// Whether this component lines up on the row's baseline.
    pub(crate) fn is_baseline_align(&self, default: bool) -> bool {
        if self.cc.vertical.resize.grow.is_some_and(|g| g as i32 != 0) {
            return false;
        }
        let baseline = match &self.cc.vertical.align {
            Some(align) => align.is_keyword(trellis_core::AlignKeyword::Baseline),
            None => default,
        };
        baseline && self.comp.has_baseline()
    }

    /// Resolves the gaps towards the neighbours in the same cell.
    pub(crate) fn calc_gaps(
        &mut self,
        container: &dyn ContainerWrapper,
        before: Option<Neighbour<'_>>,
        after: Option<Neighbour<'_>>,
        flow_x: bool,
    ) {
        self.gaps = [None; 4];
        if self.hidden == Some(HideMode::ZeroSizeNoGaps) {
            return;
        }

        let par_w = container.width() as f32;
        let par_h = container.height() as f32;
        let (bef_comp, bef_gap) = before.map_or((None, None), |(c, g)| (Some(c), g));
        let (aft_comp, aft_gap) = after.map_or((None, None), |(c, g)| (Some(c), g));
        let comp = Rc::clone(&self.comp);
        let comp = comp.as_ref();

        let resolved = [
            (
                Side::Top,
                self.cc.vertical.component_gaps(
                    container,
                    comp,
                    bef_gap,
                    if flow_x { None } else { bef_comp },
                    par_h,
                    Side::Top,
                ),
            ),
            (
                Side::Left,
                self.cc.horizontal.component_gaps(
                    container,
                    comp,
                    bef_gap,
                    if flow_x { bef_comp } else { None },
                    par_w,
                    Side::Left,
                ),
            ),
            (
                Side::Bottom,
                self.cc.vertical.component_gaps(
                    container,
                    comp,
                    aft_gap,
                    if flow_x { None } else { aft_comp },
                    par_h,
                    Side::Bottom,
                ),
            ),
            (
                Side::Right,
                self.cc.horizontal.component_gaps(
                    container,
                    comp,
                    aft_gap,
                    if flow_x { aft_comp } else { None },
                    par_w,
                    Side::Right,
                ),
            ),
        ];
        for (side, sizes) in resolved {
            self.merge_gap_sizes(sizes, side);
        }
    }

    fn merge_gap_sizes(&mut self, sizes: Option<MinPrefMax>, side: Side) {
        let Some(sizes) = sizes else { return };
        let gap = self.gaps[side.index()].get_or_insert([0, 0, INF]);
        gap[MIN] = sizes[MIN].max(gap[MIN]);
        gap[PREF] = sizes[PREF].max(gap[PREF]);
        gap[MAX] = sizes[MAX].min(gap[MAX]);
    }

    pub(crate) fn set_dim_bounds(&mut self, start: i32, size: i32, horizontal: bool) {
        if horizontal {
            self.x = start;
            self.w = size;
        } else {
            self.y = start;
            self.h = size;
        }
    }

    pub(crate) fn dim_bounds(&self) -> [i32; 4] {
        [self.x, self.y, self.w, self.h]
    }

    pub(crate) fn restore(&mut self, [x, y, w, h]: [i32; 4]) {
        self.x = x;
        self.y = y;
        self.w = w;
        self.h = h;
    }

    /// Bounds as they will be handed to the component, visual padding included.
    pub(crate) fn committed_bounds(&self) -> Bounds {
        let mut b = Bounds::new(self.x, self.y, self.w, self.h);
        if self.use_visual_padding {
            if let Some([top, left, bottom, right]) = self.comp.visual_padding() {
                b.x -= left;
                b.y -= top;
                b.width += left + right;
                b.height += top + bottom;
            }
        }
        b
    }

    /// Whether committing would move or resize the component.
    pub(crate) fn differs_from_component(&self) -> bool {
        if self.cc.absolute.external {
            return false;
        }
        let b = self.committed_bounds();
        let c = self.comp.as_ref();
        b != Bounds::new(c.x(), c.y(), c.width(), c.height())
    }

    /// Hands the bounds to the component. Returns true when a width-dependent
    /// preferred height no longer matches and another layout is needed.
    pub(crate) fn transfer_bounds(&self) -> bool {
        if self.cc.absolute.external {
            return false;
        }
        let b = self.committed_bounds();
        self.comp.set_bounds(b.x, b.y, b.width, b.height);

        self.comp.content_bias() == ContentBias::Horizontal
            && self.w != self.horizontal[PREF]
            && self.cc.vertical.size.preferred().is_none()
            && self.comp.preferred_height(self.w) != self.vertical[PREF]
    }
}

fn filter(slot: usize, size: i32) -> i32 {
    if size == NOT_SET {
        if slot == MAX {
            INF
        } else {
            0
        }
    } else {
        constrain_size(size)
    }
}
