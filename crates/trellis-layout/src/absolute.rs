//! Absolute positions, padding and the bounds published for links.
//!
//! Positions may refer to other components' bounds through the link
//! registry, so they are resolved by repeated passes until no published
//! link value changes.

use indexmap::IndexMap;
use tracing::{trace, warn};
use trellis_core::{
    ComponentWrapper, LinkHandler, Side, UnitKind, UnitValue, CC, MAX, MIN, PREF,
};

use crate::bounds::Bounds;
use crate::comp_wrap::CompWrap;
use crate::grid::{link_id, Grid};

impl Grid {
    /// `pos` of a component, with callback positions overriding single entries.
    pub(crate) fn position_of(
        &self,
        comp: &dyn ComponentWrapper,
        cc: &CC,
    ) -> Option<[Option<UnitValue>; 4]> {
        let mut pos = cc.absolute.pos.clone();
        for callback in &self.callbacks {
            let Some(overrides) = callback.position(comp) else {
                continue;
            };
            let merged = pos.get_or_insert_with(Default::default);
            for (slot, value) in merged.iter_mut().zip(overrides) {
                if value.is_some() {
                    *slot = value;
                }
            }
        }
        pos
    }

    /// Start and size of `cw` along one axis after `pos` and padding, or
    /// `None` when neither applies.
    fn absolute_dim_bounds(&self, cw: &CompWrap, ref_size: i32, is_hor: bool) -> Option<(i32, i32)> {
        if cw.cc.absolute.external {
            let c = cw.comp.as_ref();
            return Some(if is_hor {
                (c.x(), c.width())
            } else {
                (c.y(), c.height())
            });
        }

        let pad = cw.cc.absolute.padding.as_ref();
        let pos = self.position_of(cw.comp.as_ref(), &cw.cc);
        if pos.is_none() && pad.is_none() {
            return None;
        }

        let container = Some(self.container.as_ref());
        let comp = Some(cw.comp.as_ref());
        let mut start = if is_hor { cw.x } else { cw.y };
        let mut size = if is_hor { cw.w } else { cw.h };

        if let Some(pos) = &pos {
            let (start_uv, end_uv) = if is_hor {
                (&pos[0], &pos[2])
            } else {
                (&pos[1], &pos[3])
            };
            if start_uv.is_some() || end_uv.is_some() {
                let min = cw.size(MIN, is_hor);
                let max = cw.size(MAX, is_hor);
                let clamp = |s: i32| s.max(min).min(max);
                size = clamp(cw.size(PREF, is_hor));

                if let Some(uv) = start_uv {
                    let reference = if matches!(uv.kind(), UnitKind::VisualAlign) {
                        size
                    } else {
                        ref_size
                    };
                    start = uv.pixels(reference as f32, container, comp);
                }
                if let Some(uv) = end_uv {
                    let end = uv.pixels(ref_size as f32, container, comp);
                    if start_uv.is_some() {
                        size = clamp(end - start);
                    } else {
                        start = end - size;
                    }
                }
            }
        }

        if let Some(pad) = pad {
            let (lead, trail) = if is_hor {
                (&pad[Side::Left.index()], &pad[Side::Right.index()])
            } else {
                (&pad[Side::Top.index()], &pad[Side::Bottom.index()])
            };
            let resolve = |uv: &Option<UnitValue>| {
                uv.as_ref()
                    .map_or(0, |uv| uv.pixels(ref_size as f32, container, comp))
            };
            let lead = resolve(lead);
            start += lead;
            size += resolve(trail) - lead;
        }
        Some((start, size))
    }

    /// Applies `pos` and padding to one component and publishes its bounds.
    fn do_absolute_corrections(
        &self,
        ix: usize,
        wraps: &mut [CompWrap],
        bounds: Bounds,
        groups: &mut IndexMap<String, Bounds>,
    ) -> bool {
        if let Some((x, w)) = self.absolute_dim_bounds(&wraps[ix], bounds.width, true) {
            wraps[ix].set_dim_bounds(x, w, true);
        }
        if let Some((y, h)) = self.absolute_dim_bounds(&wraps[ix], bounds.height, false) {
            wraps[ix].set_dim_bounds(y, h, false);
        }
        if self.link_targets.is_empty() {
            return false;
        }

        let cw = &wraps[ix];
        let Some(id) = link_id(cw.comp.as_ref(), &cw.cc) else {
            return false;
        };
        let b = Bounds::new(cw.x, cw.y, cw.w, cw.h);
        let (group, local) = match id.split_once('.') {
            Some((group, local)) => (Some(group), local),
            None => (None, id.as_str()),
        };
        let mut changed = false;
        if self.link_targets.contains_key(local) {
            changed = self.publish(local, b, true);
        }
        if let Some(group) = group.filter(|g| self.link_targets.contains_key(*g)) {
            let union = groups.entry(group.to_owned()).or_insert(b);
            *union = union.union(&b);
        }
        changed
    }

    fn publish(&self, key: &str, b: Bounds, temporary: bool) -> bool {
        LinkHandler::set_bounds(
            self.container.layout_token(),
            key,
            b.x,
            b.y,
            b.width,
            b.height,
            temporary,
            false,
        )
    }

    /// Runs correction passes over every component until the published
    /// link values settle. Returns the pass count and whether the cap was hit.
    pub(crate) fn resolve_absolute(&mut self, bounds: Bounds) -> (usize, bool) {
        let mut wraps = std::mem::take(&mut self.wraps);
        for &ix in &self.absolute {
            if !wraps[ix].cc.absolute.external {
                wraps[ix].restore([0; 4]);
            }
        }
        let snapshot: Vec<[i32; 4]> = wraps.iter().map(CompWrap::dim_bounds).collect();
        let cap = (self.container.component_count() << 3) + 10;

        let mut passes = 0;
        let mut unstable = false;
        loop {
            passes += 1;
            for (cw, &dims) in wraps.iter_mut().zip(&snapshot) {
                cw.restore(dims);
            }
            let mut groups = IndexMap::new();
            let mut changed = false;
            for ix in 0..wraps.len() {
                changed |= self.do_absolute_corrections(ix, &mut wraps, bounds, &mut groups);
            }
            for (group, b) in &groups {
                self.link_targets.insert(group.clone(), true);
                changed |= self.publish(group, *b, true);
            }

            if !changed {
                break;
            }
            if passes >= cap {
                warn!(
                    components = wraps.len(),
                    passes, "unstable cyclic dependency in absolute linked values"
                );
                unstable = true;
                break;
            }
        }
        self.wraps = wraps;
        trace!(passes, "absolute positions resolved");
        (passes, unstable)
    }

    /// Registers a component's bounds under its link id (and its group's id)
    /// when something refers to it. External bounds are committed, the rest
    /// are temporary.
    pub(crate) fn set_linked_bounds(&mut self, id: Option<String>, b: Bounds, external: bool) -> bool {
        let Some(id) = id else { return false };
        let (group, local) = match id.split_once('.') {
            Some((group, local)) => (Some(group), local),
            None => (None, id.as_str()),
        };
        let mut changed = false;
        if external || self.link_targets.contains_key(local) {
            changed = self.publish(local, b, !external);
        }
        if let Some(group) = group {
            if external || self.link_targets.contains_key(group) {
                self.link_targets.insert(group.to_owned(), true);
                changed |= LinkHandler::set_bounds(
                    self.container.layout_token(),
                    group,
                    b.x,
                    b.y,
                    b.width,
                    b.height,
                    !external,
                    true,
                );
            }
        }
        changed
    }

    /// Publishes `container` and `visual` (the container minus insets) as
    /// temporary links. `size` is the laid-out area; `None` publishes an
    /// empty one. With `clear` every temporary link is dropped first.
    pub(crate) fn reset_link_values(&self, size: Option<(i32, i32)>, clear: bool) {
        let token = self.container.layout_token();
        if clear {
            LinkHandler::clear_temporary_bounds(token);
        }
        let (width, height) = size.unwrap_or((0, 0));
        let platform_insets = !self.has_docks();
        let container = Some(self.container.as_ref());
        let inset = |side: Side| self.inset(side, platform_insets).pixels(0.0, container, None);
        let (left, top) = (inset(Side::Left), inset(Side::Top));
        let visual_w = width - left - inset(Side::Right);
        let visual_h = height - top - inset(Side::Bottom);
        LinkHandler::set_bounds(token, "visual", left, top, visual_w, visual_h, true, false);
        LinkHandler::set_bounds(token, "container", 0, 0, width, height, true, false);
    }

    /// Raises min and preferred so every absolute component fits, trailing
    /// inset included.
    pub(crate) fn adjust_size_for_absolute(&mut self, is_hor: bool) {
        if self.absolute.is_empty() {
            return;
        }
        let max_end = self
            .absolute
            .iter()
            .filter_map(|&ix| self.absolute_dim_bounds(&self.wraps[ix], 0, is_hor))
            .map(|(start, size)| start + size)
            .max()
            .unwrap_or(0);
        let trailing = self
            .inset(Side::trailing(is_hor), !self.has_docks())
            .pixels(0.0, Some(self.container.as_ref()), None);
        let end = max_end + trailing;

        let sizes = if is_hor {
            &mut self.width
        } else {
            &mut self.height
        };
        sizes[MIN] = sizes[MIN].max(end);
        sizes[PREF] = sizes[PREF].max(end);
    }
}
