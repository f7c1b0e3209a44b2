//! Process-wide layout defaults.
//!
//! Gaps, insets and alignment defaults that constraints fall back to when
//! they leave a value unset. The active set is global; read a snapshot with
//! [`PlatformDefaults::current`] and replace it with [`PlatformDefaults::set`].

use std::sync::{OnceLock, PoisonError, RwLock};

use crate::component::{ComponentWrapper, ContainerWrapper};
use crate::types::{HideMode, Side};
use crate::units::{BoundSize, UnitValue};

/// Default gaps, insets and alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformDefaults {
    pub related_gap_x: UnitValue,
    pub related_gap_y: UnitValue,
    pub unrelated_gap_x: UnitValue,
    pub unrelated_gap_y: UnitValue,
    pub paragraph_gap_x: UnitValue,
    pub paragraph_gap_y: UnitValue,
    pub indent_gap_x: UnitValue,
    pub indent_gap_y: UnitValue,
    /// Gap between grid cells when the layout specifies none.
    pub grid_gap_x: BoundSize,
    pub grid_gap_y: BoundSize,
    /// Container insets as top, left, bottom, right.
    pub panel_insets: [UnitValue; 4],
    /// Where labels sit in their cell, 0.0 leading to 1.0 trailing.
    pub label_align_percentage: f32,
    /// Rows align on baseline unless told otherwise.
    pub default_row_alignment_baseline: bool,
    /// DPI at which one logical pixel is one pixel.
    pub dpi_base: f32,
    pub hide_mode: HideMode,
}

impl Default for PlatformDefaults {
    fn default() -> Self {
        Self {
            related_gap_x: UnitValue::lpx(4.0),
            related_gap_y: UnitValue::lpy(4.0),
            unrelated_gap_x: UnitValue::lpx(7.0),
            unrelated_gap_y: UnitValue::lpy(9.0),
            paragraph_gap_x: UnitValue::lpx(14.0),
            paragraph_gap_y: UnitValue::lpy(14.0),
            indent_gap_x: UnitValue::lpx(9.0),
            indent_gap_y: UnitValue::lpy(9.0),
            grid_gap_x: BoundSize::gap(UnitValue::lpx(4.0)),
            grid_gap_y: BoundSize::gap(UnitValue::lpy(4.0)),
            panel_insets: [
                UnitValue::lpy(7.0),
                UnitValue::lpx(7.0),
                UnitValue::lpy(7.0),
                UnitValue::lpx(7.0),
            ],
            label_align_percentage: 0.0,
            default_row_alignment_baseline: true,
            dpi_base: 96.0,
            hide_mode: HideMode::Normal,
        }
    }
}

fn global() -> &'static RwLock<PlatformDefaults> {
    static DEFAULTS: OnceLock<RwLock<PlatformDefaults>> = OnceLock::new();
    DEFAULTS.get_or_init(|| RwLock::new(PlatformDefaults::default()))
}

impl PlatformDefaults {
    /// Snapshot of the active defaults.
    pub fn current() -> PlatformDefaults {
        global().read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(defaults: PlatformDefaults) {
        *global().write().unwrap_or_else(PoisonError::into_inner) = defaults;
    }

    /// Edits the active defaults in place.
    pub fn update(f: impl FnOnce(&mut PlatformDefaults)) {
        f(&mut global().write().unwrap_or_else(PoisonError::into_inner));
    }

    pub fn reset() {
        Self::set(PlatformDefaults::default());
    }

    pub fn with_related_gap(mut self, x: UnitValue, y: UnitValue) -> Self {
        self.related_gap_x = x;
        self.related_gap_y = y;
        self
    }

    pub fn with_unrelated_gap(mut self, x: UnitValue, y: UnitValue) -> Self {
        self.unrelated_gap_x = x;
        self.unrelated_gap_y = y;
        self
    }

    pub fn with_grid_gap(mut self, x: BoundSize, y: BoundSize) -> Self {
        self.grid_gap_x = x;
        self.grid_gap_y = y;
        self
    }

    pub fn with_panel_insets(mut self, insets: [UnitValue; 4]) -> Self {
        self.panel_insets = insets;
        self
    }

    pub fn panel_inset(&self, side: Side) -> &UnitValue {
        &self.panel_insets[side.index()]
    }

    fn gap_for_unit(&self, unit: &str, horizontal: bool) -> Option<&UnitValue> {
        let (x, y) = match unit {
            "r" | "rel" | "related" => (&self.related_gap_x, &self.related_gap_y),
            "u" | "unrel" | "unrelated" => (&self.unrelated_gap_x, &self.unrelated_gap_y),
            "p" | "para" | "paragraph" => (&self.paragraph_gap_x, &self.paragraph_gap_y),
            "i" | "ind" | "indent" => (&self.indent_gap_x, &self.indent_gap_y),
            _ => return None,
        };
        Some(if horizontal { x } else { y })
    }

    pub fn knows_unit(&self, unit: &str) -> bool {
        self.gap_for_unit(unit, true).is_some()
    }

    /// Resolves a named gap unit, scaled by `value`.
    pub fn convert_to_pixels(
        &self,
        value: f32,
        unit: &str,
        horizontal: bool,
        ref_value: f32,
        container: &dyn ContainerWrapper,
        comp: Option<&dyn ComponentWrapper>,
    ) -> Option<f32> {
        self.gap_for_unit(unit, horizontal)
            .map(|gap| gap.pixels_exact(ref_value, Some(container), comp) * value)
    }

    /// Gap between two components in one cell. `None` when there is no neighbour.
    pub fn default_component_gap(
        &self,
        adjacent: Option<&dyn ComponentWrapper>,
        horizontal: bool,
    ) -> Option<BoundSize> {
        adjacent?;
        let gap = if horizontal {
            &self.related_gap_x
        } else {
            &self.related_gap_y
        };
        Some(BoundSize::gap(gap.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let d = PlatformDefaults::default();
        assert_eq!(d.related_gap_x, UnitValue::lpx(4.0));
        assert_eq!(d.unrelated_gap_y, UnitValue::lpy(9.0));
        assert_eq!(d.panel_insets.len(), 4);
        assert!(d.default_row_alignment_baseline);
        assert!((d.dpi_base - 96.0).abs() < 0.001);
    }

    #[test]
    fn test_unit_names() {
        let d = PlatformDefaults::default();
        assert!(d.knows_unit("r"));
        assert!(d.knows_unit("paragraph"));
        assert!(!d.knows_unit("em"));
        assert_eq!(d.gap_for_unit("u", false), Some(&UnitValue::lpy(9.0)));
    }

    #[test]
    fn test_default_component_gap_needs_neighbour() {
        let d = PlatformDefaults::default();
        assert_eq!(d.default_component_gap(None, true), None);
    }

    #[test]
    fn test_builders() {
        let d = PlatformDefaults::default()
            .with_related_gap(UnitValue::px(2.0), UnitValue::px(3.0))
            .with_panel_insets([UnitValue::ZERO, UnitValue::ZERO, UnitValue::ZERO, UnitValue::ZERO]);
        assert_eq!(d.related_gap_y, UnitValue::px(3.0));
        assert_eq!(d.panel_inset(Side::Left), &UnitValue::ZERO);
    }
}
