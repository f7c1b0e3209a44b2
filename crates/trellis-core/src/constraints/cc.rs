//! Component constraints.

use crate::constraints::dim::DimConstraint;
use crate::errors::{LayoutError, Result};
use crate::types::{DockSide, HideMode, INF, MAX_GRID};
use crate::units::{BoundSize, UnitValue};

/// Where in the grid a component goes.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPlacement {
    /// Explicit column, or -1 to follow the flow.
    pub cell_x: i32,
    /// Explicit row, or -1 to follow the flow.
    pub cell_y: i32,
    pub span_x: i32,
    pub span_y: i32,
    /// Number of components sharing this cell, this one included.
    pub split: i32,
    /// Cells to skip before placing.
    pub skip: i32,
    /// Flow inside the cell. `None` follows the layout.
    pub flow_x: Option<bool>,
    /// Start a new line before this component, with an optional gap.
    pub newline: Option<BoundSize>,
    /// Start a new line after this component, with an optional gap.
    pub wrap: Option<BoundSize>,
}

impl Default for CellPlacement {
    fn default() -> Self {
        Self {
            cell_x: -1,
            cell_y: -1,
            span_x: 1,
            span_y: 1,
            split: 1,
            skip: 0,
            flow_x: None,
            newline: None,
            wrap: None,
        }
    }
}

impl CellPlacement {
    /// The explicit cell as (column, row), when both coordinates are set.
    pub fn cell(&self) -> Option<(i32, i32)> {
        (self.cell_x >= 0 && self.cell_y >= 0).then_some((self.cell_x, self.cell_y))
    }
}

/// Absolute positioning and padding.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsolutePlacement {
    /// x, y, x2, y2.
    pub pos: Option<[Option<UnitValue>; 4]>,
    /// top, left, bottom, right.
    pub padding: Option<[Option<UnitValue>; 4]>,
    /// Whether a positioned component still takes part in the grid.
    pub bounds_in_grid: bool,
    /// The host manages the bounds; only links are registered.
    pub external: bool,
}

impl Default for AbsolutePlacement {
    fn default() -> Self {
        Self {
            pos: None,
            padding: None,
            bounds_in_grid: true,
            external: false,
        }
    }
}

/// Constraint for one component.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CC {
    pub placement: CellPlacement,
    pub horizontal: DimConstraint,
    pub vertical: DimConstraint,
    pub absolute: AbsolutePlacement,
    pub push_x: Option<f32>,
    pub push_y: Option<f32>,
    pub dock: Option<DockSide>,
    /// Link id, optionally qualified as `group.local`.
    pub id: Option<String>,
    pub tag: Option<String>,
    /// Overrides the layout's hide mode.
    pub hide_mode: Option<HideMode>,
}

fn check_count(n: i32) -> Result<i32> {
    if n < 1 {
        Err(LayoutError::InvalidSpan { span: n })
    } else {
        Ok(n)
    }
}

fn check_cell(col: i32, row: i32) -> Result<()> {
    if !(0..MAX_GRID).contains(&col) || !(0..MAX_GRID).contains(&row) {
        return Err(LayoutError::InvalidCell { row, col });
    }
    Ok(())
}

impl CC {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dim(&self, horizontal: bool) -> &DimConstraint {
        if horizontal {
            &self.horizontal
        } else {
            &self.vertical
        }
    }

    pub fn dim_mut(&mut self, horizontal: bool) -> &mut DimConstraint {
        if horizontal {
            &mut self.horizontal
        } else {
            &mut self.vertical
        }
    }

    pub fn with_horizontal(mut self, dc: DimConstraint) -> Self {
        self.horizontal = dc;
        self
    }

    pub fn with_vertical(mut self, dc: DimConstraint) -> Self {
        self.vertical = dc;
        self
    }

    /// Grow with weight 100 on both axes.
    pub fn grow(self) -> Self {
        self.grow_x(100.0).grow_y(100.0)
    }

    pub fn grow_x(mut self, weight: f32) -> Self {
        self.horizontal.resize.grow = Some(weight);
        self
    }

    pub fn grow_y(mut self, weight: f32) -> Self {
        self.vertical.resize.grow = Some(weight);
        self
    }

    pub fn grow_prio_x(mut self, priority: i32) -> Self {
        self.horizontal.resize.grow_priority = priority;
        self
    }

    pub fn grow_prio_y(mut self, priority: i32) -> Self {
        self.vertical.resize.grow_priority = priority;
        self
    }

    pub fn shrink_x(mut self, weight: Option<f32>) -> Self {
        self.horizontal.resize.shrink = weight;
        self
    }

    pub fn shrink_y(mut self, weight: Option<f32>) -> Self {
        self.vertical.resize.shrink = weight;
        self
    }

    pub fn shrink_prio_x(mut self, priority: i32) -> Self {
        self.horizontal.resize.shrink_priority = priority;
        self
    }

    pub fn shrink_prio_y(mut self, priority: i32) -> Self {
        self.vertical.resize.shrink_priority = priority;
        self
    }

    pub fn width(mut self, size: BoundSize) -> Self {
        self.horizontal.size = size;
        self
    }

    pub fn height(mut self, size: BoundSize) -> Self {
        self.vertical.size = size;
        self
    }

    pub fn size_group_x(mut self, group: impl Into<String>) -> Self {
        self.horizontal.size_group = Some(group.into());
        self
    }

    pub fn size_group_y(mut self, group: impl Into<String>) -> Self {
        self.vertical.size_group = Some(group.into());
        self
    }

    pub fn end_group_x(mut self, group: impl Into<String>) -> Self {
        self.horizontal.end_group = Some(group.into());
        self
    }

    pub fn end_group_y(mut self, group: impl Into<String>) -> Self {
        self.vertical.end_group = Some(group.into());
        self
    }

    pub fn gap_left(mut self, gap: BoundSize) -> Self {
        self.horizontal.gap_before = Some(gap);
        self
    }

    pub fn gap_right(mut self, gap: BoundSize) -> Self {
        self.horizontal.gap_after = Some(gap);
        self
    }

    pub fn gap_top(mut self, gap: BoundSize) -> Self {
        self.vertical.gap_before = Some(gap);
        self
    }

    pub fn gap_bottom(mut self, gap: BoundSize) -> Self {
        self.vertical.gap_after = Some(gap);
        self
    }

    pub fn align_x(mut self, align: UnitValue) -> Self {
        self.horizontal.align = Some(align);
        self
    }

    pub fn align_y(mut self, align: UnitValue) -> Self {
        self.vertical.align = Some(align);
        self
    }

    pub fn span_x(mut self, span: i32) -> Result<Self> {
        self.placement.span_x = check_count(span)?;
        Ok(self)
    }

    pub fn span_y(mut self, span: i32) -> Result<Self> {
        self.placement.span_y = check_count(span)?;
        Ok(self)
    }

    /// No values spans the rest of the line, one sets the x span, two set x and y.
    pub fn span(self, spans: &[i32]) -> Result<Self> {
        match *spans {
            [] => self.span_x(INF),
            [x] => self.span_x(x),
            [x, y] => self.span_x(x)?.span_y(y),
            _ => Err(LayoutError::InvalidConstraint {
                reason: format!("span takes at most 2 values, got {}", spans.len()),
            }),
        }
    }

    /// Column and row, optionally followed by the x and y span.
    pub fn cell(mut self, coords: &[i32]) -> Result<Self> {
        let (col, row, spans) = match *coords {
            [col, row] => (col, row, None),
            [col, row, sx, sy] => (col, row, Some((sx, sy))),
            _ => {
                return Err(LayoutError::InvalidConstraint {
                    reason: format!("cell takes 2 or 4 values, got {}", coords.len()),
                })
            }
        };
        check_cell(col, row)?;
        self.placement.cell_x = col;
        self.placement.cell_y = row;
        match spans {
            Some((sx, sy)) => self.span_x(sx)?.span_y(sy),
            None => Ok(self),
        }
    }

    pub fn split(mut self, count: i32) -> Result<Self> {
        self.placement.split = check_count(count)?;
        Ok(self)
    }

    pub fn skip(mut self, count: i32) -> Result<Self> {
        self.placement.skip = check_count(count)?;
        Ok(self)
    }

    pub fn flow_x(mut self) -> Self {
        self.placement.flow_x = Some(true);
        self
    }

    pub fn flow_y(mut self) -> Self {
        self.placement.flow_x = Some(false);
        self
    }

    pub fn wrap(self) -> Self {
        self.wrap_gap(BoundSize::NULL)
    }

    pub fn wrap_gap(mut self, gap: BoundSize) -> Self {
        self.placement.wrap = Some(gap);
        self
    }

    pub fn newline(self) -> Self {
        self.newline_gap(BoundSize::NULL)
    }

    pub fn newline_gap(mut self, gap: BoundSize) -> Self {
        self.placement.newline = Some(gap);
        self
    }

    pub fn dock(mut self, side: DockSide) -> Self {
        self.dock = Some(side);
        self
    }

    pub fn dock_north(self) -> Self {
        self.dock(DockSide::North)
    }

    pub fn dock_west(self) -> Self {
        self.dock(DockSide::West)
    }

    pub fn dock_south(self) -> Self {
        self.dock(DockSide::South)
    }

    pub fn dock_east(self) -> Self {
        self.dock(DockSide::East)
    }

    /// Dock by side name (`north`, `west`, `south`, `east`).
    pub fn dock_named(self, side: &str) -> Result<Self> {
        let side = match side {
            "north" => DockSide::North,
            "west" => DockSide::West,
            "south" => DockSide::South,
            "east" => DockSide::East,
            other => {
                return Err(LayoutError::InvalidDockSide {
                    side: other.to_owned(),
                })
            }
        };
        Ok(self.dock(side))
    }

    /// Absolute x, y and optionally x2, y2. Takes the component out of the grid.
    pub fn pos(mut self, values: &[UnitValue]) -> Result<Self> {
        let pos = match values {
            [x, y] => [Some(x.clone()), Some(y.clone()), None, None],
            [x, y, x2, y2] => [
                Some(x.clone()),
                Some(y.clone()),
                Some(x2.clone()),
                Some(y2.clone()),
            ],
            _ => {
                return Err(LayoutError::InvalidConstraint {
                    reason: format!("pos takes 2 or 4 values, got {}", values.len()),
                })
            }
        };
        self.absolute.pos = Some(pos);
        self.absolute.bounds_in_grid = false;
        Ok(self)
    }

    fn pos_entry(mut self, ix: usize, value: UnitValue) -> Self {
        let pos = self.absolute.pos.get_or_insert_with(Default::default);
        pos[ix] = Some(value);
        self
    }

    /// Overrides the x of a grid-placed component.
    pub fn x(self, value: UnitValue) -> Self {
        self.pos_entry(0, value.with_horizontal(true))
    }

    pub fn y(self, value: UnitValue) -> Self {
        self.pos_entry(1, value.with_horizontal(false))
    }

    pub fn x2(self, value: UnitValue) -> Self {
        self.pos_entry(2, value.with_horizontal(true))
    }

    pub fn y2(self, value: UnitValue) -> Self {
        self.pos_entry(3, value.with_horizontal(false))
    }

    pub fn external(mut self) -> Self {
        self.absolute.external = true;
        self
    }

    /// One value pads all sides; four pad top, left, bottom, right.
    pub fn pad(mut self, values: &[UnitValue]) -> Result<Self> {
        let padding = match values {
            [all] => [
                Some(all.clone().with_horizontal(false)),
                Some(all.clone().with_horizontal(true)),
                Some(all.clone().with_horizontal(false)),
                Some(all.clone().with_horizontal(true)),
            ],
            [top, left, bottom, right] => [
                Some(top.clone()),
                Some(left.clone()),
                Some(bottom.clone()),
                Some(right.clone()),
            ],
            _ => {
                return Err(LayoutError::InvalidConstraint {
                    reason: format!("pad takes 1 or 4 values, got {}", values.len()),
                })
            }
        };
        self.absolute.padding = Some(padding);
        Ok(self)
    }

    /// Push with weight 100 on both axes.
    pub fn push(self) -> Self {
        self.push_x(100.0).push_y(100.0)
    }

    pub fn push_x(mut self, weight: f32) -> Self {
        self.push_x = Some(weight);
        self
    }

    pub fn push_y(mut self, weight: f32) -> Self {
        self.push_y = Some(weight);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn hide_mode(mut self, mode: HideMode) -> Self {
        self.hide_mode = Some(mode);
        self
    }

    /// Ids of every link target referenced by the position.
    pub fn link_targets(&self) -> Vec<&str> {
        self.absolute
            .pos
            .iter()
            .flatten()
            .flatten()
            .flat_map(UnitValue::link_targets)
            .collect()
    }
}
