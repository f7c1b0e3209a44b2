//! Shared scalar types and sentinel values.

/// Stand-in for "infinite" sizes. Small enough that sums of a few of them
/// never overflow an `i32`.
pub const INF: i32 = 2_097_051;

/// Marks a size slot that carries no value.
pub const NOT_SET: i32 = -2_147_471_302;

/// Highest cell index usable for ordinary (non-dock) cells.
pub const MAX_GRID: i32 = 30_000;

/// Cell index bound reserved for dock rows and columns.
pub const MAX_DOCK_GRID: i32 = 32_767;

/// A `[min, preferred, max]` size triple in pixels. Unset slots hold [`NOT_SET`].
pub type MinPrefMax = [i32; 3];

/// Selects one slot of a [`MinPrefMax`] triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeType {
    Min,
    Pref,
    Max,
}

impl SizeType {
    /// Index of this slot in a [`MinPrefMax`] triple.
    pub const fn index(self) -> usize {
        match self {
            SizeType::Min => 0,
            SizeType::Pref => 1,
            SizeType::Max => 2,
        }
    }
}

/// Index of the minimum slot.
pub const MIN: usize = 0;
/// Index of the preferred slot.
pub const PREF: usize = 1;
/// Index of the maximum slot.
pub const MAX: usize = 2;

/// How an invisible component takes part in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum HideMode {
    /// Hidden components are laid out as if visible.
    #[default]
    Normal,
    /// Sizes become zero, gaps are kept.
    ZeroSize,
    /// Sizes and gaps become zero.
    ZeroSizeNoGaps,
    /// The component takes no part in the grid at all.
    Ignore,
}

/// Which dimension a component's size depends on, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentBias {
    #[default]
    None,
    /// Height depends on the assigned width.
    Horizontal,
    /// Width depends on the assigned height.
    Vertical,
}

/// Container edge a docked component is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockSide {
    North,
    West,
    South,
    East,
}

/// Edges in the order used for insets, gaps and padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Left,
    Bottom,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Left, Side::Bottom, Side::Right];

    pub const fn index(self) -> usize {
        match self {
            Side::Top => 0,
            Side::Left => 1,
            Side::Bottom => 2,
            Side::Right => 3,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    /// The leading edge along one axis.
    pub const fn leading(horizontal: bool) -> Side {
        if horizontal {
            Side::Left
        } else {
            Side::Top
        }
    }

    /// The trailing edge along one axis.
    pub const fn trailing(horizontal: bool) -> Side {
        if horizontal {
            Side::Right
        } else {
            Side::Bottom
        }
    }
}

/// Rounds half up, the way sizes are snapped to whole pixels everywhere.
pub fn round_px(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}
