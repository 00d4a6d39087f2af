use glam::IVec3;

/// One of the six faces of a block cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFace {
    Top,
    Bottom,
    North,
    South,
    East,
    West,
}

impl BlockFace {
    pub const ALL: [BlockFace; 6] = [
        BlockFace::Top,
        BlockFace::Bottom,
        BlockFace::North,
        BlockFace::South,
        BlockFace::East,
        BlockFace::West,
    ];

    /// Offset to the neighbouring cell this face looks at.
    /// North is -Z, South +Z, East +X, West -X.
    pub fn normal(self) -> IVec3 {
        match self {
            Self::Top => IVec3::Y,
            Self::Bottom => IVec3::NEG_Y,
            Self::North => IVec3::NEG_Z,
            Self::South => IVec3::Z,
            Self::East => IVec3::X,
            Self::West => IVec3::NEG_X,
        }
    }

    pub fn is_side(self) -> bool {
        !matches!(self, Self::Top | Self::Bottom)
    }
}
