//! Tile and agent value types.

/// Opaque identity of an agent, used for tile occupancy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u64);

/// The navigating agent as seen by the searches.
///
/// `movement_speed` is not used for routing itself; it is part of the agent
/// contract so that hosts can turn a tile path into timed motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agent {
    pub id: AgentId,
    /// Maximum slope (height difference per tile of travel) the agent can walk.
    pub max_walkable_steepness: f32,
    /// Tiles per second, consumed by the agent-behaviour layer.
    pub movement_speed: f32,
}

impl Agent {
    pub fn new(id: AgentId, max_walkable_steepness: f32, movement_speed: f32) -> Self {
        Self {
            id,
            max_walkable_steepness,
            movement_speed,
        }
    }
}

/// One cell of the world grid.
///
/// A copy handed out by [`TileView`](crate::TileView) queries; the search
/// algorithms never hold references into world storage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    /// Terrain height at the tile centre.
    pub height: f32,
    max_steepness: f32,
    blocks: bool,
    occupant: Option<AgentId>,
}

impl Tile {
    /// Create a walkable, unoccupied tile.
    pub const fn new(height: f32, max_steepness: f32) -> Self {
        Self {
            height,
            max_steepness,
            blocks: false,
            occupant: None,
        }
    }

    /// Steepest slope within the tile itself.
    #[inline]
    pub const fn max_steepness(self) -> f32 {
        self.max_steepness
    }

    /// Whether a static object on the tile blocks movement.
    #[inline]
    pub const fn blocks_movement(self) -> bool {
        self.blocks
    }

    /// The agent currently standing on the tile, if any.
    #[inline]
    pub const fn occupant(self) -> Option<AgentId> {
        self.occupant
    }

    /// Same tile with a movement-blocking object on it.
    #[inline]
    pub const fn with_blocking(mut self, blocks: bool) -> Self {
        self.blocks = blocks;
        self
    }

    /// Same tile with the given occupant.
    #[inline]
    pub const fn with_occupant(mut self, occupant: Option<AgentId>) -> Self {
        self.occupant = occupant;
        self
    }
}
