//! The world query interface and a bounded in-memory implementation.

use crate::coord::TileCoord;
use crate::tile::{AgentId, Tile};

/// Read access to the tile world.
///
/// This is the only seam between the navigation core and the world systems
/// (terrain generation, chunk streaming, occupancy tracking). Implementations
/// return `None` for tiles that do not exist — out of world bounds, or in a
/// chunk that has not been loaded yet; the searches treat such tiles as
/// unwalkable.
///
/// Searches read heights, steepness and occupancy repeatedly over the course
/// of one call and assume the answers stay consistent; the caller must not
/// mutate tile state concurrently with a running search.
pub trait TileView {
    /// The tile at `coord`, or `None` if it does not exist.
    fn tile(&self, coord: TileCoord) -> Option<Tile>;

    /// The tile one step from `from` in the direction of `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is not one of the eight unit directions.
    fn relative_tile(&self, from: TileCoord, offset: TileCoord) -> Option<Tile> {
        assert!(
            offset.is_unit_offset(),
            "relative offset {offset} is not a unit direction",
        );
        self.tile(from + offset)
    }
}

impl<V: TileView + ?Sized> TileView for &V {
    fn tile(&self, coord: TileCoord) -> Option<Tile> {
        (**self).tile(coord)
    }
}

/// A bounded in-memory tile store.
///
/// Suitable for tests and for hosts that keep their loaded world in one
/// rectangle anchored at the origin. Tiles outside the bounds do not exist.
#[derive(Debug, Clone)]
pub struct TileMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Create a map of flat, walkable, unoccupied tiles.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "map dimensions must be positive");
        Self {
            width,
            height,
            tiles: vec![Tile::default(); (width * height) as usize],
        }
    }

    /// Width in tiles.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether `coord` is inside the map.
    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    fn idx(&self, coord: TileCoord) -> Option<usize> {
        self.contains(coord)
            .then(|| (coord.y * self.width + coord.x) as usize)
    }

    fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        let i = self.idx(coord)?;
        Some(&mut self.tiles[i])
    }

    /// Set the terrain height of a tile. Out-of-bounds coordinates are ignored.
    pub fn set_height(&mut self, coord: TileCoord, height: f32) {
        if let Some(t) = self.tile_mut(coord) {
            t.height = height;
        }
    }

    /// Set the tile's own steepness. Out-of-bounds coordinates are ignored.
    pub fn set_steepness(&mut self, coord: TileCoord, steepness: f32) {
        if let Some(t) = self.tile_mut(coord) {
            *t = Tile::new(t.height, steepness)
                .with_blocking(t.blocks_movement())
                .with_occupant(t.occupant());
        }
    }

    /// Place or remove a movement-blocking object.
    pub fn set_blocking(&mut self, coord: TileCoord, blocks: bool) {
        if let Some(t) = self.tile_mut(coord) {
            *t = t.with_blocking(blocks);
        }
    }

    /// Place or clear an occupant.
    pub fn set_occupant(&mut self, coord: TileCoord, occupant: Option<AgentId>) {
        if let Some(t) = self.tile_mut(coord) {
            *t = t.with_occupant(occupant);
        }
    }
}

impl TileView for TileMap {
    fn tile(&self, coord: TileCoord) -> Option<Tile> {
        self.idx(coord).map(|i| self.tiles[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_bounds() {
        let map = TileMap::new(4, 3);
        assert!(map.contains(TileCoord::new(0, 0)));
        assert!(map.contains(TileCoord::new(3, 2)));
        assert!(!map.contains(TileCoord::new(4, 0)));
        assert!(!map.contains(TileCoord::new(0, -1)));
        assert!(map.tile(TileCoord::new(3, 2)).is_some());
        assert!(map.tile(TileCoord::new(-1, 0)).is_none());
    }

    #[test]
    fn map_mutation() {
        let mut map = TileMap::new(4, 4);
        let c = TileCoord::new(2, 1);
        map.set_height(c, 3.0);
        map.set_steepness(c, 0.7);
        map.set_blocking(c, true);
        map.set_occupant(c, Some(AgentId(9)));

        let t = map.tile(c).unwrap();
        assert_eq!(t.height, 3.0);
        assert_eq!(t.max_steepness(), 0.7);
        assert!(t.blocks_movement());
        assert_eq!(t.occupant(), Some(AgentId(9)));

        map.set_occupant(c, None);
        assert_eq!(map.tile(c).unwrap().occupant(), None);

        // Out-of-bounds writes are silently ignored.
        map.set_height(TileCoord::new(9, 9), 5.0);
    }

    #[test]
    fn relative_tile_steps() {
        let mut map = TileMap::new(3, 3);
        map.set_height(TileCoord::new(1, 0), 2.0);
        let t = map
            .relative_tile(TileCoord::new(0, 0), TileCoord::new(1, 0))
            .unwrap();
        assert_eq!(t.height, 2.0);
        // Off the edge: the tile does not exist.
        assert!(
            map.relative_tile(TileCoord::new(0, 0), TileCoord::new(-1, 0))
                .is_none()
        );
    }

    #[test]
    #[should_panic(expected = "not a unit direction")]
    fn relative_tile_rejects_long_offset() {
        let map = TileMap::new(3, 3);
        map.relative_tile(TileCoord::new(0, 0), TileCoord::new(2, 0));
    }

    #[test]
    #[should_panic(expected = "not a unit direction")]
    fn relative_tile_rejects_zero_offset() {
        let map = TileMap::new(3, 3);
        map.relative_tile(TileCoord::new(1, 1), TileCoord::ZERO);
    }
}
