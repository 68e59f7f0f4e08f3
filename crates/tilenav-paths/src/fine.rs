//! Tile-level best-first search over a lazily materialized node graph.
//!
//! The search never sees the world as a whole: tiles are queried through
//! [`TileView`] the first time a neighbor direction is probed, and the
//! resulting nodes live only for the duration of one [`find`] call.
//!
//! This is deliberately not textbook A*. The frontier is scanned linearly
//! with (f, then h, then first-found) tie-breaking, and when the frontier
//! runs dry the search advances to the best already-visited node instead of
//! giving up outright. Visited nodes are never re-expanded, even if a cheaper
//! route to them turns up later. Agents occasionally take slightly longer
//! routes because of this; callers depend on the termination behavior.

use tilenav_core::{Agent, DIRECTIONS_8, Tile, TileCoord, TileView, euclidean};

use crate::error::SearchError;
use crate::node::{Arena, NO_NODE, Node};

/// Whether `tile` can be stood on by `agent`, ignoring approach slope.
pub(crate) fn statically_walkable(tile: Tile, agent: &Agent, occupants_block: bool) -> bool {
    !tile.blocks_movement()
        && tile.max_steepness() <= agent.max_walkable_steepness
        && (!occupants_block || tile.occupant().is_none_or(|o| o == agent.id))
}

/// Compute a walkable route from `start` to `destination`.
///
/// The returned path starts at the tile *after* `start` and ends at
/// `destination`; consecutive tiles are always 8-neighbors. An unwalkable or
/// missing destination fails as [`SearchError::UnreachableDestination`]
/// before any node is expanded. `max_iterations` bounds the number of
/// expansion steps; the grid is conceptually unbounded, so the bound is what
/// guarantees termination.
///
/// With `occupants_block`, tiles occupied by any agent other than the
/// searching one are treated as unwalkable.
pub fn find<V: TileView>(
    view: &V,
    agent: &Agent,
    start: TileCoord,
    destination: TileCoord,
    max_iterations: u32,
    occupants_block: bool,
) -> Result<Vec<TileCoord>, SearchError> {
    let Some(dest_tile) = view.tile(destination) else {
        return Err(SearchError::UnreachableDestination);
    };
    if !statically_walkable(dest_tile, agent, occupants_block) {
        return Err(SearchError::UnreachableDestination);
    }
    if start == destination {
        return Ok(Vec::new());
    }
    let Some(start_tile) = view.tile(start) else {
        return Err(SearchError::NoPath);
    };

    let mut search = Search {
        view,
        agent,
        destination,
        occupants_block,
        arena: Arena::new(),
        frontier: Vec::new(),
    };
    let seed = search.arena.insert(Node {
        coord: start,
        height: start_tile.height,
        walkable: true,
        g: 0.0,
        h: euclidean(start, destination),
        visited: false,
        expanded: false,
        in_frontier: false,
        fallback_used: false,
        parent: NO_NODE,
    });

    let mut current = seed;
    let mut iterations = 0u32;
    loop {
        iterations += 1;
        if iterations > max_iterations {
            log::debug!(
                "fine search {start} -> {destination} exceeded budget of {max_iterations} iterations"
            );
            return Err(SearchError::BudgetExceeded);
        }

        search.expand(current);
        search.arena.node_mut(current).visited = true;

        let next = match search.arena.select_from_frontier(&search.frontier) {
            Some(i) => i,
            // Frontier empty: degrade to the closest node seen so far. Not a
            // true reopen; the node will not be expanded a second time.
            None => match search.arena.select_from_visited() {
                Some(i) => i,
                None => {
                    log::debug!(
                        "fine search {start} -> {destination} exhausted after {iterations} iterations"
                    );
                    return Err(SearchError::NoPath);
                }
            },
        };
        if search.arena.node(next).coord == destination {
            return Ok(search.arena.reconstruct(next));
        }
        current = next;
    }
}

struct Search<'a, V: TileView> {
    view: &'a V,
    agent: &'a Agent,
    destination: TileCoord,
    occupants_block: bool,
    arena: Arena,
    frontier: Vec<usize>,
}

impl<V: TileView> Search<'_, V> {
    /// Materialize missing neighbors of `ci` and relax edge costs into them.
    fn expand(&mut self, ci: usize) {
        if self.arena.node(ci).expanded {
            // Visited nodes are never re-expanded within a call.
            return;
        }
        self.arena.node_mut(ci).expanded = true;

        let (c_coord, c_height, c_g) = {
            let n = self.arena.node(ci);
            (n.coord, n.height, n.g)
        };

        for offset in DIRECTIONS_8 {
            let step = step_distance(offset);
            let ni = match self.arena.get(c_coord + offset) {
                Some(i) => i,
                None => match self.materialize(c_coord, c_height, offset) {
                    Some(i) => i,
                    None => continue,
                },
            };

            let n = self.arena.node_mut(ni);
            if !n.walkable || n.visited {
                continue;
            }
            let tentative = c_g + step;
            if tentative < n.g {
                n.g = tentative;
                n.parent = ci;
            }
            if !n.in_frontier {
                n.in_frontier = true;
                self.frontier.push(ni);
            }
        }
    }

    /// Create the node one step from `from` in direction `offset`.
    ///
    /// Walkability is fixed here, from the world as sampled now and the slope
    /// relative to the probing node; a later probe from another direction
    /// does not revise it. Returns `None` when the tile does not exist
    /// (outside the world, or not yet loaded).
    fn materialize(&mut self, from: TileCoord, from_height: f32, offset: TileCoord) -> Option<usize> {
        let tile = self.view.relative_tile(from, offset)?;
        let coord = from + offset;
        let slope = (tile.height - from_height).abs() / step_distance(offset);
        let walkable = statically_walkable(tile, self.agent, self.occupants_block)
            && slope <= self.agent.max_walkable_steepness;
        Some(self.arena.insert(Node {
            coord,
            height: tile.height,
            walkable,
            g: f32::INFINITY,
            h: euclidean(coord, self.destination),
            visited: false,
            expanded: false,
            in_frontier: false,
            fallback_used: false,
            parent: NO_NODE,
        }))
    }
}

#[inline]
fn step_distance(offset: TileCoord) -> f32 {
    if offset.x != 0 && offset.y != 0 {
        std::f32::consts::SQRT_2
    } else {
        1.0
    }
}
