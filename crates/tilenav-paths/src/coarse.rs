//! Hierarchical search for long-distance requests.
//!
//! A direct fine search across hundreds of tiles can burn its entire budget
//! before getting anywhere. [`find_long`] instead runs an outer best-first
//! search over *blocks* of `big_node_increment²` tiles, where the edge
//! between two blocks is "a fine search between their representative tiles
//! succeeds". Each succeeding hop caches its tile-level leg, so assembling
//! the final route is pure concatenation.
//!
//! A block's representative tile is the true destination clamped into the
//! block's bounding box, which steers every hop toward the goal instead of
//! toward block centres.

use std::collections::HashMap;

use tilenav_core::{Agent, DIRECTIONS_8, TileCoord, TileView, euclidean};

use crate::error::SearchError;
use crate::fine;
use crate::node::NO_NODE;
use crate::retry::{self, RetryParams};

/// Multiple of `big_node_increment` within which the outer search stops and
/// hands over to the final leg.
const ARRIVAL_BAND: f32 = 1.3;

/// One block of the coarse graph.
struct BlockNode {
    anchor: TileCoord,
    /// Destination clamped into this block's bounding box.
    rep: TileCoord,
    /// Fixed when the block is first probed: did a fine search from the
    /// prober's representative tile get here? A failed probe marks the block
    /// unwalkable for the rest of the call.
    walkable: bool,
    g: f32,
    h: f32,
    visited: bool,
    expanded: bool,
    in_frontier: bool,
    fallback_used: bool,
    parent: usize,
    /// Tile-level leg from the parent's representative tile to `rep`,
    /// in travel order.
    leg: Vec<TileCoord>,
}

impl BlockNode {
    #[inline]
    fn f(&self) -> f32 {
        self.g + self.h
    }
}

/// Compute a walkable route from `start` to a far-away `destination`.
///
/// `max_iterations` bounds each per-hop fine search; `max_big_iterations`
/// bounds the outer block search. Occupants are not treated as obstacles at
/// this range; they will long have moved by the time the agent arrives.
///
/// The returned path has the same shape as [`fine::find`]'s: it begins after
/// `start`, is 8-connected throughout (including across hop junctions), and
/// ends at `destination`.
///
/// # Panics
///
/// Panics if `big_node_increment` is not positive.
pub fn find_long<V: TileView>(
    view: &V,
    agent: &Agent,
    start: TileCoord,
    destination: TileCoord,
    max_iterations: u32,
    big_node_increment: i32,
    max_big_iterations: u32,
) -> Result<Vec<TileCoord>, SearchError> {
    assert!(big_node_increment > 0, "big_node_increment must be positive");

    let Some(dest_tile) = view.tile(destination) else {
        return Err(SearchError::UnreachableDestination);
    };
    if !fine::statically_walkable(dest_tile, agent, false) {
        return Err(SearchError::UnreachableDestination);
    }

    let mut search = BlockSearch {
        view,
        agent,
        destination,
        max_iterations,
        increment: big_node_increment,
        nodes: Vec::new(),
        index: HashMap::new(),
        frontier: Vec::new(),
    };
    let seed = search.insert(BlockNode {
        anchor: start,
        rep: start,
        walkable: true,
        g: 0.0,
        h: euclidean(start, destination),
        visited: false,
        expanded: false,
        in_frontier: false,
        fallback_used: false,
        parent: NO_NODE,
        leg: Vec::new(),
    });

    let band = ARRIVAL_BAND * big_node_increment as f32;
    let mut current = seed;
    let mut iterations = 0u32;
    loop {
        iterations += 1;
        if iterations > max_big_iterations {
            log::debug!(
                "hierarchical search {start} -> {destination} exceeded {max_big_iterations} hops"
            );
            return Err(SearchError::BudgetExceeded);
        }
        if euclidean(search.nodes[current].rep, destination) <= band {
            break;
        }

        search.expand(current);
        search.nodes[current].visited = true;

        current = match search.select_from_frontier() {
            Some(i) => i,
            None => match search.select_from_visited() {
                Some(i) => i,
                None => {
                    log::debug!(
                        "hierarchical search {start} -> {destination} ran out of walkable blocks \
                         after {iterations} hops"
                    );
                    return Err(SearchError::NoPath);
                }
            },
        };
    }

    let mut path = search.assemble(current);

    // Final leg to the exact destination: a direct fine search, with the
    // rotational retry as backstop. A partial ending is still a result.
    let last = search.nodes[current].rep;
    match fine::find(view, agent, last, destination, max_iterations, false) {
        Ok(leg) => path.extend(leg),
        Err(err) => {
            let outcome = retry::find_with_retries(
                view,
                agent,
                last,
                destination,
                RetryParams::default(),
            );
            if outcome.path.is_empty() {
                return Err(err);
            }
            path.extend(outcome.path);
        }
    }
    Ok(path)
}

struct BlockSearch<'a, V: TileView> {
    view: &'a V,
    agent: &'a Agent,
    destination: TileCoord,
    max_iterations: u32,
    increment: i32,
    nodes: Vec<BlockNode>,
    index: HashMap<TileCoord, usize>,
    frontier: Vec<usize>,
}

impl<V: TileView> BlockSearch<'_, V> {
    fn insert(&mut self, node: BlockNode) -> usize {
        let i = self.nodes.len();
        self.index.insert(node.anchor, i);
        self.nodes.push(node);
        i
    }

    /// Probe the 8 neighbor blocks of `ci`, running one fine search per block
    /// that has not been materialized yet.
    ///
    /// First materialization wins: a block keeps the predecessor, cost and
    /// cached leg from the hop that first reached it, even if a cheaper
    /// approach shows up later. Re-parenting would orphan the cached leg and
    /// tear the assembled path apart at the junction.
    fn expand(&mut self, ci: usize) {
        if self.nodes[ci].expanded {
            return;
        }
        self.nodes[ci].expanded = true;

        let from_anchor = self.nodes[ci].anchor;
        let from_rep = self.nodes[ci].rep;
        let from_g = self.nodes[ci].g;
        // The block is the increment² tile square cornered at its anchor.
        let extent = self.increment - 1;

        for dir in DIRECTIONS_8 {
            let anchor = from_anchor + dir * self.increment;
            if self.index.contains_key(&anchor) {
                continue;
            }
            let rep = self.destination.clamp(anchor, anchor.shift(extent, extent));

            let (walkable, g, leg) =
                match fine::find(self.view, self.agent, from_rep, rep, self.max_iterations, false) {
                    Ok(leg) => (true, from_g + euclidean(from_rep, rep), leg),
                    Err(_) => (false, f32::INFINITY, Vec::new()),
                };
            let ni = self.insert(BlockNode {
                anchor,
                rep,
                walkable,
                g,
                h: euclidean(rep, self.destination),
                visited: false,
                expanded: false,
                in_frontier: false,
                fallback_used: false,
                parent: ci,
                leg,
            });
            if walkable {
                self.nodes[ni].in_frontier = true;
                self.frontier.push(ni);
            }
        }
    }

    fn select_from_frontier(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for &i in &self.frontier {
            let n = &self.nodes[i];
            if !n.walkable || n.visited {
                continue;
            }
            match best {
                None => best = Some(i),
                Some(b) => {
                    let bn = &self.nodes[b];
                    if n.f() < bn.f() || (n.f() == bn.f() && n.h < bn.h) {
                        best = Some(i);
                    }
                }
            }
        }
        best
    }

    fn select_from_visited(&mut self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, n) in self.nodes.iter().enumerate() {
            if !n.walkable || !n.visited || n.fallback_used {
                continue;
            }
            if best.is_none_or(|b| n.f() < self.nodes[b].f()) {
                best = Some(i);
            }
        }
        if let Some(b) = best {
            self.nodes[b].fallback_used = true;
        }
        best
    }

    /// Concatenate cached legs along the predecessor chain ending at `goal`.
    fn assemble(&self, goal: usize) -> Vec<TileCoord> {
        let mut chain = Vec::new();
        let mut i = goal;
        while i != NO_NODE && chain.len() <= self.nodes.len() {
            chain.push(i);
            i = self.nodes[i].parent;
        }
        chain.reverse();

        let mut path = Vec::new();
        for i in chain {
            path.extend_from_slice(&self.nodes[i].leg);
        }
        path
    }
}
