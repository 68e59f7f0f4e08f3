//! Call-scoped search node storage.
//!
//! Nodes live in a flat `Vec` and refer to each other by index, with
//! `usize::MAX` as the "no predecessor" sentinel; a coordinate map provides
//! neighbor access by offset lookup. One arena exists per search call and is
//! dropped when the call returns.

use std::collections::HashMap;

use tilenav_core::TileCoord;

/// Sentinel index meaning "no node".
pub(crate) const NO_NODE: usize = usize::MAX;

/// One materialized tile of a single fine-search call.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) coord: TileCoord,
    /// Terrain height sampled at materialization.
    pub(crate) height: f32,
    /// Fixed at materialization; an unwalkable node is never expanded and
    /// never entered.
    pub(crate) walkable: bool,
    /// Cost so far. Only ever decreases, via relaxation.
    pub(crate) g: f32,
    /// Heuristic estimate to the goal. Computed once, never recomputed.
    pub(crate) h: f32,
    pub(crate) visited: bool,
    pub(crate) expanded: bool,
    pub(crate) in_frontier: bool,
    /// The empty-frontier fallback already handed this node out once.
    pub(crate) fallback_used: bool,
    pub(crate) parent: usize,
}

impl Node {
    #[inline]
    pub(crate) fn f(&self) -> f32 {
        self.g + self.h
    }
}

/// Arena of materialized nodes, keyed by coordinate.
pub(crate) struct Arena {
    nodes: Vec<Node>,
    index: HashMap<TileCoord, usize>,
}

impl Arena {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Index of the node at `coord`, if one has been materialized.
    #[inline]
    pub(crate) fn get(&self, coord: TileCoord) -> Option<usize> {
        self.index.get(&coord).copied()
    }

    /// Materialize a node. The first node stored for a coordinate wins;
    /// a second insert for the same coordinate returns the existing index
    /// untouched.
    pub(crate) fn insert(&mut self, node: Node) -> usize {
        if let Some(&i) = self.index.get(&node.coord) {
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(node.coord, i);
        self.nodes.push(node);
        i
    }

    #[inline]
    pub(crate) fn node(&self, i: usize) -> &Node {
        &self.nodes[i]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, i: usize) -> &mut Node {
        &mut self.nodes[i]
    }

    /// Minimum-f node among frontier entries that are walkable and unvisited,
    /// ties broken by minimum h, further ties by first-found scan order.
    pub(crate) fn select_from_frontier(&self, frontier: &[usize]) -> Option<usize> {
        let mut best: Option<usize> = None;
        for &i in frontier {
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

    /// Minimum-f node among already-visited walkable nodes.
    ///
    /// The "closest so far" degradation used when the frontier runs dry.
    /// Not a true reopen: the node is never expanded a second time, and each
    /// node is handed out at most once, so a walled-off search still runs out
    /// of candidates instead of spinning on its iteration cap.
    pub(crate) fn select_from_visited(&mut self) -> Option<usize> {
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

    /// Walk the predecessor chain from `goal` back to the seed, reverse it,
    /// and drop the seed tile itself.
    ///
    /// Iterative and bounded by the arena size; path length is unbounded by
    /// construction, so recursion is never an option here.
    pub(crate) fn reconstruct(&self, goal: usize) -> Vec<TileCoord> {
        let mut path = Vec::new();
        let mut i = goal;
        while i != NO_NODE && path.len() <= self.nodes.len() {
            path.push(self.nodes[i].coord);
            i = self.nodes[i].parent;
        }
        path.pop();
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(x: i32, y: i32) -> Node {
        Node {
            coord: TileCoord::new(x, y),
            height: 0.0,
            walkable: true,
            g: 0.0,
            h: 0.0,
            visited: false,
            expanded: false,
            in_frontier: false,
            fallback_used: false,
            parent: NO_NODE,
        }
    }

    #[test]
    fn first_insert_wins() {
        let mut arena = Arena::new();
        let a = arena.insert(node_at(1, 1));
        let b = arena.insert(Node {
            height: 9.0,
            ..node_at(1, 1)
        });
        assert_eq!(a, b);
        assert_eq!(arena.node(a).height, 0.0);
        assert_eq!(arena.get(TileCoord::new(1, 1)), Some(a));
        assert_eq!(arena.get(TileCoord::new(0, 1)), None);
    }

    #[test]
    fn frontier_selection_prefers_f_then_h() {
        let mut arena = Arena::new();
        let a = arena.insert(Node {
            g: 2.0,
            h: 3.0,
            ..node_at(0, 0)
        });
        let b = arena.insert(Node {
            g: 4.0,
            h: 1.0,
            ..node_at(1, 0)
        });
        let c = arena.insert(Node {
            g: 3.0,
            h: 2.0,
            ..node_at(2, 0)
        });
        // All f = 5; b has the smallest h.
        assert_eq!(arena.select_from_frontier(&[a, b, c]), Some(b));

        // Equal f and h: first-found in scan order.
        let mut arena = Arena::new();
        let a = arena.insert(Node {
            g: 1.0,
            h: 1.0,
            ..node_at(0, 0)
        });
        let b = arena.insert(Node {
            g: 1.0,
            h: 1.0,
            ..node_at(1, 0)
        });
        assert_eq!(arena.select_from_frontier(&[a, b]), Some(a));
        assert_eq!(arena.select_from_frontier(&[b, a]), Some(b));
    }

    #[test]
    fn frontier_selection_skips_visited_and_unwalkable() {
        let mut arena = Arena::new();
        let a = arena.insert(Node {
            visited: true,
            ..node_at(0, 0)
        });
        let b = arena.insert(Node {
            walkable: false,
            ..node_at(1, 0)
        });
        let c = arena.insert(Node {
            g: 99.0,
            ..node_at(2, 0)
        });
        assert_eq!(arena.select_from_frontier(&[a, b, c]), Some(c));
        assert_eq!(arena.select_from_frontier(&[a, b]), None);
    }

    #[test]
    fn visited_fallback_hands_each_node_out_once() {
        let mut arena = Arena::new();
        let a = arena.insert(Node {
            visited: true,
            g: 1.0,
            ..node_at(0, 0)
        });
        let b = arena.insert(Node {
            visited: true,
            g: 2.0,
            ..node_at(1, 0)
        });
        assert_eq!(arena.select_from_visited(), Some(a));
        assert_eq!(arena.select_from_visited(), Some(b));
        assert_eq!(arena.select_from_visited(), None);
    }

    #[test]
    fn reconstruct_drops_seed_and_orders_forward() {
        let mut arena = Arena::new();
        let s = arena.insert(node_at(0, 0));
        let m = arena.insert(Node {
            parent: s,
            ..node_at(1, 0)
        });
        let g = arena.insert(Node {
            parent: m,
            ..node_at(2, 1)
        });
        let path = arena.reconstruct(g);
        assert_eq!(path, vec![TileCoord::new(1, 0), TileCoord::new(2, 1)]);
        // Seed-only chain: empty path.
        assert!(arena.reconstruct(s).is_empty());
    }
}
