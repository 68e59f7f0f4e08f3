//! Strategy selection for path requests.
//!
//! The agent-behaviour layer asks for "a route to X" without caring which
//! search computes it. [`Navigator`] sends long-distance requests through the
//! hierarchical search, short ones through the fine search, and falls back to
//! the rotational retry when the fine search dead-ends — immediately so for
//! agents whose previous request already failed.

use std::collections::HashSet;

use tilenav_core::{Agent, AgentId, TileCoord, TileView, euclidean};

use crate::coarse;
use crate::error::SearchError;
use crate::fine;
use crate::retry::{self, RetryParams};

/// Tuning for [`Navigator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavConfig {
    /// Requests at least this many tiles away use the hierarchical search.
    pub long_distance: f32,
    /// Fine-search budget, also the per-hop budget of the hierarchical search.
    pub max_iterations: u32,
    /// Block edge length of the hierarchical search, in tiles.
    pub big_node_increment: i32,
    /// Hop budget of the hierarchical search.
    pub max_big_iterations: u32,
    /// Whether short-range searches treat occupied tiles as obstacles.
    pub occupants_block: bool,
    /// Ring parameters for the retry fallback.
    pub retry: RetryParams,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            long_distance: 48.0,
            max_iterations: 600,
            big_node_increment: 16,
            max_big_iterations: 64,
            occupants_block: true,
            retry: RetryParams::default(),
        }
    }
}

/// Entry point for path requests.
///
/// Holds no world state and no search state — only tuning and a memory of
/// which agents' last request failed, so their next one skips straight to
/// the retry sweep.
pub struct Navigator {
    config: NavConfig,
    recently_failed: HashSet<AgentId>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(NavConfig::default())
    }
}

impl Navigator {
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            recently_failed: HashSet::new(),
        }
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Whether `agent`'s last request came back incomplete.
    pub fn recently_failed(&self, agent: AgentId) -> bool {
        self.recently_failed.contains(&agent)
    }

    /// Drop the prior-failure mark for `agent`.
    pub fn forget(&mut self, agent: AgentId) {
        self.recently_failed.remove(&agent);
    }

    /// Compute a route for `agent` from `start` to `destination`.
    ///
    /// A returned path may be partial (retry fallback): it is still a route
    /// worth walking, but the agent stays marked as recently failed and its
    /// next request goes straight to the retry sweep.
    pub fn request<V: TileView>(
        &mut self,
        view: &V,
        agent: &Agent,
        start: TileCoord,
        destination: TileCoord,
    ) -> Result<Vec<TileCoord>, SearchError> {
        let (result, complete) = self.dispatch(view, agent, start, destination);
        if complete {
            self.recently_failed.remove(&agent.id);
        } else {
            self.recently_failed.insert(agent.id);
        }
        result
    }

    fn dispatch<V: TileView>(
        &self,
        view: &V,
        agent: &Agent,
        start: TileCoord,
        destination: TileCoord,
    ) -> (Result<Vec<TileCoord>, SearchError>, bool) {
        let c = &self.config;

        if euclidean(start, destination) >= c.long_distance {
            let result = coarse::find_long(
                view,
                agent,
                start,
                destination,
                c.max_iterations,
                c.big_node_increment,
                c.max_big_iterations,
            );
            let complete = result.is_ok();
            return (result, complete);
        }

        if self.recently_failed.contains(&agent.id) {
            // The direct search dead-ended for this agent last time; don't
            // burn its budget again.
            return self.sweep(view, agent, start, destination, SearchError::NoPath);
        }

        match fine::find(view, agent, start, destination, c.max_iterations, c.occupants_block) {
            Ok(path) => (Ok(path), true),
            // A statically bad destination is not something the sweep can fix.
            Err(SearchError::UnreachableDestination) => {
                (Err(SearchError::UnreachableDestination), false)
            }
            Err(err) => self.sweep(view, agent, start, destination, err),
        }
    }

    /// Retry fallback: a best-effort partial path still beats a hard failure.
    fn sweep<V: TileView>(
        &self,
        view: &V,
        agent: &Agent,
        start: TileCoord,
        destination: TileCoord,
        err: SearchError,
    ) -> (Result<Vec<TileCoord>, SearchError>, bool) {
        let outcome = retry::find_with_retries(view, agent, start, destination, self.config.retry);
        if outcome.path.is_empty() && !outcome.reached {
            (Err(err), false)
        } else {
            let reached = outcome.reached;
            (Ok(outcome.path), reached)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilenav_core::{DIRECTIONS_8, TileMap, chebyshev};

    fn agent() -> Agent {
        Agent::new(AgentId(7), 1.0, 3.0)
    }

    fn at(x: i32, y: i32) -> TileCoord {
        TileCoord::new(x, y)
    }

    fn assert_connected(path: &[TileCoord], start: TileCoord, dest: TileCoord) {
        assert_eq!(*path.last().unwrap(), dest);
        let mut prev = start;
        for &t in path {
            assert_eq!(chebyshev(prev, t), 1);
            prev = t;
        }
    }

    #[test]
    fn short_request_uses_fine_search() {
        let map = TileMap::new(20, 20);
        let mut nav = Navigator::default();
        let a = agent();
        let path = nav.request(&map, &a, at(1, 1), at(12, 9)).unwrap();
        assert_connected(&path, at(1, 1), at(12, 9));
        assert!(!nav.recently_failed(a.id));
    }

    #[test]
    fn long_request_uses_hierarchical_search() {
        let map = TileMap::new(96, 96);
        let mut nav = Navigator::default();
        let a = agent();
        let path = nav.request(&map, &a, at(2, 2), at(90, 85)).unwrap();
        assert_connected(&path, at(2, 2), at(90, 85));
    }

    #[test]
    fn boxed_in_agent_fails_and_is_remembered() {
        let mut map = TileMap::new(30, 30);
        for d in DIRECTIONS_8 {
            map.set_blocking(at(5, 5) + d, true);
        }
        let mut nav = Navigator::default();
        let a = agent();
        let err = nav.request(&map, &a, at(5, 5), at(20, 20)).unwrap_err();
        assert_eq!(err, SearchError::NoPath);
        assert!(nav.recently_failed(a.id));

        // World changed (wall gone): the request now goes through the retry
        // sweep and succeeds, clearing the mark.
        let open = TileMap::new(30, 30);
        let path = nav.request(&open, &a, at(5, 5), at(20, 20)).unwrap();
        assert_connected(&path, at(5, 5), at(20, 20));
        assert!(!nav.recently_failed(a.id));
    }

    #[test]
    fn unreachable_destination_is_not_swept() {
        let mut map = TileMap::new(20, 20);
        map.set_blocking(at(15, 15), true);
        let mut nav = Navigator::default();
        let a = agent();
        let err = nav.request(&map, &a, at(1, 1), at(15, 15)).unwrap_err();
        assert_eq!(err, SearchError::UnreachableDestination);
        assert!(nav.recently_failed(a.id));
    }

    #[test]
    fn forget_clears_the_mark() {
        let mut map = TileMap::new(20, 20);
        map.set_blocking(at(15, 15), true);
        let mut nav = Navigator::default();
        let a = agent();
        let _ = nav.request(&map, &a, at(1, 1), at(15, 15));
        assert!(nav.recently_failed(a.id));
        nav.forget(a.id);
        assert!(!nav.recently_failed(a.id));
    }

    #[test]
    fn partial_route_is_returned_but_still_counts_as_failure() {
        // Destination sealed off: the fine search fails, the sweep makes
        // what progress it can toward the wall.
        let mut map = TileMap::new(40, 20);
        for y in 0..20 {
            map.set_blocking(at(30, y), true);
        }
        let mut nav = Navigator::default();
        let a = agent();
        match nav.request(&map, &a, at(2, 10), at(36, 10)) {
            Ok(path) => {
                // Partial progress, short of the destination.
                assert_ne!(path.last(), Some(&at(36, 10)));
                assert!(nav.recently_failed(a.id));
            }
            Err(_) => {
                assert!(nav.recently_failed(a.id));
            }
        }
    }
}
