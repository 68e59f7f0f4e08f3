//! NPC pathfinding over lazily loaded tile worlds.
//!
//! Three cooperating searches compute walkable routes through a world that is
//! only ever observed through [`TileView`](tilenav_core::TileView) queries:
//!
//! - **Fine search** ([`fine::find`]) — tile-level best-first search that
//!   materializes its node graph on demand
//! - **Hierarchical search** ([`coarse::find_long`]) — coarsens long requests
//!   into block-sized hops, each resolved by a fine search
//! - **Retry search** ([`retry::find_with_retries`]) — rotating,
//!   shrinking-radius retries around dead-ends, always best-effort
//!
//! [`Navigator`] picks a strategy per request and is the entry point for the
//! agent-behaviour layer.
//!
//! All searches are synchronous and single-threaded. Every node graph is
//! scoped to one call; nothing is cached between calls. The caller guarantees
//! that tile state (heights, blocking objects, occupancy) does not change
//! while a search is running.

pub mod coarse;
mod error;
pub mod fine;
mod navigator;
mod node;
pub mod retry;

pub use error::SearchError;
pub use navigator::{NavConfig, Navigator};
pub use retry::{RetryOutcome, RetryParams};
