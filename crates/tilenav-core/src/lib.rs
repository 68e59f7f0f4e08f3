//! Core types for tile-world NPC navigation.
//!
//! This crate holds the small vocabulary shared by the search algorithms in
//! `tilenav-paths` and the systems that host them:
//!
//! - [`TileCoord`] — integer grid coordinate used for all lookups
//! - [`Tile`] — one world cell: height, steepness, blocking object, occupant
//! - [`Agent`] — the navigating agent's identity and movement tolerances
//! - [`TileView`] — the query interface a world implementation provides
//! - [`TileMap`] — a bounded in-memory [`TileView`] for tests and simple hosts
//!
//! World generation, rendering and agent behaviour live elsewhere; the
//! navigation core only ever reads the world through [`TileView`].

mod coord;
mod tile;
mod view;

pub use coord::{DIRECTIONS_4, DIRECTIONS_8, TileCoord, chebyshev, euclidean};
pub use tile::{Agent, AgentId, Tile};
pub use view::{TileMap, TileView};
