//! Grid coordinates and distance helpers.

use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A 2D integer tile coordinate. X grows east, Y grows south.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

/// The four cardinal unit offsets (north, east, south, west).
pub const DIRECTIONS_4: [TileCoord; 4] = [
    TileCoord::new(0, -1),
    TileCoord::new(1, 0),
    TileCoord::new(0, 1),
    TileCoord::new(-1, 0),
];

/// All eight unit offsets, cardinals first, then diagonals.
pub const DIRECTIONS_8: [TileCoord; 8] = [
    TileCoord::new(0, -1),
    TileCoord::new(1, 0),
    TileCoord::new(0, 1),
    TileCoord::new(-1, 0),
    TileCoord::new(1, -1),
    TileCoord::new(1, 1),
    TileCoord::new(-1, 1),
    TileCoord::new(-1, -1),
];

impl TileCoord {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a coordinate shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Whether `offset` is one of the eight unit directions.
    #[inline]
    pub fn is_unit_offset(self) -> bool {
        (-1..=1).contains(&self.x) && (-1..=1).contains(&self.y) && self != Self::ZERO
    }

    /// Clamp each axis into `[min, max]`.
    #[inline]
    pub fn clamp(self, min: TileCoord, max: TileCoord) -> Self {
        Self {
            x: self.x.clamp(min.x, max.x),
            y: self.y.clamp(min.y, max.y),
        }
    }
}

impl PartialOrd for TileCoord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TileCoord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for TileCoord {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for TileCoord {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for TileCoord {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Euclidean (L2) distance between two coordinates, in tiles.
#[inline]
pub fn euclidean(a: TileCoord, b: TileCoord) -> f32 {
    let dx = (a.x - b.x) as f32;
    let dy = (a.y - b.y) as f32;
    (dx * dx + dy * dy).sqrt()
}

/// Chebyshev (L∞) distance between two coordinates.
#[inline]
pub fn chebyshev(a: TileCoord, b: TileCoord) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn coord_round_trip() {
        let c = TileCoord::new(-3, 7);
        let json = serde_json::to_string(&c).unwrap();
        let back: TileCoord = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
