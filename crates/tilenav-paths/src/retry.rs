//! Rotational retry around dead-ends.
//!
//! When a direct search dead-ends against a concave obstacle, the way out is
//! usually sideways. [`find_with_retries`] walks toward the destination in
//! rings: it aims a bounded fine search at an intermediate target `radius`
//! tiles away, and on failure rotates the aim around the destination bearing,
//! shrinking the ring and the per-attempt budget as it goes. A full fruitless
//! circle flips the rotation direction once and starts over from the original
//! start tile; a second fruitless circle gives up.
//!
//! The routine never fails hard: it returns whatever progress it made, and
//! the caller decides what an incomplete route is worth.

use tilenav_core::{Agent, TileCoord, TileView, euclidean};

use crate::fine;

/// Multiple of the current ring radius within which the destination is
/// attacked directly instead of through ring targets.
const RING_BAND: f32 = 1.3;

/// Hard ceiling on fine searches across one [`find_with_retries`] call.
///
/// Needed for termination, not just cost: with an angle decay below one the
/// accumulated sweep angle converges and may never complete a circle.
const MAX_ATTEMPTS: u32 = 256;

/// Ring geometry and decay factors for the retry sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryParams {
    /// Degrees added to the aim after each failed attempt.
    pub angle_increment: f32,
    /// Distance of intermediate targets, in tiles.
    pub radius: f32,
    /// Fine-search budget for the first attempt of each ring.
    pub max_iterations_per_radius: u32,
    /// Multiplied into `angle_increment` after each failed attempt.
    pub angle_decay: f32,
    /// Multiplied into `radius` after each failed attempt.
    pub radius_decay: f32,
    /// Multiplied into the fine-search budget after each failed attempt.
    pub iteration_decay: f32,
}

impl Default for RetryParams {
    fn default() -> Self {
        Self {
            angle_increment: 40.0,
            radius: 10.0,
            max_iterations_per_radius: 200,
            angle_decay: 0.9,
            radius_decay: 0.85,
            iteration_decay: 0.9,
        }
    }
}

/// What a retry sweep produced.
///
/// `reached` distinguishes a route that ends on the destination from a
/// best-effort partial; an empty `path` with `reached == false` means no
/// progress at all was possible.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryOutcome {
    pub path: Vec<TileCoord>,
    pub reached: bool,
}

/// Best-effort route from `start` toward `destination`.
///
/// Occupants are never treated as obstacles here; the sweep exists to get
/// around terrain, and transient agents resolve themselves.
pub fn find_with_retries<V: TileView>(
    view: &V,
    agent: &Agent,
    start: TileCoord,
    destination: TileCoord,
    params: RetryParams,
) -> RetryOutcome {
    let mut current = start;
    let mut path: Vec<TileCoord> = Vec::new();
    // First sweep's progress, kept as a candidate after the direction flip.
    let mut shelved: Option<Vec<TileCoord>> = None;
    let mut flipped = false;
    let mut sweep = 1.0f32;
    let mut angle = 0.0f32;
    let mut increment = params.angle_increment;
    let mut radius = params.radius;
    let mut budget = params.max_iterations_per_radius as f32;
    let mut attempts = 0u32;
    let mut aborted = false;

    while euclidean(current, destination) > RING_BAND * radius {
        if attempts >= MAX_ATTEMPTS {
            log::debug!(
                "retry search {start} -> {destination} hit the attempt ceiling ({MAX_ATTEMPTS})"
            );
            aborted = true;
            break;
        }
        attempts += 1;

        let target = ring_target(current, destination, sweep * angle, radius);
        match fine::find(view, agent, current, target, (budget as u32).max(1), false) {
            Ok(leg) if !leg.is_empty() => {
                current = leg[leg.len() - 1];
                path.extend(leg);
                angle = 0.0;
                increment = params.angle_increment;
                radius = params.radius;
                budget = params.max_iterations_per_radius as f32;
            }
            _ => {
                angle += increment;
                increment *= params.angle_decay;
                radius *= params.radius_decay;
                budget *= params.iteration_decay;
                if angle > 360.0 {
                    if flipped {
                        aborted = true;
                        break;
                    }
                    // Full circle with no progress: sweep the other way,
                    // re-anchored at the original start.
                    flipped = true;
                    sweep = -1.0;
                    shelved = Some(std::mem::take(&mut path));
                    current = start;
                    angle = 0.0;
                    increment = params.angle_increment;
                    radius = params.radius;
                    budget = params.max_iterations_per_radius as f32;
                }
            }
        }
    }

    if !aborted {
        // In range of the destination: one direct attempt finishes the job.
        // Its failure leaves the accumulated partial path unchanged.
        if let Ok(leg) = fine::find(
            view,
            agent,
            current,
            destination,
            params.max_iterations_per_radius,
            false,
        ) {
            path.extend(leg);
            return RetryOutcome {
                path,
                reached: true,
            };
        }
    }

    // Keep whichever sweep ended closer to the destination.
    let path = match shelved {
        Some(other) if remaining(&other, start, destination) < remaining(&path, start, destination) => {
            other
        }
        _ => path,
    };
    RetryOutcome {
        path,
        reached: false,
    }
}

/// Endpoint-to-destination distance of a partial path.
fn remaining(path: &[TileCoord], start: TileCoord, destination: TileCoord) -> f32 {
    euclidean(path.last().copied().unwrap_or(start), destination)
}

/// The tile `radius` away from `from`, along the destination bearing rotated
/// by `angle_deg`.
fn ring_target(from: TileCoord, destination: TileCoord, angle_deg: f32, radius: f32) -> TileCoord {
    let dx = (destination.x - from.x) as f32;
    let dy = (destination.y - from.y) as f32;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return from;
    }
    let (ux, uy) = (dx / len, dy / len);
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let rx = ux * cos - uy * sin;
    let ry = ux * sin + uy * cos;
    TileCoord::new(
        from.x + (rx * radius).round() as i32,
        from.y + (ry * radius).round() as i32,
    )
}
