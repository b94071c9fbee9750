//! # Path search interface
//!
//! A path search finds a feasible sequence of poses between a start and end
//! pose, for example by searching over Reeds-Shepp curves. The waypoints it
//! produces are used to build the reference paths which conversions are
//! anchored on.
//!
//! No search algorithm is provided here, only the interface searchers must
//! implement.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use crate::ref_path::{DiscreteRefPath, RefPathError};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A geometric path searcher.
pub trait PathSearch {
    /// Search for a path from `start` to `end`.
    ///
    /// The returned sequence must start at `start` and finish at `end`.
    fn search(&mut self, start: &Pose2, end: &Pose2) -> Result<Vec<Pose2>, PathSearchError>;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A 2D pose, the position and heading of the vehicle.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2 {
    pub x_m: f64,

    pub y_m: f64,

    /// Heading (angle to the +ve x axis)
    pub phi_rad: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PathSearchError {
    #[error("No feasible path exists between the start and end poses")]
    NoPathFound,

    #[error("The searched path cannot be used as a reference path: {0}")]
    InvalidRefPath(RefPathError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose2 {
    pub fn new(x_m: f64, y_m: f64, phi_rad: f64) -> Self {
        Self { x_m, y_m, phi_rad }
    }

    pub fn position_m(&self) -> Vector2<f64> {
        Vector2::new(self.x_m, self.y_m)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Search for a path between the two poses and build a reference path from
/// it.
pub fn search_ref_path<S: PathSearch>(
    searcher: &mut S,
    start: &Pose2,
    end: &Pose2,
) -> Result<DiscreteRefPath, PathSearchError> {
    let poses = searcher.search(start, end)?;

    debug!(
        "Path search from {:?} to {:?} produced {} poses",
        start,
        end,
        poses.len()
    );

    DiscreteRefPath::from_poses(&poses).map_err(PathSearchError::InvalidRefPath)
}
