//! # Frame conversion library.
//!
//! Converts vehicle states between the global Cartesian frame and the Frenet
//! frame of a reference path, and provides the reference path types which
//! supply the reference points the conversion is anchored on.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Cartesian/Frenet conversion - the transforms and their geometry helpers
pub mod conv;

/// Parameters for the conversion test executable
pub mod params;

/// Path search interface - produces the waypoints reference paths are built from
pub mod path_search;

/// Reference paths - supply reference points for any arc length along the path
pub mod ref_path;
