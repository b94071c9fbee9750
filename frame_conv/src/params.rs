//! Conversion test parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Deserialize;

// Internal
use crate::conv::CartesianState;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the conversion test executable
#[derive(Deserialize, Debug, Clone)]
pub struct ConvTestParams {
    /// Waypoints of the reference path, as `[x, y]` pairs.
    pub ref_waypoints_m: Vec<[f64; 2]>,

    /// The maximum error allowed on any field of a state after it has been
    /// converted to Frenet and back.
    pub round_trip_tolerance: f64,

    /// The states to convert.
    pub states: Vec<CartesianState>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ConvTestParams {
    /// Get the reference waypoints as vectors.
    pub fn ref_waypoints(&self) -> Vec<Vector2<f64>> {
        self.ref_waypoints_m
            .iter()
            .map(|p| Vector2::new(p[0], p[1]))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_conv_test_params() {
        let params: ConvTestParams =
            util::params::from_str(include_str!("../../params/conv_test.toml")).unwrap();

        assert!(params.ref_waypoints_m.len() >= 2);
        assert!(!params.states.is_empty());
        assert!(params.round_trip_tolerance > 0.0);
        assert_eq!(params.ref_waypoints().len(), params.ref_waypoints_m.len());
    }
}
