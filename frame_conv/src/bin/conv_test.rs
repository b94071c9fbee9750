//! # Conversion Test
//!
//! This binary runs a set of Cartesian states through the Cartesian/Frenet
//! conversion on a reference path and back, checking how well each state is
//! reproduced. The results are logged and archived in the session directory.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{eyre::WrapErr, Result};
use log::{debug, info, warn};
use serde::Serialize;

use frame_conv_lib::{
    conv::{cartesian_to_frenet, frenet_to_cartesian, CartesianState},
    params::ConvTestParams,
    ref_path::DiscreteRefPath,
};
use util::{
    archive::Archiver,
    logger::{logger_init_with_filters, LevelFilter},
    raise_error,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// One row of the conversion archive.
#[derive(Serialize)]
struct ConvRecord {
    index: usize,
    s_m: f64,
    ds: f64,
    dds: f64,
    d_m: f64,
    dd: f64,
    ddd: f64,
    position_error_m: f64,
    max_state_error: f64,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    // Initialise session
    let session = Session::new("conv_test", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger, only the conversions themselves log at trace level
    logger_init_with_filters(
        LevelFilter::Debug,
        &[("frame_conv_lib::conv", LevelFilter::Trace)],
        &session,
    )
    .wrap_err("Failed to initialise logging")?;

    info!("Conversion Test\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: ConvTestParams =
        util::params::load("conv_test.toml").wrap_err("Could not load conversion test params")?;

    // ---- BUILD REFERENCE PATH ----

    let ref_path = DiscreteRefPath::from_waypoints(&params.ref_waypoints())
        .wrap_err("Could not build the reference path")?;
    info!(
        "Reference path has {} points and is {:.3} m long",
        ref_path.points().len(),
        ref_path.length()
    );

    session
        .save("ref_path.json", &ref_path)
        .wrap_err("Could not save the reference path")?;

    let mut archiver =
        Archiver::from_path(&session, "conv.csv").wrap_err("Could not create the archive")?;

    // ---- CONVERT STATES ----

    let mut num_exceeded = 0;

    for (index, state) in params.states.iter().enumerate() {
        let ref_point = ref_path.match_to_path(state.x_m, state.y_m);
        debug!("State {} matched to {:?}", index, ref_point);

        let (s_cond, d_cond) = cartesian_to_frenet(&ref_point, state);

        // The reference point came from the conversion itself so a mismatch
        // here is a bug
        let out = match frenet_to_cartesian(&ref_point, &s_cond, &d_cond) {
            Ok(o) => o,
            Err(e) => raise_error!("Round trip conversion of state {} failed: {}", index, e),
        };

        let position_error_m = (out.x_m - state.x_m).hypot(out.y_m - state.y_m);
        let max_state_error = max_error(state, &out);

        info!(
            "State {}: s = [{:.4}, {:.4}, {:.4}], d = [{:.4}, {:.4}, {:.4}]",
            index, s_cond[0], s_cond[1], s_cond[2], d_cond[0], d_cond[1], d_cond[2]
        );

        if max_state_error > params.round_trip_tolerance {
            num_exceeded += 1;
            warn!(
                "State {} round trip error {:e} exceeds the tolerance {:e} (position error {:e} m)",
                index, max_state_error, params.round_trip_tolerance, position_error_m
            );
        }

        archiver
            .serialise(ConvRecord {
                index,
                s_m: s_cond[0],
                ds: s_cond[1],
                dds: s_cond[2],
                d_m: d_cond[0],
                dd: d_cond[1],
                ddd: d_cond[2],
                position_error_m,
                max_state_error,
            })
            .wrap_err("Could not archive the conversion")?;
    }

    info!(
        "Converted {} states, {} exceeded the round trip tolerance",
        params.states.len(),
        num_exceeded
    );

    Ok(())
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Largest absolute difference between any field of the two states.
///
/// Headings are compared on the circle.
fn max_error(a: &CartesianState, b: &CartesianState) -> f64 {
    let head_error_rad = util::maths::normalize_angle(a.theta_rad - b.theta_rad).abs();

    [
        (a.x_m - b.x_m).abs(),
        (a.y_m - b.y_m).abs(),
        head_error_rad,
        (a.kappa_m - b.kappa_m).abs(),
        (a.v_ms - b.v_ms).abs(),
        (a.a_mss - b.a_mss).abs(),
    ]
    .iter()
    .cloned()
    .fold(0.0, f64::max)
}
