//! Test utilities: canned vessel states and flight profiles
//!
//! Shared by unit tests and the criterion benches.

#![cfg(any(test, feature = "benchmark"))]

use crate::source::VesselSnapshot;

/// A vessel coasting toward apoapsis above Kerbin, mid-ascent.
pub fn sample_snapshot() -> VesselSnapshot {
    VesselSnapshot {
        altitude: 42_500.0,
        terrain_altitude: 650.0,
        surface_speed: 1_180.4,
        target_speed: None,
        orbital_speed: 1_402.7,
        apoapsis: 78_300.0,
        apoapsis_radius: 678_300.0,
        periapsis: -410_000.0,
        periapsis_radius: 190_000.0,
        time_to_apoapsis: 61.0,
        time_to_periapsis: 1_020.0,
        stage: 2,
        reference_body: "Kerbin".to_string(),
        latitude: -0.097,
        longitude: 285.42,
        orbital_period: 1_480.0,
        g_force: 1.8,
    }
}

/// Snapshots sampled every 100 ms during a simple ascent.
///
/// Altitude and speeds rise every step, the time fields move slower than their
/// threshold between most steps, and the stage drops once halfway through, so a driver
/// fed this profile exercises both suppression and resend paths.
pub fn ascent_profile(steps: usize) -> Vec<VesselSnapshot> {
    let base = sample_snapshot();
    (0..steps)
        .map(|step| {
            let t = step as f64 * 0.1;
            VesselSnapshot {
                altitude: base.altitude + 120.0 * t,
                surface_speed: base.surface_speed + 9.5 * t,
                orbital_speed: base.orbital_speed + 9.8 * t,
                apoapsis: base.apoapsis + 35.0 * t,
                time_to_apoapsis: base.time_to_apoapsis - 0.3 * t,
                stage: if step < steps / 2 { base.stage } else { base.stage - 1 },
                longitude: base.longitude + 0.004 * t,
                g_force: base.g_force + 0.01 * t,
                ..base.clone()
            }
        })
        .collect()
}
