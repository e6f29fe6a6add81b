// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Velocity approximated from the last incremental motion.
//!
//! No filtering is applied, the twist is simply the last inter-frame
//! displacement divided by the time elapsed since the previous publication.

use crate::math::so3;
use crate::misc::type_aliases::{Float, Iso3, Vec3};

/// Linear and angular velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    /// Meters per second.
    pub linear: Vec3,
    /// Rotation vector per second (axis scaled by radians per second).
    pub angular: Vec3,
}

impl Velocity {
    pub fn zero() -> Velocity {
        Velocity {
            linear: Vec3::zeros(),
            angular: Vec3::zeros(),
        }
    }
}

impl Default for Velocity {
    fn default() -> Self {
        Velocity::zero()
    }
}

/// Strictly positive time elapsed since `last_stamp`, if any.
pub fn elapsed(last_stamp: Option<f64>, stamp: f64) -> Option<Float> {
    last_stamp.map(|last| stamp - last).filter(|&dt| dt > 0.0)
}

/// Velocity of an incremental `motion` performed during `dt` seconds.
pub fn from_motion(motion: &Iso3, dt: Float) -> Velocity {
    Velocity {
        linear: motion.translation.vector / dt,
        angular: so3::log(&motion.rotation) / dt,
    }
}

/// Velocity of the last incremental `motion`, ending at `stamp`.
/// Zero when there is no previous stamp or when time did not move forward.
pub fn estimate(motion: &Iso3, last_stamp: Option<f64>, stamp: f64) -> Velocity {
    match elapsed(last_stamp, stamp) {
        Some(dt) => from_motion(motion, dt),
        None => Velocity::zero(),
    }
}

// TESTS #############################################################

#[cfg(test)]
mod tests {

    use super::*;
    use crate::misc::type_aliases::Quat;
    use approx;
    use quickcheck_macros;

    #[test]
    fn translation_over_a_tenth_of_second() {
        let motion = Iso3::translation(0.2, 0.0, 0.0);
        let velocity = estimate(&motion, Some(0.0), 0.1);
        approx::assert_relative_eq!(Vec3::new(2.0, 0.0, 0.0), velocity.linear, epsilon = 1e-12);
        assert_eq!(Vec3::zeros(), velocity.angular);
    }

    #[test]
    fn rotation_gives_axis_times_angle_rate() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), 0.5);
        let motion = Iso3::from_parts(Vec3::zeros().into(), rotation);
        let velocity = estimate(&motion, Some(1.0), 1.25);
        approx::assert_relative_eq!(Vec3::new(0.0, 0.0, 2.0), velocity.angular, epsilon = 1e-12);
        assert_eq!(Vec3::zeros(), velocity.linear);
    }

    #[test]
    fn no_previous_stamp_is_zero() {
        let motion = Iso3::translation(1.0, 2.0, 3.0);
        assert_eq!(Velocity::zero(), estimate(&motion, None, 5.0));
    }

    #[test]
    fn backward_or_frozen_time_is_zero() {
        let motion = Iso3::translation(1.0, 2.0, 3.0);
        assert_eq!(Velocity::zero(), estimate(&motion, Some(5.0), 5.0));
        assert_eq!(Velocity::zero(), estimate(&motion, Some(5.0), 4.0));
    }

    // PROPERTY TESTS ################################################

    #[quickcheck_macros::quickcheck]
    fn linear_velocity_times_dt_is_translation(x: i16, y: i16, z: i16, millis: u16) -> bool {
        let dt = Float::from(millis) * 1e-3;
        let translation = Vec3::new(x.into(), y.into(), z.into()) * 1e-3;
        let motion = Iso3::translation(translation.x, translation.y, translation.z);
        let velocity = estimate(&motion, Some(10.0), 10.0 + dt);
        if millis == 0 {
            velocity == Velocity::zero()
        } else {
            approx::relative_eq!(translation, velocity.linear * dt, epsilon = 1e-9)
        }
    }
}
