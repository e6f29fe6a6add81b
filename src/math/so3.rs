// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Logarithm map of 3D rotations.
//!
//! Turns an incremental rotation into a rotation vector (axis scaled by angle).
//! See Ethan Eade course on Lie Groups: <http://ethaneade.com/lie.pdf>

use crate::misc::type_aliases::{Float, Quat, Vec3};

/// Threshold for using Taylor series in computations.
const EPSILON_TAYLOR_SERIES: Float = 1e-4;
const EPSILON_TAYLOR_SERIES_2: Float = EPSILON_TAYLOR_SERIES * EPSILON_TAYLOR_SERIES;

/// Compute the logarithm map of a rotation, i.e. its rotation vector `axis * angle`.
/// The angle is in `[0, pi]`, the axis sign is flipped accordingly.
pub fn log(rotation: &Quat) -> Vec3 {
    // q and -q are the same rotation, pick the one with a positive real part.
    let (real_factor, imag_vector) = if rotation.scalar() < 0.0 {
        (-rotation.scalar(), -rotation.vector())
    } else {
        (rotation.scalar(), rotation.vector().into_owned())
    };
    let imag_norm_2 = imag_vector.norm_squared();
    if imag_norm_2 < EPSILON_TAYLOR_SERIES_2 {
        (2.0 / real_factor) * imag_vector // TAYLOR
    } else {
        let imag_norm = imag_norm_2.sqrt();
        let theta = 2.0 * imag_norm.atan2(real_factor);
        (theta / imag_norm) * imag_vector
    }
}

// TESTS #############################################################
