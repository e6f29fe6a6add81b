// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Type aliases for common types used all over the code base.

use nalgebra as na;

/// Odometry messages carry double precision values, so does the library.
pub type Float = f64;

/// A vector with three Float coordinates.
pub type Vec3 = na::Vector3<Float>;

/// A 6x6 matrix of Floats.
pub type Mat6 = na::Matrix6<Float>;

/// A unit quaternion, representing a 3D rotation.
pub type Quat = na::UnitQuaternion<Float>;

/// A direct 3D isometry, also known as rigid body motion.
pub type Iso3 = na::Isometry3<Float>;
