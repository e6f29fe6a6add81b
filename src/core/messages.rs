// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Records emitted by the odometer, mirroring the usual robotics
//! `nav_msgs/Odometry`, `geometry_msgs/PoseStamped` and
//! `geometry_msgs/TransformStamped` messages.

use serde::{Serialize, Serializer};

use crate::misc::type_aliases::{Float, Iso3, Vec3};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    /// Timestamp in seconds.
    pub stamp: f64,
    pub frame_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector3 {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quaternion {
    pub x: Float,
    pub y: Float,
    pub z: Float,
    pub w: Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    pub position: Vector3,
    pub orientation: Quaternion,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Twist {
    pub linear: Vector3,
    pub angular: Vector3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub translation: Vector3,
    pub rotation: Quaternion,
}

/// Row major 6x6 covariance over (x, y, z, rotation about x, y, z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Covariance(pub [Float; 36]);

impl Serialize for Covariance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseWithCovariance {
    pub pose: Pose,
    /// Not estimated by the odometer, always `None`.
    pub covariance: Option<Covariance>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwistWithCovariance {
    pub twist: Twist,
    pub covariance: Covariance,
}

/// Position and velocity estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Odometry {
    pub header: Header,
    pub child_frame_id: String,
    pub pose: PoseWithCovariance,
    pub twist: TwistWithCovariance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseStamped {
    pub header: Header,
    pub pose: Pose,
}

/// Pose of `child_frame_id` in `header.frame_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformStamped {
    pub header: Header,
    pub child_frame_id: String,
    pub transform: Transform,
}

// CONVERSIONS #######################################################

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Vector3 {
        Vector3 {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Vec3 {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<&Iso3> for Pose {
    fn from(iso: &Iso3) -> Pose {
        let q = iso.rotation.into_inner().coords;
        Pose {
            position: iso.translation.vector.into(),
            orientation: Quaternion {
                x: q.x,
                y: q.y,
                z: q.z,
                w: q.w,
            },
        }
    }
}

impl From<&Iso3> for Transform {
    fn from(iso: &Iso3) -> Transform {
        let pose = Pose::from(iso);
        Transform {
            translation: pose.position,
            rotation: pose.orientation,
        }
    }
}

impl Pose {
    /// Rigid body motion described by this pose.
    pub fn to_isometry(&self) -> Iso3 {
        let q = self.orientation;
        let rotation = nalgebra::UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(
            q.w, q.x, q.y, q.z,
        ));
        Iso3::from_parts(Vec3::from(self.position).into(), rotation)
    }
}

// TESTS #############################################################
