// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Conversion of stereo camera calibration descriptors into
//! the parameters required by a stereo odometry engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::misc::type_aliases::{Float, Iso3};

/// Calibration descriptor of one rectified camera,
/// in the layout of the usual camera info messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraInfo {
    pub width: u32,
    pub height: u32,
    /// Row major 3x3 intrinsic matrix of the raw camera.
    /// Only the rectified projection `p` is used to calibrate the engine.
    pub k: [Float; 9],
    /// Row major 3x4 projection matrix of the rectified camera.
    ///
    /// ```text
    /// [fx'  0  cx' Tx]
    /// [ 0  fy' cy' Ty]
    /// [ 0   0   1   0]
    /// ```
    ///
    /// For the right camera of a stereo pair, `Tx = -fx' * baseline`.
    pub p: [Float; 12],
}

impl CameraInfo {
    fn fx(&self) -> Float {
        self.p[0]
    }
    fn fy(&self) -> Float {
        self.p[5]
    }
    fn cx(&self) -> Float {
        self.p[2]
    }
    fn cy(&self) -> Float {
        self.p[6]
    }
    fn tx(&self) -> Float {
        self.p[3]
    }
}

/// Intrinsic parameters of one camera.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraIntrinsics {
    pub fx: Float,
    pub fy: Float,
    pub cx: Float,
    pub cy: Float,
    pub width: u32,
    pub height: u32,
}

/// Calibration of a rectified stereo pair.
/// Built once from the first pair of calibration descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoCalibration {
    pub left: CameraIntrinsics,
    pub right: CameraIntrinsics,
    /// Pose of the right camera in the left camera frame.
    /// Images are rectified, so the rotation is always the identity.
    pub right_to_left: Iso3,
}

/// Calibration descriptors that cannot describe a rectified stereo pair.
#[derive(Debug, Error, PartialEq)]
pub enum CalibrationError {
    #[error("{side} camera has an empty resolution {width}x{height}")]
    EmptyResolution {
        side: &'static str,
        width: u32,
        height: u32,
    },

    #[error("{side} camera has an invalid focal length ({fx}, {fy})")]
    InvalidFocal {
        side: &'static str,
        fx: Float,
        fy: Float,
    },

    #[error("left and right resolutions differ")]
    ResolutionMismatch,

    #[error("invalid stereo baseline: {0}")]
    InvalidBaseline(Float),
}

impl CameraIntrinsics {
    fn from_camera_info(side: &'static str, info: &CameraInfo) -> Result<Self, CalibrationError> {
        if info.width == 0 || info.height == 0 {
            return Err(CalibrationError::EmptyResolution {
                side,
                width: info.width,
                height: info.height,
            });
        }
        let (fx, fy) = (info.fx(), info.fy());
        if !(fx.is_finite() && fy.is_finite() && fx > 0.0 && fy > 0.0) {
            return Err(CalibrationError::InvalidFocal { side, fx, fy });
        }
        Ok(CameraIntrinsics {
            fx,
            fy,
            cx: info.cx(),
            cy: info.cy(),
            width: info.width,
            height: info.height,
        })
    }
}

impl StereoCalibration {
    /// Build the stereo calibration from left and right descriptors.
    pub fn from_camera_info(left: &CameraInfo, right: &CameraInfo) -> Result<Self, CalibrationError> {
        let left_intrinsics = CameraIntrinsics::from_camera_info("left", left)?;
        let right_intrinsics = CameraIntrinsics::from_camera_info("right", right)?;
        if (left.width, left.height) != (right.width, right.height) {
            return Err(CalibrationError::ResolutionMismatch);
        }
        let baseline = -right.tx() / right.fx();
        if !baseline.is_finite() || baseline == 0.0 {
            return Err(CalibrationError::InvalidBaseline(baseline));
        }
        Ok(StereoCalibration {
            left: left_intrinsics,
            right: right_intrinsics,
            right_to_left: Iso3::translation(-baseline, 0.0, 0.0),
        })
    }

    /// Distance between the two optical centers.
    pub fn baseline(&self) -> Float {
        -self.right_to_left.translation.vector.x
    }
}

// TESTS #############################################################
