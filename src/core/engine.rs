// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Boundary with the stereo visual odometry engine.
//!
//! The engine itself is opaque: anything able to turn a stereo frame
//! into a `MotionEstimate` implements `VisualOdometry`.
//! An `EngineBinding` owns the engine and builds it lazily,
//! once, when the first calibration is available.

use std::fmt;
use thiserror::Error;

use crate::core::calibration::StereoCalibration;
use crate::core::frame::StereoFrame;
use crate::misc::type_aliases::{Iso3, Mat6};

/// Status of the motion estimation for the last processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionStatus {
    NoData,
    Success,
    InsufficientInliers,
    OptimizationFailure,
    ReprojectionErrorTooHigh,
}

impl MotionStatus {
    /// Only `Success` allows to use the estimate.
    pub fn is_success(self) -> bool {
        self == MotionStatus::Success
    }

    /// Human readable name of the status code.
    pub fn description(self) -> &'static str {
        match self {
            MotionStatus::NoData => "NO_DATA",
            MotionStatus::Success => "SUCCESS",
            MotionStatus::InsufficientInliers => "INSUFFICIENT_INLIERS",
            MotionStatus::OptimizationFailure => "OPTIMIZATION_FAILURE",
            MotionStatus::ReprojectionErrorTooHigh => "REPROJECTION_ERROR",
        }
    }
}

impl fmt::Display for MotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Result of processing one stereo frame.
#[derive(Debug, Clone)]
pub struct MotionEstimate {
    pub status: MotionStatus,
    /// Pose of the camera relative to the reference frame (first successful frame).
    pub pose: Iso3,
    /// Incremental motion between the previous frame and this one.
    pub motion: Iso3,
    /// Covariance of the incremental motion, over (translation, rotation).
    pub covariance: Mat6,
}

impl MotionEstimate {
    /// Estimate carrying a failure status, with identity poses and a zero covariance.
    pub fn failed(status: MotionStatus) -> MotionEstimate {
        MotionEstimate {
            status,
            pose: Iso3::identity(),
            motion: Iso3::identity(),
            covariance: Mat6::zeros(),
        }
    }
}

/// A stereo visual odometry engine.
pub trait VisualOdometry {
    /// Process a new stereo frame, already checked by `StereoFrame::validate`.
    fn process(&mut self, frame: &StereoFrame) -> MotionEstimate;
}

/// Construction of an engine from a stereo calibration.
pub trait EngineBuilder {
    type Engine: VisualOdometry;

    fn build(&mut self, calibration: &StereoCalibration) -> Result<Self::Engine, EngineError>;
}

impl<F, E> EngineBuilder for F
where
    F: FnMut(&StereoCalibration) -> Result<E, EngineError>,
    E: VisualOdometry,
{
    type Engine = E;

    fn build(&mut self, calibration: &StereoCalibration) -> Result<E, EngineError> {
        self(calibration)
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("the odometry engine is not initialized")]
    NotInitialized,

    #[error("could not build the odometry engine: {0}")]
    Construction(String),
}

/// Lifecycle state of an `EngineBinding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Ready,
}

/// Exclusive owner of the odometry engine.
/// Once built, the engine is never replaced.
pub struct EngineBinding<B: EngineBuilder> {
    builder: B,
    engine: Option<B::Engine>,
}

impl<B: EngineBuilder> EngineBinding<B> {
    pub fn new(builder: B) -> Self {
        EngineBinding {
            builder,
            engine: None,
        }
    }

    pub fn state(&self) -> EngineState {
        match self.engine {
            None => EngineState::Uninitialized,
            Some(_) => EngineState::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    /// Build the engine if it does not exist yet.
    /// Does nothing when the binding is already ready.
    /// On failure the binding stays uninitialized.
    pub fn initialize(&mut self, calibration: &StereoCalibration) -> Result<(), EngineError> {
        if self.engine.is_none() {
            self.engine = Some(self.builder.build(calibration)?);
        }
        Ok(())
    }

    /// Forward a frame to the engine.
    pub fn process(&mut self, frame: &StereoFrame) -> Result<MotionEstimate, EngineError> {
        match self.engine.as_mut() {
            Some(engine) => Ok(engine.process(frame)),
            None => Err(EngineError::NotInitialized),
        }
    }
}

// TESTS #############################################################

#[cfg(test)]
mod tests {

    use super::*;
    use crate::core::calibration::CameraIntrinsics;
    use crate::core::frame::MonoImage;

    struct CountingEngine {
        nb_frames: usize,
    }

    impl VisualOdometry for CountingEngine {
        fn process(&mut self, _frame: &StereoFrame) -> MotionEstimate {
            self.nb_frames += 1;
            MotionEstimate::failed(MotionStatus::NoData)
        }
    }

    fn calibration() -> StereoCalibration {
        let intrinsics = CameraIntrinsics {
            fx: 500.0,
            fy: 500.0,
            cx: 2.0,
            cy: 1.5,
            width: 4,
            height: 3,
        };
        StereoCalibration {
            left: intrinsics.clone(),
            right: intrinsics,
            right_to_left: Iso3::translation(-0.1, 0.0, 0.0),
        }
    }

    fn frame() -> StereoFrame {
        StereoFrame::new(0.0, MonoImage::filled(4, 3, 0), MonoImage::filled(4, 3, 0))
    }

    #[test]
    fn process_before_initialize_fails() {
        let mut binding = EngineBinding::new(|_: &StereoCalibration| {
            Ok::<_, EngineError>(CountingEngine { nb_frames: 0 })
        });
        assert_eq!(EngineState::Uninitialized, binding.state());
        match binding.process(&frame()) {
            Err(EngineError::NotInitialized) => (),
            other => panic!("unexpected result: {:?}", other.map(|e| e.status)),
        }
    }

    #[test]
    fn engine_is_built_only_once() {
        let mut nb_builds = 0;
        let mut binding = EngineBinding::new(|_: &StereoCalibration| {
            nb_builds += 1;
            Ok::<_, EngineError>(CountingEngine { nb_frames: 0 })
        });
        binding.initialize(&calibration()).unwrap();
        binding.process(&frame()).unwrap();
        binding.initialize(&calibration()).unwrap();
        binding.process(&frame()).unwrap();
        assert_eq!(EngineState::Ready, binding.state());
        assert_eq!(Some(2), binding.engine.as_ref().map(|e| e.nb_frames));
        drop(binding);
        assert_eq!(1, nb_builds);
    }

    #[test]
    fn failed_build_stays_uninitialized() {
        let mut binding = EngineBinding::new(|_: &StereoCalibration| {
            Err::<CountingEngine, _>(EngineError::Construction("no memory".to_string()))
        });
        assert!(binding.initialize(&calibration()).is_err());
        assert!(!binding.is_ready());
    }

    #[test]
    fn only_success_is_success() {
        let statuses = [
            MotionStatus::NoData,
            MotionStatus::InsufficientInliers,
            MotionStatus::OptimizationFailure,
            MotionStatus::ReprojectionErrorTooHigh,
        ];
        assert!(MotionStatus::Success.is_success());
        assert!(statuses.iter().all(|s| !s.is_success()));
        assert_eq!("INSUFFICIENT_INLIERS", MotionStatus::InsufficientInliers.to_string());
    }
}
