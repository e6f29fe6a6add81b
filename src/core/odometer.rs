// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Frame by frame driver of the stereo odometry.
//!
//! A `StereoOdometer` owns the engine binding, the time of the last
//! publication, the transform service and the output sink.
//! Frames are processed one at a time, to completion.

use log::{debug, error, info};

use crate::config::OdometerConfig;
use crate::core::calibration::{CameraInfo, StereoCalibration};
use crate::core::engine::{EngineBinding, EngineBuilder, EngineState, MotionStatus};
use crate::core::frame::StereoFrame;
use crate::core::publish::{OdometrySink, ResultPublisher};
use crate::core::transform::TransformLookup;
use crate::core::velocity;
use crate::error::Error;

/// What happened to a frame that went through the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Odometry, pose (and transform if enabled) were published.
    Published,
    /// The engine could not estimate the motion, nothing was published.
    TrackingFailed(MotionStatus),
}

pub struct StereoOdometer<B, L, S>
where
    B: EngineBuilder,
    L: TransformLookup,
    S: OdometrySink,
{
    binding: EngineBinding<B>,
    publisher: ResultPublisher,
    lookup: L,
    sink: S,
    last_stamp: Option<f64>,
}

impl<B, L, S> StereoOdometer<B, L, S>
where
    B: EngineBuilder,
    L: TransformLookup,
    S: OdometrySink,
{
    /// The engine is built by `builder` when the first frame arrives.
    pub fn new(config: &OdometerConfig, builder: B, lookup: L, sink: S) -> Self {
        StereoOdometer {
            binding: EngineBinding::new(builder),
            publisher: ResultPublisher::new(config),
            lookup,
            sink,
            last_stamp: None,
        }
    }

    pub fn engine_state(&self) -> EngineState {
        self.binding.state()
    }

    /// Timestamp of the last published frame.
    pub fn last_stamp(&self) -> Option<f64> {
        self.last_stamp
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn lookup_mut(&mut self) -> &mut L {
        &mut self.lookup
    }

    /// Process a stereo frame and its calibration.
    ///
    /// The calibration is only used until the engine is built,
    /// which happens before the frame itself is checked.
    /// An error aborts this frame only: a failed initialization is retried
    /// with the next frame, and an invalid frame (mismatched images or
    /// non-finite timestamp) publishes nothing and keeps the last stamp.
    pub fn process(
        &mut self,
        frame: &StereoFrame,
        left_info: &CameraInfo,
        right_info: &CameraInfo,
    ) -> Result<FrameOutcome, Error> {
        if !self.binding.is_ready() {
            self.initialize(left_info, right_info)?;
            debug!("First frame at {}", frame.timestamp);
        }

        frame.validate()?;
        let estimate = self.binding.process(frame)?;

        if !estimate.status.is_success() {
            error!("Stereo odometry failed: {}", estimate.status);
            return Ok(FrameOutcome::TrackingFailed(estimate.status));
        }

        let velocity = velocity::estimate(&estimate.motion, self.last_stamp, frame.timestamp);
        self.publisher.publish(
            &self.lookup,
            &mut self.sink,
            frame.timestamp,
            &estimate.pose,
            &velocity,
            &estimate.covariance,
        );
        self.last_stamp = Some(frame.timestamp);
        Ok(FrameOutcome::Published)
    }

    fn initialize(&mut self, left_info: &CameraInfo, right_info: &CameraInfo) -> Result<(), Error> {
        let calibration = StereoCalibration::from_camera_info(left_info, right_info)
            .map_err(|err| {
                error!("Cannot initialize stereo odometry: {}", err);
                err
            })?;
        self.binding.initialize(&calibration).map_err(|err| {
            error!("Cannot initialize stereo odometry: {}", err);
            err
        })?;
        info!(
            "Initialized stereo odometry (baseline {:.3}m)",
            calibration.baseline()
        );
        Ok(())
    }
}

// TESTS #############################################################
