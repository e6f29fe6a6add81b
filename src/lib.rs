// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Stereo odometer.
//!
//! Turns the output of a stereo visual odometry engine into a stream of
//! odometry records, stamped poses and odom to base link transforms.
//!
//! The engine is provided by the user, through the `VisualOdometry` and
//! `EngineBuilder` traits, and built lazily from the first stereo calibration.
//! Outputs go to an `OdometrySink` and the camera mounting extrinsic
//! is queried from a `TransformLookup`.
//!
//! ```ignore
//! let mut odometer = StereoOdometer::new(&config, builder, transforms, sink);
//! for (frame, left_info, right_info) in stereo_stream {
//!     match odometer.process(&frame, &left_info, &right_info) {
//!         Ok(FrameOutcome::Published) => {}
//!         Ok(FrameOutcome::TrackingFailed(status)) => eprintln!("lost: {}", status),
//!         Err(err) => eprintln!("{}", err),
//!     }
//! }
//! ```

pub mod config;
pub mod core;
pub mod dataset;
pub mod error;
pub mod math;
pub mod misc;

pub use crate::config::OdometerConfig;
pub use crate::core::calibration::{CameraInfo, StereoCalibration};
pub use crate::core::engine::{EngineBuilder, MotionEstimate, MotionStatus, VisualOdometry};
pub use crate::core::frame::{MonoImage, StereoFrame};
pub use crate::core::odometer::{FrameOutcome, StereoOdometer};
pub use crate::core::publish::OdometrySink;
pub use crate::core::transform::TransformLookup;
pub use crate::error::Error;
