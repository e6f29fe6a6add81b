// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors aborting the processing of one stereo frame.

use thiserror::Error;

use crate::core::calibration::CalibrationError;
use crate::core::engine::EngineError;
use crate::core::frame::FrameError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid stereo calibration: {0}")]
    Calibration(#[from] CalibrationError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("invalid stereo frame: {0}")]
    Frame(#[from] FrameError),
}
