// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Synchronized stereo frames and their preconditions.

use thiserror::Error;

/// A single channel 8 bits image, stored row after row.
/// `step` is the number of bytes between the start of two consecutive rows.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoImage {
    pub width: usize,
    pub height: usize,
    pub step: usize,
    pub data: Vec<u8>,
}

impl MonoImage {
    /// Image with tightly packed rows (`step == width`) filled with `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> MonoImage {
        MonoImage {
            width,
            height,
            step: width,
            data: vec![value; width * height],
        }
    }

    /// Pixel value at column `x` and row `y`.
    pub fn at(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.step + x]
    }
}

/// Rectified left and right images acquired at the same time.
#[derive(Debug, Clone)]
pub struct StereoFrame {
    /// Timestamp in seconds, shared by both images.
    pub timestamp: f64,
    pub left: MonoImage,
    pub right: MonoImage,
}

/// Reasons why a stereo frame cannot be handed to the odometry engine.
/// They all denote a misconfigured image source rather than a transient issue.
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("timestamp is not a finite number: {0}")]
    InvalidTimestamp(f64),

    #[error("left and right row steps differ ({left} != {right})")]
    StepMismatch { left: usize, right: usize },

    #[error("rows are not tightly packed (step {step} != width {width})")]
    NotPacked { step: usize, width: usize },

    #[error("left and right sizes differ ({left_width}x{left_height} != {right_width}x{right_height})")]
    SizeMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },

    #[error("{side} image buffer holds {len} bytes, {expected} expected")]
    Truncated {
        side: &'static str,
        len: usize,
        expected: usize,
    },
}

impl StereoFrame {
    pub fn new(timestamp: f64, left: MonoImage, right: MonoImage) -> StereoFrame {
        StereoFrame {
            timestamp,
            left,
            right,
        }
    }

    /// Check that the timestamp is finite and that both images share the same layout.
    pub fn validate(&self) -> Result<(), FrameError> {
        if !self.timestamp.is_finite() {
            return Err(FrameError::InvalidTimestamp(self.timestamp));
        }
        let (l, r) = (&self.left, &self.right);
        if l.step != r.step {
            return Err(FrameError::StepMismatch {
                left: l.step,
                right: r.step,
            });
        }
        if l.step != l.width {
            return Err(FrameError::NotPacked {
                step: l.step,
                width: l.width,
            });
        }
        if l.width != r.width || l.height != r.height {
            return Err(FrameError::SizeMismatch {
                left_width: l.width,
                left_height: l.height,
                right_width: r.width,
                right_height: r.height,
            });
        }
        for &(side, img) in &[("left", l), ("right", r)] {
            let expected = img.step * img.height;
            if img.data.len() < expected {
                return Err(FrameError::Truncated {
                    side,
                    len: img.data.len(),
                    expected,
                });
            }
        }
        Ok(())
    }
}

// TESTS #############################################################
