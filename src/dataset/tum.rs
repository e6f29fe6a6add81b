// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Trajectories in the TUM RGB-D text format.
//!
//! One line per pose: `timestamp tx ty tz qx qy qz qw`,
//! lines starting with `#` are comments.
//! A `TrajectorySink` records the published poses in this format,
//! so that they can be compared with ground truth by the usual tools.

use log::error;
use std::fmt;
use std::io::Write;

use crate::core::messages::{Odometry, PoseStamped, TransformStamped};
use crate::core::publish::OdometrySink;
use crate::misc::type_aliases::Iso3;

/// Timestamp and 3D pose of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Timestamp of the frame.
    pub timestamp: f64,
    /// Pose (rigid body motion / direct isometry) of the frame.
    pub pose: Iso3,
}

/// Write Frame data in the TUM RGB-D format for trajectories.
impl fmt::Display for Frame {
    /// `timestamp tx ty tz qx qy qz qw`
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let t = self.pose.translation.vector;
        let q = self.pose.rotation.into_inner().coords;
        write!(
            f,
            "{} {} {} {} {} {} {} {}",
            self.timestamp, t.x, t.y, t.z, q.x, q.y, q.z, q.w
        )
    }
}

/// Writes every published pose as a trajectory line.
/// Odometry and transform records are ignored.
pub struct TrajectorySink<W: Write> {
    writer: W,
}

impl<W: Write> TrajectorySink<W> {
    pub fn new(writer: W) -> Self {
        TrajectorySink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OdometrySink for TrajectorySink<W> {
    fn publish_odometry(&mut self, _odometry: &Odometry) {}

    fn publish_pose(&mut self, pose: &PoseStamped) {
        let frame = Frame {
            timestamp: pose.header.stamp,
            pose: pose.pose.to_isometry(),
        };
        if let Err(err) = writeln!(self.writer, "{}", frame) {
            error!("Could not write trajectory line: {}", err);
        }
    }

    fn send_transform(&mut self, _transform: &TransformStamped) {}
}

/// Parse trajectory files.
pub mod parse {
    use super::*;
    use nalgebra::{Quaternion, Translation3, UnitQuaternion};
    use nom::{
        bytes::complete::tag,
        character::complete::{space0, space1},
        combinator::{all_consuming, map, rest},
        multi::count,
        number::complete::double,
        sequence::{preceded, terminated},
        IResult,
    };

    /// Parse a trajectory file into a vector of `Frame`.
    /// Comments and blank lines are skipped.
    pub fn trajectory(file_content: &str) -> Result<Vec<Frame>, String> {
        let mut frames = Vec::new();
        for (line_number, line) in file_content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || comment(line).is_ok() {
                continue;
            }
            match all_consuming(terminated(frame, space0))(line) {
                Ok((_, frame)) => frames.push(frame),
                Err(_) => return Err(format!("Parsing error at line {}", line_number + 1)),
            }
        }
        Ok(frames)
    }

    // nom parsers #############################################################

    // Parse a comment line.
    fn comment(input: &str) -> IResult<&str, &str> {
        preceded(tag("#"), rest)(input)
    }

    // Parse a timestamp followed by the seven pose components.
    fn frame(input: &str) -> IResult<&str, Frame> {
        let (input, timestamp) = double(input)?;
        map(count(preceded(space1, double), 7), move |v| Frame {
            timestamp,
            pose: pose(&v),
        })(input)
    }

    fn pose(v: &[f64]) -> Iso3 {
        let translation = Translation3::new(v[0], v[1], v[2]);
        let rotation = UnitQuaternion::from_quaternion(Quaternion::new(v[6], v[3], v[4], v[5]));
        Iso3::from_parts(translation, rotation)
    }
} // pub mod parse

// TESTS #############################################################
