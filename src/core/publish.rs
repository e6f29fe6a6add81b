// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Assembly and emission of the odometer outputs.

use itertools::iproduct;
use log::{error, trace};
use serde::Serialize;
use std::io::Write;

use crate::config::OdometerConfig;
use crate::core::messages::{
    Covariance, Header, Odometry, Pose, PoseStamped, PoseWithCovariance, Transform,
    TransformStamped, Twist, TwistWithCovariance,
};
use crate::core::transform::{FrameCorrector, TransformLookup};
use crate::core::velocity::Velocity;
use crate::misc::type_aliases::{Iso3, Mat6};

/// Destination of the odometer outputs.
/// Emission failures are the business of the sink.
pub trait OdometrySink {
    fn publish_odometry(&mut self, odometry: &Odometry);
    fn publish_pose(&mut self, pose: &PoseStamped);
    fn send_transform(&mut self, transform: &TransformStamped);
}

impl<S: OdometrySink + ?Sized> OdometrySink for &mut S {
    fn publish_odometry(&mut self, odometry: &Odometry) {
        (**self).publish_odometry(odometry)
    }
    fn publish_pose(&mut self, pose: &PoseStamped) {
        (**self).publish_pose(pose)
    }
    fn send_transform(&mut self, transform: &TransformStamped) {
        (**self).send_transform(transform)
    }
}

/// Layout of the engine covariance into the outgoing flat array:
/// element `(i, j)` goes to index `j * 6 + i`.
pub fn twist_covariance(cov: &Mat6) -> Covariance {
    let mut flat = [0.0; 36];
    for (i, j) in iproduct!(0..6, 0..6) {
        flat[j * 6 + i] = cov[(i, j)];
    }
    Covariance(flat)
}

/// Inverse of `twist_covariance`.
pub fn covariance_matrix(flat: &Covariance) -> Mat6 {
    Mat6::from_fn(|i, j| flat.0[j * 6 + i])
}

/// Builds the records of a successful frame and sends them to a sink.
#[derive(Debug, Clone)]
pub struct ResultPublisher {
    odom_frame_id: String,
    base_link_frame_id: String,
    publish_tf: bool,
    corrector: FrameCorrector,
}

impl ResultPublisher {
    pub fn new(config: &OdometerConfig) -> ResultPublisher {
        ResultPublisher {
            odom_frame_id: config.odom_frame_id.clone(),
            base_link_frame_id: config.base_link_frame_id.clone(),
            publish_tf: config.publish_tf,
            corrector: FrameCorrector::new(&config.base_link_frame_id, &config.sensor_frame_id),
        }
    }

    /// Odometry record of a pose.
    /// The pose covariance is not estimated and left empty.
    pub fn odometry(&self, stamp: f64, pose: &Iso3, velocity: &Velocity, cov: &Mat6) -> Odometry {
        Odometry {
            header: Header {
                stamp,
                frame_id: self.odom_frame_id.clone(),
            },
            child_frame_id: self.base_link_frame_id.clone(),
            pose: PoseWithCovariance {
                pose: Pose::from(pose),
                covariance: None,
            },
            twist: TwistWithCovariance {
                twist: Twist {
                    linear: velocity.linear.into(),
                    angular: velocity.angular.into(),
                },
                covariance: twist_covariance(cov),
            },
        }
    }

    /// Publish the odometry and pose records,
    /// and the odom to base link transform if enabled.
    pub fn publish<L, S>(
        &mut self,
        lookup: &L,
        sink: &mut S,
        stamp: f64,
        pose: &Iso3,
        velocity: &Velocity,
        cov: &Mat6,
    ) where
        L: TransformLookup + ?Sized,
        S: OdometrySink + ?Sized,
    {
        let odometry = self.odometry(stamp, pose, velocity, cov);
        sink.publish_odometry(&odometry);

        // Stamped with the child frame of the odometry record, not its parent.
        let pose_stamped = PoseStamped {
            header: Header {
                stamp,
                frame_id: odometry.child_frame_id.clone(),
            },
            pose: odometry.pose.pose,
        };
        sink.publish_pose(&pose_stamped);

        if self.publish_tf {
            let base_transform = self.corrector.correct(lookup, pose);
            sink.send_transform(&TransformStamped {
                header: Header {
                    stamp,
                    frame_id: self.odom_frame_id.clone(),
                },
                child_frame_id: self.base_link_frame_id.clone(),
                transform: Transform::from(&base_transform),
            });
        }
        trace!("Published odometry at {}", stamp);
    }
}

// SINKS #############################################################

/// Keeps every emitted record in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub odometry: Vec<Odometry>,
    pub poses: Vec<PoseStamped>,
    pub transforms: Vec<TransformStamped>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of emitted records.
    pub fn len(&self) -> usize {
        self.odometry.len() + self.poses.len() + self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OdometrySink for RecordingSink {
    fn publish_odometry(&mut self, odometry: &Odometry) {
        self.odometry.push(odometry.clone());
    }
    fn publish_pose(&mut self, pose: &PoseStamped) {
        self.poses.push(pose.clone());
    }
    fn send_transform(&mut self, transform: &TransformStamped) {
        self.transforms.push(transform.clone());
    }
}

/// Writes every record as a JSON object on its own line:
/// `{"channel":"odometry","message":{...}}`.
/// Channels are `odometry`, `pose` and `tf`.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

#[derive(Serialize)]
struct Record<'a, T> {
    channel: &'a str,
    message: &'a T,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write<T: Serialize>(&mut self, channel: &str, message: &T) {
        let record = Record { channel, message };
        let result = serde_json::to_writer(&mut self.writer, &record)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(self.writer));
        if let Err(err) = result {
            error!("Could not write {} record: {}", channel, err);
        }
    }
}

impl<W: Write> OdometrySink for JsonLinesSink<W> {
    fn publish_odometry(&mut self, odometry: &Odometry) {
        self.write("odometry", odometry)
    }
    fn publish_pose(&mut self, pose: &PoseStamped) {
        self.write("pose", pose)
    }
    fn send_transform(&mut self, transform: &TransformStamped) {
        self.write("tf", transform)
    }
}

// TESTS #############################################################
