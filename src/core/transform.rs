// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Correction of the camera pose by the base to sensor mounting extrinsic.
//!
//! The odometry engine tracks the camera, but the transform tree expects
//! the motion of the robot base. The base to sensor extrinsic is queried
//! at every frame from a `TransformLookup`. When it is not available,
//! the identity is assumed and a throttled warning is emitted.

use log::{debug, warn};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::misc::type_aliases::Iso3;

/// Minimum duration between two warnings about a missing extrinsic.
pub const WARN_PERIOD: Duration = Duration::from_secs(10);

/// Transform queries answered by a transform service.
pub trait TransformLookup {
    /// Latest available transform mapping coordinates in `source_frame`
    /// to coordinates in `target_frame`, i.e. the pose of `source_frame` in `target_frame`.
    fn lookup(&self, target_frame: &str, source_frame: &str) -> Result<Iso3, LookupError>;
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LookupError {
    #[error("no transform from '{source_frame}' to '{target_frame}'")]
    Unavailable {
        target_frame: String,
        source_frame: String,
    },

    #[error("transform service unreachable: {0}")]
    Service(String),
}

/// Registry of static transforms between named frames.
///
/// Answers direct and inverse queries, no chaining is performed.
#[derive(Debug, Clone, Default)]
pub struct StaticTransforms {
    transforms: HashMap<(String, String), Iso3>,
}

impl StaticTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the pose of `child` in `parent`.
    pub fn insert(&mut self, parent: &str, child: &str, transform: Iso3) {
        self.transforms
            .insert((parent.to_string(), child.to_string()), transform);
    }

    pub fn remove(&mut self, parent: &str, child: &str) -> Option<Iso3> {
        self.transforms
            .remove(&(parent.to_string(), child.to_string()))
    }
}

impl TransformLookup for StaticTransforms {
    fn lookup(&self, target_frame: &str, source_frame: &str) -> Result<Iso3, LookupError> {
        if target_frame == source_frame {
            return Ok(Iso3::identity());
        }
        let key = |a: &str, b: &str| (a.to_string(), b.to_string());
        if let Some(transform) = self.transforms.get(&key(target_frame, source_frame)) {
            Ok(*transform)
        } else if let Some(transform) = self.transforms.get(&key(source_frame, target_frame)) {
            Ok(transform.inverse())
        } else {
            Err(LookupError::Unavailable {
                target_frame: target_frame.to_string(),
                source_frame: source_frame.to_string(),
            })
        }
    }
}

impl<L: TransformLookup + ?Sized> TransformLookup for &L {
    fn lookup(&self, target_frame: &str, source_frame: &str) -> Result<Iso3, LookupError> {
        (**self).lookup(target_frame, source_frame)
    }
}

/// Query a transform, substituting the identity when it is not available.
/// The boolean tells if the transform was found.
pub fn lookup_or_identity<L: TransformLookup + ?Sized>(
    lookup: &L,
    target_frame: &str,
    source_frame: &str,
) -> (Iso3, bool) {
    match lookup.lookup(target_frame, source_frame) {
        Ok(transform) => (transform, true),
        Err(err) => {
            debug!("Transform error: {}", err);
            (Iso3::identity(), false)
        }
    }
}

/// Express `pose` in the basis given by `extrinsic`: `extrinsic * pose * extrinsic^-1`.
pub fn conjugate(extrinsic: &Iso3, pose: &Iso3) -> Iso3 {
    extrinsic * pose * extrinsic.inverse()
}

/// Rate limiter for repeated log messages.
#[derive(Debug, Clone)]
pub struct Throttle {
    period: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(period: Duration) -> Throttle {
        Throttle { period, last: None }
    }

    /// True if nothing was let through during the last `period` before `now`.
    pub fn ready(&mut self, now: Instant) -> bool {
        let ready = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.period,
        };
        if ready {
            self.last = Some(now);
        }
        ready
    }
}

/// Turns camera poses into base poses.
#[derive(Debug, Clone)]
pub struct FrameCorrector {
    base_link_frame_id: String,
    sensor_frame_id: String,
    warn_throttle: Throttle,
}

impl FrameCorrector {
    pub fn new(base_link_frame_id: &str, sensor_frame_id: &str) -> FrameCorrector {
        FrameCorrector {
            base_link_frame_id: base_link_frame_id.to_string(),
            sensor_frame_id: sensor_frame_id.to_string(),
            warn_throttle: Throttle::new(WARN_PERIOD),
        }
    }

    /// Base to sensor extrinsic, or the identity if it is not available yet.
    pub fn extrinsic<L: TransformLookup + ?Sized>(&mut self, lookup: &L) -> Iso3 {
        let (base_to_sensor, found) =
            lookup_or_identity(lookup, &self.base_link_frame_id, &self.sensor_frame_id);
        if !found && self.warn_throttle.ready(Instant::now()) {
            warn!(
                "The tf from '{}' to '{}' does not seem to be available, will assume it as identity!",
                self.base_link_frame_id, self.sensor_frame_id
            );
        }
        base_to_sensor
    }

    /// Motion of the base corresponding to the camera `pose`.
    pub fn correct<L: TransformLookup + ?Sized>(&mut self, lookup: &L, pose: &Iso3) -> Iso3 {
        conjugate(&self.extrinsic(lookup), pose)
    }
}

// TESTS #############################################################
