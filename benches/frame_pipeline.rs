// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::{criterion_group, criterion_main, Criterion};
use stereo_odometer::core::engine::{EngineError, MotionEstimate, MotionStatus, VisualOdometry};
use stereo_odometer::core::publish::RecordingSink;
use stereo_odometer::core::transform::StaticTransforms;
use stereo_odometer::misc::type_aliases::{Iso3, Mat6};
use stereo_odometer::{CameraInfo, MonoImage, OdometerConfig, StereoCalibration, StereoFrame, StereoOdometer};

/// Engine moving forward by 1cm at every frame.
struct ForwardEngine {
    pose: Iso3,
}

impl VisualOdometry for ForwardEngine {
    fn process(&mut self, _frame: &StereoFrame) -> MotionEstimate {
        let motion = Iso3::translation(0.0, 0.0, 0.01);
        self.pose *= motion;
        MotionEstimate {
            status: MotionStatus::Success,
            pose: self.pose,
            motion,
            covariance: Mat6::identity(),
        }
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let left = CameraInfo {
        width: 640,
        height: 480,
        k: [525.0, 0.0, 319.5, 0.0, 525.0, 239.5, 0.0, 0.0, 1.0],
        p: [525.0, 0.0, 319.5, 0.0, 0.0, 525.0, 239.5, 0.0, 0.0, 0.0, 1.0, 0.0],
    };
    let mut right = left.clone();
    right.p[3] = -525.0 * 0.12;
    let mut transforms = StaticTransforms::new();
    transforms.insert("base_link", "camera", Iso3::translation(0.2, 0.0, 0.3));
    let builder = |_: &StereoCalibration| {
        Ok::<_, EngineError>(ForwardEngine {
            pose: Iso3::identity(),
        })
    };
    let mut odometer = StereoOdometer::new(
        &OdometerConfig::default(),
        builder,
        transforms,
        RecordingSink::new(),
    );
    let mut frame = StereoFrame::new(
        0.0,
        MonoImage::filled(640, 480, 0),
        MonoImage::filled(640, 480, 0),
    );

    c.bench_function("process 640x480 stereo frame", |b| {
        b.iter(|| {
            frame.timestamp += 0.05;
            let outcome = odometer.process(&frame, &left, &right);
            odometer.sink_mut().odometry.clear();
            odometer.sink_mut().poses.clear();
            odometer.sink_mut().transforms.clear();
            outcome
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
