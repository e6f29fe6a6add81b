// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Core functionalities of the stereo odometer.

pub mod calibration;
pub mod engine;
pub mod frame;
pub mod messages;
pub mod odometer;
pub mod publish;
pub mod transform;
pub mod velocity;
