// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Configuration of the stereo odometer.
//!
//! Can be loaded from YAML, every field is optional:
//!
//! ```yaml
//! odom_frame_id: odom
//! base_link_frame_id: base_link
//! sensor_frame_id: camera
//! publish_tf: true
//! ```

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OdometerConfig {
    /// Fixed frame in which poses are expressed.
    pub odom_frame_id: String,
    /// Robot reference frame.
    pub base_link_frame_id: String,
    /// Frame of the left camera.
    pub sensor_frame_id: String,
    /// Broadcast the odom to base link transform.
    pub publish_tf: bool,
}

impl Default for OdometerConfig {
    fn default() -> Self {
        OdometerConfig {
            odom_frame_id: "odom".to_string(),
            base_link_frame_id: "base_link".to_string(),
            sensor_frame_id: "camera".to_string(),
            publish_tf: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse configuration: {0}")]
    Parse(String),

    #[error("frame id '{0}' is empty")]
    EmptyFrameId(&'static str),
}

impl OdometerConfig {
    /// Parse, normalize and validate a YAML configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: OdometerConfig =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Same as `from_yaml_str` with the content of a file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }

    /// Strip the legacy leading `/` of frame ids ("/odom" becomes "odom").
    pub fn normalized(self) -> Self {
        let strip = |id: String| id.trim_start_matches('/').to_string();
        OdometerConfig {
            odom_frame_id: strip(self.odom_frame_id),
            base_link_frame_id: strip(self.base_link_frame_id),
            sensor_frame_id: strip(self.sensor_frame_id),
            publish_tf: self.publish_tf,
        }
    }

    /// Check that no frame id is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ids = [
            ("odom_frame_id", &self.odom_frame_id),
            ("base_link_frame_id", &self.base_link_frame_id),
            ("sensor_frame_id", &self.sensor_frame_id),
        ];
        match ids.iter().find(|(_, id)| id.is_empty()) {
            Some(&(name, _)) => Err(ConfigError::EmptyFrameId(name)),
            None => Ok(()),
        }
    }
}

// TESTS #############################################################

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn defaults() {
        let config = OdometerConfig::default();
        assert_eq!("odom", config.odom_frame_id);
        assert_eq!("base_link", config.base_link_frame_id);
        assert_eq!("camera", config.sensor_frame_id);
        assert!(config.publish_tf);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = OdometerConfig::from_yaml_str("publish_tf: false\nsensor_frame_id: stereo_left\n")
            .unwrap();
        assert!(!config.publish_tf);
        assert_eq!("stereo_left", config.sensor_frame_id);
        assert_eq!("odom", config.odom_frame_id);
    }

    #[test]
    fn legacy_slashes_are_stripped() {
        let yaml = "odom_frame_id: /odom\nbase_link_frame_id: /base_link\nsensor_frame_id: /camera\n";
        assert_eq!(OdometerConfig::default(), OdometerConfig::from_yaml_str(yaml).unwrap());
    }

    #[test]
    fn empty_frame_id_is_rejected() {
        match OdometerConfig::from_yaml_str("base_link_frame_id: /\n") {
            Err(ConfigError::EmptyFrameId(name)) => assert_eq!("base_link_frame_id", name),
            other => panic!("unexpected configuration: {:?}", other),
        }
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        match OdometerConfig::from_yaml_str("publish_tf: [1, 2]\n") {
            Err(ConfigError::Parse(_)) => (),
            other => panic!("unexpected configuration: {:?}", other),
        }
    }
}
