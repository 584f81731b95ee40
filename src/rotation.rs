// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;
use percent_encoding::utf8_percent_encode;
use serde::Deserialize;
use url::form_urlencoded;

/// Default scheme name for rotation-enabled locators.
///
/// Historic deployments used `lumberjack`; set
/// [`Config::rotation_scheme`](crate::Config::rotation_scheme) to stay
/// compatible with them.
pub const ROTATION_SCHEME: &str = "rotation";

/// Characters escaped when a filesystem path is embedded in a locator.
const PATH_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Log file rotation parameters for a single destination.
///
/// All numeric fields are non-negative; zero means "no limit / underlying
/// default". Once attached to a [`PathTransformer`](crate::PathTransformer)
/// the policy is never mutated.
///
/// The field names accepted during deserialization match the configuration
/// surface: `maxsize`, `maxage`, `maxbackups`, `localtime`, `compress`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Rotation {
    /// Maximum size of the log file in megabytes before it is rotated.
    #[serde(rename = "maxsize")]
    pub max_size: u32,

    /// Maximum number of days to retain rotated files.
    #[serde(rename = "maxage")]
    pub max_age: u32,

    /// Maximum number of rotated files to retain.
    #[serde(rename = "maxbackups")]
    pub max_backups: u32,

    /// Use local time in rotated file names. The default is false, meaning
    /// UTC. This does not affect timestamps inside log records.
    #[serde(rename = "localtime")]
    pub local_time: bool,

    /// Gzip rotated files.
    pub compress: bool,
}

impl Rotation {
    /// Query parameters encoding this policy, keys in lexical order.
    ///
    /// Zero and false values are omitted so that a default policy produces an
    /// empty query and locators stay minimal and deterministic.
    pub(crate) fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if self.compress {
            params.push(("compress", "true".to_owned()));
        }
        if self.local_time {
            params.push(("localTime", "true".to_owned()));
        }
        if self.max_age > 0 {
            params.push(("maxAge", self.max_age.to_string()));
        }
        if self.max_backups > 0 {
            params.push(("maxBackups", self.max_backups.to_string()));
        }
        if self.max_size > 0 {
            params.push(("maxSize", self.max_size.to_string()));
        }
        params
    }

    /// Renders a rotation locator for `path` under the given scheme.
    ///
    /// # Examples
    ///
    /// ```
    /// use logwright::ROTATION_SCHEME;
    /// use logwright::Rotation;
    ///
    /// let rotation = Rotation {
    ///     max_age: 10,
    ///     ..Default::default()
    /// };
    /// assert_eq!(
    ///     rotation.to_locator(ROTATION_SCHEME, "/var/log/app.json"),
    ///     "rotation:///var/log/app.json?maxAge=10"
    /// );
    /// ```
    pub fn to_locator(&self, scheme: &str, path: &str) -> String {
        let mut locator = format!("{scheme}://{}", utf8_percent_encode(path, PATH_ESCAPES));
        let params = self.query_params();
        if !params.is_empty() {
            let mut query = form_urlencoded::Serializer::new(String::new());
            for (key, value) in &params {
                query.append_pair(key, value);
            }
            locator.push('?');
            locator.push_str(&query.finish());
        }
        locator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_defaults_are_omitted() {
        assert!(Rotation::default().query_params().is_empty());
    }

    #[test]
    fn test_query_params_lexical_order() {
        let rotation = Rotation {
            max_size: 93723,
            max_age: 156,
            max_backups: 483,
            local_time: true,
            compress: true,
        };
        let keys = rotation
            .query_params()
            .into_iter()
            .map(|(key, _)| key)
            .collect::<Vec<_>>();
        assert_eq!(keys, ["compress", "localTime", "maxAge", "maxBackups", "maxSize"]);
    }

    #[test]
    fn test_to_locator() {
        assert_eq!(
            Rotation::default().to_locator(ROTATION_SCHEME, "/var/log/foo.json"),
            "rotation:///var/log/foo.json"
        );
        assert_eq!(
            Rotation {
                max_size: 459,
                max_age: 77,
                max_backups: 1774,
                local_time: true,
                compress: true,
            }
            .to_locator(ROTATION_SCHEME, "/test.json"),
            "rotation:///test.json?compress=true&localTime=true&maxAge=77&maxBackups=1774&maxSize=459"
        );
        assert_eq!(
            Rotation::default().to_locator("lumberjack", "/defaults.log"),
            "lumberjack:///defaults.log"
        );
    }

    #[test]
    fn test_to_locator_escapes_path() {
        assert_eq!(
            Rotation::default().to_locator(ROTATION_SCHEME, "/var/log/app log.json"),
            "rotation:///var/log/app%20log.json"
        );
    }

    #[test]
    fn test_deserialize_config_keys() {
        let rotation: Rotation =
            serde_json::from_str(r#"{"maxsize": 47, "maxbackups": 5, "compress": true}"#).unwrap();
        assert_eq!(
            rotation,
            Rotation {
                max_size: 47,
                max_age: 0,
                max_backups: 5,
                local_time: false,
                compress: true,
            }
        );
    }
}
