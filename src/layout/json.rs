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

use jiff::Zoned;
use log::Record;
use serde_json::Map;
use serde_json::Value;

use crate::encode;
use crate::encode::EncoderSettings;
use crate::kv::collect_kvs;
use crate::layout::Layout;

/// A layout that formats each log record as one JSON object.
///
/// Output format (default settings):
///
/// ```json
/// {"level":"info","msg":"started","name":"app","ts":"2024-08-11T22:44:57+08:00"}
/// ```
///
/// The keys and the level/time/caller encodings are governed by
/// [`EncoderSettings`]; static fields and the record's own key-value pairs are
/// merged into the object.
#[derive(Debug, Clone, Default)]
pub struct JsonLayout {
    settings: EncoderSettings,
    fields: Vec<(String, Value)>,
    development: bool,
}

impl JsonLayout {
    /// Creates a layout with the given resolved encoder settings.
    pub fn new(settings: EncoderSettings) -> Self {
        JsonLayout {
            settings,
            fields: Vec::new(),
            development: false,
        }
    }

    /// Attaches static fields rendered on every record.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<(String, Value)>) -> Self {
        self.fields = fields;
        self
    }

    /// Lowers the stacktrace threshold from error to warn.
    #[must_use]
    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    pub(crate) fn format(&self, record: &Record) -> anyhow::Result<Vec<u8>> {
        let settings = &self.settings;
        let mut object = Map::new();

        if let Some(key) = &settings.time_key {
            object.insert(key.clone(), settings.encode_time.encode_value(&Zoned::now()));
        }
        if let Some(key) = &settings.level_key {
            object.insert(
                key.clone(),
                settings.encode_level.encode(record.level()).into(),
            );
        }
        if let Some(key) = &settings.name_key {
            object.insert(
                key.clone(),
                settings.encode_name.encode(record.target()).into(),
            );
        }
        if let Some(key) = &settings.caller_key {
            if let (Some(file), Some(line)) = (record.file(), record.line()) {
                object.insert(key.clone(), settings.encode_caller.encode(file, line).into());
            }
        }
        if let Some(key) = &settings.message_key {
            object.insert(key.clone(), record.args().to_string().into());
        }
        if let Some(stack) =
            encode::capture_stacktrace(settings, record.level(), self.development)
        {
            if let Some(key) = &settings.stacktrace_key {
                object.insert(key.clone(), stack.into());
            }
        }

        for (key, value) in &self.fields {
            object.insert(key.clone(), value.clone());
        }
        for (key, value) in collect_kvs(record.key_values()) {
            object.insert(key, value.into());
        }

        let mut bytes = serde_json::to_vec(&object)?;
        bytes.extend_from_slice(settings.line_ending.as_bytes());
        Ok(bytes)
    }
}

impl From<JsonLayout> for Layout {
    fn from(layout: JsonLayout) -> Self {
        Layout::Json(layout)
    }
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::*;
    use crate::encode::EncoderConfig;

    fn render(layout: &JsonLayout, level: Level) -> Map<String, Value> {
        let kvs: &[(&str, &str)] = &[("user", "alice")];
        let bytes = layout
            .format(
                &log::Record::builder()
                    .args(format_args!("started"))
                    .level(level)
                    .target("app")
                    .file(Some("src/main.rs"))
                    .line(Some(7))
                    .key_values(&kvs)
                    .build(),
            )
            .unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_default_keys() {
        let object = render(&JsonLayout::default(), Level::Info);
        assert_eq!(object["msg"], "started");
        assert_eq!(object["level"], "info");
        assert_eq!(object["name"], "app");
        assert!(object.contains_key("ts"));
        assert!(!object.contains_key("caller"));
        assert_eq!(object["user"], "alice");
    }

    #[test]
    fn test_configured_keys_and_encoders() {
        let config = EncoderConfig {
            message_key: "message".to_owned(),
            caller_key: "caller".to_owned(),
            encode_level: "capital".to_owned(),
            encode_time: "epoch".to_owned(),
            ..Default::default()
        };
        let object = render(&JsonLayout::new(config.resolve()), Level::Warn);
        assert_eq!(object["message"], "started");
        assert_eq!(object["level"], "WARN");
        assert_eq!(object["caller"], "src/main.rs:7");
        assert!(object["ts"].is_i64());
    }

    #[test]
    fn test_static_fields_merge() {
        let layout = JsonLayout::default().with_fields(vec![
            ("region".to_owned(), Value::from("us-east-1")),
            ("shard".to_owned(), Value::from(3)),
        ]);
        let object = render(&layout, Level::Info);
        assert_eq!(object["region"], "us-east-1");
        assert_eq!(object["shard"], 3);
    }

    #[test]
    fn test_stacktrace_thresholds() {
        let config = EncoderConfig {
            stacktrace_key: "stacktrace".to_owned(),
            ..Default::default()
        };
        let layout = JsonLayout::new(config.resolve());
        assert!(render(&layout, Level::Error).contains_key("stacktrace"));
        assert!(!render(&layout, Level::Warn).contains_key("stacktrace"));

        let dev = layout.clone().development(true);
        assert!(render(&dev, Level::Warn).contains_key("stacktrace"));
        assert!(!render(&dev, Level::Info).contains_key("stacktrace"));
    }
}
