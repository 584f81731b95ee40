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

use std::fmt::Write as _;

use jiff::Zoned;
use serde_json::Value;

use crate::encode;
use crate::encode::EncoderSettings;
use crate::kv::KvDisplay;
use crate::layout::Layout;

/// A layout that formats log records as separator-delimited console lines.
///
/// Output format (default settings):
///
/// ```text
/// 2024-08-11T22:44:57+08:00	info	app	Hello info!
/// 2024-08-11T22:44:58+08:00	warn	app	Hello warn!	user=alice
/// ```
///
/// Which fields appear, how they are encoded, and the separator between them
/// are all governed by [`EncoderSettings`].
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    settings: EncoderSettings,
    fields: Vec<(String, Value)>,
    development: bool,
}

impl TextLayout {
    /// Creates a layout with the given resolved encoder settings.
    pub fn new(settings: EncoderSettings) -> Self {
        TextLayout {
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

    pub(crate) fn format(&self, record: &log::Record) -> anyhow::Result<Vec<u8>> {
        let settings = &self.settings;
        let separator = settings.console_separator.as_str();
        let mut line = String::new();
        let mut push = |line: &mut String, part: &str| {
            if !line.is_empty() {
                line.push_str(separator);
            }
            line.push_str(part);
        };

        if settings.time_key.is_some() {
            push(&mut line, &settings.encode_time.encode_display(&Zoned::now()));
        }
        if settings.level_key.is_some() {
            push(&mut line, settings.encode_level.encode(record.level()));
        }
        if settings.name_key.is_some() {
            push(&mut line, settings.encode_name.encode(record.target()));
        }
        if settings.caller_key.is_some() {
            if let (Some(file), Some(line_no)) = (record.file(), record.line()) {
                push(&mut line, &settings.encode_caller.encode(file, line_no));
            }
        }
        if settings.message_key.is_some() {
            push(&mut line, &record.args().to_string());
        }

        for (key, value) in &self.fields {
            match value {
                // strings print raw, without JSON quoting
                Value::String(text) => write!(line, "{separator}{key}={text}")?,
                other => write!(line, "{separator}{key}={other}")?,
            }
        }
        write!(line, "{}", KvDisplay::new(record.key_values(), separator))?;

        if let Some(stack) = encode::capture_stacktrace(settings, record.level(), self.development)
        {
            write!(line, "{separator}{stack}")?;
        }

        line.push_str(&settings.line_ending);
        Ok(line.into_bytes())
    }
}

impl From<TextLayout> for Layout {
    fn from(layout: TextLayout) -> Self {
        Layout::Text(layout)
    }
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::*;
    use crate::encode::EncoderConfig;

    fn render(layout: &TextLayout, message: &'static str) -> String {
        let bytes = layout
            .format(
                &log::Record::builder()
                    .args(format_args!("{message}"))
                    .level(Level::Info)
                    .target("app")
                    .file(Some("src/server/conn.rs"))
                    .line(Some(42))
                    .build(),
            )
            .unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_default_layout() {
        let line = render(&TextLayout::default(), "started");
        let parts = line.trim_end().split('\t').collect::<Vec<_>>();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[1], "info");
        assert_eq!(parts[2], "app");
        assert_eq!(parts[3], "started");
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_caller_and_separator() {
        let config = EncoderConfig {
            caller_key: "caller".to_owned(),
            console_separator: " | ".to_owned(),
            ..Default::default()
        };
        let line = render(&TextLayout::new(config.resolve()), "started");
        let parts = line.trim_end().split(" | ").collect::<Vec<_>>();
        assert_eq!(parts[3], "src/server/conn.rs:42");
        assert_eq!(parts[4], "started");
    }

    #[test]
    fn test_static_fields() {
        let layout =
            TextLayout::default().with_fields(vec![("svc".to_owned(), Value::from("api"))]);
        let line = render(&layout, "started");
        assert!(line.contains("\tsvc=api"), "{line:?}");
    }

    #[test]
    fn test_disabled_keys_drop_parts() {
        let config = EncoderConfig {
            disable_default_keys: true,
            message_key: "msg".to_owned(),
            ..Default::default()
        };
        let line = render(&TextLayout::new(config.resolve()), "started");
        assert_eq!(line, "started\n");
    }
}
