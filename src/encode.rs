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

//! Encoder settings and the named parsers that resolve them.
//!
//! Configuration carries encoder choices as plain strings (`"lowercase"`,
//! `"rfc3339"`, ...). Each kind of choice has an explicit table mapping names
//! to variants; unrecognized names fall back to the kind's default, so a
//! configuration never fails on an unknown encoder name.

use std::time::Duration;

use jiff::Zoned;
use log::Level;
use log::LevelFilter;
use serde::Deserialize;
use serde_json::Value;

/// Default logging key for the log message.
pub const DEFAULT_MESSAGE_KEY: &str = "msg";

/// Default logging key for the log level.
pub const DEFAULT_LEVEL_KEY: &str = "level";

/// Default logging key for the record timestamp.
pub const DEFAULT_TIME_KEY: &str = "ts";

/// Default logging key for the logger name.
pub const DEFAULT_NAME_KEY: &str = "name";

/// Unmarshal-friendly encoder settings.
///
/// All fields are optional. Key fields left empty fall back to defaults
/// (unless [`disable_default_keys`](EncoderConfig::disable_default_keys) is
/// set), except `callerKey` and `stacktraceKey`, which stay off until
/// configured. Encoder-name fields resolve through the parser tables in this
/// module.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncoderConfig {
    /// Disables the convenience defaulting of the message, level, time, and
    /// name keys. Useful to turn one of them off while setting the others.
    pub disable_default_keys: bool,

    /// Logging key for the log message.
    pub message_key: String,

    /// Logging key for the log level.
    pub level_key: String,

    /// Logging key for the record timestamp.
    pub time_key: String,

    /// Logging key for the logger name.
    pub name_key: String,

    /// Logging key for the caller of the logging method. If unset, callers
    /// are not written.
    pub caller_key: String,

    /// Logging key for stacktraces. If unset, stacktraces are never captured.
    pub stacktrace_key: String,

    /// Terminator for each record. Defaults to a single newline.
    pub line_ending: String,

    /// How levels are represented. Defaults to `lowercase`.
    #[serde(rename = "levelEncoder")]
    pub encode_level: String,

    /// How timestamps are represented. Defaults to `rfc3339`.
    #[serde(rename = "timeEncoder")]
    pub encode_time: String,

    /// How durations are represented. Defaults to `string`.
    #[serde(rename = "durationEncoder")]
    pub encode_duration: String,

    /// How callers are represented. Defaults to `full`.
    #[serde(rename = "callerEncoder")]
    pub encode_caller: String,

    /// How logger names are represented. Defaults to `full`.
    #[serde(rename = "nameEncoder")]
    pub encode_name: String,

    /// Field separator used by the console layout. Defaults to tab.
    pub console_separator: String,
}

impl EncoderConfig {
    /// Applies the defaulting policy, producing settings ready for a layout.
    pub fn resolve(&self) -> EncoderSettings {
        let default_key = |configured: &str, default: &str| {
            if !configured.is_empty() {
                Some(configured.to_owned())
            } else if self.disable_default_keys {
                None
            } else {
                Some(default.to_owned())
            }
        };
        let optional_key =
            |configured: &str| (!configured.is_empty()).then(|| configured.to_owned());
        let defaulted = |configured: &str, default: &str| {
            if configured.is_empty() {
                default.to_owned()
            } else {
                configured.to_owned()
            }
        };

        EncoderSettings {
            message_key: default_key(&self.message_key, DEFAULT_MESSAGE_KEY),
            level_key: default_key(&self.level_key, DEFAULT_LEVEL_KEY),
            time_key: default_key(&self.time_key, DEFAULT_TIME_KEY),
            name_key: default_key(&self.name_key, DEFAULT_NAME_KEY),
            caller_key: optional_key(&self.caller_key),
            stacktrace_key: optional_key(&self.stacktrace_key),
            line_ending: defaulted(&self.line_ending, "\n"),
            console_separator: defaulted(&self.console_separator, "\t"),
            encode_level: lookup(LEVEL_ENCODERS, &self.encode_level, LevelEncoder::Lowercase),
            encode_time: lookup(TIME_ENCODERS, &self.encode_time, TimeEncoder::Rfc3339),
            encode_duration: lookup(
                DURATION_ENCODERS,
                &self.encode_duration,
                DurationEncoder::Text,
            ),
            encode_caller: lookup(CALLER_ENCODERS, &self.encode_caller, CallerEncoder::Full),
            encode_name: lookup(NAME_ENCODERS, &self.encode_name, NameEncoder::Full),
        }
    }
}

/// Encoder settings with all defaults applied.
///
/// Keys that resolve to `None` are omitted from log output entirely.
#[derive(Debug, Clone)]
pub struct EncoderSettings {
    /// Key for the log message, if messages are written.
    pub message_key: Option<String>,
    /// Key for the log level, if levels are written.
    pub level_key: Option<String>,
    /// Key for the record timestamp, if timestamps are written.
    pub time_key: Option<String>,
    /// Key for the logger name, if names are written.
    pub name_key: Option<String>,
    /// Key for the caller, if callers are written.
    pub caller_key: Option<String>,
    /// Key for stacktraces, if stacktraces are captured.
    pub stacktrace_key: Option<String>,
    /// Terminator for each record.
    pub line_ending: String,
    /// Field separator used by the console layout.
    pub console_separator: String,
    /// Level representation.
    pub encode_level: LevelEncoder,
    /// Timestamp representation.
    pub encode_time: TimeEncoder,
    /// Duration representation.
    pub encode_duration: DurationEncoder,
    /// Caller representation.
    pub encode_caller: CallerEncoder,
    /// Logger-name representation.
    pub encode_name: NameEncoder,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        EncoderConfig::default().resolve()
    }
}

/// How levels are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEncoder {
    /// `info`, `warn`, ...
    Lowercase,
    /// `INFO`, `WARN`, ...
    Capital,
}

impl LevelEncoder {
    /// Renders a level.
    pub fn encode(self, level: Level) -> &'static str {
        match self {
            LevelEncoder::Lowercase => match level {
                Level::Error => "error",
                Level::Warn => "warn",
                Level::Info => "info",
                Level::Debug => "debug",
                Level::Trace => "trace",
            },
            LevelEncoder::Capital => level.as_str(),
        }
    }
}

/// How timestamps are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEncoder {
    /// RFC 3339 with second precision.
    Rfc3339,
    /// RFC 3339 with nanosecond precision.
    Rfc3339Nano,
    /// ISO 8601 with millisecond precision.
    Iso8601,
    /// Seconds since the Unix epoch.
    Epoch,
    /// Milliseconds since the Unix epoch.
    EpochMillis,
    /// Nanoseconds since the Unix epoch.
    EpochNanos,
}

impl TimeEncoder {
    /// Renders a timestamp as a JSON value.
    pub fn encode_value(self, now: &Zoned) -> Value {
        match self {
            TimeEncoder::Epoch => now.timestamp().as_second().into(),
            TimeEncoder::EpochMillis => now.timestamp().as_millisecond().into(),
            TimeEncoder::EpochNanos => (now.timestamp().as_nanosecond() as i64).into(),
            _ => self.encode_display(now).into(),
        }
    }

    /// Renders a timestamp as text.
    pub fn encode_display(self, now: &Zoned) -> String {
        match self {
            TimeEncoder::Rfc3339 => now.strftime("%Y-%m-%dT%H:%M:%S%:z").to_string(),
            TimeEncoder::Rfc3339Nano => now.strftime("%Y-%m-%dT%H:%M:%S.%9f%:z").to_string(),
            TimeEncoder::Iso8601 => now.strftime("%Y-%m-%dT%H:%M:%S.%3f%:z").to_string(),
            TimeEncoder::Epoch => now.timestamp().as_second().to_string(),
            TimeEncoder::EpochMillis => now.timestamp().as_millisecond().to_string(),
            TimeEncoder::EpochNanos => now.timestamp().as_nanosecond().to_string(),
        }
    }
}

/// How durations are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationEncoder {
    /// Human-readable, e.g. `1.5s`.
    Text,
    /// Fractional seconds.
    Seconds,
    /// Integer milliseconds.
    Millis,
    /// Integer nanoseconds.
    Nanos,
}

impl DurationEncoder {
    /// Renders a duration as a JSON value.
    pub fn encode_value(self, duration: Duration) -> Value {
        match self {
            DurationEncoder::Text => format!("{duration:?}").into(),
            DurationEncoder::Seconds => duration.as_secs_f64().into(),
            DurationEncoder::Millis => (duration.as_millis() as u64).into(),
            DurationEncoder::Nanos => (duration.as_nanos() as u64).into(),
        }
    }
}

/// How callers are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerEncoder {
    /// The full file path, `src/server/conn.rs:42`.
    Full,
    /// The file name only, `conn.rs:42`.
    Short,
}

impl CallerEncoder {
    /// Renders a caller location.
    pub fn encode(self, file: &str, line: u32) -> String {
        match self {
            CallerEncoder::Full => format!("{file}:{line}"),
            CallerEncoder::Short => {
                let file = file.rsplit(['/', '\\']).next().unwrap_or(file);
                format!("{file}:{line}")
            }
        }
    }
}

/// How logger names are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameEncoder {
    /// The name as recorded.
    Full,
}

impl NameEncoder {
    /// Renders a logger name.
    pub fn encode(self, name: &str) -> &str {
        match self {
            NameEncoder::Full => name,
        }
    }
}

const LEVEL_ENCODERS: &[(&str, LevelEncoder)] = &[
    ("lowercase", LevelEncoder::Lowercase),
    ("capital", LevelEncoder::Capital),
];

const TIME_ENCODERS: &[(&str, TimeEncoder)] = &[
    ("rfc3339", TimeEncoder::Rfc3339),
    ("rfc3339nano", TimeEncoder::Rfc3339Nano),
    ("iso8601", TimeEncoder::Iso8601),
    ("epoch", TimeEncoder::Epoch),
    ("millis", TimeEncoder::EpochMillis),
    ("nanos", TimeEncoder::EpochNanos),
];

const DURATION_ENCODERS: &[(&str, DurationEncoder)] = &[
    ("string", DurationEncoder::Text),
    ("seconds", DurationEncoder::Seconds),
    ("ms", DurationEncoder::Millis),
    ("nanos", DurationEncoder::Nanos),
];

const CALLER_ENCODERS: &[(&str, CallerEncoder)] =
    &[("full", CallerEncoder::Full), ("short", CallerEncoder::Short)];

const NAME_ENCODERS: &[(&str, NameEncoder)] = &[("full", NameEncoder::Full)];

const LEVELS: &[(&str, LevelFilter)] = &[
    ("off", LevelFilter::Off),
    ("fatal", LevelFilter::Error),
    ("panic", LevelFilter::Error),
    ("dpanic", LevelFilter::Error),
    ("error", LevelFilter::Error),
    ("warn", LevelFilter::Warn),
    ("warning", LevelFilter::Warn),
    ("info", LevelFilter::Info),
    ("debug", LevelFilter::Debug),
    ("trace", LevelFilter::Trace),
];

/// Parses a level name from configuration. Unlike the encoder tables, an
/// unknown level name is an error rather than a silent default.
pub(crate) fn parse_level(name: &str) -> Option<LevelFilter> {
    LEVELS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, level)| *level)
}

fn lookup<T: Copy>(table: &[(&str, T)], name: &str, default: T) -> T {
    table
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, value)| *value)
        .unwrap_or(default)
}

/// Captures a stacktrace for a record when the settings call for one.
pub(crate) fn capture_stacktrace(
    settings: &EncoderSettings,
    level: Level,
    development: bool,
) -> Option<String> {
    settings.stacktrace_key.as_ref()?;
    let threshold = if development { Level::Warn } else { Level::Error };
    (level <= threshold).then(|| std::backtrace::Backtrace::force_capture().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let settings = EncoderConfig::default().resolve();
        assert_eq!(settings.message_key.as_deref(), Some("msg"));
        assert_eq!(settings.level_key.as_deref(), Some("level"));
        assert_eq!(settings.time_key.as_deref(), Some("ts"));
        assert_eq!(settings.name_key.as_deref(), Some("name"));
        assert_eq!(settings.caller_key, None);
        assert_eq!(settings.stacktrace_key, None);
        assert_eq!(settings.line_ending, "\n");
        assert_eq!(settings.console_separator, "\t");
        assert_eq!(settings.encode_level, LevelEncoder::Lowercase);
        assert_eq!(settings.encode_time, TimeEncoder::Rfc3339);
        assert_eq!(settings.encode_duration, DurationEncoder::Text);
        assert_eq!(settings.encode_caller, CallerEncoder::Full);
        assert_eq!(settings.encode_name, NameEncoder::Full);
    }

    #[test]
    fn test_resolve_disable_default_keys() {
        let config = EncoderConfig {
            disable_default_keys: true,
            message_key: "message".to_owned(),
            ..Default::default()
        };
        let settings = config.resolve();
        assert_eq!(settings.message_key.as_deref(), Some("message"));
        assert_eq!(settings.level_key, None);
        assert_eq!(settings.time_key, None);
        assert_eq!(settings.name_key, None);
    }

    #[test]
    fn test_unknown_encoder_names_fall_back() {
        let config = EncoderConfig {
            encode_level: "sparkly".to_owned(),
            encode_time: "sundial".to_owned(),
            ..Default::default()
        };
        let settings = config.resolve();
        assert_eq!(settings.encode_level, LevelEncoder::Lowercase);
        assert_eq!(settings.encode_time, TimeEncoder::Rfc3339);
    }

    #[test]
    fn test_named_encoders_resolve() {
        let config = EncoderConfig {
            encode_level: "CAPITAL".to_owned(),
            encode_time: "millis".to_owned(),
            encode_duration: "ms".to_owned(),
            encode_caller: "short".to_owned(),
            ..Default::default()
        };
        let settings = config.resolve();
        assert_eq!(settings.encode_level, LevelEncoder::Capital);
        assert_eq!(settings.encode_time, TimeEncoder::EpochMillis);
        assert_eq!(settings.encode_duration, DurationEncoder::Millis);
        assert_eq!(settings.encode_caller, CallerEncoder::Short);
    }

    #[test]
    fn test_level_encoders() {
        assert_eq!(LevelEncoder::Lowercase.encode(Level::Warn), "warn");
        assert_eq!(LevelEncoder::Capital.encode(Level::Warn), "WARN");
    }

    #[test]
    fn test_caller_encoders() {
        assert_eq!(CallerEncoder::Full.encode("src/server/conn.rs", 42), "src/server/conn.rs:42");
        assert_eq!(CallerEncoder::Short.encode("src/server/conn.rs", 42), "conn.rs:42");
        assert_eq!(CallerEncoder::Short.encode("conn.rs", 7), "conn.rs:7");
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("info"), Some(LevelFilter::Info));
        assert_eq!(parse_level("WARN"), Some(LevelFilter::Warn));
        assert_eq!(parse_level("fatal"), Some(LevelFilter::Error));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn test_deserialize_encoder_config() {
        let config: EncoderConfig = serde_json::from_str(
            r#"{
                "messageKey": "message",
                "levelEncoder": "capital",
                "consoleSeparator": " | "
            }"#,
        )
        .unwrap();
        assert_eq!(config.message_key, "message");
        assert_eq!(config.encode_level, "capital");
        assert_eq!(config.console_separator, " | ");
    }
}
