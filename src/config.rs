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

use std::collections::BTreeMap;

use log::LevelFilter;
use serde::Deserialize;
use serde_json::Value;

use crate::Error;
use crate::encode;
use crate::encode::EncoderConfig;
use crate::ensure::ensure_exists;
use crate::filter::Filter;
use crate::filter::Sampling;
use crate::filter::SamplingFilter;
use crate::layout::JsonLayout;
use crate::layout::Layout;
use crate::layout::TextLayout;
use crate::locator;
use crate::logger::Dispatch;
use crate::logger::Logger;
use crate::permissions::parse_permissions;
use crate::rotation::ROTATION_SCHEME;
use crate::rotation::Rotation;
use crate::sink::open_sink;
use crate::transform::Mapping;
use crate::transform::PathTransformer;
use crate::transform::STDERR;
use crate::transform::STDOUT;
use crate::transform::apply_transform;

/// The built-in record encodings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// One JSON object per record.
    #[default]
    Json,
    /// Separator-delimited console lines.
    Console,
}

/// Declarative options for building a single [`Logger`].
///
/// This type is friendly to unmarshaling from JSON or YAML maps; every field
/// is optional. [`Config::build`] applies the defaulting policy, expands and
/// rewrites the output paths, pre-creates backing files, and assembles the
/// logger. The configuration is read once; nothing retains a reference to it
/// afterwards.
///
/// # Examples
///
/// ```
/// use logwright::Config;
///
/// let config: Config = serde_json::from_str(
///     r#"{
///         "level": "info",
///         "outputPaths": ["stdout"],
///         "initialFields": {"svc": "api"}
///     }"#,
/// )
/// .unwrap();
/// let logger = config.build().unwrap();
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Log level name, such as `"info"`. If unset, the error level is
    /// assumed.
    pub level: String,

    /// Development mode: default the output paths to stdout and lower the
    /// stacktrace threshold from error to warn.
    pub development: bool,

    /// Suppress caller locations in log records even when a caller key is
    /// configured.
    pub disable_caller: bool,

    /// Suppress stacktrace capture even when a stacktrace key is configured.
    pub disable_stacktrace: bool,

    /// Optional sampling thresholds for records with identical messages.
    pub sampling: Option<Sampling>,

    /// Record encoding. If unset, JSON is used.
    pub encoding: Option<Encoding>,

    /// Encoder settings; unset fields are defaulted per [`EncoderConfig`].
    pub encoder_config: EncoderConfig,

    /// The set of sinks for log output. If unset, all logging output is
    /// discarded outside development mode.
    ///
    /// Each path has environment variable references expanded unless
    /// [`disable_path_expansion`](Config::disable_path_expansion) is set, and
    /// is rewritten into a rotation locator when
    /// [`rotation`](Config::rotation) is set and the path is a system file.
    pub output_paths: Vec<String>,

    /// The set of sinks for error-level output. If unset, stderr is assumed.
    /// Paths are expanded and rewritten exactly like
    /// [`output_paths`](Config::output_paths).
    pub error_output_paths: Vec<String>,

    /// Static fields set on every record emitted through the logger.
    pub initial_fields: BTreeMap<String, Value>,

    /// Disables `$var`/`${var}` expansion in output paths. When set,
    /// [`mapping`](Config::mapping) is ignored.
    pub disable_path_expansion: bool,

    /// Optional nix-style permissions for created log files, e.g. `"0644"`.
    /// If unset, the sinks control what permissions new log files have.
    pub permissions: String,

    /// Optional strategy for expanding variables in output paths. If not
    /// supplied, the process environment is used.
    #[serde(skip)]
    pub mapping: Option<Mapping>,

    /// Log file rotation options. If unset, log files are not rotated.
    pub rotation: Option<Rotation>,

    /// Scheme name for rotation locators. If unset, [`ROTATION_SCHEME`] is
    /// used; historic deployments may set `"lumberjack"`.
    pub rotation_scheme: Option<String>,
}

impl Config {
    /// Builds a [`Logger`] from this configuration.
    ///
    /// The steps run in order: defaulting, path transformation for output
    /// then error-output paths, permissions parsing, file pre-creation, and
    /// sink construction. The first failure aborts the build; files already
    /// created on disk are not removed.
    pub fn build(&self) -> Result<Logger, Error> {
        let level = self.resolve_level()?;
        let scheme = self.rotation_scheme.as_deref().unwrap_or(ROTATION_SCHEME);
        if !locator::is_scheme(scheme) {
            return Err(Error::RotationScheme {
                scheme: scheme.to_owned(),
            });
        }

        let (output_paths, error_output_paths) = self.resolve_paths(scheme)?;

        let perms = parse_permissions(&self.permissions)?;
        for path in output_paths.iter().chain(&error_output_paths) {
            ensure_exists(path, perms)?;
        }

        let layout = self.resolve_layout();

        let mut dispatches = Vec::new();
        if !output_paths.is_empty() {
            let mut filters = vec![Filter::from(level)];
            if let Some(sampling) = self.sampling {
                filters.push(SamplingFilter::new(sampling).into());
            }
            let mut appends = Vec::new();
            for path in &output_paths {
                appends.push(open_sink(path, layout.clone(), scheme, perms)?);
            }
            dispatches.push(Dispatch::new(filters, appends));
        }
        if !error_output_paths.is_empty() {
            let mut appends = Vec::new();
            for path in &error_output_paths {
                appends.push(open_sink(path, layout.clone(), scheme, perms)?);
            }
            dispatches.push(Dispatch::new(
                vec![Filter::from(LevelFilter::Error)],
                appends,
            ));
        }

        Ok(Logger::new(dispatches, level))
    }

    fn resolve_level(&self) -> Result<LevelFilter, Error> {
        if self.level.is_empty() {
            return Ok(LevelFilter::Error);
        }
        encode::parse_level(&self.level).ok_or_else(|| Error::InvalidLevel {
            level: self.level.clone(),
        })
    }

    /// Applies path defaulting, then runs every path through the transformer.
    /// The error reports which list failed.
    fn resolve_paths(&self, scheme: &str) -> Result<(Vec<String>, Vec<String>), Error> {
        let output_paths = if self.output_paths.is_empty() && self.development {
            vec![STDOUT.to_owned()]
        } else {
            self.output_paths.clone()
        };
        let error_output_paths = if self.error_output_paths.is_empty() {
            vec![STDERR.to_owned()]
        } else {
            self.error_output_paths.clone()
        };

        let transformer = PathTransformer {
            rotation: self.rotation.clone(),
            mapping: if self.disable_path_expansion {
                None
            } else {
                Some(self.mapping.clone().unwrap_or_else(Mapping::env))
            },
            scheme: Some(scheme.to_owned()),
        };
        let mut transform = |path: &str| {
            transformer
                .transform(path)
                .map_err(|source| (path.to_owned(), source))
        };

        let output_paths = apply_transform(&mut transform, &output_paths)
            .map_err(|(path, source)| Error::BadOutputPath { path, source })?;
        let error_output_paths = apply_transform(&mut transform, &error_output_paths)
            .map_err(|(path, source)| Error::BadErrorOutputPath { path, source })?;
        Ok((output_paths, error_output_paths))
    }

    fn resolve_layout(&self) -> Layout {
        let mut settings = self.encoder_config.resolve();
        if self.disable_caller {
            settings.caller_key = None;
        }
        if self.disable_stacktrace {
            settings.stacktrace_key = None;
        }

        let fields = self
            .initial_fields
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect::<Vec<_>>();

        match self.encoding.unwrap_or_default() {
            Encoding::Json => JsonLayout::new(settings)
                .with_fields(fields)
                .development(self.development)
                .into(),
            Encoding::Console => TextLayout::new(settings)
                .with_fields(fields)
                .development(self.development)
                .into(),
        }
    }
}
