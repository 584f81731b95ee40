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

use std::io;

use crate::locator::LocatorError;

/// Errors raised while assembling a logger from configuration.
///
/// None of these are retried; partial side effects, such as files already
/// created on disk, are not rolled back.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The permissions spec is not a valid octal file mode.
    #[error("invalid permissions: {spec:?}")]
    InvalidPermissions {
        /// The offending spec.
        spec: String,
    },

    /// An output path failed to transform.
    #[error("bad output path {path:?}: {source}")]
    BadOutputPath {
        /// The offending path.
        path: String,
        /// The underlying parse failure.
        source: LocatorError,
    },

    /// An error-output path failed to transform.
    #[error("bad error output path {path:?}: {source}")]
    BadErrorOutputPath {
        /// The offending path.
        path: String,
        /// The underlying parse failure.
        source: LocatorError,
    },

    /// A resolved locator could not be interpreted.
    #[error("invalid locator {path:?}: {source}")]
    Locator {
        /// The locator as handed to the sink machinery.
        path: String,
        /// The underlying parse failure.
        source: LocatorError,
    },

    /// The configured log level is not a recognized level name.
    #[error("invalid log level: {level:?}")]
    InvalidLevel {
        /// The offending level name.
        level: String,
    },

    /// The configured rotation scheme is not a valid URI scheme name.
    #[error("invalid rotation scheme: {scheme:?}")]
    RotationScheme {
        /// The offending scheme name.
        scheme: String,
    },

    /// A locator carries a scheme no sink is registered for.
    #[error("no sink for scheme {scheme:?}")]
    UnsupportedScheme {
        /// The unrecognized scheme.
        scheme: String,
    },

    /// A rotation locator carries a malformed query parameter.
    #[error("invalid rotation parameter {key}={value:?}")]
    InvalidRotationParam {
        /// The parameter key.
        key: String,
        /// The unparsable value.
        value: String,
    },

    /// Creating or opening a log resource failed.
    #[error("failed to create log resource: {0}")]
    CreateResource(#[from] io::Error),

    /// Installing the global logger failed.
    #[error("failed to install global logger: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}
