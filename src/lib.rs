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

//! Logwright assembles ready-to-use loggers from declarative configuration,
//! with rotation-aware file sinks.
//!
//! # Overview
//!
//! A [`Config`] record — friendly to unmarshaling from JSON or YAML maps —
//! describes log level, encoding, encoder settings, output destinations, file
//! permissions, and a rotation policy. [`Config::build`] expands variables in
//! the output paths, rewrites filesystem paths into rotation locators,
//! pre-creates backing files with the requested permissions, and assembles a
//! [`Logger`] that plugs into the [`log`] facade.
//!
//! # Examples
//!
//! Declarative setup from configuration:
//!
//! ```
//! use logwright::Config;
//!
//! let config: Config = serde_json::from_str(
//!     r#"{
//!         "level": "info",
//!         "outputPaths": ["stdout"]
//!     }"#,
//! )
//! .unwrap();
//! config.build().unwrap().apply();
//!
//! log::info!("This is an info message.");
//! ```
//!
//! Manual setup with custom filters and multiple appenders:
//!
//! ```
//! use logwright::append;
//!
//! logwright::builder()
//!     .filter(log::LevelFilter::Error)
//!     .append(append::Stderr::default())
//!     .dispatch()
//!     .filter(log::LevelFilter::Info)
//!     .append(append::Stdout::default())
//!     .apply();
//!
//! log::error!("Error message.");
//! log::info!("Info message.");
//! ```

pub mod append;
pub mod filter;
pub mod layout;

mod config;
mod encode;
mod ensure;
mod error;
mod kv;
mod locator;
mod logger;
mod permissions;
mod rotation;
mod sink;
mod transform;

pub use append::Append;
pub use config::Config;
pub use config::Encoding;
pub use encode::CallerEncoder;
pub use encode::DurationEncoder;
pub use encode::EncoderConfig;
pub use encode::EncoderSettings;
pub use encode::LevelEncoder;
pub use encode::NameEncoder;
pub use encode::TimeEncoder;
pub use ensure::ensure_exists;
pub use error::Error;
pub use filter::Filter;
pub use layout::Layout;
pub use locator::LocatorError;
pub use logger::Builder;
pub use logger::Logger;
pub use logger::builder;
pub use permissions::parse_permissions;
pub use rotation::ROTATION_SCHEME;
pub use rotation::Rotation;
pub use transform::Mapping;
pub use transform::PathTransformer;
pub use transform::STDERR;
pub use transform::STDOUT;
pub use transform::apply_transform;
