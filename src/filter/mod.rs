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

//! Filters for log records.

use log::Metadata;

pub use self::level::LevelFilter;
pub use self::sampling::Sampling;
pub use self::sampling::SamplingFilter;

mod level;
mod sampling;

/// The result of a filter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// The record will be processed without further filtering.
    Accept,
    /// The record should not be processed.
    Reject,
    /// No decision could be made, further filtering should occur.
    Neutral,
}

/// Represents a filter that can be applied to log records.
#[derive(Debug)]
pub enum Filter {
    /// A level threshold filter.
    Level(LevelFilter),
    /// A sampling filter for repeated messages.
    Sampling(SamplingFilter),
}

impl Filter {
    pub(crate) fn enabled(&self, metadata: &Metadata) -> FilterResult {
        match self {
            Filter::Level(filter) => filter.filter(metadata),
            // sampling decides per record, not per metadata
            Filter::Sampling(_) => FilterResult::Neutral,
        }
    }

    pub(crate) fn matches(&self, record: &log::Record) -> FilterResult {
        match self {
            Filter::Level(filter) => filter.filter(record.metadata()),
            Filter::Sampling(filter) => filter.sample(record),
        }
    }
}

impl From<log::LevelFilter> for Filter {
    fn from(filter: log::LevelFilter) -> Self {
        Filter::Level(LevelFilter::new(filter))
    }
}
