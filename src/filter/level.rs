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

use log::Metadata;

use crate::filter::Filter;
use crate::filter::FilterResult;

/// A filter that rejects records above the specified verbosity level.
///
/// From least to most verbose, the levels are `Error`, `Warn`, `Info`,
/// `Debug`, and `Trace`. A filter set to `Info` lets `Error`, `Warn`, and
/// `Info` records through; one set to `Off` rejects everything.
#[derive(Debug, Clone)]
pub struct LevelFilter(log::LevelFilter);

impl LevelFilter {
    /// Creates a new `LevelFilter` with the given threshold.
    pub fn new(level: log::LevelFilter) -> Self {
        LevelFilter(level)
    }

    pub(crate) fn filter(&self, metadata: &Metadata) -> FilterResult {
        if metadata.level() <= self.0 {
            FilterResult::Neutral
        } else {
            FilterResult::Reject
        }
    }
}

impl From<LevelFilter> for Filter {
    fn from(filter: LevelFilter) -> Self {
        Filter::Level(filter)
    }
}
