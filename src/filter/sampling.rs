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

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::PoisonError;

use jiff::Timestamp;
use serde::Deserialize;

use crate::filter::Filter;
use crate::filter::FilterResult;

// Bound on the per-message counter table; crossing it drops counters from
// earlier ticks.
const MAX_TRACKED_MESSAGES: usize = 1024;

/// Sampling thresholds for records with identical messages.
///
/// Within each one-second window, the first `initial` records carrying a given
/// message pass; after that, every `thereafter`-th passes and the rest are
/// dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Sampling {
    /// Records passed per second per message before sampling kicks in.
    pub initial: u64,

    /// After `initial`, every `thereafter`-th record passes. Zero drops the
    /// rest of the window.
    pub thereafter: u64,
}

/// A filter that samples records with identical messages.
#[derive(Debug)]
pub struct SamplingFilter {
    sampling: Sampling,
    seen: Mutex<HashMap<String, Counter>>,
}

#[derive(Debug)]
struct Counter {
    tick: i64,
    count: u64,
}

impl SamplingFilter {
    /// Creates a new `SamplingFilter` with the given thresholds.
    pub fn new(sampling: Sampling) -> Self {
        SamplingFilter {
            sampling,
            seen: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn sample(&self, record: &log::Record) -> FilterResult {
        let tick = Timestamp::now().as_second();
        let message = record.args().to_string();

        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        if seen.len() > MAX_TRACKED_MESSAGES {
            seen.retain(|_, counter| counter.tick == tick);
        }

        let counter = seen.entry(message).or_insert(Counter { tick, count: 0 });
        if counter.tick != tick {
            counter.tick = tick;
            counter.count = 0;
        }
        counter.count += 1;

        if counter.count <= self.sampling.initial {
            return FilterResult::Neutral;
        }
        let past_initial = counter.count - self.sampling.initial;
        if self.sampling.thereafter > 0 && past_initial % self.sampling.thereafter == 0 {
            FilterResult::Neutral
        } else {
            FilterResult::Reject
        }
    }
}

impl From<SamplingFilter> for Filter {
    fn from(filter: SamplingFilter) -> Self {
        Filter::Sampling(filter)
    }
}
