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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::append::Append;
use crate::layout::Layout;

/// An appender that captures formatted records in memory.
///
/// Clones share the capture buffer, so a test can keep one clone and hand the
/// other to a logger.
///
/// # Examples
///
/// ```
/// use logwright::append::Testing;
///
/// let capture = Testing::default();
///
/// logwright::builder()
///     .filter(log::LevelFilter::Info)
///     .append(capture.clone())
///     .apply();
///
/// log::info!("captured");
/// assert_eq!(capture.captured().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Testing {
    layout: Layout,
    captured: Arc<Mutex<Vec<String>>>,
}

impl Testing {
    /// Creates a new `Testing` appender with the given layout.
    pub fn new(layout: impl Into<Layout>) -> Self {
        Self {
            layout: layout.into(),
            captured: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Records captured so far, one formatted line per record, without the
    /// trailing line ending.
    pub fn captured(&self) -> Vec<String> {
        self.captured
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Append for Testing {
    fn append(&self, record: &log::Record) -> anyhow::Result<()> {
        let bytes = self.layout.format(record)?;
        let line = String::from_utf8_lossy(&bytes).trim_end().to_owned();
        self.captured
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
        Ok(())
    }
}
