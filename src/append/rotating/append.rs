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

use std::io::Write;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::append::Append;
use crate::append::rotating::RotatingFileWriter;
use crate::layout::Layout;

/// An appender that writes log records through a [`RotatingFileWriter`].
#[derive(Debug)]
pub struct RotatingFile {
    layout: Layout,
    writer: Mutex<RotatingFileWriter>,
}

impl RotatingFile {
    /// Creates a new `RotatingFile` appender.
    pub fn new(writer: RotatingFileWriter, layout: impl Into<Layout>) -> Self {
        Self {
            layout: layout.into(),
            writer: Mutex::new(writer),
        }
    }

    fn writer(&self) -> MutexGuard<'_, RotatingFileWriter> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Append for RotatingFile {
    fn append(&self, record: &log::Record) -> anyhow::Result<()> {
        let bytes = self.layout.format(record)?;
        self.writer().write_all(&bytes)?;
        Ok(())
    }

    fn flush(&self) {
        let _ = self.writer().flush();
    }
}
