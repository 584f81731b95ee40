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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use anyhow::Context;

use crate::append::Append;
use crate::layout::Layout;

/// An appender that writes log records to a single append-mode file.
///
/// The file is never rotated; pair with
/// [`RotatingFile`](crate::append::RotatingFile) when rotation is wanted.
#[derive(Debug)]
pub struct SingleFile {
    layout: Layout,
    writer: Mutex<File>,
}

impl SingleFile {
    /// Opens (or creates) the file at `path` and returns an appender for it.
    pub fn new(path: impl AsRef<Path>, layout: impl Into<Layout>) -> anyhow::Result<SingleFile> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).context("failed to create log directory")?;
        }
        let writer = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        Ok(SingleFile {
            layout: layout.into(),
            writer: Mutex::new(writer),
        })
    }

    fn writer(&self) -> MutexGuard<'_, File> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Append for SingleFile {
    fn append(&self, record: &log::Record) -> anyhow::Result<()> {
        let bytes = self.layout.format(record)?;
        self.writer().write_all(&bytes)?;
        Ok(())
    }

    fn flush(&self) {
        let _ = self.writer().flush();
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use log::Level;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_append_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let appender = SingleFile::new(&path, Layout::default()).unwrap();

        appender
            .append(
                &log::Record::builder()
                    .args(format_args!("hello file"))
                    .level(Level::Info)
                    .target("app")
                    .build(),
            )
            .unwrap();
        appender.flush();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("hello file"));
    }

    #[test]
    fn test_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("app.log");
        SingleFile::new(&path, Layout::default()).unwrap();
        assert!(path.exists());
    }
}
