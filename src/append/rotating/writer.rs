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
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::SystemTime;

use anyhow::Context;
use flate2::Compression;
use flate2::write::GzEncoder;
use jiff::Timestamp;
use jiff::Zoned;
use jiff::tz::TimeZone;

const DEFAULT_MAX_SIZE: u64 = 100 * 1024 * 1024;
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// A writer that rotates its file once it reaches a size threshold.
///
/// The live file keeps its configured name. On rotation it is renamed to
/// `<stem>-<timestamp>.<ext>` next to it, a fresh live file is opened, and
/// rotated files are pruned by age and count and optionally gzipped.
#[derive(Debug)]
pub struct RotatingFileWriter {
    filename: PathBuf,
    max_size: u64,
    max_backups: usize,
    max_age: Option<Duration>,
    local_time: bool,
    compress: bool,
    mode: Option<u32>,
    writer: File,
    written: u64,
}

impl RotatingFileWriter {
    /// Creates a new [`RotatingFileWriterBuilder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use logwright::append::RotatingFileWriter;
    ///
    /// let builder = RotatingFileWriter::builder();
    /// ```
    #[must_use]
    pub fn builder() -> RotatingFileWriterBuilder {
        RotatingFileWriterBuilder::new()
    }

    /// Forces a rotation, regardless of the current file size.
    pub fn rotate_now(&mut self) -> io::Result<()> {
        self.rotate()
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        fs::rename(&self.filename, self.backup_name())?;
        self.writer = open_log_file(&self.filename, self.mode)?;
        self.written = 0;
        if let Err(err) = self.clean_backups() {
            eprintln!("failed to clean up rotated log files: {err}");
        }
        Ok(())
    }

    fn backup_name(&self) -> PathBuf {
        let now = if self.local_time {
            Zoned::now()
        } else {
            Timestamp::now().to_zoned(TimeZone::UTC)
        };
        let stamp = format!("{}.{:03}", now.strftime(BACKUP_TIME_FORMAT), now.millisecond());
        let stem = self.stem();
        let name = match self.suffix() {
            Some(suffix) => format!("{stem}-{stamp}{suffix}"),
            None => format!("{stem}-{stamp}"),
        };
        self.filename.with_file_name(name)
    }

    fn stem(&self) -> String {
        self.filename
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn suffix(&self) -> Option<String> {
        self.filename
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
    }

    fn clean_backups(&self) -> anyhow::Result<()> {
        let dir = match self.filename.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let prefix = format!("{}-", self.stem());
        let suffix = self.suffix();

        let mut backups = fs::read_dir(dir)
            .with_context(|| format!("failed to read log directory {}", dir.display()))?
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let metadata = entry.metadata().ok()?;
                if !metadata.is_file() {
                    return None;
                }

                let filename = entry.file_name();
                let filename = filename.to_str()?;
                if !filename.starts_with(&prefix) {
                    return None;
                }
                if let Some(suffix) = &suffix {
                    if !filename.ends_with(suffix.as_str())
                        && !filename.ends_with(&format!("{suffix}.gz"))
                    {
                        return None;
                    }
                }

                let modified = metadata.modified().ok()?;
                Some((entry.path(), modified))
            })
            .collect::<Vec<_>>();

        // oldest first
        backups.sort_by_key(|(_, modified)| *modified);

        if let Some(max_age) = self.max_age {
            let cutoff = SystemTime::now() - max_age;
            let (expired, kept) = backups
                .into_iter()
                .partition::<Vec<_>, _>(|(_, modified)| *modified < cutoff);
            backups = kept;
            for (path, _) in expired {
                fs::remove_file(&path).with_context(|| {
                    format!("failed to remove expired log file {}", path.display())
                })?;
            }
        }

        if self.max_backups > 0 && backups.len() > self.max_backups {
            let excess = backups.len() - self.max_backups;
            for (path, _) in backups.drain(..excess) {
                fs::remove_file(&path)
                    .with_context(|| format!("failed to remove old log file {}", path.display()))?;
            }
        }

        if self.compress {
            for (path, _) in &backups {
                if path.extension().is_some_and(|ext| ext == "gz") {
                    continue;
                }
                compress_log(path)?;
            }
        }

        Ok(())
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len() as u64;
        if len > self.max_size {
            return Err(io::Error::other(format!(
                "write length {len} exceeds maximum file size {}",
                self.max_size
            )));
        }
        if self.written + len > self.max_size {
            self.rotate()?;
        }
        self.writer
            .write(buf)
            .inspect(|&n| self.written += n as u64)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// A builder for configuring [`RotatingFileWriter`].
#[derive(Debug)]
pub struct RotatingFileWriterBuilder {
    max_size: u64,
    max_backups: usize,
    max_age: Option<Duration>,
    local_time: bool,
    compress: bool,
    mode: Option<u32>,
}

impl Default for RotatingFileWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RotatingFileWriterBuilder {
    /// Creates a new [`RotatingFileWriterBuilder`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            max_backups: 0,
            max_age: None,
            local_time: false,
            compress: false,
            mode: None,
        }
    }

    /// Sets the maximum file size in megabytes before rotation. Zero keeps
    /// the default of 100 MB.
    #[must_use]
    pub fn max_size_mb(mut self, megabytes: u64) -> Self {
        if megabytes > 0 {
            self.max_size = megabytes * 1024 * 1024;
        }
        self
    }

    /// Sets the number of rotated files to keep. Zero keeps all of them.
    #[must_use]
    pub fn max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    /// Sets the number of days to retain rotated files. Zero keeps them
    /// forever.
    #[must_use]
    pub fn max_age_days(mut self, days: u64) -> Self {
        if days > 0 {
            self.max_age = Some(Duration::from_secs(days * 24 * 60 * 60));
        }
        self
    }

    /// Uses local time in rotated file names instead of UTC.
    #[must_use]
    pub fn local_time(mut self, local_time: bool) -> Self {
        self.local_time = local_time;
        self
    }

    /// Gzips rotated files.
    #[must_use]
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Sets the mode for newly created log files. Only effective on unix.
    #[must_use]
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Builds the [`RotatingFileWriter`], opening (or creating) the live
    /// file. An existing file is appended to and counts toward the size
    /// threshold.
    pub fn build(self, filename: impl Into<PathBuf>) -> anyhow::Result<RotatingFileWriter> {
        let filename = filename.into();
        if let Some(dir) = filename.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).context("failed to create log directory")?;
        }
        let writer = open_log_file(&filename, self.mode)
            .with_context(|| format!("failed to create log file {}", filename.display()))?;
        let written = writer.metadata().context("failed to stat log file")?.len();

        Ok(RotatingFileWriter {
            filename,
            max_size: self.max_size,
            max_backups: self.max_backups,
            max_age: self.max_age,
            local_time: self.local_time,
            compress: self.compress,
            mode: self.mode,
            writer,
            written,
        })
    }
}

fn open_log_file(path: &Path, mode: Option<u32>) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    if let Some(mode) = mode {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    options.open(path)
}

fn compress_log(path: &Path) -> anyhow::Result<()> {
    let mut source = File::open(path)
        .with_context(|| format!("failed to open rotated log file {}", path.display()))?;
    let mut target = path.as_os_str().to_owned();
    target.push(".gz");
    let target = File::create(&target)
        .with_context(|| format!("failed to create {}", Path::new(&target).display()))?;
    let mut encoder = GzEncoder::new(target, Compression::default());
    io::copy(&mut source, &mut encoder).context("failed to compress rotated log file")?;
    encoder.finish().context("failed to finish gzip stream")?;
    fs::remove_file(path)
        .with_context(|| format!("failed to remove compressed source {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write;
    use std::thread;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    #[test]
    fn test_rotates_at_size_threshold() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let mut writer = RotatingFileWriter::builder()
            .max_size_mb(1)
            .build(&path)
            .unwrap();

        let payload = vec![b'x'; 512 * 1024];
        writer.write_all(&payload).unwrap();
        writer.write_all(&payload).unwrap();
        assert_eq!(dir_entries(dir.path()).len(), 1);

        // the third write would exceed 1 MB, forcing a rotation
        writer.write_all(&payload).unwrap();
        writer.flush().unwrap();
        let entries = dir_entries(dir.path());
        assert_eq!(entries.len(), 2, "{entries:?}");
        assert!(entries.iter().any(|name| name.starts_with("app-")));
        assert_eq!(fs::metadata(&path).unwrap().len(), payload.len() as u64);
    }

    #[test]
    fn test_oversized_write_is_refused() {
        let dir = TempDir::new().unwrap();
        let mut writer = RotatingFileWriter::builder()
            .max_size_mb(1)
            .build(dir.path().join("app.log"))
            .unwrap();
        let payload = vec![b'x'; 2 * 1024 * 1024];
        assert!(writer.write_all(&payload).is_err());
    }

    #[test]
    fn test_existing_content_counts_toward_threshold() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, vec![b'x'; 700 * 1024]).unwrap();

        let mut writer = RotatingFileWriter::builder()
            .max_size_mb(1)
            .build(&path)
            .unwrap();
        writer.write_all(&vec![b'x'; 512 * 1024]).unwrap();
        assert_eq!(dir_entries(dir.path()).len(), 2);
    }

    #[test]
    fn test_max_backups_prunes_oldest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let mut writer = RotatingFileWriter::builder()
            .max_backups(2)
            .build(&path)
            .unwrap();

        for _ in 0..5 {
            writer.write_all(b"line\n").unwrap();
            writer.rotate_now().unwrap();
            // rotated names carry millisecond timestamps; keep them distinct
            thread::sleep(Duration::from_millis(5));
        }

        let backups = dir_entries(dir.path())
            .into_iter()
            .filter(|name| name.starts_with("app-"))
            .collect::<Vec<_>>();
        assert_eq!(backups.len(), 2, "{backups:?}");
    }

    #[test]
    fn test_compress_gzips_backups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let mut writer = RotatingFileWriter::builder()
            .compress(true)
            .build(&path)
            .unwrap();

        writer.write_all(b"archived\n").unwrap();
        writer.rotate_now().unwrap();

        let entries = dir_entries(dir.path());
        assert!(
            entries
                .iter()
                .any(|name| name.starts_with("app-") && name.ends_with(".log.gz")),
            "{entries:?}"
        );
        assert!(
            !entries
                .iter()
                .any(|name| name.starts_with("app-") && name.ends_with(".log")),
            "{entries:?}"
        );
    }

    #[test]
    fn test_file_mode_applies_to_live_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        RotatingFileWriter::builder()
            .file_mode(0o640)
            .build(&path)
            .unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o640);
        }
    }
}
