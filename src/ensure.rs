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

use std::fs::OpenOptions;
use std::path::Path;

use crate::Error;
use crate::locator;
use crate::transform::STDERR;
use crate::transform::STDOUT;

/// Makes sure the file behind a resolved locator exists with the given mode.
///
/// Sinks do not create files with custom permissions themselves, so the file
/// is created up front: it is opened (or created) without truncation and
/// closed immediately. A `mode` of zero and the `stdout`/`stderr` sentinels
/// are no-ops. Non-absolute locators are treated as URI references and the
/// extracted path component is created instead.
///
/// The mode applies only when the file is created; an existing file keeps its
/// permissions and content. Failures are fatal to logger construction and are
/// not retried.
pub fn ensure_exists(path: &str, mode: u32) -> Result<(), Error> {
    if mode == 0 || path == STDOUT || path == STDERR {
        return Ok(());
    }

    if Path::new(path).is_absolute() {
        return touch(Path::new(path), mode);
    }

    let uri = locator::split(path).map_err(|source| Error::Locator {
        path: path.to_owned(),
        source,
    })?;
    touch(Path::new(uri.path.as_ref()), mode)
}

fn touch(path: &Path, mode: u32) -> Result<(), Error> {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    options.open(path).map(drop).map_err(Error::CreateResource)
}
