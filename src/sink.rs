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
use std::str::FromStr;

use url::form_urlencoded;

use crate::Error;
use crate::append::Append;
use crate::append::RotatingFile;
use crate::append::RotatingFileWriter;
use crate::append::SingleFile;
use crate::append::Stderr;
use crate::append::Stdout;
use crate::layout::Layout;
use crate::locator;
use crate::transform::STDERR;
use crate::transform::STDOUT;

/// Opens the sink named by a resolved locator.
///
/// Sentinels map to the stdio appenders; a locator under `rotation_scheme`
/// maps to a rotating file appender parameterized from its query; a bare or
/// `file`-scheme path maps to a plain append-mode file. Anything else is an
/// [`Error::UnsupportedScheme`].
pub(crate) fn open_sink(
    resolved: &str,
    layout: Layout,
    rotation_scheme: &str,
    mode: u32,
) -> Result<Box<dyn Append>, Error> {
    if resolved == STDOUT {
        return Ok(Box::new(Stdout::new(layout)));
    }
    if resolved == STDERR {
        return Ok(Box::new(Stderr::new(layout)));
    }

    let uri = locator::split(resolved).map_err(|source| Error::Locator {
        path: resolved.to_owned(),
        source,
    })?;

    match uri.scheme {
        Some(scheme) if scheme.eq_ignore_ascii_case(rotation_scheme) => {
            let mut builder = RotatingFileWriter::builder();
            if mode != 0 {
                builder = builder.file_mode(mode);
            }
            for (key, value) in form_urlencoded::parse(uri.query.unwrap_or_default().as_bytes()) {
                builder = match key.as_ref() {
                    "maxSize" => builder.max_size_mb(parse_param(&key, &value)?),
                    "maxAge" => builder.max_age_days(parse_param(&key, &value)?),
                    "maxBackups" => builder.max_backups(parse_param(&key, &value)?),
                    "localTime" => builder.local_time(parse_param(&key, &value)?),
                    "compress" => builder.compress(parse_param(&key, &value)?),
                    _ => builder,
                };
            }
            let writer = builder
                .build(uri.path.as_ref())
                .map_err(into_create_error)?;
            Ok(Box::new(RotatingFile::new(writer, layout)))
        }
        None => open_file(uri.path.as_ref(), layout),
        Some(scheme) if scheme.eq_ignore_ascii_case("file") => open_file(uri.path.as_ref(), layout),
        Some(scheme) => Err(Error::UnsupportedScheme {
            scheme: scheme.to_owned(),
        }),
    }
}

fn open_file(path: &str, layout: Layout) -> Result<Box<dyn Append>, Error> {
    let appender = SingleFile::new(path, layout).map_err(into_create_error)?;
    Ok(Box::new(appender))
}

fn into_create_error(err: anyhow::Error) -> Error {
    Error::CreateResource(io::Error::other(err))
}

fn parse_param<T: FromStr>(key: &str, value: &str) -> Result<T, Error> {
    value.parse().map_err(|_| Error::InvalidRotationParam {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::rotation::ROTATION_SCHEME;

    fn open(resolved: &str) -> Result<Box<dyn Append>, Error> {
        open_sink(resolved, Layout::default(), ROTATION_SCHEME, 0)
    }

    #[test]
    fn test_sentinels() {
        open("stdout").unwrap();
        open("stderr").unwrap();
    }

    #[test]
    fn test_plain_and_file_scheme_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.log");
        open(path.to_str().unwrap()).unwrap();
        assert!(path.exists());

        let path = dir.path().join("scheme.log");
        open(&format!("file://{}", path.display())).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_rotation_locator() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rotated.log");
        let locator = format!(
            "rotation://{}?compress=true&maxBackups=3&maxSize=47",
            path.display()
        );
        open(&locator).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_rotation_locator_bad_param() {
        let dir = TempDir::new().unwrap();
        let locator = format!(
            "rotation://{}?maxSize=huge",
            dir.path().join("rotated.log").display()
        );
        assert!(matches!(
            open(&locator),
            Err(Error::InvalidRotationParam { .. })
        ));
    }

    #[test]
    fn test_unsupported_scheme() {
        assert!(matches!(
            open("syslog://remote/app"),
            Err(Error::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn test_custom_rotation_scheme() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lj.log");
        let locator = format!("lumberjack://{}?maxSize=1", path.display());
        open_sink(&locator, Layout::default(), "lumberjack", 0).unwrap();
        assert!(path.exists());
    }
}
