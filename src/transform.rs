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

use std::borrow::Cow;
use std::env;
use std::fmt;
use std::sync::Arc;

use crate::locator;
use crate::locator::LocatorError;
use crate::rotation::ROTATION_SCHEME;
use crate::rotation::Rotation;

/// Reserved output path name that corresponds to stdout.
pub const STDOUT: &str = "stdout";

/// Reserved output path name that corresponds to stderr.
pub const STDERR: &str = "stderr";

/// A lookup used to expand `$var` and `${var}` references in output paths.
///
/// The lookup returns `None` for unknown variables, which expand to the empty
/// string rather than raising an error.
#[derive(Clone)]
pub struct Mapping(Arc<dyn Fn(&str) -> Option<String> + Send + Sync>);

impl Mapping {
    /// Creates a mapping from a lookup function.
    ///
    /// # Examples
    ///
    /// ```
    /// use logwright::Mapping;
    ///
    /// let mapping = Mapping::new(|name| (name == "LOG_DIR").then(|| "/var/log".to_owned()));
    /// ```
    pub fn new(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Mapping(Arc::new(lookup))
    }

    /// A mapping backed by the process environment.
    pub fn env() -> Self {
        Mapping::new(|name| env::var(name).ok())
    }

    pub(crate) fn expand(&self, path: &str) -> String {
        shellexpand::env_with_context_no_errors(path, |name| {
            Some((self.0)(name).unwrap_or_default())
        })
        .into_owned()
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mapping(..)")
    }
}

/// A strategy for altering output paths to incorporate variable expansion and
/// log rotation.
///
/// # Examples
///
/// ```
/// use logwright::PathTransformer;
/// use logwright::Rotation;
///
/// let transformer = PathTransformer {
///     rotation: Some(Rotation {
///         max_age: 10,
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
/// assert_eq!(
///     transformer.transform("/var/log/app.json").unwrap(),
///     "rotation:///var/log/app.json?maxAge=10"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathTransformer {
    /// Optional rotation configuration. If supplied, locators that refer to
    /// filesystem paths are rewritten into rotation locators.
    pub rotation: Option<Rotation>,

    /// Optional expansion mapping. If supplied, it is always applied to a
    /// path first.
    pub mapping: Option<Mapping>,

    /// Scheme name for rewritten locators. `None` means [`ROTATION_SCHEME`].
    pub scheme: Option<String>,
}

impl PathTransformer {
    /// Alters a path to allow for log rotation and expanded variables.
    ///
    /// The path is expanded first. The `stdout` and `stderr` sentinels are
    /// then returned unchanged. Without a rotation configuration the expanded
    /// path is returned as is, valid URI reference or not. With one, the path
    /// is parsed as a URI reference and rewritten into a rotation locator when
    /// it names a filesystem path; locators under any other scheme pass
    /// through untouched.
    pub fn transform(&self, path: &str) -> Result<String, LocatorError> {
        let path = match &self.mapping {
            Some(mapping) => Cow::Owned(mapping.expand(path)),
            None => Cow::Borrowed(path),
        };

        if path == STDOUT || path == STDERR {
            return Ok(path.into_owned());
        }

        let Some(rotation) = &self.rotation else {
            return Ok(path.into_owned());
        };

        let uri = locator::split(&path)?;
        if !uri.path.is_empty() && uri.is_file() {
            let scheme = self.scheme.as_deref().unwrap_or(ROTATION_SCHEME);
            return Ok(rotation.to_locator(scheme, &uri.path));
        }

        Ok(path.into_owned())
    }
}

/// Transforms each of a set of paths using the supplied strategy.
///
/// The transformer parameter can be
/// [`PathTransformer::transform`] or a custom closure. This function always
/// returns a freshly allocated vector, even when `paths` is empty. The first
/// error interrupts the transformation and is returned; no partial results
/// survive it.
pub fn apply_transform<T, S, E>(mut transformer: T, paths: &[S]) -> Result<Vec<String>, E>
where
    T: FnMut(&str) -> Result<String, E>,
    S: AsRef<str>,
{
    let mut transformed = Vec::with_capacity(paths.len());
    for path in paths {
        transformed.push(transformer(path.as_ref())?);
    }
    Ok(transformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> Mapping {
        Mapping::new(|name| match name {
            "LOG_DIR" => Some("/var/log".to_owned()),
            "SINK" => Some("stdout".to_owned()),
            _ => None,
        })
    }

    #[test]
    fn test_expansion() {
        let transformer = PathTransformer {
            mapping: Some(mapping()),
            ..Default::default()
        };
        assert_eq!(
            transformer.transform("${LOG_DIR}/app.json").unwrap(),
            "/var/log/app.json"
        );
        assert_eq!(transformer.transform("$LOG_DIR/app.json").unwrap(), "/var/log/app.json");
        // unknown variables expand to the empty string
        assert_eq!(transformer.transform("${NO_SUCH_VAR}/app.json").unwrap(), "/app.json");
    }

    #[test]
    fn test_expansion_applies_before_sentinel_check() {
        let transformer = PathTransformer {
            rotation: Some(Rotation {
                max_size: 10,
                ..Default::default()
            }),
            mapping: Some(mapping()),
            ..Default::default()
        };
        assert_eq!(transformer.transform("$SINK").unwrap(), "stdout");
    }

    #[test]
    fn test_env_mapping() {
        let path = std::env::var("PATH").unwrap_or_default();
        assert_eq!(Mapping::env().expand("$PATH"), path);
    }

    #[test]
    fn test_sentinels_never_rewritten() {
        let transformer = PathTransformer {
            rotation: Some(Rotation {
                max_size: 10,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(transformer.transform("stdout").unwrap(), "stdout");
        assert_eq!(transformer.transform("stderr").unwrap(), "stderr");
    }

    #[test]
    fn test_no_rotation_means_no_parsing() {
        let transformer = PathTransformer::default();
        assert_eq!(transformer.transform("/var/log/app.json").unwrap(), "/var/log/app.json");
        // not a parseable URI reference, returned untouched anyway
        assert_eq!(transformer.transform("#%@(&%(@%XX").unwrap(), "#%@(&%(@%XX");
    }

    #[test]
    fn test_rotation_rewrites_file_paths() {
        let transformer = PathTransformer {
            rotation: Some(Rotation {
                max_age: 10,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            transformer.transform("/var/log/app.json").unwrap(),
            "rotation:///var/log/app.json?maxAge=10"
        );
        // relative paths are rewritten too
        assert_eq!(
            transformer.transform("logs/app.json").unwrap(),
            "rotation://logs/app.json?maxAge=10"
        );
    }

    #[test]
    fn test_rotation_rewrites_file_scheme() {
        let transformer = PathTransformer {
            rotation: Some(Rotation {
                max_size: 47,
                max_backups: 5,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            transformer.transform("file:///var/log/app.json").unwrap(),
            "rotation:///var/log/app.json?maxBackups=5&maxSize=47"
        );
    }

    #[test]
    fn test_rotation_leaves_other_schemes() {
        let transformer = PathTransformer {
            rotation: Some(Rotation {
                max_size: 47,
                ..Default::default()
            }),
            ..Default::default()
        };
        // rewriting is idempotent: the rotation scheme is not `file`
        let rewritten = transformer.transform("/var/log/app.json").unwrap();
        assert_eq!(transformer.transform(&rewritten).unwrap(), rewritten);
        assert_eq!(
            transformer.transform("syslog://remote/app").unwrap(),
            "syslog://remote/app"
        );
    }

    #[test]
    fn test_rotation_with_custom_scheme() {
        let transformer = PathTransformer {
            rotation: Some(Rotation::default()),
            scheme: Some("lumberjack".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            transformer.transform("/var/log/foo.json").unwrap(),
            "lumberjack:///var/log/foo.json"
        );
    }

    #[test]
    fn test_rotation_surfaces_parse_failures() {
        let transformer = PathTransformer {
            rotation: Some(Rotation::default()),
            ..Default::default()
        };
        assert!(transformer.transform("#%@(&%(@%XX").is_err());
    }

    #[test]
    fn test_apply_transform_empty() {
        let transformed =
            apply_transform(|path| Ok::<_, LocatorError>(path.to_owned()), &[] as &[&str]).unwrap();
        assert!(transformed.is_empty());
    }

    #[test]
    fn test_apply_transform_stops_at_first_error() {
        let mut calls = 0;
        let result = apply_transform(
            |path| {
                calls += 1;
                if path == "2" { Err("boom") } else { Ok(path.to_owned()) }
            },
            &["1", "2", "3"],
        );
        assert_eq!(result, Err("boom"));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_apply_transform_preserves_order() {
        let transformed = apply_transform(
            |path| Ok::<_, LocatorError>(format!("{path}!")),
            &["a", "b", "c"],
        )
        .unwrap();
        assert_eq!(transformed, ["a!", "b!", "c!"]);
    }
}
