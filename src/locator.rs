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

//! Interpretation of output-path strings as generic URI references.
//!
//! Output paths are ambiguous by design: `stdout`, `/var/log/app.json`,
//! `logs/app.json`, and `file:///var/log/app.json` are all accepted. This
//! module decomposes such a string into scheme, path, and query without
//! requiring a scheme, while still rejecting strings that cannot be a URI
//! reference at all (malformed percent-escapes, control characters, a bare
//! leading colon).

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Failure to interpret a string as a URI reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    /// A `%` not followed by two hex digits.
    #[error("invalid percent-escape {escape:?} in {input:?}")]
    InvalidEscape {
        /// The malformed escape sequence.
        escape: String,
        /// The full input.
        input: String,
    },

    /// The input contains an ASCII control character.
    #[error("control character in {input:?}")]
    ControlCharacter {
        /// The full input.
        input: String,
    },

    /// The input starts with a colon, so the scheme is empty.
    #[error("missing scheme in {input:?}")]
    MissingScheme {
        /// The full input.
        input: String,
    },
}

/// A decomposed URI reference. The path component is percent-decoded; the
/// query is kept raw for the sink machinery to parse.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct UriRef<'a> {
    pub scheme: Option<&'a str>,
    pub path: Cow<'a, str>,
    pub query: Option<&'a str>,
}

impl UriRef<'_> {
    /// Whether this reference names a filesystem path: no scheme at all, or
    /// the `file` scheme.
    pub(crate) fn is_file(&self) -> bool {
        match self.scheme {
            None => true,
            Some(scheme) => scheme.eq_ignore_ascii_case("file"),
        }
    }
}

pub(crate) fn split(input: &str) -> Result<UriRef<'_>, LocatorError> {
    if input.bytes().any(|b| b.is_ascii_control()) {
        return Err(LocatorError::ControlCharacter {
            input: input.to_owned(),
        });
    }
    validate_escapes(input)?;

    let rest = match input.split_once('#') {
        Some((rest, _fragment)) => rest,
        None => input,
    };

    let (scheme, rest) = split_scheme(rest)?;

    // An authority segment is skipped: sinks are addressed by path alone.
    let rest = match rest.strip_prefix("//") {
        Some(rest) => {
            let end = rest.find(['/', '?']).unwrap_or(rest.len());
            &rest[end..]
        }
        None => rest,
    };

    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };

    Ok(UriRef {
        scheme,
        path: percent_decode_str(path).decode_utf8_lossy(),
        query,
    })
}

/// Splits a leading `scheme:` off `input`. A candidate that is not a valid
/// scheme name demotes the whole input to a path, matching how a relative
/// filesystem path like `a/b:c` must be treated.
fn split_scheme(input: &str) -> Result<(Option<&str>, &str), LocatorError> {
    match input.find(':') {
        Some(0) => Err(LocatorError::MissingScheme {
            input: input.to_owned(),
        }),
        Some(idx) if is_scheme(&input[..idx]) => Ok((Some(&input[..idx]), &input[idx + 1..])),
        _ => Ok((None, input)),
    }
}

/// A valid scheme name: ALPHA followed by ALPHA / DIGIT / `+` / `-` / `.`.
pub(crate) fn is_scheme(candidate: &str) -> bool {
    let mut bytes = candidate.bytes();
    bytes.next().is_some_and(|b| b.is_ascii_alphabetic())
        && bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
}

fn validate_escapes(input: &str) -> Result<(), LocatorError> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let end = usize::min(i + 3, bytes.len());
                return Err(LocatorError::InvalidEscape {
                    escape: input[i..end].to_owned(),
                    input: input.to_owned(),
                });
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}
