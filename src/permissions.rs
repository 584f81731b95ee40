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

use crate::Error;

/// Parses a nix-style file permissions value.
///
/// The value must be a 3-digit octal integer with an optional leading zero,
/// e.g. `"644"` or `"0644"`. The empty string parses to zero, which callers
/// must treat as "no permission enforcement" rather than mode `0`.
///
/// # Examples
///
/// ```
/// use logwright::parse_permissions;
///
/// assert_eq!(parse_permissions("0744").unwrap(), 0o744);
/// assert_eq!(parse_permissions("").unwrap(), 0);
/// assert!(parse_permissions("9000").is_err());
/// ```
pub fn parse_permissions(spec: &str) -> Result<u32, Error> {
    if spec.is_empty() {
        return Ok(0);
    }

    let bytes = spec.as_bytes();
    let digits = match bytes.len() {
        3 => bytes,
        4 if bytes[0] == b'0' => &bytes[1..],
        _ => {
            return Err(Error::InvalidPermissions {
                spec: spec.to_owned(),
            });
        }
    };

    let mut mode = 0;
    for &digit in digits {
        match octal(digit) {
            Some(value) => mode = mode * 8 + value,
            None => {
                return Err(Error::InvalidPermissions {
                    spec: spec.to_owned(),
                });
            }
        }
    }

    Ok(mode)
}

fn octal(digit: u8) -> Option<u32> {
    (b'0'..=b'7')
        .contains(&digit)
        .then(|| u32::from(digit - b'0'))
}

#[cfg(test)]
mod tests {
    use super::parse_permissions;

    #[test]
    fn test_parse_valid_permissions() {
        assert_eq!(parse_permissions("").unwrap(), 0);
        assert_eq!(parse_permissions("000").unwrap(), 0);
        assert_eq!(parse_permissions("644").unwrap(), 0o644);
        assert_eq!(parse_permissions("0644").unwrap(), 0o644);
        assert_eq!(parse_permissions("0744").unwrap(), 0o744);
        assert_eq!(parse_permissions("777").unwrap(), 0o777);
    }

    #[test]
    fn test_parse_invalid_permissions() {
        for spec in [
            "0", "00", "64", "07", "9000", "008", "6 4", "rwx", "0rwx", "1644", "06444", "00644",
        ] {
            assert!(parse_permissions(spec).is_err(), "{spec:?} should not parse");
        }
    }
}
