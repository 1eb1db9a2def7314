//! Path segment encoding
//!
//! Every storage id is a `/`-delimited path whose segments are percent-encoded
//! independently, so a segment may carry any string (including `/` and `%`)
//! without changing the shape of the path.

use crate::core::error::AddressError;

pub const PATH_SEPARATOR: char = '/';

/// Percent-encode a single path segment.
///
/// Only `A-Z a-z 0-9 - _ . ~` pass through unchanged.
///
/// # Examples
///
/// ```
/// use keyway::core::path::encode_segment;
///
/// assert_eq!(encode_segment("my chat/1"), "my%20chat%2F1");
/// ```
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Decode a segment produced by [`encode_segment`].
///
/// Any `%` that is not followed by two hex digits, and any escape sequence
/// that does not decode to UTF-8, is rejected.
pub fn decode_segment(segment: &str) -> Result<String, AddressError> {
    validate_escapes(segment)?;
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .map_err(|err| AddressError::malformed(segment, format!("invalid UTF-8: {err}")))
}

fn validate_escapes(segment: &str) -> Result<(), AddressError> {
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(AddressError::malformed(
                    segment,
                    format!("incomplete escape at byte {i}"),
                ));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Join path pieces with `/`, skipping empty pieces.
///
/// # Examples
///
/// ```
/// use keyway::core::path::join_path;
///
/// assert_eq!(join_path(["files", "", "docs", "a.txt"]), "files/docs/a.txt");
/// ```
pub fn join_path<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = String::new();
    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() {
            continue;
        }
        if !path.is_empty() {
            path.push(PATH_SEPARATOR);
        }
        path.push_str(segment);
    }
    path
}

/// Encode every segment of a whole path.
pub fn encode_path(path: &str) -> String {
    path.split(PATH_SEPARATOR)
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Decode every segment of a whole path.
pub fn decode_path(path: &str) -> Result<String, AddressError> {
    let decoded = path
        .split(PATH_SEPARATOR)
        .map(decode_segment)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(decoded.join("/"))
}

/// Non-empty segments of a path.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR).filter(|s| !s.is_empty())
}

/// Folder id of an entity id: everything before the last `/`.
pub fn parent_path(id: &str) -> Option<&str> {
    id.rfind(PATH_SEPARATOR)
        .map(|idx| &id[..idx])
        .filter(|parent| !parent.is_empty())
}

/// Last segment of an id.
pub fn leaf_segment(id: &str) -> &str {
    id.rsplit(PATH_SEPARATOR).next().unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_round_trips() {
        for input in [
            "",
            "plain",
            "with/slash",
            "100% sure",
            "%2F already encoded",
            "naïve café ☕",
            "a__b",
            "..",
            "tab\tand\nnewline",
        ] {
            let encoded = encode_segment(input);
            assert!(!encoded.contains('/'), "encoded {input:?} as {encoded:?}");
            assert_eq!(decode_segment(&encoded).unwrap(), input);
        }
    }

    #[test]
    fn decode_rejects_bad_escapes() {
        for input in ["%", "%2", "abc%g1", "%zz", "trailing%4"] {
            match decode_segment(input) {
                Err(AddressError::MalformedPathSegment { segment, .. }) => {
                    assert_eq!(segment, input)
                }
                other => panic!("expected malformed error for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        assert!(matches!(
            decode_segment("%FF%FE"),
            Err(AddressError::MalformedPathSegment { .. })
        ));
    }

    #[test]
    fn join_skips_empty_segments() {
        assert_eq!(join_path(["a", "", "b"]), "a/b");
        assert_eq!(join_path(Vec::<String>::new()), "");
        assert_eq!(join_path(["", ""]), "");
        let folder: Option<&str> = None;
        assert_eq!(join_path(["root"].into_iter().chain(folder)), "root");
    }

    #[test]
    fn whole_path_codec() {
        let path = "files/my docs/a b.txt";
        let encoded = encode_path(path);
        assert_eq!(encoded, "files/my%20docs/a%20b.txt");
        assert_eq!(decode_path(&encoded).unwrap(), path);
        assert!(decode_path("files/%zz").is_err());
    }

    #[test]
    fn parent_and_leaf() {
        assert_eq!(parent_path("files/docs/a.txt"), Some("files/docs"));
        assert_eq!(parent_path("files"), None);
        assert_eq!(parent_path("/files"), None);
        assert_eq!(leaf_segment("files/docs/a.txt"), "a.txt");
        assert_eq!(leaf_segment("files"), "files");
        assert_eq!(split_path("/a//b/").collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
