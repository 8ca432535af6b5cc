//! Text encoding shared by the backends.
//!
//! Both media store entries as `key=value` where the key is the percent-encoded
//! project id and the value is the percent-encoded JSON of the whole project.
//! Percent-encoding keeps `;`, `=`, `&` and `#` out of the raw medium.

use crate::domain::error::{ProjstashError, Result};
use crate::domain::Project;

/// Encodes a project id for use as a cookie name or fragment key.
#[must_use]
pub fn encode_key(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Returns `true` if a raw key from the medium names `id`.
///
/// Keys that are not valid percent-encoding are compared verbatim.
#[must_use]
pub fn key_matches(raw_key: &str, id: &str) -> bool {
    urlencoding::decode(raw_key).map_or(raw_key == id, |key| key == id)
}

/// Serializes a project to a percent-encoded JSON value.
///
/// # Errors
///
/// Returns [`ProjstashError::InvalidProject`] for an empty id, or
/// [`ProjstashError::Serialization`] if JSON encoding fails.
pub fn encode_project(project: &Project) -> Result<String> {
    project.validate()?;
    let json = serde_json::to_string(project)?;
    Ok(urlencoding::encode(&json).into_owned())
}

/// Deserializes a percent-encoded JSON value back into a project.
///
/// # Errors
///
/// Returns [`ProjstashError::Decode`] for malformed percent-encoding and
/// [`ProjstashError::Serialization`] for malformed JSON.
pub fn decode_project(value: &str) -> Result<Project> {
    let json = urlencoding::decode(value)
        .map_err(|e| ProjstashError::Decode(format!("invalid percent-encoding: {e}")))?;
    Ok(serde_json::from_str(&json)?)
}

/// Builds a `key=value` entry for a project.
///
/// # Errors
///
/// Propagates errors from [`encode_project`].
pub fn encode_entry(project: &Project) -> Result<String> {
    Ok(format!("{}={}", encode_key(&project.id), encode_project(project)?))
}

/// Splits a `key=value` entry at the first `=`.
#[must_use]
pub fn split_entry(entry: &str) -> Option<(&str, &str)> {
    entry.trim().split_once('=')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Version;

    #[test]
    fn encoded_entry_has_no_medium_delimiters() {
        let project = Project::new("a;b=c&d#e", "x; y=z & w").with_version(Version::new("h", 1));
        let entry = encode_entry(&project).unwrap();

        let (key, value) = split_entry(&entry).unwrap();
        for delimiter in [';', '=', '&', '#', ' '] {
            assert!(!key.contains(delimiter), "key contains {delimiter:?}");
            assert!(!value.contains(delimiter), "value contains {delimiter:?}");
        }
        assert!(key_matches(key, "a;b=c&d#e"));
        assert_eq!(decode_project(value).unwrap(), project);
    }

    #[test]
    fn empty_id_cannot_be_encoded() {
        assert!(matches!(
            encode_project(&Project::new("", "x")),
            Err(ProjstashError::InvalidProject(_))
        ));
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(matches!(decode_project("%7Bnot-json"), Err(ProjstashError::Serialization(_))));
        assert!(matches!(decode_project("%FF%FE"), Err(ProjstashError::Decode(_))));
    }

    #[test]
    fn invalid_key_encoding_compares_verbatim() {
        assert!(key_matches("%FF", "%FF"));
        assert!(!key_matches("%FF", "other"));
    }
}
