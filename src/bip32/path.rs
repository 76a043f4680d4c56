//! Derivation path parsing
//!
//! Paths use the familiar `m/44'/0'/0'` notation. A hardened step is
//! marked with a trailing `'`, `H` or `h`. A segment of `pub` (or
//! `.pub`) switches the walk to the public side, and a numeric segment
//! may carry a `.pub` suffix to derive the child and then project it in
//! one step.

use crate::bip32::HARDENED_OFFSET;
use crate::error::{Error, Result};

/// One step of a derivation path walk
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathStep {
    /// Derive the child at this index (already offset if hardened)
    Child(u32),
    /// Drop the private half and continue with the public key
    Project,
}

/// Parse a path string into its steps. `"m"` and `"m/"` alone yield no
/// steps; a trailing slash is tolerated, interior empty segments are not.
pub fn parse_path(path: &str) -> Result<Vec<PathStep>> {
    let mut segments = path.split('/');
    if segments.next() != Some("m") {
        return Err(Error::InvalidPath {
            reason: "path must start with 'm'",
        });
    }

    let mut segments: Vec<&str> = segments.collect();
    if segments.last() == Some(&"") {
        segments.pop();
    }

    let mut steps = Vec::new();
    for segment in segments {
        parse_segment(segment, &mut steps)?;
    }
    Ok(steps)
}

fn parse_segment(segment: &str, steps: &mut Vec<PathStep>) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::InvalidPath {
            reason: "empty path segment",
        });
    }
    if segment == "pub" || segment == ".pub" {
        steps.push(PathStep::Project);
        return Ok(());
    }

    let (body, project) = match segment.strip_suffix(".pub") {
        Some(body) => (body, true),
        None => (segment, false),
    };

    let (digits, hardened) = match body
        .strip_suffix('\'')
        .or_else(|| body.strip_suffix('H'))
        .or_else(|| body.strip_suffix('h'))
    {
        Some(digits) => (digits, true),
        None => (body, false),
    };

    let index: u32 = digits.parse().map_err(|_| Error::InvalidPath {
        reason: "segment is not a child index",
    })?;

    let index = if hardened {
        if index >= HARDENED_OFFSET {
            return Err(Error::InvalidPath {
                reason: "hardened index out of range",
            });
        }
        index + HARDENED_OFFSET
    } else {
        // a literal index at or above 2^31 already encodes hardening
        index
    };

    steps.push(PathStep::Child(index));
    if project {
        steps.push(PathStep::Project);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root_only() {
        assert_eq!(parse_path("m").unwrap(), vec![]);
        assert_eq!(parse_path("m/").unwrap(), vec![]);
        assert_eq!(parse_path("m/.pub").unwrap(), vec![PathStep::Project]);
    }

    #[test]
    fn test_parse_mixed_steps() {
        let steps = parse_path("m/44'/0H/1h/2/pub").unwrap();
        assert_eq!(
            steps,
            vec![
                PathStep::Child(44 + HARDENED_OFFSET),
                PathStep::Child(HARDENED_OFFSET),
                PathStep::Child(1 + HARDENED_OFFSET),
                PathStep::Child(2),
                PathStep::Project,
            ]
        );
    }

    #[test]
    fn test_parse_inline_pub_suffix() {
        let steps = parse_path("m/0'/5.pub/3").unwrap();
        assert_eq!(
            steps,
            vec![
                PathStep::Child(HARDENED_OFFSET),
                PathStep::Child(5),
                PathStep::Project,
                PathStep::Child(3),
            ]
        );
    }

    #[test]
    fn test_parse_literal_hardened_value() {
        let steps = parse_path("m/2147483648").unwrap();
        assert_eq!(steps, vec![PathStep::Child(HARDENED_OFFSET)]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_path("").is_err());
        assert!(parse_path("n/0").is_err());
        assert!(parse_path("m//0").is_err());
        assert!(parse_path("m//").is_err());
        assert!(parse_path("m/abc").is_err());
        assert!(parse_path("m/2147483648'").is_err());
        assert!(parse_path("m/4294967296").is_err());
    }
}
