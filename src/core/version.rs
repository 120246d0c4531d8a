//! Version identifiers and major-version keys.
//!
//! A version string is treated as opaque except for two projections:
//!
//! - its **major key**: the leading run of digits of the first dot-separated
//!   segment, cut at the first hyphen (`"2a"` → `2`, `"10.3-beta"` → `10`);
//! - its **numeric components**: one number per dot-separated part, taken from
//!   the part's leading digits, `0` when there are none (`"2.0a1"` → `[2, 0]`,
//!   `"1.x"` → `[1, 0]`).
//!
//! Components only order versions of the same major lineage, so
//! [`VersionIdentifier`] deliberately has no `Ord` impl.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Key of a major-version lineage: the digits of the leading version number
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MajorKey(String);

impl MajorKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn significant_digits(&self) -> &str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }
}

impl Ord for MajorKey {
    // Numeric order without parsing, so arbitrarily long digit runs still sort
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.significant_digits(), other.significant_digits());
        a.len()
            .cmp(&b.len())
            .then_with(|| a.cmp(b))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for MajorKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MajorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for MajorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Extract the major key of a raw version string, if it has one
pub fn major_key(raw: &str) -> Option<MajorKey> {
    let first_segment = raw.split('.').next().unwrap_or_default();
    let prefix = first_segment.split('-').next().unwrap_or_default();
    let digits = leading_digits(prefix);
    if digits.is_empty() {
        None
    } else {
        Some(MajorKey(digits.to_string()))
    }
}

fn leading_digits(part: &str) -> &str {
    let end = part
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(part.len());
    &part[..end]
}

fn parse_components(raw: &str) -> Vec<u64> {
    raw.split('.')
        .map(|part| {
            let digits = leading_digits(part);
            if digits.is_empty() {
                0
            } else {
                digits.parse().unwrap_or(u64::MAX)
            }
        })
        .collect()
}

/// A published version string with its numeric components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionIdentifier {
    raw: String,
    components: Vec<u64>,
}

impl VersionIdentifier {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let components = parse_components(&raw);
        Self { raw, components }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    pub fn major_key(&self) -> Option<MajorKey> {
        major_key(&self.raw)
    }

    /// Compare numeric components, treating missing trailing components as 0
    pub fn compare_components(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| {
                let a = self.components.get(i).copied().unwrap_or(0);
                let b = other.components.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for VersionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for VersionIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> Option<String> {
        major_key(raw).map(|k| k.as_str().to_string())
    }

    #[test]
    fn test_major_key_extraction() {
        assert_eq!(key("1.0"), Some("1".to_string()));
        assert_eq!(key("2a"), Some("2".to_string()));
        assert_eq!(key("10.3-beta"), Some("10".to_string()));
        assert_eq!(key("3-rc1"), Some("3".to_string()));
        assert_eq!(key("2.0a1"), Some("2".to_string()));
    }

    #[test]
    fn test_major_key_absent() {
        assert_eq!(key("bogus"), None);
        assert_eq!(key("v1.0"), None);
        assert_eq!(key(""), None);
        assert_eq!(key(".5"), None);
        assert_eq!(key("-1"), None);
    }

    #[test]
    fn test_major_key_numeric_order() {
        let mut keys: Vec<MajorKey> = ["10", "2", "1", "02"]
            .iter()
            .filter_map(|v| major_key(v))
            .collect();
        keys.sort();
        let ordered: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
        assert_eq!(ordered, vec!["1", "02", "2", "10"]);
    }

    #[test]
    fn test_components() {
        assert_eq!(VersionIdentifier::new("1.2.3").components(), &[1, 2, 3]);
        assert_eq!(VersionIdentifier::new("2.0a1").components(), &[2, 0]);
        assert_eq!(VersionIdentifier::new("1.x.4").components(), &[1, 0, 4]);
        assert_eq!(VersionIdentifier::new("10.3-beta").components(), &[10, 3]);
    }

    #[test]
    fn test_compare_pads_with_zero() {
        let a = VersionIdentifier::new("1.0");
        let b = VersionIdentifier::new("1.0.0");
        let c = VersionIdentifier::new("1.0.1");
        assert_eq!(a.compare_components(&b), Ordering::Equal);
        assert_eq!(a.compare_components(&c), Ordering::Less);
        assert_eq!(c.compare_components(&b), Ordering::Greater);
    }

    #[test]
    fn test_compare_is_numeric_not_lexical() {
        let a = VersionIdentifier::new("1.9");
        let b = VersionIdentifier::new("1.10");
        assert_eq!(a.compare_components(&b), Ordering::Less);
    }
}
