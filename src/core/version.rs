//! Package version ordering
//!
//! Versions are either numbered (`0.6.2`, `2.18`) or named after a branch
//! (`master`, `development`). Branch names of the main development line sort
//! above every numbered version; other names sort below them.

use semver::Version;
use std::cmp::Ordering;

/// Branch names treated as newer than any release, newest first
pub const INFINITY_VERSIONS: &[&str] = &["develop", "development", "main", "master", "head", "trunk"];

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Named(String),
    Numbered(Version),
    // Lower index means newer, so store the reversed index.
    Infinity(usize),
}

fn rank(version: &str) -> Rank {
    if let Some(index) = INFINITY_VERSIONS.iter().position(|v| *v == version) {
        return Rank::Infinity(INFINITY_VERSIONS.len() - index);
    }
    parse_numbered(version).map_or_else(|| Rank::Named(version.to_string()), Rank::Numbered)
}

/// Parse `1`, `1.2` or `1.2.3` as a semver version, padding with zeros
pub fn parse_numbered(version: &str) -> Option<Version> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part.parse().ok()?;
    }
    Some(Version::new(numbers[0], numbers[1], numbers[2]))
}

/// Compare two version strings
pub fn compare(a: &str, b: &str) -> Ordering {
    rank(a).cmp(&rank(b))
}

/// Whether `version` is at least `floor`
pub fn at_least(version: &str, floor: &str) -> bool {
    compare(version, floor) != Ordering::Less
}
