//! Release ordering.
//!
//! Newest first: version descending, then build descending, then the core
//! bulletin ahead of any other type. Type name and canonical path break the
//! remaining ties so the result never depends on input order.

use std::cmp::Ordering;

/// Fields needed to order a release document.
pub trait ReleaseKey {
    /// Dotted version string.
    fn version(&self) -> &str;

    /// Numeric build string.
    fn build(&self) -> &str;

    /// Bulletin role.
    fn bulletin_type(&self) -> &str;

    /// Unique document path.
    fn canonical_path(&self) -> &str;
}

/// Compare dotted versions numerically, component by component.
///
/// Missing trailing components count as 0, as do components that are not
/// numbers, so `"10.0"` equals `"10.0.0"` and `"10.0.0"` is greater than `"9.9.9"`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a_parts: Vec<u64> = a.split('.').map(numeric_or_zero).collect();
    let b_parts: Vec<u64> = b.split('.').map(numeric_or_zero).collect();

    let len = a_parts.len().max(b_parts.len());
    for i in 0..len {
        let a_part = a_parts.get(i).copied().unwrap_or(0);
        let b_part = b_parts.get(i).copied().unwrap_or(0);
        match a_part.cmp(&b_part) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Compare build strings numerically.
pub fn compare_builds(a: &str, b: &str) -> Ordering {
    numeric_or_zero(a).cmp(&numeric_or_zero(b))
}

/// Full release ordering, newest first.
pub fn compare_releases<T: ReleaseKey>(a: &T, b: &T) -> Ordering {
    compare_versions(b.version(), a.version())
        .then_with(|| compare_builds(b.build(), a.build()))
        .then_with(|| core_first(a.bulletin_type(), b.bulletin_type()))
        .then_with(|| a.bulletin_type().cmp(b.bulletin_type()))
        .then_with(|| a.canonical_path().cmp(b.canonical_path()))
}

/// Sort releases newest first.
pub fn sort_releases<T: ReleaseKey>(releases: &mut [T]) {
    releases.sort_by(compare_releases);
}

fn core_first(a: &str, b: &str) -> Ordering {
    match (a == "core", b == "core") {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn numeric_or_zero(part: &str) -> u64 {
    part.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_compare_numerically() {
        assert_eq!(compare_versions("10.0.0", "9.9.9"), Ordering::Greater);
        assert_eq!(compare_versions("17.5.10", "17.5.2"), Ordering::Greater);
        assert_eq!(compare_versions("12.0", "12.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("12.0.1", "12.0"), Ordering::Greater);
    }

    #[test]
    fn test_non_numeric_components_count_as_zero() {
        assert_eq!(compare_versions("1.x.0", "1.0.0"), Ordering::Equal);
        assert_eq!(compare_builds("abc", "0"), Ordering::Equal);
        assert_eq!(compare_builds("100", "99"), Ordering::Greater);
    }

    #[test]
    fn test_core_first() {
        assert_eq!(core_first("core", "packages"), Ordering::Less);
        assert_eq!(core_first("packages", "core"), Ordering::Greater);
        assert_eq!(core_first("packages", "tools"), Ordering::Equal);
    }
}
