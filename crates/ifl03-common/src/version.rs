//! Lenient dotted-version handling shared by the version label and the
//! release checker.

use std::cmp::Ordering;

/// Strip whitespace and a leading `v`/`V` from a tag or version string.
pub fn normalize_version(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix(['v', 'V'])
        .unwrap_or(trimmed)
        .to_string()
}

/// Compare two dotted versions component by component.
///
/// Each component contributes its leading digits (`"3-beta"` is 3, junk is
/// 0) and missing components count as 0, so `"1.0"` equals `"1.0.0"`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |v: &str| -> Vec<u64> {
        normalize_version(v)
            .split('.')
            .map(|part| {
                let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
                digits.parse::<u64>().unwrap_or(0)
            })
            .collect()
    };

    let (va, vb) = (parse(a), parse(b));
    let width = va.len().max(vb.len());
    let padded = |v: &[u64]| -> Vec<u64> {
        v.iter().copied().chain(std::iter::repeat(0)).take(width).collect()
    };
    padded(&va).cmp(&padded(&vb))
}

/// Returns true if `a` is strictly newer than `b`.
pub fn is_newer(a: &str, b: &str) -> bool {
    compare_versions(a, b) == Ordering::Greater
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_prefix() {
        assert_eq!(normalize_version("v1.2.3"), "1.2.3");
        assert_eq!(normalize_version(" V0.9 "), "0.9");
        assert_eq!(normalize_version("1.0"), "1.0");
    }

    #[test]
    fn release_tags_against_installed() {
        assert!(is_newer("v1.4.0", "1.3.12"));
        assert!(is_newer("2.0", "1.99.99"));
        assert!(!is_newer("v1.3.12", "1.3.12"));
        assert!(!is_newer("1.3.2", "1.3.12"));
    }

    #[test]
    fn missing_components_are_zero() {
        assert_eq!(compare_versions("1.0", "1.0.0"), Ordering::Equal);
        assert!(is_newer("1.0.0.1", "1.0"));
        assert_eq!(compare_versions("0.9", "1"), Ordering::Less);
    }

    #[test]
    fn junk_components_count_as_zero() {
        assert_eq!(compare_versions("1.x", "1.0"), Ordering::Equal);
        assert!(is_newer("1.3-beta", "1.2.9"));
        assert!(!is_newer("-", "0.0.1"));
    }
}
