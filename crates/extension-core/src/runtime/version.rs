//! Version parsing for runtime probes

use semver::Version;

/// Parse version string, handling the `v` prefix printed by `node --version`
pub fn parse_version(version_str: &str) -> Result<Version, semver::Error> {
    let trimmed = version_str.trim();
    let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(cleaned)
}

/// Whether `version` is at least `min_major.min_minor` (patch and pre-release ignored)
pub fn meets_minimum(version: &Version, min_major: u64, min_minor: u64) -> bool {
    (version.major, version.minor) >= (min_major, min_minor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_node_style_version() {
        let version = parse_version("v10.16.3\n").unwrap();
        assert_eq!((version.major, version.minor, version.patch), (10, 16, 3));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_version("node: command not found").is_err());
        assert!(parse_version("v12").is_err());
    }

    #[test]
    fn test_minimum_boundaries() {
        let exact = parse_version("v10.16.0").unwrap();
        let older_minor = parse_version("v10.15.9").unwrap();
        let newer_major = parse_version("v12.0.0").unwrap();
        let older_major = parse_version("v9.99.0").unwrap();

        assert!(meets_minimum(&exact, 10, 16));
        assert!(!meets_minimum(&older_minor, 10, 16));
        assert!(meets_minimum(&newer_major, 10, 16));
        assert!(!meets_minimum(&older_major, 10, 16));
    }
}
