//! # Name Sanitizer
//!
//! Maps a (secret name, data key) pair to a Secret Manager secret id.
//!
//! Secret Manager ids only allow letters, digits, hyphens and underscores.
//! Periods become hyphens so multi-segment keys such as `tls.crt` stay
//! readable (`tls-crt`); every other character outside `[A-Za-z0-9-]` is
//! deleted, underscores included.

use crate::constants::MAX_SECRET_ID_LEN;
use regex::Regex;
use std::sync::LazyLock;

static DISALLOWED_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9-]+")
        .expect("Failed to compile DISALLOWED_CHARS regex - this should never happen")
});

/// Build the destination secret name for one data key of a secret
#[must_use]
pub fn sanitize_name(source_name: &str, data_key: &str) -> String {
    let joined = format!("{source_name}-{data_key}").replace('.', "-");
    DISALLOWED_CHARS.replace_all(&joined, "").into_owned()
}

/// Check a sanitized name against the destination naming rules
///
/// Returns the reason the name is rejected, if any.
pub fn validate_destination_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("name is empty");
    }
    if !name.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Err("name contains no letters or digits");
    }
    if name.len() > MAX_SECRET_ID_LEN {
        return Err("name is longer than 255 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periods_become_hyphens() {
        assert_eq!(sanitize_name("my.secret", "tls.crt"), "my-secret-tls-crt");
    }

    #[test]
    fn test_punctuation_is_stripped() {
        assert_eq!(sanitize_name("app_secret!", "key#1"), "appsecret-key1");
        assert_eq!(sanitize_name("app cfg", "config json"), "appcfg-configjson");
    }

    #[test]
    fn test_sanitize_is_deterministic() {
        let first = sanitize_name("app-cfg", "config.json");
        let second = sanitize_name("app-cfg", "config.json");
        assert_eq!(first, second);
        assert_eq!(first, "app-cfg-config-json");
    }

    #[test]
    fn test_sanitized_names_never_contain_periods() {
        let name = sanitize_name("a..b", "...c.d.");
        assert!(!name.contains('.'));
        assert_eq!(name, "a--b----c-d-");
    }

    #[test]
    fn test_validate_rejects_pathological_names() {
        let name = sanitize_name("!!!", "###");
        assert_eq!(name, "-");
        assert_eq!(
            validate_destination_name(&name),
            Err("name contains no letters or digits")
        );
        assert_eq!(validate_destination_name(""), Err("name is empty"));
    }

    #[test]
    fn test_validate_length_limit() {
        let long = "a".repeat(MAX_SECRET_ID_LEN + 1);
        assert!(validate_destination_name(&long).is_err());
        let max = "a".repeat(MAX_SECRET_ID_LEN);
        assert_eq!(validate_destination_name(&max), Ok(()));
    }
}
