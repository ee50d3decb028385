//! Log Redaction Layer
//!
//! Scrubs remote URLs and bare origins from strings prior to user-facing
//! output, so a rejected load never discloses which origins the host trusts
//! or which remote it was talking to.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s\x22'()\[\]{}<>]+").unwrap());

/// Replaces remote URL and origin references in a string.
pub fn redact_remote_refs(input: &str) -> String {
    URL_RE.replace_all(input, "[remote]").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrubs_full_urls() {
        let raw = "remote script failed to load from http://localhost:3002/remoteEntry.js: HTTP 404";
        let clean = redact_remote_refs(raw);
        assert!(!clean.contains("localhost:3002"));
        assert!(clean.contains("[remote]"));
    }

    #[test]
    fn scrubs_bare_origins() {
        let raw = "security policy rejected remote: origin https://malicious.example.org not in allowlist";
        let clean = redact_remote_refs(raw);
        assert!(!clean.contains("malicious.example.org"));
    }

    #[test]
    fn leaves_plain_text_alone() {
        let raw = "module \"./Step2\" not found in container \"autoMfe\"";
        assert_eq!(redact_remote_refs(raw), raw);
    }
}
