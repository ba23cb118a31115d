//! Log Redaction Layer
//!
//! Scrubs API keys and bearer tokens from strings prior to logging. Provider
//! error bodies sometimes echo the key they rejected.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[A-Za-z0-9_\-]{20,})|(tgp_v1_[A-Za-z0-9_\-]+)|(Bearer\s+[A-Za-z0-9\-\._~+/]+=*)|\b[a-f0-9]{64}\b")
        .unwrap()
});

const REDACTED: &str = "[REDACTED_TOKEN]";

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    API_KEY_RE.replace_all(input, REDACTED).to_string()
}

/// Redacts a known secret wherever it stands as a whole token, then the
/// generic patterns.
///
/// Matches glued to other key characters are left alone, so a short or
/// mistyped key does not mangle ordinary words in the message.
pub fn redact_secret(input: &str, secret: &str) -> String {
    if secret.is_empty() {
        return redact_sensitive_data(input);
    }

    let is_key_char = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for (start, _) in input.match_indices(secret) {
        let end = start + secret.len();
        let glued_before = input[..start].chars().next_back().is_some_and(is_key_char);
        let glued_after = input[end..].chars().next().is_some_and(is_key_char);
        if glued_before || glued_after {
            continue;
        }
        out.push_str(&input[last..start]);
        out.push_str(REDACTED);
        last = end;
    }
    out.push_str(&input[last..]);

    redact_sensitive_data(&out)
}
