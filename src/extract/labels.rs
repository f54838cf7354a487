//! Label key and value syntax.

use regex::Regex;
use std::sync::LazyLock;

/// Longest allowed label value and label name segment.
pub const MAX_LABEL_VALUE_LEN: usize = 63;

const MAX_PREFIX_LEN: usize = 253;

static LABEL_VALUE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9])?$").expect("valid label value regex")
});

static DNS_SUBDOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("valid subdomain regex")
});

/// Label value syntax only, without the length limit.
pub fn matches_label_value_syntax(value: &str) -> bool {
    LABEL_VALUE_REGEX.is_match(value)
}

/// A label value: empty, or at most 63 alphanumerics, `-`, `_` and `.`,
/// starting and ending with an alphanumeric.
pub fn is_valid_label_value(value: &str) -> bool {
    value.len() <= MAX_LABEL_VALUE_LEN && matches_label_value_syntax(value)
}

/// A label key: an optional DNS subdomain prefix and `/`, then a name segment.
pub fn is_valid_label_key(key: &str) -> bool {
    let (prefix, name) = match key.split_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, key),
    };

    let prefix_ok = prefix.is_none_or(|p| {
        !p.is_empty() && p.len() <= MAX_PREFIX_LEN && DNS_SUBDOMAIN_REGEX.is_match(p)
    });
    if !prefix_ok {
        return false;
    }

    !name.is_empty() && is_valid_label_value(name)
}
