//! Domain-string normalization.
//!
//! Turns whatever the user typed into a canonical base URL. No validation
//! is performed on the result; a port, if present, is passed through as-is.

use std::sync::LazyLock;

use regex::Regex;

/// Cloud domain appended to bare single-label hostnames.
pub const DEFAULT_DOMAIN_SUFFIX: &str = "console.cloud";

/// Bare IPv6 literal, full or compressed form, without brackets or port.
static IPV6_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,5}(:[0-9a-fA-F]{1,4}){1,2}|([0-9a-fA-F]{1,4}:){1,4}(:[0-9a-fA-F]{1,4}){1,3}|([0-9a-fA-F]{1,4}:){1,3}(:[0-9a-fA-F]{1,4}){1,4}|([0-9a-fA-F]{1,4}:){1,2}(:[0-9a-fA-F]{1,4}){1,5}|[0-9a-fA-F]{1,4}:((:[0-9a-fA-F]{1,4}){1,6}))$",
    )
    .expect("valid IPv6 pattern")
});

static SCHEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+://").expect("valid scheme pattern"));

/// Build a canonical base URL from a user-typed domain string.
///
/// Bare IPv6 literals are bracketed, inputs without a scheme get `https://`,
/// and bare single-label hostnames are completed with
/// [`DEFAULT_DOMAIN_SUFFIX`].
pub fn build_base_url(domain: &str) -> String {
    if IPV6_BARE.is_match(domain) {
        return format!("https://[{domain}]");
    }

    let qualified = domain.contains('.') || domain.contains('[');
    if SCHEME_PREFIX.is_match(domain) {
        if qualified {
            domain.to_string()
        } else {
            format!("{domain}.{DEFAULT_DOMAIN_SUFFIX}")
        }
    } else if qualified {
        format!("https://{domain}")
    } else {
        format!("https://{domain}.{DEFAULT_DOMAIN_SUFFIX}")
    }
}
