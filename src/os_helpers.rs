//! OS descriptor sub-parsers for Apple and Linux family sub-tokens.
//!
//! Both receive one sub-token and produce a `"Family/version"` fragment
//! ready for the version fragment parser.

use fancy_regex::Regex;

/// Parse an Apple OS descriptor such as `"CPU iPhone OS 5_1_1 like Mac OS X"`
/// or `"Intel Mac OS X 11_2_3"`.
///
/// The family is the `"Mac OS..."` text immediately preceding the version
/// match when present, otherwise `"iOS"`.  Returns `None` when the sub-token
/// carries no version pattern at all.
pub(crate) fn parse_apple_os(version_re: &Regex, part: &str) -> Option<String> {
    let m = version_re.find(part).ok().flatten()?;
    let head = strip_separator(&part[..m.start()]);
    // Only occurrences that start before the version can be the family.
    match head.rfind("Mac OS") {
        Some(idx) => Some(format!("{}/{}", &head[idx..], m.as_str())),
        None => Some(format!("iOS/{}", m.as_str())),
    }
}

/// Parse a Linux-ish OS descriptor such as `"Tizen 2.4.0"` or `"Linux x86_64"`.
///
/// With a version pattern the family is everything before it; without one,
/// the family is the first whitespace-delimited word and there is no version.
pub(crate) fn parse_linux_os(version_re: &Regex, part: &str) -> String {
    match version_re.find(part).ok().flatten() {
        Some(m) => format!("{}/{}", strip_separator(&part[..m.start()]), m.as_str()),
        None => part.split(' ').next().unwrap_or("").to_string(),
    }
}

/// Drop the whitespace-or-slash separator the version lookbehind matched.
/// The separator may be a multibyte space, so trim a whole char, not a byte.
fn strip_separator(head: &str) -> &str {
    let sep = head.chars().next_back().map_or(0, char::len_utf8);
    &head[..head.len() - sep]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version_re() -> Regex {
        Regex::new(r"(?<=[\s/])\d+(?:[._]\d+)*").unwrap()
    }

    #[test]
    fn iphone_descriptor_defaults_to_ios() {
        let os = parse_apple_os(&version_re(), "CPU iPhone OS 5_1_1 like Mac OS X");
        assert_eq!(os.as_deref(), Some("iOS/5_1_1"));
    }

    #[test]
    fn mac_descriptor_keeps_mac_family() {
        let os = parse_apple_os(&version_re(), "Intel Mac OS X 11_2_3");
        assert_eq!(os.as_deref(), Some("Mac OS X/11_2_3"));
    }

    #[test]
    fn apple_without_version_is_none() {
        assert_eq!(parse_apple_os(&version_re(), "PPC"), None);
    }

    #[test]
    fn linux_with_version() {
        assert_eq!(parse_linux_os(&version_re(), "Tizen 2.4.0"), "Tizen/2.4.0");
    }

    #[test]
    fn linux_without_version_takes_first_word() {
        // "x86_64" digits are not preceded by whitespace or slash.
        assert_eq!(parse_linux_os(&version_re(), "Linux x86_64"), "Linux");
    }

    #[test]
    fn bare_linux() {
        assert_eq!(parse_linux_os(&version_re(), "Linux"), "Linux");
    }

    #[test]
    fn multibyte_space_separator_before_version() {
        // U+00A0 satisfies the lookbehind but is two bytes wide.
        assert_eq!(parse_linux_os(&version_re(), "Linux\u{a0}4.4"), "Linux/4.4");
        let os = parse_apple_os(&version_re(), "Intel Mac OS X\u{a0}11_2_3");
        assert_eq!(os.as_deref(), Some("Mac OS X/11_2_3"));
    }
}
