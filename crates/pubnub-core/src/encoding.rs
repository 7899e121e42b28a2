//! Percent-encoding rules used by the service.
//!
//! Two sets are in play:
//! - [`url_encode`] for path segments and transmitted query values. Commas
//!   survive so that comma-joined channel lists stay lists.
//! - [`pam_encode`] for the canonical query string that gets signed, and for
//!   the message segment of a publish path. Everything outside the RFC 3986
//!   unreserved set is escaped, commas included.
//!
//! Both encode space as `%20`, never `+`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes escaped by [`pam_encode`]: everything except `A-Z a-z 0-9 - _ . ~`.
const PAM_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Bytes escaped by [`url_encode`]: as [`PAM_SET`] but `,` is kept.
const URL_SET: &AsciiSet = &PAM_SET.remove(b',');

/// Percent-encode a path segment or query value.
pub fn url_encode(value: &str) -> String {
    utf8_percent_encode(value, URL_SET).to_string()
}

/// Percent-encode a value for the signed canonical query string.
pub fn pam_encode(value: &str) -> String {
    utf8_percent_encode(value, PAM_SET).to_string()
}

/// Percent-encode each item and join with commas.
pub fn encode_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| url_encode(item.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encode_json_array() {
        assert_eq!(
            url_encode(r#"["hey1", "hey2", "hey3]"#),
            "%5B%22hey1%22,%20%22hey2%22,%20%22hey3%5D"
        );
    }

    #[test]
    fn test_url_encode_keeps_unreserved() {
        assert_eq!(url_encode("abc-XYZ_0.9~"), "abc-XYZ_0.9~");
    }

    #[test]
    fn test_url_encode_reserved() {
        assert_eq!(url_encode("a/b?c=d&e"), "a%2Fb%3Fc%3Dd%26e");
        assert_eq!(url_encode("50%"), "50%25");
        assert_eq!(url_encode("a+b"), "a%2Bb");
    }

    #[test]
    fn test_url_encode_utf8() {
        assert_eq!(url_encode("é"), "%C3%A9");
    }

    #[test]
    fn test_pam_encode_escapes_comma_and_star() {
        assert_eq!(pam_encode("a b*c,d"), "a%20b%2Ac%2Cd");
        assert_eq!(
            pam_encode(r#"["hey1","hey2"]"#),
            "%5B%22hey1%22%2C%22hey2%22%5D"
        );
    }

    #[test]
    fn test_encode_list() {
        assert_eq!(encode_list(&["ch 1", "ch2"]), "ch%201,ch2");
        assert_eq!(encode_list::<&str>(&[]), "");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn is_wire_safe(encoded: &str, extra: &[char]) -> bool {
            encoded.chars().all(|c| {
                c.is_ascii_alphanumeric() || "-_.~%".contains(c) || extra.contains(&c)
            })
        }

        proptest! {
            #[test]
            fn url_encode_output_is_wire_safe(value in ".*") {
                prop_assert!(is_wire_safe(&url_encode(&value), &[',']));
            }

            #[test]
            fn pam_encode_output_is_wire_safe(value in ".*") {
                prop_assert!(is_wire_safe(&pam_encode(&value), &[]));
            }

            #[test]
            fn encodings_agree_without_commas(value in "[^,]*") {
                prop_assert_eq!(url_encode(&value), pam_encode(&value));
            }
        }
    }
}
