//! Server-relative path formatting and name validation.

use std::borrow::Cow;
use std::fmt;

use filestore_core::StoreError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters SharePoint forbids in a file or folder name.
pub const FORBIDDEN_NAME_CHARS: &[char] = &['"', '*', ':', '<', '|', '>', '?', '\\', '/'];

/// `encodeURI` reserved set, minus `#` and `?` which would end the URL path.
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A percent-encoded path rooted under the configured site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRelativePath(String);

impl ServerRelativePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of a direct child, with the child name encoded the same way.
    pub fn join(&self, name: &str) -> ServerRelativePath {
        ServerRelativePath(format!("{}/{}", self.0.trim_end_matches('/'), encode(name)))
    }
}

impl fmt::Display for ServerRelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Site prefix every server-relative path lives under, e.g. `/sites/engineering`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePath {
    prefix: String,
}

impl SitePath {
    pub fn new(site_path: &str) -> Self {
        let trimmed = site_path.trim_end_matches('/');
        let prefix = if trimmed.starts_with('/') || trimmed.is_empty() {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Root `path` under the site and percent-encode it.
    ///
    /// The input is decoded first, so formatting an already formatted path yields the
    /// same value. Input whose escapes do not decode to UTF-8 is encoded as given.
    pub fn format(&self, path: &str) -> ServerRelativePath {
        let decoded = percent_decode_str(path)
            .decode_utf8()
            .unwrap_or(Cow::Borrowed(path));
        let rooted = if self.contains(&decoded) {
            decoded.into_owned()
        } else if decoded.starts_with('/') {
            format!("{}{}", self.prefix, decoded)
        } else {
            format!("{}/{}", self.prefix, decoded)
        };
        ServerRelativePath(encode(&rooted))
    }

    fn contains(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => !self.prefix.is_empty() && (rest.is_empty() || rest.starts_with('/')),
            None => false,
        }
    }
}

/// Reject names containing characters the remote store forbids.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    if name.contains(FORBIDDEN_NAME_CHARS) {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Percent-encode a single name or path for embedding in a URL.
pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, PATH_ENCODE_SET).to_string()
}

/// Escape a value for use inside an OData single-quoted string literal.
pub fn odata_literal(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn site() -> SitePath {
        SitePath::new("/sites/demo")
    }

    #[rstest]
    #[case("/Shared Documents", "/sites/demo/Shared%20Documents")]
    #[case("Shared Documents/Reports", "/sites/demo/Shared%20Documents/Reports")]
    #[case("/sites/demo/Shared Documents", "/sites/demo/Shared%20Documents")]
    #[case("/sites/demo", "/sites/demo")]
    #[case("/sites/demo2/Docs", "/sites/demo/sites/demo2/Docs")]
    #[case("/Docs/r\u{e9}sum\u{e9}.docx", "/sites/demo/Docs/r%C3%A9sum%C3%A9.docx")]
    #[case("/Docs/100%", "/sites/demo/Docs/100%25")]
    #[case("/Docs/a#b", "/sites/demo/Docs/a%23b")]
    #[case("/Docs/a%FFb", "/sites/demo/Docs/a%25FFb")]
    #[case("/Docs/%C3%A9t%C3", "/sites/demo/Docs/%25C3%25A9t%25C3")]
    fn test_format(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(site().format(input).as_str(), expected);
    }

    #[rstest]
    #[case("/Shared Documents")]
    #[case("Shared Documents/Reports")]
    #[case("/sites/demo/Shared Documents/Q1 (final).xlsx")]
    #[case("/Docs/100%")]
    #[case("/Docs/na\u{ef}ve [draft]")]
    #[case("/Docs/a%FFb")]
    #[case("")]
    fn test_format_is_idempotent(#[case] input: &str) {
        let once = site().format(input);
        let twice = site().format(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_site_path_normalization() {
        assert_eq!(SitePath::new("sites/demo/").prefix(), "/sites/demo");
        assert_eq!(SitePath::new("/sites/demo").prefix(), "/sites/demo");
        assert_eq!(SitePath::new("").prefix(), "");
        assert_eq!(SitePath::new("").format("/Docs").as_str(), "/Docs");
    }

    #[test]
    fn test_join() {
        let folder = site().format("/Shared Documents");
        assert_eq!(
            folder.join("my file.txt").as_str(),
            "/sites/demo/Shared%20Documents/my%20file.txt"
        );
    }

    #[rstest]
    #[case("report\".docx")]
    #[case("a*b")]
    #[case("c:d")]
    #[case("<tag")]
    #[case("pipe|name")]
    #[case("tag>")]
    #[case("why?")]
    #[case("back\\slash")]
    #[case("nested/name")]
    fn test_validate_name_rejects(#[case] name: &str) {
        let err = validate_name(name).unwrap_err();
        assert!(matches!(err, StoreError::InvalidName { name: n } if n == name));
    }

    #[rstest]
    #[case("report.docx")]
    #[case("Q1 (final) - v2.xlsx")]
    #[case("r\u{e9}sum\u{e9}")]
    #[case("100% done #1")]
    #[case("")]
    fn test_validate_name_accepts(#[case] name: &str) {
        assert!(validate_name(name).is_ok());
    }

    #[test]
    fn test_every_forbidden_char_is_rejected() {
        for c in FORBIDDEN_NAME_CHARS {
            let name = format!("pre{}post", c);
            assert!(validate_name(&name).is_err(), "{} should be rejected", name);
        }
    }

    #[test]
    fn test_odata_literal() {
        assert_eq!(odata_literal("O'Brien's.docx"), "O''Brien''s.docx");
        assert_eq!(odata_literal("plain"), "plain");
    }
}
