//! `Content-Disposition` header parsing.
//!
//! The header is read as a MIME media type followed by `; key=value`
//! parameters, where values are tokens or quoted strings. Extended
//! parameters (`filename*=UTF-8''report%20v2.pdf`) are percent-decoded and
//! take precedence over their plain counterpart.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

/// Characters that may not appear in a MIME token.
const TSPECIALS: &str = "()<>@,;:\\\"/[]?=";

/// A parsed `Content-Disposition` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    kind: String,
    params: HashMap<String, String>,
}

impl ContentDisposition {
    /// Parse a header value.
    ///
    /// Returns `None` for empty or malformed values: a missing disposition
    /// type, a parameter without `=`, an unterminated quoted string, or a
    /// parameter given twice.
    ///
    /// # Example
    ///
    /// ```
    /// use httpfile_core::ContentDisposition;
    ///
    /// let cd = ContentDisposition::parse(r#"attachment; filename="report.pdf""#).unwrap();
    /// assert_eq!(cd.kind(), "attachment");
    /// assert_eq!(cd.filename(), Some("report.pdf"));
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (kind, mut rest) = value.split_once(';').unwrap_or((value, ""));
        let kind = kind.trim();
        if kind.is_empty() || !kind.chars().all(is_token_char) {
            return None;
        }

        let mut plain = HashMap::new();
        let mut extended = HashMap::new();
        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                break;
            }

            let (key, after_key) = take_token(rest)?;
            let after_eq = after_key.trim_start().strip_prefix('=')?.trim_start();
            let (value, after_value) = match after_eq.strip_prefix('"') {
                Some(quoted) => take_quoted(quoted)?,
                None => {
                    let (token, tail) = take_token(after_eq)?;
                    (token.to_string(), tail)
                }
            };

            let key = key.to_ascii_lowercase();
            let target = match key.strip_suffix('*') {
                Some(base) => extended.insert(base.to_string(), value),
                None => plain.insert(key, value),
            };
            if target.is_some() {
                return None;
            }

            rest = after_value.trim_start();
            if rest.is_empty() {
                break;
            }
            rest = rest.strip_prefix(';')?;
        }

        for (key, raw) in extended {
            if let Some(decoded) = decode_extended(&raw) {
                plain.insert(key, decoded);
            }
        }

        Some(Self {
            kind: kind.to_ascii_lowercase(),
            params: plain,
        })
    }

    /// Parse a raw header value.
    ///
    /// Quoted strings may carry UTF-8 beyond visible ASCII; anything that is
    /// not valid UTF-8 is rejected.
    #[must_use]
    pub fn parse_bytes(value: &[u8]) -> Option<Self> {
        std::str::from_utf8(value).ok().and_then(Self::parse)
    }

    /// Disposition type, lowercased (`attachment`, `inline`, ...).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Parameter value by name (case-insensitive).
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The `filename` parameter exactly as sent.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.param("filename")
    }

    /// The `filename` parameter reduced to a bare file name.
    ///
    /// Directory components (either separator) are stripped so the name
    /// cannot escape the working directory; empty, `.` and `..` yield `None`.
    #[must_use]
    pub fn safe_filename(&self) -> Option<&str> {
        let name = self.filename()?.rsplit(['/', '\\']).next()?.trim();
        match name {
            "" | "." | ".." => None,
            name => Some(name),
        }
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii() && !c.is_ascii_control() && c != ' ' && !TSPECIALS.contains(c)
}

fn take_token(input: &str) -> Option<(&str, &str)> {
    let end = input
        .find(|c: char| !is_token_char(c))
        .unwrap_or(input.len());
    if end == 0 {
        return None;
    }
    Some(input.split_at(end))
}

/// Read a quoted string whose opening quote is already consumed.
fn take_quoted(input: &str) -> Option<(String, &str)> {
    let mut value = String::new();
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((value, input.get(i + 1..)?)),
            '\\' => value.push(chars.next()?.1),
            c => value.push(c),
        }
    }
    None
}

/// Decode an RFC 5987 `charset'language'percent-encoded` value.
fn decode_extended(raw: &str) -> Option<String> {
    let mut parts = raw.splitn(3, '\'');
    let charset = parts.next()?;
    let _language = parts.next()?;
    let encoded = parts.next()?;

    if !(charset.eq_ignore_ascii_case("utf-8") || charset.eq_ignore_ascii_case("us-ascii")) {
        return None;
    }
    percent_decode_str(encoded)
        .decode_utf8()
        .ok()
        .map(std::borrow::Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn unquoted_filename() {
        let_assert!(Some(cd) = ContentDisposition::parse("attachment; filename=report.pdf"));
        check!(cd.kind() == "attachment");
        check!(cd.filename() == Some("report.pdf"));
    }

    #[test]
    fn quoted_filename_with_escapes() {
        let_assert!(
            Some(cd) = ContentDisposition::parse(r#"attachment; filename="my \"final\" report.pdf""#)
        );
        check!(cd.filename() == Some(r#"my "final" report.pdf"#));
    }

    #[test]
    fn raw_utf8_in_quoted_filename() {
        let value = r#"attachment; filename="résumé.pdf""#.as_bytes();
        let_assert!(Some(cd) = ContentDisposition::parse_bytes(value));
        check!(cd.filename() == Some("résumé.pdf"));

        check!(ContentDisposition::parse_bytes(b"attachment; filename=\"\xff.pdf\"").is_none());
    }

    #[test]
    fn type_and_keys_are_case_insensitive() {
        let_assert!(Some(cd) = ContentDisposition::parse("Attachment; FileName=a.txt"));
        check!(cd.kind() == "attachment");
        check!(cd.param("FILENAME") == Some("a.txt"));
    }

    #[test]
    fn extended_filename_wins() {
        let_assert!(
            Some(cd) = ContentDisposition::parse(
                "attachment; filename=fallback.pdf; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"
            )
        );
        check!(cd.filename() == Some("résumé.pdf"));
    }

    #[test]
    fn unknown_charset_keeps_plain_filename() {
        let_assert!(
            Some(cd) = ContentDisposition::parse(
                "attachment; filename=plain.txt; filename*=ISO-8859-1''x%E9.txt"
            )
        );
        check!(cd.filename() == Some("plain.txt"));
    }

    #[test]
    fn trailing_semicolon_is_allowed() {
        let_assert!(Some(cd) = ContentDisposition::parse("inline; filename=a.gif;"));
        check!(cd.filename() == Some("a.gif"));
    }

    #[test]
    fn disposition_without_params() {
        let_assert!(Some(cd) = ContentDisposition::parse("attachment"));
        check!(cd.filename().is_none());
    }

    #[test]
    fn malformed_values() {
        check!(ContentDisposition::parse("").is_none());
        check!(ContentDisposition::parse("; filename=a").is_none());
        check!(ContentDisposition::parse("attachment; filename").is_none());
        check!(ContentDisposition::parse("attachment; filename=\"open").is_none());
        check!(ContentDisposition::parse("attachment; filename=my file.pdf").is_none());
        check!(ContentDisposition::parse("attachment; filename=a; filename=b").is_none());
    }

    #[test]
    fn safe_filename_strips_directories() {
        let_assert!(
            Some(cd) = ContentDisposition::parse(r#"attachment; filename="../../etc/passwd""#)
        );
        check!(cd.filename() == Some("../../etc/passwd"));
        check!(cd.safe_filename() == Some("passwd"));

        let_assert!(
            Some(cd) = ContentDisposition::parse(r#"attachment; filename="..\\..\\boot.ini""#)
        );
        check!(cd.safe_filename() == Some("boot.ini"));
    }

    #[test]
    fn safe_filename_rejects_dot_names() {
        for header in [
            r#"attachment; filename="..""#,
            r#"attachment; filename=".""#,
            r#"attachment; filename="dir/""#,
        ] {
            let_assert!(Some(cd) = ContentDisposition::parse(header));
            check!(cd.safe_filename().is_none(), "header: {header}");
        }
    }
}
