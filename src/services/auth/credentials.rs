//! `Authorization: Basic <base64(identifier:secret)>` の取り出し
//!
//! 失敗は Err ではなく [`Extracted`] の各バリアントとして返す。
//! 「ヘッダが無い」と「壊れている」は呼び出し側で同じ 401 に畳まれるが、
//! ログ上は区別したいので型としては分けておく。

use axum::http::{HeaderMap, header};
use base64::{Engine as _, engine::general_purpose::STANDARD};

/// A credential pair taken from a single request.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// No `Authorization` header at all.
    Absent,
    /// Header present but not a decodable `Basic` credential.
    Malformed(&'static str),
    Credentials(Credentials),
}

pub fn extract(headers: &HeaderMap) -> Extracted {
    let mut values = headers.get_all(header::AUTHORIZATION).iter();

    let Some(value) = values.next() else {
        return Extracted::Absent;
    };
    if values.next().is_some() {
        return Extracted::Malformed("multiple authorization headers");
    }

    let Ok(value) = value.to_str() else {
        return Extracted::Malformed("non-ascii authorization header");
    };

    parse_basic(value)
}

fn parse_basic(value: &str) -> Extracted {
    let value = value.trim();

    // scheme 名は大文字小文字を区別しない (RFC 7617)
    let Some((scheme, encoded)) = value.split_once(' ') else {
        return Extracted::Malformed("missing scheme");
    };
    if !scheme.eq_ignore_ascii_case("basic") {
        return Extracted::Malformed("unsupported scheme");
    }

    let Ok(decoded) = STANDARD.decode(encoded.trim_start()) else {
        return Extracted::Malformed("invalid base64");
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return Extracted::Malformed("invalid utf-8");
    };

    // identifier 側に ':' は含められない。secret 側は ':' を含んでよい
    match decoded.split_once(':') {
        Some((identifier, secret)) => Extracted::Credentials(Credentials {
            identifier: identifier.to_string(),
            secret: secret.to_string(),
        }),
        None => Extracted::Malformed("missing delimiter"),
    }
}

#[cfg(test)]
pub(crate) fn basic_header(identifier: &str, secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{identifier}:{secret}")))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn creds(identifier: &str, secret: &str) -> Extracted {
        Extracted::Credentials(Credentials {
            identifier: identifier.to_string(),
            secret: secret.to_string(),
        })
    }

    #[test]
    fn absent_header() {
        assert_eq!(extract(&HeaderMap::new()), Extracted::Absent);
    }

    #[test]
    fn parses_basic_credentials() {
        let headers = headers_with(&basic_header("joe@smith.com", "joepassword"));
        assert_eq!(extract(&headers), creds("joe@smith.com", "joepassword"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let encoded = STANDARD.encode("a@b.com:pw");
        assert_eq!(
            extract(&headers_with(&format!("bAsIc {encoded}"))),
            creds("a@b.com", "pw")
        );
    }

    #[test]
    fn secret_may_contain_colons() {
        let headers = headers_with(&basic_header("a@b.com", "pa:ss:word"));
        assert_eq!(extract(&headers), creds("a@b.com", "pa:ss:word"));
    }

    #[test]
    fn empty_secret_is_still_a_pair() {
        let headers = headers_with(&basic_header("a@b.com", ""));
        assert_eq!(extract(&headers), creds("a@b.com", ""));
    }

    #[test]
    fn unsupported_scheme_is_malformed() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert!(matches!(extract(&headers), Extracted::Malformed(_)));
    }

    #[test]
    fn missing_scheme_is_malformed() {
        let headers = headers_with(&STANDARD.encode("a@b.com:pw"));
        assert!(matches!(extract(&headers), Extracted::Malformed(_)));
    }

    #[test]
    fn bad_base64_is_malformed() {
        let headers = headers_with("Basic %%%not-base64%%%");
        assert!(matches!(extract(&headers), Extracted::Malformed(_)));
    }

    #[test]
    fn missing_delimiter_is_malformed() {
        let headers = headers_with(&format!("Basic {}", STANDARD.encode("no-colon-here")));
        assert!(matches!(extract(&headers), Extracted::Malformed(_)));
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let headers = headers_with(&format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':'])));
        assert!(matches!(extract(&headers), Extracted::Malformed(_)));
    }

    #[test]
    fn multiple_headers_are_malformed() {
        let mut headers = headers_with(&basic_header("a@b.com", "pw"));
        headers.append(
            header::AUTHORIZATION,
            HeaderValue::from_str(&basic_header("c@d.com", "pw")).unwrap(),
        );
        assert!(matches!(extract(&headers), Extracted::Malformed(_)));
    }

    #[test]
    fn debug_redacts_secret() {
        let c = Credentials {
            identifier: "a@b.com".to_string(),
            secret: "hunter2".to_string(),
        };
        let printed = format!("{c:?}");
        assert!(printed.contains("a@b.com"));
        assert!(!printed.contains("hunter2"));
    }
}
