//! HTTP Basic credential parsing

use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Username/secret pair carried by a Basic `Authorization` header
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub name: String,
    pub pass: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("pass", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Extract credentials from the request headers, `None` if absent or malformed
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        Self::parse(value)
    }

    /// Parse a header value of the form `Basic <base64(name:pass)>`.
    /// The scheme is case-insensitive; the name ends at the first colon.
    pub fn parse(value: &str) -> Option<Self> {
        let (scheme, token) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(token.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (name, pass) = decoded.split_once(':')?;

        Some(Self {
            name: name.to_string(),
            pass: pass.to_string(),
        })
    }

    /// Encode as an `Authorization` header value
    pub fn to_header_value(&self) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:{}", self.name, self.pass)))
    }
}
