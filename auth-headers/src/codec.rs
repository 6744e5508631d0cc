//! Rendering and parsing of `<scheme> <auth-params>` header values.
//!
//! Which parameters are always sent as quoted strings is decided by a static
//! [`QuotingPolicy`] rather than by looking at the value. Parameters outside
//! the policy are written as bare tokens when the value allows it and quoted
//! otherwise, so every value survives [`encode`] followed by [`decode`].

use crate::{
    error::{HeaderError, Result},
    params::ParamMap,
};

pub use crate::grammar::{AuthBody, AuthHeader};

/// Parameters quoted in `WWW-Authenticate` challenges (RFC 2617 section 3.2.1).
const CHALLENGE_QUOTED: &[&str] = &["realm", "domain", "nonce", "opaque", "qop"];

/// Parameters quoted in `Authorization` credentials (RFC 2617 section 3.2.2).
/// `qop`, `nc` and `algorithm` are tokens on this side.
const CREDENTIALS_QUOTED: &[&str] = &[
    "username", "realm", "nonce", "uri", "response", "cnonce", "opaque",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotingPolicy {
    always_quoted: &'static [&'static str],
}

impl QuotingPolicy {
    pub const CHALLENGE: Self = Self {
        always_quoted: CHALLENGE_QUOTED,
    };

    pub const CREDENTIALS: Self = Self {
        always_quoted: CREDENTIALS_QUOTED,
    };

    /// Quote only what cannot be sent as a token.
    pub const MINIMAL: Self = Self { always_quoted: &[] };

    pub fn requires_quoting(&self, name: &str) -> bool {
        self.always_quoted
            .iter()
            .any(|quoted| quoted.eq_ignore_ascii_case(name))
    }
}

pub fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`' | '|' | '~'
        )
}

pub fn is_token(value: &str) -> bool {
    !value.is_empty() && value.chars().all(is_token_char)
}

/// Wraps `value` in double quotes, backslash-escaping `"` and `\`.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Returns `value` unchanged when it is a token and `allow_token` is set.
pub fn quote_if_needed(value: &str, allow_token: bool) -> String {
    if allow_token && is_token(value) {
        value.to_string()
    } else {
        quote(value)
    }
}

pub fn encode(scheme: &str, params: &ParamMap, policy: QuotingPolicy) -> Result<String> {
    validate_scheme(scheme)?;

    let mut rendered = Vec::with_capacity(params.len());
    for (name, value) in params.iter() {
        validate_param(name, value)?;
        let value = quote_if_needed(value, !policy.requires_quoting(name));
        rendered.push(format!("{name}={value}"));
    }

    if rendered.is_empty() {
        Ok(scheme.to_string())
    } else {
        Ok(format!("{scheme} {}", rendered.join(", ")))
    }
}

pub fn encode_token68(scheme: &str, token: &str) -> Result<String> {
    validate_scheme(scheme)?;
    if token.is_empty() || token.contains(['\r', '\n', ' ', '\t']) {
        return Err(HeaderError::InvalidHeaderValue(format!(
            "invalid token68 payload {token:?}"
        )));
    }
    Ok(format!("{scheme} {token}"))
}

pub fn decode(value: &str) -> Result<AuthHeader> {
    crate::grammar::parse_auth_header(value)
}

pub(crate) fn validate_scheme(scheme: &str) -> Result<()> {
    if is_token(scheme) {
        Ok(())
    } else {
        Err(HeaderError::InvalidScheme(scheme.to_string()))
    }
}

const LINE_BREAK: &str = "line breaks are not allowed";

fn validate_param(name: &str, value: &str) -> Result<()> {
    if !is_token(name) {
        return Err(HeaderError::InvalidParameterName(name.to_string()));
    }
    if value.contains(['\r', '\n']) {
        return Err(HeaderError::invalid_value(name, LINE_BREAK));
    }
    Ok(())
}
