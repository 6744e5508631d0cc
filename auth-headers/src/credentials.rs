use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::debug;

use crate::{
    codec::{self, AuthBody, QuotingPolicy},
    error::{HeaderError, Result},
    params::ParamMap,
};

/// Parameters a Digest `Authorization` header must carry.
const DIGEST_REQUIRED: &[&str] = &["username", "realm", "nonce", "uri", "response"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Payload {
    Basic { username: String, password: String },
    Token68(String),
    Params(ParamMap),
}

/// Parsed value of an `Authorization` request header.
///
/// Basic credentials keep the decoded `username:password` pair apart from the
/// parameter map, so [`Credentials::parameters`] returns `None` for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    scheme: String,
    payload: Payload,
}

impl Credentials {
    /// Builds parameter-style credentials from any sequence of pairs.
    ///
    /// A `Basic` scheme with a `username` entry is normalized into a Basic
    /// pair, with an empty password when none is given.
    pub fn new<I, K, V>(scheme: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let scheme = scheme.into();
        let mut params: ParamMap = params.into_iter().collect();

        if scheme.eq_ignore_ascii_case("basic")
            && let Some(username) = params.remove("username")
        {
            let password = params.remove("password").unwrap_or_default();
            return Self {
                scheme,
                payload: Payload::Basic { username, password },
            };
        }

        Self {
            scheme,
            payload: Payload::Params(params),
        }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            scheme: "Basic".to_string(),
            payload: Payload::Basic {
                username: username.into(),
                password: password.into(),
            },
        }
    }

    pub fn token68(scheme: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            payload: Payload::Token68(token.into()),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::token68("Bearer", token)
    }

    pub fn parse(value: &str) -> Result<Self> {
        let header = codec::decode(value)?;

        if header.is_scheme("basic") {
            let AuthBody::Token68(token) = &header.body else {
                return Err(HeaderError::parse(
                    value,
                    "basic credentials must be a single base64 token",
                ));
            };
            let (username, password) = decode_basic(token)?;
            return Ok(Self {
                scheme: header.scheme,
                payload: Payload::Basic { username, password },
            });
        }

        let is_digest = header.is_scheme("digest");
        let payload = match header.body {
            AuthBody::Token68(_) if is_digest => {
                return Err(HeaderError::parse(
                    value,
                    "digest credentials must be a parameter list",
                ));
            }
            AuthBody::Token68(token) => Payload::Token68(token),
            AuthBody::Empty => Payload::Params(ParamMap::new()),
            AuthBody::Params(params) => Payload::Params(params),
        };
        if is_digest && let Payload::Params(params) = &payload {
            validate_digest(params, value)?;
        }

        Ok(Self {
            scheme: header.scheme,
            payload,
        })
    }

    /// Parses an optional header value, treating anything unparsable as
    /// absent credentials.
    pub fn from_header(value: Option<&str>) -> Option<Self> {
        let value = value?;
        match Self::parse(value) {
            Ok(credentials) => Some(credentials),
            Err(err) => {
                debug!("ignoring unparsable Authorization header: {err}");
                None
            }
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn is_scheme(&self, scheme: &str) -> bool {
        self.scheme.eq_ignore_ascii_case(scheme)
    }

    /// `None` for Basic and token68 credentials.
    pub fn parameters(&self) -> Option<&ParamMap> {
        match &self.payload {
            Payload::Params(params) => Some(params),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameters()?.get(name)
    }

    /// Set for Basic and Digest credentials.
    pub fn username(&self) -> Option<&str> {
        match &self.payload {
            Payload::Basic { username, .. } => Some(username.as_str()),
            _ => self.get("username"),
        }
    }

    /// Only Basic credentials carry a password.
    pub fn password(&self) -> Option<&str> {
        match &self.payload {
            Payload::Basic { password, .. } => Some(password.as_str()),
            _ => None,
        }
    }

    /// The token68 payload, e.g. a Bearer token.
    pub fn token(&self) -> Option<&str> {
        match &self.payload {
            Payload::Token68(token) => Some(token.as_str()),
            _ => None,
        }
    }

    pub fn realm(&self) -> Option<&str> {
        self.get("realm")
    }

    pub fn nonce(&self) -> Option<&str> {
        self.get("nonce")
    }

    /// Request-URI as sent by the client; proxies may rewrite the request line.
    pub fn uri(&self) -> Option<&str> {
        self.get("uri")
    }

    pub fn nc(&self) -> Option<&str> {
        self.get("nc")
    }

    pub fn cnonce(&self) -> Option<&str> {
        self.get("cnonce")
    }

    /// The 32 hex digit request digest.
    pub fn response(&self) -> Option<&str> {
        self.get("response")
    }

    pub fn opaque(&self) -> Option<&str> {
        self.get("opaque")
    }

    /// A single token here, not the list offered by the challenge.
    pub fn qop(&self) -> Option<&str> {
        self.get("qop")
    }

    pub fn algorithm(&self) -> Option<&str> {
        self.get("algorithm")
    }

    pub fn to_header(&self) -> Result<String> {
        match &self.payload {
            Payload::Basic { username, password } => {
                codec::validate_scheme(&self.scheme)?;
                if username.contains(':') {
                    return Err(HeaderError::invalid_value(
                        "username",
                        "a Basic user-id cannot contain ':'",
                    ));
                }
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                Ok(format!("{} {encoded}", self.scheme))
            }
            Payload::Token68(token) => codec::encode_token68(&self.scheme, token),
            Payload::Params(_) if self.is_scheme("basic") => Err(HeaderError::invalid_value(
                "username",
                "Basic credentials require a username",
            )),
            Payload::Params(params) => {
                codec::encode(&self.scheme, params, QuotingPolicy::CREDENTIALS)
            }
        }
    }
}

impl FromStr for Credentials {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn decode_basic(token: &str) -> Result<(String, String)> {
    let decoded = STANDARD
        .decode(token)
        .map_err(|e| HeaderError::parse(token, format!("invalid base64: {e}")))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| HeaderError::parse(token, "credentials are not valid UTF-8"))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| HeaderError::parse(token, "missing ':' between username and password"))?;

    Ok((username.to_string(), password.to_string()))
}

fn validate_digest(params: &ParamMap, value: &str) -> Result<()> {
    if let Some(missing) = DIGEST_REQUIRED.iter().find(|key| !params.contains_key(key)) {
        return Err(HeaderError::parse(
            value,
            format!("digest credentials without {missing}"),
        ));
    }

    if params.contains_key("qop") {
        let has = |key: &str| params.get(key).is_some_and(|v| !v.is_empty());
        if !has("nc") || !has("cnonce") {
            return Err(HeaderError::parse(
                value,
                "digest credentials with qop require nc and cnonce",
            ));
        }
    }

    Ok(())
}
