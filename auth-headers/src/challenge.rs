use std::{fmt, ops::Deref, str::FromStr, sync::Arc};

use tracing::debug;

use crate::{
    codec::{self, AuthBody, QuotingPolicy},
    error::{HeaderError, Result},
    params::ParamMap,
    token_set::TokenSet,
};

/// Realm used by [`Challenge::set_basic`] when none is given.
pub const DEFAULT_REALM: &str = "authentication required";

/// Called with the challenge after every mutation.
///
/// The hook runs on the mutating call stack and only gets shared access, so it
/// cannot mutate the challenge that triggered it.
pub type UpdateHook = Arc<dyn Fn(&Challenge) + Send + Sync>;

/// Settings for [`Challenge::set_digest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    realm: String,
    nonce: String,
    qop: TokenSet,
    opaque: Option<String>,
    algorithm: Option<String>,
    stale: bool,
}

impl DigestChallenge {
    /// Offers `qop=auth` unless [`DigestChallenge::qop`] says otherwise.
    pub fn new(realm: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            nonce: nonce.into(),
            qop: TokenSet::from_iter(["auth"]),
            opaque: None,
            algorithm: None,
            stale: false,
        }
    }

    /// An empty list drops the `qop` directive altogether.
    pub fn qop<I, S>(mut self, qop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.qop = qop.into_iter().collect();
        self
    }

    pub fn opaque(mut self, opaque: impl Into<String>) -> Self {
        self.opaque = Some(opaque.into());
        self
    }

    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    pub fn stale(mut self, stale: bool) -> Self {
        self.stale = stale;
        self
    }
}

/// Value of a `WWW-Authenticate` response header under construction.
///
/// Every mutating call (parameter assignment or removal, [`Challenge::clear`],
/// the Basic/Digest setters, writes through the `domain`/`qop` views) invokes
/// the update hook exactly once. Reads never do.
#[derive(Clone, Default)]
pub struct Challenge {
    scheme: Option<String>,
    params: ParamMap,
    on_update: Option<UpdateHook>,
}

impl Challenge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheme(scheme: impl Into<String>) -> Self {
        Self {
            scheme: Some(scheme.into()),
            ..Self::default()
        }
    }

    pub fn from_parts(scheme: Option<String>, params: ParamMap) -> Self {
        Self {
            scheme,
            params,
            on_update: None,
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        let header = codec::decode(value)?;

        let params = match header.body {
            AuthBody::Empty => ParamMap::new(),
            AuthBody::Params(params) => params,
            AuthBody::Token68(token) => {
                return Err(HeaderError::parse(
                    token,
                    "token68 challenges are not supported",
                ));
            }
        };

        Ok(Self::from_parts(Some(header.scheme), params))
    }

    /// Parses an optional header value; a missing or unparsable value yields
    /// an empty challenge carrying `on_update`.
    pub fn from_header(value: Option<&str>, on_update: Option<UpdateHook>) -> Self {
        let mut challenge = match value.map(Self::parse) {
            Some(Ok(challenge)) => challenge,
            Some(Err(err)) => {
                debug!("ignoring unparsable WWW-Authenticate header: {err}");
                Self::new()
            }
            None => Self::new(),
        };
        challenge.on_update = on_update;
        challenge
    }

    /// Installing or replacing the hook does not invoke it.
    pub fn with_on_update(mut self, hook: UpdateHook) -> Self {
        self.on_update = Some(hook);
        self
    }

    pub fn set_on_update(&mut self, hook: Option<UpdateHook>) {
        self.on_update = hook;
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn is_scheme(&self, scheme: &str) -> bool {
        self.scheme
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(scheme))
    }

    pub fn set_scheme(&mut self, scheme: Option<&str>) {
        self.scheme = scheme.map(str::to_string);
        self.notify();
    }

    pub fn parameters(&self) -> &ParamMap {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// No scheme and no parameters.
    pub fn is_empty(&self) -> bool {
        self.scheme.is_none() && self.params.is_empty()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let previous = self.params.insert(name, value);
        self.notify();
        previous
    }

    /// Removing an absent parameter changes nothing and stays silent.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let removed = self.params.remove(name);
        if removed.is_some() {
            self.notify();
        }
        removed
    }

    /// Drops the scheme and every parameter.
    pub fn clear(&mut self) {
        self.scheme = None;
        self.params.clear();
        self.notify();
    }

    pub fn set_basic(&mut self, realm: Option<&str>) {
        self.scheme = Some("Basic".to_string());
        self.params.clear();
        self.params.insert("realm", realm.unwrap_or(DEFAULT_REALM));
        self.notify();
    }

    pub fn set_digest(&mut self, digest: DigestChallenge) {
        let DigestChallenge {
            realm,
            nonce,
            qop,
            opaque,
            algorithm,
            stale,
        } = digest;

        self.scheme = Some("Digest".to_string());
        self.params.clear();
        self.params.insert("realm", realm);
        self.params.insert("nonce", nonce);
        if !qop.is_empty() {
            self.params.insert("qop", qop.to_value());
        }
        if stale {
            self.params.insert("stale", "TRUE");
        }
        if let Some(opaque) = opaque {
            self.params.insert("opaque", opaque);
        }
        if let Some(algorithm) = algorithm {
            self.params.insert("algorithm", algorithm);
        }
        self.notify();
    }

    pub fn realm(&self) -> Option<&str> {
        self.field("realm")
    }

    pub fn set_realm(&mut self, realm: Option<&str>) {
        self.set_field("realm", realm);
    }

    pub fn nonce(&self) -> Option<&str> {
        self.field("nonce")
    }

    pub fn set_nonce(&mut self, nonce: Option<&str>) {
        self.set_field("nonce", nonce);
    }

    pub fn opaque(&self) -> Option<&str> {
        self.field("opaque")
    }

    pub fn set_opaque(&mut self, opaque: Option<&str>) {
        self.set_field("opaque", opaque);
    }

    /// Clients assume `MD5` when absent.
    pub fn algorithm(&self) -> Option<&str> {
        self.field("algorithm")
    }

    pub fn set_algorithm(&mut self, algorithm: Option<&str>) {
        self.set_field("algorithm", algorithm);
    }

    pub fn stale(&self) -> Option<bool> {
        self.field("stale")
            .map(|stale| stale.eq_ignore_ascii_case("true"))
    }

    /// `false` is expressed by leaving the directive out.
    pub fn set_stale(&mut self, stale: bool) {
        self.set_field("stale", stale.then_some("TRUE"));
    }

    /// URIs of the protection space.
    pub fn domain(&self) -> TokenSet {
        self.token_set("domain")
    }

    pub fn domain_mut(&mut self) -> TokenSetMut<'_> {
        TokenSetMut::new(self, "domain")
    }

    /// Offered quality-of-protection values, e.g. `auth auth-int`.
    pub fn qop(&self) -> TokenSet {
        self.token_set("qop")
    }

    pub fn qop_mut(&mut self) -> TokenSetMut<'_> {
        TokenSetMut::new(self, "qop")
    }

    pub fn to_header(&self) -> Result<String> {
        let scheme = self.scheme.as_deref().ok_or(HeaderError::MissingScheme)?;
        codec::encode(scheme, &self.params, QuotingPolicy::CHALLENGE)
    }

    fn field(&self, name: &'static str) -> Option<&str> {
        self.params.get(name)
    }

    fn set_field(&mut self, name: &'static str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.insert(name, value);
            }
            None => {
                self.remove(name);
            }
        }
    }

    fn token_set(&self, name: &'static str) -> TokenSet {
        self.params.get(name).map(TokenSet::parse).unwrap_or_default()
    }

    fn notify(&self) {
        if let Some(hook) = &self.on_update {
            hook(self);
        }
    }
}

impl fmt::Debug for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Challenge")
            .field("scheme", &self.scheme)
            .field("params", &self.params)
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}

impl PartialEq for Challenge {
    fn eq(&self, other: &Self) -> bool {
        self.scheme == other.scheme && self.params == other.params
    }
}

impl Eq for Challenge {}

impl FromStr for Challenge {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Live view over a set-valued parameter of a [`Challenge`].
///
/// Each change is written back to the owning challenge immediately, which
/// fires its update hook. An emptied set removes the parameter.
pub struct TokenSetMut<'a> {
    challenge: &'a mut Challenge,
    name: &'static str,
    set: TokenSet,
}

impl<'a> TokenSetMut<'a> {
    fn new(challenge: &'a mut Challenge, name: &'static str) -> Self {
        let set = challenge.token_set(name);
        Self {
            challenge,
            name,
            set,
        }
    }

    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        let inserted = self.set.insert(token);
        if inserted {
            self.write_back();
        }
        inserted
    }

    pub fn remove(&mut self, token: &str) -> bool {
        let removed = self.set.remove(token);
        if removed {
            self.write_back();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.set.clear();
        self.write_back();
    }

    fn write_back(&mut self) {
        if self.set.is_empty() {
            self.challenge.remove(self.name);
        } else {
            self.challenge.insert(self.name, self.set.to_value());
        }
    }
}

impl Deref for TokenSetMut<'_> {
    type Target = TokenSet;

    fn deref(&self) -> &TokenSet {
        &self.set
    }
}
