//! HTTP Authentication Header Values
//!
//! This crate models the value of the `Authorization` request header
//! ([`Credentials`]) and of the `WWW-Authenticate` response header
//! ([`Challenge`]), and converts both to and from their textual form. Only the
//! header value is handled; the field name and the rest of the message belong
//! to the caller.
//!
//! # Examples
//!
//! ## Reading credentials
//!
//! ```
//! use auth_headers::Credentials;
//!
//! let basic = Credentials::parse("Basic YWxpY2U6c2VjcmV0").unwrap();
//! assert_eq!(basic.username(), Some("alice"));
//! assert_eq!(basic.password(), Some("secret"));
//!
//! let digest: Credentials = r#"Digest username="alice", realm="api", nonce="abc", uri="/", response="0123""#
//!     .parse()
//!     .unwrap();
//! assert_eq!(digest.realm(), Some("api"));
//! assert_eq!(digest.password(), None);
//!
//! // Anything unparsable counts as "no credentials".
//! assert!(Credentials::from_header(Some("Digest realm=\"oops")).is_none());
//! ```
//!
//! ## Building a challenge
//!
//! ```
//! use std::sync::{
//!     Arc,
//!     atomic::{AtomicUsize, Ordering},
//! };
//!
//! use auth_headers::{Challenge, DigestChallenge, HeaderError};
//!
//! let updates = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&updates);
//!
//! let mut challenge = Challenge::new().with_on_update(Arc::new(move |_: &Challenge| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! }));
//! assert_eq!(challenge.to_header(), Err(HeaderError::MissingScheme));
//!
//! challenge.set_digest(DigestChallenge::new("api", "abc").stale(true));
//! challenge.domain_mut().insert("/admin");
//!
//! assert_eq!(
//!     challenge.to_header().unwrap(),
//!     r#"Digest realm="api", nonce="abc", qop="auth", stale=TRUE, domain="/admin""#
//! );
//! assert_eq!(updates.load(Ordering::SeqCst), 2);
//! ```

mod challenge;
pub mod codec;
mod credentials;
mod error;
mod grammar;
pub mod headers;
mod params;
mod token_set;

// Re-export public API
pub use challenge::{Challenge, DEFAULT_REALM, DigestChallenge, TokenSetMut, UpdateHook};
pub use codec::{AuthBody, AuthHeader, QuotingPolicy};
pub use credentials::Credentials;
pub use error::{HeaderError, Result};
pub use params::ParamMap;
pub use token_set::TokenSet;
