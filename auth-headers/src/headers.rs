//! Reading and writing the two headers on a [`HeaderMap`].

use std::sync::{Arc, Mutex};

use hyper::{
    HeaderMap,
    header::{AUTHORIZATION, HeaderValue, WWW_AUTHENTICATE},
};
use tracing::{debug, warn};

use crate::{
    challenge::{Challenge, UpdateHook},
    credentials::Credentials,
    error::{HeaderError, Result},
};

/// `None` when the header is missing or cannot be parsed.
pub fn authorization(headers: &HeaderMap) -> Option<Credentials> {
    let value = headers.get(AUTHORIZATION)?;
    match value.to_str() {
        Ok(value) => Credentials::from_header(Some(value)),
        Err(err) => {
            debug!("ignoring non-ASCII Authorization header: {err}");
            None
        }
    }
}

pub fn www_authenticate(headers: &HeaderMap, on_update: Option<UpdateHook>) -> Challenge {
    let value = headers
        .get(WWW_AUTHENTICATE)
        .and_then(|value| match value.to_str() {
            Ok(value) => Some(value),
            Err(err) => {
                debug!("ignoring non-ASCII WWW-Authenticate header: {err}");
                None
            }
        });
    Challenge::from_header(value, on_update)
}

/// Writes `challenge` as the `WWW-Authenticate` header, or removes the header
/// when the challenge is empty.
pub fn store_challenge(headers: &mut HeaderMap, challenge: &Challenge) -> Result<()> {
    if challenge.is_empty() {
        headers.remove(WWW_AUTHENTICATE);
        return Ok(());
    }

    headers.insert(WWW_AUTHENTICATE, to_header_value(&challenge.to_header()?)?);
    Ok(())
}

pub fn store_credentials(headers: &mut HeaderMap, credentials: &Credentials) -> Result<()> {
    headers.insert(AUTHORIZATION, to_header_value(&credentials.to_header()?)?);
    Ok(())
}

/// Hook that keeps `headers` in sync with every change of the challenge.
pub fn sync_hook(headers: Arc<Mutex<HeaderMap>>) -> UpdateHook {
    Arc::new(move |challenge: &Challenge| {
        let Ok(mut headers) = headers.lock() else {
            warn!("header map lock poisoned, WWW-Authenticate not updated");
            return;
        };
        if let Err(err) = store_challenge(&mut headers, challenge) {
            warn!("failed to update WWW-Authenticate: {err}");
        }
    })
}

fn to_header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| HeaderError::InvalidHeaderValue(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::DigestChallenge;

    #[test]
    fn test_authorization_from_header_map() {
        let mut headers = HeaderMap::new();
        assert!(authorization(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic YWxpY2U6c2VjcmV0"));
        let credentials = authorization(&headers).unwrap();
        assert_eq!(credentials.username(), Some("alice"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic %%%"));
        assert!(authorization(&headers).is_none());
    }

    #[test]
    fn test_non_ascii_challenge_reads_as_empty() {
        shared::init_test_logging();

        let mut headers = HeaderMap::new();
        headers.insert(
            WWW_AUTHENTICATE,
            HeaderValue::from_bytes(b"Basic realm=\"caf\xe9\"").unwrap(),
        );

        let challenge = www_authenticate(&headers, None);
        assert!(challenge.is_empty());
        assert_eq!(challenge.scheme(), None);
    }

    #[test]
    fn test_store_and_remove_challenge() {
        let mut headers = HeaderMap::new();
        let mut challenge = Challenge::new();
        challenge.set_basic(Some("api"));

        store_challenge(&mut headers, &challenge).unwrap();
        assert_eq!(headers[WWW_AUTHENTICATE], r#"Basic realm="api""#);

        challenge.clear();
        store_challenge(&mut headers, &challenge).unwrap();
        assert!(!headers.contains_key(WWW_AUTHENTICATE));
    }

    #[test]
    fn test_store_challenge_without_scheme_fails() {
        let mut headers = HeaderMap::new();
        let mut challenge = Challenge::new();
        challenge.insert("realm", "x");

        assert_eq!(
            store_challenge(&mut headers, &challenge),
            Err(HeaderError::MissingScheme)
        );
    }

    #[test]
    fn test_sync_hook_tracks_mutations() {
        let headers = Arc::new(Mutex::new(HeaderMap::new()));
        let mut challenge = www_authenticate(&HeaderMap::new(), Some(sync_hook(Arc::clone(&headers))));

        challenge.set_digest(DigestChallenge::new("r", "n"));
        assert_eq!(
            headers.lock().unwrap()[WWW_AUTHENTICATE],
            r#"Digest realm="r", nonce="n", qop="auth""#
        );

        challenge.domain_mut().insert("/admin");
        assert_eq!(
            headers.lock().unwrap()[WWW_AUTHENTICATE],
            r#"Digest realm="r", nonce="n", qop="auth", domain="/admin""#
        );

        challenge.clear();
        assert!(!headers.lock().unwrap().contains_key(WWW_AUTHENTICATE));
    }

    #[test]
    fn test_credentials_round_trip_through_header_map() {
        let mut headers = HeaderMap::new();
        store_credentials(&mut headers, &Credentials::bearer("t0k3n")).unwrap();

        assert_eq!(authorization(&headers), Some(Credentials::bearer("t0k3n")));
    }
}
