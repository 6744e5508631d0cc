use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use auth_headers::{Challenge, DigestChallenge, HeaderError, UpdateHook, headers};
use hyper::{HeaderMap, header::WWW_AUTHENTICATE};

fn counting_hook() -> (Arc<AtomicUsize>, UpdateHook) {
    let count = Arc::new(AtomicUsize::new(0));
    let hook_count = Arc::clone(&count);
    let hook: UpdateHook = Arc::new(move |_: &Challenge| {
        hook_count.fetch_add(1, Ordering::SeqCst);
    });
    (count, hook)
}

#[test]
fn test_fresh_challenge_has_no_scheme() {
    shared::init_test_logging();

    let challenge = Challenge::new();
    assert!(challenge.is_empty());
    assert_eq!(challenge.to_header(), Err(HeaderError::MissingScheme));
}

#[test]
fn test_stale_rendering() {
    shared::init_test_logging();

    let mut challenge = Challenge::new();
    challenge.set_digest(DigestChallenge::new("r", "n").stale(true));
    assert!(challenge.to_header().unwrap().contains("stale=TRUE"));

    challenge.set_digest(DigestChallenge::new("r", "n").stale(false));
    assert!(!challenge.to_header().unwrap().contains("stale"));
}

#[test]
fn test_domain_tokens_share_one_quoted_value() {
    shared::init_test_logging();

    let mut challenge = Challenge::with_scheme("Digest");

    challenge.domain_mut().insert("example.com");
    assert!(challenge.to_header().unwrap().contains(r#"domain="example.com""#));

    challenge.domain_mut().insert("example.org");
    assert!(
        challenge
            .to_header()
            .unwrap()
            .contains(r#"domain="example.com example.org""#)
    );
}

#[test]
fn test_hook_counts_across_operations() {
    shared::init_test_logging();

    let (count, hook) = counting_hook();
    let mut challenge = Challenge::new().with_on_update(hook);

    challenge.set_basic(None);
    challenge.set_digest(DigestChallenge::new("r", "n").qop(["auth", "auth-int"]));
    challenge.insert("charset", "UTF-8");
    challenge.remove("charset");
    challenge.set_stale(true);
    challenge.set_scheme(Some("Digest"));
    challenge.clear();

    assert_eq!(count.load(Ordering::SeqCst), 7);
}

#[test]
fn test_parse_modify_reemit() {
    shared::init_test_logging();

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        WWW_AUTHENTICATE,
        r#"Digest realm="api", nonce="old", qop="auth""#.parse().unwrap(),
    );

    let shared_headers = Arc::new(Mutex::new(response_headers.clone()));
    let mut challenge = headers::www_authenticate(
        &response_headers,
        Some(headers::sync_hook(Arc::clone(&shared_headers))),
    );
    assert_eq!(challenge.nonce(), Some("old"));

    challenge.set_nonce(Some("new"));
    challenge.set_stale(true);

    assert_eq!(
        shared_headers.lock().unwrap()[WWW_AUTHENTICATE],
        r#"Digest realm="api", nonce="new", qop="auth", stale=TRUE"#
    );
}

#[test]
fn test_custom_scheme_quotes_only_when_needed() {
    shared::init_test_logging();

    let mut challenge = Challenge::with_scheme("Bearer");
    challenge.set_realm(Some("example"));
    challenge.insert("error", "invalid_token");
    challenge.insert("error_description", "The access token expired");

    assert_eq!(
        challenge.to_header().unwrap(),
        r#"Bearer realm="example", error=invalid_token, error_description="The access token expired""#
    );
}
