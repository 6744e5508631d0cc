use auth_headers::{Credentials, HeaderError};

#[test]
fn test_basic_credentials_from_encoded_pair() {
    shared::init_test_logging();

    let header = Credentials::basic("alice", "secret").to_header().unwrap();
    let credentials = Credentials::parse(&header).unwrap();

    assert_eq!(credentials.username(), Some("alice"));
    assert_eq!(credentials.password(), Some("secret"));
    assert!(credentials.parameters().is_none());
}

#[test]
fn test_basic_credentials_with_unicode_and_empty_password() {
    shared::init_test_logging();

    let header = Credentials::basic("jörg", "").to_header().unwrap();
    let credentials: Credentials = header.parse().unwrap();

    assert_eq!(credentials.username(), Some("jörg"));
    assert_eq!(credentials.password(), Some(""));
}

#[test]
fn test_digest_credentials_from_ordered_pairs() {
    shared::init_test_logging();

    let credentials = Credentials::new(
        "Digest",
        vec![
            ("username", "alice"),
            ("realm", "api"),
            ("nonce", "n0nce"),
            ("uri", "/private?a=b"),
            ("response", "deadbeef"),
            ("algorithm", "MD5"),
        ],
    );

    let header = credentials.to_header().unwrap();
    assert_eq!(
        header,
        r#"Digest username="alice", realm="api", nonce="n0nce", uri="/private?a=b", response="deadbeef", algorithm=MD5"#
    );

    let parsed = Credentials::parse(&header).unwrap();
    assert_eq!(parsed, credentials);
    assert_eq!(parsed.uri(), Some("/private?a=b"));
    assert_eq!(parsed.password(), None);
}

#[test]
fn test_unknown_scheme_keeps_params() {
    shared::init_test_logging();

    let credentials = Credentials::parse(r#"HOBA result="kid.challenge.nonce.sig""#).unwrap();

    assert_eq!(credentials.scheme(), "HOBA");
    assert_eq!(credentials.get("RESULT"), Some("kid.challenge.nonce.sig"));
    assert_eq!(credentials.username(), None);
    assert_eq!(credentials.nonce(), None);
}

#[test]
fn test_parse_errors_carry_fragment() {
    shared::init_test_logging();

    let err = Credentials::parse("Basic ????").unwrap_err();
    assert!(matches!(err, HeaderError::Parse { .. }));

    let err = Credentials::parse("Basic Zm9v").unwrap_err();
    match err {
        HeaderError::Parse { fragment, reason } => {
            assert_eq!(fragment, "Zm9v");
            assert!(reason.contains(':'));
        }
        other => panic!("Expected parse error, got {other:?}"),
    }
}

#[test]
fn test_invalid_parameter_name_on_encode() {
    shared::init_test_logging();

    let credentials = Credentials::new("Custom", [("bad key", "v")]);
    assert_eq!(
        credentials.to_header(),
        Err(HeaderError::InvalidParameterName("bad key".to_string()))
    );
}
