mod common;

use chrono::Utc;
use common::{decode_token, is_well_formed, record_fields, split_token};
use lithium_sso::{
    AuthTokenRequest, CompressionFormat, ConfigError, Error, Field, ProfileSettings,
    RequestContext, SsoClient, SsoConfig, SsoKey, TokenCodec, ValidationError,
};
use proptest::prelude::*;

const HEX_128: &str = "d41d8cd98f00b204e9800998ecf8427e";
const HEX_256: &str = "9DEA5AF94ADCE2BFDE03C3A267555185F7E59FFEAD2B334E0FF1F5193DAF63F4";

fn acme_client() -> SsoClient {
    SsoClient::builder()
        .client_id("acme")
        .client_domain(".acme.com")
        .key_bytes([0u8; 32])
        .build()
        .unwrap()
}

fn zero_key() -> SsoKey {
    SsoKey::from_bytes(&[0u8; 32]).unwrap()
}

#[test]
fn test_acme_example_token() {
    let client = acme_client();
    let request = AuthTokenRequest::new("1", "bob", "b@x.com")
        .with_setting("profile.name_first", "Bob");

    let token = client.issue_token(&request).unwrap();
    assert!(is_well_formed(&token), "malformed token: {}", token);

    let record = decode_token(&token, &zero_key(), CompressionFormat::RawDeflate);
    assert!(record.contains("|acme|1|bob|b@x.com|profile.name_first=Bob"));
    assert!(record.starts_with("Li|LiSSOv1.5|34-"));
    assert!(record.ends_with("iL"));
}

#[test]
fn test_record_field_order() {
    let before = Utc::now().timestamp_millis();
    let client = SsoClient::new(
        "nwqwi37788.stage",
        ".alphauniverse.com",
        HEX_256,
        Some("127.0.0.1"),
        RequestContext::new("Mozilla/5.0 (X11)", " ", "127.0.0.1"),
    )
    .unwrap();

    let settings = ProfileSettings::new()
        .with("profile.name_first", "Marie")
        .with("profile.name_last", "Curie");
    let request = AuthTokenRequest::new("94f992c8:U8bMVff++Dx", "mari", "foo@foo.com")
        .with_settings(settings);

    let token = client.issue_token(&request).unwrap();
    let key = SsoKey::from_hex(HEX_256).unwrap();
    let fields = record_fields(&decode_token(&token, &key, CompressionFormat::RawDeflate));
    let after = Utc::now().timestamp_millis();

    assert_eq!(fields[0], "LiSSOv1.5");
    assert_eq!(fields[1], client.server_identity().as_str());
    assert!(fields[1].starts_with("127.0.0.1-"));
    assert!(fields[2].chars().all(|c| c.is_ascii_digit()));
    let timestamp: i64 = fields[3].parse().unwrap();
    assert!(before <= timestamp && timestamp <= after);
    assert_eq!(fields[4], "Mozilla/5.0 (X11)");
    assert_eq!(fields[5], " ");
    assert_eq!(fields[6], "127.0.0.1");
    assert_eq!(fields[7], ".alphauniverse.com");
    assert_eq!(fields[8], "nwqwi37788.stage");
    assert_eq!(fields[9], "94f992c8:U8bMVff++Dx");
    assert_eq!(fields[10], "mari");
    assert_eq!(fields[11], "foo@foo.com");
    assert_eq!(fields[12..].join("|"), "profile.name_first=Marie|profile.name_last=Curie");
}

#[test]
fn test_aes_128_key_roundtrip() {
    let client =
        SsoClient::new("example", ".example.com", HEX_128, None, RequestContext::default())
            .unwrap();
    let token = client
        .issue_token(&AuthTokenRequest::new("167865", "janmon04", "jane.monet@mycompany.com"))
        .unwrap();

    let key = SsoKey::from_hex(HEX_128).unwrap();
    let record = decode_token(&token, &key, CompressionFormat::RawDeflate);
    assert!(record.contains("|.example.com|example|167865|janmon04|jane.monet@mycompany.com|iL"));
}

#[test]
fn test_zlib_compression_from_config() {
    let config = SsoConfig::from_json(&format!(
        r#"{{
            "client_id": "example",
            "client_domain": ".example.com",
            "sso_key": "{}",
            "server_id": "",
            "user_agent": "curl/8.0",
            "compression": "zlib"
        }}"#,
        HEX_128
    ))
    .unwrap();
    let client = SsoClient::from_config(&config).unwrap();

    let token = client
        .issue_token(&AuthTokenRequest::new("1", "bob", "b@x.com"))
        .unwrap();
    let key = SsoKey::from_hex(HEX_128).unwrap();
    let fields = record_fields(&decode_token(&token, &key, CompressionFormat::Zlib));
    assert_eq!(fields[4], "curl/8.0");
    assert!(fields[1].starts_with("34-"));
}

#[test]
fn test_request_context_override() {
    let client = SsoClient::builder()
        .client_id("acme")
        .client_domain(".acme.com")
        .key_bytes([0u8; 32])
        .request_context(RequestContext::new("stored-agent", "stored-ref", "10.0.0.1"))
        .build()
        .unwrap();
    let request = AuthTokenRequest::new("1", "bob", "b@x.com");

    let stored = record_fields(&decode_token(
        &client.issue_token(&request).unwrap(),
        &zero_key(),
        CompressionFormat::RawDeflate,
    ));
    assert_eq!(&stored[4..7], ["stored-agent", "stored-ref", "10.0.0.1"]);

    let per_request = RequestContext::new("live|agent", "", "192.168.1.9");
    let overridden = record_fields(&decode_token(
        &client.issue_token_with_context(&request, &per_request).unwrap(),
        &zero_key(),
        CompressionFormat::RawDeflate,
    ));
    assert_eq!(&overridden[4..7], ["live-agent", "", "192.168.1.9"]);
}

#[test]
fn test_missing_claims_are_rejected() {
    let client = acme_client();
    let cases = [
        (AuthTokenRequest::new("", "bob", "b@x.com"), Field::UniqueId),
        (AuthTokenRequest::new("1", "", "b@x.com"), Field::Login),
        (AuthTokenRequest::new("1", "bob", ""), Field::Email),
    ];
    for (request, field) in cases {
        match client.issue_token(&request) {
            Err(Error::Validation(ValidationError::MissingField(f))) => assert_eq!(f, field),
            other => panic!("expected missing {}, got {:?}", field, other),
        }
    }
}

#[test]
fn test_empty_settings_allowed() {
    let token = acme_client()
        .issue_token(&AuthTokenRequest::new("1", "bob", "b@x.com"))
        .unwrap();
    let record = decode_token(&token, &zero_key(), CompressionFormat::RawDeflate);
    assert!(record.ends_with("|b@x.com|iL"));
}

#[test]
fn test_invalid_key_lengths_fail_construction() {
    for len in [0usize, 1, 15, 17, 31, 33, 64] {
        let result = SsoClient::builder()
            .client_id("acme")
            .client_domain(".acme.com")
            .key_bytes(vec![1u8; len])
            .build();
        let expected = if len == 0 {
            ConfigError::KeyRequired
        } else {
            ConfigError::InvalidKeyLength(len)
        };
        match result {
            Err(Error::Configuration(err)) => assert_eq!(err, expected),
            other => panic!("length {} accepted: {:?}", len, other),
        }
    }
}

#[test]
fn test_same_record_different_iv() {
    let codec = TokenCodec::default();
    let record = b"Li|LiSSOv1.5|34-AB|1|2|||||acme|1|bob|b@x.com|iL";

    let a = codec.encode_with_iv(record, &zero_key(), b"AAAAAAAAAAAAAAAA").unwrap();
    let b = codec.encode_with_iv(record, &zero_key(), b"BBBBBBBBBBBBBBBB").unwrap();
    assert_ne!(a, b);

    for token in [&a, &b] {
        let decoded = decode_token(token, &zero_key(), CompressionFormat::RawDeflate);
        assert_eq!(decoded.as_bytes(), record);
    }
    assert_eq!(split_token(&a).0, "AAAAAAAAAAAAAAAA");
}

#[test]
fn test_tokens_differ_between_calls() {
    let client = acme_client();
    let request = AuthTokenRequest::new("1", "bob", "b@x.com");
    let a = client.issue_token(&request).unwrap();
    let b = client.issue_token(&request).unwrap();
    assert_ne!(a, b);
    assert_ne!(split_token(&a).0, split_token(&b).0);
}

#[test]
fn test_privacy_guard_flow() {
    let client = acme_client();
    assert_eq!(client.privacy_guard_field("b@x.com").unwrap(), "");

    client.init_privacy_guard(HEX_128).unwrap();
    let protected = client.privacy_guard_field("b@x.com").unwrap();
    assert!(is_well_formed(&protected));

    let pg_key = SsoKey::from_hex(HEX_128).unwrap();
    assert_eq!(
        decode_token(&protected, &pg_key, CompressionFormat::RawDeflate),
        "b@x.com"
    );

    let token = client
        .issue_token(&AuthTokenRequest::new("1", "bob", &protected))
        .unwrap();
    let fields = record_fields(&decode_token(&token, &zero_key(), CompressionFormat::RawDeflate));
    assert_eq!(fields[11], protected);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_tokens_are_well_formed(
        unique_id in "[^|]{1,24}",
        login in ".{1,24}",
        email in "[a-z]{1,8}@[a-z]{1,8}\\.com",
        value in ".{0,32}",
    ) {
        let client = acme_client();
        let request = AuthTokenRequest::new(unique_id.clone(), login.clone(), email.clone())
            .with_setting("profile.name_first", value.clone());
        let token = client.issue_token(&request).unwrap();
        prop_assert!(is_well_formed(&token));

        let fields = record_fields(&decode_token(&token, &zero_key(), CompressionFormat::RawDeflate));
        prop_assert_eq!(&fields[9], &unique_id);
        prop_assert_eq!(&fields[10], &login.replace('|', "-"));
        prop_assert_eq!(&fields[11], &email);
    }
}
