//! Verification never panics and never accepts malformed or forged tokens.

use proptest::prelude::*;
use serde_json::{json, Value};

use trustproof::{
    inspect, verify, verify_chain, verify_with_config, ErrorCode, Keypair, Predecessor,
    VerifyOutcome,
};
use trustproof_testkit::fixtures::{
    allow_claims, fixed_time_config, forge_token, sample_input, sample_output,
    truncate_signature, TestFixture,
};
use trustproof_testkit::generators::{json_value, token_like};

fn rejected_as_bad_signature(outcome: &VerifyOutcome) -> bool {
    match outcome.rejection() {
        Some(rejection) => {
            rejection.codes() == vec![ErrorCode::InvalidSignature] && rejection.claims().is_none()
        }
        None => false,
    }
}

#[test]
fn test_malformed_framing() {
    let key = Keypair::from_seed(&[1u8; 32]).public_key();
    for token in ["", "abc", "a.b", "a.b.c", "....", "a.b.c.d", "a.b.c$", "%%%.@@@.!!!"] {
        let outcome = verify(token, &key, None, None);
        assert!(rejected_as_bad_signature(&outcome), "accepted {:?}", token);
        assert!(inspect(token).is_err());
    }
}

#[test]
fn test_truncated_signature() {
    let fixture = TestFixture::with_seed([2u8; 32]);
    let token = fixture
        .issue(Predecessor::Genesis, &allow_claims("jti_0"))
        .unwrap();

    for len in [0, 1, 32, 63] {
        let truncated = truncate_signature(&token, len);
        let outcome = verify(&truncated, &fixture.public_key(), None, None);
        assert!(rejected_as_bad_signature(&outcome));
    }
}

#[test]
fn test_error_details_name_the_cause() {
    let key = Keypair::from_seed(&[1u8; 32]).public_key();
    let outcome = verify("a.b", &key, None, None);
    let error = &outcome.errors()[0];
    assert_eq!(error.message, "JWT signature verification failed.");
    assert_eq!(
        error.details,
        Some(json!("token must have 3 dot-separated segments, found 2"))
    );
}

#[test]
fn test_forged_alg_none() {
    let fixture = TestFixture::with_seed([3u8; 32]);
    let claims = trustproof::link(trustproof::Hex64::ZERO, &allow_claims("jti_0")).unwrap();
    let forged = forge_token(&json!({"alg": "none", "typ": "JWT"}), &claims, &fixture.keypair);

    let outcome = verify(&forged, &fixture.public_key(), None, None);
    assert!(rejected_as_bad_signature(&outcome));

    // The payload is still readable for diagnostics.
    assert_eq!(inspect(&forged).unwrap()["jti"], json!("jti_0"));
}

#[test]
fn test_forged_hs256_and_crit_headers() {
    let fixture = TestFixture::with_seed([4u8; 32]);
    let claims = trustproof::link(trustproof::Hex64::ZERO, &allow_claims("jti_0")).unwrap();

    for header in [
        json!({"alg": "HS256", "typ": "JWT"}),
        json!({"typ": "JWT"}),
        json!({"alg": "EdDSA", "typ": "JWT", "crit": ["b64"]}),
    ] {
        let forged = forge_token(&header, &claims, &fixture.keypair);
        let outcome = verify(&forged, &fixture.public_key(), None, None);
        assert!(rejected_as_bad_signature(&outcome), "accepted {}", header);
    }
}

#[test]
fn test_signed_non_object_payload() {
    let fixture = TestFixture::with_seed([5u8; 32]);
    let forged = forge_token(
        &json!({"alg": "EdDSA", "typ": "JWT"}),
        &json!(["not", "claims"]),
        &fixture.keypair,
    );
    let outcome = verify(&forged, &fixture.public_key(), None, None);
    assert!(rejected_as_bad_signature(&outcome));
}

#[test]
fn test_signed_but_schema_invalid() {
    let fixture = TestFixture::with_seed([6u8; 32]);
    let forged = forge_token(
        &json!({"alg": "EdDSA", "typ": "JWT"}),
        &json!({"jti": " ", "hashes": "nope"}),
        &fixture.keypair,
    );

    let outcome = verify_with_config(&forged, &fixture.public_key(), None, None, &fixed_time_config());
    let rejection = outcome.rejection().unwrap();
    assert!(rejection.has(ErrorCode::InvalidSchema));
    assert!(rejection.has(ErrorCode::MissingJti));
    assert_eq!(rejection.claims().unwrap()["hashes"], json!("nope"));

    let chain = verify_chain(&[forged], &fixture.public_key());
    assert_eq!(chain.break_info().unwrap().code, ErrorCode::InvalidProof);
}

#[test]
fn test_large_claims() {
    let fixture = TestFixture::with_seed([7u8; 32]);
    let mut claims = allow_claims("jti_large");
    let scopes: Vec<Value> = (0..250).map(|i| json!(format!("scope:{}", i))).collect();
    claims["resource"]["note"] = json!("ü".repeat(12_000));
    claims["resource"]["scopes"] = Value::Array(scopes);

    let token = fixture.issue(Predecessor::Genesis, &claims).unwrap();
    let outcome = verify_with_config(
        &token,
        &fixture.public_key(),
        Some(&sample_input()),
        Some(&sample_output()),
        &fixed_time_config(),
    );
    let claims = outcome.into_result().unwrap();
    assert_eq!(claims.resource()["scopes"].as_array().unwrap().len(), 250);
    assert!(trustproof::canonical_json(&claims.clone().into_value()).len() > 24_000);
    assert!(verify_chain(&[token], &fixture.public_key()).is_intact());
}

proptest! {
    #[test]
    fn test_arbitrary_strings_never_verify(token in token_like()) {
        let key = Keypair::from_seed(&[8u8; 32]).public_key();
        let outcome = verify(&token, &key, None, None);
        prop_assert!(!outcome.is_valid());
        let chain = verify_chain(&[token], &key);
        prop_assert!(!chain.is_intact());
    }

    #[test]
    fn test_arbitrary_expected_values_never_panic(input in json_value(), output in json_value()) {
        let fixture = TestFixture::with_seed([9u8; 32]);
        let token = fixture.issue(Predecessor::Genesis, &allow_claims("jti_0")).unwrap();
        let outcome = verify(&token, &fixture.public_key(), Some(&input), Some(&output));
        if outcome.is_valid() {
            prop_assert_eq!(&input, &sample_input());
            prop_assert_eq!(&output, &sample_output());
        }
    }
}
