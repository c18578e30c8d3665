//! Credential construction and signing.
//!
//! Implements the signature scheme the content-delivery edge verifies: the
//! canonical policy JSON is hashed with SHA-1, signed with RSA PKCS#1 v1.5,
//! and base64-encoded with the edge's URL-safe substitutions. The scheme is
//! a fixed external contract.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha1::{Digest, Sha1};

use crate::domain::Error;
use crate::domain::media::MediaSigningConfig;
use crate::domain::ports::{CoursePass, SignedResourceUrl};

/// Course pass validity window: 24 hours from issuance.
const COURSE_PASS_TTL_SECS: i64 = 24 * 60 * 60;

/// Base64 with the edge's URL-safe substitutions applied.
fn encode_edge_base64(bytes: &[u8]) -> String {
    STANDARD
        .encode(bytes)
        .replace('+', "-")
        .replace('=', "_")
        .replace('/', "~")
}

/// Canonical policy JSON for one resource (or wildcard pattern).
///
/// Byte layout, including field order and absence of whitespace, is part of
/// the edge contract; built by hand rather than through a serializer that
/// reorders keys.
fn policy_json(resource: &str, expires_at: i64) -> String {
    format!(
        r#"{{"Statement":[{{"Resource":"{resource}","Condition":{{"DateLessThan":{{"AWS:EpochTime":{expires_at}}}}}}}]}}"#
    )
}

fn sign_policy(key: &RsaPrivateKey, policy: &str) -> Result<Vec<u8>, Error> {
    let digest = Sha1::digest(policy.as_bytes());
    key.sign(Pkcs1v15Sign::new::<Sha1>(), &digest)
        .map_err(|error| Error::internal(format!("policy signing failed: {error}")))
}

/// Stateless builder of signed media credentials.
///
/// Holds only validated configuration; the signing key is supplied per call
/// so the single-flight cache stays the sole key owner.
#[derive(Debug, Clone)]
pub struct CredentialIssuer {
    config: MediaSigningConfig,
}

impl CredentialIssuer {
    /// Create an issuer over validated signing configuration.
    pub fn new(config: MediaSigningConfig) -> Self {
        Self { config }
    }

    /// Sign a time-limited URL for one media object.
    ///
    /// # Errors
    /// `InvalidRequest` when `expiry_minutes` is zero; `InternalError` when
    /// the RSA signing operation fails.
    pub fn issue_resource_token(
        &self,
        key: &RsaPrivateKey,
        resource_key: &str,
        expiry_minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<SignedResourceUrl, Error> {
        if expiry_minutes == 0 {
            return Err(Error::invalid_request("expiry must be positive"));
        }
        let expires_at = now.timestamp() + i64::from(expiry_minutes) * 60;
        let resource = self.config.resource_url(resource_key);
        let signature = encode_edge_base64(&sign_policy(key, &policy_json(&resource, expires_at))?);
        let key_pair_id = self.config.key_pair_id();
        Ok(SignedResourceUrl {
            url: format!(
                "{resource}?Expires={expires_at}&Signature={signature}&Key-Pair-Id={key_pair_id}"
            ),
            expires_at,
        })
    }

    /// Issue the cookie credential triple covering every resource under a
    /// course's media prefix for the next 24 hours.
    ///
    /// # Errors
    /// `InternalError` when the RSA signing operation fails.
    pub fn issue_course_pass(
        &self,
        key: &RsaPrivateKey,
        course_path_prefix: &str,
        now: DateTime<Utc>,
    ) -> Result<CoursePass, Error> {
        let expires_at = now.timestamp() + COURSE_PASS_TTL_SECS;
        let pattern = format!(
            "{}/*",
            self.config.resource_url(course_path_prefix).trim_end_matches('/')
        );
        let policy = policy_json(&pattern, expires_at);
        let signature = encode_edge_base64(&sign_policy(key, &policy)?);
        Ok(CoursePass {
            policy: encode_edge_base64(policy.as_bytes()),
            signature,
            key_pair_id: self.config.key_pair_id().to_owned(),
            path: format!("/{}", course_path_prefix.trim_matches('/')),
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Signature scheme coverage, verified against the public key.

    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rsa::RsaPublicKey;

    use super::*;

    fn test_key() -> RsaPrivateKey {
        let mut rng = StdRng::seed_from_u64(7);
        RsaPrivateKey::new(&mut rng, 2048).expect("key generation")
    }

    fn issuer() -> CredentialIssuer {
        CredentialIssuer::new(
            MediaSigningConfig::new("https://media.example", "KEYID123", "media-signing-key")
                .expect("valid settings"),
        )
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0)
            .single()
            .expect("valid instant")
    }

    fn decode_edge_base64(encoded: &str) -> Vec<u8> {
        let standard = encoded
            .replace('-', "+")
            .replace('_', "=")
            .replace('~', "/");
        STANDARD.decode(standard).expect("valid base64")
    }

    fn verify(key: &RsaPrivateKey, policy: &str, signature: &[u8]) {
        let public = RsaPublicKey::from(key);
        let digest = Sha1::digest(policy.as_bytes());
        public
            .verify(Pkcs1v15Sign::new::<Sha1>(), &digest, signature)
            .expect("signature verifies");
    }

    #[test]
    fn resource_token_carries_edge_query_parameters() {
        let key = test_key();
        let token = issuer()
            .issue_resource_token(&key, "courses/rust-101/lesson-1.mp4", 10, fixed_now())
            .expect("token issued");

        let expires_at = fixed_now().timestamp() + 600;
        assert_eq!(token.expires_at, expires_at);
        let (resource, query) = token.url.split_once('?').expect("query present");
        assert_eq!(resource, "https://media.example/courses/rust-101/lesson-1.mp4");
        assert!(query.contains(&format!("Expires={expires_at}")));
        assert!(query.contains("Key-Pair-Id=KEYID123"));

        let signature = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("Signature="))
            .expect("signature parameter");
        verify(
            &key,
            &policy_json(resource, expires_at),
            &decode_edge_base64(signature),
        );
    }

    #[test]
    fn zero_expiry_is_rejected_without_signing() {
        let error = issuer()
            .issue_resource_token(&test_key(), "courses/a/b.mp4", 0, fixed_now())
            .expect_err("zero expiry");
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
    }

    #[test]
    fn course_pass_scopes_a_wildcard_for_twenty_four_hours() {
        let key = test_key();
        let pass = issuer()
            .issue_course_pass(&key, "courses/rust-101", fixed_now())
            .expect("pass issued");

        assert_eq!(pass.expires_at, fixed_now().timestamp() + 86_400);
        assert_eq!(pass.key_pair_id, "KEYID123");
        assert_eq!(pass.path, "/courses/rust-101");

        let policy = String::from_utf8(decode_edge_base64(&pass.policy)).expect("utf8 policy");
        assert!(policy.contains("https://media.example/courses/rust-101/*"));
        assert!(policy.contains(&format!(
            "\"AWS:EpochTime\":{}",
            fixed_now().timestamp() + 86_400
        )));
        verify(&key, &policy, &decode_edge_base64(&pass.signature));
    }

    #[test]
    fn encoded_values_avoid_cookie_hostile_characters() {
        let key = test_key();
        let pass = issuer()
            .issue_course_pass(&key, "courses/rust-101", fixed_now())
            .expect("pass issued");
        for value in [&pass.policy, &pass.signature] {
            assert!(!value.contains('+'));
            assert!(!value.contains('='));
            assert!(!value.contains('/'));
        }
    }
}
