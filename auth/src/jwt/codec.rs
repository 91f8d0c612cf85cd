use std::collections::HashSet;

use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::errors::TokenError;
use crate::models::User;

/// Algorithms accepted on validation: the HMAC family only.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Issues and validates HMAC-signed access tokens.
///
/// Holds no state beyond the key material, which is fixed at construction.
/// Validity is decided from the signature and the embedded timestamps alone.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Create a codec signing with HS256 under `secret`.
    ///
    /// # Arguments
    /// * `secret` - Shared signing secret
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// Issue a token for `user`, valid from `now` for 24 hours.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = TokenClaims::for_user(user, now);
        self.encode(&claims)
    }

    /// Sign an already built claim set.
    pub fn encode(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Validate a token at instant `now` and return its claims.
    ///
    /// # Errors
    /// * `Malformed` - Token structure or claims could not be parsed
    /// * `UnexpectedAlgorithm` - Header declares an algorithm outside HMAC
    /// * `WrongSignature` - Signature does not match the configured secret
    /// * `NotYetValid` - `now` is before the `nbf` claim
    /// * `Expired` - `now` is at or after the `exp` claim
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        // Time checks run against the caller's instant below.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.required_spec_claims =
            HashSet::from(["exp", "nbf", "sub"].map(String::from));

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::WrongSignature,
                ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::MissingAlgorithm => TokenError::UnexpectedAlgorithm,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::ImmatureSignature => TokenError::NotYetValid,
                _ => TokenError::Malformed,
            })?;

        let claims = token_data.claims;

        if claims.is_not_yet_valid(now) {
            return Err(TokenError::NotYetValid);
        }

        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::TimeZone;

    use super::*;
    use crate::jwt::claims::TOKEN_TTL;
    use crate::models::UserId;

    const SECRET: &[u8] = b"testsecret";

    fn alice() -> User {
        User {
            id: UserId(1),
            username: "alice".to_string(),
            password_hash: String::new(),
            full_name: "Alice Liddell".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    /// Replace the header segment of a signed token.
    fn with_header(token: &str, header_b64: &str) -> String {
        let (_, rest) = token.split_once('.').unwrap();
        format!("{}.{}", header_b64, rest)
    }

    #[test]
    fn test_issue_and_validate() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let now = instant();

        let token = codec.issue(&alice(), now).expect("Failed to issue token");
        assert_eq!(token.split('.').count(), 3);

        let claims = codec.validate(&token, now).expect("Failed to validate token");
        assert_eq!(claims.user_id, UserId(1));
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.full_name, "Alice Liddell");
        assert_eq!(claims.sub, "user_1");
        assert_eq!(claims.iss, "liliapi");
        assert!(claims.nbf <= now.timestamp());
        assert!(now.timestamp() < claims.exp);
    }

    #[test]
    fn test_header_declares_hs256() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let token = codec.issue(&alice(), instant()).unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let issuer = TokenCodec::new(b"secret-one").unwrap();
        let verifier = TokenCodec::new(b"secret-two").unwrap();
        let now = instant();

        let token = issuer.issue(&alice(), now).unwrap();

        assert_eq!(verifier.validate(&token, now), Err(TokenError::WrongSignature));
    }

    #[test]
    fn test_validate_tampered_payload() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let now = instant();
        let token = codec.issue(&alice(), now).unwrap();

        let mut other = alice();
        other.username = "mallory".to_string();
        let forged = TokenCodec::new(b"attacker").unwrap().issue(&other, now).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert_eq!(codec.validate(&spliced, now), Err(TokenError::WrongSignature));
    }

    #[test]
    fn test_validate_expired() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let now = instant();
        let token = codec.issue(&alice(), now).unwrap();

        assert_eq!(
            codec.validate(&token, now + TOKEN_TTL),
            Err(TokenError::Expired)
        );
        assert_eq!(
            codec.validate(&token, now + TOKEN_TTL + Duration::days(3)),
            Err(TokenError::Expired)
        );
        assert!(codec
            .validate(&token, now + TOKEN_TTL - Duration::seconds(1))
            .is_ok());
    }

    #[test]
    fn test_validate_not_yet_valid() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let now = instant();
        let token = codec.issue(&alice(), now).unwrap();

        assert_eq!(
            codec.validate(&token, now - Duration::seconds(1)),
            Err(TokenError::NotYetValid)
        );
    }

    #[test]
    fn test_validate_rejects_foreign_algorithm() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let now = instant();
        let token = codec.issue(&alice(), now).unwrap();

        // {"alg":"RS256","typ":"JWT"}
        let rs256 = with_header(&token, "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9");
        assert_eq!(
            codec.validate(&rs256, now),
            Err(TokenError::UnexpectedAlgorithm)
        );
    }

    #[test]
    fn test_validate_rejects_unsigned_token() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let now = instant();
        let token = codec.issue(&alice(), now).unwrap();

        // {"alg":"none","typ":"JWT"}
        let unsigned = with_header(&token, "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0");
        let (head, _) = unsigned.rsplit_once('.').unwrap();
        let stripped = format!("{}.", head);

        assert!(codec.validate(&unsigned, now).is_err());
        assert!(codec.validate(&stripped, now).is_err());
    }

    #[test]
    fn test_validate_accepts_other_hmac_variants() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let now = instant();
        let claims = TokenClaims::for_user(&alice(), now);

        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(codec.validate(&token, now), Ok(claims));
    }

    #[test]
    fn test_validate_malformed_token() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let now = instant();

        assert_eq!(codec.validate("", now), Err(TokenError::Malformed));
        assert_eq!(codec.validate("not-a-token", now), Err(TokenError::Malformed));
        assert!(codec.validate("invalid.token.here", now).is_err());
    }

    #[test]
    fn test_validate_missing_claims() {
        #[derive(serde::Serialize)]
        struct Partial {
            sub: String,
            exp: i64,
        }

        let codec = TokenCodec::new(SECRET).unwrap();
        let now = instant();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Partial {
                sub: "user_1".to_string(),
                exp: now.timestamp() + 60,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(codec.validate(&token, now), Err(TokenError::Malformed));
    }

    #[test]
    fn test_new_rejects_empty_secret() {
        assert!(matches!(
            TokenCodec::new(b""),
            Err(TokenError::MissingSecret)
        ));
    }
}
