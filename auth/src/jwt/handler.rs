use std::str::FromStr;

use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens under one secret.
///
/// Generic over the claims type to allow services to define their own token payload.
/// Only symmetric HMAC algorithms (HS256, HS384, HS512) are accepted.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key, signing with HS256.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Create a JWT handler for a named algorithm (e.g. `"HS512"`).
    ///
    /// # Errors
    /// * `InvalidConfiguration` - Unknown or non-HMAC algorithm, or empty secret
    pub fn with_algorithm(secret: &[u8], algorithm: &str) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidConfiguration(
                "signing secret must not be empty".to_string(),
            ));
        }

        let algorithm = Algorithm::from_str(algorithm).map_err(|_| {
            JwtError::InvalidConfiguration(format!("unknown algorithm '{}'", algorithm))
        })?;

        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(Self {
                algorithm,
                ..Self::new(secret)
            }),
            other => Err(JwtError::InvalidConfiguration(format!(
                "algorithm {:?} is not a symmetric signing algorithm",
                other
            ))),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode a JWT token and verify its signature.
    ///
    /// Time-based claims are not checked here; expiry is judged by the caller
    /// against its own clock.
    ///
    /// # Errors
    /// * `TokenExpired` - Token has expired
    /// * `InvalidToken` - Token signature is invalid or token is malformed
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data =
            decode::<T>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestClaims {
        sub: String,
        role: String,
    }

    #[test]
    fn test_encode_and_decode() {
        let handler = JwtHandler::new(b"my_secret_key_at_least_32_bytes_long!");

        let claims = TestClaims {
            sub: "alice@example.com".to_string(),
            role: "admin".to_string(),
        };

        let token = handler.encode(&claims).expect("Failed to encode token");
        assert!(!token.is_empty());

        let decoded: TestClaims = handler.decode(&token).expect("Failed to decode token");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_decode_invalid_token() {
        let handler = JwtHandler::new(b"my_secret_key_at_least_32_bytes_long!");

        let result = handler.decode::<TestClaims>("invalid.token.here");
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let handler1 = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!");
        let handler2 = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!");

        let claims = TestClaims {
            sub: "alice@example.com".to_string(),
            role: "admin".to_string(),
        };

        let token = handler1.encode(&claims).expect("Failed to encode token");

        let result = handler2.decode::<TestClaims>(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_with_algorithm() {
        let handler = JwtHandler::with_algorithm(b"secret_at_least_32_bytes_long_key!", "HS512")
            .expect("HS512 is supported");
        assert_eq!(handler.algorithm(), Algorithm::HS512);

        assert!(matches!(
            JwtHandler::with_algorithm(b"secret", "RS256"),
            Err(JwtError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            JwtHandler::with_algorithm(b"secret", "nope"),
            Err(JwtError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            JwtHandler::with_algorithm(b"", "HS256"),
            Err(JwtError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_algorithm_mismatch_is_rejected() {
        let secret = b"shared_secret_at_least_32_bytes_long!";
        let hs256 = JwtHandler::new(secret);
        let hs512 = JwtHandler::with_algorithm(secret, "HS512").expect("HS512 is supported");

        let claims = TestClaims {
            sub: "alice@example.com".to_string(),
            role: "user".to_string(),
        };
        let token = hs512.encode(&claims).expect("Failed to encode token");

        assert!(hs256.decode::<TestClaims>(&token).is_err());
    }
}
