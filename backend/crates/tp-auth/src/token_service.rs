use crate::{
    AuthError, Claims, Clock, IssuedToken, Result as AuthErrorResult, TokenPair, TokenType,
};

use std::{panic::Location, sync::Arc};

use chrono::Duration;
use error_location::ErrorLocation;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
    errors::ErrorKind,
};
use uuid::Uuid;

pub const DEFAULT_ISSUER: &str = "Trecplans";
pub const DEFAULT_AUDIENCE: &str = "trecplans";

/// Construction parameters for [`TokenService`]
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub issuer: String,
    pub audience: String,
}

impl TokenServiceConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: Duration::hours(24),
            refresh_ttl: Duration::hours(168),
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
        }
    }
}

/// Issues and validates HS256 access/refresh tokens.
///
/// Immutable after construction. Expiry and not-before are evaluated against
/// the injected [`Clock`] rather than the library's wall-clock checks, so
/// `now >= exp` is expired and `now < nbf` is rejected as invalid.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    issuer: String,
    audience: String,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(config: TokenServiceConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "iss", "aud", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            issuer: config.issuer,
            audience: config.audience,
            clock,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    #[track_caller]
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        email: &str,
        is_active: bool,
    ) -> AuthErrorResult<IssuedToken> {
        self.generate(user_id, email, is_active, TokenType::Access, self.access_ttl)
    }

    #[track_caller]
    pub fn generate_refresh_token(
        &self,
        user_id: Uuid,
        email: &str,
        is_active: bool,
    ) -> AuthErrorResult<IssuedToken> {
        self.generate(user_id, email, is_active, TokenType::Refresh, self.refresh_ttl)
    }

    /// Mint both tokens; a failure on either side yields no pair at all
    #[track_caller]
    pub fn generate_token_pair(
        &self,
        user_id: Uuid,
        email: &str,
        is_active: bool,
    ) -> AuthErrorResult<TokenPair> {
        let access = self.generate_access_token(user_id, email, is_active)?;
        let refresh = self.generate_refresh_token(user_id, email, is_active)?;
        Ok(TokenPair { access, refresh })
    }

    /// Verify signature, registered claims and the validity window
    #[track_caller]
    pub fn validate_token(&self, token: &str) -> AuthErrorResult<Claims> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidToken {
            message: format!("malformed token: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if header.alg != Algorithm::HS256 {
            return Err(AuthError::InvalidToken {
                message: format!("unexpected signing method {:?}", header.alg),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired {
                    location: ErrorLocation::from(Location::caller()),
                },
                ErrorKind::Json(_) => AuthError::InvalidClaim {
                    claim: "payload".to_string(),
                    message: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
                ErrorKind::MissingRequiredClaim(claim) => AuthError::InvalidClaim {
                    claim: claim.clone(),
                    message: "missing required claim".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
                ErrorKind::InvalidIssuer => AuthError::InvalidClaim {
                    claim: "iss".to_string(),
                    message: "issuer mismatch".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
                ErrorKind::InvalidAudience => AuthError::InvalidClaim {
                    claim: "aud".to_string(),
                    message: "audience mismatch".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
                ErrorKind::InvalidSubject => AuthError::InvalidClaim {
                    claim: "sub".to_string(),
                    message: "subject mismatch".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
                _ => AuthError::InvalidToken {
                    message: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
            })?;

        let claims = token_data.claims;
        let now = self.clock.now().timestamp();

        if now >= claims.exp {
            return Err(AuthError::TokenExpired {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if now < claims.nbf {
            return Err(AuthError::InvalidToken {
                message: "token not valid yet".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        claims.validate()?;

        Ok(claims)
    }

    #[track_caller]
    pub fn validate_access_token(&self, token: &str) -> AuthErrorResult<Claims> {
        let claims = self.validate_token(token)?;
        claims.expect_type(TokenType::Access)?;
        Ok(claims)
    }

    #[track_caller]
    pub fn validate_refresh_token(&self, token: &str) -> AuthErrorResult<Claims> {
        let claims = self.validate_token(token)?;
        claims.expect_type(TokenType::Refresh)?;
        Ok(claims)
    }

    /// Exchange a valid refresh token for a new access token with the same
    /// identity. The refresh token stays valid until its own expiry.
    #[track_caller]
    pub fn refresh_access_token(&self, refresh_token: &str) -> AuthErrorResult<IssuedToken> {
        let claims = self.validate_refresh_token(refresh_token)?;
        self.generate_access_token(claims.user_id, &claims.email, claims.is_active)
    }

    #[track_caller]
    fn generate(
        &self,
        user_id: Uuid,
        email: &str,
        is_active: bool,
        token_type: TokenType,
        ttl: Duration,
    ) -> AuthErrorResult<IssuedToken> {
        let now = self.clock.now();
        let expires_at = now + ttl;

        let claims = Claims {
            user_id,
            email: email.to_string(),
            is_active,
            token_type,
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            aud: self.audience.clone(),
            exp: expires_at.timestamp(),
            nbf: now.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(IssuedToken {
            token,
            expires_at,
            claims,
        })
    }
}
