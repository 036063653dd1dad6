use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user_models::{Identity, Role};
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    #[serde(default)]
    pub name: String,
    pub exp: usize,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Identity {
            user_id: claims.sub,
            role: claims.role,
            name: claims.name,
        }
    }
}

/// HS256 keys derived from the configured secret.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn create_token(&self, identity: &Identity, ttl: Duration) -> AppResult<String> {
        let expiration = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::InternalError("Token expiry out of range".to_string()))?
            .timestamp();

        let claims = Claims {
            sub: identity.user_id.clone(),
            role: identity.role,
            name: identity.name.clone(),
            exp: expiration as usize,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Identity {
        Identity {
            user_id: "65f0c0ffee0000000000abcd".to_string(),
            role: Role::Admin,
            name: "Ada".to_string(),
        }
    }

    #[test]
    fn token_carries_identity() {
        let keys = SessionKeys::new("secret");
        let token = keys.create_token(&admin(), Duration::hours(1)).unwrap();
        let identity: Identity = keys.verify_token(&token).unwrap().into();
        assert_eq!(identity, admin());
    }

    #[test]
    fn rejects_foreign_and_expired_tokens() {
        let keys = SessionKeys::new("secret");
        let other = SessionKeys::new("other");
        let token = other.create_token(&admin(), Duration::hours(1)).unwrap();
        assert!(matches!(
            keys.verify_token(&token),
            Err(AppError::AuthenticationError(_))
        ));

        let expired = keys.create_token(&admin(), Duration::hours(-2)).unwrap();
        assert!(keys.verify_token(&expired).is_err());
    }
}
