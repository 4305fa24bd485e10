//! Servicio JWT
//!
//! Emisión y verificación de tokens de acceso HS256 para la identidad
//! actuante.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::UserProfile;
use crate::utils::errors::{AppError, AppResult};

/// Claims del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub name: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Configuración JWT
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_token_duration: Duration,
}

impl JwtConfig {
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            algorithm: Algorithm::HS256,
            access_token_duration: Duration::hours(24),
        }
    }
}

pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        let config = JwtConfig::new(secret.to_string());
        let encoding_key = EncodingKey::from_secret(config.secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Genera un token de acceso para el perfil dado. El rol no viaja en el
    /// token: se relee del almacén en cada verificación.
    pub fn generate_access_token(&self, profile: &UserProfile) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + self.config.access_token_duration;

        let claims = Claims {
            sub: profile.id.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(self.config.algorithm),
            &claims,
            &self.encoding_key,
        )
        .map_err(|e| AppError::Jwt(format!("Error generating access token: {}", e)))
    }

    /// Verifica un token y devuelve sus claims
    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(self.config.algorithm))
            .map(|data| data.claims)
            .map_err(|e| AppError::Jwt(format!("Invalid token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    #[test]
    fn test_token_roundtrip() {
        let service = JwtService::new("test-secret");
        let profile = UserProfile {
            id: "u1".into(),
            name: "Ana".into(),
            role: UserRole::Manager,
            email: "ana@example.com".into(),
        };
        let token = service.generate_access_token(&profile).unwrap();
        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.email, "ana@example.com");
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let service = JwtService::new("test-secret");
        assert!(matches!(
            service.verify_token("garbage"),
            Err(AppError::Jwt(_))
        ));
        let other = JwtService::new("other-secret");
        let profile = UserProfile {
            id: "u1".into(),
            name: "Ana".into(),
            role: UserRole::Staff,
            email: "ana@example.com".into(),
        };
        let token = other.generate_access_token(&profile).unwrap();
        assert!(matches!(service.verify_token(&token), Err(AppError::Jwt(_))));
    }
}
