use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,     // user_id (UUID) ou sentinelle guest
    pub email: String,
    #[serde(default)]
    pub guest: bool,
    pub exp: i64,        // expiration timestamp
}

/// Génère un JWT token pour un sujet (utilisateur ou invité)
/// `secret` vient de AppConfig::jwt_secret
pub fn generate_token(
    secret: &str,
    subject: &str,
    email: &str,
    guest: bool,
    ttl_hours: i64,
) -> Result<String, String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = Claims {
        sub: subject.to_string(),
        email: email.to_string(),
        guest,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Vérifie et décode un JWT token
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_generate_and_verify_token() {
        let subject = "0b5f4c1e-8d1a-4d0e-9a57-3a1f0c7d2e11";
        let email = "jane@example.com";

        let token = generate_token(SECRET, subject, email, false, 24).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();

        assert_eq!(claims.sub, subject);
        assert_eq!(claims.email, email);
        assert!(!claims.guest);
    }

    #[test]
    fn test_guest_flag_survives_round_trip() {
        let token = generate_token(SECRET, "guest-user-id", "guest@example.com", true, 1).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();

        assert!(claims.guest);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Validation par défaut: leeway de 60s, donc on recule bien plus loin
        let token = generate_token(SECRET, "someone", "a@b.c", false, -2).unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token(SECRET, "invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_token_signed_with_another_secret_is_rejected() {
        let token = generate_token("other-secret", "someone", "a@b.c", false, 1).unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }
}
