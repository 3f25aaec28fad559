//! Stateless bearer-token authentication.
//!
//! Every `/api` endpoint takes an [`ApiUser`] request guard. The guard
//! validates the `Authorization: Bearer <token>` JWT against the configured
//! issuer, audience and signing key, then resolves the token's subject to a
//! local user row, provisioning one just-in-time on first sight.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use rocket::fairing::AdHoc;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use serde::{Deserialize, Serialize};

use crate::models::User;
use crate::orm::DbConn;

/// Verification settings, read from the `jwt` section of Rocket's figment.
/// Exactly one of `hs256_secret` / `rsa_public_key_pem` must be set.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub hs256_secret: Option<String>,
    pub rsa_public_key_pem: Option<String>,
}

impl AuthConfig {
    fn decoding_key(&self) -> Option<(DecodingKey, Algorithm)> {
        if let Some(secret) = &self.hs256_secret {
            return Some((DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256));
        }
        if let Some(pem) = &self.rsa_public_key_pem {
            return DecodingKey::from_rsa_pem(pem.as_bytes())
                .ok()
                .map(|key| (key, Algorithm::RS256));
        }
        None
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation
    }
}

/// Reads the `jwt` config section and stores it in managed state. Startup
/// fails when the section is missing or carries no signing key.
pub fn auth_config_fairing() -> AdHoc {
    AdHoc::try_on_ignite("JWT Config", |rocket| async {
        let config: AuthConfig = match rocket.figment().extract_inner("jwt") {
            Ok(config) => config,
            Err(e) => {
                error!("missing or invalid jwt config section: {}", e);
                return Err(rocket);
            }
        };
        if config.decoding_key().is_none() {
            error!("jwt config needs hs256_secret or rsa_public_key_pem");
            return Err(rocket);
        }
        Ok(rocket.manage(config))
    })
}

/// The token claims the service reads. `exp` is checked by the decoder.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub email: Option<String>,
    pub name: Option<String>,
    pub preferred_username: Option<String>,
}

impl Claims {
    /// Display name for provisioning: `name`, then `preferred_username`,
    /// then a fixed placeholder.
    fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.preferred_username.clone())
            .unwrap_or_else(|| "New User".to_string())
    }

    /// Email for provisioning. The column is unique, so a token without an
    /// email claim gets a subject-derived placeholder address.
    fn provision_email(&self) -> String {
        self.email
            .clone()
            .unwrap_or_else(|| format!("{}@users.invalid", self.sub))
    }
}

/// A verified caller, resolved to its local user row.
///
/// Fails with 401 when the token is missing, malformed, expired or signed
/// for another issuer/audience, and with 403 when the local user row is
/// inactive or soft-deleted.
#[derive(Debug)]
pub struct ApiUser {
    pub user: User,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    Forbidden,
    Unavailable,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ApiUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let config = match req.rocket().state::<AuthConfig>() {
            Some(config) => config,
            None => {
                return Outcome::Error((Status::InternalServerError, AuthError::Unavailable))
            }
        };

        let token = match req
            .headers()
            .get_one("Authorization")
            .and_then(|header| header.strip_prefix("Bearer "))
        {
            Some(token) => token.to_string(),
            None => return Outcome::Error((Status::Unauthorized, AuthError::Unauthorized)),
        };

        let (key, algorithm) = match config.decoding_key() {
            Some(pair) => pair,
            None => {
                return Outcome::Error((Status::InternalServerError, AuthError::Unavailable))
            }
        };
        let claims = match decode::<Claims>(&token, &key, &config.validation(algorithm)) {
            Ok(data) => data.claims,
            Err(e) => {
                info!("rejected bearer token: {}", e);
                return Outcome::Error((Status::Unauthorized, AuthError::Unauthorized));
            }
        };

        let db = match req.guard::<DbConn>().await {
            Outcome::Success(db) => db,
            _ => return Outcome::Error((Status::InternalServerError, AuthError::Unavailable)),
        };

        let user = match db.run(move |conn| resolve_user(conn, &claims)).await {
            Ok(user) => user,
            Err(e) => {
                error!("user resolution failed: {}", e);
                return Outcome::Error((Status::InternalServerError, AuthError::Unavailable));
            }
        };

        if !user.is_active || user.deleted_at.is_some() {
            return Outcome::Error((Status::Forbidden, AuthError::Forbidden));
        }
        Outcome::Success(ApiUser { user })
    }
}

/// Finds the subject's user row, provisioning one on first sight. Two
/// requests may race on the first insert; the loser hits the unique
/// constraint on `subject_id` and rereads the winner's row.
fn resolve_user(
    conn: &mut diesel::SqliteConnection,
    claims: &Claims,
) -> Result<User, diesel::result::Error> {
    if let Some(user) = crate::orm::user::get_user_by_subject_id(conn, &claims.sub)? {
        return Ok(user);
    }

    match crate::orm::user::insert_provisioned_user(
        conn,
        &claims.sub,
        &claims.display_name(),
        &claims.provision_email(),
    ) {
        Ok(()) => {}
        Err(e) if crate::orm::is_unique_violation(&e) => {}
        Err(e) => return Err(e),
    }

    crate::orm::user::get_user_by_subject_id(conn, &claims.sub)?
        .ok_or(diesel::result::Error::NotFound)
}
