use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use rocket::{
    http::{Cookie, SameSite, Status},
    outcome::{try_outcome, IntoOutcome},
    request::{FromRequest, Outcome},
    time::Duration,
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    db::member::Member,
    mongodb::{Coll, Id},
};

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// An authentication token representing a signed-in member.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthToken {
    pub id: Id,
}

impl AuthToken {
    /// Create a new [`AuthToken`] for the given member.
    pub fn new(member: &Member) -> Self {
        Self { id: member.id }
    }

    /// Serialize this token into a signed cookie.
    pub fn into_cookie(self, config: &Config) -> Result<Cookie<'static>> {
        let claims = Claims {
            token: self,
            expire_at: Utc::now() + config.auth_ttl(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )?;

        Ok(Cookie::build(AUTH_TOKEN_COOKIE, token)
            .max_age(Duration::seconds(config.auth_ttl().num_seconds()))
            .http_only(true)
            .same_site(SameSite::Strict)
            .finish())
    }

    /// The signed-in member, if any, given the outcome of the request guard.
    ///
    /// A missing or invalid token means nobody is signed in; a failure while checking the token
    /// (e.g. the database being unreachable) is an error in its own right.
    pub fn session(outcome: Outcome<Self, Error>) -> Result<Option<Id>> {
        match outcome {
            Outcome::Success(token) => Ok(Some(token.id)),
            Outcome::Forward(()) => Ok(None),
            Outcome::Failure((_, err)) => Err(err),
        }
    }

    /// Deserialize a token from a cookie.
    pub fn from_cookie(cookie: &Cookie<'static>, config: &Config) -> Result<Self> {
        let token = jsonwebtoken::decode(
            cookie.value(),
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims>| claims.claims.token)?;
        Ok(token)
    }
}

/// Cookie claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    token: AuthToken,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthToken {
    type Error = Error;

    /// Get an [`AuthToken`] from the cookie, checking that the member it names still exists.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        // Unwrap is safe as `Config` is always managed.
        let config = req.guard::<&State<Config>>().await.unwrap();

        // Forward to any routes that do not require an authentication token.
        let cookie = try_outcome!(req.cookies().get(AUTH_TOKEN_COOKIE).or_forward(()));

        let token: Self = try_outcome!(Self::from_cookie(cookie, config).or_forward(()));

        let db = req.guard::<&State<mongodb::Database>>().await.unwrap();
        let member = Coll::<Member>::from_db(db)
            .find_one(token.id.as_doc(), None)
            .await;
        match member {
            Ok(Some(_)) => Outcome::Success(token),
            Ok(None) => Outcome::Forward(()),
            Err(e) => Outcome::Failure((Status::InternalServerError, e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_from_outcome() {
        let id = Id::new();
        assert_eq!(
            AuthToken::session(Outcome::Success(AuthToken { id })).unwrap(),
            Some(id)
        );
        assert_eq!(AuthToken::session(Outcome::Forward(())).unwrap(), None);
    }

    #[test]
    fn session_lookup_failure_is_not_anonymous() {
        let failure = Outcome::Failure((
            Status::InternalServerError,
            Error::Status(Status::InternalServerError, "database down".to_string()),
        ));

        match AuthToken::session(failure) {
            Err(err) => assert_eq!(err.status(), Status::InternalServerError),
            Ok(session) => panic!("Expected an error, got session {session:?}"),
        }
    }
}
