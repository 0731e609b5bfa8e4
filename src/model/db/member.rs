use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{common::House, mongodb::Id};

/// Core member data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberCore {
    pub username: String,
    pub password_hash: String,
    /// The house this member was sorted into, if any.
    pub house: Option<House>,
    /// Set exactly once, together with `house`.
    pub sorted: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl MemberCore {
    /// A freshly registered, unsorted member.
    pub fn new(username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            username,
            password_hash,
            house: None,
            sorted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        // A malformed hash can only come from outside this crate; treat it as a mismatch.
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap_or(false)
    }
}

/// A member without an ID.
pub type NewMember = MemberCore;

/// A member from the database, with its unique ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub member: MemberCore,
}

impl Deref for Member {
    type Target = MemberCore;

    fn deref(&self) -> &Self::Target {
        &self.member
    }
}

impl DerefMut for Member {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.member
    }
}
