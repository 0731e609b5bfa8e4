use argon2::Config;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::db::member::NewMember;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Raw member credentials, received from a user. These are never stored directly,
/// since the password is in plaintext.
#[derive(Clone, Deserialize, Serialize)]
pub struct MemberCredentials {
    pub username: String,
    pub password: String,
}

impl TryFrom<MemberCredentials> for NewMember {
    type Error = ();

    /// Convert [`MemberCredentials`] to a new, unsorted member by hashing the password.
    /// This enforces that the username is non-empty, and the password meets minimum length.
    fn try_from(cred: MemberCredentials) -> Result<Self, Self::Error> {
        if cred.username.trim().is_empty() || cred.password.len() < MIN_PASSWORD_LENGTH {
            return Err(());
        }

        // 16 bytes is recommended for password hashing:
        //  https://en.wikipedia.org/wiki/Argon2
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let password_hash = argon2::hash_encoded(cred.password.as_bytes(), &salt, &Config::default())
            .map_err(|_| ())?;
        Ok(NewMember::new(cred.username, password_hash))
    }
}

#[cfg(test)]
mod examples {
    use super::*;

    impl MemberCredentials {
        pub fn example() -> Self {
            Self {
                username: "harry".into(),
                password: "hogwarts1".into(),
            }
        }

        pub fn example2() -> Self {
            Self {
                username: "hermione".into(),
                password: "leviosaaa".into(),
            }
        }

        pub fn empty() -> Self {
            Self {
                username: "".into(),
                password: "".into(),
            }
        }
    }
}
