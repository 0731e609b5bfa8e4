use log::{debug, info};
use mongodb::bson::doc;
use rocket::{
    http::{Cookie, CookieJar, Status},
    serde::json::Json,
    Route, State,
};

use crate::{
    config::Config,
    error::{Error, Result},
    model::{
        api::{
            auth::{AuthToken, AUTH_TOKEN_COOKIE},
            credentials::MemberCredentials,
        },
        db::member::{Member, NewMember},
        mongodb::{is_duplicate_key_error, Coll, Id},
    },
};

pub fn routes() -> Vec<Route> {
    routes![register, login, logout]
}

#[post("/auth/register", data = "<credentials>", format = "json")]
pub async fn register(
    cookies: &CookieJar<'_>,
    credentials: Json<MemberCredentials>,
    new_members: Coll<NewMember>,
    members: Coll<Member>,
    config: &State<Config>,
) -> Result<()> {
    let username = credentials.username.clone();
    let member: NewMember = credentials.0.try_into().map_err(|_| {
        Error::Status(
            Status::BadRequest,
            "Username must not be empty and passwords need at least 8 characters".to_string(),
        )
    })?;

    // The unique index on `username` settles races between identical sign-ups.
    let new_id: Id = match new_members.insert_one(&member, None).await {
        Ok(result) => result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| {
                Error::Status(
                    Status::InternalServerError,
                    "Database returned a non-ObjectId key".to_string(),
                )
            })?
            .into(),
        Err(err) if is_duplicate_key_error(&err) => {
            return Err(Error::Status(
                Status::Conflict,
                format!("Username already in use: {username}"),
            ));
        }
        Err(err) => return Err(err.into()),
    };
    info!("Registered member {username} as {new_id}");

    let member = members
        .find_one(new_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Member {new_id}")))?;
    cookies.add(AuthToken::new(&member).into_cookie(config)?);

    Ok(())
}

#[post("/auth/login", data = "<credentials>", format = "json")]
pub async fn login(
    cookies: &CookieJar<'_>,
    credentials: Json<MemberCredentials>,
    members: Coll<Member>,
    config: &State<Config>,
) -> Result<()> {
    let with_username = doc! {
        "username": &credentials.username
    };

    let member = members
        .find_one(with_username, None)
        .await?
        .filter(|member| member.verify_password(&credentials.password))
        .ok_or_else(|| {
            Error::Status(
                Status::Unauthorized,
                "No member found with the provided username and password combination."
                    .to_string(),
            )
        })?;

    cookies.add(AuthToken::new(&member).into_cookie(config)?);
    debug!("Member {} signed in", member.id);

    Ok(())
}

#[delete("/auth")]
pub fn logout(cookies: &CookieJar) -> Status {
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
    Status::Ok
}

#[cfg(test)]
mod tests {
    use rocket::{http::ContentType, local::asynchronous::Client, serde::json::serde_json::json};

    use super::*;

    #[backend_test]
    async fn register_signs_in(client: Client, members: Coll<Member>) {
        let response = client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!(MemberCredentials::example()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_some());

        let member = members
            .find_one(doc! { "username": "harry" }, None)
            .await
            .unwrap()
            .unwrap();
        assert!(member.verify_password("hogwarts1"));
        assert_eq!(member.house, None);
        assert!(!member.sorted);
    }

    #[backend_test]
    async fn register_duplicate_username(client: Client) {
        for expected in [Status::Ok, Status::Conflict] {
            let response = client
                .post(uri!(register))
                .header(ContentType::JSON)
                .body(json!(MemberCredentials::example()).to_string())
                .dispatch()
                .await;
            assert_eq!(expected, response.status());
        }
    }

    #[backend_test]
    async fn register_weak_credentials(client: Client, members: Coll<Member>) {
        let response = client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!(MemberCredentials::empty()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::BadRequest, response.status());
        assert_eq!(members.count_documents(None, None).await.unwrap(), 0);
    }

    #[backend_test]
    async fn login_valid(client: Client, new_members: Coll<NewMember>) {
        new_members
            .insert_one(NewMember::example(), None)
            .await
            .unwrap();

        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(json!(MemberCredentials::example()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_some());
    }

    #[backend_test]
    async fn login_invalid(client: Client, new_members: Coll<NewMember>) {
        new_members
            .insert_one(NewMember::example(), None)
            .await
            .unwrap();

        // Unknown username.
        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(json!(MemberCredentials::example2()).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Unauthorized, response.status());

        // Wrong password.
        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(json!({ "username": "harry", "password": "alohomora" }).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Unauthorized, response.status());
        assert_eq!(None, client.cookies().get(AUTH_TOKEN_COOKIE));
    }

    #[backend_test(member)]
    async fn logout_member(client: Client) {
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_some());

        let response = client.delete(uri!(logout)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
        assert_eq!(None, client.cookies().get(AUTH_TOKEN_COOKIE));
    }

    #[backend_test]
    async fn logout_not_logged_in(client: Client) {
        let response = client.delete(uri!(logout)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
    }
}
