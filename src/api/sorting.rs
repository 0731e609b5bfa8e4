use mongodb::Database;
use rocket::{request::Outcome, serde::json::Json, Route, State};

use crate::{
    error::{Error, Result, SortingError},
    model::{
        api::{
            auth::AuthToken,
            sorting::{QuestionDescription, SortingRequest, SortingResult, SortingStatus},
        },
        db::member::Member,
        mongodb::Coll,
    },
    sorting::{list_questions_with_answers, MongoCatalog, SortingHat, UserStore},
};

pub fn routes() -> Vec<Route> {
    routes![get_questions, submit_selections, get_status]
}

#[get("/sorting/questions")]
async fn get_questions(db: &State<Database>) -> Result<Json<Vec<QuestionDescription>>> {
    let catalog = MongoCatalog::from_db(db);
    let questions = list_questions_with_answers(&catalog)
        .await?
        .into_iter()
        .map(QuestionDescription::from)
        .collect();
    Ok(Json(questions))
}

#[post("/sorting", data = "<request>", format = "json")]
async fn submit_selections(
    token: Outcome<AuthToken, Error>,
    request: Json<SortingRequest>,
    members: Coll<Member>,
    db: &State<Database>,
) -> Result<Json<SortingResult>> {
    let session = AuthToken::session(token)?;
    let hat = SortingHat::new(members, MongoCatalog::from_db(db));
    let house = hat.assign(&session, &request.selections).await?;
    Ok(Json(SortingResult { house }))
}

#[get("/sorting/me")]
async fn get_status(
    token: Outcome<AuthToken, Error>,
    members: Coll<Member>,
) -> Result<Json<SortingStatus>> {
    let id = AuthToken::session(token)?.ok_or(SortingError::Unauthenticated)?;
    let member = members
        .find_member(id)
        .await?
        .ok_or(SortingError::UserNotFound(id))?;
    Ok(Json(SortingStatus {
        house: member.house,
        sorted: member.sorted,
    }))
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::{Client, LocalResponse},
        serde::json::serde_json::json,
    };

    use super::*;
    use crate::model::{
        api::sorting::Selection,
        common::House,
        db::catalog::{Answer, Question},
    };
    use crate::sorting::seed::default_catalog;

    /// Pick every answer for `house` in the default catalog.
    fn selections_for(house: House) -> Vec<Selection> {
        let (_, answers) = default_catalog();
        answers
            .into_iter()
            .filter(|answer| answer.house == house)
            .map(|answer| Selection {
                question_id: answer.question_id,
                answer_id: answer.id,
            })
            .collect()
    }

    async fn submit(client: &Client, selections: Vec<Selection>) -> LocalResponse<'_> {
        client
            .post(uri!(submit_selections))
            .header(ContentType::JSON)
            .body(json!(SortingRequest { selections }).to_string())
            .dispatch()
            .await
    }

    #[backend_test]
    async fn questions_hide_weights(
        client: Client,
        questions: Coll<Question>,
        answers: Coll<Answer>,
    ) {
        let response = client.get(uri!(get_questions)).dispatch().await;
        assert_eq!(Status::Ok, response.status());

        let body = response.into_string().await.unwrap();
        assert!(!body.contains("score"));
        assert!(!body.contains("house"));

        let listed: Vec<QuestionDescription> = rocket::serde::json::from_str(&body).unwrap();
        let question_count = questions.count_documents(None, None).await.unwrap();
        let answer_count = answers.count_documents(None, None).await.unwrap();
        assert_eq!(listed.len() as u64, question_count);
        assert_eq!(
            listed.iter().map(|q| q.answers.len() as u64).sum::<u64>(),
            answer_count
        );
        assert!(listed.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[backend_test(member)]
    async fn sort_member(client: Client, members: Coll<Member>) {
        let response = submit(&client, selections_for(House::Ravenclaw)).await;
        assert_eq!(Status::Ok, response.status());
        let result: SortingResult = response.into_json().await.unwrap();
        assert_eq!(result.house, House::Ravenclaw);

        let member = members
            .find_one(doc! { "username": "harry" }, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(member.house, Some(House::Ravenclaw));
        assert!(member.sorted);

        let status: SortingStatus = client
            .get(uri!(get_status))
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert_eq!(
            status,
            SortingStatus {
                house: Some(House::Ravenclaw),
                sorted: true
            }
        );
    }

    #[backend_test(member)]
    async fn resubmission_conflicts(client: Client, members: Coll<Member>) {
        let response = submit(&client, selections_for(House::Hufflepuff)).await;
        assert_eq!(Status::Ok, response.status());

        let response = submit(&client, selections_for(House::Slytherin)).await;
        assert_eq!(Status::Conflict, response.status());

        let member = members
            .find_one(doc! { "username": "harry" }, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(member.house, Some(House::Hufflepuff));
    }

    #[backend_test(member)]
    async fn unsorted_status(client: Client) {
        let status: SortingStatus = client
            .get(uri!(get_status))
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert_eq!(
            status,
            SortingStatus {
                house: None,
                sorted: false
            }
        );
    }

    #[backend_test]
    async fn anonymous_rejected(client: Client) {
        let response = submit(&client, selections_for(House::Gryffindor)).await;
        assert_eq!(Status::Unauthorized, response.status());

        let response = client.get(uri!(get_status)).dispatch().await;
        assert_eq!(Status::Unauthorized, response.status());
    }
}
