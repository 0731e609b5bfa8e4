//! The narrow capabilities the sorting engine needs from the outside world.

use chrono::{DateTime, Utc};
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    options::FindOptions,
    Database,
};
use rocket::futures::TryStreamExt;

use crate::error::Result;
use crate::model::{
    common::House,
    db::{
        catalog::{Answer, Question},
        member::Member,
    },
    mongodb::{Coll, Id},
};

/// Tells who, if anyone, is making the current request.
pub trait SessionProvider {
    fn user_id(&self) -> Option<Id>;
}

impl SessionProvider for Option<Id> {
    fn user_id(&self) -> Option<Id> {
        *self
    }
}

/// Read and sort member records.
#[rocket::async_trait]
pub trait UserStore: Send + Sync {
    async fn find_member(&self, id: Id) -> Result<Option<Member>>;

    /// Record `house` for the member, but only if they have not been sorted yet.
    ///
    /// Returns whether the member was updated. This is a single conditional write, so of two
    /// racing calls for the same member at most one returns `true`.
    async fn assign_house_if_unsorted(&self, id: Id, house: House, at: DateTime<Utc>)
        -> Result<bool>;
}

/// Read the quiz catalog.
#[rocket::async_trait]
pub trait CatalogStore: Send + Sync {
    /// All questions, ordered by ID.
    async fn questions(&self) -> Result<Vec<Question>>;

    /// All answers to all questions, ordered by ID.
    async fn answers(&self) -> Result<Vec<Answer>>;
}

#[rocket::async_trait]
impl UserStore for Coll<Member> {
    async fn find_member(&self, id: Id) -> Result<Option<Member>> {
        Ok(self.find_one(id.as_doc(), None).await?)
    }

    async fn assign_house_if_unsorted(
        &self,
        id: Id,
        house: House,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let filter = doc! {
            "_id": *id,
            "sorted": false,
        };
        let update = doc! {
            "$set": {
                "house": house.name(),
                "sorted": true,
                "updated_at": BsonDateTime::from_chrono(at),
            }
        };
        let result = self.update_one(filter, update, None).await?;
        Ok(result.modified_count == 1)
    }
}

/// The catalog as stored in MongoDB.
#[derive(Clone)]
pub struct MongoCatalog {
    questions: Coll<Question>,
    answers: Coll<Answer>,
}

impl MongoCatalog {
    pub fn from_db(db: &Database) -> Self {
        Self {
            questions: Coll::from_db(db),
            answers: Coll::from_db(db),
        }
    }
}

fn by_id() -> FindOptions {
    FindOptions::builder().sort(doc! { "_id": 1 }).build()
}

#[rocket::async_trait]
impl CatalogStore for MongoCatalog {
    async fn questions(&self) -> Result<Vec<Question>> {
        Ok(self.questions.find(None, by_id()).await?.try_collect().await?)
    }

    async fn answers(&self) -> Result<Vec<Answer>> {
        Ok(self.answers.find(None, by_id()).await?.try_collect().await?)
    }
}
