use serde::{Deserialize, Serialize};

use crate::model::common::House;

/// A quiz question. Reference data: seeded once, never modified at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: u32,
    pub prompt: String,
}

/// One possible answer to a [`Question`], counting towards a single house.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "_id")]
    pub id: u32,
    pub question_id: u32,
    pub text: String,
    pub house: House,
    pub score: u32,
}
