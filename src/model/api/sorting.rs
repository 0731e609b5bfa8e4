use serde::{Deserialize, Serialize};

use crate::model::{
    common::House,
    db::catalog::{Answer, Question},
};

/// A member's chosen answer for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub question_id: u32,
    pub answer_id: u32,
}

/// Body of a sorting submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortingRequest {
    pub selections: Vec<Selection>,
}

/// The outcome of a successful sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingResult {
    pub house: House,
}

/// Where a member currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingStatus {
    pub house: Option<House>,
    pub sorted: bool,
}

/// A question together with every answer that belongs to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionWithAnswers {
    pub question: Question,
    pub answers: Vec<Answer>,
}

/// What a quiz taker sees of an answer: no house, no weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerChoice {
    pub id: u32,
    pub text: String,
}

/// What a quiz taker sees of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDescription {
    pub id: u32,
    pub prompt: String,
    pub answers: Vec<AnswerChoice>,
}

impl From<QuestionWithAnswers> for QuestionDescription {
    fn from(entry: QuestionWithAnswers) -> Self {
        Self {
            id: entry.question.id,
            prompt: entry.question.prompt,
            answers: entry
                .answers
                .into_iter()
                .map(|answer| AnswerChoice {
                    id: answer.id,
                    text: answer.text,
                })
                .collect(),
        }
    }
}
