use std::collections::HashMap;

use crate::error::Result;
use crate::model::{api::sorting::QuestionWithAnswers, db::catalog::Answer};

use super::store::CatalogStore;

/// Every question in the catalog, each carrying its own answers.
///
/// Questions keep the store's order, as do the answers within each question. Storage failures
/// are passed straight back to the caller.
pub async fn list_questions_with_answers<C>(catalog: &C) -> Result<Vec<QuestionWithAnswers>>
where
    C: CatalogStore + ?Sized,
{
    let questions = catalog.questions().await?;
    let answers = catalog.answers().await?;

    let mut by_question: HashMap<u32, Vec<Answer>> = HashMap::new();
    for answer in answers {
        by_question.entry(answer.question_id).or_default().push(answer);
    }

    Ok(questions
        .into_iter()
        .map(|question| QuestionWithAnswers {
            answers: by_question.remove(&question.id).unwrap_or_default(),
            question,
        })
        .collect())
}
