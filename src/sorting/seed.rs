//! The built-in quiz catalog, inserted the first time the server starts.

use log::{debug, info};
use mongodb::{error::Error as DbError, options::ReplaceOptions, Database};

use crate::model::{
    common::House,
    db::catalog::{Answer, Question},
    mongodb::{u32_id_filter, Coll},
};

/// Prompts, each followed by one answer per house with its weight.
const CATALOG: &[(&str, [(&str, House, u32); 4])] = &[
    (
        "Which would you rather be known as?",
        [
            ("The brave", House::Gryffindor, 3),
            ("The good", House::Hufflepuff, 3),
            ("The wise", House::Ravenclaw, 3),
            ("The great", House::Slytherin, 3),
        ],
    ),
    (
        "A stranger drops their wallet. You...",
        [
            ("Chase them down the street with it", House::Gryffindor, 2),
            ("Hand it in and wait to make sure it is collected", House::Hufflepuff, 3),
            ("Look for a card with an address on it", House::Ravenclaw, 2),
            ("Return it, and make sure they know who helped", House::Slytherin, 2),
        ],
    ),
    (
        "Which path through the forest do you take?",
        [
            ("The dark one, towards the howling", House::Gryffindor, 3),
            ("The one your friends are taking", House::Hufflepuff, 2),
            ("The one nobody has mapped yet", House::Ravenclaw, 3),
            ("The one that gets you there first", House::Slytherin, 2),
        ],
    ),
    (
        "What would you most like to study?",
        [
            ("Duelling", House::Gryffindor, 1),
            ("Herbology", House::Hufflepuff, 2),
            ("Arithmancy", House::Ravenclaw, 2),
            ("Potions", House::Slytherin, 1),
        ],
    ),
    (
        "How do you want to be remembered?",
        [
            ("For what I dared", House::Gryffindor, 2),
            ("For how I treated people", House::Hufflepuff, 1),
            ("For what I discovered", House::Ravenclaw, 1),
            ("For what I achieved", House::Slytherin, 3),
        ],
    ),
];

/// Build the default catalog. Question IDs start at 1; answer IDs are the question ID times
/// ten plus the answer's position.
pub fn default_catalog() -> (Vec<Question>, Vec<Answer>) {
    let mut questions = Vec::with_capacity(CATALOG.len());
    let mut answers = Vec::new();
    for (question_id, (prompt, choices)) in (1..).zip(CATALOG) {
        questions.push(Question {
            id: question_id,
            prompt: prompt.to_string(),
        });
        for (position, (text, house, score)) in (1..).zip(choices) {
            answers.push(Answer {
                id: question_id * 10 + position,
                question_id,
                text: text.to_string(),
                house: *house,
                score: *score,
            });
        }
    }
    (questions, answers)
}

/// Insert the default catalog unless a catalog is already present.
///
/// Each document is upserted by ID, so a seed that was interrupted part way is completed on
/// the next start rather than colliding with what it already wrote.
///
/// This operation is idempotent.
pub async fn ensure_catalog_exists(db: &Database) -> Result<(), DbError> {
    let questions = Coll::<Question>::from_db(db);
    let answers = Coll::<Answer>::from_db(db);
    if questions.count_documents(None, None).await? > 0
        && answers.count_documents(None, None).await? > 0
    {
        debug!("Quiz catalog already present");
        return Ok(());
    }

    let (new_questions, new_answers) = default_catalog();
    info!(
        "Seeding quiz catalog with {} questions and {} answers",
        new_questions.len(),
        new_answers.len()
    );
    let upsert = ReplaceOptions::builder().upsert(true).build();
    for answer in &new_answers {
        answers
            .replace_one(u32_id_filter(answer.id), answer, upsert.clone())
            .await?;
    }
    for question in &new_questions {
        questions
            .replace_one(u32_id_filter(question.id), question, upsert.clone())
            .await?;
    }
    Ok(())
}
