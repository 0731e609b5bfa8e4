//! Scoring of selections and choice of the winning house.

use std::{collections::HashMap, hash::Hash};

use log::debug;

use crate::model::{api::sorting::Selection, common::House, db::catalog::Answer};

/// Running score per label.
#[derive(Debug, Clone)]
pub struct Tally<L> {
    scores: HashMap<L, u64>,
}

impl<L> Tally<L>
where
    L: Copy + Eq + Hash,
{
    /// A tally with every one of `labels` at zero.
    pub fn new(labels: &[L]) -> Self {
        Self {
            scores: labels.iter().map(|&label| (label, 0)).collect(),
        }
    }

    /// Add `weight` to the score of `label`.
    pub fn add(&mut self, label: L, weight: u32) {
        *self.scores.entry(label).or_insert(0) += u64::from(weight);
    }

    /// The current score of `label`.
    pub fn score(&self, label: L) -> u64 {
        self.scores.get(&label).copied().unwrap_or(0)
    }
}

/// Pick the label with the highest score, walking `labels` in order.
///
/// A label with a strictly higher score than the current leader takes the lead; on an equal
/// score, the label whose name sorts first wins. Returns [`None`] only if `labels` is empty.
pub fn winner<L>(labels: &[L], tally: &Tally<L>) -> Option<L>
where
    L: Copy + Eq + Hash + AsRef<str>,
{
    let mut leader: Option<(L, u64)> = None;
    for &label in labels {
        let score = tally.score(label);
        let takes_lead = match leader {
            None => true,
            Some((current, best)) => {
                score > best || (score == best && label.as_ref() < current.as_ref())
            }
        };
        if takes_lead {
            leader = Some((label, score));
        }
    }
    leader.map(|(label, _)| label)
}

/// Tally the houses for the given selections.
///
/// A selection only counts if its answer exists and belongs to the question it was submitted
/// for; anything else is skipped without error.
pub fn score_selections(answers: &[Answer], selections: &[Selection]) -> Tally<House> {
    let by_id: HashMap<u32, &Answer> = answers.iter().map(|answer| (answer.id, answer)).collect();

    let mut tally = Tally::new(&House::ALL);
    for selection in selections {
        match by_id.get(&selection.answer_id) {
            Some(answer) if answer.question_id == selection.question_id => {
                tally.add(answer.house, answer.score);
            }
            _ => debug!(
                "Ignoring selection of answer {} for question {}: no such pairing",
                selection.answer_id, selection.question_id
            ),
        }
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [&str; 4] = ["Alpha", "Beta", "Gamma", "Delta"];

    fn answer(id: u32, question_id: u32, house: House, score: u32) -> Answer {
        Answer {
            id,
            question_id,
            text: format!("answer {id}"),
            house,
            score,
        }
    }

    #[test]
    fn tie_goes_to_alphabetically_first() {
        let mut tally = Tally::new(&LABELS);
        tally.add("Beta", 3);
        tally.add("Gamma", 3);
        assert_eq!(winner(&LABELS, &tally), Some("Beta"));

        // Order of the label list must not matter.
        let reversed: Vec<_> = LABELS.iter().rev().copied().collect();
        assert_eq!(winner(&reversed, &tally), Some("Beta"));
    }

    #[test]
    fn clear_winner() {
        let mut tally = Tally::new(&LABELS);
        tally.add("Delta", 10);
        assert_eq!(winner(&LABELS, &tally), Some("Delta"));
    }

    #[test]
    fn all_zero_picks_first_name() {
        let tally = Tally::new(&LABELS);
        assert_eq!(winner(&LABELS, &tally), Some("Alpha"));
    }

    #[test]
    fn no_labels_no_winner() {
        let tally = Tally::<&str>::new(&[]);
        assert_eq!(winner(&[], &tally), None);
    }

    #[test]
    fn mismatched_pairs_score_nothing() {
        let answers = vec![
            answer(11, 1, House::Slytherin, 3),
            answer(21, 2, House::Ravenclaw, 2),
        ];
        let selections = vec![
            // Answer 11 belongs to question 1, not 2.
            Selection {
                question_id: 2,
                answer_id: 11,
            },
            // No answer 99 at all.
            Selection {
                question_id: 1,
                answer_id: 99,
            },
            Selection {
                question_id: 2,
                answer_id: 21,
            },
        ];
        let tally = score_selections(&answers, &selections);
        assert_eq!(tally.score(House::Slytherin), 0);
        assert_eq!(tally.score(House::Ravenclaw), 2);
        assert_eq!(winner(&House::ALL, &tally), Some(House::Ravenclaw));
    }

    #[test]
    fn weights_accumulate_per_house() {
        let answers = vec![
            answer(11, 1, House::Hufflepuff, 2),
            answer(21, 2, House::Hufflepuff, 1),
            answer(31, 3, House::Gryffindor, 3),
        ];
        let selections: Vec<_> = answers
            .iter()
            .map(|a| Selection {
                question_id: a.question_id,
                answer_id: a.id,
            })
            .collect();
        let tally = score_selections(&answers, &selections);
        assert_eq!(tally.score(House::Hufflepuff), 3);
        assert_eq!(tally.score(House::Gryffindor), 3);
        // Tied at 3: Gryffindor sorts first.
        assert_eq!(winner(&House::ALL, &tally), Some(House::Gryffindor));
    }

    #[test]
    fn empty_selections_pick_first_house() {
        let tally = score_selections(&[], &[]);
        assert_eq!(winner(&House::ALL, &tally), Some(House::Gryffindor));
    }
}
