// src/services/assembler.rs

use rand::{Rng, seq::SliceRandom};
use serde::Serialize;

use crate::models::{
    question::{Question, QuestionType},
    quiz::Quiz,
};

/// A question as shown to the person taking the quiz. Carries no answer.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptQuestion {
    pub id: i64,
    pub question_type: QuestionType,
    pub question_text: String,
    pub image_path: Option<String>,
    pub options: Vec<String>,
}

/// One presentation of a quiz.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptView {
    pub quiz_id: i64,
    pub title: String,
    pub time_limit: i64,
    pub strict_mode: bool,
    pub questions: Vec<AttemptQuestion>,
}

/// Builds a freshly shuffled attempt view.
///
/// Question order is shuffled on every call. Options are shuffled only for
/// multiple choice; true/false keeps its canonical order.
pub fn assemble<R: Rng + ?Sized>(quiz: &Quiz, questions: Vec<Question>, rng: &mut R) -> AttemptView {
    let mut questions: Vec<AttemptQuestion> = questions
        .into_iter()
        .map(|q| {
            let mut options = q.options.0;
            if q.question_type == QuestionType::MultipleChoice {
                options.shuffle(&mut *rng);
            }
            AttemptQuestion {
                id: q.id,
                question_type: q.question_type,
                question_text: q.question_text,
                image_path: q.image_path,
                options,
            }
        })
        .collect();
    questions.shuffle(rng);

    AttemptView {
        quiz_id: quiz.id,
        title: quiz.title.clone(),
        time_limit: quiz.time_limit,
        strict_mode: quiz.strict_mode,
        questions,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::test_support::{capitals_questions, question, quiz};

    fn option_sets(view: &AttemptView) -> Vec<(i64, BTreeSet<String>)> {
        let mut sets: Vec<_> = view
            .questions
            .iter()
            .map(|q| (q.id, q.options.iter().cloned().collect()))
            .collect();
        sets.sort();
        sets
    }

    #[test]
    fn repeated_assembly_keeps_question_and_option_sets() {
        let q = quiz(1);
        let first = assemble(&q, capitals_questions(1), &mut StdRng::seed_from_u64(1));
        let second = assemble(&q, capitals_questions(1), &mut StdRng::seed_from_u64(2));

        assert_eq!(first.questions.len(), 3);
        assert_eq!(option_sets(&first), option_sets(&second));
    }

    #[test]
    fn question_order_varies_between_presentations() {
        let q = quiz(1);
        let questions: Vec<_> = (1..=8)
            .map(|id| question(id, 1, QuestionType::FreeText, &[], "x"))
            .collect();
        let mut rng = StdRng::seed_from_u64(42);

        let orders: BTreeSet<Vec<i64>> = (0..20)
            .map(|_| {
                assemble(&q, questions.clone(), &mut rng)
                    .questions
                    .iter()
                    .map(|q| q.id)
                    .collect()
            })
            .collect();

        assert!(orders.len() > 1);
    }

    #[test]
    fn true_false_options_keep_their_order() {
        let q = quiz(1);
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..10 {
            let view = assemble(&q, capitals_questions(1), &mut rng);
            let tf = view.questions.iter().find(|q| q.id == 2).unwrap();
            assert_eq!(tf.options, vec!["True", "False"]);
            let text = view.questions.iter().find(|q| q.id == 3).unwrap();
            assert!(text.options.is_empty());
        }
    }

    #[test]
    fn view_never_carries_answers() {
        let view = assemble(&quiz(1), capitals_questions(1), &mut StdRng::seed_from_u64(3));
        let json = serde_json::to_string(&view).unwrap();

        assert!(!json.contains("correct_answer"));
        assert!(!json.contains("Blue"));
    }
}
