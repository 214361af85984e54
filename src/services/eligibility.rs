// src/services/eligibility.rs

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{error::AppError, models::quiz::Quiz, repositories::QuizRepository};

/// Why a user may not start or submit an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    Expired,
    AttemptsExhausted,
}

impl Denial {
    pub fn message(&self) -> &'static str {
        match self {
            Denial::Expired => "Quiz expired",
            Denial::AttemptsExhausted => "Max attempts reached",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Allowed,
    Denied(Denial),
}

impl Eligibility {
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Eligibility::Allowed => Ok(()),
            Eligibility::Denied(denial) => Err(AppError::Ineligible(denial)),
        }
    }
}

/// Decides eligibility from already-loaded data.
///
/// The deadline is inclusive: an attempt at exactly the deadline is allowed.
pub fn evaluate(quiz: &Quiz, prior_attempts: i64, now: NaiveDateTime) -> Eligibility {
    if let Some(deadline) = quiz.deadline {
        if now > deadline {
            return Eligibility::Denied(Denial::Expired);
        }
    }

    if quiz.max_attempts > 0 && prior_attempts >= quiz.max_attempts {
        return Eligibility::Denied(Denial::AttemptsExhausted);
    }

    Eligibility::Allowed
}

/// Checks the deadline and the user's attempt count for `quiz`.
pub async fn check_eligibility(
    repo: &dyn QuizRepository,
    quiz: &Quiz,
    user_id: i64,
    now: NaiveDateTime,
) -> Result<Eligibility, AppError> {
    // Unlimited quizzes never need the count.
    let prior_attempts = if quiz.max_attempts > 0 {
        repo.count_results_for(user_id, quiz.id).await?
    } else {
        0
    };

    let eligibility = evaluate(quiz, prior_attempts, now);
    if let Eligibility::Denied(denial) = eligibility {
        tracing::info!(quiz_id = quiz.id, user_id, ?denial, "Attempt refused");
    }
    Ok(eligibility)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::parse_deadline;
    use crate::models::result::NewResult;
    use crate::repositories::memory::MemoryRepository;
    use crate::test_support::quiz;

    fn at(raw: &str) -> NaiveDateTime {
        parse_deadline(raw).unwrap()
    }

    #[test]
    fn past_deadline_is_expired() {
        let mut q = quiz(1);
        q.deadline = Some(at("2024-01-01T00:00"));

        assert_eq!(
            evaluate(&q, 0, at("2024-01-02T00:00")),
            Eligibility::Denied(Denial::Expired)
        );
    }

    #[test]
    fn deadline_itself_is_still_open() {
        let mut q = quiz(1);
        q.deadline = Some(at("2024-01-01T00:00"));

        assert_eq!(evaluate(&q, 0, at("2024-01-01T00:00")), Eligibility::Allowed);
        assert_eq!(evaluate(&q, 0, at("2023-12-31T23:59")), Eligibility::Allowed);
    }

    #[test]
    fn attempts_exhausted_at_cap() {
        let mut q = quiz(1);
        q.max_attempts = 2;
        let now = at("2024-01-01T00:00");

        assert_eq!(evaluate(&q, 1, now), Eligibility::Allowed);
        assert_eq!(
            evaluate(&q, 2, now),
            Eligibility::Denied(Denial::AttemptsExhausted)
        );
    }

    #[test]
    fn zero_max_attempts_is_unlimited() {
        let q = quiz(1);
        assert_eq!(evaluate(&q, 500, at("2024-01-01T00:00")), Eligibility::Allowed);
    }

    #[test]
    fn expiry_wins_over_attempts() {
        let mut q = quiz(1);
        q.deadline = Some(at("2024-01-01T00:00"));
        q.max_attempts = 1;

        assert_eq!(
            evaluate(&q, 3, at("2024-02-01T00:00")),
            Eligibility::Denied(Denial::Expired)
        );
    }

    #[tokio::test]
    async fn two_prior_results_exhaust_two_attempts() {
        let mut q = quiz(7);
        q.max_attempts = 2;
        let repo = MemoryRepository::with_quiz(q.clone(), Vec::new());
        for _ in 0..2 {
            repo.insert_result(NewResult {
                user_id: 3,
                quiz_id: 7,
                score: 1,
                taken_at: chrono::Utc::now(),
                max_attempts: 0,
            })
            .await
            .unwrap();
        }

        let now = at("2024-01-01T00:00");
        let other_user = check_eligibility(&repo, &q, 4, now).await.unwrap();
        let same_user = check_eligibility(&repo, &q, 3, now).await.unwrap();

        assert_eq!(other_user, Eligibility::Allowed);
        assert_eq!(same_user, Eligibility::Denied(Denial::AttemptsExhausted));
        assert!(matches!(
            same_user.into_result(),
            Err(AppError::Ineligible(Denial::AttemptsExhausted))
        ));
    }
}
