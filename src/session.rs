use thiserror::Error;

use crate::loader::Item;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("select an option before submitting")]
    NoSelection,

    #[error("'{0}' is not one of the options")]
    UnknownOption(String),

    #[error("this question was already answered")]
    AlreadyAnswered,

    #[error("answer the current question first")]
    NotAnswered,

    #[error("the quiz is finished")]
    Finished,
}

impl SessionError {
    /// Errors caused by what the user entered, as opposed to acting out of turn.
    pub fn is_user_input(&self) -> bool {
        matches!(self, SessionError::NoSelection | SessionError::UnknownOption(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Answering,
    Answered,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub correct_option: String,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// every answer right
    Perfect,
    /// 70% or better
    Positive,
    Encouragement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub verdict: Verdict,
}

impl Summary {
    /// Percentage rounded down, so it agrees with the verdict thresholds.
    pub fn whole_percentage(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        self.score * 100 / self.total
    }
}

/// Cursor and score of the one running quiz. Items live elsewhere and are
/// handed in on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current_index: usize,
    pub score: usize,
    pub has_answered: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, items: &[Item]) -> Phase {
        if self.current_index >= items.len() {
            Phase::Finished
        } else if self.has_answered {
            Phase::Answered
        } else {
            Phase::Answering
        }
    }

    pub fn current_item<'a>(&self, items: &'a [Item]) -> Option<&'a Item> {
        items.get(self.current_index)
    }

    pub fn submit_answer(
        &mut self,
        items: &[Item],
        choice: Option<&str>,
    ) -> Result<Feedback, SessionError> {
        let item = match self.phase(items) {
            Phase::Finished => return Err(SessionError::Finished),
            Phase::Answered => return Err(SessionError::AlreadyAnswered),
            Phase::Answering => &items[self.current_index],
        };

        let choice = choice.ok_or(SessionError::NoSelection)?;
        if !item.options.iter().any(|o| o == choice) {
            return Err(SessionError::UnknownOption(choice.to_string()));
        }

        let correct = choice == item.correct_option();
        if correct {
            self.score += 1;
        }
        self.has_answered = true;
        log::debug!(
            "question {} answered {}",
            self.current_index + 1,
            if correct { "correctly" } else { "incorrectly" }
        );

        Ok(Feedback {
            correct,
            correct_option: item.correct_option().to_string(),
            explanation: item.explanation.clone(),
        })
    }

    pub fn advance(&mut self, items: &[Item]) -> Result<Phase, SessionError> {
        match self.phase(items) {
            Phase::Finished => Err(SessionError::Finished),
            Phase::Answering => Err(SessionError::NotAnswered),
            Phase::Answered => {
                self.current_index += 1;
                self.has_answered = false;
                Ok(self.phase(items))
            }
        }
    }

    pub fn reset(&mut self) {
        log::debug!("resetting session at question {}", self.current_index + 1);
        *self = Self::default();
    }

    /// Final score, only once every item has been answered.
    pub fn summary(&self, items: &[Item]) -> Option<Summary> {
        if self.phase(items) != Phase::Finished || items.is_empty() {
            return None;
        }

        let total = items.len();
        let verdict = if self.score == total {
            Verdict::Perfect
        } else if self.score * 100 >= total * 70 {
            Verdict::Positive
        } else {
            Verdict::Encouragement
        };

        Some(Summary {
            score: self.score,
            total,
            percentage: self.score as f64 / total as f64 * 100.0,
            verdict,
        })
    }
}
