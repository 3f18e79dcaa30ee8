use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Mapping, QuestionId};

/// Progress through one playthrough of the quiz.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub current_question_index: usize,
    /// One entry per submitted question, in order.
    pub results: Vec<bool>,
    #[serde(default)]
    pub multiple_choice_answers: HashMap<QuestionId, usize>,
    #[serde(default)]
    pub drag_drop_answers: HashMap<QuestionId, Mapping>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_multiple_choice(&mut self, question: &str, selected: usize, correct: bool) {
        self.multiple_choice_answers
            .insert(question.to_string(), selected);
        self.results.push(correct);
    }

    pub fn record_drag_and_drop(&mut self, question: &str, mapping: Mapping, correct: bool) {
        self.drag_drop_answers.insert(question.to_string(), mapping);
        self.results.push(correct);
    }

    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|correct| **correct).count()
    }

    pub fn answered(&self) -> usize {
        self.results.len()
    }

    pub fn accuracy_percentage(&self) -> f32 {
        if self.results.is_empty() {
            0.0
        } else {
            self.correct_count() as f32 / self.answered() as f32 * 100.0
        }
    }

    /// Strict AND over every submitted result.
    pub fn all_correct(&self) -> bool {
        self.results.iter().all(|correct| *correct)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
