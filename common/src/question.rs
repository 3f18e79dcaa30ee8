use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::shuffle::fisher_yates;

pub type QuestionId = String;
pub type ScenarioId = String;
pub type CategoryId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    DragAndDrop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub description: String,
    /// Longer explanation of why the scenario belongs to its category.
    #[serde(default)]
    pub detailed_info: String,
}

impl Scenario {
    pub fn new<A, B>(id: A, description: B) -> Self
    where
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            id: id.into(),
            description: description.into(),
            detailed_info: String::new(),
        }
    }

    pub fn with_detailed_info<A: Into<String>>(mut self, info: A) -> Self {
        self.detailed_info = info.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new<A, B>(id: A, name: B) -> Self
    where
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectPair {
    pub scenario_id: ScenarioId,
    pub category_id: CategoryId,
}

impl CorrectPair {
    pub fn new<A, B>(scenario_id: A, category_id: B) -> Self
    where
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            scenario_id: scenario_id.into(),
            category_id: category_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoice {
    pub options: Vec<String>,
    pub correct_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DragAndDrop {
    pub scenarios: Vec<Scenario>,
    pub categories: Vec<Category>,
    pub correct_pairs: Vec<CorrectPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionPayload {
    MultipleChoice(MultipleChoice),
    DragAndDrop(DragAndDrop),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub explanation: String,
    pub payload: QuestionPayload,
}

impl Question {
    pub fn multiple_choice<A, B, C>(
        id: A,
        prompt: B,
        explanation: C,
        options: Vec<String>,
        correct_index: usize,
    ) -> Self
    where
        A: Into<String>,
        B: Into<String>,
        C: Into<String>,
    {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            explanation: explanation.into(),
            payload: QuestionPayload::MultipleChoice(MultipleChoice {
                options,
                correct_index,
            }),
        }
    }

    pub fn drag_and_drop<A, B, C>(id: A, prompt: B, explanation: C, data: DragAndDrop) -> Self
    where
        A: Into<String>,
        B: Into<String>,
        C: Into<String>,
    {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            explanation: explanation.into(),
            payload: QuestionPayload::DragAndDrop(data),
        }
    }

    pub fn kind(&self) -> QuestionKind {
        match self.payload {
            QuestionPayload::MultipleChoice(_) => QuestionKind::MultipleChoice,
            QuestionPayload::DragAndDrop(_) => QuestionKind::DragAndDrop,
        }
    }

    pub fn as_multiple_choice(&self) -> Option<&MultipleChoice> {
        match &self.payload {
            QuestionPayload::MultipleChoice(data) => Some(data),
            QuestionPayload::DragAndDrop(_) => None,
        }
    }

    pub fn as_drag_and_drop(&self) -> Option<&DragAndDrop> {
        match &self.payload {
            QuestionPayload::DragAndDrop(data) => Some(data),
            QuestionPayload::MultipleChoice(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validation_error().is_none()
    }

    /// Describes the first broken invariant, if any.
    pub fn validation_error(&self) -> Option<String> {
        if self.prompt.is_empty() {
            return Some("prompt is empty".to_string());
        }
        if self.explanation.is_empty() {
            return Some("explanation is empty".to_string());
        }

        match &self.payload {
            QuestionPayload::MultipleChoice(data) => {
                if data.options.len() < 2 {
                    return Some("needs at least two options".to_string());
                }
                if data.correct_index >= data.options.len() {
                    return Some(format!(
                        "correct option {} is out of range (0-{})",
                        data.correct_index,
                        data.options.len() - 1
                    ));
                }
                None
            }
            QuestionPayload::DragAndDrop(data) => data.validation_error(),
        }
    }

    /// Shuffled copy of the options and the index the correct answer moved to.
    ///
    /// The correct option is tracked by text: when two options read the same,
    /// the first matching position wins.
    pub fn shuffled_options<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(Vec<String>, usize)> {
        let data = self.as_multiple_choice()?;
        let correct = data.options.get(data.correct_index)?;

        let mut shuffled = data.options.clone();
        fisher_yates(&mut shuffled, rng);

        let new_index = shuffled.iter().position(|option| option == correct)?;
        Some((shuffled, new_index))
    }

    pub fn shuffled_scenarios<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Scenario> {
        match self.as_drag_and_drop() {
            Some(data) => {
                let mut shuffled = data.scenarios.clone();
                fisher_yates(&mut shuffled, rng);
                shuffled
            }
            None => Vec::new(),
        }
    }

    /// Copy of a multiple-choice question with its options in shuffled order.
    pub fn with_shuffled_options<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Question> {
        let (options, correct_index) = self.shuffled_options(rng)?;
        Some(Question {
            payload: QuestionPayload::MultipleChoice(MultipleChoice {
                options,
                correct_index,
            }),
            ..self.clone()
        })
    }
}

impl DragAndDrop {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.id == id)
    }

    pub fn correct_category_for(&self, scenario_id: &str) -> Option<&CategoryId> {
        self.correct_pairs
            .iter()
            .find(|pair| pair.scenario_id == scenario_id)
            .map(|pair| &pair.category_id)
    }

    fn validation_error(&self) -> Option<String> {
        if self.scenarios.is_empty() {
            return Some("needs at least one scenario".to_string());
        }
        if self.categories.is_empty() {
            return Some("needs at least one category".to_string());
        }
        if self.correct_pairs.is_empty() {
            return Some("needs at least one correct pair".to_string());
        }

        for pair in &self.correct_pairs {
            if self.scenario(&pair.scenario_id).is_none() {
                return Some(format!("pair references unknown scenario `{}`", pair.scenario_id));
            }
            if self.category(&pair.category_id).is_none() {
                return Some(format!("pair references unknown category `{}`", pair.category_id));
            }
        }

        let mut paired = HashSet::new();
        for pair in &self.correct_pairs {
            if !paired.insert(pair.scenario_id.as_str()) {
                return Some(format!("scenario `{}` has more than one pair", pair.scenario_id));
            }
        }
        if let Some(scenario) = self.scenarios.iter().find(|s| !paired.contains(s.id.as_str())) {
            return Some(format!("scenario `{}` has no correct category", scenario.id));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;

    fn options(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    fn sample_drag_and_drop() -> DragAndDrop {
        DragAndDrop {
            scenarios: vec![
                Scenario::new("A", "Scammer"),
                Scenario::new("B", "Reshare"),
                Scenario::new("C", "Doxing"),
            ],
            categories: vec![
                Category::new("disinfo", "DISINFORMASI"),
                Category::new("misinfo", "MISINFORMASI"),
                Category::new("malinfo", "MALINFORMASI"),
            ],
            correct_pairs: vec![
                CorrectPair::new("A", "disinfo"),
                CorrectPair::new("B", "misinfo"),
                CorrectPair::new("C", "malinfo"),
            ],
        }
    }

    #[test]
    fn multiple_choice_needs_two_options_and_in_range_answer() {
        let q = Question::multiple_choice("q", "p", "e", options(&["only"]), 0);
        assert!(!q.is_valid());

        let q = Question::multiple_choice("q", "p", "e", options(&["a", "b"]), 2);
        assert!(!q.is_valid());

        let q = Question::multiple_choice("q", "p", "e", options(&["a", "b"]), 1);
        assert!(q.is_valid());
    }

    #[test]
    fn empty_texts_are_invalid() {
        let q = Question::multiple_choice("q", "", "e", options(&["a", "b"]), 0);
        assert_eq!(q.validation_error().unwrap(), "prompt is empty");

        let q = Question::multiple_choice("q", "p", "", options(&["a", "b"]), 0);
        assert_eq!(q.validation_error().unwrap(), "explanation is empty");
    }

    #[test]
    fn drag_and_drop_pairs_must_reference_known_ids() {
        let mut data = sample_drag_and_drop();
        assert!(Question::drag_and_drop("q", "p", "e", data.clone()).is_valid());

        data.correct_pairs[0].category_id = "nope".to_string();
        let q = Question::drag_and_drop("q", "p", "e", data);
        assert_eq!(
            q.validation_error().unwrap(),
            "pair references unknown category `nope`"
        );
    }

    #[test]
    fn every_scenario_needs_exactly_one_pair() {
        let mut data = sample_drag_and_drop();
        data.correct_pairs.pop();
        let q = Question::drag_and_drop("q", "p", "e", data.clone());
        assert_eq!(
            q.validation_error().unwrap(),
            "scenario `C` has no correct category"
        );

        data.correct_pairs.push(CorrectPair::new("A", "misinfo"));
        let q = Question::drag_and_drop("q", "p", "e", data);
        assert_eq!(
            q.validation_error().unwrap(),
            "scenario `A` has more than one pair"
        );
    }

    #[test]
    fn shuffled_options_keep_the_correct_answer() {
        let q = Question::multiple_choice("q", "p", "e", options(&["a", "b", "c", "d"]), 2);

        for seed in 0..64 {
            let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
            let (shuffled, index) = q.shuffled_options(&mut rng).unwrap();

            let mut sorted = shuffled.clone();
            sorted.sort();
            assert_eq!(sorted, options(&["a", "b", "c", "d"]));
            assert_eq!(shuffled[index], "c");
        }
    }

    #[test]
    fn zero_rng_rotates_options_left() {
        let q = Question::multiple_choice("q", "p", "e", options(&["a", "b", "c", "d"]), 0);
        let mut rng = StepRng::new(0, 0);

        let (shuffled, index) = q.shuffled_options(&mut rng).unwrap();

        assert_eq!(shuffled, options(&["b", "c", "d", "a"]));
        assert_eq!(index, 3);
    }

    #[test]
    fn duplicate_option_text_resolves_to_first_match() {
        let q = Question::multiple_choice("q", "p", "e", options(&["same", "other", "same"]), 2);
        let mut rng = StepRng::new(0, 0);

        // ["other", "same", "same"]
        let (shuffled, index) = q.shuffled_options(&mut rng).unwrap();
        assert_eq!(shuffled, options(&["other", "same", "same"]));
        assert_eq!(index, 1);
    }

    #[test]
    fn shuffles_are_empty_for_the_other_kind() {
        let mut rng = StepRng::new(0, 0);
        let mc = Question::multiple_choice("q", "p", "e", options(&["a", "b"]), 0);
        let dnd = Question::drag_and_drop("q", "p", "e", sample_drag_and_drop());

        assert!(mc.shuffled_scenarios(&mut rng).is_empty());
        assert!(dnd.shuffled_options(&mut rng).is_none());
        assert_eq!(dnd.shuffled_scenarios(&mut rng).len(), 3);
    }
}
