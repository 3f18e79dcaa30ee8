use serde::Deserialize;
use sift_common::{
    Category, CorrectPair, DragAndDrop, Question, QuestionKind, QuestionPayload, Scenario,
};

/// On-disk shape of a question bank.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawBank {
    #[serde(default, rename = "question")]
    pub questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawQuestion {
    #[serde(default)]
    pub id: String,
    pub kind: QuestionKind,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct: Option<usize>,
    #[serde(default, rename = "scenario")]
    pub scenarios: Vec<RawScenario>,
    #[serde(default, rename = "category")]
    pub categories: Vec<RawCategory>,
    #[serde(default, rename = "pair")]
    pub pairs: Vec<RawPair>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawScenario {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub detailed_info: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawCategory {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawPair {
    pub scenario: String,
    pub category: String,
}

impl RawQuestion {
    /// Builds the question, or explains which kind-specific field is unusable.
    pub fn into_question(self) -> Result<Question, String> {
        let payload = match self.kind {
            QuestionKind::MultipleChoice => {
                if !self.scenarios.is_empty() || !self.categories.is_empty() || !self.pairs.is_empty() {
                    return Err("multiple choice question has drag and drop fields".to_string());
                }
                let correct_index = self
                    .correct
                    .ok_or_else(|| "multiple choice question has no `correct` index".to_string())?;
                QuestionPayload::MultipleChoice(sift_common::MultipleChoice {
                    options: self.options,
                    correct_index,
                })
            }
            QuestionKind::DragAndDrop => {
                if !self.options.is_empty() || self.correct.is_some() {
                    return Err("drag and drop question has multiple choice fields".to_string());
                }
                QuestionPayload::DragAndDrop(DragAndDrop {
                    scenarios: self
                        .scenarios
                        .into_iter()
                        .map(|s| Scenario::new(s.id, s.description).with_detailed_info(s.detailed_info))
                        .collect(),
                    categories: self
                        .categories
                        .into_iter()
                        .map(|c| Category::new(c.id, c.name))
                        .collect(),
                    correct_pairs: self
                        .pairs
                        .into_iter()
                        .map(|p| CorrectPair::new(p.scenario, p.category))
                        .collect(),
                })
            }
        };

        Ok(Question {
            id: self.id,
            prompt: self.prompt,
            explanation: self.explanation,
            payload,
        })
    }
}
