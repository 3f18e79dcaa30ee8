use std::collections::BTreeMap;

use crate::{CategoryId, Question, ScenarioId};

/// Player's scenario → category assignments for a drag-and-drop question.
pub type Mapping = BTreeMap<ScenarioId, CategoryId>;

pub fn validate_multiple_choice(question: &Question, selected: usize) -> bool {
    match question.as_multiple_choice() {
        Some(data) => selected == data.correct_index,
        None => false,
    }
}

pub fn validate_drag_and_drop(question: &Question, mapping: &Mapping) -> bool {
    let Some(data) = question.as_drag_and_drop() else {
        return false;
    };

    if mapping.len() != data.correct_pairs.len() {
        return false;
    }

    data.correct_pairs
        .iter()
        .all(|pair| mapping.get(&pair.scenario_id) == Some(&pair.category_id))
}

/// Fraction of correct pairs the mapping satisfies, in `[0, 1]`.
pub fn partial_score(question: &Question, mapping: &Mapping) -> f32 {
    let Some(data) = question.as_drag_and_drop() else {
        return 0.0;
    };
    if data.correct_pairs.is_empty() {
        return 0.0;
    }

    let satisfied = data
        .correct_pairs
        .iter()
        .filter(|pair| mapping.get(&pair.scenario_id) == Some(&pair.category_id))
        .count();

    satisfied as f32 / data.correct_pairs.len() as f32
}
