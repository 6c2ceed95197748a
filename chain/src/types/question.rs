// chain/src/types/question.rs

//! Curriculum question catalog types.
//!
//! These mirror the shape of the curriculum JSON document: an ordered
//! array of question objects, each with optional `attachments` for
//! multiple-choice options and a reference answer key.

use serde::{Deserialize, Serialize};

/// A single multiple-choice option.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub text: String,
}

/// Whether a question is multiple-choice or free-response.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Mcq,
    Frq,
}

impl Default for QuestionType {
    fn default() -> Self {
        QuestionType::Mcq
    }
}

/// Optional attachments: choices for MCQ items and a reference answer.
///
/// Both fields default when absent so a minimal question object (just
/// `id` and `prompt`) still parses.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Attachments {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default, rename = "answerKey")]
    pub answer_key: Option<String>,
}

/// A single entry in the curriculum catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    #[serde(rename = "type", default)]
    pub qtype: QuestionType,
    #[serde(default)]
    pub attachments: Attachments,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_defaults_type_and_attachments_when_absent() {
        let raw = r#"{"id": "q1", "prompt": "What is 2+2?"}"#;
        let q: Question = serde_json::from_str(raw).expect("minimal question should parse");
        assert_eq!(q.qtype, QuestionType::Mcq);
        assert!(q.attachments.choices.is_empty());
        assert!(q.attachments.answer_key.is_none());
    }

    #[test]
    fn question_parses_full_attachments() {
        let raw = r#"{
            "id": "q2",
            "prompt": "Pick one",
            "type": "mcq",
            "attachments": {
                "choices": [{"label": "A", "text": "first"}],
                "answerKey": "A"
            }
        }"#;
        let q: Question = serde_json::from_str(raw).expect("full question should parse");
        assert_eq!(q.attachments.choices.len(), 1);
        assert_eq!(q.attachments.answer_key.as_deref(), Some("A"));
    }
}
