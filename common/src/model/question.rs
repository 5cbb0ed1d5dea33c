use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the answers to a question are interpreted.
///
/// The type is fixed identity for answer interpretation: a `Rating` answer is
/// resolved to a number when possible, choice answers are matched against the
/// question's option texts, `Text` answers are stored verbatim (trimmed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    Text,
    Rating,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "SINGLE_CHOICE",
            QuestionType::MultipleChoice => "MULTIPLE_CHOICE",
            QuestionType::Text => "TEXT",
            QuestionType::Rating => "RATING",
        }
    }

    /// Whether answers are expected to name one of the question's options.
    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::MultipleChoice)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parsing: underscores and case are ignored, a few short and
/// localized aliases are accepted, anything else is an error.
impl FromStr for QuestionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.to_uppercase().replace('_', "");
        match normalized.trim() {
            "SINGLECHOICE" | "SINGLE" => Ok(QuestionType::SingleChoice),
            "MULTIPLECHOICE" | "MULTIPLE" => Ok(QuestionType::MultipleChoice),
            "TEXT" | "ТЕКСТ" => Ok(QuestionType::Text),
            "RATING" | "РЕЙТИНГ" => Ok(QuestionType::Rating),
            _ => Err(format!("unknown question type: {}", value)),
        }
    }
}

/// A question owned by a survey. `order_number` is 1-based and contiguous
/// within the survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub survey_id: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub required: bool,
    pub order_number: u32,
    pub options: Vec<AnswerOption>,
}

/// One selectable choice of a question. `order_number` is 1-based and
/// contiguous within the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub order_number: u32,
}
