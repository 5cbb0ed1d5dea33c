//! Maps a raw submitted answer onto its stored representation, according to
//! the declared type of the question it answers. Nothing here touches storage.

use common::model::question::QuestionType;
use common::requests::AnswerValue;
use std::collections::HashMap;

/// Column values of one stored answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedAnswer {
    pub text_answer: Option<String>,
    pub numeric_answer: Option<i32>,
    pub selected_option_id: Option<i64>,
    /// Every selection of a multiple-choice answer, in submission order.
    pub selections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Nothing to store: the answer is absent or blank.
    Skip,
    Answer(ResolvedAnswer),
}

/// Resolves `raw` for a question of type `question_type`.
///
/// `options` maps option text to option id for the question. Choice answers
/// that match no option are kept as text without an option reference.
pub fn resolve(
    question_type: QuestionType,
    raw: Option<&AnswerValue>,
    options: &HashMap<String, i64>,
) -> Resolution {
    let Some(raw) = raw else {
        return Resolution::Skip;
    };
    match question_type {
        QuestionType::SingleChoice => single_choice(raw, options),
        QuestionType::MultipleChoice => multiple_choice(raw, options),
        QuestionType::Text => text(raw),
        QuestionType::Rating => rating(raw),
    }
}

fn single_choice(raw: &AnswerValue, options: &HashMap<String, i64>) -> Resolution {
    let Some(selected) = raw.as_single_text().filter(|s| !s.trim().is_empty()) else {
        return Resolution::Skip;
    };
    Resolution::Answer(ResolvedAnswer {
        selected_option_id: options.get(&selected).copied(),
        text_answer: Some(selected),
        ..Default::default()
    })
}

fn multiple_choice(raw: &AnswerValue, options: &HashMap<String, i64>) -> Resolution {
    let selections: Vec<String> = raw
        .as_list()
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect();
    let Some(first) = selections.first() else {
        return Resolution::Skip;
    };
    Resolution::Answer(ResolvedAnswer {
        selected_option_id: options.get(first).copied(),
        text_answer: Some(selections.join(", ")),
        numeric_answer: None,
        selections,
    })
}

fn text(raw: &AnswerValue) -> Resolution {
    let value = match raw {
        AnswerValue::List(_) | AnswerValue::Other(serde_json::Value::Array(_)) => {
            raw.as_list().join(", ")
        }
        other => other.as_single_text().unwrap_or_default(),
    };
    Resolution::Answer(ResolvedAnswer {
        text_answer: Some(value.trim().to_string()),
        ..Default::default()
    })
}

fn rating(raw: &AnswerValue) -> Resolution {
    if let AnswerValue::Number(number) = raw {
        if let Some(value) = number_to_i32(number) {
            return Resolution::Answer(ResolvedAnswer {
                numeric_answer: Some(value),
                ..Default::default()
            });
        }
    }
    let Some(value) = raw.as_single_text().map(|s| s.trim().to_string()) else {
        return Resolution::Skip;
    };
    if value.is_empty() {
        return Resolution::Skip;
    }
    match value.parse::<i32>() {
        Ok(numeric) => Resolution::Answer(ResolvedAnswer {
            numeric_answer: Some(numeric),
            ..Default::default()
        }),
        Err(_) => Resolution::Answer(ResolvedAnswer {
            text_answer: Some(value),
            ..Default::default()
        }),
    }
}

/// Integers are taken as-is; fractional numbers are truncated. Values outside
/// the `i32` range yield `None`.
fn number_to_i32(number: &serde_json::Number) -> Option<i32> {
    if let Some(value) = number.as_i64() {
        return i32::try_from(value).ok();
    }
    let value = number.as_f64()?;
    (value.is_finite() && value >= i32::MIN as f64 && value <= i32::MAX as f64)
        .then(|| value.trunc() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(json: serde_json::Value) -> AnswerValue {
        serde_json::from_value(json).unwrap()
    }

    fn catalog() -> HashMap<String, i64> {
        HashMap::from([("Yes".to_string(), 11), ("No".to_string(), 12)])
    }

    fn answer(resolution: Resolution) -> ResolvedAnswer {
        match resolution {
            Resolution::Answer(answer) => answer,
            Resolution::Skip => panic!("answer was skipped"),
        }
    }

    #[test]
    fn rating_string_is_parsed() {
        let resolved = answer(resolve(QuestionType::Rating, Some(&value(json!("7"))), &HashMap::new()));
        assert_eq!(resolved.numeric_answer, Some(7));
        assert_eq!(resolved.text_answer, None);
    }

    #[test]
    fn unparsable_rating_degrades_to_text() {
        let resolved = answer(resolve(QuestionType::Rating, Some(&value(json!("high"))), &HashMap::new()));
        assert_eq!(resolved.numeric_answer, None);
        assert_eq!(resolved.text_answer.as_deref(), Some("high"));
    }

    #[test]
    fn rating_number_is_truncated() {
        let resolved = answer(resolve(QuestionType::Rating, Some(&value(json!(4.8))), &HashMap::new()));
        assert_eq!(resolved.numeric_answer, Some(4));
        let resolved = answer(resolve(QuestionType::Rating, Some(&value(json!(9))), &HashMap::new()));
        assert_eq!(resolved.numeric_answer, Some(9));
    }

    #[test]
    fn rating_out_of_range_is_kept_as_text() {
        let resolved = answer(resolve(
            QuestionType::Rating,
            Some(&value(json!(10_000_000_000i64))),
            &HashMap::new(),
        ));
        assert_eq!(resolved.numeric_answer, None);
        assert_eq!(resolved.text_answer.as_deref(), Some("10000000000"));
    }

    #[test]
    fn single_choice_matches_exact_text() {
        let resolved = answer(resolve(QuestionType::SingleChoice, Some(&value(json!("No"))), &catalog()));
        assert_eq!(resolved.selected_option_id, Some(12));
        assert_eq!(resolved.text_answer.as_deref(), Some("No"));

        let resolved = answer(resolve(QuestionType::SingleChoice, Some(&value(json!("no"))), &catalog()));
        assert_eq!(resolved.selected_option_id, None);
        assert_eq!(resolved.text_answer.as_deref(), Some("no"));
    }

    #[test]
    fn multiple_choice_keeps_structured_selections() {
        let resolved = answer(resolve(
            QuestionType::MultipleChoice,
            Some(&value(json!(["Yes", "", "Maybe, later"]))),
            &catalog(),
        ));
        assert_eq!(resolved.selected_option_id, Some(11));
        assert_eq!(resolved.selections, vec!["Yes", "Maybe, later"]);
        assert_eq!(resolved.text_answer.as_deref(), Some("Yes, Maybe, later"));
    }

    #[test]
    fn blank_choices_are_skipped() {
        assert_eq!(resolve(QuestionType::SingleChoice, Some(&value(json!("  "))), &catalog()), Resolution::Skip);
        assert_eq!(resolve(QuestionType::MultipleChoice, Some(&value(json!([]))), &catalog()), Resolution::Skip);
        assert_eq!(resolve(QuestionType::Rating, Some(&value(json!(" "))), &catalog()), Resolution::Skip);
        assert_eq!(resolve(QuestionType::Text, None, &catalog()), Resolution::Skip);
    }

    #[test]
    fn blank_text_is_stored_as_empty() {
        let resolved = answer(resolve(QuestionType::Text, Some(&value(json!("   "))), &HashMap::new()));
        assert_eq!(resolved.text_answer.as_deref(), Some(""));
        let resolved = answer(resolve(QuestionType::Text, Some(&value(json!("  fine "))), &HashMap::new()));
        assert_eq!(resolved.text_answer.as_deref(), Some("fine"));
    }
}
