use crate::error::ServiceError;
use crate::storage::answer_options;
use common::model::question::AnswerOption;
use log::debug;
use rusqlite::Connection;

/// What happens to one position of the new option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSlot {
    /// The existing row at the same position keeps its id and takes the new text.
    Reuse {
        id: i64,
        text: String,
        order_number: u32,
    },
    Create {
        text: String,
        order_number: u32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionPlan {
    /// One slot per submitted text, in submission order.
    pub slots: Vec<OptionSlot>,
    /// Existing rows beyond the end of the submitted list.
    pub deletions: Vec<i64>,
}

/// Pairs `existing[i]` with `new_texts[i]`.
///
/// Matching is by position only, never by text or id: reordering or removing a
/// middle option hands that row's identity to whatever text now sits at its
/// position.
pub fn plan(existing: &[AnswerOption], new_texts: &[String]) -> OptionPlan {
    let slots = new_texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let order_number = i as u32 + 1;
            match existing.get(i) {
                Some(option) => OptionSlot::Reuse {
                    id: option.id,
                    text: text.clone(),
                    order_number,
                },
                None => OptionSlot::Create {
                    text: text.clone(),
                    order_number,
                },
            }
        })
        .collect();
    let deletions = existing
        .iter()
        .skip(new_texts.len())
        .map(|option| option.id)
        .collect();
    OptionPlan { slots, deletions }
}

/// Applies `plan` to the options of `question_id` and returns the resulting
/// ordered option list.
pub fn apply(conn: &Connection, question_id: i64, plan: OptionPlan) -> Result<Vec<AnswerOption>, ServiceError> {
    for id in &plan.deletions {
        answer_options::delete(conn, *id)?;
    }

    let mut options = Vec::with_capacity(plan.slots.len());
    for slot in plan.slots {
        let option = match slot {
            OptionSlot::Reuse {
                id,
                text,
                order_number,
            } => {
                answer_options::update(conn, id, &text, order_number)?;
                AnswerOption {
                    id,
                    question_id,
                    text,
                    order_number,
                }
            }
            OptionSlot::Create { text, order_number } => {
                let id = answer_options::insert(conn, question_id, &text, order_number)?;
                AnswerOption {
                    id,
                    question_id,
                    text,
                    order_number,
                }
            }
        };
        options.push(option);
    }
    Ok(options)
}

/// Replaces the options of `question_id` with `new_texts`, reusing existing
/// rows by position.
pub fn reconcile_options(
    conn: &Connection,
    question_id: i64,
    existing: &[AnswerOption],
    new_texts: &[String],
) -> Result<Vec<AnswerOption>, ServiceError> {
    let plan = plan(existing, new_texts);
    debug!(
        "Question {}: {} options kept or created, {} deleted",
        question_id,
        plan.slots.len(),
        plan.deletions.len()
    );
    apply(conn, question_id, plan)
}
