//! Aligns the persisted question tree of a survey with a submitted one.
//!
//! - `questions`: matches submitted questions to existing ones by id, deletes the
//!   ones that disappeared, renumbers everything 1..N in submission order.
//! - `options`: aligns a question's options with the submitted option texts by
//!   position, reusing rows where both lists have an entry.

pub mod options;
pub mod questions;
