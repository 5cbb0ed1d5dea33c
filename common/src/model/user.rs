use serde::{Deserialize, Serialize};

/// An editor account. Only the identity fields matter to the survey engine:
/// the owner of a survey is compared by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}
