pub mod client;
pub mod question;
pub mod survey;
pub mod user;
