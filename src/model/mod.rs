//! The subscriber domain: the email validator and the `Subscriber` value object.

mod email;
mod subscriber;

pub use email::ValidEmail;
pub use subscriber::{ConsentField, DeserSubscriber, Gender, Subscriber, SubscriberBuilder};

// ###################################
// ->   ERROR
// ###################################
pub type ModelResult<T> = core::result::Result<T, ModelError>;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("email invalid: {0}")]
    InvalidEmail(String),
    #[error("birth day is not a YYYY-MM-DD date: {0}")]
    InvalidBirthDay(String),
}
