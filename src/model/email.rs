use lazy_regex::regex_is_match;
use serde::Serialize;

use super::{ModelError, ModelResult};

/// Validated Subscriber Email
///
/// Accepts `local-part@domain.tld` where the local part is made of `[a-zA-Z0-9_.+-]`,
/// and the domain has at least one dot-separated label. No whitespace anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ValidEmail(String);

impl ValidEmail {
    pub const MAX_LEN: usize = 254;

    pub fn parse<S>(value: S) -> ModelResult<Self>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if Self::is_valid(value) {
            Ok(ValidEmail(value.to_owned()))
        } else {
            Err(ModelError::InvalidEmail(value.to_owned()))
        }
    }

    /// Checks the candidate against the fixed email pattern.
    ///
    /// The email doubles as a file name in the store, so it is also capped at `MAX_LEN` bytes.
    pub fn is_valid(candidate: &str) -> bool {
        candidate.len() <= Self::MAX_LEN
            && regex_is_match!(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$", candidate)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ValidEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
