//! The `Subscriber` value object, its builder and the JSON record it travels as.
//!
//! On the wire (request bodies, response bodies and the files in the store) a subscriber is:
//! ```json
//! {
//!   "email": "jonh@gmail.com",
//!   "firstName": "Jonh",
//!   "gender": "male",
//!   "birthDay": "2000-12-25",
//!   "consent": "true",
//!   "newsletterId": "fdsavdsasdsda"
//! }
//! ```
//! An absent first name is written as `"none"` and the consent flag is string encoded.

use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize};
use strum_macros::AsRefStr;

use super::{ModelError, ModelResult, ValidEmail};

const BIRTH_DAY_FORMAT: &str = "%Y-%m-%d";
const ABSENT: &str = "none";

// ###################################
// ->   STRUCTS
// ###################################
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, AsRefStr)]
pub enum Gender {
    #[strum(serialize = "male")]
    Male,
    #[strum(serialize = "female")]
    Female,
    /// The subscriber doesn't want to share their gender.
    #[default]
    #[strum(serialize = "none")]
    Unspecified,
}

/// Validated, immutable Subscriber.
///
/// Identity (`PartialEq`, `Hash`) only covers `email`, `birth_day`, `consent` and `newsletter_id`,
/// the first name and gender are informational.
#[derive(Debug, Clone)]
pub struct Subscriber {
    email: ValidEmail,
    first_name: Option<String>,
    gender: Gender,
    birth_day: NaiveDate,
    consent: bool,
    newsletter_id: String,
}

/// Accumulates the fields of a `Subscriber`, `build` validates them.
#[derive(Debug, Clone, Default)]
pub struct SubscriberBuilder {
    email: Option<String>,
    first_name: Option<String>,
    gender: Gender,
    birth_day: Option<NaiveDate>,
    consent: bool,
    newsletter_id: Option<String>,
}

/// Deserializable Subscriber
/// A subscriber record as received, every field may be missing or invalid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeserSubscriber {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub gender: Option<String>,
    pub birth_day: Option<String>,
    pub consent: Option<ConsentField>,
    pub newsletter_id: Option<String>,
}

/// Consent is string encoded on the wire, a plain JSON boolean is accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ConsentField {
    Flag(bool),
    Text(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SerSubscriber<'a> {
    email: &'a str,
    first_name: &'a str,
    gender: &'a str,
    birth_day: String,
    consent: &'static str,
    newsletter_id: &'a str,
}

// ###################################
// ->   IMPLS
// ###################################
impl Gender {
    /// Unknown values fall back to `Gender::Unspecified`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Unspecified,
        }
    }
}

impl Subscriber {
    pub fn builder() -> SubscriberBuilder {
        SubscriberBuilder::default()
    }

    // —> getters
    pub fn email(&self) -> &ValidEmail {
        &self.email
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn birth_day(&self) -> NaiveDate {
        self.birth_day
    }

    pub fn consent(&self) -> bool {
        self.consent
    }

    pub fn newsletter_id(&self) -> &str {
        &self.newsletter_id
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl SubscriberBuilder {
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn birth_day(mut self, birth_day: NaiveDate) -> Self {
        self.birth_day = Some(birth_day);
        self
    }

    pub fn consent(mut self, consent: bool) -> Self {
        self.consent = consent;
        self
    }

    pub fn newsletter_id(mut self, newsletter_id: impl Into<String>) -> Self {
        self.newsletter_id = Some(newsletter_id.into());
        self
    }

    pub fn build(self) -> ModelResult<Subscriber> {
        let email = self.email.ok_or(ModelError::MissingField("email"))?;
        let email = ValidEmail::parse(email)?;
        let birth_day = self.birth_day.ok_or(ModelError::MissingField("birthDay"))?;
        let newsletter_id = self
            .newsletter_id
            .ok_or(ModelError::MissingField("newsletterId"))?;

        Ok(Subscriber {
            email,
            first_name: self.first_name,
            gender: self.gender,
            birth_day,
            consent: self.consent,
            newsletter_id,
        })
    }
}

impl ConsentField {
    pub fn as_bool(&self) -> bool {
        match self {
            ConsentField::Flag(flag) => *flag,
            ConsentField::Text(text) => text.eq_ignore_ascii_case("true"),
        }
    }
}

impl PartialEq for Subscriber {
    fn eq(&self, other: &Self) -> bool {
        self.email == other.email
            && self.birth_day == other.birth_day
            && self.consent == other.consent
            && self.newsletter_id == other.newsletter_id
    }
}

impl Eq for Subscriber {}

impl Hash for Subscriber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.email.hash(state);
        self.birth_day.hash(state);
        self.consent.hash(state);
        self.newsletter_id.hash(state);
    }
}

impl std::fmt::Display for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Subscriber{{email='{}', firstName={}, gender={}, birthDay={}, consent={}, newsletterId='{}'}}",
            self.email,
            self.first_name().unwrap_or(ABSENT),
            self.gender.as_ref(),
            self.birth_day.format(BIRTH_DAY_FORMAT),
            self.consent,
            self.newsletter_id
        )
    }
}

impl Serialize for Subscriber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        SerSubscriber {
            email: self.email.as_ref(),
            first_name: self.first_name().unwrap_or(ABSENT),
            gender: self.gender.as_ref(),
            birth_day: self.birth_day.format(BIRTH_DAY_FORMAT).to_string(),
            consent: if self.consent { "true" } else { "false" },
            newsletter_id: &self.newsletter_id,
        }
        .serialize(serializer)
    }
}

// ###################################
// ->   TRY FROMs
// ###################################
impl TryFrom<DeserSubscriber> for Subscriber {
    type Error = ModelError;

    /// Every field has to be present in the record, only then are the values validated.
    fn try_from(record: DeserSubscriber) -> Result<Self, Self::Error> {
        let email = record.email.ok_or(ModelError::MissingField("email"))?;
        let first_name = record
            .first_name
            .ok_or(ModelError::MissingField("firstName"))?;
        let gender = record.gender.ok_or(ModelError::MissingField("gender"))?;
        let birth_day = record
            .birth_day
            .ok_or(ModelError::MissingField("birthDay"))?;
        let consent = record.consent.ok_or(ModelError::MissingField("consent"))?;
        let newsletter_id = record
            .newsletter_id
            .ok_or(ModelError::MissingField("newsletterId"))?;

        // chrono takes unpadded months and days, the record format doesn't.
        if !regex_is_match!(r"^\d{4}-\d{2}-\d{2}$", &birth_day) {
            return Err(ModelError::InvalidBirthDay(birth_day));
        }
        let birth_day = NaiveDate::parse_from_str(&birth_day, BIRTH_DAY_FORMAT)
            .map_err(|_| ModelError::InvalidBirthDay(birth_day))?;

        let mut builder = Subscriber::builder()
            .email(email)
            .gender(Gender::parse_lenient(&gender))
            .birth_day(birth_day)
            .consent(consent.as_bool())
            .newsletter_id(newsletter_id);
        // "none" is how an absent first name is written out.
        if !first_name.eq_ignore_ascii_case(ABSENT) {
            builder = builder.first_name(first_name);
        }

        builder.build()
    }
}
