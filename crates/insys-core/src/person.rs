//! Person: the single entity managed by the registry.
//!
//! A person is identified by a store-assigned integer id. Everything else
//! about it (`full_name`, `sex`, `birth_date`) is replaced wholesale on update.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Store-assigned identifier; maps to a Postgres `serial` column.
pub type PersonId = i32;

// ─── Sex ─────────────────────────────────────────────────────────────────────

/// The closed set of values accepted for [`Person::sex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
  Male,
  Female,
}

impl Sex {
  pub fn as_str(self) -> &'static str {
    match self {
      Sex::Male => "male",
      Sex::Female => "female",
    }
  }
}

impl fmt::Display for Sex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Sex {
  type Err = ValidationError;

  /// Exact, case-sensitive match on the two literals.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "male" => Ok(Sex::Male),
      "female" => Ok(Sex::Female),
      other => Err(ValidationError::UnknownSex(other.to_owned())),
    }
  }
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// The mutable fields of a person, as accepted by create and update.
///
/// Always fully populated; partial input is rejected before one of these is
/// built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonInput {
  pub full_name:  String,
  pub sex:        Sex,
  #[serde(with = "iso_millis")]
  pub birth_date: DateTime<Utc>,
}

// ─── Stored entity ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  pub id:         PersonId,
  pub full_name:  String,
  pub sex:        Sex,
  #[serde(with = "iso_millis")]
  pub birth_date: DateTime<Utc>,
}

impl Person {
  pub fn from_input(id: PersonId, input: PersonInput) -> Self {
    Person {
      id,
      full_name: input.full_name,
      sex: input.sex,
      birth_date: input.birth_date,
    }
  }

  /// The mutable part of this person.
  pub fn to_input(&self) -> PersonInput {
    PersonInput {
      full_name:  self.full_name.clone(),
      sex:        self.sex,
      birth_date: self.birth_date,
    }
  }
}

/// Timestamps go over the wire as `2020-01-01T00:00:00.000Z`.
mod iso_millis {
  use chrono::{DateTime, SecondsFormat, Utc};
  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(
    dt: &DateTime<Utc>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<DateTime<Utc>, D::Error> {
    DateTime::<Utc>::deserialize(deserializer)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  fn john() -> Person {
    Person {
      id:         7,
      full_name:  "John Doe".into(),
      sex:        Sex::Male,
      birth_date: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
    }
  }

  #[test]
  fn person_serializes_with_camel_case_keys() {
    let value = serde_json::to_value(john()).unwrap();
    assert_eq!(
      value,
      json!({
        "id": 7,
        "fullName": "John Doe",
        "sex": "male",
        "birthDate": "2020-01-01T00:00:00.000Z",
      })
    );
  }

  #[test]
  fn person_deserializes_from_wire_shape() {
    let person: Person = serde_json::from_value(json!({
      "id": 7,
      "fullName": "John Doe",
      "sex": "male",
      "birthDate": "2020-01-01T00:00:00Z",
    }))
    .unwrap();
    assert_eq!(person, john());
  }

  #[test]
  fn sex_parses_only_exact_literals() {
    assert_eq!("male".parse::<Sex>().unwrap(), Sex::Male);
    assert_eq!("female".parse::<Sex>().unwrap(), Sex::Female);
    assert_eq!(
      "Male".parse::<Sex>(),
      Err(ValidationError::UnknownSex("Male".into()))
    );
    assert!("malformed".parse::<Sex>().is_err());
  }

  #[test]
  fn input_round_trips_through_person() {
    let person = john();
    let rebuilt = Person::from_input(person.id, person.to_input());
    assert_eq!(rebuilt, person);
  }
}
