//! Request input: the person body and the `{id}` path segment.
//!
//! Bodies are buffered whole and parsed into a [`serde_json::Value`] first, so
//! that every way a payload can be wrong (bad JSON, wrong shape, missing or
//! invalid field) ends in the same `422`.

use axum::{
  body::Bytes,
  extract::{FromRequest, FromRequestParts, Path, Request},
  http::request::Parts,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use insys_core::{PersonId, PersonInput, Sex, ValidationError};
use serde_json::Value;

use crate::error::ApiError;

// ─── Body ────────────────────────────────────────────────────────────────────

/// Parse a buffered request body as JSON.
pub fn parse_body(bytes: &[u8]) -> Result<Value, ValidationError> {
  serde_json::from_slice(bytes).map_err(|e| ValidationError::MalformedJson(e.to_string()))
}

/// Coerce an arbitrary JSON value into a [`PersonInput`].
///
/// All-or-nothing: the first problem found rejects the whole input. `null`
/// counts as missing.
pub fn parse_person_input(body: &Value) -> Result<PersonInput, ValidationError> {
  let object = body.as_object().ok_or(ValidationError::NotAnObject)?;
  let field = |name: &'static str| {
    object
      .get(name)
      .filter(|v| !v.is_null())
      .ok_or(ValidationError::MissingField(name))
  };

  let full_name = match field("fullName")? {
    Value::String(s) if !s.trim().is_empty() => s.clone(),
    _ => return Err(ValidationError::EmptyField("fullName")),
  };

  let sex: Sex = match field("sex")? {
    Value::String(s) => s.parse()?,
    other => return Err(ValidationError::UnknownSex(other.to_string())),
  };

  let birth_date = parse_birth_date(field("birthDate")?)?;

  Ok(PersonInput { full_name, sex, birth_date })
}

/// Local date-time layouts without an offset, read as UTC.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Accepts an RFC 3339 timestamp, a date-time with no offset (taken as UTC),
/// a bare `YYYY-MM-DD` date (midnight UTC), or integer milliseconds since the
/// Unix epoch.
pub fn parse_birth_date(value: &Value) -> Result<DateTime<Utc>, ValidationError> {
  let invalid = || ValidationError::InvalidBirthDate(value.to_string());
  match value {
    Value::String(s) => {
      if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
      }
      if let Some(dt) = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
      {
        return Ok(dt.and_utc());
      }
      NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| invalid())
    }
    Value::Number(n) => n
      .as_i64()
      .and_then(DateTime::from_timestamp_millis)
      .ok_or_else(invalid),
    _ => Err(invalid()),
  }
}

/// Extractor for a validated person payload.
pub struct PersonBody(pub PersonInput);

impl<S> FromRequest<S> for PersonBody
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let bytes = Bytes::from_request(req, state).await?;
    let value = parse_body(&bytes)?;
    Ok(Self(parse_person_input(&value)?))
  }
}

// ─── Path ────────────────────────────────────────────────────────────────────

/// The `{id}` segment of `/api/person/{id}`.
///
/// Never rejects: a segment that is not a valid id can only ever mean "no
/// such person", which [`PersonIdPath::id`] reports once the handler asks.
pub struct PersonIdPath {
  raw: String,
  id:  Option<PersonId>,
}

impl PersonIdPath {
  pub fn parse(raw: impl Into<String>) -> Self {
    let raw = raw.into();
    let id = raw.parse().ok();
    Self { raw, id }
  }

  pub fn id(&self) -> Result<PersonId, ApiError> {
    self
      .id
      .ok_or_else(|| ApiError::NotFound(format!("person {:?} not found", self.raw)))
  }
}

impl<S> FromRequestParts<S> for PersonIdPath
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Path(raw): Path<String> = Path::from_request_parts(parts, state)
      .await
      .map_err(|e| ApiError::NotFound(e.body_text()))?;
    Ok(Self::parse(raw))
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  fn valid() -> Value {
    json!({
      "fullName": "John Doe",
      "sex": "male",
      "birthDate": "2020-01-01T00:00:00Z",
    })
  }

  fn without(key: &str) -> Value {
    let mut v = valid();
    v.as_object_mut().unwrap().remove(key);
    v
  }

  fn with(key: &str, value: Value) -> Value {
    let mut v = valid();
    v[key] = value;
    v
  }

  #[test]
  fn accepts_complete_input() {
    let input = parse_person_input(&valid()).unwrap();
    assert_eq!(input.full_name, "John Doe");
    assert_eq!(input.sex, Sex::Male);
    assert_eq!(
      input.birth_date,
      Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    );
  }

  #[test]
  fn ignores_unknown_fields() {
    let input = parse_person_input(&with("id", json!(99))).unwrap();
    assert_eq!(input.full_name, "John Doe");
  }

  #[test]
  fn rejects_non_objects() {
    for body in [json!(null), json!([]), json!("John"), json!(42)] {
      assert_eq!(
        parse_person_input(&body),
        Err(ValidationError::NotAnObject),
        "{body}"
      );
    }
  }

  #[test]
  fn rejects_missing_or_null_fields() {
    for key in ["fullName", "sex", "birthDate"] {
      assert_eq!(
        parse_person_input(&without(key)),
        Err(ValidationError::MissingField(key))
      );
      assert_eq!(
        parse_person_input(&with(key, Value::Null)),
        Err(ValidationError::MissingField(key))
      );
    }
  }

  #[test]
  fn rejects_blank_or_non_string_name() {
    assert_eq!(
      parse_person_input(&with("fullName", json!("  "))),
      Err(ValidationError::EmptyField("fullName"))
    );
    assert_eq!(
      parse_person_input(&with("fullName", json!(12))),
      Err(ValidationError::EmptyField("fullName"))
    );
  }

  #[test]
  fn rejects_sex_outside_the_enum() {
    for sex in [json!("malformed"), json!("Female"), json!(""), json!(1)] {
      assert!(
        matches!(
          parse_person_input(&with("sex", sex.clone())),
          Err(ValidationError::UnknownSex(_))
        ),
        "{sex}"
      );
    }
  }

  #[test]
  fn birth_date_forms() {
    let midnight = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(parse_birth_date(&json!("2020-01-01T00:00:00.000Z")).unwrap(), midnight);
    assert_eq!(parse_birth_date(&json!("2020-01-01T02:00:00+02:00")).unwrap(), midnight);
    assert_eq!(parse_birth_date(&json!("2020-01-01")).unwrap(), midnight);
    assert_eq!(parse_birth_date(&json!("2020-01-01T00:00:00")).unwrap(), midnight);
    assert_eq!(parse_birth_date(&json!("2020-01-01T00:00:00.000")).unwrap(), midnight);
    assert_eq!(parse_birth_date(&json!("2020-01-01T00:00")).unwrap(), midnight);
    assert_eq!(
      parse_birth_date(&json!("2020-01-01T13:45:30.250")).unwrap(),
      Utc.with_ymd_and_hms(2020, 1, 1, 13, 45, 30).unwrap() + chrono::Duration::milliseconds(250)
    );
    assert_eq!(
      parse_birth_date(&json!(midnight.timestamp_millis())).unwrap(),
      midnight
    );
  }

  #[test]
  fn rejects_unparsable_birth_date() {
    for date in [json!("yesterday"), json!("2020-13-01"), json!("2020-01-01T25:00"), json!(true), json!({}), json!(1.5)] {
      assert!(
        matches!(parse_birth_date(&date), Err(ValidationError::InvalidBirthDate(_))),
        "{date}"
      );
    }
  }

  #[test]
  fn malformed_json_is_a_validation_error() {
    assert!(matches!(parse_body(b"{\"fullName\":"), Err(ValidationError::MalformedJson(_))));
    assert!(matches!(parse_body(b""), Err(ValidationError::MalformedJson(_))));
  }

  #[test]
  fn id_path_parses_numbers_only() {
    assert_eq!(PersonIdPath::parse("17").id().unwrap(), 17);
    assert!(matches!(PersonIdPath::parse("abc").id(), Err(ApiError::NotFound(_))));
    assert!(matches!(PersonIdPath::parse("99999999999").id(), Err(ApiError::NotFound(_))));
  }
}
