//! Structured validation failures.
//!
//! A request is checked in full before its handler runs. Every violated
//! constraint becomes one [`FieldError`]; the whole set travels as
//! [`ValidationErrors`] and is rendered as a single `422` body:
//!
//! ```json
//! {
//!   "detail": [
//!     {
//!       "type": "greater_than",
//!       "loc": ["body", "age"],
//!       "msg": "Input should be greater than 0",
//!       "input": 0,
//!       "ctx": {"gt": 0}
//!     }
//!   ]
//! }
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::{Value, json};

// ── Loc ───────────────────────────────────────────────────────────────────────

/// Where a value came from: the request source followed by field names,
/// e.g. `["body", "location", "city"]` or `["query", "age"]`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Loc(Vec<String>);

impl Loc {
    pub fn new(source: &str) -> Self {
        Self(vec![source.to_owned()])
    }

    /// A copy of this location extended by one more segment.
    pub fn child(&self, segment: &str) -> Self {
        let mut parts = self.0.clone();
        parts.push(segment.to_owned());
        Self(parts)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

// ── ErrorKind ─────────────────────────────────────────────────────────────────

/// The constraint a value failed.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    Missing,
    StringType,
    StringTooShort { min: usize },
    StringTooLong { max: usize },
    IntType,
    IntParsing,
    IntFromFloat,
    GreaterThan { gt: i64 },
    LessThanEqual { le: i64 },
    BoolType,
    BoolParsing,
    Enum { expected: &'static [&'static str] },
    /// Rejected by a custom check; carries the reason.
    Value(String),
    ModelAttributesType,
    JsonInvalid(String),
    UploadFile,
}

impl ErrorKind {
    /// Stable machine-readable code, rendered as `type`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing                => "missing",
            Self::StringType             => "string_type",
            Self::StringTooShort { .. }  => "string_too_short",
            Self::StringTooLong { .. }   => "string_too_long",
            Self::IntType                => "int_type",
            Self::IntParsing             => "int_parsing",
            Self::IntFromFloat           => "int_from_float",
            Self::GreaterThan { .. }     => "greater_than",
            Self::LessThanEqual { .. }   => "less_than_equal",
            Self::BoolType               => "bool_type",
            Self::BoolParsing            => "bool_parsing",
            Self::Enum { .. }            => "enum",
            Self::Value(_)               => "value_error",
            Self::ModelAttributesType    => "model_attributes_type",
            Self::JsonInvalid(_)         => "json_invalid",
            Self::UploadFile             => "upload_file",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Missing => "Field required".to_owned(),
            Self::StringType => "Input should be a valid string".to_owned(),
            Self::StringTooShort { min } => {
                format!("String should have at least {min} {}", plural(*min, "character"))
            }
            Self::StringTooLong { max } => {
                format!("String should have at most {max} {}", plural(*max, "character"))
            }
            Self::IntType => "Input should be a valid integer".to_owned(),
            Self::IntParsing => {
                "Input should be a valid integer, unable to parse string as an integer".to_owned()
            }
            Self::IntFromFloat => {
                "Input should be a valid integer, got a number with a fractional part".to_owned()
            }
            Self::GreaterThan { gt } => format!("Input should be greater than {gt}"),
            Self::LessThanEqual { le } => format!("Input should be less than or equal to {le}"),
            Self::BoolType => "Input should be a valid boolean".to_owned(),
            Self::BoolParsing => "Input should be a valid boolean, unable to interpret input".to_owned(),
            Self::Enum { expected } => format!("Input should be {}", expected_list(expected)),
            Self::Value(reason) => format!("Value error, {reason}"),
            Self::ModelAttributesType => {
                "Input should be a valid dictionary or object to extract fields from".to_owned()
            }
            Self::JsonInvalid(_) => "JSON decode error".to_owned(),
            Self::UploadFile => "Expected UploadFile, received a plain form field".to_owned(),
        }
    }

    /// Constraint parameters, present only for parameterized rules.
    pub fn ctx(&self) -> Option<Value> {
        match self {
            Self::StringTooShort { min } => Some(json!({ "min_length": min })),
            Self::StringTooLong { max }  => Some(json!({ "max_length": max })),
            Self::GreaterThan { gt }     => Some(json!({ "gt": gt })),
            Self::LessThanEqual { le }   => Some(json!({ "le": le })),
            Self::Enum { expected }      => Some(json!({ "expected": expected_list(expected) })),
            Self::Value(reason)          => Some(json!({ "reason": reason })),
            Self::JsonInvalid(error)     => Some(json!({ "error": error })),
            _ => None,
        }
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 { word.to_owned() } else { format!("{word}s") }
}

/// `'a', 'b' or 'c'`
fn expected_list(options: &[&str]) -> String {
    let quoted: Vec<String> = options.iter().map(|o| format!("'{o}'")).collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {last}", rest.join(", ")),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

// ── FieldError ────────────────────────────────────────────────────────────────

/// One violated constraint on one value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(skip)]
    pub kind: ErrorKind,
    #[serde(rename = "type")]
    pub code: &'static str,
    pub loc: Loc,
    pub msg: String,
    pub input: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctx: Option<Value>,
}

impl FieldError {
    pub fn new(kind: ErrorKind, loc: Loc, input: Value) -> Self {
        Self {
            code: kind.code(),
            msg: kind.message(),
            ctx: kind.ctx(),
            kind,
            loc,
            input,
        }
    }

    pub fn missing(loc: Loc) -> Self {
        Self::new(ErrorKind::Missing, loc, Value::Null)
    }
}

// ── ValidationErrors ──────────────────────────────────────────────────────────

/// Every violation found while binding one request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("{} validation error(s), first at {}", .0.len(), first_loc(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn first_loc(errors: &[FieldError]) -> String {
    errors.first().map(|e| e.loc.to_string()).unwrap_or_default()
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_type_loc_msg_input_and_ctx() {
        let err = FieldError::new(
            ErrorKind::GreaterThan { gt: 0 },
            Loc::new("body").child("age"),
            json!(0),
        );
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "type": "greater_than",
                "loc": ["body", "age"],
                "msg": "Input should be greater than 0",
                "input": 0,
                "ctx": {"gt": 0}
            })
        );
    }

    #[test]
    fn ctx_is_omitted_for_unparameterized_errors() {
        let err = FieldError::missing(Loc::new("query").child("age"));
        let rendered = serde_json::to_value(&err).unwrap();
        assert_eq!(rendered["msg"], "Field required");
        assert!(rendered.get("ctx").is_none());
    }

    #[test]
    fn enum_message_lists_every_option() {
        let kind = ErrorKind::Enum { expected: &["white", "brown", "red"] };
        assert_eq!(kind.message(), "Input should be 'white', 'brown' or 'red'");
    }

    #[test]
    fn length_messages_pluralize() {
        assert_eq!(
            ErrorKind::StringTooShort { min: 1 }.message(),
            "String should have at least 1 character"
        );
        assert_eq!(
            ErrorKind::StringTooLong { max: 50 }.message(),
            "String should have at most 50 characters"
        );
    }

    #[test]
    fn display_names_count_and_first_location() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::missing(Loc::new("body").child("email")));
        errors.push(FieldError::missing(Loc::new("body").child("age")));
        assert_eq!(errors.to_string(), "2 validation error(s), first at body.email");
    }
}
