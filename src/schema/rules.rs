//! Declarative field constraints.
//!
//! A schema is a static slice of [`Field`]s. Each field names its wire key,
//! the primitive [`Kind`] its input is coerced to, whether it is required,
//! and an ordered list of [`Rule`]s. Checking a field coerces the raw input
//! and then evaluates *every* rule, so one value can report several
//! violations and one schema reports all of its fields at once.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

use crate::validation::{ErrorKind, FieldError, Loc, ValidationErrors};

/// The primitive a field's input is coerced to before rules run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    Str,
    Int,
    Bool,
}

/// One constraint on a coerced value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rule {
    MinLength(usize),
    MaxLength(usize),
    /// Exclusive lower bound.
    Gt(i64),
    /// Inclusive upper bound.
    Le(i64),
    Email,
    OneOf(&'static [&'static str]),
}

impl Rule {
    /// Returns the violation, if any. Rules that do not apply to the value's
    /// type pass.
    pub fn check(&self, value: &Value) -> Option<ErrorKind> {
        match (self, value) {
            (Self::MinLength(min), Value::String(s)) if s.chars().count() < *min => {
                Some(ErrorKind::StringTooShort { min: *min })
            }
            (Self::MaxLength(max), Value::String(s)) if s.chars().count() > *max => {
                Some(ErrorKind::StringTooLong { max: *max })
            }
            (Self::Gt(gt), Value::Number(n)) if wide(n).is_some_and(|n| n <= i128::from(*gt)) => {
                Some(ErrorKind::GreaterThan { gt: *gt })
            }
            (Self::Le(le), Value::Number(n)) if wide(n).is_some_and(|n| n > i128::from(*le)) => {
                Some(ErrorKind::LessThanEqual { le: *le })
            }
            (Self::Email, Value::String(s)) => email_problem(s).map(|r| ErrorKind::Value(r.to_owned())),
            (Self::OneOf(options), Value::String(s)) if !options.contains(&s.as_str()) => {
                Some(ErrorKind::Enum { expected: *options })
            }
            _ => None,
        }
    }
}

/// Integer value of a JSON number across the whole `i64` and `u64` range.
fn wide(n: &Number) -> Option<i128> {
    n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from))
}

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email pattern compiles")
});

fn email_problem(s: &str) -> Option<&'static str> {
    if !s.contains('@') {
        Some("value is not a valid email address: An email address must have an @-sign.")
    } else if !EMAIL.is_match(s) || s.starts_with('.') || s.contains("..") || s.contains(".@") {
        Some("value is not a valid email address: The email address is not valid.")
    } else if s.rsplit('.').next().is_some_and(|tld| tld.bytes().all(|b| b.is_ascii_digit())) {
        Some("value is not a valid email address: The part after the @-sign is not valid. It is not within a valid top-level domain.")
    } else {
        None
    }
}

// ── Field ─────────────────────────────────────────────────────────────────────

/// A named, typed, constrained input.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
    pub rules: &'static [Rule],
}

impl Field {
    pub const fn required(name: &'static str, kind: Kind) -> Self {
        Self { name, kind, required: true, rules: &[] }
    }

    pub const fn optional(name: &'static str, kind: Kind) -> Self {
        Self { name, kind, required: false, rules: &[] }
    }

    pub const fn rules(self, rules: &'static [Rule]) -> Self {
        Self { rules, ..self }
    }

    /// Checks a JSON input. Returns the coerced value (`Null` for an unset
    /// optional field) or records every violation and returns `None`.
    pub fn check_json(
        &self,
        input: Option<&Value>,
        loc: Loc,
        errors: &mut ValidationErrors,
    ) -> Option<Value> {
        let value = match input {
            None | Some(Value::Null) if !self.required => return Some(Value::Null),
            None => {
                errors.push(FieldError::missing(loc));
                return None;
            }
            Some(value) => value,
        };
        match self.kind.coerce_json(value) {
            Ok(coerced) => self.apply(coerced, loc, errors),
            Err(kind) => {
                errors.push(FieldError::new(kind, loc, value.clone()));
                None
            }
        }
    }

    /// Checks a textual input from a path segment, query string, form,
    /// header or cookie.
    pub fn check_raw(
        &self,
        input: Option<&str>,
        loc: Loc,
        errors: &mut ValidationErrors,
    ) -> Option<Value> {
        let Some(raw) = input else {
            if self.required {
                errors.push(FieldError::missing(loc));
                return None;
            }
            return Some(Value::Null);
        };
        match self.kind.coerce_raw(raw) {
            Ok(coerced) => self.apply(coerced, loc, errors),
            Err(kind) => {
                errors.push(FieldError::new(kind, loc, Value::String(raw.to_owned())));
                None
            }
        }
    }

    fn apply(&self, value: Value, loc: Loc, errors: &mut ValidationErrors) -> Option<Value> {
        let before = errors.len();
        for rule in self.rules {
            if let Some(kind) = rule.check(&value) {
                errors.push(FieldError::new(kind, loc.clone(), value.clone()));
            }
        }
        (errors.len() == before).then_some(value)
    }
}

impl Kind {
    fn coerce_json(self, value: &Value) -> Result<Value, ErrorKind> {
        match (self, value) {
            (Self::Str, Value::String(_)) => Ok(value.clone()),
            (Self::Str, _) => Err(ErrorKind::StringType),

            (Self::Int, Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            (Self::Int, Value::Number(n)) => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Value::from(f as i64)),
                _ => Err(ErrorKind::IntFromFloat),
            },
            (Self::Int, Value::String(s)) => self.coerce_raw(s),
            (Self::Int, _) => Err(ErrorKind::IntType),

            (Self::Bool, Value::Bool(_)) => Ok(value.clone()),
            (Self::Bool, Value::Number(n)) => match n.as_i64() {
                Some(0) => Ok(Value::Bool(false)),
                Some(1) => Ok(Value::Bool(true)),
                _ => Err(ErrorKind::BoolParsing),
            },
            (Self::Bool, Value::String(s)) => self.coerce_raw(s),
            (Self::Bool, _) => Err(ErrorKind::BoolType),
        }
    }

    fn coerce_raw(self, raw: &str) -> Result<Value, ErrorKind> {
        match self {
            Self::Str => Ok(Value::String(raw.to_owned())),
            Self::Int => {
                let n: i128 = raw.trim().parse().map_err(|_| ErrorKind::IntParsing)?;
                i64::try_from(n)
                    .map(Value::from)
                    .or_else(|_| u64::try_from(n).map(Value::from))
                    .map_err(|_| ErrorKind::IntParsing)
            }
            Self::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" | "t" | "y" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "off" | "f" | "n" => Ok(Value::Bool(false)),
                _ => Err(ErrorKind::BoolParsing),
            },
        }
    }
}
