//! Schemas: typed records plus the rule-sets that admit them.
//!
//! A [`Model`] pairs a serde type with a static list of [`Field`]s. Input is
//! checked against the fields first, collecting every violation; only a
//! clean, coerced object is handed to serde to build the typed value.

mod person;
mod rules;

pub use person::{HairColor, Location, LoginOut, Person, PersonOut, LOGIN_SUCCESS};
pub use rules::{Field, Kind, Rule};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::validation::{ErrorKind, FieldError, Loc, ValidationErrors};

/// A record validated field-by-field from JSON.
pub trait Model: DeserializeOwned {
    /// The record's fields in declaration order.
    const FIELDS: &'static [Field];

    /// Validates `input` located at `loc`.
    ///
    /// Returns `None` after recording at least one error in `errors`;
    /// unknown keys in `input` are ignored.
    fn from_json(input: Option<&Value>, loc: &Loc, errors: &mut ValidationErrors) -> Option<Self> {
        let object = match input {
            Some(Value::Object(object)) => object,
            None => {
                errors.push(FieldError::missing(loc.clone()));
                return None;
            }
            Some(other) => {
                errors.push(FieldError::new(ErrorKind::ModelAttributesType, loc.clone(), other.clone()));
                return None;
            }
        };

        let before = errors.len();
        let mut clean = Map::new();
        for field in Self::FIELDS {
            if let Some(value) = field.check_json(object.get(field.name), loc.child(field.name), errors) {
                clean.insert(field.name.to_owned(), value);
            }
        }
        if errors.len() > before {
            return None;
        }

        match serde_json::from_value(Value::Object(clean)) {
            Ok(model) => Some(model),
            Err(e) => {
                errors.push(FieldError::new(
                    ErrorKind::Value(e.to_string()),
                    loc.clone(),
                    Value::Object(object.clone()),
                ));
                None
            }
        }
    }
}
