use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Field, Kind, Model, Rule};

/// Message returned by every successful login.
pub const LOGIN_SUCCESS: &str = "Login Succesfully!";

const NAME: &[Rule] = &[Rule::MinLength(1), Rule::MaxLength(50)];

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HairColor {
    White,
    Brown,
    Black,
    Blonde,
    Red,
}

impl HairColor {
    /// Wire literals, in declaration order.
    pub const LITERALS: &'static [&'static str] = &["white", "brown", "black", "blonde", "red"];
}

// ── Location ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Model for Location {
    const FIELDS: &'static [Field] = &[
        Field::required("city", Kind::Str).rules(NAME),
        Field::required("state", Kind::Str).rules(NAME),
        Field::required("country", Kind::Str).rules(NAME),
    ];
}

// ── Person ────────────────────────────────────────────────────────────────────

#[derive(Clone, Deserialize, Eq, PartialEq, Serialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: u8,
    pub hair_color: Option<HairColor>,
    pub is_married: Option<bool>,
    pub password: String,
}

impl Model for Person {
    const FIELDS: &'static [Field] = &[
        Field::required("first_name", Kind::Str).rules(NAME),
        Field::required("last_name", Kind::Str).rules(NAME),
        Field::required("email", Kind::Str).rules(&[Rule::Email]),
        Field::required("age", Kind::Int).rules(&[Rule::Gt(0), Rule::Le(115)]),
        Field::optional("hair_color", Kind::Str).rules(&[Rule::OneOf(HairColor::LITERALS)]),
        Field::optional("is_married", Kind::Bool),
        Field::required("password", Kind::Str).rules(&[Rule::MinLength(8)]),
    ];
}

impl fmt::Debug for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Person")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("age", &self.age)
            .field("hair_color", &self.hair_color)
            .field("is_married", &self.is_married)
            .field("password", &"********")
            .finish()
    }
}

/// Outbound view of a [`Person`]: everything but the password.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PersonOut {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: u8,
    pub hair_color: Option<HairColor>,
    pub is_married: Option<bool>,
}

impl From<Person> for PersonOut {
    fn from(p: Person) -> Self {
        Self {
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            age: p.age,
            hair_color: p.hair_color,
            is_married: p.is_married,
        }
    }
}

// ── LoginOut ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LoginOut {
    pub username: String,
    pub message: String,
}

impl LoginOut {
    /// Longest username a login may carry.
    pub const MAX_USERNAME: usize = 20;

    pub fn new(username: String) -> Self {
        Self { username, message: LOGIN_SUCCESS.to_owned() }
    }
}
