//! Binding request inputs to typed, validated values.
//!
//! A handler opens an [`Extract`] over its request and asks for each input
//! from its source: path, query, header, cookie, JSON body, form or file.
//! Every call returns `Some(value)` or records its violations and returns
//! `None`; nothing short-circuits, so one rejected request lists every
//! problem. Once all inputs are requested, a handler with any `None`
//! answers with [`Extract::reject`]:
//!
//! ```rust,ignore
//! let mut ex = Extract::new(&req);
//! let person_id = ex.path::<u64>(&PERSON_ID);
//! let person = ex.embedded::<Person>("person");
//! let (Some(person_id), Some(person)) = (person_id, person) else {
//!     return Err(ex.reject());
//! };
//! ```

mod form;

pub use form::{FormData, UploadFile};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::request::Request;
use crate::schema::{Field, Model};
use crate::validation::{ErrorKind, FieldError, Loc, ValidationErrors};

/// Per-request binding context.
pub struct Extract<'r> {
    req: &'r Request,
    errors: ValidationErrors,
    json: Option<JsonBody>,
    form: Option<FormData>,
}

enum JsonBody {
    Empty,
    Parsed(Value),
    Invalid { error: String, reported: bool },
}

impl JsonBody {
    fn parse(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::Empty;
        }
        match serde_json::from_slice(body) {
            Ok(value) => Self::Parsed(value),
            Err(e) => Self::Invalid { error: e.to_string(), reported: false },
        }
    }
}

impl<'r> Extract<'r> {
    pub fn new(req: &'r Request) -> Self {
        Self { req, errors: ValidationErrors::new(), json: None, form: None }
    }

    /// A `{placeholder}` segment of the matched route.
    pub fn path<T: DeserializeOwned>(&mut self, field: &Field) -> Option<T> {
        let raw = self.req.param(field.name);
        self.raw("path", field, raw)
    }

    pub fn query<T: DeserializeOwned>(&mut self, field: &Field) -> Option<T> {
        let raw = self.req.query(field.name);
        self.raw("query", field, raw.as_deref())
    }

    /// `field.name` is the wire header name, e.g. `user-agent`.
    pub fn header<T: DeserializeOwned>(&mut self, field: &Field) -> Option<T> {
        let raw = self.req.header(field.name);
        self.raw("header", field, raw)
    }

    pub fn cookie<T: DeserializeOwned>(&mut self, field: &Field) -> Option<T> {
        let raw = self.req.cookie(field.name);
        self.raw("cookie", field, raw)
    }

    /// The whole JSON body as one model; field errors sit at `["body", field]`.
    pub fn body<M: Model>(&mut self) -> Option<M> {
        let loc = Loc::new("body");
        let input = self.json_input(&loc)?;
        M::from_json(input.as_ref(), &loc, &mut self.errors)
    }

    /// One model read from key `name` of the JSON body, for endpoints that
    /// take several models at once; errors sit at `["body", name, field]`.
    pub fn embedded<M: Model>(&mut self, name: &str) -> Option<M> {
        let body = Loc::new("body");
        let input = self.json_input(&body)?;
        let loc = body.child(name);
        match input {
            Some(Value::Object(mut object)) => M::from_json(object.remove(name).as_ref(), &loc, &mut self.errors),
            None => M::from_json(None, &loc, &mut self.errors),
            Some(other) => {
                self.errors.push(FieldError::new(ErrorKind::ModelAttributesType, body, other));
                None
            }
        }
    }

    /// A text field of a urlencoded or multipart form.
    pub async fn form<T: DeserializeOwned>(&mut self, field: &Field) -> Result<Option<T>, ApiError> {
        let form = self.form_data().await?;
        let raw = form.field(field.name).map(str::to_owned);
        Ok(self.raw("body", field, raw.as_deref()))
    }

    /// A required file part of a multipart form.
    pub async fn file(&mut self, name: &str) -> Result<Option<UploadFile>, ApiError> {
        let form = self.form_data().await?;
        let loc = Loc::new("body").child(name);
        if let Some(file) = form.file(name) {
            return Ok(Some(file.clone()));
        }
        let error = match form.field(name) {
            Some(text) => FieldError::new(ErrorKind::UploadFile, loc, Value::String(text.to_owned())),
            None => FieldError::missing(loc),
        };
        self.errors.push(error);
        Ok(None)
    }

    /// Consumes the context into the accumulated validation failure.
    pub fn reject(self) -> ApiError {
        ApiError::Validation(self.errors)
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    fn raw<T: DeserializeOwned>(&mut self, source: &str, field: &Field, raw: Option<&str>) -> Option<T> {
        let loc = Loc::new(source).child(field.name);
        let value = field.check_raw(raw, loc.clone(), &mut self.errors)?;
        self.decode(value, loc)
    }

    fn decode<T: DeserializeOwned>(&mut self, value: Value, loc: Loc) -> Option<T> {
        match serde_json::from_value(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                self.errors.push(FieldError::new(ErrorKind::Value(e.to_string()), loc, value));
                None
            }
        }
    }

    /// The parsed JSON body: `Some(None)` when empty, `None` when it is not
    /// JSON (reported once, however many models read it).
    fn json_input(&mut self, loc: &Loc) -> Option<Option<Value>> {
        let req = self.req;
        match self.json.get_or_insert_with(|| JsonBody::parse(req.body())) {
            JsonBody::Empty => Some(None),
            JsonBody::Parsed(value) => Some(Some(value.clone())),
            JsonBody::Invalid { error, reported } => {
                if !*reported {
                    *reported = true;
                    let input = Value::String(String::from_utf8_lossy(req.body()).into_owned());
                    self.errors.push(FieldError::new(ErrorKind::JsonInvalid(error.clone()), loc.clone(), input));
                }
                None
            }
        }
    }

    async fn form_data(&mut self) -> Result<&FormData, ApiError> {
        if self.form.is_none() {
            self.form = Some(FormData::read(self.req).await?);
        }
        Ok(self.form.get_or_insert_with(FormData::default))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::method::Method;
    use crate::request::fixture;
    use crate::schema::{Kind, Location, Rule};

    const ID: Field = Field::required("person_id", Kind::Int).rules(&[Rule::Gt(0)]);
    const NAME: Field = Field::optional("name", Kind::Str).rules(&[Rule::MinLength(1)]);

    fn codes(ex: &Extract<'_>) -> Vec<(String, &'static str)> {
        ex.errors().iter().map(|e| (e.loc.to_string(), e.code)).collect()
    }

    #[test]
    fn path_and_query_errors_accumulate() {
        let mut req = fixture(Method::Get, "/x?name=", &[], b"");
        req.params.insert("person_id".into(), "0".into());
        let mut ex = Extract::new(&req);

        assert_eq!(ex.path::<u64>(&ID), None);
        assert_eq!(ex.query::<Option<String>>(&NAME), None);
        assert_eq!(
            codes(&ex),
            vec![
                ("path.person_id".into(), "greater_than"),
                ("query.name".into(), "string_too_short"),
            ]
        );
    }

    #[test]
    fn absent_optional_query_is_unset() {
        let req = fixture(Method::Get, "/x", &[], b"");
        let mut ex = Extract::new(&req);
        assert_eq!(ex.query::<Option<String>>(&NAME), Some(None));
        assert!(ex.errors().is_empty());
    }

    #[test]
    fn invalid_json_is_reported_once() {
        let req = fixture(Method::Put, "/x", &[], b"{not json");
        let mut ex = Extract::new(&req);
        assert!(ex.embedded::<Location>("location").is_none());
        assert!(ex.embedded::<Location>("other").is_none());
        assert_eq!(codes(&ex), vec![("body".into(), "json_invalid")]);
    }

    #[test]
    fn embedded_models_are_located_under_their_key() {
        let body = serde_json::to_vec(&json!({"location": {"city": "", "state": "Jalisco"}})).unwrap();
        let req = fixture(Method::Put, "/x", &[], &body);
        let mut ex = Extract::new(&req);
        assert!(ex.embedded::<Location>("location").is_none());
        assert!(ex.embedded::<Location>("home").is_none());
        assert_eq!(
            codes(&ex),
            vec![
                ("body.location.city".into(), "string_too_short"),
                ("body.location.country".into(), "missing"),
                ("body.home".into(), "missing"),
            ]
        );
    }

    #[test]
    fn empty_body_reports_the_model_missing() {
        let req = fixture(Method::Post, "/x", &[], b"");
        let mut ex = Extract::new(&req);
        assert!(ex.body::<Location>().is_none());
        assert_eq!(codes(&ex), vec![("body".into(), "missing")]);
    }

    #[tokio::test]
    async fn plain_field_in_place_of_a_file() {
        let req = fixture(
            Method::Post,
            "/x",
            &[("content-type", "application/x-www-form-urlencoded")],
            b"image=cat.png",
        );
        let mut ex = Extract::new(&req);
        assert!(ex.file("image").await.unwrap().is_none());
        assert!(ex.file("other").await.unwrap().is_none());
        assert_eq!(
            codes(&ex),
            vec![("body.image".into(), "upload_file"), ("body.other".into(), "missing")]
        );
    }
}
