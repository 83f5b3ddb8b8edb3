//! Person endpoints.

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::schema::{Field, Kind, Location, Person, PersonOut, Rule};
use crate::{ApiError, Extract, Json, Request, Status};

/// Ids the service answers for; fixed for the life of the process.
pub const KNOWN_PERSON_IDS: [u64; 5] = [1, 2, 3, 4, 5];

pub const PERSON_NOT_FOUND: &str = "¡This person doesn't exist!";

const PERSON_ID: Field = Field::required("person_id", Kind::Int).rules(&[Rule::Gt(0)]);
const NAME: Field = Field::optional("name", Kind::Str).rules(&[Rule::MinLength(1), Rule::MaxLength(50)]);
const AGE: Field = Field::required("age", Kind::Str);

/// `POST /person/new` — the validated person, password excluded.
pub async fn create_person(req: Request) -> Result<(Status, Json<PersonOut>), ApiError> {
    let mut ex = Extract::new(&req);
    let Some(person) = ex.body::<Person>() else {
        return Err(ex.reject());
    };
    Ok((Status::Created, Json(PersonOut::from(person))))
}

/// `GET /person/detail?name=&age=` — echoes both.
pub async fn show_person(req: Request) -> Result<Json<Value>, ApiError> {
    let mut ex = Extract::new(&req);
    let name = ex.query::<Option<String>>(&NAME);
    let age = ex.query::<String>(&AGE);
    let (Some(name), Some(age)) = (name, age) else {
        return Err(ex.reject());
    };
    Ok(Json(json!({ "name": name, "age": age })))
}

/// `GET /person/detail/{person_id}` — `{"<id>": "It exist!"}` for a known id.
pub async fn show_person_by_id(req: Request) -> Result<Json<Map<String, Value>>, ApiError> {
    let mut ex = Extract::new(&req);
    let Some(person_id) = ex.path::<u64>(&PERSON_ID) else {
        return Err(ex.reject());
    };
    if !KNOWN_PERSON_IDS.contains(&person_id) {
        debug!(person_id, "unknown person");
        return Err(ApiError::NotFound(PERSON_NOT_FOUND.to_owned()));
    }
    let mut body = Map::new();
    body.insert(person_id.to_string(), Value::from("It exist!"));
    Ok(Json(body))
}

/// `PUT /person/{person_id}` — `person` and `location` merged into one object.
pub async fn update_person(req: Request) -> Result<Json<Map<String, Value>>, ApiError> {
    let mut ex = Extract::new(&req);
    let person_id = ex.path::<u64>(&PERSON_ID);
    let person = ex.embedded::<Person>("person");
    let location = ex.embedded::<Location>("location");
    let (Some(person_id), Some(person), Some(location)) = (person_id, person, location) else {
        return Err(ex.reject());
    };
    debug!(person_id, "updating person");
    Ok(Json(merge(&person, &location)?))
}

/// Flattens both records into one object; location keys win on collision.
fn merge(person: &Person, location: &Location) -> Result<Map<String, Value>, ApiError> {
    let mut merged = as_object(person)?;
    merged.extend(as_object(location)?);
    Ok(merged)
}

fn as_object<T: serde::Serialize>(value: &T) -> Result<Map<String, Value>, ApiError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(ApiError::Internal("record did not serialize to an object".to_owned())),
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::HairColor;

    #[test]
    fn merge_is_the_union_of_both_records() {
        let person = Person {
            first_name: "Arturo".into(),
            last_name: "Juarez".into(),
            email: "jusart.92@gmail.com".into(),
            age: 25,
            hair_color: Some(HairColor::Black),
            is_married: None,
            password: "supersecret".into(),
        };
        let location = Location { city: "Guadalajara".into(), state: "Jalisco".into(), country: "Mexico".into() };

        let merged = merge(&person, &location).unwrap();
        let mut keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "age", "city", "country", "email", "first_name", "hair_color",
                "is_married", "last_name", "password", "state",
            ]
        );
        assert_eq!(merged["hair_color"], "black");
        assert_eq!(merged["is_married"], Value::Null);
    }
}
