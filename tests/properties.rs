//! Property tests over the validation and endpoint contracts.

use bytes::Bytes;
use proptest::prelude::*;
use serde_json::{Value, json};

use personae::Response;
use personae::routes::router;
use personae::schema::{HairColor, Model, Person};
use personae::validation::{Loc, ValidationErrors};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().build().unwrap()
}

fn send(method: &str, uri: &str, content_type: &str, body: Vec<u8>) -> Response {
    let req = http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", content_type)
        .body(Bytes::from(body))
        .unwrap();
    runtime().block_on(router().handle(req))
}

fn person_with(key: &str, value: Value) -> Value {
    let mut person = json!({
        "first_name": "Arturo",
        "last_name": "Juarez",
        "email": "jusart.92@gmail.com",
        "age": 25,
        "password": "supersecret"
    });
    person[key] = value;
    person
}

fn validate(input: &Value) -> Result<Person, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    Person::from_json(Some(input), &Loc::new("body"), &mut errors).ok_or(errors)
}

proptest! {
    #[test]
    fn age_is_valid_iff_in_range(age in -1000i64..1000) {
        let valid = validate(&person_with("age", json!(age))).is_ok();
        prop_assert_eq!(valid, 0 < age && age <= 115);
    }

    #[test]
    fn hair_color_accepts_only_the_five_literals(color in "[a-zA-Z]{0,8}") {
        let valid = validate(&person_with("hair_color", json!(color.clone()))).is_ok();
        prop_assert_eq!(valid, HairColor::LITERALS.contains(&color.as_str()));
    }

    #[test]
    fn created_person_never_carries_password(password in "[ -~]{8,40}") {
        let body = serde_json::to_vec(&person_with("password", json!(password))).unwrap();
        let res = send("POST", "/person/new", "application/json", body);
        prop_assert_eq!(res.status_code(), 201);
        let out: Value = serde_json::from_slice(res.body()).unwrap();
        prop_assert!(out.get("password").is_none());
    }

    #[test]
    fn person_lookup_follows_the_fixed_list(id in 1u64..1000) {
        let res = send("GET", &format!("/person/detail/{id}"), "text/plain", Vec::new());
        let expected = if (1..=5).contains(&id) { 200 } else { 404 };
        prop_assert_eq!(res.status_code(), expected);
    }

    #[test]
    fn login_echoes_username_never_password(
        username in "[a-z0-9]{1,20}",
        password in "[a-zA-Z0-9]{8,32}",
    ) {
        let form = format!("username={username}&password={password}");
        let res = send("POST", "/login", "application/x-www-form-urlencoded", form.into_bytes());
        prop_assert_eq!(res.status_code(), 200);
        let out: Value = serde_json::from_slice(res.body()).unwrap();
        prop_assert_eq!(out, json!({ "username": username, "message": "Login Succesfully!" }));
    }

    #[test]
    fn upload_size_is_kilobytes_to_two_decimals(len in 0usize..20_000) {
        let boundary = "prop-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"a.bin\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend(std::iter::repeat_n(b'z', len));
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let res = send("POST", "/post-image", &format!("multipart/form-data; boundary={boundary}"), body);
        prop_assert_eq!(res.status_code(), 200);
        let out: Value = serde_json::from_slice(res.body()).unwrap();
        let size = out["Size(kb)"].as_f64().unwrap();
        let (mut hundredths, rest) = (len * 100 / 1024, len * 100 % 1024);
        if 2 * rest > 1024 || (2 * rest == 1024 && hundredths % 2 == 1) {
            hundredths += 1;
        }
        prop_assert_eq!(size, hundredths as f64 / 100.0);
        prop_assert_eq!(&out["Filename"], "a.bin");
        prop_assert_eq!(&out["Format"], "application/octet-stream");
    }
}
