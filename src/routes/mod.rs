//! The person API.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET  | `/` | [`home`] |
//! | POST | `/person/new` | [`person::create_person`] |
//! | GET  | `/person/detail` | [`person::show_person`] |
//! | GET  | `/person/detail/{person_id}` | [`person::show_person_by_id`] |
//! | PUT  | `/person/{person_id}` | [`person::update_person`] |
//! | POST | `/login` | [`auth::login`] |
//! | POST | `/contact` | [`contact::contact`] |
//! | POST | `/post-image` | [`upload::post_image`] |
//! | GET  | `/healthz`, `/readyz` | [`health`](crate::health) |

pub mod auth;
pub mod contact;
pub mod person;
pub mod upload;

use serde_json::{Value, json};

use crate::{Json, Request, Router, health};

/// Every route the service answers.
pub fn router() -> Router {
    Router::new()
        .get("/", home)
        .post("/person/new", person::create_person)
        .get("/person/detail", person::show_person)
        .get("/person/detail/{person_id}", person::show_person_by_id)
        .put("/person/{person_id}", person::update_person)
        .post("/login", auth::login)
        .post("/contact", contact::contact)
        .post("/post-image", upload::post_image)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
}

pub async fn home(_req: Request) -> Json<Value> {
    Json(json!({ "message": "Hello World!" }))
}
