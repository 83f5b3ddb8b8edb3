//! `POST /contact` — form fields plus an optional header and cookie.

use tracing::debug;

use crate::schema::{Field, Kind, Rule};
use crate::{ApiError, Extract, Json, Request};

const SHORT_NAME: &[Rule] = &[Rule::MinLength(1), Rule::MaxLength(20)];

const FIRST_NAME: Field = Field::required("first_name", Kind::Str).rules(SHORT_NAME);
const LAST_NAME: Field = Field::required("last_name", Kind::Str).rules(SHORT_NAME);
const EMAIL: Field = Field::required("email", Kind::Str).rules(&[Rule::Email]);
const MESSAGE: Field = Field::required("message", Kind::Str).rules(&[Rule::MinLength(20)]);
const USER_AGENT: Field = Field::optional("user-agent", Kind::Str);
const ADS: Field = Field::optional("ads", Kind::Str);

/// Answers with the caller's `user-agent` header, `null` when absent.
pub async fn contact(req: Request) -> Result<Json<Option<String>>, ApiError> {
    let mut ex = Extract::new(&req);
    let first_name = ex.form::<String>(&FIRST_NAME).await?;
    let last_name = ex.form::<String>(&LAST_NAME).await?;
    let email = ex.form::<String>(&EMAIL).await?;
    let message = ex.form::<String>(&MESSAGE).await?;
    let user_agent = ex.header::<Option<String>>(&USER_AGENT);
    let ads = ex.cookie::<Option<String>>(&ADS);

    let (Some(first_name), Some(_), Some(email), Some(_), Some(user_agent), Some(ads)) =
        (first_name, last_name, email, message, user_agent, ads)
    else {
        return Err(ex.reject());
    };
    debug!(%first_name, %email, ads = ?ads, "contact message received");
    Ok(Json(user_agent))
}
