//! `POST /login` — a stub: any well-formed credentials succeed.

use crate::schema::{Field, Kind, LoginOut, Rule};
use crate::{ApiError, Extract, Json, Request};

const USERNAME: Field =
    Field::required("username", Kind::Str).rules(&[Rule::MaxLength(LoginOut::MAX_USERNAME)]);
const PASSWORD: Field = Field::required("password", Kind::Str).rules(&[Rule::MinLength(8)]);

pub async fn login(req: Request) -> Result<Json<LoginOut>, ApiError> {
    let mut ex = Extract::new(&req);
    let username = ex.form::<String>(&USERNAME).await?;
    let password = ex.form::<String>(&PASSWORD).await?;
    let (Some(username), Some(_password)) = (username, password) else {
        return Err(ex.reject());
    };
    Ok(Json(LoginOut::new(username)))
}
