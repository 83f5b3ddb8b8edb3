//! `POST /post-image` — multipart upload summary.

use serde::Serialize;

use crate::{ApiError, Extract, Json, Request};

#[derive(Debug, Serialize)]
pub struct ImageInfo {
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "Format")]
    pub format: Option<String>,
    #[serde(rename = "Size(kb)")]
    pub size_kb: f64,
}

pub async fn post_image(req: Request) -> Result<Json<ImageInfo>, ApiError> {
    let mut ex = Extract::new(&req);
    let Some(image) = ex.file("image").await? else {
        return Err(ex.reject());
    };
    Ok(Json(ImageInfo {
        size_kb: image.size_kb(),
        filename: image.filename,
        format: image.content_type,
    }))
}
