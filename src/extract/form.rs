//! Form bodies: `application/x-www-form-urlencoded` and `multipart/form-data`.

use std::convert::Infallible;

use bytes::Bytes;
use tracing::warn;

use crate::error::ApiError;
use crate::request::Request;

/// A file part of a multipart body.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadFile {
    /// Size in kilobytes, rounded to two decimals with ties to even.
    pub fn size_kb(&self) -> f64 {
        (self.bytes.len() as f64 / 1024.0 * 100.0).round_ties_even() / 100.0
    }
}

/// A decoded form: text fields and file parts, each in arrival order.
#[derive(Debug, Default)]
pub struct FormData {
    fields: Vec<(String, String)>,
    files: Vec<(String, UploadFile)>,
}

impl FormData {
    /// Decodes the body according to its media type. Any other media type
    /// yields an empty form, so every declared field reports as missing.
    pub async fn read(req: &Request) -> Result<Self, ApiError> {
        match req.media_type().as_deref() {
            Some("application/x-www-form-urlencoded") => Ok(Self::urlencoded(req.body())),
            Some("multipart/form-data") => {
                let content_type = req.content_type().unwrap_or_default();
                Self::multipart(content_type, req.body().clone()).await
            }
            _ => Ok(Self::default()),
        }
    }

    fn urlencoded(body: &[u8]) -> Self {
        let fields = url::form_urlencoded::parse(body).into_owned().collect();
        Self { fields, files: Vec::new() }
    }

    async fn multipart(content_type: &str, body: Bytes) -> Result<Self, ApiError> {
        let boundary = multer::parse_boundary(content_type).map_err(malformed)?;
        let stream = futures::stream::once(async move { Ok::<Bytes, Infallible>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);

        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_owned) else { continue };
            let filename = field.file_name().map(str::to_owned);
            let content_type = field.content_type().map(|m| m.to_string());
            let bytes = field.bytes().await.map_err(malformed)?;
            match filename {
                Some(filename) => form.files.push((name, UploadFile { filename, content_type, bytes })),
                None => form.fields.push((name, String::from_utf8_lossy(&bytes).into_owned())),
            }
        }
        Ok(form)
    }

    /// Text value of a field; the last occurrence wins.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().rev().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn file(&self, name: &str) -> Option<&UploadFile> {
        self.files.iter().rev().find(|(k, _)| k == name).map(|(_, f)| f)
    }
}

fn malformed(e: multer::Error) -> ApiError {
    warn!("multipart body rejected: {e}");
    ApiError::MalformedBody(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::request::fixture;

    const BOUNDARY: &str = "XBOUNDARYX";

    fn multipart_body() -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n\
                 --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"cat.png\"\r\n\
                 Content-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&[0u8; 2048]);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    #[tokio::test]
    async fn urlencoded_fields_are_decoded() {
        let req = fixture(
            Method::Post,
            "/login",
            &[("content-type", "application/x-www-form-urlencoded")],
            b"username=arturo&password=p%40ss+word",
        );
        let form = FormData::read(&req).await.unwrap();
        assert_eq!(form.field("username"), Some("arturo"));
        assert_eq!(form.field("password"), Some("p@ss word"));
        assert!(form.file("username").is_none());
    }

    #[tokio::test]
    async fn multipart_separates_fields_and_files() {
        let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
        let req = fixture(Method::Post, "/post-image", &[("content-type", &content_type)], &multipart_body());
        let form = FormData::read(&req).await.unwrap();

        assert_eq!(form.field("note"), Some("hello"));
        let image = form.file("image").unwrap();
        assert_eq!(image.filename, "cat.png");
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
        assert_eq!(image.bytes.len(), 2048);
        assert_eq!(image.size_kb(), 2.0);
    }

    #[tokio::test]
    async fn multipart_without_boundary_is_malformed() {
        let req = fixture(Method::Post, "/post-image", &[("content-type", "multipart/form-data")], b"x");
        let err = FormData::read(&req).await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn other_media_types_yield_an_empty_form() {
        let req = fixture(Method::Post, "/login", &[("content-type", "application/json")], b"{}");
        let form = FormData::read(&req).await.unwrap();
        assert!(form.field("username").is_none());
    }

    #[test]
    fn size_is_rounded_to_two_decimals() {
        let file = |n: usize| UploadFile {
            filename: "f".into(),
            content_type: None,
            bytes: Bytes::from(vec![0u8; n]),
        };
        assert_eq!(file(0).size_kb(), 0.0);
        assert_eq!(file(1000).size_kb(), 0.98);
        assert_eq!(file(1536).size_kb(), 1.5);
    }

    #[test]
    fn exact_ties_round_to_the_even_hundredth() {
        let file = |n: usize| UploadFile {
            filename: "f".into(),
            content_type: None,
            bytes: Bytes::from(vec![0u8; n]),
        };
        assert_eq!(file(128).size_kb(), 0.12);
        assert_eq!(file(640).size_kb(), 0.62);
        assert_eq!(file(1152).size_kb(), 1.12);
    }
}
