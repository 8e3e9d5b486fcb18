// src/web/types.rs

use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::ContentType;
use rocket::response::{self, Responder};
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};

use crate::extraction::ResumeExtraction;

/// Multipart upload for `/parse`
#[derive(FromForm)]
pub struct ResumeUploadForm<'f> {
    pub file: TempFile<'f>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct CreateLetterRequest {
    pub text: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ParseResponse {
    pub data: ResumeExtraction,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub error_code: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, error_code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            error_code: error_code.into(),
        }
    }
}

pub struct PdfResponse {
    pub data: Vec<u8>,
}

impl PdfResponse {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl<'r> Responder<'r, 'static> for PdfResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::PDF)
            .sized_body(self.data.len(), std::io::Cursor::new(self.data))
            .ok()
    }
}
