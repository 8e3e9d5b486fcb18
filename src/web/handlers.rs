// src/web/handlers.rs

use rocket::form::Form;
use rocket::http::{ContentType, Status};
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::gemini::GeminiClient;
use crate::web::types::*;
use crate::{letter, repair};

fn is_allowed_upload(content_type: &ContentType) -> bool {
    content_type.is_pdf()
        || content_type.is_plain()
        || content_type
            .to_string()
            .contains("vnd.openxmlformats-officedocument.wordprocessingml.document")
}

fn server_error(error: String, error_code: &str) -> Custom<Json<ErrorBody>> {
    Custom(
        Status::InternalServerError,
        Json(ErrorBody::new(error, error_code)),
    )
}

pub async fn parse_resume_handler(
    mut upload: Form<ResumeUploadForm<'_>>,
    gemini: &State<GeminiClient>,
) -> Result<Json<ParseResponse>, Custom<Json<ErrorBody>>> {
    // content-type allow-list check happens before anything leaves the process
    let content_type = match upload.file.content_type() {
        Some(ct) if is_allowed_upload(ct) => ct.clone(),
        declared => {
            let received = declared
                .map(|ct| ct.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            info!("Rejected upload with content type: {}", received);
            return Err(Custom(
                Status::BadRequest,
                Json(ErrorBody::new(
                    "File must be a PDF, docx or text file",
                    "INVALID_FORMAT",
                )),
            ));
        }
    };
    let mime_type = format!("{}/{}", content_type.top(), content_type.sub());

    let temp_path = std::env::temp_dir().join(format!("resume_upload_{}", uuid::Uuid::new_v4()));
    if let Err(e) = upload.file.persist_to(&temp_path).await {
        error!("Failed to save uploaded file: {}", e);
        return Err(server_error(
            format!("Error processing resume: {}", e),
            "UPLOAD_ERROR",
        ));
    }

    let document = tokio::fs::read(&temp_path).await;
    let _ = tokio::fs::remove_file(&temp_path).await;
    let document = match document {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to read uploaded file: {}", e);
            return Err(server_error(
                format!("Error processing resume: {}", e),
                "UPLOAD_ERROR",
            ));
        }
    };

    let raw = match gemini.extract_resume(&document, &mime_type).await {
        Ok(text) => text,
        Err(e) => {
            error!("Model call failed: {:#}", e);
            return Err(server_error(
                format!("Error processing resume: {:#}", e),
                "PARSE_ERROR",
            ));
        }
    };

    match repair::decode_extraction(&raw) {
        Ok(record) => {
            info!("Resume parsed, mime_type: {}", mime_type);
            Ok(Json(ParseResponse { data: record }))
        }
        Err(e) => {
            error!("Failed to decode model output: {:#}", e);
            Err(server_error(
                format!("Error processing resume: {:#}", e),
                "PARSE_ERROR",
            ))
        }
    }
}

pub async fn create_letter_handler(
    request: Json<CreateLetterRequest>,
) -> Result<PdfResponse, Custom<Json<ErrorBody>>> {
    match letter::render_cover_letter(&request.text) {
        Ok(bytes) => Ok(PdfResponse::new(bytes)),
        Err(e) => {
            error!("Cover letter rendering failed: {:#}", e);
            Err(server_error(
                format!("Error creating PDF: {:#}", e),
                "RENDER_ERROR",
            ))
        }
    }
}

pub async fn health_handler() -> Json<&'static str> {
    Json("OK")
}
