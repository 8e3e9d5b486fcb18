// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::environment::EnvironmentConfig;
use crate::gemini::GeminiClient;
use anyhow::Result;
use rocket::data::{ByteUnit, Limits};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

/// CORS fairing restricted to the configured origin allow-list.
/// Allowed origins get every method and header; anything else gets no
/// CORS headers at all.
pub struct Cors {
    allowed_origins: Vec<String>,
}

impl Cors {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers for allow-listed origins",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let origin = match request.headers().get_one("Origin") {
            Some(origin) => origin,
            None => return,
        };

        if !self.allowed_origins.iter().any(|o| o == origin) {
            return;
        }

        response.set_header(Header::new(
            "Access-Control-Allow-Origin",
            origin.to_string(),
        ));
        response.set_header(Header::new("Access-Control-Allow-Methods", "*"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

// Routes

#[post("/parse", data = "<upload>")]
pub async fn parse_resume(
    upload: Form<ResumeUploadForm<'_>>,
    gemini: &State<GeminiClient>,
) -> Result<Json<ParseResponse>, Custom<Json<ErrorBody>>> {
    handlers::parse_resume_handler(upload, gemini).await
}

#[post("/create", data = "<request>")]
pub async fn create_letter(
    request: Json<CreateLetterRequest>,
) -> Result<PdfResponse, Custom<Json<ErrorBody>>> {
    handlers::create_letter_handler(request).await
}

#[get("/health")]
pub async fn health() -> Json<&'static str> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers

#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorBody> {
    Json(ErrorBody::new("Invalid request format", "BAD_REQUEST"))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<ErrorBody> {
    Json(ErrorBody::new("Resource not found", "NOT_FOUND"))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<ErrorBody> {
    Json(ErrorBody::new(
        "Request body could not be parsed",
        "BAD_REQUEST",
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorBody> {
    Json(ErrorBody::new("Internal server error", "INTERNAL_ERROR"))
}

/// Assemble the rocket instance. Kept separate from `start_web_server` so
/// tests can drive it with the local client and a stubbed model endpoint.
pub fn build_rocket(config: EnvironmentConfig, gemini: GeminiClient) -> Rocket<Build> {
    // resumes routinely run to a few megabytes; the stock 1 MiB file limit
    // would reject them before the handler sees the upload
    let limits = Limits::default()
        .limit("file", ByteUnit::Mebibyte(10))
        .limit("data-form", ByteUnit::Mebibyte(12));
    let figment = rocket::Config::figment().merge(("limits", limits));

    rocket::custom(figment)
        .attach(Cors::new(config.allowed_origins))
        .manage(gemini)
        .register(
            "/",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .mount("/", routes![parse_resume, create_letter, health, options])
}

/// Main server start function
pub async fn start_web_server(config: EnvironmentConfig, gemini: GeminiClient) -> Result<()> {
    info!("Starting cvlens API server");
    info!("Model: {}", config.gemini_model);
    info!("Allowed origins: {}", config.allowed_origins.join(", "));

    let _rocket = build_rocket(config, gemini).launch().await;

    Ok(())
}
