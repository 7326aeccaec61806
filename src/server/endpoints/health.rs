use crate::error::HubmailError;
use actix_web::{get, HttpResponse};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[get("/health")]
async fn health() -> Result<HttpResponse, HubmailError> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
    }))
}
