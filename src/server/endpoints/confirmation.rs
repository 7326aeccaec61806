use crate::error::HubmailError;
use crate::notify::content::ContentGenerator;
use crate::notify::delivery::DeliveryClient;
use crate::notify::notify;
use crate::notify::request::NotificationKind;
use crate::server::endpoints::NotifyParams;
use actix_web::{post, web, HttpResponse};

#[post("/v1/notify/confirmation")]
async fn confirmation(
    payload: web::Json<serde_json::Value>,
    params: web::Query<NotifyParams>,
    generator: web::Data<Box<dyn ContentGenerator>>,
    delivery: web::Data<DeliveryClient>,
) -> Result<HttpResponse, HubmailError> {
    let language = params.language()?;
    let result = notify(
        NotificationKind::Confirmation,
        &payload,
        language,
        generator.get_ref().as_ref(),
        delivery.get_ref(),
    )
    .await;
    Ok(HttpResponse::Ok().json(result))
}
