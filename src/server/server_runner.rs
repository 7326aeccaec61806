use crate::notify::content::create_generator;
use crate::notify::delivery::DeliveryClient;
use crate::server::config::{read_config, HubmailConfigCors};
use crate::server::endpoints;
use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dyn_clone::clone_box;
use std::path::Path;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(endpoints::health_endpoint)
        .service(endpoints::welcome_endpoint)
        .service(endpoints::confirmation_endpoint);
}

fn build_cors(hubmail_cors: HubmailConfigCors) -> Cors {
    let mut cors = Cors::default().allow_any_header().allow_any_method();

    if hubmail_cors.origin.trim() == "*" {
        cors = cors.allow_any_origin()
    } else {
        cors = cors.allowed_origin(hubmail_cors.origin.trim());
    }

    cors
}

pub async fn run_server(config_path: &Path) -> std::io::Result<()> {
    env_logger::init();

    let hubmail_conf = read_config(config_path)
        .unwrap_or_else(|e| panic!("unable to read hubmail.toml configuration file: {e}"));
    hubmail_conf
        .validate()
        .unwrap_or_else(|e| panic!("invalid hubmail.toml configuration: {e}"));
    let generator = create_generator(&hubmail_conf.content)
        .unwrap_or_else(|e| panic!("unable to build the content generator: {e}"));
    let delivery = DeliveryClient::new(&hubmail_conf.delivery)
        .unwrap_or_else(|e| panic!("unable to build the delivery client: {e}"));

    println!(
        "Starting server {}:{}...",
        hubmail_conf.host, hubmail_conf.port
    );

    let server = HttpServer::new(move || {
        let cors = build_cors(hubmail_conf.cors.clone());

        App::new()
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .wrap(cors)
            .app_data(web::Data::new(clone_box(&*generator)))
            .app_data(web::Data::new(delivery.clone()))
            .configure(config)
    })
    .bind((hubmail_conf.host, hubmail_conf.port))?
    .run();

    server.await
}
