use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// A stub HTTP API listening on an ephemeral local port. It records every
/// JSON request body it receives and answers each request with a fixed
/// status and response body.
pub struct StubApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl StubApi {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

pub async fn spawn_stub_api(status: u16, response: Value) -> StubApi {
    let requests: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();
    let server = HttpServer::new(move || {
        let recorded = recorded.clone();
        let response = response.clone();
        App::new().default_service(web::route().to(move |payload: web::Json<Value>| {
            recorded.lock().unwrap().push(payload.into_inner());
            let response = response.clone();
            async move {
                HttpResponse::build(StatusCode::from_u16(status).expect("invalid stub status"))
                    .json(response)
            }
        }))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("unable to bind the stub API server");
    let port = server.addrs()[0].port();
    actix_web::rt::spawn(server.run());

    StubApi {
        base_url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}
