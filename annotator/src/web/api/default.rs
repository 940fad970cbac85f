use actix_web::{HttpRequest, HttpResponse, Responder};

pub async fn default_route(req: HttpRequest) -> impl Responder {
    let request_path = req.path().to_string();
    HttpResponse::NotFound().body(format!("404 Not Found: {request_path}"))
}
