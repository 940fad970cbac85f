use crate::annotation::annotator::Annotator;

pub mod annotation;
pub mod utils;
pub mod web;

#[actix_web::main]
async fn main() {
    Annotator::run().await;
    Annotator::terminate().await;
}
