use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer, Responder};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;

mod ai_search;
mod assistant;
mod catalog;
mod logging;
mod utils;

#[derive(Debug, Deserialize)]
struct RecommendRequest {
    query: String,
}

#[derive(Debug, Deserialize)]
struct AiSearchRequest {
    query: String,
    location: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    expected_format: serde_json::Value,
}

fn recommend_format_hint() -> serde_json::Value {
    serde_json::json!({ "query": "something spicy and cheap" })
}

fn ai_search_format_hint() -> serde_json::Value {
    serde_json::json!({ "query": "late night biryani", "location": "New Delhi, India" })
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "message": "Server is running"
    }))
}

async fn greeting() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "greeting": assistant::greeting() }))
}

async fn recommend(body: web::Bytes) -> impl Responder {
    let request_id = chrono::Utc::now().format("%Y%m%d%H%M%S%f").to_string();
    info!("Request {}: recommendation request received", request_id);
    debug!(
        "Request {}: raw body: {}",
        request_id,
        String::from_utf8_lossy(&body)
    );

    let req = match serde_json::from_slice::<RecommendRequest>(&body) {
        Ok(req) => req,
        Err(e) => {
            let error_msg = format!("Invalid request format: {}", e);
            error!("Request {}: {}", request_id, error_msg);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: error_msg,
                expected_format: recommend_format_hint(),
            });
        }
    };

    if req.query.trim().is_empty() {
        error!("Request {}: empty query", request_id);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Query must not be empty".to_string(),
            expected_format: recommend_format_hint(),
        });
    }

    let result = assistant::recommend(&req.query);
    info!(
        "Request {}: returning {} recommendations",
        request_id,
        result.restaurants.len()
    );
    HttpResponse::Ok().json(result)
}

async fn surprise() -> impl Responder {
    HttpResponse::Ok().json(assistant::surprise())
}

async fn restaurants(filter: web::Query<catalog::CatalogFilter>) -> impl Responder {
    let matches = catalog::filter_restaurants(&filter);
    HttpResponse::Ok().json(serde_json::json!({
        "count": matches.len(),
        "restaurants": matches,
    }))
}

async fn search_restaurants(body: web::Bytes, client: web::Data<Client>) -> impl Responder {
    let request_id = chrono::Utc::now().format("%Y%m%d%H%M%S%f").to_string();
    info!("Request {}: AI search request received", request_id);

    let req = match serde_json::from_slice::<AiSearchRequest>(&body) {
        Ok(req) => req,
        Err(e) => {
            let error_msg = format!("Invalid request format: {}", e);
            error!("Request {}: {}", request_id, error_msg);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: error_msg,
                expected_format: ai_search_format_hint(),
            });
        }
    };

    match ai_search::search_restaurants(&client, &req.query, req.location.as_deref()).await {
        Ok(results) => {
            info!(
                "Request {}: AI search returned {} restaurants",
                request_id,
                results.len()
            );
            HttpResponse::Ok().json(serde_json::json!({ "restaurants": results }))
        }
        Err(e) => {
            error!("Request {}: AI search failed: {}", request_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to search restaurants: {}", e),
                expected_format: ai_search_format_hint(),
            })
        }
    }
}

fn log_environment_variables() {
    let mut env_vars = std::collections::HashMap::new();
    for (key, value) in env::vars() {
        if key == "OPENAI_API_KEY" {
            env_vars.insert(key, utils::mask_api_key(&value));
        } else if key.to_uppercase().contains("KEY") {
            env_vars.insert(key, "*".repeat(8));
        } else {
            env_vars.insert(key, value);
        }
    }
    match serde_json::to_string_pretty(&env_vars) {
        Ok(rendered) => info!("Environment variables: {}", rendered),
        Err(e) => error!("Failed to render environment variables: {}", e),
    }
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/greeting", web::get().to(greeting))
        .route("/recommend", web::post().to(recommend))
        .route("/surprise", web::get().to(surprise))
        .route("/restaurants", web::get().to(restaurants))
        .route("/search_restaurants", web::post().to(search_restaurants));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    if let Err(e) = logging::setup_logging() {
        eprintln!("Failed to set up logging: {}", e);
        return Ok(());
    }

    log_environment_variables();

    let client = Client::new();

    info!(
        "Starting SmartDine server with {} restaurants in catalog",
        catalog::RESTAURANTS.len()
    );

    HttpServer::new(move || {
        let governor_config = GovernorConfigBuilder::default()
            .per_second(5)
            .burst_size(10)
            .finish()
            .unwrap();

        App::new()
            .wrap(Logger::default())
            .wrap(Governor::new(&governor_config))
            .app_data(web::Data::new(client.clone()))
            .configure(routes)
    })
    .bind("0.0.0.0:9999")?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn health_endpoint_reports_healthy() {
        let app = test::init_service(App::new().configure(routes)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn recommend_returns_ranked_restaurants() {
        let app = test::init_service(App::new().configure(routes)).await;
        let req = test::TestRequest::post()
            .uri("/recommend")
            .set_json(serde_json::json!({ "query": "cheap spicy street food" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let restaurants = body["restaurants"].as_array().unwrap();
        assert_eq!(restaurants.len(), 3);
        assert!(body["explanation"].as_str().unwrap().contains("Try"));
    }

    #[actix_web::test]
    async fn recommend_rejects_malformed_body() {
        let app = test::init_service(App::new().configure(routes)).await;
        let req = test::TestRequest::post()
            .uri("/recommend")
            .set_payload("not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn recommend_rejects_empty_query() {
        let app = test::init_service(App::new().configure(routes)).await;
        let req = test::TestRequest::post()
            .uri("/recommend")
            .set_json(serde_json::json!({ "query": "   " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn restaurants_endpoint_filters_by_price() {
        let app = test::init_service(App::new().configure(routes)).await;
        let req = test::TestRequest::get()
            .uri("/restaurants?price=1&veg=true")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let listed = body["restaurants"].as_array().unwrap();
        assert_eq!(body["count"].as_u64().unwrap() as usize, listed.len());
        for r in listed {
            assert_eq!(r["priceRange"], 1);
            assert_eq!(r["isVeg"], true);
        }
    }

    #[actix_web::test]
    async fn surprise_endpoint_returns_single_pick() {
        let app = test::init_service(App::new().configure(routes)).await;
        let req = test::TestRequest::get().uri("/surprise").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["restaurants"].as_array().unwrap().len(), 1);
    }
}
