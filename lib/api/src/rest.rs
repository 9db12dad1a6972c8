use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use reelmatch_core::{recommend, CorpusHandle, Error, Recommendation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Deserialize)]
struct RecommendQuery {
    title: String,
    k: Option<usize>,
}

#[derive(Serialize)]
struct QueryInfo {
    index: usize,
    title: String,
    #[serde(rename = "match")]
    kind: reelmatch_core::MatchKind,
}

#[derive(Serialize)]
struct RecommendResponse {
    query: QueryInfo,
    result: Vec<Recommendation>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(corpus: Arc<CorpusHandle>, port: u16) -> std::io::Result<()> {
        info!("REST API listening on 0.0.0.0:{}", port);
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .configure(routes(corpus.clone()))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Route table, shared by the server and handler tests
pub fn routes(corpus: Arc<CorpusHandle>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(corpus))
            .route("/", web::get().to(banner))
            .route("/stats", web::get().to(stats))
            .route("/recommend", web::get().to(recommend_items));
    }
}

async fn banner() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().body(format!("reelmatch {}", env!("CARGO_PKG_VERSION"))))
}

async fn stats(corpus: web::Data<Arc<CorpusHandle>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(corpus.stats()))
}

async fn recommend_items(
    corpus: web::Data<Arc<CorpusHandle>>,
    query: web::Query<RecommendQuery>,
) -> ActixResult<HttpResponse> {
    let k = query.k.unwrap_or(corpus.config().top_k);
    if k == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "k must be at least 1"
        })));
    }

    match recommend(&corpus, &query.title, k) {
        Ok(recs) => Ok(HttpResponse::Ok().json(RecommendResponse {
            query: QueryInfo {
                index: recs.query.index,
                title: recs.query_title,
                kind: recs.query.kind,
            },
            result: recs.items,
        })),
        Err(e @ Error::NotFound(_)) => {
            warn!("{}", e);
            Ok(HttpResponse::NotFound().json(serde_json::json!({
                "error": e.to_string()
            })))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": e.to_string()
        }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use reelmatch_core::{EngineConfig, Item};

    fn corpus() -> Arc<CorpusHandle> {
        let items = vec![
            Item::new("Avatar").with_genres("Action Adventure"),
            Item::new("Avengers").with_genres("Action Adventure"),
            Item::new("Titanic").with_genres("Drama Romance"),
        ];
        Arc::new(CorpusHandle::from_items(items, EngineConfig::default()).unwrap())
    }

    #[actix_web::test]
    async fn test_recommend_endpoint() {
        let app = test::init_service(App::new().configure(routes(corpus()))).await;
        let req = test::TestRequest::get().uri("/recommend?title=avatar&k=2").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["query"]["title"], "Avatar");
        assert_eq!(body["query"]["match"], "exact");
        assert_eq!(body["result"][0]["title"], "Avengers");
        assert_eq!(body["result"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_recommend_not_found() {
        let app = test::init_service(App::new().configure(routes(corpus()))).await;
        let req = test::TestRequest::get().uri("/recommend?title=Nonexistent").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_recommend_zero_k() {
        let app = test::init_service(App::new().configure(routes(corpus()))).await;
        let req = test::TestRequest::get().uri("/recommend?title=avatar&k=0").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_stats_endpoint() {
        let app = test::init_service(App::new().configure(routes(corpus()))).await;
        let req = test::TestRequest::get().uri("/stats").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["item_count"], 3);
        assert_eq!(body["vocabulary_size"], 4);
    }
}
