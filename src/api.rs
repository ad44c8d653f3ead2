//! # API Server Module
//!
//! ## Purpose
//! REST API server exposing the loaded Hadith collections: collection
//! listing, per-book metadata, full book dumps, flattened hadith listings,
//! section listings, per-section hadiths, and keyword search.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP GET requests with path/query parameters
//! - **Output**: Pretty-printed UTF-8 JSON; Arabic text emitted literally
//! - **Errors**: 404 with a JSON `error` field, 400 for a missing keyword
//!
//! No request path touches I/O: every handler is a bounded in-memory
//! traversal over the immutable registry.

use crate::errors::{ApiError, Result};
use crate::flatten::{flatten, hadiths_in_section, list_sections};
use crate::loader::CollectionRegistry;
use crate::normalize::{normalize, NormalizeMode};
use crate::search::search;
use crate::{adapter, AppState};
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hadith API server
pub struct ApiServer {
    app_state: AppState,
}

/// Query parameters for the search endpoints
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// One entry in the `/books` collection listing
#[derive(Debug, Serialize)]
pub struct CollectionEntry {
    pub english_name: String,
    pub arabic_name: String,
    pub link: String,
}

const NO_ARABIC_NAME: &str = "لا يوجد اسم بالعربية";

impl ApiServer {
    pub fn new(app_state: AppState) -> Self {
        Self { app_state }
    }

    /// Run the API server until the process is stopped.
    pub async fn run(self) -> Result<()> {
        let bind_addr = format!(
            "{}:{}",
            self.app_state.config.server.host, self.app_state.config.server.port
        );
        let enable_cors = self.app_state.config.server.enable_cors;

        tracing::info!("Starting API server on {}", bind_addr);

        let server = HttpServer::new(move || {
            let cors = if enable_cors {
                Cors::permissive()
            } else {
                Cors::default()
            };
            App::new()
                .wrap(cors)
                .app_data(web::Data::new(self.app_state.clone()))
                .configure(routes)
        })
        .bind(&bind_addr)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?
        .run();

        server.await.map_err(|e| ApiError::Internal {
            message: format!("Server error: {}", e),
        })?;

        Ok(())
    }
}

/// Route table, shared between the server and the handler tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home_handler))
        .route("/books", web::get().to(list_books_handler))
        .route("/books/{book}", web::get().to(book_info_handler))
        .route("/book/{book}", web::get().to(book_dump_handler))
        .route("/book/{book}/all-hadiths", web::get().to(all_hadiths_handler))
        .route("/books/{book}/sections", web::get().to(sections_handler))
        .route(
            "/books/{book}/hadiths/{section}",
            web::get().to(section_hadiths_handler),
        )
        .route("/search", web::get().to(search_handler))
        .route("/global-search", web::get().to(search_handler));
}

/// Render a value as pretty-printed JSON with an explicit UTF-8 charset,
/// so Arabic text reaches clients literally rather than `\u`-escaped.
fn json_utf8<T: Serialize>(value: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string_pretty(value)?;
    Ok(HttpResponse::Ok()
        .content_type("application/json; charset=utf-8")
        .body(body))
}

/// Resolve a collection and its content root, strict normalization.
fn resolve<'a>(
    registry: &'a CollectionRegistry,
    book: &str,
) -> Result<(&'a str, &'a serde_json::Map<String, Value>)> {
    let (key, document) = registry.get(book).ok_or_else(ApiError::book_not_found)?;
    let root = adapter::content_root(document).ok_or(ApiError::InvalidStructure)?;
    Ok((key, root))
}

fn text_field(root: &serde_json::Map<String, Value>, key: &str, default: &str) -> String {
    root.get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

async fn home_handler() -> Result<HttpResponse> {
    json_utf8(&serde_json::json!({
        "message": "Welcome to the Hadith API! Use /books to see available books."
    }))
}

async fn list_books_handler(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut collections = Vec::new();
    for (key, document) in state.registry.iter() {
        let Some(root) = adapter::content_root(document) else {
            continue;
        };
        collections.push(CollectionEntry {
            english_name: text_field(root, "english_name", key),
            arabic_name: text_field(root, "arabic_name", NO_ARABIC_NAME),
            link: text_field(root, "link", ""),
        });
    }
    json_utf8(&serde_json::json!({ "collections": collections }))
}

async fn book_info_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let (key, root) = resolve(&state.registry, &path)?;

    let about = root
        .get("books_or_chapters")
        .and_then(|v| v.get("about_info"))
        .and_then(Value::as_object);
    let about_field = |field: &str| -> String {
        about
            .and_then(|a| a.get(field))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    };

    let total_chapters = root
        .get("books_or_chapters")
        .and_then(|v| v.get("books"))
        .and_then(Value::as_array)
        .map_or(0, Vec::len);

    json_utf8(&serde_json::json!({
        "book_name": key,
        "english_name": text_field(root, "english_name", "No English Name Available"),
        "arabic_name": text_field(root, "arabic_name", "لا يوجد اسم باللغة العربية"),
        "index_tag": text_field(root, "indextag", "No Index Tag Available"),
        "link": text_field(root, "link", "No Link Available"),
        "total_chapters": total_chapters,
        "about_info": {
            "title": about
                .and_then(|a| a.get("about_title"))
                .and_then(Value::as_str)
                .unwrap_or("No About Title Available"),
            "content_english": about_field("about_content_english"),
            "content_arabic": about_field("about_content_arabic"),
        }
    }))
}

async fn book_dump_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let (_, root) = resolve(&state.registry, &path)?;
    json_utf8(root)
}

async fn all_hadiths_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let (_, document) = state.registry.get_loose(&path).ok_or_else(|| {
        ApiError::BookNotFound {
            requested: Some(normalize(&path, NormalizeMode::Loose)),
            available: Some(state.registry.loose_keys()),
        }
    })?;

    let hadiths = adapter::content_root(document).map_or_else(Vec::new, flatten);
    json_utf8(&serde_json::json!({ "hadiths": hadiths }))
}

async fn sections_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let (_, root) = resolve(&state.registry, &path)?;
    json_utf8(&serde_json::json!({ "sections": list_sections(root) }))
}

async fn section_hadiths_handler(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (book, section) = path.into_inner();
    let (key, root) = resolve(&state.registry, &book)?;
    let groups = hadiths_in_section(root, key, &section)?;
    json_utf8(&serde_json::json!({ "hadiths": groups }))
}

async fn search_handler(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse> {
    let keyword = params.q.as_deref().unwrap_or("");
    let results = search(&state.registry, keyword)?;
    json_utf8(&serde_json::json!({ "results": results }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Map};
    use std::sync::Arc;

    fn fixture_state() -> AppState {
        let mut collections = Map::new();
        collections.insert(
            "sahih-muslim".to_string(),
            json!({
                "meta": {"scraped": true},
                "Sahih Muslim": {
                    "english_name": "Sahih Muslim",
                    "arabic_name": "صحيح مسلم",
                    "link": "https://example.org/muslim",
                    "books_or_chapters": {
                        "about_info": {
                            "about_title": "About Sahih Muslim",
                            "about_content_english": "A collection.",
                            "about_content_arabic": "مجموعة"
                        },
                        "books": [{
                            "book_number": "1",
                            "english_book_name": "Faith",
                            "arabic_book_name": "كتاب الإيمان",
                            "chapters_and_hadiths": [{
                                "chapter_no": "1",
                                "hadiths": [
                                    {"reference": "1", "english_text": "Example"}
                                ]
                            }]
                        }]
                    }
                }
            }),
        );
        collections.insert(
            "sunan-ad-darimi".to_string(),
            json!({
                "meta": {},
                "Sunan ad-Darimi": {
                    "english_name": "Sunan ad-Darimi",
                    "books_or_chapters": {
                        "chapters_and_hadiths": [{
                            "chapter_no": "1",
                            "hadiths": [{"reference": "7", "english_text": "Flat entry"}]
                        }]
                    }
                }
            }),
        );

        AppState {
            config: Arc::new(Config::default()),
            registry: Arc::new(CollectionRegistry::new(collections)),
        }
    }

    macro_rules! body_json {
        ($app:expr, $uri:expr) => {{
            let req = test::TestRequest::get().uri($uri).to_request();
            let resp = test::call_service($app, req).await;
            let status = resp.status();
            let bytes = test::read_body(resp).await;
            let value: Value = serde_json::from_slice(&bytes).unwrap();
            (status, value)
        }};
    }

    macro_rules! test_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(fixture_state()))
                    .configure(routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_home() {
        let app = test_app!();
        let (status, body) = body_json!(&app, "/");
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("Hadith API"));
    }

    #[actix_web::test]
    async fn test_list_books() {
        let app = test_app!();
        let (status, body) = body_json!(&app, "/books");
        assert_eq!(status, StatusCode::OK);
        let collections = body["collections"].as_array().unwrap();
        assert_eq!(collections.len(), 2);
        assert_eq!(collections[0]["english_name"], "Sahih Muslim");
        assert_eq!(collections[0]["arabic_name"], "صحيح مسلم");
        assert_eq!(collections[1]["link"], "");
    }

    #[actix_web::test]
    async fn test_book_info() {
        let app = test_app!();
        let (status, body) = body_json!(&app, "/books/sahih-muslim");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["book_name"], "sahih-muslim");
        assert_eq!(body["total_chapters"], 1);
        assert_eq!(body["about_info"]["title"], "About Sahih Muslim");
    }

    #[actix_web::test]
    async fn test_unknown_book_is_404() {
        let app = test_app!();
        let (status, body) = body_json!(&app, "/books/unknown-book");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Book not found"}));
    }

    #[actix_web::test]
    async fn test_book_dump() {
        let app = test_app!();
        let (status, body) = body_json!(&app, "/book/sahih-muslim");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["english_name"], "Sahih Muslim");
        assert!(body["books_or_chapters"]["books"].is_array());
    }

    #[actix_web::test]
    async fn test_all_hadiths_uses_loose_lookup() {
        let app = test_app!();
        // "sunan-addarimi" only resolves once hyphens are dropped
        let (status, body) = body_json!(&app, "/book/sunan-addarimi/all-hadiths");
        assert_eq!(status, StatusCode::OK);
        let hadiths = body["hadiths"].as_array().unwrap();
        assert_eq!(hadiths.len(), 1);
        assert_eq!(hadiths[0]["reference"], "7");
        assert_eq!(hadiths[0]["book_number"], "N/A");
    }

    #[actix_web::test]
    async fn test_all_hadiths_404_lists_available_books() {
        let app = test_app!();
        let (status, body) = body_json!(&app, "/book/nope/all-hadiths");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Book not found");
        assert_eq!(body["requested_book"], "nope");
        let available = body["available_books"].as_array().unwrap();
        assert!(available.contains(&json!("sahihmuslim")));
    }

    #[actix_web::test]
    async fn test_sections_listing() {
        let app = test_app!();
        let (status, body) = body_json!(&app, "/books/sahih-muslim/sections");
        assert_eq!(status, StatusCode::OK);
        let sections = body["sections"].as_array().unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0]["english_book_name"], "Faith");
    }

    #[actix_web::test]
    async fn test_section_hadiths_end_to_end() {
        let app = test_app!();
        let (status, body) = body_json!(&app, "/books/sahih-muslim/hadiths/faith");
        assert_eq!(status, StatusCode::OK);
        let groups = body["hadiths"].as_array().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["chapter_info"]["chapter_no"], "1");
        let hadiths = groups[0]["hadiths"].as_array().unwrap();
        assert_eq!(hadiths.len(), 1);
        assert_eq!(hadiths[0]["reference"], "1");
    }

    #[actix_web::test]
    async fn test_unknown_section_is_404() {
        let app = test_app!();
        let (status, body) = body_json!(&app, "/books/sahih-muslim/hadiths/nope");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[actix_web::test]
    async fn test_search_without_keyword_is_400() {
        let app = test_app!();
        for uri in ["/search", "/search?q=", "/global-search"] {
            let (status, body) = body_json!(&app, uri);
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"error": "Keyword is required"}));
        }
    }

    #[actix_web::test]
    async fn test_search_matches_across_collections() {
        let app = test_app!();
        let (status, body) = body_json!(&app, "/search?q=example");
        assert_eq!(status, StatusCode::OK);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["book_name"], "sahih-muslim");
        assert_eq!(results[0]["reference"], "1");
    }
}
