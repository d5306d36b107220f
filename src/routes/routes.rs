//! Defines every route served by the gallery back-end.
//!
//! ## Structure
//! - **Public API** (`/api`)
//!   - `POST /api/auth/login`, `POST /api/auth/logout`, `GET /api/auth/check`
//!   - `GET  /api/paintings`, `GET /api/paintings/{id}` (id or slug)
//!   - `GET  /api/paintings/categories`
//!   - `POST /api/inquiries`, `POST /api/visits`
//!   - `GET  /api/settings/{hero-image,artist-image,favicon}`
//!   - `POST /api/migrate` (shared secret)
//!
//! - **Admin API** (session cookie, JSON 401 otherwise)
//!   - `POST/PUT/DELETE /api/paintings...`, `GET/PUT/DELETE /api/inquiries...`
//!   - `PUT  /api/auth/password`, `POST /api/settings/...`, `POST /api/upload`
//!   - `GET  /api/admin/{visits,inquiries,stats}`
//!
//! - **Static**
//!   - `GET /uploads/{name}`: stored uploads
//!   - `GET /admin/*`: admin pages behind the navigation gate
//!
//! - **Health**: `GET /healthz`, `GET /readyz`

use crate::{
    handlers::{
        admin_handlers::{dashboard_stats, inquiry_counts, migrate_categories},
        artwork_handlers::{
            category_showcase, create_painting, delete_painting, get_painting, list_paintings,
            update_painting,
        },
        auth_handlers::{change_password, check, login, logout},
        health_handlers::{healthz, readyz},
        inquiry_handlers::{delete_inquiry, list_inquiries, submit_inquiry, update_inquiry},
        settings_handlers::{
            get_artist_image, get_favicon, get_hero_image, set_artist_image, set_favicon,
            set_hero_image,
        },
        upload_handlers::{MAX_UPLOAD_BYTES, upload_file},
        visit_handlers::{record_visit, visit_stats},
    },
    middleware::admin_page_gate,
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

/// Build the full application router with its state applied.
pub fn routes(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/check", get(check))
        .route("/auth/password", put(change_password))
        .route("/paintings", get(list_paintings).post(create_painting))
        .route("/paintings/categories", get(category_showcase))
        .route(
            "/paintings/{id}",
            get(get_painting).put(update_painting).delete(delete_painting),
        )
        .route("/inquiries", get(list_inquiries).post(submit_inquiry))
        .route("/inquiries/{id}", put(update_inquiry).delete(delete_inquiry))
        .route("/settings/hero-image", get(get_hero_image).post(set_hero_image))
        .route(
            "/settings/artist-image",
            get(get_artist_image).post(set_artist_image),
        )
        .route("/settings/favicon", get(get_favicon).post(set_favicon))
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/visits", post(record_visit))
        .route("/admin/visits", get(visit_stats))
        .route("/admin/inquiries", get(inquiry_counts))
        .route("/admin/stats", get(dashboard_stats))
        .route("/migrate", post(migrate_categories));

    let admin_pages = Router::new()
        .nest_service(
            "/admin",
            ServeDir::new(&state.admin_ui_dir).append_index_html_on_directories(true),
        )
        .layer(from_fn_with_state(state.clone(), admin_page_gate));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(&state.upload_dir))
        .merge(admin_pages)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_pool, test_config};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        state: AppState,
        _dir: TempDir,
    }

    async fn app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(dir.path());
        std::fs::create_dir_all(&cfg.upload_dir).unwrap();
        std::fs::create_dir_all(dir.path().join("admin-ui/login")).unwrap();
        std::fs::write(dir.path().join("admin-ui/login/index.html"), "<h1>login</h1>").unwrap();
        std::fs::write(dir.path().join("admin-ui/index.html"), "<h1>dashboard</h1>").unwrap();

        let state = AppState::new(memory_pool().await, &cfg).unwrap();
        state.auth.seed_admin(&cfg.seed_admin).await.unwrap();
        TestApp {
            router: routes(state.clone()),
            state,
            _dir: dir,
        }
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn with_cookie(mut req: Request<Body>, cookie: &str) -> Request<Body> {
        req.headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        req
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Log in as the seeded admin and return the `name=value` cookie pair.
    async fn login_cookie(app: &TestApp) -> String {
        let resp = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                json!({ "username": "admin", "password": "Admin@123" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let set_cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn login_sets_session_cookie() {
        let app = app().await;
        let resp = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                json!({ "username": "admin", "password": "Admin@123" }),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("auth-token="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=86400"));

        let body = body_json(resp).await;
        assert_eq!(body["user"]["username"], "admin");
        assert!(body["user"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = app().await;
        let resp = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                json!({ "username": "admin", "password": "nope" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(body_json(resp).await["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn auth_check_requires_valid_cookie() {
        let app = app().await;
        let anonymous = Request::builder()
            .uri("/api/auth/check")
            .body(Body::empty())
            .unwrap();
        let resp = app.router.clone().oneshot(anonymous).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let forged = with_cookie(
            Request::builder().uri("/api/auth/check").body(Body::empty()).unwrap(),
            "auth-token=not.a.jwt",
        );
        let resp = app.router.clone().oneshot(forged).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let cookie = login_cookie(&app).await;
        let authed = with_cookie(
            Request::builder().uri("/api/auth/check").body(Body::empty()).unwrap(),
            &cookie,
        );
        let resp = app.router.clone().oneshot(authed).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["user"]["role"], "admin");
    }

    #[tokio::test]
    async fn password_change_takes_effect_on_next_login() {
        let app = app().await;
        let cookie = login_cookie(&app).await;
        let resp = app
            .router
            .clone()
            .oneshot(with_cookie(
                json_request("PUT", "/api/auth/password", json!({ "newPassword": "abc" })),
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = app
            .router
            .clone()
            .oneshot(with_cookie(
                json_request("PUT", "/api/auth/password", json!({ "newPassword": "Sunr1se!" })),
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(app.state.auth.login("admin", "Admin@123").await.is_err());
        assert!(app.state.auth.login("admin", "Sunr1se!").await.is_ok());
    }

    #[tokio::test]
    async fn logout_clears_cookie() {
        let app = app().await;
        let resp = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("auth-token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn admin_api_rejects_missing_session_with_json() {
        let app = app().await;
        for (method, uri) in [
            ("GET", "/api/inquiries"),
            ("GET", "/api/admin/stats"),
            ("GET", "/api/admin/visits"),
            ("GET", "/api/admin/inquiries"),
        ] {
            let req = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let resp = app.router.clone().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body_json(resp).await["status"], 401);
        }

        let resp = app
            .router
            .clone()
            .oneshot(json_request("POST", "/api/paintings", json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_pages_redirect_to_login() {
        let app = app().await;
        let resp = app
            .router
            .clone()
            .oneshot(Request::builder().uri("/admin/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/admin/login");

        let resp = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/admin/login/index.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = login_cookie(&app).await;
        let resp = app
            .router
            .clone()
            .oneshot(with_cookie(
                Request::builder().uri("/admin/").body(Body::empty()).unwrap(),
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn painting_validation_returns_every_detail() {
        let app = app().await;
        let cookie = login_cookie(&app).await;
        let resp = app
            .router
            .clone()
            .oneshot(with_cookie(
                json_request("POST", "/api/paintings", json!({ "title": "Untitled" })),
                &cookie,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn painting_lifecycle_over_http() {
        let app = app().await;
        let cookie = login_cookie(&app).await;
        let payload = json!({
            "title": "Lakshmi",
            "description": "Gold leaf on wood",
            "category": "tanjore-paintings",
            "imageUrl": "/uploads/lakshmi.jpg",
            "featured": true,
            "seo": { "title": "Lakshmi", "description": "Tanjore painting", "alt": "Lakshmi" }
        });
        let resp = app
            .router
            .clone()
            .oneshot(with_cookie(json_request("POST", "/api/paintings", payload), &cookie))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = body_json(resp).await;
        let slug = created["slug"].as_str().unwrap().to_string();

        let resp = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/paintings/{slug}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["views"], 1);

        let resp = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/paintings?category=tanjore-paintings&featured=true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let listed = body_json(resp).await;
        assert_eq!(listed["paintings"].as_array().unwrap().len(), 1);
        assert_eq!(listed["pagination"]["total"], 1);
        assert_eq!(listed["pagination"]["hasNext"], false);

        let resp = app
            .router
            .clone()
            .oneshot(with_cookie(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/paintings/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn inquiry_submission_is_public() {
        let app = app().await;
        let resp = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/inquiries",
                json!({ "name": "Asha", "mobile": "9845000000", "message": "Available?" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body_json(resp).await["inquiry"]["status"], "new");

        let cookie = login_cookie(&app).await;
        let resp = app
            .router
            .clone()
            .oneshot(with_cookie(
                Request::builder()
                    .uri("/api/inquiries?status=all")
                    .body(Body::empty())
                    .unwrap(),
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["pagination"]["total"], 1);

        let resp = app
            .router
            .clone()
            .oneshot(with_cookie(
                Request::builder()
                    .uri("/api/inquiries?status=archived")
                    .body(Body::empty())
                    .unwrap(),
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    async fn assert_json_bad_request(resp: Response) {
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = body_json(resp).await;
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"], "Validation failed");
        assert!(!body["details"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_input_uses_json_error_envelope() {
        let app = app().await;

        let wrong_type = json_request(
            "POST",
            "/api/inquiries",
            json!({ "name": "Asha", "mobile": 9845000000u64, "message": "hi" }),
        );
        assert_json_bad_request(app.router.clone().oneshot(wrong_type).await.unwrap()).await;

        let truncated = Request::builder()
            .method("POST")
            .uri("/api/inquiries")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name": "Asha", "mob"#))
            .unwrap();
        assert_json_bad_request(app.router.clone().oneshot(truncated).await.unwrap()).await;

        let bad_query = Request::builder()
            .uri("/api/paintings?featured=1")
            .body(Body::empty())
            .unwrap();
        assert_json_bad_request(app.router.clone().oneshot(bad_query).await.unwrap()).await;

        let no_body = Request::builder()
            .method("POST")
            .uri("/api/migrate")
            .body(Body::empty())
            .unwrap();
        assert_json_bad_request(app.router.clone().oneshot(no_body).await.unwrap()).await;

        let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inquiries")
            .fetch_one(&*app.state.db)
            .await
            .unwrap();
        assert_eq!(stored, 0);
    }

    #[tokio::test]
    async fn category_cards_are_public() {
        let app = app().await;
        app.state
            .artworks
            .create(crate::test_support::artwork_input("Lakshmi", "tanjore-paintings"))
            .await
            .unwrap();

        let resp = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/paintings/categories")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let cards = body_json(resp).await;
        assert_eq!(cards.as_array().unwrap().len(), 4);
        assert_eq!(cards[0]["key"], "tanjore-paintings");
        assert_eq!(cards[0]["countLabel"], "1 piece");
        assert_eq!(cards[0]["image"], "/uploads/lakshmi.jpg");
        assert_eq!(cards[3]["image"], "/uploads/default-sketch-painting.jpg");
    }

    #[tokio::test]
    async fn visits_use_forwarded_ip() {
        let app = app().await;
        let req = Request::builder()
            .method("POST")
            .uri("/api/visits")
            .header("x-forwarded-for", "198.51.100.4")
            .body(Body::empty())
            .unwrap();
        let resp = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["ip"], "198.51.100.4");
        assert_eq!(body["today"], 1);
    }

    #[tokio::test]
    async fn migration_requires_secret() {
        let app = app().await;
        let resp = app
            .router
            .clone()
            .oneshot(json_request("POST", "/api/migrate", json!({ "secret": "guess" })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/migrate",
                json!({ "secret": "let-me-migrate" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["updated"], 0);
    }

    #[tokio::test]
    async fn settings_read_defaults_and_require_admin_to_write() {
        let app = app().await;
        let resp = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/settings/hero-image")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["heroImageUrl"], "/uploads/default-hero.jpg");

        let update = json!({ "heroImageUrl": "/uploads/1-new.jpg" });
        let resp = app
            .router
            .clone()
            .oneshot(json_request("POST", "/api/settings/hero-image", update.clone()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let cookie = login_cookie(&app).await;
        let resp = app
            .router
            .clone()
            .oneshot(with_cookie(
                json_request("POST", "/api/settings/hero-image", update),
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            app.state.settings.get().await.unwrap().hero_image_url,
            "/uploads/1-new.jpg"
        );
    }

    #[tokio::test]
    async fn upload_stores_file_and_serves_it() {
        let app = app().await;
        let cookie = login_cookie(&app).await;
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"hero.png\"\r\n\
             Content-Type: image/png\r\n\r\npng-bytes\r\n--{boundary}--\r\n"
        );
        let req = with_cookie(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
            &cookie,
        );
        let resp = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let url = body_json(resp).await["url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/uploads/") && url.ends_with("-hero.png"));

        let resp = app
            .router
            .clone()
            .oneshot(Request::builder().uri(url.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"png-bytes");
    }

    #[tokio::test]
    async fn upload_without_file_field_is_bad_request() {
        let app = app().await;
        let cookie = login_cookie(&app).await;
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{boundary}--\r\n"
        );
        let req = with_cookie(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
            &cookie,
        );
        let resp = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn readiness_checks_database_and_uploads() {
        let app = app().await;
        let resp = app
            .router
            .clone()
            .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["checks"]["sqlite"]["ok"], true);
        assert_eq!(body["checks"]["uploads"]["ok"], true);
    }
}
