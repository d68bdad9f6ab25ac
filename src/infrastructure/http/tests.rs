//! 端到端路由测试：真实 Router + 临时数据目录

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use serde_json::{json, Value};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

use crate::application::bundle::encode_image_data;
use crate::config::AppConfig;
use crate::infrastructure::adapters::{FileImageStorage, ImageOptimizer, ImageOptimizerConfig};
use crate::infrastructure::http::server::{build_router, ServerConfig};
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::memory::InMemorySessionManager;
use crate::infrastructure::persistence::json::{JsonResponseRepository, JsonSurveyRepository};

struct TestApp {
    router: Router,
    dir: TempDir,
}

struct Reply {
    status: StatusCode,
    body: Value,
    set_cookie: Option<String>,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        Self::in_dir(dir, adjust).await
    }

    async fn in_dir(dir: TempDir, adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = AppConfig::default();
        config.storage.data_dir = dir.path().to_path_buf();
        adjust(&mut config);

        let storage = FileImageStorage::new(config.storage.images_dir()).await.unwrap();
        let state = AppState::new(
            &config,
            Arc::new(JsonSurveyRepository::new(config.storage.surveys_file())),
            Arc::new(JsonResponseRepository::new(config.storage.responses_file())),
            Arc::new(storage),
            Arc::new(ImageOptimizer::new(ImageOptimizerConfig {
                item_max_width: config.images.item_max_width,
                hero_max_width: config.images.hero_max_width,
            })),
            Arc::new(InMemorySessionManager::new()),
        );
        let router = build_router(&ServerConfig::from(&config), Arc::new(state));

        Self { router, dir }
    }

    fn image_path(&self, name: &str) -> PathBuf {
        self.dir.path().join("images").join(name)
    }

    fn data_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>, cookie: Option<&str>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        Reply {
            status,
            body,
            set_cookie,
        }
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Reply {
        self.send(Method::GET, uri, None, cookie).await
    }

    async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> Reply {
        self.send(Method::POST, uri, Some(body), cookie).await
    }

    async fn login(&self) -> String {
        let reply = self.post("/api/admin/login", json!({"password": "admin123"}), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        reply.set_cookie.expect("session cookie")
    }

    async fn create(&self, cookie: &str, body: Value) -> String {
        let reply = self.post("/api/admin/surveys", body, Some(cookie)).await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        assert_eq!(reply.body["success"], true);
        reply.body["survey_id"].as_str().unwrap().to_string()
    }
}

fn png(width: u32, height: u32) -> String {
    let img = RgbaImage::from_pixel(width, height, Rgba([10, 120, 200, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    encode_image_data(&out.into_inner())
}

fn lunch_survey() -> Value {
    json!({
        "title_en": "Lunch", "title_sv": "Lunch",
        "description_en": "Rate today", "description_sv": "Betygsätt idag",
        "questions": [
            {
                "id": "q1", "text_en": "Main", "text_sv": "Huvudrätt", "selection_mode": "single",
                "items": [
                    {"id": "1", "text_en": "Fish", "text_sv": "Fisk", "imageData": png(1600, 800)},
                    {"id": "2", "text_en": "Meat", "text_sv": "Kött", "imageData": png(40, 40)}
                ]
            },
            {
                "id": "q2", "text_en": "Sides", "text_sv": "Tillbehör", "selection_mode": "multiple",
                "items": [
                    {"id": "1", "text_en": "Salad", "text_sv": "Sallad"},
                    {"id": "2", "text_en": "Bread", "text_sv": "Bröd"}
                ]
            }
        ]
    })
}

fn exists(path: &Path) -> bool {
    path.exists()
}

#[tokio::test]
async fn test_health_and_kiosk_config() {
    let app = TestApp::new().await;

    let health = app.get("/api/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");

    let config = app.get("/api/config", None).await;
    assert_eq!(
        config.body,
        json!({"appName": "Zuptalo", "thankYouCountdown": 5, "inactivityTimeout": 30})
    );
}

#[tokio::test]
async fn test_admin_gate_login_and_logout() {
    let app = TestApp::new().await;

    let denied = app.post("/api/admin/surveys", lunch_survey(), None).await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
    assert_eq!(denied.body, json!({"error": "Unauthorized"}));

    let wrong = app.post("/api/admin/login", json!({"password": "nope"}), None).await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body, json!({"error": "Invalid password"}));

    let cookie = app.login().await;
    assert_eq!(app.get("/api/admin/status", Some(&cookie)).await.body["authenticated"], true);
    app.create(&cookie, lunch_survey()).await;

    let logout = app.post("/api/admin/logout", json!({}), Some(&cookie)).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(app.get("/api/admin/status", Some(&cookie)).await.body["authenticated"], false);
    let after = app.get("/api/admin/surveys/1/results", Some(&cookie)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_regenerates_session() {
    let app = TestApp::new().await;
    let first = app.login().await;

    let reply = app
        .post("/api/admin/login", json!({"password": "admin123"}), Some(&first))
        .await;
    let second = reply.set_cookie.unwrap();
    assert_ne!(first, second);

    assert_eq!(app.get("/api/admin/surveys/export", Some(&first)).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.get("/api/admin/surveys/export", Some(&second)).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_forged_cookie_is_rejected() {
    let app = TestApp::new().await;
    let reply = app.get("/api/admin/surveys/export", Some("kiosk.sid=made-up")).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_processes_images() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    let id = app.create(&cookie, lunch_survey()).await;
    assert_eq!(id, "1");

    let survey = app.get("/api/surveys/1", None).await.body;
    assert_eq!(survey["questions"][0]["items"][0]["image"], "1_q1_1.webp");
    assert!(survey["questions"][1]["items"][0].get("image").map_or(true, Value::is_null));
    assert_eq!(survey["first_response_at"], Value::Null);

    let stored = image::open(app.image_path("1_q1_1.webp")).unwrap();
    assert_eq!((stored.width(), stored.height()), (800, 400));
    assert!(exists(&app.image_path("1_q1_2.webp")));

    let list = app.get("/api/surveys", None).await.body;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_payloads() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let bad_image = app
        .post(
            "/api/admin/surveys",
            json!({"title_en": "x", "title_sv": "x", "items": [{"text": "a", "imageData": "bm90IGFuIGltYWdl"}]}),
            Some(&cookie),
        )
        .await;
    assert_eq!(bad_image.status, StatusCode::BAD_REQUEST);

    let bad_id = app
        .post(
            "/api/admin/surveys",
            json!({"title_en": "x", "title_sv": "x", "questions": [{"id": "../q", "items": [{"text": "a"}]}]}),
            Some(&cookie),
        )
        .await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);

    // 校验失败时不产生任何记录
    assert_eq!(app.get("/api/surveys", None).await.body, json!([]));
}

#[tokio::test]
async fn test_submit_and_results() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    app.create(&cookie, lunch_survey()).await;

    for (main, sides) in [("1", vec!["1", "2"]), ("1", vec!["2"]), ("2", vec![])] {
        let reply = app
            .post(
                "/api/surveys/1/submit",
                json!({"responses": [
                    {"question_id": "q1", "selected_items": [main]},
                    {"question_id": "q2", "selected_items": sides}
                ]}),
                None,
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({"success": true}));
    }

    let survey = app.get("/api/surveys/1", None).await.body;
    assert!(survey["first_response_at"].is_string());

    let results = app.get("/api/admin/surveys/1/results", Some(&cookie)).await;
    assert_eq!(results.status, StatusCode::OK);
    let stats = &results.body["stats"];
    assert_eq!(stats["total_responses"], 3);
    assert_eq!(stats["avg_selections"], 2.0);

    let main = &stats["questions"][0];
    assert_eq!(main["item_stats"][0]["id"], "1");
    assert_eq!(main["item_stats"][0]["count"], 2);
    assert_eq!(main["item_stats"][0]["percentage"], 66.7);
    assert_eq!(main["item_stats"][1]["percentage"], 33.3);

    let sides = &stats["questions"][1];
    assert_eq!(sides["answered"], 2);
    assert_eq!(sides["most_selected"][0]["id"], "2");

    // 再提交一次，只影响对应选项
    app.post("/api/surveys/1/submit", json!({"responses": [{"question_id": "q2", "selected_items": ["1"]}]}), None)
        .await;
    let stats = app.get("/api/admin/surveys/1/results", Some(&cookie)).await.body["stats"].clone();
    assert_eq!(stats["questions"][1]["item_stats"][0]["count"], 2);
    assert_eq!(stats["questions"][1]["item_stats"][1]["count"], 2);
    assert_eq!(stats["questions"][1]["most_selected"].as_array().unwrap().len(), 2);
    assert_eq!(stats["questions"][0]["item_stats"][0]["count"], 2);
}

#[tokio::test]
async fn test_submit_rejections() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    app.create(&cookie, lunch_survey()).await;

    let missing = app.post("/api/surveys/9/submit", json!({"selected_items": ["1"]}), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let invalid = app.post("/api/surveys/1/submit", json!({"foo": 1}), None).await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.body, json!({"error": "Invalid data"}));

    let too_many = app
        .post(
            "/api/surveys/1/submit",
            json!({"responses": [{"question_id": "q1", "selected_items": ["1", "2"]}]}),
            None,
        )
        .await;
    assert_eq!(too_many.status, StatusCode::BAD_REQUEST);

    let unknown = app
        .post("/api/surveys/1/submit", json!({"responses": [{"question_id": "q7", "selected_items": ["1"]}]}), None)
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);

    assert!(!exists(&app.data_path("responses.json")));
}

#[tokio::test]
async fn test_update_deletes_orphaned_images() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    app.create(&cookie, lunch_survey()).await;
    assert!(exists(&app.image_path("1_q1_2.webp")));

    let update = json!({
        "title_en": "Lunch v2", "title_sv": "Lunch v2",
        "questions": [{
            "id": "q1", "text_en": "Main", "text_sv": "Huvudrätt",
            "items": [
                {"id": "1", "text_en": "Fish", "text_sv": "Fisk", "existing_image": "1_q1_1.webp"},
                {"id": "2", "text_en": "Meat", "text_sv": "Kött"}
            ]
        }]
    });
    let reply = app.send(Method::PUT, "/api/admin/surveys/1", Some(update), Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::OK);

    assert!(exists(&app.image_path("1_q1_1.webp")));
    assert!(!exists(&app.image_path("1_q1_2.webp")));

    let survey = app.get("/api/surveys/1", None).await.body;
    assert_eq!(survey["title_en"], "Lunch v2");
    assert_eq!(survey["questions"].as_array().unwrap().len(), 1);

    let missing = app
        .send(Method::PUT, "/api/admin/surveys/5", Some(lunch_survey()), Some(&cookie))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_cannot_claim_foreign_images() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    app.create(&cookie, lunch_survey()).await;
    app.create(&cookie, lunch_survey()).await;

    let steal = json!({
        "title_en": "x", "title_sv": "x",
        "items": [{"id": "1", "text": "a", "existing_image": "1_q1_1.webp"}]
    });
    app.send(Method::PUT, "/api/admin/surveys/2", Some(steal), Some(&cookie)).await;

    let survey = app.get("/api/surveys/2", None).await.body;
    assert!(survey["questions"][0]["items"][0].get("image").map_or(true, Value::is_null));

    app.send(Method::DELETE, "/api/admin/surveys/2", None, Some(&cookie)).await;
    assert!(exists(&app.image_path("1_q1_1.webp")));
}

#[tokio::test]
async fn test_update_upload_never_overwrites_kept_image() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    // 不带 ID，选项 ID 按位置补全
    let create = json!({
        "title_en": "Fika", "title_sv": "Fika",
        "questions": [{"text": "Pick", "items": [
            {"text": "A", "imageData": png(10, 10)},
            {"text": "B", "imageData": png(20, 20)}
        ]}]
    });
    app.create(&cookie, create).await;

    // 删掉 A 后 B 变成第 1 项，新增的 C 占用第 2 项的默认文件名
    let update = json!({
        "title_en": "Fika", "title_sv": "Fika",
        "questions": [{"text": "Pick", "items": [
            {"text": "B", "existing_image": "1_q1_2.webp"},
            {"text": "C", "imageData": png(30, 30)}
        ]}]
    });
    let reply = app.send(Method::PUT, "/api/admin/surveys/1", Some(update), Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);

    let survey = app.get("/api/surveys/1", None).await.body;
    let items = &survey["questions"][0]["items"];
    assert_eq!(items[0]["image"], "1_q1_2.webp");
    let c_image = items[1]["image"].as_str().unwrap().to_string();
    assert_ne!(c_image, "1_q1_2.webp");

    assert_eq!(image::open(app.image_path("1_q1_2.webp")).unwrap().width(), 20);
    assert_eq!(image::open(app.image_path(&c_image)).unwrap().width(), 30);
    assert!(!exists(&app.image_path("1_q1_1.webp")));
}

#[tokio::test]
async fn test_hero_image_lifecycle() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let mut body = lunch_survey();
    body["heroImageData"] = json!(png(2000, 500));
    app.create(&cookie, body).await;

    let survey = app.get("/api/surveys/1", None).await.body;
    assert_eq!(survey["hero_image"], "1_hero.webp");
    let hero = image::open(app.image_path("1_hero.webp")).unwrap();
    assert_eq!((hero.width(), hero.height()), (1200, 300));

    // 复制时封面一并复制
    let dup = app.post("/api/admin/surveys/1/duplicate", json!({}), Some(&cookie)).await;
    assert_eq!(dup.body["survey_id"], "2");
    assert_eq!(app.get("/api/surveys/2", None).await.body["hero_image"], "2_hero.webp");
    assert!(exists(&app.image_path("2_hero.webp")));

    // 替换封面
    let mut replace = lunch_survey();
    replace["questions"][0]["items"][0] = json!({"id": "1", "text": "Fish", "existing_image": "1_q1_1.webp"});
    replace["questions"][0]["items"][1] = json!({"id": "2", "text": "Meat", "existing_image": "1_q1_2.webp"});
    replace["hero_image_data"] = json!(png(300, 100));
    let reply = app.send(Method::PUT, "/api/admin/surveys/1", Some(replace), Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(image::open(app.image_path("1_hero.webp")).unwrap().width(), 300);
    assert!(exists(&app.image_path("1_q1_1.webp")));

    // 去掉封面后文件被删除
    let mut drop_hero = lunch_survey();
    drop_hero["questions"][0]["items"][0] = json!({"id": "1", "text": "Fish", "existing_image": "1_q1_1.webp"});
    let reply = app.send(Method::PUT, "/api/admin/surveys/1", Some(drop_hero), Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(app.get("/api/surveys/1", None).await.body["hero_image"], Value::Null);
    assert!(!exists(&app.image_path("1_hero.webp")));

    // 删除问卷时封面文件一并删除，副本不受影响
    app.send(Method::DELETE, "/api/admin/surveys/2", None, Some(&cookie)).await;
    assert!(!exists(&app.image_path("2_hero.webp")));
    assert!(exists(&app.image_path("1_q1_1.webp")));
}

#[tokio::test]
async fn test_delete_removes_images() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    app.create(&cookie, lunch_survey()).await;

    let reply = app.send(Method::DELETE, "/api/admin/surveys/1", None, Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(!exists(&app.image_path("1_q1_1.webp")));
    assert!(!exists(&app.image_path("1_q1_2.webp")));
    assert_eq!(app.get("/api/surveys/1", None).await.status, StatusCode::NOT_FOUND);

    let again = app.send(Method::DELETE, "/api/admin/surveys/1", None, Some(&cookie)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_copies_images() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    app.create(&cookie, lunch_survey()).await;

    let reply = app
        .post(
            "/api/admin/surveys/1/duplicate",
            json!({"new_title_en": "Dinner", "new_title_sv": "Middag"}),
            Some(&cookie),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["survey_id"], "2");

    let copy = app.get("/api/surveys/2", None).await.body;
    assert_eq!(copy["title_sv"], "Middag");
    assert_eq!(copy["questions"][0]["items"][0]["id"], "2_1");
    assert_eq!(copy["questions"][0]["items"][0]["image"], "2_q1_2_1.webp");
    assert!(exists(&app.image_path("2_q1_2_1.webp")));
    assert!(exists(&app.image_path("1_q1_1.webp")));

    // 删除原问卷后新 ID 仍不冲突
    app.send(Method::DELETE, "/api/admin/surveys/1", None, Some(&cookie)).await;
    let third = app.post("/api/admin/surveys/2/duplicate", json!({}), Some(&cookie)).await;
    assert_eq!(third.body["survey_id"], "3");
    assert_eq!(app.get("/api/surveys/3", None).await.body["title_en"], "Dinner (copy)");
}

#[tokio::test]
async fn test_reset_clears_responses() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    app.create(&cookie, lunch_survey()).await;
    app.post("/api/surveys/1/submit", json!({"selected_items": ["1"]}), None).await;

    let reply = app.post("/api/admin/surveys/1/reset", json!({}), Some(&cookie)).await;
    assert_eq!(reply.status, StatusCode::OK);

    let survey = app.get("/api/surveys/1", None).await.body;
    assert_eq!(survey["first_response_at"], Value::Null);
    let stats = &app.get("/api/admin/surveys/1/results", Some(&cookie)).await.body["stats"];
    assert_eq!(stats["total_responses"], 0);
    assert_eq!(stats["most_selected"], json!([]));

    let missing = app.post("/api/admin/surveys/8/reset", json!({}), Some(&cookie)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_legacy_files_are_read_and_aggregated() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("surveys.json"),
        r#"[{"id": "1", "title_en": "Fruit", "title_sv": "Frukt",
             "description_en": "", "description_sv": "",
             "items": [{"id": "1", "text": "Apple"}, {"id": "2", "text": "Pear"}],
             "created_at": "2024-01-01T00:00:00.000Z", "first_response_at": null}]"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("responses.json"),
        r#"[{"survey_id": "1", "selected_items": ["1", "2"], "timestamp": "2024-01-02T00:00:00.000Z"},
            {"survey_id": 1, "selected_items": [2], "timestamp": "2024-01-03T00:00:00"}]"#,
    )
    .unwrap();
    let app = TestApp::in_dir(dir, |_| {}).await;
    let cookie = app.login().await;

    let results = app.get("/api/admin/surveys/1/results", Some(&cookie)).await.body;
    assert_eq!(results["survey"]["questions"][0]["id"], "q1");
    let stats = &results["stats"];
    assert_eq!(stats["total_responses"], 2);
    assert_eq!(stats["avg_selections"], 1.5);
    assert_eq!(stats["item_stats"][0]["id"], "2");
    assert_eq!(stats["item_stats"][0]["percentage"], 100.0);
    assert_eq!(stats["item_stats"][1]["percentage"], 50.0);
}

#[tokio::test]
async fn test_malformed_store_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("surveys.json"), "[{oops").unwrap();
    let app = TestApp::in_dir(dir, |_| {}).await;

    let reply = app.get("/api/surveys", None).await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(reply.body["error"].is_string());
    assert_eq!(std::fs::read_to_string(app.data_path("surveys.json")).unwrap(), "[{oops");
}

#[tokio::test]
async fn test_export_then_import() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    app.create(&cookie, lunch_survey()).await;
    app.post("/api/surveys/1/submit", json!({"selected_items": ["1"]}), None).await;

    let export = app.get("/api/admin/surveys/export", Some(&cookie)).await;
    assert_eq!(export.status, StatusCode::OK);
    let bundle = export.body;
    assert_eq!(bundle["version"], 1);
    assert!(bundle["surveys"][0]["images"]["1_q1_1.webp"].is_string());

    let target = TestApp::new().await;
    let target_cookie = target.login().await;
    target.create(&target_cookie, lunch_survey()).await;

    let reply = target.post("/api/admin/surveys/import", bundle, Some(&target_cookie)).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["imported"], 1);
    assert_eq!(reply.body["survey_ids"], json!(["2"]));

    let imported = target.get("/api/surveys/2", None).await.body;
    assert_eq!(imported["questions"][0]["items"][0]["image"], "2_q1_1.webp");
    assert_eq!(imported["first_response_at"], Value::Null);
    assert!(exists(&target.image_path("2_q1_1.webp")));

    let unsupported = target
        .post(
            "/api/admin/surveys/import",
            json!({"version": 2, "exported_at": "2025-01-01T00:00:00.000Z", "surveys": []}),
            Some(&target_cookie),
        )
        .await;
    assert_eq!(unsupported.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rate_limit() {
    let app = TestApp::with_config(|config| {
        config.rate_limit.max_requests = 2;
    })
    .await;

    assert_eq!(app.get("/api/health", None).await.status, StatusCode::OK);
    assert_eq!(app.get("/api/health", None).await.status, StatusCode::OK);
    let limited = app.get("/api/health", None).await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(limited.body["error"].is_string());
}
