use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use quickplan::algorithm::AlternativeGroups;
use quickplan::config::PlannerConfig;
use quickplan::excel::load_catalog;
use quickplan::server::{routes, AppState};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

fn state() -> web::Data<AppState> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/datafiles/catalog.json");
    let catalog = Arc::new(load_catalog(path).expect("sample catalog"));
    web::Data::new(AppState::new(catalog, Arc::new(AlternativeGroups::default_groups()), PlannerConfig::default()))
}

fn selected_codes(v: &Value) -> Vec<String> {
    v["selected"]
        .as_array()
        .map(|a| a.iter().filter_map(|c| c.as_str().map(String::from)).collect())
        .unwrap_or_default()
}

#[actix_web::test]
async fn test_session_lifecycle() {
    let data = state();
    let app = test::init_service(App::new().app_data(data.clone()).configure(routes)).await;

    let req = test::TestRequest::post().uri("/sessions").set_json(json!({})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_u64().expect("session id");
    assert_eq!(created["limits"]["max_credits"], 14);
    assert_eq!(created["limits"]["max_courses"], 8);

    let req = test::TestRequest::post().uri(&format!("/sessions/{}/courses/CSE470", id)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["change"]["added"], json!(["CSE470L", "CSE470"]));
    assert_eq!(body["session"]["stats"]["selected_credits"], 4);
    let cost = body["session"]["estimated_cost"].as_f64().unwrap();
    assert_eq!(cost, PlannerConfig::default().cost.estimate(4));

    let req = test::TestRequest::delete().uri(&format!("/sessions/{}/courses/CSE470", id)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["change"]["removed"], json!(["CSE470", "CSE470L"]));
    assert!(selected_codes(&body["session"]).is_empty());

    let req = test::TestRequest::delete().uri(&format!("/sessions/{}", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert_eq!(data.session_count(), 0);

    let req = test::TestRequest::get().uri(&format!("/sessions/{}", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_add_rejections() {
    let data = state();
    let id = data.create_session(data.config.default_limits).unwrap();
    let app = test::init_service(App::new().app_data(data.clone()).configure(routes)).await;

    let req = test::TestRequest::post().uri(&format!("/sessions/{}/courses/POL101", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post().uri(&format!("/sessions/{}/courses/POL104", id)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["availability"]["status"], "alternative_conflict");
    assert_eq!(body["availability"]["with"], "POL101");

    let req = test::TestRequest::post().uri(&format!("/sessions/{}/courses/CSE440", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    let req = test::TestRequest::post().uri(&format!("/sessions/{}/courses/CSE421", id)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["availability"]["status"], "trail_locked");
    assert_eq!(body["availability"]["first_trail"], "AI Trail");

    let req = test::TestRequest::post().uri(&format!("/sessions/{}/courses/CSE4700", id)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["suggestions"].as_array().is_some_and(|s| !s.is_empty()));
}

#[actix_web::test]
async fn test_limits_query_and_listing() {
    let data = state();
    let id = data.create_session(data.config.default_limits).unwrap();
    let app = test::init_service(App::new().app_data(data.clone()).configure(routes)).await;

    for code in ["POL101", "HIS101"] {
        let req = test::TestRequest::post().uri(&format!("/sessions/{}/courses/{}", id, code)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    // Bajar el tope no expulsa cursos
    let req = test::TestRequest::put()
        .uri(&format!("/sessions/{}/limits", id))
        .set_json(json!({"max_credits": 4, "max_courses": 8}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(selected_codes(&body), vec!["POL101", "HIS101"]);
    assert_eq!(body["stats"]["remaining_credits"], -2);

    let req = test::TestRequest::put()
        .uri(&format!("/sessions/{}/limits", id))
        .set_json(json!({"max_credits": 0, "max_courses": 8}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&format!("/sessions/{}/query", id))
        .set_json(json!({"search": "", "category": "Core", "type": "lab"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&format!("/sessions/{}/courses?view=available", id)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let courses = body["courses"].as_array().expect("courses array");
    assert!(!courses.is_empty());
    assert!(courses.iter().all(|c| c["type"] == "lab" && c["category"] == "Core"));
    // Con tope de 4 créditos ninguno de 1 crédito cabe (6 ya seleccionados)
    assert!(courses.iter().all(|c| c["available"] == false));

    let req = test::TestRequest::get().uri(&format!("/sessions/{}/courses?view=bogus", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete().uri(&format!("/sessions/{}/courses", id)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(selected_codes(&body).is_empty());
    assert!(body["trail"]["first_trail"].is_null());
}

#[actix_web::test]
async fn test_catalog_and_help() {
    let data = state();
    let app = test::init_service(App::new().app_data(data.clone()).configure(routes)).await;

    let req = test::TestRequest::get().uri("/catalog").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["courses"].as_array().map(|a| a.len()), Some(data.catalog.len()));
    assert!(body["categories"].as_array().is_some_and(|c| c.iter().any(|v| v == "AI Trail")));

    let req = test::TestRequest::get().uri("/help").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["endpoints"].as_array().is_some_and(|e| !e.is_empty()));
}
