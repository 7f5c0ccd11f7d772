//! End-to-end tests of the HTTP contract.

use feature_flag::flags::EnvironmentMode;
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

async fn get(url: String) -> (StatusCode, Value) {
    let res = common::http_client().get(url).send().await.expect("service unreachable");
    let status = res.status();
    (status, res.json().await.expect("JSON body"))
}

async fn post(url: String, body: Value) -> (StatusCode, Value) {
    let res = common::http_client()
        .post(url)
        .json(&body)
        .send()
        .await
        .expect("service unreachable");
    let status = res.status();
    (status, res.json().await.expect("JSON body"))
}

#[tokio::test]
async fn test_health_reports_service_and_mode() {
    let service = common::start_service(EnvironmentMode::Test).await;

    let (status, body) = get(service.url("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "service": "feature-flag", "mode": "test"}));

    post(service.url("/mode"), json!({"mode": "production"})).await;
    let (_, body) = get(service.url("/health")).await;
    assert_eq!(body["mode"], "production");
}

#[tokio::test]
async fn test_default_mode_from_config() {
    let service = common::start_service(EnvironmentMode::Production).await;
    let (_, body) = get(service.url("/mode")).await;
    assert_eq!(body["mode"], "production");
}

#[tokio::test]
async fn test_list_flags_contains_environment_mode() {
    let service = common::start_service(EnvironmentMode::Test).await;

    let (status, body) = get(service.url("/flags")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "flags": {"environment_mode": "test"}}));
}

#[tokio::test]
async fn test_unknown_flag_is_404() {
    let service = common::start_service(EnvironmentMode::Test).await;

    let (status, body) = get(service.url("/flags/does_not_exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "flag 'does_not_exist' not found");
}

#[tokio::test]
async fn test_create_then_overwrite_flag() {
    let service = common::start_service(EnvironmentMode::Test).await;

    let (status, body) = post(
        service.url("/flags"),
        json!({"name": "enable_new_layout", "value": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "name": "enable_new_layout", "value": true}));

    let (status, body) = get(service.url("/flags/enable_new_layout")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "name": "enable_new_layout", "value": true}));

    let structured = json!({"rollout": 25, "regions": ["eu", "us"]});
    post(
        service.url("/flags"),
        json!({"name": "enable_new_layout", "value": structured}),
    )
    .await;
    let (_, body) = get(service.url("/flags/enable_new_layout")).await;
    assert_eq!(body["value"], structured);

    // Identical rewrite is a no-op as far as readers can tell.
    post(
        service.url("/flags"),
        json!({"name": "enable_new_layout", "value": structured}),
    )
    .await;
    let (_, body) = get(service.url("/flags")).await;
    assert_eq!(body["flags"].as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn test_falsy_values_are_accepted() {
    let service = common::start_service(EnvironmentMode::Test).await;

    for (name, value) in [("off", json!(false)), ("zero", json!(0)), ("blank", json!(""))] {
        let (status, body) = post(service.url("/flags"), json!({"name": name, "value": value})).await;
        assert_eq!(status, StatusCode::OK, "{name} should be accepted");
        assert_eq!(body["value"], value);
    }
}

#[tokio::test]
async fn test_name_validation() {
    let service = common::start_service(EnvironmentMode::Test).await;

    for payload in [
        json!({"value": true}),
        json!({"name": "", "value": true}),
        json!({"name": "   ", "value": true}),
        json!({"name": null, "value": true}),
        json!({"name": 7, "value": true}),
    ] {
        let (status, body) = post(service.url("/flags"), payload.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("name"));
    }
}

#[tokio::test]
async fn test_value_validation() {
    let service = common::start_service(EnvironmentMode::Test).await;

    for payload in [json!({"name": "some_flag"}), json!({"name": "some_flag", "value": null})] {
        let (status, body) = post(service.url("/flags"), payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("value"));
    }

    let (status, _) = get(service.url("/flags/some_flag")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_json_body() {
    let service = common::start_service(EnvironmentMode::Test).await;

    let res = common::http_client()
        .post(service.url("/flags"))
        .body("name=x&value=y")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("'name' and 'value'"));
}

#[tokio::test]
async fn test_environment_flag_via_flags_endpoint() {
    let service = common::start_service(EnvironmentMode::Test).await;

    let (status, body) = post(
        service.url("/flags"),
        json!({"name": "environment_mode", "value": "invalid_mode"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("environment_mode"));
    assert_eq!(service.flags.mode(), EnvironmentMode::Test);

    let (status, body) = post(
        service.url("/flags"),
        json!({"name": "environment_mode", "value": "Production"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], "production");

    let (_, body) = get(service.url("/mode")).await;
    assert_eq!(body["mode"], "production");
}

#[tokio::test]
async fn test_mode_views_agree() {
    let service = common::start_service(EnvironmentMode::Test).await;

    for mode in ["production", "test"] {
        let (status, body) = post(service.url("/mode"), json!({"mode": mode})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok", "mode": mode}));

        let (_, body) = get(service.url("/mode")).await;
        assert_eq!(body["mode"], mode);

        let (_, body) = get(service.url("/flags/environment_mode")).await;
        assert_eq!(body["value"], mode);

        let (_, body) = get(service.url("/health")).await;
        assert_eq!(body["mode"], mode);
    }
}

#[tokio::test]
async fn test_invalid_mode_leaves_mode_unchanged() {
    let service = common::start_service(EnvironmentMode::Production).await;

    for mode in [json!("prod"), json!(""), json!("PRODUCTION_X"), json!(true), json!(null)] {
        let (status, body) = post(service.url("/mode"), json!({"mode": mode})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("invalid mode"));
    }

    let (status, body) = post(service.url("/mode"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("invalid mode"));

    let (_, body) = get(service.url("/mode")).await;
    assert_eq!(body["mode"], "production");
}

#[tokio::test]
async fn test_unknown_route() {
    let service = common::start_service(EnvironmentMode::Test).await;

    let (status, body) = get(service.url("/this/does/not/exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"status": "error", "message": "endpoint not found"}));
}

#[tokio::test]
async fn test_raw_body_key_order() {
    let service = common::start_service(EnvironmentMode::Test).await;

    let res = common::http_client()
        .post(service.url("/mode"))
        .json(&json!({"mode": "PRODUCTION"}))
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers()[reqwest::header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(res.text().await.unwrap(), r#"{"status":"ok","mode":"production"}"#);

    post(service.url("/flags"), json!({"name": "zeta", "value": 1})).await;
    post(service.url("/flags"), json!({"name": "alpha", "value": 2})).await;
    let text = common::http_client()
        .get(service.url("/flags"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(
        text,
        r#"{"status":"ok","flags":{"environment_mode":"production","zeta":1,"alpha":2}}"#
    );
}

#[tokio::test]
async fn test_concrete_scenario() {
    let service = common::start_service(EnvironmentMode::Test).await;

    let (_, body) = get(service.url("/mode")).await;
    assert_eq!(body, json!({"status": "ok", "mode": "test"}));

    let (status, body) = post(service.url("/mode"), json!({"mode": "PRODUCTION"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "mode": "production"}));

    let (status, _) = post(
        service.url("/flags"),
        json!({"name": "enable_new_layout", "value": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(service.url("/flags/enable_new_layout")).await;
    assert_eq!(body, json!({"status": "ok", "name": "enable_new_layout", "value": true}));
}

#[tokio::test]
async fn test_initialize_resets_store() {
    let service = common::start_service(EnvironmentMode::Test).await;

    post(service.url("/flags"), json!({"name": "beta", "value": "on"})).await;
    post(service.url("/mode"), json!({"mode": "production"})).await;

    service.flags.initialize();

    let (_, body) = get(service.url("/flags")).await;
    assert_eq!(body["flags"], json!({"environment_mode": "test"}));
}

#[tokio::test]
async fn test_concurrent_writes() {
    let service = common::start_service(EnvironmentMode::Test).await;
    let client = common::http_client();

    let mut handles = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let url = service.url("/flags");
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({"name": format!("flag_{i}"), "value": i}))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    assert_eq!(service.flags.all().len(), 21);
}
