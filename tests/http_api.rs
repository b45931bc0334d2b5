//! HTTP config client tests against a local mock server.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use console_config::{ApiError, ConfigApi, ConfigManager, HttpConfigApi, ResolutionState};

async fn server_with(route: &str, response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn decodes_console_config() {
    let server = server_with(
        "/api/master/apps/consoleConfig",
        ResponseTemplate::new(200).set_body_json(json!({
            "allowed_apps": ["console1", "console2"],
            "show_realm_text_input": true,
            "apps": {
                "console1": { "console_app_incompatible": false, "realms": ["master"] }
            }
        })),
    )
    .await;

    let api = HttpConfigApi::new(&format!("{}/api/master", server.uri())).unwrap();
    let config = api.get_console_config().await.unwrap().unwrap();

    assert_eq!(
        config.allowed_apps,
        Some(vec!["console1".to_string(), "console2".to_string()])
    );
    assert!(config.show_realm_text_input);
    assert_eq!(
        config.apps.unwrap()["console1"].realms.as_deref(),
        Some(&["master".to_string()][..])
    );
}

#[tokio::test]
async fn maps_http_statuses_to_errors() {
    let server = MockServer::start().await;
    let api = HttpConfigApi::new(&format!("{}/api/master", server.uri())).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/master/apps/consoleConfig"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/master/apps"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/master/apps/console1/info.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(matches!(
        api.get_console_config().await,
        Err(ApiError::NotFound)
    ));
    assert!(matches!(
        api.get_apps().await,
        Err(ApiError::Communication(403))
    ));
    assert!(matches!(
        api.get_app_info("console1").await,
        Err(ApiError::Communication(500))
    ));
}

#[tokio::test]
async fn rejects_undecodable_body() {
    let server = server_with(
        "/api/master/apps",
        ResponseTemplate::new(200).set_body_string("not json"),
    )
    .await;

    let api = HttpConfigApi::new(&format!("{}/api/master", server.uri())).unwrap();
    assert!(matches!(api.get_apps().await, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn encodes_app_names_in_the_info_path() {
    let server = server_with(
        "/api/master/apps/Console%201/info.json",
        ResponseTemplate::new(200).set_body_json(json!({
            "console_app_incompatible": false,
            "realms": ["master1"]
        })),
    )
    .await;

    let api = HttpConfigApi::new(&format!("{}/api/master", server.uri())).unwrap();
    let info = api.get_app_info("Console 1").await.unwrap().unwrap();
    assert_eq!(info.realms.as_deref(), Some(&["master1".to_string()][..]));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Port 9 (discard) is not listening.
    let api = HttpConfigApi::new("http://127.0.0.1:9/api/master").unwrap();
    assert!(matches!(api.get_apps().await, Err(ApiError::Transport(_))));
}

#[tokio::test]
async fn resolves_a_domain_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/master/apps/consoleConfig"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/master/apps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["console1"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/master/apps/console1/info.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut manager = ConfigManager::over_http();
    let state = manager.set_domain(&server.uri()).await.unwrap();

    assert_eq!(
        state,
        ResolutionState::SelectRealm {
            base_url: server.uri(),
            app: "console1".into(),
            realms: None,
        }
    );
}
