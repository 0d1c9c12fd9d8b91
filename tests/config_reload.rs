//! Config file loading and hot reload.

use std::fs;
use std::time::Duration;

use regex_router::config::watcher::ConfigWatcher;
use regex_router::config::{load_config, ConfigError};

const ONE_ROUTE: &str = r#"
[[routes]]
pattern = "^/a$"
handler = { kind = "status", status = 204 }
"#;

const TWO_ROUTES: &str = r#"
[[routes]]
pattern = "^/a$"
handler = { kind = "status", status = 204 }

[[routes]]
pattern = "^/b$"
handler = { kind = "decline" }
"#;

#[test]
fn test_invalid_pattern_is_reported_with_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("router.toml");
    fs::write(
        &path,
        r#"
        [[routes]]
        pattern = "/(open"
        handler = { kind = "decline" }
        "#,
    )
    .unwrap();

    match load_config(&path) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "routes[0].pattern");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_watcher_publishes_valid_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("router.toml");
    fs::write(&path, ONE_ROUTE).unwrap();

    let (watcher, mut updates) = ConfigWatcher::new(&path);
    let _watcher = watcher.run().unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    fs::write(&path, TWO_ROUTES).unwrap();

    let config = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let config = updates.recv().await.expect("watcher dropped");
            if config.routes.len() == 2 {
                return config;
            }
        }
    })
    .await
    .expect("no config update received");

    assert_eq!(config.routes[1].pattern, "^/b$");
}
