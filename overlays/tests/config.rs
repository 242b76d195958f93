use std::time::Duration;

use overlays::config::{DialogConfig, duration_or, seconds, text_or};
use overlays::geometry::SizeF;
use overlays::runtime::{FlyIn, SettleStrategy};
use overlays::ConfigError;

#[test]
fn test_defaults() {
    let config = DialogConfig::default();
    assert_eq!(config.viewport, SizeF::new(1080.0, 1920.0));
    assert_eq!(config.settle, SettleStrategy::LayoutPass);
    assert_eq!(config.alert.ok_text, "Ok");
    assert_eq!(config.alert.cancel_text, "Cancel");
    assert_eq!(config.alert.fly_in, FlyIn::FromBottom);
    assert_eq!(config.alert.default_duration(), Duration::from_millis(500));
    assert_eq!(config.toast.presets.fast, 0.6);
    assert_eq!(config.toast.presets.slow, 1.5);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_json_uses_defaults() {
    let config = DialogConfig::from_json("{}").expect("valid config");
    assert_eq!(config.menu.width, 360.0);
    assert!(config.menu.catalog.is_empty());
}

#[test]
fn test_parse_full_config() {
    let json = r#"{
        "viewport": { "width": 720, "height": 1280 },
        "settle": { "mode": "frames", "count": 3 },
        "blocked_surfaces": ["main"],
        "alert": { "fly_in": "from_left", "duration": 0.25, "ok_text": "Yes" },
        "menu": {
            "show_divider_on_last": true,
            "catalog": {
                "profile": {
                    "item_template": "menu_item",
                    "items": [{ "text": "Account", "icon": "user.png" }, { "text": "Sign out" }]
                }
            }
        },
        "toast": { "presets": { "fast": 0.4 } }
    }"#;
    let config = DialogConfig::from_json(json).expect("valid config");

    assert_eq!(config.viewport, SizeF::new(720.0, 1280.0));
    assert_eq!(config.settle, SettleStrategy::Frames { count: 3 });
    assert_eq!(config.blocked_surfaces, vec!["main".to_string()]);
    assert_eq!(config.alert.fly_in, FlyIn::FromLeft);
    assert_eq!(config.alert.ok_text, "Yes");
    assert_eq!(config.alert.cancel_text, "Cancel");
    assert!(config.menu.show_divider_on_last);
    let profile = &config.menu.catalog["profile"];
    assert_eq!(profile.items.len(), 2);
    assert_eq!(profile.items[0].icon.as_deref(), Some("user.png"));
    assert_eq!(profile.items[1].icon, None);
    assert_eq!(config.toast.presets.fast, 0.4);
    assert_eq!(config.toast.presets.normal, 1.0);
}

#[test]
fn test_invalid_json_is_rejected() {
    let err = DialogConfig::from_json("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn test_validation_errors_name_the_field() {
    let cases = [
        (r#"{ "viewport": { "width": 0, "height": 100 } }"#, "viewport"),
        (r#"{ "settle": { "mode": "frames", "count": 0 } }"#, "settle.count"),
        (r#"{ "alert": { "template": "" } }"#, "alert.template"),
        (r#"{ "menu": { "duration": -1 } }"#, "menu.duration"),
        (
            r#"{ "menu": { "catalog": { "bad": { "item_template": "" } } } }"#,
            "menu.catalog.bad.item_template",
        ),
    ];
    for (json, expected) in cases {
        match DialogConfig::from_json(json) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected, "{}", json),
            other => panic!("expected invalid {} for {}, got {:?}", expected, json, other),
        }
    }
}

#[test]
fn test_empty_catalog_entry_is_accepted() {
    let json = r#"{ "menu": { "catalog": { "empty": { "item_template": "menu_item" } } } }"#;
    let config = DialogConfig::from_json(json).expect("valid config");
    assert!(config.menu.catalog["empty"].items.is_empty());
}

#[test]
fn test_load_missing_file() {
    let err = DialogConfig::load("/nonexistent/overlays.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("overlays-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "toast": { "duration": 2.0 } }"#).expect("write config");
    let config = DialogConfig::load(&path).expect("load config");
    let _ = std::fs::remove_file(&path);
    assert_eq!(config.toast.default_duration(), Duration::from_secs(2));
}

// =============================================================================
// Default Substitution Tests
// =============================================================================

#[test]
fn test_duration_or() {
    let default = Duration::from_millis(500);
    assert_eq!(duration_or(None, default), default);
    assert_eq!(duration_or(Some(Duration::ZERO), default), default);
    assert_eq!(duration_or(Some(Duration::from_millis(100)), default), Duration::from_millis(100));
}

#[test]
fn test_text_or() {
    assert_eq!(text_or(None, "Ok"), "Ok");
    assert_eq!(text_or(Some(""), "Ok"), "Ok");
    assert_eq!(text_or(Some("Yes"), "Ok"), "Yes");
}

#[test]
fn test_seconds_clamps_invalid() {
    assert_eq!(seconds(-1.0), Duration::ZERO);
    assert_eq!(seconds(f32::NAN), Duration::ZERO);
    assert_eq!(seconds(1.5), Duration::from_millis(1500));
}
