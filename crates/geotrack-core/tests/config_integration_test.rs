//! Integration tests for layered configuration
//!
//! Precedence: CLI arguments > Environment variables > Config file > Defaults

use geotrack_core::config::{
    CliConfigOverrides, ConfigSource, LayeredConfig, NotificationChannelKind,
};
use geotrack_core::models::TransportMode;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_KEYS: &[&str] = &[
    "GEOTRACK_DRIVING_SPEED_KMH",
    "GEOTRACK_WALKING_SPEED_KMH",
    "GEOTRACK_TRAFFIC_MULTIPLIER",
    "GEOTRACK_SUBSCRIBER_BUFFER",
    "GEOTRACK_NOTIFICATION_CHANNEL",
    "GEOTRACK_WEBHOOK_URL",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", contents).unwrap();
    file
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let file = config_file(
        r#"
driving_speed_kmh = 40.0
walking_speed_kmh = 6.0
"#,
    );
    env::set_var("GEOTRACK_DRIVING_SPEED_KMH", "50");

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.driving_speed_kmh.value, 50.0);
    assert_eq!(config.driving_speed_kmh.source, ConfigSource::Environment);
    assert_eq!(config.walking_speed_kmh.value, 6.0);
    assert_eq!(config.walking_speed_kmh.source, ConfigSource::File);
    assert_eq!(config.speed_kmh(TransportMode::Driving), 50.0);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_everything() {
    clear_env();
    let file = config_file("traffic_multiplier = 1.5");
    env::set_var("GEOTRACK_TRAFFIC_MULTIPLIER", "1.8");

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();
    config.update_from_cli(CliConfigOverrides {
        traffic_multiplier: Some(2.0),
        ..Default::default()
    });

    assert_eq!(config.traffic_multiplier.value, 2.0);
    assert_eq!(config.traffic_multiplier.source, ConfigSource::Cli);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_values_are_ignored() {
    clear_env();
    env::set_var("GEOTRACK_SUBSCRIBER_BUFFER", "lots");
    env::set_var("GEOTRACK_NOTIFICATION_CHANNEL", "carrier-pigeon");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.subscriber_buffer.value, 256);
    assert_eq!(config.subscriber_buffer.source, ConfigSource::Default);
    assert_eq!(config.notification_channel.value, NotificationChannelKind::Log);

    clear_env();
}

#[test]
#[serial]
fn test_webhook_channel_from_env() {
    clear_env();
    env::set_var("GEOTRACK_NOTIFICATION_CHANNEL", "Webhook");
    env::set_var("GEOTRACK_WEBHOOK_URL", "http://127.0.0.1:9/hook");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.notification_channel.value, NotificationChannelKind::Webhook);
    assert_eq!(config.webhook_url.source, ConfigSource::Environment);
    assert!(config.validate().is_ok());

    clear_env();
}

#[test]
fn test_missing_file_is_an_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/geotrack.toml");
    assert!(result.is_err());
}
