use std::fs;

use nova_config::{ConfigError, LoggingConfig, ReflectConfig, StoreConfig};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn loads_config_file_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nova-reflect.toml");
    fs::write(
        &path,
        r#"
[logging]
level = "debug"
stderr = false

[store]
preload = ["java.lang.Integer", "[Ljava.lang.String;"]
"#,
    )
    .unwrap();

    let config = ReflectConfig::load_from_path(&path).unwrap();
    assert_eq!(
        config,
        ReflectConfig {
            logging: LoggingConfig {
                level: "debug".to_string(),
                json: false,
                stderr: false,
            },
            store: StoreConfig {
                preload: vec![
                    "java.lang.Integer".to_string(),
                    "[Ljava.lang.String;".to_string(),
                ],
                max_array_dimensions: 255,
            },
        }
    );
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = ReflectConfig::load_from_path(&path).unwrap_err();
    match &err {
        ConfigError::Io { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("expected an I/O error, got {other:?}"),
    }
    assert!(err.to_string().contains("absent.toml"), "{err}");
}

#[test]
fn rejects_unknown_keys_and_bad_values() {
    let dir = tempdir().unwrap();
    let cases = [
        ("unknown.toml", "[store]\ncache = true\n"),
        ("range.toml", "[store]\nmax_array_dimensions = 300\n"),
    ];
    for (name, text) in cases {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        assert!(
            matches!(
                ReflectConfig::load_from_path(&path),
                Err(ConfigError::Toml(_))
            ),
            "{name}"
        );
    }

    for text in [
        "[store]\nmax_array_dimensions = 0\n",
        "[store]\npreload = [\"  \"]\n",
    ] {
        assert!(
            matches!(
                ReflectConfig::load_from_str(text),
                Err(ConfigError::Invalid(_))
            ),
            "{text}"
        );
    }
}
