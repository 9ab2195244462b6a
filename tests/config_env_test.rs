//! GRAPHNAV_* environment overrides on top of file config.
//!
//! Kept in its own test binary: the process environment is shared by every
//! test in a binary, and the file-config tests must not see these variables.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use graphnav::config::{local_config_path, Settings};
use graphnav::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

const VARS: [(&str, &str); 4] = [
    ("GRAPHNAV_RESPONSES_DIR", "/tmp/dumps"),
    ("GRAPHNAV_DISPLAY__INDENT", "2"),
    ("GRAPHNAV_DISPLAY__COLOR", "false"),
    ("GRAPHNAV_DISPLAY__LABEL_PROPERTIES", "name,age"),
];

#[test]
fn given_env_overrides_when_load_then_replace_file_values() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        r#"
responses_dir = "/srv/dumps"

[display]
indent = 8
label_properties = ["email"]
"#,
    )
    .unwrap();
    for (key, value) in VARS {
        std::env::set_var(key, value);
    }

    let loaded = Settings::load(Some(dir.path()));
    for (key, _) in VARS {
        std::env::remove_var(key);
    }
    let settings = loaded.expect("load settings");

    assert_eq!(settings.responses_dir.as_deref(), Some(Path::new("/tmp/dumps")));
    assert_eq!(settings.display.indent, 2);
    assert!(!settings.display.color);
    assert_eq!(settings.display.label_properties, vec!["name", "age"]);
}
