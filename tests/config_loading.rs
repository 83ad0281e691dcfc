use std::fs;
use std::path::Path;

use tempfile::TempDir;

use adobe_bridge::config::{load_and_validate, load_from_path};
use adobe_bridge::types::InvocationStyle;
use adobe_bridge::{Application, BridgeError};
use adobe_bridge_test_utils::builders::BridgeConfigBuilder;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("AdobeBridge.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn full_config_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[application]
name = "Adobe Illustrator 2024"
timeout = 600
payload = "export.jsx"
invocation = "do_script"

[interpreter]
path = "/opt/bin/osascript"

[encoding]
literal_max_len = 30
single_literal_max_len = 20
chunk_size = 16

[scripts]
dir = "jsx"
staging_dir = "/tmp/adobe-stage"
"#,
    );

    let cfg = load_and_validate(&path).unwrap();

    assert_eq!(cfg.application.name, "Adobe Illustrator 2024");
    assert_eq!(cfg.application.timeout, 600);
    assert_eq!(cfg.application.payload.as_deref(), Some("export.jsx"));
    assert_eq!(cfg.invocation_style(), InvocationStyle::DoScript);
    assert_eq!(cfg.interpreter.path, Path::new("/opt/bin/osascript"));
    assert_eq!(cfg.encoding.literal_max_len, 30);
    assert_eq!(cfg.encoding.single_literal_max_len, 20);
    assert_eq!(cfg.encoding.chunk_size, 16);
    assert_eq!(cfg.scripts.dir.as_deref(), Some(Path::new("jsx")));
    assert_eq!(
        cfg.scripts.staging_dir.as_deref(),
        Some(Path::new("/tmp/adobe-stage"))
    );
}

#[test]
fn unknown_keys_are_rejected_while_parsing() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[application]\nnmae = \"typo\"\n");

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, BridgeError::TomlError(_)));
}

#[test]
fn bad_invocation_style_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[application]\ninvocation = \"applescript\"\n");
    assert!(matches!(
        load_from_path(&path).unwrap_err(),
        BridgeError::TomlError(_)
    ));
}

#[test]
fn semantic_errors_surface_as_config_errors() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[encoding]\nsingle_literal_max_len = 0\n");

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, BridgeError::ConfigError(msg) if msg.contains("single_literal_max_len")));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_and_validate(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, BridgeError::IoError(_)));
}

#[test]
fn application_from_config_merges_the_scripts_dir() {
    let dir = TempDir::new().unwrap();
    let jsx = dir.path().join("jsx");
    fs::create_dir(&jsx).unwrap();
    fs::write(jsx.join("export.jsx"), "#include \"dispatcher.jsx\"\nfunction main(args) {}\n").unwrap();

    let cfg = BridgeConfigBuilder::new()
        .application("Adobe Photoshop 2024")
        .payload("export.jsx")
        .scripts_dir(&jsx)
        .build();
    let app = Application::from_config(&cfg).unwrap();

    assert_eq!(app.name(), "Adobe Photoshop 2024");
    assert_eq!(app.payload_name(), Some("export.jsx"));
    let files: Vec<&str> = app.script_collection().files().collect();
    assert_eq!(files, vec!["bridge_test.jsx", "dispatcher.jsx", "export.jsx"]);
}

#[test]
fn application_from_config_stages_into_the_fixed_dir() {
    let dir = TempDir::new().unwrap();
    let stage = dir.path().join("stage");

    let cfg = BridgeConfigBuilder::new().staging_dir(&stage).build();
    let app = Application::from_config(&cfg).unwrap();

    let staged = app.stage().unwrap();
    assert_eq!(staged.dir(), stage.as_path());
    drop(staged);

    // A fixed directory outlives the call.
    assert!(stage.join("dispatcher.jsx").is_file());
}

#[test]
fn missing_scripts_dir_is_a_resource_error() {
    let dir = TempDir::new().unwrap();
    let cfg = BridgeConfigBuilder::new()
        .scripts_dir(&dir.path().join("absent"))
        .build();
    assert!(matches!(
        Application::from_config(&cfg).unwrap_err(),
        BridgeError::Resource(_)
    ));
}
