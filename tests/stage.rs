use std::fs;
use std::path::Path;

use esp_build_tools::{
    assets::stage_static_assets,
    BuildConfig,
    Error,
};
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project_with_static() -> TempDir {
    let dir = TempDir::new().unwrap();
    let static_dir = dir.path().join("static");
    write(&static_dir.join("index.html"), "<html></html>");
    write(&static_dir.join("js/app.js"), "console.log('app');");
    write(&static_dir.join("js/lib.js"), "console.log('lib');");
    write(&static_dir.join("js/lib.js.map"), "{\"version\":3}");
    write(&static_dir.join("css/style.css"), "body {}");
    dir
}

#[test]
fn test_copies_tree_preserving_relative_structure() {
    let dir = project_with_static();
    let config = BuildConfig::new(dir.path(), "test_env");

    let summary = stage_static_assets(&config).unwrap();

    assert_eq!(summary.files_copied, 5);
    let data = dir.path().join("data");
    assert!(data.join("static/index.html").exists());
    assert!(data.join("static/js/app.js").exists());
    assert!(data.join("static/js/lib.js.map").exists());
    assert!(data.join("static/css/style.css").exists());
}

#[test]
fn test_fabricates_source_maps_only_where_missing() {
    let dir = project_with_static();
    let config = BuildConfig::new(dir.path(), "test_env");

    let summary = stage_static_assets(&config).unwrap();

    // app.js had no map, lib.js shipped its own
    assert_eq!(summary.maps_created, 1);

    let map_path = dir.path().join("data/static/js/app.js.map");
    let map: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&map_path).unwrap()).unwrap();
    assert_eq!(map["version"], 3);
    assert_eq!(map["file"], "app.js");
    assert_eq!(map["mappings"], "");

    // the shipped map is copied verbatim, not overwritten
    let lib_map = fs::read_to_string(dir.path().join("data/static/js/lib.js.map")).unwrap();
    assert_eq!(lib_map, "{\"version\":3}");
}

#[test]
fn test_second_run_creates_no_new_maps() {
    let dir = project_with_static();
    let config = BuildConfig::new(dir.path(), "test_env");

    stage_static_assets(&config).unwrap();
    let second = stage_static_assets(&config).unwrap();

    assert_eq!(second.maps_created, 0);
    assert_eq!(second.files_copied, 5);
}

#[test]
fn test_reports_missing_icons() {
    let dir = project_with_static();
    let config = BuildConfig::new(dir.path(), "test_env");

    let summary = stage_static_assets(&config).unwrap();
    assert_eq!(
        summary.missing_icons,
        vec![
            "favicon.ico",
            "apple-touch-icon.png",
            "apple-touch-icon-precomposed.png"
        ]
    );

    // an icon already present in data/ is not reported
    write(&dir.path().join("data/favicon.ico"), "icon");
    let summary = stage_static_assets(&config).unwrap();
    assert_eq!(
        summary.missing_icons,
        vec!["apple-touch-icon.png", "apple-touch-icon-precomposed.png"]
    );
}

#[test]
fn test_missing_static_dir_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = BuildConfig::new(dir.path(), "test_env");

    assert!(matches!(
        stage_static_assets(&config),
        Err(Error::MissingInput(_))
    ));
}
