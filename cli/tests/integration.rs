use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use tempfile::tempdir;

fn write_sample_manifest(dir: &Path) -> PathBuf {
    let path = dir.join("manifest.json");
    fs::write(
        &path,
        r#"{
            "lastUpdated": "2024-01-01T00:00:00Z",
            "typefaces": [
                {
                    "name": "Open Sans",
                    "fonts": [
                        { "localPath": "/fonts/OpenSans-Regular.ttf", "variant": "400" },
                        { "localPath": "/fonts/OpenSans-BoldItalic.ttf", "variant": "700i" }
                    ]
                }
            ]
        }"#,
    )
    .expect("write manifest");
    path
}

fn fonts_dir() -> Option<PathBuf> {
    let env_override = env::var("TYPI_TEST_FONTS").ok()?;
    PathBuf::from(env_override).canonicalize().ok()
}

#[test]
fn list_shows_installed_typefaces() {
    let tmp = tempdir().expect("tempdir");
    let manifest_path = write_sample_manifest(tmp.path());

    let output = Command::new(env!("CARGO_BIN_EXE_typi"))
        .args(["list", "--manifest-path"])
        .arg(&manifest_path)
        .output()
        .expect("run typi");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Open Sans"));
    assert!(stdout.contains("400, 700i"));
    assert!(
        !stdout.contains("\u{1b}["),
        "non-terminal output should be plain"
    );
}

#[test]
fn list_json_round_trips_the_wire_format() {
    let tmp = tempdir().expect("tempdir");
    let manifest_path = write_sample_manifest(tmp.path());

    let output = Command::new(env!("CARGO_BIN_EXE_typi"))
        .args(["list", "--json", "--manifest-path"])
        .arg(&manifest_path)
        .output()
        .expect("run typi");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let parsed: Value = serde_json::from_slice(&output.stdout).expect("parse json output");
    let typefaces = parsed.as_array().expect("json array");
    assert_eq!(typefaces.len(), 1);
    assert_eq!(typefaces[0]["name"], "Open Sans");
    assert_eq!(
        typefaces[0]["fonts"][0]["localPath"],
        "/fonts/OpenSans-Regular.ttf"
    );
    assert_eq!(typefaces[0]["fonts"][1]["variant"], "700i");
}

#[test]
fn filtering_by_name_is_case_insensitive() {
    let tmp = tempdir().expect("tempdir");
    let manifest_path = write_sample_manifest(tmp.path());

    let output = Command::new(env!("CARGO_BIN_EXE_typi"))
        .args(["list", "OPEN", "SANS", "--manifest-path"])
        .arg(&manifest_path)
        .output()
        .expect("run typi");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Open Sans"));
}

#[test]
fn uninstalling_an_unknown_typeface_fails() {
    let tmp = tempdir().expect("tempdir");
    let manifest_path = write_sample_manifest(tmp.path());

    let output = Command::new(env!("CARGO_BIN_EXE_typi"))
        .args(["uninstall", "Nope", "--manifest-path"])
        .arg(&manifest_path)
        .output()
        .expect("run typi");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no typeface found"), "stderr: {stderr}");
}

#[test]
fn uninstalling_a_missing_variant_fails_without_mutating() {
    let tmp = tempdir().expect("tempdir");
    let manifest_path = write_sample_manifest(tmp.path());
    let before = fs::read_to_string(&manifest_path).expect("read manifest");

    let output = Command::new(env!("CARGO_BIN_EXE_typi"))
        .args(["uninstall", "Open", "Sans", "-v", "900", "--manifest-path"])
        .arg(&manifest_path)
        .output()
        .expect("run typi");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not installed"), "stderr: {stderr}");

    let after = fs::read_to_string(&manifest_path).expect("read manifest");
    assert_eq!(before, after, "a failed uninstall must not rewrite the manifest");
}

#[test]
fn a_fresh_system_gets_a_generated_manifest() {
    let tmp = tempdir().expect("tempdir");
    let empty_fonts = tmp.path().join("fonts");
    fs::create_dir_all(&empty_fonts).expect("mkdir");
    let manifest_path = tmp.path().join("manifest.json");

    let output = Command::new(env!("CARGO_BIN_EXE_typi"))
        .args(["list", "--manifest-path"])
        .arg(&manifest_path)
        .env("TYPI_FONT_DIR", empty_fonts.display().to_string())
        .output()
        .expect("run typi");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        manifest_path.exists(),
        "the regenerated manifest must be persisted"
    );
}

#[test]
fn install_to_directory_records_the_fonts() {
    let fonts = match fonts_dir() {
        Some(dir) => dir,
        None => return, // skip when fixtures are unavailable
    };
    let fixture = match fs::read_dir(&fonts)
        .expect("read fixtures")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("ttf"))
                .unwrap_or(false)
        }) {
        Some(path) => path,
        None => return, // skip when no ttf fixture exists
    };

    let tmp = tempdir().expect("tempdir");
    let target = tmp.path().join("installed");
    let empty_fonts = tmp.path().join("fonts");
    fs::create_dir_all(&empty_fonts).expect("mkdir");
    let manifest_path = tmp.path().join("manifest.json");

    let output = Command::new(env!("CARGO_BIN_EXE_typi"))
        .args(["install", "--dir"])
        .arg(&target)
        .args(["--manifest-path"])
        .arg(&manifest_path)
        .arg(&fixture)
        .env("TYPI_FONT_DIR", empty_fonts.display().to_string())
        .output()
        .expect("run typi");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let installed = target.join(fixture.file_name().expect("file name"));
    assert!(installed.exists(), "font file must be copied into --dir");

    let manifest: Value =
        serde_json::from_str(&fs::read_to_string(&manifest_path).expect("read manifest"))
            .expect("parse manifest");
    let typefaces = manifest["typefaces"].as_array().expect("typefaces");
    assert!(
        !typefaces.is_empty(),
        "installed font must be recorded in the manifest"
    );
}
