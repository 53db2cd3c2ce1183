use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use typi_core::error::TypiError;
use typi_core::font::InstalledFont;
use typi_core::manifest::Manifest;
use typi_core::variant::FontVariant;

fn font(family: &str, variant: &str, path: &str) -> InstalledFont {
    InstalledFont::on_disk(
        family,
        variant.parse::<FontVariant>().expect("variant"),
        PathBuf::from(path),
    )
}

#[test]
fn save_then_load_reproduces_the_ledger() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("nested").join("manifest.json");

    let mut manifest = Manifest::new();
    manifest.add(font("Open Sans", "400", "/fonts/OpenSans-Regular.ttf"));
    manifest.add(font("Open Sans", "700i", "/fonts/OpenSans-BoldItalic.ttf"));
    manifest.add(font("Inter", "400", "/fonts/Inter-Regular.ttf"));

    manifest.save(&path).expect("save");
    let loaded = Manifest::load(&path).expect("load");

    assert_eq!(loaded.typefaces.len(), 2);

    let open_sans = loaded.get("open sans").expect("typeface");
    let printed: Vec<String> = open_sans.variants().iter().map(|v| v.to_string()).collect();
    assert_eq!(printed, ["400", "700i"]);
    assert_eq!(
        open_sans.fonts[0].path,
        PathBuf::from("/fonts/OpenSans-Regular.ttf")
    );

    // Family and file name are reconstructed onto each font on load.
    assert_eq!(open_sans.fonts[0].family, "Open Sans");
    assert_eq!(open_sans.fonts[0].file_name, "OpenSans-Regular.ttf");
    assert!(open_sans.fonts[0].bytes.is_none());
}

#[test]
fn save_stamps_last_updated_with_the_save_time() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("manifest.json");

    let mut manifest = Manifest::new();
    let constructed_at = manifest.last_updated;

    manifest.save(&path).expect("save");
    assert!(manifest.last_updated >= constructed_at);

    let first_save = manifest.last_updated;
    manifest.save(&path).expect("save again");
    assert!(manifest.last_updated >= first_save);

    let loaded = Manifest::load(&path).expect("load");
    assert_eq!(loaded.last_updated, manifest.last_updated);
}

#[test]
fn wire_format_uses_camel_case_and_short_variants() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("manifest.json");

    let mut manifest = Manifest::new();
    manifest.add(font("Inter", "700i", "/fonts/Inter-BoldItalic.ttf"));
    manifest.save(&path).expect("save");

    let raw = fs::read_to_string(&path).expect("read");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");

    assert!(value["lastUpdated"].is_string());
    let font = &value["typefaces"][0]["fonts"][0];
    assert_eq!(font["localPath"], "/fonts/Inter-BoldItalic.ttf");
    assert_eq!(font["variant"], "700i");
    assert!(font["registryPath"].is_null());
}

#[test]
fn load_tolerates_an_absent_registry_path() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("manifest.json");

    fs::write(
        &path,
        r#"{
            "lastUpdated": "2024-01-01T00:00:00Z",
            "typefaces": [
                {
                    "name": "Open Sans",
                    "fonts": [
                        { "localPath": "/fonts/OpenSans-Regular.ttf", "variant": "400" }
                    ]
                }
            ]
        }"#,
    )
    .expect("write");

    let manifest = Manifest::load(&path).expect("load");
    let typeface = manifest.get("Open Sans").expect("typeface");
    assert_eq!(typeface.fonts[0].registry_path, None);
}

#[test]
fn a_failed_save_target_reports_persistence() {
    let tmp = tempdir().expect("tempdir");
    // A directory where the manifest file should be.
    let path = tmp.path().join("manifest.json");
    fs::create_dir_all(&path).expect("mkdir");

    let mut manifest = Manifest::new();
    let err = manifest.save(&path).expect_err("cannot overwrite a directory");
    assert!(matches!(err, TypiError::Persistence { .. }));
}
