use std::fs;

use lingopatch::{Edit, EditCache, LanguageFile};
use tempfile::TempDir;

#[test]
fn test_cache_persists_between_opens() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state").join("edits.json");

    let mut cache = EditCache::open(&path).unwrap();
    assert!(cache.is_empty());
    cache.set("de-DE", "STR_0002", "Zwei");
    cache.set("de-DE", "STR_0001", "Eins");
    cache.save().unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["de-DE_STR_0001"], "Eins");

    let reopened = EditCache::open(&path).unwrap();
    assert_eq!(reopened.path(), Some(path.as_path()));
    assert_eq!(
        reopened.edits_for("de-DE"),
        vec![Edit::new("STR_0001", "Eins"), Edit::new("STR_0002", "Zwei")]
    );
}

#[test]
fn test_empty_file_is_empty_cache() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("edits.json");
    fs::write(&path, "\n").unwrap();
    assert!(EditCache::open(&path).unwrap().is_empty());
}

#[test]
fn test_corrupt_cache_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("edits.json");
    fs::write(&path, "[1, 2").unwrap();
    assert!(EditCache::open(&path).is_err());
}

#[test]
fn test_resolve_against_language_file_evicts_published_edits() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("edits.json");
    let upstream = LanguageFile::new("STR_0001    :Eins\nSTR_0002    :Zwei\n");

    let mut cache = EditCache::open(&path).unwrap();
    cache.set("de-DE", "STR_0001", "Eins");
    cache.set("de-DE", "STR_0002", "Zwei!");
    cache.set("de-DE", "STR_0003", "Drei");

    let resolved: Vec<Option<String>> = ["STR_0001", "STR_0002", "STR_0003", "STR_0004"]
        .iter()
        .map(|id| cache.resolve("de-DE", id, upstream.lookup(id)))
        .collect();
    assert_eq!(
        resolved,
        vec![
            Some("Eins".to_string()),
            Some("Zwei!".to_string()),
            Some("Drei".to_string()),
            None
        ]
    );
    cache.save().unwrap();

    let reopened = EditCache::open(&path).unwrap();
    assert_eq!(reopened.get("de-DE", "STR_0001"), None);
    assert_eq!(reopened.len(), 2);
}
