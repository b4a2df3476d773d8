use lingopatch::EditCache;

use crate::config::Config;
use crate::validation::{ValidationContext, validate_context};
use crate::view::{DEFAULT_MAX_WIDTH, pad_to_width, truncate_to_width};

fn open_cache(config: &Config) -> Result<EditCache, String> {
    let path = config.cache_path();
    EditCache::open(&path).map_err(|e| format!("Cannot open edit cache {}: {}", path.display(), e))
}

fn save_cache(cache: &EditCache) -> Result<(), String> {
    cache
        .save()
        .map_err(|e| format!("Cannot save edit cache: {}", e))
}

fn validate_key(lang: &str, key: Option<&str>) -> Result<(), String> {
    let mut vctx = ValidationContext::new().with_language_code(lang.to_string());
    if let Some(key) = key {
        vctx = vctx.with_string_id(key.to_string());
    }
    validate_context(&vctx)
}

pub fn run_edit_set_command(config: &Config, lang: String, key: String, text: String) -> Result<(), String> {
    validate_key(&lang, Some(&key))?;
    if text.contains('\n') || text.contains('\r') {
        return Err(format!("Text for {} must be a single line", key));
    }

    let mut cache = open_cache(config)?;
    let replaced = cache.get(&lang, &key).is_some();
    cache.set(&lang, &key, text);
    save_cache(&cache)?;
    if replaced {
        println!("✅ Updated '{}' for {}", key, lang);
    } else {
        println!("✅ Saved '{}' for {}", key, lang);
    }
    Ok(())
}

pub fn run_edit_get_command(config: &Config, lang: String, key: String) -> Result<(), String> {
    validate_key(&lang, Some(&key))?;
    let cache = open_cache(config)?;
    match cache.get(&lang, &key) {
        Some(text) => {
            println!("{}", text);
            Ok(())
        }
        None => Err(format!("No edit saved for '{}' in {}", key, lang)),
    }
}

pub fn run_edit_remove_command(config: &Config, lang: String, key: String) -> Result<(), String> {
    validate_key(&lang, Some(&key))?;
    let mut cache = open_cache(config)?;
    if cache.remove(&lang, &key).is_some() {
        save_cache(&cache)?;
        println!("✅ Removed '{}' from {}", key, lang);
    } else {
        println!("ℹ️  No edit saved for '{}' in {}; nothing to remove", key, lang);
    }
    Ok(())
}

pub fn run_edit_list_command(config: &Config, lang: String, full: bool) -> Result<(), String> {
    validate_key(&lang, None)?;
    let cache = open_cache(config)?;
    let edits = cache.edits_for(&lang);
    if edits.is_empty() {
        println!("No edits saved for {}", lang);
        return Ok(());
    }
    for edit in &edits {
        let text = if full {
            edit.text.clone()
        } else {
            truncate_to_width(&edit.text, DEFAULT_MAX_WIDTH)
        };
        println!("{}  {}", pad_to_width(&edit.string_id, 8), text);
    }
    println!("\n{} edit(s)", edits.len());
    Ok(())
}

pub fn run_edit_clear_command(config: &Config, lang: String) -> Result<(), String> {
    validate_key(&lang, None)?;
    let mut cache = open_cache(config)?;
    let removed = cache.clear_language(&lang);
    save_cache(&cache)?;
    println!("✅ Cleared {} edit(s) for {}", removed, lang);
    Ok(())
}
