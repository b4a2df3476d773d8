//! Offline commands on local issue bodies and language files.

use std::collections::BTreeMap;
use std::fs;

use lingopatch::{
    Edit, LanguageFile, TextDocument, merge_language_file, normalize_edits, parse_issue,
    validate_language_file,
};

use crate::validation::{ValidationContext, parse_assignment, validate_context};
use crate::view::{DEFAULT_MAX_WIDTH, truncate_to_width};

fn read_language_file(path: &str) -> Result<LanguageFile, String> {
    LanguageFile::read_from(path).map_err(|e| format!("Failed to read {}: {}", path, e))
}

/// Print what an issue body asks for.
pub fn run_parse_issue_command(input: String, json_output: bool) -> Result<(), String> {
    validate_context(&ValidationContext::new().with_input_file(input.clone()))?;
    let body = fs::read_to_string(&input).map_err(|e| format!("Failed to read {}: {}", input, e))?;
    let parsed = parse_issue(&body);

    if json_output {
        let json = serde_json::to_string_pretty(&parsed).map_err(|e| e.to_string())?;
        println!("{}", json);
        return Ok(());
    }

    println!("Strings: {}", parsed.strings.len());
    for string in &parsed.strings {
        let marker = if string.is_removal() { "-" } else { "+" };
        println!(
            "  {} {}: {}",
            marker,
            string.string_id,
            truncate_to_width(string.display_text(), DEFAULT_MAX_WIDTH)
        );
    }
    let missing: Vec<&str> = parsed.missing_languages.iter().map(String::as_str).collect();
    if missing.is_empty() {
        println!("Missing languages: none");
    } else {
        println!("Missing languages: {}", missing.join(", "));
    }
    Ok(())
}

/// Print the text of one string id. Exits with an error if it is absent.
pub fn run_lookup_command(input: String, key: String) -> Result<(), String> {
    validate_context(
        &ValidationContext::new()
            .with_input_file(input.clone())
            .with_string_id(key.clone()),
    )?;
    let file = read_language_file(&input)?;
    match file.lookup(&key) {
        Some(text) => {
            println!("{}", text);
            Ok(())
        }
        None => Err(format!("{} not found in {}", key, input)),
    }
}

/// Read `{"STR_0001": "text", ...}` from a JSON file.
pub fn read_edits_file(path: &str) -> Result<Vec<Edit>, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    let map: BTreeMap<String, String> = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid edits file {}: {}", path, e))?;
    map.into_iter()
        .map(|(id, text)| parse_assignment(&format!("{}={}", id, text)))
        .collect()
}

pub fn run_merge_command(
    input: String,
    assignments: Vec<String>,
    edits_file: Option<String>,
    output: Option<String>,
) -> Result<(), String> {
    let mut vctx = ValidationContext::new().with_input_file(input.clone());
    if let Some(edits_file) = &edits_file {
        vctx = vctx.with_input_file(edits_file.clone());
    }
    if let Some(output) = &output {
        vctx = vctx.with_output_file(output.clone());
    }
    validate_context(&vctx)?;

    // Edits from the file come first so that --set overrides them.
    let mut edits = match &edits_file {
        Some(path) => read_edits_file(path)?,
        None => Vec::new(),
    };
    for assignment in &assignments {
        edits.push(parse_assignment(assignment)?);
    }
    if edits.is_empty() {
        return Err("Nothing to merge; pass --set STR_NNNN=TEXT or --edits FILE".to_string());
    }

    let edits = normalize_edits(edits);
    let file = read_language_file(&input)?;
    let merged = LanguageFile::new(merge_language_file(file.text(), &edits));

    let out = output.as_deref().unwrap_or(&input);
    merged
        .write_to(out)
        .map_err(|e| format!("Error writing output: {}", e))?;
    println!("✅ Merged {} edit(s) into {}", edits.len(), out);
    Ok(())
}

/// Report ordering and format problems. Fails when any are found.
pub fn run_check_command(input: String) -> Result<(), String> {
    validate_context(&ValidationContext::new().with_input_file(input.clone()))?;
    let file = read_language_file(&input)?;
    let findings = validate_language_file(&file);

    if findings.is_empty() {
        println!("✅ {}: {} string(s), no problems found", input, file.len());
        return Ok(());
    }
    for finding in &findings {
        println!("❌ {}: {}", input, finding);
    }
    Err(format!("{} problem(s) found in {}", findings.len(), input))
}
