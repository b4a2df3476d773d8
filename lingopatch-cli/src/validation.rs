use lingopatch::{Edit, is_string_id};
use std::path::Path;
use unic_langid::LanguageIdentifier;

/// Validation context for different command types
#[derive(Debug, Default)]
pub struct ValidationContext {
    pub input_files: Vec<String>,
    pub output_file: Option<String>,
    pub language_code: Option<String>,
    pub string_ids: Vec<String>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_file(mut self, file: String) -> Self {
        self.input_files.push(file);
        self
    }

    pub fn with_output_file(mut self, file: String) -> Self {
        self.output_file = Some(file);
        self
    }

    pub fn with_language_code(mut self, lang: String) -> Self {
        self.language_code = Some(lang);
        self
    }

    pub fn with_string_id(mut self, id: String) -> Self {
        self.string_ids.push(id);
        self
    }
}

/// Validate file path exists and is readable
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if let Some(parent) = path_obj.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                return Err(format!("Cannot create output directory: {}", e));
            }
        }
    }

    Ok(())
}

/// Validate a language file code such as `de-DE`.
///
/// Language files are named `<language>-<REGION>`, so both parts are required
/// and the code has to be written in canonical case.
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    let lang_id = lang.parse::<LanguageIdentifier>().map_err(|_| {
        format!(
            "Invalid language code format: {}. Expected a code like de-DE",
            lang
        )
    })?;

    if lang_id.region.is_none() {
        return Err(format!(
            "Language code {} has no region. Expected a code like {}-{}",
            lang,
            lang_id.language,
            lang_id.language.as_str().to_uppercase()
        ));
    }

    let canonical = lang_id.to_string();
    if canonical != lang {
        return Err(format!(
            "Language code {} is not in canonical form; did you mean {}?",
            lang, canonical
        ));
    }

    Ok(())
}

/// Validate a `STR_NNNN` string id.
pub fn validate_string_id(id: &str) -> Result<(), String> {
    if is_string_id(id) {
        Ok(())
    } else {
        Err(format!("Invalid string id: {}. Expected STR_ followed by 4 digits", id))
    }
}

/// Parse a `STR_NNNN=text` assignment from the command line.
pub fn parse_assignment(assignment: &str) -> Result<Edit, String> {
    let (id, text) = assignment
        .split_once('=')
        .ok_or_else(|| format!("Invalid assignment: {}. Expected STR_NNNN=TEXT", assignment))?;
    let id = id.trim();
    validate_string_id(id)?;
    if text.contains('\n') || text.contains('\r') {
        return Err(format!("Text for {} must be a single line", id));
    }
    Ok(Edit::new(id, text))
}

/// Validate an entire validation context
pub fn validate_context(context: &ValidationContext) -> Result<(), String> {
    for (i, input) in context.input_files.iter().enumerate() {
        validate_file_path(input).map_err(|e| format!("Input file {}: {}", i + 1, e))?;
    }

    if let Some(output) = &context.output_file {
        validate_output_path(output)?;
    }

    if let Some(lang) = &context.language_code {
        validate_language_code(lang)?;
    }

    for id in &context.string_ids {
        validate_string_id(id)?;
    }

    Ok(())
}
