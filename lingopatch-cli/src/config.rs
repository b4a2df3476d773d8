use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use lingopatch::Repo;
use lingopatch::github::OAuthApp;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "lingopatch.toml";

/// Overrides the data directory.
pub const HOME_ENV: &str = "LINGOPATCH_HOME";

const APP_DIR_NAME: &str = "lingopatch";
const TOKEN_FILE_NAME: &str = "token";
const CACHE_FILE_NAME: &str = "edits.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_upstream_owner")]
    pub upstream_owner: String,
    #[serde(default = "default_upstream_repo")]
    pub upstream_repo: String,
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
    #[serde(default = "default_language_dir")]
    pub language_dir: String,
    #[serde(default = "default_oauth_client_id")]
    pub oauth_client_id: String,
    #[serde(default = "default_oauth_redirect_uri")]
    pub oauth_redirect_uri: String,
    #[serde(default = "default_oauth_scope")]
    pub oauth_scope: String,
    /// Where the token and the edit cache live.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_api_url() -> String {
    lingopatch::github::DEFAULT_API_URL.to_string()
}

fn default_upstream_owner() -> String {
    "OpenRCT2".to_string()
}

fn default_upstream_repo() -> String {
    "Localisation".to_string()
}

fn default_base_branch() -> String {
    "master".to_string()
}

fn default_language_dir() -> String {
    "data/language".to_string()
}

fn default_oauth_client_id() -> String {
    "Ov23ct0fDobJn5hdYuQ1".to_string()
}

fn default_oauth_redirect_uri() -> String {
    "https://gh-oauth-handler.sadret.workers.dev/callback".to_string()
}

fn default_oauth_scope() -> String {
    "public_repo".to_string()
}

fn default_data_dir() -> PathBuf {
    data_dir_from(std::env::var_os(HOME_ENV), dirs::data_dir())
}

/// The override when set, else `<platform data dir>/lingopatch`. Empty when
/// neither is known, which `validate` rejects.
fn data_dir_from(home_override: Option<OsString>, platform_dir: Option<PathBuf>) -> PathBuf {
    home_override
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .or_else(|| platform_dir.map(|dir| dir.join(APP_DIR_NAME)))
        .unwrap_or_default()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            upstream_owner: default_upstream_owner(),
            upstream_repo: default_upstream_repo(),
            base_branch: default_base_branch(),
            language_dir: default_language_dir(),
            oauth_client_id: default_oauth_client_id(),
            oauth_redirect_uri: default_oauth_redirect_uri(),
            oauth_scope: default_oauth_scope(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if !self.api_url.starts_with("https://") && !self.api_url.starts_with("http://") {
            return Err(format!("Invalid 'api_url': \"{}\"", self.api_url));
        }
        for (name, value) in [
            ("upstream_owner", &self.upstream_owner),
            ("upstream_repo", &self.upstream_repo),
            ("base_branch", &self.base_branch),
        ] {
            if value.trim().is_empty() || value.contains('/') {
                return Err(format!("Invalid '{}': \"{}\"", name, value));
            }
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(format!(
                "Cannot determine a data directory; set {} or 'data_dir'",
                HOME_ENV
            ));
        }
        Ok(())
    }

    pub fn upstream(&self) -> Repo {
        Repo::new(&self.upstream_owner, &self.upstream_repo)
    }

    pub fn language_file_path(&self, language: &str) -> String {
        format!("{}/{}.txt", self.language_dir.trim_end_matches('/'), language)
    }

    pub fn oauth_app(&self) -> OAuthApp {
        OAuthApp::new(&self.oauth_client_id, &self.oauth_redirect_uri).with_scope(&self.oauth_scope)
    }

    pub fn token_path(&self) -> PathBuf {
        self.data_dir.join(TOKEN_FILE_NAME)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join(CACHE_FILE_NAME)
    }
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

pub fn parse_config(content: &str) -> Result<Config, String> {
    let config: Config = toml::from_str(content).map_err(|e| e.to_string())?;
    config.validate()?;
    Ok(config)
}

/// Load `explicit` if given, otherwise the nearest `lingopatch.toml`, otherwise
/// the defaults.
pub fn load_config(explicit: Option<&Path>, start_dir: &Path) -> Result<Config, String> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(start_dir),
    };
    let Some(path) = path else {
        let config = Config::default();
        config.validate()?;
        return Ok(config);
    };

    let content = fs::read_to_string(&path)
        .map_err(|e| format!("Cannot read config file {}: {}", path.display(), e))?;
    let config = parse_config(&content)
        .map_err(|e| format!("Failed to parse config file {}: {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
