//! Where the client gets its bearer token from.
//!
//! A provider is asked once per request. The client never writes back to it:
//! a token rejected by GitHub stays in place until the caller removes it.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

pub trait CredentialProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// A fixed token, or none for anonymous access.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken(Some(token.into()))
    }

    pub fn anonymous() -> Self {
        StaticToken(None)
    }
}

impl CredentialProvider for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvToken {
    variable: String,
}

impl EnvToken {
    pub fn new(variable: impl Into<String>) -> Self {
        EnvToken {
            variable: variable.into(),
        }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        EnvToken::new("GITHUB_TOKEN")
    }
}

impl CredentialProvider for EnvToken {
    fn token(&self) -> Option<String> {
        std::env::var(&self.variable)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// A token persisted in a plain text file.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the token, readable by the owner only on Unix.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        // `mode` only applies to newly created files.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(format!("{}\n", token.trim()).as_bytes())?;
        Ok(())
    }

    /// Remove the stored token. Removing a missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl CredentialProvider for TokenFile {
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read token file");
                None
            }
        }
    }
}

/// Tries each provider in order and uses the first token found.
#[derive(Default)]
pub struct FirstAvailable {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl FirstAvailable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl CredentialProvider for FirstAvailable {
    fn token(&self) -> Option<String> {
        self.providers.iter().find_map(|provider| provider.token())
    }
}
