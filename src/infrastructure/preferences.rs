use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::errors::PreferenceError;

/// UI language. Anything unrecognized falls back to Chinese.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Zh, Language::En];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Zh => "中文",
            Language::En => "English",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceFile {
    #[serde(default)]
    language: Option<String>,
}

/// The one piece of client state kept across sessions.
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved language, or the default when nothing usable is stored.
    pub fn load_language(&self) -> Language {
        match self.read() {
            Ok(file) => match file.language.as_deref() {
                Some(code) => Language::from_code(code).unwrap_or_else(|| {
                    warn!("Ignoring unsupported saved language '{}'", code);
                    Language::default()
                }),
                None => Language::default(),
            },
            Err(PreferenceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No preference file at {}", self.path.display());
                Language::default()
            }
            Err(e) => {
                warn!("Could not read preferences from {}: {}", self.path.display(), e);
                Language::default()
            }
        }
    }

    pub fn save_language(&self, language: Language) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = PreferenceFile {
            language: Some(language.code().to_string()),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        info!("Language set to {}", language.code());
        Ok(())
    }

    /// Store a language given by code. Unknown codes are rejected and
    /// leave the saved value untouched.
    pub fn set_language_code(&self, code: &str) -> Result<Language, PreferenceError> {
        let language = Language::from_code(code)
            .ok_or_else(|| PreferenceError::UnsupportedLanguage(code.to_string()))?;
        self.save_language(language)?;
        Ok(language)
    }

    fn read(&self) -> Result<PreferenceFile, PreferenceError> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
