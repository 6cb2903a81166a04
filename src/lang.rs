//! Language tags accepted on submissions

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Languages a submission may claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Lang {
    JavaScript,
    TypeScript,
    Python,
    Java,
    Cpp,
    C,
    Go,
    Rust,
}

impl Lang {
    /// Every supported tag, in display order
    pub const ALL: [Lang; 8] = [
        Self::JavaScript,
        Self::TypeScript,
        Self::Python,
        Self::Java,
        Self::Cpp,
        Self::C,
        Self::Go,
        Self::Rust,
    ];

    /// Parse a language tag as sent by clients (case-insensitive)
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "javascript" | "js" | "jsx" => Ok(Self::JavaScript),
            "typescript" | "ts" | "tsx" => Ok(Self::TypeScript),
            "python" | "py" => Ok(Self::Python),
            "java" => Ok(Self::Java),
            "cpp" | "c++" | "cxx" => Ok(Self::Cpp),
            "c" => Ok(Self::C),
            "go" | "golang" => Ok(Self::Go),
            "rust" | "rs" => Ok(Self::Rust),
            _ => Err(EngineError::UnsupportedLanguage {
                name: name.to_string(),
            }),
        }
    }

    /// Detect language from file path extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| EngineError::UnsupportedLanguage {
                name: "none".to_string(),
            })?;

        Self::from_extension(ext)
    }

    /// Detect language from file extension string
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" | "jsx" => Ok(Self::JavaScript),
            "ts" | "mts" | "cts" | "tsx" => Ok(Self::TypeScript),
            "py" | "pyi" => Ok(Self::Python),
            "java" => Ok(Self::Java),
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "hh" => Ok(Self::Cpp),
            "c" | "h" => Ok(Self::C),
            "go" => Ok(Self::Go),
            "rs" => Ok(Self::Rust),
            _ => Err(EngineError::UnsupportedLanguage {
                name: ext.to_string(),
            }),
        }
    }

    /// Get the canonical name of the language
    pub fn name(&self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Go => "go",
            Self::Rust => "rust",
        }
    }

    /// Prefix for a single-line comment
    pub fn line_comment(&self) -> &'static str {
        match self {
            Self::Python => "#",
            _ => "//",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Lang {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl TryFrom<String> for Lang {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_name(&value)
    }
}

impl From<Lang> for String {
    fn from(lang: Lang) -> Self {
        lang.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(Lang::from_name("Python").unwrap(), Lang::Python);
        assert_eq!(Lang::from_name("CPP").unwrap(), Lang::Cpp);
        assert_eq!(Lang::from_name("c++").unwrap(), Lang::Cpp);
        assert_eq!(Lang::from_name(" javascript ").unwrap(), Lang::JavaScript);
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            Lang::from_name("cobol"),
            Err(EngineError::UnsupportedLanguage { .. })
        ));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            Lang::from_path(&PathBuf::from("src/app.tsx")).unwrap(),
            Lang::TypeScript
        );
        assert_eq!(
            Lang::from_path(&PathBuf::from("main.cc")).unwrap(),
            Lang::Cpp
        );
        assert!(Lang::from_path(&PathBuf::from("Makefile")).is_err());
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        let json = serde_json::to_string(&Lang::Cpp).unwrap();
        assert_eq!(json, "\"cpp\"");

        let lang: Lang = serde_json::from_str("\"Java\"").unwrap();
        assert_eq!(lang, Lang::Java);

        assert!(serde_json::from_str::<Lang>("\"brainfuck\"").is_err());
    }

    #[test]
    fn test_line_comment() {
        assert_eq!(Lang::Python.line_comment(), "#");
        assert_eq!(Lang::Go.line_comment(), "//");
    }
}
