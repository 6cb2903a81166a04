//! Heuristic check that a submission's code matches its claimed language
//!
//! Each signature language owns a fixed list of literal tokens (keywords,
//! standard-library idioms, punctuation idioms). A language's score is the
//! total number of non-overlapping occurrences of its tokens in the code. The
//! verdict only rejects a submission when another language clearly dominates:
//!
//! 1. `max_score <= min_signal` is too little signal to judge: Valid
//! 2. detected language equals the claim: Valid
//! 3. `claimed_score < max_score * claimed_ratio`: Mismatch, otherwise Valid

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::lang::Lang;

/// Signature tokens per language, in evaluation order (first wins ties)
const SIGNATURES: &[(Lang, &[&str])] = &[
    (
        Lang::JavaScript,
        &[
            "function",
            "const",
            "let",
            "console.log",
            "=>",
            "import",
            "export",
            "document.",
            "window.",
            "===",
            "null",
            "undefined",
        ],
    ),
    (
        Lang::Python,
        &[
            "def ",
            "import ",
            "print(",
            "class ",
            "if __name__",
            "return",
            "elif ",
            "else:",
            "try:",
            "except:",
            "None",
            "True",
            "False",
        ],
    ),
    (
        Lang::Java,
        &[
            "public class",
            "System.out.println",
            "public static void main",
            "package ",
            "import java",
            "private ",
            "protected ",
            "String ",
            "new ",
        ],
    ),
    (
        Lang::Cpp,
        &[
            "#include",
            "std::cout",
            "int main",
            "using namespace",
            "vector<",
            "cout <<",
            "cin >>",
            "::",
            "->",
            "auto ",
            "#define",
        ],
    ),
];

/// Escaped token patterns, compiled once per process
static SIGNATURE_PATTERNS: Lazy<Vec<(Lang, Vec<Regex>)>> = Lazy::new(|| {
    SIGNATURES
        .iter()
        .map(|(lang, tokens)| {
            let patterns = tokens
                .iter()
                .map(|token| {
                    Regex::new(&regex::escape(token)).expect("escaped literal is a valid regex")
                })
                .collect();
            (*lang, patterns)
        })
        .collect()
});

/// Tunable decision thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionThresholds {
    /// Scores at or below this never produce a mismatch
    pub min_signal: u32,
    /// Claimed score must reach this fraction of the max score to stay plausible
    pub claimed_ratio: f64,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            min_signal: 1,
            claimed_ratio: 0.5,
        }
    }
}

/// Per-language signature counts, in evaluation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageScoreTable {
    entries: Vec<(Lang, u32)>,
}

impl LanguageScoreTable {
    /// Score `code` against every signature language
    pub fn compute(code: &str) -> Self {
        let entries = SIGNATURE_PATTERNS
            .iter()
            .map(|(lang, patterns)| {
                let score = patterns
                    .iter()
                    .map(|re| re.find_iter(code).count() as u32)
                    .sum();
                (*lang, score)
            })
            .collect();
        Self { entries }
    }

    /// Score for `lang`, or `None` when it has no signature list
    pub fn get(&self, lang: Lang) -> Option<u32> {
        self.entries
            .iter()
            .find(|(l, _)| *l == lang)
            .map(|(_, score)| *score)
    }

    /// Language with the strictly highest score; earlier entries win ties.
    /// Returns `None` when every score is zero.
    pub fn best(&self) -> Option<(Lang, u32)> {
        let mut best: Option<(Lang, u32)> = None;
        for &(lang, score) in &self.entries {
            if score > best.map(|(_, s)| s).unwrap_or(0) {
                best = Some((lang, score));
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Lang, u32)> {
        self.entries.iter()
    }
}

/// Outcome of checking a claimed language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionVerdict {
    Valid,
    Mismatch {
        detected: Lang,
        detected_score: u32,
        claimed_score: u32,
    },
}

impl DetectionVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Human-readable explanation for a mismatch
    pub fn message(&self, claimed: Lang) -> Option<String> {
        match self {
            Self::Valid => None,
            Self::Mismatch {
                detected,
                detected_score,
                claimed_score,
            } => Some(format!(
                "Language Mismatch: This looks like {} (Score: {}) but you selected {} (Score: {}).",
                detected, detected_score, claimed, claimed_score
            )),
        }
    }
}

/// Language detector with fixed thresholds
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageDetector {
    thresholds: DetectionThresholds,
}

impl LanguageDetector {
    pub fn new(thresholds: DetectionThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> DetectionThresholds {
        self.thresholds
    }

    /// Decide whether `code` plausibly is written in `claimed`
    pub fn detect(&self, code: &str, claimed: Lang) -> DetectionVerdict {
        let scores = LanguageScoreTable::compute(code);

        tracing::debug!(
            claimed = %claimed,
            scores = ?scores.entries,
            "language signature scores"
        );

        self.verdict(&scores, claimed)
    }

    /// Apply the decision rule to an already computed table
    pub fn verdict(&self, scores: &LanguageScoreTable, claimed: Lang) -> DetectionVerdict {
        let Some((detected, max_score)) = scores.best() else {
            return DetectionVerdict::Valid;
        };

        if max_score <= self.thresholds.min_signal {
            return DetectionVerdict::Valid;
        }

        if detected == claimed {
            return DetectionVerdict::Valid;
        }

        let claimed_score = scores.get(claimed).unwrap_or(0);
        if (claimed_score as f64) < (max_score as f64) * self.thresholds.claimed_ratio {
            DetectionVerdict::Mismatch {
                detected,
                detected_score: max_score,
                claimed_score,
            }
        } else {
            DetectionVerdict::Valid
        }
    }
}
