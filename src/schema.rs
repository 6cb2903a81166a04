//! Request and result types shared by the engine, the HTTP surface and the CLI
//!
//! Every result type here is produced either from completion-service output or
//! by [`crate::fallback`]. Both paths build the same structs, so the serialized
//! shape never reveals which one produced a value.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::lang::Lang;

// ============================================================================
// Requests
// ============================================================================

/// Code text plus the language the caller claims it is written in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSubmission {
    pub code: String,
    pub language: Lang,
}

impl CodeSubmission {
    pub fn new(code: impl Into<String>, language: Lang) -> Self {
        Self {
            code: code.into(),
            language,
        }
    }
}

/// Documentation requests carry the same fields as a submission
pub type DocRequest = CodeSubmission;

/// Impact requests carry the same fields as a submission
pub type ImpactRequest = CodeSubmission;

/// Free-text description of the boilerplate to generate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub language: Lang,
}

// ============================================================================
// Review
// ============================================================================

/// Severity of a review issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    #[default]
    #[serde(alias = "Info", alias = "INFO")]
    Info,
    #[serde(alias = "Warning", alias = "WARNING")]
    Warning,
    #[serde(alias = "Error", alias = "ERROR")]
    Error,
}

/// Severity of a security finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecuritySeverity {
    #[default]
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "High", alias = "HIGH")]
    High,
    #[serde(alias = "Critical", alias = "CRITICAL")]
    Critical,
}

/// A single bug, performance or style finding
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Issue {
    #[serde(deserialize_with = "null_as_default")]
    pub line: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub severity: IssueSeverity,
    #[serde(deserialize_with = "null_as_default")]
    pub reasoning: String,
    /// Serialized as `null` when absent
    #[serde(alias = "fix_example")]
    pub fix_example: Option<String>,
}

/// A security vulnerability finding
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityIssue {
    #[serde(deserialize_with = "null_as_default")]
    pub line: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub severity: SecuritySeverity,
    #[serde(deserialize_with = "null_as_default")]
    pub reasoning: String,
}

/// Full review of a submission
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewResult {
    /// 0 (worst) to 100 (best)
    #[serde(deserialize_with = "deserialize_health_score")]
    pub code_health_score: u8,
    #[serde(deserialize_with = "null_as_default")]
    pub issues: Vec<Issue>,
    #[serde(deserialize_with = "null_as_default")]
    pub security_issues: Vec<SecurityIssue>,
    /// Time complexity, Big O notation
    #[serde(deserialize_with = "null_as_default")]
    pub complexity: String,
    /// Space complexity, Big O notation
    #[serde(deserialize_with = "null_as_default")]
    pub space_complexity: String,
    #[serde(deserialize_with = "null_as_default")]
    pub refactored_code: String,
}

/// Accept any JSON number (or null) and clamp it into 0..=100
fn deserialize_health_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        Some(raw) if !raw.is_nan() => Ok(raw.round().clamp(0.0, 100.0) as u8),
        _ => Ok(0),
    }
}

/// Explicit `null` reads the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Generation and documentation
// ============================================================================

/// Generated boilerplate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCode {
    pub code: String,
}

/// Generated markdown documentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocResult {
    pub docs: String,
}

// ============================================================================
// Impact
// ============================================================================

/// Estimated blast radius of a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(alias = "low", alias = "LOW")]
    Low,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "high", alias = "HIGH")]
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// A file likely touched by the change
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AffectedFile {
    pub file: String,
    pub reason: String,
}

/// Kind of node in the impact graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// The submitted change itself
    Change,
    #[default]
    File,
    Service,
    Database,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: u32,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: u32,
    pub to: u32,
}

/// Dependency graph rendered by clients
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl VisualGraph {
    /// Check that every edge endpoint names an existing node and ids are unique
    pub fn validate(&self) -> Result<(), String> {
        let mut ids = HashSet::new();
        for node in &self.nodes {
            if !ids.insert(node.id) {
                return Err(format!("duplicate node id {}", node.id));
            }
        }

        for edge in &self.edges {
            if !ids.contains(&edge.from) {
                return Err(format!("edge references unknown node {}", edge.from));
            }
            if !ids.contains(&edge.to) {
                return Err(format!("edge references unknown node {}", edge.to));
            }
        }

        Ok(())
    }

    /// Ids of nodes with no incoming edge, in node order
    pub fn source_nodes(&self) -> Vec<u32> {
        let targets: HashSet<u32> = self.edges.iter().map(|e| e.to).collect();
        self.nodes
            .iter()
            .map(|n| n.id)
            .filter(|id| !targets.contains(id))
            .collect()
    }
}

/// Estimated impact of a code change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub affected_files: Vec<AffectedFile>,
    #[serde(default)]
    pub dependent_services: Vec<String>,
    #[serde(default)]
    pub visual_graph: VisualGraph,
}

// ============================================================================
// Provenance
// ============================================================================

/// Which pipeline stage produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Decoded from completion-service output
    Service,
    /// Synthesized locally after a failure or without credentials
    Fallback,
    /// Short-circuited by the language detector
    Detector,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Fallback => "fallback",
            Self::Detector => "detector",
        }
    }
}

/// A capability result together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub result: T,
    pub provenance: Provenance,
}

impl<T> Outcome<T> {
    pub fn new(result: T, provenance: Provenance) -> Self {
        Self { result, provenance }
    }
}
