//! Prompt construction for each capability
//!
//! Builders only interpolate the submission; they never inspect or sanitize it.

use crate::schema::{CodeSubmission, DocRequest, GenerationRequest, ImpactRequest};

/// System instruction plus user payload sent to the completion service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_instruction: String,
    pub user_payload: String,
}

impl Prompt {
    pub fn new(system_instruction: impl Into<String>, user_payload: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            user_payload: user_payload.into(),
        }
    }
}

const REVIEW_SYSTEM: &str = "You are a senior developer code mentor.";

const REVIEW_SHAPE: &str = r#"{
    "codeHealthScore": number (0-100 integer),
    "issues": [
        {
            "line": number,
            "message": "concise description",
            "severity": "error"|"warning"|"info",
            "reasoning": "detailed explanation of why this is an issue",
            "fixExample": "short code snippet showing the fix"
        }
    ],
    "securityIssues": [
        {
            "line": number,
            "message": "security vulnerability description",
            "severity": "critical"|"high"|"medium"|"low",
            "reasoning": "why this is a security risk"
        }
    ],
    "complexity": "Big O notation string (Time)",
    "spaceComplexity": "Big O notation string (Space)",
    "refactoredCode": "string (the full refactored code)"
}"#;

const IMPACT_SHAPE: &str = r#"{
    "riskLevel": "Low" | "Medium" | "High",
    "affectedFiles": [
        { "file": "string (likely path, e.g. 'src/components/Parent.jsx')", "reason": "string (specific technical reason)" }
    ],
    "dependentServices": ["string (e.g. 'AuthService')"],
    "visualGraph": {
        "nodes": [
            { "id": 1, "label": "Your Code", "type": "change" },
            { "id": 2, "label": "string (inferred dependency)", "type": "file" | "service" | "database" }
        ],
        "edges": [
            { "from": 1, "to": 2 }
        ]
    }
}"#;

/// Bug, performance, security and style review
pub fn review(submission: &CodeSubmission) -> Prompt {
    let payload = format!(
        "Analyze the following {lang} code for bugs, performance issues (time/space complexity), \
security vulnerabilities (OWASP Top 10), and adherence to best practices.\n\n\
Return the response in strictly valid JSON format with this structure:\n{shape}\n\
Do not include markdown formatting like ```json. Just the raw JSON string.\n\n\
Code:\n{code}",
        lang = submission.language,
        shape = REVIEW_SHAPE,
        code = submission.code,
    );
    Prompt::new(REVIEW_SYSTEM, payload)
}

/// Boilerplate generation from a free-text request
pub fn generate(request: &GenerationRequest) -> Prompt {
    let system = format!(
        "You are an expert {} architect.\n\
Generate secure, production-ready boilerplate code for the user's request.\n\
Include necessary imports, error handling, and comments explaining why each pattern is used.\n\
Use modern syntax and high standards.\n\
Return ONLY the code, no markdown backticks.",
        request.language
    );
    Prompt::new(system, request.prompt.clone())
}

/// Markdown documentation for a piece of code
pub fn document(request: &DocRequest) -> Prompt {
    let system = format!(
        "You are a Technical Writer.\n\
Generate comprehensive PR-ready documentation for the provided {} code.\n\
Include:\n\
1. Title & Description\n\
2. Installation/Usage\n\
3. API Reference (Inputs/Outputs)\n\
4. Example Usage\n\
Return ONLY the valid Markdown string.",
        request.language
    );
    Prompt::new(system, request.code.clone())
}

/// Change-impact estimate with a dependency graph
pub fn impact(request: &ImpactRequest) -> Prompt {
    let system = format!(
        "You are a Senior Software Architect and Code Forensic Expert.\n\
Analyze the provided {lang} code snippet deeply.\n\n\
1. DETECT CONTEXT: Infer the likely project type (e.g. React App, Express API, Data Script) from imports and syntax.\n\
2. TRACE DEPENDENCIES: Look for imports, exported functions, and global changes.\n\
3. ASSESS RISK:\n\
   - High: schema changes, deletion logic, auth modifications, global config changes, or infinite loops.\n\
   - Medium: new feature logic, API response shape changes, potential performance bottlenecks.\n\
   - Low: UI styling updates, internal helper refactors, comment changes.\n\
4. SIMULATE IMPACT:\n\
   - For a UI component, list likely parent pages.\n\
   - For a utility, list likely consumer services.\n\
   - For a database query, list API endpoints using it.\n\n\
Node 1 must be the submitted change (type \"change\") and must have no incoming edges.\n\
Return strictly valid JSON (no markdown) with this structure:\n{shape}",
        lang = request.language,
        shape = IMPACT_SHAPE,
    );
    Prompt::new(system, format!("Code Change:\n{}", request.code))
}
