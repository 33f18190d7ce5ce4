//! Shared data types for the interview backend
//!
//! API payloads, problem/test-case shapes, and the failure taxonomy for
//! the external text-generation and code-sandbox backends.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Languages the execution adapter knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Java,
    Cpp,
}

impl Language {
    /// Parse a client-supplied language tag (case-insensitive)
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "python" => Some(Language::Python),
            "javascript" => Some(Language::Javascript),
            "java" => Some(Language::Java),
            "cpp" => Some(Language::Cpp),
            _ => None,
        }
    }

    /// Wire tag sent to the sandbox
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Java => "java",
            Language::Cpp => "cpp",
        }
    }

    /// Runtime version from the static compatibility table
    pub fn version(&self) -> &'static str {
        match self {
            Language::Python => "3.10",
            Language::Javascript => "18.15.0",
            Language::Java => "15.0.2",
            Language::Cpp => "10.2.0",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target difficulty for a synthesized DSA problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    MediumHard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::MediumHard => write!(f, "medium-to-hard"),
        }
    }
}

/// A single test case attached to a DSA problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemTestCase {
    pub input: String,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A DSA problem as presented to the candidate
///
/// Either synthesized by the text-generation backend (and repaired by the
/// interpreter) or drawn from the bank's hand-authored fallback. Test-case
/// inputs and outputs are JSON-literal strings after coercion, and every
/// skeleton entry point is a function named `solution`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsaProblem {
    pub title: String,
    #[serde(default)]
    pub story: String,
    pub problem: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub test_cases: Vec<ProblemTestCase>,
    #[serde(default)]
    pub hidden_test_cases: Vec<ProblemTestCase>,
    pub skeleton_code: HashMap<String, String>,
}

/// Outcome of running one test case against the sandbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    pub passed: bool,
    pub error: Option<String>,
}

/// Raw stdout/stderr captured from one sandbox run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Failure reasons for requests to the external backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendFailure {
    /// Network/connection error
    NetworkError(String),
    /// Rate limit exceeded
    RateLimitExceeded,
    /// Model not found or unavailable
    ModelUnavailable(String),
    /// Service temporarily unavailable
    ServiceUnavailable,
    /// Server error from the backend
    ServerError(String),
    /// Response body did not match the expected shape
    InvalidResponse(String),
}

/// Sampling options forwarded to the text-generation backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub repeat_penalty: f32,
    pub stop: Vec<String>,
}

impl GenerationOptions {
    /// Focused options for dialogue turns
    pub fn dialogue() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.7,
            max_tokens: 600,
            repeat_penalty: 1.1,
            stop: vec![
                "\n\n\n".to_string(),
                "Human:".to_string(),
                "Assistant:".to_string(),
            ],
        }
    }

    /// Looser options for problem synthesis; no stop sequences so the
    /// JSON document is not truncated mid-object
    pub fn synthesis() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 1200,
            repeat_penalty: 1.1,
            stop: Vec::new(),
        }
    }
}

/// Discriminates ordinary chat turns from code-centric turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnType {
    #[default]
    Chat,
    CodeAnalysis,
    SolutionSubmission,
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub turn_type: TurnType,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub results: Option<serde_json::Value>,
}

/// Body of `POST /api/code/execute`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub test_cases: Vec<ExecuteTestCase>,
    #[serde(default)]
    pub is_submission: bool,
}

/// One test case supplied to the execution endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteTestCase {
    pub input: String,
    pub expected_output: String,
}
