//! Code execution adapter
//!
//! Formats a candidate's source plus one test case into a runnable program
//! per language, dispatches it to the sandbox, and decides pass/fail by
//! normalized string equality. The only supported input format is a
//! comma-separated sequence of JSON values (a single value is a single
//! argument); the scanner is bracket- and string-aware, so nested
//! structures and strings containing commas parse correctly.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::traits::CodeSandbox;
use crate::types::{BackendFailure, ExecuteTestCase, Language, TestResult};

/// Parse a test case's input string into call arguments
///
/// Grammar: `value (',' value)*` where each value is a complete JSON
/// literal. Returns a descriptive error for malformed input instead of
/// guessing.
pub fn parse_arguments(input: &str) -> Result<Vec<Value>, String> {
    let text = input.trim();
    if text.is_empty() {
        return Err("empty test case input".to_string());
    }

    let mut arguments = Vec::new();
    let mut rest = text;

    loop {
        let (value_text, remainder) = split_first_value(rest)?;
        let value: Value = serde_json::from_str(value_text)
            .map_err(|e| format!("invalid JSON argument '{value_text}': {e}"))?;
        arguments.push(value);

        let remainder = remainder.trim_start();
        if remainder.is_empty() {
            return Ok(arguments);
        }
        rest = remainder
            .strip_prefix(',')
            .ok_or_else(|| format!("expected ',' between arguments near '{remainder}'"))?
            .trim_start();
        if rest.is_empty() {
            return Err("trailing comma in test case input".to_string());
        }
    }
}

/// Scan one complete JSON value off the front of `text`
fn split_first_value(text: &str) -> Result<(&str, &str), String> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &byte) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
                if depth == 0 {
                    return Ok((&text[..=i], &text[i + 1..]));
                }
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => depth += 1,
            b']' | b'}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced brackets in test case input".to_string())?;
                if depth == 0 {
                    return Ok((&text[..=i], &text[i + 1..]));
                }
            }
            b',' if depth == 0 => return Ok((&text[..i], &text[i..])),
            _ => {}
        }
    }

    if depth != 0 || in_string {
        return Err("unterminated value in test case input".to_string());
    }
    Ok((text, ""))
}

/// Render one argument as source text for the target language
fn render_argument(language: Language, value: &Value) -> String {
    match language {
        Language::Python => python_literal(value),
        // JSON literals are valid JavaScript; Java/C++ keep the JSON text
        // verbatim (primitives and strings work, composites are a known
        // limitation of the splice-style driver).
        Language::Javascript | Language::Java | Language::Cpp => value.to_string(),
    }
}

fn python_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(_) => value.to_string(),
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(python_literal).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Object(map) => {
            let rendered: Vec<String> = map
                .iter()
                .map(|(key, item)| {
                    format!(
                        "{}: {}",
                        Value::String(key.clone()),
                        python_literal(item)
                    )
                })
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
    }
}

fn java_main_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"public\s+static\s+void\s+main\s*\([^)]*\)\s*\{").expect("static regex")
    })
}

fn java_class_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"class\s+\w+\s*\{").expect("static regex"))
}

/// Splice the candidate's code and one test case into a runnable program
pub fn assemble_driver(language: Language, code: &str, arguments: &[Value]) -> String {
    let rendered: Vec<String> = arguments
        .iter()
        .map(|value| render_argument(language, value))
        .collect();
    let call_args = rendered.join(", ");

    match language {
        Language::Python => {
            format!("{code}\n\n# Test case input\nprint(solution({call_args}))\n")
        }
        Language::Javascript => {
            format!("{code}\n\n// Test case input\nconsole.log(solution({call_args}));\n")
        }
        Language::Java => {
            let mut assembled = code.to_string();
            if !assembled.contains("class Solution") {
                assembled = java_class_pattern()
                    .replace(&assembled, "class Solution {")
                    .into_owned();
            }
            if java_main_pattern().is_match(&assembled) {
                java_main_pattern()
                    .replace(&assembled, |caps: &regex::Captures<'_>| {
                        format!(
                            "{}\n        Solution solution = new Solution();\n        System.out.println(solution.solution({call_args}));",
                            &caps[0]
                        )
                    })
                    .into_owned()
            } else {
                format!(
                    "{assembled}\n\nclass Main {{\n    public static void main(String[] args) {{\n        Solution solution = new Solution();\n        System.out.println(solution.solution({call_args}));\n    }}\n}}\n"
                )
            }
        }
        Language::Cpp => {
            format!(
                "{code}\n\n// Test case input\nint main() {{\n    Solution solution;\n    std::cout << solution.solution({call_args}) << std::endl;\n    return 0;\n}}\n"
            )
        }
    }
}

/// Normalize sandbox output for comparison
///
/// Strips every whitespace character, then standardizes comma spacing.
/// Idempotent: normalizing an already-normalized string is a no-op.
pub fn normalize_output(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    stripped.replace(',', ", ")
}

/// Run every test case sequentially against the sandbox
///
/// Sandbox-side problems (non-2xx statuses, non-empty stderr, malformed
/// input) fail that one test case with the error text attached and the
/// remaining cases still run. An unreachable sandbox aborts the whole
/// call instead - there is no point dispatching the rest.
pub async fn run_test_cases<X>(
    sandbox: &X,
    language: Language,
    code: &str,
    cases: &[ExecuteTestCase],
) -> Result<Vec<TestResult>, BackendFailure>
where
    X: CodeSandbox + ?Sized,
{
    let mut results = Vec::with_capacity(cases.len());

    for case in cases {
        results.push(run_one_case(sandbox, language, code, case).await?);
    }

    Ok(results)
}

async fn run_one_case<X>(
    sandbox: &X,
    language: Language,
    code: &str,
    case: &ExecuteTestCase,
) -> Result<TestResult, BackendFailure>
where
    X: CodeSandbox + ?Sized,
{
    let arguments = match parse_arguments(&case.input) {
        Ok(arguments) => arguments,
        Err(message) => {
            return Ok(TestResult {
                input: case.input.clone(),
                expected_output: case.expected_output.clone(),
                actual_output: String::new(),
                passed: false,
                error: Some(message),
            })
        }
    };

    let source = assemble_driver(language, code, &arguments);

    match sandbox.execute(language, language.version(), &source).await {
        Ok(output) => {
            let actual = output.stdout.trim().to_string();
            let stderr = output.stderr.trim();
            let passed = stderr.is_empty()
                && normalize_output(&actual) == normalize_output(&case.expected_output);

            Ok(TestResult {
                input: case.input.clone(),
                expected_output: case.expected_output.clone(),
                actual_output: actual,
                passed,
                error: if stderr.is_empty() {
                    None
                } else {
                    Some(stderr.to_string())
                },
            })
        }
        Err(BackendFailure::NetworkError(message)) => Err(BackendFailure::NetworkError(message)),
        Err(failure) => Ok(TestResult {
            input: case.input.clone(),
            expected_output: case.expected_output.clone(),
            actual_output: String::new(),
            passed: false,
            error: Some(format!("{failure:?}")),
        }),
    }
}
