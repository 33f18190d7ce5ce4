//! Canned prompt templates for the interviewer persona
//!
//! Each interview turn maps to exactly one template here; the phase
//! controller fills in the candidate's latest message and any selected
//! question or problem context.

use crate::types::{Difficulty, DsaProblem};

/// System preamble shared by every dialogue prompt
const BASE_SYSTEM_PROMPT: &str = "You are \"Code Mock\", a technical interviewer conducting a real interview. \
You must follow the interview flow and respond as the interviewer, not generate scripts or examples. \
You are having a conversation with a real candidate right now.\n\n\
IMPORTANT: You are the interviewer. Respond directly to the candidate. \
Do NOT create scripts, examples, or hypothetical conversations.";

/// Fixed acknowledgment once the interview is complete
pub const COMPLETE_ACKNOWLEDGMENT: &str = "The interview is already complete - thanks again for your time! \
Feel free to reset the session if you'd like to practice another round with Code Mock.";

/// First introduction question: greeting plus technical background
pub fn intro_background(message: &str) -> String {
    format!(
        r#"{BASE_SYSTEM_PROMPT}

RESPOND AS THE INTERVIEWER NOW. The candidate said: "{message}"

You are Code Mock, the interviewer. Introduce yourself and ask them about their technical background. Respond directly as the interviewer speaking to this candidate.

Say something like: "Hello there! I'm Code Mock, and I'll be your technical interviewer today. I'm really excited to get to know you and explore your technical skills together! To get started, could you please introduce yourself and tell me about your technical background?""#
    )
}

/// Second introduction question: a project they are proud of
pub fn intro_project(message: &str) -> String {
    format!(
        r#"{BASE_SYSTEM_PROMPT}

The candidate just answered your first introduction question: "{message}"

Acknowledge their response warmly and ask your second introduction question about their projects and experience.

Ask them to tell you about a recent project they're particularly proud of, including:
- What the project was about and what problem it solved
- What technologies and tools they used
- Their specific role and contributions
- Any interesting challenges they faced and how they overcame them

Show genuine interest in their project experience."#
    )
}

/// Transition into core topics with the first selected question
pub fn core_topic_first(message: &str, question: &str) -> String {
    format!(
        r#"{BASE_SYSTEM_PROMPT}

The candidate just answered your second introduction question: "{message}"

Acknowledge their project experience warmly, then transition to technical core topics. Ask your first core CS question.

Example response format:
"That sounds like a really interesting project! I can see you've got hands-on experience applying your technical skills.

Now let's dive into some core computer science concepts. These help me understand your foundational knowledge.

{question}

Take your time to think through this - I'm looking for both your theoretical understanding and any practical insights you might have."

Be encouraging and show genuine interest in their technical knowledge."#
    )
}

/// Second core question from a different topic, with feedback on the first
pub fn core_topic_second(message: &str, question: &str) -> String {
    format!(
        r#"{BASE_SYSTEM_PROMPT}

The candidate just answered your first core topic question: "{message}"

First, provide brief feedback on their answer (be encouraging but honest). If they made mistakes, gently correct them. Then ask your second core topic question from a different area.

Example response format:
"[Brief feedback on their answer - correct any mistakes gently]

That's a solid understanding! Let me ask you about a different area now.

{question}

Take your time to think through this - I'm looking for both theoretical understanding and practical insights."

Be encouraging but thorough in your feedback."#
    )
}

/// Ask the backend to synthesize a brand-new problem as a JSON document
pub fn synthesize_problem(difficulty: Difficulty) -> String {
    let difficulty_guidance = match difficulty {
        Difficulty::Easy => {
            "The problem must be EASY: solvable with a single loop or a basic \
             data structure, suitable as a warm-up coding question."
        }
        Difficulty::MediumHard => {
            "The problem must be MEDIUM-TO-HARD: it should reward an efficient \
             algorithm (hashing, two pointers, sorting, dynamic programming) \
             over the brute-force approach."
        }
    };

    format!(
        r#"You generate coding interview problems as machine-readable JSON.

Create one original {difficulty} data-structures-and-algorithms problem wrapped in a short real-world story. {difficulty_guidance}

Respond with ONLY a JSON object in this exact shape, and nothing else:

{{
  "title": "Short human-readable title",
  "story": "Two or three sentences of real-world framing",
  "problem": "Precise statement of what to compute",
  "requirements": ["Input: ...", "Output: ...", "Constraint: ..."],
  "testCases": [
    {{"input": "[1, 2, 3]", "output": "6", "explanation": "why"}},
    {{"input": "[4, 5]", "output": "9", "explanation": "why"}},
    {{"input": "[]", "output": "0", "explanation": "why"}}
  ],
  "hiddenTestCases": [
    {{"input": "[10]", "output": "10"}},
    {{"input": "[-1, 1]", "output": "0"}}
  ],
  "skeletonCode": {{
    "python": "def solution(...):\n    pass",
    "javascript": "function solution(...) {{\n}}",
    "java": "class Solution {{\n    public int solution(...) {{\n        return 0;\n    }}\n}}",
    "cpp": "class Solution {{\npublic:\n    int solution(...) {{\n        return 0;\n    }}\n}};"
  }}
}}

Rules:
- Every "input" and "output" value must be a valid JSON literal in a string.
- The entry-point function must be named exactly "solution" in every language.
- Do not wrap the JSON in markdown fences or add commentary."#
    )
}

/// Deterministic presentation of a (parsed or fallback) problem
pub fn present_problem(problem: &DsaProblem, difficulty: Difficulty) -> String {
    let lead_in = match difficulty {
        Difficulty::Easy => {
            "Excellent! You've shown good understanding of core concepts. Now let's \
             move on to a coding challenge. I like to make these more interesting \
             with real-world scenarios."
        }
        Difficulty::MediumHard => {
            "Nice work so far! Let's raise the bar with a tougher challenge - this \
             one rewards an efficient approach."
        }
    };

    let requirements = problem
        .requirements
        .iter()
        .map(|req| format!("- {req}"))
        .collect::<Vec<_>>()
        .join("\n");

    let test_cases = problem
        .test_cases
        .iter()
        .enumerate()
        .map(|(i, case)| {
            let explanation = case
                .explanation
                .as_deref()
                .map(|text| format!("\n   Explanation: {text}"))
                .unwrap_or_default();
            format!(
                "{}. Input: {} → Output: {}{}",
                i + 1,
                case.input,
                case.output,
                explanation
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"{lead_in}

**{title}**

{story}

**Problem:** {problem_statement}

**Requirements:**
{requirements}

**Test Cases:**
{test_cases}

Please walk me through your approach first, then provide your solution. I'm interested in your thought process as much as the final code!"#,
        title = problem.title,
        story = problem.story,
        problem_statement = problem.problem,
    )
}

/// After the easy problem: probe for complexity analysis
pub fn complexity_question(message: &str, problem_title: &str, code_context: &str) -> String {
    format!(
        r#"{BASE_SYSTEM_PROMPT}

The candidate has been working on the problem "{problem_title}" and just said: "{message}"{code_context}

Give brief, encouraging feedback on their solution attempt, then ask them to analyze it:
- What is the time complexity of their approach, and why?
- What is the space complexity?

Ask them to walk through the reasoning, not just name the Big-O class."#
    )
}

/// After complexity analysis: probe for optimizations
pub fn optimization_question(message: &str, problem_title: &str) -> String {
    format!(
        r#"{BASE_SYSTEM_PROMPT}

The candidate just analyzed the complexity of their solution to "{problem_title}": "{message}"

Briefly react to their analysis (gently correct it if wrong). Then ask whether the solution can be improved:
- Could a different data structure or algorithm lower the time complexity?
- Is there a trade-off between time and space worth discussing?

Encourage them to think out loud even if the current solution is already optimal."#
    )
}

/// Feedback on the harder problem's solution
pub fn solution_feedback(message: &str, problem_title: &str, code_context: &str) -> String {
    format!(
        r#"{BASE_SYSTEM_PROMPT}

The candidate submitted their work on the harder problem "{problem_title}". They said: "{message}"{code_context}

Provide constructive feedback on their approach or solution. Focus on:
- Correctness of their logic
- Time and space complexity analysis
- Code quality and readability
- Edge case handling
- Potential optimizations

If they're on the right track, encourage them. If they're missing something, provide helpful hints without giving away the complete solution.

Be encouraging but thorough in your technical assessment."#
    )
}

/// Comprehensive wrap-up feedback across the whole interview
pub fn wrap_up(message: &str) -> String {
    format!(
        r#"{BASE_SYSTEM_PROMPT}

This is the final part of the interview. The candidate provided: "{message}"

Provide comprehensive feedback on their overall interview performance. Address:
- Strengths you observed across all topics covered
- Areas for improvement (be constructive and specific)
- Their problem-solving approach
- Technical knowledge demonstrated
- Communication skills

Then wrap up the interview professionally with encouragement for their future endeavors.

Example format:
"[Comprehensive feedback on their performance]

Thank you for a great technical discussion! You've shown [specific strengths]. Keep working on [specific areas for improvement]. Best of luck with your job search, and keep coding!"

Be warm, professional, and encouraging in your closing."#
    )
}

/// Final closing turn before the session goes terminal
pub fn closing(message: &str) -> String {
    format!(
        r#"{BASE_SYSTEM_PROMPT}

The interview has wrapped up and the candidate replied: "{message}"

Thank them once more, wish them well, and close the conversation in one or two warm sentences. Do not ask any further questions."#
    )
}

/// Side-channel analysis of submitted code; never advances the interview
pub fn code_analysis(message: &str, problem_title: &str, code_context: &str) -> String {
    format!(
        r#"{BASE_SYSTEM_PROMPT}

The candidate asked for feedback on their in-progress code for "{problem_title}". They said: "{message}"{code_context}

Review the code as a helpful interviewer:
- Point out bugs or logic errors, if any
- Comment on clarity and structure
- Suggest the next step without writing the solution for them

Keep it short and concrete; this is a mid-problem check-in, not the final assessment."#
    )
}

/// Render submitted code and test results as extra prompt context
pub fn code_context(code: Option<&str>, language: Option<&str>, results: Option<&serde_json::Value>) -> String {
    let mut context = String::new();
    if let Some(code) = code {
        let language = language.unwrap_or("text");
        context.push_str(&format!("\n\nTheir current code ({language}):\n```{language}\n{code}\n```"));
    }
    if let Some(results) = results {
        context.push_str(&format!("\n\nTest results they obtained:\n{results}"));
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bank::ProblemBank;

    #[test]
    fn test_dialogue_prompts_embed_the_message() {
        let message = "I built a compiler in my final year";
        for prompt in [
            intro_background(message),
            intro_project(message),
            core_topic_first(message, "What is a deadlock?"),
            core_topic_second(message, "Explain ACID."),
            wrap_up(message),
            closing(message),
        ] {
            assert!(prompt.contains(message));
            assert!(prompt.contains("Code Mock"));
        }
    }

    #[test]
    fn test_synthesis_prompt_demands_bare_json() {
        let prompt = synthesize_problem(Difficulty::Easy);
        assert!(prompt.contains("ONLY a JSON object"));
        assert!(prompt.contains("\"testCases\""));
        assert!(prompt.contains("\"skeletonCode\""));
    }

    #[test]
    fn test_present_problem_lists_all_visible_cases() {
        let problem = ProblemBank::new().fallback_problem();
        let text = present_problem(&problem, Difficulty::Easy);
        assert!(text.contains("**Sum of Array Elements**"));
        for case in &problem.test_cases {
            assert!(text.contains(&case.input));
        }
        // Hidden cases stay hidden
        for case in &problem.hidden_test_cases {
            assert!(!text.contains(&format!("Input: {}", case.input)));
        }
    }

    #[test]
    fn test_code_context_renders_code_and_results() {
        let results = serde_json::json!({"passed": 2, "failed": 1});
        let context = code_context(Some("def solution(): pass"), Some("python"), Some(&results));
        assert!(context.contains("```python"));
        assert!(context.contains("passed"));

        assert!(code_context(None, None, None).is_empty());
    }
}
