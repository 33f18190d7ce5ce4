//! Problem bank
//!
//! Static catalog behind the interview: the core-CS question pools and the
//! hand-authored fallback DSA problem substituted whenever problem
//! synthesis fails.

use std::collections::HashMap;

use crate::core::session::Topic;
use crate::types::{DsaProblem, ProblemTestCase};

/// Read-only catalog of interview material
pub struct ProblemBank {
    core_questions: HashMap<Topic, Vec<&'static str>>,
}

impl ProblemBank {
    pub fn new() -> Self {
        let mut core_questions = HashMap::new();

        core_questions.insert(
            Topic::Os,
            vec![
                "Explain the difference between processes and threads. When would you choose one over the other?",
                "What is virtual memory and how does paging work? Why is it important in modern operating systems?",
                "Describe the concept of deadlocks. What are the four necessary conditions for a deadlock to occur?",
                "Explain different CPU scheduling algorithms like FCFS, SJF, and Round Robin. What are their trade-offs?",
            ],
        );

        core_questions.insert(
            Topic::Oops,
            vec![
                "Explain the four pillars of Object-Oriented Programming with real-world examples.",
                "What's the difference between inheritance and composition? When would you choose composition over inheritance?",
                "Explain polymorphism and provide examples of both compile-time and runtime polymorphism.",
                "What are abstract classes and interfaces? How do they differ and when would you use each?",
            ],
        );

        core_questions.insert(
            Topic::Dbms,
            vec![
                "Explain ACID properties in database transactions. Why is each property important?",
                "What are the different types of database indexes? How do they improve query performance?",
                "Describe the different levels of database normalization. What problems does each level solve?",
                "Explain the difference between SQL and NoSQL databases. When would you choose one over the other?",
            ],
        );

        core_questions.insert(
            Topic::Cns,
            vec![
                "What's the difference between TCP and UDP? Provide scenarios where you'd use each protocol.",
                "Explain how DNS works. What happens when you type a URL in your browser?",
                "Describe the OSI model layers. How does data flow through these layers?",
                "What is HTTP vs HTTPS? How does SSL/TLS ensure secure communication?",
            ],
        );

        Self { core_questions }
    }

    /// Question pool for one topic
    pub fn questions_for(&self, topic: Topic) -> &[&'static str] {
        self.core_questions
            .get(&topic)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Question counts per topic, for the test-flow diagnostic endpoint
    pub fn question_counts(&self) -> HashMap<&'static str, usize> {
        self.core_questions
            .iter()
            .map(|(topic, questions)| (topic.as_str(), questions.len()))
            .collect()
    }

    /// The deterministic problem substituted when synthesis fails
    ///
    /// Kept boring on purpose: the interview must be able to proceed on any
    /// backend output, so this problem is fully hand-checked.
    pub fn fallback_problem(&self) -> DsaProblem {
        let mut skeleton_code = HashMap::new();

        skeleton_code.insert(
            "python".to_string(),
            r#"def solution(nums):
    """Return the sum of all elements in nums."""
    # Your code here
    pass
"#
            .to_string(),
        );

        skeleton_code.insert(
            "javascript".to_string(),
            r#"function solution(nums) {
    // Return the sum of all elements in nums
    // Your code here
}
"#
            .to_string(),
        );

        skeleton_code.insert(
            "java".to_string(),
            r#"class Solution {
    public int solution(int[] nums) {
        // Return the sum of all elements in nums
        // Your code here
        return 0;
    }

    public static void main(String[] args) {
    }
}
"#
            .to_string(),
        );

        skeleton_code.insert(
            "cpp".to_string(),
            r#"#include <iostream>
#include <vector>

class Solution {
public:
    int solution(std::vector<int> nums) {
        // Return the sum of all elements in nums
        // Your code here
        return 0;
    }
};
"#
            .to_string(),
        );

        DsaProblem {
            title: "Sum of Array Elements".to_string(),
            story: "You're tallying the day's sales at a small bookshop. Every \
                    sale was jotted down as it happened, and now the owner wants \
                    a single total for the ledger."
                .to_string(),
            problem: "Given an array of integers, return the sum of all its elements."
                .to_string(),
            requirements: vec![
                "Input: Array of integers".to_string(),
                "Output: Single integer, the sum of all elements".to_string(),
                "An empty array sums to 0".to_string(),
            ],
            test_cases: vec![
                ProblemTestCase {
                    input: "[1, 2, 3, 4, 5]".to_string(),
                    output: "15".to_string(),
                    explanation: Some("1 + 2 + 3 + 4 + 5 = 15".to_string()),
                },
                ProblemTestCase {
                    input: "[10, -2, 7]".to_string(),
                    output: "15".to_string(),
                    explanation: Some("10 - 2 + 7 = 15".to_string()),
                },
                ProblemTestCase {
                    input: "[]".to_string(),
                    output: "0".to_string(),
                    explanation: Some("Empty array sums to 0".to_string()),
                },
            ],
            hidden_test_cases: vec![
                ProblemTestCase {
                    input: "[100]".to_string(),
                    output: "100".to_string(),
                    explanation: None,
                },
                ProblemTestCase {
                    input: "[-5, 5, -5, 5]".to_string(),
                    output: "0".to_string(),
                    explanation: None,
                },
            ],
            skeleton_code,
        }
    }
}

impl Default for ProblemBank {
    fn default() -> Self {
        Self::new()
    }
}
