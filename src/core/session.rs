//! Interview session state
//!
//! One `InterviewSession` per candidate cookie, mutated only by the phase
//! controller and dropped on reset or expiry. Memory-only by design.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::DsaProblem;

/// Coarse interview stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Introduction,
    CoreTopics,
    #[serde(rename = "dsa_progressive")]
    Dsa,
    WrapUp,
    Complete,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Introduction => "introduction",
            Phase::CoreTopics => "core_topics",
            Phase::Dsa => "dsa_progressive",
            Phase::WrapUp => "wrap_up",
            Phase::Complete => "complete",
        }
    }

    /// Parse a phase tag from the force-transition endpoint
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "introduction" => Some(Phase::Introduction),
            "core_topics" => Some(Phase::CoreTopics),
            "dsa_progressive" | "dsa_problem" => Some(Phase::Dsa),
            "wrap_up" => Some(Phase::WrapUp),
            "complete" => Some(Phase::Complete),
            _ => None,
        }
    }
}

/// Sub-stage within the progressive DSA phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DsaStage {
    Easy,
    Complexity,
    Optimization,
    MediumHard,
    Feedback,
}

impl DsaStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DsaStage::Easy => "easy",
            DsaStage::Complexity => "complexity",
            DsaStage::Optimization => "optimization",
            DsaStage::MediumHard => "medium_hard",
            DsaStage::Feedback => "feedback",
        }
    }
}

/// Core CS topic tags for the question bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Os,
    Oops,
    Dbms,
    Cns,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Os, Topic::Oops, Topic::Dbms, Topic::Cns];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Os => "os",
            Topic::Oops => "oops",
            Topic::Dbms => "dbms",
            Topic::Cns => "cns",
        }
    }
}

/// Speaker tag in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Interviewer,
}

/// One transcript entry; insertion order is meaningful
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utterance {
    pub role: Role,
    pub content: String,
}

/// Per-candidate interview progress
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub phase: Phase,
    pub dsa_stage: DsaStage,
    pub intro_questions_asked: u8,
    pub core_questions_asked: u8,
    pub used_topics: Vec<Topic>,
    pub current_problem: Option<DsaProblem>,
    pub dsa_generated: bool,
    pub easy_problem_solved: bool,
    pub complexity_analyzed: bool,
    pub optimization_discussed: bool,
    pub medium_hard_problem_solved: bool,
    #[serde(skip)]
    pub conversation: Vec<Utterance>,
    pub started_at: DateTime<Utc>,
}

impl InterviewSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Introduction,
            dsa_stage: DsaStage::Easy,
            intro_questions_asked: 0,
            core_questions_asked: 0,
            used_topics: Vec::new(),
            current_problem: None,
            dsa_generated: false,
            easy_problem_solved: false,
            complexity_analyzed: false,
            optimization_discussed: false,
            medium_hard_problem_solved: false,
            conversation: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Jump to `phase` with all counters and flags cleared (diagnostic
    /// force-transition semantics)
    pub fn force_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.dsa_stage = DsaStage::Easy;
        self.intro_questions_asked = 0;
        self.core_questions_asked = 0;
        self.used_topics.clear();
        self.current_problem = None;
        self.dsa_generated = false;
        self.easy_problem_solved = false;
        self.complexity_analyzed = false;
        self.optimization_discussed = false;
        self.medium_hard_problem_solved = false;
    }

    pub fn record_candidate(&mut self, content: &str) {
        self.conversation.push(Utterance {
            role: Role::Candidate,
            content: content.to_string(),
        });
    }

    pub fn record_interviewer(&mut self, content: &str) {
        self.conversation.push(Utterance {
            role: Role::Interviewer,
            content: content.to_string(),
        });
    }

    /// Topics not yet used this session
    pub fn available_topics(&self) -> Vec<Topic> {
        Topic::ALL
            .into_iter()
            .filter(|topic| !self.used_topics.contains(topic))
            .collect()
    }

    /// Overall progress percentage derived purely from state
    pub fn progress(&self) -> u8 {
        match self.phase {
            Phase::Introduction => match self.intro_questions_asked {
                1 => 15,
                2 => 30,
                _ => 5,
            },
            Phase::CoreTopics => match self.core_questions_asked {
                1 => 50,
                2 => 70,
                _ => 35,
            },
            Phase::Dsa => match self.dsa_stage {
                DsaStage::Easy => 75,
                DsaStage::Complexity => 80,
                DsaStage::Optimization => 85,
                DsaStage::MediumHard => 90,
                DsaStage::Feedback => 95,
            },
            Phase::WrapUp => 98,
            Phase::Complete => 100,
        }
    }

    /// Phase the next ordinary turn will land in
    pub fn next_phase(&self) -> &'static str {
        match self.phase {
            Phase::Introduction => {
                if self.intro_questions_asked < 2 {
                    Phase::Introduction.as_str()
                } else {
                    Phase::CoreTopics.as_str()
                }
            }
            Phase::CoreTopics => {
                if self.core_questions_asked < 2 {
                    Phase::CoreTopics.as_str()
                } else {
                    Phase::Dsa.as_str()
                }
            }
            Phase::Dsa => match self.dsa_stage {
                DsaStage::Feedback => Phase::WrapUp.as_str(),
                _ => Phase::Dsa.as_str(),
            },
            Phase::WrapUp => Phase::Complete.as_str(),
            Phase::Complete => Phase::Complete.as_str(),
        }
    }

    /// Progress detail block returned from the chat and progress endpoints
    pub fn progress_details(&self) -> Value {
        json!({
            "introQuestionsAsked": self.intro_questions_asked,
            "coreQuestionsAsked": self.core_questions_asked,
            "usedTopics": self.used_topics,
            "dsaGenerated": self.dsa_generated,
            "dsaStage": self.dsa_stage.as_str(),
        })
    }
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_in_introduction() {
        let session = InterviewSession::new();
        assert_eq!(session.phase, Phase::Introduction);
        assert_eq!(session.intro_questions_asked, 0);
        assert_eq!(session.progress(), 5);
        assert_eq!(session.next_phase(), "introduction");
    }

    #[test]
    fn test_progress_is_monotonic_through_happy_path() {
        let mut session = InterviewSession::new();
        let mut last = session.progress();

        session.intro_questions_asked = 1;
        assert!(session.progress() > last);
        last = session.progress();

        session.intro_questions_asked = 2;
        assert!(session.progress() > last);
        last = session.progress();

        session.phase = Phase::CoreTopics;
        session.core_questions_asked = 1;
        assert!(session.progress() > last);
        last = session.progress();

        session.core_questions_asked = 2;
        assert!(session.progress() > last);
        last = session.progress();

        session.phase = Phase::Dsa;
        for stage in [
            DsaStage::Easy,
            DsaStage::Complexity,
            DsaStage::Optimization,
            DsaStage::MediumHard,
            DsaStage::Feedback,
        ] {
            session.dsa_stage = stage;
            assert!(session.progress() > last);
            last = session.progress();
        }

        session.phase = Phase::WrapUp;
        assert!(session.progress() > last);

        session.phase = Phase::Complete;
        assert_eq!(session.progress(), 100);
    }

    #[test]
    fn test_available_topics_excludes_used() {
        let mut session = InterviewSession::new();
        assert_eq!(session.available_topics().len(), 4);

        session.used_topics.push(Topic::Dbms);
        let available = session.available_topics();
        assert_eq!(available.len(), 3);
        assert!(!available.contains(&Topic::Dbms));
    }

    #[test]
    fn test_force_phase_clears_state() {
        let mut session = InterviewSession::new();
        session.intro_questions_asked = 2;
        session.used_topics.push(Topic::Os);
        session.dsa_generated = true;

        session.force_phase(Phase::Dsa);
        assert_eq!(session.phase, Phase::Dsa);
        assert_eq!(session.intro_questions_asked, 0);
        assert!(session.used_topics.is_empty());
        assert!(!session.dsa_generated);
    }

    #[test]
    fn test_phase_serializes_to_wire_tags() {
        assert_eq!(
            serde_json::to_value(Phase::CoreTopics).unwrap(),
            json!("core_topics")
        );
        assert_eq!(
            serde_json::to_value(Phase::Dsa).unwrap(),
            json!("dsa_progressive")
        );
        assert_eq!(Phase::parse("dsa_problem"), Some(Phase::Dsa));
        assert_eq!(Phase::parse("nonsense"), None);
    }
}
