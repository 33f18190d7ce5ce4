//! Phase controller
//!
//! The interview state machine: given the current session and the
//! candidate's latest turn, advances the session exactly one step and
//! declares which prompt to send and how to post-process the output.
//! Advancement is gated only on the turn having happened - the controller
//! never judges the content of an answer.

use rand::seq::SliceRandom;

use crate::core::bank::ProblemBank;
use crate::core::prompts;
use crate::core::session::{DsaStage, InterviewSession, Phase, Topic};
use crate::types::{Difficulty, GenerationOptions, TurnType};

/// What to do with the raw generated text
#[derive(Debug, Clone, PartialEq)]
pub enum PostProcess {
    /// Clean the text and show it as the interviewer's reply
    Dialogue,
    /// Extract/repair a problem JSON document; present the result
    SynthesizeProblem { difficulty: Difficulty },
}

/// Controller verdict for one turn
#[derive(Debug, Clone, PartialEq)]
pub enum PromptSpec {
    /// Call the text-generation backend
    Generate {
        prompt: String,
        options: GenerationOptions,
        post: PostProcess,
    },
    /// Answer without touching the backend
    Canned(String),
}

/// One candidate turn as seen by the controller
#[derive(Debug, Clone, Copy)]
pub struct TurnInput<'a> {
    pub message: &'a str,
    pub turn_type: TurnType,
    pub code: Option<&'a str>,
    pub language: Option<&'a str>,
    pub results: Option<&'a serde_json::Value>,
}

/// Drives the interview through its phases
pub struct PhaseController {
    bank: ProblemBank,
}

impl PhaseController {
    pub fn new(bank: ProblemBank) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &ProblemBank {
        &self.bank
    }

    /// Advance `session` one step for this turn and describe the prompt
    pub fn next(&self, session: &mut InterviewSession, turn: &TurnInput<'_>) -> PromptSpec {
        // Code-analysis turns are a side channel: same problem, no advance.
        if turn.turn_type == TurnType::CodeAnalysis {
            return self.analyze_code(session, turn);
        }

        match session.phase {
            Phase::Introduction => self.next_introduction(session, turn),
            Phase::CoreTopics => self.next_core_topics(session, turn),
            Phase::Dsa => self.next_dsa(session, turn),
            Phase::WrapUp => {
                session.phase = Phase::Complete;
                dialogue(prompts::closing(turn.message))
            }
            Phase::Complete => PromptSpec::Canned(prompts::COMPLETE_ACKNOWLEDGMENT.to_string()),
        }
    }

    fn next_introduction(&self, session: &mut InterviewSession, turn: &TurnInput<'_>) -> PromptSpec {
        match session.intro_questions_asked {
            0 => {
                session.intro_questions_asked = 1;
                dialogue(prompts::intro_background(turn.message))
            }
            1 => {
                session.intro_questions_asked = 2;
                dialogue(prompts::intro_project(turn.message))
            }
            _ => {
                session.phase = Phase::CoreTopics;
                session.core_questions_asked = 1;
                let question = self.pick_core_question(session);
                dialogue(prompts::core_topic_first(turn.message, &question))
            }
        }
    }

    fn next_core_topics(&self, session: &mut InterviewSession, turn: &TurnInput<'_>) -> PromptSpec {
        match session.core_questions_asked {
            0 | 1 => {
                session.core_questions_asked = 2;
                let question = self.pick_core_question(session);
                dialogue(prompts::core_topic_second(turn.message, &question))
            }
            _ => {
                session.phase = Phase::Dsa;
                session.dsa_stage = DsaStage::Easy;
                session.dsa_generated = true;
                synthesize(Difficulty::Easy)
            }
        }
    }

    fn next_dsa(&self, session: &mut InterviewSession, turn: &TurnInput<'_>) -> PromptSpec {
        let problem_title = session
            .current_problem
            .as_ref()
            .map(|problem| problem.title.clone())
            .unwrap_or_else(|| "the current problem".to_string());
        let context = prompts::code_context(turn.code, turn.language, turn.results);

        match session.dsa_stage {
            DsaStage::Easy => {
                session.easy_problem_solved = true;
                session.dsa_stage = DsaStage::Complexity;
                dialogue(prompts::complexity_question(
                    turn.message,
                    &problem_title,
                    &context,
                ))
            }
            DsaStage::Complexity => {
                session.complexity_analyzed = true;
                session.dsa_stage = DsaStage::Optimization;
                dialogue(prompts::optimization_question(turn.message, &problem_title))
            }
            DsaStage::Optimization => {
                session.optimization_discussed = true;
                session.dsa_stage = DsaStage::MediumHard;
                synthesize(Difficulty::MediumHard)
            }
            DsaStage::MediumHard => {
                session.medium_hard_problem_solved = true;
                session.dsa_stage = DsaStage::Feedback;
                dialogue(prompts::solution_feedback(
                    turn.message,
                    &problem_title,
                    &context,
                ))
            }
            DsaStage::Feedback => {
                session.phase = Phase::WrapUp;
                dialogue(prompts::wrap_up(turn.message))
            }
        }
    }

    fn analyze_code(&self, session: &InterviewSession, turn: &TurnInput<'_>) -> PromptSpec {
        let problem_title = session
            .current_problem
            .as_ref()
            .map(|problem| problem.title.clone())
            .unwrap_or_else(|| "their current exercise".to_string());
        let context = prompts::code_context(turn.code, turn.language, turn.results);
        dialogue(prompts::code_analysis(turn.message, &problem_title, &context))
    }

    /// Uniform-random question from a uniform-random unused topic; the
    /// topic is consumed for the rest of the session
    fn pick_core_question(&self, session: &mut InterviewSession) -> String {
        let mut rng = rand::thread_rng();
        let topic = match session.available_topics().choose(&mut rng) {
            Some(topic) => {
                let topic = *topic;
                session.used_topics.push(topic);
                topic
            }
            // All four topics exhausted only happens via the diagnostic
            // endpoints; draw from the full set without recording a
            // duplicate.
            None => *Topic::ALL.choose(&mut rng).expect("topic set is non-empty"),
        };

        self.bank
            .questions_for(topic)
            .choose(&mut rng)
            .map(|question| question.to_string())
            .unwrap_or_default()
    }
}

fn dialogue(prompt: String) -> PromptSpec {
    PromptSpec::Generate {
        prompt,
        options: GenerationOptions::dialogue(),
        post: PostProcess::Dialogue,
    }
}

fn synthesize(difficulty: Difficulty) -> PromptSpec {
    PromptSpec::Generate {
        prompt: prompts::synthesize_problem(difficulty),
        options: GenerationOptions::synthesis(),
        post: PostProcess::SynthesizeProblem { difficulty },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> PhaseController {
        PhaseController::new(ProblemBank::new())
    }

    fn turn(message: &str) -> TurnInput<'_> {
        TurnInput {
            message,
            turn_type: TurnType::Chat,
            code: None,
            language: None,
            results: None,
        }
    }

    fn step(controller: &PhaseController, session: &mut InterviewSession, message: &str) -> PromptSpec {
        controller.next(session, &turn(message))
    }

    #[test]
    fn test_introduction_counts_to_two() {
        let controller = controller();
        let mut session = InterviewSession::new();

        step(&controller, &mut session, "hi");
        assert_eq!(session.phase, Phase::Introduction);
        assert_eq!(session.intro_questions_asked, 1);

        step(&controller, &mut session, "I'm a backend dev");
        assert_eq!(session.phase, Phase::Introduction);
        assert_eq!(session.intro_questions_asked, 2);
    }

    #[test]
    fn test_third_turn_enters_core_topics_with_one_topic() {
        let controller = controller();
        let mut session = InterviewSession::new();

        for message in ["hi", "background", "my project"] {
            step(&controller, &mut session, message);
        }

        assert_eq!(session.phase, Phase::CoreTopics);
        assert_eq!(session.core_questions_asked, 1);
        assert_eq!(session.used_topics.len(), 1);
        assert!(Topic::ALL.contains(&session.used_topics[0]));
    }

    #[test]
    fn test_used_topics_never_repeat_and_cap_at_two() {
        // Randomized selection: repeat to cover the draw space
        for _ in 0..50 {
            let controller = controller();
            let mut session = InterviewSession::new();
            for message in ["hi", "a", "b", "c"] {
                step(&controller, &mut session, message);
            }

            assert_eq!(session.used_topics.len(), 2);
            assert_ne!(session.used_topics[0], session.used_topics[1]);
        }
    }

    #[test]
    fn test_fifth_turn_requests_easy_problem_synthesis() {
        let controller = controller();
        let mut session = InterviewSession::new();
        let mut last = PromptSpec::Canned(String::new());
        for message in ["hi", "a", "b", "c", "d"] {
            last = step(&controller, &mut session, message);
        }

        assert_eq!(session.phase, Phase::Dsa);
        assert_eq!(session.dsa_stage, DsaStage::Easy);
        assert!(session.dsa_generated);
        assert!(matches!(
            last,
            PromptSpec::Generate {
                post: PostProcess::SynthesizeProblem {
                    difficulty: Difficulty::Easy
                },
                ..
            }
        ));
    }

    #[test]
    fn test_dsa_stages_advance_one_per_turn() {
        let controller = controller();
        let mut session = InterviewSession::new();
        session.force_phase(Phase::Dsa);
        session.dsa_generated = true;

        step(&controller, &mut session, "my solution");
        assert_eq!(session.dsa_stage, DsaStage::Complexity);
        assert!(session.easy_problem_solved);

        step(&controller, &mut session, "O(n) time");
        assert_eq!(session.dsa_stage, DsaStage::Optimization);
        assert!(session.complexity_analyzed);

        let spec = step(&controller, &mut session, "could use a hash map");
        assert_eq!(session.dsa_stage, DsaStage::MediumHard);
        assert!(session.optimization_discussed);
        assert!(matches!(
            spec,
            PromptSpec::Generate {
                post: PostProcess::SynthesizeProblem {
                    difficulty: Difficulty::MediumHard
                },
                ..
            }
        ));

        step(&controller, &mut session, "here is my attempt");
        assert_eq!(session.dsa_stage, DsaStage::Feedback);
        assert!(session.medium_hard_problem_solved);

        step(&controller, &mut session, "thanks");
        assert_eq!(session.phase, Phase::WrapUp);
    }

    #[test]
    fn test_complete_phase_is_terminal_and_canned() {
        let controller = controller();
        let mut session = InterviewSession::new();
        session.force_phase(Phase::Complete);

        let before = session.clone();
        let spec = step(&controller, &mut session, "hello again");

        assert_eq!(spec, PromptSpec::Canned(prompts::COMPLETE_ACKNOWLEDGMENT.to_string()));
        assert_eq!(session.phase, before.phase);
        assert_eq!(session.intro_questions_asked, before.intro_questions_asked);
    }

    #[test]
    fn test_code_analysis_turn_does_not_advance() {
        let controller = controller();
        let mut session = InterviewSession::new();
        session.force_phase(Phase::Dsa);

        let analysis_turn = TurnInput {
            message: "does this look right?",
            turn_type: TurnType::CodeAnalysis,
            code: Some("def solution(nums):\n    return sum(nums)"),
            language: Some("python"),
            results: None,
        };
        let spec = controller.next(&mut session, &analysis_turn);

        assert_eq!(session.dsa_stage, DsaStage::Easy);
        assert!(!session.easy_problem_solved);
        match spec {
            PromptSpec::Generate { prompt, post, .. } => {
                assert_eq!(post, PostProcess::Dialogue);
                assert!(prompt.contains("return sum(nums)"));
            }
            other => panic!("expected dialogue prompt, got {other:?}"),
        }
    }

    #[test]
    fn test_dialogue_options_carry_stop_sequences_but_synthesis_does_not() {
        let controller = controller();
        let mut session = InterviewSession::new();

        let spec = step(&controller, &mut session, "hi");
        match spec {
            PromptSpec::Generate { options, .. } => assert!(!options.stop.is_empty()),
            other => panic!("expected generation, got {other:?}"),
        }

        let mut session = InterviewSession::new();
        session.phase = Phase::CoreTopics;
        session.core_questions_asked = 2;
        let spec = step(&controller, &mut session, "done");
        match spec {
            PromptSpec::Generate { options, .. } => assert!(options.stop.is_empty()),
            other => panic!("expected generation, got {other:?}"),
        }
    }
}
