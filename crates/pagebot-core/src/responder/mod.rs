//! Tiered response policy.
//!
//! Evaluated in order, first match wins:
//!
//! 1. empty input      -> ask the user to type a question
//! 2. unknown topic    -> "no information for this page"
//! 3. confident match  -> the best entry's answer, verbatim
//! 4. lone candidate   -> "do you mean ..." plus its answer
//! 5. any candidates   -> list of shortlisted questions
//! 6. nothing          -> topic title and the first declared questions
//!
//! [`Responder`] holds no mutable state; share it behind an `Arc`.

use std::fmt;

use crate::knowledge::KnowledgeBase;
use crate::matcher::{normalize, select_best, shortlist};
use crate::shared::PolicyConfig;

/// Line-break marker understood by the page renderer.
pub const LINE_BREAK: &str = "<br>";

const EMPTY_INPUT_MESSAGE: &str = "Please type a question so I can help.";
const UNKNOWN_TOPIC_MESSAGE: &str = "I don't have information for this page.";

/// The outcome of one question, tagged with the policy tier that produced it.
/// `Display` renders the text shown in the chat window.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    EmptyInput,
    UnknownTopic,
    Answer {
        question: String,
        answer: String,
        score: f64,
    },
    Clarify {
        question: String,
        answer: String,
        score: f64,
    },
    Suggestions {
        questions: Vec<String>,
    },
    Help {
        title: String,
        questions: Vec<String>,
    },
}

impl Reply {
    /// Stable label for logs and JSON.
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::EmptyInput => "empty_input",
            Reply::UnknownTopic => "unknown_topic",
            Reply::Answer { .. } => "answer",
            Reply::Clarify { .. } => "clarify",
            Reply::Suggestions { .. } => "suggestions",
            Reply::Help { .. } => "help",
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::EmptyInput => f.write_str(EMPTY_INPUT_MESSAGE),
            Reply::UnknownTopic => f.write_str(UNKNOWN_TOPIC_MESSAGE),
            Reply::Answer { answer, .. } => f.write_str(answer),
            Reply::Clarify {
                question, answer, ..
            } => write!(
                f,
                "Do you mean: \"{}\" ? If yes, I can explain: {}{}",
                question, LINE_BREAK, answer
            ),
            Reply::Suggestions { questions } => {
                let quoted: Vec<String> = questions.iter().map(|q| format!("\"{}\"", q)).collect();
                write!(
                    f,
                    "I couldn't find an exact match. Did you mean one of these topics: {}?",
                    quoted.join(", ")
                )
            }
            Reply::Help { title, questions } => {
                write!(
                    f,
                    "I can help with {}. Try asking about one of these:{}",
                    title, LINE_BREAK
                )?;
                let items: Vec<String> = questions.iter().map(|q| format!("- {}", q)).collect();
                f.write_str(&items.join(LINE_BREAK))
            }
        }
    }
}

/// Matches free text against a topic's question bank.
#[derive(Debug, Clone)]
pub struct Responder {
    knowledge: KnowledgeBase,
    policy: PolicyConfig,
    default_topic: Option<String>,
}

impl Responder {
    /// Uses the default policy.
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self::with_policy(knowledge, PolicyConfig::default())
    }

    pub fn with_policy(knowledge: KnowledgeBase, policy: PolicyConfig) -> Self {
        Self {
            knowledge,
            policy,
            default_topic: None,
        }
    }

    /// Topic used by [`Responder::topic_for_path`] when the path names none.
    pub fn with_default_topic(mut self, topic: Option<String>) -> Self {
        self.default_topic = topic;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Rendered reply for `text` on the page identified by `topic_key`. Never fails.
    pub fn respond<'a>(&self, text: impl Into<Option<&'a str>>, topic_key: &str) -> String {
        self.reply(text, topic_key).to_string()
    }

    /// Structured reply; see the module docs for the tier order.
    pub fn reply<'a>(&self, text: impl Into<Option<&'a str>>, topic_key: &str) -> Reply {
        let query = normalize(text);
        let reply = self.decide(&query, topic_key);
        tracing::debug!(
            target: "pagebot::responder",
            topic = topic_key,
            tier = reply.kind(),
            score = reply_score(&reply),
            "reply selected"
        );
        reply
    }

    fn decide(&self, query: &str, topic_key: &str) -> Reply {
        if query.is_empty() {
            return Reply::EmptyInput;
        }
        let Some(topic) = self.knowledge.topic(topic_key) else {
            return Reply::UnknownTopic;
        };
        let entries = topic.entries();

        let (best, best_score) = select_best(query, entries);
        if let Some(entry) = best {
            if best_score >= self.policy.confidence_threshold {
                return Reply::Answer {
                    question: entry.question().to_string(),
                    answer: entry.answer().to_string(),
                    score: best_score,
                };
            }
        }

        let candidates = shortlist(query, entries, self.policy.shortlist_size);
        if let [only] = candidates.as_slice() {
            if only.score > self.policy.clarify_threshold {
                return Reply::Clarify {
                    question: only.entry.question().to_string(),
                    answer: only.entry.answer().to_string(),
                    score: only.score,
                };
            }
        }
        if !candidates.is_empty() {
            return Reply::Suggestions {
                questions: candidates
                    .iter()
                    .map(|c| c.entry.question().to_string())
                    .collect(),
            };
        }

        Reply::Help {
            title: topic.title().to_string(),
            questions: entries
                .iter()
                .take(self.policy.suggestion_count)
                .map(|e| e.question().to_string())
                .collect(),
        }
    }

    /// Welcome line shown when the chat window opens on a topic page.
    pub fn greeting(&self, topic_key: &str) -> Option<String> {
        self.knowledge.topic(topic_key).map(|topic| {
            format!(
                "Welcome! I'm your assistant for {}. Ask me questions about the topic.",
                topic.title()
            )
        })
    }

    /// Resolves a page path to a topic key: the first declared topic whose key appears in the
    /// lower-cased path, else the configured default topic, else the first declared topic.
    pub fn topic_for_path(&self, path: &str) -> Option<&str> {
        let path = path.to_lowercase();
        if let Some(topic) = self
            .knowledge
            .topics()
            .find(|t| path.contains(&t.key().to_lowercase()))
        {
            return Some(topic.key());
        }
        match self.default_topic.as_deref() {
            Some(key) => self.knowledge.topic(key).map(|t| t.key()),
            None => self.knowledge.topics().next().map(|t| t.key()),
        }
    }
}

fn reply_score(reply: &Reply) -> f64 {
    match reply {
        Reply::Answer { score, .. } | Reply::Clarify { score, .. } => *score,
        _ => 0.0,
    }
}
