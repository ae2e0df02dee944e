//! pagebot-core: question matcher for topic pages.
//!
//! Normalizes free text, scores it lexically against a topic's question bank and
//! picks a reply through a tiered confidence policy. Page glue and the gateway
//! hold a [`Responder`] and call [`Responder::respond`] per user message.

mod error;
mod knowledge;
mod matcher;
mod responder;
mod shared;

pub use error::{Error, Result};

pub use shared::{BotConfig, PolicyConfig};

pub use knowledge::{
    BuiltinSource, JsonFileSource, KnowledgeBase, KnowledgeDocument, KnowledgeSource, QaEntry,
    Topic, TopicDocument, TopicSummary,
};

pub use matcher::{jaccard, normalize, score, select_best, shortlist, ScoredEntry};

pub use responder::{Reply, Responder, LINE_BREAK};
