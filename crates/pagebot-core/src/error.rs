use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Load-time failures. Answering a question never fails; only building the engine can.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read knowledge base {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("knowledge base is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("knowledge base declares no topics")]
    NoTopics,

    #[error("topic #{index} has a blank key")]
    BlankTopicKey { index: usize },

    #[error("topic '{0}' is declared more than once")]
    DuplicateTopic(String),

    #[error("topic '{0}' has a blank title")]
    BlankTitle(String),

    #[error("topic '{0}' has no entries")]
    EmptyTopic(String),

    #[error("topic '{topic}' entry #{index} has a blank question")]
    BlankQuestion { topic: String, index: usize },

    #[error("topic '{topic}' entry #{index} has a blank answer")]
    BlankAnswer { topic: String, index: usize },

    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
