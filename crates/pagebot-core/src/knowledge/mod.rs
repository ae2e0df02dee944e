//! Topic question banks.
//!
//! A deployment has exactly one [`KnowledgeBase`], built once from a
//! [`KnowledgeSource`] and validated before the responder sees it:
//!
//! | Check            | Rejects                                   |
//! |------------------|-------------------------------------------|
//! | topics           | a document with no topics                 |
//! | key              | blank or duplicate topic keys             |
//! | title            | blank titles                              |
//! | entries          | topics with no question/answer pairs      |
//! | question, answer | blank text in any entry                   |

mod sources;
mod store;

pub use sources::{BuiltinSource, JsonFileSource};
pub use store::{KnowledgeBase, KnowledgeDocument, QaEntry, Topic, TopicDocument, TopicSummary};

use crate::error::Result;

/// Where a knowledge document comes from (bundled content, a file, ...).
pub trait KnowledgeSource: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Reads the raw, not yet validated document.
    fn load(&self) -> Result<KnowledgeDocument>;
}
