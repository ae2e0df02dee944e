//! Validated, read-only topic store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::KnowledgeSource;
use crate::error::{Error, Result};
use crate::matcher::normalize;

/// One canned question and its answer. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaEntry {
    question: String,
    answer: String,
}

impl QaEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    #[inline]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Answer text; may carry `<br>` or `\n` line breaks for the renderer.
    #[inline]
    pub fn answer(&self) -> &str {
        &self.answer
    }
}

/// Raw topic as declared in a knowledge document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDocument {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub entries: Vec<QaEntry>,
}

/// Raw knowledge document. Topics are a list so declaration order and duplicate keys survive parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    #[serde(default)]
    pub topics: Vec<TopicDocument>,
}

impl KnowledgeDocument {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// A page-scoped subject with its ordered question bank (never empty).
#[derive(Debug, Clone)]
pub struct Topic {
    key: String,
    title: String,
    entries: Vec<QaEntry>,
}

impl Topic {
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Entries in declared order.
    #[inline]
    pub fn entries(&self) -> &[QaEntry] {
        &self.entries
    }
}

/// Listing row for a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub key: String,
    pub title: String,
    pub entry_count: usize,
}

/// Immutable mapping from topic key to [`Topic`]. Lookups are case-sensitive.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    topics: Vec<Topic>,
    index: HashMap<String, usize>,
}

impl KnowledgeBase {
    /// Validates a raw document and builds the store.
    pub fn from_document(document: KnowledgeDocument) -> Result<Self> {
        if document.topics.is_empty() {
            return Err(Error::NoTopics);
        }

        let mut topics = Vec::with_capacity(document.topics.len());
        let mut index = HashMap::with_capacity(document.topics.len());

        for (position, raw) in document.topics.into_iter().enumerate() {
            if raw.key.trim().is_empty() {
                return Err(Error::BlankTopicKey { index: position });
            }
            if index.contains_key(&raw.key) {
                return Err(Error::DuplicateTopic(raw.key));
            }
            if raw.title.trim().is_empty() {
                return Err(Error::BlankTitle(raw.key));
            }
            if raw.entries.is_empty() {
                return Err(Error::EmptyTopic(raw.key));
            }
            for (i, entry) in raw.entries.iter().enumerate() {
                // A question with nothing left after normalization could never be matched.
                if normalize(entry.question()).is_empty() {
                    return Err(Error::BlankQuestion {
                        topic: raw.key.clone(),
                        index: i,
                    });
                }
                if entry.answer().trim().is_empty() {
                    return Err(Error::BlankAnswer {
                        topic: raw.key.clone(),
                        index: i,
                    });
                }
            }

            index.insert(raw.key.clone(), topics.len());
            topics.push(Topic {
                key: raw.key,
                title: raw.title,
                entries: raw.entries,
            });
        }

        Ok(Self { topics, index })
    }

    /// Loads and validates the document produced by `source`.
    pub fn from_source(source: &dyn KnowledgeSource) -> Result<Self> {
        let document = source.load()?;
        let kb = Self::from_document(document)?;
        tracing::info!(
            target: "pagebot::knowledge",
            source = source.name(),
            topics = kb.len(),
            entries = kb.entry_count(),
            "Knowledge base '{}' loaded: {} topics, {} entries",
            source.name(),
            kb.len(),
            kb.entry_count()
        );
        Ok(kb)
    }

    /// Returns the topic for `key` (exact, case-sensitive match).
    pub fn topic(&self, key: &str) -> Option<&Topic> {
        self.index.get(key).map(|&i| &self.topics[i])
    }

    /// Topics in declared order.
    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter()
    }

    pub fn summaries(&self) -> Vec<TopicSummary> {
        self.topics
            .iter()
            .map(|t| TopicSummary {
                key: t.key.clone(),
                title: t.title.clone(),
                entry_count: t.entries.len(),
            })
            .collect()
    }

    /// Number of topics.
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Always false once validated.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Total entries across all topics.
    pub fn entry_count(&self) -> usize {
        self.topics.iter().map(|t| t.entries.len()).sum()
    }
}
