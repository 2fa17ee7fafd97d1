//! In-process knowledge base search.
//!
//! Each article is indexed as `"{topic}\n{content}"` into a term-frequency
//! vector. Queries are ranked by cosine distance, closest first.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::{DataError, read_json};
use crate::application::tooling::{Guideline, KbArticle, KnowledgeBase, ToolInvokeError};

pub const KNOWLEDGE_BASE_FILE: &str = "knowledge_base.json";

#[derive(Debug, Clone, Deserialize)]
struct RawArticle {
    id: String,
    topic: String,
    content: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    applies_to_plans: Vec<String>,
    #[serde(default)]
    guideline: Guideline,
}

#[derive(Debug, Clone)]
struct IndexedArticle {
    article: RawArticle,
    terms: HashMap<String, f64>,
    norm: f64,
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBaseStore {
    articles: Vec<IndexedArticle>,
}

impl KnowledgeBaseStore {
    /// Loads and indexes every article in the file.
    pub fn open(path: &Path) -> Result<Self, DataError> {
        let raw: Vec<RawArticle> = read_json(path)?;
        let store = Self::from_articles(raw);
        info!(articles = store.len(), path = %path.display(), "Indexed knowledge base");
        Ok(store)
    }

    fn from_articles(raw: Vec<RawArticle>) -> Self {
        let articles = raw
            .into_iter()
            .map(|article| {
                let terms = term_frequencies(&format!("{}\n{}", article.topic, article.content));
                let norm = norm(&terms);
                IndexedArticle {
                    article,
                    terms,
                    norm,
                }
            })
            .collect();
        Self { articles }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Returns up to `limit` articles ordered by ascending cosine distance.
    pub fn rank(&self, query: &str, limit: usize) -> Vec<KbArticle> {
        let query_terms = term_frequencies(query);
        let query_norm = norm(&query_terms);

        let mut scored: Vec<(f64, &IndexedArticle)> = self
            .articles
            .iter()
            .map(|indexed| {
                let similarity = cosine_similarity(&query_terms, query_norm, indexed);
                (1.0 - similarity, indexed)
            })
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        scored
            .into_iter()
            .take(limit)
            .map(|(distance, indexed)| {
                let article = &indexed.article;
                KbArticle {
                    id: article.id.clone(),
                    topic: article.topic.clone(),
                    content: article.content.clone(),
                    category: article.category.clone(),
                    applies_to_plans: article.applies_to_plans.clone(),
                    guideline: article.guideline.clone(),
                    relevance_score: Some(round4(1.0 - distance)),
                }
            })
            .collect()
    }
}

#[async_trait]
impl KnowledgeBase for KnowledgeBaseStore {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<KbArticle>, ToolInvokeError> {
        Ok(self.rank(query, limit))
    }
}

fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let mut terms = HashMap::new();
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
    {
        *terms.entry(token.to_lowercase()).or_insert(0.0) += 1.0;
    }
    terms
}

fn norm(terms: &HashMap<String, f64>) -> f64 {
    terms.values().map(|v| v * v).sum::<f64>().sqrt()
}

fn cosine_similarity(query: &HashMap<String, f64>, query_norm: f64, doc: &IndexedArticle) -> f64 {
    if query_norm == 0.0 || doc.norm == 0.0 {
        return 0.0;
    }
    let dot: f64 = query
        .iter()
        .filter_map(|(term, weight)| doc.terms.get(term).map(|w| w * weight))
        .sum();
    (dot / (query_norm * doc.norm)).clamp(0.0, 1.0)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
