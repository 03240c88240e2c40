//! BM25 relevance scoring over the full job corpus.
//!
//! Statistics (average document length, document frequencies) are computed
//! from scratch over the snapshot passed in, never cached across calls, so a
//! search always reflects exactly the corpus it was given.

use super::RankingError;
use crate::job_store::JobRecord;
use serde::Serialize;
use std::collections::HashMap;

/// Standard BM25 constants, not configurable.
const K1: f64 = 1.5;
const B: f64 = 0.75;

/// At most this many results per search.
pub const SEARCH_RESULT_LIMIT: usize = 20;

#[derive(Clone, Debug, Serialize)]
pub struct ScoredJob {
    #[serde(flatten)]
    pub job: JobRecord,
    pub relevance_score: f64,
}

fn combined_text(job: &JobRecord) -> String {
    format!(
        "{} {} {} {} {}",
        job.title, job.company, job.category, job.location, job.description
    )
    .to_lowercase()
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

fn score_document(
    tokens: &[&str],
    query_terms: &[String],
    avg_doc_length: f64,
    corpus_size: usize,
    document_frequency: &HashMap<&str, usize>,
) -> f64 {
    let mut term_frequency: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *term_frequency.entry(token).or_insert(0) += 1;
    }
    let doc_length = tokens.len() as f64;

    let mut score = 0.0;
    for term in query_terms {
        let tf = *term_frequency.get(term.as_str()).unwrap_or(&0) as f64;
        let df = *document_frequency.get(term.as_str()).unwrap_or(&0) as f64;
        let n = corpus_size as f64;
        let idf = (((n - df + 0.5) / (df + 0.5)) + 1.0).ln();

        score += idf * ((tf * (K1 + 1.0)) / (tf + K1 * (1.0 - B + B * (doc_length / avg_doc_length))));
    }
    score
}

/// Scores every job in the corpus against the query and returns the top
/// matches, best first. Ties keep corpus order. No minimum-score cutoff is
/// applied, so zero-relevance jobs may pad the tail when fewer than
/// [`SEARCH_RESULT_LIMIT`] jobs match.
pub fn search(query: &str, corpus: &[JobRecord]) -> Result<Vec<ScoredJob>, RankingError> {
    if query.trim().is_empty() {
        return Err(RankingError::InvalidQuery);
    }
    if corpus.is_empty() {
        return Ok(vec![]);
    }

    let query = query.to_lowercase();
    // Duplicate terms stay in, each occurrence contributes to the score.
    let query_terms: Vec<String> = query.split_whitespace().map(|s| s.to_string()).collect();

    let texts: Vec<String> = corpus.iter().map(combined_text).collect();
    let tokenized: Vec<Vec<&str>> = texts.iter().map(|text| tokenize(text)).collect();

    let total_doc_length: usize = tokenized.iter().map(|tokens| tokens.len()).sum();
    let avg_doc_length = total_doc_length as f64 / corpus.len() as f64;

    // Document frequency per distinct query term. Substring containment
    // against the combined text, a deliberate approximation of token-exact
    // matching inherited from the original scorer.
    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for term in &query_terms {
        let df = texts.iter().filter(|text| text.contains(term.as_str())).count();
        document_frequency.insert(term.as_str(), df);
    }

    let mut scored: Vec<ScoredJob> = corpus
        .iter()
        .zip(tokenized.iter())
        .map(|(job, tokens)| ScoredJob {
            job: job.clone(),
            relevance_score: score_document(
                tokens,
                &query_terms,
                avg_doc_length,
                corpus.len(),
                &document_frequency,
            ),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(SEARCH_RESULT_LIMIT);
    Ok(scored)
}
