//! Document embedding seam.
//!
//! The trainer over labeled feature documents is a black box capability for the
//! pipeline : train one model over a corpus of tagged documents, then query a
//! 3 dimensional vector for a tag. The [DocEmbedder] trait is that boundary, any
//! doc2vec style trainer can sit behind it.
//!
//! The shipped default is a deterministic tf-idf weighted feature hashing
//! projection : each token hashes to a fixed direction in R3 and a document is the
//! normalized idf weighted sum of its token directions. It is corpus dependent
//! through the idf weights and fully reproducible, which the tests rely on.


use sha2::{Digest, Sha256};

use std::collections::{HashMap, HashSet};

use crate::embed::wl::FeatureDocument;
use crate::error::ShapeError;

/// trains over a corpus of tagged documents and serves one 3D vector per tag
pub trait DocEmbedder {
    /// the synchronization barrier : no vector lookup before training completed
    fn train(&mut self, corpus: &[FeatureDocument]) -> anyhow::Result<()>;
    /// learned vector for a document tag
    fn get_vector(&self, tag: &str) -> Option<[f64; 3]>;
} // end of trait DocEmbedder

/// deterministic tf-idf feature hashing projection to 3 dimensions
pub struct HashProjectionModel {
    /// tag to learned vector, filled by train
    vectors: HashMap<String, [f64; 3]>,
} // end of HashProjectionModel

impl HashProjectionModel {
    pub fn new() -> Self {
        HashProjectionModel {
            vectors: HashMap::new(),
        }
    }

    // a stable direction in [-1,1]^3 from the token content
    fn token_direction(token: &str) -> [f64; 3] {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        let digest = hasher.finalize();
        let mut dir = [0.; 3];
        for (d, chunk) in dir.iter_mut().zip(digest.chunks_exact(8)) {
            let v = u64::from_le_bytes(chunk.try_into().unwrap());
            *d = 2. * (v as f64 / u64::MAX as f64) - 1.;
        }
        dir
    } // end of token_direction
} // end of impl HashProjectionModel

impl Default for HashProjectionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DocEmbedder for HashProjectionModel {
    fn train(&mut self, corpus: &[FeatureDocument]) -> anyhow::Result<()> {
        if corpus.is_empty() {
            return Err(ShapeError::CorpusEmpty.into());
        }
        let nb_docs = corpus.len();
        // document frequency of every token over the corpus
        let mut df = HashMap::<&str, usize>::new();
        for doc in corpus {
            let distinct: HashSet<&str> = doc.tokens.iter().map(|t| t.as_str()).collect();
            for token in distinct {
                *df.entry(token).or_insert(0) += 1;
            }
        }
        //
        for doc in corpus {
            let mut tf = HashMap::<&str, usize>::new();
            for token in &doc.tokens {
                *tf.entry(token.as_str()).or_insert(0) += 1;
            }
            let mut vec = [0.; 3];
            for (token, count) in tf {
                let idf = (nb_docs as f64 / df[token] as f64).ln() + 1.;
                let dir = Self::token_direction(token);
                for d in 0..3 {
                    vec[d] += count as f64 * idf * dir[d];
                }
            }
            let norm = (vec[0] * vec[0] + vec[1] * vec[1] + vec[2] * vec[2]).sqrt();
            if norm > 0. {
                for v in &mut vec {
                    *v /= norm;
                }
            }
            if self.vectors.insert(doc.tag.clone(), vec).is_some() {
                log::warn!("duplicate document tag {} in corpus", doc.tag);
            }
        }
        log::info!("trained projection model over {} documents", nb_docs);
        Ok(())
    } // end of train

    fn get_vector(&self, tag: &str) -> Option<[f64; 3]> {
        self.vectors.get(tag).copied()
    }
} // end of impl DocEmbedder for HashProjectionModel

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn doc(tag: &str, tokens: &[&str]) -> FeatureDocument {
        FeatureDocument {
            tag: tag.to_string(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn empty_corpus_is_fatal() {
        log_init_test();
        let mut model = HashProjectionModel::new();
        assert!(model.train(&[]).is_err());
    } // end of empty_corpus_is_fatal

    #[test]
    fn training_is_deterministic() {
        log_init_test();
        let corpus = vec![doc("g_0", &["2", "2", "a"]), doc("g_1", &["2", "b", "b"])];
        let mut m1 = HashProjectionModel::new();
        let mut m2 = HashProjectionModel::new();
        m1.train(&corpus).unwrap();
        m2.train(&corpus).unwrap();
        assert_eq!(m1.get_vector("g_0"), m2.get_vector("g_0"));
        assert_eq!(m1.get_vector("g_1"), m2.get_vector("g_1"));
        assert!(m1.get_vector("g_2").is_none());
    } // end of training_is_deterministic

    #[test]
    fn identical_documents_land_on_the_same_point() {
        log_init_test();
        let corpus = vec![
            doc("g_0", &["x", "y"]),
            doc("g_1", &["x", "y"]),
            doc("g_2", &["x", "z", "z"]),
        ];
        let mut model = HashProjectionModel::new();
        model.train(&corpus).unwrap();
        assert_eq!(model.get_vector("g_0"), model.get_vector("g_1"));
        assert_ne!(model.get_vector("g_0"), model.get_vector("g_2"));
    } // end of identical_documents_land_on_the_same_point

    #[test]
    fn vectors_are_normalized() {
        log_init_test();
        let corpus = vec![doc("g_0", &["u", "v", "w"]), doc("g_1", &["u"])];
        let mut model = HashProjectionModel::new();
        model.train(&corpus).unwrap();
        let v = model.get_vector("g_0").unwrap();
        let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        assert!((norm - 1.).abs() < 1.0e-10);
    } // end of vectors_are_normalized
} // end of mod tests
