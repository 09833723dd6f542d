//! Weisfeiler Lehman feature extraction.
//!
//! Iterative neighbourhood relabeling as in the graph kernel literature
//! (Shervashidze & al. 2011, and the global kernel variant of Morris-Kersting 2017
//! <https://arxiv.org/abs/1703.02379>).
//! Each round replaces a node label by a content digest of its own label joined with the
//! lexicographically sorted labels of its neighbours. The document of a graph accumulates
//! the initial labels and every round of relabelings, so its length is |V|·(rounds+1).
//! Sorting makes the result independent of neighbour enumeration order.


use sha2::{Digest, Sha256};

use crate::graph::GraphStore;

/// an ordered token sequence plus its unique tag, consumed by the document embedding trainer
#[derive(Debug, Clone)]
pub struct FeatureDocument {
    /// "g_" prefixed sample identity
    pub tag: String,
    ///
    pub tokens: Vec<String>,
} // end of FeatureDocument

/// run rounds of relabeling over the graph.
/// initial_labels must give one label per node in node enumeration order,
/// the node degree is used when none are supplied.
pub fn extract(
    graph: &GraphStore,
    initial_labels: Option<Vec<String>>,
    rounds: usize,
    tag: &str,
) -> FeatureDocument {
    let nodes = graph.get_node_indices();
    let mut labels: Vec<String> = match initial_labels {
        Some(given) => {
            assert_eq!(given.len(), nodes.len(), "one initial label per node");
            given
        }
        None => nodes.iter().map(|n| graph.get_degree(*n).to_string()).collect(),
    };
    //
    let mut tokens = Vec::<String>::with_capacity(nodes.len() * (rounds + 1));
    tokens.extend_from_slice(&labels);
    //
    for _ in 0..rounds {
        let mut new_labels = Vec::<String>::with_capacity(nodes.len());
        for (rank, node) in nodes.iter().enumerate() {
            let mut neighbour_labels: Vec<&str> = graph
                .get_neighbours(*node)
                .iter()
                .map(|n| labels[n.index()].as_str())
                .collect();
            neighbour_labels.sort_unstable();
            let mut joined = labels[rank].clone();
            for l in neighbour_labels {
                joined.push('_');
                joined.push_str(l);
            }
            let mut hasher = Sha256::new();
            hasher.update(joined.as_bytes());
            new_labels.push(format!("{:x}", hasher.finalize()));
        }
        tokens.extend_from_slice(&new_labels);
        labels = new_labels;
    }
    FeatureDocument {
        tag: tag.to_string(),
        tokens,
    }
} // end of extract

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn cycle(n: usize, offset: usize) -> GraphStore {
        let mut g = GraphStore::new();
        for i in 0..n {
            g.add_edge(
                &(offset + i).to_string(),
                &(offset + (i + 1) % n).to_string(),
            );
        }
        g
    }

    #[test]
    fn token_count_is_nodes_times_rounds_plus_one() {
        log_init_test();
        let g = cycle(6, 0);
        for rounds in [0, 1, 2, 3] {
            let doc = extract(&g, None, rounds, "g_test");
            assert_eq!(doc.tokens.len(), 6 * (rounds + 1), "rounds {}", rounds);
        }
    } // end of token_count_is_nodes_times_rounds_plus_one

    #[test]
    fn isomorphic_graphs_same_token_multiset() {
        log_init_test();
        // same cycle, different node names and insertion order
        let g1 = cycle(8, 0);
        let g2 = cycle(8, 1000);
        let mut t1 = extract(&g1, None, 2, "g_a").tokens;
        let mut t2 = extract(&g2, None, 2, "g_b").tokens;
        t1.sort();
        t2.sort();
        assert_eq!(t1, t2);
    } // end of isomorphic_graphs_same_token_multiset

    #[test]
    fn non_isomorphic_graphs_differ() {
        log_init_test();
        let cycle6 = cycle(6, 0);
        let mut path6 = GraphStore::new();
        for i in 0..5 {
            path6.add_edge(&i.to_string(), &(i + 1).to_string());
        }
        let mut t1 = extract(&cycle6, None, 2, "g_a").tokens;
        let mut t2 = extract(&path6, None, 2, "g_b").tokens;
        t1.sort();
        t2.sort();
        assert_ne!(t1, t2);
    } // end of non_isomorphic_graphs_differ

    #[test]
    fn degree_is_the_default_initial_label() {
        log_init_test();
        let mut g = GraphStore::new();
        g.add_edge("1", "2");
        g.add_edge("1", "3");
        let doc = extract(&g, None, 0, "g_star");
        assert_eq!(doc.tokens, vec!["2", "1", "1"]);
    } // end of degree_is_the_default_initial_label
} // end of mod tests
