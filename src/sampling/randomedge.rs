//! random edge sampling : shuffle the edge set and drop a (100-p)/100 fraction.
//!
//! All nodes are kept. With p near 0 the sub graph may be edgeless,
//! with p near 100 almost nothing is removed.


use indexmap::IndexSet;

use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::graph::GraphStore;

/// remove ⌊|E|·(100-p)/100⌋ uniformly chosen edges and return the remaining sub graph
pub fn sample_random_edge(graph: &GraphStore, p: usize, rng: &mut Xoshiro256PlusPlus) -> GraphStore {
    let nb_edges = graph.get_nb_edges();
    let mut ranks: Vec<usize> = (0..nb_edges).collect();
    ranks.shuffle(rng);
    let nb_removed = nb_edges * (100 - p) / 100;
    let removed: IndexSet<usize> = ranks[..nb_removed].iter().copied().collect();
    graph.without_edges(&removed)
} // end of sample_random_edge

// end of mod tests
