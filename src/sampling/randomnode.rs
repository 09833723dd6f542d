//! random node sampling : shuffle the node list and induce on the first ⌊|V|·p/100⌋ nodes.
//!
//! Induced subgraph edge density is not controlled, the sample may have far fewer
//! edges than the proportion suggests.


use indexmap::IndexSet;

use petgraph::graph::NodeIndex;

use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::graph::GraphStore;

/// keep ⌊|V|·p/100⌋ uniformly chosen nodes and return the induced sub graph
pub fn sample_random_node(graph: &GraphStore, p: usize, rng: &mut Xoshiro256PlusPlus) -> GraphStore {
    let mut nodes = graph.get_node_indices();
    nodes.shuffle(rng);
    let size = graph.get_nb_nodes() * p / 100;
    let keep: IndexSet<NodeIndex<u32>> = nodes[..size].iter().copied().collect();
    graph.induced_subgraph(&keep)
} // end of sample_random_node

#[cfg(test)]
mod tests {

    use super::*;
    use crate::sampling::job_rng;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn grid_graph() -> GraphStore {
        // 5x5 grid, 25 nodes, 40 edges
        let mut g = GraphStore::new();
        for r in 0..5 {
            for c in 0..5 {
                let name = |r: usize, c: usize| format!("{}", r * 5 + c);
                if c + 1 < 5 {
                    g.add_edge(&name(r, c), &name(r, c + 1));
                }
                if r + 1 < 5 {
                    g.add_edge(&name(r, c), &name(r + 1, c));
                }
            }
        }
        g
    }

    #[test]
    fn keeps_exact_node_count() {
        log_init_test();
        let g = grid_graph();
        for p in [20, 40, 60, 80] {
            let mut rng = job_rng(11, p, 0);
            let sub = sample_random_node(&g, p, &mut rng);
            assert_eq!(sub.get_nb_nodes(), 25 * p / 100, "scale {}", p);
        }
    } // end of keeps_exact_node_count

    #[test]
    fn induced_edges_subset_of_original() {
        log_init_test();
        let g = grid_graph();
        let original: std::collections::HashSet<(String, String)> =
            g.get_directed_edges().into_iter().collect();
        let mut rng = job_rng(13, 60, 1);
        let sub = sample_random_node(&g, 60, &mut rng);
        assert!(sub.get_nb_edges() <= g.get_nb_edges());
        for e in sub.get_directed_edges() {
            assert!(original.contains(&e));
        }
    } // end of induced_edges_subset_of_original
} // end of mod tests
