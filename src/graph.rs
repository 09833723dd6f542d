//! In-memory representation of the network under study.
//!
//! Nodes carry opaque string identifiers (integer like strings in the snap data files,
//! see <https://snap.stanford.edu/data/index.html>).
//! Edges are undirected and multi-edges collapse to a simple graph.
//! Directed copies are only materialized at output time : every undirected edge
//! is emitted in both orientations.


use indexmap::IndexSet;

use petgraph::graph::{Graph, NodeIndex};
use petgraph::Undirected;

/// The network. Immutable for the lifetime of a run, sub samples are derived copies.
pub struct GraphStore {
    /// node names in insertion order. rank in the set is the petgraph node index
    names: IndexSet<String>,
    /// undirected simple graph, node weight is the rank in names
    graph: Graph<(), (), Undirected, u32>,
} // end of GraphStore

impl GraphStore {
    pub fn new() -> Self {
        GraphStore {
            names: IndexSet::new(),
            graph: Graph::default(),
        }
    }

    /// get (inserting if needed) the index of a node given its name
    pub fn add_node(&mut self, name: &str) -> NodeIndex<u32> {
        match self.names.get_index_of(name) {
            Some(rank) => NodeIndex::new(rank),
            None => {
                let (rank, _) = self.names.insert_full(name.to_string());
                let idx = self.graph.add_node(());
                assert_eq!(rank, idx.index());
                idx
            }
        }
    } // end of add_node

    /// insert an undirected edge given node names. A multi-edge collapses onto the existing one.
    pub fn add_edge(&mut self, name1: &str, name2: &str) {
        let n1 = self.add_node(name1);
        let n2 = self.add_node(name2);
        if self.graph.find_edge(n1, n2).is_none() {
            self.graph.add_edge(n1, n2, ());
        }
    } // end of add_edge

    ///
    pub fn get_nb_nodes(&self) -> usize {
        self.graph.node_count()
    }

    ///
    pub fn get_nb_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// name of node at index
    pub fn get_name(&self, node: NodeIndex<u32>) -> &str {
        self.names.get_index(node.index()).unwrap().as_str()
    }

    ///
    pub fn get_node_indices(&self) -> Vec<NodeIndex<u32>> {
        self.graph.node_indices().collect()
    }

    /// undirected edges in enumeration order, as index pairs
    pub fn get_edges(&self) -> Vec<(NodeIndex<u32>, NodeIndex<u32>)> {
        self.graph
            .edge_indices()
            .map(|e| self.graph.edge_endpoints(e).unwrap())
            .collect()
    } // end of get_edges

    /// neighbours of a node
    pub fn get_neighbours(&self, node: NodeIndex<u32>) -> Vec<NodeIndex<u32>> {
        self.graph.neighbors(node).collect()
    }

    /// degree of a node
    pub fn get_degree(&self, node: NodeIndex<u32>) -> usize {
        self.graph.neighbors(node).count()
    }

    /// directed edge list : every undirected edge in both orientations, enumeration order.
    /// This is what gets persisted for the external fitting process.
    pub fn get_directed_edges(&self) -> Vec<(String, String)> {
        let mut out = Vec::<(String, String)>::with_capacity(2 * self.get_nb_edges());
        for (n1, n2) in self.get_edges() {
            let name1 = self.get_name(n1).to_string();
            let name2 = self.get_name(n2).to_string();
            out.push((name1.clone(), name2.clone()));
            out.push((name2, name1));
        }
        out
    } // end of get_directed_edges

    /// sub graph induced on a node subset : nodes kept with their names,
    /// edges with both endpoints retained survive
    pub fn induced_subgraph(&self, keep: &IndexSet<NodeIndex<u32>>) -> GraphStore {
        let mut sub = GraphStore::new();
        for node in keep {
            sub.add_node(self.get_name(*node));
        }
        for (n1, n2) in self.get_edges() {
            if keep.contains(&n1) && keep.contains(&n2) {
                sub.add_edge(self.get_name(n1), self.get_name(n2));
            }
        }
        sub
    } // end of induced_subgraph

    /// copy of the graph with the given edges (by position in the enumeration order) removed.
    /// All nodes are kept, the sub graph may be edgeless.
    pub fn without_edges(&self, removed: &IndexSet<usize>) -> GraphStore {
        let mut sub = GraphStore::new();
        for node in self.graph.node_indices() {
            sub.add_node(self.get_name(node));
        }
        for (rank, (n1, n2)) in self.get_edges().iter().enumerate() {
            if !removed.contains(&rank) {
                sub.add_edge(self.get_name(*n1), self.get_name(*n2));
            }
        }
        sub
    } // end of without_edges
} // end of impl GraphStore

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn cycle6() -> GraphStore {
        let mut g = GraphStore::new();
        for (n1, n2) in [("1", "2"), ("2", "3"), ("3", "4"), ("4", "5"), ("5", "6"), ("6", "1")] {
            g.add_edge(n1, n2);
        }
        g
    }

    #[test]
    fn multi_edge_collapses() {
        log_init_test();
        let mut g = GraphStore::new();
        g.add_edge("1", "2");
        g.add_edge("2", "1");
        g.add_edge("1", "2");
        assert_eq!(g.get_nb_nodes(), 2);
        assert_eq!(g.get_nb_edges(), 1);
    } // end of multi_edge_collapses

    #[test]
    fn directed_copy_doubles_edges() {
        log_init_test();
        let g = cycle6();
        assert_eq!(g.get_nb_nodes(), 6);
        assert_eq!(g.get_nb_edges(), 6);
        let directed = g.get_directed_edges();
        assert_eq!(directed.len(), 12);
        assert_eq!(directed[0], ("1".to_string(), "2".to_string()));
        assert_eq!(directed[1], ("2".to_string(), "1".to_string()));
    } // end of directed_copy_doubles_edges

    #[test]
    fn induced_subgraph_restricts_edges() {
        log_init_test();
        let g = cycle6();
        // keep nodes 1,2,4 : only edge 1-2 survives
        let keep: IndexSet<NodeIndex<u32>> =
            [NodeIndex::new(0), NodeIndex::new(1), NodeIndex::new(3)].into_iter().collect();
        let sub = g.induced_subgraph(&keep);
        assert_eq!(sub.get_nb_nodes(), 3);
        assert_eq!(sub.get_nb_edges(), 1);
    } // end of induced_subgraph_restricts_edges
} // end of mod tests
