//! Json document for a sample : {"edges": [[n1,n2], ...]}
//!
//! The document lists the directed edges of the sample in enumeration order.
//! It is the input format of the feature extraction stage.


use serde::{Deserialize, Serialize};

use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::ShapeError;
use crate::graph::GraphStore;

/// the serialized form of a sample
#[derive(Serialize, Deserialize, Debug)]
pub struct EdgeDocument {
    /// directed edges in enumeration order
    pub edges: Vec<(String, String)>,
} // end of EdgeDocument

impl EdgeDocument {
    pub fn from_graph(graph: &GraphStore) -> Self {
        EdgeDocument {
            edges: graph.get_directed_edges(),
        }
    }

    /// rebuild the (undirected, simple) graph from the directed edge document
    pub fn to_graph(&self) -> GraphStore {
        let mut graph = GraphStore::new();
        for (n1, n2) in &self.edges {
            graph.add_edge(n1, n2);
        }
        graph
    }
} // end of impl EdgeDocument

/// dump a sample as a json edge document
pub fn write_document(graph: &GraphStore, filepath: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(filepath)?;
    let bufw = BufWriter::new(file);
    serde_json::to_writer(bufw, &EdgeDocument::from_graph(graph))?;
    Ok(())
} // end of write_document

/// reload a sample graph from its json edge document
pub fn read_document(filepath: &Path) -> anyhow::Result<GraphStore> {
    let fileres = OpenOptions::new().read(true).open(filepath);
    if fileres.is_err() {
        log::error!("read_document : could not open file {:?}", filepath.as_os_str());
        return Err(ShapeError::Input {
            path: filepath.to_path_buf(),
            reason: String::from("could not open file"),
        }
        .into());
    }
    let bufr = BufReader::new(fileres.unwrap());
    let doc: EdgeDocument = serde_json::from_reader(bufr)?;
    Ok(doc.to_graph())
} // end of read_document

// end of mod tests
