//! Read an undirected graph from a tab delimited edge list file
//! and dump directed edge lists of samples.
//!
//! input files are in the format of the snap data sets
//! <https://snap.stanford.edu/data/index.html>, lines beginning with # or % are skipped.


use log::*;

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::ShapeError;
use crate::graph::GraphStore;

/// load an undirected graph from a tab delimited edge list (2 node name columns per line).
/// Multi edges collapse, so the loaded graph is simple.
pub fn read_edgelist(filepath: &Path) -> anyhow::Result<GraphStore> {
    let fileres = OpenOptions::new().read(true).open(filepath);
    if fileres.is_err() {
        log::error!("read_edgelist : could not open file {:?}", filepath.as_os_str());
        return Err(ShapeError::Input {
            path: filepath.to_path_buf(),
            reason: String::from("could not open file"),
        }
        .into());
    }
    let file = fileres.unwrap();
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(false)
        .comment(Some(b'#'))
        .from_reader(file);
    //
    let mut graph = GraphStore::new();
    let mut nb_record = 0;
    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::error!("read_edgelist : bad record in {:?} : {}", filepath, e);
                return Err(ShapeError::Input {
                    path: filepath.to_path_buf(),
                    reason: e.to_string(),
                }
                .into());
            }
        };
        if record.len() < 2 {
            return Err(ShapeError::Input {
                path: filepath.to_path_buf(),
                reason: format!("expected 2 fields, got {} at record {}", record.len(), nb_record),
            }
            .into());
        }
        // % is an alternate comment convention in some data sets
        if record[0].starts_with('%') {
            continue;
        }
        graph.add_edge(record[0].trim(), record[1].trim());
        nb_record += 1;
        if log_enabled!(Level::Trace) {
            log::trace!("{:?}", record);
        }
    }
    if graph.get_nb_nodes() == 0 {
        return Err(ShapeError::Input {
            path: filepath.to_path_buf(),
            reason: String::from("empty edge list"),
        }
        .into());
    }
    log::info!(
        "read_edgelist loaded {:?}, nb nodes : {}, nb edges : {}",
        filepath,
        graph.get_nb_nodes(),
        graph.get_nb_edges()
    );
    Ok(graph)
} // end of read_edgelist

/// dump a graph as a tab delimited directed edge list (each undirected edge in both orientations)
pub fn write_edgelist(graph: &GraphStore, filepath: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(filepath)?;
    let mut bufw = BufWriter::new(file);
    for (name1, name2) in graph.get_directed_edges() {
        writeln!(bufw, "{}\t{}", name1, name2)?;
    }
    bufw.flush()?;
    Ok(())
} // end of write_edgelist

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn edgelist_round_trip() {
        log_init_test();
        let dir = tempfile::TempDir::new().unwrap();
        let mut g = GraphStore::new();
        for (n1, n2) in [("1", "2"), ("2", "3"), ("3", "1")] {
            g.add_edge(n1, n2);
        }
        let path = dir.path().join("triangle.edgelist");
        write_edgelist(&g, &path).unwrap();
        // a directed edge list reloads onto the same undirected simple graph
        let reloaded = read_edgelist(&path).unwrap();
        assert_eq!(reloaded.get_nb_nodes(), 3);
        assert_eq!(reloaded.get_nb_edges(), 3);
        let mut edges: Vec<(String, String)> = reloaded
            .get_edges()
            .iter()
            .map(|(a, b)| (reloaded.get_name(*a).to_string(), reloaded.get_name(*b).to_string()))
            .collect();
        edges.sort();
        assert_eq!(
            edges,
            vec![
                ("1".to_string(), "2".to_string()),
                ("2".to_string(), "3".to_string()),
                ("3".to_string(), "1".to_string())
            ]
        );
    } // end of edgelist_round_trip

    #[test]
    fn missing_file_is_input_error() {
        log_init_test();
        let res = read_edgelist(Path::new("/nonexistent/never.edgelist"));
        assert!(res.is_err());
    } // end of missing_file_is_input_error
} // end of mod tests
