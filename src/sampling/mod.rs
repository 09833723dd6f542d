//! Sub sampling of the network at increasing scales.
//!
//! For every scale p in \[step, 100) stepped by step, the sampler draws nos independent
//! sub samples with the configured strategy and persists each one as a directed tab
//! delimited edge list and as a json edge document. The full graph is persisted once
//! at scale 100.
//!
//! Each (scale, replicate) job gets its own random generator seeded from the base seed,
//! so runs are reproducible and jobs never share mutable generator state.


use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use std::fs;
use std::path::{Path, PathBuf};

use crate::graph::GraphStore;
use crate::io::{edgelist, graphjson};

pub mod randomedge;
pub mod randomnode;
pub mod randomwalk;

pub use randomwalk::WalkParams;

/// the three interchangeable sub sampling strategies
#[derive(Debug, Clone, Copy)]
pub enum SamplingMethod {
    /// shuffle the edge set, drop a (100-p)/100 fraction
    RandomEdge,
    /// shuffle the node list, induce on the first |V|·p/100 nodes
    RandomNode,
    /// random walk with restart, grown to |V|·p/100 visited nodes
    RandomWalk(WalkParams),
} // end of SamplingMethod

#[derive(Debug, Clone, Copy)]
pub struct SamplingParams {
    /// sampling proportion step (percentage), 0 < step < 100
    pub step: usize,
    /// number of samples for each sampling proportion
    pub nos: usize,
    ///
    pub method: SamplingMethod,
    /// base seed from which per job generators are derived
    pub base_seed: u64,
} // end of SamplingParams

impl SamplingParams {
    pub fn new(step: usize, nos: usize, method: SamplingMethod, base_seed: u64) -> Self {
        assert!(step > 0 && step < 100, "step must be in (0,100)");
        assert!(nos > 0, "need at least one replicate per scale");
        SamplingParams { step, nos, method, base_seed }
    }

    /// the scales a run samples at, ascending, scale 100 excluded
    pub fn get_scales(&self) -> Vec<usize> {
        (self.step..100).step_by(self.step).collect()
    }
} // end of impl SamplingParams

/// a generator for one (scale, replicate) job, derived from the run base seed
pub(crate) fn job_rng(base_seed: u64, scale: usize, replicate: usize) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(base_seed ^ ((scale as u64) << 32) ^ replicate as u64)
} // end of job_rng

/// draws and persists every sub sample of a run
pub struct Sampler<'a> {
    ///
    graph: &'a GraphStore,
    ///
    params: SamplingParams,
    /// run directory, one sub directory per scale is created below it
    directory: PathBuf,
} // end of Sampler

impl<'a> Sampler<'a> {
    pub fn new(graph: &'a GraphStore, params: SamplingParams, directory: &Path) -> Self {
        Sampler {
            graph,
            params,
            directory: directory.to_path_buf(),
        }
    }

    /// run the whole sampling stage : full graph at 100, then nos replicates per scale
    pub fn sample(&self) -> anyhow::Result<()> {
        // the full graph artifacts, consumed by the embedding stage at scale 100
        edgelist::write_edgelist(self.graph, &self.directory.join("100.edgelist"))?;
        graphjson::write_document(self.graph, &self.directory.join("100.json"))?;
        //
        for p in self.params.get_scales() {
            log::info!("sampling {}% subgraphs", p);
            let scale_dir = self.directory.join(p.to_string());
            fs::create_dir(&scale_dir)?;
            for i in 0..self.params.nos {
                let sub = self.draw(p, i)?;
                log::debug!(
                    "scale {} replicate {} : {} nodes, {} edges",
                    p,
                    i,
                    sub.get_nb_nodes(),
                    sub.get_nb_edges()
                );
                edgelist::write_edgelist(&sub, &scale_dir.join(format!("{}.edgelist", i)))?;
                graphjson::write_document(&sub, &scale_dir.join(format!("{}.json", i)))?;
            }
        }
        Ok(())
    } // end of sample

    /// one sub sample at (scale p, replicate i)
    fn draw(&self, p: usize, i: usize) -> anyhow::Result<GraphStore> {
        let mut rng = job_rng(self.params.base_seed, p, i);
        match self.params.method {
            SamplingMethod::RandomEdge => Ok(randomedge::sample_random_edge(self.graph, p, &mut rng)),
            SamplingMethod::RandomNode => Ok(randomnode::sample_random_node(self.graph, p, &mut rng)),
            SamplingMethod::RandomWalk(walk) => {
                let sub = randomwalk::sample_random_walk(self.graph, p, i, &walk, &mut rng)?;
                Ok(sub)
            }
        }
    } // end of draw
} // end of impl Sampler

// end of mod tests
