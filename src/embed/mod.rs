//! Embedding of every sub sample into one 3D point.
//!
//! Two mutually exclusive strategies, selected once at configuration time :
//! - kronecker : one external fitting process per sample, the fitted 2x2 initiator
//!   parameters (a, b, d) are the coordinates.
//! - feature document : Weisfeiler Lehman documents for every sample, one embedding
//!   model trained over the whole corpus, the learned vector per tag are the
//!   coordinates. Training is a synchronization barrier after the parallel
//!   extraction batch.
//!
//! Either way each (scale, replicate) sample yields exactly one point, plus one for
//! the full graph at scale 100.


use cpu_time::ProcessTime;
use std::time::SystemTime;

use rayon::prelude::*;

use std::path::{Path, PathBuf};

use crate::io::graphjson;
use crate::points::{expected_nb_points, PointCloud, PointCollector};

pub mod docembed;
pub mod kronecker;
pub mod wl;

use docembed::{DocEmbedder, HashProjectionModel};
use kronecker::KronFitParams;

/// the two embedding strategies
#[derive(Debug, Clone)]
pub enum EmbeddingMethod {
    /// external Kronecker parameter fitting per sample
    Kronecker(KronFitParams),
    /// Weisfeiler Lehman documents + document embedding model
    FeatureDocument {
        /// number of relabeling rounds per document
        wl_rounds: usize,
    },
} // end of EmbeddingMethod

/// one document extraction job of the feature document batch
struct DocJob {
    scale: usize,
    replicate: Option<usize>,
    path: PathBuf,
    tag: String,
} // end of DocJob

/// runs the embedding stage over the persisted samples of a run directory
pub struct Embedder {
    ///
    directory: PathBuf,
    ///
    step: usize,
    ///
    nos: usize,
    ///
    method: EmbeddingMethod,
} // end of Embedder

impl Embedder {
    pub fn new(directory: &Path, step: usize, nos: usize, method: EmbeddingMethod) -> Self {
        Embedder {
            directory: directory.to_path_buf(),
            step,
            nos,
            method,
        }
    }

    /// embed every sample and return the ordered point cloud.
    /// The table artifact (kron_points.txt or g2v_points.txt) is written alongside.
    pub fn embed(&self) -> anyhow::Result<PointCloud> {
        let sys_start = SystemTime::now();
        let cpu_start = ProcessTime::now();
        let cloud = match &self.method {
            EmbeddingMethod::Kronecker(params) => self.embed_kronecker(params),
            EmbeddingMethod::FeatureDocument { wl_rounds } => self.embed_documents(*wl_rounds),
        }?;
        log::info!(
            "embedding stage done, sys time(s) {:?} cpu time(s) {:?}",
            sys_start.elapsed().unwrap().as_secs(),
            cpu_start.elapsed().as_secs()
        );
        let expected = expected_nb_points(self.step, self.nos);
        assert_eq!(cloud.get_nb_points(), expected, "point count mismatch");
        Ok(cloud)
    } // end of embed

    fn embed_kronecker(&self, params: &KronFitParams) -> anyhow::Result<PointCloud> {
        let jobs = kronecker::plan_jobs(&self.directory, self.step, self.nos);
        let executed = kronecker::run_batch(&jobs, params)?;
        log::info!("kronfit finished, {} invocations", executed);
        //
        let mut collector = PointCollector::new();
        for job in &jobs {
            let coords = kronecker::parse_kron_output(&job.output)?;
            match job.replicate {
                Some(i) => collector.insert(job.scale, i, coords),
                None => collector.insert_full(coords),
            }
        }
        let cloud = collector.into_cloud();
        cloud.dump_csv(&self.directory.join("kron_points.txt"), ["a", "b", "d"])?;
        Ok(cloud)
    } // end of embed_kronecker

    fn embed_documents(&self, wl_rounds: usize) -> anyhow::Result<PointCloud> {
        let jobs = self.plan_doc_jobs();
        log::info!("feature extraction over {} documents", jobs.len());
        //
        let nb_threads = (num_cpus::get() / 2).max(1);
        let pool = rayon::ThreadPoolBuilder::new().num_threads(nb_threads).build()?;
        let corpus = pool.install(|| {
            jobs.par_iter()
                .map(|job| {
                    let sub = graphjson::read_document(&job.path)?;
                    Ok(wl::extract(&sub, None, wl_rounds, &job.tag))
                })
                .collect::<anyhow::Result<Vec<wl::FeatureDocument>>>()
        })?;
        // training barrier : one model over the whole corpus, then vector lookups
        let mut model = HashProjectionModel::new();
        model.train(&corpus)?;
        //
        let mut collector = PointCollector::new();
        for job in &jobs {
            let coords = model
                .get_vector(&job.tag)
                .ok_or_else(|| anyhow::anyhow!("no learned vector for tag {}", job.tag))?;
            match job.replicate {
                Some(i) => collector.insert(job.scale, i, coords),
                None => collector.insert_full(coords),
            }
        }
        let cloud = collector.into_cloud();
        cloud.dump_csv(&self.directory.join("g2v_points.txt"), ["x1", "x2", "x3"])?;
        Ok(cloud)
    } // end of embed_documents

    // document jobs mirror the kronfit job list : full graph plus every sample.
    // Tags encode the sample identity so one global model can serve every scale.
    fn plan_doc_jobs(&self) -> Vec<DocJob> {
        let mut jobs = Vec::<DocJob>::new();
        jobs.push(DocJob {
            scale: 100,
            replicate: None,
            path: self.directory.join("100.json"),
            tag: String::from("g_100"),
        });
        for p in (self.step..100).step_by(self.step) {
            for i in 0..self.nos {
                jobs.push(DocJob {
                    scale: p,
                    replicate: Some(i),
                    path: self.directory.join(p.to_string()).join(format!("{}.json", i)),
                    tag: format!("g_{}_{}", p, i),
                });
            }
        }
        jobs
    } // end of plan_doc_jobs
} // end of impl Embedder

// end of mod tests
