//! Adapter around the external kronfit process.
//!
//! One invocation per sample fits a 2x2 Kronecker initiator matrix to the sample's
//! edge list. Jobs are independent : each reads one input file and writes one output
//! file at a collision free path, and a job whose output already exists is skipped,
//! so a partially failed batch can be re-run with at most once execution per
//! (input, output) pair.
//!
//! The process writes human readable text. The decode scrapes the first bracketed
//! block and fails loudly on any shape mismatch, a missing or garbled output must
//! never turn into a silent zero point.


use rayon::prelude::*;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::error::ShapeError;

/// invocation parameters of the external fitting process
#[derive(Debug, Clone)]
pub struct KronFitParams {
    /// the fitting executable
    pub command: String,
    /// initiator matrix size passed as -n0:
    pub n0: usize,
    /// gradient descent iterations passed as -gi:
    pub gradient_iterations: usize,
    /// wall clock bound per invocation
    pub timeout: Duration,
} // end of KronFitParams

impl Default for KronFitParams {
    fn default() -> Self {
        KronFitParams {
            command: String::from("kronfit"),
            n0: 2,
            gradient_iterations: 20,
            timeout: Duration::from_secs(600),
        }
    }
}

/// one fitting job : a sample edge list in, a text report out
#[derive(Debug, Clone)]
pub struct KronFitJob {
    /// sampling proportion, 100 for the full graph
    pub scale: usize,
    /// replicate index, None for the full graph
    pub replicate: Option<usize>,
    ///
    pub input: PathBuf,
    ///
    pub output: PathBuf,
} // end of KronFitJob

/// the job list of a run : the full graph first, then every (scale, replicate) sample.
/// Output paths are unique by construction, no locking is needed in the batch.
pub fn plan_jobs(directory: &Path, step: usize, nos: usize) -> Vec<KronFitJob> {
    let mut jobs = Vec::<KronFitJob>::with_capacity(nos * (100 / step) + 1);
    jobs.push(KronFitJob {
        scale: 100,
        replicate: None,
        input: directory.join("100.edgelist"),
        output: directory.join("100_output.dat"),
    });
    for p in (step..100).step_by(step) {
        for i in 0..nos {
            let scale_dir = directory.join(p.to_string());
            jobs.push(KronFitJob {
                scale: p,
                replicate: Some(i),
                input: scale_dir.join(format!("{}.edgelist", i)),
                output: scale_dir.join(format!("{}_output.dat", i)),
            });
        }
    }
    jobs
} // end of plan_jobs

/// jobs of the list whose output does not exist yet
pub fn pending_jobs<'a>(jobs: &'a [KronFitJob]) -> Vec<&'a KronFitJob> {
    jobs.iter().filter(|j| !j.output.exists()).collect()
} // end of pending_jobs

/// run every pending job of the batch on a pool of half the processing units.
/// Fail fast : the first job error aborts the whole batch.
/// Returns the number of invocations actually performed.
pub fn run_batch(jobs: &[KronFitJob], params: &KronFitParams) -> anyhow::Result<usize> {
    let pending = pending_jobs(jobs);
    log::info!(
        "kronfit batch : {} jobs, {} skipped with existing output",
        jobs.len(),
        jobs.len() - pending.len()
    );
    if pending.is_empty() {
        return Ok(0);
    }
    let nb_threads = (num_cpus::get() / 2).max(1);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(nb_threads).build()?;
    pool.install(|| {
        pending
            .par_iter()
            .map(|job| run_one(job, params))
            .collect::<Result<Vec<()>, ShapeError>>()
    })?;
    Ok(pending.len())
} // end of run_batch

// one bounded invocation. The timeout poll is coarse, the process is expected to run
// for seconds to minutes.
fn run_one(job: &KronFitJob, params: &KronFitParams) -> Result<(), ShapeError> {
    log::debug!("kronfit {:?} -> {:?}", job.input, job.output);
    let spawned = Command::new(&params.command)
        .arg(format!("-i:{}", job.input.display()))
        .arg(format!("-n0:{}", params.n0))
        .arg(format!("-gi:{}", params.gradient_iterations))
        .arg(format!("-o:{}", job.output.display()))
        .stdout(Stdio::null())
        .spawn();
    let mut child = spawned.map_err(|e| ShapeError::ExternalProcess {
        path: job.input.clone(),
        reason: format!("could not spawn {} : {}", params.command, e),
    })?;
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                if status.success() {
                    return Ok(());
                } else {
                    return Err(ShapeError::ExternalProcess {
                        path: job.input.clone(),
                        reason: format!("{} exited with {}", params.command, status),
                    });
                }
            }
            Ok(None) => {
                if start.elapsed() > params.timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ShapeError::ExternalProcess {
                        path: job.input.clone(),
                        reason: format!("{} timed out after {:?}", params.command, params.timeout),
                    });
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => {
                return Err(ShapeError::ExternalProcess {
                    path: job.input.clone(),
                    reason: format!("wait on {} failed : {}", params.command, e),
                });
            }
        }
    }
} // end of run_one

/// decode the fitted initiator parameters from the process report.
/// The first bracketed block holds comma/semicolon delimited fields, of which we keep
/// the first, the second up to its first semicolon and the third.
pub fn parse_kron_output(output: &Path) -> Result<[f64; 3], ShapeError> {
    let text = fs::read_to_string(output).map_err(|e| ShapeError::ExternalProcess {
        path: output.to_path_buf(),
        reason: format!("could not read output : {}", e),
    })?;
    let open = text.find('[').ok_or_else(|| ShapeError::ExternalProcess {
        path: output.to_path_buf(),
        reason: String::from("no bracketed parameter block in output"),
    })?;
    let close = text[open + 1..]
        .find(']')
        .ok_or_else(|| ShapeError::ExternalProcess {
            path: output.to_path_buf(),
            reason: String::from("unterminated parameter block in output"),
        })?;
    let inner = &text[open + 1..open + 1 + close];
    let fields: Vec<&str> = inner.split(',').collect();
    if fields.len() < 3 {
        return Err(ShapeError::ExternalProcess {
            path: output.to_path_buf(),
            reason: format!("expected 3 parameter fields, got {}", fields.len()),
        });
    }
    let a = fields[0].trim();
    let b = fields[1].split(';').next().unwrap().trim();
    let d = fields[2].trim();
    let parse = |s: &str| -> Result<f64, ShapeError> {
        s.parse::<f64>().map_err(|_| ShapeError::ExternalProcess {
            path: output.to_path_buf(),
            reason: format!("unparsable parameter field : {}", s),
        })
    };
    Ok([parse(a)?, parse(b)?, parse(d)?])
} // end of parse_kron_output

#[cfg(test)]
mod tests {

    use super::*;
    use std::io::Write;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn plan_covers_all_samples_plus_full() {
        log_init_test();
        let jobs = plan_jobs(Path::new("net"), 10, 10);
        assert_eq!(jobs.len(), 91);
        assert_eq!(jobs[0].scale, 100);
        assert!(jobs[0].replicate.is_none());
        assert_eq!(jobs[1].scale, 10);
        assert_eq!(jobs[1].replicate, Some(0));
        assert_eq!(jobs[90].scale, 90);
        assert_eq!(jobs[90].replicate, Some(9));
    } // end of plan_covers_all_samples_plus_full

    #[test]
    fn existing_outputs_are_skipped() {
        log_init_test();
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("50")).unwrap();
        let jobs = plan_jobs(dir.path(), 50, 2);
        assert_eq!(jobs.len(), 3);
        assert_eq!(pending_jobs(&jobs).len(), 3);
        // materialize every output : the batch has nothing left to run
        for job in &jobs {
            std::fs::write(&job.output, "[0.9, 0.6; 0.6, 0.3]").unwrap();
        }
        assert!(pending_jobs(&jobs).is_empty());
        let executed = run_batch(&jobs, &KronFitParams::default()).unwrap();
        assert_eq!(executed, 0);
    } // end of existing_outputs_are_skipped

    #[test]
    fn parse_extracts_the_initiator_triple() {
        log_init_test();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("0_output.dat");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Input graph: 1000 nodes, 4000 edges").unwrap();
        writeln!(file, "FITTED PARAMS").unwrap();
        writeln!(file, "  Estimated initiator  [0.9021, 0.5740; 0.5740, 0.2156]").unwrap();
        drop(file);
        let triple = parse_kron_output(&path).unwrap();
        assert_eq!(triple, [0.9021, 0.5740, 0.2156]);
    } // end of parse_extracts_the_initiator_triple

    #[test]
    fn missing_bracket_is_external_process_error() {
        log_init_test();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("0_output.dat");
        std::fs::write(&path, "the process crashed before reporting").unwrap();
        match parse_kron_output(&path) {
            Err(ShapeError::ExternalProcess { .. }) => {}
            _ => panic!("expected an external process error"),
        }
        // missing file altogether
        assert!(parse_kron_output(&dir.path().join("never.dat")).is_err());
    } // end of missing_bracket_is_external_process_error
} // end of mod tests
