//! an executable generating the 3D shape of a network
//! example usage:
//! netshape --file "as20graph.txt" --name as20graph --step 10 --nos 10 --embedding kronecker --sampling random-edge
//! netshape --file "as20graph.txt" --name as20graph --embedding graph2vec --sampling random-walk --zip
//!
//! sampling methods : random-edge, random-node or random-walk (with restart)
//! embedding methods : kronecker (needs the external kronfit executable in the path)
//!    or graph2vec (Weisfeiler Lehman feature documents)
//! the hull, cuboid and sphere fits all run whatever --fitting says, the flag is
//! recorded for the engine display only
//!


use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command};

use std::path::{Path, PathBuf};

use netshape::archive;
use netshape::prelude::*;

/// the decoded configuration surface of a run
struct RunParams {
    name: String,
    file: PathBuf,
    step: usize,
    nos: usize,
    sampling: SamplingMethod,
    embedding: EmbeddingMethod,
    fitting: String,
    engine: String,
    seed: u64,
    zip: bool,
} // end of RunParams

fn parse_usize(matches: &ArgMatches, key: &str) -> Result<usize, anyhow::Error> {
    match matches.value_of(key) {
        Some(str) => {
            let res = str.parse::<usize>();
            if res.is_ok() {
                Ok(res.unwrap())
            } else {
                Err(anyhow!("error parsing {}", key))
            }
        }
        _ => Err(anyhow!("error parsing {}", key)),
    }
} // end of parse_usize

fn parse_args(matches: &ArgMatches) -> Result<RunParams, anyhow::Error> {
    let file = match matches.value_of("file") {
        Some(str) => PathBuf::from(str),
        _ => {
            return Err(anyhow!("input edge list file is required"));
        }
    };
    let name = match matches.value_of("name") {
        Some(str) => str.to_string(),
        _ => {
            return Err(anyhow!("error parsing name"));
        }
    };
    let step = parse_usize(matches, "step")?;
    if step == 0 || step >= 100 {
        return Err(anyhow!("step must be in (0,100), got {}", step));
    }
    let nos = parse_usize(matches, "nos")?;
    if nos == 0 {
        return Err(anyhow!("nos must be at least 1"));
    }
    //
    let sampling = match matches.value_of("sampling") {
        Some("random-edge") => SamplingMethod::RandomEdge,
        Some("random-node") => SamplingMethod::RandomNode,
        Some("random-walk") => SamplingMethod::RandomWalk(WalkParams::default()),
        _ => {
            return Err(anyhow!("sampling must be random-edge, random-node or random-walk"));
        }
    };
    let embedding = match matches.value_of("embedding") {
        Some("kronecker") => {
            let mut kronfit = KronFitParams::default();
            if let Some(str) = matches.value_of("kronfit") {
                kronfit.command = str.to_string();
            }
            EmbeddingMethod::Kronecker(kronfit)
        }
        Some("graph2vec") => EmbeddingMethod::FeatureDocument { wl_rounds: 2 },
        _ => {
            return Err(anyhow!("embedding must be kronecker or graph2vec"));
        }
    };
    let fitting = match matches.value_of("fitting") {
        Some(str @ ("hull" | "cuboid" | "sphere")) => str.to_string(),
        _ => {
            return Err(anyhow!("fitting must be hull, cuboid or sphere"));
        }
    };
    let engine = matches.value_of("engine").unwrap_or("shapefit").to_string();
    //
    let seed = match matches.value_of("seed") {
        Some(str) => str
            .parse::<u64>()
            .map_err(|_| anyhow!("error parsing seed"))?,
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos() as u64,
    };
    //
    Ok(RunParams {
        name,
        file,
        step,
        nos,
        sampling,
        embedding,
        fitting,
        engine,
        seed,
        zip: matches.is_present("zip"),
    })
} // end of parse_args

// the run directory is cleared wholesale, stale artifacts never survive across runs
fn reset_directory(directory: &Path) -> anyhow::Result<()> {
    if directory.is_dir() {
        std::fs::remove_dir_all(directory)?;
    }
    std::fs::create_dir_all(directory)?;
    Ok(())
} // end of reset_directory

fn run(params: &RunParams) -> anyhow::Result<()> {
    let directory = PathBuf::from(&params.name);
    reset_directory(&directory)?;
    //
    let graph = read_edgelist(&params.file)?;
    //
    let sampling_params = SamplingParams::new(params.step, params.nos, params.sampling, params.seed);
    let sampler = Sampler::new(&graph, sampling_params, &directory);
    sampler.sample()?;
    //
    let embedder = Embedder::new(&directory, params.step, params.nos, params.embedding.clone());
    let cloud = embedder.embed()?;
    //
    // reference behaviour : all three shapes are fitted whatever the fitting flag says
    let engine = GeometryEngine::new(&params.engine, &directory);
    engine.fit_hull(&cloud, &params.name)?;
    engine.fit_cuboid(&cloud, &params.name)?;
    engine.fit_sphere(&cloud, &params.name)?;
    //
    if params.zip {
        let zip_path = archive::bundle_artifacts(&directory)?;
        log::info!("artifacts bundled in {:?}", zip_path);
    }
    Ok(())
} // end of run

pub fn main() {
    //
    let _ = env_logger::builder().is_test(true).try_init();
    log::info!("logger initialized");
    //
    let matches = Command::new("netshape")
        .arg_required_else_help(true)
        .arg(Arg::new("file")
            .long("file")
            .short('f')
            .takes_value(true)
            .required(true)
            .help("input edge list file (tab delimited, undirected)"))
        .arg(Arg::new("name")
            .long("name")
            .takes_value(true)
            .default_value("network")
            .help("network name, also the run directory"))
        .arg(Arg::new("step")
            .long("step")
            .takes_value(true)
            .default_value("10")
            .help("sampling proportion step (percentage)"))
        .arg(Arg::new("nos")
            .long("nos")
            .short('t')
            .takes_value(true)
            .default_value("10")
            .help("number of samples for each sampling proportion"))
        .arg(Arg::new("embedding")
            .long("embedding")
            .takes_value(true)
            .default_value("graph2vec")
            .help("embedding method : kronecker or graph2vec"))
        .arg(Arg::new("sampling")
            .long("sampling")
            .takes_value(true)
            .default_value("random-edge")
            .help("sampling method : random-edge, random-node or random-walk"))
        .arg(Arg::new("fitting")
            .long("fitting")
            .takes_value(true)
            .default_value("hull")
            .help("fitting method : hull, cuboid or sphere (all three always run)"))
        .arg(Arg::new("kronfit")
            .long("kronfit")
            .takes_value(true)
            .help("path of the kronfit executable, default searches the PATH"))
        .arg(Arg::new("engine")
            .long("engine")
            .takes_value(true)
            .help("path of the geometry engine executable"))
        .arg(Arg::new("seed")
            .long("seed")
            .takes_value(true)
            .help("base random seed for reproducible sampling"))
        .arg(Arg::new("zip")
            .long("zip")
            .short('z')
            .takes_value(false)
            .help("copy and zip the run artifacts for downloading"))
        .get_matches();

    // decode args

    let params = match parse_args(&matches) {
        Ok(params) => params,
        Err(e) => {
            log::error!("netshape argument error : {:?}", e);
            std::process::exit(1);
        }
    };
    log::info!("network name : {}", params.name);
    log::info!("input edge file : {:?}", params.file);
    log::info!("sampling proportion step : {}", params.step);
    log::info!("number of samples per proportion : {}", params.nos);
    log::info!("sampling method : {:?}", params.sampling);
    log::info!("embedding method : {:?}", params.embedding);
    log::info!("fitting flag : {}", params.fitting);
    log::info!("base seed : {}", params.seed);
    //
    if let Err(e) = run(&params) {
        log::error!("netshape run failed : {:?}", e);
        std::process::exit(1);
    }
} // end of main
