//! To ease access to most frequently used items
//!


pub use crate::io::edgelist::{read_edgelist, write_edgelist};
pub use crate::io::graphjson::{read_document, write_document, EdgeDocument};

pub use crate::graph::GraphStore;

pub use crate::sampling::{Sampler, SamplingMethod, SamplingParams, WalkParams};

pub use crate::embed::kronecker::KronFitParams;
pub use crate::embed::{Embedder, EmbeddingMethod};

pub use crate::points::{expected_nb_points, EmbeddingPoint, PointCloud, PointCollector};

pub use crate::fit::{GeometryEngine, ShapeFitter};

pub use crate::error::ShapeError;
