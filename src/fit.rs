//! Shape fitting boundary.
//!
//! The hull / cuboid / sphere math lives in an external geometry engine. The pipeline
//! only guarantees the shape of what it hands over : a 4 column numeric table of at
//! least 2 points. Descriptor and figure files are side effects of the engine.


use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ShapeError;
use crate::points::PointCloud;

/// the fitting capabilities consumed by the pipeline
pub trait ShapeFitter {
    /// fit a convex hull around the cloud
    fn fit_hull(&self, points: &PointCloud, display_name: &str) -> anyhow::Result<()>;
    /// fit a minimal cuboid around the cloud
    fn fit_cuboid(&self, points: &PointCloud, display_name: &str) -> anyhow::Result<()>;
    /// fit a minimal enclosing sphere around the cloud
    fn fit_sphere(&self, points: &PointCloud, display_name: &str) -> anyhow::Result<()>;
} // end of trait ShapeFitter

/// adapter invoking an external geometry engine once per shape.
/// The engine is called as : command shape table_path output_directory display_name
pub struct GeometryEngine {
    /// the engine executable
    command: String,
    /// directory receiving the descriptor files
    directory: PathBuf,
} // end of GeometryEngine

impl GeometryEngine {
    pub fn new(command: &str, directory: &Path) -> Self {
        GeometryEngine {
            command: command.to_string(),
            directory: directory.to_path_buf(),
        }
    }

    fn run_shape(&self, shape: &str, points: &PointCloud, display_name: &str) -> anyhow::Result<()> {
        if points.get_nb_points() < 2 {
            return Err(anyhow::anyhow!(
                "cannot fit a {} over {} point(s), need at least 2",
                shape,
                points.get_nb_points()
            ));
        }
        let table = self.directory.join(format!("{}_points.csv", shape));
        points.dump_csv(&table, ["x", "y", "z"])?;
        log::info!("fitting {} for {}", shape, display_name);
        let status = Command::new(&self.command)
            .arg(shape)
            .arg(&table)
            .arg(&self.directory)
            .arg(display_name)
            .status()
            .map_err(|e| ShapeError::ExternalProcess {
                path: table.clone(),
                reason: format!("could not spawn {} : {}", self.command, e),
            })?;
        if !status.success() {
            return Err(ShapeError::ExternalProcess {
                path: table,
                reason: format!("{} {} exited with {}", self.command, shape, status),
            }
            .into());
        }
        Ok(())
    } // end of run_shape
} // end of impl GeometryEngine

impl ShapeFitter for GeometryEngine {
    fn fit_hull(&self, points: &PointCloud, display_name: &str) -> anyhow::Result<()> {
        self.run_shape("hull", points, display_name)
    }

    fn fit_cuboid(&self, points: &PointCloud, display_name: &str) -> anyhow::Result<()> {
        self.run_shape("cuboid", points, display_name)
    }

    fn fit_sphere(&self, points: &PointCloud, display_name: &str) -> anyhow::Result<()> {
        self.run_shape("sphere", points, display_name)
    }
} // end of impl ShapeFitter for GeometryEngine

// end of mod tests
