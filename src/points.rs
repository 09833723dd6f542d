//! Embedding points and the point cloud handed to the shape fitter.
//!
//! One point per sub sample plus one for the full graph at scale 100. The collector
//! re-imposes ascending (scale, replicate) order on aggregation, so it never relies on
//! job completion order in the parallel batches.


use ndarray::Array2;

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

/// a 3D coordinate plus the sampling proportion it was derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddingPoint {
    ///
    pub coords: [f64; 3],
    /// sampling proportion in percent, 100 for the full graph
    pub scale: usize,
} // end of EmbeddingPoint

/// the full ordered collection of embedding points for one network across all scales
#[derive(Debug, Clone)]
pub struct PointCloud {
    points: Vec<EmbeddingPoint>,
} // end of PointCloud

impl PointCloud {
    ///
    pub fn get_points(&self) -> &[EmbeddingPoint] {
        &self.points
    }

    ///
    pub fn get_nb_points(&self) -> usize {
        self.points.len()
    }

    /// (n, 4) matrix view for the geometry engine : x, y, z, scale per row
    pub fn to_array(&self) -> Array2<f64> {
        let mut arr = Array2::<f64>::zeros((self.points.len(), 4));
        for (i, pt) in self.points.iter().enumerate() {
            arr[[i, 0]] = pt.coords[0];
            arr[[i, 1]] = pt.coords[1];
            arr[[i, 2]] = pt.coords[2];
            arr[[i, 3]] = pt.scale as f64;
        }
        arr
    } // end of to_array

    /// dump as a comma separated table with the given 3 coordinate column names,
    /// one row per point. This is the kron_points.txt / g2v_points.txt artifact.
    pub fn dump_csv(&self, filepath: &Path, coord_names: [&str; 3]) -> anyhow::Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(filepath)?;
        let mut bufw = BufWriter::new(file);
        writeln!(
            bufw,
            "{},{},{},sampling_proportion",
            coord_names[0], coord_names[1], coord_names[2]
        )?;
        for pt in &self.points {
            writeln!(
                bufw,
                "{},{},{},{}",
                pt.coords[0], pt.coords[1], pt.coords[2], pt.scale
            )?;
        }
        bufw.flush()?;
        Ok(())
    } // end of dump_csv
} // end of impl PointCloud

/// aggregates per job embedding results into the ordered point cloud
pub struct PointCollector {
    /// (scale, replicate) keyed sample points, in arbitrary insertion order
    samples: Vec<(usize, usize, [f64; 3])>,
    /// the scale 100 full graph point, appended last exactly once
    full: Option<[f64; 3]>,
} // end of PointCollector

impl PointCollector {
    pub fn new() -> Self {
        PointCollector {
            samples: Vec::new(),
            full: None,
        }
    }

    /// record the point of one (scale, replicate) sample
    pub fn insert(&mut self, scale: usize, replicate: usize, coords: [f64; 3]) {
        self.samples.push((scale, replicate, coords));
    }

    /// record the full graph point
    pub fn insert_full(&mut self, coords: [f64; 3]) {
        assert!(self.full.is_none(), "full graph point recorded twice");
        self.full = Some(coords);
    }

    /// sort by ascending (scale, replicate), append the full graph point and return the cloud
    pub fn into_cloud(mut self) -> PointCloud {
        self.samples
            .sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        let mut points: Vec<EmbeddingPoint> = self
            .samples
            .iter()
            .map(|(scale, _, coords)| EmbeddingPoint {
                coords: *coords,
                scale: *scale,
            })
            .collect();
        if let Some(coords) = self.full {
            points.push(EmbeddingPoint { coords, scale: 100 });
        }
        PointCloud { points }
    } // end of into_cloud
} // end of impl PointCollector

impl Default for PointCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// expected number of points of a run : nos per intermediate scale plus the full graph
pub fn expected_nb_points(step: usize, nos: usize) -> usize {
    nos * (step..100).step_by(step).count() + 1
} // end of expected_nb_points

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn collector_orders_by_scale_then_replicate() {
        log_init_test();
        let mut collector = PointCollector::new();
        // insertion order deliberately scrambled, as with unconstrained job completion
        collector.insert(20, 1, [2., 0., 0.]);
        collector.insert_full([9., 9., 9.]);
        collector.insert(10, 1, [1., 1., 0.]);
        collector.insert(20, 0, [2., 2., 0.]);
        collector.insert(10, 0, [1., 0., 0.]);
        let cloud = collector.into_cloud();
        let scales: Vec<usize> = cloud.get_points().iter().map(|p| p.scale).collect();
        assert_eq!(scales, vec![10, 10, 20, 20, 100]);
        assert_eq!(cloud.get_points()[0].coords, [1., 0., 0.]);
        assert_eq!(cloud.get_points()[1].coords, [1., 1., 0.]);
        assert_eq!(cloud.get_points()[4].coords, [9., 9., 9.]);
    } // end of collector_orders_by_scale_then_replicate

    #[test]
    fn expected_count_matches_formula() {
        log_init_test();
        // nos·⌈(100-step)/step⌉ + 1 over the half open range [step, 100)
        assert_eq!(expected_nb_points(10, 10), 91);
        assert_eq!(expected_nb_points(50, 1), 2);
        assert_eq!(expected_nb_points(30, 2), 7);
    } // end of expected_count_matches_formula

    #[test]
    fn csv_table_has_header_and_one_row_per_point() {
        log_init_test();
        let dir = tempfile::TempDir::new().unwrap();
        let mut collector = PointCollector::new();
        collector.insert(50, 0, [0.5, 0.25, 0.125]);
        collector.insert_full([1., 1., 1.]);
        let cloud = collector.into_cloud();
        let path = dir.path().join("kron_points.txt");
        cloud.dump_csv(&path, ["a", "b", "d"]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "a,b,d,sampling_proportion");
        assert_eq!(lines[1], "0.5,0.25,0.125,50");
        assert_eq!(lines[2], "1,1,1,100");
    } // end of csv_table_has_header_and_one_row_per_point

    #[test]
    fn array_view_is_n_by_4() {
        log_init_test();
        let mut collector = PointCollector::new();
        collector.insert(25, 0, [1., 2., 3.]);
        collector.insert(50, 0, [4., 5., 6.]);
        collector.insert_full([7., 8., 9.]);
        let arr = collector.into_cloud().to_array();
        assert_eq!(arr.shape(), &[3, 4]);
        assert_eq!(arr[[0, 3]], 25.);
        assert_eq!(arr[[2, 3]], 100.);
    } // end of array_view_is_n_by_4
} // end of mod tests
