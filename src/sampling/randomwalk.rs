//! random walk with restart sampling.
//!
//! A visited node set is grown until it reaches ⌊|V|·p/100⌋ nodes. At each step the
//! current node is added, then with probability restart_prob the walk jumps back to its
//! start node, otherwise it moves to a uniformly random neighbour. Every jump_iteration
//! steps the visited count is checked : if it did not grow, the walk restarts from a
//! brand new uniformly random node, which escapes disconnected component traps and
//! low degree dead zones.
//!
//! When the reachable component is smaller than the target the loop cannot complete,
//! so the walk is bounded by an explicit iteration cap and exceeding it is a
//! [ShapeError::SamplingLiveness] for that (scale, replicate) job, never a hang.


use indexmap::IndexSet;

use petgraph::graph::NodeIndex;

use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::ShapeError;
use crate::graph::GraphStore;

/// knobs of the walk. Defaults follow the usual restart walk settings.
#[derive(Debug, Clone, Copy)]
pub struct WalkParams {
    /// probability of jumping back to the walk start node at each step
    pub restart_prob: f64,
    /// stagnation check period, in steps
    pub jump_iteration: usize,
    /// iteration cap factor : the walk aborts after max_iter_factor · target steps
    pub max_iter_factor: usize,
} // end of WalkParams

impl Default for WalkParams {
    fn default() -> Self {
        WalkParams {
            restart_prob: 0.15,
            jump_iteration: 10,
            max_iter_factor: 1000,
        }
    }
}

/// grow a visited set to ⌊|V|·p/100⌋ nodes and return the induced sub graph
pub fn sample_random_walk(
    graph: &GraphStore,
    p: usize,
    replicate: usize,
    params: &WalkParams,
    rng: &mut Xoshiro256PlusPlus,
) -> Result<GraphStore, ShapeError> {
    let nodes = graph.get_node_indices();
    let target = nodes.len() * p / 100;
    let mut visited = IndexSet::<NodeIndex<u32>>::with_capacity(target);
    if target == 0 || nodes.is_empty() {
        return Ok(graph.induced_subgraph(&visited));
    }
    //
    let uniform = Uniform::<f64>::new(0., 1.);
    let mut start = nodes[rng.gen_range(0..nodes.len())];
    let mut current = start;
    // stagnation bookkeeping
    let mut restart_iteration = 0;
    let mut last_nb_visited = 0;
    //
    let max_iteration = params.max_iter_factor.saturating_mul(target);
    let mut total_iteration: usize = 0;
    while visited.len() < target {
        total_iteration += 1;
        if total_iteration > max_iteration {
            log::error!(
                "random walk stalled : scale {}, replicate {}, visited {} of {} after {} steps",
                p,
                replicate,
                visited.len(),
                target,
                max_iteration
            );
            return Err(ShapeError::SamplingLiveness {
                scale: p,
                replicate,
                target,
                visited: visited.len(),
            });
        }
        visited.insert(current);
        // restart with probability restart_prob, else move one step
        let xsi = uniform.sample(rng);
        if xsi < params.restart_prob {
            current = start;
        } else {
            let neighbours = graph.get_neighbours(current);
            if neighbours.is_empty() {
                // isolated node, nowhere to move : same escape as stagnation
                start = nodes[rng.gen_range(0..nodes.len())];
                current = start;
            } else {
                current = neighbours[rng.gen_range(0..neighbours.len())];
            }
        }
        // find a new start node if the visited set did not grow over the check period
        if restart_iteration < params.jump_iteration {
            restart_iteration += 1;
        } else {
            if last_nb_visited == visited.len() {
                start = nodes[rng.gen_range(0..nodes.len())];
                current = start;
            }
            restart_iteration = 0;
            last_nb_visited = visited.len();
        }
    }
    log::trace!(
        "random walk scale {} replicate {} done in {} steps",
        p,
        replicate,
        total_iteration
    );
    Ok(graph.induced_subgraph(&visited))
} // end of sample_random_walk

// end of mod tests
