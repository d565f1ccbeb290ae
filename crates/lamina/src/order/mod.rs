//! Crossing minimization by restarted barycenter sweeps.

mod barycenter;
mod cross_count;
mod init_order;
mod sorting;

pub(crate) use barycenter::Measure;
pub(crate) use cross_count::cross_count;
pub(crate) use init_order::init_order;
pub(crate) use sorting::SortingOrder;

use crate::config::CrossingMinimizationMethod;
use crate::layered::LayeredGraph;
use rand::rngs::StdRng;

/// Segments per inter-layer gap as `(lower port, upper port)`; entry `r` sits between layers
/// `r` and `r + 1`.
pub(crate) type Gaps = Vec<Vec<(usize, usize)>>;

pub(crate) fn gaps(lg: &LayeredGraph, layer_count: usize) -> Gaps {
    let mut gaps: Gaps = vec![Vec::new(); layer_count.saturating_sub(1)];
    for e in &lg.edges {
        for s in &e.segments {
            let (lo, up) = if lg.rank_of_port(s.from) <= lg.rank_of_port(s.to) {
                (s.from, s.to)
            } else {
                (s.to, s.from)
            };
            let rank = lg.rank_of_port(lo);
            debug_assert_eq!(lg.rank_of_port(up), rank + 1, "segment spans one layer");
            if let Some(gap) = gaps.get_mut(rank.max(0) as usize) {
                gap.push((lo, up));
            }
        }
    }
    gaps
}

#[derive(Debug, Clone)]
pub(crate) struct Minimized {
    pub(crate) crossings: usize,
    /// Crossings of each restart's starting order.
    pub(crate) restart_crossings: Vec<usize>,
}

pub(crate) fn minimize(
    lg: &LayeredGraph,
    order: &mut SortingOrder,
    method: CrossingMinimizationMethod,
    iterations: u32,
    max_sweeps: u32,
    rng: &mut StdRng,
) -> Minimized {
    let gaps = gaps(lg, order.layer_count());
    let phases: &[Measure] = match method {
        CrossingMinimizationMethod::Vertices => &[Measure::Vertices],
        CrossingMinimizationMethod::Ports => &[Measure::Ports],
        CrossingMinimizationMethod::Mixed => &[Measure::Vertices, Measure::Ports],
    };

    let initial = order.clone();
    let mut best: Option<(usize, SortingOrder)> = None;
    let mut restart_crossings = Vec::with_capacity(iterations as usize);

    for restart in 0..iterations.max(1) {
        let mut current = initial.clone();
        if restart > 0 {
            current.shuffle(rng);
        }
        let start = cross_count(&current, &gaps, lg.ports.len());
        restart_crossings.push(start);

        let (cc, result) = sweep_until_stable(lg, current, &gaps, phases, max_sweeps, start);
        tracing::trace!(restart, start, cc, "crossing minimization restart");
        if best.as_ref().is_none_or(|(best_cc, _)| cc < *best_cc) {
            best = Some((cc, result));
        }
        if cc == 0 {
            break;
        }
    }

    let crossings = match best {
        Some((cc, result)) => {
            *order = result;
            cc
        }
        None => 0,
    };
    tracing::debug!(?method, crossings, "crossings minimized");
    Minimized {
        crossings,
        restart_crossings,
    }
}

fn sweep_until_stable(
    lg: &LayeredGraph,
    mut current: SortingOrder,
    gaps: &Gaps,
    phases: &[Measure],
    max_sweeps: u32,
    start: usize,
) -> (usize, SortingOrder) {
    let layer_count = current.layer_count();
    let mut best_cc = start;
    let mut best = current.clone();

    for &measure in phases {
        if best_cc == 0 {
            break;
        }
        current = best.clone();
        let mut since_best = 0;
        let mut sweep = 0;
        while since_best < 4 && sweep < max_sweeps {
            if sweep % 2 == 0 {
                for free in 1..layer_count {
                    barycenter::sweep_layer(lg, &mut current, gaps, free, true, measure);
                }
            } else {
                for free in (0..layer_count.saturating_sub(1)).rev() {
                    barycenter::sweep_layer(lg, &mut current, gaps, free, false, measure);
                }
            }
            sweep += 1;

            let cc = cross_count(&current, gaps, lg.ports.len());
            if cc < best_cc {
                best_cc = cc;
                best = current.clone();
                since_best = 0;
                if cc == 0 {
                    break;
                }
            } else {
                since_best += 1;
            }
        }
    }
    (best_cc, best)
}
