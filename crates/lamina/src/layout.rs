//! Best-of-N layout of one graph.

use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::pipeline::{Drawing, Sugiyama};
use crate::warning::Warning;
use lamina_graph::Graph;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    pub crossings: usize,
    /// Index of the repetition whose drawing was kept.
    pub repetition: u32,
    /// Final crossings of every repetition.
    pub repetition_crossings: Vec<usize>,
    pub warnings: Vec<Warning>,
    pub drawing: Drawing,
}

/// Lays out `graph` in place with task index 0.
pub fn layout(graph: &mut Graph, config: &LayoutConfig) -> Result<LayoutReport> {
    layout_task(graph, config, 0)
}

/// Runs `config.repetitions` independent pipelines and writes the drawing with the fewest
/// crossings back into `graph` (the earliest one on ties).
pub fn layout_task(graph: &mut Graph, config: &LayoutConfig, task: u64) -> Result<LayoutReport> {
    config.validate()?;

    let mut best: Option<(u32, Drawing)> = None;
    let mut repetition_crossings = Vec::with_capacity(config.repetitions as usize);
    for repetition in 0..config.repetitions {
        let drawing = Sugiyama::new(graph, config, run_seed(config.seed, task, repetition))?.run();
        tracing::debug!(task, repetition, crossings = drawing.crossings, "repetition done");
        repetition_crossings.push(drawing.crossings);
        if best
            .as_ref()
            .is_none_or(|(_, kept)| drawing.crossings < kept.crossings)
        {
            best = Some((repetition, drawing));
        }
    }

    let Some((repetition, drawing)) = best else {
        return Err(Error::InvalidConfig {
            message: "repetitions must be at least 1".to_string(),
        });
    };
    drawing.apply(graph);
    Ok(LayoutReport {
        crossings: drawing.crossings,
        repetition,
        repetition_crossings,
        warnings: drawing.warnings.clone(),
        drawing,
    })
}

/// Seed of one run, mixed from the configured seed, the task index and the repetition
/// (splitmix64 finalizer).
pub fn run_seed(seed: u64, task: u64, repetition: u32) -> u64 {
    fn mix(mut z: u64) -> u64 {
        z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
    mix(mix(mix(seed) ^ task) ^ u64::from(repetition))
}
