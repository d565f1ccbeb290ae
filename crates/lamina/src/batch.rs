//! Fixed-size worker pool laying out many graphs.
//!
//! Workers pull jobs from a shared queue. Each job seeds its runs from its index in the input,
//! so results do not depend on the worker count or on scheduling. A failing or panicking job
//! is recorded and the rest of the batch carries on.

use crate::config::LayoutConfig;
use crate::error::Error;
use crate::layout::{LayoutReport, layout_task};
use lamina_graph::Graph;
use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Layout(#[from] Error),

    #[error("layout panicked: {0}")]
    Panicked(String),
}

pub type TaskOutcome = std::result::Result<LayoutReport, TaskError>;

#[derive(Debug)]
pub struct BatchReport {
    pub completed: usize,
    pub failed: usize,
    /// Graphs with their layouts written back, in input order.
    pub graphs: Vec<Graph>,
    /// One outcome per input graph, in input order.
    pub outcomes: Vec<TaskOutcome>,
}

pub fn run_batch(graphs: Vec<Graph>, config: &LayoutConfig) -> BatchReport {
    let jobs = graphs.len();
    let workers = config.workers.clamp(1, jobs.max(1));
    let queue: Mutex<VecDeque<(usize, Graph)>> =
        Mutex::new(graphs.into_iter().enumerate().collect());
    let done: Mutex<Vec<Option<(Graph, TaskOutcome)>>> =
        Mutex::new((0..jobs).map(|_| None).collect());

    std::thread::scope(|scope| {
        for worker in 0..workers {
            let (queue, done) = (&queue, &done);
            scope.spawn(move || {
                loop {
                    let job = queue
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .pop_front();
                    let Some((ix, mut graph)) = job else {
                        break;
                    };
                    let outcome = run_job(&mut graph, config, ix);
                    if let Err(err) = &outcome {
                        tracing::warn!(worker, task = ix, "layout failed: {err}");
                    }
                    done.lock().unwrap_or_else(PoisonError::into_inner)[ix] =
                        Some((graph, outcome));
                }
            });
        }
    });

    let mut report = BatchReport {
        completed: 0,
        failed: 0,
        graphs: Vec::with_capacity(jobs),
        outcomes: Vec::with_capacity(jobs),
    };
    let done = done.into_inner().unwrap_or_else(PoisonError::into_inner);
    for (graph, outcome) in done.into_iter().flatten() {
        if outcome.is_ok() {
            report.completed += 1;
        } else {
            report.failed += 1;
        }
        report.graphs.push(graph);
        report.outcomes.push(outcome);
    }
    tracing::debug!(
        completed = report.completed,
        failed = report.failed,
        workers,
        "batch finished"
    );
    report
}

fn run_job(graph: &mut Graph, config: &LayoutConfig, ix: usize) -> TaskOutcome {
    match catch_unwind(AssertUnwindSafe(|| layout_task(graph, config, ix as u64))) {
        Ok(result) => result.map_err(TaskError::from),
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            Err(TaskError::Panicked(message))
        }
    }
}
