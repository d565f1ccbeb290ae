//! Layered (Sugiyama) orthogonal drawing of graphs whose vertices carry hierarchical ports.
//!
//! The pipeline breaks cycles, directs edges, assigns layers, splits long edges, puts every
//! port composition on the NORTH or SOUTH side of its vertex, minimizes crossings, assigns
//! coordinates and routes edges orthogonally. Rank 0 is the bottom layer; `y` grows north.
//!
//! [`layout`] runs the pipeline best-of-N on one [`Graph`](lamina_graph::Graph) and writes
//! shapes and paths back into it; [`run_batch`] spreads many graphs over a worker pool;
//! [`Sugiyama`] exposes the individual stages.

pub use lamina_graph as graph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod acyclic;
mod batch;
pub mod config;
mod direction;
pub mod error;
mod force;
mod greedy_fas;
mod layered;
mod layout;
mod normalize;
mod order;
mod pipeline;
mod port_sides;
mod position;
pub mod rank;
mod route;
mod warning;

pub use batch::{BatchReport, TaskError, TaskOutcome, run_batch};
pub use config::{
    AlignmentMethod, AlignmentPreference, CrossingMinimizationMethod, CycleBreakingMethod,
    DirectionMethod, LayerAssignmentMethod, LayoutConfig, Spacing,
};
pub use error::{Error, Result};
pub use layout::{LayoutReport, layout, layout_task, run_seed};
pub use pipeline::{Drawing, Stage, Sugiyama};
pub use warning::Warning;
