//! Layout configuration.
//!
//! Every stage is selected through an enum and mapped to a plain function in the stage's
//! module. The whole surface deserializes from kebab-case JSON with every field optional.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleBreakingMethod {
    /// Incidence order is the direction; cycles are left to the direction assigner.
    Ignore,
    /// Reverse DFS back edges.
    #[default]
    Dfs,
    /// Eades-Lin-Smyth greedy feedback arc set.
    Greedy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectionMethod {
    /// Orient along the vertical axis of a spring embedding.
    Force,
    /// Keep the cycle breaker's orientation.
    #[default]
    Structural,
    /// Orient along breadth-first levels.
    Bfs,
    /// Orient along a random vertex permutation.
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerAssignmentMethod {
    #[default]
    NetworkSimplex,
    OldNetworkSimplex,
    FdPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossingMinimizationMethod {
    Vertices,
    #[default]
    Ports,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentMethod {
    None,
    FirstComes,
    #[default]
    BrandesKoepf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentPreference {
    #[default]
    LongEdges,
    NoPreference,
}

/// Distances and default sizes, in drawing units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Spacing {
    pub vertex_distance: f64,
    pub edge_distance: f64,
    pub port_distance: f64,
    pub layer_distance: f64,
    pub loop_distance: f64,
    pub port_width: f64,
    pub port_height: f64,
    pub vertex_min_width: f64,
    pub vertex_height: f64,
    pub edge_thickness: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            vertex_distance: 20.0,
            edge_distance: 6.0,
            port_distance: 8.0,
            layer_distance: 40.0,
            loop_distance: 8.0,
            port_width: 4.0,
            port_height: 2.0,
            vertex_min_width: 20.0,
            vertex_height: 30.0,
            edge_thickness: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutConfig {
    pub cycle_breaking: CycleBreakingMethod,
    pub direction: DirectionMethod,
    pub direction_iterations: u32,
    pub layering: LayerAssignmentMethod,
    pub crossing_minimization: CrossingMinimizationMethod,
    pub crossing_iterations: u32,
    pub max_sweeps: u32,
    pub alignment: AlignmentMethod,
    pub alignment_preference: AlignmentPreference,
    pub repetitions: u32,
    pub workers: usize,
    pub seed: u64,
    pub spacing: Spacing,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cycle_breaking: CycleBreakingMethod::default(),
            direction: DirectionMethod::default(),
            direction_iterations: 100,
            layering: LayerAssignmentMethod::default(),
            crossing_minimization: CrossingMinimizationMethod::default(),
            crossing_iterations: 5,
            max_sweeps: 24,
            alignment: AlignmentMethod::default(),
            alignment_preference: AlignmentPreference::default(),
            repetitions: 1,
            workers: 1,
            seed: 0,
            spacing: Spacing::default(),
        }
    }
}

impl LayoutConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        fn invalid(message: impl Into<String>) -> Error {
            Error::InvalidConfig {
                message: message.into(),
            }
        }

        if self.crossing_iterations == 0 {
            return Err(invalid("crossing-iterations must be at least 1"));
        }
        if self.repetitions == 0 {
            return Err(invalid("repetitions must be at least 1"));
        }
        if self.workers == 0 {
            return Err(invalid("workers must be at least 1"));
        }
        let s = &self.spacing;
        for (name, value) in [
            ("vertex-distance", s.vertex_distance),
            ("edge-distance", s.edge_distance),
            ("port-distance", s.port_distance),
            ("layer-distance", s.layer_distance),
            ("loop-distance", s.loop_distance),
            ("port-width", s.port_width),
            ("port-height", s.port_height),
            ("vertex-min-width", s.vertex_min_width),
            ("vertex-height", s.vertex_height),
            ("edge-thickness", s.edge_thickness),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("spacing.{name} must be finite and >= 0")));
            }
        }
        if s.loop_distance * 2.0 > s.layer_distance {
            return Err(invalid(
                "spacing.loop-distance must not exceed half of spacing.layer-distance",
            ));
        }
        Ok(())
    }
}
