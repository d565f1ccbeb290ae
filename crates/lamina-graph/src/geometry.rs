//! Shapes and paths written back by the layout.
//!
//! Coordinates use a y-up convention: larger `y` is further north.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle; `(x, y)` is the corner with the smallest coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Polygonal edge path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub bends: Vec<Point>,
    #[serde(default)]
    pub thickness: f64,
}

impl Path {
    pub fn new(start: Point, end: Point, bends: Vec<Point>, thickness: f64) -> Self {
        Self {
            start,
            end,
            bends,
            thickness,
        }
    }

    /// All points from start to end, bends included.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.start)
            .chain(self.bends.iter().copied())
            .chain(std::iter::once(self.end))
    }

    /// Reverses the direction of the path in place.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
        self.bends.reverse();
    }

    pub fn is_orthogonal(&self) -> bool {
        let pts: Vec<Point> = self.points().collect();
        pts.windows(2).all(|w| w[0].x == w[1].x || w[0].y == w[1].y)
    }
}
