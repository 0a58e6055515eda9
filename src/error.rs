// Copyright 2025 Lars Brubaker
// License: MIT
//
// Error and outcome types for the clipping engine.

use thiserror::Error;

use crate::geom::Real;
use crate::polygon::Polygon;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClipError {
    #[error("container is empty")]
    EmptyContainer,

    #[error("invalid coordinate ({x}, {y}): coordinates must be finite")]
    InvalidCoordinate { x: Real, y: Real },

    #[error("ring {ring} has {points} points, at least 3 are required")]
    DegenerateRing { ring: usize, points: usize },

    #[error("triangle index list has length {len}, which is not a multiple of 3")]
    InvalidTriangleList { len: usize },

    #[error("triangle index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: usize, vertex_count: usize },
}

/// Outcome of a boolean operation.
///
/// `Empty` means the operation succeeded and legitimately produced no
/// geometry (e.g. intersection of disjoint shapes); failures are reported
/// through `ClipError` instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClipResult {
    #[default]
    Empty,
    Polygons(Vec<Polygon>),
}

impl ClipResult {
    /// Wrap `polygons`, collapsing an empty list to `Empty`.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        if polygons.is_empty() {
            ClipResult::Empty
        } else {
            ClipResult::Polygons(polygons)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ClipResult::Empty)
    }

    pub fn len(&self) -> usize {
        self.polygons().len()
    }

    pub fn polygons(&self) -> &[Polygon] {
        match self {
            ClipResult::Empty => &[],
            ClipResult::Polygons(p) => p,
        }
    }

    pub fn into_polygons(self) -> Vec<Polygon> {
        match self {
            ClipResult::Empty => Vec::new(),
            ClipResult::Polygons(p) => p,
        }
    }

    /// Total enclosed area (exteriors minus holes).
    pub fn area(&self) -> Real {
        self.polygons().iter().map(Polygon::area).sum()
    }
}
