// Copyright 2025 Lars Brubaker
// License: MIT
//
// Boundary extraction: triangle mesh -> polygons.
//
// An edge used by exactly one triangle lies on the mesh boundary. Boundary
// edges keep the direction they had in their triangle and are chained into
// closed loops; loops nested inside an odd number of other loops are holes.

use std::collections::BTreeMap;

use tracing::{debug, instrument, trace, warn};

use crate::error::ClipError;
use crate::geom::{ring_contains, ring_signed_area, Point, Real};
use crate::polygon::Polygon;

/// Undirected mesh edge, stored with the smaller vertex index first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub a: u32,
    pub b: u32,
}

impl Edge {
    pub fn new(i: u32, j: u32) -> Edge {
        if i <= j {
            Edge { a: i, b: j }
        } else {
            Edge { a: j, b: i }
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Incidence {
    count: u32,
    /// Direction in the first triangle that used the edge.
    from: u32,
    to: u32,
}

/// Edges used by exactly one non-degenerate triangle, directed as in that
/// triangle, in edge order.
pub fn boundary_edges(vertex_count: usize, indices: &[u32]) -> Result<Vec<(u32, u32)>, ClipError> {
    if indices.len() % 3 != 0 {
        return Err(ClipError::InvalidTriangleList { len: indices.len() });
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(ClipError::IndexOutOfRange {
            index: index as usize,
            vertex_count,
        });
    }

    let mut edges: BTreeMap<Edge, Incidence> = BTreeMap::new();
    for (t, tri) in indices.chunks_exact(3).enumerate() {
        let (i, j, k) = (tri[0], tri[1], tri[2]);
        if i == j || j == k || k == i {
            trace!(triangle = t, i, j, k, "skipping degenerate triangle");
            continue;
        }
        for (from, to) in [(i, j), (j, k), (k, i)] {
            edges
                .entry(Edge::new(from, to))
                .and_modify(|inc| inc.count += 1)
                .or_insert(Incidence { count: 1, from, to });
        }
    }

    Ok(edges
        .values()
        .filter(|inc| inc.count == 1)
        .map(|inc| (inc.from, inc.to))
        .collect())
}

/// Chain directed boundary edges into closed vertex loops. Chains that do
/// not close are dropped.
fn chain_loops(edges: &[(u32, u32)]) -> Vec<Vec<u32>> {
    let mut outgoing: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (i, &(from, _)) in edges.iter().enumerate() {
        outgoing.entry(from).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();
    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        let first = edges[start].0;
        let mut ring = Vec::new();
        let mut cur = start;
        let closed = loop {
            used[cur] = true;
            let (from, to) = edges[cur];
            ring.push(from);
            if to == first {
                break true;
            }
            let next = outgoing
                .get(&to)
                .and_then(|out| out.iter().copied().find(|&e| !used[e]));
            match next {
                Some(e) => cur = e,
                None => break false,
            }
        };
        if !closed {
            warn!(start = first, len = ring.len(), "boundary chain does not close");
            continue;
        }
        if ring.len() >= 3 {
            loops.push(ring);
        }
    }
    loops
}

fn oriented(mut ring: Vec<Point>, ccw: bool) -> Vec<Point> {
    if (ring_signed_area(&ring) > 0.0) != ccw {
        ring.reverse();
    }
    ring
}

/// Extract the boundary of a triangle mesh as polygons: one per outer loop,
/// each followed by the loops directly inside it as holes. Exteriors are
/// counter-clockwise, holes clockwise.
///
/// Triangles with a repeated vertex index are skipped. `indices` must hold
/// whole triangles that reference existing vertices.
#[instrument(skip_all, fields(vertices = vertices.len(), triangles = indices.len() / 3))]
pub fn extract_boundary(vertices: &[Point], indices: &[u32]) -> Result<Vec<Polygon>, ClipError> {
    let edges = boundary_edges(vertices.len(), indices)?;
    for &(from, _) in &edges {
        let p = vertices[from as usize];
        if !p.is_finite() {
            return Err(ClipError::InvalidCoordinate { x: p.x, y: p.y });
        }
    }

    let rings: Vec<Vec<Point>> = chain_loops(&edges)
        .into_iter()
        .map(|l| l.into_iter().map(|v| vertices[v as usize]).collect())
        .collect();
    debug!(boundary_edges = edges.len(), loops = rings.len(), "boundary chained");

    // Nesting depth of each loop, and the smallest loop around each hole.
    let areas: Vec<Real> = rings.iter().map(|r| ring_signed_area(r).abs()).collect();
    let mut depth = vec![0usize; rings.len()];
    let mut parent: Vec<Option<usize>> = vec![None; rings.len()];
    for (i, ring) in rings.iter().enumerate() {
        let probe = ring[0];
        for (j, other) in rings.iter().enumerate() {
            if i == j || !ring_contains(other, probe) {
                continue;
            }
            depth[i] += 1;
            if parent[i].map_or(true, |p| areas[j] < areas[p]) {
                parent[i] = Some(j);
            }
        }
    }

    let mut holes_of: Vec<Vec<usize>> = vec![Vec::new(); rings.len()];
    for i in 0..rings.len() {
        if depth[i] % 2 == 1 {
            match parent[i] {
                Some(p) => holes_of[p].push(i),
                None => warn!(ring = i, "hole without enclosing loop"),
            }
        }
    }

    let mut polygons = Vec::new();
    for i in (0..rings.len()).filter(|&i| depth[i] % 2 == 0) {
        let mut points = oriented(rings[i].clone(), true);
        let mut start_ids = vec![0];
        for &h in &holes_of[i] {
            start_ids.push(points.len());
            points.extend(oriented(rings[h].clone(), false));
        }
        start_ids.push(points.len());
        polygons.push(Polygon::from_parts(points, start_ids));
    }
    Ok(polygons)
}

impl Polygon {
    /// Boundary polygons of a triangle mesh; see [`extract_boundary`].
    pub fn from_mesh(vertices: &[Point], indices: &[u32]) -> Result<Vec<Polygon>, ClipError> {
        extract_boundary(vertices, indices)
    }
}
