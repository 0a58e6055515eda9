// Copyright 2025 Lars Brubaker
// Triangle-mesh boundary extraction feeding the boolean engine.

mod helpers;

use approx::assert_abs_diff_eq;
use helpers::verify_valid_result;
use polybool2d::{extract_boundary, union_all, ClipError, ClipResult, Point, Polygon, Real};

fn pts(v: &[(Real, Real)]) -> Vec<Point> {
    v.iter().copied().map(Point::from).collect()
}

/// A w x h grid of unit quads starting at (x0, y0), two triangles per quad.
fn grid_mesh(x0: Real, y0: Real, w: u32, h: u32) -> (Vec<Point>, Vec<u32>) {
    let mut vertices = Vec::new();
    for j in 0..=h {
        for i in 0..=w {
            vertices.push(Point::new(x0 + i as Real, y0 + j as Real));
        }
    }
    let row = w + 1;
    let mut indices = Vec::new();
    for j in 0..h {
        for i in 0..w {
            let a = j * row + i;
            let (b, c, d) = (a + 1, a + row + 1, a + row);
            indices.extend([a, b, c, a, c, d]);
        }
    }
    (vertices, indices)
}

#[test]
fn single_triangle_boundary() {
    let v = pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    let polys = extract_boundary(&v, &[0, 1, 2]).unwrap();
    assert_eq!(polys.len(), 1);
    let ring = polys[0].ring(0);
    assert_eq!(ring.len(), 3);
    for p in &v {
        assert!(ring.contains(p));
    }
}

#[test]
fn grid_boundary_is_its_outline() {
    let (v, idx) = grid_mesh(0.0, 0.0, 3, 2);
    let polys = extract_boundary(&v, &idx).unwrap();
    assert_eq!(polys.len(), 1);
    // Outline vertices, including the collinear ones along each side.
    assert_eq!(polys[0].points().len(), 10);
    assert_abs_diff_eq!(polys[0].area(), 6.0, epsilon = 1e-12);
    verify_valid_result(&ClipResult::from_polygons(polys));
}

#[test]
fn invalid_index_lists() {
    let v = pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    assert!(matches!(
        extract_boundary(&v, &[0, 1, 2, 0]),
        Err(ClipError::InvalidTriangleList { len: 4 })
    ));
    assert!(matches!(
        Polygon::from_mesh(&v, &[0, 1, 3]),
        Err(ClipError::IndexOutOfRange { index: 3, vertex_count: 3 })
    ));
}

#[test]
fn union_of_overlapping_meshes() {
    let (va, ia) = grid_mesh(0.0, 0.0, 2, 2);
    let (vb, ib) = grid_mesh(1.0, 1.0, 2, 2);
    let mut polygons = extract_boundary(&va, &ia).unwrap();
    polygons.extend(extract_boundary(&vb, &ib).unwrap());
    assert_eq!(polygons.len(), 2);

    let res = union_all(&polygons);
    verify_valid_result(&res);
    assert_eq!(res.len(), 1);
    assert_abs_diff_eq!(res.area(), 7.0, epsilon = 1e-12);
}
