// Copyright 2025 Lars Brubaker
// Shared test utilities for polybool2d tests.

#![allow(dead_code)]

use polybool2d::{ClipResult, Point, Polygon, Real};

/// Axis-aligned square with lower-left corner (x0, y0), counter-clockwise.
pub fn square(x0: Real, y0: Real, size: Real) -> Polygon {
    rect(x0, y0, x0 + size, y0 + size)
}

pub fn rect(x0: Real, y0: Real, x1: Real, y1: Real) -> Polygon {
    Polygon::from_rings([vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1)]]).unwrap()
}

pub fn triangle(a: (Real, Real), b: (Real, Real), c: (Real, Real)) -> Polygon {
    Polygon::from_rings([vec![a, b, c]]).unwrap()
}

/// Doubled signed area of the triangle (a, b, c).
pub fn triangle_area2(a: (Real, Real), b: (Real, Real), c: (Real, Real)) -> Real {
    (b.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (b.1 - a.1)
}

/// Shoelace signed area of an open ring.
pub fn signed_area(ring: &[Point]) -> Real {
    let n = ring.len();
    let mut total = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        total += a.x * b.y - b.x * a.y;
    }
    total * 0.5
}

/// Verify every emitted polygon: finite points, rings of at least 3 points,
/// ring 0 counter-clockwise and every hole clockwise.
pub fn verify_valid_result(result: &ClipResult) {
    for (pi, poly) in result.polygons().iter().enumerate() {
        assert!(poly.ring_count() >= 1, "polygon {} has no rings", pi);
        for (ri, ring) in poly.rings().enumerate() {
            assert!(ring.len() >= 3, "polygon {} ring {} has {} points", pi, ri, ring.len());
            for p in ring {
                assert!(p.x.is_finite() && p.y.is_finite(), "polygon {} has non-finite point {:?}", pi, p);
            }
            let area = signed_area(ring);
            if ri == 0 {
                assert!(area > 0.0, "polygon {} exterior is not CCW (area={})", pi, area);
            } else {
                assert!(area < 0.0, "polygon {} hole {} is not CW (area={})", pi, ri, area);
            }
        }
    }
}
