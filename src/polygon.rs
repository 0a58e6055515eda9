// Copyright 2025 Lars Brubaker
// License: MIT
//
// Polygon storage: a flat point buffer plus ring start offsets.
//
// Ring i occupies points[start_ids[i]..start_ids[i + 1]]; the last entry of
// start_ids is a sentinel equal to the point count. Ring 0 is the exterior,
// the remaining rings are holes. Rings are stored open (the closing edge back
// to the first point is implicit).

use std::cell::OnceCell;

use crate::error::ClipError;
use crate::geom::{ring_signed_area, Bbox, Point, Real};

/// An immutable polygon: one exterior ring followed by zero or more holes.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
    start_ids: Vec<usize>,
}

impl Default for Polygon {
    fn default() -> Self {
        Polygon {
            points: Vec::new(),
            start_ids: vec![0],
        }
    }
}

impl Polygon {
    /// Build a polygon from whole rings; the first ring is the exterior.
    pub fn from_rings<R, P>(rings: R) -> Result<Polygon, ClipError>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        let mut builder = PolygonBuilder::new();
        for ring in rings {
            builder.add_ring(ring);
        }
        builder.build()
    }

    /// Assemble from parts produced by the engine, which only emits rings of
    /// at least 3 finite points.
    pub(crate) fn from_parts(points: Vec<Point>, start_ids: Vec<usize>) -> Polygon {
        debug_assert_eq!(start_ids.last().copied(), Some(points.len()));
        Polygon { points, start_ids }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Ring start offsets, including the trailing sentinel.
    #[inline]
    pub fn start_ids(&self) -> &[usize] {
        &self.start_ids
    }

    #[inline]
    pub fn ring_count(&self) -> usize {
        self.start_ids.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn ring(&self, i: usize) -> &[Point] {
        &self.points[self.start_ids[i]..self.start_ids[i + 1]]
    }

    pub fn rings(&self) -> impl Iterator<Item = &[Point]> + '_ {
        self.start_ids
            .windows(2)
            .map(move |w| &self.points[w[0]..w[1]])
    }

    pub fn exterior(&self) -> Option<&[Point]> {
        (self.ring_count() > 0).then(|| self.ring(0))
    }

    pub fn holes(&self) -> impl Iterator<Item = &[Point]> + '_ {
        self.rings().skip(1)
    }

    pub fn bbox(&self) -> Bbox {
        Bbox::from_points(&self.points)
    }

    /// Shoelace signed area of ring `i`; positive when counter-clockwise.
    pub fn ring_signed_area(&self, i: usize) -> Real {
        ring_signed_area(self.ring(i))
    }

    /// Enclosed area: exterior minus holes, independent of winding.
    pub fn area(&self) -> Real {
        let mut rings = self.rings();
        let outer = match rings.next() {
            Some(r) => ring_signed_area(r).abs(),
            None => return 0.0,
        };
        outer - rings.map(|r| ring_signed_area(r).abs()).sum::<Real>()
    }
}

/// Accumulates rings, then validates them into an immutable [`Polygon`].
#[derive(Clone, Debug, Default)]
pub struct PolygonBuilder {
    points: Vec<Point>,
    start_ids: Vec<usize>,
}

impl PolygonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new ring. Subsequent `push` calls append to it.
    pub fn begin_ring(&mut self) -> &mut Self {
        self.start_ids.push(self.points.len());
        self
    }

    /// Append a point to the current ring, opening the first ring if needed.
    pub fn push<P: Into<Point>>(&mut self, p: P) -> &mut Self {
        if self.start_ids.is_empty() {
            self.begin_ring();
        }
        self.points.push(p.into());
        self
    }

    /// Append a whole ring.
    pub fn add_ring<I, P>(&mut self, ring: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        self.begin_ring();
        self.points.extend(ring.into_iter().map(Into::into));
        self
    }

    pub fn build(mut self) -> Result<Polygon, ClipError> {
        if let Some(p) = self.points.iter().find(|p| !p.is_finite()) {
            return Err(ClipError::InvalidCoordinate { x: p.x, y: p.y });
        }
        self.start_ids.push(self.points.len());
        for (ring, w) in self.start_ids.windows(2).enumerate() {
            let points = w[1] - w[0];
            if points < 3 {
                return Err(ClipError::DegenerateRing { ring, points });
            }
        }
        Ok(Polygon {
            points: self.points,
            start_ids: self.start_ids,
        })
    }
}

/// A ring under construction during contour assembly.
#[derive(Clone, Debug, Default)]
pub struct Contour {
    pub points: Vec<Point>,
    /// Index of the exterior contour this one is a hole of.
    pub hole_of: Option<usize>,
    pub depth: u32,
    pub hole_ids: Vec<usize>,
    clockwise: OnceCell<bool>,
}

impl Contour {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_exterior(&self) -> bool {
        self.hole_of.is_none()
    }

    /// Winding of the points, computed on first call. Only meaningful once
    /// every point has been added.
    pub fn is_clockwise(&self) -> bool {
        *self
            .clockwise
            .get_or_init(|| ring_signed_area(&self.points) < 0.0)
    }

    /// Consume the contour, returning it wound counter-clockwise when `ccw`
    /// is set and clockwise otherwise.
    pub fn into_oriented(mut self, ccw: bool) -> Contour {
        if self.is_clockwise() == ccw {
            self.points.reverse();
        }
        Contour {
            points: self.points,
            hole_of: self.hole_of,
            depth: self.depth,
            hole_ids: self.hole_ids,
            clockwise: OnceCell::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: Real, y0: Real, s: Real) -> Vec<(Real, Real)> {
        vec![(x0, y0), (x0 + s, y0), (x0 + s, y0 + s), (x0, y0 + s)]
    }

    #[test]
    fn builder_rings_and_sentinel() {
        let mut b = PolygonBuilder::new();
        b.add_ring(square(0.0, 0.0, 4.0));
        b.begin_ring();
        for p in square(1.0, 1.0, 2.0).into_iter().rev() {
            b.push(p);
        }
        let poly = b.build().unwrap();
        assert_eq!(poly.ring_count(), 2);
        assert_eq!(poly.start_ids(), &[0, 4, 8]);
        assert_eq!(poly.holes().count(), 1);
        assert!((poly.area() - 12.0).abs() < 1e-12);
        assert!(poly.ring_signed_area(0) > 0.0);
        assert!(poly.ring_signed_area(1) < 0.0);
    }

    #[test]
    fn degenerate_ring_rejected() {
        let err = Polygon::from_rings([vec![(0.0, 0.0), (1.0, 0.0)]]).unwrap_err();
        assert_eq!(err, ClipError::DegenerateRing { ring: 0, points: 2 });
    }

    #[test]
    fn non_finite_rejected() {
        let err = Polygon::from_rings([vec![(0.0, 0.0), (Real::NAN, 0.0), (0.0, 1.0)]]).unwrap_err();
        assert!(matches!(err, ClipError::InvalidCoordinate { .. }));
    }

    #[test]
    fn empty_polygon() {
        let p = PolygonBuilder::new().build().unwrap();
        assert!(p.is_empty());
        assert_eq!(p.ring_count(), 0);
        assert_eq!(p.exterior(), None);
        assert_eq!(p.area(), 0.0);
    }

    #[test]
    fn contour_orientation_memo_and_flip() {
        let mut c = Contour::new();
        c.points = square(0.0, 0.0, 1.0)
            .into_iter()
            .rev()
            .map(Point::from)
            .collect();
        assert!(c.is_clockwise());
        let c = c.into_oriented(true);
        assert!(!c.is_clockwise());
        assert!(c.is_exterior());
    }
}
