// Copyright 2025 Lars Brubaker
// License: MIT
//
// Pure geometric functions on 2D points: orientation, approximate equality,
// collinearity and segment/segment intersection.
//
// All tolerance checks go through EPSILON and scale with the input. The event
// comparators and the contour walk compare exactly, since both follow one
// strict total order.

pub type Real = f64;

/// Relative tolerance used for point equality, collinearity and parametric
/// endpoint snapping.
pub const EPSILON: Real = 1e-12;

/// A 2D point. Immutable value type.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn sub(self, o: Point) -> Point {
        Point::new(self.x - o.x, self.y - o.y)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(Real, Real)> for Point {
    fn from((x, y): (Real, Real)) -> Self {
        Point::new(x, y)
    }
}

impl From<[Real; 2]> for Point {
    fn from([x, y]: [Real; 2]) -> Self {
        Point::new(x, y)
    }
}

/// Axis-aligned bounding box. An empty box has min > max.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bbox {
    pub min: Point,
    pub max: Point,
}

impl Default for Bbox {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bbox {
    pub const fn empty() -> Self {
        Bbox {
            min: Point::new(Real::INFINITY, Real::INFINITY),
            max: Point::new(Real::NEG_INFINITY, Real::NEG_INFINITY),
        }
    }

    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut b = Bbox::empty();
        for p in points {
            b.extend(*p);
        }
        b
    }

    #[inline]
    pub fn extend(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn union(&self, other: &Bbox) -> Bbox {
        let mut b = *self;
        b.extend(other.min);
        b.extend(other.max);
        b
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Closed-interval overlap test; boxes touching along an edge overlap.
    pub fn overlaps(&self, other: &Bbox) -> bool {
        !(self.min.x > other.max.x
            || other.min.x > self.max.x
            || self.min.y > other.max.y
            || other.min.y > self.max.y)
    }
}

/// 2D cross product (z component of a × b).
#[inline]
pub fn cross(a: Point, b: Point) -> Real {
    a.x * b.y - a.y * b.x
}

#[inline]
pub fn dot(a: Point, b: Point) -> Real {
    a.x * b.x + a.y * b.y
}

/// Signed area of the triangle (p0, p1, p2), doubled. Positive when the
/// three points turn counter-clockwise.
#[inline]
pub fn signed_area(p0: Point, p1: Point, p2: Point) -> Real {
    cross(p0.sub(p2), p1.sub(p2))
}

/// True if p and q are within EPSILON of each other relative to the larger
/// coordinate magnitude. Exactly equal points always match.
#[inline]
pub fn approximately_equal(p: Point, q: Point) -> bool {
    if p == q {
        return true;
    }
    let d = p.sub(q);
    let tol = EPSILON * p.x.abs().max(p.y.abs()).max(q.x.abs()).max(q.y.abs());
    dot(d, d) <= tol * tol
}

/// True if p0, p1, p2 lie on one line: the squared sine of the angle at p2 is
/// within EPSILON, the same test `segment_intersection` uses for parallel
/// segments. Holds trivially when p2 coincides with p0 or p1.
#[inline]
pub fn collinear(p0: Point, p1: Point, p2: Point) -> bool {
    let a = p0.sub(p2);
    let b = p1.sub(p2);
    let k = cross(a, b);
    k * k <= EPSILON * dot(a, a) * dot(b, b)
}

/// Shoelace signed area of an open ring. Positive for counter-clockwise.
pub fn ring_signed_area(ring: &[Point]) -> Real {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

/// Even-odd point-in-ring test (ray cast towards +x).
pub fn ring_contains(ring: &[Point], p: Point) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Result of intersecting two closed segments.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SegmentIntersection {
    None,
    /// Proper crossing, or a touch at an endpoint.
    Point(Point),
    /// Collinear overlap; the two ends of the shared interval.
    Overlap(Point, Point),
}

impl SegmentIntersection {
    pub fn count(&self) -> usize {
        match self {
            SegmentIntersection::None => 0,
            SegmentIntersection::Point(_) => 1,
            SegmentIntersection::Overlap(..) => 2,
        }
    }
}

#[inline]
fn near(a: Real, b: Real) -> bool {
    (a - b).abs() <= EPSILON
}

#[inline]
fn at(p: Point, s: Real, d: Point) -> Point {
    Point::new(p.x + s * d.x, p.y + s * d.y)
}

/// Point on segment a1->a2 at parameter s, snapped to the exact endpoint
/// when s is within EPSILON of 0 or 1.
#[inline]
fn snap(a1: Point, a2: Point, s: Real, d: Point) -> Point {
    if near(s, 0.0) {
        a1
    } else if near(s, 1.0) {
        a2
    } else {
        at(a1, s, d)
    }
}

/// Intersect segments a1-a2 and b1-b2.
///
/// Solves `a1 + s*(a2-a1) = b1 + t*(b2-b1)` for s, t in [0, 1]. Collinear
/// overlapping segments yield the two ends of the overlap. When
/// `no_endpoint_touch` is set, intersections lying exactly on an endpoint are
/// suppressed. Points within EPSILON of an endpoint are returned as that exact
/// endpoint so callers can compare with `approximately_equal`.
pub fn segment_intersection(
    a1: Point,
    a2: Point,
    b1: Point,
    b2: Point,
    no_endpoint_touch: bool,
) -> SegmentIntersection {
    let va = a2.sub(a1);
    let vb = b2.sub(b1);
    let e = b1.sub(a1);

    let kross = cross(va, vb);
    let sqr_kross = kross * kross;
    let sqr_len_a = dot(va, va);
    let sqr_len_b = dot(vb, vb);

    if sqr_kross > EPSILON * sqr_len_a * sqr_len_b {
        // Lines are not parallel.
        let s = cross(e, vb) / kross;
        if s < -EPSILON || s > 1.0 + EPSILON {
            return SegmentIntersection::None;
        }
        let t = cross(e, va) / kross;
        if t < -EPSILON || t > 1.0 + EPSILON {
            return SegmentIntersection::None;
        }
        if near(s, 0.0) || near(s, 1.0) {
            if no_endpoint_touch {
                return SegmentIntersection::None;
            }
            return SegmentIntersection::Point(snap(a1, a2, s, va));
        }
        if near(t, 0.0) || near(t, 1.0) {
            if no_endpoint_touch {
                return SegmentIntersection::None;
            }
            return SegmentIntersection::Point(snap(b1, b2, t, vb));
        }
        return SegmentIntersection::Point(at(a1, s, va));
    }

    // Parallel. Collinear only if b1 is on the line through a.
    let sqr_len_e = dot(e, e);
    let kross = cross(e, va);
    if kross * kross > EPSILON * sqr_len_a * sqr_len_e {
        return SegmentIntersection::None;
    }
    if sqr_len_a == 0.0 {
        return SegmentIntersection::None;
    }

    let sa = dot(va, e) / sqr_len_a;
    let sb = sa + dot(va, vb) / sqr_len_a;
    let smin = sa.min(sb);
    let smax = sa.max(sb);

    if smin > 1.0 + EPSILON || smax < -EPSILON {
        return SegmentIntersection::None;
    }
    if near(smin, 1.0) {
        return if no_endpoint_touch {
            SegmentIntersection::None
        } else {
            SegmentIntersection::Point(a2)
        };
    }
    if near(smax, 0.0) {
        return if no_endpoint_touch {
            SegmentIntersection::None
        } else {
            SegmentIntersection::Point(a1)
        };
    }
    if no_endpoint_touch && near(smin, 0.0) && near(smax, 1.0) {
        return SegmentIntersection::None;
    }
    SegmentIntersection::Overlap(
        snap(a1, a2, smin.max(0.0), va),
        snap(a1, a2, smax.min(1.0), va),
    )
}
