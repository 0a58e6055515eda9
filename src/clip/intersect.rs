// Copyright 2025 Lars Brubaker
// License: MIT
//
// Intersection handling between neighbouring edges of the sweep status.

use std::cmp::Ordering;

use tracing::{debug, trace, warn};

use crate::geom::{approximately_equal, segment_intersection, Point, Real, SegmentIntersection, EPSILON};
use crate::priorityq::PriorityQ;
use crate::sweep::{compare_events, EdgeType, EventIdx, Events, SweepEvent};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum IntersectionKind {
    /// Disjoint, touching at a shared endpoint, or an ignored overlap.
    None,
    /// Crossing at one point; edges were split where needed.
    Crossing,
    /// Collinear overlap starting at a shared left endpoint. Edge types were
    /// reassigned, so the caller must recompute fields.
    SharedLeft,
    /// Any other collinear overlap; edges were split at the overlap ends.
    Overlap,
}

/// Check the edges of left events `se1` and `se2` for an intersection and
/// split them so that no two edges cross or partially overlap.
pub(crate) fn possible_intersection(
    ev: &mut Events,
    queue: &mut PriorityQ<EventIdx>,
    se1: EventIdx,
    se2: EventIdx,
) -> IntersectionKind {
    let (a1, a2) = (ev[se1].point, ev.other_point(se1));
    let (b1, b2) = (ev[se2].point, ev.other_point(se2));

    match segment_intersection(a1, a2, b1, b2, false) {
        SegmentIntersection::None => IntersectionKind::None,
        SegmentIntersection::Point(p) => {
            if approximately_equal(a1, b1) || approximately_equal(a2, b2) {
                return IntersectionKind::None;
            }
            trace!(se1, se2, x = p.x, y = p.y, "edges intersect");
            if !approximately_equal(a1, p) && !approximately_equal(a2, p) {
                divide_segment(ev, queue, se1, p);
            }
            if !approximately_equal(b1, p) && !approximately_equal(b2, p) {
                divide_segment(ev, queue, se2, p);
            }
            IntersectionKind::Crossing
        }
        SegmentIntersection::Overlap(..) => {
            if ev[se1].polygon == ev[se2].polygon {
                debug!(se1, se2, contour = ev[se1].contour_id, "edges of one operand overlap");
                return IntersectionKind::None;
            }
            resolve_overlap(ev, queue, se1, se2)
        }
    }
}

fn resolve_overlap(ev: &mut Events, queue: &mut PriorityQ<EventIdx>, se1: EventIdx, se2: EventIdx) -> IntersectionKind {
    let (r1, r2) = (ev[se1].other, ev[se2].other);
    let left_coincide = approximately_equal(ev[se1].point, ev[se2].point);
    let right_coincide = approximately_equal(ev[r1].point, ev[r2].point);

    // Non-coincident ends, in sweep order: the two left events first, then
    // the two right events.
    let mut ends: Vec<EventIdx> = Vec::with_capacity(4);
    if !left_coincide {
        if compare_events(ev, se1, se2) == Ordering::Greater {
            ends.extend([se2, se1]);
        } else {
            ends.extend([se1, se2]);
        }
    }
    if !right_coincide {
        if compare_events(ev, r1, r2) == Ordering::Greater {
            ends.extend([r2, r1]);
        } else {
            ends.extend([r1, r2]);
        }
    }

    if left_coincide {
        ev[se2].edge_type = EdgeType::NonContributing;
        ev[se1].edge_type = if ev[se2].in_out == ev[se1].in_out {
            EdgeType::SameTransition
        } else {
            EdgeType::DifferentTransition
        };
        if !right_coincide {
            // Cut the longer edge where the shorter one ends.
            let longer = ev[ends[1]].other;
            let split = ev[ends[0]].point;
            divide_segment(ev, queue, longer, split);
        }
        return IntersectionKind::SharedLeft;
    }

    if right_coincide {
        let split = ev[ends[1]].point;
        divide_segment(ev, queue, ends[0], split);
        return IntersectionKind::Overlap;
    }

    if ends[0] != ev[ends[3]].other {
        // Neither edge contains the other.
        let (s1, s2) = (ev[ends[1]].point, ev[ends[2]].point);
        divide_segment(ev, queue, ends[0], s1);
        divide_segment(ev, queue, ends[1], s2);
    } else {
        // The first edge contains the second one.
        let s1 = ev[ends[1]].point;
        divide_segment(ev, queue, ends[0], s1);
        let s2 = ev[ends[2]].point;
        let tail = ev[ends[3]].other;
        divide_segment(ev, queue, tail, s2);
    }
    IntersectionKind::Overlap
}

/// Split the edge of left event `se` at `p` into two edges meeting at `p`.
///
/// Two events are created: the right end of the first half and the left end
/// of the second half. Both go into the queue; the status structure keeps
/// `se`, now standing for the shorter first half.
pub(crate) fn divide_segment(ev: &mut Events, queue: &mut PriorityQ<EventIdx>, se: EventIdx, p: Point) {
    let other = ev[se].other;
    let origin = ev[se].point;
    let mut p = p;

    // Rounding can put the split of a near-vertical edge just below its left
    // endpoint, which would make the new right event sort before `se`.
    if p.x == origin.x && p.y < origin.y {
        let step = if p.x == 0.0 { Real::MIN_POSITIVE } else { EPSILON * p.x.abs() };
        let nudged = p.x + step;
        trace!(x = p.x, nudged, "nudging split point");
        p.x = nudged;
    }

    if approximately_equal(origin, ev[other].point) {
        warn!(x = origin.x, y = origin.y, "dividing a collapsed segment");
    }

    let (polygon, contour_id) = (ev[se].polygon, ev[se].contour_id);
    let r = ev.push(SweepEvent::new(p, false, se, polygon, contour_id));
    let l = ev.push(SweepEvent::new(p, true, other, polygon, contour_id));

    // The new left event must not sort after its right partner.
    if compare_events(ev, l, other) == Ordering::Greater {
        trace!(l, other, "swapping left flag of split pair");
        ev[other].left = true;
        ev[l].left = false;
    }

    ev[other].other = l;
    ev[se].other = r;

    let events: &Events = ev;
    let cmp = |a, b| compare_events(events, a, b);
    queue.insert(l, &cmp);
    queue.insert(r, &cmp);
}
