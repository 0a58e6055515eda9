// Copyright 2025 Lars Brubaker
// License: MIT
//
// Sweep events and the two orderings the Martinez-Rueda-Feito sweep relies on.
//
// Every input edge becomes a pair of events, one per endpoint. Events live in
// an `Events` arena and refer to each other (pair partner, previous result
// edge) by EventIdx, so the event graph carries no ownership cycles.

use std::cmp::Ordering;
use std::ops::{Index, IndexMut};

use crate::dict::NodeIdx;
use crate::geom::{approximately_equal, collinear, signed_area, Point};

/// Index into the `Events` arena.
pub type EventIdx = u32;

/// Which operand an edge came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PolygonType {
    Subject,
    Clipping,
}

/// Contribution class of an edge. Anything other than `Normal` is the
/// outcome of two edges from different operands overlapping.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeType {
    #[default]
    Normal,
    NonContributing,
    SameTransition,
    DifferentTransition,
}

/// One endpoint of one edge.
#[derive(Clone, Debug)]
pub struct SweepEvent {
    pub point: Point,
    /// True if this endpoint is reached first by the sweep line.
    pub left: bool,
    /// The event at the opposite endpoint of the same edge.
    pub other: EventIdx,
    pub polygon: PolygonType,
    pub edge_type: EdgeType,
    /// Crossing this edge upwards goes from inside to outside its own operand.
    pub in_out: bool,
    /// Same, for the other operand.
    pub other_in_out: bool,
    /// 0 = not in result, +1 = outside-to-inside, -1 = inside-to-outside.
    pub result_transition: i8,
    /// Closest result edge below this one when it entered the status.
    pub prev_in_result: Option<EventIdx>,
    /// Input polygon id; all rings of one polygon share it.
    pub contour_id: u32,
    /// Position in the sweep status while the edge is active.
    pub status_node: Option<NodeIdx>,
}

impl SweepEvent {
    pub fn new(point: Point, left: bool, other: EventIdx, polygon: PolygonType, contour_id: u32) -> Self {
        SweepEvent {
            point,
            left,
            other,
            polygon,
            edge_type: EdgeType::Normal,
            in_out: false,
            other_in_out: false,
            result_transition: 0,
            prev_in_result: None,
            contour_id,
            status_node: None,
        }
    }

    #[inline]
    pub fn is_subject(&self) -> bool {
        self.polygon == PolygonType::Subject
    }

    #[inline]
    pub fn in_result(&self) -> bool {
        self.result_transition != 0
    }
}

/// Arena of sweep events for one clip call.
#[derive(Clone, Debug, Default)]
pub struct Events {
    list: Vec<SweepEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Events {
            list: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, event: SweepEvent) -> EventIdx {
        let idx = self.list.len() as EventIdx;
        self.list.push(event);
        idx
    }

    /// Create both events of the edge a-b, linked to each other. The left
    /// flag is set on whichever endpoint sorts first.
    pub fn push_edge(&mut self, a: Point, b: Point, polygon: PolygonType, contour_id: u32) -> (EventIdx, EventIdx) {
        let e1 = self.list.len() as EventIdx;
        let e2 = e1 + 1;
        self.list.push(SweepEvent::new(a, false, e2, polygon, contour_id));
        self.list.push(SweepEvent::new(b, false, e1, polygon, contour_id));
        if compare_events(self, e1, e2) == Ordering::Greater {
            self[e2].left = true;
        } else {
            self[e1].left = true;
        }
        (e1, e2)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[inline]
    pub fn other_point(&self, e: EventIdx) -> Point {
        self[self[e].other].point
    }

    /// Is the edge of `e` below point `p`?
    pub fn is_below(&self, e: EventIdx, p: Point) -> bool {
        let p0 = self[e].point;
        let p1 = self.other_point(e);
        if self[e].left {
            signed_area(p0, p1, p) > 0.0
        } else {
            signed_area(p1, p0, p) > 0.0
        }
    }

    #[inline]
    pub fn is_above(&self, e: EventIdx, p: Point) -> bool {
        !self.is_below(e, p)
    }

    #[inline]
    pub fn is_vertical(&self, e: EventIdx) -> bool {
        self[e].point.x == self.other_point(e).x
    }

    pub fn iter(&self) -> impl Iterator<Item = &SweepEvent> {
        self.list.iter()
    }
}

impl Index<EventIdx> for Events {
    type Output = SweepEvent;

    #[inline]
    fn index(&self, idx: EventIdx) -> &SweepEvent {
        &self.list[idx as usize]
    }
}

impl IndexMut<EventIdx> for Events {
    #[inline]
    fn index_mut(&mut self, idx: EventIdx) -> &mut SweepEvent {
        &mut self.list[idx as usize]
    }
}

/// Queue order of events.
///
/// x ascending, then y ascending (exact). At the same point: right endpoints
/// before left endpoints; then the event whose edge lies below goes first;
/// then subject before clipping; finally arena index, so the order is
/// strict.
pub fn compare_events(ev: &Events, a: EventIdx, b: EventIdx) -> Ordering {
    let e1 = &ev[a];
    let e2 = &ev[b];
    let p1 = e1.point;
    let p2 = e2.point;

    if p1.x > p2.x {
        return Ordering::Greater;
    }
    if p1.x < p2.x {
        return Ordering::Less;
    }
    if p1.y != p2.y {
        return if p1.y > p2.y {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if a == b {
        return Ordering::Equal;
    }

    if e1.left != e2.left {
        return if e1.left {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }

    let o2 = ev.other_point(b);
    if signed_area(p1, ev.other_point(a), o2) != 0.0 {
        return if ev.is_below(a, o2) {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    if e1.polygon != e2.polygon {
        return if e1.is_subject() {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    a.cmp(&b)
}

/// Status order of two active (left) events: bottom to top along the
/// current sweep position.
pub fn compare_segments(ev: &Events, le1: EventIdx, le2: EventIdx) -> Ordering {
    if le1 == le2 {
        return Ordering::Equal;
    }
    let e1 = &ev[le1];
    let e2 = &ev[le2];
    let o1 = ev.other_point(le1);
    let o2 = ev.other_point(le2);

    if !collinear(e1.point, o1, e2.point) || !collinear(e1.point, o1, o2) {
        // Shared left endpoint: the right endpoints decide.
        if approximately_equal(e1.point, e2.point) {
            return if ev.is_below(le1, o2) {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        if e1.point.x == e2.point.x {
            return if e1.point.y < e2.point.y {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        // Whichever edge entered the status later is placed relative to the
        // other one's line.
        if compare_events(ev, le1, le2) == Ordering::Greater {
            return if ev.is_above(le2, e1.point) {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        return if ev.is_below(le1, e2.point) {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    // Collinear.
    if e1.polygon != e2.polygon {
        return if e1.is_subject() {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    if approximately_equal(e1.point, e2.point) {
        if approximately_equal(o1, o2) {
            return e1.contour_id.cmp(&e2.contour_id).then(le1.cmp(&le2));
        }
        return if e1.contour_id > e2.contour_id {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if compare_events(ev, le1, le2) == Ordering::Greater {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}
