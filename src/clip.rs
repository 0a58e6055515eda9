// Copyright 2025 Lars Brubaker
// License: MIT
//
// Polygon boolean operations (Martinez-Rueda-Feito sweep).
//
// Pipeline:
//   1. every input edge becomes a left/right event pair in the priority queue
//   2. the sweep pops events in order, keeps the edges crossing the sweep line
//      in an ordered set, splits edges where neighbours intersect and labels
//      each edge with its in/out transitions (fields.rs, intersect.rs)
//   3. the edges labelled as part of the result are walked into closed
//      contours, nested into exteriors and holes (connect.rs)

mod connect;
mod fields;
mod intersect;

use tracing::{debug, instrument, trace};

use crate::dict::OrderedSet;
use crate::error::ClipResult;
use crate::geom::Bbox;
use crate::polygon::{Contour, Polygon};
use crate::priorityq::PriorityQ;
use crate::sweep::{compare_events, compare_segments, EventIdx, Events, PolygonType};

use intersect::IntersectionKind;

// ─────────────────────────────── Public types ──────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClipType {
    Union,
    Intersection,
    Difference,
    Xor,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClipOption {
    /// Answer empty operands and disjoint bounding boxes without sweeping.
    TrivialShortCircuit,
    /// Stop the sweep once no later event can change an intersection or
    /// difference.
    EarlyExit,
}

#[derive(Copy, Clone, Debug)]
struct Options {
    trivial_short_circuit: bool,
    early_exit: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            trivial_short_circuit: true,
            early_exit: true,
        }
    }
}

// ─────────────────────────── Clipper ──────────────────────────────────────────

/// Accumulates subject and clipping polygons, then runs boolean operations
/// on them. Each run allocates its own sweep state.
#[derive(Clone, Debug, Default)]
pub struct Clipper {
    subjects: Vec<Polygon>,
    clippings: Vec<Polygon>,
    options: Options,
}

impl Clipper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_option(&mut self, option: ClipOption, value: bool) {
        match option {
            ClipOption::TrivialShortCircuit => self.options.trivial_short_circuit = value,
            ClipOption::EarlyExit => self.options.early_exit = value,
        }
    }

    pub fn add_subject(&mut self, polygon: Polygon) -> &mut Self {
        self.subjects.push(polygon);
        self
    }

    pub fn add_subjects<I: IntoIterator<Item = Polygon>>(&mut self, polygons: I) -> &mut Self {
        self.subjects.extend(polygons);
        self
    }

    pub fn add_clipping(&mut self, polygon: Polygon) -> &mut Self {
        self.clippings.push(polygon);
        self
    }

    pub fn add_clippings<I: IntoIterator<Item = Polygon>>(&mut self, polygons: I) -> &mut Self {
        self.clippings.extend(polygons);
        self
    }

    pub fn clear(&mut self) {
        self.subjects.clear();
        self.clippings.clear();
    }

    pub fn execute(&self, op: ClipType) -> ClipResult {
        execute_with(&self.subjects, &self.clippings, op, self.options)
    }

    /// Run the sweep and return the assembled contours with their hole links
    /// and nesting depths. Exteriors are counter-clockwise, holes clockwise.
    /// Never short-circuits.
    pub fn contours(&self, op: ClipType) -> Vec<Contour> {
        let options = Options {
            trivial_short_circuit: false,
            ..self.options
        };
        connect::orient_contours(run_sweep(&self.subjects, &self.clippings, op, options))
    }
}

/// Compute `subjects <op> clippings`.
pub fn clip(subjects: &[Polygon], clippings: &[Polygon], op: ClipType) -> ClipResult {
    execute_with(subjects, clippings, op, Options::default())
}

/// Union of every polygon in `polygons`.
pub fn union_all(polygons: &[Polygon]) -> ClipResult {
    let mut iter = polygons.iter().filter(|p| !p.is_empty());
    let mut acc = match iter.next() {
        Some(first) => vec![first.clone()],
        None => return ClipResult::Empty,
    };
    for p in iter {
        acc = clip(&acc, std::slice::from_ref(p), ClipType::Union).into_polygons();
    }
    ClipResult::from_polygons(acc)
}

#[instrument(skip_all, fields(op = ?op, subjects = subjects.len(), clippings = clippings.len()))]
fn execute_with(subjects: &[Polygon], clippings: &[Polygon], op: ClipType, options: Options) -> ClipResult {
    if options.trivial_short_circuit {
        if let Some(result) = trivial_result(subjects, clippings, op) {
            return result;
        }
    }
    let contours = connect::orient_contours(run_sweep(subjects, clippings, op, options));
    connect::assemble_polygons(&contours)
}

fn non_empty(polygons: &[Polygon]) -> Vec<Polygon> {
    polygons.iter().filter(|p| !p.is_empty()).cloned().collect()
}

fn bbox_of(polygons: &[Polygon]) -> Bbox {
    polygons.iter().fold(Bbox::empty(), |b, p| b.union(&p.bbox()))
}

/// Results that need no sweep: an empty operand, or operands whose bounding
/// boxes do not touch.
fn trivial_result(subjects: &[Polygon], clippings: &[Polygon], op: ClipType) -> Option<ClipResult> {
    let subject_empty = subjects.iter().all(Polygon::is_empty);
    let clipping_empty = clippings.iter().all(Polygon::is_empty);

    if subject_empty || clipping_empty {
        debug!(subject_empty, clipping_empty, "empty operand");
        return Some(match op {
            ClipType::Intersection => ClipResult::Empty,
            ClipType::Difference => ClipResult::from_polygons(non_empty(subjects)),
            ClipType::Union | ClipType::Xor => {
                let side = if subject_empty { clippings } else { subjects };
                ClipResult::from_polygons(non_empty(side))
            }
        });
    }

    if !bbox_of(subjects).overlaps(&bbox_of(clippings)) {
        debug!("bounding boxes do not overlap");
        return Some(match op {
            ClipType::Intersection => ClipResult::Empty,
            ClipType::Difference => ClipResult::from_polygons(non_empty(subjects)),
            ClipType::Union | ClipType::Xor => {
                let mut all = non_empty(subjects);
                all.extend(non_empty(clippings));
                ClipResult::from_polygons(all)
            }
        });
    }
    None
}

fn run_sweep(subjects: &[Polygon], clippings: &[Polygon], op: ClipType, options: Options) -> Vec<Contour> {
    let mut sweep = Sweep::new(op, options.early_exit);
    sweep.fill_queue(subjects, PolygonType::Subject);
    sweep.fill_queue(clippings, PolygonType::Clipping);
    let sorted = sweep.subdivide();
    debug!(events = sweep.events.len(), processed = sorted.len(), "sweep finished");
    let contours = connect::connect_contours(&sweep.events, &sorted);
    debug!(contours = contours.len(), "contours assembled");
    contours
}

// ─────────────────────────── Sweep ────────────────────────────────────────────

/// State of one sweep: the event arena, the event queue and the status
/// structure holding the edges currently crossed by the sweep line.
pub(crate) struct Sweep {
    op: ClipType,
    early_exit: bool,
    pub(crate) events: Events,
    queue: PriorityQ<EventIdx>,
    status: OrderedSet<EventIdx>,
    sbbox: Bbox,
    cbbox: Bbox,
    contour_count: u32,
}

impl Sweep {
    pub(crate) fn new(op: ClipType, early_exit: bool) -> Self {
        Sweep {
            op,
            early_exit,
            events: Events::new(),
            queue: PriorityQ::new(),
            status: OrderedSet::new(),
            sbbox: Bbox::empty(),
            cbbox: Bbox::empty(),
            contour_count: 0,
        }
    }

    /// Queue one event pair per edge. All rings of one polygon share a
    /// contour id. Zero-length edges are skipped.
    pub(crate) fn fill_queue(&mut self, polygons: &[Polygon], polygon_type: PolygonType) {
        for polygon in polygons.iter().filter(|p| !p.is_empty()) {
            self.contour_count += 1;
            let contour_id = self.contour_count;
            for ring in polygon.rings() {
                let n = ring.len();
                for i in 0..n {
                    let a = ring[i];
                    let b = ring[(i + 1) % n];
                    match polygon_type {
                        PolygonType::Subject => self.sbbox.extend(a),
                        PolygonType::Clipping => self.cbbox.extend(a),
                    }
                    if a == b {
                        continue;
                    }
                    let (e1, e2) = self.events.push_edge(a, b, polygon_type, contour_id);
                    let events = &self.events;
                    let cmp = |x, y| compare_events(events, x, y);
                    self.queue.insert(e1, &cmp);
                    self.queue.insert(e2, &cmp);
                }
            }
        }
    }

    /// Run the sweep. Returns every processed event in processing order.
    pub(crate) fn subdivide(&mut self) -> Vec<EventIdx> {
        let rightbound = self.sbbox.max.x.min(self.cbbox.max.x);
        let mut sorted = Vec::with_capacity(self.events.len());

        loop {
            let event = {
                let events = &self.events;
                match self.queue.extract_min(&|a, b| compare_events(events, a, b)) {
                    Some(e) => e,
                    None => break,
                }
            };
            sorted.push(event);

            if self.early_exit {
                let x = self.events[event].point.x;
                let past_end = match self.op {
                    ClipType::Intersection => x > rightbound,
                    ClipType::Difference => x > self.sbbox.max.x,
                    ClipType::Union | ClipType::Xor => false,
                };
                if past_end {
                    debug!(x, "early exit");
                    break;
                }
            }

            if self.events[event].left {
                self.process_left(event);
            } else {
                self.process_right(event);
            }
        }
        sorted
    }

    fn process_left(&mut self, e: EventIdx) {
        let node = {
            let events = &self.events;
            self.status.insert(e, &|a, b| compare_segments(events, a, b))
        };
        self.events[e].status_node = Some(node);

        let prev_node = self.status.predecessor(node);
        let prev = prev_node.map(|n| self.status.key(n));
        let next = self.status.successor(node).map(|n| self.status.key(n));

        self.compute_fields(e, prev);

        if let Some(next) = next {
            if self.possible_intersection(e, next) == IntersectionKind::SharedLeft {
                self.compute_fields(e, prev);
                self.compute_fields(next, Some(e));
            }
        }

        if let (Some(prev), Some(prev_node)) = (prev, prev_node) {
            if self.possible_intersection(prev, e) == IntersectionKind::SharedLeft {
                let prev_prev = self.status.predecessor(prev_node).map(|n| self.status.key(n));
                self.compute_fields(prev, prev_prev);
                self.compute_fields(e, Some(prev));
            }
        }
    }

    fn process_right(&mut self, e: EventIdx) {
        let left = self.events[e].other;
        let node = match self.events[left].status_node.take() {
            Some(n) => n,
            None => {
                trace!(event = e, "right event without an active left partner");
                return;
            }
        };

        let prev = self.status.predecessor(node).map(|n| self.status.key(n));
        let next = self.status.successor(node).map(|n| self.status.key(n));
        self.status.remove_node(node);

        if let (Some(prev), Some(next)) = (prev, next) {
            self.possible_intersection(prev, next);
        }
    }

    fn compute_fields(&mut self, e: EventIdx, prev: Option<EventIdx>) {
        fields::compute_fields(&mut self.events, e, prev, self.op);
    }

    fn possible_intersection(&mut self, se1: EventIdx, se2: EventIdx) -> IntersectionKind {
        intersect::possible_intersection(&mut self.events, &mut self.queue, se1, se2)
    }
}
