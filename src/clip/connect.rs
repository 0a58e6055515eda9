// Copyright 2025 Lars Brubaker
// License: MIT
//
// Contour assembly: walks the edges labelled as part of the result into
// closed contours and builds the output polygons.

use std::cmp::Ordering;

use tracing::{trace, warn};

use crate::error::ClipResult;
use crate::geom::{approximately_equal, Point};
use crate::polygon::{Contour, Polygon};
use crate::sweep::{compare_events, EventIdx, Events};

const NO_POS: usize = usize::MAX;

/// A result edge endpoint, frozen after the sweep. Positions refer to the
/// ordered result list.
#[derive(Clone, Debug)]
pub(crate) struct ResultEvent {
    pub event: EventIdx,
    pub point: Point,
    /// Position of the event at the other end of the same edge.
    pub other_pos: usize,
    pub prev_in_result: Option<EventIdx>,
}

/// Ordered result events plus the event-to-position lookup.
pub(crate) struct ResultEvents {
    pub list: Vec<ResultEvent>,
    pub pos_of: Vec<usize>,
}

/// Keep the endpoints of result edges (both ends of each edge), restore
/// sweep order, and link each event to its partner's position.
pub(crate) fn order_result_events(ev: &Events, sorted: &[EventIdx]) -> ResultEvents {
    let is_result = |e: EventIdx| {
        let event = &ev[e];
        if event.left {
            event.in_result()
        } else {
            ev[event.other].in_result()
        }
    };

    let mut seen = vec![false; ev.len()];
    for &e in sorted {
        seen[e as usize] = true;
    }
    // An early exit can leave an edge with only one end processed.
    let mut order: Vec<EventIdx> = sorted
        .iter()
        .copied()
        .filter(|&e| is_result(e) && seen[ev[e].other as usize])
        .collect();

    // Overlapping edges can leave the list slightly out of order.
    let mut done = false;
    while !done {
        done = true;
        for i in 1..order.len() {
            if compare_events(ev, order[i - 1], order[i]) == Ordering::Greater {
                order.swap(i - 1, i);
                done = false;
            }
        }
    }

    let mut pos_of = vec![NO_POS; ev.len()];
    for (i, &e) in order.iter().enumerate() {
        pos_of[e as usize] = i;
    }

    let list = order
        .iter()
        .map(|&e| ResultEvent {
            event: e,
            point: ev[e].point,
            other_pos: pos_of[ev[e].other as usize],
            prev_in_result: ev[e].prev_in_result,
        })
        .collect();

    ResultEvents { list, pos_of }
}

/// Next position to continue a contour walk from `pos`: an unprocessed
/// event at exactly the same point (the order of `list` is exact too), or else the nearest unprocessed event before
/// `pos` (stopping at `orig`).
pub(crate) fn next_pos(pos: usize, list: &[ResultEvent], processed: &[bool], orig: usize) -> Option<usize> {
    let p = list[pos].point;
    let mut new_pos = pos + 1;
    while new_pos < list.len() && list[new_pos].point == p {
        if !processed[new_pos] {
            return Some(new_pos);
        }
        new_pos += 1;
    }

    let mut new_pos = pos as isize - 1;
    while new_pos > orig as isize && processed[new_pos as usize] {
        new_pos -= 1;
    }
    (new_pos >= 0).then_some(new_pos as usize)
}

/// Place a new contour relative to the closest result edge below its first
/// event: no edge below means a depth-0 exterior; an edge entering a region
/// makes it a hole of that region; an edge leaving one makes it a sibling.
fn initialize_contour(
    start: &ResultEvent,
    ev: &Events,
    results: &ResultEvents,
    contour_of: &[Option<usize>],
    contours: &mut [Contour],
    contour_id: usize,
) -> Contour {
    let mut contour = Contour::new();

    let lower = start.prev_in_result.and_then(|below| {
        let pos = results.pos_of[below as usize];
        let lower_id = contour_of.get(pos).copied().flatten()?;
        Some((lower_id, ev[below].result_transition))
    });

    if let Some((lower_id, transition)) = lower {
        if transition > 0 {
            match contours[lower_id].hole_of {
                Some(parent) => {
                    contours[parent].hole_ids.push(contour_id);
                    contour.hole_of = Some(parent);
                    contour.depth = contours[lower_id].depth;
                }
                None => {
                    contours[lower_id].hole_ids.push(contour_id);
                    contour.hole_of = Some(lower_id);
                    contour.depth = contours[lower_id].depth + 1;
                }
            }
        } else {
            contour.depth = contours[lower_id].depth;
        }
    }
    contour
}

/// Walk the result edges into closed contours. The returned contours repeat
/// their first point at the end.
pub(crate) fn connect_contours(ev: &Events, sorted: &[EventIdx]) -> Vec<Contour> {
    let results = order_result_events(ev, sorted);
    let list = &results.list;
    let n = list.len();

    let mut processed = vec![false; n];
    let mut contour_of: Vec<Option<usize>> = vec![None; n];
    let mut contours: Vec<Contour> = Vec::new();

    for i in 0..n {
        if processed[i] {
            continue;
        }
        let contour_id = contours.len();
        let mut contour = initialize_contour(&list[i], ev, &results, &contour_of, &mut contours, contour_id);

        let orig = i;
        let mut pos = i;
        contour.points.push(list[i].point);
        loop {
            processed[pos] = true;
            contour_of[pos] = Some(contour_id);
            pos = list[pos].other_pos;
            if pos == NO_POS {
                warn!(event = list[i].event, "result edge without partner");
                break;
            }
            processed[pos] = true;
            contour_of[pos] = Some(contour_id);
            contour.points.push(list[pos].point);

            match next_pos(pos, list, &processed, orig) {
                Some(next) if next != orig && next < n && !processed[next] => pos = next,
                _ => break,
            }
        }

        if contour.points.last().map(|&p| approximately_equal(p, list[i].point)) != Some(true) {
            warn!(contour = contour_id, points = contour.points.len(), "contour did not close");
        }
        trace!(contour = contour_id, points = contour.points.len(), depth = contour.depth, "contour built");
        contours.push(contour);
    }
    contours
}

/// Drop the repeated closing point and wind exteriors counter-clockwise,
/// holes clockwise.
pub(crate) fn orient_contours(contours: Vec<Contour>) -> Vec<Contour> {
    contours
        .into_iter()
        .map(|mut c| {
            if c.points.len() > 1 && approximately_equal(c.points[0], c.points[c.points.len() - 1]) {
                c.points.pop();
            }
            let ccw = c.is_exterior();
            c.into_oriented(ccw)
        })
        .collect()
}

/// One polygon per exterior contour, followed by its holes. Contours with
/// fewer than 3 points are dropped.
pub(crate) fn assemble_polygons(contours: &[Contour]) -> ClipResult {
    let mut polygons = Vec::new();
    for contour in contours.iter().filter(|c| c.is_exterior()) {
        if contour.points.len() < 3 {
            continue;
        }
        let mut points = contour.points.clone();
        let mut start_ids = vec![0];
        for &hole_id in &contour.hole_ids {
            let hole = &contours[hole_id];
            if hole.points.len() < 3 {
                continue;
            }
            start_ids.push(points.len());
            points.extend_from_slice(&hole.points);
        }
        start_ids.push(points.len());
        polygons.push(Polygon::from_parts(points, start_ids));
    }
    ClipResult::from_polygons(polygons)
}
