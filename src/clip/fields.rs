// Copyright 2025 Lars Brubaker
// License: MIT
//
// Edge labelling: in/out transitions and result membership.

use super::ClipType;
use crate::sweep::{EdgeType, EventIdx, Events};

/// Fill in `in_out`, `other_in_out`, `prev_in_result` and
/// `result_transition` of left event `e`, given the edge directly below it
/// in the status structure.
pub(crate) fn compute_fields(ev: &mut Events, e: EventIdx, prev: Option<EventIdx>, op: ClipType) {
    match prev {
        None => {
            ev[e].in_out = false;
            ev[e].other_in_out = true;
        }
        Some(prev) => {
            let prev_vertical = ev.is_vertical(prev);
            let (prev_in_out, prev_other_in_out) = (ev[prev].in_out, ev[prev].other_in_out);
            if ev[e].polygon == ev[prev].polygon {
                ev[e].in_out = !prev_in_out;
                ev[e].other_in_out = prev_other_in_out;
            } else {
                ev[e].in_out = !prev_other_in_out;
                ev[e].other_in_out = if prev_vertical { !prev_in_out } else { prev_in_out };
            }

            ev[e].prev_in_result = if !in_result(ev, prev, op) || prev_vertical {
                ev[prev].prev_in_result
            } else {
                Some(prev)
            };
        }
    }

    ev[e].result_transition = if in_result(ev, e, op) {
        determine_result_transition(ev, e, op)
    } else {
        0
    };
}

/// Does the edge of `e` belong to the boundary of the result?
pub(crate) fn in_result(ev: &Events, e: EventIdx, op: ClipType) -> bool {
    let event = &ev[e];
    match event.edge_type {
        EdgeType::Normal => match op {
            ClipType::Intersection => !event.other_in_out,
            ClipType::Union => event.other_in_out,
            ClipType::Difference => event.is_subject() == event.other_in_out,
            ClipType::Xor => true,
        },
        EdgeType::SameTransition => matches!(op, ClipType::Intersection | ClipType::Union),
        EdgeType::DifferentTransition => op == ClipType::Difference,
        EdgeType::NonContributing => false,
    }
}

/// +1 if the region above the edge is inside the result, -1 otherwise.
///
/// An edge that coincides with an edge of the other operand crosses both
/// boundaries at once, so the other operand's side above it follows from its
/// own side and the edge type rather than from the edge below.
pub(crate) fn determine_result_transition(ev: &Events, e: EventIdx, op: ClipType) -> i8 {
    let event = &ev[e];
    let this_in = !event.in_out;
    let that_in = match event.edge_type {
        EdgeType::SameTransition => this_in,
        EdgeType::DifferentTransition => !this_in,
        EdgeType::Normal | EdgeType::NonContributing => !event.other_in_out,
    };
    let is_in = match op {
        ClipType::Intersection => this_in && that_in,
        ClipType::Union => this_in || that_in,
        ClipType::Xor => this_in ^ that_in,
        ClipType::Difference => {
            if event.is_subject() {
                this_in && !that_in
            } else {
                that_in && !this_in
            }
        }
    };
    if is_in {
        1
    } else {
        -1
    }
}
