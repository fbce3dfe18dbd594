//! Retroactive correction of the second-to-last extruded ring.
//!
//! A ring is oriented with only the direction known when it was committed.
//! Once the next pivot exists, the chord from two steps back to the newest
//! pivot is a better estimate of where the path was heading, so the previous
//! ring is turned onto that chord after the fact.

use nalgebra::{Unit, Vector3};

use crate::geometry::correction_turn;
use crate::ops::{MeshEditor, SelectMode};
use crate::selection::SelectionGuard;
use crate::step::ExtrudeStep;

/// Steps needed before a correction has a reference two steps back.
pub const MIN_STEPS: usize = 3;

/// Turns the ring of `steps[len - 2]` onto the chord
/// `steps[len - 3].pivot -> steps[len - 1].pivot` and records the chord as
/// that step's direction. The mesh selection is unchanged afterwards.
///
/// Returns the applied turn, or `None` when there are fewer than three
/// steps, the chord is degenerate, or the ring is already aligned.
pub fn smooth_previous_step<M: MeshEditor + ?Sized>(
    mesh: &mut M,
    steps: &mut [ExtrudeStep],
    view: &Unit<Vector3<f64>>,
) -> Option<f64> {
    let n = steps.len();
    if n < MIN_STEPS {
        return None;
    }
    let chord = Unit::try_new(steps[n - 1].pivot - steps[n - 3].pivot, 1.0e-12)?;
    let previous = &mut steps[n - 2];
    let turn = correction_turn(view, &chord, &previous.direction);
    if turn == 0.0 {
        return None;
    }

    let mut mesh = SelectionGuard::new(mesh);
    isolate_previous_ring(&mut mesh);
    mesh.rotate_selection(view, turn, &previous.pivot);
    previous.direction = chord;
    log::debug!("turned step {} by {:.4} rad onto {:?}", n - 1, turn, chord.into_inner());
    Some(turn)
}

/// Leaves exactly the ring one topological step behind the captured
/// selection selected.
fn isolate_previous_ring<M: MeshEditor + ?Sized>(mesh: &mut SelectionGuard<'_, M>) {
    mesh.set_select_mode(SelectMode::Vertex);
    mesh.select_more();
    mesh.deselect_captured();
}
