use nalgebra::{Point2, Point3, Unit, Vector3};

use crate::error::{DrawExtrudeError, Result};
use crate::geometry::{signed_turn, Bounds};
use crate::ops::MeshEditor;
use crate::projection::{project_to_plane, Viewport};
use crate::settings::ExtrudeSettings;
use crate::smoothing::smooth_previous_step;

/// One committed extrusion: the pivot after the commit and the unit
/// direction of travel that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtrudeStep {
    pub pivot: Point3<f64>,
    pub direction: Unit<Vector3<f64>>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// Not enough displacement yet.
    Held { distance: f64, threshold: f64 },
    Committed {
        /// Number of steps after this commit.
        steps: usize,
        /// Turn applied to the new ring to follow the previous one.
        turn: f64,
        /// Turn applied retroactively to the previous ring.
        correction: Option<f64>,
    },
}

impl StepOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, StepOutcome::Committed { .. })
    }
}

/// Owns the rolling pivot and the committed step history of a session.
#[derive(Clone, Debug)]
pub struct StepController {
    pivot: Point3<f64>,
    direction: Option<Unit<Vector3<f64>>>,
    steps: Vec<ExtrudeStep>,
    relative_scale: f64,
}

impl StepController {
    pub fn new(pivot: Point3<f64>, relative_scale: f64) -> Self {
        Self {
            pivot,
            direction: None,
            steps: Vec::new(),
            relative_scale,
        }
    }

    /// Seeds the pivot at the selection's bounds center and the relative
    /// scale at its extent.
    pub fn seed<M: MeshEditor + ?Sized>(mesh: &M) -> Result<Self> {
        let points = mesh.selected_positions();
        let bounds = Bounds::of(&points, &mesh.world_transform()).ok_or(DrawExtrudeError::NoSelection)?;
        Ok(Self::new(bounds.center(), bounds.extent()))
    }

    pub fn pivot(&self) -> Point3<f64> {
        self.pivot
    }

    pub fn direction(&self) -> Option<Unit<Vector3<f64>>> {
        self.direction
    }

    pub fn steps(&self) -> &[ExtrudeStep] {
        &self.steps
    }

    pub fn relative_scale(&self) -> f64 {
        self.relative_scale
    }

    pub fn threshold(&self, settings: &ExtrudeSettings) -> f64 {
        settings.threshold(self.relative_scale)
    }

    /// Evaluates one pointer position while drawing.
    ///
    /// Fails with `DegenerateProjection` when the pointer ray misses the
    /// pivot plane; nothing is touched in that case.
    pub fn advance<M, V>(
        &mut self,
        mesh: &mut M,
        viewport: &V,
        settings: &ExtrudeSettings,
        pointer: &Point2<f64>,
    ) -> Result<StepOutcome>
    where
        M: MeshEditor + ?Sized,
        V: Viewport + ?Sized,
    {
        let view = viewport.view_forward();
        let target = project_to_plane(viewport, pointer, &view, &self.pivot)
            .ok_or(DrawExtrudeError::DegenerateProjection)?;
        Ok(self.offer(mesh, &view, self.threshold(settings), target))
    }

    /// Commits a step toward `target` once it is at least `threshold` away
    /// from the pivot. A zero displacement never commits.
    pub fn offer<M: MeshEditor + ?Sized>(
        &mut self,
        mesh: &mut M,
        view: &Unit<Vector3<f64>>,
        threshold: f64,
        target: Point3<f64>,
    ) -> StepOutcome {
        let offset = target - self.pivot;
        let distance = offset.norm();
        match Unit::try_new(offset, 0.0) {
            Some(direction) if distance >= threshold => self.commit(mesh, view, target, offset, direction),
            _ => StepOutcome::Held { distance, threshold },
        }
    }

    fn commit<M: MeshEditor + ?Sized>(
        &mut self,
        mesh: &mut M,
        view: &Unit<Vector3<f64>>,
        target: Point3<f64>,
        offset: Vector3<f64>,
        direction: Unit<Vector3<f64>>,
    ) -> StepOutcome {
        mesh.extrude_region();
        mesh.translate_selection(&offset);
        self.pivot = target;

        let turn = match self.direction {
            Some(previous) => signed_turn(view, &previous, &direction),
            None => 0.0,
        };
        if turn != 0.0 {
            mesh.rotate_selection(view, turn, &self.pivot);
        }

        self.direction = Some(direction);
        self.steps.push(ExtrudeStep { pivot: self.pivot, direction });
        let correction = smooth_previous_step(mesh, &mut self.steps, view);
        log::info!(
            "step {} committed at {:?} (turn {:.4}, correction {:?})",
            self.steps.len(),
            self.pivot.coords,
            turn,
            correction
        );
        StepOutcome::Committed {
            steps: self.steps.len(),
            turn,
            correction,
        }
    }

    /// Forgets the step history; the pivot stays where drawing left it.
    pub fn clear(&mut self) {
        self.steps.clear();
        self.direction = None;
    }
}
