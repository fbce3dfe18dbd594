//! The "begin draw-extrude" command and its modal loop.

use log::Level;
use nalgebra::Point2;

use crate::error::{DrawExtrudeError, Result};
use crate::host::{OverlayHandle, ViewportHost};
use crate::ops::MeshEditor;
use crate::overlay::{pivot_marker, Canvas};
use crate::projection::{hit_test_point, Viewport};
use crate::session::{transition, Command, InputEvent, Signal, ToolMode};
use crate::settings::ExtrudeSettings;
use crate::step::StepController;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorStatus {
    /// Never started: no selection, no viewport, or a session already runs.
    Cancelled,
    /// The modal loop wants more events.
    Running,
    /// The event is not ours; the host should handle it.
    PassThrough,
    Finished,
}

/// Everything one handler invocation may touch. `viewport` is `None` when
/// the command runs outside a 3D viewport.
pub struct EditContext<'a, M: ?Sized, V: ?Sized, H: ?Sized> {
    pub mesh: &'a mut M,
    pub viewport: Option<&'a V>,
    pub host: &'a mut H,
    pub settings: &'a ExtrudeSettings,
}

impl<'a, M: ?Sized, V: ?Sized, H: ?Sized> EditContext<'a, M, V, H> {
    pub fn new(mesh: &'a mut M, viewport: Option<&'a V>, host: &'a mut H, settings: &'a ExtrudeSettings) -> Self {
        Self { mesh, viewport, host, settings }
    }
}

/// State of one running draw-extrude session.
#[derive(Clone, Debug)]
pub struct Session {
    mode: ToolMode,
    controller: StepController,
    manipulator: bool,
    overlay: OverlayHandle,
}

impl Session {
    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn controller(&self) -> &StepController {
        &self.controller
    }

    fn step<M, V, H>(&mut self, ctx: &mut EditContext<'_, M, V, H>, viewport: &V, pointer: &Point2<f64>)
    where
        M: MeshEditor + ?Sized,
        V: Viewport + ?Sized,
        H: ViewportHost + ?Sized,
    {
        let advanced = ctx
            .settings
            .validate()
            .and_then(|_| self.controller.advance(&mut *ctx.mesh, viewport, ctx.settings, pointer));
        match advanced {
            Ok(outcome) => log::debug!("{:?}", outcome),
            Err(DrawExtrudeError::DegenerateProjection) => {
                log::debug!("pointer ray misses the pivot plane, frame skipped");
            }
            Err(err) => ctx.host.report(Level::Warn, &err.to_string()),
        }
    }
}

/// The draw-extrude operator. Holds at most one session at a time.
#[derive(Clone, Debug, Default)]
pub struct DrawExtrude {
    session: Option<Session>,
}

impl DrawExtrude {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a session, reporting why when it cannot.
    pub fn invoke<M, V, H>(&mut self, ctx: &mut EditContext<'_, M, V, H>) -> OperatorStatus
    where
        M: MeshEditor + ?Sized,
        V: Viewport + ?Sized,
        H: ViewportHost + ?Sized,
    {
        match self.begin(ctx) {
            Ok(()) => OperatorStatus::Running,
            Err(err) => {
                ctx.host.report(Level::Warn, &err.to_string());
                OperatorStatus::Cancelled
            }
        }
    }

    /// Validates the context and sets a session up. Nothing in the mesh or
    /// the host changes when this fails.
    pub fn begin<M, V, H>(&mut self, ctx: &mut EditContext<'_, M, V, H>) -> Result<()>
    where
        M: MeshEditor + ?Sized,
        V: Viewport + ?Sized,
        H: ViewportHost + ?Sized,
    {
        if self.session.is_some() {
            return Err(DrawExtrudeError::SessionActive);
        }
        ctx.viewport.ok_or(DrawExtrudeError::NoViewportContext)?;
        ctx.settings.validate()?;
        let controller = StepController::seed(&*ctx.mesh)?;

        let manipulator = ctx.host.manipulator_visible();
        ctx.host.set_manipulator_visible(false);
        let overlay = ctx.host.add_overlay();
        log::info!(
            "draw-extrude started at {:?}, relative scale {:.4}",
            controller.pivot().coords,
            controller.relative_scale()
        );
        self.session = Some(Session {
            mode: ToolMode::Idle,
            controller,
            manipulator,
            overlay,
        });
        Ok(())
    }

    /// Handles one event of the modal loop.
    pub fn modal<M, V, H>(&mut self, ctx: &mut EditContext<'_, M, V, H>, event: &InputEvent) -> OperatorStatus
    where
        M: MeshEditor + ?Sized,
        V: Viewport + ?Sized,
        H: ViewportHost + ?Sized,
    {
        let viewport = match ctx.viewport {
            Some(viewport) => viewport,
            None => {
                self.finish(ctx);
                return OperatorStatus::Cancelled;
            }
        };
        let session = match self.session.as_mut() {
            Some(session) => session,
            None => return OperatorStatus::Cancelled,
        };
        ctx.host.tag_redraw();

        let pivot = session.controller.pivot();
        let signal = Signal::classify(event, |pointer| hit_test_point(viewport, &pivot, pointer));
        let (mode, command) = transition(session.mode, signal);
        if mode != session.mode {
            log::debug!("{:?} -> {:?}", session.mode, mode);
            session.mode = mode;
        }

        match command {
            Command::Consume => OperatorStatus::Running,
            Command::PassThrough => OperatorStatus::PassThrough,
            Command::Step(pointer) => {
                session.step(ctx, viewport, &pointer);
                ctx.mesh.update();
                OperatorStatus::Running
            }
            Command::Finish => {
                self.finish(ctx);
                OperatorStatus::Finished
            }
        }
    }

    /// Tears the running session down: the overlay goes away, the
    /// manipulator comes back and the step history is dropped. Committed
    /// geometry stays. Returns false when nothing was running.
    pub fn finish<M, V, H>(&mut self, ctx: &mut EditContext<'_, M, V, H>) -> bool
    where
        M: MeshEditor + ?Sized,
        V: Viewport + ?Sized,
        H: ViewportHost + ?Sized,
    {
        let mut session = match self.session.take() {
            Some(session) => session,
            None => return false,
        };
        ctx.host.remove_overlay(session.overlay);
        ctx.host.set_manipulator_visible(session.manipulator);
        log::info!("draw-extrude finished after {} steps", session.controller.steps().len());
        session.controller.clear();
        true
    }

    /// Per-frame overlay callback.
    pub fn draw<V, C>(&self, viewport: &V, canvas: &mut C)
    where
        V: Viewport + ?Sized,
        C: Canvas + ?Sized,
    {
        let marker = self
            .session
            .as_ref()
            .and_then(|session| pivot_marker(viewport, &session.controller.pivot()));
        if let Some(marker) = marker {
            canvas.draw_point(&marker);
        }
    }
}
