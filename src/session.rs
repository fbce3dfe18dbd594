//! Modal input handling for a draw-extrude session.
//!
//! Raw host events are classified into [`Signal`]s, [`transition`] maps a
//! mode and a signal to the next mode and a [`Command`], and the operator
//! carries the command out. The transition table has no side effects.

use nalgebra::Point2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolMode {
    Idle,
    Draw,
}

impl Default for ToolMode {
    fn default() -> Self {
        ToolMode::Idle
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    LeftMouse,
    SelectMouse,
    RightMouse,
    MiddleMouse,
    WheelUp,
    WheelDown,
    MouseMove,
    Escape,
    Numpad(u8),
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventValue {
    Press,
    Release,
    Nothing,
}

/// One input event as the host delivers it, with the pointer position in
/// region coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputEvent {
    pub kind: EventKind,
    pub value: EventValue,
    pub pointer: Point2<f64>,
}

impl InputEvent {
    pub fn new(kind: EventKind, value: EventValue, pointer: Point2<f64>) -> Self {
        Self { kind, value, pointer }
    }

    pub fn press(kind: EventKind, pointer: Point2<f64>) -> Self {
        Self::new(kind, EventValue::Press, pointer)
    }

    pub fn release(kind: EventKind, pointer: Point2<f64>) -> Self {
        Self::new(kind, EventValue::Release, pointer)
    }

    pub fn motion(pointer: Point2<f64>) -> Self {
        Self::new(EventKind::MouseMove, EventValue::Nothing, pointer)
    }

    pub fn key(kind: EventKind) -> Self {
        Self::new(kind, EventValue::Press, Point2::origin())
    }

    /// Keys that keep driving the camera while the tool runs. Numpad 2 is
    /// deliberately absent.
    pub fn is_navigation(&self) -> bool {
        match self.kind {
            EventKind::Numpad(n) => matches!(n, 0 | 1 | 3..=9),
            EventKind::MiddleMouse | EventKind::WheelUp | EventKind::WheelDown => true,
            _ => false,
        }
    }

    pub fn is_pick_button(&self) -> bool {
        matches!(self.kind, EventKind::LeftMouse | EventKind::SelectMouse)
    }

    pub fn is_terminate(&self) -> bool {
        matches!(self.kind, EventKind::RightMouse | EventKind::Escape)
    }
}

/// What an event means to the tool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Signal {
    /// Pick button pressed; `on_pivot` when inside the pick radius.
    Press { on_pivot: bool },
    Release,
    Motion(Point2<f64>),
    Terminate,
    Navigate,
    Ignore,
}

impl Signal {
    /// `on_pivot` is only consulted for pick-button presses.
    pub fn classify(event: &InputEvent, on_pivot: impl FnOnce(&Point2<f64>) -> bool) -> Signal {
        if event.is_pick_button() {
            return match event.value {
                EventValue::Press => Signal::Press { on_pivot: on_pivot(&event.pointer) },
                EventValue::Release => Signal::Release,
                EventValue::Nothing => Signal::Ignore,
            };
        }
        if event.is_terminate() {
            Signal::Terminate
        } else if event.is_navigation() {
            Signal::Navigate
        } else if event.kind == EventKind::MouseMove {
            Signal::Motion(event.pointer)
        } else {
            Signal::Ignore
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Swallow the event.
    Consume,
    /// Hand the event back to the host untouched.
    PassThrough,
    /// Evaluate a drawing step at this pointer position.
    Step(Point2<f64>),
    /// Tear the session down.
    Finish,
}

pub fn transition(mode: ToolMode, signal: Signal) -> (ToolMode, Command) {
    use ToolMode::*;
    match (mode, signal) {
        (_, Signal::Terminate) => (mode, Command::Finish),
        (_, Signal::Navigate) => (mode, Command::PassThrough),
        (Idle, Signal::Press { on_pivot: true }) => (Draw, Command::Consume),
        (_, Signal::Press { .. }) => (mode, Command::Consume),
        (_, Signal::Release) => (Idle, Command::Consume),
        (Draw, Signal::Motion(pointer)) => (Draw, Command::Step(pointer)),
        (Idle, Signal::Motion(_)) => (Idle, Command::PassThrough),
        (_, Signal::Ignore) => (mode, Command::Consume),
    }
}
