//! Draw-to-extrude for mesh editing viewports.
//!
//! Dragging from the pivot marker extrudes the selected region in steps
//! along the pointer path. Each committed step turns the new ring to follow
//! the drawn direction, and once a third step exists the ring before the
//! newest one is turned onto the chord of its neighbours so the chain bends
//! smoothly instead of kinking.
//!
//! The host is reached only through [`MeshEditor`], [`Viewport`] and
//! [`ViewportHost`]; [`EditMesh`], the viewports in [`camera`] and
//! [`HeadlessHost`] implement them in memory.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod host;
pub mod idx;
pub mod mesh;
pub mod operator;
pub mod ops;
pub mod overlay;
pub mod projection;
pub mod selection;
pub mod session;
pub mod settings;
pub mod smoothing;
pub mod step;

pub use error::{DrawExtrudeError, Result};
pub use host::{HeadlessHost, ViewportHost};
pub use mesh::EditMesh;
pub use operator::{DrawExtrude, EditContext, OperatorStatus};
pub use ops::{MeshEditor, SelectMode};
pub use projection::Viewport;
pub use session::{EventKind, EventValue, InputEvent, ToolMode};
pub use settings::{ExtrudeSettings, StepMode};
pub use step::{ExtrudeStep, StepController, StepOutcome};
