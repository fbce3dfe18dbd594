use derive_more::Display;

#[derive(Clone, Debug, PartialEq, Display)]
pub enum DrawExtrudeError {
    #[display(fmt = "No Selection!!!")]
    NoSelection,
    #[display(fmt = "View3D not found, cannot run operator")]
    NoViewportContext,
    /// The pointer ray runs parallel to the extrusion plane. Never reported;
    /// the frame is dropped.
    #[display(fmt = "pointer ray is parallel to the extrusion plane")]
    DegenerateProjection,
    #[display(fmt = "a draw-extrude session is already running")]
    SessionActive,
    #[display(fmt = "invalid value for {}: {}", name, value)]
    InvalidSetting { name: &'static str, value: f64 },
}

impl std::error::Error for DrawExtrudeError {}

pub type Result<T> = std::result::Result<T, DrawExtrudeError>;
