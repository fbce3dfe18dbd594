use crate::error::{DrawExtrudeError, Result};

/// How the commit distance of a step is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StepMode {
    /// A fixed world-space distance.
    Absolute,
    /// A multiple of the initial selection's extent.
    Relative,
}

impl Default for StepMode {
    fn default() -> Self {
        StepMode::Relative
    }
}

/// Host-owned step settings, read fresh on every evaluated frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtrudeSettings {
    pub step_mode: StepMode,
    pub absolute_step: f64,
    pub relative_step: f64,
}

impl Default for ExtrudeSettings {
    fn default() -> Self {
        Self {
            step_mode: StepMode::Relative,
            absolute_step: 1.0,
            relative_step: 1.5,
        }
    }
}

impl ExtrudeSettings {
    pub fn absolute(step: f64) -> Self {
        Self {
            step_mode: StepMode::Absolute,
            absolute_step: step,
            ..Self::default()
        }
    }

    pub fn relative(multiplier: f64) -> Self {
        Self {
            step_mode: StepMode::Relative,
            relative_step: multiplier,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("absolute_step", self.absolute_step), ("relative_step", self.relative_step)] {
            if !value.is_finite() || value < 0.0 {
                return Err(DrawExtrudeError::InvalidSetting { name, value });
            }
        }
        Ok(())
    }

    /// Displacement a pointer has to cover before a step commits.
    pub fn threshold(&self, relative_scale: f64) -> f64 {
        match self.step_mode {
            StepMode::Relative => relative_scale * self.relative_step,
            StepMode::Absolute => self.absolute_step,
        }
    }
}
