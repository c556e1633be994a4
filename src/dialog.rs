//! Headless model of the step's configuration dialog.
//!
//! The dialog holds the editable copy of a [`StepConfig`] and validates it
//! against the identifiers already used in the workflow. Presenting it to a
//! user is the job of a [`DialogDriver`] supplied by the host.

use crate::{config::StepConfig, enums::IdentifierStatus};

/// Shows a dialog modally and reports whether the user confirmed it.
pub trait DialogDriver {
    fn exec(&mut self, dialog: &mut ConfigureDialog<'_>) -> bool;
}

pub struct ConfigureDialog<'a> {
    identifier: String,
    frames_per_second: f64,
    identifier_occurs_count: &'a dyn Fn(&str) -> usize,
    identifier_status: IdentifierStatus,
    frame_rate_valid: bool,
}

impl<'a> ConfigureDialog<'a> {
    pub fn new(identifier_occurs_count: &'a dyn Fn(&str) -> usize) -> Self {
        let defaults = StepConfig::default();
        Self {
            identifier: defaults.identifier,
            frames_per_second: defaults.frames_per_second,
            identifier_occurs_count,
            identifier_status: IdentifierStatus::default(),
            frame_rate_valid: true,
        }
    }

    pub fn set_config(&mut self, config: &StepConfig) {
        self.identifier = config.identifier.clone();
        self.frames_per_second = config.frames_per_second;
    }

    pub fn config(&self) -> StepConfig {
        StepConfig {
            frames_per_second: self.frames_per_second,
            identifier: self.identifier.clone(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = identifier.into();
    }

    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    pub fn set_frames_per_second(&mut self, frames_per_second: f64) {
        self.frames_per_second = frames_per_second;
    }

    /// Status from the most recent [`validate`](Self::validate), used to
    /// style the identifier field.
    pub fn identifier_status(&self) -> IdentifierStatus {
        self.identifier_status
    }

    pub fn frame_rate_valid(&self) -> bool {
        self.frame_rate_valid
    }

    /// The identifier must be non-empty and occur exactly once in the
    /// workflow (this step's own use), and the frame rate must be positive.
    pub fn validate(&mut self) -> bool {
        self.identifier_status = if self.identifier.is_empty() {
            IdentifierStatus::Empty
        } else if (self.identifier_occurs_count)(&self.identifier) == 1 {
            IdentifierStatus::Unique
        } else {
            IdentifierStatus::Duplicate
        };
        self.frame_rate_valid = self.frames_per_second.is_finite() && self.frames_per_second > 0.0;

        self.identifier_status.is_valid() && self.frame_rate_valid
    }
}
