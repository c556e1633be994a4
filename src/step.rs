//! The image context step as seen by a workflow host.
//!
//! A host drives a [`WorkflowStep`] through its lifecycle: it assigns an
//! identifier, lets the user configure the step, wires data into the `uses`
//! port, executes the step and hands the `provides` port output to the next
//! step. Everything runs synchronously on the caller's thread.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    config::{ConfigError, StepConfig},
    dialog::{ConfigureDialog, DialogDriver},
    enums::PortPredicate,
    image_context::{ImageContextData, ImageSequence},
    model::{ModelError, build_image_context},
};

pub const STEP_NAME: &str = "Image Context Data Maker";
pub const CATEGORY: &str = "Utility";

pub const IMAGE_CONTEXT_DATA_PORT: usize = 0;
pub const IMAGES_PORT: usize = 1;

const PORTS: [Port; 2] = [
    Port {
        predicate: PortPredicate::Provides,
        data_type: "http://physiomeproject.org/workflow/1.0/rdf-schema#image_context_data",
    },
    Port {
        predicate: PortPredicate::Uses,
        data_type: "http://physiomeproject.org/workflow/1.0/rdf-schema#images",
    },
];

#[derive(Debug, Error)]
pub enum StepError {
    #[error("Step {0:?} has not been configured")]
    NotConfigured(String),

    #[error("No images have been supplied to the step")]
    MissingImages,

    #[error("Port {0} does not exist")]
    UnknownPort(usize),

    #[error("Port {0} does not accept this kind of data")]
    UnexpectedPortData(usize),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port {
    pub predicate: PortPredicate,
    pub data_type: &'static str,
}

/// Data travelling along a port.
#[derive(Debug, Clone)]
pub enum PortData {
    Images(ImageSequence),
    ImageContextData(Arc<ImageContextData>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Unconfigured,
    Configured,
    Executed,
}

/// Services the workflow host provides to its steps.
pub trait StepHost {
    /// How many steps in the workflow currently use `identifier`.
    fn identifier_occurs_count(&self, identifier: &str) -> usize;

    fn execution_done(&mut self, identifier: &str);

    fn configured_changed(&mut self, identifier: &str, configured: bool);
}

pub trait WorkflowStep {
    fn name(&self) -> &str;

    fn category(&self) -> &str;

    /// Directory the step was created for.
    fn location(&self) -> &Path;

    fn ports(&self) -> &[Port];

    fn is_configured(&self) -> bool;

    /// Unique within a workflow; empty until assigned.
    fn identifier(&self) -> &str;

    fn set_identifier(&mut self, identifier: &str);

    fn configure(&mut self, host: &mut dyn StepHost, driver: &mut dyn DialogDriver);

    fn execute(&mut self, host: &mut dyn StepHost) -> Result<(), StepError>;

    fn set_port_data(&mut self, index: usize, data: PortData) -> Result<(), StepError>;

    fn port_data(&self, index: usize) -> Option<PortData>;

    fn serialize(&self) -> Result<String, StepError>;

    fn deserialize(&mut self, text: &str, host: &dyn StepHost) -> Result<(), StepError>;
}

/// Turns the images arriving on its `uses` port into an
/// [`ImageContextData`] on its `provides` port.
#[derive(Debug)]
pub struct ImageContextDataMakerStep {
    location: PathBuf,
    configured: bool,
    config: StepConfig,
    images: Option<ImageSequence>,
    image_context_data: Option<Arc<ImageContextData>>,
}

impl ImageContextDataMakerStep {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            configured: false,
            config: StepConfig::default(),
            images: None,
            image_context_data: None,
        }
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    pub fn state(&self) -> StepState {
        match (self.configured, &self.image_context_data) {
            (false, _) => StepState::Unconfigured,
            (true, None) => StepState::Configured,
            (true, Some(_)) => StepState::Executed,
        }
    }

    /// The most recent output, if the step has been executed.
    pub fn image_context_data(&self) -> Option<&Arc<ImageContextData>> {
        self.image_context_data.as_ref()
    }

    fn validate(&self, host: &dyn StepHost) -> bool {
        let count = |identifier: &str| host.identifier_occurs_count(identifier);
        let mut dialog = ConfigureDialog::new(&count);
        dialog.set_config(&self.config);
        dialog.validate()
    }
}

impl WorkflowStep for ImageContextDataMakerStep {
    fn name(&self) -> &str {
        STEP_NAME
    }

    fn category(&self) -> &str {
        CATEGORY
    }

    fn location(&self) -> &Path {
        &self.location
    }

    fn ports(&self) -> &[Port] {
        &PORTS
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn identifier(&self) -> &str {
        &self.config.identifier
    }

    fn set_identifier(&mut self, identifier: &str) {
        self.config.identifier = identifier.to_string();
    }

    fn configure(&mut self, host: &mut dyn StepHost, driver: &mut dyn DialogDriver) {
        let configured = {
            let host: &dyn StepHost = host;
            let count = |identifier: &str| host.identifier_occurs_count(identifier);
            let mut dialog = ConfigureDialog::new(&count);
            dialog.set_config(&self.config);
            dialog.validate();

            if driver.exec(&mut dialog) {
                self.config = dialog.config();
            }
            dialog.set_config(&self.config);
            dialog.validate()
        };

        self.configured = configured;
        debug!(identifier = %self.config.identifier, configured, "configured step");
        host.configured_changed(&self.config.identifier, configured);
    }

    fn execute(&mut self, host: &mut dyn StepHost) -> Result<(), StepError> {
        if !self.configured {
            return Err(StepError::NotConfigured(self.config.identifier.clone()));
        }
        let images = self.images.as_ref().ok_or(StepError::MissingImages)?;
        let frames_per_second = self.config.frames_per_second;

        let data = build_image_context(images.image_files(), frames_per_second)?;
        info!(
            identifier = %self.config.identifier,
            frames = data.frame_count(),
            width = data.image_dimensions()[0],
            height = data.image_dimensions()[1],
            "built image context"
        );
        self.image_context_data = Some(Arc::new(data));

        host.execution_done(&self.config.identifier);
        Ok(())
    }

    fn set_port_data(&mut self, index: usize, data: PortData) -> Result<(), StepError> {
        match (index, data) {
            (IMAGES_PORT, PortData::Images(images)) => {
                self.images = Some(images);
                Ok(())
            }
            (IMAGES_PORT | IMAGE_CONTEXT_DATA_PORT, _) => Err(StepError::UnexpectedPortData(index)),
            _ => Err(StepError::UnknownPort(index)),
        }
    }

    fn port_data(&self, index: usize) -> Option<PortData> {
        match index {
            IMAGE_CONTEXT_DATA_PORT => self
                .image_context_data
                .clone()
                .map(PortData::ImageContextData),
            _ => None,
        }
    }

    fn serialize(&self) -> Result<String, StepError> {
        Ok(self.config.to_json()?)
    }

    fn deserialize(&mut self, text: &str, host: &dyn StepHost) -> Result<(), StepError> {
        self.config.merge_json(text)?;
        self.configured = self.validate(host);
        Ok(())
    }
}
