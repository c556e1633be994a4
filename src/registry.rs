use std::{collections::BTreeMap, path::Path};

use thiserror::Error;

use crate::step::{ImageContextDataMakerStep, STEP_NAME, WorkflowStep};

pub type StepFactory = fn(&Path) -> Box<dyn WorkflowStep>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("No step named {0:?} is registered")]
    UnknownStep(String),

    #[error("A step named {0:?} is already registered")]
    DuplicateStep(String),
}

/// Steps a host can instantiate, by name.
#[derive(Default)]
pub struct StepRegistry {
    factories: BTreeMap<String, StepFactory>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every step this crate provides.
    pub fn with_builtin_steps() -> Self {
        let mut registry = Self::new();
        registry
            .factories
            .insert(STEP_NAME.to_string(), create_image_context_data_maker);
        registry
    }

    pub fn register(&mut self, name: &str, factory: StepFactory) -> Result<(), RegistryError> {
        if self.factories.contains_key(name) {
            return Err(RegistryError::DuplicateStep(name.to_string()));
        }
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    pub fn create(&self, name: &str, location: &Path) -> Result<Box<dyn WorkflowStep>, RegistryError> {
        self.factories
            .get(name)
            .map(|factory| factory(location))
            .ok_or_else(|| RegistryError::UnknownStep(name.to_string()))
    }

    /// Registered step names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

fn create_image_context_data_maker(location: &Path) -> Box<dyn WorkflowStep> {
    Box::new(ImageContextDataMakerStep::new(location))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_creates_the_image_context_step() {
        let registry = StepRegistry::with_builtin_steps();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec![STEP_NAME]);

        let step = registry.create(STEP_NAME, Path::new("/work")).unwrap();
        assert_eq!(step.name(), STEP_NAME);
        assert_eq!(step.category(), "Utility");
        assert_eq!(step.location(), Path::new("/work"));
        assert!(!step.is_configured());
    }

    #[test]
    fn unknown_names_are_errors() {
        let registry = StepRegistry::new();
        assert_eq!(
            registry.create("Missing", Path::new(".")).err(),
            Some(RegistryError::UnknownStep("Missing".to_string()))
        );
    }

    #[test]
    fn names_register_once() {
        let mut registry = StepRegistry::with_builtin_steps();
        let factory: StepFactory = create_image_context_data_maker;
        assert_eq!(
            registry.register(STEP_NAME, factory),
            Err(RegistryError::DuplicateStep(STEP_NAME.to_string()))
        );
        registry.register("Another", factory).unwrap();
        assert_eq!(registry.names().count(), 2);
    }
}
