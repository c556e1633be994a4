//! A small scene graph: a [`Context`] owns a tree of [`Region`]s, each with
//! its own fields, 2D mesh and materials.
//!
//! Fields live in an arena inside their region's [`FieldModule`] and refer to
//! each other by [`FieldId`], so derived fields (products, sums) stay valid
//! for as long as the region does.

mod field;
mod helpers;
mod material;
mod mesh;

pub use field::{Field, FieldCache, FieldId, FieldKind, FieldModule};
pub use helpers::{
    create_finite_element_field, create_material_using_image_field,
    create_square_2d_finite_element, create_volume_image_field,
};
pub use material::{Material, MaterialId, MaterialModule};
pub use mesh::{ElementId, Mesh2d, NodeId};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("Region {0:?} already has a child with that name")]
    DuplicateRegion(String),

    #[error("Name {0:?} is already in use")]
    DuplicateName(String),

    #[error("Unknown field {0:?}")]
    UnknownField(FieldId),

    #[error("Field {0:?} cannot be assigned values")]
    NotAssignable(String),

    #[error("Expected {expected} components, got {actual}")]
    ComponentMismatch { expected: usize, actual: usize },

    #[error("Field {0:?} needs a mesh location to be evaluated")]
    NoMeshLocation(String),

    #[error("Field {0:?} is not defined at this location")]
    NotDefined(String),

    #[error("Field {0:?} is not an image field")]
    NotAnImageField(String),

    #[error("Unknown element {0:?}")]
    UnknownElement(ElementId),

    #[error("Unknown material {0:?}")]
    UnknownMaterial(MaterialId),
}

/// Top-level owner of a region tree.
#[derive(Debug)]
pub struct Context {
    name: String,
    default_region: Region,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_region: Region::new(""),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_region(&self) -> &Region {
        &self.default_region
    }

    pub fn default_region_mut(&mut self) -> &mut Region {
        &mut self.default_region
    }
}

#[derive(Debug, Default)]
pub struct Region {
    name: String,
    children: Vec<Region>,
    field_module: FieldModule,
    material_module: MaterialModule,
}

impl Region {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn create_child(&mut self, name: &str) -> Result<&mut Region, SceneError> {
        if self.find_child(name).is_some() {
            return Err(SceneError::DuplicateRegion(name.to_string()));
        }
        self.children.push(Region::new(name));
        let index = self.children.len() - 1;
        Ok(&mut self.children[index])
    }

    pub fn find_child(&self, name: &str) -> Option<&Region> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn find_child_mut(&mut self, name: &str) -> Option<&mut Region> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    pub fn children(&self) -> &[Region] {
        &self.children
    }

    pub fn field_module(&self) -> &FieldModule {
        &self.field_module
    }

    pub fn field_module_mut(&mut self) -> &mut FieldModule {
        &mut self.field_module
    }

    pub fn material_module(&self) -> &MaterialModule {
        &self.material_module
    }

    /// Both modules at once, for building materials from this region's fields.
    pub fn modules_mut(&mut self) -> (&mut FieldModule, &mut MaterialModule) {
        (&mut self.field_module, &mut self.material_module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_regions_are_unique_by_name() {
        let mut context = Context::new("images");
        assert_eq!(context.name(), "images");
        let root = context.default_region_mut();
        root.create_child("images").unwrap();
        assert_eq!(
            root.create_child("images").unwrap_err(),
            SceneError::DuplicateRegion("images".to_string())
        );
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.find_child("images").unwrap().name(), "images");
        assert!(root.find_child("other").is_none());
    }
}
