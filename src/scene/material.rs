use super::{SceneError, field::FieldId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(pub(crate) usize);

/// A renderable surface property textured by an image field.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    name: String,
    managed: bool,
    image_field: FieldId,
}

impl Material {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_managed(&self) -> bool {
        self.managed
    }

    pub fn image_field(&self) -> FieldId {
        self.image_field
    }
}

#[derive(Debug, Default)]
pub struct MaterialModule {
    materials: Vec<Material>,
}

impl MaterialModule {
    /// Callers are responsible for `image_field` naming an image field of
    /// the same region.
    pub(crate) fn create_material(&mut self, image_field: FieldId) -> MaterialId {
        let id = MaterialId(self.materials.len());
        let name = (id.0 + 1..)
            .map(|number| format!("material{number}"))
            .find(|name| self.find_material_by_name(name).is_none())
            .unwrap_or_default();
        self.materials.push(Material {
            name,
            managed: false,
            image_field,
        });
        id
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    fn material_mut(&mut self, id: MaterialId) -> Result<&mut Material, SceneError> {
        self.materials.get_mut(id.0).ok_or(SceneError::UnknownMaterial(id))
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn find_material_by_name(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|material| material.name == name)
    }

    pub fn set_name(&mut self, id: MaterialId, name: &str) -> Result<(), SceneError> {
        let taken = self
            .materials
            .iter()
            .enumerate()
            .any(|(index, material)| index != id.0 && material.name == name);
        if taken {
            return Err(SceneError::DuplicateName(name.to_string()));
        }
        self.material_mut(id)?.name = name.to_string();
        Ok(())
    }

    pub fn set_managed(&mut self, id: MaterialId, managed: bool) -> Result<(), SceneError> {
        self.material_mut(id)?.managed = managed;
        Ok(())
    }
}
