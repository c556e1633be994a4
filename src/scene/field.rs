use std::collections::BTreeMap;

use super::{
    SceneError,
    mesh::{ElementId, Mesh2d, NodeId},
};
use crate::volume::ImageVolume;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(pub(crate) usize);

#[derive(Debug)]
pub enum FieldKind {
    Constant(Vec<f64>),
    /// Interpolated over mesh elements from per-node values.
    FiniteElement {
        components: usize,
        node_values: BTreeMap<NodeId, Vec<f64>>,
    },
    Multiply(FieldId, FieldId),
    Add(FieldId, FieldId),
    /// Single-component intensity sampled from a stack of frames.
    Image(Box<ImageVolume>),
}

#[derive(Debug)]
pub struct Field {
    name: String,
    managed: bool,
    components: usize,
    kind: FieldKind,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Managed fields are kept by the region even when nothing else
    /// refers to them.
    pub fn is_managed(&self) -> bool {
        self.managed
    }

    pub fn number_of_components(&self) -> usize {
        self.components
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn image_volume(&self) -> Option<&ImageVolume> {
        match &self.kind {
            FieldKind::Image(volume) => Some(volume),
            _ => None,
        }
    }
}

/// Location at which fields are evaluated or assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldCache {
    element: Option<ElementId>,
    xi: [f64; 2],
    frame_position: f64,
}

impl FieldCache {
    pub fn set_mesh_location(&mut self, element: ElementId, xi: [f64; 2]) {
        self.element = Some(element);
        self.xi = xi;
    }

    pub fn clear_location(&mut self) {
        self.element = None;
    }

    /// Position through an image stack, `0` for the first frame and `1`
    /// for the last.
    pub fn set_frame_position(&mut self, position: f64) {
        self.frame_position = position;
    }
}

#[derive(Debug, Default)]
pub struct FieldModule {
    fields: Vec<Field>,
    mesh: Mesh2d,
}

impl FieldModule {
    pub fn create_field_cache(&self) -> FieldCache {
        FieldCache::default()
    }

    pub fn mesh(&self) -> &Mesh2d {
        &self.mesh
    }

    pub(crate) fn mesh_mut(&mut self) -> &mut Mesh2d {
        &mut self.mesh
    }

    pub fn fields(&self) -> impl Iterator<Item = (FieldId, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .map(|(index, field)| (FieldId(index), field))
    }

    pub fn field(&self, id: FieldId) -> Result<&Field, SceneError> {
        self.fields.get(id.0).ok_or(SceneError::UnknownField(id))
    }

    fn field_mut(&mut self, id: FieldId) -> Result<&mut Field, SceneError> {
        self.fields.get_mut(id.0).ok_or(SceneError::UnknownField(id))
    }

    pub fn find_field_by_name(&self, name: &str) -> Option<FieldId> {
        self.fields().find(|(_, field)| field.name == name).map(|(id, _)| id)
    }

    pub fn create_field_constant(&mut self, values: &[f64]) -> FieldId {
        self.push(values.len(), FieldKind::Constant(values.to_vec()))
    }

    pub fn create_field_finite_element(&mut self, components: usize) -> FieldId {
        self.push(
            components,
            FieldKind::FiniteElement {
                components,
                node_values: BTreeMap::new(),
            },
        )
    }

    pub fn create_field_multiply(&mut self, a: FieldId, b: FieldId) -> Result<FieldId, SceneError> {
        let components = self.combined_components(a, b)?;
        Ok(self.push(components, FieldKind::Multiply(a, b)))
    }

    pub fn create_field_add(&mut self, a: FieldId, b: FieldId) -> Result<FieldId, SceneError> {
        let components = self.combined_components(a, b)?;
        Ok(self.push(components, FieldKind::Add(a, b)))
    }

    pub fn create_field_image(&mut self, volume: ImageVolume) -> FieldId {
        self.push(1, FieldKind::Image(Box::new(volume)))
    }

    pub fn set_name(&mut self, id: FieldId, name: &str) -> Result<(), SceneError> {
        if self.find_field_by_name(name).is_some_and(|existing| existing != id) {
            return Err(SceneError::DuplicateName(name.to_string()));
        }
        self.field_mut(id)?.name = name.to_string();
        Ok(())
    }

    pub fn set_managed(&mut self, id: FieldId, managed: bool) -> Result<(), SceneError> {
        self.field_mut(id)?.managed = managed;
        Ok(())
    }

    /// Overwrite the value of constant field `id`. Constants hold one value
    /// everywhere, so the cache location does not matter.
    pub fn assign_real(
        &mut self,
        _cache: &FieldCache,
        id: FieldId,
        values: &[f64],
    ) -> Result<(), SceneError> {
        let field = self.field_mut(id)?;
        if values.len() != field.components {
            return Err(SceneError::ComponentMismatch {
                expected: field.components,
                actual: values.len(),
            });
        }
        match &mut field.kind {
            FieldKind::Constant(current) => {
                current.copy_from_slice(values);
                Ok(())
            }
            _ => Err(SceneError::NotAssignable(field.name.clone())),
        }
    }

    pub(crate) fn assign_node_values(
        &mut self,
        id: FieldId,
        node: NodeId,
        values: &[f64],
    ) -> Result<(), SceneError> {
        let field = self.field_mut(id)?;
        match &mut field.kind {
            FieldKind::FiniteElement {
                components,
                node_values,
            } => {
                if values.len() != *components {
                    return Err(SceneError::ComponentMismatch {
                        expected: *components,
                        actual: values.len(),
                    });
                }
                node_values.insert(node, values.to_vec());
                Ok(())
            }
            _ => Err(SceneError::NotAssignable(field.name.clone())),
        }
    }

    pub fn evaluate_real(&self, cache: &FieldCache, id: FieldId) -> Result<Vec<f64>, SceneError> {
        let field = self.field(id)?;
        match &field.kind {
            FieldKind::Constant(values) => Ok(values.clone()),
            FieldKind::FiniteElement {
                components,
                node_values,
            } => {
                let element = cache
                    .element
                    .ok_or_else(|| SceneError::NoMeshLocation(field.name.clone()))?;
                let nodes = self
                    .mesh
                    .element_nodes(element)
                    .ok_or(SceneError::UnknownElement(element))?;
                let mut result = vec![0.0; *components];
                for (node, weight) in nodes.iter().zip(Mesh2d::basis(cache.xi)) {
                    let values = node_values
                        .get(node)
                        .ok_or_else(|| SceneError::NotDefined(field.name.clone()))?;
                    for (sum, value) in result.iter_mut().zip(values) {
                        *sum += weight * value;
                    }
                }
                Ok(result)
            }
            FieldKind::Multiply(a, b) => self.combine(cache, *a, *b, |x, y| x * y),
            FieldKind::Add(a, b) => self.combine(cache, *a, *b, |x, y| x + y),
            FieldKind::Image(volume) => volume
                .sample([cache.xi[0], cache.xi[1], cache.frame_position])
                .map(|value| vec![value])
                .ok_or_else(|| SceneError::NotDefined(field.name.clone())),
        }
    }

    fn combine(
        &self,
        cache: &FieldCache,
        a: FieldId,
        b: FieldId,
        op: impl Fn(f64, f64) -> f64,
    ) -> Result<Vec<f64>, SceneError> {
        let left = self.evaluate_real(cache, a)?;
        let right = self.evaluate_real(cache, b)?;
        let result = match (left.len(), right.len()) {
            (1, _) => right.iter().map(|&y| op(left[0], y)).collect(),
            (_, 1) => left.iter().map(|&x| op(x, right[0])).collect(),
            _ => left.iter().zip(&right).map(|(&x, &y)| op(x, y)).collect(),
        };
        Ok(result)
    }

    fn combined_components(&self, a: FieldId, b: FieldId) -> Result<usize, SceneError> {
        let left = self.field(a)?.components;
        let right = self.field(b)?.components;
        match (left, right) {
            (1, n) | (n, 1) => Ok(n),
            (l, r) if l == r => Ok(l),
            (l, r) => Err(SceneError::ComponentMismatch {
                expected: l,
                actual: r,
            }),
        }
    }

    fn push(&mut self, components: usize, kind: FieldKind) -> FieldId {
        let id = FieldId(self.fields.len());
        // Skip numbers a caller has already claimed with `set_name`.
        let name = (id.0 + 1..)
            .map(|number| format!("temp{number}"))
            .find(|name| self.find_field_by_name(name).is_none())
            .unwrap_or_default();
        self.fields.push(Field {
            name,
            managed: false,
            components,
            kind,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_fields_can_be_reassigned() {
        let mut module = FieldModule::default();
        let scale = module.create_field_constant(&[2.0, 3.0, 1.0]);
        let cache = module.create_field_cache();
        module.assign_real(&cache, scale, &[640.0, 480.0, 1.0]).unwrap();
        assert_eq!(module.evaluate_real(&cache, scale).unwrap(), vec![640.0, 480.0, 1.0]);
        assert_eq!(
            module.assign_real(&cache, scale, &[1.0]),
            Err(SceneError::ComponentMismatch {
                expected: 3,
                actual: 1
            })
        );
    }

    #[test]
    fn derived_fields_cannot_be_assigned() {
        let mut module = FieldModule::default();
        let a = module.create_field_constant(&[1.0, 2.0]);
        let b = module.create_field_constant(&[3.0, 4.0]);
        let sum = module.create_field_add(a, b).unwrap();
        let cache = module.create_field_cache();
        assert!(matches!(
            module.assign_real(&cache, sum, &[0.0, 0.0]),
            Err(SceneError::NotAssignable(_))
        ));
        assert_eq!(module.evaluate_real(&cache, sum).unwrap(), vec![4.0, 6.0]);
    }

    #[test]
    fn scalar_operands_broadcast() {
        let mut module = FieldModule::default();
        let scalar = module.create_field_constant(&[2.0]);
        let vector = module.create_field_constant(&[1.0, 2.0, 3.0]);
        let product = module.create_field_multiply(scalar, vector).unwrap();
        let cache = module.create_field_cache();
        assert_eq!(module.field(product).unwrap().number_of_components(), 3);
        assert_eq!(module.evaluate_real(&cache, product).unwrap(), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn mismatched_operands_are_rejected() {
        let mut module = FieldModule::default();
        let a = module.create_field_constant(&[1.0, 2.0]);
        let b = module.create_field_constant(&[1.0, 2.0, 3.0]);
        assert!(module.create_field_multiply(a, b).is_err());
    }

    #[test]
    fn names_are_unique() {
        let mut module = FieldModule::default();
        let a = module.create_field_constant(&[1.0]);
        let b = module.create_field_constant(&[2.0]);
        module.set_name(a, "scale").unwrap();
        module.set_name(a, "scale").unwrap();
        assert_eq!(
            module.set_name(b, "scale"),
            Err(SceneError::DuplicateName("scale".to_string()))
        );
        assert_eq!(module.find_field_by_name("scale"), Some(a));
        assert_eq!(module.find_field_by_name("duration"), None);
    }

    #[test]
    fn default_names_skip_names_already_taken() {
        let mut module = FieldModule::default();
        let a = module.create_field_constant(&[1.0]);
        assert_eq!(module.field(a).unwrap().name(), "temp1");
        module.set_name(a, "temp2").unwrap();

        let b = module.create_field_constant(&[2.0]);
        assert_eq!(module.field(b).unwrap().name(), "temp3");
        assert_eq!(module.find_field_by_name("temp2"), Some(a));
        assert_eq!(module.find_field_by_name("temp3"), Some(b));

        let c = module.create_field_constant(&[3.0]);
        assert_eq!(module.field(c).unwrap().name(), "temp4");
        let names: std::collections::BTreeSet<_> =
            module.fields().map(|(_, field)| field.name().to_string()).collect();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn finite_element_field_needs_a_location() {
        let mut module = FieldModule::default();
        let coordinates = module.create_field_finite_element(3);
        module.set_name(coordinates, "coordinates").unwrap();
        let cache = module.create_field_cache();
        assert_eq!(
            module.evaluate_real(&cache, coordinates),
            Err(SceneError::NoMeshLocation("coordinates".to_string()))
        );
    }

    #[test]
    fn new_fields_are_unmanaged() {
        let mut module = FieldModule::default();
        let field = module.create_field_constant(&[1.0]);
        assert!(!module.field(field).unwrap().is_managed());
        module.set_managed(field, true).unwrap();
        assert!(module.field(field).unwrap().is_managed());
        assert!(module.set_managed(FieldId(9), true).is_err());
    }
}
