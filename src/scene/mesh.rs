#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub(crate) usize);

/// Nodes and bilinear square elements.
///
/// Element nodes are ordered `(0,0), (1,0), (0,1), (1,1)` in element
/// coordinates, so node 0 sits at `xi = [0, 0]` and node 3 at `xi = [1, 1]`.
#[derive(Debug, Default)]
pub struct Mesh2d {
    node_count: usize,
    elements: Vec<[NodeId; 4]>,
}

impl Mesh2d {
    pub fn create_node(&mut self) -> NodeId {
        self.node_count += 1;
        NodeId(self.node_count - 1)
    }

    pub fn create_element(&mut self, nodes: [NodeId; 4]) -> ElementId {
        self.elements.push(nodes);
        ElementId(self.elements.len() - 1)
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn element_nodes(&self, element: ElementId) -> Option<&[NodeId; 4]> {
        self.elements.get(element.0)
    }

    /// Weight of each element node at `xi`.
    pub fn basis(xi: [f64; 2]) -> [f64; 4] {
        let [x, y] = xi;
        [
            (1.0 - x) * (1.0 - y),
            x * (1.0 - y),
            (1.0 - x) * y,
            x * y,
        ]
    }
}
