use geometry::Geometry;
use hub::Operation;
use object;

/// [`Geometry`](struct.Geometry.html) placed in the scene graph.
///
/// # Notes
///
/// * Meshes are kept alive by their handles; keep them in scope.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mesh {
    pub(crate) object: object::Base,
}
luxo_object!(Mesh::object);

impl Mesh {
    pub(crate) fn new(object: object::Base) -> Self {
        Mesh { object }
    }

    /// Replace the mesh geometry wholesale.
    ///
    /// The previous buffer is dropped on replacement, so regenerating a mesh
    /// every frame does not accumulate memory.
    pub fn set_geometry(
        &mut self,
        geometry: Geometry,
    ) {
        let msg = Operation::SetGeometry(geometry);
        let _ = self.object.tx.send((self.object.node.downgrade(), msg));
    }
}
