use geometry::Geometry;
use hub::{Hub, HubPtr};
use mesh::Mesh;
use node::SubNode;
use object::Group;
use scene::Scene;

/// `Factory` is used to instantiate scenes and scene objects.
///
/// All objects spawned by one factory share a single node storage; handles
/// remain valid as long as they are kept in scope.
pub struct Factory {
    hub: HubPtr,
}

impl Factory {
    /// Create a new `Factory`.
    pub fn new() -> Self {
        Factory { hub: Hub::new() }
    }

    /// Create a new scene with an empty root group.
    pub fn scene(&mut self) -> Scene {
        let mut hub = self.hub.lock().unwrap();
        let base = hub.spawn(SubNode::Group);
        Scene {
            root: base.node,
            tx: hub.message_tx.clone(),
            hub: self.hub.clone(),
        }
    }

    /// Create a new [`Group`](struct.Group.html).
    pub fn group(&mut self) -> Group {
        Group::new(self.hub.lock().unwrap().spawn(SubNode::Group))
    }

    /// Create a new [`Mesh`](struct.Mesh.html) with the given geometry.
    pub fn mesh(
        &mut self,
        geometry: Geometry,
    ) -> Mesh {
        Mesh::new(self.hub.lock().unwrap().spawn(SubNode::Visual(geometry)))
    }
}
