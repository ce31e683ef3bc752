use std::hash::{Hash, Hasher};
use std::sync::mpsc;

use mint;

use hub::{Message, Operation};
use node::{NodeInfo, NodePointer};
use scene::Scene;

//Note: no local state should be here, only remote links
/// `Base` represents an entity that can be added to the scene.
///
/// There is usually no need to use `Base` directly, there are specific
/// wrapper types for each case (e.g. [`Group`](struct.Group.html),
/// [`Mesh`](struct.Mesh.html), ...).
#[derive(Clone, Debug)]
pub struct Base {
    pub(crate) node: NodePointer,
    pub(crate) tx: mpsc::Sender<Message>,
}

impl PartialEq for Base {
    fn eq(
        &self,
        other: &Base,
    ) -> bool {
        self.node == other.node
    }
}

impl Eq for Base {}

impl Hash for Base {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.node.hash(state);
    }
}

impl AsRef<NodePointer> for Base {
    fn as_ref(&self) -> &NodePointer {
        &self.node
    }
}

impl Base {
    fn send(
        &self,
        operation: Operation,
    ) {
        let _ = self.tx.send((self.node.downgrade(), operation));
    }

    /// Invisible objects are not rendered by cameras.
    pub fn set_visible(
        &mut self,
        visible: bool,
    ) {
        self.send(Operation::SetVisible(visible));
    }

    /// Set the node name, as a loader would from an authored asset.
    pub fn set_name<S: Into<String>>(
        &mut self,
        name: S,
    ) {
        self.send(Operation::SetName(name.into()));
    }

    /// Set both position, orientation and scale.
    pub fn set_transform<P, Q>(
        &mut self,
        pos: P,
        rot: Q,
        scale: f32,
    ) where
        P: Into<mint::Point3<f32>>,
        Q: Into<mint::Quaternion<f32>>,
    {
        self.send(Operation::SetTransform(
            Some(pos.into()),
            Some(rot.into()),
            Some(scale),
        ));
    }

    /// Set position.
    pub fn set_position<P>(
        &mut self,
        pos: P,
    ) where
        P: Into<mint::Point3<f32>>,
    {
        self.send(Operation::SetTransform(Some(pos.into()), None, None));
    }

    /// Set orientation.
    pub fn set_orientation<Q>(
        &mut self,
        rot: Q,
    ) where
        Q: Into<mint::Quaternion<f32>>,
    {
        self.send(Operation::SetTransform(None, Some(rot.into()), None));
    }

    /// Get actual information about itself from the `scene`.
    ///
    /// Pending operations are applied and world transforms recomputed, so
    /// the returned info is current as of this call.
    pub fn sync(
        &self,
        scene: &Scene,
    ) -> NodeInfo {
        let mut hub = scene.hub.lock().unwrap();
        hub.process_messages();
        hub.update_graph(&scene.root);
        let node = &hub.nodes[&self.node];
        NodeInfo {
            name: node.name.clone(),
            transform: node.transform.into(),
            world_transform: node.world_transform.into(),
            visible: node.visible,
            world_visible: node.world_visible,
        }
    }
}

/// Groups are used to combine several other objects or groups to work with
/// them as with a single entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Group {
    pub(crate) object: Base,
}
luxo_object!(Group::object);

impl Group {
    pub(crate) fn new(object: Base) -> Self {
        Group { object }
    }

    /// Add new [`Base`](struct.Base.html) to the group.
    pub fn add<P: AsRef<NodePointer>>(
        &mut self,
        child: &P,
    ) {
        let msg = Operation::SetParent(self.object.node.clone());
        let _ = self.object.tx.send((child.as_ref().downgrade(), msg));
    }
}
