use std::sync::mpsc;

use hub::{HubPtr, Message, Operation};
use node::NodePointer;
use object::Base;

/// The scene keeps the loaded object hierarchy and can be walked by name.
pub struct Scene {
    pub(crate) root: NodePointer,
    pub(crate) tx: mpsc::Sender<Message>,
    pub(crate) hub: HubPtr,
}

impl Scene {
    /// Add new [`Base`](struct.Base.html) to the scene.
    pub fn add<P: AsRef<NodePointer>>(
        &mut self,
        child: &P,
    ) {
        let msg = Operation::SetParent(self.root.clone());
        let _ = self.tx.send((child.as_ref().downgrade(), msg));
    }

    /// Look up a node by its authored name, depth first.
    ///
    /// Names come from the external asset and are neither validated nor
    /// unique; the first match wins. `None` simply means the feature relying
    /// on this node should be skipped.
    pub fn find(
        &self,
        name: &str,
    ) -> Option<Base> {
        let mut hub = self.hub.lock().unwrap();
        hub.process_messages();
        hub.find_by_name(&self.root, name).map(|node| Base {
            node,
            tx: self.tx.clone(),
        })
    }

    /// Apply pending operations and recompute world transforms.
    pub(crate) fn sync_graph(&self) {
        let mut hub = self.hub.lock().unwrap();
        hub.process_messages();
        hub.update_graph(&self.root);
    }
}
