use std::mem;
use std::sync::{mpsc, Arc, Mutex};

use cgmath::{One, Point3, Transform};
use froggy;
use mint;

use geometry::Geometry;
use node::{NodeInternal, NodePointer, SubNode, TransformInternal};
use object::Base;

pub(crate) type Message = (froggy::WeakPointer<NodeInternal>, Operation);

#[derive(Debug)]
pub(crate) enum Operation {
    SetParent(NodePointer),
    SetName(String),
    SetVisible(bool),
    SetTransform(
        Option<mint::Point3<f32>>,
        Option<mint::Quaternion<f32>>,
        Option<f32>,
    ),
    SetGeometry(Geometry),
}

pub(crate) type HubPtr = Arc<Mutex<Hub>>;

/// Owner of all scene graph nodes. Client handles talk to it over a message
/// channel; assembly-time code locks it and queries synchronously.
pub(crate) struct Hub {
    pub(crate) nodes: froggy::Storage<NodeInternal>,
    pub(crate) message_tx: mpsc::Sender<Message>,
    message_rx: mpsc::Receiver<Message>,
}

/// World-space axis-aligned box accumulated over a subtree.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    fn expand(
        bounds: &mut Option<Bounds>,
        p: Point3<f32>,
    ) {
        match *bounds {
            Some(ref mut b) => {
                b.min.x = b.min.x.min(p.x);
                b.min.y = b.min.y.min(p.y);
                b.min.z = b.min.z.min(p.z);
                b.max.x = b.max.x.max(p.x);
                b.max.y = b.max.y.max(p.y);
                b.max.z = b.max.z.max(p.z);
            }
            None => *bounds = Some(Bounds { min: p, max: p }),
        }
    }

    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Radius of the sphere enclosing the box around its center.
    pub fn radius(&self) -> f32 {
        let dx = self.max.x - self.min.x;
        let dy = self.max.y - self.min.y;
        let dz = self.max.z - self.min.z;
        0.5 * (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Hub {
    pub(crate) fn new() -> HubPtr {
        let (tx, rx) = mpsc::channel();
        let hub = Hub {
            nodes: froggy::Storage::new(),
            message_tx: tx,
            message_rx: rx,
        };
        Arc::new(Mutex::new(hub))
    }

    pub(crate) fn spawn(
        &mut self,
        sub: SubNode,
    ) -> Base {
        Base {
            node: self.nodes.create(sub.into()),
            tx: self.message_tx.clone(),
        }
    }

    pub(crate) fn process_messages(&mut self) {
        while let Ok((weak_ptr, operation)) = self.message_rx.try_recv() {
            let ptr = match weak_ptr.upgrade() {
                Ok(ptr) => ptr,
                Err(_) => continue,
            };
            match operation {
                Operation::SetParent(parent) => {
                    self.reparent(&ptr, &parent);
                }
                Operation::SetName(name) => {
                    self.nodes[&ptr].name = Some(name);
                }
                Operation::SetVisible(visible) => {
                    self.nodes[&ptr].visible = visible;
                }
                Operation::SetTransform(pos, rot, scale) => {
                    let transform = &mut self.nodes[&ptr].transform;
                    if let Some(pos) = pos {
                        transform.disp = mint::Vector3::from(pos).into();
                    }
                    if let Some(rot) = rot {
                        transform.rot = rot.into();
                    }
                    if let Some(scale) = scale {
                        transform.scale = scale;
                    }
                }
                Operation::SetGeometry(geometry) => {
                    if let SubNode::Visual(ref mut data) = self.nodes[&ptr].sub_node {
                        // the replaced buffer is dropped here
                        *data = geometry;
                    }
                }
            }
        }

        self.nodes.sync_pending();
    }

    /// Moves `child` under `parent`, keeping its local transform as is.
    /// The old parent, if any, is unlinked first: a node has at most one
    /// parent at any time.
    pub(crate) fn reparent(
        &mut self,
        child: &NodePointer,
        parent: &NodePointer,
    ) {
        self.unlink(child);
        self.nodes[child].parent = Some(parent.clone());
        self.nodes[parent].children.push(child.clone());
    }

    fn unlink(
        &mut self,
        child: &NodePointer,
    ) {
        let old_parent = self.nodes[child].parent.take();
        if let Some(ref parent) = old_parent {
            self.nodes[parent].children.retain(|c| c != child);
        }
    }

    /// Moves `child` under `parent` so that its world transform stays
    /// numerically unchanged: the new local transform composes the previous
    /// world transform with the parent's inverse world transform.
    ///
    /// World transforms must be up to date (see `update_graph`). Returns
    /// `false` if the parent's world transform is not invertible.
    pub(crate) fn attach(
        &mut self,
        child: &NodePointer,
        parent: &NodePointer,
    ) -> bool {
        let child_world = self.nodes[child].world_transform;
        let parent_world = self.nodes[parent].world_transform;
        let inverse = match parent_world.inverse_transform() {
            Some(t) => t,
            None => {
                warn!("attach: degenerate parent transform, keeping the old parent");
                return false;
            }
        };
        self.nodes[child].transform = inverse.concat(&child_world);
        self.reparent(child, parent);
        true
    }

    /// Recomputes world transforms and visibility for the subtree under
    /// `root`, top-down. Unlike a storage-order walk, this is correct even
    /// after nodes are reparented under a later-created group.
    pub(crate) fn update_graph(
        &mut self,
        root: &NodePointer,
    ) {
        let base: TransformInternal = One::one();
        self.update_subtree(root, &base, true);
    }

    fn update_subtree(
        &mut self,
        ptr: &NodePointer,
        parent_world: &TransformInternal,
        parent_visible: bool,
    ) {
        let (world, visible) = {
            let node = &mut self.nodes[ptr];
            node.world_transform = parent_world.concat(&node.transform);
            node.world_visible = parent_visible && node.visible;
            (node.world_transform, node.world_visible)
        };
        // take the list instead of cloning it; nothing reparents mid-walk
        let children = mem::replace(&mut self.nodes[ptr].children, Vec::new());
        for child in &children {
            self.update_subtree(child, &world, visible);
        }
        self.nodes[ptr].children = children;
    }

    /// Depth-first lookup of a node by its authored name.
    pub(crate) fn find_by_name(
        &self,
        root: &NodePointer,
        name: &str,
    ) -> Option<NodePointer> {
        if self.nodes[root].name.as_ref().map_or(false, |n| n == name) {
            return Some(root.clone());
        }
        for child in &self.nodes[root].children {
            if let Some(found) = self.find_by_name(child, name) {
                return Some(found);
            }
        }
        None
    }

    pub(crate) fn parent_of(
        &self,
        ptr: &NodePointer,
    ) -> Option<NodePointer> {
        self.nodes[ptr].parent.clone()
    }

    pub(crate) fn world_position(
        &self,
        ptr: &NodePointer,
    ) -> Point3<f32> {
        let d = self.nodes[ptr].world_transform.disp;
        Point3::new(d.x, d.y, d.z)
    }

    /// Accumulates the world-space bounds of all geometry in the subtree.
    /// World transforms must be up to date.
    pub(crate) fn world_bounds(
        &self,
        ptr: &NodePointer,
        bounds: &mut Option<Bounds>,
    ) {
        let node = &self.nodes[ptr];
        if let SubNode::Visual(ref geometry) = node.sub_node {
            for v in &geometry.base_shape.vertices {
                let p = node.world_transform
                    .transform_point(Point3::new(v.x, v.y, v.z));
                Bounds::expand(bounds, p);
            }
        }
        for child in &node.children {
            self.world_bounds(child, bounds);
        }
    }

    /// Bounds of the subtree's geometry expressed in `ptr`'s local frame.
    /// `None` when the subtree carries no geometry at all.
    pub(crate) fn local_bounds(
        &self,
        ptr: &NodePointer,
    ) -> Option<Bounds> {
        let mut bounds = None;
        let identity: TransformInternal = One::one();
        self.accumulate_local(ptr, &identity, &mut bounds);
        bounds
    }

    fn accumulate_local(
        &self,
        ptr: &NodePointer,
        relative: &TransformInternal,
        bounds: &mut Option<Bounds>,
    ) {
        let node = &self.nodes[ptr];
        if let SubNode::Visual(ref geometry) = node.sub_node {
            for v in &geometry.base_shape.vertices {
                let p = relative.transform_point(Point3::new(v.x, v.y, v.z));
                Bounds::expand(bounds, p);
            }
        }
        for child in &node.children {
            let t = relative.concat(&self.nodes[child].transform);
            self.accumulate_local(child, &t, bounds);
        }
    }
}
