use cgmath;
use froggy;
use mint;

use geometry::Geometry;

/// Pointer to a node of the scene graph.
pub type NodePointer = froggy::Pointer<NodeInternal>;
pub(crate) type TransformInternal = cgmath::Decomposed<cgmath::Vector3<f32>, cgmath::Quaternion<f32>>;

/// Content payload of a scene graph node.
#[derive(Debug)]
pub(crate) enum SubNode {
    /// No extra data.
    Empty,
    /// Can be a parent to other objects.
    Group,
    /// Carries renderable geometry.
    Visual(Geometry),
}

/// Fat node of the scene graph.
///
/// `NodeInternal` is used internally, client code holds
/// [`Base`](struct.Base.html) handles instead.
#[derive(Debug)]
pub struct NodeInternal {
    /// Human-authored name, if any. Names are not guaranteed unique.
    pub(crate) name: Option<String>,
    pub(crate) visible: bool,
    pub(crate) world_visible: bool,
    pub(crate) transform: TransformInternal,
    pub(crate) world_transform: TransformInternal,
    pub(crate) parent: Option<NodePointer>,
    pub(crate) children: Vec<NodePointer>,
    pub(crate) sub_node: SubNode,
}

/// Position, rotation and scale of a scene node.
#[derive(Clone, Debug)]
pub struct NodeTransform {
    /// Position.
    pub position: mint::Point3<f32>,
    /// Orientation.
    pub orientation: mint::Quaternion<f32>,
    /// Uniform scale.
    pub scale: f32,
}

impl From<TransformInternal> for NodeTransform {
    fn from(tf: TransformInternal) -> Self {
        let pos: mint::Vector3<f32> = tf.disp.into();
        NodeTransform {
            position: pos.into(),
            orientation: tf.rot.into(),
            scale: tf.scale,
        }
    }
}

/// General information about a scene node.
#[derive(Clone, Debug)]
pub struct NodeInfo {
    /// Name assigned to the node, if any.
    pub name: Option<String>,
    /// Transform relative to the parent.
    pub transform: NodeTransform,
    /// World transform (relative to the world's origin).
    pub world_transform: NodeTransform,
    /// Is the node visible?
    pub visible: bool,
    /// The same as `visible`, taking parents into account.
    pub world_visible: bool,
}

impl From<SubNode> for NodeInternal {
    fn from(sub: SubNode) -> Self {
        NodeInternal {
            name: None,
            visible: true,
            world_visible: false,
            transform: cgmath::One::one(),
            world_transform: cgmath::One::one(),
            parent: None,
            children: Vec::new(),
            sub_node: sub,
        }
    }
}
