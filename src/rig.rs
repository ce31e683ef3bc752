//! Rig assembly.
//!
//! Externally authored assets arrive as a loose hierarchy of named nodes.
//! The assembler resolves a list of expected part names, hoists them to their
//! top-level ancestors, and regroups those under a synthetic [`Rig`] node
//! placed at the combined bounding center, without disturbing any part's
//! world transform.
//!
//! [`Rig`]: struct.Rig.html

use cgmath::Point3;

use factory::Factory;
use node::NodePointer;
use object::{Base, Group};
use scene::Scene;

quick_error! {
    #[derive(Debug)]
    /// Failure modes of rig assembly.
    pub enum Error {
        /// None of the expected part names resolved to a scene node.
        ///
        /// Non-fatal: the caller may retry once the asset load settles, or
        /// run without this rig.
        NoParts {
            description("no rig parts found")
            display("none of the expected rig parts were found in the scene")
        }
    }
}

/// A synthetic rigid body assembled from named asset parts.
///
/// Dereferences to the group node that owns the reparented parts; animate
/// the rig by transforming that group.
#[derive(Clone, Debug)]
pub struct Rig {
    pub(crate) group: Group,
    parts: Vec<(String, Base)>,
}

impl AsRef<NodePointer> for Rig {
    fn as_ref(&self) -> &NodePointer {
        self.group.as_ref()
    }
}

impl ::std::ops::Deref for Rig {
    type Target = Group;
    fn deref(&self) -> &Group {
        &self.group
    }
}

impl ::std::ops::DerefMut for Rig {
    fn deref_mut(&mut self) -> &mut Group {
        &mut self.group
    }
}

impl Rig {
    /// Typed handle to a named part resolved at assembly time.
    ///
    /// Parts are resolved once; per-frame code should hold on to the handle
    /// instead of re-querying the scene by name.
    pub fn part(
        &self,
        name: &str,
    ) -> Option<&Base> {
        self.parts
            .iter()
            .find(|&&(ref n, _)| n == name)
            .map(|&(_, ref base)| base)
    }

    /// Names of the parts that actually resolved.
    pub fn part_names(&self) -> Vec<&str> {
        self.parts.iter().map(|&(ref n, _)| n.as_str()).collect()
    }
}

/// Regroups the named parts of a loaded scene under a synthetic rig node.
///
/// Missing parts are tolerated and logged; only a fully unresolved part list
/// is an error. Calling `assemble` again with the same `rig_name` returns
/// the existing rig instead of re-assembling.
pub fn assemble(
    factory: &mut Factory,
    scene: &mut Scene,
    rig_name: &str,
    expected_parts: &[&str],
) -> Result<Rig, Error> {
    // settle pending loader operations before walking the graph
    scene.sync_graph();

    if let Some(found) = existing(scene, rig_name, expected_parts) {
        info!("rig {:?} already assembled", rig_name);
        return Ok(found);
    }

    let (parts, tops, center) = {
        let hub = scene.hub.lock().unwrap();

        let mut parts = Vec::new();
        for &name in expected_parts {
            match hub.find_by_name(&scene.root, name) {
                Some(node) => parts.push((name.to_string(), node)),
                None => info!("rig part {:?} is missing, skipping", name),
            }
        }

        // hoist each part to its top-level ancestor, deduplicated
        let mut tops: Vec<NodePointer> = Vec::new();
        for &(_, ref node) in &parts {
            let top = top_level(&hub, &scene.root, node);
            if !tops.contains(&top) {
                tops.push(top);
            }
        }

        if tops.is_empty() {
            warn!("rig {:?} not found: no parts resolved", rig_name);
            return Err(Error::NoParts);
        }

        let mut bounds = None;
        for top in &tops {
            hub.world_bounds(top, &mut bounds);
        }
        let center = match bounds {
            Some(b) => b.center(),
            // no geometry anywhere: fall back to averaged node positions
            None => average_position(&hub, &tops),
        };

        (parts, tops, center)
    };

    let mut group = factory.group();
    group.set_name(rig_name);
    group.set_position([center.x, center.y, center.z]);
    scene.add(&group);
    scene.sync_graph();

    {
        let mut hub = scene.hub.lock().unwrap();
        for top in &tops {
            hub.attach(top, group.as_ref());
        }
        hub.update_graph(&scene.root);
    }

    let tx = scene.tx.clone();
    let parts = parts
        .into_iter()
        .map(|(name, node)| {
            (
                name,
                Base {
                    node,
                    tx: tx.clone(),
                },
            )
        })
        .collect();

    Ok(Rig { group, parts })
}

/// Idempotency check: an already assembled rig is returned as is,
/// with its part registry re-resolved underneath it.
fn existing(
    scene: &Scene,
    rig_name: &str,
    expected_parts: &[&str],
) -> Option<Rig> {
    let hub = scene.hub.lock().unwrap();
    let node = hub.find_by_name(&scene.root, rig_name)?;
    let mut parts = Vec::new();
    for &name in expected_parts {
        if let Some(part) = hub.find_by_name(&node, name) {
            parts.push((
                name.to_string(),
                Base {
                    node: part,
                    tx: scene.tx.clone(),
                },
            ));
        }
    }
    Some(Rig {
        group: Group::new(Base {
            node,
            tx: scene.tx.clone(),
        }),
        parts,
    })
}

/// Climbs the ancestor chain until the parent is the scene root.
/// A parentless node is its own top level.
fn top_level(
    hub: &::hub::Hub,
    root: &NodePointer,
    node: &NodePointer,
) -> NodePointer {
    let mut top = node.clone();
    loop {
        match hub.parent_of(&top) {
            Some(ref parent) if parent == root => break,
            Some(parent) => top = parent,
            None => break,
        }
    }
    top
}

fn average_position(
    hub: &::hub::Hub,
    nodes: &[NodePointer],
) -> Point3<f32> {
    let mut sum = Point3::new(0.0, 0.0, 0.0);
    for node in nodes {
        let p = hub.world_position(node);
        sum.x += p.x;
        sum.y += p.y;
        sum.z += p.z;
    }
    let k = 1.0 / nodes.len() as f32;
    Point3::new(sum.x * k, sum.y * k, sum.z * k)
}
