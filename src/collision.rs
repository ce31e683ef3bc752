//! Bounding-sphere collision between two animated nodes.
//!
//! Each animated head owns one [`Collider`], refreshed in place every frame
//! from the node's current world matrix; nothing is allocated per frame and
//! stale spheres are never reused across frames. On overlap the [`Guard`]
//! rejects the frame's tentative head rotation outright and runs the owning
//! sequence's clock backward for a cooldown window, producing a flinch
//! rather than a freeze or interpenetration.
//!
//! [`Collider`]: struct.Collider.html
//! [`Guard`]: struct.Guard.html

use cgmath::{MetricSpace, Point3, Rad, Transform};

use animation::Sequence;
use node::NodePointer;
use scene::Scene;

/// World-space bounding sphere owned by an animated node.
#[derive(Clone, Debug)]
pub struct Collider {
    node: NodePointer,
    local_center: Point3<f32>,
    local_radius: f32,
    /// Current world-space center.
    pub center: Point3<f32>,
    /// Current world-space radius.
    pub radius: f32,
}

impl Collider {
    /// Derives the node's local bounding sphere from its mesh geometry.
    ///
    /// Returns `None` (logged) when the subtree carries no geometry, in
    /// which case collision checking for this node is simply disabled.
    pub fn of<P: AsRef<NodePointer>>(
        scene: &Scene,
        node: &P,
    ) -> Option<Self> {
        let bounds = {
            let mut hub = scene.hub.lock().unwrap();
            hub.process_messages();
            hub.local_bounds(node.as_ref())
        };
        match bounds {
            Some(b) => {
                let center = b.center();
                Some(Collider {
                    node: node.as_ref().clone(),
                    local_center: center,
                    local_radius: b.radius(),
                    center,
                    radius: b.radius(),
                })
            }
            None => {
                warn!("collider node has no geometry, collision disabled");
                None
            }
        }
    }

    /// Recomputes the world-space sphere from the node's current world
    /// matrix. World transforms must already be up to date for this frame.
    pub fn refresh(
        &mut self,
        scene: &Scene,
    ) {
        let hub = scene.hub.lock().unwrap();
        let world = hub.nodes[&self.node].world_transform;
        self.center = world.transform_point(self.local_center);
        self.radius = self.local_radius * world.scale;
    }

    /// Sphere-sphere intersection test.
    pub fn intersects(
        &self,
        other: &Collider,
    ) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance2(other.center) < reach * reach
    }
}

/// Rejects intersecting head motion and flinches the owning sequence back.
#[derive(Clone, Copy, Debug)]
pub struct Guard {
    /// How long the owning sequence's clock runs backward after a hit.
    pub cooldown: f32,
}

impl Guard {
    pub fn new(cooldown: f32) -> Self {
        Guard { cooldown }
    }

    /// Tests two freshly refreshed colliders. On overlap the tentative
    /// `yaw` is reverted to `previous` (the attempted motion is rejected
    /// whole, not partially applied) and `sequence` runs backward for the
    /// cooldown window. Returns whether a collision was resolved.
    pub fn check_and_resolve<T>(
        &self,
        a: &Collider,
        b: &Collider,
        yaw: &mut Rad<f32>,
        previous: Rad<f32>,
        sequence: &mut Sequence<T>,
    ) -> bool {
        if !a.intersects(b) {
            return false;
        }
        *yaw = previous;
        sequence.reverse_for(self.cooldown);
        true
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Rad;

    use animation::Sequence;
    use factory::Factory;
    use geometry::Geometry;
    use super::{Collider, Guard};

    fn collider_at(
        factory: &mut Factory,
        scene: &mut ::scene::Scene,
        x: f32,
        radius: f32,
    ) -> Collider {
        let mut mesh = factory.mesh(Geometry::sphere(radius, 8, 6));
        mesh.set_position([x, 0.0, 0.0]);
        scene.add(&mesh);
        scene.sync_graph();
        let mut collider = Collider::of(scene, &mesh).unwrap();
        collider.refresh(scene);
        collider
    }

    #[test]
    fn spheres_meet_and_part() {
        let mut factory = Factory::new();
        let mut scene = factory.scene();
        let near = collider_at(&mut factory, &mut scene, 0.0, 1.0);
        let touching = collider_at(&mut factory, &mut scene, 1.5, 1.0);
        let far = collider_at(&mut factory, &mut scene, 5.0, 1.0);
        assert!(near.intersects(&touching));
        assert!(!near.intersects(&far));
    }

    #[test]
    fn collision_reverts_the_tentative_yaw() {
        let mut factory = Factory::new();
        let mut scene = factory.scene();
        let a = collider_at(&mut factory, &mut scene, 0.0, 1.0);
        let b = collider_at(&mut factory, &mut scene, 1.0, 1.0);
        let mut sequence: Sequence<()> = Sequence::new(Vec::new());
        let mut yaw = Rad(0.7);
        let guard = Guard::new(0.4);
        let hit = guard.check_and_resolve(&a, &b, &mut yaw, Rad(0.2), &mut sequence);
        assert!(hit);
        assert_eq!(yaw, Rad(0.2));
        assert!(sequence.is_reversed());
    }

    #[test]
    fn miss_leaves_the_yaw_alone() {
        let mut factory = Factory::new();
        let mut scene = factory.scene();
        let a = collider_at(&mut factory, &mut scene, 0.0, 0.5);
        let b = collider_at(&mut factory, &mut scene, 9.0, 0.5);
        let mut sequence: Sequence<()> = Sequence::new(Vec::new());
        let mut yaw = Rad(0.7);
        let guard = Guard::new(0.4);
        assert!(!guard.check_and_resolve(&a, &b, &mut yaw, Rad(0.2), &mut sequence));
        assert_eq!(yaw, Rad(0.7));
        assert!(!sequence.is_reversed());
    }
}
