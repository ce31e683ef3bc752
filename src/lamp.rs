//! The articulated-lamp driver.
//!
//! Resolves the named parts of a loaded lamp asset into rigs and typed
//! handles, then runs the scripted routine frame by frame: crouch, hop,
//! windup, ball flick, landing settle, plus the ball-tracking look-at and
//! the two-head collision flinch.
//!
//! Per frame the order is fixed: the sequence writes a tentative pose, the
//! pose is committed and validated by the collision guard, the projectile
//! integrates, and only then do cables regenerate, so they never read an
//! anchor that is about to move this frame.

use cgmath::{Point3, Quaternion, Rad, Rotation3, Vector3};

use animation::{self, Easing, Phase, Sequence};
use cable::{Cable, CableOptions};
use collision::{Collider, Guard};
use factory::Factory;
use geometry::Geometry;
use object::Base;
use projectile::Projectile;
use rig::{self, Rig};
use scene::Scene;

/// Part names authored into the lamp asset.
pub const BIG_HEAD: &str = "Big_Head";
pub const SMALL_HEAD: &str = "Small_Head";
pub const BULB: &str = "Bulb";
pub const SMALL_BULB: &str = "Bulbsml";
pub const BALL: &str = "Ballsml";
pub const FLOOR: &str = "Floor";
pub const BIG_BASE: &str = "Base_big";
pub const SMALL_BASE: &str = "Base_small";

/// Parts regrouped under the big lamp's rigid body.
pub const BIG_LAMP_PARTS: &[&str] = &[BIG_HEAD, BULB, "Cylinder001", "Cylinder002", BIG_BASE];
/// Parts regrouped under the small lamp's rigid body.
pub const SMALL_LAMP_PARTS: &[&str] =
    &[SMALL_HEAD, SMALL_BULB, "Cylinder003", "Cylinder004", SMALL_BASE];

// Routine tuning. The values are tuned by eye, like the asset they animate.
const CROUCH_TIME: f32 = 0.35;
const HOP_TIME: f32 = 0.6;
const LAND_TIME: f32 = 0.5;
const WINDUP_TIME: f32 = 0.4;
const FLICK_TIME: f32 = 0.25;
const SETTLE_TIME: f32 = 0.6;
const CROUCH_SQUASH: f32 = 0.82;
const HOP_HEIGHT: f32 = 2.4;
const HOP_DISTANCE: f32 = 3.0;
const WINDUP_PITCH: f32 = -0.5;
const FLICK_PITCH: f32 = 0.4;
/// Share of the flick at which the ball leaves the head.
const FLICK_RELEASE: f32 = 0.6;
const LAUNCH_SPEED: f32 = 6.0;
const LAUNCH_UPWARD: f32 = 3.2;
const BALL_RADIUS: f32 = 0.5;
const FLOOR_HEIGHT: f32 = 0.0;
/// Per-frame look-at blend; the head turns gradually, never snapping.
const LOOK_BLEND: f32 = 0.08;
const COLLISION_COOLDOWN: f32 = 0.4;
const SPIN_RATE: f32 = 0.8;

/// Pose written by the phase table, committed to the rig afterwards.
#[derive(Clone, Copy, Debug)]
pub struct LampPose {
    /// Rig root position.
    pub root: Point3<f32>,
    /// Rig root yaw.
    pub yaw: Rad<f32>,
    /// Head yaw relative to the rig.
    pub head_yaw: Rad<f32>,
    /// Head pitch relative to the rig.
    pub head_pitch: Rad<f32>,
    /// Uniform squash applied to the rig root.
    pub squash: f32,
    /// Set by the flick phase once the release point passes.
    pub launch: bool,
}

impl LampPose {
    fn rest(root: Point3<f32>) -> Self {
        LampPose {
            root,
            yaw: Rad(0.0),
            head_yaw: Rad(0.0),
            head_pitch: Rad(0.0),
            squash: 1.0,
            launch: false,
        }
    }
}

/// Input axes for manual nudges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Commands from the input boundary, decoupled from any window library.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Start the scripted routine (ignored while one is running).
    StartSequence,
    /// Nudge the bulb along an axis.
    Nudge(Axis, f32),
    /// Toggle the slow turntable spin of the whole rig.
    ToggleSpin,
}

/// Everything the frame loop needs to animate the lamp scene.
///
/// Handles that failed to resolve stay `None` and the dependent feature is
/// skipped each frame; nothing here panics on a missing part.
pub struct Lamp {
    rig: Rig,
    small_home: Option<Point3<f32>>,
    small_yaw: Rad<f32>,
    head: Option<Base>,
    small_head: Option<Base>,
    bulb: Option<Base>,
    bulb_rest: Point3<f32>,
    bulb_shift: Vector3<f32>,
    ball: Option<Base>,
    cable: Option<Cable>,
    projectile: Projectile,
    sequence: Sequence<LampPose>,
    pose: LampPose,
    head_collider: Option<Collider>,
    small_collider: Option<Collider>,
    guard: Guard,
    spinning: bool,
}

impl Lamp {
    /// Builds the driver from a loaded scene.
    ///
    /// Fails only when the big lamp cannot be assembled at all; every other
    /// missing part merely disables its feature, logged.
    pub fn from_scene(
        factory: &mut Factory,
        scene: &mut Scene,
    ) -> Result<Self, rig::Error> {
        let rig = rig::assemble(factory, scene, "Luxo", BIG_LAMP_PARTS)?;
        let small_rig = match rig::assemble(factory, scene, "Luxo_Jr", SMALL_LAMP_PARTS) {
            Ok(r) => Some(r),
            Err(e) => {
                info!("small lamp disabled: {}", e);
                None
            }
        };

        let head = rig.part(BIG_HEAD).cloned();
        let bulb = rig.part(BULB).cloned();
        let base = rig.part(BIG_BASE).cloned();
        let small_head = small_rig
            .as_ref()
            .and_then(|r| r.part(SMALL_HEAD))
            .cloned();

        let ball = scene.find(BALL);
        if ball.is_none() {
            warn!("{:?} not found, ball launch disabled", BALL);
        }

        let cable = Cable::between(
            factory,
            scene,
            base.as_ref(),
            head.as_ref(),
            CableOptions::default(),
        );

        let ball_rest = match ball {
            Some(ref b) => Point3::from(b.sync(scene).world_transform.position),
            None => Point3::new(0.0, BALL_RADIUS, 0.0),
        };
        let projectile = Projectile::new(ball_rest, BALL_RADIUS, FLOOR_HEIGHT);

        let head_collider = head.as_ref().and_then(|h| Collider::of(scene, h));
        let small_collider = small_head.as_ref().and_then(|h| Collider::of(scene, h));

        let bulb_rest = match bulb {
            Some(ref b) => Point3::from(b.sync(scene).transform.position),
            None => Point3::new(0.0, 0.0, 0.0),
        };

        let home = Point3::from(rig.sync(scene).world_transform.position);
        let small_home = small_rig
            .as_ref()
            .map(|r| Point3::from(r.sync(scene).world_transform.position));

        Ok(Lamp {
            rig,
            small_home,
            small_yaw: Rad(0.0),
            head,
            small_head,
            bulb,
            bulb_rest,
            bulb_shift: Vector3::new(0.0, 0.0, 0.0),
            ball,
            cable,
            projectile,
            sequence: routine(home),
            pose: LampPose::rest(home),
            head_collider,
            small_collider,
            guard: Guard::new(COLLISION_COOLDOWN),
            spinning: false,
        })
    }

    /// Event-to-state mutation for the input boundary.
    pub fn handle(
        &mut self,
        command: Command,
    ) {
        match command {
            Command::StartSequence => {
                let ready = self.ready();
                self.sequence.trigger(ready);
            }
            Command::Nudge(axis, amount) => {
                if self.bulb.is_none() {
                    return;
                }
                match axis {
                    Axis::X => self.bulb_shift.x += amount,
                    Axis::Y => self.bulb_shift.y += amount,
                    Axis::Z => self.bulb_shift.z += amount,
                }
            }
            Command::ToggleSpin => self.spinning = !self.spinning,
        }
    }

    /// Whether every handle the routine animates has resolved.
    pub fn ready(&self) -> bool {
        self.head.is_some() && self.ball.is_some()
    }

    /// Whether the scripted routine is active.
    pub fn is_running(&self) -> bool {
        self.sequence.is_running()
    }

    /// Current ball state, for callers that draw trajectories.
    pub fn projectile(&self) -> &Projectile {
        &self.projectile
    }

    /// One frame of `dt` seconds.
    pub fn step(
        &mut self,
        scene: &mut Scene,
        dt: f32,
    ) {
        let previous_yaw = self.pose.head_yaw;
        let ready = self.ready();
        self.sequence.update(dt, &mut self.pose, ready);

        // both heads track the ball while it flies
        if self.projectile.is_launched() {
            let target = animation::bearing(self.pose.root, self.projectile.position);
            self.pose.head_yaw = animation::smooth_yaw(self.pose.head_yaw, target, LOOK_BLEND);
            if let Some(home) = self.small_home {
                let target = animation::bearing(home, self.projectile.position);
                self.small_yaw = animation::smooth_yaw(self.small_yaw, target, LOOK_BLEND);
            }
        }

        if self.spinning {
            self.pose.yaw = Rad(self.pose.yaw.0 + SPIN_RATE * dt);
        }

        // commit the tentative pose, then validate the heads against each
        // other; a rejected rotation is re-committed before anything reads it
        self.commit(scene);
        let collided = match (self.head_collider.as_mut(), self.small_collider.as_mut()) {
            (Some(a), Some(b)) => {
                a.refresh(scene);
                b.refresh(scene);
                self.guard.check_and_resolve(
                    a,
                    b,
                    &mut self.pose.head_yaw,
                    previous_yaw,
                    &mut self.sequence,
                )
            }
            _ => false,
        };
        if collided {
            self.commit(scene);
        }

        // ball release requested by the flick phase
        if self.pose.launch {
            self.pose.launch = false;
            if !self.projectile.is_launched() && self.ball.is_some() {
                let origin = self.launch_origin(scene);
                let yaw = self.pose.yaw.0 + self.pose.head_yaw.0;
                let direction = Vector3::new(yaw.sin(), 0.0, yaw.cos());
                self.projectile
                    .launch(origin, direction, LAUNCH_SPEED, LAUNCH_UPWARD);
            }
        }
        self.projectile.integrate(dt);
        if let Some(ref mut ball) = self.ball {
            if self.projectile.is_launched() {
                ball.set_position(self.projectile.position);
                ball.set_orientation(self.projectile.orientation);
            }
        }

        // cables read anchors only after every transform write this frame
        if let Some(ref mut cable) = self.cable {
            cable.update(scene);
        }
    }

    fn launch_origin(
        &self,
        scene: &Scene,
    ) -> Point3<f32> {
        match self.head {
            Some(ref head) => Point3::from(head.sync(scene).world_transform.position),
            None => self.pose.root + Vector3::new(0.0, 2.0, 0.0),
        }
    }

    /// Writes the pose to the scene nodes and refreshes world transforms.
    fn commit(
        &mut self,
        scene: &mut Scene,
    ) {
        let pose = self.pose;
        self.rig.set_transform(
            pose.root,
            Quaternion::from_angle_y(pose.yaw),
            pose.squash,
        );
        if let Some(ref mut head) = self.head {
            let rot = Quaternion::from_angle_y(pose.head_yaw)
                * Quaternion::from_angle_x(pose.head_pitch);
            head.set_orientation(rot);
        }
        if let Some(ref mut head) = self.small_head {
            head.set_orientation(Quaternion::from_angle_y(self.small_yaw));
        }
        if let Some(ref mut bulb) = self.bulb {
            bulb.set_position(self.bulb_rest + self.bulb_shift);
        }
        scene.sync_graph();
    }
}

/// The scripted routine: crouch, hop forward, land, wind up, flick the
/// ball away, settle.
fn routine(home: Point3<f32>) -> Sequence<LampPose> {
    Sequence::new(vec![
        Phase {
            name: "crouch",
            duration: CROUCH_TIME,
            easing: Easing::CubicIn,
            update: Box::new(|pose: &mut LampPose, k| {
                pose.squash = 1.0 - (1.0 - CROUCH_SQUASH) * k;
            }),
        },
        Phase {
            name: "hop",
            duration: HOP_TIME,
            easing: Easing::Linear,
            update: Box::new(move |pose: &mut LampPose, k| {
                pose.root.z = home.z + HOP_DISTANCE * k;
                // parabolic arc, zero at both ends
                pose.root.y = home.y + HOP_HEIGHT * 4.0 * k * (1.0 - k);
                pose.squash = CROUCH_SQUASH + (1.0 - CROUCH_SQUASH) * k;
            }),
        },
        Phase {
            name: "land",
            duration: LAND_TIME,
            easing: Easing::BounceOut,
            update: Box::new(move |pose: &mut LampPose, k| {
                pose.root.y = home.y;
                pose.squash = CROUCH_SQUASH + (1.0 - CROUCH_SQUASH) * k;
            }),
        },
        Phase {
            name: "windup",
            duration: WINDUP_TIME,
            easing: Easing::CubicIn,
            update: Box::new(|pose: &mut LampPose, k| {
                pose.head_pitch = Rad(WINDUP_PITCH * k);
            }),
        },
        Phase {
            name: "flick",
            duration: FLICK_TIME,
            easing: Easing::CubicOut,
            update: Box::new(|pose: &mut LampPose, k| {
                pose.head_pitch = Rad(WINDUP_PITCH + (FLICK_PITCH - WINDUP_PITCH) * k);
                if k >= FLICK_RELEASE {
                    pose.launch = true;
                }
            }),
        },
        Phase {
            name: "settle",
            duration: SETTLE_TIME,
            easing: Easing::CubicInOut,
            update: Box::new(|pose: &mut LampPose, k| {
                pose.head_pitch = Rad(FLICK_PITCH * (1.0 - k));
                pose.squash = 1.0;
            }),
        },
    ])
}

/// Builds the stand-in lamp hierarchy the demos and tests load in place of
/// the authored asset. Node names and rough dimensions follow the original
/// glTF export; the renderer-facing details (materials, lights) are up to
/// the caller.
pub fn stand_in_scene(factory: &mut Factory) -> Scene {
    let mut scene = factory.scene();

    let mut floor = factory.mesh(Geometry::plane(40.0, 40.0));
    floor.set_name(FLOOR);
    floor.set_orientation(Quaternion::from_angle_x(Rad(-::std::f32::consts::FRAC_PI_2)));
    scene.add(&floor);

    build_lamp(
        factory,
        &mut scene,
        Point3::new(-3.0, 0.0, 0.0),
        1.0,
        &[BIG_BASE, "Cylinder001", "Cylinder002", BIG_HEAD, BULB],
    );
    build_lamp(
        factory,
        &mut scene,
        Point3::new(3.0, 0.0, 0.0),
        0.6,
        &[SMALL_BASE, "Cylinder003", "Cylinder004", SMALL_HEAD, SMALL_BULB],
    );

    let mut crate_prop = factory.mesh(Geometry::cuboid(1.2, 1.2, 1.2));
    crate_prop.set_name("Box001");
    crate_prop.set_position([0.0, 0.6, -3.0]);
    scene.add(&crate_prop);

    let mut ball = factory.mesh(Geometry::sphere(BALL_RADIUS, 12, 8));
    ball.set_name(BALL);
    ball.set_position([0.0, BALL_RADIUS, 4.0]);
    scene.add(&ball);

    scene.sync_graph();
    scene
}

/// One lamp: base, two arm segments, head with a bulb inside, nested the
/// way the export nests them.
fn build_lamp(
    factory: &mut Factory,
    scene: &mut Scene,
    position: Point3<f32>,
    size: f32,
    names: &[&str; 5],
) {
    let mut armature = factory.group();
    armature.set_position(position);
    scene.add(&armature);

    let mut base = factory.mesh(Geometry::cylinder(0.9 * size, 1.1 * size, 0.4 * size, 16));
    base.set_name(names[0]);
    base.set_position([0.0, 0.2 * size, 0.0]);
    armature.add(&base);

    let mut lower_arm = factory.mesh(Geometry::cylinder(0.12 * size, 0.12 * size, 2.0 * size, 8));
    lower_arm.set_name(names[1]);
    lower_arm.set_position([0.0, 1.2 * size, 0.0]);
    armature.add(&lower_arm);

    let mut upper_arm = factory.mesh(Geometry::cylinder(0.1 * size, 0.1 * size, 1.8 * size, 8));
    upper_arm.set_name(names[2]);
    upper_arm.set_position([0.0, 2.9 * size, 0.3 * size]);
    armature.add(&upper_arm);

    let mut neck = factory.group();
    neck.set_position([0.0, 3.8 * size, 0.6 * size]);
    armature.add(&neck);

    let mut head = factory.mesh(Geometry::sphere(0.7 * size, 12, 8));
    head.set_name(names[3]);
    neck.add(&head);

    let mut bulb = factory.mesh(Geometry::sphere(0.3 * size, 8, 6));
    bulb.set_name(names[4]);
    bulb.set_position([0.0, -0.2 * size, 0.4 * size]);
    neck.add(&bulb);

    // parent links must materialize while these handles still hold the nodes
    scene.sync_graph();
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;
    use super::{routine, LampPose, CROUCH_SQUASH, FLICK_RELEASE, HOP_DISTANCE};

    fn run_to_end(pose: &mut LampPose) {
        let mut seq = routine(pose.root);
        seq.trigger(true);
        for _ in 0..600 {
            seq.update(1.0 / 60.0, pose, true);
        }
        assert!(!seq.is_running());
    }

    #[test]
    fn routine_ends_back_on_the_ground() {
        let home = Point3::new(-3.0, 1.9, 0.0);
        let mut pose = LampPose::rest(home);
        run_to_end(&mut pose);
        assert!((pose.root.y - home.y).abs() < 1e-4);
        assert!((pose.root.z - home.z - HOP_DISTANCE).abs() < 1e-4);
        assert!((pose.squash - 1.0).abs() < 1e-4);
        assert!(pose.head_pitch.0.abs() < 1e-4);
    }

    #[test]
    fn crouch_squashes_and_hop_recovers() {
        let home = Point3::new(0.0, 2.0, 0.0);
        let mut pose = LampPose::rest(home);
        let mut seq = routine(home);
        seq.trigger(true);
        let mut lowest = 1.0f32;
        while seq.current_phase() == None || seq.current_phase() == Some("crouch") {
            seq.update(1.0 / 60.0, &mut pose, true);
            lowest = lowest.min(pose.squash);
            assert!(pose.squash >= CROUCH_SQUASH - 1e-4);
        }
        assert!((lowest - CROUCH_SQUASH).abs() < 1e-3);
    }

    #[test]
    fn flick_requests_the_launch_past_the_release_share() {
        let home = Point3::new(0.0, 2.0, 0.0);
        let mut pose = LampPose::rest(home);
        run_to_end(&mut pose);
        assert!(pose.launch, "the flick never set the launch flag");
        assert!(FLICK_RELEASE < 1.0);
    }
}
