//! Ballistic motion for the detached ball.
//!
//! Euler integration with attenuated gravity, ground bounces, rolling
//! friction, and a visual rolling rotation. The ball settles exactly once:
//! when its horizontal speed decays below a threshold at rest height, the
//! velocity is zeroed and the launched flag cleared.

use cgmath::{InnerSpace, One, Point3, Quaternion, Rad, Rotation3, Vector3};

/// Full-scale gravity, metres per second squared.
const GRAVITY: f32 = 9.81;
/// Gravity attenuation; full-scale gravity reads too fast at scene scale.
const GRAVITY_DAMPING: f32 = 0.35;
/// Energy kept by a bounce.
const RESTITUTION: f32 = 0.55;
/// Horizontal velocity decay per second.
const FRICTION: f32 = 0.8;
/// Rebound speeds below this are swallowed, ending the micro-bounces.
const MIN_BOUNCE: f32 = 0.1;
/// Horizontal speed under which the ball counts as settled.
const SETTLE_SPEED: f32 = 0.05;
/// Tolerance around the resting height for settling.
const SETTLE_HEIGHT: f32 = 0.05;

/// State of a launched ball.
#[derive(Clone, Debug)]
pub struct Projectile {
    /// Current world position.
    pub position: Point3<f32>,
    /// Current velocity.
    pub velocity: Vector3<f32>,
    /// Accumulated rolling rotation.
    pub orientation: Quaternion<f32>,
    /// Ball radius.
    pub radius: f32,
    floor: f32,
    rest_height: f32,
    launched: bool,
}

impl Projectile {
    /// Creates a resting projectile. The creation height is remembered as
    /// the resting height used by the settling rule.
    pub fn new(
        position: Point3<f32>,
        radius: f32,
        floor: f32,
    ) -> Self {
        Projectile {
            position,
            velocity: Vector3::new(0.0, 0.0, 0.0),
            orientation: Quaternion::one(),
            radius,
            floor,
            rest_height: position.y,
            launched: false,
        }
    }

    /// Whether the ball is currently in flight or rolling.
    pub fn is_launched(&self) -> bool {
        self.launched
    }

    /// Tosses the ball from `position`: horizontal velocity comes from
    /// `direction * speed`, the vertical component is replaced by `upward`
    /// regardless of the direction's pitch.
    pub fn launch(
        &mut self,
        position: Point3<f32>,
        direction: Vector3<f32>,
        speed: f32,
        upward: f32,
    ) {
        self.position = position;
        self.velocity = direction * speed;
        self.velocity.y = upward;
        self.launched = true;
    }

    /// One Euler step of `dt` seconds. No-op while not launched.
    pub fn integrate(
        &mut self,
        dt: f32,
    ) {
        if !self.launched || dt <= 0.0 {
            return;
        }

        let before = self.position;
        self.position += self.velocity * dt;
        self.velocity.y -= GRAVITY * GRAVITY_DAMPING * dt;

        // ground contact: clamp and rebound with energy loss
        if self.position.y - self.radius < self.floor {
            self.position.y = self.floor + self.radius;
            let rebound = -self.velocity.y * RESTITUTION;
            self.velocity.y = if rebound > MIN_BOUNCE { rebound } else { 0.0 };
        }

        // friction, clamped so a large dt cannot reverse the motion
        let decay = (1.0 - FRICTION * dt).max(0.0);
        self.velocity.x *= decay;
        self.velocity.z *= decay;

        self.roll(before);

        let horizontal_speed = (self.velocity.x * self.velocity.x
            + self.velocity.z * self.velocity.z)
            .sqrt();
        if horizontal_speed < SETTLE_SPEED
            && (self.position.y - self.rest_height).abs() < SETTLE_HEIGHT
        {
            self.velocity = Vector3::new(0.0, 0.0, 0.0);
            self.launched = false;
        }
    }

    /// Rolling-without-slipping approximation: rotate about `up x direction`
    /// by `distance / radius`. Skipped outright for degenerate axes or
    /// non-finite angles.
    fn roll(
        &mut self,
        before: Point3<f32>,
    ) {
        let travel = Vector3::new(
            self.position.x - before.x,
            0.0,
            self.position.z - before.z,
        );
        let distance = travel.magnitude();
        if distance <= 0.0 {
            return;
        }
        let axis = Vector3::unit_y().cross(travel / distance);
        let angle = distance / self.radius;
        if axis.magnitude2() < 1e-12 || !angle.is_finite() {
            return;
        }
        self.orientation =
            Quaternion::from_axis_angle(axis.normalize(), Rad(angle)) * self.orientation;
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Point3, Vector3};
    use super::*;

    fn launched_ball() -> Projectile {
        let mut ball = Projectile::new(Point3::new(0.0, 0.5, 0.0), 0.5, 0.0);
        ball.launch(
            Point3::new(0.0, 1.5, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            5.0,
            3.0,
        );
        ball
    }

    #[test]
    fn launch_overrides_the_vertical_component() {
        let mut ball = Projectile::new(Point3::new(0.0, 0.5, 0.0), 0.5, 0.0);
        ball.launch(
            Point3::new(0.0, 0.5, 0.0),
            Vector3::new(0.6, -9.0, 0.8),
            5.0,
            3.0,
        );
        assert_eq!(ball.velocity.y, 3.0);
        assert!((ball.velocity.x - 3.0).abs() < 1e-5);
        assert!((ball.velocity.z - 4.0).abs() < 1e-5);
    }

    #[test]
    fn never_sinks_below_the_floor() {
        let mut ball = launched_ball();
        for _ in 0..2000 {
            ball.integrate(1.0 / 60.0);
            assert!(ball.position.y >= 0.5 - 1e-4);
        }
    }

    #[test]
    fn settles_in_bounded_steps() {
        let mut ball = launched_ball();
        let mut steps = 0;
        while ball.is_launched() && steps < 5000 {
            ball.integrate(1.0 / 60.0);
            steps += 1;
        }
        assert!(!ball.is_launched(), "ball never settled");
        assert_eq!(ball.velocity, Vector3::new(0.0, 0.0, 0.0));
        let h = (ball.velocity.x * ball.velocity.x + ball.velocity.z * ball.velocity.z).sqrt();
        assert!(h < 0.05);
    }

    #[test]
    fn huge_dt_does_not_reverse_motion() {
        let mut ball = launched_ball();
        ball.integrate(10.0);
        assert!(ball.velocity.x >= 0.0);
        assert!(ball.velocity.z.abs() < 1e-6);
    }

    #[test]
    fn rolls_about_the_sideways_axis() {
        let mut ball = launched_ball();
        ball.velocity = Vector3::new(2.0, 0.0, 0.0);
        let before = ball.orientation;
        ball.integrate(1.0 / 60.0);
        assert!(ball.orientation != before);
        // motion along +x rolls about -z
        let axis = Vector3::<f32>::unit_y().cross(Vector3::unit_x());
        assert!(axis.normalize().z < 0.0);
    }
}
