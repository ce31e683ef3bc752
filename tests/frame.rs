extern crate luxo;

use luxo::lamp::{self, Axis, Command, Lamp};
use luxo::Factory;

const DT: f32 = 1.0 / 60.0;

fn lamp_setup() -> (Factory, luxo::Scene, Lamp) {
    let mut factory = Factory::new();
    let mut scene = lamp::stand_in_scene(&mut factory);
    let lamp = Lamp::from_scene(&mut factory, &mut scene).unwrap();
    (factory, scene, lamp)
}

#[test]
fn stand_in_scene_resolves_every_handle() {
    let (_factory, _scene, lamp) = lamp_setup();
    assert!(lamp.ready());
    assert!(!lamp.is_running());
}

#[test]
fn routine_runs_to_completion_and_launches_the_ball() {
    let (_factory, mut scene, mut lamp) = lamp_setup();

    lamp.handle(Command::StartSequence);
    assert!(lamp.is_running());

    let mut saw_flight = false;
    for _ in 0..1800 {
        lamp.step(&mut scene, DT);
        if lamp.projectile().is_launched() {
            saw_flight = true;
        }
        if saw_flight && !lamp.is_running() && !lamp.projectile().is_launched() {
            break;
        }
    }

    assert!(saw_flight, "the flick never released the ball");
    assert!(!lamp.is_running(), "the routine never finished");
    assert!(
        !lamp.projectile().is_launched(),
        "the ball never came to rest"
    );
}

#[test]
fn ball_node_follows_the_projectile() {
    let (_factory, mut scene, mut lamp) = lamp_setup();

    lamp.handle(Command::StartSequence);
    for _ in 0..1800 {
        lamp.step(&mut scene, DT);
        if lamp.projectile().is_launched() {
            let expected = lamp.projectile().position;
            let ball = scene.find(lamp::BALL).unwrap();
            let actual = ball.sync(&scene).world_transform.position;
            assert!((actual.x - expected.x).abs() < 1e-4);
            assert!((actual.y - expected.y).abs() < 1e-4);
            assert!((actual.z - expected.z).abs() < 1e-4);
            return;
        }
    }
    panic!("the ball was never launched");
}

#[test]
fn trigger_is_ignored_while_running() {
    let (_factory, mut scene, mut lamp) = lamp_setup();

    lamp.handle(Command::StartSequence);
    lamp.step(&mut scene, DT);
    let phase_before = lamp.is_running();
    lamp.handle(Command::StartSequence);
    lamp.step(&mut scene, DT);

    assert!(phase_before);
    assert!(lamp.is_running());
}

#[test]
fn nudges_and_spin_are_safe_every_frame() {
    let (_factory, mut scene, mut lamp) = lamp_setup();

    lamp.handle(Command::ToggleSpin);
    lamp.handle(Command::Nudge(Axis::X, 0.2));
    lamp.handle(Command::Nudge(Axis::Y, -0.1));
    lamp.handle(Command::Nudge(Axis::Z, 0.05));
    for _ in 0..120 {
        lamp.step(&mut scene, DT);
    }
    lamp.handle(Command::ToggleSpin);
    lamp.step(&mut scene, DT);
}
