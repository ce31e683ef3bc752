extern crate env_logger;
extern crate luxo;

use luxo::lamp::{self, Command, Lamp};
use luxo::Factory;

const DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::init();

    let mut factory = Factory::new();
    let mut scene = lamp::stand_in_scene(&mut factory);
    let mut lamp = Lamp::from_scene(&mut factory, &mut scene).expect("lamp assembly");

    lamp.handle(Command::StartSequence);
    let mut frame = 0;
    while lamp.is_running() || lamp.projectile().is_launched() {
        lamp.step(&mut scene, DT);
        frame += 1;
        if frame % 30 == 0 {
            let ball = lamp.projectile();
            println!(
                "t={:5.2}s ball=({:6.2}, {:5.2}, {:6.2}) flying={}",
                frame as f32 * DT,
                ball.position.x,
                ball.position.y,
                ball.position.z,
                ball.is_launched(),
            );
        }
    }
    println!("done after {} frames", frame);
}
