extern crate env_logger;
extern crate luxo;

use luxo::{Cable, CableOptions, Factory};

const DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::init();

    let mut factory = Factory::new();
    let mut scene = factory.scene();

    let mut left = factory.group();
    left.set_position([-4.0, 3.0, 0.0]);
    scene.add(&left);
    let mut right = factory.group();
    right.set_position([4.0, 3.0, 0.0]);
    scene.add(&right);

    let mut cable = Cable::between(
        &mut factory,
        &mut scene,
        Some(&*left),
        Some(&*right),
        CableOptions::default(),
    )
    .expect("both anchors exist");

    // swing one anchor and drag the control node sideways
    for frame in 0..240 {
        let t = frame as f32 * DT;
        right.set_position([4.0, 3.0 + (t * 2.0).sin(), 0.0]);
        cable.control.set_position([t.sin() * 1.5, 2.5, 0.0]);
        cable.update(&scene);

        if frame % 30 == 0 {
            let anchor = right.sync(&scene).world_transform.position;
            let control = cable.control.sync(&scene).world_transform.position;
            println!(
                "t={:4.2}s anchor=({:5.2}, {:5.2}) control=({:5.2}, {:5.2})",
                t, anchor.x, anchor.y, control.x, control.y,
            );
        }
    }
}
