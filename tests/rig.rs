extern crate luxo;

use luxo::lamp::{self, BIG_HEAD, BIG_LAMP_PARTS, BULB};
use luxo::{Factory, Scene};

fn world_position(
    scene: &Scene,
    name: &str,
) -> [f32; 3] {
    let object = scene.find(name).expect(name);
    let p = object.sync(scene).world_transform.position;
    [p.x, p.y, p.z]
}

fn assert_close(
    a: [f32; 3],
    b: [f32; 3],
) {
    for i in 0..3 {
        assert!(
            (a[i] - b[i]).abs() < 1e-4,
            "{:?} differs from {:?}",
            a,
            b
        );
    }
}

#[test]
fn assembly_does_not_move_the_parts() {
    let mut factory = Factory::new();
    let mut scene = lamp::stand_in_scene(&mut factory);

    let head_before = world_position(&scene, BIG_HEAD);
    let bulb_before = world_position(&scene, BULB);

    let rig = luxo::rig::assemble(&mut factory, &mut scene, "Luxo", BIG_LAMP_PARTS).unwrap();
    assert!(rig.part(BIG_HEAD).is_some());

    assert_close(world_position(&scene, BIG_HEAD), head_before);
    assert_close(world_position(&scene, BULB), bulb_before);
}

#[test]
fn assembly_is_idempotent() {
    let mut factory = Factory::new();
    let mut scene = lamp::stand_in_scene(&mut factory);

    let first = luxo::rig::assemble(&mut factory, &mut scene, "Luxo", BIG_LAMP_PARTS).unwrap();
    let head_before = world_position(&scene, BIG_HEAD);

    let second = luxo::rig::assemble(&mut factory, &mut scene, "Luxo", BIG_LAMP_PARTS).unwrap();

    assert_eq!(first.part_names(), second.part_names());
    assert_close(world_position(&scene, BIG_HEAD), head_before);
}

#[test]
fn missing_parts_are_skipped() {
    let mut factory = Factory::new();
    let mut scene = lamp::stand_in_scene(&mut factory);

    let expected = [BIG_HEAD, BULB, "Does_Not_Exist"];
    let rig = luxo::rig::assemble(&mut factory, &mut scene, "Luxo", &expected).unwrap();

    assert!(rig.part(BIG_HEAD).is_some());
    assert!(rig.part("Does_Not_Exist").is_none());
}

#[test]
fn no_resolvable_parts_is_an_error() {
    let mut factory = Factory::new();
    let mut scene = lamp::stand_in_scene(&mut factory);

    let expected = ["Ghost_A", "Ghost_B"];
    assert!(luxo::rig::assemble(&mut factory, &mut scene, "Luxo", &expected).is_err());
}
