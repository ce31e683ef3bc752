//! Luxo is a small scene-graph animation core built around an articulated
//! desk-lamp demo. It owns the retained node graph, a rig assembler that
//! regroups loader output under animatable pivots, a procedural sagging
//! cable mesh, a phase-based animation sequencer, and the ballistic ball
//! the lamp kicks around.
//!
//! ## Getting Started
//!
//! Create a [`Factory`](struct.Factory.html), build or load a
//! [`Scene`](struct.Scene.html), and hand both to
//! [`Lamp::from_scene`](lamp/struct.Lamp.html#method.from_scene). Stepping
//! the returned driver with frame deltas runs the whole show:
//!
//! ```rust,no_run
//! # extern crate luxo;
//! # fn main() {
//! let mut factory = luxo::Factory::new();
//! let mut scene = luxo::lamp::stand_in_scene(&mut factory);
//! let mut lamp = luxo::lamp::Lamp::from_scene(&mut factory, &mut scene).unwrap();
//! lamp.handle(luxo::lamp::Command::StartSequence);
//! loop {
//!     lamp.step(&mut scene, 1.0 / 60.0);
//! }
//! # }
//! ```
//!
//! The lower layers are usable on their own:
//! [`rig::assemble`](rig/fn.assemble.html) for reparenting named parts
//! without moving them,
//! [`Cable::between`](struct.Cable.html#method.between) for the sag mesh,
//! and [`Sequence`](animation/struct.Sequence.html) for scripted phase
//! timelines over any target type.

extern crate cgmath;
extern crate froggy;
extern crate genmesh;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate mint;
#[macro_use]
extern crate quick_error;

#[macro_use]
mod macros;

pub mod animation;
mod cable;
mod collision;
mod factory;
mod geometry;
mod hub;
pub mod lamp;
mod mesh;
mod node;
mod object;
mod projectile;
pub mod rig;
mod scene;

pub use cable::{Cable, CableOptions};
pub use collision::{Collider, Guard};
pub use factory::Factory;
pub use geometry::{Geometry, Shape};
pub use mesh::Mesh;
pub use node::{NodeInfo, NodePointer, NodeTransform};
pub use object::{Base, Group};
pub use projectile::Projectile;
pub use rig::Rig;
pub use scene::Scene;

/// Position in 3D space.
pub type Position = cgmath::Point3<f32>;
/// Three-component vector.
pub type Vector = cgmath::Vector3<f32>;
/// Rotation in 3D space.
pub type Orientation = cgmath::Quaternion<f32>;
