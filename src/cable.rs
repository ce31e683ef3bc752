//! Procedural cable generation.
//!
//! A [`Cable`] spans two anchor nodes with a sagging tube mesh. The curve is
//! re-sampled from the anchors' world positions every update, so it follows
//! animated anchors without ever lagging a frame behind. The tube geometry
//! is regenerated wholesale each time; no incremental patching.
//!
//! [`Cable`]: struct.Cable.html

use std::f32::consts::PI;

use cgmath::{InnerSpace, MetricSpace, Point3, Vector3};
use itertools::Itertools;
use mint;

use factory::Factory;
use geometry::{Geometry, Shape};
use mesh::Mesh;
use object::{Base, Group};
use scene::Scene;

/// Vertical drop at the midpoint, as a share of the anchor distance,
/// for a sag factor of one. Approximates a hanging cable well enough
/// without solving the catenary.
const SAG_SHAPE: f32 = 0.12;

/// Tuning knobs for cable generation.
#[derive(Clone, Debug)]
pub struct CableOptions {
    /// Number of spans along the cable.
    pub segments: usize,
    /// Vertices around the tube cross-section.
    pub radial_segments: usize,
    /// Tube radius.
    pub radius: f32,
    /// Sag factor; zero keeps the cable straight.
    pub sag: f32,
    /// How strongly the control node drags the cable body.
    pub control_weight: f32,
    /// Curve samples per span when smoothing the polyline.
    pub subdivisions: usize,
}

impl Default for CableOptions {
    fn default() -> Self {
        CableOptions {
            segments: 24,
            radial_segments: 8,
            radius: 0.08,
            sag: 0.6,
            control_weight: 1.0,
            subdivisions: 3,
        }
    }
}

/// A sagging tube mesh between two moving anchor nodes.
pub struct Cable {
    start: Base,
    end: Base,
    /// Movable control node. Starts at the anchor midpoint; dragging it
    /// pulls the cable body without disturbing the anchor endpoints.
    pub control: Group,
    mesh: Mesh,
    options: CableOptions,
}

impl Cable {
    /// Creates a cable between two anchors and adds its mesh to the scene.
    ///
    /// Returns `None` (logged) if either anchor is absent, in which case the
    /// caller simply runs without a cable.
    pub fn between(
        factory: &mut Factory,
        scene: &mut Scene,
        start: Option<&Base>,
        end: Option<&Base>,
        options: CableOptions,
    ) -> Option<Self> {
        let (start, end) = match (start, end) {
            (Some(s), Some(e)) => (s.clone(), e.clone()),
            _ => {
                warn!("cable anchor missing, cable disabled");
                return None;
            }
        };

        scene.sync_graph();
        let (a, b) = {
            let hub = scene.hub.lock().unwrap();
            (
                hub.world_position(&start.node),
                hub.world_position(&end.node),
            )
        };

        let mut control = factory.group();
        control.set_position([
            (a.x + b.x) * 0.5,
            (a.y + b.y) * 0.5,
            (a.z + b.z) * 0.5,
        ]);
        scene.add(&control);

        let mesh = factory.mesh(Geometry::empty());
        scene.add(&mesh);

        let mut cable = Cable {
            start,
            end,
            control,
            mesh,
            options,
        };
        cable.update(scene);
        Some(cable)
    }

    /// Regenerates the tube from the anchors' current world positions.
    ///
    /// Cheap enough to run unconditionally for all live cables once per
    /// frame; call it after all transform updates so the cable reads the
    /// anchors' final positions for the frame.
    pub fn update(
        &mut self,
        scene: &Scene,
    ) {
        let (a, b, control) = {
            let mut hub = scene.hub.lock().unwrap();
            hub.process_messages();
            hub.update_graph(&scene.root);
            (
                hub.world_position(&self.start.node),
                hub.world_position(&self.end.node),
                hub.world_position(self.control.as_ref()),
            )
        };
        let points = sample(a, b, control, &self.options);
        let smooth = catmull_rom(&points, self.options.subdivisions);
        let geometry = tube(&smooth, self.options.radius, self.options.radial_segments);
        self.mesh.set_geometry(geometry);
    }
}

/// Samples the sagging polyline between the anchor positions.
///
/// Endpoints are the anchor positions exactly; interior samples get the
/// sinusoidal sag plus the control node's drag, weighted triangularly so it
/// peaks at the midpoint and vanishes at both ends.
fn sample(
    a: Point3<f32>,
    b: Point3<f32>,
    control: Point3<f32>,
    options: &CableOptions,
) -> Vec<Point3<f32>> {
    let n = options.segments.max(2);
    let span = a.distance(b);
    let mid = Point3::new(
        (a.x + b.x) * 0.5,
        (a.y + b.y) * 0.5,
        (a.z + b.z) * 0.5,
    );
    let drag = control - mid;

    let mut points = Vec::with_capacity(n + 1);
    points.push(a);
    for i in 1..n {
        let t = i as f32 / n as f32;
        let mut p = a + (b - a) * t;
        p.y -= (PI * t).sin() * options.sag * span * SAG_SHAPE;
        let weight = (1.0 - (t - 0.5).abs() * 2.0).max(0.0) * options.control_weight;
        p += drag * weight;
        points.push(p);
    }
    points.push(b);
    points
}

/// Uniform Catmull-Rom interpolation through the sampled points.
fn catmull_rom(
    points: &[Point3<f32>],
    subdivisions: usize,
) -> Vec<Point3<f32>> {
    if points.len() < 3 || subdivisions < 2 {
        return points.to_vec();
    }
    let last = points.len() - 1;
    let mut out = Vec::with_capacity(last * subdivisions + 1);
    for i in 0..last {
        let p0 = points[if i == 0 { 0 } else { i - 1 }];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];
        for j in 0..subdivisions {
            let t = j as f32 / subdivisions as f32;
            out.push(spline_point(p0, p1, p2, p3, t));
        }
    }
    out.push(points[last]);
    out
}

fn spline_point(
    p0: Point3<f32>,
    p1: Point3<f32>,
    p2: Point3<f32>,
    p3: Point3<f32>,
    t: f32,
) -> Point3<f32> {
    let t2 = t * t;
    let t3 = t2 * t;
    let coord = |a: f32, b: f32, c: f32, d: f32| {
        0.5
            * (2.0 * b
                + (c - a) * t
                + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
                + (3.0 * b - a - 3.0 * c + d) * t3)
    };
    Point3::new(
        coord(p0.x, p1.x, p2.x, p3.x),
        coord(p0.y, p1.y, p2.y, p3.y),
        coord(p0.z, p1.z, p2.z, p3.z),
    )
}

/// Sweeps a circular cross-section along the path.
fn tube(
    path: &[Point3<f32>],
    radius: f32,
    radial_segments: usize,
) -> Geometry {
    if path.len() < 2 || radial_segments < 3 {
        return Geometry::empty();
    }

    // forward differences as tangents, reusing the previous direction when a
    // span degenerates to a point
    let mut tangents: Vec<Vector3<f32>> = Vec::with_capacity(path.len());
    let mut previous = Vector3::unit_x();
    for (p, q) in path.iter().tuple_windows() {
        let d: Vector3<f32> = q - p;
        let tangent = if d.magnitude2() > 1e-12 {
            d.normalize()
        } else {
            previous
        };
        tangents.push(tangent);
        previous = tangent;
    }
    tangents.push(previous);

    let mut vertices: Vec<mint::Point3<f32>> = Vec::with_capacity(path.len() * radial_segments);
    let mut normals: Vec<mint::Vector3<f32>> = Vec::with_capacity(path.len() * radial_segments);
    for (p, tangent) in path.iter().zip(&tangents) {
        let mut side = tangent.cross(Vector3::unit_y());
        if side.magnitude2() < 1e-6 {
            side = tangent.cross(Vector3::unit_x());
        }
        let side = side.normalize();
        let up = tangent.cross(side).normalize();
        for k in 0..radial_segments {
            let theta = 2.0 * PI * k as f32 / radial_segments as f32;
            let dir = side * theta.cos() + up * theta.sin();
            let v = p + dir * radius;
            vertices.push([v.x, v.y, v.z].into());
            normals.push([dir.x, dir.y, dir.z].into());
        }
    }

    let mut faces = Vec::with_capacity((path.len() - 1) * radial_segments * 2);
    for ring in 0..path.len() - 1 {
        let base0 = (ring * radial_segments) as u32;
        let base1 = ((ring + 1) * radial_segments) as u32;
        for k in 0..radial_segments as u32 {
            let k1 = (k + 1) % radial_segments as u32;
            faces.push([base0 + k, base1 + k, base1 + k1]);
            faces.push([base0 + k, base1 + k1, base0 + k1]);
        }
    }

    Geometry {
        base_shape: Shape { vertices, normals },
        faces,
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use factory::Factory;
    use super::{sample, tube, Cable, CableOptions};

    #[test]
    fn missing_anchor_disables_the_cable() {
        let mut factory = Factory::new();
        let mut scene = factory.scene();
        let mut anchor = factory.group();
        anchor.set_position([0.0, 3.0, 0.0]);
        scene.add(&anchor);

        let options = CableOptions::default();
        assert!(Cable::between(&mut factory, &mut scene, None, Some(&*anchor), options.clone()).is_none());
        assert!(Cable::between(&mut factory, &mut scene, Some(&*anchor), None, options.clone()).is_none());
        assert!(Cable::between(&mut factory, &mut scene, None, None, options).is_none());
    }

    #[test]
    fn endpoints_match_anchors_exactly() {
        let a = Point3::new(1.5, 3.0, -2.0);
        let b = Point3::new(-4.0, 1.0, 7.5);
        let control = Point3::new(10.0, 10.0, 10.0);
        let points = sample(a, b, control, &CableOptions::default());
        assert_eq!(points.len(), 25);
        assert_eq!(points[0], a);
        assert_eq!(points[24], b);
    }

    #[test]
    fn midpoint_sags_by_the_documented_share() {
        // anchors 4 units apart, sag 0.6 -> drop of 0.6 * 4 * 0.12 = 0.288
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(4.0, 0.0, 0.0);
        let control = Point3::new(2.0, 0.0, 0.0);
        let points = sample(a, b, control, &CableOptions::default());
        let mid = points[12];
        assert!((mid.x - 2.0).abs() < 1e-5);
        assert!((mid.y + 0.288).abs() < 1e-5);
        assert!(mid.z.abs() < 1e-5);
    }

    #[test]
    fn control_drag_moves_the_body_not_the_anchors() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(4.0, 0.0, 0.0);
        let rest = sample(a, b, Point3::new(2.0, 0.0, 0.0), &CableOptions::default());
        let pulled = sample(a, b, Point3::new(2.0, 0.0, 3.0), &CableOptions::default());
        assert_eq!(pulled[0], rest[0]);
        assert_eq!(pulled[24], rest[24]);
        // full weight at the midpoint
        assert!((pulled[12].z - 3.0).abs() < 1e-5);
        // partial weight in between
        assert!(pulled[6].z > 0.0 && pulled[6].z < 3.0);
    }

    #[test]
    fn tube_rings_cover_the_path() {
        let path = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, -0.2, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let geometry = tube(&path, 0.1, 6);
        assert_eq!(geometry.base_shape.vertices.len(), 18);
        assert_eq!(geometry.faces.len(), 24);
    }
}
