//! Structures for creating and storing geometric primitives.
use mint;
use genmesh::{EmitTriangles, Triangulate, Vertex as GenVertex};
use genmesh::generators::{self, IndexedPolygon, SharedVertex};

/// Vertex attributes of a geometry.
#[derive(Clone, Debug)]
pub struct Shape {
    /// Vertices.
    pub vertices: Vec<mint::Point3<f32>>,
    /// Normals.
    pub normals: Vec<mint::Vector3<f32>>,
}

impl Shape {
    /// Create an empty shape.
    pub fn empty() -> Self {
        Shape {
            vertices: Vec::new(),
            normals: Vec::new(),
        }
    }
}

/// A collection of vertices, their normals, and faces that defines the
/// shape of a polyhedral object.
#[derive(Clone, Debug)]
pub struct Geometry {
    /// The shape of geometry.
    pub base_shape: Shape,
    /// Faces.
    pub faces: Vec<[u32; 3]>,
}

impl Geometry {
    /// Create new `Geometry` without any data in it.
    pub fn empty() -> Self {
        Geometry {
            base_shape: Shape::empty(),
            faces: Vec::new(),
        }
    }

    fn generate<P, G, Fpos, Fnor>(
        gen: G,
        fpos: Fpos,
        fnor: Fnor,
    ) -> Self
    where
        P: EmitTriangles<Vertex = usize>,
        G: IndexedPolygon<P> + SharedVertex<GenVertex>,
        Fpos: Fn(GenVertex) -> mint::Point3<f32>,
        Fnor: Fn(GenVertex) -> mint::Vector3<f32>,
    {
        Geometry {
            base_shape: Shape {
                vertices: gen.shared_vertex_iter().map(fpos).collect(),
                normals: gen.shared_vertex_iter().map(fnor).collect(),
            },
            faces: gen.indexed_polygon_iter()
                .triangulate()
                .map(|t| [t.x as u32, t.y as u32, t.z as u32])
                .collect(),
        }
    }

    /// Create new Plane with desired size.
    pub fn plane(
        sx: f32,
        sy: f32,
    ) -> Self {
        Self::generate(
            generators::Plane::new(),
            |v| [v.pos.x * 0.5 * sx, v.pos.y * 0.5 * sy, 0.0].into(),
            |v| [v.normal.x, v.normal.y, v.normal.z].into(),
        )
    }

    /// Create new Box with desired size.
    pub fn cuboid(
        sx: f32,
        sy: f32,
        sz: f32,
    ) -> Self {
        Self::generate(
            generators::Cube::new(),
            |v| {
                [
                    v.pos.x * 0.5 * sx,
                    v.pos.y * 0.5 * sy,
                    v.pos.z * 0.5 * sz,
                ].into()
            },
            |v| [v.normal.x, v.normal.y, v.normal.z].into(),
        )
    }

    /// Create new Cylinder or Cone with desired top and bottom radius, height
    /// and number of segments.
    pub fn cylinder(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radius_segments: usize,
    ) -> Self {
        Self::generate(
            generators::Cylinder::new(radius_segments),
            // three.js has height along the Y axis
            |v| {
                let scale = (v.pos.z + 1.0) * 0.5 * radius_top + (1.0 - v.pos.z) * 0.5 * radius_bottom;
                [v.pos.y * scale, v.pos.z * 0.5 * height, v.pos.x * scale].into()
            },
            |v| [v.normal.y, v.normal.z, v.normal.x].into(),
        )
    }

    /// Create new Sphere with desired radius and number of segments.
    pub fn sphere(
        radius: f32,
        width_segments: usize,
        height_segments: usize,
    ) -> Self {
        Self::generate(
            generators::SphereUv::new(width_segments, height_segments),
            |v| [v.pos.x * radius, v.pos.y * radius, v.pos.z * radius].into(),
            |v| [v.normal.x, v.normal.y, v.normal.z].into(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Geometry;

    #[test]
    fn sphere_is_centered() {
        let geometry = Geometry::sphere(2.0, 8, 6);
        assert!(!geometry.base_shape.vertices.is_empty());
        assert!(!geometry.faces.is_empty());
        for v in &geometry.base_shape.vertices {
            let len = (v.x * v.x + v.y * v.y + v.z * v.z).sqrt();
            assert!((len - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn cuboid_extents() {
        let geometry = Geometry::cuboid(2.0, 4.0, 6.0);
        for v in &geometry.base_shape.vertices {
            assert!(v.x.abs() <= 1.0 + 1e-6);
            assert!(v.y.abs() <= 2.0 + 1e-6);
            assert!(v.z.abs() <= 3.0 + 1e-6);
        }
    }
}
