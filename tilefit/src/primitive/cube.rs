//! Box primitives.
//!
//! [`Cube`] builds the non-indexed vertex layout that rendering engines use
//! for boxes: each of the six faces owns four vertices, so positions are
//! duplicated between faces and every vertex carries the normal of its face.
//!
//! # Examples
//!
//! ```rust
//! # extern crate tilefit;
//! #
//! use tilefit::geometry::FaceAxis;
//! use tilefit::primitive::cube::Cube;
//!
//! let buffers = Cube::with_size(2.0, 1.0, 1.0).to_buffers();
//! assert_eq!(24, buffers.vertex_count());
//! assert_eq!(FaceAxis::POSITIVE_X, Cube::FACES[0]);
//! ```

use nalgebra::{Point3, Vector3};

use crate::buffer::AttributeBuffers;
use crate::geometry::{Axis, FaceAxis, Sign};
use crate::texture::{Corner, UvRect};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cube {
    size: Vector3<f32>,
}

impl Cube {
    /// Faces in the order in which their vertices appear in buffers.
    pub const FACES: [FaceAxis; 6] = [
        FaceAxis::POSITIVE_X,
        FaceAxis::NEGATIVE_X,
        FaceAxis::POSITIVE_Y,
        FaceAxis::NEGATIVE_Y,
        FaceAxis::POSITIVE_Z,
        FaceAxis::NEGATIVE_Z,
    ];

    /// Creates a unit cube centered at the origin.
    pub fn new() -> Self {
        Cube::with_size(1.0, 1.0, 1.0)
    }

    /// Creates a box centered at the origin with the given extents along $x$,
    /// $y$, and $z$.
    pub fn with_size(width: f32, height: f32, depth: f32) -> Self {
        Cube {
            size: Vector3::new(width, height, depth),
        }
    }

    pub fn size(&self) -> Vector3<f32> {
        self.size
    }

    /// Gets the positions of the corners of a face.
    ///
    /// Corners are ordered as in [`Corner::ALL`], such that the polygon is
    /// wound counter-clockwise when viewed from outside.
    pub fn face_positions(&self, face: FaceAxis) -> [Point3<f32>; 4] {
        let half = self.size / 2.0;
        let offset = |(axis, sign): (Axis, Sign)| {
            axis.unit() * (sign.to_scalar() * half[axis.index()])
        };
        let center = Point3::origin() + offset((face.axis, face.sign));
        let right = offset(face.tangent());
        let up = offset(face.bitangent());
        Corner::ALL.map(|corner| match corner {
            Corner::LowerLeft => center - right - up,
            Corner::LowerRight => center + right - up,
            Corner::UpperRight => center + right + up,
            Corner::UpperLeft => center - right + up,
        })
    }

    /// Builds vertex buffers for the box.
    ///
    /// Every face is textured with the whole unit tile and split into two
    /// triangles.
    pub fn to_buffers(&self) -> AttributeBuffers {
        let mut positions = Vec::with_capacity(Self::FACES.len() * 4 * 3);
        let mut normals = Vec::with_capacity(Self::FACES.len() * 4 * 3);
        let mut uvs = Vec::with_capacity(Self::FACES.len() * 4 * 2);
        let mut indices = Vec::with_capacity(Self::FACES.len() * 6);
        for (n, face) in Self::FACES.iter().copied().enumerate() {
            let normal = face.normal();
            for (position, corner) in self.face_positions(face).iter().zip(Corner::ALL) {
                let uv = UvRect::UNIT.corner(corner);
                positions.extend_from_slice(position.coords.as_slice());
                normals.extend_from_slice(normal.as_slice());
                uvs.extend_from_slice(&[uv.x, uv.y]);
            }
            let base = (n * 4) as u32;
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        // The buffers are consistent by construction.
        AttributeBuffers::from_raw_buffers(Some(positions), Some(normals), Some(uvs), indices)
            .expect("inconsistent cube buffers")
    }
}

impl Default for Cube {
    fn default() -> Self {
        Cube::new()
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{Point2, Point3};

    use crate::buffer::VertexData;
    use crate::geometry::{Axis, Extent, FaceAxis};
    use crate::primitive::cube::Cube;

    #[test]
    fn cube_buffers() {
        let buffers = Cube::new().to_buffers();

        assert_eq!(24, buffers.vertex_count());
        assert_eq!(72, buffers.positions().unwrap().len());
        assert_eq!(72, buffers.normals().unwrap().len());
        assert_eq!(48, buffers.uvs().unwrap().len());
        assert_eq!(36, buffers.as_index_slice().len());
    }

    #[test]
    fn faces_lie_on_their_planes() {
        let cube = Cube::with_size(2.0, 4.0, 6.0);
        for face in Cube::FACES {
            let positions = cube.face_positions(face);
            let depth = cube.size()[face.axis.index()] / 2.0 * face.sign.to_scalar();
            for position in &positions {
                assert_eq!(depth, position[face.axis.index()]);
            }
        }
    }

    #[test]
    fn faces_are_wound_outward() {
        let cube = Cube::new();
        for face in Cube::FACES {
            let [a, b, c, _] = cube.face_positions(face);
            let normal = (b - a).cross(&(c - a)).normalize();
            assert_eq!(Some(face), FaceAxis::classify(&normal));
        }
    }

    #[test]
    fn face_uvs_span_unit_tile() {
        let buffers = Cube::new().to_buffers();
        for face in 0..Cube::FACES.len() {
            let uvs: Vec<_> = (0..4)
                .map(|k| buffers.uv((face * 4) + k).unwrap())
                .collect();
            assert_eq!(
                vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(1.0, 0.0),
                    Point2::new(1.0, 1.0),
                    Point2::new(0.0, 1.0),
                ],
                uvs
            );
        }
    }

    #[test]
    fn box_extents() {
        let cube = Cube::with_size(2.0, 1.0, 3.0);
        let positions: Vec<Point3<f32>> = Cube::FACES
            .iter()
            .flat_map(|face| cube.face_positions(*face))
            .collect();
        assert_eq!(
            Some(Extent::new(-1.5, 1.5)),
            Extent::along(&positions, Axis::Z)
        );
    }
}
