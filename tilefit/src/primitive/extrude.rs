//! Extruded polygons.
//!
//! An [`Extrusion`] sweeps a convex polygon in the $xz$-plane downward along
//! $-y$. The top cap lies at $y = 0$ and the bottom cap at $y = -d$ for a depth
//! $d$. Texture coordinates are taken from a [`FaceUvs`], typically derived
//! from the same shape via [`face_uvs_from_shape`].
//!
//! Vertices are laid out as the top cap ring, then four vertices per side, then
//! the bottom cap ring. Caps are triangulated as fans, so the shape must be
//! convex.
//!
//! # Examples
//!
//! ```rust
//! # extern crate nalgebra;
//! # extern crate tilefit;
//! #
//! use nalgebra::Point3;
//! use tilefit::primitive::extrude::Extrusion;
//! use tilefit::texture::{self, TileOptions};
//!
//! let shape = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 1.0),
//! ];
//! let uvs = texture::face_uvs_from_shape(&shape, &TileOptions::default()).unwrap();
//! let buffers = Extrusion::new(shape, 0.5).unwrap().to_buffers(&uvs);
//! assert_eq!(3 + (3 * 4) + 3, buffers.vertex_count());
//! ```
//!
//! [`face_uvs_from_shape`]: crate::texture::face_uvs_from_shape

use nalgebra::{Point2, Point3, Vector3};
use thiserror::Error;

use crate::buffer::AttributeBuffers;
use crate::geometry::{FaceAxis, PlanarBounds};
use crate::texture::{Corner, FaceUvs, UvRect};

#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("shape has {0} points, but at least 3 are required")]
    TooFewPoints(usize),
    #[error("extrusion depth {0} must be finite and positive")]
    InvalidDepth(f32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Extrusion {
    shape: Vec<Point3<f32>>,
    depth: f32,
}

impl Extrusion {
    /// Creates an extrusion of a shape.
    ///
    /// The $y$ components of the shape are ignored. The shape may be wound in
    /// either direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape has fewer than three points or if the
    /// depth is not finite and positive.
    pub fn new(shape: Vec<Point3<f32>>, depth: f32) -> Result<Self, ShapeError> {
        if shape.len() < 3 {
            return Err(ShapeError::TooFewPoints(shape.len()));
        }
        if !(depth.is_finite() && depth > 0.0) {
            return Err(ShapeError::InvalidDepth(depth));
        }
        let mut shape: Vec<_> = shape
            .into_iter()
            .map(|point| Point3::new(point.x, 0.0, point.z))
            .collect();
        // Wind the ring such that fans over it face `+y`.
        if signed_area(&shape) > 0.0 {
            shape.reverse();
        }
        Ok(Extrusion { shape, depth })
    }

    pub fn shape(&self) -> &[Point3<f32>] {
        self.shape.as_slice()
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Builds vertex buffers for the extrusion.
    pub fn to_buffers(&self, uvs: &FaceUvs) -> AttributeBuffers {
        let mut builder = BufferBuilder::default();
        let bottom = Vector3::y() * -self.depth;
        // These bounds always exist, because the shape is never empty.
        let bounds = PlanarBounds::from_points(&self.shape);
        let cap_uv = |rect: &UvRect, face: FaceAxis, point: &Point3<f32>| match bounds {
            Some(bounds) => {
                let s = bounds.x.normalize(point.x);
                let t = bounds.z.normalize(point.z);
                rect.lerp(s, if face.sign.is_positive() { 1.0 - t } else { t })
            }
            None => rect.corner(Corner::LowerLeft),
        };

        let top = builder.len();
        for point in &self.shape {
            builder.push(
                point,
                &FaceAxis::POSITIVE_Y.normal(),
                cap_uv(&uvs.top, FaceAxis::POSITIVE_Y, point),
            );
        }
        for n in 1..(self.shape.len() - 1) {
            builder.triangle(top, top + n, top + n + 1);
        }

        for (a, b) in self.edges() {
            let normal = match (b - a).cross(&Vector3::y()).try_normalize(f32::EPSILON) {
                Some(normal) => normal,
                // Coincident points have no side.
                None => continue,
            };
            let base = builder.len();
            for (position, corner) in [a + bottom, b + bottom, *b, *a]
                .iter()
                .zip(Corner::ALL)
            {
                builder.push(position, &normal, uvs.sides.corner(corner));
            }
            builder.triangle(base, base + 1, base + 2);
            builder.triangle(base, base + 2, base + 3);
        }

        let base = builder.len();
        for point in &self.shape {
            builder.push(
                &(point + bottom),
                &FaceAxis::NEGATIVE_Y.normal(),
                cap_uv(&uvs.bottom, FaceAxis::NEGATIVE_Y, point),
            );
        }
        for n in 1..(self.shape.len() - 1) {
            builder.triangle(base, base + n + 1, base + n);
        }
        builder.build()
    }

    fn edges(&self) -> impl Iterator<Item = (&Point3<f32>, &Point3<f32>)> {
        self.shape.iter().zip(self.shape.iter().cycle().skip(1))
    }
}

/// Twice the signed area of a ring projected onto the $xz$-plane.
fn signed_area(ring: &[Point3<f32>]) -> f32 {
    ring.iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| (a.x * b.z) - (b.x * a.z))
        .sum()
}

#[derive(Default)]
struct BufferBuilder {
    positions: Vec<f32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<u32>,
}

impl BufferBuilder {
    fn len(&self) -> usize {
        self.uvs.len() / 2
    }

    fn push(&mut self, position: &Point3<f32>, normal: &Vector3<f32>, uv: Point2<f32>) {
        self.positions.extend_from_slice(position.coords.as_slice());
        self.normals.extend_from_slice(normal.as_slice());
        self.uvs.extend_from_slice(&[uv.x, uv.y]);
    }

    fn triangle(&mut self, a: usize, b: usize, c: usize) {
        self.indices.extend([a, b, c].iter().map(|index| *index as u32));
    }

    fn build(self) -> AttributeBuffers {
        let BufferBuilder {
            positions,
            normals,
            uvs,
            indices,
        } = self;
        // The buffers are consistent by construction.
        AttributeBuffers::from_raw_buffers(Some(positions), Some(normals), Some(uvs), indices)
            .expect("inconsistent extrusion buffers")
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::{Point2, Point3, Vector3};

    use crate::buffer::VertexData;
    use crate::geometry::FaceAxis;
    use crate::primitive::extrude::{Extrusion, ShapeError};
    use crate::texture::{self, FaceUvs, TileOptions, UvRect};

    fn square() -> Vec<Point3<f32>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn reject_degenerate_input() {
        assert_eq!(
            Err(ShapeError::TooFewPoints(2)),
            Extrusion::new(square()[..2].to_vec(), 1.0)
        );
        assert_eq!(
            Err(ShapeError::InvalidDepth(0.0)),
            Extrusion::new(square(), 0.0)
        );
    }

    #[test]
    fn extrusion_layout() {
        let buffers = Extrusion::new(square(), 2.0)
            .unwrap()
            .to_buffers(&FaceUvs::default());

        // Four top, sixteen side, and four bottom vertices.
        assert_eq!(24, buffers.vertex_count());
        // Two triangles per cap and per side.
        assert_eq!((2 + 8 + 2) * 3, buffers.as_index_slice().len());
        for index in 0..4 {
            assert_eq!(Some(Vector3::y()), buffers.normal(index));
            assert_eq!(0.0, buffers.position(index).unwrap().y);
            assert_eq!(Some(-Vector3::y()), buffers.normal(20 + index));
            assert_eq!(-2.0, buffers.position(20 + index).unwrap().y);
        }
    }

    #[test]
    fn triangles_face_outward() {
        // Both windings of the shape produce outward facing triangles.
        for shape in [square(), square().into_iter().rev().collect()] {
            let buffers = Extrusion::new(shape, 1.0)
                .unwrap()
                .to_buffers(&FaceUvs::default());
            for triangle in buffers.as_index_slice().chunks(3) {
                let [a, b, c] = [triangle[0], triangle[1], triangle[2]]
                    .map(|index| buffers.position(index as usize).unwrap());
                let normal = buffers.normal(triangle[0] as usize).unwrap();
                assert!((b - a).cross(&(c - a)).dot(&normal) > 0.0);
            }
        }
    }

    #[test]
    fn side_normals_are_axis_aligned_for_square() {
        let buffers = Extrusion::new(square(), 1.0)
            .unwrap()
            .to_buffers(&FaceUvs::default());
        let mut faces: Vec<_> = (4..20)
            .step_by(4)
            .map(|index| FaceAxis::classify(&buffers.normal(index).unwrap()).unwrap())
            .collect();
        faces.dedup();
        assert_eq!(4, faces.len());
        assert!(faces.iter().all(|face| !face.is_cap()));
    }

    #[test]
    fn caps_use_shape_rect() {
        let shape = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let uvs = texture::face_uvs_from_shape(&shape, &TileOptions::default()).unwrap();
        let buffers = Extrusion::new(shape, 1.0).unwrap().to_buffers(&uvs);

        let top: Vec<_> = (0..4).map(|index| buffers.uv(index).unwrap()).collect();
        for uv in &top {
            assert!(uv.x == -0.5 || uv.x == 1.5);
            assert!(uv.y == 0.0 || uv.y == 1.0);
        }
        // The corner at the origin is the upper left of the top cap.
        let origin = (0..4)
            .find(|index| buffers.position(*index).unwrap() == Point3::origin())
            .unwrap();
        assert_abs_diff_eq!(Point2::new(-0.5, 1.0), top[origin]);
        // Sides are not textured.
        for index in 4..20 {
            assert_eq!(Some(Point2::origin()), buffers.uv(index));
        }
        assert_eq!(UvRect::ZERO, uvs.sides);
    }
}
