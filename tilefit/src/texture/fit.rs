use approx::abs_diff_eq;
use itertools::Itertools as _;
use log::trace;
use nalgebra::{Point2, Point3, Vector3};

use crate::buffer::{self, BufferError, VertexAttribute};
use crate::geometry::{Axis, Extent, FaceAxis, Sign, NORMAL_EPSILON};
use crate::texture::{Corner, TextureError, TileOptions, UvRect};

/// Number of vertices in each face of a box.
pub const FACE_ARITY: usize = 4;

/// Texture fit of a single axis-aligned face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceFit {
    pub face: FaceAxis,
    /// Physical extent of the face along its tangent.
    pub width: f32,
    /// Physical extent of the face along its bitangent.
    pub height: f32,
    pub u_diff: f32,
    pub v_diff: f32,
    pub rect: UvRect,
    u: (Axis, Sign, Extent),
    v: (Axis, Sign, Extent),
}

impl FaceFit {
    /// Fits the tile to a face given the positions of its vertices in model
    /// space and the scaling of the mesh.
    pub fn new(
        face: FaceAxis,
        positions: &[Point3<f32>],
        scale: &Vector3<f32>,
        options: &TileOptions,
    ) -> Self {
        let extent = |(axis, sign): (Axis, Sign)| {
            (
                axis,
                sign,
                Extent::along(positions, axis).unwrap_or_default(),
            )
        };
        let u = extent(face.tangent());
        let v = extent(face.bitangent());
        let width = (u.2.span() * scale[u.0.index()]).abs();
        let height = (v.2.span() * scale[v.0.index()]).abs();
        let (u_diff, v_diff) = options.margins(width, height);
        FaceFit {
            face,
            width,
            height,
            u_diff,
            v_diff,
            rect: options.rect(width, height),
            u,
            v,
        }
    }

    /// Gets the corner of the face nearest to a vertex position.
    pub fn corner(&self, position: &Point3<f32>) -> Corner {
        let is_high = |(axis, sign, extent): (Axis, Sign, Extent)| {
            extent.is_upper(position[axis.index()]) == sign.is_positive()
        };
        Corner::from_sides(is_high(self.u), is_high(self.v))
    }

    pub fn uv(&self, position: &Point3<f32>) -> Point2<f32> {
        self.rect.corner(self.corner(position))
    }

    /// Returns `true` if the positions form an axis-aligned rectangle on the
    /// face.
    ///
    /// Every position must lie in the plane of the face, at the minimum or
    /// maximum of the face along both its tangent and bitangent, and on a
    /// distinct corner.
    pub fn is_rectangle(&self, positions: &[Point3<f32>]) -> bool {
        let is_planar = Extent::along(positions, self.face.axis)
            .map_or(false, |extent| extent.span() <= tolerance(&extent));
        let is_on_corner = |position: &Point3<f32>| {
            [self.u, self.v].iter().all(|(axis, _, extent)| {
                let value = position[axis.index()];
                let epsilon = tolerance(extent);
                abs_diff_eq!(value, extent.min, epsilon = epsilon)
                    || abs_diff_eq!(value, extent.max, epsilon = epsilon)
            })
        };
        is_planar
            && positions.iter().all(is_on_corner)
            && positions
                .iter()
                .map(|position| self.corner(position))
                .all_unique()
    }
}

/// Tolerance for comparing coordinates within an extent, relative to the
/// magnitude of its bounds.
fn tolerance(extent: &Extent) -> f32 {
    NORMAL_EPSILON * extent.min.abs().max(extent.max.abs()).max(1.0)
}

/// Recomputes the texture coordinates of a box.
///
/// Vertices are grouped into faces of [`FACE_ARITY`] consecutive vertices. The
/// normal of a face is the mean of the normals of its vertices. For each face
/// that is aligned with an axis, the tile is fit to the physical size of the
/// face (its extent in model space multiplied by `scale`) and centered on it.
/// Each vertex is assigned the texture coordinate of the corner of the face it
/// lies on. Faces that are not axis aligned keep their texture coordinates.
///
/// An axis-aligned face must be a rectangle whose vertices lie on its four
/// corners (see [`FaceFit::is_rectangle`]). Any other axis-aligned face means
/// that the mesh is not a box, and the whole mesh is rejected.
///
/// The input buffers are not modified; the returned buffer has the same length
/// and ordering as `uvs`.
///
/// # Errors
///
/// Returns an error if the tile options are invalid, if the buffers disagree on
/// the number of vertices, if the number of vertices is not a multiple of
/// [`FACE_ARITY`], or if an axis-aligned face is not a rectangle.
///
/// # Examples
///
/// Texture coordinates of the faces of a box that has been stretched along $x$
/// overflow the tile:
///
/// ```rust
/// # extern crate nalgebra;
/// # extern crate tilefit;
/// #
/// use nalgebra::Vector3;
/// use tilefit::buffer::VertexData;
/// use tilefit::primitive::cube::Cube;
/// use tilefit::texture::{self, TileOptions};
///
/// let cube = Cube::new().to_buffers();
/// let uvs = texture::fit_box_uvs(
///     cube.positions().unwrap(),
///     cube.normals().unwrap(),
///     cube.uvs().unwrap(),
///     &Vector3::new(2.0, 1.0, 1.0),
///     &TileOptions::default(),
/// )
/// .unwrap();
/// // The first face is the `+x` face, which is not stretched.
/// assert_eq!(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0], &uvs[..8]);
/// ```
pub fn fit_box_uvs(
    positions: &[f32],
    normals: &[f32],
    uvs: &[f32],
    scale: &Vector3<f32>,
    options: &TileOptions,
) -> Result<Vec<f32>, TextureError> {
    options.validate()?;
    let count = buffer::parallel_vertex_count(&[
        (VertexAttribute::Position, positions),
        (VertexAttribute::Normal, normals),
        (VertexAttribute::Uv, uvs),
    ])?;
    if count % FACE_ARITY != 0 {
        return Err(BufferError::FaceUnaligned {
            count,
            arity: FACE_ARITY,
        }
        .into());
    }
    let mut output = uvs.to_vec();
    for face in 0..(count / FACE_ARITY) {
        let base = face * FACE_ARITY;
        let normal = (base..(base + FACE_ARITY))
            .map(|index| buffer::vector3(normals, index))
            .sum::<Vector3<f32>>()
            / (FACE_ARITY as f32);
        let axis = match FaceAxis::classify(&normal) {
            Some(axis) => axis,
            None => {
                trace!("skipping face {} with oblique normal {:?}", face, normal);
                continue;
            }
        };
        let vertices: [Point3<f32>; FACE_ARITY] =
            std::array::from_fn(|k| buffer::point3(positions, base + k));
        let fit = FaceFit::new(axis, &vertices, scale, options);
        if !fit.is_rectangle(&vertices) {
            return Err(TextureError::MalformedFace(face));
        }
        trace!(
            "face {} ({:?}): size {}x{}, margins ({}, {})",
            face,
            axis,
            fit.width,
            fit.height,
            fit.u_diff,
            fit.v_diff,
        );
        for (k, position) in vertices.iter().enumerate() {
            buffer::write_point2(&mut output, base + k, &fit.uv(position));
        }
    }
    Ok(output)
}
