//! Flat vertex attribute buffers.
//!
//! Rendering engines typically expose mesh geometry as flat buffers of floats,
//! one buffer per attribute. Positions and normals use three components per
//! vertex and texture coordinates use two. Vertices are not shared between
//! faces: every face owns a contiguous run of vertices and each of the buffers
//! is ordered in the same way. An index buffer describes triangles over these
//! vertices, but texture fitting never reads it.
//!
//! [`AttributeBuffers`] owns such a set of buffers together with the scaling
//! applied to the mesh. The [`VertexData`] trait is the seam through which
//! texture fitting reads and writes mesh data, so that it can be driven by a
//! host engine or by [`AttributeBuffers`] alike.
//!
//! # Examples
//!
//! Reading texture coordinates from a box:
//!
//! ```rust
//! # extern crate tilefit;
//! #
//! use tilefit::buffer::VertexData;
//! use tilefit::primitive::cube::Cube;
//!
//! let buffers = Cube::new().to_buffers();
//! assert_eq!(24, buffers.vertex_count());
//! assert_eq!(48, buffers.uvs().unwrap().len());
//! ```

use log::debug;
use nalgebra::{Point2, Point3, Vector3};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum VertexAttribute {
    Position,
    Normal,
    Uv,
}

impl VertexAttribute {
    /// Gets the number of components per vertex of the attribute.
    pub fn arity(self) -> usize {
        match self {
            VertexAttribute::Position | VertexAttribute::Normal => 3,
            VertexAttribute::Uv => 2,
        }
    }
}

impl Display for VertexAttribute {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            VertexAttribute::Position => "position",
            VertexAttribute::Normal => "normal",
            VertexAttribute::Uv => "uv",
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BufferError {
    #[error("missing {0} buffer")]
    MissingAttribute(VertexAttribute),
    #[error("{attribute} buffer length {len} conflicts with arity")]
    Unaligned {
        attribute: VertexAttribute,
        len: usize,
    },
    #[error("conflicting vertex count in {attribute} buffer; expected {expected}, but got {actual}")]
    VertexCountConflict {
        attribute: VertexAttribute,
        expected: usize,
        actual: usize,
    },
    #[error("vertex count {count} conflicts with face arity {arity}")]
    FaceUnaligned { count: usize, arity: usize },
    #[error("index into vertex data out of bounds")]
    IndexOutOfBounds,
}

/// Mesh data read and written by texture fitting.
///
/// Accessors return `None` for attributes that the mesh does not provide.
pub trait VertexData {
    fn positions(&self) -> Option<&[f32]>;

    fn normals(&self) -> Option<&[f32]>;

    fn uvs(&self) -> Option<&[f32]>;

    /// Gets the non-uniform scaling applied to the mesh.
    fn scaling(&self) -> Vector3<f32>;

    /// Replaces the texture coordinates of the mesh.
    fn set_uvs(&mut self, uvs: Vec<f32>);
}

/// Gets an attribute buffer or fails if it is missing.
pub fn require(attribute: VertexAttribute, buffer: Option<&[f32]>) -> Result<&[f32], BufferError> {
    buffer.ok_or(BufferError::MissingAttribute(attribute))
}

/// Gets the number of vertices described by an attribute buffer.
///
/// # Errors
///
/// Returns an error if the length of the buffer is not a multiple of the arity
/// of the attribute.
pub fn vertex_count(attribute: VertexAttribute, buffer: &[f32]) -> Result<usize, BufferError> {
    let arity = attribute.arity();
    if buffer.len() % arity == 0 {
        Ok(buffer.len() / arity)
    }
    else {
        Err(BufferError::Unaligned {
            attribute,
            len: buffer.len(),
        })
    }
}

/// Gets the common vertex count of parallel attribute buffers.
///
/// The first buffer determines the expected count.
///
/// # Errors
///
/// Returns an error if any buffer is unaligned or if the buffers disagree on
/// the number of vertices.
pub fn parallel_vertex_count(buffers: &[(VertexAttribute, &[f32])]) -> Result<usize, BufferError> {
    let mut expected = None;
    for (attribute, buffer) in buffers.iter().copied() {
        let actual = vertex_count(attribute, buffer)?;
        match expected {
            None => {
                expected = Some(actual);
            }
            Some(expected) if expected != actual => {
                return Err(BufferError::VertexCountConflict {
                    attribute,
                    expected,
                    actual,
                });
            }
            _ => {}
        }
    }
    Ok(expected.unwrap_or(0))
}

/// Gets the common vertex count of those attribute buffers that are present.
fn present_vertex_count<const N: usize>(
    buffers: [(VertexAttribute, Option<&[f32]>); N],
) -> Result<usize, BufferError> {
    let buffers: Vec<_> = buffers
        .into_iter()
        .filter_map(|(attribute, buffer)| buffer.map(|buffer| (attribute, buffer)))
        .collect();
    parallel_vertex_count(&buffers)
}

/// Reads the three components of a vertex as a point.
///
/// The buffer must contain the vertex.
pub(crate) fn point3(buffer: &[f32], index: usize) -> Point3<f32> {
    let offset = index * 3;
    Point3::new(buffer[offset], buffer[offset + 1], buffer[offset + 2])
}

/// Reads the three components of a vertex as a vector.
///
/// The buffer must contain the vertex.
pub(crate) fn vector3(buffer: &[f32], index: usize) -> Vector3<f32> {
    point3(buffer, index).coords
}

/// Reads the two components of a vertex as a point.
///
/// The buffer must contain the vertex.
pub(crate) fn point2(buffer: &[f32], index: usize) -> Point2<f32> {
    let offset = index * 2;
    Point2::new(buffer[offset], buffer[offset + 1])
}

pub(crate) fn write_point2(buffer: &mut [f32], index: usize, uv: &Point2<f32>) {
    let offset = index * 2;
    buffer[offset] = uv.x;
    buffer[offset + 1] = uv.y;
}

/// Owned vertex attribute buffers of a mesh.
///
/// Any of the position, normal, and texture coordinate buffers may be absent,
/// but those that are present always agree on the number of vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeBuffers {
    positions: Option<Vec<f32>>,
    normals: Option<Vec<f32>>,
    uvs: Option<Vec<f32>>,
    indices: Vec<u32>,
    scaling: Vector3<f32>,
}

impl AttributeBuffers {
    /// Creates empty buffers with unit scaling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates buffers from raw attribute and index buffers.
    ///
    /// # Errors
    ///
    /// Returns an error if a buffer conflicts with the arity of its attribute,
    /// if the attribute buffers disagree on the number of vertices, or if an
    /// index is out of bounds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # extern crate tilefit;
    /// #
    /// use tilefit::buffer::AttributeBuffers;
    ///
    /// let buffers = AttributeBuffers::from_raw_buffers(
    ///     Some(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
    ///     Some(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]),
    ///     Some(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]),
    ///     vec![0, 1, 2],
    /// )
    /// .unwrap();
    /// assert_eq!(3, buffers.vertex_count());
    /// ```
    pub fn from_raw_buffers(
        positions: Option<Vec<f32>>,
        normals: Option<Vec<f32>>,
        uvs: Option<Vec<f32>>,
        indices: Vec<u32>,
    ) -> Result<Self, BufferError> {
        let count = present_vertex_count([
            (VertexAttribute::Position, positions.as_deref()),
            (VertexAttribute::Normal, normals.as_deref()),
            (VertexAttribute::Uv, uvs.as_deref()),
        ])?;
        if indices.iter().any(|index| *index as usize >= count) {
            Err(BufferError::IndexOutOfBounds)
        }
        else {
            Ok(AttributeBuffers {
                positions,
                normals,
                uvs,
                indices,
                scaling: Vector3::repeat(1.0),
            })
        }
    }

    pub fn into_raw_buffers(self) -> (Option<Vec<f32>>, Option<Vec<f32>>, Option<Vec<f32>>, Vec<u32>) {
        let AttributeBuffers {
            positions,
            normals,
            uvs,
            indices,
            ..
        } = self;
        (positions, normals, uvs, indices)
    }

    pub fn with_scaling(mut self, scaling: Vector3<f32>) -> Self {
        self.scaling = scaling;
        self
    }

    pub fn set_scaling(&mut self, scaling: Vector3<f32>) {
        self.scaling = scaling;
    }

    /// Removes an attribute buffer, returning its contents.
    pub fn take_attribute(&mut self, attribute: VertexAttribute) -> Option<Vec<f32>> {
        match attribute {
            VertexAttribute::Position => self.positions.take(),
            VertexAttribute::Normal => self.normals.take(),
            VertexAttribute::Uv => self.uvs.take(),
        }
    }

    /// Gets the number of vertices.
    ///
    /// This is zero if no attribute buffer is present.
    pub fn vertex_count(&self) -> usize {
        [
            (VertexAttribute::Position, self.positions.as_deref()),
            (VertexAttribute::Normal, self.normals.as_deref()),
            (VertexAttribute::Uv, self.uvs.as_deref()),
        ]
        .into_iter()
        .find_map(|(attribute, buffer)| buffer.map(|buffer| buffer.len() / attribute.arity()))
        .unwrap_or(0)
    }

    /// Gets a slice of the index data.
    pub fn as_index_slice(&self) -> &[u32] {
        self.indices.as_slice()
    }

    pub fn position(&self, index: usize) -> Option<Point3<f32>> {
        self.positions
            .as_deref()
            .filter(|_| index < self.vertex_count())
            .map(|buffer| point3(buffer, index))
    }

    pub fn normal(&self, index: usize) -> Option<Vector3<f32>> {
        self.normals
            .as_deref()
            .filter(|_| index < self.vertex_count())
            .map(|buffer| vector3(buffer, index))
    }

    pub fn uv(&self, index: usize) -> Option<Point2<f32>> {
        self.uvs
            .as_deref()
            .filter(|_| index < self.vertex_count())
            .map(|buffer| point2(buffer, index))
    }
}

impl Default for AttributeBuffers {
    fn default() -> Self {
        AttributeBuffers {
            positions: None,
            normals: None,
            uvs: None,
            indices: Vec::new(),
            scaling: Vector3::repeat(1.0),
        }
    }
}

impl VertexData for AttributeBuffers {
    fn positions(&self) -> Option<&[f32]> {
        self.positions.as_deref()
    }

    fn normals(&self) -> Option<&[f32]> {
        self.normals.as_deref()
    }

    fn uvs(&self) -> Option<&[f32]> {
        self.uvs.as_deref()
    }

    fn scaling(&self) -> Vector3<f32> {
        self.scaling
    }

    /// Replaces the texture coordinates.
    ///
    /// Texture coordinates that disagree with the positions or normals on the
    /// number of vertices are ignored.
    fn set_uvs(&mut self, uvs: Vec<f32>) {
        let count = present_vertex_count([
            (VertexAttribute::Position, self.positions.as_deref()),
            (VertexAttribute::Normal, self.normals.as_deref()),
            (VertexAttribute::Uv, Some(uvs.as_slice())),
        ]);
        match count {
            Ok(_) => {
                self.uvs = Some(uvs);
            }
            Err(error) => {
                debug!("ignoring texture coordinates: {}", error);
            }
        }
    }
}
