//! Texture tiling and scale-aware texture coordinates.
//!
//! A texture is applied to a face through a _tile_: the unit square of texture
//! space laid over `u_scale` by `v_scale` units of physical length. When a
//! face is smaller than its tile, only the center of the tile is visible; when
//! it is larger, the texture overflows and is cropped symmetrically. Either
//! way the texture keeps its physical size and stays centered as the mesh is
//! scaled.
//!
//! This module provides the options that describe tiling and the operations
//! that compute texture coordinates from them:
//!
//! - [`fit_box_uvs`] recomputes the texture coordinates of a box from its
//!   positions, normals, and scaling.
//! - [`face_uvs_from_shape`] derives the cap rectangles of an extruded polygon.
//! - [`rotate_cap_uvs`] rotates the texture coordinates of caps by quarter
//!   turns.
//!
//! # Examples
//!
//! Fitting the texture coordinates of a box that has been stretched along $y$:
//!
//! ```rust
//! # extern crate nalgebra;
//! # extern crate tilefit;
//! #
//! use nalgebra::Vector3;
//! use tilefit::buffer::VertexData;
//! use tilefit::primitive::cube::Cube;
//! use tilefit::texture::{self, TileOptions};
//!
//! let cube = Cube::new().to_buffers();
//! let uvs = texture::fit_box_uvs(
//!     cube.positions().unwrap(),
//!     cube.normals().unwrap(),
//!     cube.uvs().unwrap(),
//!     &Vector3::new(1.0, 2.0, 1.0),
//!     &TileOptions::default(),
//! )
//! .unwrap();
//! ```

mod cap;
mod fit;
mod rotate;

use nalgebra::Point2;
use thiserror::Error;

use crate::buffer::BufferError;
use crate::geometry::Sign;

pub use crate::texture::cap::face_uvs_from_shape;
pub use crate::texture::fit::{fit_box_uvs, FaceFit, FACE_ARITY};
pub use crate::texture::rotate::rotate_cap_uvs;

#[derive(Debug, Error, PartialEq)]
pub enum TextureError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error("tile scale ({u}, {v}) must be finite and positive")]
    InvalidTile { u: f32, v: f32 },
    #[error("rotation of {0} degrees is not a quarter turn")]
    InvalidRotation(i32),
    #[error("face {0} is axis aligned but its vertices do not form a rectangle")]
    MalformedFace(usize),
}

/// Rotation of texture coordinates by quarter turns about the center of the
/// tile.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Deserialize, serde::Serialize))]
pub enum Rotation {
    #[default]
    Zero,
    Quarter,
    Half,
    ThreeQuarters,
}

impl Rotation {
    /// Gets the rotation for an angle in degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if the angle is not one of `0`, `90`, `180`, or
    /// `270`.
    pub fn from_degrees(degrees: i32) -> Result<Self, TextureError> {
        match degrees {
            0 => Ok(Rotation::Zero),
            90 => Ok(Rotation::Quarter),
            180 => Ok(Rotation::Half),
            270 => Ok(Rotation::ThreeQuarters),
            _ => Err(TextureError::InvalidRotation(degrees)),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Zero => 0,
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarters => 270,
        }
    }

    /// Rotates a texture coordinate.
    ///
    /// | Rotation | Mapping                      |
    /// |----------|------------------------------|
    /// | 0°       | $(u, v)$                     |
    /// | 90°      | $(1 - v, u)$                 |
    /// | 180°     | $(1 - u, 1 - v)$             |
    /// | 270°     | $(v, 1 - u)$                 |
    pub fn apply(self, uv: Point2<f32>) -> Point2<f32> {
        let (u, v) = (uv.x, uv.y);
        match self {
            Rotation::Zero => uv,
            Rotation::Quarter => Point2::new(1.0 - v, u),
            Rotation::Half => Point2::new(1.0 - u, 1.0 - v),
            Rotation::ThreeQuarters => Point2::new(v, 1.0 - u),
        }
    }

    pub fn is_identity(self) -> bool {
        self == Rotation::Zero
    }
}

/// Caps whose texture coordinates are rotated.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Deserialize, serde::Serialize))]
pub enum Caps {
    /// Faces with a $+y$ normal.
    #[default]
    Top,
    /// Faces with a $-y$ normal.
    Bottom,
    Both,
}

impl Caps {
    /// Returns `true` if caps facing along $y$ with the given sign are
    /// included.
    pub fn includes(self, sign: Sign) -> bool {
        match self {
            Caps::Top => sign.is_positive(),
            Caps::Bottom => !sign.is_positive(),
            Caps::Both => true,
        }
    }
}

/// Tiling options.
///
/// # Examples
///
/// ```rust
/// # extern crate tilefit;
/// #
/// use tilefit::texture::{Rotation, TileOptions};
///
/// let options = TileOptions::default()
///     .with_tile(2.0, 2.0)
///     .with_rotation(Rotation::from_degrees(90).unwrap());
/// assert!(options.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct TileOptions {
    /// Physical length covered by one repetition of the texture along $u$.
    pub u_scale: f32,
    /// Physical length covered by one repetition of the texture along $v$.
    pub v_scale: f32,
    pub rotation: Rotation,
    pub caps: Caps,
}

impl TileOptions {
    pub fn with_tile(mut self, u_scale: f32, v_scale: f32) -> Self {
        self.u_scale = u_scale;
        self.v_scale = v_scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_caps(mut self, caps: Caps) -> Self {
        self.caps = caps;
        self
    }

    /// # Errors
    ///
    /// Returns an error if a tile scale is not finite or not positive.
    pub fn validate(&self) -> Result<(), TextureError> {
        let is_valid = |scale: f32| scale.is_finite() && scale > 0.0;
        if is_valid(self.u_scale) && is_valid(self.v_scale) {
            Ok(())
        }
        else {
            Err(TextureError::InvalidTile {
                u: self.u_scale,
                v: self.v_scale,
            })
        }
    }

    /// Computes the margins between a face of the given physical size and its
    /// tile.
    ///
    /// Margins are negative when the face is larger than its tile.
    pub fn margins(&self, width: f32, height: f32) -> (f32, f32) {
        (
            (self.u_scale - width) / 2.0,
            (self.v_scale - height) / 2.0,
        )
    }

    /// Computes the texture rectangle of a face of the given physical size.
    pub fn rect(&self, width: f32, height: f32) -> UvRect {
        let (u_diff, v_diff) = self.margins(width, height);
        UvRect::new(
            u_diff / self.u_scale,
            v_diff / self.v_scale,
            (self.u_scale - u_diff) / self.u_scale,
            (self.v_scale - v_diff) / self.v_scale,
        )
    }
}

impl Default for TileOptions {
    fn default() -> Self {
        TileOptions {
            u_scale: 1.0,
            v_scale: 1.0,
            rotation: Rotation::default(),
            caps: Caps::default(),
        }
    }
}

/// Corner of a face in its tangent frame.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Corner {
    LowerLeft,
    LowerRight,
    UpperRight,
    UpperLeft,
}

impl Corner {
    /// Corners in counter-clockwise order starting from the lower left.
    pub const ALL: [Corner; 4] = [
        Corner::LowerLeft,
        Corner::LowerRight,
        Corner::UpperRight,
        Corner::UpperLeft,
    ];

    pub fn from_sides(is_right: bool, is_upper: bool) -> Self {
        match (is_right, is_upper) {
            (false, false) => Corner::LowerLeft,
            (true, false) => Corner::LowerRight,
            (true, true) => Corner::UpperRight,
            (false, true) => Corner::UpperLeft,
        }
    }
}

/// Rectangle in texture space from a lower left to an upper right corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UvRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl UvRect {
    pub const UNIT: Self = UvRect {
        u0: 0.0,
        v0: 0.0,
        u1: 1.0,
        v1: 1.0,
    };
    pub const ZERO: Self = UvRect {
        u0: 0.0,
        v0: 0.0,
        u1: 0.0,
        v1: 0.0,
    };

    pub fn new(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        UvRect { u0, v0, u1, v1 }
    }

    pub fn corner(&self, corner: Corner) -> Point2<f32> {
        match corner {
            Corner::LowerLeft => Point2::new(self.u0, self.v0),
            Corner::LowerRight => Point2::new(self.u1, self.v0),
            Corner::UpperRight => Point2::new(self.u1, self.v1),
            Corner::UpperLeft => Point2::new(self.u0, self.v1),
        }
    }

    /// Interpolates a texture coordinate within the rectangle.
    ///
    /// The parameters are in the unit interval, where `(0, 0)` is the lower
    /// left corner.
    pub fn lerp(&self, s: f32, t: f32) -> Point2<f32> {
        Point2::new(
            self.u0 + ((self.u1 - self.u0) * s),
            self.v0 + ((self.v1 - self.v0) * t),
        )
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self.u0, self.v0, self.u1, self.v1]
    }
}

/// Texture rectangles of an extrusion in the order top cap, sides, and bottom
/// cap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceUvs {
    pub top: UvRect,
    pub sides: UvRect,
    pub bottom: UvRect,
}

impl FaceUvs {
    pub fn as_array(&self) -> [UvRect; 3] {
        [self.top, self.sides, self.bottom]
    }
}

impl Default for FaceUvs {
    fn default() -> Self {
        FaceUvs {
            top: UvRect::UNIT,
            sides: UvRect::ZERO,
            bottom: UvRect::UNIT,
        }
    }
}
