//! **Tilefit** is a library for scale-aware texture coordinates.
//!
//! When a textured mesh is scaled non-uniformly, texture coordinates that
//! span the unit square of texture space stretch with it. Tilefit recomputes
//! texture coordinates of boxes and extruded polygons from the physical size
//! of their faces instead, so that a texture keeps its size and stays centered
//! on each face as the mesh is scaled.
//!
//! Mesh data is exchanged as flat attribute buffers through the
//! [`VertexData`] trait, which can be implemented for the meshes of a host
//! rendering engine. The [`track`] module refits such meshes from a render
//! loop whenever their scaling changes.
//!
//! Please note that versions in the `0.0.*` series are experimental and
//! unstable! Use exact version constraints when specifying a dependency to
//! avoid spurious breakage.
//!
//! # Examples
//!
//! ```rust
//! # extern crate nalgebra;
//! # extern crate tilefit;
//! #
//! use nalgebra::Vector3;
//! use tilefit::prelude::*;
//! use tilefit::primitive::cube::Cube;
//! use tilefit::texture::{Rotation, TileOptions};
//! use tilefit::track::ScaleTracker;
//!
//! let mut cube = Cube::new()
//!     .to_buffers()
//!     .with_scaling(Vector3::new(2.0, 1.0, 1.0));
//! let mut tracker = ScaleTracker::new(TileOptions::default().with_rotation(Rotation::Quarter));
//! assert!(tracker.before_render(&mut cube));
//! assert_eq!(48, cube.uvs().unwrap().len());
//! ```
//!
//! [`track`]: crate::track
//! [`VertexData`]: crate::buffer::VertexData
#![allow(unknown_lints)] // Allow clippy lints.

pub mod buffer;
pub mod geometry;
pub mod primitive;
pub mod texture;
pub mod track;

pub mod prelude {
    //! Re-exports commonly used types and traits.
    //!
    //! Importing the contents of this module is recommended when reading mesh
    //! data, which is exposed mostly through the `VertexData` trait.

    pub use crate::buffer::VertexData as _;
    pub use crate::geometry::FaceAxis;
    pub use crate::texture::{Caps, Rotation, TileOptions};
}
