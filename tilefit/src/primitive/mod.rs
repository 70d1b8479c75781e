//! Primitive meshes.
//!
//! This module provides simple meshes in the vertex layout consumed by the
//! [texture][`texture`] routines: boxes via [`Cube`] and extruded polygons via
//! [`Extrusion`]. Primitives produce [`AttributeBuffers`], where every face
//! owns its vertices and every vertex carries the normal of its face.
//!
//! # Examples
//!
//! Building a box and fitting its texture coordinates to a scale:
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
//! let buffers = Cube::new().to_buffers();
//! let uvs = texture::fit_box_uvs(
//!     buffers.positions().unwrap(),
//!     buffers.normals().unwrap(),
//!     buffers.uvs().unwrap(),
//!     &Vector3::new(2.0, 1.0, 1.0),
//!     &TileOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(48, uvs.len());
//! ```
//!
//! [`AttributeBuffers`]: crate::buffer::AttributeBuffers
//! [`Cube`]: crate::primitive::cube::Cube
//! [`Extrusion`]: crate::primitive::extrude::Extrusion
//! [`texture`]: crate::texture

pub mod cube;
pub mod extrude;
