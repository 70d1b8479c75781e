//! Scale tracking for meshes driven by a render loop.
//!
//! Hosts call into this module once per frame, just before drawing. The pure
//! routines in [`texture`] are composed into [`refit`], which reads the buffers
//! of a mesh through [`VertexData`], recomputes its texture coordinates, and
//! writes them back. [`ScaleTracker`] caches the scaling of the mesh from the
//! last refit and only refits again when that scaling changes.
//!
//! Refitting is cosmetic: failures never surface to the host. A mesh that lacks
//! a buffer or whose buffers are inconsistent is left as it is and the failure
//! is logged at the `debug` level.
//!
//! # Examples
//!
//! ```rust
//! # extern crate nalgebra;
//! # extern crate tilefit;
//! #
//! use nalgebra::Vector3;
//! use tilefit::primitive::cube::Cube;
//! use tilefit::texture::TileOptions;
//! use tilefit::track::ScaleTracker;
//!
//! let mut cube = Cube::new().to_buffers();
//! let mut tracker = ScaleTracker::new(TileOptions::default());
//!
//! assert!(tracker.before_render(&mut cube));
//! assert!(!tracker.before_render(&mut cube));
//!
//! cube.set_scaling(Vector3::new(1.0, 2.0, 1.0));
//! assert!(tracker.before_render(&mut cube));
//! ```
//!
//! [`texture`]: crate::texture
//! [`VertexData`]: crate::buffer::VertexData

use approx::abs_diff_eq;
use log::debug;
use nalgebra::Vector3;

use crate::buffer::{self, BufferError, VertexAttribute, VertexData};
use crate::texture::{self, TextureError, TileOptions};

/// Default tolerance when comparing the scaling of a mesh between frames.
pub const SCALE_EPSILON: f32 = 1e-3;

/// Recomputes and writes back the texture coordinates of a box mesh.
///
/// Faces are fit to the current scaling of the mesh and caps are then rotated
/// as configured by `options`. Returns `true` if the texture coordinates of the
/// mesh were replaced and `false` if the mesh was left untouched.
pub fn refit<M>(mesh: &mut M, options: &TileOptions) -> bool
where
    M: VertexData + ?Sized,
{
    match refitted_uvs(mesh, options) {
        Ok(uvs) => {
            mesh.set_uvs(uvs);
            true
        }
        Err(error) => {
            debug!("skipping refit: {}", error);
            false
        }
    }
}

fn refitted_uvs<M>(mesh: &M, options: &TileOptions) -> Result<Vec<f32>, TextureError>
where
    M: VertexData + ?Sized,
{
    let positions = buffer::require(VertexAttribute::Position, mesh.positions())?;
    let normals = buffer::require(VertexAttribute::Normal, mesh.normals())?;
    let uvs = buffer::require(VertexAttribute::Uv, mesh.uvs())?;
    let uvs = texture::fit_box_uvs(positions, normals, uvs, &mesh.scaling(), options)?;
    texture::rotate_cap_uvs(normals, &uvs, options.rotation, options.caps)
}

/// Refits a mesh whenever its scaling changes.
///
/// The tracker is bound to a single mesh. It caches the scaling observed at
/// the last refit. A mesh that lacks a buffer is retried every frame until the
/// buffer appears. Other failures are cached like refits, so a mesh that cannot
/// be refit is not retried until its scaling changes. Use
/// [`ScaleTracker::invalidate`] to force a refit, for example after replacing
/// the buffers of the mesh.
#[derive(Clone, Debug)]
pub struct ScaleTracker {
    options: TileOptions,
    epsilon: f32,
    cached: Option<Vector3<f32>>,
}

impl ScaleTracker {
    pub fn new(options: TileOptions) -> Self {
        ScaleTracker {
            options,
            epsilon: SCALE_EPSILON,
            cached: None,
        }
    }

    /// Sets the tolerance below which changes in scaling are ignored.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn options(&self) -> &TileOptions {
        &self.options
    }

    /// Replaces the tile options.
    ///
    /// The next call to [`ScaleTracker::before_render`] refits the mesh
    /// regardless of its scaling.
    pub fn set_options(&mut self, options: TileOptions) {
        self.options = options;
        self.invalidate();
    }

    /// Gets the scaling observed at the last refit, if any.
    pub fn cached_scaling(&self) -> Option<Vector3<f32>> {
        self.cached
    }

    /// Returns `true` if a mesh with the given scaling must be refit.
    pub fn is_stale(&self, scaling: &Vector3<f32>) -> bool {
        match self.cached {
            Some(cached) => !abs_diff_eq!(cached, *scaling, epsilon = self.epsilon),
            None => true,
        }
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Refits the mesh if its scaling has changed since the last refit.
    ///
    /// Returns `true` if the texture coordinates of the mesh were replaced.
    pub fn before_render<M>(&mut self, mesh: &mut M) -> bool
    where
        M: VertexData + ?Sized,
    {
        let scaling = mesh.scaling();
        if !self.is_stale(&scaling) {
            return false;
        }
        match refitted_uvs(mesh, &self.options) {
            Ok(uvs) => {
                debug!("refit at scaling {:?}", scaling);
                mesh.set_uvs(uvs);
                self.cached = Some(scaling);
                true
            }
            Err(TextureError::Buffer(BufferError::MissingAttribute(attribute))) => {
                debug!("missing {} buffer; refit deferred", attribute);
                false
            }
            Err(error) => {
                debug!("skipping refit at scaling {:?}: {}", scaling, error);
                self.cached = Some(scaling);
                false
            }
        }
    }
}

impl Default for ScaleTracker {
    fn default() -> Self {
        ScaleTracker::new(TileOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{Point2, Point3, Vector3};
    use std::f32::consts::TAU;

    use crate::buffer::{AttributeBuffers, VertexAttribute, VertexData};
    use crate::geometry::FaceAxis;
    use crate::primitive::cube::Cube;
    use crate::primitive::extrude::Extrusion;
    use crate::texture::{self, Rotation, TileOptions};
    use crate::track::{self, ScaleTracker};

    fn octagon() -> AttributeBuffers {
        let shape: Vec<_> = (0..8)
            .map(|n| {
                let angle = TAU * (n as f32) / 8.0;
                Point3::new(angle.cos(), 0.0, angle.sin())
            })
            .collect();
        let uvs = texture::face_uvs_from_shape(&shape, &TileOptions::default()).unwrap();
        Extrusion::new(shape, 1.0).unwrap().to_buffers(&uvs)
    }

    fn face_uvs(mesh: &AttributeBuffers, face: FaceAxis) -> Vec<Point2<f32>> {
        let base = Cube::FACES.iter().position(|other| *other == face).unwrap() * 4;
        (base..(base + 4)).map(|index| mesh.uv(index).unwrap()).collect()
    }

    #[test]
    fn stretch_changes_only_faces_spanning_y() {
        let mut cube = Cube::new().to_buffers();
        let before = cube.clone();

        cube.set_scaling(Vector3::new(1.0, 2.0, 1.0));
        assert!(track::refit(&mut cube, &TileOptions::default()));

        for face in Cube::FACES {
            if face.is_cap() {
                assert_eq!(face_uvs(&before, face), face_uvs(&cube, face));
            }
            else {
                assert_ne!(face_uvs(&before, face), face_uvs(&cube, face));
                for uv in face_uvs(&cube, face) {
                    assert!(uv.x == 0.0 || uv.x == 1.0);
                    assert!(uv.y == -0.5 || uv.y == 1.5);
                }
            }
        }
    }

    #[test]
    fn refit_rotates_top_cap() {
        let mut cube = Cube::new().to_buffers();
        let options = TileOptions::default().with_rotation(Rotation::Half);
        assert!(track::refit(&mut cube, &options));

        assert_eq!(
            vec![
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
            ],
            face_uvs(&cube, FaceAxis::POSITIVE_Y)
        );
        assert_eq!(
            face_uvs(&Cube::new().to_buffers(), FaceAxis::NEGATIVE_Y),
            face_uvs(&cube, FaceAxis::NEGATIVE_Y)
        );
    }

    #[test]
    fn missing_buffers_leave_mesh_untouched() {
        for attribute in [
            VertexAttribute::Position,
            VertexAttribute::Normal,
            VertexAttribute::Uv,
        ] {
            let mut cube = Cube::new()
                .to_buffers()
                .with_scaling(Vector3::new(3.0, 1.0, 1.0));
            cube.take_attribute(attribute);
            let before = cube.clone();

            assert!(!track::refit(&mut cube, &TileOptions::default()));
            assert_eq!(before, cube);
        }
    }

    #[test]
    fn invalid_options_leave_mesh_untouched() {
        let mut cube = Cube::new().to_buffers();
        let before = cube.clone();
        assert!(!track::refit(
            &mut cube,
            &TileOptions::default().with_tile(0.0, 1.0)
        ));
        assert_eq!(before, cube);
    }

    #[test]
    fn tracker_refits_once_per_scaling() {
        let mut cube = Cube::new().to_buffers();
        let mut tracker = ScaleTracker::default();

        assert!(tracker.before_render(&mut cube));
        assert!(!tracker.before_render(&mut cube));

        cube.set_scaling(Vector3::new(2.0, 1.0, 1.0));
        assert!(tracker.before_render(&mut cube));
        assert_eq!(Some(Vector3::new(2.0, 1.0, 1.0)), tracker.cached_scaling());
        assert!(!tracker.before_render(&mut cube));
    }

    #[test]
    fn tracker_ignores_jitter() {
        let mut cube = Cube::new().to_buffers();
        let mut tracker = ScaleTracker::default();
        assert!(tracker.before_render(&mut cube));

        cube.set_scaling(Vector3::new(1.0001, 0.9999, 1.0));
        assert!(!tracker.before_render(&mut cube));
        assert!(tracker.is_stale(&Vector3::new(1.01, 1.0, 1.0)));
    }

    #[test]
    fn tracker_refits_after_options_change() {
        let mut cube = Cube::new().to_buffers();
        let mut tracker = ScaleTracker::default();
        assert!(tracker.before_render(&mut cube));

        tracker.set_options(TileOptions::default().with_rotation(Rotation::Quarter));
        assert!(tracker.before_render(&mut cube));
        assert_eq!(Rotation::Quarter, tracker.options().rotation);
    }

    #[test]
    fn tracker_waits_for_missing_buffer() {
        let mut cube = Cube::new()
            .to_buffers()
            .with_scaling(Vector3::new(2.0, 1.0, 1.0));
        let uvs = cube.take_attribute(VertexAttribute::Uv).unwrap();
        let mut tracker = ScaleTracker::default();

        assert!(!tracker.before_render(&mut cube));
        assert_eq!(None, tracker.cached_scaling());

        // The buffer arrives without any change in scaling.
        cube.set_uvs(uvs);
        assert!(tracker.before_render(&mut cube));
        assert_eq!(Some(Vector3::new(2.0, 1.0, 1.0)), tracker.cached_scaling());
    }

    #[test]
    fn tracker_rejects_extrusion() {
        let mut mesh = octagon();
        let before = mesh.clone();
        let mut tracker = ScaleTracker::default();

        assert!(!tracker.before_render(&mut mesh));
        assert_eq!(before, mesh);
        // The failure is cached and not retried until the scaling changes.
        assert!(!tracker.is_stale(&mesh.scaling()));

        mesh.set_scaling(Vector3::new(1.0, 3.0, 1.0));
        assert!(!tracker.before_render(&mut mesh));
        assert_eq!(before.uvs(), mesh.uvs());
    }

    #[test]
    fn refit_rejects_extrusion() {
        let mut mesh = octagon();
        let before = mesh.clone();

        assert_eq!(48, mesh.vertex_count());
        assert!(!track::refit(&mut mesh, &TileOptions::default()));
        assert_eq!(before, mesh);
    }
}
