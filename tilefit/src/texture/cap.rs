use nalgebra::Point3;

use crate::geometry::PlanarBounds;
use crate::texture::{FaceUvs, TextureError, TileOptions, UvRect};

/// Derives the texture rectangles of an extrusion from its cross-section.
///
/// The shape is a polygon in the $xz$-plane. The tile is fit to the bounding
/// box of the shape (its extent along $x$ and $z$) and centered on it, exactly
/// as for the faces of a box. Both caps receive the resulting rectangle. The
/// sides receive the zero rectangle and so are not textured. An empty shape
/// receives the unit rectangle.
///
/// # Errors
///
/// Returns an error if the tile options are invalid.
///
/// # Examples
///
/// A shape that is wider than its tile overflows along $u$:
///
/// ```rust
/// # extern crate nalgebra;
/// # extern crate tilefit;
/// #
/// use nalgebra::Point3;
/// use tilefit::texture::{self, TileOptions};
///
/// let uvs = texture::face_uvs_from_shape(
///     &[
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(2.0, 0.0, 0.0),
///         Point3::new(2.0, 0.0, 1.0),
///         Point3::new(0.0, 0.0, 1.0),
///     ],
///     &TileOptions::default(),
/// )
/// .unwrap();
/// assert!(uvs.top.u0 < 0.0);
/// ```
pub fn face_uvs_from_shape(
    shape: &[Point3<f32>],
    options: &TileOptions,
) -> Result<FaceUvs, TextureError> {
    options.validate()?;
    let cap = PlanarBounds::from_points(shape)
        .map(|bounds| options.rect(bounds.width(), bounds.depth()))
        .unwrap_or(UvRect::UNIT);
    Ok(FaceUvs {
        top: cap,
        sides: UvRect::ZERO,
        bottom: cap,
    })
}
