use crate::buffer::{self, VertexAttribute};
use crate::geometry::FaceAxis;
use crate::texture::{Caps, Rotation, TextureError};

/// Rotates the texture coordinates of caps by a quarter turn multiple.
///
/// Only vertices with a normal along $\pm y$ that is selected by `caps` are
/// rotated. All other texture coordinates are copied through. See
/// [`Rotation::apply`] for the mapping.
///
/// # Errors
///
/// Returns an error if the buffers disagree on the number of vertices.
pub fn rotate_cap_uvs(
    normals: &[f32],
    uvs: &[f32],
    rotation: Rotation,
    caps: Caps,
) -> Result<Vec<f32>, TextureError> {
    let count = buffer::parallel_vertex_count(&[
        (VertexAttribute::Normal, normals),
        (VertexAttribute::Uv, uvs),
    ])?;
    let mut output = uvs.to_vec();
    if rotation.is_identity() {
        return Ok(output);
    }
    for index in 0..count {
        let is_selected = FaceAxis::classify(&buffer::vector3(normals, index))
            .map_or(false, |face| face.is_cap() && caps.includes(face.sign));
        if is_selected {
            let uv = rotation.apply(buffer::point2(uvs, index));
            buffer::write_point2(&mut output, index, &uv);
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use crate::buffer::{self, VertexData};
    use crate::geometry::FaceAxis;
    use crate::primitive::cube::Cube;
    use crate::texture::rotate::rotate_cap_uvs;
    use crate::texture::{Caps, Rotation};

    fn rotate(uvs: &[f32], rotation: Rotation, caps: Caps) -> Vec<f32> {
        let cube = Cube::new().to_buffers();
        rotate_cap_uvs(cube.normals().unwrap(), uvs, rotation, caps).unwrap()
    }

    fn face_index(face: FaceAxis) -> usize {
        Cube::FACES.iter().position(|other| *other == face).unwrap()
    }

    fn face_uvs(uvs: &[f32], face: FaceAxis) -> Vec<Point2<f32>> {
        let base = face_index(face) * 4;
        (base..(base + 4))
            .map(|index| buffer::point2(uvs, index))
            .collect()
    }

    #[test]
    fn rotate_top_only() {
        let cube = Cube::new().to_buffers();
        let uvs = cube.uvs().unwrap();
        let rotated = rotate(uvs, Rotation::Quarter, Caps::Top);

        assert_eq!(
            vec![
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
                Point2::new(0.0, 0.0),
            ],
            face_uvs(&rotated, FaceAxis::POSITIVE_Y)
        );
        for face in Cube::FACES {
            if face != FaceAxis::POSITIVE_Y {
                assert_eq!(face_uvs(uvs, face), face_uvs(&rotated, face));
            }
        }
    }

    #[test]
    fn rotate_bottom_when_selected() {
        let cube = Cube::new().to_buffers();
        let uvs = cube.uvs().unwrap();
        let rotated = rotate(uvs, Rotation::Half, Caps::Both);

        for face in [FaceAxis::POSITIVE_Y, FaceAxis::NEGATIVE_Y] {
            assert_eq!(
                vec![
                    Point2::new(1.0, 1.0),
                    Point2::new(0.0, 1.0),
                    Point2::new(0.0, 0.0),
                    Point2::new(1.0, 0.0),
                ],
                face_uvs(&rotated, face)
            );
        }
        let rotated = rotate(uvs, Rotation::Half, Caps::Bottom);
        assert_eq!(
            face_uvs(uvs, FaceAxis::POSITIVE_Y),
            face_uvs(&rotated, FaceAxis::POSITIVE_Y)
        );
    }

    #[test]
    fn opposite_rotations_cancel() {
        let cube = Cube::new().to_buffers();
        let uvs = cube.uvs().unwrap();
        for (a, b) in [
            (Rotation::Quarter, Rotation::ThreeQuarters),
            (Rotation::ThreeQuarters, Rotation::Quarter),
            (Rotation::Half, Rotation::Half),
        ] {
            let rotated = rotate(&rotate(uvs, a, Caps::Top), b, Caps::Top);
            assert_eq!(uvs, rotated.as_slice());
        }
    }

    #[test]
    fn zero_rotation_is_identity() {
        let uvs = vec![0.3; 48];
        assert_eq!(uvs, rotate(&uvs, Rotation::Zero, Caps::Both));
    }

    #[test]
    fn reject_conflicting_buffers() {
        let cube = Cube::new().to_buffers();
        assert!(rotate_cap_uvs(
            cube.normals().unwrap(),
            &[0.0; 4],
            Rotation::Quarter,
            Caps::Top
        )
        .is_err());
    }
}
