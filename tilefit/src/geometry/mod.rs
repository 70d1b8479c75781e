//! Axis classification and planar extents.
//!
//! Texture fitting only understands faces that are aligned with one of the
//! basis axes. This module provides [`FaceAxis`], which classifies a normal as
//! one of the six signed axes and exposes the tangent frame in which UVs are
//! laid out for that face, and [`Extent`], an interval over a single axis.
//!
//! # Examples
//!
//! Classifying the normal of a top face:
//!
//! ```rust
//! # extern crate nalgebra;
//! # extern crate tilefit;
//! #
//! use nalgebra::Vector3;
//! use tilefit::geometry::{Axis, FaceAxis, Sign};
//!
//! let axis = FaceAxis::classify(&Vector3::new(0.0, 1.0, 0.0)).unwrap();
//! assert_eq!(axis, FaceAxis::new(Axis::Y, Sign::Positive));
//! assert!(FaceAxis::classify(&Vector3::new(0.6, 0.8, 0.0)).is_none());
//! ```

use approx::abs_diff_eq;
use itertools::Itertools as _;
use nalgebra::{Point3, Vector3};
use std::ops::Neg;

/// Tolerance used when comparing normal components against zero and one.
pub const NORMAL_EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Gets the index of the axis into a three-component vector.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// Gets the sign of a scalar. Zero is considered positive.
    pub fn of(value: f32) -> Self {
        if value.is_sign_negative() && value != 0.0 {
            Sign::Negative
        }
        else {
            Sign::Positive
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, Sign::Positive)
    }

    pub fn to_scalar(self) -> f32 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

impl Neg for Sign {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

/// A signed basis axis along which a face normal points.
///
/// The tangent frame of a face is the frame seen by a viewer that faces the
/// face from outside the mesh: the tangent points to the viewer's right and the
/// bitangent points up. For side faces up is $+y$. For the top face up is $-z$
/// and for the bottom face up is $+z$. The cross product of the tangent and
/// bitangent is always the normal.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FaceAxis {
    pub axis: Axis,
    pub sign: Sign,
}

impl FaceAxis {
    pub const POSITIVE_X: Self = FaceAxis::new(Axis::X, Sign::Positive);
    pub const NEGATIVE_X: Self = FaceAxis::new(Axis::X, Sign::Negative);
    pub const POSITIVE_Y: Self = FaceAxis::new(Axis::Y, Sign::Positive);
    pub const NEGATIVE_Y: Self = FaceAxis::new(Axis::Y, Sign::Negative);
    pub const POSITIVE_Z: Self = FaceAxis::new(Axis::Z, Sign::Positive);
    pub const NEGATIVE_Z: Self = FaceAxis::new(Axis::Z, Sign::Negative);

    pub const fn new(axis: Axis, sign: Sign) -> Self {
        FaceAxis { axis, sign }
    }

    /// Classifies a normal as a signed basis axis.
    ///
    /// Returns `None` if the normal is not axis aligned, that is, if there is
    /// no component with an absolute value of one while the remaining
    /// components are zero.
    pub fn classify(normal: &Vector3<f32>) -> Option<Self> {
        Axis::ALL
            .iter()
            .copied()
            .find(|axis| {
                Axis::ALL.iter().all(|other| {
                    let expected = if other == axis { 1.0 } else { 0.0 };
                    abs_diff_eq!(
                        normal[other.index()].abs(),
                        expected,
                        epsilon = NORMAL_EPSILON
                    )
                })
            })
            .map(|axis| FaceAxis::new(axis, Sign::of(normal[axis.index()])))
    }

    pub fn normal(self) -> Vector3<f32> {
        self.axis.unit() * self.sign.to_scalar()
    }

    /// Gets the axis and direction of increasing $u$ on the face.
    pub fn tangent(self) -> (Axis, Sign) {
        match (self.axis, self.sign) {
            (Axis::X, sign) => (Axis::Z, -sign),
            (Axis::Y, _) => (Axis::X, Sign::Positive),
            (Axis::Z, sign) => (Axis::X, sign),
        }
    }

    /// Gets the axis and direction of increasing $v$ on the face.
    pub fn bitangent(self) -> (Axis, Sign) {
        match (self.axis, self.sign) {
            (Axis::Y, sign) => (Axis::Z, -sign),
            _ => (Axis::Y, Sign::Positive),
        }
    }

    pub fn is_cap(self) -> bool {
        self.axis == Axis::Y
    }
}

/// Closed interval over a single axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extent {
    pub min: f32,
    pub max: f32,
}

impl Extent {
    pub fn new(min: f32, max: f32) -> Self {
        Extent { min, max }
    }

    /// Computes the extent of a sequence of values.
    ///
    /// Returns `None` if the sequence is empty.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        values
            .into_iter()
            .minmax()
            .into_option()
            .map(|(min, max)| Extent::new(min, max))
    }

    /// Computes the extent of points along an axis.
    pub fn along<'a, I>(points: I, axis: Axis) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f32>>,
    {
        Self::from_values(points.into_iter().map(|point| point[axis.index()]))
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Returns `true` if the value is nearer the maximum than the minimum.
    pub fn is_upper(&self, value: f32) -> bool {
        (value - self.min) > (self.max - value)
    }

    /// Maps a value into the unit interval over the extent.
    ///
    /// Degenerate extents map every value to zero.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.span();
        if span > f32::EPSILON {
            (value - self.min) / span
        }
        else {
            0.0
        }
    }
}

/// Axis-aligned bounds of points in the $xz$-plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanarBounds {
    pub x: Extent,
    pub z: Extent,
}

impl PlanarBounds {
    /// Computes the bounds of points projected onto the $xz$-plane.
    ///
    /// Returns `None` if there are no points.
    pub fn from_points(points: &[Point3<f32>]) -> Option<Self> {
        let x = Extent::along(points, Axis::X)?;
        let z = Extent::along(points, Axis::Z)?;
        Some(PlanarBounds { x, z })
    }

    pub fn width(&self) -> f32 {
        self.x.span()
    }

    pub fn depth(&self) -> f32 {
        self.z.span()
    }
}
