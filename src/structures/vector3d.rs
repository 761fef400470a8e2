// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of methods for three-dimensional vector.

use std::ops::{Add, AddAssign, Deref, DerefMut, Div, Mul, Sub, SubAssign};

use nalgebra::base::Vector3;

use crate::structures::simbox::SimBox;
use crate::PANIC_MESSAGE;

/// Describes length and orientation of a vector in space or a position of a point in space.
/// Implemented using `nalgebra`'s Vector3.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Vector3D(pub(crate) Vector3<f32>);

impl From<[f32; 3]> for Vector3D {
    #[inline]
    fn from(arr: [f32; 3]) -> Self {
        Vector3D(Vector3::new(arr[0], arr[1], arr[2]))
    }
}

impl From<Vector3<f32>> for Vector3D {
    #[inline]
    fn from(vec: Vector3<f32>) -> Self {
        Vector3D(vec)
    }
}

/// Allows accessing fields of `Vector3D` as `.x`, `.y`, and `.z`
/// and using all the methods of `nalgebra`'s `Vector3`.
impl Deref for Vector3D {
    type Target = Vector3<f32>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Vector3D {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Vector3D {
    /// Create a new `Vector3D` structure.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vector3D(Vector3::new(x, y, z))
    }

    /// Calculate length of the vector.
    ///
    /// ## Example
    /// ```
    /// # use flexan::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let vector = Vector3D::new(1.0, 2.0, 3.0);
    /// assert_approx_eq!(f32, vector.len(), 3.741657);
    /// ```
    #[inline]
    pub fn len(&self) -> f32 {
        self.0.magnitude()
    }

    /// Calculate the dot product of two vectors.
    #[inline]
    pub fn dot(&self, vector: &Vector3D) -> f32 {
        self.0.dot(&vector.0)
    }

    /// Calculate the squared distance between two points. Periodic boundary conditions are ignored.
    #[inline]
    pub fn distance_squared(&self, point: &Vector3D) -> f32 {
        (self.0 - point.0).norm_squared()
    }

    /// Calculate the distance between two points. Periodic boundary conditions are ignored.
    ///
    /// ## Example
    /// ```
    /// # use flexan::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let point1 = Vector3D::new(1.0, 2.0, 3.0);
    /// let point2 = Vector3D::new(2.0, 4.0, 5.0);
    /// assert_approx_eq!(f32, point1.distance(&point2), 3.0);
    /// ```
    #[inline]
    pub fn distance(&self, point: &Vector3D) -> f32 {
        self.distance_squared(point).sqrt()
    }

    /// Check whether the vector is a null vector.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Get the shortest vector from `self` to `point` taking periodic boundary conditions into account.
    /// Works for orthogonal and triclinic simulation boxes in the GROMACS (lower triangular) form.
    ///
    /// ## Panics
    /// Panics if any of the diagonal box dimensions is zero.
    ///
    /// ## Example
    /// ```
    /// # use flexan::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let simbox = SimBox::from([4.0, 4.0, 4.0]);
    /// let point1 = Vector3D::new(0.5, 3.5, 2.0);
    /// let point2 = Vector3D::new(3.5, 0.5, 2.5);
    ///
    /// let vector = point1.vector_to(&point2, &simbox);
    /// assert_approx_eq!(f32, vector.x, -1.0);
    /// assert_approx_eq!(f32, vector.y, 1.0);
    /// assert_approx_eq!(f32, vector.z, 0.5);
    /// ```
    pub fn vector_to(&self, point: &Vector3D, simbox: &SimBox) -> Vector3D {
        if !simbox.is_periodic() {
            panic!(
                "FATAL FLEXAN ERROR | Vector3D::vector_to | Box dimensions should not be zero.{}",
                PANIC_MESSAGE
            );
        }

        let mut vector = point - self;
        let box_vectors = [
            (simbox.v3z, Vector3::new(simbox.v3x, simbox.v3y, simbox.v3z), 2),
            (simbox.v2y, Vector3::new(simbox.v2x, simbox.v2y, simbox.v2z), 1),
            (simbox.v1x, Vector3::new(simbox.v1x, simbox.v1y, simbox.v1z), 0),
        ];

        for (length, box_vector, dim) in box_vectors {
            let shift = (vector.0[dim] / length).round();
            vector.0 -= box_vector * shift;
        }

        vector
    }

    /// Calculate the geometric center of the provided points.
    /// Returns a null vector if no points are provided.
    pub fn center(points: &[Vector3D]) -> Vector3D {
        if points.is_empty() {
            return Vector3D::default();
        }

        let sum = points
            .iter()
            .fold(Vector3::zeros(), |acc: Vector3<f32>, p| acc + p.0);

        Vector3D(sum / points.len() as f32)
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn add(self, rhs: Vector3D) -> Self::Output {
        Vector3D(self.0 + rhs.0)
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn sub(self, rhs: Vector3D) -> Self::Output {
        Vector3D(self.0 - rhs.0)
    }
}

impl<'a> Sub<&'a Vector3D> for &'a Vector3D {
    type Output = Vector3D;

    #[inline]
    fn sub(self, rhs: &'a Vector3D) -> Self::Output {
        Vector3D(self.0 - rhs.0)
    }
}

impl AddAssign for Vector3D {
    #[inline]
    fn add_assign(&mut self, rhs: Vector3D) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Vector3D {
    #[inline]
    fn sub_assign(&mut self, rhs: Vector3D) {
        self.0 -= rhs.0;
    }
}

impl Mul<f32> for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn mul(self, rhs: f32) -> Self::Output {
        Vector3D(self.0 * rhs)
    }
}

impl Div<f32> for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn div(self, rhs: f32) -> Self::Output {
        Vector3D(self.0 / rhs)
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn fields() {
        let mut vec = Vector3D::new(1.0, 2.0, 3.0);
        assert_approx_eq!(f32, vec.x, 1.0);
        assert_approx_eq!(f32, vec.y, 2.0);
        assert_approx_eq!(f32, vec.z, 3.0);

        vec.x = 4.5;
        assert_approx_eq!(f32, vec.x, 4.5);
    }

    #[test]
    fn arithmetics() {
        let vec1 = Vector3D::new(1.0, 2.0, 3.0);
        let vec2 = Vector3D::new(-0.5, 1.0, 4.0);

        let sum = vec1 + vec2;
        assert_eq!(sum, Vector3D::new(0.5, 3.0, 7.0));

        let diff = &vec1 - &vec2;
        assert_eq!(diff, Vector3D::new(1.5, 1.0, -1.0));

        let mut acc = Vector3D::default();
        acc += vec1;
        acc -= vec2;
        assert_eq!(acc, diff);

        assert_eq!(vec1 * 2.0, Vector3D::new(2.0, 4.0, 6.0));
        assert_eq!(vec1 / 2.0, Vector3D::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn dot() {
        let vec1 = Vector3D::new(4.0, 2.0, -1.0);
        let vec2 = Vector3D::new(1.0, -3.0, 2.0);
        assert_approx_eq!(f32, vec1.dot(&vec2), -4.0);
    }

    #[test]
    fn center() {
        let points = [
            Vector3D::new(1.0, 0.0, 0.0),
            Vector3D::new(0.0, 1.0, 0.0),
            Vector3D::new(0.0, 0.0, 1.0),
            Vector3D::new(3.0, 3.0, 3.0),
        ];

        let center = Vector3D::center(&points);
        assert_approx_eq!(f32, center.x, 1.0);
        assert_approx_eq!(f32, center.y, 1.0);
        assert_approx_eq!(f32, center.z, 1.0);
    }

    #[test]
    fn center_empty() {
        assert!(Vector3D::center(&[]).is_zero());
    }

    #[test]
    fn vector_to_orthogonal() {
        let simbox = SimBox::from([5.0, 5.0, 5.0]);
        let point = Vector3D::new(0.2, 0.0, 4.9);

        let vector = point.vector_to(&Vector3D::new(4.9, 0.1, 0.3), &simbox);
        assert_approx_eq!(f32, vector.x, -0.3, epsilon = 1e-5);
        assert_approx_eq!(f32, vector.y, 0.1, epsilon = 1e-5);
        assert_approx_eq!(f32, vector.z, 0.4, epsilon = 1e-5);

        // periodic images are equivalent
        let vector = point.vector_to(&Vector3D::new(10.2, -5.0, 14.9), &simbox);
        assert_approx_eq!(f32, vector.len(), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn vector_to_triclinic() {
        let simbox = SimBox::from([4.0, 4.0, 4.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0]);
        let point = Vector3D::new(1.0, 0.5, 1.0);

        // shifted by the second box vector (2, 4, 0)
        let vector = point.vector_to(&Vector3D::new(3.1, 4.5, 1.0), &simbox);
        assert_approx_eq!(f32, vector.x, 0.1, epsilon = 1e-5);
        assert_approx_eq!(f32, vector.y, 0.0, epsilon = 1e-5);
        assert_approx_eq!(f32, vector.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    #[should_panic]
    fn vector_to_zero_box() {
        Vector3D::new(1.0, 1.0, 1.0).vector_to(&Vector3D::default(), &SimBox::from([5.0, 0.0, 5.0]));
    }
}
