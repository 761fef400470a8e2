// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the SimBox structure and its methods.

use crate::structures::vector3d::Vector3D;

/// Structure defining simulation box shape and dimensions.
/// The order and meaning of the fields is the same as in a gro file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimBox {
    pub v1x: f32,
    pub v2y: f32,
    pub v3z: f32,
    pub v1y: f32,
    pub v1z: f32,
    pub v2x: f32,
    pub v2z: f32,
    pub v3x: f32,
    pub v3y: f32,
}

impl From<[f32; 9]> for SimBox {
    /// Convert 9-member array to SimBox structure.
    /// The order of the members of the array should be the same as in a gro file.
    fn from(arr: [f32; 9]) -> Self {
        SimBox {
            v1x: arr[0],
            v2y: arr[1],
            v3z: arr[2],
            v1y: arr[3],
            v1z: arr[4],
            v2x: arr[5],
            v2z: arr[6],
            v3x: arr[7],
            v3y: arr[8],
        }
    }
}

impl From<[f32; 3]> for SimBox {
    /// Convert 3-member array to SimBox structure. Last 6 values of SimBox are set to 0.
    fn from(arr: [f32; 3]) -> Self {
        SimBox {
            v1x: arr[0],
            v2y: arr[1],
            v3z: arr[2],
            ..Default::default()
        }
    }
}

impl SimBox {
    /// Create new simulation box from lengths and angles (in degrees).
    ///
    /// ## Example
    /// ```
    /// # use flexan::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let simbox = SimBox::from_lengths_angles([5.0, 4.0, 3.0].into(), [80.0, 70.0, 120.0].into());
    ///
    /// assert_approx_eq!(f32, simbox.v1x,  5.000000, epsilon = 0.0001);
    /// assert_approx_eq!(f32, simbox.v2y,  3.464102, epsilon = 0.0001);
    /// assert_approx_eq!(f32, simbox.v3z,  2.553768, epsilon = 0.0001);
    /// assert_approx_eq!(f32, simbox.v2x, -2.000000, epsilon = 0.0001);
    /// assert_approx_eq!(f32, simbox.v3x,  1.026060, epsilon = 0.0001);
    /// assert_approx_eq!(f32, simbox.v3y,  1.193930, epsilon = 0.0001);
    /// ```
    ///
    /// ## Notes
    /// - Adapted from Tsjerk Wassenaar's `triclinic` function:
    ///   <https://www.mail-archive.com/gmx-users@gromacs.org/msg28032.html>
    pub fn from_lengths_angles(lengths: Vector3D, angles: Vector3D) -> Self {
        let mut simbox = SimBox {
            v1x: lengths.x,
            ..Default::default()
        };

        if angles.x == 90.0 && angles.y == 90.0 && angles.z == 90.0 {
            simbox.v2y = lengths.y;
            simbox.v3z = lengths.z;
        } else {
            let alpha = angles.x.to_radians();
            let beta = angles.y.to_radians();
            let gamma = angles.z.to_radians();

            simbox.v2x = lengths.y * gamma.cos();
            simbox.v2y = lengths.y * gamma.sin();

            simbox.v3x = lengths.z * beta.cos();
            simbox.v3y = lengths.z * (alpha.cos() - beta.cos() * gamma.cos()) / gamma.sin();
            simbox.v3z =
                (lengths.z * lengths.z - simbox.v3x * simbox.v3x - simbox.v3y * simbox.v3y).sqrt();
        }

        simbox
    }

    /// Multiply all box vectors by a constant. Used for unit conversions.
    pub fn scale(mut self, factor: f32) -> Self {
        for value in [
            &mut self.v1x,
            &mut self.v2y,
            &mut self.v3z,
            &mut self.v1y,
            &mut self.v1z,
            &mut self.v2x,
            &mut self.v2z,
            &mut self.v3x,
            &mut self.v3y,
        ] {
            *value *= factor;
        }

        self
    }

    /// Check whether the simulation box is orthogonal.
    pub fn is_orthogonal(&self) -> bool {
        self.v1y == 0.0
            && self.v1z == 0.0
            && self.v2x == 0.0
            && self.v2z == 0.0
            && self.v3x == 0.0
            && self.v3y == 0.0
    }

    /// Check whether the box can be used for periodic boundary conditions,
    /// i.e. all diagonal dimensions are positive.
    pub fn is_periodic(&self) -> bool {
        self.v1x > 0.0 && self.v2y > 0.0 && self.v3z > 0.0
    }

    /// Check whether all dimensions of the simulation box are zero.
    pub fn is_zero(&self) -> bool {
        self.v1x == 0.0 && self.v2y == 0.0 && self.v3z == 0.0 && self.is_orthogonal()
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
