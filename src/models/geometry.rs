//! Minimal 3D geometry primitives for describing spawn volumes and arena
//! sizes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Componentwise `<=`.
    pub fn le(&self, other: &Vector3D) -> bool {
        self.x <= other.x && self.y <= other.y && self.z <= other.z
    }

    /// Componentwise `>=`.
    pub fn ge(&self, other: &Vector3D) -> bool {
        self.x >= other.x && self.y >= other.y && self.z >= other.z
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    fn add(self, rhs: Vector3D) -> Vector3D {
        Vector3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    fn sub(self, rhs: Vector3D) -> Vector3D {
        Vector3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Vector3D;

    fn mul(self, rhs: f64) -> Vector3D {
        Vector3D::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl fmt::Display for Vector3D {
    /// The attribute form simulators expect: `"x, y, z"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

/// An axis-aligned volume: `ur = origin + dims`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaExtent {
    pub origin: Vector3D,
    pub dims: Vector3D,
}

impl ArenaExtent {
    /// Extent anchored at the origin.
    pub fn new(dims: Vector3D) -> Self {
        Self {
            origin: Vector3D::zero(),
            dims,
        }
    }

    pub fn with_origin(origin: Vector3D, dims: Vector3D) -> Self {
        Self { origin, dims }
    }

    pub fn ll(&self) -> Vector3D {
        self.origin
    }

    pub fn ur(&self) -> Vector3D {
        self.origin + self.dims
    }

    pub fn center(&self) -> Vector3D {
        self.origin + self.dims * 0.5
    }

    /// XY footprint area.
    pub fn area(&self) -> f64 {
        self.dims.x * self.dims.y
    }

    pub fn contains(&self, pt: &Vector3D) -> bool {
        pt.ge(&self.ll()) && pt.le(&self.ur())
    }
}
