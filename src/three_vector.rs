use noisy_float::prelude::*;
use serde::{Deserialize, Serialize};

/// A Cartesian three-vector
#[derive(
    Deserialize,
    Serialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    Clone,
    Copy,
    Default,
)]
pub struct ThreeVector {
    p: [N64; 3],
}

impl ThreeVector {
    pub fn new(x: N64, y: N64, z: N64) -> Self {
        Self { p: [x, y, z] }
    }

    pub fn x(&self) -> N64 {
        self.p[0]
    }

    pub fn y(&self) -> N64 {
        self.p[1]
    }

    pub fn z(&self) -> N64 {
        self.p[2]
    }

    /// The scalar product
    pub fn dot(&self, rhs: &ThreeVector) -> N64 {
        self.p.iter().zip(&rhs.p).map(|(a, b)| *a * *b).sum()
    }

    /// The vector product
    pub fn cross(&self, rhs: &ThreeVector) -> ThreeVector {
        let [x, y, z] = self.p;
        let [u, v, w] = rhs.p;
        Self::new(y * w - z * v, z * u - x * w, x * v - y * u)
    }

    /// The euclidean norm \sqrt{\sum v_i^2}
    pub fn norm(&self) -> N64 {
        self.norm_sq().sqrt()
    }

    /// The square \sum v_i^2 of the euclidean norm
    pub fn norm_sq(&self) -> N64 {
        self.dot(self)
    }

    /// Rescale to the given norm, keeping the direction
    ///
    /// The zero vector is returned unchanged.
    pub fn with_norm(self, norm: N64) -> Self {
        let old_norm = self.norm();
        if old_norm > 0. {
            self * (norm / old_norm)
        } else {
            self
        }
    }

    /// A vector perpendicular to `self`
    ///
    /// This replaces the component with the smallest magnitude, as in
    /// the usual smallest-component construction. The zero vector is
    /// its own orthogonal vector.
    pub fn orthogonal(&self) -> ThreeVector {
        let [x, y, z] = self.p;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let zero = n64(0.);
        if xx < yy {
            if xx < zz {
                Self::new(zero, z, -y)
            } else {
                Self::new(y, -x, zero)
            }
        } else if yy < zz {
            Self::new(-z, zero, x)
        } else {
            Self::new(y, -x, zero)
        }
    }

    /// Rodrigues rotation by `angle` around the given axis
    ///
    /// The axis need not be normalized. Rotating around the zero vector
    /// leaves `self` unchanged.
    pub fn rotated_around(self, axis: &ThreeVector, angle: f64) -> Self {
        let axis_norm = axis.norm();
        if !(axis_norm > 0.) {
            return self;
        }
        let k = *axis * (n64(1.) / axis_norm);
        let (sin, cos) = angle.sin_cos();
        let (sin, cos) = (n64(sin), n64(cos));
        self * cos
            + k.cross(&self) * sin
            + k * (k.dot(&self) * (n64(1.) - cos))
    }

    const fn len() -> usize {
        3
    }
}

impl From<[N64; 3]> for ThreeVector {
    fn from(p: [N64; 3]) -> Self {
        Self { p }
    }
}

impl std::ops::Index<usize> for ThreeVector {
    type Output = N64;

    fn index(&self, i: usize) -> &Self::Output {
        &self.p[i]
    }
}

impl std::ops::AddAssign for ThreeVector {
    fn add_assign(&mut self, rhs: ThreeVector) {
        for i in 0..Self::len() {
            self.p[i] += rhs[i]
        }
    }
}

impl std::ops::SubAssign for ThreeVector {
    fn sub_assign(&mut self, rhs: ThreeVector) {
        for i in 0..Self::len() {
            self.p[i] -= rhs[i]
        }
    }
}

impl std::ops::Add for ThreeVector {
    type Output = Self;

    fn add(mut self, rhs: ThreeVector) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::ops::Sub for ThreeVector {
    type Output = Self;

    fn sub(mut self, rhs: ThreeVector) -> Self::Output {
        self -= rhs;
        self
    }
}

impl std::ops::Mul<N64> for ThreeVector {
    type Output = Self;

    fn mul(mut self, rhs: N64) -> Self::Output {
        for i in 0..Self::len() {
            self.p[i] *= rhs
        }
        self
    }
}

impl std::ops::Neg for ThreeVector {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self * n64(-1.)
    }
}
