use crate::three_vector::ThreeVector;

use noisy_float::prelude::*;
use serde::{Deserialize, Serialize};

/// A basic four-vector
///
/// The zero component is the energy/time component. The remainder are
/// the spatial components
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
pub struct FourVector {
    p: [N64; 4],
}

impl FourVector {
    /// Construct a new four-vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a four-vector from its time and spatial components
    pub fn from_spatial(t: N64, v: ThreeVector) -> Self {
        Self {
            p: [t, v.x(), v.y(), v.z()],
        }
    }

    /// The spatial components
    pub fn spatial(&self) -> ThreeVector {
        [self.p[1], self.p[2], self.p[3]].into()
    }

    /// The euclidean norm \sqrt{\sum v_\mu^2} with \mu = 0,1,2,3
    pub fn euclid_norm(&self) -> N64 {
        self.euclid_norm_sq().sqrt()
    }

    /// The square \sum v_\mu^2 with \mu = 0,1,2,3 of the euclidean norm
    pub fn euclid_norm_sq(&self) -> N64 {
        self.p.iter().map(|e| *e * *e).sum()
    }

    /// The spatial norm \sqrt{\sum v_i^2} with i = 1,2,3
    pub fn spatial_norm(&self) -> N64 {
        self.spatial_norm_sq().sqrt()
    }

    /// The square \sum v_i^2 with i = 1,2,3 of the spatial norm
    pub fn spatial_norm_sq(&self) -> N64 {
        self.p.iter().skip(1).map(|e| *e * *e).sum()
    }

    /// The invariant mass \sqrt{v_0^2 - \sum v_i^2} with i = 1,2,3
    pub fn m(&self) -> N64 {
        self.m_sq().sqrt()
    }

    /// The invariant mass square v_0^2 - \sum v_i^2 with i = 1,2,3
    pub fn m_sq(&self) -> N64 {
        self.p[0] * self.p[0] - self.spatial_norm_sq()
    }

    const fn len() -> usize {
        4
    }
}

impl From<[N64; 4]> for FourVector {
    fn from(p: [N64; 4]) -> FourVector {
        FourVector { p }
    }
}

impl std::ops::Index<usize> for FourVector {
    type Output = N64;

    fn index(&self, i: usize) -> &Self::Output {
        &self.p[i]
    }
}

impl std::ops::AddAssign for FourVector {
    fn add_assign(&mut self, rhs: FourVector) {
        for i in 0..Self::len() {
            self.p[i] += rhs[i]
        }
    }
}

impl std::ops::SubAssign for FourVector {
    fn sub_assign(&mut self, rhs: FourVector) {
        for i in 0..Self::len() {
            self.p[i] -= rhs[i]
        }
    }
}

impl std::ops::Add for FourVector {
    type Output = Self;

    fn add(mut self, rhs: FourVector) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::ops::Sub for FourVector {
    type Output = Self;

    fn sub(mut self, rhs: FourVector) -> Self::Output {
        self -= rhs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass() {
        let p: FourVector = [n64(5.), n64(0.), n64(3.), n64(0.)].into();
        assert_eq!(p.m(), n64(4.));
        assert_eq!(p.spatial_norm(), n64(3.));
        assert_eq!(p.spatial().y(), n64(3.));
    }

    #[test]
    fn massless() {
        let q = ThreeVector::new(n64(1.), n64(2.), n64(2.));
        let p = FourVector::from_spatial(q.norm(), q);
        assert_eq!(p.m_sq(), n64(0.));
        assert_eq!(p[0], n64(3.));
    }
}
