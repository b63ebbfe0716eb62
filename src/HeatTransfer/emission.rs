//! # Boundary emission
//!
//! Heat exchange of a domain face with its surroundings: convection with heat-transfer
//! coefficient `h` [W/(m²·K)] plus grey-body radiation with emissivity `ε`, both towards
//! an ambient temperature `Θamb` [K]. The net flux density into the domain is
//!
//! ```text
//! q = h (Θamb - Θ) + ε σ (Θamb⁴ - Θ⁴)
//! ```
//!
//! A [`Boundary`] holds one [`Emission`] per face; faces never configured stay insulated.
use crate::HeatTransfer::geometry::{Face, Geometry};
use crate::HeatTransfer::heat_error::HeatError;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::debug;
use serde::{Deserialize, Serialize};

/// Stefan–Boltzmann constant, W/(m²·K⁴)
pub const STEFAN_BOLTZMANN: f64 = 5.670374419e-8;

/// Convective + radiative exchange descriptor for a face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    /// heat-transfer coefficient h, W/(m²·K)
    pub coefficient: f64,
    /// emissivity ε, 0..1
    pub emissivity: f64,
    /// ambient temperature, K
    pub ambient: f64,
}

impl Default for Emission {
    fn default() -> Self {
        Self::insulated()
    }
}

impl Emission {
    /// # Errors
    /// `InvalidEmission` for a negative coefficient, emissivity outside [0, 1] or
    /// a non-positive ambient temperature.
    pub fn new(coefficient: f64, emissivity: f64, ambient: f64) -> Result<Self, HeatError> {
        if !(coefficient >= 0.0) || !coefficient.is_finite() {
            return Err(HeatError::InvalidEmission(format!(
                "heat-transfer coefficient must be non-negative, got {}",
                coefficient
            )));
        }
        if !(0.0..=1.0).contains(&emissivity) {
            return Err(HeatError::InvalidEmission(format!(
                "emissivity must lie in [0, 1], got {}",
                emissivity
            )));
        }
        if !(ambient > 0.0) || !ambient.is_finite() {
            return Err(HeatError::InvalidEmission(format!(
                "ambient temperature must be positive (absolute scale), got {}",
                ambient
            )));
        }
        Ok(Self {
            coefficient,
            emissivity,
            ambient,
        })
    }

    /// no exchange at all
    pub const fn insulated() -> Self {
        Self {
            coefficient: 0.0,
            emissivity: 0.0,
            ambient: 300.0,
        }
    }

    pub fn is_insulated(&self) -> bool {
        self.coefficient == 0.0 && self.emissivity == 0.0
    }

    /// net flux density into the domain at surface temperature `theta`, W/m²
    pub fn flux(&self, theta: f64) -> f64 {
        let convective = self.coefficient * (self.ambient - theta);
        let radiative =
            self.emissivity * STEFAN_BOLTZMANN * (self.ambient.powi(4) - theta.powi(4));
        convective + radiative
    }

    /// symbolic counterpart of [`Emission::flux`]
    pub fn flux_sym(&self, theta: &Expr) -> Expr {
        let mut terms: Vec<Expr> = Vec::new();
        if self.coefficient != 0.0 {
            terms.push(
                Expr::Const(self.coefficient) * (Expr::Const(self.ambient) - theta.clone()),
            );
        }
        if self.emissivity != 0.0 {
            let theta4 = Expr::Pow(Box::new(theta.clone()), Box::new(Expr::Const(4.0)));
            terms.push(
                Expr::Const(self.emissivity * STEFAN_BOLTZMANN)
                    * (Expr::Const(self.ambient.powi(4)) - theta4),
            );
        }
        terms
            .into_iter()
            .reduce(|a, b| a + b)
            .unwrap_or(Expr::Const(0.0))
    }
}

/// Per-face emission table of a geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    dimension: usize,
    faces: [Emission; 6],
}

impl Boundary {
    /// every face of `geometry` insulated
    pub fn new(geometry: &Geometry) -> Self {
        Self::with_dimension(geometry.dimension())
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            faces: [Emission::insulated(); 6],
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Assigns or replaces the emission of `face`.
    ///
    /// # Errors
    /// `UnknownFace` if `face` does not exist for this dimensionality.
    pub fn set_emission(&mut self, face: Face, emission: Emission) -> Result<(), HeatError> {
        if !face.is_valid_for(self.dimension) {
            return Err(HeatError::UnknownFace {
                face: face.to_string(),
                dimension: self.dimension,
            });
        }
        debug!(
            "emission on {} face: h = {}, eps = {}, ambient = {}",
            face, emission.coefficient, emission.emissivity, emission.ambient
        );
        self.faces[face.slot()] = emission;
        Ok(())
    }

    /// same as [`Boundary::set_emission`] with the face given by name
    pub fn set_emission_by_name(&mut self, face: &str, emission: Emission) -> Result<(), HeatError> {
        let face: Face = face.parse().map_err(|_| HeatError::UnknownFace {
            face: face.to_string(),
            dimension: self.dimension,
        })?;
        self.set_emission(face, emission)
    }

    /// same emission on every face of the geometry
    pub fn set_all(&mut self, emission: Emission) {
        for face in Face::faces_for(self.dimension) {
            self.faces[face.slot()] = emission;
        }
    }

    pub fn emission(&self, face: Face) -> &Emission {
        &self.faces[face.slot()]
    }

    /// net boundary flux density into the domain through `face`, W/m²
    pub fn flux(&self, face: Face, theta: f64) -> f64 {
        self.faces[face.slot()].flux(theta)
    }

    pub fn is_insulated(&self) -> bool {
        Face::faces_for(self.dimension)
            .iter()
            .all(|f| self.faces[f.slot()].is_insulated())
    }

    /// lowest and highest ambient temperature among exchanging faces
    pub fn ambient_range(&self) -> Option<(f64, f64)> {
        Face::faces_for(self.dimension)
            .iter()
            .map(|f| &self.faces[f.slot()])
            .filter(|e| !e.is_insulated())
            .fold(None, |acc, e| match acc {
                None => Some((e.ambient, e.ambient)),
                Some((lo, hi)) => Some((lo.min(e.ambient), hi.max(e.ambient))),
            })
    }

    pub fn validate_for(&self, geometry: &Geometry) -> Result<(), HeatError> {
        if self.dimension != geometry.dimension() {
            return Err(HeatError::UnknownFace {
                face: format!("boundary of a {}D geometry", self.dimension),
                dimension: geometry.dimension(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unset_face_exchanges_nothing() {
        let b = Boundary::new(&Geometry::cuboid([1.0; 3], [2; 3]).unwrap());
        for face in Face::ALL {
            for theta in [1.0, 300.0, 1200.0] {
                assert_eq!(b.flux(face, theta), 0.0);
            }
        }
        assert!(b.is_insulated());
        assert_eq!(b.ambient_range(), None);
    }

    #[test]
    fn no_flux_at_ambient() {
        let mut b = Boundary::new(&Geometry::plate([1.0, 1.0], [2, 2]).unwrap());
        for (k, eps, amb) in [(5.0, 0.2, 300.0), (0.0, 1.0, 1500.0), (250.0, 0.0, 77.0)] {
            b.set_emission(Face::North, Emission::new(k, eps, amb).unwrap())
                .unwrap();
            assert_relative_eq!(b.flux(Face::North, amb), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn flux_sums_convection_and_radiation() {
        let e = Emission::new(10.0, 0.5, 300.0).unwrap();
        let theta: f64 = 600.0;
        let expected = 10.0 * (300.0 - 600.0)
            + 0.5 * STEFAN_BOLTZMANN * (300.0_f64.powi(4) - theta.powi(4));
        assert_relative_eq!(e.flux(theta), expected, epsilon = 1e-9);
        assert!(e.flux(theta) < 0.0);
        assert!(e.flux(200.0) > 0.0);
    }

    #[test]
    fn set_emission_respects_dimension() {
        let mut b = Boundary::new(&Geometry::rod(1.0, 3).unwrap());
        let e = Emission::new(5.0, 0.2, 300.0).unwrap();
        assert!(b.set_emission(Face::West, e).is_ok());
        assert!(matches!(
            b.set_emission(Face::North, e),
            Err(HeatError::UnknownFace { dimension: 1, .. })
        ));
        assert!(matches!(
            b.set_emission_by_name("skyward", e),
            Err(HeatError::UnknownFace { .. })
        ));
        assert!(b.set_emission_by_name("East", e).is_ok());
        assert_eq!(b.emission(Face::East), &e);
        assert_eq!(b.ambient_range(), Some((300.0, 300.0)));
    }

    #[test]
    fn set_emission_replaces_previous() {
        let mut b = Boundary::with_dimension(2);
        b.set_all(Emission::new(5.0, 0.1, 280.0).unwrap());
        b.set_emission(Face::South, Emission::insulated()).unwrap();
        assert!(b.emission(Face::South).is_insulated());
        assert_eq!(b.emission(Face::North).coefficient, 5.0);
        assert!(b.emission(Face::Top).is_insulated());
    }

    #[test]
    fn emission_validation() {
        assert!(Emission::new(-1.0, 0.5, 300.0).is_err());
        assert!(Emission::new(1.0, 1.5, 300.0).is_err());
        assert!(Emission::new(1.0, -0.1, 300.0).is_err());
        assert!(Emission::new(1.0, 0.5, 0.0).is_err());
        assert!(Emission::new(0.0, 0.0, 300.0).unwrap().is_insulated());
    }
}
