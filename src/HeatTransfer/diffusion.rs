//! # Diffusion operator
//!
//! Right-hand side of the semi-discrete heat equation
//!
//! ```text
//! ρ(Θ) c(Θ) ∂Θ/∂t = ∇·(λ(Θ) ∇Θ)
//! ```
//!
//! on a uniform cell-centred grid. For cell `i` and each axis `a` with spacing `Δa`:
//!
//! * neighbour `j` inside the domain contributes `λf (Θj - Θi) / Δa²`, where `λf` is the
//!   arithmetic mean of `λ(Θi, a)` and `λ(Θj, a)`;
//! * a missing neighbour (domain face) contributes the face emission flux
//!   `q(Θi) / Δa`.
//!
//! The sum is divided by `ρ(Θi) c(Θi)`. With constant properties this is the classic
//! second-order central difference. The face conductivity is shared by both cells, so
//! interior exchange cancels pairwise and the stored heat of an insulated body is
//! conserved.
//!
//! The operator keeps no state between calls. [`HeatProblem`] bundles geometry, material
//! and boundary and exposes the operator through [`RightHandSide`], the callback
//! contract expected by time integrators: `rhs(dy, y, t)` writes `dy` in place and is
//! deterministic for identical inputs.
use crate::HeatTransfer::emission::Boundary;
use crate::HeatTransfer::geometry::{Geometry, Neighbor};
use crate::HeatTransfer::heat_error::HeatError;
use crate::HeatTransfer::materials::{Material, PropertyModel};
use log::info;
use nalgebra::DVector;

/// Callback contract of an ODE right-hand side `dy/dt = f(t, y)`
pub trait RightHandSide {
    /// length of the state vector
    fn dimension(&self) -> usize;
    /// writes f(t, y) into `dy`
    fn rhs(&self, dy: &mut [f64], y: &[f64], t: f64);
}

/// Computes ∂Θ/∂t for every cell of `geometry` and writes it into `dtheta`.
///
/// `theta` and `dtheta` must both hold `geometry.cell_count()` entries.
pub fn diffusion(
    dtheta: &mut [f64],
    theta: &[f64],
    geometry: &Geometry,
    material: &Material,
    boundary: &Boundary,
) {
    debug_assert_eq!(theta.len(), geometry.cell_count());
    debug_assert_eq!(dtheta.len(), geometry.cell_count());
    let dimension = geometry.dimension();
    for (i, out) in dtheta.iter_mut().enumerate() {
        let t_i = theta[i];
        let own = material.properties(t_i, 0);
        // net heat gain per unit volume, W/m³
        let mut gain = 0.0;
        for axis in 0..dimension {
            let dx = geometry.sampling(axis);
            let lambda_i = if axis == 0 {
                own.conductivity
            } else {
                material.properties(t_i, axis).conductivity
            };
            for upper in [false, true] {
                match geometry.neighbor(i, axis, upper) {
                    Neighbor::Cell(j) => {
                        let t_j = theta[j];
                        let lambda_j = material.properties(t_j, axis).conductivity;
                        gain += 0.5 * (lambda_i + lambda_j) * (t_j - t_i) / (dx * dx);
                    }
                    Neighbor::Boundary(face) => {
                        gain += boundary.flux(face, t_i) / dx;
                    }
                }
            }
        }
        *out = gain / own.heat_capacity();
    }
}

/// Geometry + material + boundary, validated against each other
#[derive(Debug, Clone, PartialEq)]
pub struct HeatProblem {
    pub geometry: Geometry,
    pub material: Material,
    pub boundary: Boundary,
}

impl HeatProblem {
    /// # Errors
    /// `UnknownFace` if the boundary was built for another dimensionality,
    /// `InvalidMaterial` if the material fails its constructor checks or an anisotropic
    /// material has the wrong number of axes.
    pub fn new(
        geometry: Geometry,
        material: Material,
        boundary: Boundary,
    ) -> Result<Self, HeatError> {
        boundary.validate_for(&geometry)?;
        material.validate()?;
        material.check_dimension(geometry.dimension())?;
        info!(
            "heat problem: {}D, {} cells, {} material, insulated: {}",
            geometry.dimension(),
            geometry.cell_count(),
            material.name(),
            boundary.is_insulated()
        );
        Ok(Self {
            geometry,
            material,
            boundary,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.geometry.cell_count()
    }

    pub fn check_state(&self, theta: &[f64]) -> Result<(), HeatError> {
        if theta.len() != self.cell_count() {
            return Err(HeatError::StateSizeMismatch {
                expected: self.cell_count(),
                found: theta.len(),
            });
        }
        Ok(())
    }

    /// every cell at `theta`
    pub fn uniform_state(&self, theta: f64) -> DVector<f64> {
        DVector::from_element(self.cell_count(), theta)
    }

    /// Allocating wrapper around [`diffusion`] with a size check.
    pub fn derivative(&self, theta: &[f64]) -> Result<DVector<f64>, HeatError> {
        self.check_state(theta)?;
        let mut d = DVector::zeros(self.cell_count());
        diffusion(
            d.as_mut_slice(),
            theta,
            &self.geometry,
            &self.material,
            &self.boundary,
        );
        Ok(d)
    }

    /// stored heat Σ V·∫₀^Θ ρc dΘ, J (per m² for plates, per m² of cross-section for rods)
    pub fn total_energy(&self, theta: &[f64]) -> f64 {
        let v = self.geometry.cell_volume();
        theta
            .iter()
            .map(|&t| v * self.material.volumetric_enthalpy(t))
            .sum()
    }

    /// Temperature range a run starting from `theta` can reach: the initial extremes
    /// widened by every exchanging face's ambient temperature.
    pub fn temperature_range(&self, theta: &[f64]) -> (f64, f64) {
        let init = theta
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| {
                (lo.min(t), hi.max(t))
            });
        match self.boundary.ambient_range() {
            Some((a_lo, a_hi)) => (init.0.min(a_lo), init.1.max(a_hi)),
            None => init,
        }
    }
}

impl RightHandSide for HeatProblem {
    fn dimension(&self) -> usize {
        self.cell_count()
    }

    fn rhs(&self, dy: &mut [f64], y: &[f64], _t: f64) {
        diffusion(dy, y, &self.geometry, &self.material, &self.boundary);
    }
}
