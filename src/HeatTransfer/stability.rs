//! Step-size limit of fixed-step explicit schemes for the diffusion operator.
//!
//! For forward Euler the scheme is stable when
//!
//! ```text
//! Δt ≤ 0.5 / Σa αa/Δa²,   αa = λa/(ρc)
//! ```
//!
//! For temperature-dependent materials the bound is taken as the smallest value over
//! the temperature range the run can reach. Boundary exchange is not included.
use crate::HeatTransfer::geometry::Geometry;
use crate::HeatTransfer::heat_error::HeatError;
use crate::HeatTransfer::materials::{Material, PropertyModel};
use log::{info, warn};

const RANGE_SAMPLES: usize = 33;

/// stability bound at a single temperature
fn bound_at(geometry: &Geometry, material: &Material, theta: f64) -> f64 {
    let rate: f64 = (0..geometry.dimension())
        .map(|axis| {
            let dx = geometry.sampling(axis);
            material.diffusivity(theta, axis) / (dx * dx)
        })
        .sum();
    if rate > 0.0 { 0.5 / rate } else { f64::INFINITY }
}

/// Largest stable explicit step for temperatures in `[t_min, t_max]`.
pub fn stability_bound(geometry: &Geometry, material: &Material, t_min: f64, t_max: f64) -> f64 {
    if material.is_static() || t_min == t_max {
        return bound_at(geometry, material, t_min);
    }
    (0..RANGE_SAMPLES)
        .map(|k| t_min + (t_max - t_min) * k as f64 / (RANGE_SAMPLES - 1) as f64)
        .map(|theta| bound_at(geometry, material, theta))
        .fold(f64::INFINITY, f64::min)
}

/// Fails with `NumericalInstability` when `step` exceeds the stability bound; returns the
/// bound otherwise. The step is never adjusted here.
pub fn check_explicit_step(
    step: f64,
    geometry: &Geometry,
    material: &Material,
    t_min: f64,
    t_max: f64,
) -> Result<f64, HeatError> {
    let bound = stability_bound(geometry, material, t_min, t_max);
    if step > bound {
        warn!(
            "explicit step {:e} s is above the stability bound {:e} s",
            step, bound
        );
        return Err(HeatError::NumericalInstability { step, bound });
    }
    info!("explicit step {:e} s, stability bound {:e} s", step, bound);
    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeatTransfer::materials::{DynamicIsotropic, StaticAnisotropic, StaticIsotropic};
    use approx::assert_relative_eq;

    #[test]
    fn rod_bound_is_half_dx2_over_alpha() {
        let g = Geometry::rod(0.2, 40).unwrap();
        let m: Material = StaticIsotropic::new(45.0, 7800.0, 480.0).unwrap().into();
        let alpha = 45.0 / (7800.0 * 480.0);
        let dx = 0.2 / 40.0;
        let bound = stability_bound(&g, &m, 300.0, 600.0);
        assert_relative_eq!(bound, 0.5 * dx * dx / alpha, epsilon = 1e-12);
        assert!(check_explicit_step(0.9 * bound, &g, &m, 300.0, 600.0).is_ok());
        match check_explicit_step(1.1 * bound, &g, &m, 300.0, 600.0) {
            Err(HeatError::NumericalInstability { step, bound: b }) => {
                assert_relative_eq!(step, 1.1 * bound);
                assert_relative_eq!(b, bound);
            }
            other => panic!("expected NumericalInstability, got {:?}", other),
        }
    }

    #[test]
    fn plate_bound_sums_axes() {
        let g = Geometry::plate([0.1, 0.2], [10, 10]).unwrap();
        let m: Material = StaticAnisotropic::new(vec![40.0, 10.0], 8000.0, 500.0)
            .unwrap()
            .into();
        let rc = 8000.0 * 500.0;
        let expected = 0.5 / (40.0 / rc / (0.01 * 0.01) + 10.0 / rc / (0.02 * 0.02));
        assert_relative_eq!(stability_bound(&g, &m, 300.0, 300.0), expected, epsilon = 1e-12);
    }

    #[test]
    fn dynamic_bound_uses_worst_temperature() {
        let g = Geometry::rod(0.1, 10).unwrap();
        // λ grows with Θ, so the hottest sample limits the step
        let m: Material = DynamicIsotropic::new(vec![10.0, 0.1], vec![8000.0], vec![500.0])
            .unwrap()
            .into();
        let dx: f64 = 0.01;
        let hot = 0.5 * dx * dx / ((10.0 + 0.1 * 900.0) / (8000.0 * 500.0));
        assert_relative_eq!(stability_bound(&g, &m, 300.0, 900.0), hot, epsilon = 1e-9);
    }

    #[test]
    fn zero_conductivity_has_no_bound() {
        let g = Geometry::rod(1.0, 5).unwrap();
        let m: Material = StaticIsotropic::new(0.0, 1.0, 1.0).unwrap().into();
        assert!(stability_bound(&g, &m, 300.0, 300.0).is_infinite());
    }
}
