//! # Material property models
//!
//! Thermal conductivity λ [W/(m·K)], density ρ [kg/m³] and specific heat c [J/(kg·K)]
//! either constant ("static") or polynomial in the local temperature Θ ("dynamic"),
//! and either the same on every axis ("isotropic") or with a separate conductivity per
//! axis ("anisotropic").
//!
//! All variants share the [`PropertyModel`] capability and are wrapped in the closed enum
//! [`Material`], dispatched with `enum_dispatch`.
//!
//! Polynomials take coefficients in ascending powers: `[a0, a1, a2]` → `a0 + a1*Θ + a2*Θ²`.
//!
//! ```rust,ignore
//! use HeatThe::HeatTransfer::materials::{Material, PropertyModel, StaticIsotropic};
//! let steel: Material = StaticIsotropic::new(45.0, 7800.0, 480.0)?.into();
//! let p = steel.properties(600.0, 0);
//! ```
use crate::HeatTransfer::heat_error::HeatError;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

/// number of temperature samples used to scan a range
const RANGE_SAMPLES: usize = 65;

/// λ, ρ, c at one point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalProperties {
    pub conductivity: f64,
    pub density: f64,
    pub specific_heat: f64,
}

impl ThermalProperties {
    /// ρ·c, J/(m³·K)
    pub fn heat_capacity(&self) -> f64 {
        self.density * self.specific_heat
    }
    /// α = λ/(ρc), m²/s
    pub fn diffusivity(&self) -> f64 {
        self.conductivity / self.heat_capacity()
    }
}

/// Polynomial in temperature, coefficients in ascending powers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polynomial {
    pub coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Horner evaluation
    pub fn eval(&self, theta: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &a| acc * theta + a)
    }

    /// same polynomial as a symbolic expression of `theta`
    pub fn to_expr(&self, theta: &Expr) -> Expr {
        let mut coeffs = self.coefficients.iter().rev();
        let Some(&leading) = coeffs.next() else {
            return Expr::Const(0.0);
        };
        coeffs.fold(Expr::Const(leading), |acc, &a| {
            acc * theta.clone() + Expr::Const(a)
        })
    }

    pub fn mul(&self, other: &Polynomial) -> Polynomial {
        if self.is_empty() || other.is_empty() {
            return Polynomial::new(Vec::new());
        }
        let mut c = vec![0.0; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in other.coefficients.iter().enumerate() {
                c[i + j] += a * b;
            }
        }
        Polynomial::new(c)
    }

    /// antiderivative vanishing at Θ = 0
    pub fn integral(&self) -> Polynomial {
        let mut c = Vec::with_capacity(self.coefficients.len() + 1);
        c.push(0.0);
        c.extend(
            self.coefficients
                .iter()
                .enumerate()
                .map(|(k, a)| a / (k as f64 + 1.0)),
        );
        Polynomial::new(c)
    }
}

#[enum_dispatch]
pub trait PropertyModel {
    /// λ (for `axis`), ρ and c at local temperature `theta`
    fn properties(&self, theta: f64, axis: usize) -> ThermalProperties;
    /// symbolic (λ, ρ, c) for the expression `theta`
    fn properties_sym(&self, theta: &Expr, axis: usize) -> (Expr, Expr, Expr);
    /// ∫₀^Θ ρ(s)c(s) ds, stored heat per unit volume relative to Θ = 0
    fn volumetric_enthalpy(&self, theta: f64) -> f64;
    fn is_static(&self) -> bool;
    /// number of conductivity axes for anisotropic models
    fn anisotropic_axes(&self) -> Option<usize>;

    fn diffusivity(&self, theta: f64, axis: usize) -> f64 {
        self.properties(theta, axis).diffusivity()
    }

    /// Scans `[t_min, t_max]` and fails if ρ or c become non-positive or λ negative.
    fn check_range(&self, t_min: f64, t_max: f64) -> Result<(), HeatError> {
        let (lo, hi) = if t_min <= t_max {
            (t_min, t_max)
        } else {
            (t_max, t_min)
        };
        let axes = self.anisotropic_axes().unwrap_or(1);
        for k in 0..RANGE_SAMPLES {
            let theta = lo + (hi - lo) * k as f64 / (RANGE_SAMPLES - 1) as f64;
            for axis in 0..axes {
                let p = self.properties(theta, axis);
                if !(p.density > 0.0) || !(p.specific_heat > 0.0) || !(p.conductivity >= 0.0) {
                    return Err(HeatError::InvalidMaterial(format!(
                        "at {} K on axis {}: conductivity {}, density {}, specific heat {}",
                        theta, axis, p.conductivity, p.density, p.specific_heat
                    )));
                }
            }
        }
        Ok(())
    }
}

fn check_static(conductivity: &[f64], density: f64, specific_heat: f64) -> Result<(), HeatError> {
    if conductivity.is_empty() || conductivity.iter().any(|l| !(*l >= 0.0)) {
        return Err(HeatError::InvalidMaterial(format!(
            "conductivity must be non-negative, got {:?}",
            conductivity
        )));
    }
    if !(density > 0.0) || !(specific_heat > 0.0) {
        return Err(HeatError::InvalidMaterial(format!(
            "density and specific heat must be positive, got {} and {}",
            density, specific_heat
        )));
    }
    Ok(())
}

fn check_polynomials(polys: &[&Polynomial]) -> Result<(), HeatError> {
    if polys.iter().any(|p| p.is_empty()) {
        return Err(HeatError::InvalidMaterial(
            "polynomial coefficient list is empty".to_string(),
        ));
    }
    Ok(())
}

/// pick the per-axis entry, falling back to the last one
fn per_axis<T>(values: &[T], axis: usize) -> &T {
    &values[axis.min(values.len() - 1)]
}

/// Constant λ, ρ, c
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticIsotropic {
    pub conductivity: f64,
    pub density: f64,
    pub specific_heat: f64,
}

impl StaticIsotropic {
    pub fn new(conductivity: f64, density: f64, specific_heat: f64) -> Result<Self, HeatError> {
        check_static(&[conductivity], density, specific_heat)?;
        Ok(Self {
            conductivity,
            density,
            specific_heat,
        })
    }
}

impl PropertyModel for StaticIsotropic {
    fn properties(&self, _theta: f64, _axis: usize) -> ThermalProperties {
        ThermalProperties {
            conductivity: self.conductivity,
            density: self.density,
            specific_heat: self.specific_heat,
        }
    }
    fn properties_sym(&self, _theta: &Expr, _axis: usize) -> (Expr, Expr, Expr) {
        (
            Expr::Const(self.conductivity),
            Expr::Const(self.density),
            Expr::Const(self.specific_heat),
        )
    }
    fn volumetric_enthalpy(&self, theta: f64) -> f64 {
        self.density * self.specific_heat * theta
    }
    fn is_static(&self) -> bool {
        true
    }
    fn anisotropic_axes(&self) -> Option<usize> {
        None
    }
}

/// λ(Θ), ρ(Θ), c(Θ) polynomials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicIsotropic {
    pub conductivity: Polynomial,
    pub density: Polynomial,
    pub specific_heat: Polynomial,
}

impl DynamicIsotropic {
    pub fn new(
        conductivity: Vec<f64>,
        density: Vec<f64>,
        specific_heat: Vec<f64>,
    ) -> Result<Self, HeatError> {
        let m = Self {
            conductivity: Polynomial::new(conductivity),
            density: Polynomial::new(density),
            specific_heat: Polynomial::new(specific_heat),
        };
        check_polynomials(&[&m.conductivity, &m.density, &m.specific_heat])?;
        Ok(m)
    }
}

impl PropertyModel for DynamicIsotropic {
    fn properties(&self, theta: f64, _axis: usize) -> ThermalProperties {
        ThermalProperties {
            conductivity: self.conductivity.eval(theta),
            density: self.density.eval(theta),
            specific_heat: self.specific_heat.eval(theta),
        }
    }
    fn properties_sym(&self, theta: &Expr, _axis: usize) -> (Expr, Expr, Expr) {
        (
            self.conductivity.to_expr(theta),
            self.density.to_expr(theta),
            self.specific_heat.to_expr(theta),
        )
    }
    fn volumetric_enthalpy(&self, theta: f64) -> f64 {
        self.density.mul(&self.specific_heat).integral().eval(theta)
    }
    fn is_static(&self) -> bool {
        false
    }
    fn anisotropic_axes(&self) -> Option<usize> {
        None
    }
}

/// constant per-axis λ, constant ρ and c
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticAnisotropic {
    pub conductivity: Vec<f64>,
    pub density: f64,
    pub specific_heat: f64,
}

impl StaticAnisotropic {
    pub fn new(
        conductivity: Vec<f64>,
        density: f64,
        specific_heat: f64,
    ) -> Result<Self, HeatError> {
        check_static(&conductivity, density, specific_heat)?;
        Ok(Self {
            conductivity,
            density,
            specific_heat,
        })
    }
}

impl PropertyModel for StaticAnisotropic {
    fn properties(&self, _theta: f64, axis: usize) -> ThermalProperties {
        ThermalProperties {
            conductivity: *per_axis(&self.conductivity, axis),
            density: self.density,
            specific_heat: self.specific_heat,
        }
    }
    fn properties_sym(&self, _theta: &Expr, axis: usize) -> (Expr, Expr, Expr) {
        (
            Expr::Const(*per_axis(&self.conductivity, axis)),
            Expr::Const(self.density),
            Expr::Const(self.specific_heat),
        )
    }
    fn volumetric_enthalpy(&self, theta: f64) -> f64 {
        self.density * self.specific_heat * theta
    }
    fn is_static(&self) -> bool {
        true
    }
    fn anisotropic_axes(&self) -> Option<usize> {
        Some(self.conductivity.len())
    }
}

/// per-axis λ(Θ) polynomials, ρ(Θ) and c(Θ) polynomials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicAnisotropic {
    pub conductivity: Vec<Polynomial>,
    pub density: Polynomial,
    pub specific_heat: Polynomial,
}

impl DynamicAnisotropic {
    pub fn new(
        conductivity: Vec<Vec<f64>>,
        density: Vec<f64>,
        specific_heat: Vec<f64>,
    ) -> Result<Self, HeatError> {
        if conductivity.is_empty() {
            return Err(HeatError::InvalidMaterial(
                "anisotropic conductivity needs at least one axis".to_string(),
            ));
        }
        let m = Self {
            conductivity: conductivity.into_iter().map(Polynomial::new).collect(),
            density: Polynomial::new(density),
            specific_heat: Polynomial::new(specific_heat),
        };
        let mut all: Vec<&Polynomial> = m.conductivity.iter().collect();
        all.push(&m.density);
        all.push(&m.specific_heat);
        check_polynomials(&all)?;
        Ok(m)
    }
}

impl PropertyModel for DynamicAnisotropic {
    fn properties(&self, theta: f64, axis: usize) -> ThermalProperties {
        ThermalProperties {
            conductivity: per_axis(&self.conductivity, axis).eval(theta),
            density: self.density.eval(theta),
            specific_heat: self.specific_heat.eval(theta),
        }
    }
    fn properties_sym(&self, theta: &Expr, axis: usize) -> (Expr, Expr, Expr) {
        (
            per_axis(&self.conductivity, axis).to_expr(theta),
            self.density.to_expr(theta),
            self.specific_heat.to_expr(theta),
        )
    }
    fn volumetric_enthalpy(&self, theta: f64) -> f64 {
        self.density.mul(&self.specific_heat).integral().eval(theta)
    }
    fn is_static(&self) -> bool {
        false
    }
    fn anisotropic_axes(&self) -> Option<usize> {
        Some(self.conductivity.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[enum_dispatch(PropertyModel)]
pub enum Material {
    StaticIsotropic(StaticIsotropic),
    DynamicIsotropic(DynamicIsotropic),
    StaticAnisotropic(StaticAnisotropic),
    DynamicAnisotropic(DynamicAnisotropic),
}

impl Material {
    /// `InvalidMaterial` when an anisotropic model does not have one conductivity per axis
    pub fn check_dimension(&self, dimension: usize) -> Result<(), HeatError> {
        match self.anisotropic_axes() {
            Some(n) if n != dimension => Err(HeatError::InvalidMaterial(format!(
                "anisotropic conductivity has {} axes, geometry has {}",
                n, dimension
            ))),
            _ => Ok(()),
        }
    }

    /// Re-runs the constructor checks, for materials that did not come through `new`
    /// (task files, struct literals, edited fields).
    pub fn validate(&self) -> Result<(), HeatError> {
        match self {
            Material::StaticIsotropic(m) => {
                check_static(&[m.conductivity], m.density, m.specific_heat)
            }
            Material::DynamicIsotropic(m) => {
                check_polynomials(&[&m.conductivity, &m.density, &m.specific_heat])
            }
            Material::StaticAnisotropic(m) => {
                check_static(&m.conductivity, m.density, m.specific_heat)
            }
            Material::DynamicAnisotropic(m) => {
                if m.conductivity.is_empty() {
                    return Err(HeatError::InvalidMaterial(
                        "anisotropic conductivity needs at least one axis".to_string(),
                    ));
                }
                let mut all: Vec<&Polynomial> = m.conductivity.iter().collect();
                all.push(&m.density);
                all.push(&m.specific_heat);
                check_polynomials(&all)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Material::StaticIsotropic(_) => "static isotropic",
            Material::DynamicIsotropic(_) => "dynamic isotropic",
            Material::StaticAnisotropic(_) => "static anisotropic",
            Material::DynamicAnisotropic(_) => "dynamic anisotropic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn static_isotropic_ignores_temperature_and_axis() {
        let m: Material = StaticIsotropic::new(45.0, 7800.0, 480.0).unwrap().into();
        let reference = m.properties(300.0, 0);
        for theta in [0.0, 273.15, 600.0, 1500.0] {
            for axis in 0..3 {
                assert_eq!(m.properties(theta, axis), reference);
            }
        }
        assert_relative_eq!(reference.diffusivity(), 45.0 / (7800.0 * 480.0));
        assert!(m.is_static());
    }

    #[test]
    fn dynamic_isotropic_is_linear_in_theta() {
        let m: Material = DynamicIsotropic::new(vec![10.0, 0.1], vec![7800.0], vec![330.0, 0.5])
            .unwrap()
            .into();
        for theta in [0.0, 300.0, 812.5] {
            let p = m.properties(theta, 1);
            assert_relative_eq!(p.conductivity, 10.0 + 0.1 * theta, epsilon = 1e-12);
            assert_relative_eq!(p.density, 7800.0);
            assert_relative_eq!(p.specific_heat, 330.0 + 0.5 * theta, epsilon = 1e-12);
        }
        assert!(!m.is_static());
    }

    #[test]
    fn anisotropic_selects_conductivity_by_axis() {
        let m: Material = StaticAnisotropic::new(vec![40.0, 20.0], 8000.0, 400.0)
            .unwrap()
            .into();
        assert_eq!(m.properties(500.0, 0).conductivity, 40.0);
        assert_eq!(m.properties(500.0, 1).conductivity, 20.0);
        assert_eq!(m.properties(500.0, 1).density, 8000.0);
        assert!(m.check_dimension(2).is_ok());
        assert!(m.check_dimension(3).is_err());

        let d: Material =
            DynamicAnisotropic::new(vec![vec![10.0, 0.1], vec![5.0]], vec![8000.0], vec![400.0])
                .unwrap()
                .into();
        assert_relative_eq!(d.properties(100.0, 0).conductivity, 20.0, epsilon = 1e-12);
        assert_relative_eq!(d.properties(100.0, 1).conductivity, 5.0);
    }

    #[test]
    fn constructors_validate() {
        assert!(StaticIsotropic::new(-1.0, 7800.0, 480.0).is_err());
        assert!(StaticIsotropic::new(45.0, 0.0, 480.0).is_err());
        assert!(StaticIsotropic::new(45.0, 7800.0, -2.0).is_err());
        assert!(StaticAnisotropic::new(vec![], 1.0, 1.0).is_err());
        assert!(DynamicIsotropic::new(vec![], vec![1.0], vec![1.0]).is_err());
        assert!(DynamicAnisotropic::new(vec![], vec![1.0], vec![1.0]).is_err());
    }

    #[test]
    fn validate_repeats_constructor_checks() {
        let ok: Material = StaticIsotropic::new(45.0, 7800.0, 480.0).unwrap().into();
        assert!(ok.validate().is_ok());
        let bad_density: Material = StaticIsotropic {
            conductivity: 45.0,
            density: -7800.0,
            specific_heat: 480.0,
        }
        .into();
        assert!(matches!(
            bad_density.validate(),
            Err(HeatError::InvalidMaterial(_))
        ));
        let bad_axes: Material = StaticAnisotropic {
            conductivity: vec![1.0, -2.0],
            density: 1.0,
            specific_heat: 1.0,
        }
        .into();
        assert!(bad_axes.validate().is_err());
        let empty: Material = DynamicIsotropic {
            conductivity: Polynomial::new(vec![10.0]),
            density: Polynomial::new(vec![]),
            specific_heat: Polynomial::constant(480.0),
        }
        .into();
        assert!(empty.validate().is_err());
        let no_axes: Material = DynamicAnisotropic {
            conductivity: vec![],
            density: Polynomial::constant(1.0),
            specific_heat: Polynomial::constant(1.0),
        }
        .into();
        assert!(no_axes.validate().is_err());
    }

    #[test]
    fn range_check_catches_negative_heat_capacity() {
        // c(Θ) = 500 - Θ turns negative above 500 K
        let m: Material = DynamicIsotropic::new(vec![10.0], vec![1000.0], vec![500.0, -1.0])
            .unwrap()
            .into();
        assert!(m.check_range(300.0, 400.0).is_ok());
        assert!(matches!(
            m.check_range(300.0, 600.0),
            Err(HeatError::InvalidMaterial(_))
        ));
    }

    #[test]
    fn polynomial_helpers() {
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]);
        assert_relative_eq!(p.eval(2.0), 1.0 + 4.0 + 12.0);
        let q = p.mul(&Polynomial::new(vec![0.0, 1.0]));
        assert_relative_eq!(q.eval(2.0), 2.0 * 17.0);
        let i = Polynomial::new(vec![2.0, 6.0]).integral();
        assert_relative_eq!(i.eval(1.0), 2.0 + 3.0);
        assert_eq!(Polynomial::new(vec![]).eval(5.0), 0.0);
    }

    #[test]
    fn enthalpy_matches_heat_capacity_for_static() {
        let m: Material = StaticIsotropic::new(45.0, 7800.0, 480.0).unwrap().into();
        assert_relative_eq!(m.volumetric_enthalpy(10.0), 7800.0 * 480.0 * 10.0);
        let d: Material = DynamicIsotropic::new(vec![1.0], vec![2.0], vec![3.0, 1.0])
            .unwrap()
            .into();
        // ∫ 2(3 + s) ds from 0 to 2 = 12 + 4
        assert_relative_eq!(d.volumetric_enthalpy(2.0), 16.0, epsilon = 1e-12);
    }

    #[test]
    fn material_round_trips_through_json() {
        let m: Material = StaticAnisotropic::new(vec![1.0, 2.0], 3.0, 4.0).unwrap().into();
        let text = serde_json::to_string(&m).unwrap();
        assert!(text.contains("StaticAnisotropic"));
        let back: Material = serde_json::from_str(&text).unwrap();
        assert_eq!(back, m);
    }
}
