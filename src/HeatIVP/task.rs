//! # Task files
//!
//! A heat conduction run described in JSON:
//!
//! ```json
//! {
//!   "geometry": { "extents": [0.2], "cells": [40] },
//!   "material": { "StaticIsotropic": { "conductivity": 45.0, "density": 7800.0, "specific_heat": 480.0 } },
//!   "boundary": { "west": { "coefficient": 5.0, "emissivity": 0.2, "ambient": 300.0 } },
//!   "initial_temperature": 600.0,
//!   "time_span": [0.0, 300.0],
//!   "solver": { "Explicit": { "method": "RK4", "step": 0.5, "save_every": 20 } }
//! }
//! ```
//!
//! Faces missing from `boundary` are insulated. `solver` is either
//! `{"Explicit": {method, step, save_every}}` with method `Euler | Heun | RK4`, or
//! `{"Stiff": {method, rtol, atol, max_step}}` with method `BDF | Radau | BackwardEuler`.
use crate::HeatIVP::explicit::{ExplicitMethod, ExplicitSolver};
use crate::HeatIVP::solution::HeatSolution;
use crate::HeatIVP::stiff::HeatModelIVP;
use crate::HeatTransfer::diffusion::HeatProblem;
use crate::HeatTransfer::emission::{Boundary, Emission};
use crate::HeatTransfer::geometry::Geometry;
use crate::HeatTransfer::heat_error::HeatError;
use crate::HeatTransfer::materials::Material;
use RustedSciThe::numerical::ODE_api2::{SolverParam, SolverType};
use RustedSciThe::numerical::Radau::Radau_main::RadauOrder;
use log::info;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometrySpec {
    pub extents: Vec<f64>,
    pub cells: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StiffMethod {
    BDF,
    Radau,
    BackwardEuler,
}

impl StiffMethod {
    pub fn solver_type(&self) -> SolverType {
        match self {
            StiffMethod::BDF => SolverType::BDF,
            StiffMethod::Radau => SolverType::Radau(RadauOrder::Order7),
            StiffMethod::BackwardEuler => SolverType::BackwardEuler,
        }
    }
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SolverSpec {
    Explicit {
        method: ExplicitMethod,
        step: f64,
        #[serde(default = "one")]
        save_every: usize,
    },
    Stiff {
        method: StiffMethod,
        #[serde(default)]
        rtol: Option<f64>,
        #[serde(default)]
        atol: Option<f64>,
        #[serde(default)]
        max_step: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatTask {
    pub geometry: GeometrySpec,
    pub material: Material,
    /// face name -> emission; missing faces are insulated
    #[serde(default)]
    pub boundary: BTreeMap<String, Emission>,
    pub initial_temperature: f64,
    pub time_span: (f64, f64),
    pub solver: SolverSpec,
}

impl HeatTask {
    pub fn from_json(text: &str) -> Result<Self, HeatError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &str) -> Result<Self, HeatError> {
        let text = fs::read_to_string(path)?;
        let task = Self::from_json(&text)?;
        info!("task loaded from '{}'", path);
        Ok(task)
    }

    pub fn to_file(&self, path: &str) -> Result<(), HeatError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Validated problem and initial field.
    ///
    /// Every part is checked the same way as when built in code: geometry extents and
    /// counts, emission values, face names against the dimensionality, material values
    /// and axes.
    pub fn build(&self) -> Result<(HeatProblem, DVector<f64>), HeatError> {
        let geometry = Geometry::new(self.geometry.extents.clone(), self.geometry.cells.clone())?;
        self.material.validate()?;
        let mut boundary = Boundary::new(&geometry);
        for (face, e) in &self.boundary {
            let emission = Emission::new(e.coefficient, e.emissivity, e.ambient)?;
            boundary.set_emission_by_name(face, emission)?;
        }
        let problem = HeatProblem::new(geometry, self.material.clone(), boundary)?;
        let y0 = problem.uniform_state(self.initial_temperature);
        Ok((problem, y0))
    }

    /// Builds the problem and integrates it with the configured solver.
    pub fn run(&self) -> Result<HeatSolution, HeatError> {
        let (problem, y0) = self.build()?;
        match &self.solver {
            SolverSpec::Explicit {
                method,
                step,
                save_every,
            } => ExplicitSolver::new(*method, *step)
                .with_save_every(*save_every)
                .solve_checked(&problem, y0, self.time_span),
            SolverSpec::Stiff {
                method,
                rtol,
                atol,
                max_step,
            } => {
                let mut ivp = HeatModelIVP::new(method.solver_type());
                ivp.set_problem(problem, y0, self.time_span.0, self.time_span.1)?;
                let overrides = [("rtol", rtol), ("atol", atol), ("max_step", max_step)];
                for (name, value) in overrides {
                    if let Some(v) = value {
                        ivp.set_solver_param(name, SolverParam::Float(*v));
                    }
                }
                ivp.solve()?;
                ivp.get_solution()
            }
        }
    }
}
