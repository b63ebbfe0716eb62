//! # Stiff time integration
//!
//! Fine grids make the semi-discrete heat equation stiff: the explicit stability bound
//! shrinks with Δx². [`HeatModelIVP`] hands the symbolic form of the diffusion operator
//! to the implicit solvers of RustedSciThe (BDF, Radau, Backward Euler), which build the
//! Jacobian analytically and choose their own steps.
//!
//! ## Usage pattern
//! 1. `new()` - create instance with solver type
//! 2. `set_problem()` - heat problem, initial field and time span
//! 3. `set_solver_params()` - optional, overrides tolerances and step limits
//! 4. `solve()` - checks the task, builds the equations and integrates
//! 5. `get_solution()` - the recorded fields as a [`HeatSolution`]
//!
//! ```rust,ignore
//! use HeatThe::HeatIVP::stiff::HeatModelIVP;
//! use RustedSciThe::numerical::ODE_api2::SolverType;
//!
//! let mut ivp = HeatModelIVP::new(SolverType::BDF);
//! ivp.set_problem(problem, y0, 0.0, 600.0)?;
//! ivp.solve()?;
//! let solution = ivp.get_solution()?;
//! ```
use crate::HeatIVP::solution::HeatSolution;
use crate::HeatTransfer::diffusion::HeatProblem;
use crate::HeatTransfer::heat_error::HeatError;
use crate::HeatTransfer::materials::PropertyModel;
use RustedSciThe::numerical::ODE_api2::{SolverParam, SolverType, UniversalODESolver};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::info;
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;

/// share of the time span used as default maximal step
const DEFAULT_MAX_STEP_FRACTION: f64 = 0.01;

pub struct HeatModelIVP {
    /// ODE solver instance (initialized after solve() is called)
    solver: Option<UniversalODESolver>,
    /// Numerical solver parameters (step size, tolerance, etc.)
    solver_params: HashMap<String, SolverParam>,
    problem: Option<HeatProblem>,
    y0: Option<DVector<f64>>,
    /// start time [s]
    t0: f64,
    /// final integration time [s]
    t_final: f64,
    equations: Vec<Expr>,
    unknowns: Vec<String>,
    solvertype: SolverType,
}

impl HeatModelIVP {
    /// Creates an instance with default solver parameters and no problem set.
    pub fn new(solvertype: SolverType) -> Self {
        let map_of_params = HashMap::from([
            ("step_size".to_owned(), SolverParam::Float(1e-3)),
            ("tolerance".to_owned(), SolverParam::Float(1e-3)),
            ("max_iterations".to_owned(), SolverParam::Int(100000)),
            ("rtol".to_owned(), SolverParam::Float(1e-4)),
            ("atol".to_owned(), SolverParam::Float(1e-4)),
            ("max_step".to_owned(), SolverParam::Float(1.0)),
            ("first_step".to_owned(), SolverParam::OptionalFloat(None)),
            ("vectorized".to_owned(), SolverParam::Bool(false)),
            ("jac_sparsity".to_owned(), SolverParam::OptionalMatrix(None)),
            ("parallel".to_owned(), SolverParam::Bool(true)),
        ]);
        Self {
            solver: None,
            solver_params: map_of_params,
            problem: None,
            y0: None,
            t0: 0.0,
            t_final: 0.0,
            equations: Vec::new(),
            unknowns: Vec::new(),
            solvertype,
        }
    }

    /// Sets the heat problem, initial temperatures and time span. The maximal step
    /// defaults to 1% of the span; call `set_solver_params` afterwards to override.
    ///
    /// # Errors
    /// `StateSizeMismatch` if `y0` does not match the grid, `InvalidTimeSpan` if
    /// `t_final <= t0`, `InvalidMaterial` if properties leave their valid range.
    pub fn set_problem(
        &mut self,
        problem: HeatProblem,
        y0: DVector<f64>,
        t0: f64,
        t_final: f64,
    ) -> Result<(), HeatError> {
        problem.check_state(y0.as_slice())?;
        if !(t_final > t0) {
            return Err(HeatError::InvalidTimeSpan(format!(
                "t_final {} must be after t0 {}",
                t_final, t0
            )));
        }
        let (t_min, t_max) = problem.temperature_range(y0.as_slice());
        problem.material.check_range(t_min, t_max)?;
        self.solver_params.insert(
            "max_step".to_owned(),
            SolverParam::Float(DEFAULT_MAX_STEP_FRACTION * (t_final - t0)),
        );
        self.problem = Some(problem);
        self.y0 = Some(y0);
        self.t0 = t0;
        self.t_final = t_final;
        self.solver = None;
        Ok(())
    }

    pub fn set_solver_params(&mut self, params: HashMap<String, SolverParam>) {
        self.solver_params.extend(params);
    }

    pub fn set_solver_param(&mut self, name: &str, value: SolverParam) {
        self.solver_params.insert(name.to_owned(), value);
    }

    /// Validates that problem and initial state are set.
    pub fn check_task(&self) -> Result<(), HeatError> {
        if self.problem.is_none() {
            return Err(HeatError::Solver("heat problem not set".to_string()));
        }
        if self.y0.is_none() {
            return Err(HeatError::Solver("initial temperatures not set".to_string()));
        }
        if !(self.t_final > self.t0) {
            return Err(HeatError::InvalidTimeSpan(format!(
                "t_final {} must be after t0 {}",
                self.t_final, self.t0
            )));
        }
        Ok(())
    }

    /// Builds the symbolic system and runs the configured solver.
    pub fn solve(&mut self) -> Result<(), HeatError> {
        self.check_task()?;
        let (problem, y0) = match (&self.problem, &self.y0) {
            (Some(p), Some(y0)) => (p, y0.clone()),
            _ => return Err(HeatError::Solver("task is incomplete".to_string())),
        };
        let (equations, unknowns) = problem.symbolic_system();
        info!(
            "stiff run: {} equations, t = {} .. {} s",
            equations.len(),
            self.t0,
            self.t_final
        );
        self.equations = equations;
        self.unknowns = unknowns;

        let mut ode = UniversalODESolver::new(
            self.equations.clone(),
            self.unknowns.clone(),
            "t".to_owned(),
            self.solvertype.clone(),
            self.t0,
            y0,
            self.t_final,
        );
        ode.set_parameters(self.solver_params.clone());
        ode.initialize();
        ode.solve();
        self.solver = Some(ode);
        info!("stiff run finished");
        Ok(())
    }

    /// the symbolic right-hand sides of the last `solve()`
    pub fn equations(&self) -> &[Expr] {
        &self.equations
    }

    /// Recorded solution, rows are time points.
    ///
    /// # Errors
    /// `Solver` if `solve()` has not run or produced no result.
    pub fn get_solution(&self) -> Result<HeatSolution, HeatError> {
        let ode = self
            .solver
            .as_ref()
            .ok_or_else(|| HeatError::Solver("Solver not initialized. Call solve() first.".to_string()))?;
        let n = self.unknowns.len();
        match ode.get_result() {
            (Some(t), Some(y)) => {
                let y: DMatrix<f64> = if y.ncols() == n {
                    y
                } else if y.nrows() == n {
                    y.transpose()
                } else {
                    return Err(HeatError::StateSizeMismatch {
                        expected: n,
                        found: y.ncols(),
                    });
                };
                Ok(HeatSolution::new(t, y))
            }
            _ => Err(HeatError::Solver("solver returned no result".to_string())),
        }
    }
}
