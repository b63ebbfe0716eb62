//! # Fixed-step explicit integration
//!
//! Drives any [`RightHandSide`] with forward Euler, Heun (explicit trapezoid) or the
//! classic fourth-order Runge–Kutta scheme at a constant step. The last step is
//! shortened so the run ends exactly at the requested final time.
//!
//! The step is never adapted. For a [`HeatProblem`] use
//! [`ExplicitSolver::solve_checked`], which refuses steps above the diffusion
//! stability bound before integrating.
use crate::HeatIVP::solution::HeatSolution;
use crate::HeatTransfer::diffusion::{HeatProblem, RightHandSide};
use crate::HeatTransfer::heat_error::HeatError;
use crate::HeatTransfer::materials::PropertyModel;
use crate::HeatTransfer::stability::check_explicit_step;
use log::{debug, info};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplicitMethod {
    Euler,
    Heun,
    RK4,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitSolver {
    pub method: ExplicitMethod,
    /// time step, s
    pub step: f64,
    /// record every n-th step (the initial and final states are always recorded)
    pub save_every: usize,
}

impl ExplicitSolver {
    pub fn new(method: ExplicitMethod, step: f64) -> Self {
        Self {
            method,
            step,
            save_every: 1,
        }
    }

    pub fn with_save_every(mut self, save_every: usize) -> Self {
        self.save_every = save_every.max(1);
        self
    }

    fn check_span(&self, t_span: (f64, f64)) -> Result<(), HeatError> {
        if !(self.step > 0.0) || !self.step.is_finite() {
            return Err(HeatError::InvalidTimeSpan(format!(
                "step must be positive, got {}",
                self.step
            )));
        }
        if !(t_span.1 > t_span.0) {
            return Err(HeatError::InvalidTimeSpan(format!(
                "end time {} is not after start time {}",
                t_span.1, t_span.0
            )));
        }
        Ok(())
    }

    /// Integrates `rhs` from `y0` over `t_span` without any stability check.
    pub fn solve<R: RightHandSide + ?Sized>(
        &self,
        rhs: &R,
        y0: DVector<f64>,
        t_span: (f64, f64),
    ) -> Result<HeatSolution, HeatError> {
        self.check_span(t_span)?;
        let n = rhs.dimension();
        if y0.len() != n {
            return Err(HeatError::StateSizeMismatch {
                expected: n,
                found: y0.len(),
            });
        }
        let (t0, t1) = t_span;
        // steps shorter than this are rounding leftovers
        let tiny = 1e-9 * self.step;
        info!(
            "explicit {:?} run: {} unknowns, t = {} .. {} s, step {:e} s",
            self.method, n, t0, t1, self.step
        );

        let mut y: Vec<f64> = y0.iter().copied().collect();
        let mut work = Workspace::new(n);
        let mut times = vec![t0];
        let mut states = vec![y.clone()];
        // a struct literal may carry save_every = 0
        let save_every = self.save_every.max(1);
        let mut t = t0;
        let mut k: usize = 0;
        while t1 - t > tiny {
            // step ends are t0 + k*step, not accumulated sums
            let next = t0 + (k + 1) as f64 * self.step;
            let next = if t1 - next <= tiny { t1 } else { next };
            let h = next - t;
            if !(h > 0.0) {
                return Err(HeatError::InvalidTimeSpan(format!(
                    "step {:e} s does not advance time at t = {} s",
                    self.step, t
                )));
            }
            self.advance(rhs, &mut y, &mut work, t, h);
            k += 1;
            t = next;
            if y.iter().any(|v| !v.is_finite()) {
                return Err(HeatError::Solver(format!(
                    "non-finite temperature after step {} (t = {} s)",
                    k, t
                )));
            }
            if k % save_every == 0 || t == t1 {
                times.push(t);
                states.push(y.clone());
            }
        }
        debug!("{} steps, {} records", k, times.len());
        Ok(HeatSolution::from_records(times, &states))
    }

    /// Same as [`ExplicitSolver::solve`] after checking the step against the stability
    /// bound over the temperatures the run can reach.
    pub fn solve_checked(
        &self,
        problem: &HeatProblem,
        y0: DVector<f64>,
        t_span: (f64, f64),
    ) -> Result<HeatSolution, HeatError> {
        problem.check_state(y0.as_slice())?;
        let (t_min, t_max) = problem.temperature_range(y0.as_slice());
        problem.material.check_range(t_min, t_max)?;
        check_explicit_step(self.step, &problem.geometry, &problem.material, t_min, t_max)?;
        self.solve(problem, y0, t_span)
    }

    fn advance<R: RightHandSide + ?Sized>(
        &self,
        rhs: &R,
        y: &mut [f64],
        w: &mut Workspace,
        t: f64,
        h: f64,
    ) {
        match self.method {
            ExplicitMethod::Euler => {
                rhs.rhs(&mut w.k1, y, t);
                for (yi, k1) in y.iter_mut().zip(&w.k1) {
                    *yi += h * k1;
                }
            }
            ExplicitMethod::Heun => {
                rhs.rhs(&mut w.k1, y, t);
                for ((s, yi), k1) in w.stage.iter_mut().zip(y.iter()).zip(&w.k1) {
                    *s = yi + h * k1;
                }
                rhs.rhs(&mut w.k2, &w.stage, t + h);
                for ((yi, k1), k2) in y.iter_mut().zip(&w.k1).zip(&w.k2) {
                    *yi += 0.5 * h * (k1 + k2);
                }
            }
            ExplicitMethod::RK4 => {
                rhs.rhs(&mut w.k1, y, t);
                w.set_stage(y, 0.5 * h, Stage::K1);
                rhs.rhs(&mut w.k2, &w.stage, t + 0.5 * h);
                w.set_stage(y, 0.5 * h, Stage::K2);
                rhs.rhs(&mut w.k3, &w.stage, t + 0.5 * h);
                w.set_stage(y, h, Stage::K3);
                rhs.rhs(&mut w.k4, &w.stage, t + h);
                for (i, yi) in y.iter_mut().enumerate() {
                    *yi += h / 6.0 * (w.k1[i] + 2.0 * w.k2[i] + 2.0 * w.k3[i] + w.k4[i]);
                }
            }
        }
    }
}

enum Stage {
    K1,
    K2,
    K3,
}

/// stage buffers reused across steps
struct Workspace {
    k1: Vec<f64>,
    k2: Vec<f64>,
    k3: Vec<f64>,
    k4: Vec<f64>,
    stage: Vec<f64>,
}

impl Workspace {
    fn new(n: usize) -> Self {
        Self {
            k1: vec![0.0; n],
            k2: vec![0.0; n],
            k3: vec![0.0; n],
            k4: vec![0.0; n],
            stage: vec![0.0; n],
        }
    }

    /// stage = y + h * k
    fn set_stage(&mut self, y: &[f64], h: f64, from: Stage) {
        let k = match from {
            Stage::K1 => &self.k1,
            Stage::K2 => &self.k2,
            Stage::K3 => &self.k3,
        };
        for ((s, yi), ki) in self.stage.iter_mut().zip(y).zip(k) {
            *s = yi + h * ki;
        }
    }
}
