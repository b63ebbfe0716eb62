//! # Time integration of the heat conduction problem
//!
//! The diffusion operator of `HeatTransfer` turns the heat equation into a system of
//! ODEs dΘ/dt = f(Θ), one per cell. This module integrates that system.
//!
//! | Driver | Methods | When |
//! |--------|---------|------|
//! | [`explicit::ExplicitSolver`] | Euler, Heun, RK4 | coarse grids, step below the stability bound |
//! | [`stiff::HeatModelIVP`] | BDF, Radau, Backward Euler | fine grids, long runs |
//!
//! Both return a [`solution::HeatSolution`]; [`task::HeatTask`] describes a whole run in JSON.
/// fixed-step Euler, Heun and RK4 over any right-hand side
pub mod explicit;
/// symbolic diffusion system handed to the RustedSciThe stiff solvers
pub mod stiff;
/// recorded fields, heat-map slices, CSV export and summary tables
pub mod solution;
/// JSON task files: geometry, material, boundary, initial field and solver choice
pub mod task;
