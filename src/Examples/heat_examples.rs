use crate::HeatIVP::explicit::{ExplicitMethod, ExplicitSolver};
use crate::HeatIVP::solution::HeatSolution;
use crate::HeatIVP::stiff::HeatModelIVP;
use crate::HeatIVP::task::HeatTask;
use crate::HeatTransfer::diffusion::HeatProblem;
use crate::HeatTransfer::emission::{Boundary, Emission};
use crate::HeatTransfer::geometry::{Face, Geometry};
use crate::HeatTransfer::heat_error::HeatError;
use crate::HeatTransfer::materials::{
    DynamicIsotropic, Material, PropertyModel, StaticAnisotropic, StaticIsotropic,
};
use crate::HeatTransfer::stability::stability_bound;
use RustedSciThe::numerical::ODE_api2::{SolverParam, SolverType};
use RustedSciThe::numerical::Radau::Radau_main::RadauOrder;
use log::error;
use nalgebra::DVector;
use std::collections::HashMap;

pub fn heat_examples(task: usize) {
    let result = match task {
        0 => cooling_rod(),
        1 => dynamic_rod(),
        2 => anisotropic_plate(),
        3 => dynamic_plate(),
        4 => cuboid(),
        5 => task_file("demos/cooling_rod.json"),
        _ => {
            println!("no heat example number {}", task);
            Ok(())
        }
    };
    if let Err(e) = result {
        error!("heat example {} failed: {}", task, e);
    }
}

fn steel() -> Result<Material, HeatError> {
    Ok(StaticIsotropic::new(45.0, 7800.0, 480.0)?.into())
}

/// stored energy at the first and last record
fn energy_report(problem: &HeatProblem, solution: &HeatSolution) {
    if let (Some(first), Some(last)) = (solution.state_at(0), solution.final_state()) {
        let e0 = problem.total_energy(first.as_slice());
        let e1 = problem.total_energy(last.as_slice());
        println!(
            "stored energy: {:.4e} J -> {:.4e} J ({:+.3}%)",
            e0,
            e1,
            100.0 * (e1 - e0) / e0
        );
    }
}

/// steel rod, 600 K, losing heat through both ends by convection and radiation
fn cooling_rod() -> Result<(), HeatError> {
    let rod = Geometry::rod(0.2, 40)?;
    let mut boundary = Boundary::new(&rod);
    boundary.set_emission(Face::West, Emission::new(25.0, 0.8, 300.0)?)?;
    boundary.set_emission(Face::East, Emission::new(5.0, 0.2, 300.0)?)?;
    let problem = HeatProblem::new(rod, steel()?, boundary)?;

    let y0 = problem.uniform_state(600.0);
    let solution = ExplicitSolver::new(ExplicitMethod::RK4, 1.0)
        .with_save_every(60)
        .solve_checked(&problem, y0, (0.0, 1800.0))?;
    solution.print_summary(6);
    energy_report(&problem, &solution);
    if let Some(last) = solution.final_state() {
        let x = problem.geometry.centres(0);
        for i in (0..x.len()).step_by(8) {
            println!("x = {:.4} m, T = {:.2} K", x[i], last[i]);
        }
    }
    Ok(())
}

/// rod with temperature dependent properties, half hot, half cold, insulated
fn dynamic_rod() -> Result<(), HeatError> {
    let rod = Geometry::rod(0.1, 50)?;
    let boundary = Boundary::new(&rod);
    let material: Material =
        DynamicIsotropic::new(vec![52.0, -0.02], vec![7850.0], vec![420.0, 0.25])?.into();
    let problem = HeatProblem::new(rod, material, boundary)?;

    let y0 = DVector::from_fn(problem.cell_count(), |i, _| if i < 25 { 800.0 } else { 300.0 });
    let (t_min, t_max) = problem.temperature_range(y0.as_slice());
    let bound = stability_bound(&problem.geometry, &problem.material, t_min, t_max);
    println!(
        "{} material, Θ in [{}, {}] K: explicit step must stay below {:.4} s",
        problem.material.name(),
        t_min,
        t_max,
        bound
    );
    for theta in [300.0, 550.0, 800.0] {
        println!(
            "  α({} K) = {:.4e} m²/s",
            theta,
            problem.material.diffusivity(theta, 0)
        );
    }

    // a step above the bound is refused before any stepping
    let too_large = ExplicitSolver::new(ExplicitMethod::Heun, 2.0 * bound);
    if let Err(e) = too_large.solve_checked(&problem, y0.clone(), (0.0, 60.0)) {
        println!("refused: {}", e);
    }

    let solution = ExplicitSolver::new(ExplicitMethod::Heun, 0.8 * bound)
        .with_save_every(200)
        .solve_checked(&problem, y0, (0.0, 300.0))?;
    solution.print_summary(5);
    // insulated: the stored energy must not change
    energy_report(&problem, &solution);
    Ok(())
}

/// graphite-like plate, conducting 10x better along x, heated through the west face
fn anisotropic_plate() -> Result<(), HeatError> {
    let plate = Geometry::plate([0.1, 0.1], [12, 12])?;
    let mut boundary = Boundary::new(&plate);
    boundary.set_emission(Face::West, Emission::new(200.0, 0.0, 1000.0)?)?;
    boundary.set_emission(Face::East, Emission::new(10.0, 0.9, 300.0)?)?;
    let material: Material = StaticAnisotropic::new(vec![150.0, 15.0], 2200.0, 710.0)?.into();
    let problem = HeatProblem::new(plate, material, boundary)?;

    let mut ivp = HeatModelIVP::new(SolverType::BDF);
    ivp.set_problem(problem.clone(), problem.uniform_state(300.0), 0.0, 600.0)?;
    ivp.set_solver_params(HashMap::from([
        ("rtol".to_owned(), SolverParam::Float(1e-5)),
        ("atol".to_owned(), SolverParam::Float(1e-5)),
    ]));
    ivp.solve()?;
    let solution = ivp.get_solution()?;
    solution.print_summary(5);
    energy_report(&problem, &solution);

    let field = solution.field_2d(&problem.geometry, solution.len().saturating_sub(1), 0)?;
    println!("final field, rows along x, columns along y:\n{:.1}", field);
    Ok(())
}

/// plate with temperature dependent properties, hot centre, radiating on all sides
fn dynamic_plate() -> Result<(), HeatError> {
    let plate = Geometry::plate([0.05, 0.05], [8, 8])?;
    let mut boundary = Boundary::new(&plate);
    boundary.set_all(Emission::new(15.0, 0.7, 293.0)?);
    let material: Material =
        DynamicIsotropic::new(vec![237.0, -0.01], vec![2700.0], vec![880.0, 0.45])?.into();
    let problem = HeatProblem::new(plate, material, boundary)?;

    let g = &problem.geometry;
    let y0 = DVector::from_fn(problem.cell_count(), |i, _| {
        let c = g.coordinates(i);
        if (3..5).contains(&c[0]) && (3..5).contains(&c[1]) {
            700.0
        } else {
            293.0
        }
    });
    let mut ivp = HeatModelIVP::new(SolverType::Radau(RadauOrder::Order7));
    ivp.set_problem(problem.clone(), y0, 0.0, 120.0)?;
    ivp.solve()?;
    let solution = ivp.get_solution()?;
    solution.print_summary(5);
    energy_report(&problem, &solution);
    solution.save_csv("dynamic_plate.csv")?;
    Ok(())
}

/// steel cube at room temperature dropped into a hot furnace
fn cuboid() -> Result<(), HeatError> {
    let cube = Geometry::cuboid([0.04, 0.04, 0.04], [6, 6, 6])?;
    let mut boundary = Boundary::new(&cube);
    boundary.set_all(Emission::new(30.0, 0.85, 1100.0)?);
    // the cube stands on an insulating brick
    boundary.set_emission(Face::Bottom, Emission::insulated())?;
    let problem = HeatProblem::new(cube, steel()?, boundary)?;

    let (t_min, t_max) = problem.temperature_range(&[300.0]);
    let bound = stability_bound(&problem.geometry, &problem.material, t_min, t_max);
    let solution = ExplicitSolver::new(ExplicitMethod::Euler, 0.5 * bound)
        .with_save_every(500)
        .solve_checked(&problem, problem.uniform_state(300.0), (0.0, 900.0))?;
    solution.print_summary(6);
    energy_report(&problem, &solution);
    let k = solution.len().saturating_sub(1);
    for layer in [0, 5] {
        let field = solution.field_2d(&problem.geometry, k, layer)?;
        println!("layer {}: min {:.1} K, max {:.1} K", layer, field.min(), field.max());
    }
    Ok(())
}

fn task_file(path: &str) -> Result<(), HeatError> {
    let task = HeatTask::from_file(path)?;
    let (problem, _) = task.build()?;
    let solution = task.run()?;
    solution.print_summary(6);
    energy_report(&problem, &solution);
    Ok(())
}
