//! Symbolic form of the diffusion operator.
//!
//! Builds one expression per cell, same discretization as
//! [`diffusion`](crate::HeatTransfer::diffusion::diffusion), in the unknowns
//! `T0, T1, ... T{n-1}`. The system is what the stiff solvers of RustedSciThe consume:
//! they differentiate it for the Jacobian and lambdify it for evaluation.
use crate::HeatTransfer::diffusion::HeatProblem;
use crate::HeatTransfer::geometry::Neighbor;
use crate::HeatTransfer::materials::PropertyModel;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::info;

/// name of the unknown for cell `i`
pub fn cell_variable(i: usize) -> String {
    format!("T{}", i)
}

impl HeatProblem {
    /// names of the unknowns, in cell order
    pub fn unknowns(&self) -> Vec<String> {
        (0..self.cell_count()).map(cell_variable).collect()
    }

    /// `dTi/dt` for every cell as symbolic expressions, plus the unknown names
    pub fn symbolic_system(&self) -> (Vec<Expr>, Vec<String>) {
        let unknowns = self.unknowns();
        let vars: Vec<Expr> = unknowns.iter().map(|n| Expr::Var(n.clone())).collect();
        let geometry = &self.geometry;
        let material = &self.material;
        let constant = material.is_static();

        let mut equations = Vec::with_capacity(vars.len());
        for (i, t_i) in vars.iter().enumerate() {
            let mut terms: Vec<Expr> = Vec::new();
            for axis in 0..geometry.dimension() {
                let dx = geometry.sampling(axis);
                for upper in [false, true] {
                    match geometry.neighbor(i, axis, upper) {
                        Neighbor::Cell(j) => {
                            let t_j = &vars[j];
                            let gradient = t_j.clone() - t_i.clone();
                            let term = if constant {
                                // constant λ: fold the face conductance into one number
                                let lambda = material.properties(0.0, axis).conductivity;
                                Expr::Const(lambda / (dx * dx)) * gradient
                            } else {
                                let (lambda_i, _, _) = material.properties_sym(t_i, axis);
                                let (lambda_j, _, _) = material.properties_sym(t_j, axis);
                                Expr::Const(0.5 / (dx * dx)) * (lambda_i + lambda_j) * gradient
                            };
                            terms.push(term);
                        }
                        Neighbor::Boundary(face) => {
                            let emission = self.boundary.emission(face);
                            if !emission.is_insulated() {
                                terms.push(Expr::Const(1.0 / dx) * emission.flux_sym(t_i));
                            }
                        }
                    }
                }
            }
            let gain = terms
                .into_iter()
                .reduce(|a, b| a + b)
                .unwrap_or(Expr::Const(0.0));
            let equation = if constant {
                let p = material.properties(0.0, 0);
                Expr::Const(1.0 / p.heat_capacity()) * gain
            } else {
                let (_, rho, c) = material.properties_sym(t_i, 0);
                gain / (rho * c)
            };
            equations.push(equation);
        }
        info!("symbolic system of {} equations built", equations.len());
        (equations, unknowns)
    }
}

#[cfg(test)]
mod tests {
    use crate::HeatTransfer::diffusion::HeatProblem;
    use crate::HeatTransfer::emission::{Boundary, Emission};
    use crate::HeatTransfer::geometry::{Face, Geometry};
    use crate::HeatTransfer::materials::{DynamicIsotropic, Material, StaticAnisotropic};
    use approx::assert_relative_eq;

    fn check_against_numeric(problem: &HeatProblem, theta: &[f64]) {
        let numeric = problem.derivative(theta).unwrap();
        let (equations, unknowns) = problem.symbolic_system();
        assert_eq!(equations.len(), theta.len());
        let vars: Vec<&str> = unknowns.iter().map(|s| s.as_str()).collect();
        for (i, eq) in equations.iter().enumerate() {
            let f = eq.clone().lambdify_owned(vars.clone());
            let value = f(theta.to_vec());
            assert_relative_eq!(value, numeric[i], epsilon = 1e-9, max_relative = 1e-8);
        }
    }

    #[test]
    fn static_anisotropic_plate_matches_numeric() {
        let geometry = Geometry::plate([0.2, 0.1], [3, 2]).unwrap();
        let mut boundary = Boundary::new(&geometry);
        boundary
            .set_emission(Face::East, Emission::new(20.0, 0.6, 300.0).unwrap())
            .unwrap();
        let material: Material = StaticAnisotropic::new(vec![40.0, 5.0], 7800.0, 480.0)
            .unwrap()
            .into();
        let problem = HeatProblem::new(geometry, material, boundary).unwrap();
        check_against_numeric(&problem, &[600.0, 580.0, 550.0, 610.0, 590.0, 500.0]);
    }

    #[test]
    fn dynamic_rod_matches_numeric() {
        let geometry = Geometry::rod(0.3, 3).unwrap();
        let mut boundary = Boundary::new(&geometry);
        boundary
            .set_emission(Face::West, Emission::new(5.0, 0.2, 300.0).unwrap())
            .unwrap();
        let material: Material =
            DynamicIsotropic::new(vec![10.0, 0.02], vec![7800.0, -0.1], vec![330.0, 0.4])
                .unwrap()
                .into();
        let problem = HeatProblem::new(geometry, material, boundary).unwrap();
        check_against_numeric(&problem, &[600.0, 450.0, 320.0]);
    }
}
