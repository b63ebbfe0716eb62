/// uniform rod/plate/cuboid grids, faces, cell indexing
pub mod geometry;
/// static/dynamic × isotropic/anisotropic thermal properties
pub mod materials;
/// convective + radiative exchange on domain faces
pub mod emission;
/// discretized heat equation, the right-hand side handed to time integrators
/// # Examples
/// ```rust,ignore
/// use HeatThe::HeatTransfer::diffusion::HeatProblem;
/// use HeatThe::HeatTransfer::emission::{Boundary, Emission};
/// use HeatThe::HeatTransfer::geometry::{Face, Geometry};
/// use HeatThe::HeatTransfer::materials::StaticIsotropic;
///
/// let rod = Geometry::rod(0.2, 40)?;
/// let mut boundary = Boundary::new(&rod);
/// boundary.set_emission(Face::West, Emission::new(5.0, 0.2, 300.0)?)?;
/// let steel = StaticIsotropic::new(45.0, 7800.0, 480.0)?.into();
/// let problem = HeatProblem::new(rod, steel, boundary)?;
/// let dtheta = problem.derivative(problem.uniform_state(600.0).as_slice())?;
/// ```
pub mod diffusion;
/// step-size limit for fixed-step explicit schemes
pub mod stability;
/// the diffusion operator as a system of symbolic expressions for stiff solvers
pub mod symbolic;
pub mod heat_error;
