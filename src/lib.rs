#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod HeatIVP;
#[allow(non_snake_case)]
pub mod HeatTransfer;
#[allow(non_snake_case)]
pub mod Utils;
