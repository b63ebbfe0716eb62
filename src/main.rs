#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod HeatIVP;
#[allow(non_snake_case)]
pub mod HeatTransfer;
#[allow(non_snake_case)]
pub mod Utils;

use Examples::heat_examples::heat_examples;
use Utils::logger::init_logger;
use simplelog::LevelFilter;

pub fn main() {
    // a logger may already be installed
    let _ = init_logger(LevelFilter::Info, None);
    let task: usize = 0;
    heat_examples(task);
}
