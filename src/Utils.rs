/// terminal and file logging backend
pub mod logger;
