// common helpers
pub mod algorithms;
pub mod cancel;
pub mod config;
pub mod controller;
pub mod errors;
pub mod function;
pub mod report;
pub(crate) mod signs;

// fixed-point classification and coarse scanning
pub mod classifier;
pub mod locator;

// algorithms
pub mod bisection;
pub mod regula_falsi;
pub mod newton;
pub mod secant;
pub mod muller;
