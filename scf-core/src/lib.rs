pub mod atom;
pub mod basis;
pub mod config;
pub mod error;
pub mod hf;
pub mod integrals;
pub mod molecule;

mod diis;
