// Analysis domain module
// Contains the board report entity

#![allow(clippy::module_inception)]

pub mod analysis;

pub use analysis::Analysis;
