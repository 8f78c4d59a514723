pub mod catalog;
pub mod config;
pub mod emit;
pub mod error;
pub mod expertise;
pub mod materialize;
pub mod model;
pub mod pipeline;
pub mod reduce;
pub mod solver;
pub mod timegrid;
