pub mod api;
pub mod config;
pub mod consts;
pub mod engine;
pub mod solver;
pub mod tools;
pub mod verification;
