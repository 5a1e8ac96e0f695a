pub mod cli;
pub mod config;
pub mod corpus;
pub mod global;
pub mod normalizer;
pub mod profile;
