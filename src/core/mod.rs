//! Core label pipeline module

pub mod client;
pub mod config;
pub mod errors;
pub mod handler;
pub mod models;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;
