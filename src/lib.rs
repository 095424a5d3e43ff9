#![forbid(unsafe_code)]

pub mod ai;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod ident;
pub mod local_store;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod session;
pub mod staging;
pub mod sync;
pub mod transcript;
pub mod tree;
