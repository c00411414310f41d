pub mod bitcoin;
pub mod config;
pub mod constants;
pub mod demo;
mod error;
mod manager;

pub use crate::{
    config::Config,
    error::{Error, Result},
    manager::{Manager, Payment},
};
