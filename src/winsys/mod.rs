#[macro_use]
extern crate log;

pub type Result<T> = anyhow::Result<T>;

pub mod connection;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod window;
pub mod xdata;
