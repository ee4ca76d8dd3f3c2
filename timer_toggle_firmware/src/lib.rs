#![no_std]

pub mod config;
pub mod setup;

pub use config::LedPin;
