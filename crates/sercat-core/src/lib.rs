//! Core library for replaying logic analyzer serial captures.

pub mod capture;

pub mod error;

pub mod pipeline;
