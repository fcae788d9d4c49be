//! Synthetic loan books.

pub mod sample;

pub use sample::*;
