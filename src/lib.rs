pub mod config;
pub mod detector;
pub mod geometry;
pub mod imageops;
pub mod visualization;

pub use detector::*;
pub use geometry::*;
pub use imageops::*;

pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    // No unit tests in lib.rs - all tests are in tests/ directory
}
