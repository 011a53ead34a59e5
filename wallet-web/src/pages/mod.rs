//! Page modules

pub mod rainbow;

pub use rainbow::RainbowPage;
