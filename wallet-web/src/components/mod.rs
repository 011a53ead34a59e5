//! UI Components

pub mod color_grid;
pub mod navbar;

pub use color_grid::ColorGrid;
pub use navbar::Navbar;
