//! Pointer and frame driven behavior: hover picking, country highlighting
//! and inertial spin.

pub mod highlight;
pub mod hover;
pub mod spin;

pub use highlight::*;
pub use hover::*;
pub use spin::*;
