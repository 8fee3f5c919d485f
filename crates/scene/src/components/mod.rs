pub mod boundary;
pub mod bounds;
pub mod style;

pub use boundary::*;
pub use bounds::*;
pub use style::*;
