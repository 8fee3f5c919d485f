pub mod boundary;
pub mod countries;
pub mod labels;
pub mod symbology;

pub use boundary::*;
pub use countries::*;
pub use labels::*;
pub use symbology::*;
