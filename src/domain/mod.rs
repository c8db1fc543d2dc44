pub mod appliance;
pub mod calendar;
pub mod consumption;
pub mod error;

pub use appliance::*;
pub use calendar::*;
pub use consumption::*;
pub use error::*;
