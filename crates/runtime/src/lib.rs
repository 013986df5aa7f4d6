pub mod coalesce;
pub mod frame;

pub use coalesce::*;
pub use frame::*;
