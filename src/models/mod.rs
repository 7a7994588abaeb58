pub mod actor;
pub mod audit;
pub mod campaign;
pub mod common;
pub mod donation;
pub mod pagination;
pub mod ranking;
pub mod roster;
pub mod ticket;

pub use actor::*;
pub use audit::*;
pub use campaign::*;
pub use common::*;
pub use donation::*;
pub use pagination::*;
pub use ranking::*;
pub use roster::*;
pub use ticket::*;
