pub mod audit_service;
pub mod campaign_service;
pub mod draw_service;
pub mod roster_service;
pub mod ticket_service;

pub use audit_service::*;
pub use campaign_service::*;
pub use draw_service::*;
pub use roster_service::*;
pub use ticket_service::*;
