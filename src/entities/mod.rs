pub mod audit_logs;
pub mod campaigns;
pub mod classes;
pub mod donations;
pub mod donors;
pub mod tickets;

pub use audit_logs as audit_log_entity;
pub use audit_logs::AuditAction;
pub use campaigns as campaign_entity;
pub use campaigns::CampaignStatus;
pub use classes as class_entity;
pub use donations as donation_entity;
pub use donors as donor_entity;
pub use tickets as ticket_entity;
