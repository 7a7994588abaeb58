pub mod jwt;
pub mod retry;
pub mod ticket_rules;

pub use jwt::*;
pub use retry::RetryPolicy;
pub use ticket_rules::{
    MAX_TICKETS_PER_DONATION, format_ticket_code, random_ticket_offset, tickets_for_weight,
};
