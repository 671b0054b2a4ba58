pub mod pnl;
pub mod record_id;
pub mod timestamp;
