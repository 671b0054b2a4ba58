pub mod ai_decision;
pub mod history;
pub mod market;
pub mod portfolio;
pub mod position;
pub mod team;
pub mod trade;
