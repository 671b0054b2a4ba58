pub mod live_store;
pub mod panel_poller;
pub mod summary;
pub mod sync_controller;
