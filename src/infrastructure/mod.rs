pub mod api_client;
pub mod preferences;
pub mod push_channel;
