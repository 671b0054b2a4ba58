pub mod entities;
pub mod errors;
pub mod live_state;
pub mod repositories;
pub mod services;
pub mod value_objects;
