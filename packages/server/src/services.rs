pub mod announcements;
pub mod delivery;
pub mod game_service;
pub mod message_queue;
pub mod session_registry;
pub mod store;
pub mod sync_loop;
