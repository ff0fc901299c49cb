pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod speech;
pub mod processing {
    pub mod captions;
    pub mod compose;
    pub mod layout;
}
pub mod tasks {
    pub mod loader;
    pub mod speaker;
}
