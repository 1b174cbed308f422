pub mod collab;
pub mod config;
pub mod dispatch;
pub mod net;
pub mod runtime;
pub mod speech;
pub mod transcript;
pub mod watchers;
