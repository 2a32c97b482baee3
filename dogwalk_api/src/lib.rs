pub mod api;

#[cfg(any(feature = "client", test))]
pub mod client;

#[cfg(any(feature = "server", test))]
pub mod app_config;
#[cfg(any(feature = "server", test))]
pub mod error;
#[cfg(any(feature = "server", test))]
pub mod feedback;
#[cfg(any(feature = "server", test))]
mod handlers;
#[cfg(any(feature = "server", test))]
pub mod paths;
#[cfg(any(feature = "server", test))]
pub mod recommendations;
#[cfg(any(feature = "server", test))]
pub mod settings;
#[cfg(any(feature = "server", test))]
pub mod telemetry;
#[cfg(any(feature = "server", test))]
pub mod users;
#[cfg(any(feature = "server", test))]
pub mod walk_repository;
