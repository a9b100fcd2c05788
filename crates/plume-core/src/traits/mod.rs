//! Traits at the seam between the client core and its transport.

mod service;

pub use service::SessionService;
