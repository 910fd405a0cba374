pub mod identity;

pub use identity::IdentityPort;
