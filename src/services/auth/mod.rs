pub mod authenticator;
pub mod credentials;
pub mod hasher;
pub mod ownership;

pub use authenticator::{AuthOutcome, Authenticator};
pub use hasher::{HashCost, HashError, SecretHasher};
