pub mod access;
pub mod domain;
pub mod ports;

pub use access::{AccessController, SubmitOutcome, ViewOutcome};
pub use domain::{AdminLog, AuthSession, SessionIdentity, StringEntry, StringPair, User};
pub use ports::{PortError, PortResult, StorageService};
