//! Transaction functionality
//!
//! This module canonicalizes, hashes and signs transactions, assembles the
//! broadcast envelope, and defines the RPC collaborator that broadcasts it.

pub mod types;
pub mod value;
mod signer;
pub mod provider;

pub use types::*;
pub use value::*;
pub use signer::*;
pub use provider::*;
