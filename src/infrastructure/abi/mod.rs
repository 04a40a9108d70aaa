//! ABI infrastructure - contract bindings and compiled artifacts

mod artifact;
pub mod bindings;

pub use artifact::{ContractArtifact, TokenArtifacts};
#[cfg(test)]
pub(crate) use artifact::fixtures;
