//! Console client for an externally deployed member-treasury contract.
//!
//! Everything authoritative lives in the contract: membership, proposals,
//! vote tallies, deadlines, and the funds themselves. This crate binds a
//! wallet-style provider and a contract address into a session, projects the
//! remote state into renderable views, and submits the user's signed
//! transactions.

pub mod binding;
pub mod controller;
pub mod error;
pub mod interface;
pub mod projector;
pub mod render;
pub mod session;

#[cfg(any(test, feature = "demo"))]
pub mod harness;

pub use controller::{Console, Notice, NoticeLevel, Phase};
pub use error::ClientError;
