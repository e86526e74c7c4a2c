#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

pub mod contract;
mod error;
pub mod hooks;
pub mod ledger;
pub mod msg;
pub mod signature;
pub mod state;


pub use crate::error::ContractError;
