//! sweepd ERC‑20 module
//!
//! This crate provides a lightweight abstraction over the ERC‑20 token
//! interface.  Any contract is reached through the [`Erc20Adapter`]
//! trait defined in the [`adapter`] module; [`Erc20Token`] implements it
//! over a JSON-RPC node.  On top of that sit token classification
//! ([`TokenMetadata`]) and decoding of `Transfer` logs
//! ([`TransferEvent`]).

#![forbid(unsafe_code)]
#![allow(missing_docs)]

pub mod abi;
pub mod adapter;
pub mod amount;
pub mod metadata;
pub mod token;
pub mod transfer;

pub use adapter::Erc20Adapter;
pub use amount::TokenAmount;
pub use metadata::TokenMetadata;
pub use token::Erc20Token;
pub use transfer::TransferEvent;

/// Exposes commonly used types when working with ERC‑20 tokens.
pub mod prelude {
    pub use super::adapter::Erc20Adapter;
    pub use super::amount::TokenAmount;
    pub use super::metadata::TokenMetadata;
    pub use super::token::Erc20Token;
    pub use super::transfer::TransferEvent;
}
