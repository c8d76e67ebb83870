// src/token/mod.rs

pub mod error;
pub mod registry;
pub mod service;

pub use error::Erc1155Error;
pub use registry::{TokenDescriptor, TokenRegistry};
pub use service::{Erc1155Service, TokenInfo};
