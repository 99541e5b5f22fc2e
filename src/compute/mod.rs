//! Pure computation helpers shared by the index backends.
//!
//! - [`topk`]: the bounded max-heap used for nearest-neighbour ranking
//! - [`service`]: service-name encoding and decoding
//! - [`validation`]: argument and configuration checks

pub mod service;
pub mod topk;
pub mod validation;

pub use service::{contains_any, decode_services, encode_services};
pub use topk::BoundedTopK;
