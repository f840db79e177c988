//! Persuasive marketing copy generation backed by Gemini
//!
//! Two stateless operations share one [`gateway::ModelGateway`]:
//! [`naming::infer_product_name`] turns a product photo into a catalog
//! title, and [`copy::generate_copy`] turns a product name plus a
//! persuasion [`triggers::Trigger`] into a handful of copy variants.

pub mod config;
pub mod copy;
pub mod error;
pub mod gateway;
pub mod image;
pub mod naming;
pub mod triggers;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use copy::{generate_copy, CopyVariant, GenerationRequest};
pub use error::{CopyError, ErrorKind};
pub use gateway::{GeminiGateway, ModelGateway};
pub use image::ImagePayload;
pub use naming::infer_product_name;
pub use triggers::Trigger;
