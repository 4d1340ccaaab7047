//! Petition generation pipeline: category templates, case-data validation,
//! prompt construction, the provider client, and response normalization.

pub mod client;
pub mod normalize;
pub mod prompt;
pub mod templates;

pub use client::{GenerationClient, OpenAiClient};
pub use templates::PetitionCategory;
