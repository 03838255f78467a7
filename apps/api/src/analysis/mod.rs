// Offer Analysis: input normalization, prompt rendering, model call, reply parsing.
// All model calls go through llm_client, selected by credential tier.

pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod prompt;
