//! Outbound HTTP collaborators of the Tal funnel.
//!
//! # Module Structure
//!
//! - `http_gateway`: Submits completed leads to the intake endpoints
//! - `logging_gateway`: Dry-run gateway that only logs the payload
//! - `openai_summarizer`: Summarizes a job seeker's ask with OpenAI chat completions

pub mod http_gateway;
pub mod logging_gateway;
pub mod openai_summarizer;

pub use http_gateway::HttpLeadGateway;
pub use logging_gateway::LoggingGateway;
pub use openai_summarizer::OpenAISummarizer;
