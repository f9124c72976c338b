// src/gateway/mod.rs
//! Thin adapters translating internal calls into external service requests

pub mod chatbot;
pub mod parser;

pub use chatbot::ChatbotClient;
pub use parser::{CandidateMeta, CvParserClient, ParsedCv};
