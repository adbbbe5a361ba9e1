// Adapters layer: concrete implementations for external systems (Gemini, HTTP API).

pub mod gemini;
pub mod http;
