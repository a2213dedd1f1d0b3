//! Model provider transports.

pub mod openai;

pub use openai::HttpChatTransport;
