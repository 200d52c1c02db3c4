// Library interface for diamondcast modules
// This allows tests and the binary to import modules

pub mod llm;
pub mod mlb;
pub mod narration;
pub mod report;
pub mod server;
pub mod speech;
pub mod summary;
