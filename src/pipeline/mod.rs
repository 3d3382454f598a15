pub mod cancel;
pub mod job;
pub mod orchestrator;
