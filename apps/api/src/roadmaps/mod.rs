// Roadmaps: append-only persistence, the generate-and-save workflow, and the HTTP surface.
// All agent calls go through agent_client; nothing here talks to the agent directly.

pub mod handlers;
pub mod orchestrator;
pub mod store;
