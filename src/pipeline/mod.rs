// Per-invocation processing stages and their sequencing

pub mod enrich;
pub mod normalize;
pub mod orchestrator;
