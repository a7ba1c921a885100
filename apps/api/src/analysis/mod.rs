// Candidate/job compatibility engine.
// Pipeline: normalize → requirements → evidence → scorer → recommendations.
// Everything below `handlers` is synchronous and pure; handlers run the
// engine via tokio::task::spawn_blocking.

pub mod engine;
pub mod evidence;
pub mod handlers;
pub mod normalize;
pub mod recommendations;
pub mod requirements;
pub mod scorer;
pub mod similarity;
pub mod thresholds;
pub mod vocabulary;
