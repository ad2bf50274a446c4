// Resume analysis: intent selection, prompt composition, scoring, ranking,
// and the pipeline that ties them to the completion client.
// All completion calls go through llm_client.

pub mod handlers;
pub mod intent;
pub mod pipeline;
pub mod prompts;
pub mod ranking;
pub mod score;
