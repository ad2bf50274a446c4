// Shared prompt constants for the completion client.
// Per-intent instructions live in analysis/prompts.rs.

/// System persona sent with every analysis call.
pub const ANALYZER_SYSTEM: &str = "You are an AI Resume Analyzer.";
