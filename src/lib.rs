// THEORY:
// This file is the main entry point for the `palette_recolor` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (image-generation frontends,
// batch tooling, the example runner).
//
// The primary goal is to export the `RecolorPipeline` and its associated data
// structures (`RecolorConfig`, `Outcome`, etc.) as the clean, high-level
// interface for the entire recoloring engine. The lower-level building blocks
// (`core_modules`) stay public for callers that want to run the extraction,
// mapping, and blend stages individually, but the pipeline is the intended
// front door.

pub mod core_modules;
pub mod pipeline;
pub mod parallel_pipeline;
