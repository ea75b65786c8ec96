//! Core library for the datapipe-tools command line application.
//!
//! The library exposes high-level orchestration helpers that power the
//! command-line interface as well as the integration tests. The modules are
//! structured to keep responsibilities narrow and composable: ingestion and
//! document IO adapters live under [`datapipe::tools::io`], the parameter
//! model inside [`datapipe::tools::model`], the descriptor compiler in
//! [`datapipe::tools::cwl`], the node registry in [`datapipe::tools::nodes`],
//! and the conversion orchestration under [`datapipe::tools::convert`].

pub mod datapipe;

pub use datapipe::tools::{Result, ToolError, convert, cwl, error, io, model, nodes, workflow};
