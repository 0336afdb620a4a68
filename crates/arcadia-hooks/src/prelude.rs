//! Prelude - commonly used types for convenient import.
//!
//! ```rust
//! use arcadia_hooks::prelude::*;
//! ```

pub use crate::{
    ApprovalGateway, ApprovalOutcome, HookError, HookPipeline, HookResult, PipelineOutcome,
    PipelineTrigger, ToolCallContext, ToolExecutor, ToolFailure, ToolOutcome,
};
