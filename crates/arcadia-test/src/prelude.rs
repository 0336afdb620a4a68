//! Convenience re-exports: `use arcadia_test::prelude::*;`

pub use crate::assertions::assert_event_sequence;
pub use crate::fixtures::{temp_project, TempProject};
pub use crate::mocks::{ScriptedRuntime, ScriptedRuntimeError};
