//! Content models served by the remote configuration subsystem.
//!
//! Payloads arrive as JSON with snake_case keys, which map directly onto
//! these field names:
//!
//! - `FormatDefinition`, `FormatSegment`: long-form show structures
//! - `Opening`: opening definitions
//! - `WarmUp`, `WarmUpCategory`: warm-up catalog entries
//! - `SuggestionsResponse`, `SuggestionCategory`: audience suggestion pools

pub mod format;
pub mod opening;
pub mod suggestion;
pub mod warmup;

pub use format::{FormatDefinition, FormatSegment};
pub use opening::Opening;
pub use suggestion::{SuggestionCategory, SuggestionsResponse};
pub use warmup::{WarmUp, WarmUpCategory};
