//! Document filters
//!
//! A filter evaluates one predicate and turns it into an accept/reject
//! decision through its [`OnMatch`](crate::handler::OnMatch) polarity. How
//! several filters combine is decided by the pipeline.

pub mod condition;
pub mod date;
pub mod dom;
pub mod empty;
pub mod numeric;
pub mod reference;
pub mod regex_content;
pub mod regex_metadata;

pub use condition::{DateConditionConfig, NumericCondition, Operator};
pub use date::{DateMetadataFilter, DateMetadataFilterConfig};
pub use dom::{DomContentFilter, DomContentFilterConfig};
pub use empty::{EmptyFilter, EmptyFilterConfig, EmptyMetadataFilter, EmptyMetadataFilterConfig};
pub use numeric::{NumericMetadataFilter, NumericMetadataFilterConfig};
pub use reference::{ReferenceFilter, ReferenceFilterConfig};
pub use regex_content::{RegexContentFilter, RegexContentFilterConfig};
pub use regex_metadata::{RegexMetadataFilter, RegexMetadataFilterConfig};
