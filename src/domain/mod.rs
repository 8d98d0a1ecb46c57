//! Domain types for quotes and the configurations they are priced from.

pub mod assistant;
pub mod materials;
pub mod project;
pub mod quote;
pub mod updates;

pub use assistant::{AssistantRequest, AssistantResponse};
pub use materials::{ApplyPresetRequest, MaterialConfig, MaterialType};
pub use project::{
    AddWorkerRequest, ConfigError, LaborMode, PricingPolicy, ProjectConfig, ReplaceConfigRequest,
    SealerLine, Worker,
};
pub use quote::{LaborDetails, LineKind, QuoteItem, QuoteResult, QuoteSnapshot};
pub use updates::{PartialUpdate, SanitizedUpdate};
