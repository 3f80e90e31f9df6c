pub mod audit;
pub mod event;
pub mod stats;

pub use audit::{AuditAction, AuditLogFilter, AuditRecord, AuditSummary, AuditSummaryBucket};
pub use event::{Event, EventPayload, PersistedEvent, PublishRequest};
pub use stats::Stats;
