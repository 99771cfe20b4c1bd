//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations; the
//! reconciler receives them explicitly and never looks them up.

pub mod directory_lister;
pub mod eligibility;
pub mod enrichment;
pub mod sync_events;
pub mod user_page;
pub mod user_store;

pub use directory_lister::{DirectoryError, DirectoryLister, DirectoryResult};
pub use eligibility::{AllEligible, EligibilityChecker};
pub use enrichment::{Enrichment, EnrichmentError, EnrichmentStep, NoopEnrichment};
pub use sync_events::{NoopEventSink, SyncEvent, SyncEventSink};
pub use user_page::{NoopPagePublisher, PageError, UserPagePublisher};
pub use user_store::{BlockDetails, GroupMembership, StoreError, StoreResult, UserStore};
