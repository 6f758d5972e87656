//! Wire contracts shared by the Cadence API server and its client.
//!
//! Everything here is plain data plus the error taxonomy. No I/O.

pub mod envelope;
pub mod plan;
pub mod prep;
pub mod profile;
pub mod reroll;
pub mod responses;
pub mod taxonomy;

pub use envelope::{ErrorEnvelope, Violation};
pub use plan::{DailyTasks, DaySchedule, Plan, PlanDraft, Resource, TimeBlock, Weekday};
pub use prep::{OutlineSection, PrepPack};
pub use profile::{GenerateRequest, Profile, RerollRequest};
pub use reroll::{DailyTasksSection, RerollSection, ResourcesSection, TimeBlocksSection};
pub use responses::{HealthResponse, PrepResponse, RoutineResponse};
pub use taxonomy::{classify, ClassifiedError, Fault, TransportFault};
