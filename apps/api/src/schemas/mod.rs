// Validated extraction targets. Each module pairs a strongly-typed shape with
// the SchemaDescriptor the model is shown; the two must stay in lock-step.

pub mod job;
pub mod resume;
pub mod schedule;

pub use job::StructuredJob;
pub use resume::StructuredResume;
pub use schedule::{LearningSchedule, ScheduleType};
