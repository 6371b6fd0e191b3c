pub mod course;
pub mod question;
pub mod run_state;
pub mod settings;

pub use course::{Assignment, AssignmentKind, ContentLocation, Course, LearningPath};
pub use question::{Choice, ScrapedQuestion};
pub use run_state::{CancelFlag, LogEntry, Progress, RunState, RunStatus, Severity, StatusSnapshot};
pub use settings::{FormatSettings, OutputFormat, ScrapeSettings, UserSettings};
