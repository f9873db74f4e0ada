pub mod config;
pub mod progress;
pub mod runner;
pub mod session;
pub mod source;
pub mod state;
pub mod update;

pub use config::SourcePaths;
pub use progress::Progress;
pub use runner::{CommandRunner, ShellRunner, StreamOutcome};
pub use session::UpdateSession;
pub use source::UpdateSource;
pub use state::{AppState, RollingLog, LOG_MARKER, MAX_LOG_LINES};
pub use update::{PackageUpdate, SourceKind};
