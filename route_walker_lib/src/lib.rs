pub mod coordinate;
pub mod route;
pub mod catalog;
pub mod navigation;
pub mod config;
pub mod error;
pub mod motion;
pub mod projection;
pub mod playback;
pub mod session;
pub mod commands;
pub mod format;

pub use catalog::RouteCatalog;
pub use commands::{Command, CommandTable};
pub use config::WalkConfig;
pub use coordinate::Coordinate;
pub use route::{Achievement, RouteDescriptor};
pub use session::{SessionEvent, SessionLifecycle, SessionPhase, SessionSummary};
