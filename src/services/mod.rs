pub mod access;
pub mod browse;
pub mod recommendations;
pub mod rewatch;
pub mod scoring;
pub mod search;
pub mod taste;
pub mod watch_later;
pub mod watch_log;

pub use access::{MovieCatalog, WatchHistory, WatchLater};
pub use browse::browse_catalog;
pub use recommendations::{recommend, RecommendationLimits};
pub use rewatch::due_for_rewatch;
pub use search::search_titles;
pub use taste::TasteProfile;
