pub mod orchestrator;
pub mod prompt;
pub mod report;

pub use orchestrator::RatingSession;
pub use prompt::prompt_ratings;
pub use report::{default_output_path, print_album_list, print_summary, print_tracklist};
