pub mod course_scrape;
pub mod run_ctx;

pub use course_scrape::{scrape_course, CourseReport};
pub use run_ctx::RunCtx;
