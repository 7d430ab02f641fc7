pub mod course_lister;
pub mod course_resolver;
pub mod date_extractor;
mod html;

pub use course_lister::CourseLister;
pub use course_resolver::CourseResolver;
pub use date_extractor::DateExtractor;
