pub mod session_date;
pub mod study_direction;

pub use session_date::SessionDate;
pub use study_direction::{CourseNumber, StudyDirectionId};
