use chrono::{DateTime, FixedOffset};

/// 一次排课（讲座、考试等）
///
/// 所有字段相同即视为同一条记录，用于去重；字段顺序决定排序（先按开始时间）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionDate {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub location: String,
    pub course_name: String,
    pub course_type: String,
}

impl SessionDate {
    pub fn new(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        location: impl Into<String>,
        course_name: impl Into<String>,
        course_type: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            location: location.into(),
            course_name: course_name.into(),
            course_type: course_type.into(),
        }
    }
}
