use regex::Regex;
use std::fmt::{self, Display};
use std::sync::OnceLock;

use crate::error::{AppError, AppResult};

/// 学习方向编号，例如 `0.01`、`33.21`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyDirectionId(String);

impl StudyDirectionId {
    /// 校验并创建编号（一到两位数字、点、两位数字）
    pub fn parse(input: &str) -> AppResult<Self> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = PATTERN.get_or_init(|| {
            Regex::new(r"^[0-9]{1,2}\.[0-9]{2}$").expect("study direction pattern is valid")
        });

        let input = input.trim();
        if pattern.is_match(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(AppError::invalid_input(input))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 第一个点之前的主分组编号
    pub fn main_group(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }
}

impl Display for StudyDirectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 课程编号（仅在单个学期内有效）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CourseNumber(String);

impl CourseNumber {
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CourseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
