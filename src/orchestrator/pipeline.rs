//! 主流程 - 编排层
//!
//! 学习方向编号 → 总览页路径 → 课程编号 → 排课日期

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::PageFetcher;
use crate::models::{SessionDate, StudyDirectionId};
use crate::orchestrator::date_fetcher::ConcurrentDateFetcher;
use crate::services::{CourseLister, CourseResolver};
use crate::utils::logging::log_courses_listed;

/// 主流程结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// 目录中没有该学习方向
    CourseNotFound,
    /// 总览页没有列出任何课程
    NoCourses { path: String },
    /// 排好序的未来日期
    Dates(Vec<SessionDate>),
}

/// 主流程
pub struct Pipeline {
    resolver: CourseResolver,
    lister: CourseLister,
    date_fetcher: ConcurrentDateFetcher,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: Arc<Config>) -> Self {
        Self {
            resolver: CourseResolver::new(fetcher.clone(), config.clone()),
            lister: CourseLister::new(fetcher.clone(), config.clone()),
            date_fetcher: ConcurrentDateFetcher::new(fetcher, config),
        }
    }

    pub async fn run(&self, id: &StudyDirectionId) -> AppResult<PipelineOutcome> {
        let Some(path) = self.resolver.resolve(id).await? else {
            warn!("⚠️ 目录中找不到学习方向 {}", id);
            return Ok(PipelineOutcome::CourseNotFound);
        };

        let course_numbers = self.lister.list(&path).await?;
        if course_numbers.is_empty() {
            warn!("⚠️ 总览页 {} 没有列出课程", path);
            return Ok(PipelineOutcome::NoCourses { path });
        }
        log_courses_listed(id.as_str(), course_numbers.len());

        let dates = self.date_fetcher.fetch_all(&course_numbers).await?;
        info!("✓ 共 {} 个即将到来的日期", dates.len());

        Ok(PipelineOutcome::Dates(dates))
    }
}
