//! 单门课程的抓取任务 - 流程层
//!
//! 定义"一门课"的完整处理流程：抓取 XML → 解析 → 提取排课

use chrono::Utc;
use roxmltree::Document;
use std::collections::HashSet;
use std::fmt::Display;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::infrastructure::PageFetcher;
use crate::models::{CourseNumber, SessionDate};
use crate::services::DateExtractor;

/// 抓取任务
///
/// 每次批量抓取时为每个课程编号创建一个，结果并入汇总后即丢弃
#[derive(Debug, Clone)]
pub struct FetchTask {
    /// 课程编号
    pub course_number: CourseNumber,

    /// 请求地址（已选定镜像）
    pub url: String,
}

impl FetchTask {
    pub fn new(course_number: CourseNumber, url: String) -> Self {
        Self { course_number, url }
    }

    /// 执行任务
    ///
    /// # 返回
    /// - `Ok(None)`: 文档没有排课数据，或任务在发起请求前已被取消
    /// - `Ok(Some(set))`: 该课程未来的排课
    pub async fn run(
        &self,
        fetcher: &dyn PageFetcher,
        extractor: &DateExtractor,
        cancel: &CancellationToken,
    ) -> AppResult<Option<HashSet<SessionDate>>> {
        if cancel.is_cancelled() {
            debug!("{} 已取消，跳过请求", self);
            return Ok(None);
        }

        let xml = fetcher.fetch(&self.url).await?;
        let doc = Document::parse(&xml).map_err(|source| AppError::MalformedXml {
            url: self.url.clone(),
            source,
        })?;

        let dates = extractor.extract(&doc, Utc::now())?;
        match &dates {
            Some(dates) => debug!("{} 找到 {} 个未来日期", self, dates.len()),
            None => debug!("{} 没有排课数据", self),
        }
        Ok(dates)
    }
}

impl Display for FetchTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[课程 #{}]", self.course_number)
    }
}
