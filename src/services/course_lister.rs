//! 课程列表服务 - 业务能力层
//!
//! 读取课程总览页，列出其中的课程编号

use scraper::Html;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::PageFetcher;
use crate::models::CourseNumber;
use crate::services::html::{element_text, selector};

/// 课程列表服务
pub struct CourseLister {
    fetcher: Arc<dyn PageFetcher>,
    config: Arc<Config>,
}

impl CourseLister {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: Arc<Config>) -> Self {
        Self { fetcher, config }
    }

    /// 列出总览页中的课程编号（按文档顺序，保留重复）
    pub async fn list(&self, path: &str) -> AppResult<Vec<CourseNumber>> {
        let url = self.config.overview_url(path);
        let html = self.fetcher.fetch(&url).await?;
        let numbers = parse_course_numbers(&html)?;

        info!("✓ 总览页 {} 共列出 {} 门课程", path, numbers.len());
        Ok(numbers)
    }
}

pub fn parse_course_numbers(html: &str) -> AppResult<Vec<CourseNumber>> {
    let document = Html::parse_document(html);
    let number_selector = selector(".list.course .number")?;

    Ok(document
        .select(&number_selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .map(CourseNumber::new)
        .collect())
}
