//! 课程定位服务 - 业务能力层
//!
//! 根据学习方向编号，在目录首页找到课程总览页的内部路径

use regex::Regex;
use scraper::Html;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::PageFetcher;
use crate::models::StudyDirectionId;
use crate::services::html::{element_text, selector};

/// 课程定位服务
pub struct CourseResolver {
    fetcher: Arc<dyn PageFetcher>,
    config: Arc<Config>,
}

impl CourseResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: Arc<Config>) -> Self {
        Self { fetcher, config }
    }

    /// 查找课程总览页路径
    ///
    /// # 返回
    /// 找不到对应的学习方向时返回 `None`
    pub async fn resolve(&self, id: &StudyDirectionId) -> AppResult<Option<String>> {
        let url = self.config.catalog_url();
        info!("🔍 正在目录中查找学习方向 {}", id);

        let html = self.fetcher.fetch(&url).await?;
        let path = find_overview_path(&html, id)?;

        match &path {
            Some(path) => debug!("学习方向 {} → path={}", id, path),
            None => debug!("目录中没有学习方向 {}", id),
        }
        Ok(path)
    }
}

/// 在目录页 HTML 中查找路径
///
/// 先按主分组（`<主编号>.`）筛选目录条目，再在条目内找标签以 `<编号> ` 开头的链接，
/// 取其 href 中 `path=` 后的数字
pub fn find_overview_path(html: &str, id: &StudyDirectionId) -> AppResult<Option<String>> {
    let document = Html::parse_document(html);
    let entry_selector = selector(".usse-id-vvz")?;
    let link_selector = selector("div div a")?;
    let path_pattern = Regex::new(r"path=([0-9]+)")
        .map_err(|e| AppError::Config(e.to_string()))?;

    let group_prefix = format!("{}.", id.main_group());
    let label_prefix = format!("{} ", id.as_str());

    let path = document
        .select(&entry_selector)
        .filter(|entry| {
            entry
                .select(&link_selector)
                .next()
                .map(|first| element_text(first).starts_with(&group_prefix))
                .unwrap_or(false)
        })
        .flat_map(|entry| entry.select(&link_selector))
        .filter(|link| element_text(*link).starts_with(&label_prefix))
        .find_map(|link| {
            let href = link.value().attr("href")?;
            path_pattern
                .captures(href)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        });

    Ok(path)
}
