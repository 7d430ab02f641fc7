//! HTML 解析辅助函数

use scraper::{ElementRef, Selector};

use crate::error::{AppError, AppResult};

/// 解析固定的 CSS 选择器
pub(crate) fn selector(css: &str) -> AppResult<Selector> {
    Selector::parse(css).map_err(|e| AppError::Config(format!("无效的选择器 '{}': {}", css, e)))
}

/// 元素文本，空白折叠为单个空格
pub(crate) fn element_text(element: ElementRef) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
