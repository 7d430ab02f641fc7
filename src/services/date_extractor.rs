//! 日期提取服务 - 业务能力层
//!
//! 只负责"从一份课程 XML 中取出未来的排课"，不关心文档从哪里来

use chrono::{DateTime, FixedOffset, Utc};
use roxmltree::{Document, Node};
use std::collections::HashSet;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::SessionDate;

/// 只显示房间名、不拼接地址的房间
static ROOM_ONLY: phf::Set<&'static str> = phf::phf_set! {
    "Digital",
    "Hybride Lehre",
};

const NO_NAME: &str = "No name found";
const NO_LOCATION: &str = "undefined";

/// 日期提取服务
///
/// 职责：
/// - 找到文档中的课程分组
/// - 读取课程名称、类型
/// - 按文档顺序遍历事件，保留晚于当前时间的排课
/// - 单个文档最多返回 `max_dates` 条
pub struct DateExtractor {
    max_dates: usize,
}

impl DateExtractor {
    pub fn new(max_dates: usize) -> Self {
        Self { max_dates }
    }

    /// 提取排课
    ///
    /// # 返回
    /// - `Ok(None)`: 文档没有课程分组（没有排课数据）
    /// - `Ok(Some(set))`: 未来的排课，可能为空
    /// - `Err(MalformedDate)`: 时间字段格式错误
    pub fn extract(&self, doc: &Document, now: DateTime<Utc>) -> AppResult<Option<HashSet<SessionDate>>> {
        let Some(group) = find_group(doc) else {
            debug!("文档中没有课程分组");
            return Ok(None);
        };

        let course_name = first_text(doc.root(), "longname").unwrap_or_else(|| NO_NAME.to_string());
        let course_type = first_text(doc.root(), "type").unwrap_or_default();

        let mut dates = HashSet::new();
        if self.max_dates == 0 {
            return Ok(Some(dates));
        }

        for event in events(group) {
            let start = parse_timestamp("begin", event.attribute("begin").unwrap_or(""))?;
            if start <= now {
                continue;
            }

            let location = extract_location(event);
            let end = parse_timestamp("end", event.attribute("end").unwrap_or(""))?;
            dates.insert(SessionDate::new(start, end, location, course_name.clone(), course_type.clone()));

            // 已收集够显示数量，剩余事件无需再解析
            if dates.len() >= self.max_dates {
                break;
            }
        }

        Ok(Some(dates))
    }
}

/// 解析带时区偏移的 ISO-8601 时间，秒可省略，偏移可写作 `Z`
pub fn parse_timestamp(field: &'static str, value: &str) -> AppResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|e| match value.strip_suffix('Z').or_else(|| value.strip_suffix('z')) {
            Some(local) => DateTime::parse_from_str(&format!("{}+00:00", local), "%Y-%m-%dT%H:%M%:z"),
            None => DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%:z").map_err(|_| e),
        })
        .map_err(|e| AppError::malformed_date(field, value, e))
}

/// 第一个 `course groups group`
fn find_group<'a, 'input>(doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
    descendants_named(doc.root(), "course")
        .flat_map(|course| descendants_named(course, "groups"))
        .flat_map(|groups| descendants_named(groups, "group"))
        .next()
}

/// 分组内位于 `wwlong` 之下的 `wwevent`，按文档顺序
fn events<'a, 'input>(group: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    descendants_named(group, "wwevent").filter(move |event| {
        event
            .ancestors()
            .skip(1)
            .take_while(|a| *a != group)
            .any(|a| a.has_tag_name("wwlong"))
    })
}

fn extract_location(event: Node) -> String {
    let parts: Vec<String> = descendants_named(event, "location")
        .map(|location| {
            let room = first_text(location, "room").unwrap_or_default();
            if ROOM_ONLY.contains(room.as_str()) {
                room
            } else {
                let address = first_text(location, "address").unwrap_or_default();
                format!("{} {}", room, address)
            }
        })
        .collect();

    if parts.is_empty() {
        NO_LOCATION.to_string()
    } else {
        parts.join(", ")
    }
}

/// 不含自身的同名后代元素
fn descendants_named<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .filter(move |n| n.is_element() && n.has_tag_name(name))
}

fn first_text(node: Node, name: &'static str) -> Option<String> {
    descendants_named(node, name).next().map(normalized_text)
}

/// 元素的全部文本，空白折叠为单个空格
fn normalized_text(node: Node) -> String {
    let raw: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
