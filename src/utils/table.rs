//! 控制台表格输出

use crate::models::SessionDate;

const NAME_WIDTH: usize = 50;
const ELLIPSIS: &str = "...";

/// 渲染日期表格（含表头和分隔线），每行以换行结尾
pub fn render_table(dates: &[SessionDate]) -> String {
    let mut out = row("Date", "Start", "End", "Type", "Name", "Location");
    out.push_str(&format!(
        "-----------+-------+-------+------+{}+{}\n",
        "-".repeat(NAME_WIDTH + 2),
        "-".repeat(NAME_WIDTH + 2)
    ));

    for date in dates {
        out.push_str(&row(
            &date.start.format("%d.%m.%Y").to_string(),
            &date.start.format("%H:%M").to_string(),
            &date.end.format("%H:%M").to_string(),
            &date.course_type,
            &truncate_text(&date.course_name, NAME_WIDTH),
            &date.location,
        ));
    }

    out
}

fn row(date: &str, start: &str, end: &str, kind: &str, name: &str, location: &str) -> String {
    format!(
        "{:<10} | {:<5} | {:<5} | {:<4} | {:<50} | {}\n",
        date, start, end, kind, name, location
    )
}

/// 截断长文本
///
/// 超过 `max_len` 个字符时截断，结果（含 `...`）恰好 `max_len` 个字符
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let keep = max_len.saturating_sub(ELLIPSIS.len());
    text.chars().take(keep).collect::<String>() + ELLIPSIS
}
