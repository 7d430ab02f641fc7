//! # ufind-dates
//!
//! 按学习方向查询课程目录，并发抓取各课程的排课 XML，输出最近的上课日期
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有 HTTP 客户端，只暴露 `PageFetcher::fetch` 能力
//!
//! ### ② 业务能力层（Services）
//! - `CourseResolver` - 学习方向编号 → 课程总览页路径
//! - `CourseLister` - 总览页 → 课程编号列表
//! - `DateExtractor` - 单个课程 XML → 未来的排课
//!
//! ### ③ 流程层（Workflow）
//! - `FetchTask` - 单门课程：抓取 → 解析 → 提取
//!
//! ### ④ 编排层（Orchestration）
//! - `ConcurrentDateFetcher` - 有界并发扇出、快速失败、去重排序截断
//! - `Pipeline` - 串联以上各步
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, NetworkError};
pub use infrastructure::{HttpFetcher, PageFetcher};
pub use models::{CourseNumber, SessionDate, StudyDirectionId};
pub use orchestrator::{ConcurrentDateFetcher, Pipeline, PipelineOutcome};
pub use workflow::FetchTask;
