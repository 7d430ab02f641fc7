//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `pipeline` - 主流程
//! - 依次调用 CourseResolver → CourseLister → ConcurrentDateFetcher
//! - 把"找不到"表达为结果而不是错误
//!
//! ### `date_fetcher` - 并发日期抓取器
//! - 扇出/扇入所有 FetchTask
//! - 控制并发数量（Semaphore）
//! - 网络错误时取消整批任务（CancellationToken）
//!
//! ## 层次关系
//!
//! ```text
//! pipeline
//!     ↓
//! date_fetcher (处理 Vec<CourseNumber>)
//!     ↓
//! workflow::FetchTask (处理单个课程)
//!     ↓
//! services (能力层：resolver / lister / extractor)
//!     ↓
//! infrastructure (基础设施：PageFetcher)
//! ```

pub mod date_fetcher;
pub mod pipeline;

pub use date_fetcher::ConcurrentDateFetcher;
pub use pipeline::{Pipeline, PipelineOutcome};
