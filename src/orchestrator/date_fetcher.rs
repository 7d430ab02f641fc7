//! 并发日期抓取器 - 编排层
//!
//! ## 职责
//!
//! 1. **扇出**：为每个课程编号创建一个 `FetchTask`，随机选择镜像
//! 2. **并发控制**：使用 Semaphore 限制同时进行的请求数
//! 3. **扇入**：按完成顺序合并结果，集合语义去重
//! 4. **快速失败**：第一个网络错误取消整批任务
//! 5. **排序截断**：按开始时间升序，只保留前 `max_dates` 条
//!
//! 日期或 XML 格式错误只影响对应课程，其余任务继续执行；
//! 整批完成后再返回第一个此类错误。

use rand::seq::SliceRandom;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::PageFetcher;
use crate::models::{CourseNumber, SessionDate};
use crate::services::DateExtractor;
use crate::utils::logging::log_fetch_complete;
use crate::workflow::FetchTask;

/// 并发日期抓取器
pub struct ConcurrentDateFetcher {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<DateExtractor>,
    config: Arc<Config>,
    limit: usize,
}

impl ConcurrentDateFetcher {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: Arc<Config>) -> Self {
        let limit = config.max_concurrent_requests();
        Self::with_limit(fetcher, config, limit)
    }

    /// 指定最大并发数（至少为 1）
    pub fn with_limit(fetcher: Arc<dyn PageFetcher>, config: Arc<Config>, limit: usize) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(DateExtractor::new(config.max_dates)),
            config,
            limit: limit.max(1),
        }
    }

    /// 抓取所有课程的未来日期
    ///
    /// # 返回
    /// 去重、按开始时间排序并截断后的日期列表
    pub async fn fetch_all(&self, course_numbers: &[CourseNumber]) -> AppResult<Vec<SessionDate>> {
        let limit = self.limit;
        let semaphore = Arc::new(Semaphore::new(limit));
        let cancel = CancellationToken::new();
        let mut tasks: JoinSet<AppResult<Option<HashSet<SessionDate>>>> = JoinSet::new();

        debug!("并发抓取 {} 门课程，最大并发数 {}", course_numbers.len(), limit);

        for course_number in course_numbers {
            let instance = pick_instance(&self.config.instances)?;
            let url = self.config.course_url(instance, course_number.as_str());
            let task = FetchTask::new(course_number.clone(), url);

            let semaphore = semaphore.clone();
            let cancel = cancel.clone();
            let fetcher = self.fetcher.clone();
            let extractor = self.extractor.clone();

            tasks.spawn(async move {
                let _permit = tokio::select! {
                    permit = semaphore.acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_) => return Ok(None),
                    },
                    _ = cancel.cancelled() => return Ok(None),
                };

                tokio::select! {
                    result = task.run(fetcher.as_ref(), &extractor, &cancel) => {
                        if let Err(e) = &result {
                            warn!("{} ❌ {}", task, e);
                        }
                        result
                    }
                    _ = cancel.cancelled() => Ok(None),
                }
            });
        }

        let total = tasks.len();
        let mut merged = BTreeSet::new();
        let mut first_failure: Option<AppError> = None;
        let mut with_dates = 0;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(Some(dates))) => {
                    with_dates += 1;
                    merged.extend(dates);
                }
                Ok(Ok(None)) => {}
                Ok(Err(e)) if e.is_network() => {
                    error!("网络错误，取消剩余 {} 个任务: {}", tasks.len(), e);
                    cancel.cancel();
                    tasks.abort_all();
                    return Err(e);
                }
                Ok(Err(e)) => {
                    first_failure.get_or_insert(e);
                }
                Err(join_err) if join_err.is_cancelled() => {}
                Err(join_err) => {
                    cancel.cancel();
                    tasks.abort_all();
                    return Err(AppError::TaskFailed(join_err));
                }
            }
        }

        if let Some(e) = first_failure {
            return Err(e);
        }

        log_fetch_complete(total, with_dates, merged.len());

        Ok(merged.into_iter().take(self.config.max_dates).collect())
    }
}

/// 随机选择一个镜像实例
pub fn pick_instance(instances: &[String]) -> AppResult<&str> {
    instances
        .choose(&mut rand::thread_rng())
        .map(String::as_str)
        .ok_or_else(|| AppError::Config("没有可用的镜像实例".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    enum Reply {
        Body(String),
        Status(u16),
        Hang,
    }

    /// 按课程编号返回固定内容的抓取器
    struct CourseFetcher {
        replies: HashMap<String, Reply>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl CourseFetcher {
        fn new<K: Into<String>>(replies: Vec<(K, Reply)>) -> Self {
            Self {
                replies: replies.into_iter().map(|(k, v)| (k.into(), v)).collect(),
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for CourseFetcher {
        async fn fetch(&self, url: &str) -> Result<String, NetworkError> {
            let number = url.split('/').rev().nth(1).unwrap_or_default();
            self.calls.fetch_add(1, Ordering::SeqCst);

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.replies.get(number) {
                Some(Reply::Body(body)) => Ok(body.clone()),
                Some(Reply::Status(status)) => Err(NetworkError::HttpStatus {
                    status: *status,
                    reason: "Bad Gateway".to_string(),
                    url: url.to_string(),
                }),
                Some(Reply::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(String::new())
                }
                None => Err(NetworkError::HttpStatus {
                    status: 404,
                    reason: "Not Found".to_string(),
                    url: url.to_string(),
                }),
            }
        }
    }

    fn course_xml(name: &str, events: &[(&str, &str, &str)]) -> Reply {
        let events: String = events
            .iter()
            .map(|(begin, end, room)| {
                format!(
                    r#"<wwevent begin="{}" end="{}"><location><room>{}</room><address>Uni</address></location></wwevent>"#,
                    begin, end, room
                )
            })
            .collect();
        Reply::Body(format!(
            "<course><longname>{}</longname><type>VO</type><groups><group><wwlong>{}</wwlong></group></groups></course>",
            name, events
        ))
    }

    fn config(max_dates: usize) -> Arc<Config> {
        Arc::new(Config {
            max_dates,
            instances: vec!["https://m1.example".to_string(), "https://m2.example/".to_string()],
            ..Config::default()
        })
    }

    fn numbers(numbers: &[&str]) -> Vec<CourseNumber> {
        numbers.iter().map(|n| CourseNumber::new(*n)).collect()
    }

    #[tokio::test]
    async fn test_identical_dates_from_different_courses_collapse() {
        let shared = ("2099-05-01T10:00+02:00", "2099-05-01T12:00+02:00", "Room 1");
        let fetcher = Arc::new(CourseFetcher::new(vec![
            ("1", course_xml("Intro", &[shared])),
            ("2", course_xml("Intro", &[shared])),
        ]));

        let dates = ConcurrentDateFetcher::new(fetcher, config(10))
            .fetch_all(&numbers(&["1", "2"]))
            .await
            .unwrap();

        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].location, "Room 1 Uni");
    }

    #[tokio::test]
    async fn test_result_is_sorted_and_capped() {
        let fetcher = Arc::new(CourseFetcher::new(vec![
            (
                "1",
                course_xml("A", &[
                    ("2099-05-09T10:00+02:00", "2099-05-09T12:00+02:00", "HS 1"),
                    ("2099-05-03T10:00+02:00", "2099-05-03T12:00+02:00", "HS 1"),
                    ("2099-05-07T10:00+02:00", "2099-05-07T12:00+02:00", "HS 1"),
                ]),
            ),
            (
                "2",
                course_xml("B", &[
                    ("2099-05-01T10:00+02:00", "2099-05-01T12:00+02:00", "HS 2"),
                    ("2099-05-08T10:00+02:00", "2099-05-08T12:00+02:00", "HS 2"),
                ]),
            ),
            ("3", course_xml("C", &[("2099-05-02T10:00+02:00", "2099-05-02T12:00+02:00", "HS 3")])),
        ]));

        let dates = ConcurrentDateFetcher::new(fetcher, config(4))
            .fetch_all(&numbers(&["1", "2", "3"]))
            .await
            .unwrap();

        let days: Vec<String> = dates.iter().map(|d| d.start.format("%d").to_string()).collect();
        assert_eq!(days, vec!["01", "02", "03", "07"]);
    }

    #[tokio::test]
    async fn test_courses_without_schedule_are_ignored() {
        let fetcher = Arc::new(CourseFetcher::new(vec![
            ("1", Reply::Body("<course><longname>Leer</longname></course>".to_string())),
            ("2", course_xml("B", &[("2099-05-01T10:00+02:00", "2099-05-01T12:00+02:00", "HS 2")])),
        ]));

        let dates = ConcurrentDateFetcher::new(fetcher, config(10))
            .fetch_all(&numbers(&["1", "2"]))
            .await
            .unwrap();

        assert_eq!(dates.len(), 1);
    }

    #[tokio::test]
    async fn test_network_error_fails_whole_batch_without_waiting() {
        let fetcher = Arc::new(CourseFetcher::new(vec![
            ("1", course_xml("A", &[("2099-05-01T10:00+02:00", "2099-05-01T12:00+02:00", "HS 1")])),
            ("2", Reply::Status(502)),
            ("3", Reply::Hang),
        ]));

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            ConcurrentDateFetcher::new(fetcher, config(10)).fetch_all(&numbers(&["1", "2", "3"])),
        )
        .await
        .expect("网络错误后不应继续等待挂起的任务");

        let err = tokio_test::assert_err!(result);
        assert!(err.is_network());
        assert!(err.to_string().starts_with("HTTP Error: 502"));
    }

    #[tokio::test]
    async fn test_malformed_date_does_not_cancel_siblings() {
        let fetcher = Arc::new(CourseFetcher::new(vec![
            ("1", course_xml("A", &[("morgen", "2099-05-01T12:00+02:00", "HS 1")])),
            ("2", course_xml("B", &[("2099-05-01T10:00+02:00", "2099-05-01T12:00+02:00", "HS 2")])),
        ]));

        let result = ConcurrentDateFetcher::new(fetcher.clone(), config(10))
            .fetch_all(&numbers(&["1", "2"]))
            .await;

        assert!(matches!(result, Err(AppError::MalformedDate { .. })));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_network_error_wins_over_malformed_date() {
        let fetcher = Arc::new(CourseFetcher::new(vec![
            ("1", course_xml("A", &[("morgen", "2099-05-01T12:00+02:00", "HS 1")])),
            ("2", Reply::Status(500)),
        ]));

        let err = ConcurrentDateFetcher::new(fetcher, config(10))
            .fetch_all(&numbers(&["1", "2"]))
            .await
            .unwrap_err();

        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let limit = 3;
        let replies = (0..12).map(|i| (i.to_string(), course_xml("X", &[]))).collect();
        let fetcher = Arc::new(CourseFetcher::new(replies));
        let course_numbers: Vec<CourseNumber> = (0..12).map(|i| CourseNumber::new(i.to_string())).collect();

        ConcurrentDateFetcher::with_limit(fetcher.clone(), config(10), limit)
            .fetch_all(&course_numbers)
            .await
            .unwrap();

        // 请求确实重叠执行，且从未超过上限
        assert_eq!(fetcher.max_in_flight.load(Ordering::SeqCst), limit);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 12);
    }

    #[tokio::test]
    async fn test_empty_course_list() {
        let fetcher = Arc::new(CourseFetcher::new(Vec::<(String, Reply)>::new()));
        let dates = ConcurrentDateFetcher::new(fetcher, config(10)).fetch_all(&[]).await.unwrap();
        assert!(dates.is_empty());
    }

    #[test]
    fn test_pick_instance() {
        let instances = vec!["https://m1.example".to_string(), "https://m2.example".to_string()];
        for _ in 0..20 {
            assert!(instances.iter().any(|i| i == pick_instance(&instances).unwrap()));
        }
        assert!(matches!(pick_instance(&[]), Err(AppError::Config(_))));
    }
}
