/// 程序配置
///
/// 所有值在编译期有默认值，可通过环境变量覆盖；不读取配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 课程目录站点根地址
    pub base_url: String,
    /// 目录页语言
    pub locale: String,
    /// 学期代码，例如 2026W
    pub term: String,
    /// 最多收集/显示的日期数量
    pub max_dates: usize,
    /// 课程 XML 镜像实例
    pub instances: Vec<String>,
    /// 并发系数（乘以可用 CPU 数）
    pub concurrency_factor: usize,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://ufind.univie.ac.at".to_string(),
            locale: "de".to_string(),
            term: "2026W".to_string(),
            max_dates: 10,
            instances: vec![
                "https://m1-ufind.univie.ac.at".to_string(),
                "https://m2-ufind.univie.ac.at".to_string(),
            ],
            concurrency_factor: 5,
            request_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("UFIND_BASE_URL").unwrap_or(default.base_url),
            locale: std::env::var("UFIND_LOCALE").unwrap_or(default.locale),
            term: std::env::var("UFIND_TERM").unwrap_or(default.term),
            max_dates: std::env::var("UFIND_MAX_DATES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_dates),
            instances: std::env::var("UFIND_INSTANCES").ok().map(|v| parse_instances(&v)).filter(|v| !v.is_empty()).unwrap_or(default.instances),
            concurrency_factor: std::env::var("UFIND_CONCURRENCY_FACTOR").ok().and_then(|v| v.parse().ok()).unwrap_or(default.concurrency_factor),
            request_timeout_secs: std::env::var("UFIND_REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 目录首页地址
    pub fn catalog_url(&self) -> String {
        format!("{}/cache/{}/main.html", self.base_url.trim_end_matches('/'), self.locale)
    }

    /// 课程总览页地址
    pub fn overview_url(&self, path: &str) -> String {
        format!("{}/cache/{}/{}.html", self.base_url.trim_end_matches('/'), self.locale, path)
    }

    /// 单门课程的 XML 地址
    pub fn course_url(&self, instance: &str, course_number: &str) -> String {
        format!(
            "{}/courses/{}/{}",
            instance.trim_end_matches('/'),
            course_number,
            self.term
        )
    }

    /// 同时进行的请求上限：并发系数 × 可用并行度
    pub fn max_concurrent_requests(&self) -> usize {
        let parallelism = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        (self.concurrency_factor * parallelism).max(1)
    }
}

fn parse_instances(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
