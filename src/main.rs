use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;
use ufind_dates::utils::{logging, table};
use ufind_dates::{AppError, Config, HttpFetcher, Pipeline, PipelineOutcome, StudyDirectionId};

const EXIT_USAGE: u8 = 1;
const EXIT_NOT_FOUND: u8 = 1;
const EXIT_FAILURE: u8 = 2;

/// Lists the upcoming course dates of a direction of study at the University of Vienna.
#[derive(Parser, Debug)]
#[command(name = "ufind-dates", version)]
struct Cli {
    /// Direction of study id, e.g. 0.01 (prompted for when missing)
    study_direction: Option<String>,

    /// Show debug logs on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::from_env();
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logging::init(config.verbose_logging);
    logging::log_startup(&config);

    let input = match cli.study_direction {
        Some(input) => input,
        None => match read_study_direction() {
            Ok(input) => input,
            Err(e) => {
                eprintln!("{:#}", e);
                return ExitCode::from(EXIT_USAGE);
            }
        },
    };

    let id = match StudyDirectionId::parse(&input) {
        Ok(id) => id,
        Err(_) => {
            eprintln!(
                "'{}' is not a valid direction of study.\n\
                 Please specify a direction of study listed on https://ufind.univie.ac.at/de/vvz.html\n\
                 For example '0.01' for individual studies.",
                input.trim()
            );
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match run(config, &id).await {
        Ok(code) => code,
        Err(e) => {
            error!("❌ {}", e);
            eprintln!("{}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(config: Config, id: &StudyDirectionId) -> Result<ExitCode, AppError> {
    let fetcher = HttpFetcher::new(&config)?;
    let pipeline = Pipeline::new(Arc::new(fetcher), Arc::new(config));

    let code = match pipeline.run(id).await? {
        PipelineOutcome::Dates(dates) => {
            print!("{}", table::render_table(&dates));
            ExitCode::SUCCESS
        }
        PipelineOutcome::CourseNotFound => {
            println!("Could not find Course with number '{}'", id);
            ExitCode::from(EXIT_NOT_FOUND)
        }
        PipelineOutcome::NoCourses { .. } => {
            println!("No courses listed for direction of study '{}'", id);
            ExitCode::from(EXIT_NOT_FOUND)
        }
    };

    Ok(code)
}

/// 未提供参数时从标准输入读取
fn read_study_direction() -> Result<String> {
    print!("Please enter a direction of study id (e.g. 0.01): ");
    io::stdout().flush().context("无法刷新标准输出")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("无法读取标准输入")?;

    Ok(line.trim().to_string())
}
