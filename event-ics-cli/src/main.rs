mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "event-ics")]
#[command(about = "活动卡片日历导出工具")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 启用详细日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// 活动字段，命令行参数覆盖 `--event` 文件中的同名字段
#[derive(Args, Debug, Default)]
struct EventArgs {
    /// 从JSON文件读取活动字段
    #[arg(short, long)]
    event: Option<String>,

    /// 标题
    #[arg(short, long)]
    title: Option<String>,

    /// 开始日期，例如 "Sunday 10th September 2023"
    #[arg(short, long)]
    date: Option<String>,

    /// 结束日期
    #[arg(long)]
    date_end: Option<String>,

    /// 开始时间，例如 "3:00pm"
    #[arg(long)]
    time: Option<String>,

    /// 结束时间
    #[arg(long)]
    time_end: Option<String>,

    /// 描述（HTML片段）
    #[arg(long)]
    description: Option<String>,

    /// 图片URL
    #[arg(long)]
    image: Option<String>,

    /// 标题标记颜色
    #[arg(long)]
    colour: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// 生成ICS日历文件
    Generate {
        #[command(flatten)]
        fields: EventArgs,

        /// 输出文件路径（默认：<标题>.ics）
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<String>,

        /// 输出到标准输出
        #[arg(long)]
        stdout: bool,

        /// 日历名称
        #[arg(long, env = "EVENT_ICS_CALENDAR_NAME")]
        calendar_name: Option<String>,

        /// 解释本地时间所用的时区 (IANA名称)
        #[arg(long, env = "EVENT_ICS_TIMEZONE", default_value = "UTC")]
        timezone: String,
    },

    /// 渲染活动卡片HTML
    Render {
        #[command(flatten)]
        fields: EventArgs,

        /// 输出文件路径（默认：标准输出）
        #[arg(short, long)]
        output: Option<String>,

        /// 返回箭头的链接
        #[arg(long, default_value = "#")]
        back_href: String,

        /// 下载链接（默认：<标题>.ics）
        #[arg(long)]
        download_href: Option<String>,
    },

    /// 把日期时间格式化为ICS时间戳，或解析ICS时间戳
    Timestamp {
        /// 日期，例如 "Sunday 10th September 2023"
        #[arg(required_unless_present = "parse")]
        date: Option<String>,

        /// 时间，例如 "3:00pm"
        #[arg(long)]
        time: Option<String>,

        /// 解析一个ICS时间戳，例如 20230910T150000Z
        #[arg(long, conflicts_with_all = ["date", "time"])]
        parse: Option<String>,

        /// 解释本地时间所用的时区 (IANA名称)
        #[arg(long, env = "EVENT_ICS_TIMEZONE", default_value = "UTC")]
        timezone: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 设置日志级别
    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("event_ics_cli={log_level},event_ics_core={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate {
            fields,
            output,
            stdout,
            calendar_name,
            timezone,
        } => commands::generate_command(commands::GenerateParams {
            event: fields.into_event()?,
            output,
            stdout,
            calendar_name,
            timezone,
        }),

        Commands::Render {
            fields,
            output,
            back_href,
            download_href,
        } => commands::render_command(fields.into_event()?, output, back_href, download_href),

        Commands::Timestamp {
            date,
            time,
            parse,
            timezone,
        } => match parse {
            Some(timestamp) => commands::parse_timestamp_command(&timestamp),
            None => commands::timestamp_command(
                date.as_deref().unwrap_or_default(),
                time.as_deref(),
                &timezone,
            ),
        },
    }
}
