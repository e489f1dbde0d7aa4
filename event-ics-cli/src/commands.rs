use std::fs;

use anyhow::{Context, Result};
use chrono::{Datelike, Timelike};
use event_ics_core::prelude::*;

use crate::EventArgs;

impl EventArgs {
    /// 合并 `--event` 文件与命令行字段
    pub fn into_event(self) -> Result<EventInfo> {
        let mut event = match self.event {
            Some(ref path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("无法读取活动文件: {path}"))?;
                EventInfo::from_json(&content)?
            }
            None => EventInfo::default(),
        };

        let overrides = [
            (&mut event.title, self.title),
            (&mut event.date, self.date),
            (&mut event.date_end, self.date_end),
            (&mut event.time, self.time),
            (&mut event.time_end, self.time_end),
            (&mut event.description, self.description),
            (&mut event.image, self.image),
            (&mut event.colour, self.colour),
        ];
        for (field, value) in overrides {
            if value.is_some() {
                *field = value;
            }
        }

        Ok(event)
    }
}

/// 生成日历命令参数
pub struct GenerateParams {
    pub event: EventInfo,
    pub output: Option<String>,
    pub stdout: bool,
    pub calendar_name: Option<String>,
    pub timezone: String,
}

/// 生成日历命令
pub fn generate_command(params: GenerateParams) -> Result<()> {
    let options = IcsOptions {
        calendar_name: params.calendar_name,
        time_policy: TimePolicy::from_name(&params.timezone)?,
        ..Default::default()
    };

    tracing::info!(
        "开始生成日历: 标题={:?}, 时区={}",
        params.event.title(),
        options.time_policy.zone
    );

    let exporter = EventExporter::new(options);
    let Some(download) = exporter.prepare_download(&params.event)? else {
        println!("未提供开始或结束日期，未生成日历文件");
        return Ok(());
    };

    if params.stdout {
        print!("{}", download.body);
        return Ok(());
    }

    // 确定输出文件名
    let output_file = params.output.unwrap_or(download.filename);

    // 写入文件
    fs::write(&output_file, download.body)
        .with_context(|| format!("无法写入文件: {output_file}"))?;
    println!("✓ ICS文件已保存到: {output_file}");

    Ok(())
}

/// 渲染卡片命令
pub fn render_command(
    event: EventInfo,
    output: Option<String>,
    back_href: String,
    download_href: Option<String>,
) -> Result<()> {
    let download_href = download_href
        .unwrap_or_else(|| calendar_filename(event.title().unwrap_or_default()));
    let links = CardLinks {
        back_href,
        download_href,
    };

    let Some(html) = render_card(&event, &links, &Theme::default()) else {
        println!("未提供标题，不渲染卡片");
        return Ok(());
    };

    match output {
        Some(path) => {
            fs::write(&path, html).with_context(|| format!("无法写入文件: {path}"))?;
            println!("✓ 卡片已保存到: {path}");
        }
        None => println!("{html}"),
    }

    Ok(())
}

/// 格式化时间戳命令
pub fn timestamp_command(date: &str, time: Option<&str>, timezone: &str) -> Result<()> {
    let parser = HumanDateParser::new(TimePolicy::from_name(timezone)?);
    let instant = parser.parse_instant(date, time)?;
    println!("{}", format_ics_timestamp(&instant));
    Ok(())
}

/// 解析时间戳命令
pub fn parse_timestamp_command(timestamp: &str) -> Result<()> {
    let instant = parse_ics_timestamp(timestamp)?;
    println!("年: {}", instant.year());
    println!("月: {}", instant.month());
    println!("日: {}", instant.day());
    println!("时: {}", instant.hour());
    println!("分: {}", instant.minute());
    println!("秒: {}", instant.second());
    println!("RFC 3339: {}", instant.to_rfc3339());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_event_file() {
        let path = std::env::temp_dir().join(format!("event-ics-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{"title":"From file","date":"Sunday 10th September 2023","time":"9:00am"}"#,
        )
        .unwrap();

        let args = EventArgs {
            event: Some(path.display().to_string()),
            time: Some("3:00pm".to_string()),
            ..Default::default()
        };
        let event = args.into_event().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(event.title(), Some("From file"));
        assert_eq!(event.date(), Some("Sunday 10th September 2023"));
        assert_eq!(event.time(), Some("3:00pm"));
    }

    #[test]
    fn missing_event_file_is_reported() {
        let args = EventArgs {
            event: Some("/nonexistent/event.json".to_string()),
            ..Default::default()
        };
        let err = args.into_event().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/event.json"));
    }

    #[test]
    fn generate_writes_file() {
        let path = std::env::temp_dir().join(format!("event-ics-{}.ics", std::process::id()));
        generate_command(GenerateParams {
            event: EventInfo {
                title: Some("Open Day".to_string()),
                date: Some("Sunday 10th September 2023".to_string()),
                time: Some("3:00pm".to_string()),
                ..Default::default()
            },
            output: Some(path.display().to_string()),
            stdout: false,
            calendar_name: None,
            timezone: "UTC".to_string(),
        })
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(content.contains("DTSTART:20230910T150000Z"));
        assert!(content.contains("DTEND:20230910T150000Z"));
    }

    #[test]
    fn unknown_timezone_fails() {
        assert!(timestamp_command("Sunday 10th September 2023", None, "Nowhere/Land").is_err());
    }
}
