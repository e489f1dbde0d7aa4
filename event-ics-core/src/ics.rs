use chrono::Utc;
use uuid::Uuid;

use crate::{
    CALENDAR_CONTENT_TYPE, CalendarDownload, Error, IcsEvent, IcsOptions, Result,
    timestamp::format_ics_timestamp,
};

#[cfg(test)]
mod tests;

/// 单行最多 75 个字节（不含 CRLF）
const MAX_LINE_OCTETS: usize = 75;

/// 文件名中不允许出现的字符
const FILENAME_RESERVED: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// ICS日历生成器
pub struct IcsGenerator {
    options: IcsOptions,
}

impl IcsGenerator {
    pub const fn new(options: IcsOptions) -> Self {
        Self { options }
    }

    /// 生成ICS日历内容
    pub fn generate(&self, event: &IcsEvent) -> Result<String> {
        let summary = event.summary.trim();
        if summary.is_empty() {
            return Err(Error::IcsGeneration("event summary is empty".to_string()));
        }

        let mut ics_content = String::new();

        // ICS文件头部
        push_line(&mut ics_content, "BEGIN:VCALENDAR");
        push_line(&mut ics_content, "VERSION:2.0");
        push_line(&mut ics_content, &format!("PRODID:{}", self.options.prod_id));
        push_line(&mut ics_content, "CALSCALE:GREGORIAN");

        if let Some(ref name) = self.options.calendar_name {
            push_line(
                &mut ics_content,
                &format!("X-WR-CALNAME:{}", escape_text(name)),
            );
        }

        let uid = format!("{}@event-ics", Uuid::new_v4());
        let dtstamp = format_ics_timestamp(&Utc::now());

        push_line(&mut ics_content, "BEGIN:VEVENT");
        push_line(&mut ics_content, &format!("UID:{uid}"));
        push_line(&mut ics_content, &format!("DTSTAMP:{dtstamp}"));
        push_line(&mut ics_content, &format!("SUMMARY:{}", escape_text(summary)));
        push_line(
            &mut ics_content,
            &format!("DTSTART:{}", format_ics_timestamp(&event.start)),
        );
        push_line(
            &mut ics_content,
            &format!("DTEND:{}", format_ics_timestamp(&event.end)),
        );
        push_line(
            &mut ics_content,
            &format!(
                "DESCRIPTION:{}",
                escape_text(event.description.as_deref().unwrap_or("").trim())
            ),
        );
        push_line(&mut ics_content, "END:VEVENT");

        // ICS文件尾部
        push_line(&mut ics_content, "END:VCALENDAR");

        tracing::debug!(
            "Generated ICS for '{}' ({} bytes)",
            summary,
            ics_content.len()
        );

        Ok(ics_content)
    }

    /// 生成日历并包装为可下载资源
    pub fn download(&self, event: &IcsEvent) -> Result<CalendarDownload> {
        Ok(CalendarDownload {
            filename: calendar_filename(&event.summary),
            content_type: CALENDAR_CONTENT_TYPE.to_string(),
            body: self.generate(event)?,
        })
    }
}

impl Default for IcsGenerator {
    fn default() -> Self {
        Self::new(IcsOptions::default())
    }
}

/// 转义ICS文本内容
pub fn escape_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\r', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

/// 由标题派生 `.ics` 文件名
pub fn calendar_filename(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| {
            if FILENAME_RESERVED.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('.');

    if cleaned.is_empty() {
        "event.ics".to_string()
    } else {
        format!("{cleaned}.ics")
    }
}

/// 写入一行内容，超长时按字节折行，不拆分 UTF-8 字符
fn push_line(ics_content: &mut String, line: &str) {
    let mut octets = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if octets + len > MAX_LINE_OCTETS {
            ics_content.push_str("\r\n ");
            octets = 1;
        }
        ics_content.push(c);
        octets += len;
    }
    ics_content.push_str("\r\n");
}
