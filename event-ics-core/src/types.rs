use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// 日历文件的 MIME 类型
pub const CALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// 活动卡片的原始字段
///
/// 除 `title` 外均可缺省；空字符串与缺省等价。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventInfo {
    /// 标题，决定卡片及下载入口是否渲染
    pub title: Option<String>,
    /// 开始日期，例如 "Sunday 10th September 2023"
    pub date: Option<String>,
    /// 结束日期
    #[serde(alias = "dateEnd")]
    pub date_end: Option<String>,
    /// 开始时间，例如 "3:00pm"
    pub time: Option<String>,
    /// 结束时间
    #[serde(alias = "timeEnd")]
    pub time_end: Option<String>,
    /// HTML 片段形式的描述
    pub description: Option<String>,
    /// 图片 URL
    pub image: Option<String>,
    /// 标题标记颜色，缺省为主题主色
    pub colour: Option<String>,
}

impl EventInfo {
    /// 从 JSON 字符串加载
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_ref())
    }

    pub fn date(&self) -> Option<&str> {
        non_blank(self.date.as_ref())
    }

    pub fn date_end(&self) -> Option<&str> {
        non_blank(self.date_end.as_ref())
    }

    pub fn time(&self) -> Option<&str> {
        non_blank(self.time.as_ref())
    }

    pub fn time_end(&self) -> Option<&str> {
        non_blank(self.time_end.as_ref())
    }

    pub fn description(&self) -> Option<&str> {
        non_blank(self.description.as_ref())
    }

    pub fn image(&self) -> Option<&str> {
        non_blank(self.image.as_ref())
    }

    pub fn colour(&self) -> Option<&str> {
        non_blank(self.colour.as_ref())
    }

    /// 是否至少给出了一个日期
    pub fn has_dates(&self) -> bool {
        self.date().is_some() || self.date_end().is_some()
    }
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// 时区策略：未带时区的日期时间按 `zone` 的本地时间解释，再换算为 UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePolicy {
    pub zone: Tz,
}

impl TimePolicy {
    /// 按 IANA 名称创建，例如 `Europe/London`
    pub fn from_name(name: &str) -> Result<Self> {
        let zone = name
            .trim()
            .parse::<Tz>()
            .map_err(|_| Error::Timezone(name.to_string()))?;
        Ok(Self { zone })
    }
}

impl Default for TimePolicy {
    fn default() -> Self {
        Self { zone: Tz::UTC }
    }
}

/// ICS生成选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcsOptions {
    /// PRODID 属性
    pub prod_id: String,
    /// 日历名称 (X-WR-CALNAME)
    pub calendar_name: Option<String>,
    /// 解析日期时使用的时区策略
    pub time_policy: TimePolicy,
}

impl Default for IcsOptions {
    fn default() -> Self {
        Self {
            prod_id: "-//Event ICS//Event Calendar//EN".to_string(),
            calendar_name: None,
            time_policy: TimePolicy::default(),
        }
    }
}

/// 已规范化、可直接写入 ICS 的单个事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcsEvent {
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// 纯文本描述
    pub description: Option<String>,
}

/// 可下载的日历资源
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDownload {
    /// 由标题派生的文件名，带 `.ics` 后缀
    pub filename: String,
    pub content_type: String,
    pub body: String,
}

/// 卡片主题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// 主色，标题标记的默认颜色
    pub primary: String,
    /// 链接强调色
    pub accent: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: "#1d1d1b".to_string(),
            accent: "#e23734".to_string(),
        }
    }
}

/// 卡片上的两个链接目标
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLinks {
    /// 返回箭头的目标
    pub back_href: String,
    /// "iCal Download" 的目标
    pub download_href: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_treated_as_missing() {
        let event = EventInfo {
            title: Some("  ".to_string()),
            date: Some(String::new()),
            date_end: Some(" Monday 11th September 2023 ".to_string()),
            ..Default::default()
        };

        assert_eq!(event.title(), None);
        assert_eq!(event.date(), None);
        assert_eq!(event.date_end(), Some("Monday 11th September 2023"));
        assert!(event.has_dates());
    }

    #[test]
    fn event_json_accepts_camel_case_aliases() {
        let event = EventInfo::from_json(
            r#"{"title":"Open Day","date":"Sunday 10th September 2023","dateEnd":"Monday 11th September 2023","timeEnd":"5:00pm"}"#,
        )
        .unwrap();

        assert_eq!(event.title(), Some("Open Day"));
        assert_eq!(event.date_end(), Some("Monday 11th September 2023"));
        assert_eq!(event.time_end(), Some("5:00pm"));
        assert_eq!(event.time(), None);
    }

    #[test]
    fn time_policy_from_name() {
        assert_eq!(
            TimePolicy::from_name("Europe/London").unwrap().zone,
            Tz::Europe__London
        );
        assert!(matches!(
            TimePolicy::from_name("Mars/Olympus"),
            Err(Error::Timezone(_))
        ));
    }
}
