use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;

use crate::{Error, EventInfo, Result, TimePolicy};

/// 英文月份全称 -> 月份
const MONTHS: [(&str, u32); 12] = [
    ("January", 1),
    ("February", 2),
    ("March", 3),
    ("April", 4),
    ("May", 5),
    ("June", 6),
    ("July", 7),
    ("August", 8),
    ("September", 9),
    ("October", 10),
    ("November", 11),
    ("December", 12),
];

/// 未给出时间时使用的时刻 (时, 分, 秒)
pub const DEFAULT_TIME_OF_DAY: (u32, u32, u32) = (0, 0, 9);

static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+):(\d+)\s*([ap]m)").expect("valid clock regex"));

static TIME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s*([ap]m)?$").expect("valid time token regex")
});

/// 根据月份全称查找月份（不区分大小写）
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(month, _)| month.eq_ignore_ascii_case(name))
        .map(|&(_, number)| number)
}

/// 解析 "H:MMam" / "H:MMpm" 形式的时间
///
/// pm 且小时不为 12 时加 12；`12:xxam` 保持 12 点不变。
pub fn parse_clock_time(input: &str) -> Option<NaiveTime> {
    let caps = CLOCK_TIME.captures(input)?;
    let hour = caps[1].parse::<u32>().ok()?;
    let minute = caps[2].parse::<u32>().ok()?;
    to_24_hour(hour, minute, Some(&caps[3]))
}

fn to_24_hour(hour: u32, minute: u32, meridiem: Option<&str>) -> Option<NaiveTime> {
    let hour = match meridiem {
        Some(period) if period.eq_ignore_ascii_case("pm") && hour != 12 => {
            hour.checked_add(12)?
        }
        _ => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// 从人类可读日期中解析出的日期，以及可能附带的时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDate {
    pub date: NaiveDate,
    /// 第五个 token 给出的时间
    pub time: Option<NaiveTime>,
}

/// 解析 "Sunday 10th September 2023" 形式的日期，可选第五个时间 token
///
/// 星期 token 不参与校验。
pub fn parse_human_date(input: &str) -> Result<HumanDate> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() != 4 && tokens.len() != 5 {
        return Err(Error::date_format(
            input,
            format!("expected 4 or 5 tokens, got {}", tokens.len()),
        ));
    }

    let day = tokens[1]
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .parse::<u32>()
        .map_err(|_| Error::date_format(input, format!("invalid day '{}'", tokens[1])))?;
    let month = month_number(tokens[2]).ok_or_else(|| Error::UnknownMonth(tokens[2].to_string()))?;
    let year = tokens[3]
        .parse::<i32>()
        .map_err(|_| Error::date_format(input, format!("invalid year '{}'", tokens[3])))?;
    if !(0..=9999).contains(&year) {
        return Err(Error::date_format(
            input,
            format!("year {year} does not fit in four digits"),
        ));
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::InvalidDate(format!("{year}-{month:02}-{day:02}")))?;

    let time = match tokens.get(4) {
        Some(token) => Some(parse_time_token(token).ok_or_else(|| {
            Error::date_format(input, format!("invalid time token '{token}'"))
        })?),
        None => None,
    };

    Ok(HumanDate { date, time })
}

/// 日期字符串内嵌的时间 token：24 小时制 "H:MM"，也接受 am/pm 后缀
fn parse_time_token(token: &str) -> Option<NaiveTime> {
    let caps = TIME_TOKEN.captures(token)?;
    let hour = caps[1].parse::<u32>().ok()?;
    let minute = caps[2].parse::<u32>().ok()?;
    to_24_hour(hour, minute, caps.get(3).map(|m| m.as_str()))
}

/// 事件的起止时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// 人类可读日期解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanDateParser {
    policy: TimePolicy,
}

impl HumanDateParser {
    pub const fn new(policy: TimePolicy) -> Self {
        Self { policy }
    }

    /// 将日期与可选时间解析为 UTC 时刻
    ///
    /// 单独给出的时间优先于日期内嵌的时间；时间无法识别时只记录警告，
    /// 退回到默认时刻。
    pub fn parse_instant(&self, date: &str, time: Option<&str>) -> Result<DateTime<Utc>> {
        let human = parse_human_date(date)?;

        let explicit = time.and_then(|raw| {
            let parsed = parse_clock_time(raw);
            if parsed.is_none() {
                tracing::warn!("Failed to parse time: {}", raw);
            }
            parsed
        });

        let time_of_day = match explicit.or(human.time) {
            Some(t) => t,
            None => {
                let (h, m, s) = DEFAULT_TIME_OF_DAY;
                NaiveTime::from_hms_opt(h, m, s)
                    .ok_or_else(|| Error::Config("invalid default time of day".to_string()))?
            }
        };

        self.localize(human.date.and_time(time_of_day))
    }

    /// 按时区策略把本地时间换算为 UTC
    ///
    /// 夏令时重叠取较早的偏移；落在跳变空档内的时间视为不存在。
    pub fn localize(&self, naive: NaiveDateTime) -> Result<DateTime<Utc>> {
        self.policy
            .zone
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| {
                Error::InvalidDate(format!("{} does not exist in {}", naive, self.policy.zone))
            })
    }

    /// 解析事件的起止时间；两个日期都缺失时返回 `None`
    ///
    /// 缺少结束日期时沿用开始日期，结束时间缺省沿用开始时间；
    /// 两者都没有给出时结束时刻与开始时刻完全相同。
    pub fn resolve_span(&self, event: &EventInfo) -> Result<Option<EventSpan>> {
        let (Some(start_date), Some(end_date)) = (
            event.date().or_else(|| event.date_end()),
            event.date_end().or_else(|| event.date()),
        ) else {
            return Ok(None);
        };

        let start = self.parse_instant(start_date, event.time())?;
        let end = if event.date_end().is_none() && event.time_end().is_none() {
            start
        } else {
            self.parse_instant(end_date, event.time_end().or_else(|| event.time()))?
        };

        if end < start {
            tracing::warn!("Event ends before it starts: {} < {}", end, start);
        }

        Ok(Some(EventSpan { start, end }))
    }
}
