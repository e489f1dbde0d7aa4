use chrono::{DateTime, NaiveDateTime, Utc};

use crate::Result;

/// ICS UTC 时间戳格式 `YYYYMMDDTHHMMSSZ`
pub const ICS_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// 格式化为 ICS UTC 时间戳
pub fn format_ics_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format(ICS_TIMESTAMP_FORMAT).to_string()
}

/// 解析 ICS UTC 时间戳
pub fn parse_ics_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), ICS_TIMESTAMP_FORMAT)?;
    Ok(naive.and_utc())
}
