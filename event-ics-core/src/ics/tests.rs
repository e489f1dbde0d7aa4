use super::*;
use chrono::{TimeZone, Utc};
use std::io::BufReader;

fn open_day() -> IcsEvent {
    IcsEvent {
        summary: "Open Day".to_string(),
        start: Utc.with_ymd_and_hms(2023, 9, 10, 15, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2023, 9, 10, 17, 30, 0).unwrap(),
        description: Some("Campus tours and talks".to_string()),
    }
}

/// 用 ical 解析生成的内容，返回唯一事件的 (属性名, 属性值) 列表
fn parse_single_event(ics_content: &str) -> Vec<(String, String)> {
    let mut parser = ical::IcalParser::new(BufReader::new(ics_content.as_bytes()));
    let calendar = parser.next().expect("至少一个日历").expect("日历解析失败");
    assert!(parser.next().is_none());
    assert_eq!(calendar.events.len(), 1);

    calendar.events[0]
        .properties
        .iter()
        .map(|p| (p.name.clone(), p.value.clone().unwrap_or_default()))
        .collect()
}

fn property<'a>(props: &'a [(String, String)], name: &str) -> Option<&'a str> {
    props
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

#[test]
fn test_document_structure() {
    let generator = IcsGenerator::default();
    let ics_content = generator.generate(&open_day()).expect("生成ICS失败");

    let lines: Vec<&str> = ics_content.split("\r\n").collect();
    assert_eq!(lines.first(), Some(&"BEGIN:VCALENDAR"));
    assert_eq!(lines[1], "VERSION:2.0");
    assert!(lines[2].starts_with("PRODID:"));
    // 以 CRLF 结尾，最后一个分段为空
    assert_eq!(lines[lines.len() - 2], "END:VCALENDAR");
    assert_eq!(lines[lines.len() - 1], "");

    let begin = lines.iter().position(|l| *l == "BEGIN:VEVENT").unwrap();
    let end = lines.iter().position(|l| *l == "END:VEVENT").unwrap();
    assert!(begin < end);

    assert!(ics_content.contains("SUMMARY:Open Day\r\n"));
    assert!(ics_content.contains("DTSTART:20230910T150000Z\r\n"));
    assert!(ics_content.contains("DTEND:20230910T173000Z\r\n"));
    assert!(ics_content.contains("DESCRIPTION:Campus tours and talks\r\n"));
}

#[test]
fn test_parses_with_ical() {
    let generator = IcsGenerator::default();
    let ics_content = generator.generate(&open_day()).expect("生成ICS失败");
    let props = parse_single_event(&ics_content);

    assert_eq!(property(&props, "SUMMARY"), Some("Open Day"));
    assert_eq!(property(&props, "DTSTART"), Some("20230910T150000Z"));
    assert_eq!(property(&props, "DTEND"), Some("20230910T173000Z"));
    assert!(property(&props, "UID").unwrap().ends_with("@event-ics"));
    assert!(property(&props, "DTSTAMP").unwrap().ends_with('Z'));
}

#[test]
fn test_escapes_reserved_characters() {
    let event = IcsEvent {
        summary: "Talks, food; and C:\\ fun".to_string(),
        description: Some("Line one\nLine two".to_string()),
        ..open_day()
    };
    let ics_content = IcsGenerator::default().generate(&event).unwrap();

    assert!(ics_content.contains("SUMMARY:Talks\\, food\\; and C:\\\\ fun\r\n"));
    assert!(ics_content.contains("DESCRIPTION:Line one\\nLine two\r\n"));
}

#[test]
fn test_missing_description_is_empty() {
    let event = IcsEvent {
        description: None,
        ..open_day()
    };
    let ics_content = IcsGenerator::default().generate(&event).unwrap();
    assert!(ics_content.contains("DESCRIPTION:\r\n"));
}

#[test]
fn test_long_lines_are_folded() {
    let long = "bring-a-friend/".repeat(20);
    let event = IcsEvent {
        description: Some(long.clone()),
        ..open_day()
    };
    let ics_content = IcsGenerator::default().generate(&event).unwrap();

    for line in ics_content.split("\r\n") {
        assert!(line.len() <= MAX_LINE_OCTETS, "行过长: {line}");
    }

    let props = parse_single_event(&ics_content);
    assert_eq!(property(&props, "DESCRIPTION"), Some(long.as_str()));
}

#[test]
fn test_folding_keeps_multibyte_characters_whole() {
    let mut content = String::new();
    push_line(&mut content, &"é".repeat(60));

    for line in content.split("\r\n") {
        assert!(line.len() <= MAX_LINE_OCTETS);
    }
    let unfolded = content.replace("\r\n ", "");
    assert_eq!(unfolded, format!("{}\r\n", "é".repeat(60)));
}

#[test]
fn test_calendar_name_option() {
    let generator = IcsGenerator::new(IcsOptions {
        calendar_name: Some("Events, 2023".to_string()),
        ..Default::default()
    });
    let ics_content = generator.generate(&open_day()).unwrap();
    assert!(ics_content.contains("X-WR-CALNAME:Events\\, 2023\r\n"));
}

#[test]
fn test_empty_summary_is_rejected() {
    let event = IcsEvent {
        summary: "   ".to_string(),
        ..open_day()
    };
    assert!(matches!(
        IcsGenerator::default().generate(&event),
        Err(Error::IcsGeneration(_))
    ));
}

#[test]
fn test_download_resource() {
    let download = IcsGenerator::default().download(&open_day()).unwrap();
    assert_eq!(download.filename, "Open Day.ics");
    assert_eq!(download.content_type, "text/calendar; charset=utf-8");
    assert!(download.body.starts_with("BEGIN:VCALENDAR\r\n"));
}

#[test]
fn test_calendar_filename() {
    let cases = vec![
        ("Open Day", "Open Day.ics"),
        ("AC/DC: Live?", "AC_DC_ Live_.ics"),
        ("  ...  ", "event.ics"),
        ("Line\nbreak", "Line_break.ics"),
    ];
    for (title, expected) in cases {
        assert_eq!(calendar_filename(title), expected, "{title}");
    }
}
