use std::sync::LazyLock;

use regex::Regex;

use crate::{
    CardLinks, EventInfo, Theme,
    sanitize::{escape_html, sanitize_description},
};

/// 可以直接写进 style 的颜色值
static COLOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#[0-9a-fA-F]{3,8}|[a-zA-Z]+|rgba?\([0-9.,%\s]+\))$").expect("valid colour regex")
});

const BACK_ARROW_SVG: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="49" height="50" viewBox="0 0 49 50">"#,
    r##"<line x1="7" y1="25" x2="41" y2="25" fill="none" stroke="#000" stroke-linecap="round" stroke-width="2"/>"##,
    r##"<path d="M21.971,10.883,7.979,24.875,21.971,38.867" fill="none" stroke="#000" stroke-linecap="round" stroke-linejoin="round" stroke-width="2"/>"##,
    "</svg>"
);

/// 卡片的日期时间行：`date[, time][, time_end][ - date_end]`
pub fn when_line(event: &EventInfo) -> Option<String> {
    if event.date().is_none() && event.time().is_none() {
        return None;
    }

    let mut line = [event.date(), event.time(), event.time_end()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");

    if let Some(date_end) = event.date_end() {
        line.push_str(" - ");
        line.push_str(date_end);
    }

    Some(line)
}

/// 取卡片的标记颜色；不安全的颜色值回退为主题主色
fn marker_colour<'a>(event: &'a EventInfo, theme: &'a Theme) -> &'a str {
    match event.colour() {
        Some(colour) if COLOUR.is_match(colour) => colour,
        Some(colour) => {
            tracing::warn!("Ignoring unsupported colour value: {}", colour);
            theme.primary.as_str()
        }
        None => theme.primary.as_str(),
    }
}

/// 渲染活动卡片 HTML；没有标题时不渲染
pub fn render_card(event: &EventInfo, links: &CardLinks, theme: &Theme) -> Option<String> {
    let title = event.title()?;
    let colour = marker_colour(event, theme);

    let mut html = String::new();
    html.push_str(&format!(
        r#"<article class="event-info" style="border-top: 4px solid {colour};">"#
    ));

    if let Some(image) = event.image() {
        html.push_str(&format!(
            r#"<img class="event-info__image" src="{}" alt="">"#,
            escape_html(image)
        ));
    }

    html.push_str(r#"<div class="event-info__content">"#);
    html.push_str(&format!(
        r#"<a class="event-info__back" href="{}" aria-label="Back">{BACK_ARROW_SVG}</a>"#,
        escape_html(&links.back_href)
    ));

    if let Some(when) = when_line(event) {
        html.push_str(&format!(
            r#"<p class="event-info__when">{}</p>"#,
            escape_html(&when)
        ));
    }

    html.push_str(&format!(
        concat!(
            r#"<h2 class="event-info__title">"#,
            r#"<span class="event-info__marker" style="background: {colour};"></span>{title}</h2>"#
        ),
        colour = colour,
        title = escape_html(title)
    ));

    if let Some(description) = event.description() {
        let overflow = if event.image().is_some() {
            "overflow-y: scroll; height: 8rem;"
        } else {
            "overflow-y: auto; height: auto;"
        };
        html.push_str(&format!(
            r#"<div class="event-info__description" style="{overflow}">{}</div>"#,
            sanitize_description(description)
        ));
    }

    html.push_str(&format!(
        concat!(
            r#"<p class="event-info__download" style="margin-top: 1.5rem; text-decoration: underline 2px {accent}; text-underline-offset: 5px;">"#,
            r#"<a href="{href}" style="color: {accent}; font-weight: 400;">iCal Download</a></p>"#
        ),
        accent = theme.accent,
        href = escape_html(&links.download_href)
    ));

    html.push_str("</div></article>");
    Some(html)
}
