use scraper::{ElementRef, Html, Node};

/// 允许保留的元素
const ALLOWED_ELEMENTS: [&str; 12] = [
    "a", "p", "br", "strong", "b", "em", "i", "u", "ul", "ol", "li", "span",
];

/// 连同内容一起丢弃的元素
const DROPPED_ELEMENTS: [&str; 7] = [
    "script", "style", "iframe", "object", "embed", "template", "noscript",
];

/// 纯文本渲染时在结尾换行的块级元素
const BLOCK_ELEMENTS: &[&str] = &["p", "div", "ul", "ol", "li", "h1", "h2", "h3", "h4"];

/// 链接允许的协议
const ALLOWED_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// 描述中链接的样式
pub const LINK_STYLE: &str =
    "font-size: inherit; text-decoration: underline 2px #e23734; text-underline-offset: 2px;";

/// 按白名单清理描述 HTML
///
/// 白名单外的元素被拆掉、保留其子节点；脚本类元素连同内容删除。
/// 链接只保留安全协议的 `href`，并统一加上链接样式。
pub fn sanitize_description(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    write_children(fragment.root_element(), &mut out);
    out.trim().to_string()
}

fn write_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&escape_html(text)),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_element(child, out);
                }
            }
            _ => {}
        }
    }
}

fn write_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();

    if DROPPED_ELEMENTS.contains(&name) {
        tracing::debug!("Dropping <{}> from description", name);
        return;
    }
    if !ALLOWED_ELEMENTS.contains(&name) {
        write_children(element, out);
        return;
    }

    match name {
        "br" => out.push_str("<br>"),
        "a" => match element.value().attr("href").and_then(safe_href) {
            Some(href) => {
                out.push_str(&format!(
                    "<a href=\"{}\" style=\"{}\" rel=\"noopener noreferrer\">",
                    escape_html(href),
                    LINK_STYLE
                ));
                write_children(element, out);
                out.push_str("</a>");
            }
            None => write_children(element, out),
        },
        _ => {
            out.push_str(&format!("<{name}>"));
            write_children(element, out);
            out.push_str(&format!("</{name}>"));
        }
    }
}

fn safe_href(href: &str) -> Option<&str> {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();
    ALLOWED_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
        .then_some(href)
}

/// 把描述 HTML 渲染为纯文本，用于 ICS 的 DESCRIPTION
pub fn description_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut raw = String::with_capacity(html.len());
    write_text(fragment.root_element(), &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&text.replace('\n', " ")),
            Node::Element(el) => {
                let name = el.name();
                if DROPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                if name == "li" {
                    out.push_str("\n- ");
                }
                if let Some(child) = ElementRef::wrap(child) {
                    write_text(child, out);
                }
                if BLOCK_ELEMENTS.contains(&name) {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// 转义 HTML 文本及属性值
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
