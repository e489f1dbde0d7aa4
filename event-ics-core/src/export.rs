use crate::{
    CalendarDownload, Error, EventInfo, IcsEvent, IcsOptions, Result,
    date::HumanDateParser,
    ics::IcsGenerator,
    sanitize::description_text,
};

/// "Add to calendar" 的导出入口：解析卡片字段并生成可下载日历
pub struct EventExporter {
    parser: HumanDateParser,
    generator: IcsGenerator,
}

impl EventExporter {
    pub fn new(options: IcsOptions) -> Self {
        Self {
            parser: HumanDateParser::new(options.time_policy),
            generator: IcsGenerator::new(options),
        }
    }

    /// 把卡片字段转换为待写入的事件；没有任何日期时返回 `None`
    pub fn build_event(&self, event: &EventInfo) -> Result<Option<IcsEvent>> {
        if !event.has_dates() {
            tracing::debug!("No start or end date, nothing to export");
            return Ok(None);
        }
        let Some(span) = self.parser.resolve_span(event)? else {
            return Ok(None);
        };

        let summary = event.title().ok_or(Error::MissingField("title"))?;

        Ok(Some(IcsEvent {
            summary: summary.to_string(),
            start: span.start,
            end: span.end,
            description: event.description().map(description_text),
        }))
    }

    /// 生成下载资源；没有任何日期时不生成任何内容
    pub fn prepare_download(&self, event: &EventInfo) -> Result<Option<CalendarDownload>> {
        let Some(ics_event) = self.build_event(event)? else {
            return Ok(None);
        };

        let download = self.generator.download(&ics_event)?;
        tracing::info!(
            "Prepared calendar download {} ({} -> {})",
            download.filename,
            ics_event.start,
            ics_event.end
        );
        Ok(Some(download))
    }
}

impl Default for EventExporter {
    fn default() -> Self {
        Self::new(IcsOptions::default())
    }
}
