use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, RawQuery, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use event_ics_core::prelude::*;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub exporter: Arc<EventExporter>,
    pub theme: Arc<Theme>,
}

impl AppState {
    pub fn new(options: IcsOptions, theme: Theme) -> Self {
        Self {
            exporter: Arc::new(EventExporter::new(options)),
            theme: Arc::new(theme),
        }
    }
}

/// 健康检查响应
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// 错误响应
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// 卡片请求参数
#[derive(Deserialize)]
struct CardQuery {
    #[serde(flatten)]
    event: EventInfo,
    /// 返回箭头的目标，默认 `/`
    back: Option<String>,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/event", get(card_handler))
        .route("/event.ics", get(calendar_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// 根路径处理器
async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Event ICS Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Event cards with an add-to-calendar download",
        "endpoints": {
            "health": "/health",
            "card": "/event",
            "calendar": "/event.ics"
        }
    }))
}

/// 健康检查处理器
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 日历下载处理器；没有日期时返回 204
async fn calendar_handler(
    State(state): State<AppState>,
    Query(event): Query<EventInfo>,
) -> Result<Response, AppError> {
    let Some(download) = state.exporter.prepare_download(&event)? else {
        tracing::debug!("日历请求未包含日期，忽略");
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, download.content_type.clone()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&download.filename),
            ),
        ],
        download.body,
    )
        .into_response())
}

/// 卡片处理器
async fn card_handler(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
    Query(query): Query<CardQuery>,
) -> Result<Response, AppError> {
    let links = CardLinks {
        back_href: query.back.unwrap_or_else(|| "/".to_string()),
        download_href: match raw_query {
            Some(q) if !q.is_empty() => format!("/event.ics?{q}"),
            _ => "/event.ics".to_string(),
        },
    };

    let html = render_card(&query.event, &links, &state.theme)
        .ok_or(event_ics_core::Error::MissingField("title"))?;

    Ok(Html(html).into_response())
}

/// 构造 Content-Disposition，附带 ASCII 回退文件名与 RFC 5987 编码的原始文件名
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut encoded = String::new();
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

/// 应用错误类型
#[derive(Debug)]
pub struct AppError(event_ics_core::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = if self.0.is_input_error() {
            (StatusCode::BAD_REQUEST, "请求参数错误")
        } else {
            tracing::error!("请求处理失败: {}", self.0);
            (StatusCode::INTERNAL_SERVER_ERROR, "内部服务器错误")
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            message: self.0.to_string(),
        });

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<event_ics_core::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
