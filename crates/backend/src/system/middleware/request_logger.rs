use axum::body::to_bytes;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use contracts::shared::format::{format_thousands, kst};

/// Путь запроса; для шлюза добавляется строка запроса, чтобы видеть action
fn display_path(uri: &Uri) -> String {
    match uri.query() {
        Some(q) if uri.path() == "/api/gateway" => format!("{}?{}", uri.path(), q),
        _ => uri.path().to_string(),
    }
}

/// Строка лога без цвета: время | длительность | размер | статус метод путь
pub fn format_log_line(
    time: &str,
    millis: u128,
    size: Option<usize>,
    status: StatusCode,
    method: &Method,
    path: &str,
) -> String {
    let size = match size {
        Some(n) => format_thousands(n as u64),
        None => "error".to_string(),
    };
    format!(
        "{} | {:>5}ms | {:>12} | {} {:>6} {}",
        time,
        millis,
        size,
        status.as_u16(),
        method.as_str(),
        path
    )
}

/// Middleware для логирования HTTP запросов
///
/// Выводит в консоль время (KST), длительность, размер ответа,
/// статус, метод и путь. Статус 200 голубым, остальные коричневым.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = display_path(req.uri());

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Читаем тело ответа, чтобы узнать реальный размер
    let bytes = to_bytes(body, usize::MAX).await.ok();

    let time = Utc::now().with_timezone(&kst()).format("%H:%M:%S").to_string();
    let line = format_log_line(
        &time,
        start.elapsed().as_millis(),
        bytes.as_ref().map(|b| b.len()),
        parts.status,
        &method,
        &path,
    );
    let color_code = if bytes.is_some() && parts.status == StatusCode::OK {
        "36"
    } else {
        "33"
    };
    let (time_part, rest) = line.split_at(time.len());
    println!("\x1b[{}m{}\x1b[0m{}", color_code, time_part, rest);

    match bytes {
        Some(b) => Response::from_parts(parts, Body::from(b)),
        None => Response::from_parts(parts, Body::default()),
    }
}
