//! Адрес backend для запросов из браузера.

/// Порт backend-сервера (см. `[server] port` в config.toml)
pub const BACKEND_PORT: u16 = 3000;

/// База API по частям `window.location`.
///
/// Страница, отданная самим backend, ходит на свой origin; dev-сервер trunk
/// (другой порт) ходит на тот же хост, но на `BACKEND_PORT`.
pub fn base_from_location(protocol: &str, hostname: &str, port: &str) -> String {
    let host = if hostname.is_empty() { "127.0.0.1" } else { hostname };
    if port.is_empty() || port == BACKEND_PORT.to_string() {
        match port {
            "" => format!("{}//{}", protocol, host),
            p => format!("{}//{}:{}", protocol, host, p),
        }
    } else {
        format!("{}//{}:{}", protocol, host, BACKEND_PORT)
    }
}

/// "http://localhost:3000" или пустая строка вне браузера
pub fn api_base() -> String {
    let Some(window) = web_sys::window() else {
        return String::new();
    };
    let location = window.location();
    base_from_location(
        &location.protocol().unwrap_or_else(|_| "http:".to_string()),
        &location.hostname().unwrap_or_default(),
        &location.port().unwrap_or_default(),
    )
}

pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_from_location() {
        assert_eq!(
            base_from_location("http:", "localhost", "3000"),
            "http://localhost:3000"
        );
        assert_eq!(
            base_from_location("http:", "localhost", "8080"),
            "http://localhost:3000"
        );
        assert_eq!(
            base_from_location("https:", "quote.example.kr", ""),
            "https://quote.example.kr"
        );
        assert_eq!(base_from_location("http:", "", "8080"), "http://127.0.0.1:3000");
    }
}
