//! Токен администратора в localStorage.

const ACCESS_TOKEN_KEY: &str = "quote_admin_access_token";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub fn save_access_token(token: &str) {
    let Some(storage) = local_storage() else {
        log::warn!("localStorage is unavailable, session will not survive reload");
        return;
    };
    if storage.set_item(ACCESS_TOKEN_KEY, token).is_err() {
        log::warn!("Failed to persist access token");
    }
}

pub fn get_access_token() -> Option<String> {
    local_storage()?
        .get_item(ACCESS_TOKEN_KEY)
        .ok()
        .flatten()
        .filter(|t| !t.is_empty())
}

pub fn clear_tokens() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(ACCESS_TOKEN_KEY);
    }
}
