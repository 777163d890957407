use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
    /// Восстановление сессии из localStorage ещё идёт
    pub restoring: bool,
}

impl AuthState {
    pub fn is_admin(&self) -> bool {
        self.access_token.is_some() && self.user_info.as_ref().is_some_and(|u| u.is_admin)
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let saved_token = storage::get_access_token();
    let (auth_state, set_auth_state) = signal(AuthState {
        restoring: saved_token.is_some(),
        ..AuthState::default()
    });

    // Try to restore session from localStorage on mount
    if let Some(access_token) = saved_token {
        spawn_local(async move {
            match api::get_current_user(&access_token).await {
                Ok(user_info) => set_auth_state.set(AuthState {
                    access_token: Some(access_token),
                    user_info: Some(user_info),
                    restoring: false,
                }),
                Err(e) => {
                    log::info!("Saved session rejected: {}", e);
                    storage::clear_tokens();
                    set_auth_state.set(AuthState::default());
                }
            }
        });
    }

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Сохранить токен после входа
pub fn apply_login(set_auth_state: WriteSignal<AuthState>, access_token: String, user: UserInfo) {
    storage::save_access_token(&access_token);
    set_auth_state.set(AuthState {
        access_token: Some(access_token),
        user_info: Some(user),
        restoring: false,
    });
}

/// Токен живёт только на клиенте, поэтому выход просто забывает его
pub fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}
