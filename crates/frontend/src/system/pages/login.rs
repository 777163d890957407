use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::system::auth::api;
use crate::system::auth::context::{apply_login, use_auth};

/// Форма входа в админ-панель; пускает только пользователей с `is_admin`
#[component]
pub fn LoginPage() -> impl IntoView {
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal(Option::<String>::None);
    let (busy, set_busy) = signal(false);

    let (_, set_auth_state) = use_auth();

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        set_busy.set(true);
        set_error.set(None);

        let (login, secret) = (username.get_untracked(), password.get_untracked());
        spawn_local(async move {
            match api::login(login, secret).await {
                Ok(response) if response.user.is_admin => {
                    apply_login(set_auth_state, response.access_token, response.user);
                }
                Ok(response) => {
                    log::warn!("User {} is not an admin", response.user.username);
                    set_error.set(Some("관리자 권한이 없습니다".to_string()));
                }
                Err(e) => {
                    log::warn!("Login failed: {}", e);
                    set_error.set(Some(e));
                }
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="login">
            <form class="login__box" on:submit=submit>
                <h1>"관리자 로그인"</h1>

                {move || error.get().map(|text| view! { <div class="error-banner">{text}</div> })}

                <label>
                    "아이디"
                    <input
                        type="text"
                        autocomplete="username"
                        prop:value=move || username.get()
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                        disabled=move || busy.get()
                    />
                </label>
                <label>
                    "비밀번호"
                    <input
                        type="password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        disabled=move || busy.get()
                    />
                </label>

                <button type="submit" class="button button--primary" disabled=move || busy.get()>
                    {move || if busy.get() { "로그인 중..." } else { "로그인" }}
                </button>
            </form>
        </div>
    }
}
