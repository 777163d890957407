use leptos::prelude::*;

use super::context::use_auth;
use crate::system::pages::login::LoginPage;

/// Component that requires admin privileges
/// Shows the login page until an admin session exists
#[component]
pub fn RequireAdmin(children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.get().is_admin()
            fallback=move || {
                if auth_state.get().restoring {
                    view! { <div class="loading">"세션 확인 중..."</div> }.into_any()
                } else {
                    view! { <LoginPage /> }.into_any()
                }
            }
        >
            {children()}
        </Show>
    }
}
