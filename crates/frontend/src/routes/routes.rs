use crate::system::auth::guard::RequireAdmin;
use crate::usecases::u501_quote_wizard::view::QuoteWizardPage;
use crate::usecases::u502_consultation_admin::view::AdminPage;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
fn AdminRoute() -> impl IntoView {
    view! {
        <RequireAdmin>
            <AdminPage />
        </RequireAdmin>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="not-found">"페이지를 찾을 수 없습니다"</div> }>
                <Route path=path!("/") view=QuoteWizardPage />
                <Route path=path!("/admin") view=AdminRoute />
            </Routes>
        </Router>
    }
}
