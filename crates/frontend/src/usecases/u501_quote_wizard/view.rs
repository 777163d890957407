use contracts::shared::error::{GatewayError, WizardError};
use contracts::shared::gateway::QuoteGateway;
use contracts::usecases::u501_quote_wizard::controller::{QuoteWizard, WizardCommand, WizardEvent};
use contracts::usecases::u501_quote_wizard::navigation::WizardPage;
use contracts::domain::a002_consultation::aggregate::CustomerInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::steps::{EstimateStep, FormStep, HomeStep};
use crate::dashboards::d400_visit_stats::ui::StatsPanel;
use crate::shared::gateway::HttpGateway;
use crate::shared::notify::alert;

const CATALOG_LOAD_FAILED: &str = "서비스 데이터를 불러오는데 실패했습니다. 페이지를 새로고침해주세요.";

/// Текст для пользователя по ошибке мастера
pub fn wizard_error_message(error: &WizardError) -> String {
    match error {
        WizardError::Validation(_) => "모든 항목을 입력해주세요.".to_string(),
        WizardError::NavigationBlocked {
            to: WizardPage::Estimate,
            ..
        } => "업종을 하나 이상 선택해주세요.".to_string(),
        WizardError::NavigationBlocked {
            to: WizardPage::Form,
            ..
        } => "서비스를 하나 이상 선택해주세요.".to_string(),
        WizardError::NavigationBlocked { .. } => "이동할 수 없습니다.".to_string(),
        WizardError::StaleState { .. } => "선택한 업종이 변경되었습니다. 다시 선택해주세요.".to_string(),
        WizardError::RequestInFlight => "제출 중입니다. 잠시만 기다려주세요.".to_string(),
        WizardError::Gateway(GatewayError::Rejected(text)) => format!("제출 실패: {}", text),
        WizardError::Gateway(e) => format!("오류: {}", e),
    }
}

/// Выполнить команду над мастером; ошибки показываются через alert
pub fn dispatch(wizard: RwSignal<QuoteWizard>, command: WizardCommand) {
    match wizard.try_update(|w| w.dispatch(command)) {
        Some(Ok(WizardEvent::Unchanged)) => {}
        Some(Ok(event)) => log::debug!("Wizard: {:?}", event),
        Some(Err(e)) => {
            log::warn!("Wizard command rejected: {}", e);
            alert(&wizard_error_message(&e));
        }
        None => log::error!("Wizard state is disposed"),
    }
}

/// Текущая страница мастера. Memo уведомляет только при смене страницы,
/// а не при каждом изменении выбора.
pub fn page_memo(wizard: RwSignal<QuoteWizard>) -> Memo<WizardPage> {
    Memo::new(move |_| wizard.with(|w| w.page()))
}

/// Контакты клиента. Живут на уровне страницы, поэтому переживают
/// перерисовку шага формы и неудачную отправку.
#[derive(Clone, Copy)]
pub struct CustomerFields {
    pub name: RwSignal<String>,
    pub industry: RwSignal<String>,
    pub phone: RwSignal<String>,
    pub region: RwSignal<String>,
}

impl CustomerFields {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            industry: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            region: RwSignal::new(String::new()),
        }
    }

    pub fn snapshot(&self) -> CustomerInfo {
        CustomerInfo {
            name: self.name.get_untracked(),
            industry: self.industry.get_untracked(),
            phone: self.phone.get_untracked(),
            region: self.region.get_untracked(),
        }
    }

    pub fn clear(&self) {
        for field in [self.name, self.industry, self.phone, self.region] {
            field.set(String::new());
        }
    }
}

impl Default for CustomerFields {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
#[allow(non_snake_case)]
pub fn QuoteWizardPage() -> impl IntoView {
    let wizard = RwSignal::new(QuoteWizard::default());
    let fields = CustomerFields::new();
    let (loading, set_loading) = signal(true);
    let (load_error, set_load_error) = signal(Option::<String>::None);

    // Каталог
    spawn_local(async move {
        match QuoteWizard::load(&HttpGateway::new()).await {
            Ok(loaded) => wizard.set(loaded),
            Err(e) => {
                log::error!("Failed to load service catalog: {}", e);
                set_load_error.set(Some(e.to_string()));
                alert(CATALOG_LOAD_FAILED);
            }
        }
        set_loading.set(false);
    });

    // Один визит на загрузку страницы
    spawn_local(async move {
        if let Err(e) = HttpGateway::new().record_visit().await {
            log::warn!("recordVisit failed: {}", e);
        }
    });

    let page = page_memo(wizard);
    let home_visible = Memo::new(move |_| wizard.with(|w| w.shows_home_button()));

    view! {
        <div class="wizard">
            <Show when=move || loading.get()>
                <div class="loading-screen">
                    <Spinner />
                    <p>"서비스 정보를 불러오는 중..."</p>
                </div>
            </Show>

            {move || {
                load_error
                    .get()
                    .map(|e| view! { <div class="error-banner">{CATALOG_LOAD_FAILED} " (" {e} ")"</div> })
            }}

            <header class="wizard__header">
                <h1 class="wizard__title">"맞춤 견적 계산기"</h1>
                <Show when=move || home_visible.get()>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        disabled=Signal::derive(move || !wizard.with(|w| w.can_go_home()))
                        on_click=move |_| dispatch(wizard, WizardCommand::GoHome)
                    >
                        "처음으로"
                    </Button>
                </Show>
            </header>

            {move || match page.get() {
                WizardPage::Home => view! {
                    <HomeStep wizard=wizard />
                    <StatsPanel />
                }.into_any(),
                WizardPage::Estimate => view! { <EstimateStep wizard=wizard /> }.into_any(),
                WizardPage::Form => view! { <FormStep wizard=wizard fields=fields /> }.into_any(),
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_service_catalog::aggregate::{Industry, IndustryKey, ServiceCatalog};
    use contracts::domain::a002_consultation::aggregate::RequiredField;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn two_industries() -> ServiceCatalog {
        let industry = |name: &str, sort_order| Industry {
            name: name.into(),
            icon: String::new(),
            services: Vec::new(),
            sort_order,
        };
        let mut map = BTreeMap::new();
        map.insert(IndustryKey::from("cafe"), industry("카페", 1));
        map.insert(IndustryKey::from("retail"), industry("소매점", 2));
        ServiceCatalog::new(map)
    }

    fn toggle(wizard: RwSignal<QuoteWizard>, key: &str) {
        wizard.update(|w| {
            w.dispatch(WizardCommand::ToggleIndustry(IndustryKey::from(key)))
                .unwrap();
        });
    }

    #[test]
    fn test_page_view_not_rebuilt_on_selection_change() {
        let owner = Owner::new();
        owner.with(|| {
            let wizard = RwSignal::new(QuoteWizard::new(two_industries()));
            let page = page_memo(wizard);

            // то же, что делает ветка `match page.get()` в QuoteWizardPage
            let renders = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&renders);
            let rendered_page = Memo::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                page.get()
            });

            assert_eq!(rendered_page.get(), WizardPage::Home);
            toggle(wizard, "cafe");
            toggle(wizard, "retail");
            toggle(wizard, "cafe");
            assert_eq!(rendered_page.get(), WizardPage::Home);
            // Home и StatsPanel построены один раз, повторного getStats нет
            assert_eq!(renders.load(Ordering::SeqCst), 1);

            wizard.update(|w| {
                w.dispatch(WizardCommand::ProceedToEstimate).unwrap();
            });
            assert_eq!(rendered_page.get(), WizardPage::Estimate);
            assert_eq!(renders.load(Ordering::SeqCst), 2);
        });
    }

    #[test]
    fn test_customer_fields_survive_submit_attempt() {
        let owner = Owner::new();
        owner.with(|| {
            let fields = CustomerFields::new();
            fields.name.set("홍길동".into());
            fields.phone.set("010-1234-5678".into());

            let info = fields.snapshot();
            assert_eq!(info.name, "홍길동");
            assert!(!info.missing_fields().is_empty());
            assert_eq!(fields.name.get_untracked(), "홍길동");

            fields.clear();
            assert_eq!(fields.snapshot(), CustomerInfo::default());
        });
    }

    #[test]
    fn test_wizard_error_message() {
        assert_eq!(
            wizard_error_message(&WizardError::Validation(vec![RequiredField::Phone])),
            "모든 항목을 입력해주세요."
        );
        assert_eq!(
            wizard_error_message(&WizardError::Gateway(GatewayError::Rejected(
                "Error: quota".into()
            ))),
            "제출 실패: Error: quota"
        );
        assert_eq!(
            wizard_error_message(&WizardError::NavigationBlocked {
                from: WizardPage::Home,
                to: WizardPage::Estimate,
            }),
            "업종을 하나 이상 선택해주세요."
        );
    }
}
