//! Контроллер мастера расчёта: владеет каталогом, выбором и навигацией.
//!
//! Каждое действие пользователя: команда [`WizardCommand`]; результат
//! команды: событие [`WizardEvent`], на которое подписан слой отображения.

use crate::domain::a001_service_catalog::aggregate::{
    IndustryKey, OptionId, ServiceCatalog, ServiceId,
};
use crate::domain::a002_consultation::aggregate::{
    CustomerInfo, IndustrySummary, SubmitConsultationRequest,
};
use crate::shared::error::{GatewayError, WizardError};
use crate::shared::gateway::{QuoteGateway, WriteAck};

use super::navigation::{WizardNavigator, WizardPage};
use super::selection::SelectionState;

/// Команды мастера
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardCommand {
    ToggleIndustry(IndustryKey),
    SetIndustry {
        industry: IndustryKey,
        checked: bool,
    },
    ChooseOption {
        industry: IndustryKey,
        service: ServiceId,
        option: OptionId,
    },
    ProceedToEstimate,
    ProceedToForm,
    GoHome,
}

/// Уведомления об изменении состояния
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    IndustriesChanged { chosen_count: usize },
    SelectionChanged { total: u64 },
    PageChanged(WizardPage),
    Unchanged,
}

/// Проекция варианта для страницы расчёта
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub id: OptionId,
    pub label: String,
    pub price: u64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceView {
    pub id: ServiceId,
    pub name: String,
    pub options: Vec<OptionView>,
}

/// Секция страницы расчёта: одна отмеченная отрасль
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimateSection {
    pub key: IndustryKey,
    pub name: String,
    pub icon: String,
    pub services: Vec<ServiceView>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteWizard {
    catalog: ServiceCatalog,
    selection: SelectionState,
    navigator: WizardNavigator,
    submitting: bool,
}

impl QuoteWizard {
    pub fn new(catalog: ServiceCatalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Загрузить каталог через шлюз и создать мастер
    pub async fn load<G: QuoteGateway + ?Sized>(gateway: &G) -> Result<Self, GatewayError> {
        let catalog = gateway.fetch_service_catalog().await?;
        log::info!("Service catalog loaded: {} industries", catalog.len());
        Ok(Self::new(catalog))
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn page(&self) -> WizardPage {
        self.navigator.page()
    }

    pub fn shows_home_button(&self) -> bool {
        self.navigator.shows_home_button()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn total(&self) -> u64 {
        self.selection.compute_total(&self.catalog)
    }

    pub fn can_proceed_to_estimate(&self) -> bool {
        self.selection.chosen_count() > 0
    }

    pub fn can_proceed_to_form(&self) -> bool {
        self.selection.has_any_selection()
    }

    /// Кнопка "처음으로" активна, пока нет заявки в полёте
    pub fn can_go_home(&self) -> bool {
        self.shows_home_button() && !self.submitting
    }

    /// Пока заявка в полёте, состояние заморожено: любая команда отклоняется,
    /// чтобы поздний ответ шлюза не сбросил новый выбор пользователя.
    pub fn dispatch(&mut self, command: WizardCommand) -> Result<WizardEvent, WizardError> {
        if self.submitting {
            return Err(WizardError::RequestInFlight);
        }
        match command {
            WizardCommand::ToggleIndustry(industry) => {
                let chosen_count = self.selection.toggle_industry(industry);
                Ok(WizardEvent::IndustriesChanged { chosen_count })
            }
            WizardCommand::SetIndustry { industry, checked } => {
                let chosen_count = self.selection.set_industry(industry, checked);
                Ok(WizardEvent::IndustriesChanged { chosen_count })
            }
            WizardCommand::ChooseOption {
                industry,
                service,
                option,
            } => {
                let changed =
                    self.selection
                        .choose_option(&self.catalog, &industry, &service, &option)?;
                if changed {
                    Ok(WizardEvent::SelectionChanged {
                        total: self.total(),
                    })
                } else {
                    Ok(WizardEvent::Unchanged)
                }
            }
            WizardCommand::ProceedToEstimate => {
                self.navigator.go_to(WizardPage::Estimate, &self.selection)?;
                Ok(WizardEvent::PageChanged(WizardPage::Estimate))
            }
            WizardCommand::ProceedToForm => {
                self.navigator.go_to(WizardPage::Form, &self.selection)?;
                Ok(WizardEvent::PageChanged(WizardPage::Form))
            }
            WizardCommand::GoHome => {
                self.go_home();
                Ok(WizardEvent::PageChanged(WizardPage::Home))
            }
        }
    }

    fn go_home(&mut self) {
        self.selection.reset();
        self.navigator.go_home();
    }

    /// Секции страницы расчёта по отмеченным отраслям (отрасли вне каталога пропускаются)
    pub fn estimate_sections(&self) -> Vec<EstimateSection> {
        self.selection
            .chosen_industries()
            .iter()
            .filter_map(|key| {
                let industry = self.catalog.industry(key)?;
                let services = industry
                    .services
                    .iter()
                    .map(|service| {
                        let chosen = self.selection.selected_option(key, &service.id);
                        ServiceView {
                            id: service.id.clone(),
                            name: service.name.clone(),
                            options: service
                                .options
                                .iter()
                                .map(|o| OptionView {
                                    id: o.id.clone(),
                                    label: o.label.clone(),
                                    price: o.price,
                                    selected: chosen == Some(&o.id),
                                })
                                .collect(),
                        }
                    })
                    .collect();
                Some(EstimateSection {
                    key: key.clone(),
                    name: industry.name.clone(),
                    icon: industry.icon.clone(),
                    services,
                })
            })
            .collect()
    }

    /// Сводка для страницы формы
    pub fn summary(&self) -> Vec<IndustrySummary> {
        self.selection.summary(&self.catalog)
    }

    /// Первая фаза отправки: проверка полей и сборка запроса.
    ///
    /// Ошибка валидации возвращается до любого обращения к шлюзу.
    pub fn prepare_submission(
        &mut self,
        customer_info: CustomerInfo,
    ) -> Result<SubmitConsultationRequest, WizardError> {
        if self.page() != WizardPage::Form {
            return Err(WizardError::NavigationBlocked {
                from: self.page(),
                to: WizardPage::Form,
            });
        }
        if self.submitting {
            return Err(WizardError::RequestInFlight);
        }
        let missing = customer_info.missing_fields();
        if !missing.is_empty() {
            return Err(WizardError::Validation(missing));
        }

        self.submitting = true;
        Ok(SubmitConsultationRequest {
            customer_info,
            selected_services: self.summary(),
            total_amount: self.total(),
        })
    }

    /// Вторая фаза, ответ шлюза. При успехе сброс и возврат на главную,
    /// иначе остаёмся на форме с прежним выбором.
    pub fn complete_submission(
        &mut self,
        result: Result<WriteAck, GatewayError>,
    ) -> Result<(), WizardError> {
        self.submitting = false;
        result?.into_result()?;
        self.go_home();
        Ok(())
    }

    pub async fn submit<G: QuoteGateway + ?Sized>(
        &mut self,
        gateway: &G,
        customer_info: CustomerInfo,
    ) -> Result<(), WizardError> {
        let request = self.prepare_submission(customer_info)?;
        let result = gateway.submit_consultation(&request).await;
        if let Err(e) = &result {
            log::error!("Consultation submit failed: {}", e);
        }
        self.complete_submission(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_service_catalog::aggregate::fixtures::sample_catalog;
    use crate::domain::a002_consultation::aggregate::RequiredField;
    use crate::shared::gateway::fake::FakeGateway;

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "홍길동".into(),
            industry: "카페".into(),
            phone: "010-1234-5678".into(),
            region: "서울".into(),
        }
    }

    /// Мастер на странице формы с одним выбранным вариантом (2000)
    fn wizard_on_form() -> QuoteWizard {
        let mut wizard = QuoteWizard::new(sample_catalog());
        wizard
            .dispatch(WizardCommand::ToggleIndustry(IndustryKey::from("A")))
            .unwrap();
        wizard.dispatch(WizardCommand::ProceedToEstimate).unwrap();
        wizard
            .dispatch(WizardCommand::ChooseOption {
                industry: IndustryKey::from("A"),
                service: ServiceId::from("s1"),
                option: OptionId::from("opt2"),
            })
            .unwrap();
        wizard.dispatch(WizardCommand::ProceedToForm).unwrap();
        wizard
    }

    #[test]
    fn test_dispatch_events() {
        let mut wizard = QuoteWizard::new(sample_catalog());
        assert_eq!(
            wizard.dispatch(WizardCommand::ToggleIndustry(IndustryKey::from("A"))),
            Ok(WizardEvent::IndustriesChanged { chosen_count: 1 })
        );
        assert_eq!(
            wizard.dispatch(WizardCommand::ChooseOption {
                industry: IndustryKey::from("A"),
                service: ServiceId::from("s1"),
                option: OptionId::from("opt1"),
            }),
            Ok(WizardEvent::SelectionChanged { total: 1000 })
        );
        assert_eq!(
            wizard.dispatch(WizardCommand::ChooseOption {
                industry: IndustryKey::from("Q"),
                service: ServiceId::from("s1"),
                option: OptionId::from("opt1"),
            }),
            Ok(WizardEvent::Unchanged)
        );
        assert_eq!(
            wizard.dispatch(WizardCommand::ProceedToEstimate),
            Ok(WizardEvent::PageChanged(WizardPage::Estimate))
        );
    }

    #[test]
    fn test_go_home_clears_selection() {
        let mut wizard = wizard_on_form();
        assert!(wizard.shows_home_button());
        wizard.dispatch(WizardCommand::GoHome).unwrap();
        assert_eq!(wizard.page(), WizardPage::Home);
        assert_eq!(wizard.total(), 0);
        assert_eq!(wizard.selection().chosen_count(), 0);
    }

    #[test]
    fn test_estimate_sections_mark_selected() {
        let wizard = wizard_on_form();
        let sections = wizard.estimate_sections();
        assert_eq!(sections.len(), 1);
        let s1 = &sections[0].services[0];
        assert_eq!(s1.options.iter().filter(|o| o.selected).count(), 1);
        assert!(s1.options[1].selected);
        assert!(sections[0].services[1].options.iter().all(|o| !o.selected));
    }

    #[tokio::test]
    async fn test_empty_phone_rejected_before_gateway() {
        let gateway = FakeGateway::default();
        let mut wizard = wizard_on_form();
        let mut info = customer();
        info.phone.clear();

        let res = wizard.submit(&gateway, info).await;
        assert_eq!(res, Err(WizardError::Validation(vec![RequiredField::Phone])));
        assert!(gateway.submitted.borrow().is_empty());
        assert_eq!(wizard.page(), WizardPage::Form);
        assert!(!wizard.is_submitting());
    }

    #[tokio::test]
    async fn test_successful_submit_resets_to_home() {
        let gateway = FakeGateway::replying(Ok(WriteAck::Success));
        let mut wizard = wizard_on_form();

        wizard.submit(&gateway, customer()).await.unwrap();

        let sent = gateway.submitted.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].total_amount, 2000);
        assert_eq!(sent[0].selected_services[0].services[0].option_label, "Premium");
        assert_eq!(wizard.page(), WizardPage::Home);
        assert!(!wizard.selection().has_any_selection());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_form_state() {
        let gateway = FakeGateway::replying(Ok(WriteAck::Failure("Quota exceeded".into())));
        let mut wizard = wizard_on_form();
        let before = wizard.selection().clone();

        let res = wizard.submit(&gateway, customer()).await;
        assert_eq!(
            res,
            Err(WizardError::Gateway(GatewayError::Rejected("Quota exceeded".into())))
        );
        assert_eq!(wizard.page(), WizardPage::Form);
        assert_eq!(wizard.selection(), &before);
        assert!(!wizard.is_submitting());

        let gateway = FakeGateway::replying(Err(GatewayError::Unreachable("offline".into())));
        assert!(wizard.submit(&gateway, customer()).await.is_err());
        assert_eq!(wizard.total(), 2000);
    }

    #[test]
    fn test_second_prepare_while_pending_is_rejected() {
        let mut wizard = wizard_on_form();
        assert!(wizard.prepare_submission(customer()).is_ok());
        assert_eq!(
            wizard.prepare_submission(customer()),
            Err(WizardError::RequestInFlight)
        );
        wizard
            .complete_submission(Ok(WriteAck::Success))
            .unwrap();
        assert_eq!(wizard.page(), WizardPage::Home);
    }

    #[test]
    fn test_commands_rejected_while_submit_in_flight() {
        let mut wizard = wizard_on_form();
        wizard.prepare_submission(customer()).unwrap();
        assert!(!wizard.can_go_home());

        assert_eq!(
            wizard.dispatch(WizardCommand::GoHome),
            Err(WizardError::RequestInFlight)
        );
        assert_eq!(
            wizard.dispatch(WizardCommand::ToggleIndustry(IndustryKey::from("B"))),
            Err(WizardError::RequestInFlight)
        );
        assert_eq!(wizard.page(), WizardPage::Form);
        assert_eq!(wizard.selection().chosen_count(), 1);
        assert_eq!(wizard.total(), 2000);

        // ответ приходит к той же сессии, которая его отправила
        wizard.complete_submission(Ok(WriteAck::Success)).unwrap();
        assert_eq!(wizard.page(), WizardPage::Home);
        assert!(wizard.dispatch(WizardCommand::ToggleIndustry(IndustryKey::from("B"))).is_ok());
    }

    #[test]
    fn test_failed_completion_unfreezes_form() {
        let mut wizard = wizard_on_form();
        wizard.prepare_submission(customer()).unwrap();
        assert!(wizard
            .complete_submission(Err(GatewayError::Timeout { after_ms: 8000 }))
            .is_err());
        assert_eq!(wizard.page(), WizardPage::Form);
        assert!(wizard.can_go_home());
        assert!(wizard.dispatch(WizardCommand::GoHome).is_ok());
    }

    #[test]
    fn test_submit_outside_form_is_blocked() {
        let mut wizard = QuoteWizard::new(sample_catalog());
        assert!(matches!(
            wizard.prepare_submission(customer()),
            Err(WizardError::NavigationBlocked { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_uses_gateway_catalog() {
        let gateway = FakeGateway::default();
        *gateway.catalog.borrow_mut() = Some(Ok(sample_catalog()));
        let wizard = QuoteWizard::load(&gateway).await.unwrap();
        assert_eq!(wizard.catalog().len(), 2);
        assert_eq!(wizard.page(), WizardPage::Home);

        *gateway.catalog.borrow_mut() = Some(Err(GatewayError::Timeout { after_ms: 8000 }));
        assert_eq!(
            QuoteWizard::load(&gateway).await,
            Err(GatewayError::Timeout { after_ms: 8000 })
        );
    }
}
