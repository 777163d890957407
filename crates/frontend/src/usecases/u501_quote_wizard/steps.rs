//! Шаги мастера: выбор отраслей, расчёт, форма заявки.

use contracts::shared::format::format_won;
use contracts::shared::gateway::QuoteGateway;
use contracts::usecases::u501_quote_wizard::controller::{QuoteWizard, WizardCommand};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::view::{dispatch, wizard_error_message, CustomerFields};
use crate::shared::gateway::HttpGateway;
use crate::shared::notify::alert;

const SUBMIT_SUCCESS: &str = "상담 신청이 완료되었습니다! 담당자가 곧 연락드리겠습니다.";

// ============================================================================
// Home: выбор отраслей
// ============================================================================

#[component]
pub fn HomeStep(wizard: RwSignal<QuoteWizard>) -> impl IntoView {
    let industries = Memo::new(move |_| {
        wizard.with(|w| {
            w.catalog()
                .industries()
                .map(|(key, industry)| (key.clone(), industry.name.clone(), industry.icon.clone()))
                .collect::<Vec<_>>()
        })
    });
    let chosen_count = move || wizard.with(|w| w.selection().chosen_count());

    view! {
        <section class="step step--home">
            <h2 class="step__title">"업종을 선택해주세요"</h2>
            <p class="step__hint">"여러 업종을 동시에 선택할 수 있습니다."</p>

            <div class="industry-grid">
                {move || {
                    industries
                        .get()
                        .into_iter()
                        .map(|(key, name, icon)| {
                            let key_for_checked = key.clone();
                            let is_chosen = Memo::new(move |_| {
                                wizard.with(|w| w.selection().is_industry_chosen(&key_for_checked))
                            });
                            view! {
                                <label class="industry-card" class=("industry-card--active", move || is_chosen.get())>
                                    <input
                                        type="checkbox"
                                        prop:checked=move || is_chosen.get()
                                        on:change=move |ev| {
                                            dispatch(
                                                wizard,
                                                WizardCommand::SetIndustry {
                                                    industry: key.clone(),
                                                    checked: event_target_checked(&ev),
                                                },
                                            )
                                        }
                                    />
                                    <span class="industry-card__icon">{icon}</span>
                                    <span class="industry-card__name">{name}</span>
                                </label>
                            }
                        })
                        .collect_view()
                }}
            </div>

            <div class="step__footer">
                <span class="step__counter">
                    {move || format!("선택된 항목: {}개", chosen_count())}
                </span>
                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=Signal::derive(move || !wizard.with(|w| w.can_proceed_to_estimate()))
                    on_click=move |_| dispatch(wizard, WizardCommand::ProceedToEstimate)
                >
                    "견적 확인하기"
                </Button>
            </div>
        </section>
    }
}

// ============================================================================
// Estimate: варианты по услугам
// ============================================================================

#[component]
pub fn EstimateStep(wizard: RwSignal<QuoteWizard>) -> impl IntoView {
    // Разметка зависит только от набора отраслей; отметки радиокнопок
    // обновляются точечно через prop:checked.
    let chosen = Memo::new(move |_| wizard.with(|w| w.selection().chosen_industries().to_vec()));
    let total = move || format_won(wizard.with(|w| w.total()));

    view! {
        <section class="step step--estimate">
            <h2 class="step__title">"서비스 옵션을 선택해주세요"</h2>

            {move || {
                chosen.track();
                wizard
                    .with_untracked(|w| w.estimate_sections())
                    .into_iter()
                    .map(|section| {
                        let industry = section.key.clone();
                        view! {
                            <div class="estimate-section">
                                <h3 class="estimate-section__title">
                                    {section.icon.clone()} " " {section.name.clone()}
                                </h3>
                                {section
                                    .services
                                    .into_iter()
                                    .map(|service| {
                                        let group = format!("{}_{}", industry.as_str(), service.id.as_str());
                                        let industry = industry.clone();
                                        view! {
                                            <div class="service-row">
                                                <div class="service-row__name">{service.name.clone()}</div>
                                                <div class="service-row__options">
                                                    {service
                                                        .options
                                                        .into_iter()
                                                        .map(|option| {
                                                            let command = WizardCommand::ChooseOption {
                                                                industry: industry.clone(),
                                                                service: service.id.clone(),
                                                                option: option.id.clone(),
                                                            };
                                                            let (ind, svc, opt) = (
                                                                industry.clone(),
                                                                service.id.clone(),
                                                                option.id.clone(),
                                                            );
                                                            let checked = move || {
                                                                wizard.with(|w| {
                                                                    w.selection().selected_option(&ind, &svc)
                                                                        == Some(&opt)
                                                                })
                                                            };
                                                            view! {
                                                                <label class="option-item">
                                                                    <input
                                                                        type="radio"
                                                                        name=group.clone()
                                                                        prop:checked=checked
                                                                        on:change=move |_| dispatch(wizard, command.clone())
                                                                    />
                                                                    <span class="option-item__label">{option.label}</span>
                                                                    <span class="option-item__price">
                                                                        {format_won(option.price)}
                                                                    </span>
                                                                </label>
                                                            }
                                                        })
                                                        .collect_view()}
                                                </div>
                                            </div>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        }
                    })
                    .collect_view()
            }}

            <div class="step__footer">
                <span class="total">"예상 견적: " <strong>{total}</strong></span>
                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=Signal::derive(move || !wizard.with(|w| w.can_proceed_to_form()))
                    on_click=move |_| dispatch(wizard, WizardCommand::ProceedToForm)
                >
                    "상담 신청하기"
                </Button>
            </div>
        </section>
    }
}

// ============================================================================
// Form: сводка и контакты
// ============================================================================

#[component]
pub fn FormStep(wizard: RwSignal<QuoteWizard>, fields: CustomerFields) -> impl IntoView {
    let submitting = Memo::new(move |_| wizard.with(|w| w.is_submitting()));
    let total = move || format_won(wizard.with(|w| w.total()));
    let summary = Memo::new(move |_| wizard.with(|w| w.summary()));

    let on_submit = move || {
        let request = match wizard.try_update(|w| w.prepare_submission(fields.snapshot())) {
            Some(Ok(request)) => request,
            Some(Err(e)) => {
                alert(&wizard_error_message(&e));
                return;
            }
            None => return,
        };

        spawn_local(async move {
            let result = HttpGateway::new().submit_consultation(&request).await;
            if let Err(e) = &result {
                log::error!("Consultation submit failed: {}", e);
            }
            match wizard.try_update(|w| w.complete_submission(result)) {
                Some(Ok(())) => {
                    fields.clear();
                    alert(SUBMIT_SUCCESS);
                }
                Some(Err(e)) => alert(&wizard_error_message(&e)),
                None => {}
            }
        });
    };

    view! {
        <section class="step step--form">
            <h2 class="step__title">"선택하신 서비스"</h2>

            <div class="summary">
                {move || {
                    summary
                        .get()
                        .into_iter()
                        .map(|group| {
                            view! {
                                <div class="summary__group">
                                    <h4>{group.icon.clone()} " " {group.industry.clone()}</h4>
                                    <ul>
                                        {group
                                            .services
                                            .into_iter()
                                            .map(|line| {
                                                view! {
                                                    <li>
                                                        {line.service_name} " - " {line.option_label}
                                                        <span class="summary__price">{format_won(line.price)}</span>
                                                    </li>
                                                }
                                            })
                                            .collect_view()}
                                    </ul>
                                </div>
                            }
                        })
                        .collect_view()
                }}
                <div class="summary__total">"총 예상 금액: " <strong>{total}</strong></div>
            </div>

            <div class="consult-form">
                <label>"이름" <Input value=fields.name placeholder="홍길동" /></label>
                <label>"업종" <Input value=fields.industry placeholder="예: 카페" /></label>
                <label>"연락처" <Input value=fields.phone input_type=InputType::Tel placeholder="010-0000-0000" /></label>
                <label>"지역" <Input value=fields.region placeholder="예: 서울 강남구" /></label>

                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=Signal::derive(move || submitting.get())
                    loading=move || submitting.get()
                    on_click=move |_| on_submit()
                >
                    {move || if submitting.get() { "제출 중..." } else { "상담 신청 완료" }}
                </Button>
            </div>
        </section>
    }
}
