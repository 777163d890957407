use contracts::domain::a002_consultation::aggregate::{ConsultationRecord, ConsultationStatus};
use contracts::shared::format::{format_timestamp, format_won};
use leptos::prelude::*;
use thaw::*;

/// Цвет бейджа статуса
pub fn status_badge_color(status: ConsultationStatus) -> BadgeColor {
    match status {
        ConsultationStatus::Waiting => BadgeColor::Warning,
        ConsultationStatus::InProgress => BadgeColor::Informative,
        ConsultationStatus::Completed => BadgeColor::Success,
    }
}

#[component]
pub fn StatusBadge(status: ConsultationStatus) -> impl IntoView {
    view! {
        <Badge appearance=BadgeAppearance::Tint color=status_badge_color(status)>
            {status.code()}
        </Badge>
    }
}

/// Модальное окно с полной заявкой и снимком выбранных услуг
#[component]
pub fn DetailModal(record: ConsultationRecord, on_close: Callback<()>) -> impl IntoView {
    let services = record.selected_services();

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal" on:click=|ev| ev.stop_propagation()>
                <div class="modal__header">
                    <h2>"상담 신청 상세"</h2>
                    <button class="modal__close" on:click=move |_| on_close.run(())>"×"</button>
                </div>

                <div class="modal__section">
                    <h3>"고객 정보"</h3>
                    <div class="detail-grid">
                        <div><p class="detail-label">"이름"</p><p>{record.name.clone()}</p></div>
                        <div><p class="detail-label">"업종"</p><p>{record.industry.clone()}</p></div>
                        <div><p class="detail-label">"연락처"</p><p>{record.phone.clone()}</p></div>
                        <div><p class="detail-label">"지역"</p><p>{record.region.clone()}</p></div>
                    </div>
                </div>

                <div class="modal__section">
                    <h3>"선택 서비스"</h3>
                    {services
                        .into_iter()
                        .map(|group| {
                            view! {
                                <div class="detail-group">
                                    <h4>{group.icon} " " {group.industry}</h4>
                                    {group
                                        .services
                                        .into_iter()
                                        .map(|line| {
                                            view! {
                                                <div class="detail-line">
                                                    <span>
                                                        {format!("· {}: {}", line.service_name, line.option_label)}
                                                    </span>
                                                    <span class="detail-line__price">{format_won(line.price)}</span>
                                                </div>
                                            }
                                        })
                                        .collect_view()}
                                </div>
                            }
                        })
                        .collect_view()}
                    <div class="detail-total">
                        <span>"총 견적 금액"</span>
                        <span>{format_won(record.total_amount)}</span>
                    </div>
                </div>

                <div class="modal__section">
                    <h3>"신청 정보"</h3>
                    <div class="detail-grid">
                        <div>
                            <p class="detail-label">"신청 일시"</p>
                            <p>{format_timestamp(&record.timestamp)}</p>
                        </div>
                        <div>
                            <p class="detail-label">"현재 상태"</p>
                            <StatusBadge status=record.status />
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
