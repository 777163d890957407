use contracts::domain::a002_consultation::aggregate::{
    ConsultationRecord, ConsultationStatus, RowIndex,
};
use contracts::shared::error::{AdminError, GatewayError};
use contracts::shared::format::{format_thousands, format_timestamp, format_won};
use contracts::shared::gateway::QuoteGateway;
use contracts::usecases::u502_consultation_admin::record_store::{AdminOperation, AdminRecordStore};
use contracts::usecases::u502_consultation_admin::view::{SortOrder, StatusFilter, ViewQuery};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::{DetailModal, StatusBadge};
use crate::shared::gateway::HttpGateway;
use crate::shared::notify::alert;
use crate::system::auth::context::{do_logout, use_auth, AuthState};

const TOAST_MS: u32 = 2_000;

/// Текст для администратора по ошибке списка
pub fn admin_error_message(error: &AdminError) -> String {
    match error {
        AdminError::Load(GatewayError::Rejected(message)) => format!("데이터 로드 실패: {}", message),
        AdminError::Load(_) => "상담 데이터를 불러오는데 실패했습니다.".to_string(),
        AdminError::StatusUpdate(GatewayError::Rejected(reply)) => {
            format!("상태 업데이트 실패: {}", reply)
        }
        AdminError::StatusUpdate(e) => format!("오류: {}", e),
        AdminError::RequestInFlight(_) => "이전 요청을 처리 중입니다.".to_string(),
    }
}

fn is_unauthorized(error: &AdminError) -> bool {
    matches!(
        error,
        AdminError::Load(GatewayError::Unauthorized)
            | AdminError::StatusUpdate(GatewayError::Unauthorized)
    )
}

fn gateway_for(auth_state: ReadSignal<AuthState>) -> HttpGateway {
    HttpGateway::with_token(auth_state.with_untracked(|s| s.access_token.clone()))
}

fn report(error: &AdminError, set_auth_state: WriteSignal<AuthState>) {
    if is_unauthorized(error) {
        log::warn!("Admin session expired");
        do_logout(set_auth_state);
        return;
    }
    alert(&admin_error_message(error));
}

/// Загрузить список заново (повторное нажатие во время загрузки игнорируется)
fn reload(
    store: RwSignal<AdminRecordStore>,
    auth_state: ReadSignal<AuthState>,
    set_auth_state: WriteSignal<AuthState>,
) {
    match store.try_update(|s| s.begin_load()) {
        Some(Ok(())) => {}
        Some(Err(e)) => {
            log::debug!("{}", e);
            return;
        }
        None => return,
    }

    let gateway = gateway_for(auth_state);
    spawn_local(async move {
        let result = gateway.fetch_consultations().await;
        match store.try_update(|s| s.finish_load(result)) {
            Some(Ok(count)) => log::info!("Consultations loaded: {}", count),
            Some(Err(e)) => {
                log::error!("{}", e);
                report(&e, set_auth_state);
            }
            None => {}
        }
    });
}

#[component]
#[allow(non_snake_case)]
pub fn AdminPage() -> impl IntoView {
    let (auth_state, set_auth_state) = use_auth();
    let store = RwSignal::new(AdminRecordStore::new());
    let status_filter = RwSignal::new(StatusFilter::default());
    let sort = RwSignal::new(SortOrder::default());
    let search = RwSignal::new(String::new());
    let (toast, set_toast) = signal(Option::<String>::None);
    let (detail, set_detail) = signal(Option::<ConsultationRecord>::None);

    reload(store, auth_state, set_auth_state);

    let change_status = move |row_index: RowIndex, status: ConsultationStatus| {
        let request = match store.try_update(|s| s.begin_status_update(row_index, status)) {
            Some(Ok(request)) => request,
            Some(Err(e)) => {
                alert(&admin_error_message(&e));
                return;
            }
            None => return,
        };

        let gateway = gateway_for(auth_state);
        spawn_local(async move {
            let result = gateway.update_status(&request).await;
            match store.try_update(|s| s.finish_status_update(row_index, status, result)) {
                Some(Ok(found)) => {
                    if !found {
                        log::warn!("Row {} is not in the loaded list", row_index);
                    }
                    set_toast.set(Some("✓ 상태가 업데이트되었습니다".to_string()));
                    TimeoutFuture::new(TOAST_MS).await;
                    let _ = set_toast.try_set(None);
                }
                Some(Err(e)) => {
                    log::error!("Row {}: {}", row_index, e);
                    report(&e, set_auth_state);
                }
                None => {}
            }
        });
    };

    let aggregates = move || store.with(|s| s.compute_aggregates());
    let loading = Memo::new(move |_| store.with(|s| s.is_pending(AdminOperation::Load)));
    let visible = move || {
        let q = ViewQuery {
            status: status_filter.get(),
            sort: sort.get(),
            search: search.get(),
        };
        store.with(|s| s.apply_view(&q).into_iter().cloned().collect::<Vec<_>>())
    };

    view! {
        <div class="admin">
            <header class="admin__header">
                <h1>"상담 신청 관리"</h1>
                <div class="admin__actions">
                    <span class="muted">
                        {move || {
                            auth_state
                                .with(|s| s.user_info.as_ref().map(|u| u.display_name().to_string()))
                                .unwrap_or_default()
                        }}
                    </span>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        disabled=Signal::derive(move || loading.get())
                        loading=move || loading.get()
                        on_click=move |_| reload(store, auth_state, set_auth_state)
                    >
                        {move || if loading.get() { "🔄 새로고침 중..." } else { "🔄 새로고침" }}
                    </Button>
                    <Button appearance=ButtonAppearance::Subtle on_click=move |_| do_logout(set_auth_state)>
                        "로그아웃"
                    </Button>
                </div>
            </header>

            <div class="admin__counters">
                <div class="stat-card">
                    <span class="stat-card__label">"전체"</span>
                    <span class="stat-card__value">{move || format_thousands(aggregates().total as u64)}</span>
                </div>
                <div class="stat-card">
                    <span class="stat-card__label">"대기중"</span>
                    <span class="stat-card__value">{move || format_thousands(aggregates().waiting as u64)}</span>
                </div>
                <div class="stat-card">
                    <span class="stat-card__label">"진행중"</span>
                    <span class="stat-card__value">{move || format_thousands(aggregates().in_progress as u64)}</span>
                </div>
                <div class="stat-card">
                    <span class="stat-card__label">"완료"</span>
                    <span class="stat-card__value">{move || format_thousands(aggregates().completed as u64)}</span>
                </div>
            </div>

            <div class="admin__filters">
                <select
                    prop:value=move || status_filter.get().code()
                    on:change=move |ev| status_filter.set(StatusFilter::from_code(&event_target_value(&ev)))
                >
                    <option value="all">"전체 상태"</option>
                    {ConsultationStatus::all()
                        .into_iter()
                        .map(|status| view! { <option value=status.code()>{status.code()}</option> })
                        .collect_view()}
                </select>

                <select
                    prop:value=move || sort.get().code()
                    on:change=move |ev| sort.set(SortOrder::from_code(&event_target_value(&ev)))
                >
                    {SortOrder::all()
                        .into_iter()
                        .map(|order| view! { <option value=order.code()>{order.label()}</option> })
                        .collect_view()}
                </select>

                <Input value=search input_type=InputType::Search placeholder="이름, 업종, 지역 검색" />
            </div>

            {move || {
                let records = visible();
                if records.is_empty() && store.with(|s| s.is_loaded()) {
                    return view! { <div class="empty-state">"상담 신청 내역이 없습니다."</div> }.into_any();
                }
                view! {
                    <div class="consultation-list">
                        {records
                            .into_iter()
                            .map(|record| {
                                view! {
                                    <ConsultationCard
                                        record=record
                                        on_status=Callback::new(move |(row, status): (RowIndex, ConsultationStatus)| {
                                            change_status(row, status)
                                        })
                                        on_detail=Callback::new(move |r: ConsultationRecord| set_detail.set(Some(r)))
                                    />
                                }
                            })
                            .collect_view()}
                    </div>
                }
                .into_any()
            }}

            {move || {
                detail
                    .get()
                    .map(|record| {
                        view! {
                            <DetailModal
                                record=record
                                on_close=Callback::new(move |_| set_detail.set(None))
                            />
                        }
                    })
            }}

            {move || toast.get().map(|text| view! { <div class="toast">{text}</div> })}
        </div>
    }
}

#[component]
fn ConsultationCard(
    record: ConsultationRecord,
    on_status: Callback<(RowIndex, ConsultationStatus)>,
    on_detail: Callback<ConsultationRecord>,
) -> impl IntoView {
    let row_index = record.row_index;
    let current = record.status;
    let for_detail = record.clone();

    view! {
        <div class="consultation-card">
            <div class="consultation-card__head">
                <div>
                    <h3>{record.name.clone()}</h3>
                    <p class="muted">{format!("{} · {}", record.industry, record.region)}</p>
                </div>
                <StatusBadge status=current />
            </div>

            <div class="consultation-card__grid">
                <div>
                    <p class="detail-label">"연락처"</p>
                    <p>{record.phone.clone()}</p>
                </div>
                <div>
                    <p class="detail-label">"견적 금액"</p>
                    <p class="amount">{format_won(record.total_amount)}</p>
                </div>
            </div>

            <div>
                <p class="detail-label">"신청 일시"</p>
                <p>{format_timestamp(&record.timestamp)}</p>
            </div>

            <div class="consultation-card__actions">
                <Button appearance=ButtonAppearance::Primary on_click=move |_| on_detail.run(for_detail.clone())>
                    "상세보기"
                </Button>
                <select
                    prop:value=current.code()
                    on:change=move |ev| {
                        let code = event_target_value(&ev);
                        match ConsultationStatus::from_code(&code) {
                            Some(status) if status != current => on_status.run((row_index, status)),
                            Some(_) => {}
                            None => log::warn!("Unknown status value: {}", code),
                        }
                    }
                >
                    {ConsultationStatus::all()
                        .into_iter()
                        .map(|status| {
                            view! {
                                <option value=status.code() selected={status == current}>
                                    {status.code()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>
        </div>
    }
}
