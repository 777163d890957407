use contracts::dashboards::d400_visit_stats::board::{StatsBoard, DEFAULT_POLL_INTERVAL_MS};
use contracts::shared::format::format_thousands;
use contracts::shared::gateway::QuoteGateway;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::gateway::HttpGateway;

/// Счётчики посещений и последние заявки; обновляются каждые 30 секунд
#[component]
pub fn StatsPanel() -> impl IntoView {
    let board = RwSignal::new(StatsBoard::new());

    // Цикл опроса живёт, пока жив сигнал панели
    spawn_local(async move {
        let gateway = HttpGateway::new();
        loop {
            match board.try_update(|b| b.begin_poll()) {
                Some(true) => {
                    let result = gateway.fetch_stats().await;
                    if board.try_update(|b| b.finish_poll(result)).is_none() {
                        break;
                    }
                }
                Some(false) => {}
                None => break,
            }
            TimeoutFuture::new(DEFAULT_POLL_INTERVAL_MS).await;
        }
        log::debug!("Stats polling stopped");
    });

    let stats = move || board.with(|b| b.stats());

    view! {
        <section class="stats-panel">
            <div class="stats-panel__counters">
                <div class="stat-card">
                    <span class="stat-card__label">"누적 방문자"</span>
                    <span class="stat-card__value">
                        {move || format_thousands(stats().total_visit_count)}
                    </span>
                </div>
                <div class="stat-card">
                    <span class="stat-card__label">"오늘 방문자"</span>
                    <span class="stat-card__value">
                        {move || format_thousands(stats().today_visit_count)}
                    </span>
                </div>
                <div class="stat-card">
                    <span class="stat-card__label">"견적 신청"</span>
                    <span class="stat-card__value">
                        {move || format_thousands(stats().quote_count)}
                    </span>
                </div>
            </div>

            <ul class="stats-panel__recent">
                {move || {
                    stats()
                        .recent_logs
                        .into_iter()
                        .map(|entry| {
                            view! {
                                <li class="recent-log">
                                    <span class="recent-log__date">{entry.date}</span>
                                    <span class="recent-log__text">
                                        {format!("{}님이 {} 상담을 신청했습니다", entry.name, entry.business)}
                                    </span>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
        </section>
    }
}
