//! Каталог по умолчанию, который кладётся в пустую базу.

use sea_orm::Set;

use super::repository::{self, industry, item, service_option};

struct SeedOption {
    code: &'static str,
    label: &'static str,
    price: i64,
}

struct SeedService {
    code: &'static str,
    name: &'static str,
    options: &'static [SeedOption],
}

struct SeedIndustry {
    key: &'static str,
    name: &'static str,
    icon: &'static str,
    services: &'static [SeedService],
}

const DEFAULT_CATALOG: &[SeedIndustry] = &[
    SeedIndustry {
        key: "restaurant",
        name: "음식점",
        icon: "🍽️",
        services: &[
            SeedService {
                code: "menu",
                name: "메뉴판 디자인",
                options: &[
                    SeedOption { code: "basic", label: "기본형", price: 150_000 },
                    SeedOption { code: "premium", label: "프리미엄", price: 300_000 },
                ],
            },
            SeedService {
                code: "signage",
                name: "간판 제작",
                options: &[
                    SeedOption { code: "small", label: "소형", price: 500_000 },
                    SeedOption { code: "large", label: "대형", price: 1_200_000 },
                ],
            },
            SeedService {
                code: "marketing",
                name: "온라인 마케팅",
                options: &[
                    SeedOption { code: "blog", label: "블로그 체험단", price: 200_000 },
                    SeedOption { code: "sns", label: "SNS 광고", price: 350_000 },
                ],
            },
        ],
    },
    SeedIndustry {
        key: "cafe",
        name: "카페",
        icon: "☕",
        services: &[
            SeedService {
                code: "interior",
                name: "인테리어 컨설팅",
                options: &[
                    SeedOption { code: "basic", label: "기본 상담", price: 300_000 },
                    SeedOption { code: "full", label: "풀패키지", price: 1_000_000 },
                ],
            },
            SeedService {
                code: "logo",
                name: "로고 디자인",
                options: &[
                    SeedOption { code: "basic", label: "로고만", price: 200_000 },
                    SeedOption { code: "branding", label: "브랜딩 패키지", price: 500_000 },
                ],
            },
        ],
    },
    SeedIndustry {
        key: "beauty",
        name: "뷰티샵",
        icon: "💇",
        services: &[
            SeedService {
                code: "booking",
                name: "예약 시스템",
                options: &[
                    SeedOption { code: "basic", label: "기본형", price: 100_000 },
                    SeedOption { code: "premium", label: "프리미엄", price: 250_000 },
                ],
            },
            SeedService {
                code: "sns",
                name: "SNS 관리",
                options: &[
                    SeedOption { code: "monthly1", label: "월 1회", price: 150_000 },
                    SeedOption { code: "monthly4", label: "월 4회", price: 400_000 },
                ],
            },
        ],
    },
    SeedIndustry {
        key: "retail",
        name: "소매점",
        icon: "🛍️",
        services: &[
            SeedService {
                code: "pos",
                name: "POS 설치",
                options: &[
                    SeedOption { code: "one", label: "1대", price: 300_000 },
                    SeedOption { code: "two", label: "2대", price: 550_000 },
                ],
            },
            SeedService {
                code: "display",
                name: "매장 디스플레이",
                options: &[
                    SeedOption { code: "basic", label: "기본형", price: 400_000 },
                    SeedOption { code: "premium", label: "프리미엄", price: 900_000 },
                ],
            },
        ],
    },
];

/// Заполнить каталог, если таблица отраслей пуста
pub async fn seed_if_empty() -> anyhow::Result<()> {
    if repository::count_industries().await? > 0 {
        return Ok(());
    }
    tracing::info!("Service catalog is empty. Seeding default catalog...");

    let mut industries = Vec::new();
    let mut items = Vec::new();
    let mut options = Vec::new();

    for (i, ind) in DEFAULT_CATALOG.iter().enumerate() {
        industries.push(industry::ActiveModel {
            key: Set(ind.key.to_string()),
            name: Set(ind.name.to_string()),
            icon: Set(ind.icon.to_string()),
            sort_order: Set(i as i32),
        });
        for (j, svc) in ind.services.iter().enumerate() {
            items.push(item::ActiveModel {
                industry_key: Set(ind.key.to_string()),
                code: Set(svc.code.to_string()),
                name: Set(svc.name.to_string()),
                sort_order: Set(j as i32),
                ..Default::default()
            });
            for (k, opt) in svc.options.iter().enumerate() {
                options.push(service_option::ActiveModel {
                    industry_key: Set(ind.key.to_string()),
                    service_code: Set(svc.code.to_string()),
                    code: Set(opt.code.to_string()),
                    label: Set(opt.label.to_string()),
                    price: Set(opt.price),
                    sort_order: Set(k as i32),
                    ..Default::default()
                });
            }
        }
    }

    let counts = (industries.len(), items.len(), options.len());
    repository::insert_industries(industries).await?;
    repository::insert_items(items).await?;
    repository::insert_options(options).await?;

    tracing::info!(
        "Seeded {} industries, {} services, {} options",
        counts.0,
        counts.1,
        counts.2
    );
    Ok(())
}
