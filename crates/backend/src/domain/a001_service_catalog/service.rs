use std::collections::BTreeMap;

use contracts::domain::a001_service_catalog::aggregate::{
    Industry, IndustryKey, OptionId, Service, ServiceCatalog, ServiceId, ServiceOption,
};

use super::repository::{self, industry, item, service_option};

/// Каталог целиком, как его отдаёт `getServiceData`
pub async fn get_catalog() -> anyhow::Result<ServiceCatalog> {
    let industries = repository::list_industries().await?;
    let items = repository::list_items().await?;
    let options = repository::list_options().await?;
    Ok(assemble_catalog(industries, items, options))
}

/// Собрать каталог из строк трёх таблиц.
///
/// Порядок отраслей, услуг и вариантов: по `sort_order`, затем по ключу или `id`.
/// Услуги и варианты без родителя отбрасываются с предупреждением.
pub fn assemble_catalog(
    industries: Vec<industry::Model>,
    mut items: Vec<item::Model>,
    mut options: Vec<service_option::Model>,
) -> ServiceCatalog {
    items.sort_by_key(|i| (i.sort_order, i.id));
    options.sort_by_key(|o| (o.sort_order, o.id));

    let mut by_key: BTreeMap<IndustryKey, Industry> = industries
        .into_iter()
        .map(|m| {
            (
                IndustryKey::new(m.key),
                Industry {
                    name: m.name,
                    icon: m.icon,
                    services: Vec::new(),
                    sort_order: m.sort_order,
                },
            )
        })
        .collect();

    for i in items {
        match by_key.get_mut(&IndustryKey::new(i.industry_key.as_str())) {
            Some(industry) => industry.services.push(Service {
                id: ServiceId::new(i.code),
                name: i.name,
                options: Vec::new(),
            }),
            None => tracing::warn!(
                "Service '{}' refers to unknown industry '{}'",
                i.code,
                i.industry_key
            ),
        }
    }

    for o in options {
        let service = by_key
            .get_mut(&IndustryKey::new(o.industry_key.as_str()))
            .and_then(|ind| {
                ind.services
                    .iter_mut()
                    .find(|s| s.id.as_str() == o.service_code)
            });
        match service {
            Some(service) => service.options.push(ServiceOption {
                id: OptionId::new(o.code),
                label: o.label,
                // отрицательная цена в базе считается нулевой
                price: u64::try_from(o.price).unwrap_or(0),
            }),
            None => tracing::warn!(
                "Option '{}' refers to unknown service '{}/{}'",
                o.code,
                o.industry_key,
                o.service_code
            ),
        }
    }

    ServiceCatalog::new(by_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ind(key: &str, name: &str, sort_order: i32) -> industry::Model {
        industry::Model {
            key: key.into(),
            name: name.into(),
            icon: "🍽️".into(),
            sort_order,
        }
    }

    fn svc(id: i64, industry_key: &str, code: &str, sort_order: i32) -> item::Model {
        item::Model {
            id,
            industry_key: industry_key.into(),
            code: code.into(),
            name: format!("service {}", code),
            sort_order,
        }
    }

    fn opt(id: i64, industry_key: &str, service_code: &str, code: &str, price: i64) -> service_option::Model {
        service_option::Model {
            id,
            industry_key: industry_key.into(),
            service_code: service_code.into(),
            code: code.into(),
            label: code.to_uppercase(),
            price,
            sort_order: 0,
        }
    }

    #[test]
    fn test_assemble_catalog() {
        let catalog = assemble_catalog(
            vec![ind("restaurant", "음식점", 1), ind("cafe", "카페", 2)],
            vec![
                svc(2, "restaurant", "sign", 2),
                svc(1, "restaurant", "menu", 1),
                svc(3, "cafe", "logo", 1),
            ],
            vec![
                opt(1, "restaurant", "menu", "basic", 150000),
                opt(2, "restaurant", "menu", "premium", 300000),
                opt(3, "cafe", "logo", "basic", 200000),
            ],
        );

        assert_eq!(catalog.len(), 2);
        let restaurant = catalog.industry(&IndustryKey::from("restaurant")).unwrap();
        let codes: Vec<_> = restaurant.services.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(codes, vec!["menu", "sign"]);
        assert_eq!(
            catalog.resolve_price(
                &IndustryKey::from("restaurant"),
                &ServiceId::from("menu"),
                &OptionId::from("premium")
            ),
            300000
        );
        assert!(restaurant.services[1].options.is_empty());

        let order: Vec<_> = catalog.industries().map(|(k, _)| k.as_str()).collect();
        assert_eq!(order, vec!["restaurant", "cafe"]);
    }

    #[test]
    fn test_orphans_and_negative_price() {
        let catalog = assemble_catalog(
            vec![ind("cafe", "카페", 1)],
            vec![svc(1, "cafe", "logo", 1), svc(2, "gone", "menu", 1)],
            vec![
                opt(1, "cafe", "logo", "basic", -5),
                opt(2, "cafe", "missing", "x", 100),
            ],
        );
        let cafe = catalog.industry(&IndustryKey::from("cafe")).unwrap();
        assert_eq!(cafe.services.len(), 1);
        assert_eq!(cafe.services[0].options.len(), 1);
        assert_eq!(cafe.services[0].options[0].price, 0);
    }
}
