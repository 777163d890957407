use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// ID Types
// ============================================================================

/// Ключ отрасли (например, "restaurant", "retail")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndustryKey(pub String);

/// Идентификатор услуги внутри отрасли
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub String);

/// Идентификатор варианта (ценовой точки) услуги
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(IndustryKey);
string_id!(ServiceId);
string_id!(OptionId);

// ============================================================================
// Catalog
// ============================================================================

/// Вариант услуги с ценой в целых вонах
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOption {
    pub id: OptionId,
    pub label: String,
    pub price: u64,
}

/// Услуга: набор взаимоисключающих вариантов
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    #[serde(default)]
    pub options: Vec<ServiceOption>,
}

impl Service {
    pub fn option(&self, id: &OptionId) -> Option<&ServiceOption> {
        self.options.iter().find(|o| &o.id == id)
    }
}

/// Отрасль верхнего уровня со списком услуг
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Industry {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub services: Vec<Service>,
    /// Порядок карточек на главной; при равенстве: по ключу
    #[serde(rename = "sortOrder", default)]
    pub sort_order: i32,
}

impl Industry {
    pub fn service(&self, id: &ServiceId) -> Option<&Service> {
        self.services.iter().find(|s| &s.id == id)
    }
}

/// Каталог услуг. Загружается один раз за сессию и дальше не меняется.
///
/// Wire shape: `{ [industryKey]: { name, icon, sortOrder, services: [...] } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceCatalog {
    industries: BTreeMap<IndustryKey, Industry>,
}

impl ServiceCatalog {
    pub fn new(industries: BTreeMap<IndustryKey, Industry>) -> Self {
        Self { industries }
    }

    pub fn is_empty(&self) -> bool {
        self.industries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.industries.len()
    }

    pub fn industry(&self, key: &IndustryKey) -> Option<&Industry> {
        self.industries.get(key)
    }

    pub fn service(&self, industry: &IndustryKey, service: &ServiceId) -> Option<&Service> {
        self.industry(industry)?.service(service)
    }

    pub fn option(
        &self,
        industry: &IndustryKey,
        service: &ServiceId,
        option: &OptionId,
    ) -> Option<&ServiceOption> {
        self.service(industry, service)?.option(option)
    }

    /// Цена варианта; для неизвестных ключей: 0
    pub fn resolve_price(
        &self,
        industry: &IndustryKey,
        service: &ServiceId,
        option: &OptionId,
    ) -> u64 {
        self.option(industry, service, option)
            .map(|o| o.price)
            .unwrap_or(0)
    }

    /// Отрасли в порядке показа: `sort_order`, затем ключ
    pub fn industries(&self) -> impl Iterator<Item = (&IndustryKey, &Industry)> {
        let mut ordered: Vec<_> = self.industries.iter().collect();
        ordered.sort_by(|(ka, a), (kb, b)| a.sort_order.cmp(&b.sort_order).then_with(|| ka.cmp(kb)));
        ordered.into_iter()
    }

    pub fn insert(&mut self, key: IndustryKey, industry: Industry) {
        self.industries.insert(key, industry);
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Каталог из двух отраслей для тестов
    pub fn sample_catalog() -> ServiceCatalog {
        let mut catalog = ServiceCatalog::default();
        catalog.insert(
            IndustryKey::from("A"),
            Industry {
                name: "Restaurant".into(),
                icon: "🍽️".into(),
                services: vec![
                    Service {
                        id: ServiceId::from("s1"),
                        name: "Menu design".into(),
                        options: vec![
                            ServiceOption {
                                id: OptionId::from("opt1"),
                                label: "Basic".into(),
                                price: 1000,
                            },
                            ServiceOption {
                                id: OptionId::from("opt2"),
                                label: "Premium".into(),
                                price: 2000,
                            },
                        ],
                    },
                    Service {
                        id: ServiceId::from("s2"),
                        name: "Signage".into(),
                        options: vec![ServiceOption {
                            id: OptionId::from("big"),
                            label: "Large".into(),
                            price: 500,
                        }],
                    },
                ],
                sort_order: 1,
            },
        );
        catalog.insert(
            IndustryKey::from("B"),
            Industry {
                name: "Retail".into(),
                icon: "🛍️".into(),
                services: vec![Service {
                    id: ServiceId::from("s1"),
                    name: "Shop fitting".into(),
                    options: vec![ServiceOption {
                        id: OptionId::from("x"),
                        label: "Standard".into(),
                        price: 30000,
                    }],
                }],
                sort_order: 2,
            },
        );
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::sample_catalog;
    use super::*;

    #[test]
    fn test_catalog_payload_shape() {
        let json = r#"{
            "cafe": {
                "name": "카페",
                "icon": "☕",
                "services": [
                    { "id": "logo", "name": "로고", "options": [
                        { "id": "basic", "label": "기본", "price": 150000 }
                    ]}
                ]
            }
        }"#;
        let catalog: ServiceCatalog = serde_json::from_str(json).unwrap();
        let cafe = IndustryKey::from("cafe");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.industry(&cafe).unwrap().name, "카페");
        assert_eq!(
            catalog.resolve_price(&cafe, &ServiceId::from("logo"), &OptionId::from("basic")),
            150000
        );

        let back = serde_json::to_value(&catalog).unwrap();
        assert_eq!(back["cafe"]["services"][0]["options"][0]["price"], 150000);
    }

    #[test]
    fn test_industries_follow_sort_order() {
        let json = r#"{
            "beauty": { "name": "뷰티샵", "sortOrder": 3 },
            "restaurant": { "name": "음식점", "sortOrder": 1 },
            "cafe": { "name": "카페", "sortOrder": 2 },
            "retail": { "name": "소매점", "sortOrder": 2 }
        }"#;
        let catalog: ServiceCatalog = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = catalog.industries().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["restaurant", "cafe", "retail", "beauty"]);
    }

    #[test]
    fn test_resolve_price_unknown_is_zero() {
        let catalog = sample_catalog();
        let a = IndustryKey::from("A");
        assert_eq!(
            catalog.resolve_price(&a, &ServiceId::from("s1"), &OptionId::from("opt2")),
            2000
        );
        assert_eq!(
            catalog.resolve_price(&a, &ServiceId::from("s1"), &OptionId::from("nope")),
            0
        );
        assert_eq!(
            catalog.resolve_price(
                &IndustryKey::from("Z"),
                &ServiceId::from("s1"),
                &OptionId::from("opt1")
            ),
            0
        );
    }
}
