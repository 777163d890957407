//! Состояние выбора: отмеченные отрасли и выбранный вариант на каждую услугу.
//!
//! Инварианты:
//! - у каждого ключа `(отрасль, услуга)` не больше одного варианта;
//! - отрасль любого ключа присутствует в списке отмеченных;
//! - снятие отрасли удаляет все её ключи.

use std::collections::BTreeMap;

use crate::domain::a001_service_catalog::aggregate::{
    IndustryKey, OptionId, ServiceCatalog, ServiceId,
};
use crate::domain::a002_consultation::aggregate::{IndustrySummary, ServiceLine};
use crate::shared::error::WizardError;

/// Слот выбора: услуга внутри отрасли
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionKey {
    pub industry: IndustryKey,
    pub service: ServiceId,
}

impl SelectionKey {
    pub fn new(industry: IndustryKey, service: ServiceId) -> Self {
        Self { industry, service }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Порядок вставки = порядок отметки, по нему группируется вывод
    chosen_industries: Vec<IndustryKey>,
    selections: BTreeMap<SelectionKey, OptionId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Отметить или снять отрасль. Возвращает число отмеченных отраслей.
    pub fn toggle_industry(&mut self, key: IndustryKey) -> usize {
        let checked = !self.is_industry_chosen(&key);
        self.set_industry(key, checked)
    }

    /// Явно выставить отметку отрасли (семантика чекбокса)
    pub fn set_industry(&mut self, key: IndustryKey, checked: bool) -> usize {
        if checked {
            if !self.is_industry_chosen(&key) {
                self.chosen_industries.push(key);
            }
        } else {
            self.chosen_industries.retain(|k| k != &key);
            self.selections.retain(|slot, _| slot.industry != key);
        }
        self.chosen_industries.len()
    }

    pub fn is_industry_chosen(&self, key: &IndustryKey) -> bool {
        self.chosen_industries.iter().any(|k| k == key)
    }

    pub fn chosen_industries(&self) -> &[IndustryKey] {
        &self.chosen_industries
    }

    pub fn chosen_count(&self) -> usize {
        self.chosen_industries.len()
    }

    /// Выбрать вариант услуги.
    ///
    /// Неизвестные каталогу отрасль, услуга или вариант: тихий no-op (`Ok(false)`).
    /// Отрасль есть в каталоге, но не отмечена: `StaleState`.
    pub fn choose_option(
        &mut self,
        catalog: &ServiceCatalog,
        industry: &IndustryKey,
        service: &ServiceId,
        option: &OptionId,
    ) -> Result<bool, WizardError> {
        if catalog.industry(industry).is_none() {
            return Ok(false);
        }
        if !self.is_industry_chosen(industry) {
            return Err(WizardError::StaleState {
                industry: industry.clone(),
            });
        }
        if catalog.option(industry, service, option).is_none() {
            return Ok(false);
        }
        self.selections.insert(
            SelectionKey::new(industry.clone(), service.clone()),
            option.clone(),
        );
        Ok(true)
    }

    pub fn selected_option(&self, industry: &IndustryKey, service: &ServiceId) -> Option<&OptionId> {
        self.selections
            .get(&SelectionKey::new(industry.clone(), service.clone()))
    }

    pub fn selections(&self) -> impl Iterator<Item = (&SelectionKey, &OptionId)> {
        self.selections.iter()
    }

    /// Итоговая сумма. Не кешируется, считается заново на каждый вызов.
    pub fn compute_total(&self, catalog: &ServiceCatalog) -> u64 {
        self.selections
            .iter()
            .map(|(slot, option)| catalog.resolve_price(&slot.industry, &slot.service, option))
            .sum()
    }

    pub fn has_any_selection(&self) -> bool {
        !self.selections.is_empty()
    }

    pub fn reset(&mut self) {
        self.chosen_industries.clear();
        self.selections.clear();
    }

    /// Сводка по отраслям в порядке отметки; она же уходит снимком в заявку
    pub fn summary(&self, catalog: &ServiceCatalog) -> Vec<IndustrySummary> {
        self.chosen_industries
            .iter()
            .filter_map(|key| {
                let industry = catalog.industry(key)?;
                let services = industry
                    .services
                    .iter()
                    .filter_map(|service| {
                        let chosen = self.selected_option(key, &service.id)?;
                        let option = service.option(chosen)?;
                        Some(ServiceLine {
                            service_name: service.name.clone(),
                            option_label: option.label.clone(),
                            price: option.price,
                        })
                    })
                    .collect();
                Some(IndustrySummary {
                    industry: industry.name.clone(),
                    icon: industry.icon.clone(),
                    services,
                })
            })
            .collect()
    }
}
