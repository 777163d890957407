//! Навигация мастера по страницам.
//!
//! ```text
//! Home ──(отмечена ≥1 отрасль)──▶ Estimate ──(выбран ≥1 вариант)──▶ Form
//!   ▲                                                               │
//!   └───────────── Home доступен всегда / успешная отправка ────────┘
//! ```
//!
//! Терминального состояния нет: мастер проходится заново сколько угодно раз.

use serde::{Deserialize, Serialize};

use super::selection::SelectionState;
use crate::shared::error::WizardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WizardPage {
    Home,
    Estimate,
    Form,
}

impl Default for WizardPage {
    fn default() -> Self {
        WizardPage::Home
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardNavigator {
    page: WizardPage,
}

impl WizardNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> WizardPage {
        self.page
    }

    /// Кнопка "домой" видна везде, кроме главной
    pub fn shows_home_button(&self) -> bool {
        self.page != WizardPage::Home
    }

    pub fn can_enter(&self, to: WizardPage, selection: &SelectionState) -> bool {
        match (self.page, to) {
            (_, WizardPage::Home) => true,
            (WizardPage::Home, WizardPage::Estimate) => selection.chosen_count() > 0,
            (WizardPage::Estimate, WizardPage::Form) => selection.has_any_selection(),
            _ => false,
        }
    }

    pub fn go_to(&mut self, to: WizardPage, selection: &SelectionState) -> Result<(), WizardError> {
        if !self.can_enter(to, selection) {
            return Err(WizardError::NavigationBlocked {
                from: self.page,
                to,
            });
        }
        self.page = to;
        Ok(())
    }

    /// Безусловный возврат на главную
    pub fn go_home(&mut self) {
        self.page = WizardPage::Home;
    }
}
