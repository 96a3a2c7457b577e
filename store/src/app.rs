//! Store facade wiring rates, quotas, the calculator and persistence.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};
use valuta_calculator::{Calculator, Key, KeyOutcome, KeyParseError};
use valuta_common::{
    format_last_updated, local_currency, search, Clock, Currency, CurrencyCategory, CurrencyInfo,
};
use valuta_fx::{
    format_display, ChartPeriod, ChartPoint, ChartStats, ConversionRequest, FxEngine, FxError,
    FxResult, RateTable,
};
use valuta_quota::{ConversionQuota, FreeLimits, UsageCounters, UsageGate};

use crate::backend::KeyValueStore;
use crate::error::StoreResult;
use crate::selection::CurrencySelection;
use crate::settings::Settings;
use crate::state::{PersistedState, STATE_KEY};

/// Store configuration.
#[derive(Debug, Clone)]
pub struct AppStoreConfig {
    /// Limits for free users.
    pub limits: FreeLimits,
    /// Device-region currency, used for the converter default and picker
    /// suggestions.
    pub local_currency: Currency,
}

impl Default for AppStoreConfig {
    fn default() -> Self {
        Self {
            limits: FreeLimits::default(),
            local_currency: local_currency(),
        }
    }
}

/// Result of a gated refresh.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// Free refresh already used today; nothing was fetched.
    Denied,
    /// New table in place and counted.
    Refreshed(RateTable),
    /// Fetch failed; the previous table is still in use.
    Failed(FxError),
}

/// Result of adding a currency to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddCurrencyOutcome {
    Added,
    AlreadySelected,
    LimitReached,
}

/// The two currencies of the single-pair converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterPair {
    pub from: Currency,
    pub to: Currency,
}

impl ConverterPair {
    /// Default pair for a device currency: local to USD, or USD to EUR.
    pub fn for_local(local: Currency) -> Self {
        let to = if local == Currency::usd() {
            Currency::eur()
        } else {
            Currency::usd()
        };
        Self { from: local, to }
    }

    /// Exchange `from` and `to`.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }
}

/// A chart series with its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub points: Vec<ChartPoint>,
    pub stats: ChartStats,
}

struct AppState {
    gate: UsageGate,
    selection: CurrencySelection,
    settings: Settings,
    current_amount: f64,
    calculator: Calculator,
    pair: ConverterPair,
}

/// Single entry point for the app's state.
///
/// Mutations apply in memory first and are then written through to the
/// backend. A failed write is logged and the in-memory change stands.
pub struct AppStore {
    backend: Arc<dyn KeyValueStore>,
    engine: FxEngine,
    clock: Arc<dyn Clock>,
    config: AppStoreConfig,
    state: Mutex<AppState>,
}

impl AppStore {
    /// Restore persisted state from `backend`, or start from defaults.
    pub async fn load(
        backend: Arc<dyn KeyValueStore>,
        engine: FxEngine,
        clock: Arc<dyn Clock>,
        config: AppStoreConfig,
    ) -> Self {
        let persisted = match backend.get(STATE_KEY).await {
            Ok(Some(json)) => PersistedState::from_json_or_default(&json),
            Ok(None) => {
                debug!("No stored state, using defaults");
                PersistedState::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored state, using defaults");
                PersistedState::default()
            }
        };

        Self::from_state(backend, engine, clock, config, persisted)
    }

    /// Build a store around an already loaded state.
    pub fn from_state(
        backend: Arc<dyn KeyValueStore>,
        engine: FxEngine,
        clock: Arc<dyn Clock>,
        config: AppStoreConfig,
        persisted: PersistedState,
    ) -> Self {
        let engine = match persisted.rates {
            Some(table) => engine.with_table(table),
            None => engine,
        };
        let gate = UsageGate::new(persisted.usage, config.limits, clock.clone());

        let state = AppState {
            gate,
            selection: persisted.selection,
            settings: persisted.settings,
            current_amount: persisted.current_amount,
            calculator: Calculator::new(),
            pair: ConverterPair::for_local(config.local_currency.clone()),
        };

        Self {
            backend,
            engine,
            clock,
            config,
            state: Mutex::new(state),
        }
    }

    /// Snapshot of everything that is persisted.
    pub fn snapshot(&self) -> PersistedState {
        let state = self.state.lock();
        PersistedState {
            selection: state.selection.clone(),
            rates: Some(self.engine.table()),
            current_amount: state.current_amount,
            settings: state.settings.clone(),
            usage: state.gate.counters().clone(),
        }
    }

    /// Write the current state to the backend.
    pub async fn try_persist(&self) -> StoreResult<()> {
        let json = self.snapshot().to_json()?;
        self.backend.set(STATE_KEY, &json).await?;
        debug!(bytes = json.len(), "State persisted");
        Ok(())
    }

    /// Write the current state, logging instead of failing.
    pub async fn persist(&self) {
        if let Err(e) = self.try_persist().await {
            warn!(error = %e, "Failed to persist state");
        }
    }

    // ------------------------------------------------------------------
    // Rates
    // ------------------------------------------------------------------

    /// Rate engine.
    pub fn engine(&self) -> &FxEngine {
        &self.engine
    }

    /// Current rate table.
    pub fn table(&self) -> RateTable {
        self.engine.table()
    }

    /// Refresh rates if the quota allows it.
    ///
    /// Only a successful refresh is counted.
    #[instrument(skip(self))]
    pub async fn refresh_rates(&self) -> RefreshOutcome {
        if !self.state.lock().gate.can_refresh() {
            return RefreshOutcome::Denied;
        }

        match self.engine.refresh(self.engine.config().live_source).await {
            Ok(table) => {
                self.state.lock().gate.record_refresh();
                self.persist().await;
                info!(source = ?table.source, "Refresh complete");
                RefreshOutcome::Refreshed(table)
            }
            Err(e) => RefreshOutcome::Failed(e),
        }
    }

    /// Header label for the table's last refresh, e.g. `Oct 17, 14:05`.
    pub fn last_updated_label(&self) -> String {
        let at = self.clock.localize(self.engine.table().last_updated);
        format_last_updated(&at)
    }

    /// Render an amount using the user's decimal preference.
    pub fn format_amount(&self, value: f64, currency: &Currency) -> String {
        let decimals = self.state.lock().settings.decimal_digits;
        format_display(value, currency, decimals)
    }

    /// Historical series and stats for a pair.
    pub async fn chart(
        &self,
        from: &Currency,
        to: &Currency,
        period: ChartPeriod,
    ) -> FxResult<ChartView> {
        let points = self.engine.chart(from, to, period).await?;
        let stats = ChartStats::from_points(&points);
        Ok(ChartView { points, stats })
    }

    // ------------------------------------------------------------------
    // Calculator
    // ------------------------------------------------------------------

    /// Press a calculator key. Completed evaluations are counted and
    /// persisted.
    pub async fn press_key(&self, key: Key) -> KeyOutcome {
        let outcome = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            state.calculator.press(key, &mut state.gate)
        };

        match outcome {
            KeyOutcome::Evaluated(_) => self.persist().await,
            KeyOutcome::QuotaExceeded => warn!("Conversion denied by quota"),
            KeyOutcome::Updated => {}
        }
        outcome
    }

    /// Press a key by its keypad label.
    pub async fn press_label(&self, label: &str) -> Result<KeyOutcome, KeyParseError> {
        let key = Key::from_label(label)?;
        Ok(self.press_key(key).await)
    }

    /// Calculator snapshot.
    pub fn calculator(&self) -> Calculator {
        self.state.lock().calculator.clone()
    }

    /// Converter currencies.
    pub fn converter_pair(&self) -> ConverterPair {
        self.state.lock().pair.clone()
    }

    pub fn set_converter_from(&self, currency: Currency) {
        self.state.lock().pair.from = currency;
    }

    pub fn set_converter_to(&self, currency: Currency) {
        self.state.lock().pair.to = currency;
    }

    pub fn swap_converter(&self) {
        self.state.lock().pair.swap();
    }

    /// Calculator value converted across the converter pair.
    pub fn converter_result(&self) -> f64 {
        let request = {
            let state = self.state.lock();
            ConversionRequest::new(
                state.calculator.value(),
                state.pair.from.clone(),
                state.pair.to.clone(),
            )
        };
        self.engine.evaluate(&request)
    }

    /// Send the calculator value to the multi-currency list: the converter's
    /// source becomes the base and the value becomes the current amount.
    pub async fn apply_to_list(&self) {
        {
            let mut state = self.state.lock();
            let amount = state.calculator.value();
            let from = state.pair.from.clone();
            state.selection.set_base(from);
            state.current_amount = amount;
        }
        self.persist().await;
    }

    // ------------------------------------------------------------------
    // Currency list
    // ------------------------------------------------------------------

    pub fn selection(&self) -> CurrencySelection {
        self.state.lock().selection.clone()
    }

    pub fn current_amount(&self) -> f64 {
        self.state.lock().current_amount
    }

    pub async fn set_current_amount(&self, amount: f64) {
        self.state.lock().current_amount = amount;
        self.persist().await;
    }

    pub async fn set_base_currency(&self, currency: Currency) {
        self.state.lock().selection.set_base(currency);
        self.persist().await;
    }

    /// Add a currency if the quota allows a longer list.
    pub async fn add_currency(&self, currency: Currency) -> AddCurrencyOutcome {
        let outcome = {
            let mut state = self.state.lock();
            if state.selection.contains(&currency) {
                AddCurrencyOutcome::AlreadySelected
            } else if !state.gate.can_add_currency(state.selection.len()) {
                warn!(currency = %currency, "Currency limit reached");
                AddCurrencyOutcome::LimitReached
            } else {
                state.selection.add(currency);
                AddCurrencyOutcome::Added
            }
        };

        if outcome == AddCurrencyOutcome::Added {
            self.persist().await;
        }
        outcome
    }

    /// Remove a currency; the base is kept.
    pub async fn remove_currency(&self, currency: &Currency) -> bool {
        let removed = self.state.lock().selection.remove(currency);
        if removed {
            self.persist().await;
        }
        removed
    }

    pub async fn reorder_currency(&self, from: usize, to: usize) -> bool {
        let moved = self.state.lock().selection.reorder(from, to);
        if moved {
            self.persist().await;
        }
        moved
    }

    pub async fn set_selected_currencies(&self, currencies: Vec<Currency>) {
        self.state.lock().selection.set_all(currencies);
        self.persist().await;
    }

    /// Current amount of the base converted into every listed currency.
    pub fn converted_amounts(&self) -> Vec<(Currency, f64)> {
        let (selection, amount) = {
            let state = self.state.lock();
            (state.selection.clone(), state.current_amount)
        };
        selection.converted_amounts(amount, &self.engine.table())
    }

    /// Catalog entries for a picker, with the local currency first when
    /// location suggestions are on.
    pub fn search_currencies(
        &self,
        query: &str,
        category: Option<CurrencyCategory>,
    ) -> Vec<&'static CurrencyInfo> {
        let suggest = self.state.lock().settings.location_suggestions;
        let preferred = suggest.then_some(&self.config.local_currency);
        search(query, category, preferred)
    }

    // ------------------------------------------------------------------
    // Quota and settings
    // ------------------------------------------------------------------

    pub fn can_convert(&self) -> bool {
        self.state.lock().gate.can_convert()
    }

    pub fn can_refresh(&self) -> bool {
        self.state.lock().gate.can_refresh()
    }

    pub fn can_add_currency(&self) -> bool {
        let state = self.state.lock();
        state.gate.can_add_currency(state.selection.len())
    }

    /// Conversions left today; `None` means unlimited.
    pub fn remaining_conversions(&self) -> Option<u32> {
        self.state.lock().gate.remaining_conversions()
    }

    pub fn counters(&self) -> UsageCounters {
        self.state.lock().gate.counters().clone()
    }

    pub fn is_pro(&self) -> bool {
        self.state.lock().gate.is_pro()
    }

    pub async fn set_pro(&self, is_pro: bool) {
        self.state.lock().gate.set_pro(is_pro);
        info!(is_pro, "Subscription state changed");
        self.persist().await;
    }

    pub fn settings(&self) -> Settings {
        self.state.lock().settings.clone()
    }

    /// Apply a settings change and persist it.
    pub async fn update_settings<F>(&self, update: F)
    where
        F: FnOnce(&mut Settings),
    {
        update(&mut self.state.lock().settings);
        self.persist().await;
    }
}
