use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use skycast_core::AppError;
use skycast_weather::{UnitSystem, WeatherProvider};
use tokio::runtime::Handle;

use crate::dismiss::DismissTimer;
use crate::error_mapping::forecast_unavailable;
use crate::render::{render, RenderContext};
use crate::services::{request_conditions, request_forecast, WeatherServiceMessage};
use crate::state::{Effect, Event, ForecastState, UiState, UiStatus};

/// Controller for the weather widget.
///
/// Owns the current [`UiState`] snapshot, runs the effects each transition
/// asks for, and folds finished requests back in via [`poll_channel`].
///
/// [`poll_channel`]: WeatherModel::poll_channel
pub struct WeatherModel {
    state: UiState,
    provider: Arc<WeatherProvider>,
    runtime: Handle,
    tx: Sender<WeatherServiceMessage>,
    rx: Receiver<WeatherServiceMessage>,
    dismiss: DismissTimer,
    dismiss_after: Duration,
}

impl WeatherModel {
    pub fn new(
        provider: Arc<WeatherProvider>,
        runtime: Handle,
        units: UnitSystem,
        dismiss_after: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: UiState::new(units),
            provider,
            runtime,
            tx,
            rx,
            dismiss: DismissTimer::new(),
            dismiss_after,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn status(&self) -> UiStatus<'_> {
        self.state.status()
    }

    /// True once nothing for the latest search is still in flight.
    pub fn is_settled(&self) -> bool {
        !self.state.is_loading() && *self.state.forecast() != ForecastState::Pending
    }

    pub fn set_location(&mut self, text: impl Into<String>) {
        self.dispatch(Event::InputChanged(text.into()));
    }

    /// Submit the current location text.
    pub fn submit(&mut self) {
        tracing::info!("Searching for {:?}", self.state.location_input());
        self.dispatch(Event::Submitted);
    }

    pub fn set_units(&mut self, units: UnitSystem) {
        self.dispatch(Event::UnitsChanged(units));
    }

    /// Close the error banner before its timer runs out.
    pub fn dismiss_error(&mut self) {
        self.dispatch(Event::ErrorDismissed);
    }

    /// Apply every finished request waiting on the channel.
    /// Returns true if anything was applied.
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            let event = match msg {
                WeatherServiceMessage::ConditionsDone { request, result } => {
                    let result = result.map_err(|e| {
                        let message = e.banner_message();
                        let app_error = AppError::from(e.clone());
                        tracing::warn!(
                            "Conditions lookup failed: {} ({})",
                            e,
                            app_error.user_message()
                        );
                        message
                    });
                    Event::ConditionsLoaded { request, result }
                }
                WeatherServiceMessage::ForecastDone { request, result } => {
                    let result = result.map_err(|e| {
                        tracing::warn!("{}", forecast_unavailable(&e));
                        e.banner_message()
                    });
                    Event::ForecastLoaded { request, result }
                }
                WeatherServiceMessage::ErrorExpired(banner) => Event::ErrorExpired(banner),
            };
            self.dispatch(event);
            changed = true;
        }
        changed
    }

    /// Render the current snapshot with `today` in the header.
    pub fn render(&self, today: NaiveDate) -> String {
        let ctx = RenderContext {
            queries: self.provider.queries(),
            today,
        };
        render(&self.state, &ctx)
    }

    fn dispatch(&mut self, event: Event) {
        let (next, effects) = self.state.apply(event);
        self.state = next;
        for effect in effects {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::FetchConditions {
                request,
                location,
                units,
            } => request_conditions(
                &self.tx,
                &self.runtime,
                self.provider.clone(),
                request,
                location,
                units,
            ),
            Effect::FetchForecast {
                request,
                coord,
                units,
            } => request_forecast(
                &self.tx,
                &self.runtime,
                self.provider.clone(),
                request,
                coord,
                units,
            ),
            Effect::ScheduleDismiss(banner) => {
                self.dismiss
                    .schedule(&self.runtime, &self.tx, banner, self.dismiss_after);
            }
            Effect::CancelDismiss => self.dismiss.cancel(),
        }
    }
}
