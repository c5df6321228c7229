//! Widget state snapshot and its transition table.
//!
//! `UiState` only changes through [`UiState::apply`], which returns the next
//! snapshot together with the side effects the controller must run. Results
//! are tagged with the request that produced them; anything that is not for
//! the latest search is dropped, so a slow stale response never overwrites a
//! newer one.

use skycast_weather::{ConditionsResult, Coordinates, ForecastEntry, UnitSystem};

/// Identifies one submitted search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

/// Identifies one error banner, so an expiring timer only clears its own banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BannerId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBanner {
    pub id: BannerId,
    pub message: String,
}

/// Forecast half of the display.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ForecastState {
    #[default]
    Empty,
    /// Conditions arrived, forecast request in flight
    Pending,
    Ready(Vec<ForecastEntry>),
    /// Forecast request failed; conditions are still shown
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    InputChanged(String),
    Submitted,
    ConditionsLoaded {
        request: RequestId,
        result: Result<ConditionsResult, String>,
    },
    ForecastLoaded {
        request: RequestId,
        result: Result<Vec<ForecastEntry>, String>,
    },
    UnitsChanged(UnitSystem),
    /// The auto-dismiss timer for a banner fired
    ErrorExpired(BannerId),
    /// The user closed the banner
    ErrorDismissed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchConditions {
        request: RequestId,
        location: String,
        units: UnitSystem,
    },
    FetchForecast {
        request: RequestId,
        coord: Coordinates,
        units: UnitSystem,
    },
    ScheduleDismiss(BannerId),
    CancelDismiss,
}

/// Derived display status. Loading and error never hold at the same time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiStatus<'a> {
    Idle,
    Loading,
    Error(&'a str),
    Ready {
        conditions: &'a ConditionsResult,
        forecast: &'a ForecastState,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiState {
    location_input: String,
    units: UnitSystem,
    loading: bool,
    error: Option<ErrorBanner>,
    conditions: Option<ConditionsResult>,
    forecast: ForecastState,
    latest_request: Option<RequestId>,
    next_request: u64,
    next_banner: u64,
}

impl UiState {
    pub fn new(units: UnitSystem) -> Self {
        Self {
            units,
            ..Self::default()
        }
    }

    pub fn location_input(&self) -> &str {
        &self.location_input
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ErrorBanner> {
        self.error.as_ref()
    }

    pub fn conditions(&self) -> Option<&ConditionsResult> {
        self.conditions.as_ref()
    }

    pub fn forecast(&self) -> &ForecastState {
        &self.forecast
    }

    /// Search whose results are currently accepted, if any.
    pub fn latest_request(&self) -> Option<RequestId> {
        self.latest_request
    }

    pub fn status(&self) -> UiStatus<'_> {
        if self.loading {
            UiStatus::Loading
        } else if let Some(banner) = &self.error {
            UiStatus::Error(&banner.message)
        } else if let Some(conditions) = &self.conditions {
            UiStatus::Ready {
                conditions,
                forecast: &self.forecast,
            }
        } else {
            UiStatus::Idle
        }
    }

    fn accepts(&self, request: RequestId) -> bool {
        self.latest_request == Some(request)
    }

    /// Compute the next snapshot for `event`.
    pub fn apply(&self, event: Event) -> (UiState, Vec<Effect>) {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match event {
            Event::InputChanged(text) => {
                next.location_input = text;
            }
            Event::Submitted => {
                let request = RequestId(next.next_request);
                next.next_request += 1;
                next.latest_request = Some(request);
                next.loading = true;

                if next.error.take().is_some() {
                    effects.push(Effect::CancelDismiss);
                }

                effects.push(Effect::FetchConditions {
                    request,
                    location: next.location_input.clone(),
                    units: next.units,
                });
            }
            Event::ConditionsLoaded { request, result } => {
                if !next.accepts(request) {
                    tracing::debug!("Discarding conditions for superseded {:?}", request);
                    return (next, effects);
                }

                next.loading = false;
                next.location_input.clear();

                match result {
                    Ok(conditions) => {
                        effects.push(Effect::FetchForecast {
                            request,
                            coord: conditions.coord,
                            units: next.units,
                        });
                        next.conditions = Some(conditions);
                        next.forecast = ForecastState::Pending;
                    }
                    Err(message) => {
                        let id = BannerId(next.next_banner);
                        next.next_banner += 1;
                        next.error = Some(ErrorBanner { id, message });
                        next.conditions = None;
                        next.forecast = ForecastState::Empty;
                        effects.push(Effect::ScheduleDismiss(id));
                    }
                }
            }
            Event::ForecastLoaded { request, result } => {
                if !next.accepts(request) || next.forecast != ForecastState::Pending {
                    tracing::debug!("Discarding forecast for superseded {:?}", request);
                    return (next, effects);
                }

                next.forecast = match result {
                    Ok(entries) => ForecastState::Ready(entries),
                    Err(message) => ForecastState::Unavailable(message),
                };
            }
            Event::UnitsChanged(units) => {
                next.units = units;
                next.conditions = None;
                next.forecast = ForecastState::Empty;
                // Anything in flight was requested in the old units
                next.latest_request = None;
                next.loading = false;
            }
            Event::ErrorExpired(id) => {
                if next.error.as_ref().is_some_and(|banner| banner.id == id) {
                    next.error = None;
                }
            }
            Event::ErrorDismissed => {
                if next.error.take().is_some() {
                    effects.push(Effect::CancelDismiss);
                }
            }
        }

        (next, effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_weather::Wind;

    fn paris() -> ConditionsResult {
        ConditionsResult {
            name: "Paris".into(),
            coord: Coordinates { lat: 48.85, lon: 2.35 },
            temperature: 20.4,
            feels_like: 19.9,
            temp_max: 21.7,
            humidity: 60,
            wind: Wind {
                speed: 3.6,
                deg: 240.0,
            },
            condition: "Clear".into(),
            icon: "01d".into(),
        }
    }

    fn entry(timestamp: &str) -> ForecastEntry {
        ForecastEntry {
            timestamp: timestamp.into(),
            temperature: 18.0,
            description: "light rain".into(),
            icon: "10d".into(),
        }
    }

    /// Type a location and submit it, returning the state and the request id.
    fn submit(state: &UiState, location: &str) -> (UiState, RequestId) {
        let (state, _) = state.apply(Event::InputChanged(location.into()));
        let (state, effects) = state.apply(Event::Submitted);
        let request = effects
            .iter()
            .find_map(|e| match e {
                Effect::FetchConditions { request, .. } => Some(*request),
                _ => None,
            })
            .unwrap();
        (state, request)
    }

    fn assert_invariants(state: &UiState) {
        assert!(!(state.is_loading() && state.error().is_some()));
    }

    #[test]
    fn test_starts_idle() {
        let state = UiState::new(UnitSystem::Metric);
        assert_eq!(state.status(), UiStatus::Idle);
        assert_eq!(state.units(), UnitSystem::Metric);
    }

    #[test]
    fn test_submit_goes_to_loading_and_fetches() {
        let state = UiState::new(UnitSystem::Imperial);
        let (state, _) = state.apply(Event::InputChanged("Paris".into()));
        let (state, effects) = state.apply(Event::Submitted);

        assert_eq!(state.status(), UiStatus::Loading);
        assert_eq!(
            effects,
            vec![Effect::FetchConditions {
                request: state.latest_request().unwrap(),
                location: "Paris".into(),
                units: UnitSystem::Imperial,
            }]
        );
        // Input stays until the response lands
        assert_eq!(state.location_input(), "Paris");
    }

    #[test]
    fn test_empty_location_is_passed_through() {
        let state = UiState::new(UnitSystem::Metric);
        let (_, effects) = state.apply(Event::Submitted);
        assert!(matches!(
            &effects[0],
            Effect::FetchConditions { location, .. } if location.is_empty()
        ));
    }

    #[test]
    fn test_conditions_success_chains_forecast() {
        let (state, request) = submit(&UiState::new(UnitSystem::Metric), "Paris");
        let (state, effects) = state.apply(Event::ConditionsLoaded {
            request,
            result: Ok(paris()),
        });

        assert_eq!(
            effects,
            vec![Effect::FetchForecast {
                request,
                coord: Coordinates { lat: 48.85, lon: 2.35 },
                units: UnitSystem::Metric,
            }]
        );
        assert!(matches!(
            state.status(),
            UiStatus::Ready { forecast: ForecastState::Pending, .. }
        ));
        assert_eq!(state.location_input(), "");
        assert_invariants(&state);

        let (state, effects) = state.apply(Event::ForecastLoaded {
            request,
            result: Ok(vec![entry("2026-10-19 12:00:00")]),
        });
        assert!(effects.is_empty());
        assert_eq!(
            state.forecast(),
            &ForecastState::Ready(vec![entry("2026-10-19 12:00:00")])
        );
    }

    #[test]
    fn test_conditions_failure_shows_banner() {
        let (state, request) = submit(&UiState::new(UnitSystem::Metric), "Paris");
        let (state, _) = state.apply(Event::ConditionsLoaded {
            request,
            result: Ok(paris()),
        });

        let (state, request) = submit(&state, "Atlantis");
        let (state, effects) = state.apply(Event::ConditionsLoaded {
            request,
            result: Err("city not found".into()),
        });

        let banner = state.error().unwrap().clone();
        assert_eq!(state.status(), UiStatus::Error("city not found"));
        assert_eq!(effects, vec![Effect::ScheduleDismiss(banner.id)]);
        assert!(state.conditions().is_none());
        assert_eq!(state.forecast(), &ForecastState::Empty);
        assert_eq!(state.location_input(), "");
        assert_invariants(&state);
    }

    #[test]
    fn test_error_expiry_is_idempotent() {
        let (state, request) = submit(&UiState::new(UnitSystem::Metric), "Atlantis");
        let (state, _) = state.apply(Event::ConditionsLoaded {
            request,
            result: Err("city not found".into()),
        });
        let banner = state.error().unwrap().id;

        let (cleared, effects) = state.apply(Event::ErrorExpired(banner));
        assert!(effects.is_empty());
        assert_eq!(cleared.status(), UiStatus::Idle);

        let (again, _) = cleared.apply(Event::ErrorExpired(banner));
        assert_eq!(again, cleared);
    }

    #[test]
    fn test_stale_expiry_keeps_newer_banner() {
        let (state, first) = submit(&UiState::new(UnitSystem::Metric), "Atlantis");
        let (state, _) = state.apply(Event::ConditionsLoaded {
            request: first,
            result: Err("city not found".into()),
        });
        let old_banner = state.error().unwrap().id;

        let (state, second) = submit(&state, "Lemuria");
        let (state, _) = state.apply(Event::ConditionsLoaded {
            request: second,
            result: Err("still not found".into()),
        });
        assert_ne!(state.error().unwrap().id, old_banner);

        let (state, _) = state.apply(Event::ErrorExpired(old_banner));
        assert_eq!(state.status(), UiStatus::Error("still not found"));
    }

    #[test]
    fn test_new_search_clears_banner_and_cancels_timer() {
        let (state, request) = submit(&UiState::new(UnitSystem::Metric), "Atlantis");
        let (state, _) = state.apply(Event::ConditionsLoaded {
            request,
            result: Err("city not found".into()),
        });

        let (state, _) = state.apply(Event::InputChanged("Paris".into()));
        let (state, effects) = state.apply(Event::Submitted);

        assert_eq!(effects[0], Effect::CancelDismiss);
        assert!(state.error().is_none());
        assert_eq!(state.status(), UiStatus::Loading);
    }

    #[test]
    fn test_user_dismiss() {
        let (state, request) = submit(&UiState::new(UnitSystem::Metric), "Atlantis");
        let (state, _) = state.apply(Event::ConditionsLoaded {
            request,
            result: Err("city not found".into()),
        });

        let (state, effects) = state.apply(Event::ErrorDismissed);
        assert_eq!(effects, vec![Effect::CancelDismiss]);
        assert_eq!(state.status(), UiStatus::Idle);

        let (_, effects) = state.apply(Event::ErrorDismissed);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_superseded_conditions_are_discarded() {
        let (state, slow) = submit(&UiState::new(UnitSystem::Metric), "Slowtown");
        let (state, fast) = submit(&state, "Paris");

        let (state, _) = state.apply(Event::ConditionsLoaded {
            request: fast,
            result: Ok(paris()),
        });

        let mut stale = paris();
        stale.name = "Slowtown".into();
        let (after, effects) = state.apply(Event::ConditionsLoaded {
            request: slow,
            result: Ok(stale),
        });

        assert!(effects.is_empty());
        assert_eq!(after, state);
        assert_eq!(after.conditions().unwrap().name, "Paris");
    }

    #[test]
    fn test_superseded_failure_does_not_raise_banner() {
        let (state, slow) = submit(&UiState::new(UnitSystem::Metric), "Atlantis");
        let (state, _) = submit(&state, "Paris");

        let (after, effects) = state.apply(Event::ConditionsLoaded {
            request: slow,
            result: Err("city not found".into()),
        });

        assert!(effects.is_empty());
        assert!(after.error().is_none());
        assert_eq!(after.status(), UiStatus::Loading);
    }

    #[test]
    fn test_superseded_forecast_is_discarded() {
        let (state, first) = submit(&UiState::new(UnitSystem::Metric), "Paris");
        let (state, _) = state.apply(Event::ConditionsLoaded {
            request: first,
            result: Ok(paris()),
        });
        let (state, second) = submit(&state, "Paris");
        let (state, _) = state.apply(Event::ConditionsLoaded {
            request: second,
            result: Ok(paris()),
        });

        let (after, _) = state.apply(Event::ForecastLoaded {
            request: first,
            result: Ok(vec![entry("old")]),
        });
        assert_eq!(after.forecast(), &ForecastState::Pending);
    }

    #[test]
    fn test_forecast_failure_is_non_fatal() {
        let (state, request) = submit(&UiState::new(UnitSystem::Metric), "Paris");
        let (state, _) = state.apply(Event::ConditionsLoaded {
            request,
            result: Ok(paris()),
        });

        let (state, effects) = state.apply(Event::ForecastLoaded {
            request,
            result: Err("An error occurred".into()),
        });

        assert!(effects.is_empty());
        assert!(state.error().is_none());
        assert!(matches!(
            state.status(),
            UiStatus::Ready {
                forecast: ForecastState::Unavailable(_),
                ..
            }
        ));
    }

    #[test]
    fn test_units_change_clears_display_without_fetching() {
        let (state, request) = submit(&UiState::new(UnitSystem::Metric), "Paris");
        let (state, _) = state.apply(Event::ConditionsLoaded {
            request,
            result: Ok(paris()),
        });

        let (state, effects) = state.apply(Event::UnitsChanged(UnitSystem::Imperial));

        assert!(effects.is_empty());
        assert_eq!(state.units().symbol(), "°F");
        assert!(state.conditions().is_none());
        assert_eq!(state.forecast(), &ForecastState::Empty);
        assert_eq!(state.status(), UiStatus::Idle);

        // A forecast for the old units arriving late is ignored
        let (after, _) = state.apply(Event::ForecastLoaded {
            request,
            result: Ok(vec![entry("late")]),
        });
        assert_eq!(after.forecast(), &ForecastState::Empty);
    }

    #[test]
    fn test_units_change_supersedes_in_flight_search() {
        let (state, request) = submit(&UiState::new(UnitSystem::Metric), "Paris");
        let (state, _) = state.apply(Event::UnitsChanged(UnitSystem::Imperial));
        assert_eq!(state.status(), UiStatus::Idle);

        let (after, effects) = state.apply(Event::ConditionsLoaded {
            request,
            result: Ok(paris()),
        });
        assert!(effects.is_empty());
        assert!(after.conditions().is_none());
    }

    #[test]
    fn test_request_ids_increase() {
        let (state, first) = submit(&UiState::new(UnitSystem::Metric), "a");
        let (_, second) = submit(&state, "b");
        assert!(second > first);
    }
}
