//! Session state for the lookup-and-display flow
//!
//! A [`Session`] owns the dataset, the user's selection and the outcome of the
//! last evaluation. Every interaction mutates the selection and calls
//! [`Session::evaluate`]; the outcome holds a route and summary only when the
//! latest lookup succeeded.

use log::{debug, warn};

use crate::core::dataset::Dataset;
use crate::core::error::{Error, Result, RouteError};
use crate::core::map::{self, MapDescription, RouteOverlay};
use crate::core::route::{RouteClient, RouteResult};
use crate::core::selection::{Endpoint, SelectionState};
use crate::core::summary::SummaryRecord;

/// Result of evaluating the current selection
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Outcome {
    /// No credential yet; not an error
    #[default]
    AwaitingCredential,
    /// Credential present but a hospital is still missing
    AwaitingSelection,
    /// Last lookup succeeded
    Routed {
        route: RouteResult,
        summary: SummaryRecord,
    },
    /// Last lookup failed; nothing is displayed or exportable
    Failed(RouteError),
}

/// What the user sees after an interaction
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub map: MapDescription,
    pub summary: Option<SummaryRecord>,
}

/// Build the view for an outcome. Pure: the same inputs always produce the
/// same map and summary, and the route endpoints are the routed hospitals.
pub fn view(dataset: &Dataset, outcome: &Outcome) -> View {
    let (overlay, summary) = match outcome {
        Outcome::Routed { route, summary } => {
            // Endpoints come from the routed summary, never the live selection
            let overlay = dataset.find(&summary.hospital_a).zip(dataset.find(&summary.hospital_b));
            let overlay = overlay.map(|(from, to)| RouteOverlay {
                from,
                to,
                path: &route.geometry,
            });
            (overlay, Some(summary.clone()))
        }
        _ => (None, None),
    };

    View {
        map: map::render(dataset.records(), overlay),
        summary,
    }
}

pub struct Session {
    dataset: Dataset,
    selection: SelectionState,
    outcome: Outcome,
}

impl Session {
    pub fn new(dataset: Dataset) -> Self {
        Self::with_selection(dataset, SelectionState::new())
    }

    pub fn with_selection(dataset: Dataset, selection: SelectionState) -> Self {
        Self {
            dataset,
            selection,
            outcome: Outcome::default(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Summary of the last lookup, only if it succeeded
    pub fn summary(&self) -> Option<&SummaryRecord> {
        match &self.outcome {
            Outcome::Routed { summary, .. } => Some(summary),
            _ => None,
        }
    }

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.selection.set_api_key(key);
        self.invalidate();
    }

    pub fn set_speed_kmh(&mut self, speed_kmh: u32) -> Result<()> {
        self.selection.set_speed_kmh(speed_kmh)?;
        self.invalidate();
        Ok(())
    }

    /// Choose the state for an endpoint. Like a cascading drop-down, the
    /// hospital falls back to the first one listed in that state.
    pub fn select_state(&mut self, endpoint: Endpoint, state: &str) -> Result<()> {
        let state = self.dataset.resolve_state(state)?.to_string();
        let first = self.dataset.hospitals_in(&state).first().map(|h| h.to_string());

        match first {
            Some(hospital) => self.selection.set_hospital(endpoint, state, hospital),
            None => self.selection.set_state(endpoint, state),
        }
        self.invalidate();
        Ok(())
    }

    /// Choose a hospital for an endpoint. If the endpoint already has a
    /// state, the hospital must belong to it; otherwise its state is adopted.
    pub fn select_hospital(&mut self, endpoint: Endpoint, name: &str) -> Result<()> {
        let record = self.dataset.resolve(name)?;

        if let Some(state) = self.selection.state(endpoint) {
            if !self.dataset.hospitals_in(state).contains(&name) {
                return Err(Error::InvalidInput(format!(
                    "'{name}' is not in {state}; choose a different state for hospital {endpoint} first"
                )));
            }
        }

        let state = match self.selection.state(endpoint) {
            Some(state) => state.to_string(),
            None => record.state.clone(),
        };
        self.selection.set_hospital(endpoint, state, name);
        self.invalidate();
        Ok(())
    }

    /// Forget both hospitals and the last outcome
    pub fn reset(&mut self) {
        self.selection.clear_hospitals();
        self.invalidate();
    }

    /// Drop any previous result once the selection changes. The route and
    /// summary stay hidden until the next [`Session::evaluate`].
    fn invalidate(&mut self) {
        self.outcome = match self.selection.api_key() {
            Some(_) => Outcome::AwaitingSelection,
            None => Outcome::AwaitingCredential,
        };
    }

    /// Re-evaluate the flow for the current selection.
    ///
    /// Without a credential no request is made. Otherwise a lookup runs as
    /// soon as both hospitals are chosen, replacing the previous outcome.
    pub async fn evaluate(&mut self, client: &RouteClient) -> &Outcome {
        let outcome = self.lookup(client).await;
        self.outcome = outcome;
        &self.outcome
    }

    async fn lookup(&self, client: &RouteClient) -> Outcome {
        let Some(api_key) = self.selection.api_key() else {
            return Outcome::AwaitingCredential;
        };

        let Some((a, b)) = self.selection.endpoints() else {
            return Outcome::AwaitingSelection;
        };

        let (Some(from), Some(to)) = (self.dataset.find(a), self.dataset.find(b)) else {
            return Outcome::AwaitingSelection;
        };

        debug!("Looking up route {a} -> {b}");
        match client
            .lookup_route(from.coordinate(), to.coordinate(), api_key)
            .await
        {
            Ok(leg) => {
                let route = RouteResult::from_leg(leg, self.selection.speed_kmh());
                match SummaryRecord::build(&self.selection, &route) {
                    Some(summary) => Outcome::Routed { route, summary },
                    None => Outcome::AwaitingSelection,
                }
            }
            Err(err) => {
                warn!("Route lookup {a} -> {b} failed: {err}");
                Outcome::Failed(err)
            }
        }
    }

    pub fn view(&self) -> View {
        view(&self.dataset, &self.outcome)
    }
}
