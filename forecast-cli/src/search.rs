//! Type-ahead city prompt backed by a debounced suggestion session.

use std::sync::Arc;

use anyhow::Context;
use forecast_core::{
    CityLookup, CitySuggestion, GeoClient, LocationQuery, SuggestionClient, SuggestionSession,
    debounce::DEFAULT_QUIET_PERIOD, suggest::Snapshot,
};
use inquire::{
    CustomUserError, Text,
    autocompletion::{Autocomplete, Replacement},
};
use parking_lot::Mutex;

/// Feeds keystrokes into the session without waiting on the lookup, so
/// input typed within the quiet period replaces the pending call. The list
/// shown is whatever the session last published.
struct CityCompleter<L> {
    session: SuggestionSession<L>,
    shown: Arc<Mutex<Vec<CitySuggestion>>>,
}

impl<L> Clone for CityCompleter<L> {
    fn clone(&self) -> Self {
        Self { session: self.session.clone(), shown: Arc::clone(&self.shown) }
    }
}

impl<L: CityLookup + 'static> CityCompleter<L> {
    fn new(session: SuggestionSession<L>) -> Self {
        Self { session, shown: Arc::new(Mutex::new(Vec::new())) }
    }

    fn suggestions_for(&self, input: &str) -> Vec<CitySuggestion> {
        self.session.on_input(input);
        let snapshot = self.session.latest();
        if !matches_input(&snapshot, input) {
            return Vec::new();
        }

        let mut shown = self.shown.lock();
        for city in &snapshot.suggestions {
            if !shown.contains(city) {
                shown.push(city.clone());
            }
        }
        snapshot.suggestions
    }

    /// A picked suggestion keeps its country, even if it has since scrolled
    /// out of the latest results; free text is used as a bare city name.
    fn resolve(&self, input: &str) -> LocationQuery {
        resolve_selection(input, &self.shown.lock())
    }
}

impl<L: CityLookup + 'static> Autocomplete for CityCompleter<L> {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(self
            .suggestions_for(input)
            .iter()
            .map(CitySuggestion::display_name)
            .collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

/// Results for an earlier prefix still apply while the user keeps typing;
/// after backspacing to something else they do not.
fn matches_input(snapshot: &Snapshot, input: &str) -> bool {
    !snapshot.query.is_empty()
        && input
            .trim()
            .to_lowercase()
            .starts_with(&snapshot.query.to_lowercase())
}

/// Prompts until the user submits a city.
pub async fn prompt_for_city(geo: GeoClient) -> anyhow::Result<LocationQuery> {
    let session = SuggestionSession::new(SuggestionClient::new(geo), DEFAULT_QUIET_PERIOD)
        .context("City search needs a Tokio runtime")?;
    let completer = CityCompleter::new(session);
    let prompt_completer = completer.clone();

    let input = tokio::task::spawn_blocking(move || {
        Text::new("City:")
            .with_autocomplete(prompt_completer)
            .with_help_message("Type at least 2 characters for suggestions")
            .prompt()
    })
    .await
    .context("City prompt task failed")?
    .context("Failed to read city")?;

    Ok(completer.resolve(&input))
}

fn resolve_selection(input: &str, suggestions: &[CitySuggestion]) -> LocationQuery {
    let input = input.trim();
    suggestions
        .iter()
        .find(|city| city.display_name() == input)
        .map(CitySuggestion::to_query)
        .unwrap_or_else(|| LocationQuery::new(input, None))
}
