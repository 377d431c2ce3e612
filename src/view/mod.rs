//! Presentation of the search state
//!
//! [`ResultRenderer`] derives a [`ResultsView`] from the controller and renders
//! it as terminal text or as an HTML fragment. It never looks at raw service
//! data; every fallback has already been applied by the normalizer.

mod templates;

pub use templates::Templates;

use crate::config::{OutputFormat, UiSettings};
use crate::results::FacultyResult;
use crate::search::{SearchController, SearchState};
use anyhow::Result;
use serde::Serialize;

/// Shown while a request is in flight
pub const LOADING_NOTICE: &str = "Analyzing semantic layers...";
/// Shown when a completed search has no results
pub const EMPTY_NOTICE: &str = "Zero matches found in research DNA.";
/// Shown when the service could not answer
pub const FAILED_NOTICE: &str =
    "The search service may be unavailable or still warming up. Please retry in a few seconds.";

/// Which section the renderer shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Idle,
    Loading,
    Loaded,
    Empty,
    Failed,
}

/// One result card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub name: String,
    pub match_percent: i64,
    pub specialization: String,
    pub image_url: String,
    pub profile_url: String,
    pub teaching: Option<String>,
    pub publications: Option<String>,
}

/// Everything a template needs, derived from the controller
#[derive(Debug, Clone, Serialize)]
pub struct ResultsView {
    pub kind: ViewKind,
    pub query: String,
    pub cards: Vec<Card>,
    pub count: usize,
    pub notice: Option<String>,
    pub detail: Option<String>,
}

/// Renders controller state as text or HTML
pub struct ResultRenderer {
    templates: Templates,
    specialization_max_chars: usize,
}

impl ResultRenderer {
    pub fn new(ui: &UiSettings) -> Result<Self> {
        Ok(Self {
            templates: Templates::new()?,
            specialization_max_chars: ui.specialization_max_chars,
        })
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Derive the view for the controller's current state
    pub fn view(&self, controller: &SearchController) -> ResultsView {
        let query = controller.query().to_string();
        let (kind, cards, notice, detail) = match controller.state() {
            SearchState::Idle => (ViewKind::Idle, Vec::new(), None, None),
            SearchState::Loading => (
                ViewKind::Loading,
                Vec::new(),
                Some(LOADING_NOTICE.to_string()),
                None,
            ),
            SearchState::Loaded(results) => (
                ViewKind::Loaded,
                results.iter().map(|r| self.card(r)).collect(),
                None,
                None,
            ),
            SearchState::Empty => (
                ViewKind::Empty,
                Vec::new(),
                Some(EMPTY_NOTICE.to_string()),
                controller.service_message().map(str::to_string),
            ),
            SearchState::Failed(e) => (
                ViewKind::Failed,
                Vec::new(),
                Some(FAILED_NOTICE.to_string()),
                Some(e.to_string()),
            ),
        };

        ResultsView {
            kind,
            query,
            count: cards.len(),
            cards,
            notice,
            detail,
        }
    }

    fn card(&self, result: &FacultyResult) -> Card {
        Card {
            name: result.name.clone(),
            match_percent: result.match_percent(),
            specialization: truncate(&result.specialization, self.specialization_max_chars),
            image_url: result.image_url.clone(),
            profile_url: result.profile_url.clone(),
            teaching: result.teaching.clone(),
            publications: result.publications.clone(),
        }
    }

    pub fn render(&self, view: &ResultsView, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => self.render_text(view),
            OutputFormat::Html => self.render_html(view),
        }
    }

    pub fn render_text(&self, view: &ResultsView) -> Result<String> {
        self.templates.render("results.txt", view)
    }

    pub fn render_html(&self, view: &ResultsView) -> Result<String> {
        self.templates.render("results.html", view)
    }
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    let text = text.trim();
    if max == 0 || text.chars().count() <= max {
        return text.to_string();
    }

    let cut: String = text.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}
