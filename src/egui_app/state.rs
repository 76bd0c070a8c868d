#![cfg(feature = "egui")]

use eframe::egui::{self, Vec2};

use crate::client::ExplorerClient;
use crate::filter::{FilterHistory, FilterSelection, SuggestionList};
use crate::highlight::HighlightBoard;
use crate::layout::LayoutConfig;
use crate::model::{ComparisonPayload, PanelData, PanelSet};
use crate::parser::{CatalogEntry, ServiceResponse};

/// Interactive Egui application that displays and explores one phylome
/// comparison result.
pub struct ExplorerApp {
    pub payload: ComparisonPayload,
    pub panels: PanelSet,
    pub highlight: HighlightBoard,
    pub cfg: LayoutConfig,

    /// Filterable-taxon catalog for the search suggestions.
    pub catalog: Vec<CatalogEntry>,
    pub filter_query: String,
    pub suggestions: SuggestionList,
    pub selection: FilterSelection,
    pub history: FilterHistory,

    /// Data service connection; refinement is disabled when absent.
    pub client: Option<ExplorerClient>,
    /// Last refinement error, shown inline until dismissed or a query
    /// succeeds.
    pub error_banner: Option<String>,

    pub pan: Vec2,
}

impl ExplorerApp {
    /// Create a new app showing the provided payload. The first panel is
    /// visible; the catalog may be empty (the filter bar then has nothing to
    /// suggest).
    pub fn new(
        payload: ComparisonPayload,
        catalog: Vec<CatalogEntry>,
        client: Option<ExplorerClient>,
    ) -> Self {
        let panels = PanelSet::for_payload(&payload);
        Self {
            payload,
            panels,
            highlight: HighlightBoard::new(),
            cfg: LayoutConfig::default(),
            catalog,
            filter_query: String::new(),
            suggestions: SuggestionList::new(),
            selection: FilterSelection::new(),
            history: FilterHistory::new(),
            client,
            error_banner: None,
            pan: Vec2::ZERO,
        }
    }

    /// The panel data currently on display, if any panel is visible.
    pub fn active_panel(&self) -> Option<&PanelData> {
        let index = self.panels.visible()?;
        self.payload.panels.get(index as usize - 1)
    }

    /// Switch the visible panel. Pinned rows survive the switch since rows
    /// are shared across panels; the hover state does not.
    pub fn activate_panel(&mut self, index: u32) {
        self.panels.activate(index);
        self.highlight.clear_hover();
    }

    /// Re-filter the suggestion dropdown from the current query text.
    pub fn update_suggestions(&mut self) {
        self.suggestions.refresh(&self.filter_query, &self.catalog);
    }

    /// Move the active suggestion into the collector and reset the input.
    pub fn choose_active_suggestion(&mut self) {
        if let Some(entry) = self.suggestions.active_entry().cloned() {
            self.add_to_selection(entry);
        }
    }

    pub fn add_to_selection(&mut self, entry: CatalogEntry) {
        self.selection.add(entry);
        self.filter_query.clear();
        self.suggestions.close();
    }

    /// Submit the collected taxa as a refinement query.
    ///
    /// The filter history is extended optimistically and rolled back when the
    /// service reports an error or the request fails; the previous payload
    /// stays on screen in that case.
    pub fn submit_filter(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        if self.client.is_none() {
            self.error_banner = Some("No data service configured".to_string());
            return;
        }
        let ids = match self.history.begin_submission(&self.selection.ids()) {
            Ok(ids) => ids,
            Err(err) => {
                self.error_banner = Some(err.to_string());
                return;
            }
        };
        let response = match self.client.as_ref() {
            Some(client) => client.submit_refinement(&ids),
            None => {
                self.history.rollback();
                return;
            }
        };
        match response {
            Ok(ServiceResponse::Payload(payload)) => {
                self.history.commit();
                self.selection.clear();
                self.error_banner = None;
                self.apply_payload(payload);
            }
            Ok(ServiceResponse::Error(msg)) => {
                self.history.rollback();
                self.error_banner = Some(msg);
            }
            Err(err) => {
                self.history.rollback();
                self.error_banner = Some(err.to_string());
            }
        }
    }

    /// Replace the displayed payload after a successful refinement. The row
    /// set changes, so all highlight state is dropped.
    pub fn apply_payload(&mut self, payload: ComparisonPayload) {
        self.panels = PanelSet::for_payload(&payload);
        self.payload = payload;
        self.highlight = HighlightBoard::new();
        self.pan = Vec2::ZERO;
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        super::ui::update(self, ctx, _frame);
    }
}
