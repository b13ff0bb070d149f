use super::widgets::{Choice, Spinner, TextInput};
use crate::actions::{ConnectionCheck, Credential, Session};
use crate::api::{QueryInferencesParams, RuleStatus};
use crate::config::{Config, HttpConfig};
use crate::fetch::{FetchSlot, InferencesQuery, Outcome, QueryKey};
use crate::filters::{FilterEdit, FilterState, InferenceFilters, parse_date_bound};
use crate::view::{ExpandedRows, Pagination, TablePage};
use std::time::Duration;

pub const EMPTY_KEY_MESSAGE: &str = "Please enter an API key";
pub const FAILED_KEY_MESSAGE: &str = "Failed to connect with the provided API key";
const MISSING_BASE_URL_MESSAGE: &str = "ARTHUR_BASE_URL is not configured";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Gate,
    Table,
    Filters,
}

/// Work the event loop must start on the app's behalf.
#[derive(Debug)]
pub enum Effect {
    Fetch {
        key: QueryKey,
        session: Session,
        params: QueryInferencesParams,
    },
    CheckKey {
        base_url: String,
        raw_key: String,
    },
}

/// Results coming back from spawned work.
#[derive(Debug)]
pub enum Message {
    Fetched {
        key: QueryKey,
        outcome: Outcome,
    },
    KeyChecked {
        raw_key: String,
        check: ConnectionCheck,
    },
}

#[derive(Debug, Clone, Default)]
pub struct GateState {
    pub input: TextInput,
    pub error: Option<String>,
    pub checking: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    TaskName,
    UserId,
    Status,
    From,
    To,
}

impl FilterField {
    pub const ALL: [Self; 5] = [
        Self::TaskName,
        Self::UserId,
        Self::Status,
        Self::From,
        Self::To,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Editable mirror of the draft filters.
#[derive(Debug, Clone)]
pub struct FilterForm {
    pub focus: FilterField,
    pub task_name: TextInput,
    pub user_id: TextInput,
    pub status: Choice,
    pub from: TextInput,
    pub to: TextInput,
    pub error: Option<String>,
}

impl FilterForm {
    pub fn from_draft(draft: &InferenceFilters) -> Self {
        let any = t!("tui.status_any").to_string();
        let mut status = Choice::new(
            std::iter::once(any)
                .chain(RuleStatus::ALL.iter().map(|s| s.as_str().to_string()))
                .collect(),
        );
        if let Some(first) = draft.rule_statuses.as_ref().and_then(|s| s.first()) {
            status.select(first.as_str());
        }
        Self {
            focus: FilterField::default(),
            task_name: TextInput::new(draft.task_name.as_deref().unwrap_or_default()),
            user_id: TextInput::new(draft.user_id.as_deref().unwrap_or_default()),
            status,
            from: TextInput::new(date_part(draft.start_time.as_deref())),
            to: TextInput::new(date_part(draft.end_time.as_deref())),
            error: None,
        }
    }

    /// Status picked in the form; index 0 is "any".
    pub fn selected_status(&self) -> Option<RuleStatus> {
        (self.status.selected > 0)
            .then(|| RuleStatus::ALL.get(self.status.selected - 1).cloned())
            .flatten()
    }

    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            FilterField::TaskName => Some(&mut self.task_name),
            FilterField::UserId => Some(&mut self.user_id),
            FilterField::From => Some(&mut self.from),
            FilterField::To => Some(&mut self.to),
            FilterField::Status => None,
        }
    }
}

fn date_part(iso: Option<&str>) -> &str {
    iso.map_or("", |value| value.get(..10).unwrap_or(value))
}

pub struct App {
    pub screen: Screen,
    pub base_url: Option<String>,
    http: HttpConfig,
    pub session: Option<Session>,
    pub gate: GateState,
    pub filters: FilterState,
    pub form: FilterForm,
    pub slot: FetchSlot,
    pub expanded: ExpandedRows,
    pub cursor: usize,
    pub query: InferencesQuery,
    pub spinner: Spinner,
    pub message_width: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &Config, credential: Option<Credential>) -> Self {
        let session = credential.and_then(|c| Session::from_config(config, c).ok());
        let filters = FilterState::new(config.ui.default_page_size);
        let form = FilterForm::from_draft(&filters.draft);
        Self {
            screen: if session.is_some() {
                Screen::Table
            } else {
                Screen::Gate
            },
            base_url: config.base_url.clone(),
            http: config.http.clone(),
            session,
            gate: GateState {
                input: TextInput::default().masked(),
                ..GateState::default()
            },
            filters,
            form,
            slot: FetchSlot::default(),
            expanded: ExpandedRows::default(),
            cursor: 0,
            query: InferencesQuery::with_stale_after(Duration::from_secs(
                config.cache.stale_after_secs,
            )),
            spinner: Spinner::default(),
            message_width: config.ui.message_width,
            should_quit: false,
        }
    }

    /// Make the fetch slot follow the applied filters. Returns the fetch to
    /// start, if the wanted key changed or is not loaded yet.
    pub fn sync_fetch(&mut self) -> Option<Effect> {
        let Some(key) = InferencesQuery::key_for(self.session.as_ref(), &self.filters.applied)
        else {
            self.slot.reset();
            return None;
        };
        if !self.slot.request(key.clone()) {
            return None;
        }
        self.fetch_effect(key)
    }

    /// Drop the cached page and fetch it again.
    pub fn refresh(&mut self) -> Option<Effect> {
        let key = self.slot.refresh()?;
        self.query.cache().invalidate(&key);
        self.fetch_effect(key)
    }

    fn fetch_effect(&self, key: QueryKey) -> Option<Effect> {
        let session = self.session.clone()?;
        Some(Effect::Fetch {
            key,
            session,
            params: self.filters.query_params(),
        })
    }

    pub fn receive(&mut self, message: Message) -> Option<Effect> {
        match message {
            Message::Fetched { key, outcome } => {
                if self.slot.complete(&key, &outcome) {
                    self.clamp_cursor();
                }
                None
            }
            Message::KeyChecked { raw_key, check } => {
                self.gate.checking = false;
                if !check.success {
                    let error = check.error.unwrap_or_else(|| FAILED_KEY_MESSAGE.into());
                    self.gate.error = Some(error);
                    return None;
                }
                let (Some(base_url), Some(credential)) =
                    (self.base_url.as_deref(), Credential::new(&raw_key))
                else {
                    self.gate.error = Some(FAILED_KEY_MESSAGE.into());
                    return None;
                };
                self.session = Some(Session::with_http(base_url, credential, &self.http));
                self.gate = GateState {
                    input: TextInput::default().masked(),
                    ..GateState::default()
                };
                self.screen = Screen::Table;
                self.sync_fetch()
            }
        }
    }

    /// Validate the gate input and ask for a connection check.
    pub fn submit_key(&mut self) -> Option<Effect> {
        if self.gate.checking {
            return None;
        }
        let raw_key = self.gate.input.value.trim().to_string();
        if raw_key.is_empty() {
            self.gate.error = Some(EMPTY_KEY_MESSAGE.into());
            return None;
        }
        let Some(base_url) = self.base_url.clone() else {
            self.gate.error = Some(MISSING_BASE_URL_MESSAGE.into());
            return None;
        };
        self.gate.error = None;
        self.gate.checking = true;
        Some(Effect::CheckKey { base_url, raw_key })
    }

    /// Forget the credential. Cached pages for it become unreachable.
    pub fn disconnect(&mut self) {
        self.session = None;
        self.query.cache().clear();
        self.slot.reset();
        self.expanded.collapse_all();
        self.cursor = 0;
        self.screen = Screen::Gate;
    }

    pub fn open_filters(&mut self) {
        self.form = FilterForm::from_draft(&self.filters.draft);
        self.screen = Screen::Filters;
    }

    /// Copy text fields of the form into the draft. Never fetches.
    pub fn update_draft(&mut self) {
        let edit = match self.form.focus {
            FilterField::TaskName => FilterEdit::TaskName(self.form.task_name.text()),
            FilterField::UserId => FilterEdit::UserId(self.form.user_id.text()),
            FilterField::Status => FilterEdit::RuleStatus(self.form.selected_status()),
            FilterField::From | FilterField::To => return,
        };
        self.filters.edit_draft(edit);
    }

    /// Commit the draft and go back to the table.
    pub fn apply_filters(&mut self) -> Option<Effect> {
        let parse = |input: &TextInput| {
            input
                .text()
                .map(|raw| parse_date_bound(&raw))
                .transpose()
        };
        let (from, to) = match (parse(&self.form.from), parse(&self.form.to)) {
            (Ok(from), Ok(to)) => (from, to),
            (Err(error), _) | (_, Err(error)) => {
                self.form.error = Some(error);
                return None;
            }
        };
        let form = &self.form;
        self.filters
            .edit_draft(FilterEdit::TaskName(form.task_name.text()));
        self.filters.edit_draft(FilterEdit::UserId(form.user_id.text()));
        self.filters
            .edit_draft(FilterEdit::RuleStatus(form.selected_status()));
        self.filters.edit_draft(FilterEdit::DateRange { from, to });
        self.filters.apply();
        self.form.error = None;
        self.screen = Screen::Table;
        self.reset_rows();
        self.sync_fetch()
    }

    pub fn clear_filters(&mut self) -> Option<Effect> {
        self.filters.clear();
        self.form = FilterForm::from_draft(&self.filters.draft);
        self.screen = Screen::Table;
        self.reset_rows();
        self.sync_fetch()
    }

    pub fn pagination(&self) -> Option<Pagination> {
        let page = self.slot.state().data()?;
        Some(Pagination::new(
            self.filters.applied.page(),
            self.filters.applied.page_size().get(),
            page.count,
        ))
    }

    pub fn next_page(&mut self) -> Option<Effect> {
        if !self.pagination()?.has_next() {
            return None;
        }
        self.filters.set_page(self.filters.applied.page() + 1);
        self.reset_rows();
        self.sync_fetch()
    }

    pub fn prev_page(&mut self) -> Option<Effect> {
        let page = self.filters.applied.page();
        if page == 0 {
            return None;
        }
        self.filters.set_page(page - 1);
        self.reset_rows();
        self.sync_fetch()
    }

    pub fn cycle_page_size(&mut self, larger: bool) -> Option<Effect> {
        let current = self.filters.applied.page_size();
        let next = if larger { current.next() } else { current.prev() };
        self.filters.set_page_size(next);
        self.reset_rows();
        self.sync_fetch()
    }

    pub fn move_cursor(&mut self, down: bool) {
        let rows = self.row_count();
        if rows == 0 {
            self.cursor = 0;
        } else if down {
            self.cursor = (self.cursor + 1).min(rows - 1);
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    pub fn toggle_selected(&mut self) {
        let Some(page) = self.slot.state().data() else {
            return;
        };
        if let Some(inference) = page.inferences.get(self.cursor) {
            let id = inference.id.clone();
            self.expanded.toggle(&id);
        }
    }

    pub fn table_page(&self) -> Option<TablePage> {
        let page = self.slot.state().data()?;
        Some(TablePage::build(
            &page.inferences,
            page.count,
            self.filters.applied.page(),
            self.filters.applied.page_size().get(),
            &self.expanded,
        ))
    }

    fn row_count(&self) -> usize {
        self.slot
            .state()
            .data()
            .map_or(0, |page| page.inferences.len())
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.row_count().saturating_sub(1));
    }

    fn reset_rows(&mut self) {
        self.cursor = 0;
        self.expanded.collapse_all();
    }
}
