// File: src/controller/list.rs
use crate::error::{FETCH_EVENTS_FALLBACK, ServiceError};
use crate::model::{
    DeliveryStatus, EventPage, EventQuery, EventSummary, PAGE_SIZE, PaginationInfo, SortKey,
};
use std::ops::RangeInclusive;

// Maximum number of numbered page buttons in the pagination bar.
pub const PAGE_WINDOW: u32 = 5;

/// A GetEvents call that has been issued and whose response is still owed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: EventQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded,
    Failed,
    /// A newer fetch was issued after this one; the response was dropped.
    Stale,
}

#[derive(Debug, Clone)]
pub struct ListController {
    page: u32,
    search: String,
    sort: SortKey,
    events: Vec<EventSummary>,
    pagination: Option<PaginationInfo>,
    error: Option<String>,
    loading: bool,
    issued_seq: u64,
}

impl Default for ListController {
    fn default() -> Self {
        Self::new(SortKey::default())
    }
}

impl ListController {
    pub fn new(sort: SortKey) -> Self {
        Self {
            page: 1,
            search: String::new(),
            sort,
            events: Vec::new(),
            pagination: None,
            error: None,
            loading: false,
            issued_seq: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }
    pub fn search(&self) -> &str {
        &self.search
    }
    pub fn sort(&self) -> SortKey {
        self.sort
    }
    pub fn page_size(&self) -> u32 {
        PAGE_SIZE
    }
    pub fn events(&self) -> &[EventSummary] {
        &self.events
    }
    pub fn pagination(&self) -> Option<&PaginationInfo> {
        self.pagination.as_ref()
    }
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn query(&self) -> EventQuery {
        EventQuery {
            page: self.page,
            page_size: PAGE_SIZE,
            search: self.search.clone(),
            sort: self.sort,
        }
    }

    /// Every change emits a fetch; there is no debounce on typing.
    pub fn set_search(&mut self, term: impl Into<String>) -> FetchTicket {
        self.search = term.into();
        self.page = 1;
        self.begin_fetch()
    }

    pub fn set_sort(&mut self, sort: SortKey) -> FetchTicket {
        self.sort = sort;
        self.page = 1;
        self.begin_fetch()
    }

    /// Out-of-range pages are ignored; the UI disables those controls anyway.
    pub fn set_page(&mut self, page: u32) -> Option<FetchTicket> {
        let total = self.pagination.map(|p| p.total_pages).unwrap_or(0);
        if page < 1 || page > total {
            return None;
        }
        self.page = page;
        Some(self.begin_fetch())
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        let info = self.pagination?;
        if !info.has_next {
            return None;
        }
        self.set_page(info.current_page + 1)
    }

    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        let info = self.pagination?;
        if !info.has_previous {
            return None;
        }
        self.set_page(info.current_page.saturating_sub(1))
    }

    /// Same filters again, used by the retry button and manual refresh.
    pub fn refresh(&mut self) -> FetchTicket {
        self.begin_fetch()
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued_seq += 1;
        self.loading = true;
        FetchTicket {
            seq: self.issued_seq,
            query: self.query(),
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.seq == self.issued_seq
    }

    pub fn apply_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<EventPage, ServiceError>,
    ) -> FetchOutcome {
        if !self.is_current(ticket) {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.issued_seq,
                "dropping stale event page"
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.events = page.events;
                self.pagination = Some(page.pagination);
                self.error = None;
                FetchOutcome::Loaded
            }
            Err(e) => {
                tracing::warn!("event fetch failed: {}", e);
                self.error = Some(e.user_message(FETCH_EVENTS_FALLBACK));
                FetchOutcome::Failed
            }
        }
    }

    pub fn find(&self, event_id: &str) -> Option<&EventSummary> {
        self.events.iter().find(|e| e.event_id == event_id)
    }

    /// Patch the committed status of a single row after a confirmed update.
    pub fn patch_status(&mut self, event_id: &str, status: &DeliveryStatus) -> bool {
        match self.events.iter_mut().find(|e| e.event_id == event_id) {
            Some(ev) => {
                ev.delivery_status = status.clone();
                true
            }
            None => false,
        }
    }

    pub fn page_window(&self) -> RangeInclusive<u32> {
        match self.pagination {
            Some(p) => page_window(p.current_page, p.total_pages),
            None => empty_window(),
        }
    }
}

#[allow(clippy::reversed_empty_ranges)]
fn empty_window() -> RangeInclusive<u32> {
    1..=0
}

/// Which numbered page buttons to show, at most [`PAGE_WINDOW`] of them.
pub fn page_window(current_page: u32, total_pages: u32) -> RangeInclusive<u32> {
    if total_pages == 0 {
        return empty_window();
    }
    if total_pages <= PAGE_WINDOW {
        1..=total_pages
    } else if current_page <= 3 {
        1..=PAGE_WINDOW
    } else if current_page >= total_pages - 2 {
        (total_pages - 4)..=total_pages
    } else {
        (current_page - 2)..=(current_page + 2)
    }
}
