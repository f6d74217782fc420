// File: src/screen.rs
use crate::client::EventService;
use crate::controller::{
    FetchOutcome, FetchTicket, ListController, LookupTicket, StatusEditController, StatusUpdate,
    UpdateOutcome, UserLookupController,
};
use crate::error::ServiceError;
use crate::layout::{LayoutHandle, LayoutSubscription};
use crate::model::{DeliveryStatus, EventPage, EventSummary, SortKey, UserProfile};
use crate::notify::Notifications;

/// Work for the network task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FetchEvents(FetchTicket),
    UpdateStatus(StatusUpdate),
    LookupUser(LookupTicket),
    Quit,
}

/// Results coming back from the network task.
#[derive(Debug)]
pub enum AppEvent {
    EventsFetched(FetchTicket, Result<EventPage, ServiceError>),
    StatusChanged(StatusUpdate, Result<(), ServiceError>),
    UserFetched(LookupTicket, Result<UserProfile, ServiceError>),
}

pub async fn perform<S>(service: &S, action: Action) -> Option<AppEvent>
where
    S: EventService + ?Sized,
{
    match action {
        Action::FetchEvents(ticket) => {
            let result = service.get_events(&ticket.query).await;
            Some(AppEvent::EventsFetched(ticket, result))
        }
        Action::UpdateStatus(update) => {
            let result = service
                .change_delivery_status(&update.event_id, &update.status)
                .await;
            Some(AppEvent::StatusChanged(update, result))
        }
        Action::LookupUser(ticket) => {
            let result = service.get_user_by_email(&ticket.email).await;
            Some(AppEvent::UserFetched(ticket, result))
        }
        Action::Quit => None,
    }
}

/// Answers an action with `error` when no service could be built.
pub fn fail(action: Action, error: ServiceError) -> Option<AppEvent> {
    match action {
        Action::FetchEvents(ticket) => Some(AppEvent::EventsFetched(ticket, Err(error))),
        Action::UpdateStatus(update) => Some(AppEvent::StatusChanged(update, Err(error))),
        Action::LookupUser(ticket) => Some(AppEvent::UserFetched(ticket, Err(error))),
        Action::Quit => None,
    }
}

/// The events admin screen: list, per-row status edits, the user popup and
/// toasts. All mutation happens here, on the UI task.
pub struct EventsScreen {
    pub list: ListController,
    pub edits: StatusEditController,
    pub lookup: UserLookupController,
    pub notices: Notifications,
    layout: LayoutSubscription,
}

impl EventsScreen {
    pub fn new(sort: SortKey, layout: &LayoutHandle) -> Self {
        Self {
            list: ListController::new(sort),
            edits: StatusEditController::new(),
            lookup: UserLookupController::new(),
            notices: Notifications::new(),
            layout: layout.subscribe(),
        }
    }

    pub fn layout(&self) -> &LayoutSubscription {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutSubscription {
        &mut self.layout
    }

    pub fn start(&mut self) -> Action {
        Action::FetchEvents(self.list.begin_fetch())
    }

    pub fn search(&mut self, term: impl Into<String>) -> Action {
        Action::FetchEvents(self.list.set_search(term))
    }

    pub fn sort_by(&mut self, sort: SortKey) -> Action {
        Action::FetchEvents(self.list.set_sort(sort))
    }

    pub fn cycle_sort(&mut self) -> Action {
        let next = self.list.sort().cycle_next();
        self.sort_by(next)
    }

    pub fn go_to_page(&mut self, page: u32) -> Option<Action> {
        self.list.set_page(page).map(Action::FetchEvents)
    }

    pub fn next_page(&mut self) -> Option<Action> {
        self.list.next_page().map(Action::FetchEvents)
    }

    pub fn previous_page(&mut self) -> Option<Action> {
        self.list.previous_page().map(Action::FetchEvents)
    }

    pub fn retry(&mut self) -> Action {
        Action::FetchEvents(self.list.refresh())
    }

    pub fn event(&self, event_id: &str) -> Option<&EventSummary> {
        self.list.find(event_id)
    }

    pub fn stage_status(&mut self, event_id: &str, status: DeliveryStatus) {
        if let Some(committed) = self.list.find(event_id).map(|e| e.delivery_status.clone()) {
            self.edits.select_status(event_id, status, &committed);
        }
    }

    /// Move the row's staged value one step through the selectable statuses.
    pub fn cycle_status(&mut self, event_id: &str, forward: bool) {
        let Some(committed) = self.list.find(event_id).map(|e| e.delivery_status.clone()) else {
            return;
        };
        let next = self.edits.staged(event_id, &committed).cycle(forward);
        self.edits.select_status(event_id, next, &committed);
    }

    pub fn confirm(&mut self, event_id: &str) -> Option<Action> {
        self.edits.begin_update(event_id).map(Action::UpdateStatus)
    }

    pub fn view_user(&mut self, event_id: &str) -> Option<Action> {
        let email = self.list.find(event_id)?.event_author.clone();
        Some(Action::LookupUser(self.lookup.open(&email)))
    }

    pub fn close_user(&mut self) {
        self.lookup.close();
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::EventsFetched(ticket, result) => {
                if self.list.apply_fetch(&ticket, result) == FetchOutcome::Loaded {
                    self.edits.clear();
                }
            }
            AppEvent::StatusChanged(update, result) => {
                match self.edits.finish_update(&update, result, &mut self.list) {
                    UpdateOutcome::Updated { notice } => self.notices.success(notice),
                    UpdateOutcome::Failed { message } => self.notices.error(message),
                }
            }
            AppEvent::UserFetched(ticket, result) => self.lookup.apply(&ticket, result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::UserInfoDialog;
    use crate::controller::fixtures::make_event;
    use crate::layout::LayoutState;
    use crate::model::{EventQuery, PaginationInfo};
    use crate::notify::ToastKind;
    use futures::future::BoxFuture;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeService {
        events: Mutex<Vec<EventSummary>>,
        reject_updates: bool,
        seen_queries: Mutex<Vec<EventQuery>>,
    }

    impl EventService for FakeService {
        fn get_events<'a>(
            &'a self,
            query: &'a EventQuery,
        ) -> BoxFuture<'a, Result<EventPage, ServiceError>> {
            Box::pin(async move {
                self.seen_queries.lock().unwrap().push(query.clone());
                let all = self.events.lock().unwrap().clone();
                let total_pages = (all.len() as u32).div_ceil(query.page_size).max(1);
                let start = ((query.page - 1) * query.page_size) as usize;
                let events = all
                    .iter()
                    .skip(start)
                    .take(query.page_size as usize)
                    .cloned()
                    .collect();
                Ok(EventPage {
                    events,
                    pagination: PaginationInfo {
                        current_page: query.page,
                        total_pages,
                        total_count: all.len() as u64,
                        has_previous: query.page > 1,
                        has_next: query.page < total_pages,
                    },
                })
            })
        }

        fn change_delivery_status<'a>(
            &'a self,
            event_id: &'a str,
            status: &'a DeliveryStatus,
        ) -> BoxFuture<'a, Result<(), ServiceError>> {
            Box::pin(async move {
                if self.reject_updates {
                    return Err(ServiceError::Api {
                        status: 409,
                        detail: Some("Event already closed".into()),
                    });
                }
                let mut events = self.events.lock().unwrap();
                if let Some(ev) = events.iter_mut().find(|e| e.event_id == event_id) {
                    ev.delivery_status = status.clone();
                }
                Ok(())
            })
        }

        fn get_user_by_email<'a>(
            &'a self,
            email: &'a str,
        ) -> BoxFuture<'a, Result<UserProfile, ServiceError>> {
            Box::pin(async move {
                Ok(UserProfile {
                    email: email.to_string(),
                    first_name: "Sam".into(),
                    last_name: "Rivera".into(),
                    phone_number: None,
                    user_type: None,
                })
            })
        }
    }

    fn service_with(n: usize) -> FakeService {
        FakeService {
            events: Mutex::new(
                (0..n)
                    .map(|i| make_event(&format!("ev{}", i), DeliveryStatus::Pending))
                    .collect(),
            ),
            ..FakeService::default()
        }
    }

    async fn run(screen: &mut EventsScreen, service: &FakeService, action: Option<Action>) {
        if let Some(action) = action
            && let Some(event) = perform(service, action).await
        {
            screen.apply(event);
        }
    }

    fn new_screen() -> EventsScreen {
        EventsScreen::new(SortKey::default(), &LayoutHandle::new(LayoutState::default()))
    }

    #[tokio::test]
    async fn test_twelve_events_two_pages() {
        let service = service_with(12);
        let mut screen = new_screen();
        let start = screen.start();
        run(&mut screen, &service, Some(start)).await;

        let first_query = service.seen_queries.lock().unwrap()[0].clone();
        assert_eq!(first_query, EventQuery::default());
        assert_eq!(screen.list.events().len(), 10);
        assert_eq!(screen.list.page_window(), 1..=2);
        let p = *screen.list.pagination().unwrap();
        assert!(p.has_next && !p.has_previous);

        let next = screen.next_page();
        run(&mut screen, &service, next).await;
        assert_eq!(screen.list.events().len(), 2);
        assert!(screen.next_page().is_none());
    }

    #[tokio::test]
    async fn test_search_from_page_three_returns_to_page_one() {
        let service = service_with(45);
        let mut screen = new_screen();
        let start = screen.start();
        run(&mut screen, &service, Some(start)).await;
        let jump = screen.go_to_page(3);
        run(&mut screen, &service, jump).await;
        assert_eq!(screen.list.pagination().unwrap().current_page, 3);

        let search = screen.search("gala");
        run(&mut screen, &service, Some(search)).await;
        assert_eq!(screen.list.page(), 1);
        let last = service.seen_queries.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.page, 1);
        assert_eq!(last.search, "gala");
    }

    #[tokio::test]
    async fn test_confirm_delivered_updates_badge() {
        let service = service_with(3);
        let mut screen = new_screen();
        let start = screen.start();
        run(&mut screen, &service, Some(start)).await;

        screen.stage_status("ev1", DeliveryStatus::Delivered);
        assert!(screen.edits.show_confirm("ev1"));

        let confirm = screen.confirm("ev1");
        assert!(screen.edits.is_updating());
        run(&mut screen, &service, confirm).await;

        assert!(!screen.edits.show_confirm("ev1"));
        assert_eq!(screen.event("ev1").unwrap().delivery_status.label(), "Delivered");
        assert_eq!(screen.event("ev0").unwrap().delivery_status, DeliveryStatus::Pending);
        let toast = screen.notices.latest().unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
    }

    #[tokio::test]
    async fn test_rejected_update_surfaces_error_toast() {
        let service = FakeService {
            reject_updates: true,
            ..service_with(1)
        };
        let mut screen = new_screen();
        let start = screen.start();
        run(&mut screen, &service, Some(start)).await;

        screen.cycle_status("ev0", true);
        assert_eq!(
            screen.edits.staged("ev0", &DeliveryStatus::Pending),
            &DeliveryStatus::Processing
        );
        let confirm = screen.confirm("ev0");
        run(&mut screen, &service, confirm).await;

        assert!(!screen.edits.is_updating());
        assert!(screen.edits.show_confirm("ev0"));
        assert_eq!(screen.event("ev0").unwrap().delivery_status, DeliveryStatus::Pending);
        let toast = screen.notices.latest().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.text, "Event already closed");
    }

    #[tokio::test]
    async fn test_refresh_clears_staged_edits() {
        let service = service_with(2);
        let mut screen = new_screen();
        let start = screen.start();
        run(&mut screen, &service, Some(start)).await;
        screen.stage_status("ev0", DeliveryStatus::OnHold);

        let retry = screen.retry();
        run(&mut screen, &service, Some(retry)).await;
        assert_eq!(screen.edits.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_refresh_during_update_keeps_retry_available() {
        let service = FakeService {
            reject_updates: true,
            ..service_with(2)
        };
        let mut screen = new_screen();
        let start = screen.start();
        run(&mut screen, &service, Some(start)).await;

        screen.stage_status("ev0", DeliveryStatus::Delivered);
        screen.stage_status("ev1", DeliveryStatus::OnHold);
        let Some(Action::UpdateStatus(update)) = screen.confirm("ev0") else {
            panic!("confirm should submit the staged value");
        };

        // The list reloads before the update settles.
        let retry = screen.retry();
        run(&mut screen, &service, Some(retry)).await;
        assert!(screen.edits.is_updating());
        assert!(!screen.edits.show_confirm("ev1"));

        let result = service
            .change_delivery_status(&update.event_id, &update.status)
            .await;
        screen.apply(AppEvent::StatusChanged(update, result));

        assert!(!screen.edits.is_updating());
        assert!(screen.edits.show_confirm("ev0"));
        assert_eq!(
            screen.edits.staged("ev0", &DeliveryStatus::Pending),
            &DeliveryStatus::Delivered
        );
        assert_eq!(screen.notices.latest().unwrap().kind, ToastKind::Error);
        assert!(screen.confirm("ev0").is_some());
    }

    #[tokio::test]
    async fn test_view_user_uses_event_author() {
        let service = service_with(1);
        let mut screen = new_screen();
        let start = screen.start();
        run(&mut screen, &service, Some(start)).await;

        let lookup = screen.view_user("ev0");
        run(&mut screen, &service, lookup).await;
        match screen.lookup.dialog() {
            UserInfoDialog::Loaded(p) => assert_eq!(p.email, "ev0@example.com"),
            other => panic!("unexpected dialog {:?}", other),
        }
        screen.close_user();
        assert_eq!(screen.lookup.dialog(), &UserInfoDialog::Closed);
        assert!(screen.view_user("missing").is_none());
    }

    #[test]
    fn test_unavailable_service_shows_list_error() {
        let mut screen = new_screen();
        let start = screen.start();
        let event = fail(start, ServiceError::Tls("no native roots".into())).unwrap();
        screen.apply(event);

        assert!(!screen.list.is_loading());
        assert_eq!(screen.list.error(), Some(crate::error::FETCH_EVENTS_FALLBACK));
        assert!(fail(Action::Quit, ServiceError::Offline).is_none());
    }

    #[tokio::test]
    async fn test_quit_produces_no_event() {
        let service = service_with(0);
        assert!(perform(&service, Action::Quit).await.is_none());
    }
}
