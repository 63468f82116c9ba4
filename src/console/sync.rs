//! Keeps the record store in sync with the clients API.
//!
//! Nothing is applied speculatively: every mutation is sent first and the
//! working set is then replaced by a fresh snapshot from the server.

use crate::console::edit::EditOutcome;
use crate::console::http::{ApiError, ClientsApi};
use crate::console::import::ImportOutcome;
use crate::console::push::ChangeNotification;
use crate::console::session::{CLIENT_COUNT_KEY, SessionStore};
use crate::console::store::{PagePlacement, RecordStore};
use crate::console::{Confirm, Notifier};
use crate::domain::client::{NewClient, UpdateClient};
use crate::domain::types::ClientId;

/// Prompt shown before deleting `count` selected clients.
pub fn delete_prompt(count: usize) -> String {
    if count == 1 {
        "Delete the selected client?".to_string()
    } else {
        format!("Delete {count} selected clients?")
    }
}

pub struct ClientListController<A: ClientsApi, S: SessionStore> {
    store: RecordStore,
    api: A,
    session: S,
    notifier: Box<dyn Notifier>,
    confirm: Box<dyn Confirm>,
}

impl<A: ClientsApi, S: SessionStore> ClientListController<A, S> {
    pub fn new(
        api: A,
        session: S,
        notifier: Box<dyn Notifier>,
        confirm: Box<dyn Confirm>,
        page_size: usize,
    ) -> Self {
        Self {
            store: RecordStore::new(page_size),
            api,
            session,
            notifier,
            confirm,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Filter, sort, paging and selection changes go straight to the store.
    pub fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Count persisted by the last successful reload.
    pub fn stored_count(&self) -> Option<usize> {
        self.session
            .get(CLIENT_COUNT_KEY)
            .and_then(|value| value.parse().ok())
    }

    fn fail(&self, action: &str, err: &ApiError) {
        log::error!("Failed to {action}: {err}");
        self.notifier.notify(&err.user_message());
    }

    /// Fetches every client and replaces the working set.
    pub async fn reload(&mut self, placement: PagePlacement) -> Result<(), ApiError> {
        let clients = match self.api.fetch_all().await {
            Ok(clients) => clients,
            Err(err) => {
                self.fail("load clients", &err);
                return Err(err);
            }
        };

        let count = clients.len();
        self.store.replace_all(clients, placement);
        if self.stored_count() != Some(count)
            && let Err(err) = self.session.set(CLIENT_COUNT_KEY, &count.to_string())
        {
            log::warn!("Could not persist client count: {err}");
        }
        Ok(())
    }

    /// Reload after a local mutation. The selection is dropped even when the
    /// re-fetch fails, since the server state it referred to has changed.
    async fn reload_after_change(&mut self, placement: PagePlacement) -> Result<(), ApiError> {
        self.store.clear_selection();
        self.reload(placement).await
    }

    /// Creates a client and shows the last page, where it lands.
    pub async fn create(&mut self, client: &NewClient) -> Result<(), ApiError> {
        if let Err(err) = self.api.create(client).await {
            self.fail("create client", &err);
            return Err(err);
        }
        self.reload_after_change(PagePlacement::Last).await
    }

    pub async fn update(&mut self, id: ClientId, updates: &UpdateClient) -> Result<(), ApiError> {
        if let Err(err) = self.api.update(id, updates).await {
            self.fail("update client", &err);
            return Err(err);
        }
        self.reload_after_change(PagePlacement::Keep).await
    }

    /// Deletes the selected clients after confirmation. Returns `false` when
    /// nothing was selected or the user declined.
    pub async fn delete_selected(&mut self) -> Result<bool, ApiError> {
        let ids = self.store.selection().ids();
        if ids.is_empty() {
            return Ok(false);
        }
        if !self.confirm.confirm(&delete_prompt(ids.len())) {
            return Ok(false);
        }

        if let Err(err) = self.api.delete(&ids).await {
            self.fail("delete clients", &err);
            return Err(err);
        }
        self.reload_after_change(PagePlacement::Keep).await?;
        Ok(true)
    }

    pub async fn apply_edit(&mut self, outcome: &EditOutcome) -> Result<(), ApiError> {
        match outcome {
            EditOutcome::Created(_) => self.reload_after_change(PagePlacement::Last).await,
            EditOutcome::Updated(_) => self.reload_after_change(PagePlacement::Keep).await,
            EditOutcome::Cancelled => Ok(()),
        }
    }

    pub async fn apply_import(&mut self, outcome: &ImportOutcome) -> Result<(), ApiError> {
        match outcome {
            ImportOutcome::Imported(count) => {
                self.notifier.notify(&format!("Imported {count} clients"));
                self.reload_after_change(PagePlacement::Keep).await
            }
            ImportOutcome::Failed(message) => {
                self.notifier.notify(message);
                Ok(())
            }
            ImportOutcome::Skipped => Ok(()),
        }
    }

    /// Best-effort refresh after a change made elsewhere.
    pub async fn handle_notification(&mut self, notification: &ChangeNotification) {
        log::info!("{}", notification.describe());
        // Failures were already reported by reload.
        let _ = self.reload(PagePlacement::Keep).await;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::console::FixedConfirm;
    use crate::console::edit::{EditController, EditRequest};
    use crate::console::push::EventFrame;
    use crate::console::session::MemorySessionStore;
    use crate::console::stub::StubClientsApi;
    use crate::domain::types::DisplayName;

    #[derive(Clone, Default)]
    struct Notes(Rc<RefCell<Vec<String>>>);

    impl Notifier for Notes {
        fn notify(&self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    struct CountingConfirm {
        answer: bool,
        prompts: Rc<RefCell<Vec<String>>>,
    }

    impl Confirm for CountingConfirm {
        fn confirm(&self, prompt: &str) -> bool {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.answer
        }
    }

    fn controller(
        api: StubClientsApi,
        confirm: bool,
    ) -> ClientListController<StubClientsApi, MemorySessionStore> {
        ClientListController::new(
            api,
            MemorySessionStore::new(),
            Box::new(Notes::default()),
            Box::new(FixedConfirm(confirm)),
            10,
        )
    }

    fn id(value: i32) -> ClientId {
        ClientId::new(value).unwrap()
    }

    #[tokio::test]
    async fn reload_persists_client_count() {
        let mut list = controller(StubClientsApi::with_clients(12), true);
        list.reload(PagePlacement::First).await.unwrap();

        assert_eq!(list.store().total(), 12);
        assert_eq!(list.stored_count(), Some(12));
        assert_eq!(list.store().page().page_count, 2);
    }

    #[tokio::test]
    async fn create_lands_on_last_page() {
        let mut list = controller(StubClientsApi::with_clients(10), true);
        list.reload(PagePlacement::First).await.unwrap();

        let client = NewClient::try_new("Jane Doe", "Jane", "jane@example.com", "", true, "", "Netherlands")
            .unwrap();
        list.create(&client).await.unwrap();

        let page = list.store().page();
        assert_eq!(page.page_index, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].email.as_str(), "jane@example.com");
        assert_eq!(list.stored_count(), Some(11));
    }

    #[tokio::test]
    async fn confirmed_delete_removes_selected_and_clears_selection() {
        let mut list = controller(StubClientsApi::with_clients(5), true);
        list.reload(PagePlacement::First).await.unwrap();
        list.store_mut().select(id(2));
        list.store_mut().select(id(4));

        assert!(list.delete_selected().await.unwrap());

        assert!(list.store().find(id(2)).is_none());
        assert!(list.store().find(id(4)).is_none());
        assert_eq!(list.store().total(), 3);
        assert!(list.store().selection().is_empty());
    }

    #[tokio::test]
    async fn delete_clears_selection_even_when_refetch_fails() {
        let mut list = controller(StubClientsApi::with_clients(5).failing_fetch_after_delete(), true);
        list.reload(PagePlacement::First).await.unwrap();
        list.store_mut().select(id(2));
        list.store_mut().select(id(4));

        assert!(list.delete_selected().await.is_err());

        assert_eq!(list.api().clients().len(), 3);
        assert!(list.store().selection().is_empty());
    }

    #[tokio::test]
    async fn update_clears_selection() {
        let mut list = controller(StubClientsApi::with_clients(5), true);
        list.reload(PagePlacement::First).await.unwrap();
        assert!(list.store_mut().select(id(3)));

        let updates = UpdateClient {
            display_name: Some(DisplayName::new("One").unwrap()),
            active: true,
            ..UpdateClient::default()
        };
        list.update(id(1), &updates).await.unwrap();

        assert_eq!(list.store().find(id(1)).unwrap().display_name.as_str(), "One");
        assert!(list.store().selection().is_empty());
    }

    #[tokio::test]
    async fn create_and_import_clear_selection() {
        let mut list = controller(StubClientsApi::with_clients(3), true);
        list.reload(PagePlacement::First).await.unwrap();
        list.store_mut().select(id(1));

        let client = NewClient::try_new("Ann Lee", "Ann", "ann@example.com", "", true, "", "France")
            .unwrap();
        list.create(&client).await.unwrap();
        assert!(list.store().selection().is_empty());

        list.store_mut().select(id(2));
        list.apply_import(&ImportOutcome::Imported(1)).await.unwrap();
        assert!(list.store().selection().is_empty());
    }

    #[tokio::test]
    async fn notifications_keep_selection() {
        let mut list = controller(StubClientsApi::with_clients(3), true);
        list.reload(PagePlacement::First).await.unwrap();
        list.store_mut().select(id(2));

        let frame = EventFrame {
            event: "UPDATED".to_string(),
            data: r#"{"type":"UPDATED","clientId":1,"displayName":"C1"}"#.to_string(),
        };
        list.handle_notification(&ChangeNotification::parse(&frame).unwrap()).await;

        assert_eq!(list.store().selection().ids(), vec![id(2)]);
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let prompts = Rc::new(RefCell::new(Vec::new()));
        let mut list = ClientListController::new(
            StubClientsApi::with_clients(3),
            MemorySessionStore::new(),
            Box::new(Notes::default()),
            Box::new(CountingConfirm {
                answer: false,
                prompts: prompts.clone(),
            }),
            10,
        );
        list.reload(PagePlacement::First).await.unwrap();
        list.store_mut().select(id(1));

        assert!(!list.delete_selected().await.unwrap());
        assert_eq!(prompts.borrow().as_slice(), ["Delete the selected client?"]);
        assert_eq!(list.api().calls(), vec!["fetch_all"]);
        assert_eq!(list.store().selection().ids(), vec![id(1)]);
    }

    #[tokio::test]
    async fn empty_selection_skips_confirmation() {
        let mut list = controller(StubClientsApi::with_clients(3), true);
        list.reload(PagePlacement::First).await.unwrap();
        assert!(!list.delete_selected().await.unwrap());
        assert_eq!(list.api().calls(), vec!["fetch_all"]);
    }

    #[tokio::test]
    async fn failures_leave_working_set_untouched() {
        let notes = Notes::default();
        let mut list = ClientListController::new(
            StubClientsApi::with_clients(0).failing_everything(),
            MemorySessionStore::new(),
            Box::new(notes.clone()),
            Box::new(FixedConfirm(true)),
            10,
        );

        assert!(list.reload(PagePlacement::First).await.is_err());
        assert_eq!(list.store().total(), 0);
        assert_eq!(list.stored_count(), None);
        assert_eq!(notes.0.borrow().as_slice(), ["Internal error"]);
    }

    #[tokio::test]
    async fn update_keeps_current_page() {
        let mut list = controller(StubClientsApi::with_clients(25), true);
        list.reload(PagePlacement::First).await.unwrap();
        list.store_mut().set_page(1);

        let mut editor = EditController::new(EditRequest::Existing(
            list.store().find(id(15)).unwrap().clone(),
        ));
        editor.form.display_name = "Fifteen".to_string();
        let outcome = editor.save(list.api()).await.unwrap();
        list.apply_edit(&outcome).await.unwrap();

        assert_eq!(list.store().page().page_index, 1);
        assert_eq!(
            list.store().find(id(15)).unwrap().display_name.as_str(),
            "Fifteen"
        );
    }

    #[tokio::test]
    async fn notifications_trigger_reload() {
        let mut list = controller(StubClientsApi::with_clients(2), true);
        let frame = EventFrame {
            event: "CREATED".to_string(),
            data: r#"{"type":"CREATED","clientId":2,"displayName":"C2"}"#.to_string(),
        };
        let notification = ChangeNotification::parse(&frame).unwrap();

        list.handle_notification(&notification).await;
        assert_eq!(list.store().total(), 2);
    }

    #[test]
    fn prompt_text_depends_on_count() {
        assert_eq!(delete_prompt(1), "Delete the selected client?");
        assert_eq!(delete_prompt(3), "Delete 3 selected clients?");
    }
}
