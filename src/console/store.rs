//! In-memory record store backing the client list.

use crate::console::list::{ListParams, Sort, SortDirection, SortKey, VisiblePage, visible_page};
use crate::console::selection::Selection;
use crate::domain::client::Client;
use crate::domain::types::ClientId;

/// Where the list lands after the working set is replaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PagePlacement {
    #[default]
    First,
    /// Stay on the current page, clamped to the new page count.
    Keep,
    Last,
}

/// Owns the working set, the list parameters and the selection.
///
/// The visible page is recomputed after every change and the selection is
/// pruned to it, so selected ids are always a subset of the filtered set.
#[derive(Debug)]
pub struct RecordStore {
    clients: Vec<Client>,
    params: ListParams,
    page: VisiblePage,
    selection: Selection,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(ListParams::default().page_size)
    }
}

impl RecordStore {
    pub fn new(page_size: usize) -> Self {
        let mut store = Self {
            clients: Vec::new(),
            params: ListParams::with_page_size(page_size.max(1)),
            page: VisiblePage::default(),
            selection: Selection::new(),
        };
        store.recompute();
        store
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn total(&self) -> usize {
        self.clients.len()
    }

    pub fn find(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    pub fn page(&self) -> &VisiblePage {
        &self.page
    }

    pub fn params(&self) -> &ListParams {
        &self.params
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replaces the working set wholesale.
    pub fn replace_all(&mut self, clients: Vec<Client>, placement: PagePlacement) {
        self.clients = clients;
        self.params.page_index = match placement {
            PagePlacement::First => 0,
            PagePlacement::Keep => self.params.page_index,
            PagePlacement::Last => usize::MAX,
        };
        self.recompute();
    }

    /// Applies a new filter query and returns to the first page.
    pub fn set_filter(&mut self, filter: &str) {
        self.params.filter = filter.trim().to_string();
        self.params.page_index = 0;
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: Option<Sort>) {
        self.params.sort = sort;
        self.recompute();
    }

    /// Cycles a column through ascending, descending and unsorted.
    pub fn cycle_sort(&mut self, key: SortKey) {
        let next = match self.params.sort {
            Some(Sort {
                key: current,
                direction: SortDirection::Ascending,
            }) if current == key => Some(Sort::descending(key)),
            Some(Sort {
                key: current,
                direction: SortDirection::Descending,
            }) if current == key => None,
            _ => Some(Sort::ascending(key)),
        };
        self.set_sort(next);
    }

    pub fn set_page(&mut self, page_index: usize) {
        self.params.page_index = page_index;
        self.recompute();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.params.page_index.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.params.page_index.saturating_sub(1));
    }

    /// Changes the page size keeping the first visible record on screen.
    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        let first_row = self.params.page_index * self.params.page_size;
        self.params.page_size = page_size;
        self.params.page_index = first_row / page_size;
        self.recompute();
    }

    /// Selects a record on the visible page; ids elsewhere are ignored.
    pub fn select(&mut self, id: ClientId) -> bool {
        if self.page.contains(id) {
            self.selection.select(id);
            true
        } else {
            false
        }
    }

    pub fn deselect(&mut self, id: ClientId) {
        self.selection.deselect(id);
    }

    pub fn toggle(&mut self, id: ClientId) {
        if self.selection.is_selected(id) {
            self.selection.deselect(id);
        } else {
            self.select(id);
        }
    }

    pub fn toggle_all(&mut self) {
        self.selection.toggle_all(&self.page);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn recompute(&mut self) {
        self.page = visible_page(&self.clients, &self.params);
        self.params.page_index = self.page.page_index;
        self.selection.retain_only(self.page.ids());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clients(count: i32) -> Vec<Client> {
        (1..=count)
            .map(|id| {
                let country = if id % 2 == 0 { "Spain" } else { "Chile" };
                Client::try_new(
                    id,
                    format!("Client {id}"),
                    format!("C{id}"),
                    format!("c{id}@example.com"),
                    "",
                    id % 3 != 0,
                    "",
                    country,
                )
                .unwrap()
            })
            .collect()
    }

    fn id(value: i32) -> ClientId {
        ClientId::new(value).unwrap()
    }

    #[test]
    fn placement_controls_landing_page() {
        let mut store = RecordStore::new(10);
        store.replace_all(clients(25), PagePlacement::Last);
        assert_eq!(store.page().page_index, 2);

        store.set_page(1);
        store.replace_all(clients(30), PagePlacement::Keep);
        assert_eq!(store.page().page_index, 1);

        store.replace_all(clients(5), PagePlacement::Keep);
        assert_eq!(store.page().page_index, 0);

        store.replace_all(clients(30), PagePlacement::First);
        assert_eq!(store.page().page_index, 0);
    }

    #[test]
    fn filter_resets_page_and_prunes_selection() {
        let mut store = RecordStore::new(10);
        store.replace_all(clients(20), PagePlacement::First);
        store.set_page(1);
        assert!(store.select(id(12)));
        assert!(store.select(id(13)));

        store.set_filter("spain");
        assert_eq!(store.page().page_index, 0);
        assert_eq!(store.selection().ids(), vec![id(12)]);
        for selected in store.selection().ids() {
            assert!(store.page().contains(selected));
        }
    }

    #[test]
    fn paging_away_drops_selection() {
        let mut store = RecordStore::new(10);
        store.replace_all(clients(20), PagePlacement::First);
        store.toggle_all();
        assert_eq!(store.selection().len(), 10);

        store.next_page();
        assert!(store.selection().is_empty());
    }

    #[test]
    fn select_ignores_records_outside_page() {
        let mut store = RecordStore::new(10);
        store.replace_all(clients(20), PagePlacement::First);
        assert!(!store.select(id(15)));
        store.toggle(id(15));
        assert!(store.selection().is_empty());
    }

    #[test]
    fn page_size_change_keeps_index_in_range() {
        let mut store = RecordStore::new(5);
        store.replace_all(clients(23), PagePlacement::Last);
        assert_eq!(store.page().page_index, 4);

        store.set_page_size(10);
        assert_eq!(store.page().page_index, 2);
        store.set_page_size(50);
        assert_eq!(store.page().page_index, 0);
    }

    #[test]
    fn cycle_sort_walks_through_directions() {
        let mut store = RecordStore::new(10);
        store.replace_all(clients(3), PagePlacement::First);

        store.cycle_sort(SortKey::Id);
        assert_eq!(store.params().sort, Some(Sort::ascending(SortKey::Id)));
        store.cycle_sort(SortKey::Id);
        assert_eq!(store.page().items[0].id, id(3));
        store.cycle_sort(SortKey::Id);
        assert_eq!(store.params().sort, None);
    }
}
