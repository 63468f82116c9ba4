use std::collections::BTreeSet;

use crate::console::list::VisiblePage;
use crate::domain::types::ClientId;

/// Identifiers marked for bulk deletion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<ClientId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: ClientId) {
        self.ids.insert(id);
    }

    pub fn deselect(&mut self, id: ClientId) {
        self.ids.remove(&id);
    }

    pub fn is_selected(&self, id: ClientId) -> bool {
        self.ids.contains(&id)
    }

    /// True when the page has records and all of them are selected.
    pub fn is_page_fully_selected(&self, page: &VisiblePage) -> bool {
        !page.is_empty() && page.ids().all(|id| self.is_selected(id))
    }

    pub fn page_has_selection(&self, page: &VisiblePage) -> bool {
        page.ids().any(|id| self.is_selected(id))
    }

    /// Deselects the whole page if it is fully selected, otherwise selects it.
    pub fn toggle_all(&mut self, page: &VisiblePage) {
        if self.is_page_fully_selected(page) {
            for id in page.ids() {
                self.ids.remove(&id);
            }
        } else {
            self.ids.extend(page.ids());
        }
    }

    /// Drops every identifier not contained in `keep`.
    pub fn retain_only<I>(&mut self, keep: I)
    where
        I: IntoIterator<Item = ClientId>,
    {
        let keep = keep.into_iter().collect::<BTreeSet<_>>();
        self.ids.retain(|id| keep.contains(id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected identifiers in ascending order.
    pub fn ids(&self) -> Vec<ClientId> {
        self.ids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::list::{ListParams, visible_page};
    use crate::domain::client::Client;

    fn id(value: i32) -> ClientId {
        ClientId::new(value).unwrap()
    }

    fn page_of(ids: &[i32]) -> VisiblePage {
        let clients = ids
            .iter()
            .map(|&id| {
                Client::try_new(id, "Name", "Name", format!("c{id}@x.com"), "", true, "", "Peru")
                    .unwrap()
            })
            .collect::<Vec<_>>();
        visible_page(&clients, &ListParams::default())
    }

    #[test]
    fn toggle_all_selects_then_deselects_page() {
        let page = page_of(&[1, 2, 3]);
        let mut selection = Selection::new();
        selection.select(id(2));
        selection.select(id(40));

        selection.toggle_all(&page);
        assert!(selection.is_page_fully_selected(&page));
        assert_eq!(selection.len(), 4);

        selection.toggle_all(&page);
        assert!(!selection.page_has_selection(&page));
        assert_eq!(selection.ids(), vec![id(40)]);
    }

    #[test]
    fn empty_page_is_never_fully_selected() {
        let page = page_of(&[]);
        let mut selection = Selection::new();
        assert!(!selection.is_page_fully_selected(&page));
        selection.toggle_all(&page);
        assert!(selection.is_empty());
    }

    #[test]
    fn deselect_and_retain() {
        let mut selection = Selection::new();
        selection.select(id(5));
        selection.select(id(1));
        selection.deselect(id(5));
        assert_eq!(selection.ids(), vec![id(1)]);

        selection.select(id(7));
        selection.retain_only([id(7), id(9)]);
        assert_eq!(selection.ids(), vec![id(7)]);
    }
}
