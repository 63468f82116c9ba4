//! Filtering, sorting and paging of the working set.
//!
//! Everything here is a pure function of its inputs; the record store calls
//! [`visible_page`] after every change and keeps nothing else derived.

use std::cmp::Ordering;

use crate::domain::client::Client;
use crate::domain::types::ClientId;
use crate::pagination::{PageWindow, page_links};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Column a list can be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortKey {
    Id,
    FullName,
    DisplayName,
    Email,
    Active,
    Location,
    Country,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Sort {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }
}

/// Inputs of [`visible_page`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListParams {
    pub filter: String,
    pub sort: Option<Sort>,
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            filter: String::new(),
            sort: None,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListParams {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }
}

/// One page of the filtered and sorted working set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisiblePage {
    pub items: Vec<Client>,
    pub page_index: usize,
    pub page_count: usize,
    pub filtered_count: usize,
    pub page_size: usize,
}

impl VisiblePage {
    pub fn ids(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.items.iter().map(|client| client.id)
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.items.iter().any(|client| client.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Page navigation around the current page; `None` marks a gap.
    pub fn page_links(&self) -> Vec<Option<usize>> {
        page_links(self.page_count, self.page_index, PageWindow::default())
    }
}

/// Lower-cased text a filter query is matched against.
pub fn search_text(client: &Client) -> String {
    format!(
        "{} {} {} {} {} {} {}",
        client.id,
        client.full_name,
        client.display_name,
        client.email,
        client.details,
        client.country,
        client.status_label()
    )
    .to_lowercase()
}

/// Records whose search text contains the trimmed, case-folded query.
pub fn filter_clients<'a>(clients: &'a [Client], filter: &str) -> Vec<&'a Client> {
    let query = filter.trim().to_lowercase();
    if query.is_empty() {
        return clients.iter().collect();
    }
    clients
        .iter()
        .filter(|client| search_text(client).contains(&query))
        .collect()
}

fn text(value: &str) -> String {
    value.to_lowercase()
}

fn compare(a: &Client, b: &Client, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::FullName => text(&a.full_name).cmp(&text(&b.full_name)),
        SortKey::DisplayName => text(&a.display_name).cmp(&text(&b.display_name)),
        SortKey::Email => a.email.as_str().cmp(b.email.as_str()),
        SortKey::Active => u8::from(a.active).cmp(&u8::from(b.active)),
        SortKey::Location => text(&a.location).cmp(&text(&b.location)),
        SortKey::Country => text(&a.country).cmp(&text(&b.country)),
    }
}

/// Stable sort; equal records keep their relative order in both directions.
pub fn sort_clients(clients: &mut [&Client], sort: Sort) {
    clients.sort_by(|a, b| {
        let ordering = compare(a, b, sort.key);
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Number of pages needed for `filtered_count` records.
pub fn page_count(filtered_count: usize, page_size: usize) -> usize {
    filtered_count.div_ceil(page_size.max(1))
}

/// Largest valid page index, `0` when there is nothing to show.
pub fn max_page_index(filtered_count: usize, page_size: usize) -> usize {
    page_count(filtered_count, page_size).saturating_sub(1)
}

pub fn clamp_page_index(page_index: usize, filtered_count: usize, page_size: usize) -> usize {
    page_index.min(max_page_index(filtered_count, page_size))
}

/// Derives the page to display from the working set and list parameters.
pub fn visible_page(clients: &[Client], params: &ListParams) -> VisiblePage {
    let page_size = params.page_size.max(1);
    let mut filtered = filter_clients(clients, &params.filter);
    if let Some(sort) = params.sort {
        sort_clients(&mut filtered, sort);
    }

    let filtered_count = filtered.len();
    let page_index = clamp_page_index(params.page_index, filtered_count, page_size);
    let items = filtered
        .into_iter()
        .skip(page_index * page_size)
        .take(page_size)
        .cloned()
        .collect();

    VisiblePage {
        items,
        page_index,
        page_count: page_count(filtered_count, page_size),
        filtered_count,
        page_size,
    }
}
