//! The in-memory view engine: free-text filter, single-column sort and
//! page windowing over the loaded records. Everything here works on index
//! vectors into the record store, so records are never cloned or reordered
//! in place.

use std::ops::Range;

use crate::columns::{self, ColumnId};
use crate::record::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: ColumnId,
    pub direction: SortDirection,
}

/// Mutable view position: the search query, the active sort and the page
/// window. Invariant: after [`recompute`] the page index is always inside
/// `[0, page_count - 1]`.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub query: String,
    pub sort: Option<SortSpec>,
    pub page_index: usize,
    pub page_size: usize,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        ViewState {
            query: String::new(),
            sort: None,
            page_index: 0,
            // A zero page size would make the window degenerate.
            page_size: page_size.max(1),
        }
    }

    /// Replace the search query. A new filter invalidates the old page
    /// position, so this always jumps back to the first page.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page_index = 0;
    }

    /// Advance the sort cycle for `column`: ascending, then descending,
    /// then unsorted. Selecting a different column clears the previous sort
    /// and starts ascending there. Non-sortable columns are ignored.
    pub fn toggle_sort(&mut self, column: ColumnId) {
        if !columns::column(column).sortable {
            return;
        }
        self.sort = match self.sort {
            Some(spec) if spec.column == column => match spec.direction {
                SortDirection::Ascending => Some(SortSpec {
                    column,
                    direction: SortDirection::Descending,
                }),
                SortDirection::Descending => None,
            },
            _ => Some(SortSpec {
                column,
                direction: SortDirection::Ascending,
            }),
        };
    }

    pub fn set_page_index(&mut self, page_index: usize) {
        self.page_index = page_index;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size > 0 {
            self.page_size = page_size;
        }
    }
}

/// One computed page window over a result set of `total` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub rows: Range<usize>,
    pub page_index: usize,
    pub page_count: usize,
}

impl Page {
    pub fn can_go_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}

/// The rendered portion of the view: record indices for the current page
/// plus the window it was cut from. Recomputed on every state change and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visible {
    pub rows: Vec<usize>,
    /// Size of the filtered result set the page was cut from.
    pub total: usize,
    pub page: Page,
}

/// Stable case-insensitive substring filter over the searchable columns.
/// Returns indices into `records` in their original relative order; an
/// empty query matches everything.
pub fn filter(records: &[User], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..records.len()).collect();
    }
    let needle = query.to_lowercase();
    let searchable: Vec<&columns::ColumnSpec> =
        columns::columns().iter().filter(|c| c.searchable).collect();
    records
        .iter()
        .enumerate()
        .filter(|(_, user)| {
            searchable
                .iter()
                .any(|col| (col.accessor)(user).to_string().to_lowercase().contains(&needle))
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// Stable sort of the row mapping under at most one column. `None` leaves
/// the input order untouched. Equal keys keep their relative order so that
/// page slices stay deterministic across re-renders.
pub fn sort(records: &[User], rows: &mut [usize], spec: Option<SortSpec>) {
    let Some(spec) = spec else {
        return;
    };
    let col = columns::column(spec.column);
    rows.sort_by(|&a, &b| {
        let ord = col.compare(&records[a], &records[b]);
        match spec.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Number of pages a result set of `total` rows occupies. An empty set is
/// one page of zero rows, never zero pages.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if total == 0 {
        1
    } else {
        total.div_ceil(page_size)
    }
}

/// Cut the page window out of a result set of `total` rows. Out-of-range
/// page indices yield an empty window rather than panicking; [`recompute`]
/// clamps them before this is reached.
pub fn paginate(total: usize, page_index: usize, page_size: usize) -> Page {
    let start = (page_index * page_size).min(total);
    let end = (start + page_size).min(total);
    Page {
        rows: start..end,
        page_index,
        page_count: page_count(total, page_size),
    }
}

/// The full pipeline: filter, sort, clamp the page index, paginate. This is
/// the only place the page-index invariant is enforced, so every state
/// transition funnels through here.
pub fn recompute(records: &[User], state: &mut ViewState) -> Visible {
    let mut rows = filter(records, &state.query);
    sort(records, &mut rows, state.sort);
    let pages = page_count(rows.len(), state.page_size);
    state.page_index = state.page_index.min(pages - 1);
    let total = rows.len();
    let page = paginate(total, state.page_index, state.page_size);
    let rows = rows[page.rows.clone()].to_vec();
    Visible { rows, total, page }
}
