use std::cmp::Ordering;
use std::fmt;

use crate::record::User;

/// Identifies one column of the user table. The discriminant doubles as the
/// index into the registry returned by [`columns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnId {
    Id,
    Name,
    Username,
    Email,
    City,
    Phone,
    Website,
    CompanyName,
    CatchPhrase,
    BusinessService,
}

/// A single extracted cell value. Numbers sort numerically, text sorts
/// case-folded so that mixed-case and non-ASCII values do not end up in raw
/// codepoint order.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(u64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

pub type Accessor = fn(&User) -> Cell;
pub type Comparator = fn(&Cell, &Cell) -> Ordering;

/// Static descriptor of one column: how to extract a value from a record,
/// whether it takes part in free-text search, and how it sorts.
pub struct ColumnSpec {
    pub id: ColumnId,
    pub header: &'static str,
    pub accessor: Accessor,
    pub sortable: bool,
    pub searchable: bool,
    pub comparator: Option<Comparator>,
}

impl ColumnSpec {
    /// Compare two records under this column, using the declared comparator
    /// if there is one and natural cell ordering otherwise.
    pub fn compare(&self, a: &User, b: &User) -> Ordering {
        let ca = (self.accessor)(a);
        let cb = (self.accessor)(b);
        match self.comparator {
            Some(cmp) => cmp(&ca, &cb),
            None => natural_cmp(&ca, &cb),
        }
    }
}

/// Case-folded string comparison. Ties between values that only differ in
/// case fall back to codepoint order so the comparator stays total and
/// deterministic.
pub fn caseless_cmp(a: &str, b: &str) -> Ordering {
    match a.to_lowercase().cmp(&b.to_lowercase()) {
        Ordering::Equal => a.cmp(b),
        ord => ord,
    }
}

fn natural_cmp(a: &Cell, b: &Cell) -> Ordering {
    match (a, b) {
        (Cell::Number(x), Cell::Number(y)) => x.cmp(y),
        (Cell::Text(x), Cell::Text(y)) => caseless_cmp(x, y),
        // Columns are homogeneous, mixed cells only appear if the registry
        // is wrong. Order numbers first to stay total anyway.
        (Cell::Number(_), Cell::Text(_)) => Ordering::Less,
        (Cell::Text(_), Cell::Number(_)) => Ordering::Greater,
    }
}

fn locale_text_cmp(a: &Cell, b: &Cell) -> Ordering {
    natural_cmp(a, b)
}

static COLUMNS: [ColumnSpec; 10] = [
    ColumnSpec {
        id: ColumnId::Id,
        header: "ID",
        accessor: |u| Cell::Number(u.id),
        sortable: true,
        searchable: false,
        comparator: None,
    },
    ColumnSpec {
        id: ColumnId::Name,
        header: "Name",
        accessor: |u| Cell::Text(u.name.clone()),
        sortable: true,
        searchable: true,
        comparator: None,
    },
    ColumnSpec {
        id: ColumnId::Username,
        header: "Username",
        accessor: |u| Cell::Text(u.username.clone()),
        sortable: true,
        searchable: true,
        comparator: None,
    },
    ColumnSpec {
        id: ColumnId::Email,
        header: "Email",
        accessor: |u| Cell::Text(u.email.clone()),
        sortable: true,
        searchable: true,
        comparator: None,
    },
    ColumnSpec {
        id: ColumnId::City,
        header: "City",
        accessor: |u| Cell::Text(u.address.city.clone()),
        sortable: true,
        searchable: true,
        // The source data mixes case freely in city names, so this column
        // declares its collation explicitly instead of relying on defaults.
        comparator: Some(locale_text_cmp),
    },
    ColumnSpec {
        id: ColumnId::Phone,
        header: "Phone",
        accessor: |u| Cell::Number(u.phone),
        sortable: true,
        searchable: false,
        comparator: None,
    },
    ColumnSpec {
        id: ColumnId::Website,
        header: "Website",
        accessor: |u| Cell::Text(u.website.clone()),
        sortable: true,
        searchable: false,
        comparator: None,
    },
    ColumnSpec {
        id: ColumnId::CompanyName,
        header: "Company Name",
        accessor: |u| Cell::Text(u.company.name.clone()),
        sortable: true,
        searchable: false,
        comparator: None,
    },
    ColumnSpec {
        id: ColumnId::CatchPhrase,
        header: "Catch Phrase",
        accessor: |u| Cell::Text(u.company.catch_phrase.clone()),
        sortable: true,
        searchable: false,
        comparator: None,
    },
    ColumnSpec {
        id: ColumnId::BusinessService,
        header: "Business Service",
        accessor: |u| Cell::Text(u.company.bs.clone()),
        sortable: true,
        searchable: false,
        comparator: None,
    },
];

/// The ordered column registry, defined once for the whole program.
pub fn columns() -> &'static [ColumnSpec] {
    &COLUMNS
}

/// Lookup by id. The registry is indexed by discriminant, so this is total.
pub fn column(id: ColumnId) -> &'static ColumnSpec {
    &COLUMNS[id as usize]
}
