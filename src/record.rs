use serde::Deserialize;

/// One user entity as returned by the data source. Immutable after the
/// initial load; every field defaults so a record with missing pieces still
/// renders (as empty cells) instead of failing the whole load.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: u64,
    pub website: String,
    pub company: Company,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Address {
    pub city: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Company {
    pub name: String,
    #[serde(rename = "catchPhrase")]
    pub catch_phrase: String,
    pub bs: String,
}
