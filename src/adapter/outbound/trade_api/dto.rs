//! Wire types of the trade API.

use serde::Deserialize;


/// One page as returned by `GET <base>?page=&pageSize=`.
///
/// `data` and `lastPage` are required; a response lacking either is a
/// protocol error rather than an empty page. Records stay raw so one odd
/// record cannot sink the page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub data: Option<Vec<serde_json::Value>>,
    pub last_page: Option<u32>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u32>,
}
