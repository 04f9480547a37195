//! Backend envelopes
//!
//! Every list endpoint answers with [`PageResponse`], every failure with
//! [`ErrorResponse`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Paginated list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

/// Standard error envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<BTreeMap<String, String>>,
}

impl ErrorResponse {
    /// Server field errors, if any were sent
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        self.validation_errors.as_ref().filter(|m| !m.is_empty())
    }
}

/// Page coordinates sent with list requests (page index is zero-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![("page", self.page.to_string()), ("size", self.size.to_string())]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

/// Result of a list query as views consume it
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_elements: u64) -> Self {
        Self { items, total_elements }
    }

    /// Cut one page out of an unpaginated listing
    pub fn paginate(all: Vec<T>, page: PageRequest) -> Self {
        let total_elements = all.len() as u64;
        let size = page.size as usize;
        let start = (page.page as usize).saturating_mul(size);
        let items = all.into_iter().skip(start).take(size).collect();
        Self { items, total_elements }
    }

    pub fn empty() -> Self {
        Self { items: Vec::new(), total_elements: 0 }
    }

    /// Number of pages for the pager, from the server's total
    pub fn page_count(&self, page_size: u32) -> u32 {
        if page_size == 0 {
            return 0;
        }
        u32::try_from(self.total_elements.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
    }
}

impl<T> From<PageResponse<T>> for Page<T> {
    fn from(response: PageResponse<T>) -> Self {
        Self {
            items: response.data,
            total_elements: response.total_elements,
        }
    }
}
