use super::PageRequest;
use serde::Serialize;

/// Pagination block of the list envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u64,
    /// 1-based position of the first item on this page; `null` when empty
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl PageMeta {
    pub fn new(cursor: PageRequest, total: u64, items_on_page: usize) -> Self {
        let per_page = cursor.per_page() as u64;
        let last_page = total.div_ceil(per_page).max(1);
        let (from, to) = if items_on_page == 0 {
            (None, None)
        } else {
            let from = cursor.offset() + 1;
            (Some(from), Some(from + items_on_page as u64 - 1))
        };

        Self {
            current_page: cursor.page(),
            per_page: cursor.per_page(),
            total,
            last_page,
            from,
            to,
        }
    }
}

/// `{ data: [...], pagination: {...} }`
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, cursor: PageRequest, total: u64) -> Self {
        let pagination = PageMeta::new(cursor, total, data.len());
        Self { data, pagination }
    }
}
