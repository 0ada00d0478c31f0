use serde::Serialize;

/// 列表頁的分頁狀態（頁碼從 1 開始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: u64,
    pub rows: u64,
    pub total: u64,
}

impl Pagination {
    pub fn new(current_page: u64, rows: u64, total: u64) -> Self {
        Self {
            current_page: current_page.max(1),
            rows: rows.max(1),
            total,
        }
    }

    /// 第一筆資料的位移量
    pub fn first(&self) -> u64 {
        (self.current_page - 1) * self.rows
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.rows).max(1)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// 由位移量換算頁碼（分頁元件回傳 first 時使用）
    pub fn page_for_offset(first: u64, rows: u64) -> u64 {
        first / rows.max(1) + 1
    }

    /// 顯示用的頁碼區間，以目前頁為中心，最多 `window` 個
    pub fn page_links(&self, window: u64) -> Vec<u64> {
        let total = self.total_pages();
        let window = window.clamp(1, total);
        let half = window / 2;
        let start = self
            .current_page
            .saturating_sub(half)
            .max(1)
            .min(total - window + 1);
        (start..start + window).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_offset() {
        assert_eq!(Pagination::new(2, 9, 30).first(), 9);
        assert_eq!(Pagination::new(1, 9, 30).first(), 0);
        assert_eq!(Pagination::new(0, 9, 30).first(), 0);
    }

    #[test]
    fn test_total_pages_and_navigation() {
        let page = Pagination::new(4, 9, 30);
        assert_eq!(page.total_pages(), 4);
        assert!(page.has_previous());
        assert!(!page.has_next());

        assert_eq!(Pagination::new(1, 9, 0).total_pages(), 1);
    }

    #[test]
    fn test_page_for_offset_round_trips_first() {
        let page = Pagination::new(3, 9, 100);
        assert_eq!(Pagination::page_for_offset(page.first(), 9), 3);
    }

    #[test]
    fn test_page_links_window() {
        assert_eq!(Pagination::new(1, 10, 100).page_links(5), vec![1, 2, 3, 4, 5]);
        assert_eq!(Pagination::new(6, 10, 100).page_links(5), vec![4, 5, 6, 7, 8]);
        assert_eq!(Pagination::new(10, 10, 100).page_links(5), vec![6, 7, 8, 9, 10]);
        assert_eq!(Pagination::new(1, 10, 20).page_links(5), vec![1, 2]);
    }
}
