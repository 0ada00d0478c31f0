use crate::domain::ports::LoadingIndicator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// 追蹤進行中的 HTTP 請求數量，驅動單一的全域載入指示器。
///
/// 計數器為 0→1 時顯示指示器；1→0 時僅在 auto-hide 開啟時隱藏。
/// 計數器永遠不會小於 0，多餘的 `finish` 會被夾在 0。
pub struct RequestTracker {
    outstanding: watch::Sender<usize>,
    auto_hide: AtomicBool,
    indicator: Arc<dyn LoadingIndicator>,
}

impl RequestTracker {
    pub fn new(indicator: Arc<dyn LoadingIndicator>) -> Self {
        let (outstanding, _) = watch::channel(0);
        Self {
            outstanding,
            auto_hide: AtomicBool::new(true),
            indicator,
        }
    }

    /// 開始追蹤一個請求，回傳的 guard 在 drop 時必定結束追蹤
    pub fn track(self: &Arc<Self>) -> RequestGuard {
        self.begin();
        RequestGuard {
            tracker: Arc::clone(self),
        }
    }

    pub fn begin(&self) {
        let mut became_busy = false;
        self.outstanding.send_modify(|count| {
            *count += 1;
            became_busy = *count == 1;
        });

        if became_busy {
            self.indicator.show();
        }
    }

    pub fn finish(&self) {
        let mut became_idle = false;
        self.outstanding.send_modify(|count| {
            if *count == 0 {
                tracing::warn!("⚠️ Request finished with no outstanding requests, clamping at zero");
                return;
            }
            *count -= 1;
            became_idle = *count == 0;
        });

        if became_idle && self.auto_hide_enabled() {
            self.indicator.hide();
        }
    }

    pub fn outstanding(&self) -> usize {
        *self.outstanding.borrow()
    }

    pub fn is_idle(&self) -> bool {
        self.outstanding() == 0
    }

    pub fn set_auto_hide(&self, enabled: bool) {
        self.auto_hide.store(enabled, Ordering::SeqCst);
    }

    pub fn auto_hide_enabled(&self) -> bool {
        self.auto_hide.load(Ordering::SeqCst)
    }

    pub fn hide_indicator(&self) {
        self.indicator.hide();
    }

    /// 等待所有進行中的請求結束
    pub async fn wait_idle(&self) {
        let mut rx = self.outstanding.subscribe();
        // sender 由 self 持有，wait_for 不會因通道關閉而失敗
        let _ = rx.wait_for(|count| *count == 0).await;
    }

    /// 等待閒置，最多等待 `ceiling`。回傳 false 表示超時
    pub async fn wait_idle_for(&self, ceiling: Duration) -> bool {
        tokio::time::timeout(ceiling, self.wait_idle()).await.is_ok()
    }
}

impl std::fmt::Debug for RequestTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestTracker")
            .field("outstanding", &self.outstanding())
            .field("auto_hide", &self.auto_hide_enabled())
            .finish()
    }
}

/// 請求結束的保證執行點（成功、失敗或 future 被取消都會觸發）
#[must_use = "dropping the guard immediately ends request tracking"]
pub struct RequestGuard {
    tracker: Arc<RequestTracker>,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.tracker.finish();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    pub(crate) struct RecordingIndicator {
        pub shows: AtomicUsize,
        pub hides: AtomicUsize,
    }

    impl LoadingIndicator for RecordingIndicator {
        fn show(&self) {
            self.shows.fetch_add(1, Ordering::SeqCst);
        }

        fn hide(&self) {
            self.hides.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn tracker() -> (Arc<RequestTracker>, Arc<RecordingIndicator>) {
        let indicator = Arc::new(RecordingIndicator::default());
        let tracker = Arc::new(RequestTracker::new(indicator.clone()));
        (tracker, indicator)
    }

    #[test]
    fn test_indicator_shown_once_and_hidden_once() {
        let (tracker, indicator) = tracker();

        tracker.begin();
        tracker.begin();
        tracker.begin();
        assert_eq!(indicator.shows.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.outstanding(), 3);

        tracker.finish();
        tracker.finish();
        assert_eq!(indicator.hides.load(Ordering::SeqCst), 0);

        tracker.finish();
        assert_eq!(indicator.hides.load(Ordering::SeqCst), 1);
        assert!(tracker.is_idle());
    }

    #[test]
    fn test_counter_clamps_at_zero() {
        for (starts, finishes) in [(0usize, 3usize), (2, 5), (3, 3), (5, 2), (4, 0)] {
            let (tracker, _) = tracker();
            for _ in 0..starts {
                tracker.begin();
            }
            for _ in 0..finishes {
                tracker.finish();
            }
            assert_eq!(tracker.outstanding(), starts.saturating_sub(finishes));
        }
    }

    #[test]
    fn test_interleaved_finishes_never_go_negative() {
        let (tracker, indicator) = tracker();

        tracker.finish();
        tracker.begin();
        tracker.finish();
        tracker.finish();
        tracker.begin();

        assert_eq!(tracker.outstanding(), 1);
        assert_eq!(indicator.shows.load(Ordering::SeqCst), 2);
        assert_eq!(indicator.hides.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_auto_hide_disabled_keeps_indicator() {
        let (tracker, indicator) = tracker();
        tracker.set_auto_hide(false);

        tracker.begin();
        tracker.finish();
        assert_eq!(indicator.hides.load(Ordering::SeqCst), 0);

        tracker.hide_indicator();
        assert_eq!(indicator.hides.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guard_finishes_on_drop() {
        let (tracker, indicator) = tracker();
        {
            let _first = tracker.track();
            let _second = tracker.track();
            assert_eq!(tracker.outstanding(), 2);
        }
        assert_eq!(tracker.outstanding(), 0);
        assert_eq!(indicator.hides.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wait_idle_resolves_after_last_guard() {
        let (tracker, _) = tracker();
        let guard = tracker.track();

        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.wait_idle_for(Duration::from_secs(2)).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(guard);

        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn test_wait_idle_times_out_with_stuck_request() {
        let (tracker, _) = tracker();
        let _guard = tracker.track();

        assert!(!tracker.wait_idle_for(Duration::from_millis(30)).await);
    }
}
