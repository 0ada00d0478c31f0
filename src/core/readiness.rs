use crate::core::request_gate::RequestTracker;
use crate::domain::ports::SiteSettings;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessTimings {
    /// 所有請求結束後，到隱藏指示器之前的緩衝
    pub settle: Duration,
    /// 強制就緒的上限，避免頁面永遠不可見
    pub ceiling: Duration,
}

impl Default for ReadinessTimings {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(50),
            ceiling: Duration::from_secs(10),
        }
    }
}

impl ReadinessTimings {
    pub fn from_settings<C: SiteSettings + ?Sized>(settings: &C) -> Self {
        Self {
            settle: settings.settle_delay(),
            ceiling: settings.readiness_ceiling(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyReason {
    /// 所有初始請求都已完成
    Idle,
    /// 達到上限時間而強制就緒
    CeilingReached,
}

/// 頁面外殼：控制導覽列與頁尾何時顯示。
///
/// 首次進入路由時關閉 auto-hide，等待「所有」初始請求完成後才就緒，
/// 之後的導覽直接使用 [`RequestTracker`] 的一般行為。
/// drop 時必定恢復 auto-hide。
pub struct PageShell {
    tracker: Arc<RequestTracker>,
    timings: ReadinessTimings,
    content_ready: AtomicBool,
    initial_done: AtomicBool,
}

impl PageShell {
    /// 建立時即關閉 auto-hide，必須早於第一次導覽
    pub fn new(tracker: Arc<RequestTracker>, timings: ReadinessTimings) -> Self {
        tracker.set_auto_hide(false);
        Self {
            tracker,
            timings,
            content_ready: AtomicBool::new(false),
            initial_done: AtomicBool::new(false),
        }
    }

    pub fn is_content_ready(&self) -> bool {
        self.content_ready.load(Ordering::SeqCst)
    }

    pub fn is_initial_load_done(&self) -> bool {
        self.initial_done.load(Ordering::SeqCst)
    }

    /// 等待初始載入完成。只有第一次呼叫會執行等待流程，
    /// 之後的呼叫（後續導覽）立即回傳 `Idle`。
    pub async fn await_initial_ready(&self) -> ReadyReason {
        if self.initial_done.swap(true, Ordering::SeqCst) {
            return ReadyReason::Idle;
        }

        let reason = if self.tracker.wait_idle_for(self.timings.ceiling).await {
            tracing::debug!("✅ Initial requests settled");
            ReadyReason::Idle
        } else {
            tracing::warn!(
                "⏱️ Forcing readiness after {:?} with {} requests still outstanding",
                self.timings.ceiling,
                self.tracker.outstanding()
            );
            ReadyReason::CeilingReached
        };

        self.content_ready.store(true, Ordering::SeqCst);
        tokio::time::sleep(self.timings.settle).await;
        self.tracker.hide_indicator();
        self.tracker.set_auto_hide(true);

        tracing::info!("🏁 Page chrome revealed ({:?})", reason);
        reason
    }
}

impl Drop for PageShell {
    fn drop(&mut self) {
        self.tracker.set_auto_hide(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request_gate::tests::RecordingIndicator;

    fn shell(timings: ReadinessTimings) -> (PageShell, Arc<RequestTracker>, Arc<RecordingIndicator>) {
        let indicator = Arc::new(RecordingIndicator::default());
        let tracker = Arc::new(RequestTracker::new(indicator.clone()));
        (PageShell::new(tracker.clone(), timings), tracker, indicator)
    }

    fn quick() -> ReadinessTimings {
        ReadinessTimings {
            settle: Duration::from_millis(5),
            ceiling: Duration::from_millis(500),
        }
    }

    #[tokio::test]
    async fn test_waits_for_all_requests_not_just_first() {
        let (shell, tracker, indicator) = shell(quick());
        let first = tracker.track();
        let second = tracker.track();

        let releaser = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            drop(first);
            tokio::time::sleep(Duration::from_millis(40)).await;
            drop(second);
        });

        let reason = shell.await_initial_ready().await;
        releaser.await.unwrap();

        assert_eq!(reason, ReadyReason::Idle);
        assert!(shell.is_content_ready());
        assert!(tracker.auto_hide_enabled());
        // auto-hide 關閉期間不自動隱藏，只有外殼手動隱藏一次
        assert_eq!(indicator.hides.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ceiling_forces_readiness() {
        let (shell, tracker, _) = shell(ReadinessTimings {
            settle: Duration::from_millis(1),
            ceiling: Duration::from_millis(30),
        });
        let _stuck = tracker.track();

        assert_eq!(shell.await_initial_ready().await, ReadyReason::CeilingReached);
        assert!(shell.is_content_ready());
        assert!(tracker.auto_hide_enabled());
    }

    #[tokio::test]
    async fn test_subsequent_navigation_skips_ritual() {
        let (shell, tracker, indicator) = shell(quick());
        shell.await_initial_ready().await;

        let hides_before = indicator.hides.load(Ordering::SeqCst);
        let _busy = tracker.track();
        assert_eq!(shell.await_initial_ready().await, ReadyReason::Idle);
        assert_eq!(indicator.hides.load(Ordering::SeqCst), hides_before);
    }

    #[test]
    fn test_drop_restores_auto_hide() {
        let (shell, tracker, _) = shell(quick());
        assert!(!tracker.auto_hide_enabled());
        drop(shell);
        assert!(tracker.auto_hide_enabled());
    }
}
