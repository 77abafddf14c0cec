use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Once;
use std::time::Instant;

static PERF_ENABLED: AtomicBool = AtomicBool::new(false);
static SLOW_OP_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);
static INSTALL: Once = Once::new();

thread_local! {
    static PERF_DEPTH: Cell<u32> = const { Cell::new(0) };
    static ROW_COUNT: Cell<u64> = const { Cell::new(0) };
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 读取性能统计开关（进程内只读取一次）
///
/// 开关：
/// - Debug 默认开启；Release 默认关闭（可通过环境变量开启）
/// - `AIRPLUS_WORKFLOW_PERF=1` 强制开启
/// - `AIRPLUS_WORKFLOW_SLOW_MS=500` 配置慢操作阈值（毫秒）
fn install() {
    INSTALL.call_once(|| {
        let enabled = match std::env::var("AIRPLUS_WORKFLOW_PERF") {
            Ok(v) => is_true(&v),
            Err(_) => cfg!(debug_assertions),
        };
        PERF_ENABLED.store(enabled, Ordering::Relaxed);

        let slow_ms = std::env::var("AIRPLUS_WORKFLOW_SLOW_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 500 } else { 2000 });
        SLOW_OP_THRESHOLD_MS.store(slow_ms, Ordering::Relaxed);
    });
}

/// 累加已处理行数（仅在 PerfGuard 作用域内计数）
pub fn record_rows(n: usize) {
    let active = PERF_DEPTH.with(|d| d.get() > 0);
    if active {
        ROW_COUNT.with(|c| c.set(c.get().saturating_add(n as u64)));
    }
}

/// 性能统计 Guard：记录 elapsed_ms + 处理行数
///
/// 使用方式：
/// ```ignore
/// let _perf = airplus_workflow::perf::PerfGuard::new("pipeline.aggregate");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    row_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        install();
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        let row_start = ROW_COUNT.with(|c| c.get());
        Self {
            op,
            start: Instant::now(),
            row_start,
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let rows = ROW_COUNT
            .with(|c| c.get())
            .saturating_sub(self.row_start);

        if PERF_ENABLED.load(Ordering::Relaxed) {
            let threshold = SLOW_OP_THRESHOLD_MS.load(Ordering::Relaxed);
            if threshold > 0 && elapsed_ms >= threshold {
                tracing::warn!(target: "perf", op = self.op, elapsed_ms, rows, "slow op");
            } else {
                tracing::info!(target: "perf", op = self.op, elapsed_ms, rows, "done");
            }
        }

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_counted_only_inside_guard() {
        record_rows(10);
        let before = ROW_COUNT.with(|c| c.get());
        {
            let _perf = PerfGuard::new("test.outer");
            record_rows(3);
            {
                let _inner = PerfGuard::new("test.inner");
                record_rows(2);
            }
        }
        let after = ROW_COUNT.with(|c| c.get());
        assert_eq!(after - before, 5);

        record_rows(7);
        assert_eq!(ROW_COUNT.with(|c| c.get()), after);
    }
}
