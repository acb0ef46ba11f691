//! Worker pool sizing
//!
//! OCR and rasterization are CPU-bound and each in-flight page holds a full
//! page bitmap plus a tesseract process, so the pool is capped by CPU count,
//! by RAM, and by a hard ceiling.

use sysinfo::System;

/// Resident memory budgeted per concurrent page worker
const BYTES_PER_WORKER: u64 = 512 * 1024 * 1024;
/// Hard ceiling on concurrent page workers
pub const DEFAULT_MAX_WORKERS: usize = 8;
/// Parallelism is always attempted
const MIN_WORKERS: usize = 2;

/// Host resource signals used for sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostResources {
    pub cpu_count: usize,
    pub total_ram_bytes: u64,
}

impl HostResources {
    /// Sample logical CPU count and total physical memory
    pub fn detect() -> Self {
        let mut system = System::new();
        system.refresh_memory();
        system.refresh_cpu_all();

        let cpu_count = match system.cpus().len() {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        };

        Self {
            cpu_count,
            total_ram_bytes: system.total_memory(),
        }
    }
}

/// Number of concurrent page workers for a document.
///
/// `min(cpu_count - 1, ram / 0.5GB, max_workers)`, clamped to the page
/// count, never below 2. A one-page document still gets 2 workers; the
/// second permit is just never taken.
pub fn optimal_workers(page_count: usize, host: HostResources, max_workers: usize) -> usize {
    let ram_capacity = (host.total_ram_bytes / BYTES_PER_WORKER) as usize;
    let upper_limit = host
        .cpu_count
        .saturating_sub(1)
        .min(ram_capacity)
        .min(max_workers);
    let optimal = upper_limit.min(page_count);

    tracing::debug!(
        cpu_count = host.cpu_count,
        ram_capacity,
        upper_limit,
        page_count,
        "Sized OCR worker pool"
    );

    optimal.max(MIN_WORKERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GB: u64 = 1024 * 1024 * 1024;

    fn host(cpu_count: usize, ram_gb: u64) -> HostResources {
        HostResources {
            cpu_count,
            total_ram_bytes: ram_gb * GB,
        }
    }

    #[test]
    fn test_large_host_hits_ceiling() {
        assert_eq!(optimal_workers(100, host(32, 64), DEFAULT_MAX_WORKERS), 8);
    }

    #[test]
    fn test_cpu_bound() {
        // 4 CPUs leave 3 workers
        assert_eq!(optimal_workers(100, host(4, 64), DEFAULT_MAX_WORKERS), 3);
    }

    #[test]
    fn test_ram_bound() {
        // 2GB of RAM fits 4 workers
        assert_eq!(optimal_workers(100, host(16, 2), DEFAULT_MAX_WORKERS), 4);
    }

    #[test]
    fn test_page_bound() {
        assert_eq!(optimal_workers(5, host(16, 64), DEFAULT_MAX_WORKERS), 5);
    }

    #[test]
    fn test_floor_of_two() {
        assert_eq!(optimal_workers(1, host(16, 64), DEFAULT_MAX_WORKERS), 2);
        assert_eq!(optimal_workers(0, host(16, 64), DEFAULT_MAX_WORKERS), 2);
        assert_eq!(optimal_workers(100, host(1, 64), DEFAULT_MAX_WORKERS), 2);
        assert_eq!(optimal_workers(100, host(8, 0), DEFAULT_MAX_WORKERS), 2);
    }

    #[test]
    fn test_configured_ceiling() {
        assert_eq!(optimal_workers(100, host(32, 64), 4), 4);
    }

    #[test]
    fn test_bounds_hold_across_hosts() {
        for cpus in 0..20 {
            for ram_gb in 0..10 {
                for pages in 0..12 {
                    let n = optimal_workers(pages, host(cpus, ram_gb), DEFAULT_MAX_WORKERS);
                    let cap = cpus.saturating_sub(1).min(8).min(pages);
                    assert!(n >= 2);
                    assert!(n <= cap.max(2));
                }
            }
        }
    }

    #[test]
    fn test_detect_reports_at_least_one_cpu() {
        assert!(HostResources::detect().cpu_count >= 1);
    }
}
