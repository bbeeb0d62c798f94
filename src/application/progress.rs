//! Scan progress tracking.
//!
//! Progress moves through fixed phase marks: 15 while scanning, 40 when
//! analysis starts, 90 while the report is generated, 100 on completion.
//! The 40-85 band is spread evenly across the job's findings. Values are
//! monotonically non-decreasing and every update carries a human-readable
//! message.

use std::sync::Arc;

use tracing::warn;

use crate::domain::scan::{ScanJob, ScanRepository};

pub const PROGRESS_SCANNING: u8 = 15;
pub const PROGRESS_ANALYZING: u8 = 40;
pub const PROGRESS_REPORTING: u8 = 90;
pub const PROGRESS_COMPLETE: u8 = 100;

/// Portion of the progress range spread across individual findings.
const ANALYSIS_SPAN: u8 = 45;
const ANALYSIS_CEILING: u8 = 85;

/// Progress after `completed` of `total_findings` findings have been scored.
///
/// Each finding advances progress by `45 / N` (integer division), never past
/// 85. With zero findings the analysis band is skipped entirely and progress
/// jumps from 40 to 90.
pub fn progress_after_finding(total_findings: usize, completed: usize) -> u8 {
    if total_findings == 0 {
        return PROGRESS_ANALYZING;
    }
    let step = ANALYSIS_SPAN as usize / total_findings;
    let value = PROGRESS_ANALYZING as usize + step * completed.min(total_findings);
    value.min(ANALYSIS_CEILING as usize) as u8
}

/// Publishes progress updates for running jobs.
///
/// Updates are written through the repository best-effort: a failed write is
/// logged and the pipeline continues, since losing a progress tick must not
/// abort a scan.
#[derive(Clone)]
pub struct ProgressTracker {
    repository: Arc<dyn ScanRepository>,
}

impl ProgressTracker {
    pub fn new(repository: Arc<dyn ScanRepository>) -> Self {
        Self { repository }
    }

    pub async fn publish(&self, job: &mut ScanJob, progress: u8, message: &str) {
        // Guard monotonicity even if a caller hands us a stale value.
        let progress = progress.max(job.progress);
        job.progress = progress;
        job.status_message = message.to_string();

        if let Err(error) = self
            .repository
            .update_progress(job.id, progress, message)
            .await
        {
            warn!(
                job_id = %job.id,
                progress,
                error = %error,
                "Failed to persist progress update"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_findings_skip_the_analysis_band() {
        assert_eq!(progress_after_finding(0, 0), PROGRESS_ANALYZING);
    }

    #[test]
    fn test_progress_steps_are_even_and_capped() {
        // One finding consumes the whole band.
        assert_eq!(progress_after_finding(1, 1), 85);

        // Two findings: floor(45 / 2) = 22 per finding.
        assert_eq!(progress_after_finding(2, 1), 62);
        assert_eq!(progress_after_finding(2, 2), 84);

        // Nine findings: exact 5 per finding, landing on the ceiling.
        assert_eq!(progress_after_finding(9, 9), 85);
    }

    #[test]
    fn test_many_findings_never_exceed_ceiling() {
        for total in [3usize, 7, 45, 46, 100, 500] {
            let mut last = PROGRESS_ANALYZING;
            for completed in 1..=total {
                let value = progress_after_finding(total, completed);
                assert!(value >= last, "progress regressed at {completed}/{total}");
                assert!(value <= ANALYSIS_CEILING);
                last = value;
            }
        }
    }

    #[test]
    fn test_full_phase_sequence_is_monotonic() {
        for total in [0usize, 1, 2, 10, 80] {
            let mut sequence = vec![PROGRESS_SCANNING, PROGRESS_ANALYZING];
            sequence.extend((1..=total).map(|i| progress_after_finding(total, i)));
            sequence.push(PROGRESS_REPORTING);
            sequence.push(PROGRESS_COMPLETE);

            assert!(sequence.windows(2).all(|w| w[0] <= w[1]), "{sequence:?}");
            assert_eq!(*sequence.last().unwrap(), 100);
        }
    }
}
