//! Metrics for the interop deriver.

use kona_supervisor_types::SafetyLevel;

/// Container for the metrics of the interop deriver.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Identifier for the counter of promotion events, labelled by safety level.
    pub const INTEROP_PROMOTIONS_TOTAL: &'static str = "kona_interop_promotions_total";
    /// Identifier for the counter of failed events, labelled by event kind.
    pub const INTEROP_EVENT_ERRORS_TOTAL: &'static str = "kona_interop_event_errors_total";

    const PROMOTED_LEVELS: [SafetyLevel; 3] =
        [SafetyLevel::CrossUnsafe, SafetyLevel::CrossSafe, SafetyLevel::Finalized];

    /// Initializes metrics for the interop deriver.
    ///
    /// This does two things:
    /// * Describes various metrics.
    /// * Initializes metrics to 0 so they can be queried immediately.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_counter!(
            Self::INTEROP_PROMOTIONS_TOTAL,
            metrics::Unit::Count,
            "Total number of blocks promoted to a cross-safety level",
        );

        metrics::describe_counter!(
            Self::INTEROP_EVENT_ERRORS_TOTAL,
            metrics::Unit::Count,
            "Total number of interop events that failed to process",
        );
    }

    fn zero() {
        for level in Self::PROMOTED_LEVELS {
            metrics::counter!(Self::INTEROP_PROMOTIONS_TOTAL, "level" => level.as_str())
                .increment(0);
        }
    }

    pub(crate) fn record_promotion(level: SafetyLevel) {
        metrics::counter!(Self::INTEROP_PROMOTIONS_TOTAL, "level" => level.as_str()).increment(1);
    }

    pub(crate) fn record_event_error(event: &'static str) {
        metrics::counter!(Self::INTEROP_EVENT_ERRORS_TOTAL, "event" => event).increment(1);
    }
}
