//! Gap reporting: where lines no rule claimed are sent.

use tracing::debug;

use crate::report::ReportType;

/// Receives unrecognized lines. Fire-and-forget; must not fail or block.
pub trait GapSink {
    fn report(&self, line: &str, report_type: ReportType);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl GapSink for NullSink {
    fn report(&self, _line: &str, _report_type: ReportType) {}
}

/// Emits a debug event per unrecognized line, truncated to `max_chars`.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    pub max_chars: usize,
}

impl Default for TracingSink {
    fn default() -> Self {
        Self { max_chars: 200 }
    }
}

impl GapSink for TracingSink {
    fn report(&self, line: &str, report_type: ReportType) {
        let clipped = truncate_chars(line, self.max_chars);
        debug!(context = report_type.tag(), line = clipped, "unrecognized line");
    }
}

/// Cut at a char boundary.
pub fn truncate_chars(line: &str, max_chars: usize) -> &str {
    match line.char_indices().nth(max_chars) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Test sink recording what it receives.
    #[derive(Default)]
    pub(crate) struct CollectingSink {
        pub lines: RefCell<Vec<(String, ReportType)>>,
    }

    impl GapSink for CollectingSink {
        fn report(&self, line: &str, report_type: ReportType) {
            self.lines.borrow_mut().push((line.to_string(), report_type));
        }
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
        assert_eq!(truncate_chars("ééé", 2), "éé");
    }

    #[test]
    fn test_tracing_sink_does_not_panic() {
        let sink = TracingSink { max_chars: 4 };
        sink.report("some unrecognized line", ReportType::ProvinceLogs);
        NullSink.report("anything", ReportType::KingdomNews);
    }
}
