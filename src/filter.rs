/// Skip predicates evaluated on raw record bytes
///
/// Lets callers reject whole records (e.g. anything without a trade) before
/// paying for field decode. Each condition masks one byte and compares it to
/// an expected value:
///   - all `Include` conditions must match
///   - any matching `Exclude` condition skips the record
///
/// Conditions pointing past the end of a record are not evaluated.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Include,
    Exclude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkipCondition {
    pub position: usize,
    pub value: u8,
    pub mask: u8,
    pub mode: FilterMode,
}

impl SkipCondition {
    pub fn include(position: usize, value: u8, mask: u8) -> Self {
        SkipCondition { position, value, mask, mode: FilterMode::Include }
    }

    pub fn exclude(position: usize, value: u8, mask: u8) -> Self {
        SkipCondition { position, value, mask, mode: FilterMode::Exclude }
    }

    /// `None` when the record is too short to evaluate this condition
    #[inline]
    pub fn matches(&self, record: &[u8]) -> Option<bool> {
        record
            .get(self.position)
            .map(|&b| b & self.mask == self.value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkipFilter {
    conditions: Vec<SkipCondition>,
}

impl SkipFilter {
    pub fn new(conditions: Vec<SkipCondition>) -> Self {
        SkipFilter { conditions }
    }

    pub fn conditions(&self) -> &[SkipCondition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Returns true if the record should be skipped
    pub fn should_skip(&self, record: &[u8]) -> bool {
        let mut include = true;
        let mut exclude = false;

        for cond in &self.conditions {
            let Some(matched) = cond.matches(record) else {
                continue;
            };
            match cond.mode {
                FilterMode::Include => include &= matched,
                FilterMode::Exclude => exclude |= matched,
            }
        }

        !include || exclude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(pos: usize, byte: u8) -> Vec<u8> {
        let mut r = vec![0u8; 40];
        r[pos] = byte;
        r
    }

    #[test]
    fn test_empty_filter_never_skips() {
        let filter = SkipFilter::default();
        assert!(!filter.should_skip(&record_with(22, 0xFF)));
        assert!(!filter.should_skip(&[]));
    }

    #[test]
    fn test_include_requires_all() {
        let filter = SkipFilter::new(vec![
            SkipCondition::include(22, 0x80, 0x80),
            SkipCondition::include(24, 0x80, 0x80),
        ]);
        let mut r = record_with(22, 0x80);
        assert!(filter.should_skip(&r));
        r[24] = 0x80;
        assert!(!filter.should_skip(&r));
    }

    #[test]
    fn test_exclude_wins() {
        let filter = SkipFilter::new(vec![
            SkipCondition::include(22, 0x80, 0x80),
            SkipCondition::exclude(24, 0x80, 0x80),
        ]);
        let mut r = record_with(22, 0x80);
        assert!(!filter.should_skip(&r));
        r[24] = 0xC0;
        assert!(filter.should_skip(&r));
    }

    #[test]
    fn test_exclude_only() {
        let filter = SkipFilter::new(vec![SkipCondition::exclude(22, 0x01, 0x01)]);
        assert!(filter.should_skip(&record_with(22, 0x81)));
        assert!(!filter.should_skip(&record_with(22, 0x80)));
    }

    #[test]
    fn test_out_of_range_condition_ignored() {
        let filter = SkipFilter::new(vec![
            SkipCondition::include(100, 0xFF, 0xFF),
            SkipCondition::exclude(200, 0x00, 0x00),
        ]);
        assert!(!filter.should_skip(&record_with(22, 0)));
    }
}
