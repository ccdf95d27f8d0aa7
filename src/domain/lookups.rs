use std::collections::HashMap;

/// Label -> surrogate key mappings for the three lookup tables, loaded once
/// per run and passed by reference into the row mapper. The tables are
/// externally owned; this cache never creates missing rows.
#[derive(Debug, Clone, Default)]
pub struct LookupCache {
    age_ranges: HashMap<String, i64>,
    regions: HashMap<String, i64>,
    indicators: HashMap<String, i64>,
}

impl LookupCache {
    pub fn new(
        age_ranges: HashMap<String, i64>,
        regions: HashMap<String, i64>,
        indicators: HashMap<String, i64>,
    ) -> Self {
        Self {
            age_ranges,
            regions,
            indicators,
        }
    }

    /// Lenient resolution: absent, empty, or unmapped labels yield `None`.
    pub fn age_range_id(&self, label: Option<&str>) -> Option<i64> {
        Self::resolve_optional(&self.age_ranges, label)
    }

    /// Lenient resolution: absent, empty, or unmapped labels yield `None`.
    pub fn region_id(&self, name: Option<&str>) -> Option<i64> {
        Self::resolve_optional(&self.regions, name)
    }

    /// Strict resolution: indicator labels are assumed present in the lookup
    /// table, so the caller treats `None` as a fatal error.
    pub fn indicator_id(&self, name: &str) -> Option<i64> {
        self.indicators.get(name).copied()
    }

    pub fn age_range_count(&self) -> usize {
        self.age_ranges.len()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn indicator_count(&self) -> usize {
        self.indicators.len()
    }

    fn resolve_optional(map: &HashMap<String, i64>, label: Option<&str>) -> Option<i64> {
        let label = label.map(str::trim).filter(|l| !l.is_empty())?;
        map.get(label).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> LookupCache {
        let mut age_ranges = HashMap::new();
        age_ranges.insert("25-34".to_string(), 2);
        let mut regions = HashMap::new();
        regions.insert("Western Cape".to_string(), 7);
        let mut indicators = HashMap::new();
        indicators.insert("Economic Management".to_string(), 1);
        LookupCache::new(age_ranges, regions, indicators)
    }

    #[test]
    fn resolves_known_labels() {
        let cache = cache();
        assert_eq!(cache.age_range_id(Some("25-34")), Some(2));
        assert_eq!(cache.region_id(Some("Western Cape")), Some(7));
        assert_eq!(cache.indicator_id("Economic Management"), Some(1));
    }

    #[test]
    fn absent_empty_or_unmapped_labels_resolve_to_none() {
        let cache = cache();
        assert_eq!(cache.age_range_id(None), None);
        assert_eq!(cache.age_range_id(Some("")), None);
        assert_eq!(cache.age_range_id(Some("  ")), None);
        assert_eq!(cache.age_range_id(Some("65+")), None);
        assert_eq!(cache.region_id(Some("Atlantis")), None);
    }

    #[test]
    fn unmapped_indicator_is_none_for_caller_to_escalate() {
        assert_eq!(cache().indicator_id("Fiscal Policy"), None);
    }
}
