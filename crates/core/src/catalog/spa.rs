//! Spa services

use smallvec::SmallVec;

use crate::catalog::{Catalog, CatalogEntry, PriceRange, contains_ignore_case};

/// Session lengths offered for one service, in minutes.
pub type Durations = SmallVec<[u32; 4]>;

/// A spa treatment or programme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaService {
    /// Stable id
    pub id: String,

    /// Display name
    pub name: String,

    /// Description
    pub description: String,

    /// Service group, e.g. "Massage"
    pub category: String,

    /// Duration as advertised, e.g. "60/90 min"
    pub duration: Option<String>,

    /// Session lengths parsed from [`SpaService::duration`], ascending
    pub durations: Durations,

    /// Price range across the session lengths
    pub price_range: Option<PriceRange>,

    /// Selling points
    pub features: Vec<String>,

    /// Promoted on the spa landing page
    pub featured: bool,
}

impl SpaService {
    /// Shortest session on offer.
    pub fn shortest_duration(&self) -> Option<u32> {
        self.durations.first().copied()
    }

    fn has_feature(&self, needle: &str) -> bool {
        self.features
            .iter()
            .any(|feature| contains_ignore_case(feature, needle))
    }
}

impl CatalogEntry for SpaService {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.name, needle)
            || contains_ignore_case(&self.description, needle)
            || contains_ignore_case(&self.category, needle)
            || self.has_feature(needle)
    }
}

/// Extract every session length from an advertised duration.
///
/// `"60/90 min"` gives `[60, 90]`, `"2 x 45 min"` gives `[2, 45]` filtered to
/// plausible session lengths (at least 10 minutes), so `[45]`.
pub fn parse_durations(duration: &str) -> Durations {
    let mut durations: Durations = duration
        .split(|c: char| !c.is_ascii_digit())
        .filter_map(|digits| digits.parse::<u32>().ok())
        .filter(|&minutes| minutes >= 10)
        .collect();

    durations.sort_unstable();
    durations.dedup();

    durations
}

/// A duration bracket and how many services start in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationBucket {
    /// Lower bound in minutes, inclusive
    pub min: u32,

    /// Upper bound in minutes, exclusive; `None` for the open-ended bracket
    pub max: Option<u32>,

    /// Services whose shortest session falls in the bracket
    pub count: usize,
}

/// Bracket boundaries for [`Catalog::duration_buckets`], in minutes.
const DURATION_BUCKET_BOUNDS: [u32; 3] = [60, 90, 120];

impl Catalog<SpaService> {
    /// Services whose shortest session fits in `max_minutes`.
    pub fn by_duration(&self, max_minutes: u32) -> Vec<&SpaService> {
        self.filter(|service| {
            service
                .shortest_duration()
                .is_some_and(|minutes| minutes <= max_minutes)
        })
    }

    /// Services whose whole price range lies within `[min, max]`.
    pub fn by_price_range(&self, min: u64, max: u64) -> Vec<&SpaService> {
        self.filter(|service| {
            service
                .price_range
                .is_some_and(|range| range.within(min, max))
        })
    }

    /// Services with a feature containing `feature`, ignoring case.
    pub fn by_feature(&self, feature: &str) -> Vec<&SpaService> {
        let needle = feature.to_lowercase();

        self.filter(|service| service.has_feature(&needle))
    }

    /// Up to `limit` promoted services, topped up with the rest in order.
    pub fn featured(&self, limit: usize) -> Vec<&SpaService> {
        let (mut featured, rest): (Vec<&SpaService>, Vec<&SpaService>) =
            self.iter().partition(|service| service.featured);

        featured.truncate(limit);

        let missing = limit.saturating_sub(featured.len());
        featured.extend(rest.into_iter().take(missing));

        featured
    }

    /// Duration brackets with counts, keyed on each service's shortest session.
    pub fn duration_buckets(&self) -> Vec<DurationBucket> {
        let mut lower = 0;
        let mut buckets = Vec::with_capacity(DURATION_BUCKET_BOUNDS.len() + 1);

        for bound in DURATION_BUCKET_BOUNDS
            .iter()
            .copied()
            .map(Some)
            .chain([None])
        {
            let count = self
                .iter()
                .filter_map(SpaService::shortest_duration)
                .filter(|&minutes| minutes >= lower && bound.is_none_or(|upper| minutes < upper))
                .count();

            buckets.push(DurationBucket {
                min: lower,
                max: bound,
                count,
            });

            lower = bound.unwrap_or(lower);
        }

        buckets
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::catalog::CatalogError;

    use super::*;

    fn service(id: &str, duration: &str, price: Option<(u64, u64)>, featured: bool) -> SpaService {
        SpaService {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            category: "Massage".to_string(),
            duration: Some(duration.to_string()),
            durations: parse_durations(duration),
            price_range: price.map(|(min, max)| PriceRange { min, max }),
            features: vec!["Aromatherapy oils".to_string()],
            featured,
        }
    }

    fn catalog() -> Result<Catalog<SpaService>, CatalogError> {
        Catalog::new(vec![
            service("express", "30 min", Some((300_000, 300_000)), false),
            service("classic", "60/90 min", Some((500_000, 700_000)), true),
            service("ritual", "120 min", Some((1_200_000, 1_200_000)), true),
            service("sauna", "90 min", None, false),
        ])
    }

    fn ids(services: &[&SpaService]) -> Vec<String> {
        services.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn parses_all_session_lengths() {
        assert_eq!(parse_durations("60/90 min").as_slice(), [60, 90]);
        assert_eq!(parse_durations("90, 60 minutes").as_slice(), [60, 90]);
        assert_eq!(parse_durations("2 x 45 min").as_slice(), [45]);
        assert!(parse_durations("by arrangement").is_empty());
    }

    #[test]
    fn by_duration_uses_shortest_session() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(ids(&catalog.by_duration(60)), ["express", "classic"]);

        Ok(())
    }

    #[test]
    fn by_price_range_requires_whole_range_inside() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(ids(&catalog.by_price_range(0, 600_000)), ["express"]);
        assert_eq!(
            ids(&catalog.by_price_range(0, 700_000)),
            ["express", "classic"]
        );

        Ok(())
    }

    #[test]
    fn featured_lists_promoted_first() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(ids(&catalog.featured(3)), ["classic", "ritual", "express"]);

        Ok(())
    }

    #[test]
    fn duration_buckets_are_half_open() -> TestResult {
        let catalog = catalog()?;

        let counts: Vec<_> = catalog
            .duration_buckets()
            .iter()
            .map(|bucket| bucket.count)
            .collect();

        assert_eq!(counts, [1, 1, 1, 1]);

        Ok(())
    }

    #[test]
    fn by_feature_ignores_case() -> TestResult {
        let catalog = catalog()?;

        assert_eq!(catalog.by_feature("AROMA").len(), 4);

        Ok(())
    }
}
