#[cfg(test)]
mod comparison_scenarios {
    use std::collections::HashMap;
    use std::sync::Arc;

    use approx::assert_abs_diff_eq;
    use benchmark_core::{
        BenchmarkData, CompanyMetrics, FundingStage, MetricDistribution, PerformanceCategory,
    };
    use chrono::{TimeZone, Utc};

    use crate::cache::{ComparisonCache, InMemoryComparisonCache};
    use crate::comparison::{ComparisonAggregator, ComparisonOptions};
    use crate::config::BenchmarkingConfig;
    use crate::scoring::MetricWeights;

    fn dist(min: f64, p25: f64, median: f64, p75: f64, p90: f64, max: f64) -> MetricDistribution {
        MetricDistribution {
            min,
            p25,
            median,
            p75,
            p90,
            max,
            mean: median,
            std_dev: (p75 - p25) / 1.35,
            sample_size: 120,
        }
    }

    fn saas_benchmark() -> BenchmarkData {
        let mut metrics = HashMap::new();
        metrics.insert(
            "arr".to_string(),
            dist(500_000.0, 1_000_000.0, 1_500_000.0, 3_000_000.0, 5_000_000.0, 10_000_000.0),
        );
        metrics.insert("growth_rate".to_string(), dist(0.0, 50.0, 100.0, 180.0, 250.0, 500.0));
        metrics.insert("gross_margin".to_string(), dist(0.3, 0.6, 0.72, 0.8, 0.85, 0.95));
        metrics.insert("customers".to_string(), dist(5.0, 30.0, 80.0, 200.0, 400.0, 2_000.0));
        metrics.insert("churn_rate".to_string(), dist(0.005, 0.02, 0.04, 0.07, 0.1, 0.25));
        metrics.insert("ltv_cac_ratio".to_string(), dist(0.5, 2.0, 3.0, 4.5, 6.0, 12.0));
        metrics.insert("team_size".to_string(), dist(3.0, 10.0, 20.0, 35.0, 60.0, 150.0));
        metrics.insert(
            "total_raised".to_string(),
            dist(500_000.0, 3_000_000.0, 8_000_000.0, 15_000_000.0, 25_000_000.0, 60_000_000.0),
        );

        BenchmarkData {
            sector: "SaaS".to_string(),
            sub_sector: Some("B2B".to_string()),
            stage: Some(FundingStage::SeriesA),
            geography: None,
            sample_size: 120,
            metrics,
            last_updated: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            data_source: "sector survey".to_string(),
            confidence: 0.85,
        }
    }

    fn median_company() -> CompanyMetrics {
        let mut m = CompanyMetrics::default();
        m.revenue.arr = Some(1_500_000.0);
        m.revenue.growth_rate = Some(100.0);
        m.revenue.gross_margin = Some(0.72);
        m.traction.customers = Some(80.0);
        m.traction.churn_rate = Some(0.04);
        m.traction.ltv_cac_ratio = Some(3.0);
        m.team.size = Some(20.0);
        m.funding.total_raised = Some(8_000_000.0);
        m
    }

    #[test]
    fn median_company_scores_fifty() {
        let aggregator = ComparisonAggregator::default().without_cache();
        let result = aggregator
            .compare(&median_company(), Some(&saas_benchmark()), &ComparisonOptions::default())
            .unwrap();

        assert_eq!(result.comparisons.len(), 8);
        assert_eq!(result.percentile_rankings.len(), 8);
        assert_abs_diff_eq!(result.overall_score, 50.0, epsilon = 0.1);
        assert_eq!(result.performance_category, PerformanceCategory::Average);
        for c in &result.comparisons {
            assert_abs_diff_eq!(c.percentile, 50.0, epsilon = 0.1);
        }
    }

    #[test]
    fn worked_example_percentile_and_context() {
        let mut metrics = CompanyMetrics::default();
        metrics.revenue.arr = Some(2_000_000.0);

        let result = ComparisonAggregator::default()
            .without_cache()
            .compare(&metrics, Some(&saas_benchmark()), &ComparisonOptions::default())
            .unwrap();

        assert_eq!(result.comparisons.len(), 1);
        let arr = &result.comparisons[0];
        assert_eq!(arr.metric, "arr");
        assert_abs_diff_eq!(arr.percentile, 58.3, epsilon = 1e-9);
        assert_eq!(arr.sector_median, 1_500_000.0);
        assert!(arr.context.starts_with("Based on 120 SaaS companies at Series A stage"));
        assert!(arr.context.contains("58.3th percentile"));
        // only ARR present, so the renormalized score equals its percentile
        assert_abs_diff_eq!(result.overall_score, 58.3, epsilon = 1e-9);
    }

    #[test]
    fn comparisons_ordered_by_distance_from_median() {
        let mut metrics = median_company();
        metrics.revenue.arr = Some(9_000_000.0); // far above
        metrics.traction.churn_rate = Some(0.09); // well below (inverted)
        metrics.team.size = Some(25.0); // slightly above

        let result = ComparisonAggregator::default()
            .without_cache()
            .compare(&metrics, Some(&saas_benchmark()), &ComparisonOptions::default())
            .unwrap();

        let order: Vec<&str> = result.comparisons.iter().map(|c| c.metric.as_str()).collect();
        assert_eq!(order[0], "arr");
        assert_eq!(order[1], "churn_rate");
        assert_eq!(order[2], "team_size");
        // the remaining median metrics keep vocabulary order
        assert_eq!(
            &order[3..],
            &["growth_rate", "gross_margin", "customers", "ltv_cac_ratio", "total_raised"]
        );
    }

    #[test]
    fn summary_cites_strengths_and_weaknesses() {
        let mut metrics = median_company();
        metrics.revenue.arr = Some(9_000_000.0);
        metrics.revenue.growth_rate = Some(300.0);
        metrics.traction.churn_rate = Some(0.2);

        let result = ComparisonAggregator::default()
            .without_cache()
            .compare(&metrics, Some(&saas_benchmark()), &ComparisonOptions::default())
            .unwrap();

        assert!(result.summary.contains("Strengths: ARR"));
        assert!(result.summary.contains("Growth Rate"));
        assert!(result.summary.contains("Areas for improvement: Churn Rate"));

        let churn = result.comparisons.iter().find(|c| c.metric == "churn_rate").unwrap();
        assert!(churn.percentile <= 10.0);
        assert!(churn.recommendation.as_deref().unwrap().starts_with("Urgent: "));
    }

    #[test]
    fn recommendations_can_be_disabled() {
        let options = ComparisonOptions {
            include_recommendations: false,
            ..ComparisonOptions::default()
        };
        let result = ComparisonAggregator::default()
            .without_cache()
            .compare(&median_company(), Some(&saas_benchmark()), &options)
            .unwrap();
        assert!(result.comparisons.iter().all(|c| c.recommendation.is_none()));
    }

    #[test]
    fn no_overlap_yields_zero_score() {
        let mut benchmark = saas_benchmark();
        benchmark.metrics.clear();
        let result = ComparisonAggregator::default()
            .without_cache()
            .compare(&median_company(), Some(&benchmark), &ComparisonOptions::default())
            .unwrap();
        assert!(result.comparisons.is_empty());
        assert_eq!(result.overall_score, 0.0);
        assert_eq!(result.performance_category, PerformanceCategory::Concerning);
        assert!(result.summary.starts_with("No tracked metrics"));
    }

    #[test]
    fn cached_results_are_identical() {
        let cache = Arc::new(InMemoryComparisonCache::new(10));
        let aggregator = ComparisonAggregator::default().with_cache(cache.clone());
        let benchmark = saas_benchmark();
        let options = ComparisonOptions::default();

        let first = aggregator.compare(&median_company(), Some(&benchmark), &options).unwrap();
        assert_eq!(cache.len(), 1);
        let second = aggregator.compare(&median_company(), Some(&benchmark), &options).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn differently_weighted_aggregators_do_not_share_results() {
        let shared = Arc::new(InMemoryComparisonCache::new(10));
        let default_weights = ComparisonAggregator::default().with_cache(shared.clone());
        let ignores_arr = BenchmarkingConfig {
            weights: MetricWeights::default().with_weight("arr", 0.0),
            ..BenchmarkingConfig::default()
        };
        let without_arr = ComparisonAggregator::new(ignores_arr.clone()).with_cache(shared.clone());
        let uncached = ComparisonAggregator::new(ignores_arr).without_cache();

        // far above median ARR, well below median headcount
        let mut metrics = CompanyMetrics::default();
        metrics.revenue.arr = Some(9_000_000.0);
        metrics.team.size = Some(5.0);
        let benchmark = saas_benchmark();
        let options = ComparisonOptions::default();

        let a = default_weights.compare(&metrics, Some(&benchmark), &options).unwrap();
        let b = without_arr.compare(&metrics, Some(&benchmark), &options).unwrap();
        let expected = uncached.compare(&metrics, Some(&benchmark), &options).unwrap();

        assert_eq!(b.overall_score, expected.overall_score);
        assert!(a.overall_score > 75.0);
        assert!(b.overall_score < 25.0);
        assert_eq!(shared.len(), 2);
    }

    #[test]
    fn opting_out_skips_the_cache() {
        let cache = Arc::new(InMemoryComparisonCache::new(10));
        let aggregator = ComparisonAggregator::default().with_cache(cache.clone());
        let options = ComparisonOptions {
            use_cache: false,
            ..ComparisonOptions::default()
        };
        aggregator
            .compare(&median_company(), Some(&saas_benchmark()), &options)
            .unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn cache_bound_holds_through_aggregator() {
        let config = BenchmarkingConfig {
            max_cache_size: 3,
            ..BenchmarkingConfig::default()
        };
        let aggregator = ComparisonAggregator::new(config);
        let benchmark = saas_benchmark();

        for i in 0..10 {
            let mut metrics = median_company();
            metrics.revenue.arr = Some(1_000_000.0 + i as f64 * 100_000.0);
            aggregator
                .compare(&metrics, Some(&benchmark), &ComparisonOptions::default())
                .unwrap();
            let size = aggregator.cache().map(|c| c.len()).unwrap_or(0);
            assert!(size <= 3);
        }
    }

    #[test]
    fn result_serializes_for_downstream_consumers() {
        let result = ComparisonAggregator::default()
            .without_cache()
            .compare(&median_company(), Some(&saas_benchmark()), &ComparisonOptions::default())
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["performance_category"], "average");
        assert!(json["percentile_rankings"]["churn_rate"]["percentile"].is_number());
    }
}
