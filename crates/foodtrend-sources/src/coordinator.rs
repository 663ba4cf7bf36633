//! Concurrent fan-out over all harvesters with per-source failure isolation.

use std::time::Duration;

use foodtrend_core::{Corpus, Record};
use futures::future::join_all;

use crate::error::SourceError;
use crate::harvester::Harvester;

/// Run every harvester concurrently and merge the results.
///
/// Each harvester runs on its own task under `per_source_timeout`. An error,
/// panic, or timeout is logged and that source contributes an empty `Vec`;
/// it never affects the other sources. The call returns only after every
/// task has finished, so the wait is bounded by `per_source_timeout`.
///
/// An all-empty corpus is a valid return value. Deciding whether zero
/// records is fatal is left to the caller.
pub async fn collect_all(harvesters: Vec<Harvester>, per_source_timeout: Duration) -> Corpus {
    let mut corpus = Corpus::with_sources(harvesters.iter().map(|h| h.name().to_string()));

    let tasks: Vec<_> = harvesters
        .iter()
        .map(|harvester| {
            let fut = harvester.harvest();
            tokio::spawn(async move {
                match tokio::time::timeout(per_source_timeout, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(SourceError::TimedOut {
                        secs: per_source_timeout.as_secs(),
                    }),
                }
            })
        })
        .collect();

    let outcomes = join_all(tasks).await;

    for (harvester, joined) in harvesters.iter().zip(outcomes) {
        let outcome = joined.unwrap_or_else(|e| Err(SourceError::Panicked(e.to_string())));
        let records: Vec<Record> = match outcome {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    source = harvester.name(),
                    error = %e,
                    "harvester failed; source contributes no records"
                );
                Vec::new()
            }
        };
        corpus.append(harvester.name(), records);
    }

    let per_source = corpus
        .counts()
        .map(|(name, count)| format!("{name}={count}"))
        .collect::<Vec<_>>()
        .join(", ");
    tracing::info!(
        sources = %per_source,
        total = corpus.total(),
        "collection complete"
    );

    corpus
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(platform: &str, n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new(platform).with("title", format!("item {i}")))
            .collect()
    }

    fn ok_harvester(name: &'static str, n: usize) -> Harvester {
        Harvester::new(name, move || async move { Ok::<_, SourceError>(records(name, n)) })
    }

    fn failing_harvester(name: &'static str) -> Harvester {
        Harvester::new(name, || async {
            Err::<Vec<Record>, _>(SourceError::MissingCredentials("TEST_KEY"))
        })
    }

    async fn explode() -> Result<Vec<Record>, SourceError> {
        panic!("scraper exploded")
    }

    #[tokio::test]
    async fn mixed_outcomes_degrade_only_the_failed_source() {
        let corpus = collect_all(
            vec![
                ok_harvester("a", 5),
                failing_harvester("b"),
                ok_harvester("c", 3),
            ],
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(corpus.get("a").map(<[Record]>::len), Some(5));
        assert_eq!(corpus.get("b").map(<[Record]>::len), Some(0));
        assert_eq!(corpus.get("c").map(<[Record]>::len), Some(3));
        assert_eq!(corpus.total(), 8);
    }

    #[tokio::test]
    async fn panicking_harvester_is_isolated() {
        let corpus = collect_all(
            vec![
                Harvester::new("boom", explode),
                ok_harvester("fine", 2),
            ],
            Duration::from_secs(5),
        )
        .await;

        assert!(corpus.contains_source("boom"));
        assert_eq!(corpus.get("boom").map(<[Record]>::len), Some(0));
        assert_eq!(corpus.get("fine").map(<[Record]>::len), Some(2));
    }

    fn panic_before_future() -> std::future::Ready<Result<Vec<Record>, SourceError>> {
        panic!("producer failed before returning a future")
    }

    #[tokio::test]
    async fn producer_panicking_synchronously_is_isolated() {
        let corpus = tokio::spawn(collect_all(
            vec![
                Harvester::new("boom", panic_before_future),
                ok_harvester("fine", 1),
            ],
            Duration::from_secs(5),
        ))
        .await
        .expect("collect_all never panics");

        assert_eq!(corpus.get("boom").map(<[Record]>::len), Some(0));
        assert_eq!(corpus.get("fine").map(<[Record]>::len), Some(1));
        assert_eq!(corpus.total(), 1);
    }

    #[tokio::test]
    async fn slow_harvester_times_out_without_blocking_others() {
        let started = std::time::Instant::now();
        let corpus = collect_all(
            vec![
                Harvester::new("slow", || async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok::<_, SourceError>(records("slow", 1))
                }),
                ok_harvester("quick", 4),
            ],
            Duration::from_millis(100),
        )
        .await;

        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(corpus.get("slow").map(<[Record]>::len), Some(0));
        assert_eq!(corpus.get("quick").map(<[Record]>::len), Some(4));
    }

    #[tokio::test]
    async fn all_sources_failing_returns_empty_corpus_with_every_key() {
        let corpus = collect_all(
            vec![failing_harvester("x"), failing_harvester("y")],
            Duration::from_secs(5),
        )
        .await;

        assert!(corpus.is_empty());
        assert_eq!(corpus.source_names().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[tokio::test]
    async fn every_failure_subset_keeps_successful_sources_intact() {
        let sizes = [2usize, 4, 1];
        let names = ["s0", "s1", "s2"];
        for mask in 0u8..8 {
            let harvesters = names
                .into_iter()
                .zip(sizes)
                .enumerate()
                .map(|(i, (name, n))| {
                    if mask & (1 << i) == 0 {
                        ok_harvester(name, n)
                    } else {
                        failing_harvester(name)
                    }
                })
                .collect();

            let corpus = collect_all(harvesters, Duration::from_secs(5)).await;

            for (i, (name, n)) in names.into_iter().zip(sizes).enumerate() {
                let expected = if mask & (1 << i) == 0 { n } else { 0 };
                assert_eq!(
                    corpus.get(name).map(<[Record]>::len),
                    Some(expected),
                    "mask {mask:03b}, source {name}"
                );
            }
        }
    }

    #[tokio::test]
    async fn no_harvesters_yields_empty_corpus() {
        let corpus = collect_all(Vec::new(), Duration::from_secs(1)).await;
        assert!(corpus.is_empty());
        assert_eq!(corpus.source_names().count(), 0);
    }
}
