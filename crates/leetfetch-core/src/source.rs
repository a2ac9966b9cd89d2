//! Catalog and problem fetching over GraphQL, with a REST snapshot fallback
//! for the catalog and a disk cache in front of both.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::catalog::{CatalogEntry, Difficulty, ProblemDetail};
use crate::error::FetchError;
use crate::settings::Settings;
use crate::transport::Transport;

pub const CATALOG_CACHE_KEY: &str = "problem_list";

const LIST_QUERY: &str = r"
query problemsetQuestionList($categorySlug: String, $limit: Int, $skip: Int, $filters: QuestionListFilterInput) {
  problemsetQuestionList(categorySlug: $categorySlug, limit: $limit, skip: $skip, filters: $filters) {
    total: totalNum
    questions: data {
      questionId
      questionFrontendId
      title
      titleSlug
      difficulty
      paidOnly
    }
  }
}
";

const DETAIL_QUERY: &str = r"
query question($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    questionFrontendId
    title
    titleSlug
    content
    difficulty
    isPaidOnly
    topicTags {
      name
      slug
    }
  }
}
";

/// Cache key for a single problem's detail record.
pub fn detail_cache_key(slug: &str) -> String {
    format!("question_{slug}")
}

pub struct ProblemSource<'a> {
    transport: &'a dyn Transport,
    cache: &'a Cache,
    settings: &'a Settings,
}

impl<'a> ProblemSource<'a> {
    pub fn new(transport: &'a dyn Transport, cache: &'a Cache, settings: &'a Settings) -> Self {
        Self {
            transport,
            cache,
            settings,
        }
    }

    /// Fetch the full catalog: cache first, then the paginated query, then
    /// the snapshot endpoint. The cache is written only on full success, so
    /// a failed fetch never disturbs an existing record.
    pub fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, FetchError> {
        if let Some(entries) = self
            .cache
            .load::<Vec<CatalogEntry>>(CATALOG_CACHE_KEY, self.settings.catalog_ttl)
        {
            debug!(count = entries.len(), "catalog served from cache");
            return Ok(entries);
        }
        let entries = match self.fetch_catalog_pages() {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "paginated catalog fetch failed, trying snapshot endpoint");
                self.fetch_catalog_snapshot()?
            }
        };
        if let Err(err) = self.cache.save(CATALOG_CACHE_KEY, &entries) {
            warn!(error = %err, "failed to cache catalog");
        }
        Ok(entries)
    }

    fn fetch_catalog_pages(&self) -> Result<Vec<CatalogEntry>, FetchError> {
        let mut entries: Vec<CatalogEntry> = Vec::new();
        let mut skip = 0usize;
        loop {
            let variables = json!({
                "categorySlug": "",
                "skip": skip,
                "limit": self.settings.page_size,
                "filters": {},
            });
            let data = self.transport.graphql(LIST_QUERY, variables)?;
            let page: ListData = decode(data)?;
            let fetched = page.problemset.questions.len();
            debug!(skip, fetched, total = page.problemset.total, "catalog page fetched");
            entries.extend(page.problemset.questions);
            skip += self.settings.page_size;
            // An empty page terminates the loop even when the reported
            // total is off.
            if entries.len() >= page.problemset.total || fetched == 0 {
                return Ok(entries);
            }
        }
    }

    fn fetch_catalog_snapshot(&self) -> Result<Vec<CatalogEntry>, FetchError> {
        let body = self.transport.get_json(&self.settings.snapshot_url)?;
        let snapshot: Snapshot = decode(body)?;
        Ok(snapshot
            .stat_status_pairs
            .into_iter()
            .map(CatalogEntry::from)
            .collect())
    }

    /// Fetch one problem's detail by slug, preferring the cache. There is no
    /// fallback path for details; errors propagate directly.
    pub fn fetch_detail(&self, slug: &str) -> Result<ProblemDetail, FetchError> {
        let key = detail_cache_key(slug);
        if let Some(detail) = self
            .cache
            .load::<ProblemDetail>(&key, self.settings.detail_ttl)
        {
            debug!(slug, "problem detail served from cache");
            return Ok(detail);
        }
        let data = self
            .transport
            .graphql(DETAIL_QUERY, json!({ "titleSlug": slug }))?;
        let payload: DetailData = decode(data)?;
        let detail = payload
            .question
            .ok_or_else(|| FetchError::Endpoint(format!("no problem with slug {slug:?}")))?;
        if let Err(err) = self.cache.save(&key, &detail) {
            warn!(error = %err, slug, "failed to cache problem detail");
        }
        Ok(detail)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value)
        .map_err(|err| FetchError::Endpoint(format!("unexpected response shape: {err}")))
}

#[derive(Deserialize)]
struct ListData {
    #[serde(rename = "problemsetQuestionList")]
    problemset: ListPage,
}

// The list query aliases `totalNum` to `total` and `data` to `questions`.
#[derive(Deserialize)]
struct ListPage {
    total: usize,
    questions: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct DetailData {
    question: Option<ProblemDetail>,
}

#[derive(Deserialize)]
struct Snapshot {
    #[serde(default)]
    stat_status_pairs: Vec<SnapshotEntry>,
}

#[derive(Deserialize)]
struct SnapshotEntry {
    stat: SnapshotStat,
    difficulty: SnapshotDifficulty,
    #[serde(default)]
    paid_only: bool,
}

#[derive(Deserialize)]
struct SnapshotStat {
    #[serde(default)]
    question_id: u64,
    #[serde(default)]
    frontend_question_id: u64,
    #[serde(rename = "question__title", default)]
    title: String,
    #[serde(rename = "question__title_slug", default)]
    slug: String,
}

#[derive(Deserialize)]
struct SnapshotDifficulty {
    #[serde(default)]
    level: i64,
}

impl From<SnapshotEntry> for CatalogEntry {
    fn from(entry: SnapshotEntry) -> Self {
        CatalogEntry {
            id: entry.stat.question_id.to_string(),
            frontend_id: entry.stat.frontend_question_id.to_string(),
            title: entry.stat.title,
            slug: entry.stat.slug,
            difficulty: Difficulty::from_level(entry.difficulty.level),
            paid_only: entry.paid_only,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{self, Resolution};
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Scripted transport: pops one prepared GraphQL response per call and
    /// counts calls, so tests can prove when the network was (not) used.
    #[derive(Default)]
    struct StubTransport {
        graphql: RefCell<VecDeque<Result<Value, FetchError>>>,
        snapshot: RefCell<Option<Result<Value, FetchError>>>,
        graphql_calls: Cell<usize>,
        snapshot_calls: Cell<usize>,
    }

    impl StubTransport {
        fn push_graphql(&self, response: Result<Value, FetchError>) {
            self.graphql.borrow_mut().push_back(response);
        }

        fn set_snapshot(&self, response: Result<Value, FetchError>) {
            *self.snapshot.borrow_mut() = Some(response);
        }
    }

    impl Transport for StubTransport {
        fn graphql(&self, _query: &str, _variables: Value) -> Result<Value, FetchError> {
            self.graphql_calls.set(self.graphql_calls.get() + 1);
            self.graphql
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Network("no scripted response".into())))
        }

        fn get_json(&self, _url: &str) -> Result<Value, FetchError> {
            self.snapshot_calls.set(self.snapshot_calls.get() + 1);
            self.snapshot
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(FetchError::Network("no scripted response".into())))
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        transport: StubTransport,
        cache: Cache,
        settings: Settings,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let cache = Cache::open(dir.path().join("cache")).unwrap();
            let settings = Settings {
                cache_dir: dir.path().join("cache"),
                page_size: 2,
                ..Settings::default()
            };
            Self {
                _dir: dir,
                transport: StubTransport::default(),
                cache,
                settings,
            }
        }

        fn source(&self) -> ProblemSource<'_> {
            ProblemSource::new(&self.transport, &self.cache, &self.settings)
        }
    }

    fn question(frontend_id: &str, title: &str, slug: &str) -> Value {
        json!({
            "questionId": frontend_id,
            "questionFrontendId": frontend_id,
            "title": title,
            "titleSlug": slug,
            "difficulty": "Easy",
            "paidOnly": false,
        })
    }

    fn list_page(total: usize, questions: Vec<Value>) -> Value {
        json!({
            "problemsetQuestionList": {
                "total": total,
                "questions": questions,
            }
        })
    }

    fn detail_payload() -> Value {
        json!({
            "question": {
                "questionId": "1",
                "questionFrontendId": "1",
                "title": "Two Sum",
                "titleSlug": "two-sum",
                "content": "<p>Given an array.</p>",
                "difficulty": "Easy",
                "isPaidOnly": false,
                "topicTags": [{"name": "Array", "slug": "array"}],
            }
        })
    }

    #[test]
    fn pagination_accumulates_until_reported_total() {
        let fx = Fixture::new();
        fx.transport.push_graphql(Ok(list_page(
            3,
            vec![question("1", "Two Sum", "two-sum"), question("2", "Add Two Numbers", "add-two-numbers")],
        )));
        fx.transport
            .push_graphql(Ok(list_page(3, vec![question("3", "Median", "median")])));

        let catalog = fx.source().fetch_catalog().unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(fx.transport.graphql_calls.get(), 2);
        assert_eq!(catalog[2].slug, "median");
    }

    #[test]
    fn empty_page_terminates_even_with_misreported_total() {
        let fx = Fixture::new();
        fx.transport.push_graphql(Ok(list_page(
            100,
            vec![question("1", "Two Sum", "two-sum"), question("2", "Add Two Numbers", "add-two-numbers")],
        )));
        fx.transport.push_graphql(Ok(list_page(100, vec![])));

        let catalog = fx.source().fetch_catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(fx.transport.graphql_calls.get(), 2);
    }

    #[test]
    fn snapshot_fallback_normalizes_difficulty_levels() {
        let fx = Fixture::new();
        fx.transport
            .push_graphql(Err(FetchError::Network("connection refused".into())));
        fx.transport.set_snapshot(Ok(json!({
            "stat_status_pairs": [
                {
                    "stat": {
                        "question_id": 4,
                        "frontend_question_id": 4,
                        "question__title": "Median of Two Sorted Arrays",
                        "question__title_slug": "median-of-two-sorted-arrays",
                    },
                    "difficulty": {"level": 3},
                    "paid_only": false,
                },
                {
                    "stat": {
                        "question_id": 2,
                        "frontend_question_id": 2,
                        "question__title": "Add Two Numbers",
                        "question__title_slug": "add-two-numbers",
                    },
                    "difficulty": {"level": 2},
                    "paid_only": false,
                },
                {
                    "stat": {
                        "question_id": 1,
                        "frontend_question_id": 1,
                        "question__title": "Two Sum",
                        "question__title_slug": "two-sum",
                    },
                    "difficulty": {"level": 1},
                    "paid_only": false,
                },
                {
                    "stat": {
                        "question_id": 9,
                        "frontend_question_id": 9,
                        "question__title": "Mystery",
                        "question__title_slug": "mystery",
                    },
                    "difficulty": {"level": 0},
                    "paid_only": true,
                },
            ]
        })));

        let catalog = fx.source().fetch_catalog().unwrap();
        assert_eq!(fx.transport.snapshot_calls.get(), 1);
        let difficulties: Vec<Difficulty> = catalog.iter().map(|e| e.difficulty).collect();
        assert_eq!(
            difficulties,
            vec![
                Difficulty::Hard,
                Difficulty::Medium,
                Difficulty::Easy,
                Difficulty::Unknown
            ]
        );
        assert_eq!(catalog[3].frontend_id, "9");
        assert!(catalog[3].paid_only);
    }

    #[test]
    fn both_paths_failing_propagates_and_leaves_no_cache_record() {
        let fx = Fixture::new();
        fx.transport
            .push_graphql(Err(FetchError::Network("connection refused".into())));
        fx.transport
            .set_snapshot(Err(FetchError::Endpoint("HTTP 503: down".into())));

        let err = fx.source().fetch_catalog().unwrap_err();
        assert!(matches!(err, FetchError::Endpoint(_)));
        assert_eq!(
            fx.cache
                .load::<Vec<CatalogEntry>>(CATALOG_CACHE_KEY, Duration::from_secs(60)),
            None
        );
    }

    #[test]
    fn second_catalog_fetch_is_served_from_cache() {
        let fx = Fixture::new();
        fx.transport
            .push_graphql(Ok(list_page(1, vec![question("1", "Two Sum", "two-sum")])));

        let first = fx.source().fetch_catalog().unwrap();
        let second = fx.source().fetch_catalog().unwrap();
        assert_eq!(first, second);
        // The queue held one scripted response; a second network fetch
        // would have errored.
        assert_eq!(fx.transport.graphql_calls.get(), 1);
    }

    #[test]
    fn detail_without_question_is_an_endpoint_error() {
        let fx = Fixture::new();
        fx.transport.push_graphql(Ok(json!({"question": null})));
        let err = fx.source().fetch_detail("no-such-slug").unwrap_err();
        assert!(matches!(err, FetchError::Endpoint(msg) if msg.contains("no-such-slug")));
    }

    #[test]
    fn resolve_by_id_then_detail_fetch_hits_network_once() {
        let fx = Fixture::new();
        fx.transport
            .push_graphql(Ok(list_page(1, vec![question("1", "Two Sum", "two-sum")])));
        fx.transport.push_graphql(Ok(detail_payload()));

        let source = fx.source();
        let catalog = source.fetch_catalog().unwrap();
        let slug = match resolver::resolve("1", &catalog) {
            Resolution::Slug(slug) => slug,
            other => panic!("expected slug, got {other:?}"),
        };
        assert_eq!(slug, "two-sum");

        let first = source.fetch_detail(&slug).unwrap();
        assert_eq!(first.title, "Two Sum");
        assert_eq!(fx.transport.graphql_calls.get(), 2);

        // Within the TTL the second read never touches the transport.
        let second = source.fetch_detail(&slug).unwrap();
        assert_eq!(second, first);
        assert_eq!(fx.transport.graphql_calls.get(), 2);
    }
}
