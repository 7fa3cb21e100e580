//! Filtering and sorting candidate collections by score.
//!
//! [`filter`] and friends score a collection on the calling thread and stop
//! early once `max_inners` matches were collected. [`Filter::run`] scores a
//! shared collection in parallel on a background thread and can be killed
//! through its [`FilterControl`].

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use rayon::prelude::*;

use crate::fuzzy_matcher::query::{PreparedQuery, QueryCache};
use crate::fuzzy_matcher::util::fill_subject;
use crate::fuzzy_matcher::{ScoreType, score_subject};
use crate::options::FilterOptions;

/// Anything that can be filtered
pub trait FilterItem {
    /// Text the item is scored on
    fn text(&self) -> Cow<'_, str>;
}

impl<T: AsRef<str> + ?Sized> FilterItem for T {
    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_ref())
    }
}

/// An item with its score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scored<T> {
    /// The matched item
    pub item: T,
    /// Its score, always positive
    pub score: ScoreType,
}

/// Keep the candidates matching `query`, best first
pub fn filter<I, T>(candidates: I, query: &str, options: &FilterOptions) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: FilterItem,
{
    filter_scored(candidates, query, options)
        .into_iter()
        .map(|scored| scored.item)
        .collect()
}

/// Same as [`filter`], keeping the scores
pub fn filter_scored<I, T>(candidates: I, query: &str, options: &FilterOptions) -> Vec<Scored<T>>
where
    I: IntoIterator<Item = T>,
    T: FilterItem,
{
    filter_with_cache(candidates, query, options, &mut QueryCache::new())
}

/// Same as [`filter_scored`], preparing the query through `cache`
///
/// Sessions filtering repeatedly with the same query reuse its prepared form.
pub fn filter_with_cache<I, T>(
    candidates: I,
    query: &str,
    options: &FilterOptions,
    cache: &mut QueryCache,
) -> Vec<Scored<T>>
where
    I: IntoIterator<Item = T>,
    T: FilterItem,
{
    let Some(prepared) = cache.get(query, &options.scoring) else {
        return Vec::new();
    };

    trace!("filter start, query: {:?}", query);

    let mut subject = Vec::new();
    let mut subject_lw = Vec::new();
    let mut results = Vec::new();

    for item in candidates {
        let score = {
            let text = item.text();
            if text.is_empty() {
                continue;
            }
            fill_subject(&text, &mut subject, &mut subject_lw);
            score_subject(&subject, &subject_lw, &prepared, &options.scoring)
        };

        if score > 0 {
            results.push(Scored { item, score });
            if options.max_inners == Some(results.len()) {
                debug!("filter reached max inners: {}", results.len());
                break;
            }
        }
    }

    sort_results(&mut results, options.max_results);
    trace!("filter stop, total matched: {}", results.len());
    results
}

/// Stable sort by descending score, then truncate
fn sort_results<T>(results: &mut Vec<Scored<T>>, max_results: Option<usize>) {
    results.sort_by(|a, b| b.score.cmp(&a.score));
    if let Some(max) = max_results {
        results.truncate(max);
    }
}

//==============================================================================
/// Control handle for a running filter pass.
///
/// Dropping the handle kills the pass.
pub struct FilterControl {
    stopped: Arc<AtomicBool>,
    interrupt: Arc<AtomicBool>,
    processed: Arc<AtomicUsize>,
    matched: Arc<AtomicUsize>,
}

impl Default for FilterControl {
    fn default() -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(true)),
            interrupt: Arc::new(AtomicBool::new(false)),
            processed: Default::default(),
            matched: Default::default(),
        }
    }
}

impl FilterControl {
    /// Returns the number of items that have been processed so far.
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }

    /// Returns the number of items that have matched so far.
    pub fn matched(&self) -> usize {
        self.matched.load(Ordering::Relaxed)
    }

    /// Signals the pass to stop, its results are dropped.
    pub fn kill(&mut self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }

    /// Returns true if the pass has stopped (either completed or killed).
    pub fn stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

impl Drop for FilterControl {
    fn drop(&mut self) {
        self.kill();
    }
}

//==============================================================================
/// Background filter over a shared collection.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    options: FilterOptions,
}

impl Filter {
    /// Creates a filter scoring with `options`
    pub fn new(options: FilterOptions) -> Self {
        Self { options }
    }

    /// Options used by the filter
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Scores `items` against `query` in parallel on a background thread.
    ///
    /// The callback is invoked with the sorted matches once the pass is
    /// complete, unless it was killed first.
    pub fn run<T, C>(&self, query: &str, items: Arc<Vec<T>>, callback: C) -> FilterControl
    where
        T: FilterItem + Clone + Send + Sync + 'static,
        C: FnOnce(Vec<Scored<T>>) + Send + 'static,
    {
        let prepared = PreparedQuery::new(query, &self.options.scoring);
        let options = self.options.clone();

        let stopped = Arc::new(AtomicBool::new(false));
        let stopped_clone = stopped.clone();
        let interrupt = Arc::new(AtomicBool::new(false));
        let interrupt_clone = interrupt.clone();
        let processed = Arc::new(AtomicUsize::new(0));
        let processed_clone = processed.clone();
        let matched = Arc::new(AtomicUsize::new(0));
        let matched_clone = matched.clone();

        thread::spawn(move || {
            let mut matched_items = Vec::new();

            if let Some(prepared) = prepared {
                trace!("filter start, total: {}", items.len());
                let result: Result<Vec<_>, _> = items
                    .par_iter()
                    .map_init(
                        || (Vec::new(), Vec::new()),
                        |(subject, subject_lw), item| {
                            processed.fetch_add(1, Ordering::Relaxed);
                            if interrupt.load(Ordering::Relaxed) {
                                stopped.store(true, Ordering::Relaxed);
                                return Some(Err("filter killed"));
                            }

                            let text = item.text();
                            if text.is_empty() {
                                return None;
                            }
                            fill_subject(&text, subject, subject_lw);
                            let score = score_subject(subject, subject_lw, &prepared, &options.scoring);
                            (score > 0).then(|| {
                                matched.fetch_add(1, Ordering::Relaxed);
                                Ok(Scored {
                                    item: item.clone(),
                                    score,
                                })
                            })
                        },
                    )
                    .flatten()
                    .collect();

                match result {
                    Ok(items) => {
                        matched_items = items;
                        if let Some(max) = options.max_inners {
                            matched_items.truncate(max);
                        }
                        sort_results(&mut matched_items, options.max_results);
                        trace!("filter stop, total matched: {}", matched_items.len());
                    }
                    Err(e) => debug!("{}", e),
                }
            }

            if !interrupt.load(Ordering::Relaxed) {
                callback(matched_items);
            }
            stopped.store(true, Ordering::Relaxed);
        });

        FilterControl {
            stopped: stopped_clone,
            interrupt: interrupt_clone,
            matched: matched_clone,
            processed: processed_clone,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
mod tests {
    use super::*;
    use crate::options::{FilterOptionsBuilder, ScoringOptionsBuilder};
    use std::sync::mpsc;
    use std::time::Duration;

    fn opts() -> FilterOptions {
        FilterOptionsBuilder::default()
            .scoring(ScoringOptionsBuilder::default().path_separator('/').build().unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_filter_order() {
        assert_eq!(filter(["Gruntfile", "filter", "bile"], "file", &opts()), ["Gruntfile", "filter"]);
    }

    #[test]
    fn test_filter_empty() {
        assert!(filter(["abc"], "", &opts()).is_empty());
        assert!(filter(Vec::<String>::new(), "abc", &opts()).is_empty());
        assert_eq!(filter(["", "abc"], "abc", &opts()), ["abc"]);
    }

    #[test]
    fn test_filter_owned_items() {
        let items = vec![String::from("bar/a"), String::from("a/bar")];
        let scored = filter_scored(items, "bar", &opts());
        assert_eq!(scored[0].item, "a/bar");
        assert!(scored[0].score > scored[1].score);
    }

    #[test]
    fn test_max_results_after_sort() {
        let mut options = opts();
        options.max_results = Some(1);
        assert_eq!(filter(["filter", "Gruntfile", "bile"], "file", &options), ["Gruntfile"]);
    }

    #[test]
    fn test_max_inners_before_sort() {
        let mut options = opts();
        options.max_inners = Some(1);
        assert_eq!(filter(["filter", "Gruntfile", "bile"], "file", &options), ["filter"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let scored = filter_scored(["a/x", "b/x", "c/x"], "x", &opts());
        assert_eq!(scored.iter().map(|s| s.item).collect::<Vec<_>>(), ["a/x", "b/x", "c/x"]);
    }

    #[test]
    fn test_cache_reuse() {
        let mut cache = QueryCache::new();
        let first = filter_with_cache(["Gruntfile", "filter"], "file", &opts(), &mut cache);
        let second = filter_with_cache(["Gruntfile", "filter"], "file", &opts(), &mut cache);
        assert_eq!(first, second);
    }

    #[test]
    fn test_run_matches_sequential() {
        let items: Arc<Vec<String>> = Arc::new((0..2000).map(|i| format!("dir{}/file{}.rs", i % 7, i)).collect());
        let expected = filter_scored(items.iter().cloned(), "f1.rs", &opts());

        let (tx, rx) = mpsc::channel();
        let control = Filter::new(opts()).run("f1.rs", items.clone(), move |matches| {
            tx.send(matches).unwrap();
        });
        let matches = rx.recv_timeout(Duration::from_secs(30)).unwrap();

        assert_eq!(matches, expected);
        while !control.stopped() {
            thread::yield_now();
        }
        assert_eq!(control.processed(), 2000);
        assert_eq!(control.matched(), expected.len());
    }

    #[derive(Clone)]
    struct Gated {
        text: &'static str,
        release: Arc<AtomicBool>,
    }

    impl FilterItem for Gated {
        fn text(&self) -> Cow<'_, str> {
            while !self.release.load(Ordering::SeqCst) {
                thread::yield_now();
            }
            Cow::Borrowed(self.text)
        }
    }

    #[test]
    fn test_kill_skips_callback() {
        let release = Arc::new(AtomicBool::new(false));
        let items: Arc<Vec<Gated>> = Arc::new(
            (0..10_000)
                .map(|_| Gated {
                    text: "file",
                    release: release.clone(),
                })
                .collect(),
        );

        let called = Arc::new(AtomicBool::new(false));
        let called_clone = called.clone();
        let mut control = Filter::new(opts()).run("file", items, move |_| {
            called_clone.store(true, Ordering::Relaxed);
        });

        control.kill();
        release.store(true, Ordering::SeqCst);

        while !control.stopped() {
            thread::yield_now();
        }
        assert!(!called.load(Ordering::Relaxed));
    }
}
