//! Integration tests for the research pipeline.
//!
//! These tests drive the full flow against mocks:
//! 1. Search (paginated Google client over a mock transport)
//! 2. Select sources
//! 3. Build the corpus (extract + normalize, positional)
//! 4. Generate a report
//! 5. Persist and export it

use std::sync::Arc;

use research::{
    build_corpus, is_valid,
    testing::{google_page, MockGenerator, MockTransport},
    ContentExtractor, ExportFormat, ExtractionOutcome, GoogleSearcher, MemoryStore,
    ReportExporter, ReportStore, ResearchSession, Researcher, SearchCredentials, SqliteStore,
    TimeWindow, WebSearcher, MAX_CONTENT_CHARS,
};

const ENDPOINT: &str = "https://search.test/customsearch/v1";

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn google(transport: &MockTransport) -> GoogleSearcher {
    GoogleSearcher::new(
        Arc::new(transport.clone()),
        SearchCredentials::new("key", "cx"),
    )
    .with_endpoint(ENDPOINT)
}

#[tokio::test]
async fn test_corpus_keeps_dead_sources_in_place() {
    let transport = MockTransport::new()
        .with_html(
            "https://a.example/ok",
            "<html><body><p>Hello world</p></body></html>",
        )
        .with_timeout("https://b.example/dead");
    let extractor = ContentExtractor::new(Arc::new(transport));

    let corpus = build_corpus(
        &extractor,
        &urls(&["https://a.example/ok", "https://b.example/dead"]),
    )
    .await;

    assert_eq!(
        corpus.pairs(),
        vec![(0, "Hello world".to_string()), (1, String::new())]
    );
    assert!(matches!(
        corpus.entries[1].outcome,
        ExtractionOutcome::Failed { .. }
    ));
}

#[tokio::test]
async fn test_corpus_length_matches_selection() {
    let transport = MockTransport::new()
        .with_html("https://a.example/", "<html><body><p>A</p></body></html>")
        .with_status("https://c.example/", 404);
    let extractor = ContentExtractor::new(Arc::new(transport.clone()));
    let selection = urls(&[
        "https://a.example/",
        "",
        "javascript:alert(1)",
        "https://a.example/",
        "https://c.example/",
    ]);

    let corpus = build_corpus(&extractor, &selection).await;

    assert_eq!(corpus.len(), selection.len());
    let indexes: Vec<_> = corpus.entries.iter().map(|e| e.index).collect();
    assert_eq!(indexes, vec![0, 1, 2, 3, 4]);
    // Invalid URLs never reach the network
    assert!(transport.requests().iter().all(|r| is_valid(&r.url)));
}

#[tokio::test]
async fn test_oversized_page_is_capped() {
    let body = format!(
        "<html><body><article><p>{}</p></article></body></html>",
        "word ".repeat(30_000)
    );
    let transport = MockTransport::new().with_html("https://big.example/", body);
    let extractor = ContentExtractor::new(Arc::new(transport));

    let corpus = build_corpus(&extractor, &urls(&["https://big.example/"])).await;

    assert_eq!(corpus.entries[0].text.chars().count(), MAX_CONTENT_CHARS - 1);
}

#[tokio::test]
async fn test_end_to_end_research_flow() {
    let transport = MockTransport::new()
        .with_body(ENDPOINT, google_page(0, 10))
        .with_body(ENDPOINT, google_page(10, 10))
        .with_html(
            "https://result.example/0",
            "<html><body><nav>Menu</nav><article><p>Solar adoption grew.</p></article></body></html>",
        )
        .with_timeout("https://result.example/3");
    let generator = MockGenerator::new().with_report("# Executive Summary\n\nSolar grew.");
    let researcher = Researcher::new(
        google(&transport),
        ContentExtractor::new(Arc::new(transport.clone())),
        generator.clone(),
    );
    let mut session = ResearchSession::new("community solar")
        .with_max_results(15)
        .with_time_window(TimeWindow::Month);

    assert_eq!(researcher.search(&mut session).await, 15);
    let search_requests = transport.requests_to(ENDPOINT);
    assert_eq!(search_requests.len(), 2);
    assert_eq!(search_requests[1].query_param("start"), Some("11"));
    assert_eq!(search_requests[0].query_param("dateRestrict"), Some("m1"));

    session.select(3);
    session.select(0);
    let report = researcher
        .generate(&mut session, "Focus on adoption.")
        .await
        .unwrap();

    assert_eq!(report, "# Executive Summary\n\nSolar grew.");
    let call = &generator.calls()[0];
    assert_eq!(call.query, "community solar");
    assert_eq!(call.sources, vec![String::new(), "Solar adoption grew.".to_string()]);
    assert_eq!(
        session.corpus.as_ref().unwrap().render(),
        "Source 1:\n\n\nSource 2:\nSolar adoption grew."
    );

    // Persist
    let store = MemoryStore::new();
    let saved = store.save(&session.to_new_report().unwrap()).await.unwrap();
    assert_eq!(
        saved.sources,
        vec!["https://result.example/3", "https://result.example/0"]
    );
    assert_eq!(store.search("SOLAR").await.unwrap().len(), 1);

    // Export
    let dir = tempfile::tempdir().unwrap();
    let path = ReportExporter::new(dir.path())
        .export(&saved.query, &saved.content, ExportFormat::Txt)
        .unwrap();
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("community_solar_"));
    assert!(std::fs::read_to_string(&path)
        .unwrap()
        .starts_with("Research Report\n\nTopic: community solar\n\n"));
}

#[tokio::test]
async fn test_failed_search_is_observable() {
    let transport = MockTransport::new().with_status(ENDPOINT, 403);
    let searcher = google(&transport);

    assert!(searcher.search("q", 10, TimeWindow::Any).await.is_empty());

    let outcome = searcher.search_detailed("q", 10, TimeWindow::Any).await;
    assert!(outcome.failed());
}

#[tokio::test]
async fn test_sqlite_knowledge_base() {
    let store = SqliteStore::in_memory().await.unwrap();
    let mut session = ResearchSession::new("Heat pumps");
    session.selection.add("https://a.example/");
    session.report = Some("# Heat pumps".to_string());

    let saved = store.save(&session.to_new_report().unwrap()).await.unwrap();

    let listed = store.list(10).await.unwrap();
    assert_eq!(listed, vec![saved.clone()]);
    assert!(store.delete(saved.id).await.unwrap());
    assert!(store.list(10).await.unwrap().is_empty());
}

#[test]
fn test_validator_is_pure() {
    let extractor = ContentExtractor::new(Arc::new(MockTransport::new()));
    let content = tokio_test::block_on(extractor.extract_content("file:///etc/passwd"));

    assert!(matches!(content.outcome, ExtractionOutcome::Rejected { .. }));
    assert!(!is_valid("ftp://x"));
    assert!(is_valid("http://host/path"));
}
