//! End-to-end scrape tests against a mock tender site

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tender_scrape::config::Config;
use tender_scrape::scrape::{run_scrape, RunOptions, StopReason};
use tender_scrape::storage::{SqliteTenderStore, TenderStore};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PAGE: &str = r#"
<html><body>
<form id="tenders-search-form" action="/extsearch/results" method="get">
    <input type="text" name="keywords" value="">
    <button id="start-search-button" type="submit">Найти</button>
</form>
</body></html>
"#;

fn tender_row(number: u32) -> String {
    format!(
        r#"<article class="tender-row">
            <span class="tender__number">Тендер №{number}</span>
            <a class="tender-info__link" href="/region/tender-{number}">Поставка {number}</a>
            <div class="tender__date-end">до <span class="black">10.04.2026</span></div>
        </article>"#,
        number = number
    )
}

fn broken_row(number: u32) -> String {
    format!(
        r#"<article class="tender-row">
            <span class="tender__number">Тендер №{number}</span>
            <a class="tender-info__link" href="/region/tender-{number}">Поставка {number}</a>
        </article>"#,
        number = number
    )
}

fn results_page(rows: &[String], next: Option<&str>) -> String {
    let pagination = match next {
        Some(href) => format!(
            r#"<ul class="pagination"><li class="next"><a href="{}">›</a></li></ul>"#,
            href
        ),
        None => r#"<ul class="pagination"><li class="next disabled"><span>›</span></li></ul>"#
            .to_string(),
    };
    format!("<html><body>{}{}</body></html>", rows.join("\n"), pagination)
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_search_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/extsearch/"))
        .respond_with(html(SEARCH_PAGE.to_string()))
        .mount(server)
        .await;
}

struct Fixture {
    _dir: TempDir,
    config: Config,
    options: RunOptions,
}

impl Fixture {
    fn new(server: &MockServer) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut config = Config::default();
        config.source.search_url = format!("{}/extsearch/", server.uri());
        config.output.database_path = dir.path().join("tenders.db").display().to_string();
        config.timeouts.search_form = 200;
        config.timeouts.tender_rows = 200;
        config.timeouts.next_page = 200;

        let options = RunOptions {
            max_records: 100,
            csv_path: dir.path().join("tenders.csv"),
        };

        Self {
            _dir: dir,
            config,
            options,
        }
    }

    fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.config.output.database_path)
    }

    fn stored_count(&self) -> u64 {
        SqliteTenderStore::open(&self.db_path())
            .expect("Failed to open DB")
            .count()
            .expect("Failed to count rows")
    }
}

fn csv_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("Failed to read CSV")
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_single_page_run_writes_both_sinks() {
    let server = MockServer::start().await;
    mount_search_page(&server).await;

    let rows: Vec<String> = (1..=3).map(tender_row).collect();
    Mock::given(method("GET"))
        .and(path("/extsearch/results"))
        .respond_with(html(results_page(&rows, None)))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server);
    let summary = run_scrape(&fixture.config, &fixture.options)
        .await
        .expect("Scrape failed");

    assert_eq!(summary.collected, 3);
    assert_eq!(summary.pages_visited, 1);
    assert_eq!(summary.stop_reason, StopReason::NoNextPage);
    assert_eq!(summary.rows_appended, 3);

    let lines = csv_lines(&fixture.options.csv_path);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "number,link,customer,goods,end_date");
    assert_eq!(
        lines[1],
        format!(
            "1,{}/region/tender-1,N/A,Поставка 1,10.04.2026",
            server.uri()
        )
    );

    assert_eq!(fixture.stored_count(), 3);
}

#[tokio::test]
async fn test_pagination_follows_next_control() {
    let server = MockServer::start().await;
    mount_search_page(&server).await;

    let first: Vec<String> = (1..=3).map(tender_row).collect();
    let second: Vec<String> = (4..=5).map(tender_row).collect();

    Mock::given(method("GET"))
        .and(path("/extsearch/results"))
        .respond_with(html(results_page(&first, Some("/extsearch/results/page-2"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/extsearch/results/page-2"))
        .respond_with(html(results_page(&second, None)))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server);
    let summary = run_scrape(&fixture.config, &fixture.options)
        .await
        .expect("Scrape failed");

    assert_eq!(summary.collected, 5);
    assert_eq!(summary.pages_visited, 2);
    assert_eq!(fixture.stored_count(), 5);
}

#[tokio::test]
async fn test_pagination_skips_inert_top_control() {
    let server = MockServer::start().await;
    mount_search_page(&server).await;

    let first: Vec<String> = (1..=2).map(tender_row).collect();
    let second: Vec<String> = (3..=4).map(tender_row).collect();
    let first_page = format!(
        r#"<html><body>
        <ul class="pagination"><li class="next"><a>›</a></li></ul>
        {}
        <ul class="pagination"><li class="next"><a href="/extsearch/results/page-2">›</a></li></ul>
        </body></html>"#,
        first.join("\n")
    );

    Mock::given(method("GET"))
        .and(path("/extsearch/results"))
        .respond_with(html(first_page))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/extsearch/results/page-2"))
        .respond_with(html(results_page(&second, None)))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server);
    let summary = run_scrape(&fixture.config, &fixture.options)
        .await
        .expect("Scrape failed");

    assert_eq!(summary.collected, 4);
    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.stop_reason, StopReason::NoNextPage);
}

#[tokio::test]
async fn test_table_layout_results_are_collected() {
    let server = MockServer::start().await;
    mount_search_page(&server).await;

    let rows: String = (1..=3)
        .map(|number| {
            format!(
                r#"<tr class="tender-row">
                    <td><span class="tender__number">Тендер №{number}</span></td>
                    <td><a class="tender-info__link" href="/t/{number}">Лот {number}</a></td>
                    <td class="tender__date-end"><span class="black">01.05.2026</span></td>
                </tr>"#,
                number = number
            )
        })
        .collect();
    let page = format!(
        "<html><body><table><tbody>{}</tbody></table></body></html>",
        rows
    );

    Mock::given(method("GET"))
        .and(path("/extsearch/results"))
        .respond_with(html(page))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server);
    let summary = run_scrape(&fixture.config, &fixture.options)
        .await
        .expect("Scrape failed");

    assert_eq!(summary.collected, 3);
    assert_eq!(summary.skipped_items, 0);
    assert_eq!(fixture.stored_count(), 3);
}

#[tokio::test]
async fn test_search_submits_form_fields() {
    let server = MockServer::start().await;
    mount_search_page(&server).await;

    Mock::given(method("GET"))
        .and(path("/extsearch/results"))
        .and(query_param("keywords", ""))
        .respond_with(html(results_page(&[tender_row(1)], None)))
        .expect(1)
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server);
    let summary = run_scrape(&fixture.config, &fixture.options)
        .await
        .expect("Scrape failed");

    assert_eq!(summary.collected, 1);
}

#[tokio::test]
async fn test_malformed_item_is_skipped_end_to_end() {
    let server = MockServer::start().await;
    mount_search_page(&server).await;

    let rows = vec![
        tender_row(1),
        tender_row(2),
        broken_row(3),
        tender_row(4),
        tender_row(5),
    ];
    Mock::given(method("GET"))
        .and(path("/extsearch/results"))
        .respond_with(html(results_page(&rows, None)))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server);
    let summary = run_scrape(&fixture.config, &fixture.options)
        .await
        .expect("Scrape failed");

    assert_eq!(summary.collected, 4);
    assert_eq!(summary.skipped_items, 1);
    assert_eq!(csv_lines(&fixture.options.csv_path).len(), 5);
}

#[tokio::test]
async fn test_record_cap_limits_run() {
    let server = MockServer::start().await;
    mount_search_page(&server).await;

    let rows: Vec<String> = (1..=10).map(tender_row).collect();
    Mock::given(method("GET"))
        .and(path("/extsearch/results"))
        .respond_with(html(results_page(&rows, Some("/extsearch/results/page-2"))))
        .mount(&server)
        .await;

    let mut fixture = Fixture::new(&server);
    fixture.options.max_records = 4;
    let summary = run_scrape(&fixture.config, &fixture.options)
        .await
        .expect("Scrape failed");

    assert_eq!(summary.collected, 4);
    assert_eq!(summary.stop_reason, StopReason::RecordCap);
    assert_eq!(fixture.stored_count(), 4);
}

#[tokio::test]
async fn test_failed_search_page_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/extsearch/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server);
    let summary = run_scrape(&fixture.config, &fixture.options)
        .await
        .expect("Empty run should still succeed");

    assert_eq!(summary.collected, 0);
    assert_eq!(summary.stop_reason, StopReason::BootstrapFailed);
    assert!(summary.csv_path.is_none());
    assert!(!fixture.options.csv_path.exists());
    assert!(!fixture.db_path().exists());
}

#[tokio::test]
async fn test_repeated_runs_append_rows_and_overwrite_csv() {
    let server = MockServer::start().await;
    mount_search_page(&server).await;

    let rows: Vec<String> = (1..=3).map(tender_row).collect();
    Mock::given(method("GET"))
        .and(path("/extsearch/results"))
        .respond_with(html(results_page(&rows, None)))
        .mount(&server)
        .await;

    let fixture = Fixture::new(&server);
    run_scrape(&fixture.config, &fixture.options)
        .await
        .expect("First scrape failed");
    let first_csv = std::fs::read(&fixture.options.csv_path).expect("Failed to read CSV");

    run_scrape(&fixture.config, &fixture.options)
        .await
        .expect("Second scrape failed");
    let second_csv = std::fs::read(&fixture.options.csv_path).expect("Failed to read CSV");

    assert_eq!(first_csv, second_csv);
    assert_eq!(fixture.stored_count(), 6);
}

#[tokio::test]
async fn test_unwritable_csv_path_fails_run() {
    let server = MockServer::start().await;
    mount_search_page(&server).await;

    Mock::given(method("GET"))
        .and(path("/extsearch/results"))
        .respond_with(html(results_page(&[tender_row(1)], None)))
        .mount(&server)
        .await;

    let mut fixture = Fixture::new(&server);
    fixture.options.csv_path = fixture.db_path().with_file_name("missing").join("out.csv");

    let result = run_scrape(&fixture.config, &fixture.options).await;
    assert!(result.is_err());
}
