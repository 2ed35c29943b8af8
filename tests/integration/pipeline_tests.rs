//! Integration tests for the harvester
//!
//! These tests use wiremock to serve result pages and run the full
//! fetch, extract, persist and report cycle end-to-end.

use listing_harvest::config::{
    Config, CrawlerConfig, OutputConfig, SearchConfig, SelectorConfig, UserAgentConfig,
};
use listing_harvest::crawler::Coordinator;
use listing_harvest::storage::{RunStatus, SqliteStorage, Storage};
use listing_harvest::{ListingType, Rooms, StopReason};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RENT_PATH: &str = "/rent/real-estate/city-zurich/matching-list";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, listing_type: ListingType, dir: &TempDir) -> Config {
    Config {
        search: SearchConfig {
            city: "zurich".to_string(),
            listing_type,
            max_price: 3000,
        },
        crawler: CrawlerConfig {
            base_url: base_url.to_string(),
            request_delay_ms: 100, // Shortest allowed pause
            timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            database_path: dir.path().join("harvest.db").to_string_lossy().into_owned(),
            report_path: dir.path().join("report.md").to_string_lossy().into_owned(),
        },
        selectors: SelectorConfig::default(),
    }
}

/// Renders one listing card in the site's markup
fn card(n: u32) -> String {
    format!(
        r#"<div role="listitem">
            <span class="HgListingCard_price_JoPAs">CHF {n},500.–</span>
            <div class="HgListingRoomsLivingSpace_roomsLivingSpace_GyVgq">
                <span>{n}.5 rooms</span><span>{space}m²</span>
            </div>
            <div class="HgListingCard_address_JGiFv">Street {n}, 8000 Zurich</div>
            <p class="HgListingDescription_title_NAAxy">Flat {n}</p>
        </div>"#,
        space = 40 + n * 10
    )
}

fn results_page(first: u32, count: u32) -> String {
    let cards: String = (first..first + count).map(card).collect();
    format!("<html><body><main>{}</main></body></html>", cards)
}

fn empty_page() -> String {
    "<html><body><main><p>No matching listings.</p></main></body></html>".to_string()
}

async fn mount_page(server: &MockServer, page: u32, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(RENT_PATH))
        .and(query_param("ep", page.to_string()))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_harvest_three_pages() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    for page in 1..=3 {
        mount_page(
            &mock_server,
            page,
            ResponseTemplate::new(200).set_body_string(results_page(page * 2 - 1, 2)),
        )
        .await;
    }
    mount_page(
        &mock_server,
        4,
        ResponseTemplate::new(200).set_body_string(empty_page()),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), ListingType::Rent, &dir);
    let summary = Coordinator::new(config.clone(), "test-hash")
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Harvest failed");

    assert_eq!(summary.pages_fetched, 4);
    assert_eq!(summary.stop, StopReason::Exhausted { page: 4 });
    assert_eq!(summary.records_extracted, 6);
    assert_eq!(summary.discarded, 0);
    assert_eq!(summary.saved, 6);

    // Apartments are stored in page order, all tagged with the query
    let storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    let apartments = storage.load_apartments("zurich", ListingType::Rent).unwrap();
    let titles: Vec<&str> = apartments.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Flat 1", "Flat 2", "Flat 3", "Flat 4", "Flat 5", "Flat 6"]);
    assert!(apartments
        .iter()
        .all(|a| a.city == "zurich" && a.listing_type == ListingType::Rent));

    assert_eq!(apartments[0].rooms, Rooms::Fractional(1.5));
    assert_eq!(apartments[0].space, 50);
    assert_eq!(apartments[0].price, 1500);

    let run = storage.get_run(summary.run_id).unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "test-hash");

    let report = std::fs::read_to_string(&config.output.report_path).unwrap();
    assert!(report.contains("# Apartment Prices: zurich (rent)"));
    assert!(report.contains("- **Apartments**: 6"));
}

#[tokio::test]
async fn test_http_error_keeps_earlier_pages() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        1,
        ResponseTemplate::new(200).set_body_string(results_page(1, 2)),
    )
    .await;
    mount_page(
        &mock_server,
        2,
        ResponseTemplate::new(200).set_body_string(results_page(3, 2)),
    )
    .await;
    mount_page(&mock_server, 3, ResponseTemplate::new(500)).await;

    let config = create_test_config(&mock_server.uri(), ListingType::Rent, &dir);
    let summary = Coordinator::new(config.clone(), "test-hash")
        .unwrap()
        .run()
        .await
        .expect("An HTTP error is not a harvest failure");

    assert_eq!(summary.stop, StopReason::HttpStatus { page: 3, status: 500 });
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.saved, 4);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Interrupted);
    assert_eq!(run.stop_reason.as_deref(), Some("HTTP 500 on page 3"));
    assert_eq!(storage.count_apartments().unwrap(), 4);
}

#[tokio::test]
async fn test_empty_first_page_has_no_results() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        1,
        ResponseTemplate::new(200).set_body_string(empty_page()),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), ListingType::Rent, &dir);
    let summary = Coordinator::new(config.clone(), "test-hash")
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.stop, StopReason::Exhausted { page: 1 });
    assert!(!summary.found_apartments());
    assert!(summary.report_path.is_none());
    assert!(!Path::new(&config.output.report_path).exists());

    let storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    assert_eq!(storage.count_apartments().unwrap(), 0);
    assert_eq!(
        storage.get_latest_run().unwrap().unwrap().status,
        RunStatus::Completed
    );
}

#[tokio::test]
async fn test_buy_search_uses_purchase_price_parameter() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/buy/real-estate/city-zurich/matching-list"))
        .and(query_param("aj", "3000"))
        .and(query_param("ep", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(1, 1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/buy/real-estate/city-zurich/matching-list"))
        .and(query_param("ep", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_page()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), ListingType::Buy, &dir);
    let summary = Coordinator::new(config.clone(), "test-hash")
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.saved, 1);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    let apartments = storage.load_apartments("zurich", ListingType::Buy).unwrap();
    assert_eq!(apartments.len(), 1);
    assert_eq!(apartments[0].listing_type, ListingType::Buy);
}

#[tokio::test]
async fn test_misaligned_page_fails_run() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let broken = format!(
        "<html><body>{}<p class=\"HgListingDescription_title_NAAxy\">Orphan</p></body></html>",
        card(1)
    );
    mount_page(
        &mock_server,
        1,
        ResponseTemplate::new(200).set_body_string(broken),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), ListingType::Rent, &dir);
    let result = Coordinator::new(config.clone(), "test-hash")
        .unwrap()
        .run()
        .await;

    assert!(matches!(
        result,
        Err(listing_harvest::HarvestError::Extract { .. })
    ));

    let storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    assert_eq!(
        storage.get_latest_run().unwrap().unwrap().status,
        RunStatus::Failed
    );
}
