// tests/pagination.rs
mod support;

use monitor_legislativo::engine::{fetch_all_pages, ListingSpec};
use support::{page_of, CountingProgress, FakeTransport};

const URL: &str = "http://camara.test/api/v2/proposicoes";

fn spec() -> ListingSpec {
    ListingSpec {
        url: URL.into(),
        page_param: "pagina",
        size_param: "itens",
        page_size: 100,
        items_key: "dados",
        bearer: None,
    }
}

#[test]
fn stops_at_first_empty_page() {
    let fake = FakeTransport::new()
        .on_page(URL, 1, 200, &page_of(100, 1))
        .on_page(URL, 2, 200, r#"{"dados":[]}"#);

    let mut progress = CountingProgress::default();
    let walk = fetch_all_pages(&fake, &spec(), &[], Some(&mut progress));

    assert_eq!(walk.items.len(), 100);
    assert_eq!(walk.requests, 2);
    assert!(walk.complete);
    assert_eq!(fake.calls().len(), 2);
    assert_eq!(progress.done, ["página 1"]);
}

#[test]
fn request_count_is_bounded_by_total_over_page_size() {
    let fake = FakeTransport::new()
        .on_page(URL, 1, 200, &page_of(100, 1))
        .on_page(URL, 2, 200, &page_of(100, 101))
        .on_page(URL, 3, 200, &page_of(37, 201))
        .on_page(URL, 4, 200, r#"{"dados":[]}"#);

    let walk = fetch_all_pages(&fake, &spec(), &[], None);
    assert_eq!(walk.items.len(), 237);
    assert!(walk.requests <= 237 / 100 + 2);
    assert_eq!(walk.requests, 4);
}

#[test]
fn error_keeps_what_was_gathered() {
    let fake = FakeTransport::new()
        .on_page(URL, 1, 200, &page_of(100, 1))
        .on_page(URL, 2, 503, "indisponível");

    let walk = fetch_all_pages(&fake, &spec(), &[], None);
    assert_eq!(walk.items.len(), 100);
    assert_eq!(walk.requests, 2);
    assert!(!walk.complete);
}

#[test]
fn first_page_failure_yields_nothing() {
    let fake = FakeTransport::new().on_page(URL, 1, 500, "");
    let walk = fetch_all_pages(&fake, &spec(), &[], None);
    assert!(walk.items.is_empty());
    assert_eq!(walk.requests, 1);
    assert!(!walk.complete);
}

#[test]
fn unreadable_body_stops_the_walk() {
    let fake = FakeTransport::new().on_page(URL, 1, 200, "<html>erro</html>");
    let walk = fetch_all_pages(&fake, &spec(), &[], None);
    assert!(walk.items.is_empty());
    assert!(!walk.complete);
}

#[test]
fn query_and_paging_params_are_sent() {
    let fake = FakeTransport::new().on_page(URL, 1, 200, r#"{"dados":[]}"#);
    let mut s = spec();
    s.bearer = Some("segredo".into());
    let query = vec![
        ("keywords".to_string(), "Rio Grande do Sul".to_string()),
        ("keywords".to_string(), "enchente".to_string()),
    ];
    fetch_all_pages(&fake, &s, &query, None);

    let req = &fake.calls()[0];
    assert_eq!(req.param("itens"), Some("100"));
    assert_eq!(req.param("pagina"), Some("1"));
    assert_eq!(req.query.iter().filter(|(k, _)| k == "keywords").count(), 2);
    assert_eq!(req.bearer.as_deref(), Some("segredo"));
}
