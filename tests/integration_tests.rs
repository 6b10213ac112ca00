//! Integration tests for holdings-query
//!
//! These tests drive the public API end to end: CQL string and client window
//! in, vendor query strings and windowing instructions out.

use holdings_query::config::{load_config, ConfigFile};
use holdings_query::models::Page;
use holdings_query::query::{reconcile, ErrorKind};
use holdings_query::{translate, QueryError, ResourceKind, Translation, Translator, Windowing};

fn search(translation: Translation) -> (Vec<String>, Windowing) {
    match translation {
        Translation::Search { queries, windowing } => (
            queries.into_iter().map(|q| q.into_string()).collect(),
            windowing,
        ),
        Translation::IdLookup { id } => panic!("Expected a search, got id lookup {}", id),
    }
}

/// Simulate the vendor: a catalogue of `total` records numbered from 0
fn fetch_page(total: usize, page: &Page) -> Vec<usize> {
    let start = (page.page_number - 1) * page.page_size;
    (start..(start + page.page_size).min(total)).collect()
}

#[test]
fn test_title_search_with_all_filters() {
    let (queries, windowing) = search(
        translate(
            "codex.title = \"bridge building\" and resourceType = ebook \
             and ext.selected = false and source = kb sortby title",
            0,
            25,
            ResourceKind::Title,
        )
        .unwrap(),
    );

    assert_eq!(
        queries,
        vec![
            "searchfield=titlename&resourcetype=book&selection=notselected&search=bridge+building&orderby=titlename&count=25&offset=1&searchtype=advanced"
        ]
    );
    assert_eq!(
        windowing,
        Windowing {
            first_object_index: 0,
            limit: 25
        }
    );
}

#[test]
fn test_title_search_by_identifier() {
    let (queries, _) =
        search(translate("identifier = 1234-5678", 0, 10, ResourceKind::Title).unwrap());
    assert_eq!(
        queries,
        vec!["searchfield=isxn&search=1234-5678&orderby=titlename&count=10&offset=1&searchtype=advanced"]
    );
}

#[test]
fn test_package_search_straddling_pages() {
    let (queries, windowing) = search(
        translate(
            "name = \"ebsco host\" and type = aggregated and ext.selected = true",
            31,
            15,
            ResourceKind::Package,
        )
        .unwrap(),
    );

    assert_eq!(
        queries,
        vec![
            "contenttype=aggregatedfulltext&selection=selected&search=ebsco+host&orderby=packagename&count=15&offset=3",
            "contenttype=aggregatedfulltext&selection=selected&search=ebsco+host&orderby=packagename&count=15&offset=4",
        ]
    );
    assert_eq!(windowing.first_object_index, 1);
    assert_eq!(windowing.limit, 15);
}

#[test]
fn test_large_window_is_split_into_vendor_pages() {
    let (queries, windowing) =
        search(translate("name = ebsco", 0, 143, ResourceKind::Package).unwrap());
    assert_eq!(
        queries,
        vec![
            "search=ebsco&orderby=packagename&count=100&offset=1",
            "search=ebsco&orderby=packagename&count=100&offset=2",
        ]
    );
    assert_eq!(windowing.limit, 143);
}

#[test]
fn test_windowing_returns_exact_client_window() {
    let total = 1_000;
    for (offset, limit) in [(31, 15), (0, 143), (150, 250), (900, 100), (995, 20)] {
        let info = reconcile(offset, limit);
        let concatenated: Vec<usize> = info
            .pages
            .iter()
            .flat_map(|page| fetch_page(total, page))
            .collect();

        let window = info.windowing().apply(concatenated);
        let expected: Vec<usize> = (offset..(offset + limit).min(total)).collect();
        assert_eq!(window, expected, "window ({}, {})", offset, limit);
    }
}

#[test]
fn test_id_lookup_short_circuits() {
    let translation = translate("codex.id = 19-1615", 40, 10, ResourceKind::Package).unwrap();
    assert!(translation.is_id_lookup());
    assert!(translation.queries().is_empty());
    assert_eq!(
        translation,
        Translation::IdLookup {
            id: "19-1615".to_string()
        }
    );
}

#[test]
fn test_server_choice_term() {
    let (queries, _) = search(translate("bridges", 0, 5, ResourceKind::Title).unwrap());
    assert_eq!(
        queries,
        vec!["searchfield=titlename&search=bridges&orderby=titlename&count=5&offset=1&searchtype=advanced"]
    );
}

#[test]
fn test_rejections() {
    let cases = [
        ("title = a or title = b", ResourceKind::Title, ErrorKind::UnsupportedBooleanOperator),
        ("title any bridges", ResourceKind::Title, ErrorKind::UnsupportedOperator),
        ("title = a sortby title publisher", ResourceKind::Title, ErrorKind::MultipleSortKeys),
        ("title = a sortby publisher", ResourceKind::Title, ErrorKind::UnsupportedSortField),
        ("author = smith", ResourceKind::Title, ErrorKind::UnsupportedField),
        ("name = x", ResourceKind::Title, ErrorKind::UnsupportedField),
        ("title = x and resourcetype = spaceship", ResourceKind::Title, ErrorKind::UnsupportedValue),
        ("title = x and source = elsewhere", ResourceKind::Title, ErrorKind::UnsupportedValue),
        ("title = x and ext.selected = maybe", ResourceKind::Title, ErrorKind::UnsupportedValue),
        ("title = x and publisher = y", ResourceKind::Title, ErrorKind::AmbiguousSearchField),
        ("resourcetype = book", ResourceKind::Title, ErrorKind::MissingSearchTerm),
        ("title = (", ResourceKind::Title, ErrorKind::MalformedQuery),
        ("name = x and title = y", ResourceKind::Package, ErrorKind::UnsupportedField),
    ];

    for (query, kind, expected) in cases {
        let err = translate(query, 0, 10, kind).unwrap_err();
        assert_eq!(err.kind(), expected, "query: {}", query);
    }
}

#[test]
fn test_zero_limit_is_rejected() {
    let err = translate("title = x", 10, 0, ResourceKind::Title).unwrap_err();
    assert_eq!(
        err,
        QueryError::UnsupportedValue {
            field: "limit".to_string(),
            value: "0".to_string()
        }
    );
}

#[test]
fn test_oversized_window_is_rejected_without_building_pages() {
    for limit in [usize::MAX, 1_001] {
        let err = translate("title = x", 0, limit, ResourceKind::Title).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnsupportedValue {
                field: "limit".to_string(),
                value: limit.to_string()
            }
        );
    }

    let translator = Translator::new().with_max_limit(5_000);
    let (queries, _) = search(
        translator
            .translate("title = x", 0, 5_000, ResourceKind::Title)
            .unwrap(),
    );
    assert_eq!(queries.len(), 50);
    assert!(translator.paginate(0, usize::MAX).is_err());
}

#[test]
fn test_error_messages_are_client_facing() {
    let err = translate("title = a or title = b", 0, 10, ResourceKind::Title).unwrap_err();
    assert!(err.to_string().starts_with("Unsupported Query Format"));
    assert!(err.to_string().contains("OR"));
}

#[test]
fn test_translator_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("holdings-query.toml");

    let mut file = ConfigFile::default();
    file.paging.max_page_size = 20;
    file.save(&path).unwrap();

    let config = load_config(&path).unwrap();
    let translator = Translator::from_config(&config.paging);
    let (queries, windowing) = search(
        translator
            .translate("name = ebsco", 10, 25, ResourceKind::Package)
            .unwrap(),
    );

    assert_eq!(queries.len(), 2);
    assert!(queries[0].ends_with("count=20&offset=1"));
    assert!(queries[1].ends_with("count=20&offset=2"));
    assert_eq!(windowing.first_object_index, 10);
}

#[test]
fn test_translation_serializes_for_callers() {
    let translation = translate("title = bridges", 31, 15, ResourceKind::Title).unwrap();
    let json = serde_json::to_value(&translation).unwrap();

    assert_eq!(json["type"], "search");
    assert_eq!(json["queries"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["windowing"]["first_object_index"], 1);
    assert_eq!(json["windowing"]["limit"], 15);
}

#[test]
fn test_translation_is_deterministic() {
    let translator = Translator::new();
    let first = translator.translate("title = bridges", 150, 250, ResourceKind::Title);
    let second = translator.translate("title = bridges", 150, 250, ResourceKind::Title);
    assert_eq!(first, second);
}
