//! Integration tests for the book store: CRUD, search semantics, persistence.

mod common;

use common::{dune, shelf, store_with, titles};
use rstest::rstest;

use personal_library::{BookStore, NewBook, StoreError, ValidationError};

// =============================================================================
// add / list_all
// =============================================================================

#[test]
fn added_book_is_listed() {
    let store = store_with(&[]);
    let added = store.add(&dune()).unwrap();

    let books = store.list_all().unwrap();
    assert_eq!(books, vec![added.clone()]);
    assert_eq!(added.title, "Dune");
    assert_eq!(added.author, "Frank Herbert");
    assert_eq!(added.publication_year, 1965);
    assert_eq!(added.genre, "Sci-Fi");
    assert_eq!(added.progress, 40);
}

#[test]
fn listing_follows_insertion_order() {
    let store = store_with(&shelf());
    assert_eq!(
        titles(&store),
        vec!["Dune", "The Left Hand of Darkness", "Emma", "Piranesi"]
    );
}

#[test]
fn listing_twice_is_stable() {
    let store = store_with(&shelf());
    assert_eq!(store.list_all().unwrap(), store.list_all().unwrap());
}

#[test]
fn duplicates_are_allowed() {
    let store = store_with(&[dune(), dune()]);
    assert_eq!(store.count().unwrap(), 2);
}

#[rstest]
#[case(NewBook::new("", "Frank Herbert", 1965, "Sci-Fi", 40), ValidationError::MissingField("title"))]
#[case(NewBook::new("Dune", "", 1965, "Sci-Fi", 40), ValidationError::MissingField("author"))]
#[case(NewBook::new("Dune", "Frank Herbert", 1965, "  ", 40), ValidationError::MissingField("genre"))]
#[case(NewBook::new("Dune", "Frank Herbert", 1799, "Sci-Fi", 40), ValidationError::YearOutOfRange(1799))]
#[case(NewBook::new("Dune", "Frank Herbert", 2101, "Sci-Fi", 40), ValidationError::YearOutOfRange(2101))]
#[case(NewBook::new("Dune", "Frank Herbert", 1965, "Sci-Fi", -1), ValidationError::ProgressOutOfRange(-1))]
#[case(NewBook::new("Dune", "Frank Herbert", 1965, "Sci-Fi", 101), ValidationError::ProgressOutOfRange(101))]
fn invalid_records_are_rejected_without_writing(
    #[case] book: NewBook,
    #[case] expected: ValidationError,
) {
    let store = store_with(&shelf());
    let before = store.list_all().unwrap();

    match store.add(&book) {
        Err(StoreError::Validation(err)) => assert_eq!(err, expected),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(store.list_all().unwrap(), before);
}

// =============================================================================
// search
// =============================================================================

#[test]
fn empty_query_matches_everything() {
    let store = store_with(&shelf());
    assert_eq!(store.search("").unwrap(), store.list_all().unwrap());
}

#[rstest]
#[case("sci", &["Dune", "The Left Hand of Darkness"])]
#[case("SCIENCE", &["The Left Hand of Darkness"])]
#[case("austen", &["Emma"])]
#[case("cla", &["Emma", "Piranesi"])]
#[case("tolkien", &[])]
fn search_is_case_insensitive_substring_over_three_fields(
    #[case] query: &str,
    #[case] expected: &[&str],
) {
    let store = store_with(&shelf());
    let found: Vec<String> = store
        .search(query)
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn search_ignores_year_and_progress() {
    let store = store_with(&shelf());
    assert!(store.search("1965").unwrap().is_empty());
    assert!(store.search("40").unwrap().is_empty());
}

#[test]
fn regex_metacharacters_match_literally() {
    let store = store_with(&[NewBook::new(
        "C++ Primer",
        "Stanley Lippman",
        2012,
        "Programming",
        15,
    )]);
    assert_eq!(store.search("c++").unwrap().len(), 1);
    assert!(store.search("c.*").unwrap().is_empty());
}

// =============================================================================
// delete
// =============================================================================

#[test]
fn delete_by_title_removes_exactly_one_exact_match() {
    let store = store_with(&shelf());
    let removed = store.delete_by_title("Emma").unwrap();
    assert_eq!(removed.map(|book| book.title), Some("Emma".to_string()));
    assert_eq!(
        titles(&store),
        vec!["Dune", "The Left Hand of Darkness", "Piranesi"]
    );
}

#[test]
fn delete_by_title_is_case_sensitive() {
    let store = store_with(&shelf());
    assert_eq!(store.delete_by_title("emma").unwrap(), None);
    assert_eq!(store.count().unwrap(), 4);
}

#[test]
fn delete_by_title_miss_leaves_collection_unchanged() {
    let store = store_with(&shelf());
    let before = store.list_all().unwrap();
    assert_eq!(store.delete_by_title("Middlemarch").unwrap(), None);
    assert_eq!(store.list_all().unwrap(), before);
}

#[test]
fn delete_by_title_with_duplicates_removes_only_one() {
    let store = store_with(&[
        dune(),
        dune(),
        NewBook::new("Emma", "Jane Austen", 1815, "Classic", 75),
    ]);
    let first_id = store.list_all().unwrap()[0].id;

    let removed = store.delete_by_title("Dune").unwrap().unwrap();
    assert_eq!(removed.id, first_id);
    assert_eq!(titles(&store), vec!["Dune", "Emma"]);
}

#[test]
fn delete_by_id_targets_one_duplicate() {
    let store = store_with(&[dune(), dune()]);
    let second = store.list_all().unwrap()[1].clone();

    store.delete(second.id).unwrap();
    let left = store.list_all().unwrap();
    assert_eq!(left.len(), 1);
    assert_ne!(left[0].id, second.id);
    assert!(matches!(store.delete(second.id), Err(StoreError::NotFound(_))));
}

// =============================================================================
// end to end
// =============================================================================

#[test]
fn dune_round_trip() {
    let store = store_with(&[NewBook::new("Emma", "Jane Austen", 1815, "Classic", 75)]);
    let added = store.add(&dune()).unwrap();

    assert_eq!(store.search("dune").unwrap(), vec![added]);

    store.delete_by_title("Dune").unwrap();
    assert!(store.list_all().unwrap().iter().all(|book| book.title != "Dune"));
}

#[test]
fn books_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("library.sqlite");

    {
        let store = BookStore::open(&path).unwrap();
        store.add(&dune()).unwrap();
    }

    let store = BookStore::open(&path).unwrap();
    assert_eq!(titles(&store), vec!["Dune"]);
}
