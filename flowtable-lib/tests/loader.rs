//! Integration tests for the paged data loader.

mod common;

use std::sync::Arc;

use flowtable_lib::error::BoxError;
use flowtable_lib::error::Error;
use flowtable_lib::error::FetchError;
use flowtable_lib::loader::PagedDataLoader;
use flowtable_lib::request::PageParams;
use flowtable_lib::source::StaticSource;
use flowtable_lib::LoadOutcome;
use flowtable_lib::LoadResponse;
use flowtable_lib::PaginationMode;
use futures::FutureExt;

use common::loader;
use common::row_cursor;
use common::rows;
use common::until_loading;
use common::Row;
use common::Scripted;

// =============================================================================
// Cursor mode
// =============================================================================

mod cursor {
    use super::*;

    #[tokio::test]
    async fn test_overshoot_detects_more_data() {
        let source = Arc::new(Scripted::new().respond(LoadResponse::items(rows(1..=11))));
        let loader = loader(PaginationMode::Cursor, 10, &source);

        let outcome = loader.load_initial().await.unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(loader.items(), rows(1..=10));
        assert!(loader.has_more_data());
        assert_eq!(loader.cursor().as_deref(), Some("r10"));
        assert_eq!(source.requests(), vec![PageParams::cursor("", 11)]);
    }

    #[tokio::test]
    async fn test_exact_fit_has_no_more_data() {
        let source = Arc::new(Scripted::new().respond(LoadResponse::items(rows(1..=10))));
        let loader = loader(PaginationMode::Cursor, 10, &source);

        loader.load_initial().await.unwrap();

        assert_eq!(loader.len(), 10);
        assert!(!loader.has_more_data());
        assert!(!loader.is_first_load());
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn test_show_more_continues_from_cursor() {
        let source = Arc::new(
            Scripted::new()
                .respond(LoadResponse::items(rows(1..=4)))
                .respond(LoadResponse::items(rows(4..=6))),
        );
        let loader = loader(PaginationMode::Cursor, 3, &source);

        loader.load_initial().await.unwrap();
        loader.show_more().await.unwrap();

        assert_eq!(
            source.requests(),
            vec![PageParams::cursor("", 4), PageParams::cursor("r3", 4)]
        );
        assert_eq!(loader.items(), rows(1..=6));
        assert!(!loader.has_more_data());
        assert_eq!(loader.cursor().as_deref(), Some("r6"));

        // No more data: further calls are ignored without fetching.
        assert!(loader.show_more().await.unwrap().is_skipped());
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn test_absent_items_tolerated() {
        let source = Arc::new(
            Scripted::new()
                .respond(LoadResponse::items(rows(1..=3)))
                .respond(LoadResponse::none()),
        );
        let loader = loader(PaginationMode::Cursor, 2, &source);

        loader.load_initial().await.unwrap();
        assert!(loader.has_more_data());

        let outcome = loader.show_more().await.unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(loader.items(), rows(1..=2));
        assert!(!loader.is_empty());
        assert!(!loader.has_more_data());
    }

    #[tokio::test]
    async fn test_absent_items_on_first_load_is_empty() {
        let source = Arc::new(Scripted::new().respond(LoadResponse::none()));
        let loader = loader(PaginationMode::Cursor, 5, &source);

        loader.load_initial().await.unwrap();

        assert!(loader.is_empty());
        assert!(loader.status().is_empty);
        assert_eq!(loader.cursor(), None);
    }
}

// =============================================================================
// Offset mode
// =============================================================================

mod offset {
    use super::*;

    #[tokio::test]
    async fn test_accumulates_without_duplicates() {
        let source = Arc::new(
            Scripted::new()
                .respond(LoadResponse::new(rows([1, 2, 3]), 6))
                .respond(LoadResponse::new(rows([3, 4, 5]), 6)),
        );
        let loader = loader(PaginationMode::Offset, 3, &source);

        loader.load_initial().await.unwrap();
        loader.show_more().await.unwrap();

        assert_eq!(loader.items(), rows([1, 2, 3, 4, 5]));
        assert_eq!(loader.current_page(), 2);
        assert!(loader.has_more_data());
        assert_eq!(
            source.requests(),
            vec![PageParams::page(1, 3), PageParams::page(2, 3)]
        );
    }

    #[tokio::test]
    async fn test_absent_items_tolerated() {
        let source = Arc::new(
            Scripted::new()
                .respond(LoadResponse::new(rows([1, 2]), 10))
                .respond(LoadResponse::none()),
        );
        let loader = loader(PaginationMode::Offset, 2, &source);

        loader.load_initial().await.unwrap();
        loader.show_more().await.unwrap();

        assert_eq!(loader.items(), rows([1, 2]));
        assert!(!loader.is_empty());
        assert!(!loader.has_more_data());
    }

    #[tokio::test]
    async fn test_reload_resets_accumulation() {
        let source = StaticSource::new(rows(1..=25), PaginationMode::Offset);
        let loader = PagedDataLoader::builder()
            .page_size(10)
            .data_source(source)
            .request_builder(flowtable_lib::request::IdentityRequest)
            .build()
            .unwrap();

        loader.load_initial().await.unwrap();
        loader.show_more().await.unwrap();
        loader.show_more().await.unwrap();
        assert_eq!(loader.len(), 25);
        assert_eq!(loader.current_page(), 3);

        loader.reload().await.unwrap();

        assert_eq!(loader.items(), rows(1..=10));
        assert_eq!(loader.current_page(), 1);
        assert!(loader.has_more_data());
        assert!(!loader.is_first_load());
    }

    #[tokio::test]
    async fn test_fetch_error_leaves_state() {
        let source = Arc::new(
            Scripted::new()
                .respond(LoadResponse::new(rows([1, 2]), 4))
                .fail("backend unavailable")
                .respond(LoadResponse::new(rows([3, 4]), 4)),
        );
        let loader = loader(PaginationMode::Offset, 2, &source);
        loader.load_initial().await.unwrap();

        let err = loader.show_more().await.unwrap_err();

        assert!(matches!(err, Error::Fetch(FetchError::Source(_))));
        assert!(!loader.is_loading());
        assert_eq!(loader.items(), rows([1, 2]));
        assert_eq!(loader.current_page(), 1);
        assert!(loader.has_more_data());

        // The failed page is requested again.
        loader.show_more().await.unwrap();
        assert_eq!(source.requests()[2], PageParams::page(2, 2));
        assert_eq!(loader.items(), rows(1..=4));
        assert!(!loader.has_more_data());
    }

    #[tokio::test]
    async fn test_search_forwarded() {
        let source = Arc::new(Scripted::new().respond(LoadResponse::new(rows([7]), 1)));
        let loader = loader(PaginationMode::Offset, 5, &source);

        assert!(loader.set_search(Some("smith".to_string())));
        loader.load_initial().await.unwrap();

        assert_eq!(
            source.requests(),
            vec![PageParams::page(1, 5).with_search(Some("smith".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_set_page_size() {
        let source = Arc::new(Scripted::new().respond(LoadResponse::new(rows([1]), 1)));
        let loader = loader(PaginationMode::Offset, 5, &source);

        assert!(loader.set_page_size(0));
        assert_eq!(loader.page_size(), 1);
        assert!(loader.set_page_size(12));
        loader.load_initial().await.unwrap();

        assert_eq!(source.requests(), vec![PageParams::page(1, 12)]);
    }
}

// =============================================================================
// Page mode
// =============================================================================

mod page {
    use super::*;

    #[tokio::test]
    async fn test_pages_replace_items() {
        let source = Arc::new(
            Scripted::new()
                .respond(LoadResponse::new(rows([1, 2]), 2))
                .respond(LoadResponse::new(rows([3, 4]), 3)),
        );
        let loader = loader(PaginationMode::Page, 2, &source);

        loader.go_to_page(1).await.unwrap();
        loader.go_to_page(2).await.unwrap();

        assert_eq!(loader.items(), rows([3, 4]));
        assert_eq!(loader.current_page(), 2);
        assert_eq!(loader.total_pages(), 3);
        assert!(loader.has_next_page());
    }

    #[tokio::test]
    async fn test_out_of_range_pages_ignored() {
        let source = Arc::new(Scripted::new().respond(LoadResponse::new(rows([1, 2]), 3)));
        let loader = loader(PaginationMode::Page, 2, &source);
        loader.load_initial().await.unwrap();

        assert!(loader.go_to_page(5).await.unwrap().is_skipped());
        assert!(loader.go_to_page(0).await.unwrap().is_skipped());

        assert_eq!(source.request_count(), 1);
        assert_eq!(loader.current_page(), 1);
        assert_eq!(loader.items(), rows([1, 2]));
        assert_eq!(loader.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_absent_items_is_fatal() {
        let source = Arc::new(
            Scripted::new()
                .respond(LoadResponse::new(rows([1, 2]), 3))
                .respond(LoadResponse::none()),
        );
        let loader = loader(PaginationMode::Page, 2, &source);
        loader.load_initial().await.unwrap();

        let err = loader.go_to_page(2).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Fetch(FetchError::MissingItems { page: 2 })
        ));
        assert_eq!(loader.items(), rows([1, 2]));
        assert_eq!(loader.total_pages(), 3);
        assert_eq!(loader.current_page(), 1);
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn test_next_and_previous() {
        let source = StaticSource::new(rows(1..=5), PaginationMode::Page);
        let loader = PagedDataLoader::builder()
            .mode(PaginationMode::Page)
            .page_size(2)
            .data_source(source)
            .request_builder(flowtable_lib::request::IdentityRequest)
            .build()
            .unwrap();

        loader.load_initial().await.unwrap();
        assert_eq!(loader.total_pages(), 3);

        loader.next_page().await.unwrap();
        loader.next_page().await.unwrap();
        assert_eq!(loader.items(), rows([5]));
        assert!(loader.next_page().await.unwrap().is_skipped());

        loader.previous_page().await.unwrap();
        assert_eq!(loader.items(), rows([3, 4]));
        assert_eq!(loader.current_page(), 2);
    }

    #[tokio::test]
    async fn test_show_more_not_applicable() {
        let source = Arc::new(Scripted::new().respond(LoadResponse::new(rows([1]), 2)));
        let loader = loader(PaginationMode::Page, 1, &source);
        loader.load_initial().await.unwrap();

        assert!(loader.show_more().await.unwrap().is_skipped());
        assert_eq!(source.request_count(), 1);
    }
}

// =============================================================================
// Reload
// =============================================================================

mod reload {
    use super::*;

    #[tokio::test]
    async fn test_reload_shows_first_load() {
        let source = Arc::new(Scripted::gated());
        source.push(LoadResponse::items(rows(1..=4)));
        source.push(LoadResponse::items(rows(1..=2)));
        let loader = loader(PaginationMode::Cursor, 3, &source);

        source.release();
        loader.load_initial().await.unwrap();
        assert!(loader.has_more_data());
        assert!(!loader.is_first_load());

        let (reloaded, ()) = tokio::join!(loader.reload(), async {
            until_loading(&loader).await;
            let status = loader.status();
            assert!(status.is_first_load);
            assert!(!status.has_more_data);
            assert!(status.shows_placeholder());
            assert_eq!(status.len, 3);
            source.release();
        });

        assert!(reloaded.unwrap().is_loaded());
        assert_eq!(loader.items(), rows(1..=2));
        assert!(!loader.is_first_load());
        assert!(!loader.has_more_data());
        assert!(!loader.status().shows_placeholder());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_cursor_items() {
        let source = Arc::new(
            Scripted::new()
                .respond(LoadResponse::items(rows(1..=4)))
                .respond(LoadResponse::items(rows(4..=7)))
                .fail("backend unavailable"),
        );
        let loader = loader(PaginationMode::Cursor, 3, &source);
        loader.load_initial().await.unwrap();
        loader.show_more().await.unwrap();

        let err = loader.reload().await.unwrap_err();

        assert!(matches!(err, Error::Fetch(FetchError::Source(_))));
        assert!(!loader.is_loading());
        assert_eq!(loader.items(), rows(1..=6));
        assert_eq!(loader.cursor().as_deref(), Some("r6"));
        assert!(loader.has_more_data());
        assert!(!loader.is_first_load());
        assert_eq!(source.requests()[2], PageParams::cursor("", 4));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_offset_page() {
        let source = Arc::new(
            Scripted::new()
                .respond(LoadResponse::new(rows([1, 2]), 6))
                .respond(LoadResponse::new(rows([3, 4]), 6))
                .fail("backend unavailable"),
        );
        let loader = loader(PaginationMode::Offset, 2, &source);
        loader.load_initial().await.unwrap();
        loader.show_more().await.unwrap();

        assert!(loader.reload().await.is_err());

        assert!(!loader.is_loading());
        assert_eq!(loader.items(), rows(1..=4));
        assert_eq!(loader.current_page(), 2);
        assert!(loader.has_more_data());
        assert!(!loader.is_first_load());
        assert!(!loader.status().is_loading);
    }

    #[tokio::test]
    async fn test_dropped_reload_restores_flags() {
        let source = Arc::new(Scripted::gated());
        source.push(LoadResponse::new(rows([1, 2, 3]), 6));
        let loader = loader(PaginationMode::Offset, 3, &source);
        source.release();
        loader.load_initial().await.unwrap();

        assert!(loader.reload().now_or_never().is_none());

        assert!(!loader.is_loading());
        assert!(!loader.is_first_load());
        assert!(loader.has_more_data());
        assert_eq!(loader.items(), rows([1, 2, 3]));
    }

    #[tokio::test]
    async fn test_unbounded_page_size() {
        let source = Arc::new(Scripted::new().respond(LoadResponse::items(rows(1..=3))));
        let loader = loader(PaginationMode::Cursor, usize::MAX, &source);

        loader.reload().await.unwrap();

        assert_eq!(source.requests(), vec![PageParams::cursor("", usize::MAX)]);
        assert_eq!(loader.items(), rows(1..=3));
        assert!(!loader.has_more_data());
    }
}

// =============================================================================
// Loading guard
// =============================================================================

mod guard {
    use super::*;

    #[tokio::test]
    async fn test_calls_ignored_while_loading() {
        let source = Arc::new(Scripted::gated());
        source.push(LoadResponse::items(rows(1..=4)));
        source.push(LoadResponse::items(rows(4..=6)));
        let loader = loader(PaginationMode::Cursor, 3, &source);

        source.release();
        loader.load_initial().await.unwrap();
        let cursor = loader.cursor();

        let (more, ignored) = tokio::join!(loader.show_more(), async {
            until_loading(&loader).await;
            let outcomes = [
                loader.show_more().await.unwrap(),
                loader.load_initial().await.unwrap(),
                loader.reload().await.unwrap(),
                loader.go_to_page(2).await.unwrap(),
            ];
            assert_eq!(source.request_count(), 2);
            assert_eq!(loader.items(), rows(1..=3));
            assert_eq!(loader.cursor(), cursor);
            assert!(!loader.set_page_size(50));
            source.release();
            outcomes
        });

        assert!(more.unwrap().is_loaded());
        assert!(ignored.iter().all(|o| o.is_skipped()));
        assert_eq!(source.request_count(), 2);
        assert_eq!(loader.items(), rows(1..=6));
        assert_eq!(loader.page_size(), 3);
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn test_page_calls_ignored_while_loading() {
        let source = Arc::new(Scripted::gated());
        source.push(LoadResponse::new(rows([1, 2]), 3));
        source.push(LoadResponse::new(rows([3, 4]), 3));
        let loader = loader(PaginationMode::Page, 2, &source);

        source.release();
        loader.load_initial().await.unwrap();

        let (second, ignored) = tokio::join!(loader.go_to_page(2), async {
            until_loading(&loader).await;
            let outcomes = [
                loader.go_to_page(3).await.unwrap(),
                loader.next_page().await.unwrap(),
                loader.load_initial().await.unwrap(),
                loader.reload().await.unwrap(),
            ];
            assert_eq!(source.request_count(), 2);
            assert_eq!(loader.current_page(), 1);
            assert_eq!(loader.items(), rows([1, 2]));
            assert_eq!(loader.total_pages(), 3);
            source.release();
            outcomes
        });

        assert!(second.unwrap().is_loaded());
        assert!(ignored.iter().all(|o| o.is_skipped()));
        assert_eq!(source.request_count(), 2);
        assert_eq!(source.requests()[1], PageParams::page(2, 2));
        assert_eq!(loader.current_page(), 2);
        assert_eq!(loader.items(), rows([3, 4]));
    }

    #[tokio::test]
    async fn test_dropped_fetch_releases_loading() {
        let source = Arc::new(Scripted::gated());
        source.push(LoadResponse::items(rows(1..=3)));
        let loader = loader(PaginationMode::Offset, 3, &source);

        assert!(loader.load_initial().now_or_never().is_none());

        assert!(!loader.is_loading());
        assert!(loader.is_empty());
        assert!(loader.is_first_load());
    }

    #[tokio::test]
    async fn test_request_builder_error() {
        let source = Arc::new(Scripted::new());
        let loader = PagedDataLoader::<Row, PageParams>::builder()
            .shared_data_source(source.clone())
            .request_builder(|_: PageParams| -> Result<PageParams, BoxError> {
                Err("unsupported filter".into())
            })
            .build()
            .unwrap();

        let err = loader.load_initial().await.unwrap_err();

        assert!(matches!(err, Error::Fetch(FetchError::Request(_))));
        assert_eq!(source.request_count(), 0);
        assert!(!loader.is_loading());
        assert!(loader.is_first_load());
    }

    #[tokio::test]
    async fn test_subscribers_see_loading_and_result() {
        let source = Arc::new(Scripted::gated());
        source.push(LoadResponse::new(rows([1, 2]), 5));
        let loader = loader(PaginationMode::Offset, 2, &source);
        let mut rx = loader.subscribe();

        let (loaded, ()) = tokio::join!(loader.load_initial(), async {
            rx.changed().await.unwrap();
            assert!(rx.borrow_and_update().is_loading);
            source.release();
        });
        loaded.unwrap();

        let status = *rx.borrow_and_update();
        assert!(!status.is_loading);
        assert!(!status.is_first_load);
        assert!(status.has_more_data);
        assert_eq!(status.len, 2);
    }

    #[tokio::test]
    async fn test_cursor_projection_shared_with_source() {
        let source = StaticSource::new(rows(1..=7), PaginationMode::Cursor).with_cursor(row_cursor);
        let loader: PagedDataLoader<Row> = PagedDataLoader::builder()
            .mode(PaginationMode::Cursor)
            .page_size(3)
            .data_source(source)
            .request_builder(flowtable_lib::request::IdentityRequest)
            .item_to_cursor(row_cursor)
            .build()
            .unwrap();

        loader.load_initial().await.unwrap();
        while loader.has_more_data() {
            loader.show_more().await.unwrap();
        }

        assert_eq!(loader.items(), rows(1..=7));
    }
}
