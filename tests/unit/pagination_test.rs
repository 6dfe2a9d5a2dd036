// Property-based tests for page arithmetic
//
// The page count keeps the historical `rows / limit + 1` shape, so the
// properties are stated against that formula rather than a ceiling.

use proptest::prelude::*;
use storage_api::core::pagination::{total_pages, PageRequest, Paginated};

proptest! {
    #[test]
    fn test_no_rows_means_no_pages(limit in 1u32..10_000) {
        prop_assert_eq!(total_pages(0, limit), 0);
    }

    #[test]
    fn test_pages_cover_every_row(rows in 1u64..1_000_000, limit in 1u32..10_000) {
        let pages = total_pages(rows, limit);
        prop_assert!(pages >= 1);
        prop_assert!(pages * u64::from(limit) > rows);
        prop_assert_eq!(pages, rows / u64::from(limit) + 1);
    }

    #[test]
    fn test_page_count_never_shrinks(rows in 1u64..100_000, limit in 1u32..1_000) {
        prop_assert!(total_pages(rows + 1, limit) >= total_pages(rows, limit));
    }

    #[test]
    fn test_valid_page_request(limit in 1i64..100_000, count in 1i64..100_000) {
        let page = PageRequest::new(limit, count).unwrap();
        prop_assert_eq!(i64::from(page.limit()), limit);
        prop_assert_eq!(i64::from(page.count()), count);
        prop_assert_eq!(page.offset(), ((count - 1) * limit) as u64);
    }

    #[test]
    fn test_non_positive_values_rejected(bad in -100_000i64..1, good in 1i64..100) {
        prop_assert!(PageRequest::new(bad, good).is_none());
        prop_assert!(PageRequest::new(good, bad).is_none());
    }

    #[test]
    fn test_paginated_echoes_request(limit in 1i64..500, count in 1i64..500, rows in 0u64..10_000) {
        let page = PageRequest::new(limit, count).unwrap();
        let paginated = Paginated::new(page, rows, Vec::<u8>::new());
        prop_assert_eq!(i64::from(paginated.limit), limit);
        prop_assert_eq!(i64::from(paginated.count), count);
        prop_assert_eq!(paginated.total, total_pages(rows, page.limit()));
    }
}

#[test]
fn test_exact_multiple_reports_trailing_page() {
    assert_eq!(total_pages(30, 10), 4);
    assert_eq!(total_pages(29, 10), 3);
}

#[test]
fn test_page_request_beyond_u32_rejected() {
    assert!(PageRequest::new(i64::from(u32::MAX) + 1, 1).is_none());
    assert!(PageRequest::new(10, i64::from(u32::MAX) + 1).is_none());
}
