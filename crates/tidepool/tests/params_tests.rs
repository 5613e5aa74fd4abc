//! Tests for pagination parameter validation.

use tidepool::{MAX_PAGE_SIZE, ParamCheck, ParamError, total_pages, validate};

#[test]
fn test_total_pages_is_ceiling_division() {
    assert_eq!(total_pages(25, 10), 3);
    assert_eq!(total_pages(30, 10), 3);
    assert_eq!(total_pages(31, 10), 4);
    assert_eq!(total_pages(1, 10), 1);
    assert_eq!(total_pages(100, 10), 10);
    assert_eq!(total_pages(100, 500), 1);
}

#[test]
fn test_total_pages_zero_iff_no_items() {
    assert_eq!(total_pages(0, 10), 0);
    assert_eq!(total_pages(0, 1), 0);

    for total in 1..=50u64 {
        for size in [1u32, 3, 10, 20, 50, 100] {
            let pages = total_pages(total, size);
            assert!(pages > 0, "total={total} size={size}");
            // Ceiling law: pages is the smallest count that holds the total.
            assert!(u64::from(pages) * u64::from(size) >= total);
            assert!(u64::from(pages - 1) * u64::from(size) < total);
        }
    }
}

#[test]
fn test_non_positive_page_corrected_to_first() {
    let check = validate(0, 10, 100);
    assert_eq!(
        check,
        ParamCheck::Invalid {
            corrected_page: Some(1),
            reason: ParamError::NonPositivePage,
        }
    );
    assert_eq!(check.corrected_page(), Some(1));

    assert_eq!(validate(-5, 10, 100).corrected_page(), Some(1));
}

#[test]
fn test_page_past_end_corrected_to_last() {
    let check = validate(50, 10, 100);
    assert_eq!(
        check,
        ParamCheck::Invalid {
            corrected_page: Some(10),
            reason: ParamError::PageOutOfRange { last_page: 10 },
        }
    );

    // 25 items at 10 per page: page 3 is the last valid page.
    assert!(validate(3, 10, 25).is_valid());
    assert_eq!(validate(4, 10, 25).corrected_page(), Some(3));
}

#[test]
fn test_non_positive_page_size_rejected_without_correction() {
    for size in [0i64, -1, -100] {
        let check = validate(1, size, 100);
        assert_eq!(
            check,
            ParamCheck::Invalid {
                corrected_page: None,
                reason: ParamError::NonPositivePageSize,
            }
        );
    }
}

#[test]
fn test_oversized_page_size_rejected() {
    assert!(validate(1, i64::from(MAX_PAGE_SIZE), 100).is_valid());
    assert_eq!(
        validate(1, i64::from(MAX_PAGE_SIZE) + 1, 100),
        ParamCheck::Invalid {
            corrected_page: None,
            reason: ParamError::PageSizeTooLarge,
        }
    );
}

#[test]
fn test_empty_total_accepts_any_page() {
    assert!(validate(1, 10, 0).is_valid());
    assert!(validate(7, 10, 0).is_valid());
    assert!(validate(10_000, 10, 0).is_valid());
}

#[test]
fn test_validation_is_deterministic() {
    for _ in 0..3 {
        assert_eq!(validate(50, 10, 100), validate(50, 10, 100));
        assert_eq!(validate(1, 10, 0), validate(1, 10, 0));
    }
}
