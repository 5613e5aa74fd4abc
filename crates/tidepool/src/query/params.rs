//! Pagination parameter validation.
//!
//! Pure functions that clamp and correct page / page-size values against
//! known totals before a request is allowed to touch the network. A corrected
//! page is an offer the caller is expected to take; a rejection without a
//! correction (bad page size) is terminal and must not turn into a request.

use std::fmt;

/// Upper sanity bound on page size, preventing pathological requests.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Why a set of pagination parameters was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamError {
    /// Page size was zero or negative; the caller must supply a positive size.
    NonPositivePageSize,
    /// Page size exceeded [`MAX_PAGE_SIZE`].
    PageSizeTooLarge,
    /// Page was zero or negative.
    NonPositivePage,
    /// Page was past the last page for the known total.
    PageOutOfRange {
        /// The last valid page.
        last_page: u32,
    },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositivePageSize => write!(f, "page size must be positive"),
            Self::PageSizeTooLarge => {
                write!(f, "page size exceeds the maximum of {MAX_PAGE_SIZE}")
            }
            Self::NonPositivePage => write!(f, "page must be at least 1"),
            Self::PageOutOfRange { last_page } => {
                write!(f, "page is past the last page ({last_page})")
            }
        }
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamCheck {
    /// Parameters are usable as given.
    Valid,
    /// Parameters are invalid. `corrected_page` carries a usable page when
    /// one can be offered; `None` means the request must be rejected outright.
    Invalid {
        /// A page the caller can retry with, when correction is possible.
        corrected_page: Option<u32>,
        /// Why the parameters were rejected.
        reason: ParamError,
    },
}

impl ParamCheck {
    /// Check whether the parameters passed validation unchanged.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The corrected page, if the validator offered one.
    pub fn corrected_page(&self) -> Option<u32> {
        match self {
            Self::Valid => None,
            Self::Invalid { corrected_page, .. } => *corrected_page,
        }
    }
}

/// Number of pages needed to hold `total_items` at `page_size` per page.
///
/// Zero if and only if `total_items` is zero.
pub fn total_pages(total_items: u64, page_size: u32) -> u32 {
    if total_items == 0 || page_size == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(page_size)) as u32
}

/// Validate a `(page, page_size)` pair against a known item total.
///
/// Deterministic and side-effect free. A `total_items` of zero means "no
/// clamp information yet": any `page >= 1` is accepted, since an empty result
/// set renders the same on every page.
pub fn validate(page: i64, page_size: i64, total_items: u64) -> ParamCheck {
    if page_size <= 0 {
        return ParamCheck::Invalid {
            corrected_page: None,
            reason: ParamError::NonPositivePageSize,
        };
    }
    if page_size > i64::from(MAX_PAGE_SIZE) {
        return ParamCheck::Invalid {
            corrected_page: None,
            reason: ParamError::PageSizeTooLarge,
        };
    }
    if page <= 0 {
        return ParamCheck::Invalid {
            corrected_page: Some(1),
            reason: ParamError::NonPositivePage,
        };
    }
    if total_items == 0 {
        return ParamCheck::Valid;
    }

    let last_page = total_pages(total_items, page_size as u32);
    if page > i64::from(last_page) {
        return ParamCheck::Invalid {
            corrected_page: Some(last_page),
            reason: ParamError::PageOutOfRange { last_page },
        };
    }

    ParamCheck::Valid
}
