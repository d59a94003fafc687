//! Client-side pagination over a fully fetched result set.
//!
//! Pure functions only; the source sequence is never modified.

use std::ops::RangeInclusive;

/// Maximum number of numbered page links shown at once.
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// `ceil(total / limit)`; zero when `limit` is zero.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(limit));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Returns the items of 1-indexed `page`: `items[(page - 1) * limit..][..limit]`.
///
/// Out-of-range pages yield an empty slice.
pub fn page_slice<T>(items: &[T], page: u32, limit: u32) -> &[T] {
    if page == 0 || limit == 0 {
        return &[];
    }
    let limit = limit as usize;
    let start = (page as usize - 1).saturating_mul(limit).min(items.len());
    let end = start.saturating_add(limit).min(items.len());
    &items[start..end]
}

/// Numbered pages to display around `current`.
///
/// Centred on `current` when possible; near either edge the window shifts
/// inward so it still holds [`MAX_VISIBLE_PAGES`] entries.
pub fn page_window(current: u32, total_pages: u32) -> RangeInclusive<u32> {
    if total_pages <= MAX_VISIBLE_PAGES {
        return 1..=total_pages;
    }

    let current = current.clamp(1, total_pages);
    let half = MAX_VISIBLE_PAGES / 2;
    let mut start = current.saturating_sub(half).max(1);
    let mut end = current.saturating_add(half).min(total_pages);

    if end - start + 1 < MAX_VISIBLE_PAGES {
        if start == 1 {
            end = (start + MAX_VISIBLE_PAGES - 1).min(total_pages);
        } else {
            start = end.saturating_sub(MAX_VISIBLE_PAGES - 1).max(1);
        }
    }

    start..=end
}

/// One entry of the page-number control row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Page { number: u32, current: bool },
    Ellipsis,
}

/// Builds the page-number row: optional first-page shortcut and ellipsis,
/// the numbered window, then optional ellipsis and last-page shortcut.
pub fn page_controls(current: u32, total_pages: u32) -> Vec<PageControl> {
    let window = page_window(current, total_pages);
    if window.is_empty() {
        return Vec::new();
    }

    let (first, last) = (*window.start(), *window.end());
    let page = |number| PageControl::Page {
        number,
        current: number == current,
    };
    let mut controls = Vec::with_capacity(MAX_VISIBLE_PAGES as usize + 4);

    if first > 1 {
        controls.push(page(1));
        if first > 2 {
            controls.push(PageControl::Ellipsis);
        }
    }

    controls.extend(window.map(page));

    if last < total_pages {
        if last < total_pages - 1 {
            controls.push(PageControl::Ellipsis);
        }
        controls.push(page(total_pages));
    }

    controls
}
