/// One entry of the pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(u64),
    Ellipsis,
}

const SHOW_ALL_UP_TO: u64 = 5;

/// Page numbers to render around `current`. Empty when there is at most
/// one page, since the control is hidden then.
pub fn page_window(current: u64, total_pages: u64) -> Vec<PageSlot> {
    if total_pages <= 1 {
        return Vec::new();
    }
    if total_pages <= SHOW_ALL_UP_TO {
        return (1..=total_pages).map(PageSlot::Page).collect();
    }

    let mut slots = vec![PageSlot::Page(1)];
    if current > 3 {
        slots.push(PageSlot::Ellipsis);
    }

    let start = current.saturating_sub(1).max(2);
    let end = current.saturating_add(1).min(total_pages - 1);
    slots.extend((start..=end).map(PageSlot::Page));

    if current < total_pages - 2 {
        slots.push(PageSlot::Ellipsis);
    }
    slots.push(PageSlot::Page(total_pages));
    slots
}
