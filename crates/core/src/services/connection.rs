//! Connection resolution - windows a sorted index into a page.
//!
//! # Algorithm
//!
//! 1. `after` narrows the window to keys strictly greater than its key
//! 2. `before` narrows the window to keys strictly less than its key
//! 3. `first` keeps the front of the window, then `last` keeps the back of
//!    what remains
//! 4. Page flags compare the kept range against the window from steps 1-2
//!
//! Cursors that do not decode are ignored, as if they had not been sent.
//! Cursors that decode to keys outside the stored range simply leave that
//! side of the window open. Crossing cursors give an empty page.

use tracing::debug;

use crate::codec::CursorKey;
use crate::error::{PaginationError, PaginationResult};
use crate::index::SortedIndex;
use crate::metrics::{record_connection_resolved, record_cursor_rejected};
use crate::ports::{Connection, ConnectionArgs, Edge, PageInfo};

// =============================================================================
// Window
// =============================================================================

/// Positions selected by a set of connection arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Start of the cursor-delimited window.
    pub window_start: usize,
    /// End (exclusive) of the cursor-delimited window.
    pub window_end: usize,
    /// Start of the returned page.
    pub begin: usize,
    /// End (exclusive) of the returned page.
    pub end: usize,
}

impl Window {
    pub fn has_previous_page(&self) -> bool {
        self.begin > self.window_start
    }

    pub fn has_next_page(&self) -> bool {
        self.end < self.window_end
    }
}

/// Compute the page window for `args`, or `None` when the cursor-delimited
/// window is empty.
pub fn compute_window<T, K: CursorKey>(
    index: &SortedIndex<T, K>,
    args: &ConnectionArgs,
) -> PaginationResult<Option<Window>> {
    let first = non_negative("first", args.first)?;
    let last = non_negative("last", args.last)?;

    let codec = index.codec();

    let window_start = match decode_argument::<K>(codec, "after", args.after.as_deref()) {
        Some(key) => index.bisect_right(&key),
        None => 0,
    };
    let window_end = match decode_argument::<K>(codec, "before", args.before.as_deref()) {
        Some(key) => index.bisect_left(&key),
        None => index.len(),
    };

    if index.is_empty() || window_start >= window_end {
        return Ok(None);
    }

    let mut begin = window_start;
    let mut end = window_end;

    if let Some(first) = first {
        end = begin.saturating_add(first).min(window_end);
    }
    if let Some(last) = last {
        begin = end.saturating_sub(last).max(window_start);
    }

    Ok(Some(Window {
        window_start,
        window_end,
        begin,
        end,
    }))
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolve a connection over `index`.
///
/// The returned page borrows its nodes from the index; use
/// [`Connection::cloned`] to detach it.
pub fn resolve_connection<'a, T, K: CursorKey>(
    index: &'a SortedIndex<T, K>,
    args: &ConnectionArgs,
) -> PaginationResult<Connection<&'a T>> {
    let total_count = Some(index.len() as i64);

    let Some(window) = compute_window(index, args)? else {
        debug!(collection = index.name(), "Empty window");
        record_connection_resolved(index.name(), 0);
        return Ok(Connection::empty(total_count));
    };

    let codec = index.codec();
    let edges: Vec<Edge<&'a T>> = index
        .slice(window.begin, window.end)
        .iter()
        .map(|node| Edge {
            node,
            cursor: codec.encode(&index.key_of(node)),
        })
        .collect();

    let page_info = PageInfo {
        start_cursor: edges.first().map(|e| e.cursor.clone()),
        end_cursor: edges.last().map(|e| e.cursor.clone()),
        has_previous_page: window.has_previous_page(),
        has_next_page: window.has_next_page(),
    };

    debug!(
        collection = index.name(),
        window_start = window.window_start,
        window_end = window.window_end,
        begin = window.begin,
        end = window.end,
        "Resolved connection"
    );
    record_connection_resolved(index.name(), edges.len());

    Ok(Connection {
        edges,
        page_info,
        total_count,
    })
}

fn non_negative(argument: &'static str, value: Option<i32>) -> PaginationResult<Option<usize>> {
    match value {
        Some(v) if v < 0 => Err(PaginationError::InvalidArgument { argument, value: v }),
        Some(v) => Ok(Some(v as usize)),
        None => Ok(None),
    }
}

fn decode_argument<K: CursorKey>(
    codec: &crate::codec::CursorCodec,
    argument: &'static str,
    cursor: Option<&str>,
) -> Option<K> {
    let cursor = cursor?;
    let key = codec.decode(cursor);
    if key.is_none() {
        debug!(argument, "Ignoring undecodable cursor");
        record_cursor_rejected(argument);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CursorCodec;
    use crate::index::IndexConfig;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Letter {
        id: i64,
        letter: char,
    }

    fn letter_id(l: &Letter) -> i64 {
        l.id
    }

    /// A..E keyed 1..5, with the `sc:` cursor prefix.
    fn letters() -> SortedIndex<Letter, i64> {
        let config = IndexConfig::new("Letter", letter_id).with_codec(CursorCodec::new("sc:"));
        let mut index = SortedIndex::new(config);
        for (i, letter) in "ABCDE".chars().enumerate() {
            index
                .insert(Letter {
                    id: i as i64 + 1,
                    letter,
                })
                .unwrap();
        }
        index
    }

    fn cursor_for(index: &SortedIndex<Letter, i64>, letter: char) -> String {
        let node = index.iter().find(|l| l.letter == letter).unwrap();
        index.codec().encode(&node.id).value
    }

    fn cursor_for_key(key: i64) -> String {
        CursorCodec::new("sc:").encode(&key).value
    }

    /// Resolve `args` and compare letters, flags and boundary cursors.
    fn check(args: ConnectionArgs, expected: &str, has_previous_page: bool, has_next_page: bool) {
        let index = letters();
        let connection = resolve_connection(&index, &args).unwrap();

        let got: String = connection.nodes().map(|l| l.letter).collect();
        assert_eq!(got, expected, "edges for {:?}", args);
        assert_eq!(
            connection.page_info.has_previous_page, has_previous_page,
            "hasPreviousPage for {:?}",
            args
        );
        assert_eq!(
            connection.page_info.has_next_page, has_next_page,
            "hasNextPage for {:?}",
            args
        );

        let start = expected.chars().next().map(|c| cursor_for(&index, c));
        let end = expected.chars().last().map(|c| cursor_for(&index, c));
        assert_eq!(connection.page_info.start_cursor.map(String::from), start);
        assert_eq!(connection.page_info.end_cursor.map(String::from), end);

        for edge in &connection.edges {
            assert_eq!(edge.cursor.value, cursor_for(&index, edge.node.letter));
        }
        assert_eq!(connection.total_count, Some(5));
    }

    fn args() -> ConnectionArgs {
        ConnectionArgs::default()
    }

    // -------------------------------------------------------------------------
    // Forward / backward windows
    // -------------------------------------------------------------------------

    #[test]
    fn test_returns_all_elements_without_filters() {
        check(args(), "ABCDE", false, false);
    }

    #[test]
    fn test_respects_a_smaller_first() {
        check(args().first(2), "AB", false, true);
    }

    #[test]
    fn test_respects_an_overly_large_first() {
        check(args().first(10), "ABCDE", false, false);
    }

    #[test]
    fn test_respects_a_smaller_last() {
        check(args().last(2), "DE", true, false);
    }

    #[test]
    fn test_respects_an_overly_large_last() {
        check(args().last(10), "ABCDE", false, false);
    }

    #[test]
    fn test_respects_first_and_after() {
        let index = letters();
        check(args().first(2).after(cursor_for(&index, 'B')), "CD", false, true);
    }

    #[test]
    fn test_respects_first_and_after_with_long_first() {
        let index = letters();
        check(args().first(10).after(cursor_for(&index, 'B')), "CDE", false, false);
    }

    #[test]
    fn test_respects_last_and_before() {
        let index = letters();
        check(args().last(2).before(cursor_for(&index, 'D')), "BC", true, false);
    }

    #[test]
    fn test_respects_last_and_before_with_long_last() {
        let index = letters();
        check(args().last(10).before(cursor_for(&index, 'D')), "ABC", false, false);
    }

    // -------------------------------------------------------------------------
    // Both cursors
    // -------------------------------------------------------------------------

    fn between_a_and_e() -> ConnectionArgs {
        let index = letters();
        args()
            .after(cursor_for(&index, 'A'))
            .before(cursor_for(&index, 'E'))
    }

    #[test]
    fn test_first_after_and_before_too_few() {
        check(between_a_and_e().first(2), "BC", false, true);
    }

    #[test]
    fn test_first_after_and_before_too_many() {
        check(between_a_and_e().first(4), "BCD", false, false);
    }

    #[test]
    fn test_first_after_and_before_exactly_right() {
        check(between_a_and_e().first(3), "BCD", false, false);
    }

    #[test]
    fn test_last_after_and_before_too_few() {
        check(between_a_and_e().last(2), "CD", true, false);
    }

    #[test]
    fn test_last_after_and_before_too_many() {
        check(between_a_and_e().last(4), "BCD", false, false);
    }

    #[test]
    fn test_last_after_and_before_exactly_right() {
        check(between_a_and_e().last(3), "BCD", false, false);
    }

    #[test]
    fn test_first_then_last_trims_the_first_page() {
        // first: 4 keeps ABCD, last: 2 then keeps CD.
        check(args().first(4).last(2), "CD", true, true);
    }

    // -------------------------------------------------------------------------
    // Boundaries
    // -------------------------------------------------------------------------

    #[test]
    fn test_returns_no_elements_if_first_is_0() {
        check(args().first(0), "", false, true);
    }

    #[test]
    fn test_returns_no_elements_if_last_is_0() {
        check(args().last(0), "", true, false);
    }

    #[test]
    fn test_returns_all_elements_if_cursors_are_invalid() {
        check(args().before("invalid").after("invalid"), "ABCDE", false, false);
    }

    #[test]
    fn test_returns_all_elements_if_cursors_are_on_the_outside() {
        check(
            args().before(cursor_for_key(6)).after(cursor_for_key(0)),
            "ABCDE",
            false,
            false,
        );
    }

    #[test]
    fn test_returns_no_elements_if_cursors_cross() {
        check(
            args().before(cursor_for_key(2)).after(cursor_for_key(4)),
            "",
            false,
            false,
        );
    }

    #[test]
    fn test_cursor_from_another_collection_is_ignored() {
        let foreign = CursorCodec::new("other:").encode(&3i64).value;
        check(args().after(foreign), "ABCDE", false, false);
    }

    #[test]
    fn test_cursor_between_stored_keys() {
        let mut index = SortedIndex::new(
            IndexConfig::new("Letter", letter_id).with_codec(CursorCodec::new("sc:")),
        );
        for (id, letter) in [(10, 'A'), (20, 'B'), (30, 'C')] {
            index.insert(Letter { id, letter }).unwrap();
        }

        let args = args().after(cursor_for_key(15)).before(cursor_for_key(25));
        let connection = resolve_connection(&index, &args).unwrap();
        let got: String = connection.nodes().map(|l| l.letter).collect();
        assert_eq!(got, "B");
    }

    #[test]
    fn test_empty_index() {
        let index = SortedIndex::new(IndexConfig::new("Letter", letter_id));
        let connection = resolve_connection(&index, &args().first(3)).unwrap();
        assert!(connection.edges.is_empty());
        assert_eq!(connection.page_info, PageInfo::default());
        assert_eq!(connection.total_count, Some(0));
    }

    #[test]
    fn test_negative_counts_are_rejected() {
        let index = letters();
        assert_eq!(
            resolve_connection(&index, &args().first(-1)).unwrap_err(),
            PaginationError::InvalidArgument {
                argument: "first",
                value: -1
            }
        );
        assert_eq!(
            resolve_connection(&index, &args().last(-3)).unwrap_err(),
            PaginationError::InvalidArgument {
                argument: "last",
                value: -3
            }
        );
    }

    #[test]
    fn test_window_keeps_reference_bounds() {
        let index = letters();
        let window = compute_window(&index, &args().after(cursor_for(&index, 'A')).first(1))
            .unwrap()
            .unwrap();
        assert_eq!(
            window,
            Window {
                window_start: 1,
                window_end: 5,
                begin: 1,
                end: 2
            }
        );
        assert!(!window.has_previous_page());
        assert!(window.has_next_page());
    }

    #[test]
    fn test_cloned_page_outlives_index() {
        let connection = {
            let index = letters();
            let page = resolve_connection(&index, &args().last(1)).unwrap().cloned();
            page
        };
        assert_eq!(connection.edges[0].node.letter, 'E');
    }

    fn tag_key(tag: &String) -> String {
        tag.clone()
    }

    #[test]
    fn test_after_empty_string_key_skips_it() {
        let config = IndexConfig::new("Tag", tag_key).with_codec(CursorCodec::new("sc:"));
        let mut index = SortedIndex::new(config);
        for tag in ["", "a", "b"] {
            index.insert(tag.to_string()).unwrap();
        }

        let first_page = resolve_connection(&index, &args().first(1)).unwrap();
        let end_cursor = first_page.page_info.end_cursor.unwrap();
        assert_eq!(end_cursor, index.codec().encode(&String::new()));

        let next_page = resolve_connection(&index, &args().after(end_cursor.value)).unwrap();
        let got: Vec<&str> = next_page.nodes().map(|t| t.as_str()).collect();
        assert_eq!(got, ["a", "b"]);
        assert!(!next_page.page_info.has_previous_page);
    }

    // -------------------------------------------------------------------------
    // Properties over random collections
    // -------------------------------------------------------------------------

    fn number_key(n: &i64) -> i64 {
        *n
    }

    proptest! {
        #[test]
        fn prop_page_matches_window(
            keys in prop::collection::btree_set(-50i64..50, 0..20),
            after in proptest::option::of(-60i64..60),
            before in proptest::option::of(-60i64..60),
            first in proptest::option::of(0i32..12),
            last in proptest::option::of(0i32..12),
        ) {
            let mut index = SortedIndex::new(IndexConfig::new("Number", number_key));
            for key in &keys {
                index.insert(*key).unwrap();
            }
            let codec = index.codec().clone();
            let args = ConnectionArgs {
                before: before.map(|k| codec.encode(&k).value),
                after: after.map(|k| codec.encode(&k).value),
                first,
                last,
            };

            let window: Vec<i64> = keys
                .iter()
                .copied()
                .filter(|k| after.map_or(true, |a| *k > a))
                .filter(|k| before.map_or(true, |b| *k < b))
                .collect();
            let kept = first.map_or(window.len(), |f| window.len().min(f as usize));
            let returned = last.map_or(kept, |l| kept.min(l as usize));

            let connection = resolve_connection(&index, &args).unwrap();
            let got: Vec<i64> = connection.nodes().map(|n| **n).collect();

            prop_assert_eq!(&got[..], &window[kept - returned..kept]);
            if let Some(first) = first {
                prop_assert!(got.len() <= first as usize);
                prop_assert_eq!(connection.page_info.has_next_page, window.len() > first as usize);
            }
            if let (Some(last), None) = (last, first) {
                prop_assert!(got.len() <= last as usize);
                prop_assert_eq!(connection.page_info.has_previous_page, window.len() > last as usize);
            }
            prop_assert_eq!(connection.page_info.has_next_page, kept < window.len());
            prop_assert_eq!(connection.page_info.has_previous_page, returned < kept);
            prop_assert_eq!(connection.total_count, Some(keys.len() as i64));
        }
    }
}
