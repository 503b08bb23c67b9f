use crate::types::udi::Udi;

/// Splits `originalUrl` into `(path, query)` at the first `?`, matching the
/// reference resolver's handling of `req.originalUrl`.
pub fn split_path_and_query(original_url: &str) -> (&str, Option<&str>) {
    match original_url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (original_url, None),
    }
}

/// Collapses an accidental duplicated first path segment introduced by
/// upstream rewriters, e.g. `/ab...64hex/ab...64hex/foo` → `/ab...64hex/foo`.
/// Idempotent: a second pass over its own output is a no-op.
pub fn remove_duplicate_path_part(path: &str) -> String {
    let leading_slash = path.starts_with('/');
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.len() >= 2 && segments[0] == segments[1] && segments[0].len() >= 64 {
        segments.remove(1);
    }

    let mut rebuilt = String::new();
    if leading_slash {
        rebuilt.push('/');
    }
    rebuilt.push_str(&segments.join("/"));
    rebuilt
}

/// Splits a normalized path into its UDI segment (first non-empty segment)
/// and subpath (everything after), as separate owned strings.
pub fn split_udi_segment(path: &str) -> (Option<String>, String) {
    let trimmed = path.trim_start_matches('/');
    match trimmed.split_once('/') {
        Some((segment, rest)) if !segment.is_empty() => {
            (Some(segment.to_string()), format!("/{rest}"))
        }
        Some(_) => (None, path.to_string()),
        None if !trimmed.is_empty() => (Some(trimmed.to_string()), String::new()),
        None => (None, path.to_string()),
    }
}

/// Outcome of applying the UDI segment grammar (§4.1) to the first path
/// segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentParse {
    /// The segment decoded into (a fragment of) chain/store/root.
    Udi(Udi),
    /// The segment does not look like a UDI at all; it folds back into the
    /// subpath and resolution proceeds with an empty storeId.
    NotUdi,
}

/// Applies the `<chain>.<storeId>.<rootHash>` grammar to one path segment.
pub fn parse_udi_segment(segment: &str) -> SegmentParse {
    let parts: Vec<&str> = segment.split('.').collect();
    match parts.as_slice() {
        [chain, store, root] => SegmentParse::Udi(Udi {
            chain: Some((*chain).to_string()),
            store_id: Some((*store).to_string()),
            root_hash: Some((*root).to_string()),
        }),
        [first, second] if first.len() == 64 => SegmentParse::Udi(Udi {
            chain: None,
            store_id: Some((*first).to_string()),
            root_hash: Some((*second).to_string()),
        }),
        [first, second] => SegmentParse::Udi(Udi {
            chain: Some((*first).to_string()),
            store_id: Some((*second).to_string()),
            root_hash: None,
        }),
        [single] if single.len() == 64 => SegmentParse::Udi(Udi {
            chain: None,
            store_id: Some((*single).to_string()),
            root_hash: None,
        }),
        [_single] => SegmentParse::NotUdi,
        // Four or more dot-parts: not decoded by the grammar. The whole
        // segment is carried as storeId verbatim, which is never a valid
        // 64-hex string, so it falls straight into the invalid-storeId path.
        _ => SegmentParse::Udi(Udi {
            chain: None,
            store_id: Some(segment.to_string()),
            root_hash: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_path_and_query() {
        assert_eq!(
            split_path_and_query("/a/b?x=1"),
            ("/a/b", Some("x=1"))
        );
        assert_eq!(split_path_and_query("/a/b"), ("/a/b", None));
    }

    #[test]
    fn removes_duplicate_leading_segment_when_it_looks_like_a_store_id() {
        let store = "a".repeat(64);
        let path = format!("/{store}/{store}/foo");
        assert_eq!(
            remove_duplicate_path_part(&path),
            format!("/{store}/foo")
        );
    }

    #[test]
    fn leaves_short_duplicate_segments_alone() {
        assert_eq!(remove_duplicate_path_part("/a/a/foo"), "/a/a/foo");
    }

    #[test]
    fn remove_duplicate_path_part_is_idempotent() {
        let store = "a".repeat(64);
        let path = format!("/{store}/{store}/foo");
        let once = remove_duplicate_path_part(&path);
        let twice = remove_duplicate_path_part(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn parses_three_part_segment() {
        let parsed = parse_udi_segment("chia.storeid.roothash");
        assert_eq!(
            parsed,
            SegmentParse::Udi(Udi {
                chain: Some("chia".to_string()),
                store_id: Some("storeid".to_string()),
                root_hash: Some("roothash".to_string()),
            })
        );
    }

    #[test]
    fn parses_two_part_segment_with_long_first_part_as_store_and_root() {
        let store = "a".repeat(64);
        let parsed = parse_udi_segment(&format!("{store}.root"));
        assert_eq!(
            parsed,
            SegmentParse::Udi(Udi {
                chain: None,
                store_id: Some(store),
                root_hash: Some("root".to_string()),
            })
        );
    }

    #[test]
    fn parses_two_part_segment_with_short_first_part_as_chain_and_store() {
        let parsed = parse_udi_segment("chia.store");
        assert_eq!(
            parsed,
            SegmentParse::Udi(Udi {
                chain: Some("chia".to_string()),
                store_id: Some("store".to_string()),
                root_hash: None,
            })
        );
    }

    #[test]
    fn single_long_part_is_store_id_only() {
        let store = "a".repeat(64);
        let parsed = parse_udi_segment(&store);
        assert_eq!(
            parsed,
            SegmentParse::Udi(Udi {
                chain: None,
                store_id: Some(store),
                root_hash: None,
            })
        );
    }

    #[test]
    fn single_short_part_is_not_a_udi() {
        assert_eq!(parse_udi_segment("bogus"), SegmentParse::NotUdi);
    }

    #[test]
    fn four_dot_parts_fold_into_invalid_store_id() {
        let parsed = parse_udi_segment("a.b.c.d");
        match parsed {
            SegmentParse::Udi(udi) => {
                assert_eq!(udi.store_id.as_deref(), Some("a.b.c.d"));
                assert!(!Udi::is_store_id_valid(&udi.store_id.unwrap()));
            }
            SegmentParse::NotUdi => panic!("expected Udi variant"),
        }
    }
}
