use crate::{
    error::internal::InternalError,
    oracle::CoinInfoClient,
    types::{RequestContext, Udi, UdiCookie},
    udi::parser::{parse_udi_segment, remove_duplicate_path_part, split_udi_segment, SegmentParse},
};

/// Default chain used by the "chain-defaulted" redirect forms in §6. This
/// is a literal from the wire contract, independent of the configured
/// chain allow-list.
const DEFAULT_CHAIN: &str = "chia";

#[derive(Debug, Clone)]
pub struct ResolveInput<'a> {
    pub original_url: &'a str,
    pub cookie: Option<UdiCookie>,
    pub referer: Option<&'a str>,
    pub cf_id: Option<&'a str>,
    pub forwarded_host: Option<&'a str>,
    pub host: Option<&'a str>,
    pub origin_path: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Redirect(String),
    BadRequest { body: String },
    UnknownChain { chain: String, store_id: String },
    Resolved {
        context: RequestContext,
        set_cookie: UdiCookie,
    },
}

/// Runs the full UDI resolution state machine (§4.1) for one request.
pub async fn resolve<O: CoinInfoClient>(
    input: ResolveInput<'_>,
    allowed_chains: &[String],
    coin_info: &O,
) -> Result<ResolveOutcome, InternalError> {
    let (path, query) = super::parser::split_path_and_query(input.original_url);
    let normalized = remove_duplicate_path_part(path);
    let (segment, subpath) = split_udi_segment(&normalized);

    let (mut udi, subpath) = match segment {
        None => (Udi::default(), subpath),
        Some(segment) => match parse_udi_segment(&segment) {
            SegmentParse::Udi(udi) => (udi, subpath),
            SegmentParse::NotUdi => (Udi::default(), format!("/{segment}{subpath}")),
        },
    };

    let store_id_valid = udi
        .store_id
        .as_deref()
        .is_some_and(Udi::is_store_id_valid);

    if !store_id_valid {
        if let Some(cookie) = &input.cookie {
            let location = finalize_redirect(
                &format!(
                    "/{}.{}{subpath}",
                    cookie.chain_name, cookie.store_id
                ),
                query,
                &input,
            );
            return Ok(ResolveOutcome::Redirect(location));
        }
        if let Some(referer) = input.referer {
            let location = finalize_redirect(&format!("{referer}{subpath}"), query, &input);
            return Ok(ResolveOutcome::Redirect(location));
        }
        return Ok(ResolveOutcome::BadRequest {
            body: "Invalid or missing storeId.".to_string(),
        });
    }

    let store_id = udi.store_id.clone().expect("validated above");

    if (udi.chain.is_none() || udi.root_hash.is_none()) && input.cookie.is_some() {
        let cookie = input.cookie.as_ref().expect("checked above");
        if should_adopt_cookie(&store_id, udi.root_hash.as_deref(), cookie) {
            udi.chain = udi.chain.or_else(|| Some(cookie.chain_name.clone()));
            udi.root_hash = udi.root_hash.or_else(|| Some(cookie.root_hash.clone()));
        }
    }

    if udi.chain.is_none() && udi.root_hash.is_none() {
        let root_hash = coin_info.fetch_coin_info(&store_id).await?;
        let location = finalize_redirect(
            &format!("/{DEFAULT_CHAIN}.{store_id}.{root_hash}{subpath}"),
            query,
            &input,
        );
        return Ok(ResolveOutcome::Redirect(location));
    }

    if udi.chain.is_none() {
        let root_hash = udi.root_hash.clone().expect("checked above");
        let location = finalize_redirect(
            &format!("/{DEFAULT_CHAIN}.{store_id}.{root_hash}{subpath}"),
            query,
            &input,
        );
        return Ok(ResolveOutcome::Redirect(location));
    }

    let chain = udi.chain.clone().expect("checked above");
    if !allowed_chains.iter().any(|allowed| allowed == &chain) {
        return Ok(ResolveOutcome::UnknownChain { chain, store_id });
    }

    if udi.root_hash.is_none() {
        let root_hash = coin_info.fetch_coin_info(&store_id).await?;
        udi.root_hash = Some(root_hash);
    }

    let root_hash = udi.root_hash.clone().expect("fetched above");
    let (key, subpath) = extract_key(&subpath);

    let context = RequestContext {
        chain: chain.clone(),
        store_id: store_id.clone(),
        root_hash: root_hash.clone(),
        subpath,
        key,
    };
    let set_cookie = UdiCookie {
        chain_name: chain,
        store_id,
        root_hash,
    };
    Ok(ResolveOutcome::Resolved { context, set_cookie })
}

/// Preserves the source's cookie-adoption condition verbatim, including the
/// case where the cookie's rootHash matches the *request's* rootHash even
/// when the storeIds differ (`cookie_adoption_accepts_mismatched_store_with_matching_root_hash`
/// below). This is a known quirk of the upstream behavior, not a bug
/// introduced here.
fn should_adopt_cookie(store_id: &str, root_hash: Option<&str>, cookie: &UdiCookie) -> bool {
    store_id.is_empty()
        || cookie.store_id == store_id
        || root_hash.is_some_and(|root_hash| cookie.root_hash == root_hash)
}

/// Derives the content key used by the selector's key-aware fallback
/// (§4.3) from the subpath following the UDI segment. A non-empty subpath
/// is treated as the key the client wants validated against the store;
/// the subpath itself is preserved unchanged for forwarding.
fn extract_key(subpath: &str) -> (Option<String>, String) {
    let trimmed = subpath.trim_start_matches('/');
    if trimmed.is_empty() {
        (None, subpath.to_string())
    } else {
        (Some(trimmed.to_string()), subpath.to_string())
    }
}

fn finalize_redirect(path: &str, query: Option<&str>, input: &ResolveInput<'_>) -> String {
    let mut path = path.to_string();

    if let Some(origin_path) = input.origin_path {
        let origin_path = origin_path.trim_matches('/');
        let trimmed = path.trim_start_matches('/');
        if let Some(rest) = trimmed.strip_prefix(origin_path) {
            if rest.is_empty() || rest.starts_with('/') {
                path = if rest.is_empty() {
                    "/".to_string()
                } else {
                    rest.to_string()
                };
            }
        }
    }

    if let Some(query) = query {
        path.push('?');
        path.push_str(query);
    }

    if input.cf_id.is_some() {
        let host = input.forwarded_host.or(input.host).unwrap_or_default();
        return format!("https://{host}{path}");
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubCoinInfo(&'static str);

    impl CoinInfoClient for StubCoinInfo {
        async fn fetch_coin_info(&self, _store_id: &str) -> Result<String, InternalError> {
            Ok(self.0.to_string())
        }
    }

    fn store() -> String {
        "a".repeat(64)
    }

    #[tokio::test]
    async fn redirects_to_canonical_chain_when_no_chain_or_root_known() {
        let store_id = store();
        let input = ResolveInput {
            original_url: &store_id,
            cookie: None,
            referer: None,
            cf_id: None,
            forwarded_host: None,
            host: None,
            origin_path: None,
        };
        let outcome = resolve(input, &["chia".to_string()], &StubCoinInfo("0011ff"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ResolveOutcome::Redirect(format!("/chia.{store_id}.0011ff"))
        );
    }

    #[tokio::test]
    async fn rejects_invalid_store_id_without_cookie_or_referer() {
        let input = ResolveInput {
            original_url: "/bogus",
            cookie: None,
            referer: None,
            cf_id: None,
            forwarded_host: None,
            host: None,
            origin_path: None,
        };
        let outcome = resolve(input, &["chia".to_string()], &StubCoinInfo("unused"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ResolveOutcome::BadRequest {
                body: "Invalid or missing storeId.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn unknown_chain_is_rejected() {
        let store_id = store();
        let input = ResolveInput {
            original_url: &format!("/eth.{store_id}.deadbeef"),
            cookie: None,
            referer: None,
            cf_id: None,
            forwarded_host: None,
            host: None,
            origin_path: None,
        };
        let outcome = resolve(input, &["chia".to_string()], &StubCoinInfo("unused"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ResolveOutcome::UnknownChain {
                chain: "eth".to_string(),
                store_id,
            }
        );
    }

    #[tokio::test]
    async fn cookie_adoption_accepts_mismatched_store_with_matching_root_hash() {
        let requested_store = store();
        let other_store = "b".repeat(64);
        let input = ResolveInput {
            original_url: &format!("/{requested_store}.deadbeef"),
            cookie: Some(UdiCookie {
                chain_name: "chia".to_string(),
                store_id: other_store,
                root_hash: "deadbeef".to_string(),
            }),
            referer: None,
            cf_id: None,
            forwarded_host: None,
            host: None,
            origin_path: None,
        };
        let outcome = resolve(input, &["chia".to_string()], &StubCoinInfo("unused"))
            .await
            .unwrap();
        match outcome {
            ResolveOutcome::Resolved { context, .. } => {
                assert_eq!(context.chain, "chia");
                assert_eq!(context.root_hash, "deadbeef");
                assert_eq!(context.store_id, requested_store);
            }
            other => panic!("expected Resolved, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn well_formed_identifier_resolves_without_redirect() {
        let store_id = store();
        let input = ResolveInput {
            original_url: &format!("/chia.{store_id}.deadbeef/foo/bar"),
            cookie: None,
            referer: None,
            cf_id: None,
            forwarded_host: None,
            host: None,
            origin_path: None,
        };
        let outcome = resolve(input, &["chia".to_string()], &StubCoinInfo("unused"))
            .await
            .unwrap();
        match outcome {
            ResolveOutcome::Resolved { context, set_cookie } => {
                assert_eq!(context.chain, "chia");
                assert_eq!(context.store_id, store_id);
                assert_eq!(context.root_hash, "deadbeef");
                assert_eq!(context.subpath, "/foo/bar");
                assert_eq!(set_cookie.root_hash, "deadbeef");
            }
            other => panic!("expected Resolved, got {other:?}"),
        }
    }
}
