//! Search Module Tests
//!
//! ## Test Scopes
//! - **Local Search**: name and hash matching, category filtering, result stamping.
//! - **Fan-out**: remote merging, resilience to failing peers, origin attribution.
//! - **Ranking**: popularity order with a deterministic tie-break.
//! - **Endpoints**: local, form, JSON and hash search over HTTP.

#[cfg(test)]
mod tests {
    use crate::catalog::{CatalogEntry, CatalogStore, MemoryCatalog, SearchMode, SearchQuery};
    use crate::routes::test_support::{TestNode, dead_addr, spawn_node_with, spawn_router};
    use crate::search::engine::rank;
    use crate::search::types::{
        ENDPOINT_GLOBAL_SEARCH, ENDPOINT_JSON_GLOBAL_SEARCH, ENDPOINT_LOCAL_SEARCH,
        LocalSearchRequest, SearchResult, normalize_category,
    };
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn entry(name: &str, fingerprint: &str, category: &str, popularity: u64) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            path: format!("/srv/share/{}", name),
            fingerprint: fingerprint.to_string(),
            size: 100,
            category: category.to_string(),
            popularity,
            indexed_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    async fn node_with(entries: Vec<CatalogEntry>) -> TestNode {
        node_with_config(entries, |_| {}).await
    }

    async fn node_with_config(
        entries: Vec<CatalogEntry>,
        configure: impl FnOnce(&mut crate::config::NodeConfig),
    ) -> TestNode {
        let catalog = Arc::new(MemoryCatalog::new());
        for e in entries {
            catalog.upsert(e);
        }
        spawn_node_with(catalog, configure).await
    }

    fn url(node: &TestNode, endpoint: &str) -> String {
        format!("http://{}{}", node.addr, endpoint)
    }

    // ============================================================
    // LOCAL SEARCH TESTS
    // ============================================================

    #[tokio::test]
    async fn test_local_name_search_is_case_insensitive_substring() {
        let node = node_with(vec![
            entry("Quarterly REPORT.pdf", "aa01", "ebook", 0),
            entry("report-final.docx", "aa02", "document", 0),
            entry("notes.txt", "aa03", "plaintext", 0),
        ])
        .await;

        let results = node.ctx.search.local_search(&SearchQuery::name("report"));

        assert_eq!(results.len(), 2);
        assert!(
            results
                .iter()
                .all(|r| r.name.to_lowercase().contains("report"))
        );
    }

    #[tokio::test]
    async fn test_local_hash_search_is_exact() {
        let node = node_with(vec![
            entry("a.bin", "0123456789abcdef0123456789abcdef", "other", 0),
            entry("b.bin", "0123456789abcdef0123456789abcdee", "other", 0),
        ])
        .await;

        let hit = node
            .ctx
            .search
            .local_search(&SearchQuery::hash("0123456789abcdef0123456789abcdef"));
        let prefix = node
            .ctx
            .search
            .local_search(&SearchQuery::hash("0123456789abcdef"));

        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].name, "a.bin");
        assert!(prefix.is_empty());
    }

    #[tokio::test]
    async fn test_local_results_stamped_with_own_id() {
        let node = node_with(vec![entry("song.mp3", "bb01", "audio", 0)]).await;

        let results = node.ctx.search.local_search(&SearchQuery::name("song"));

        assert_eq!(results[0].origin_peer, node.id());
        assert_eq!(
            results[0].download_uri,
            format!("http://{}/download/bb01", node.id())
        );
    }

    #[tokio::test]
    async fn test_download_uri_follows_ssl_flag() {
        let node = node_with_config(vec![entry("song.mp3", "bb01", "audio", 0)], |config| {
            config.enable_ssl = true
        })
        .await;

        let results = node.ctx.search.local_search(&SearchQuery::name("song"));

        assert!(results[0].download_uri.starts_with("https://"));
    }

    #[tokio::test]
    async fn test_category_filter_applies() {
        let node = node_with(vec![
            entry("holiday.mp4", "cc01", "movie", 0),
            entry("holiday.jpg", "cc02", "image", 0),
        ])
        .await;

        let results = node
            .ctx
            .search
            .local_search(&SearchQuery::name("holiday").with_category("image"));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].fingerprint, "cc02");
    }

    #[test]
    fn test_all_category_means_no_filter() {
        assert_eq!(normalize_category(Some("all".to_string())), None);
        assert_eq!(normalize_category(Some(" ".to_string())), None);
        assert_eq!(normalize_category(None), None);
        assert_eq!(
            normalize_category(Some("movie".to_string())),
            Some("movie".to_string())
        );
    }

    #[test]
    fn test_local_request_accepts_md5_type() {
        let req: LocalSearchRequest = serde_json::from_str(
            r#"{"search_term":"abc","search_type":"md5","category":"all"}"#,
        )
        .unwrap();

        let query = SearchQuery::from(req);

        assert_eq!(query.mode, SearchMode::Hash);
        assert_eq!(query.category, None);
    }

    // ============================================================
    // RANKING TESTS
    // ============================================================

    #[test]
    fn test_rank_orders_by_popularity_descending() {
        let mut results: Vec<SearchResult> = [5, 0, 12]
            .iter()
            .enumerate()
            .map(|(i, p)| {
                SearchResult::from_entry(
                    entry(&format!("f{}", i), &format!("fp{}", i), "other", *p),
                    "127.0.0.1:5000",
                    crate::config::Protocol::Http,
                )
            })
            .collect();

        rank(&mut results);

        let order: Vec<u64> = results.iter().map(|r| r.popularity).collect();
        assert_eq!(order, vec![12, 5, 0]);
    }

    #[test]
    fn test_rank_tie_break_is_total() {
        let make = |origin: &str, name: &str, fp: &str| {
            SearchResult::from_entry(entry(name, fp, "other", 3), origin, crate::config::Protocol::Http)
        };
        let mut forward = vec![
            make("b:1", "a", "1"),
            make("a:1", "z", "2"),
            make("a:1", "m", "4"),
            make("a:1", "m", "3"),
        ];
        let mut reversed: Vec<SearchResult> = forward.iter().rev().cloned().collect();

        rank(&mut forward);
        rank(&mut reversed);

        assert_eq!(forward, reversed);
        let keys: Vec<(&str, &str, &str)> = forward
            .iter()
            .map(|r| (r.origin_peer.as_str(), r.name.as_str(), r.fingerprint.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("a:1", "m", "3"), ("a:1", "m", "4"), ("a:1", "z", "2"), ("b:1", "a", "1")]
        );
    }

    // ============================================================
    // FAN-OUT TESTS
    // ============================================================

    #[tokio::test]
    async fn test_global_search_merges_and_ranks_across_peers() {
        // ARRANGE: popularity 5 locally, 0 and 12 on two peers
        let a = node_with(vec![entry("report-a.txt", "fa", "plaintext", 5)]).await;
        let b = node_with(vec![entry("report-b.txt", "fb", "plaintext", 0)]).await;
        let c = node_with(vec![entry("report-c.txt", "fc", "plaintext", 12)]).await;
        a.ctx.membership.merge(vec![b.id(), c.id()]).await;

        // ACT
        let results = a.ctx.search.search(&SearchQuery::name("report")).await;

        // ASSERT
        let popularity: Vec<u64> = results.iter().map(|r| r.popularity).collect();
        assert_eq!(popularity, vec![12, 5, 0]);
        assert_eq!(results[0].origin_peer, c.id());
        assert_eq!(results[1].origin_peer, a.id());
        assert_eq!(results[2].origin_peer, b.id());
        assert_eq!(
            results[0].download_uri,
            format!("http://{}/download/fc", c.id())
        );
    }

    #[tokio::test]
    async fn test_failing_peers_contribute_nothing() {
        // ARRANGE: one good peer, one returning 500, one not listening
        let a = node_with(vec![entry("report-a.txt", "fa", "plaintext", 1)]).await;
        let b = node_with(vec![entry("report-b.txt", "fb", "plaintext", 2)]).await;
        let broken = spawn_router(Router::new().route(
            ENDPOINT_LOCAL_SEARCH,
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await
        .to_string();
        let dead = dead_addr().await.to_string();
        a.ctx.membership.merge(vec![b.id(), broken, dead]).await;

        // ACT
        let results = a.ctx.search.search(&SearchQuery::name("report")).await;

        // ASSERT
        let fingerprints: Vec<&str> = results.iter().map(|r| r.fingerprint.as_str()).collect();
        assert_eq!(fingerprints, vec!["fb", "fa"]);
    }

    #[tokio::test]
    async fn test_remote_results_attributed_to_dialed_peer() {
        // A peer that claims its results come from somewhere else
        let spoofed = SearchResult {
            name: "report.txt".to_string(),
            path: "/x/report.txt".to_string(),
            fingerprint: "ff".to_string(),
            size: 1,
            category: "plaintext".to_string(),
            popularity: 0,
            indexed_at: None,
            origin_peer: "elsewhere:1".to_string(),
            download_uri: "http://elsewhere:1/download/ff".to_string(),
        };
        let liar = spawn_router(Router::new().route(
            ENDPOINT_LOCAL_SEARCH,
            post(move || {
                let spoofed = spoofed.clone();
                async move { Json(vec![spoofed]) }
            }),
        ))
        .await
        .to_string();

        let a = node_with(vec![]).await;
        a.ctx.membership.merge(vec![liar.clone()]).await;

        let results = a.ctx.search.search(&SearchQuery::name("report")).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].origin_peer, liar);
        assert_eq!(results[0].download_uri, format!("http://{}/download/ff", liar));
    }

    #[tokio::test]
    async fn test_global_search_is_deterministic() {
        let a = node_with(vec![
            entry("dup-1.txt", "d1", "plaintext", 3),
            entry("dup-2.txt", "d2", "plaintext", 3),
        ])
        .await;
        let b = node_with(vec![entry("dup-3.txt", "d3", "plaintext", 3)]).await;
        a.ctx.membership.merge(vec![b.id()]).await;

        let first = a.ctx.search.search(&SearchQuery::name("dup")).await;
        let second = a.ctx.search.search(&SearchQuery::name("dup")).await;

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fanout_limit_still_reaches_every_peer() {
        let a = node_with_config(vec![], |config| config.search_fanout_limit = Some(1)).await;
        let mut peers = Vec::new();
        for i in 0..3 {
            let peer = node_with(vec![entry(
                &format!("limited-{}.txt", i),
                &format!("l{}", i),
                "plaintext",
                i,
            )])
            .await;
            peers.push(peer);
        }
        a.ctx
            .membership
            .merge(peers.iter().map(|p| p.id()).collect::<Vec<_>>())
            .await;

        let results = a.ctx.search.search(&SearchQuery::name("limited")).await;

        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_slow_peers_are_queried_concurrently() {
        // ARRANGE: three peers that each take DELAY to answer
        const DELAY: Duration = Duration::from_millis(400);
        let mut peers = Vec::new();
        for i in 0..3 {
            let result = SearchResult {
                name: format!("slow-{}.txt", i),
                path: format!("/x/slow-{}.txt", i),
                fingerprint: format!("s{}", i),
                size: 1,
                category: "plaintext".to_string(),
                popularity: 0,
                indexed_at: None,
                origin_peer: String::new(),
                download_uri: String::new(),
            };
            let addr = spawn_router(Router::new().route(
                ENDPOINT_LOCAL_SEARCH,
                post(move || {
                    let result = result.clone();
                    async move {
                        tokio::time::sleep(DELAY).await;
                        Json(vec![result])
                    }
                }),
            ))
            .await;
            peers.push(addr.to_string());
        }

        let a = node_with(vec![]).await;
        a.ctx.membership.merge(peers).await;

        // ACT
        let started = Instant::now();
        let results = a.ctx.search.search(&SearchQuery::name("slow")).await;
        let elapsed = started.elapsed();

        // ASSERT: sequential calls would need 3 x DELAY
        assert_eq!(results.len(), 3);
        assert!(elapsed < DELAY * 2, "fan-out took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_no_peers_returns_local_only() {
        let a = node_with(vec![entry("solo.txt", "s1", "plaintext", 0)]).await;

        let results = a.ctx.search.search(&SearchQuery::name("solo")).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].origin_peer, a.id());
    }

    // ============================================================
    // ENDPOINT TESTS
    // ============================================================

    #[tokio::test]
    async fn test_localsearch_endpoint_does_not_fan_out() {
        let a = node_with(vec![entry("report-a.txt", "fa", "plaintext", 0)]).await;
        let b = node_with(vec![entry("report-b.txt", "fb", "plaintext", 0)]).await;
        a.ctx.membership.merge(vec![b.id()]).await;

        let results: Vec<SearchResult> = reqwest::Client::new()
            .post(url(&a, ENDPOINT_LOCAL_SEARCH))
            .json(&serde_json::json!({ "search_term": "report", "search_type": "name" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].fingerprint, "fa");
    }

    #[tokio::test]
    async fn test_global_search_form_endpoint() {
        let a = node_with(vec![entry("clip.mp4", "v1", "movie", 0)]).await;
        let b = node_with(vec![
            entry("clip-2.mp4", "v2", "movie", 0),
            entry("clip.jpg", "i1", "image", 0),
        ])
        .await;
        a.ctx.membership.merge(vec![b.id()]).await;

        let results: Vec<SearchResult> = reqwest::Client::new()
            .post(url(&a, ENDPOINT_GLOBAL_SEARCH))
            .form(&[("query", "clip"), ("category", "movie")])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let mut fingerprints: Vec<&str> = results.iter().map(|r| r.fingerprint.as_str()).collect();
        fingerprints.sort();
        assert_eq!(fingerprints, vec!["v1", "v2"]);
    }

    #[tokio::test]
    async fn test_global_search_json_endpoint_with_all_category() {
        let a = node_with(vec![
            entry("clip.mp4", "v1", "movie", 0),
            entry("clip.jpg", "i1", "image", 0),
        ])
        .await;

        let results: Vec<SearchResult> = reqwest::Client::new()
            .post(url(&a, ENDPOINT_JSON_GLOBAL_SEARCH))
            .json(&serde_json::json!({ "query": "clip", "category": "all" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_hash_search_endpoint_finds_remote_copy() {
        let a = node_with(vec![]).await;
        let b = node_with(vec![entry("remote.iso", "abcdef", "other", 0)]).await;
        a.ctx.membership.merge(vec![b.id()]).await;

        let results: Vec<SearchResult> = reqwest::get(url(&a, "/json/hash_search/abcdef"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].origin_peer, b.id());
    }
}
