// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::pages::{
    arca_detail, arca_list, arca_list_url, arca_post_url, dc_board_list, dc_detail,
    dc_search_results,
};
use crate::helpers::{
    arca_adapter, dc_adapter, record, FailingAdapter, FakeLauncher, PanickingAdapter,
    SlowAdapter, StaticAdapter,
};
use forumcrawl::application::orchestrator::CrawlOrchestrator;
use forumcrawl::domain::community::CommunityAdapter;
use forumcrawl::domain::models::task::{BoardKind, SearchField, SortMode, Source, Task, TaskOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dc_task(board: Option<&str>, keyword: &str, end: u32) -> Task {
    Task::new(
        keyword,
        1,
        end,
        TaskOptions::DcInside {
            board_id: board.map(str::to_string),
            board_kind: BoardKind::Minor,
            search_field: SearchField::SubjectAndBody,
            sort_mode: SortMode::Latest,
            fallback_to_search: false,
        },
    )
    .unwrap()
}

fn arca_task(keyword: &str) -> Task {
    Task::new(keyword, 1, 1, TaskOptions::ArcaLive { channel_id: None }).unwrap()
}

#[tokio::test]
async fn interleaves_results_from_both_sources() {
    let server = MockServer::start().await;
    let uri = server.uri();
    Mock::given(method("GET"))
        .and(path("/post/p/1/q/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(dc_search_results(
            &uri,
            &[("coffee", "1"), ("coffee", "2"), ("tea", "3")],
        )))
        .mount(&server)
        .await;
    for id in ["1", "2", "3"] {
        Mock::given(method("GET"))
            .and(path("/board/view/"))
            .and(query_param("no", id))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(dc_detail(&format!("dc {id}"), &[])),
            )
            .mount(&server)
            .await;
    }

    let launcher = FakeLauncher::new(vec![
        (
            arca_list_url("breaking", "abc", 1),
            arca_list(&[("101", Some("game")), ("102", Some("music"))]),
        ),
        (arca_post_url("101"), arca_detail("arca 101", Some(&["nice"]))),
        (arca_post_url("102"), arca_detail("arca 102", None)),
    ]);

    let orchestrator = CrawlOrchestrator::new(vec![
        Arc::new(dc_adapter(&uri, &["singo"])) as Arc<dyn CommunityAdapter>,
        Arc::new(arca_adapter(launcher.clone(), &["my"])),
    ]);

    let rows = orchestrator
        .run(vec![dc_task(None, "abc", 1), arca_task("abc")])
        .await;

    let order: Vec<_> = rows
        .iter()
        .map(|row| (row.task_source, row.record.post_id.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            (Source::DcInside, "1"),
            (Source::ArcaLive, "101"),
            (Source::DcInside, "2"),
            (Source::ArcaLive, "102"),
            (Source::DcInside, "3"),
        ]
    );
    assert!(rows.iter().all(|row| row.task_keyword == "abc"));
    assert_eq!(rows[1].record.board_id, "game");
    assert_eq!(rows[1].record.comments, vec!["nice".to_string()]);
    assert_eq!(rows[4].record.board_id, "tea");
    assert_eq!(launcher.close_count(), 1);
}

#[tokio::test]
async fn failing_and_panicking_tasks_contribute_nothing() {
    let orchestrator = CrawlOrchestrator::new(vec![
        Arc::new(PanickingAdapter(Source::ArcaLive)) as Arc<dyn CommunityAdapter>,
        Arc::new(StaticAdapter {
            source: Source::DcInside,
            records: vec![
                record(Source::DcInside, "coffee", "1"),
                record(Source::DcInside, "coffee", "2"),
            ],
        }),
    ]);

    let rows = orchestrator
        .run(vec![arca_task("abc"), dc_task(Some("coffee"), "abc", 1)])
        .await;

    let ids: Vec<_> = rows.iter().map(|r| r.record.post_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert!(rows.iter().all(|r| r.task_source == Source::DcInside));

    let orchestrator = CrawlOrchestrator::new(vec![
        Arc::new(FailingAdapter(Source::ArcaLive)) as Arc<dyn CommunityAdapter>,
    ]);
    let rows = orchestrator.run(vec![arca_task("abc")]).await;
    assert!(rows.is_empty());
}

#[tokio::test]
async fn empty_page_stops_only_its_own_task() {
    let server = MockServer::start().await;
    let uri = server.uri();
    Mock::given(method("GET"))
        .and(path("/mgallery/board/lists"))
        .and(query_param("id", "empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string(dc_board_list("empty", &[])))
        .expect(1)
        .mount(&server)
        .await;
    for page in ["1", "2"] {
        let id = format!("{page}0");
        Mock::given(method("GET"))
            .and(path("/mgallery/board/lists"))
            .and(query_param("id", "busy"))
            .and(query_param("page", page))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(dc_board_list("busy", &[id.as_str()])),
            )
            .mount(&server)
            .await;
    }
    for id in ["10", "20"] {
        Mock::given(method("GET"))
            .and(path("/mgallery/board/view/"))
            .and(query_param("no", id))
            .respond_with(ResponseTemplate::new(200).set_body_string(dc_detail(id, &[])))
            .mount(&server)
            .await;
    }

    let orchestrator = CrawlOrchestrator::new(vec![
        Arc::new(dc_adapter(&uri, &[])) as Arc<dyn CommunityAdapter>
    ]);
    let rows = orchestrator
        .run(vec![
            dc_task(Some("empty"), "", 3),
            dc_task(Some("busy"), "", 2),
        ])
        .await;

    let ids: Vec<_> = rows.iter().map(|r| r.record.post_id.as_str()).collect();
    assert_eq!(ids, vec!["10", "20"]);
    assert!(rows.iter().all(|r| r.record.board_id == "busy"));
}

#[tokio::test]
async fn no_results_yields_an_empty_table() {
    let orchestrator = CrawlOrchestrator::new(vec![
        Arc::new(StaticAdapter {
            source: Source::DcInside,
            records: vec![],
        }) as Arc<dyn CommunityAdapter>,
        Arc::new(StaticAdapter {
            source: Source::ArcaLive,
            records: vec![],
        }),
    ]);

    let rows = orchestrator
        .run(vec![dc_task(Some("coffee"), "abc", 1), arca_task("abc")])
        .await;

    assert!(rows.is_empty());
}

#[tokio::test]
async fn tasks_without_an_adapter_are_ignored() {
    let orchestrator = CrawlOrchestrator::new(vec![Arc::new(StaticAdapter {
        source: Source::DcInside,
        records: vec![record(Source::DcInside, "coffee", "1")],
    }) as Arc<dyn CommunityAdapter>]);

    assert!(orchestrator.supports(Source::DcInside));
    assert!(!orchestrator.supports(Source::ArcaLive));

    let rows = orchestrator
        .run(vec![arca_task("abc"), dc_task(Some("coffee"), "abc", 1)])
        .await;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].task_source, Source::DcInside);
}

#[tokio::test]
async fn disallowed_sentinel_is_tagged_like_any_other_row() {
    let orchestrator = CrawlOrchestrator::new(vec![Arc::new(arca_adapter(
        FakeLauncher::default(),
        &["my"],
    )) as Arc<dyn CommunityAdapter>]);

    let task = Task::new(
        "abc",
        1,
        1,
        TaskOptions::ArcaLive {
            channel_id: Some("my".to_string()),
        },
    )
    .unwrap();
    let rows = orchestrator.run(vec![task]).await;

    assert_eq!(rows.len(), 1);
    assert!(rows[0].record.is_disallowed_marker());
    assert_eq!(rows[0].task_source, Source::ArcaLive);
    assert_eq!(rows[0].task_keyword, "abc");
}

#[tokio::test(start_paused = true)]
async fn tasks_run_concurrently() {
    let orchestrator = CrawlOrchestrator::new(vec![
        Arc::new(SlowAdapter {
            source: Source::DcInside,
            delay: Duration::from_secs(5),
            records: vec![record(Source::DcInside, "coffee", "1")],
        }) as Arc<dyn CommunityAdapter>,
        Arc::new(SlowAdapter {
            source: Source::ArcaLive,
            delay: Duration::from_secs(5),
            records: vec![record(Source::ArcaLive, "game", "100")],
        }),
    ]);

    let started = Instant::now();
    let rows = orchestrator
        .run(vec![dc_task(Some("coffee"), "abc", 1), arca_task("abc")])
        .await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(5));
    assert!(elapsed < Duration::from_secs(10), "took {elapsed:?}");
    let sources: Vec<_> = rows.iter().map(|r| r.task_source).collect();
    assert_eq!(sources, vec![Source::DcInside, Source::ArcaLive]);
}
