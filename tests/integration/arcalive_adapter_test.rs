// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::pages::{arca_detail, arca_list, arca_list_url, arca_post_url};
use crate::helpers::{arca_adapter, FakeLauncher};
use forumcrawl::domain::community::{AdapterError, CommunityAdapter};
use forumcrawl::domain::models::task::{Source, Task, TaskOptions};
use std::sync::Arc;

fn channel_task(channel: Option<&str>, keyword: &str, start: u32, end: u32) -> Task {
    Task::new(
        keyword,
        start,
        end,
        TaskOptions::ArcaLive {
            channel_id: channel.map(str::to_string),
        },
    )
    .unwrap()
}

#[tokio::test]
async fn crawls_aggregate_channel_with_badges() {
    let launcher = FakeLauncher::new(vec![
        (
            arca_list_url("breaking", "abc", 1),
            arca_list(&[("1001", Some("game")), ("1002", Some("music"))]),
        ),
        (
            arca_post_url("1001"),
            arca_detail("game body", Some(&["first", "삭제된 댓글입니다", "second"])),
        ),
        (arca_post_url("1002"), arca_detail("music body", Some(&[]))),
    ]);
    let adapter = arca_adapter(launcher.clone(), &["my"]);

    let records = adapter
        .crawl(&channel_task(None, "abc", 1, 1))
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].source, Source::ArcaLive);
    assert_eq!(records[0].post_id, "1001");
    assert_eq!(records[0].board_id, "game");
    assert_eq!(records[0].content, "game body");
    assert_eq!(
        records[0].comments,
        vec!["first".to_string(), "second".to_string()]
    );
    assert_eq!(records[1].board_id, "music");
    assert!(records[1].comments.is_empty());

    assert_eq!(launcher.launch_count(), 1);
    assert_eq!(launcher.close_count(), 1);
}

#[tokio::test]
async fn missing_badge_uses_placeholder_board() {
    let launcher = FakeLauncher::new(vec![
        (arca_list_url("breaking", "", 1), arca_list(&[("2001", None)])),
        (arca_post_url("2001"), arca_detail("no badge", None)),
    ]);
    let adapter = arca_adapter(launcher, &[]);

    let records = adapter.crawl(&channel_task(None, "", 1, 1)).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].board_id, "unknown");
}

#[tokio::test]
async fn disallowed_channel_never_starts_a_browser() {
    let launcher = FakeLauncher::new(vec![]);
    let adapter = arca_adapter(launcher.clone(), &["my"]);

    let records = adapter
        .crawl(&channel_task(Some("my"), "abc", 1, 5))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert!(records[0].is_disallowed_marker());
    assert_eq!(launcher.launch_count(), 0);
    assert!(launcher.navigated().is_empty());
}

#[tokio::test]
async fn disallowed_channel_found_in_aggregate_is_skipped() {
    let launcher = FakeLauncher::new(vec![
        (
            arca_list_url("breaking", "abc", 1),
            arca_list(&[("3001", Some("my")), ("3002", Some("game"))]),
        ),
        (arca_post_url("3001"), arca_detail("private", None)),
        (arca_post_url("3002"), arca_detail("public", None)),
    ]);
    let adapter = arca_adapter(launcher.clone(), &["my"]);

    let records = adapter
        .crawl(&channel_task(None, "abc", 1, 1))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].post_id, "3002");
    assert!(!launcher.navigated().contains(&arca_post_url("3001")));
}

#[tokio::test]
async fn list_wait_timeout_stops_pagination() {
    let launcher = FakeLauncher::new(vec![
        (arca_list_url("breaking", "abc", 1), arca_list(&[("4001", Some("game"))])),
        (arca_post_url("4001"), arca_detail("page one", None)),
        (arca_list_url("breaking", "abc", 3), arca_list(&[("4003", Some("game"))])),
    ]);
    let adapter = arca_adapter(launcher.clone(), &[]);

    let records = adapter
        .crawl(&channel_task(None, "abc", 1, 3))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].post_id, "4001");
    assert!(!launcher.navigated().contains(&arca_list_url("breaking", "abc", 3)));
    assert_eq!(launcher.close_count(), 1);
}

#[tokio::test]
async fn content_timeout_skips_post_but_comment_timeout_does_not() {
    let launcher = FakeLauncher::new(vec![
        (
            arca_list_url("game", "", 1),
            arca_list(&[("5001", None), ("5002", None)]),
        ),
        (
            arca_post_url("5001"),
            "<html><body><div class=\"loading\"></div></body></html>".to_string(),
        ),
        (arca_post_url("5002"), arca_detail("body without comments", None)),
    ]);
    let adapter = arca_adapter(launcher, &[]);

    let records = adapter
        .crawl(&channel_task(Some("game"), "", 1, 1))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].post_id, "5002");
    assert_eq!(records[0].board_id, "game");
    assert!(records[0].comments.is_empty());
}

#[tokio::test]
async fn launch_failure_is_a_task_error() {
    let launcher = FakeLauncher::failing();
    let adapter = arca_adapter(launcher.clone(), &[]);

    let err = adapter
        .crawl(&channel_task(None, "abc", 1, 1))
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::Engine(_)));
    assert_eq!(launcher.close_count(), 0);
}

#[tokio::test]
async fn browser_is_released_when_the_crawl_panics() {
    let launcher = FakeLauncher::new(vec![(
        arca_list_url("breaking", "abc", 1),
        arca_list(&[("6001", Some("game"))]),
    )])
    .panicking_on(&arca_post_url("6001"));
    let adapter = Arc::new(arca_adapter(launcher.clone(), &[]));
    let task = channel_task(None, "abc", 1, 1);

    let handle = tokio::spawn(async move { adapter.crawl(&task).await });
    let join_error = handle.await.unwrap_err();

    assert!(join_error.is_panic());
    assert_eq!(launcher.launch_count(), 1);
    assert_eq!(launcher.close_count(), 1);
}
