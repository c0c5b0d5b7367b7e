// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! HTML fixtures shaped like the two sites' markup.

pub fn dc_board_list(board: &str, post_ids: &[&str]) -> String {
    let rows: String = post_ids
        .iter()
        .map(|id| {
            format!(
                r#"<tr class="ub-content" data-type="icon_txt">
  <td class="gall_tit"><a href="/mgallery/board/view/?id={board}&no={id}&page=1">post {id}</a></td>
  <td class="gall_writer" user_name="user{id}"></td>
</tr>"#
            )
        })
        .collect();

    format!(
        r#"<html><body><table class="gall_list"><tbody>
<tr class="ub-content" data-type="icon_notice">
  <td class="gall_tit"><a href="/mgallery/board/view/?id={board}&no=1">notice</a></td>
  <td class="gall_writer" user_name="운영자"></td>
</tr>
{rows}
</tbody></table></body></html>"#
    )
}

/// 没有列表容器的页面
pub fn dc_missing_list() -> String {
    "<html><body><div class=\"error\">존재하지 않는 갤러리입니다</div></body></html>".to_string()
}

pub fn dc_search_results(server_uri: &str, items: &[(&str, &str)]) -> String {
    let lis: String = items
        .iter()
        .map(|(board, id)| {
            format!(
                r#"<li>
  <a class="tit_txt" href="{server_uri}/board/view/?id={board}&no={id}">result {id}</a>
  <p class="link_dsc_txt dsc_sub"><a class="sub_txt" href="{server_uri}/board/lists?id={board}">{board}</a></p>
</li>"#
            )
        })
        .collect();
    format!(r#"<html><body><ul class="sch_result_list">{lis}</ul></body></html>"#)
}

pub fn dc_detail(body: &str, comments: &[&str]) -> String {
    let comments: String = comments
        .iter()
        .map(|c| format!(r#"<li><p class="usertxt">{c}</p></li>"#))
        .collect();
    format!(
        r#"<html><body><div class="write_div"><p>{body}</p><p>- dc official App</p></div>
<ul class="cmt_list">{comments}</ul></body></html>"#
    )
}

pub fn arca_list(items: &[(&str, Option<&str>)]) -> String {
    let rows: String = items
        .iter()
        .map(|(id, badge)| {
            let badge = badge
                .map(|b| format!(r#"<span class="badge">{b}</span>"#))
                .unwrap_or_default();
            format!(
                r#"<a class="vrow column" href="/b/breaking/{id}?p=1">{badge}<span class="title">post {id}</span></a>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="list-table">
<a class="vrow column notice" href="/b/breaking/1"><span class="title">notice</span></a>
{rows}
</div></body></html>"#
    )
}

pub fn arca_detail(body: &str, comments: Option<&[&str]>) -> String {
    let comment_section = comments
        .map(|comments| {
            let items: String = comments
                .iter()
                .map(|c| {
                    format!(
                        r#"<div class="comment-item"><div class="message"><div class="text">{c}</div></div></div>"#
                    )
                })
                .collect();
            format!(r#"<div id="comment">{items}</div>"#)
        })
        .unwrap_or_default();
    format!(
        r#"<html><body><div class="article-wrapper"><div class="article-content"><p>{body}</p></div></div>{comment_section}</body></html>"#
    )
}

pub fn arca_list_url(channel: &str, keyword: &str, page: u32) -> String {
    if keyword.is_empty() {
        format!("{}/b/{channel}?p={page}", super::ARCA_BASE)
    } else {
        format!(
            "{}/b/{channel}?target=all&keyword={keyword}&p={page}",
            super::ARCA_BASE
        )
    }
}

pub fn arca_post_url(id: &str) -> String {
    format!("{}/b/breaking/{id}?p=1", super::ARCA_BASE)
}
