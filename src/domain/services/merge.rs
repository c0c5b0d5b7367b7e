// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::post::PostRecord;
use std::collections::HashSet;

/// 任务内去重
///
/// 以 `(board_id, post_id)` 为键保留首次出现的记录，保持原有顺序。
/// 分页重叠时同一帖子可能被列出两次。
pub fn dedup(records: Vec<PostRecord>) -> Vec<PostRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert((record.board_id.clone(), record.post_id.clone())))
        .collect()
}

/// 跨来源交错合并
///
/// 每张表的行按位置获得从0开始的名次，全部拼接后按名次做稳定排序，
/// 名次相同时保持表的提交顺序。结果近似轮询：
/// 表1第0行、表2第0行、表1第1行、表2第1行……
///
/// 下游只使用结果的前N行，交错保证这个前缀里各来源都有代表。
pub fn merge_interleaved<T>(tables: Vec<Vec<T>>) -> Vec<T> {
    let total = tables.iter().map(Vec::len).sum();
    let mut ranked: Vec<(usize, T)> = Vec::with_capacity(total);
    for table in tables {
        ranked.extend(table.into_iter().enumerate());
    }

    // sort_by_key is stable, so equal ranks keep submission order
    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.into_iter().map(|(_, row)| row).collect()
}
