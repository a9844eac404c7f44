//! Relevance ranking via the LLM, with a strict permutation guarantee: the
//! ranked output contains exactly the input records, only reordered. Any
//! parse or matching failure returns the input order unchanged.

use crate::finder::record::ToolRecord;
use crate::llm::json::{parse_llm_json, LlmJson};
use crate::llm::{AnalysisApi, AnalysisTask, RankEntry};

/// Rank `tools` by relevance to `query`. Single-element and empty sets are
/// returned as-is without an LLM call.
pub async fn rank_tools(
    analyst: &dyn AnalysisApi,
    query: &str,
    tools: Vec<ToolRecord>,
) -> Vec<ToolRecord> {
    if tools.len() < 2 {
        return tools;
    }

    let task = AnalysisTask::Rank {
        tools: tools
            .iter()
            .map(|t| RankEntry {
                name: t.name.clone(),
                description: t.description.clone(),
            })
            .collect(),
        query: query.to_string(),
    };

    let reply = match analyst.analyze(task).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "ranking call failed, keeping discovery order");
            return tools;
        }
    };

    let Some(names) = ranked_names(&reply) else {
        tracing::warn!("ranking reply unparseable, keeping discovery order");
        return tools;
    };

    reorder_by_names(tools, &names)
}

/// Pull the ranked name list out of the LLM reply. Accepts a bare array of
/// strings or an array of objects carrying a `name` field.
fn ranked_names(reply: &str) -> Option<Vec<String>> {
    let items = match parse_llm_json(reply) {
        LlmJson::Array(items) => items,
        // Some replies wrap the array in an object key.
        LlmJson::Object(obj) => obj
            .get("ranking")
            .or_else(|| obj.get("tools"))
            .and_then(|v| v.as_array())
            .cloned()?,
        LlmJson::Invalid(_) => return None,
    };

    let names: Vec<String> = items
        .iter()
        .filter_map(|item| {
            item.as_str()
                .map(|s| s.to_string())
                .or_else(|| item.get("name")?.as_str().map(|s| s.to_string()))
        })
        .collect();

    (names.len() == items.len()).then_some(names)
}

/// Reorder records to match `names`. If the ranked set does not line up with
/// the input set (wrong size, unknown or duplicate name), the input order is
/// returned unchanged rather than trusting a partial reorder.
fn reorder_by_names(tools: Vec<ToolRecord>, names: &[String]) -> Vec<ToolRecord> {
    if names.len() != tools.len() {
        tracing::warn!(
            input = tools.len(),
            ranked = names.len(),
            "ranked set size mismatch, keeping discovery order"
        );
        return tools;
    }

    let mut used = vec![false; tools.len()];
    let mut order = Vec::with_capacity(tools.len());

    for name in names {
        let matched = tools.iter().enumerate().find(|(idx, tool)| {
            !used[*idx] && tool.name.trim().eq_ignore_ascii_case(name.trim())
        });

        match matched {
            Some((idx, _)) => {
                used[idx] = true;
                order.push(idx);
            }
            None => {
                tracing::warn!(name = %name, "ranked name not in input set, keeping discovery order");
                return tools;
            }
        }
    }

    let mut slots: Vec<Option<ToolRecord>> = tools.into_iter().map(Some).collect();
    order.into_iter().filter_map(|idx| slots[idx].take()).collect()
}
