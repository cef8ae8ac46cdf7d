//! Server-rendered HTML pages for the dashboard.

use url::form_urlencoded;

use super::format::{escape_html, format_date, format_duration, format_number};
use crate::runs::{
    AgentRun, Page, RunStatus, RunsError, RunsQuery, SortOrder, StatusFilter, StatusVariant,
    StepKind, execution_steps,
};

/// Generate the HTML shell for the application.
pub fn html_shell(title: &str, content: &str) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Agent Runs Dashboard">
    <title>{title} - Agent Runs</title>
</head>
<body class="min-h-screen bg-gray-50">
    <header class="bg-white border-b border-gray-200 shadow-xs">
        <div class="container mx-auto px-4 py-6">
            <h1 class="text-2xl font-bold"><a href="/">Agent Runs Dashboard</a></h1>
        </div>
    </header>
    <main id="app" class="container mx-auto px-4 py-8">
        {content}
    </main>
</body>
</html>"#
    )
}

/// CSS classes for a status badge.
fn badge_classes(variant: StatusVariant) -> &'static str {
    match variant {
        StatusVariant::Success => "badge bg-green-100 text-green-800",
        StatusVariant::Warning => "badge bg-yellow-100 text-yellow-800",
        StatusVariant::Info => "badge bg-blue-100 text-blue-800",
        StatusVariant::Destructive => "badge bg-red-100 text-red-800",
    }
}

fn status_badge(status: RunStatus) -> String {
    format!(
        r#"<span class="{}">{}</span>"#,
        badge_classes(status.variant()),
        status
    )
}

/// Dashboard URL for `query`, overriding page and sort order.
pub fn dashboard_href(query: &RunsQuery, page: usize, sort_order: SortOrder) -> String {
    let mut qs = form_urlencoded::Serializer::new(String::new());
    if !query.search.is_empty() {
        qs.append_pair("search", &query.search);
    }
    qs.append_pair("status", query.status.as_str())
        .append_pair("sortOrder", sort_order.as_str())
        .append_pair("page", &page.to_string())
        .append_pair("pageSize", &query.page_size.to_string());
    format!("/?{}", qs.finish())
}

/// True when a search or status filter narrows the listing.
fn is_filtered(query: &RunsQuery) -> bool {
    !query.search.is_empty() || query.status != StatusFilter::All
}

/// Dashboard URL with search and status cleared, keeping sort and page size.
fn clear_filters_href(query: &RunsQuery) -> String {
    let cleared = RunsQuery {
        search: String::new(),
        status: StatusFilter::All,
        ..query.clone()
    };
    dashboard_href(&cleared, 1, query.sort_order)
}

fn filter_form(query: &RunsQuery) -> String {
    let mut options = String::new();
    let filters =
        std::iter::once(StatusFilter::All).chain(RunStatus::ALL.into_iter().map(StatusFilter::from));
    for filter in filters {
        let selected = if filter == query.status { " selected" } else { "" };
        let label = match filter {
            StatusFilter::All => "All statuses",
            StatusFilter::Only(status) => status.as_str(),
        };
        options.push_str(&format!(
            r#"<option value="{}"{selected}>{label}</option>"#,
            filter.as_str()
        ));
    }

    format!(
        r#"<form method="get" action="/" class="flex gap-4 mb-4">
    <input type="search" name="search" placeholder="Search by run ID or agent" value="{search}">
    <select name="status">{options}</select>
    <input type="hidden" name="sortOrder" value="{sort}">
    <input type="hidden" name="pageSize" value="{page_size}">
    <button type="submit">Apply</button>
    <a href="{refresh}" class="button" aria-label="Refresh data">Refresh</a>
</form>"#,
        refresh = escape_html(&dashboard_href(query, query.page, query.sort_order)),
        search = escape_html(&query.search),
        sort = query.sort_order.as_str(),
        page_size = query.page_size,
    )
}

fn runs_table(query: &RunsQuery, page: &Page) -> String {
    let arrow = match query.sort_order {
        SortOrder::Asc => "&uarr;",
        SortOrder::Desc => "&darr;",
    };
    let sort_href = dashboard_href(query, 1, query.sort_order.toggled());

    let mut rows = String::new();
    for run in &page.runs {
        rows.push_str(&format!(
            r#"<tr>
    <td class="font-mono"><a href="/runs/{id}">{id}</a></td>
    <td>{agent}</td>
    <td>{status}</td>
    <td>{started}</td>
    <td>{duration}</td>
    <td>{tokens}</td>
</tr>"#,
            id = escape_html(&run.run_id),
            agent = escape_html(&run.agent_name),
            status = status_badge(run.status),
            started = format_date(&run.started_at),
            duration = format_duration(run.duration),
            tokens = format_number(run.tokens_used),
        ));
    }
    if page.runs.is_empty() {
        return empty_state(query);
    }

    format!(
        r#"<table class="w-full">
<thead><tr>
    <th>Run ID</th><th>Agent</th><th>Status</th>
    <th><a href="{sort_href}">Started {arrow}</a></th>
    <th>Duration</th><th>Tokens</th>
</tr></thead>
<tbody>{rows}</tbody>
</table>"#,
        sort_href = escape_html(&sort_href),
    )
}

fn empty_state(query: &RunsQuery) -> String {
    let (hint, clear) = if is_filtered(query) {
        (
            "Try adjusting your filters",
            format!(
                r#"<a href="{}" class="button">Clear filters</a>"#,
                escape_html(&clear_filters_href(query))
            ),
        )
    } else {
        ("No agent runs have been executed yet", String::new())
    };

    format!(
        r#"<div class="text-center py-16">
    <h3 class="text-lg font-semibold">No runs found</h3>
    <p class="text-gray-600">{hint}</p>
    {clear}
</div>"#
    )
}

/// "N results found" line with a clear action, shown while filtering.
fn filter_summary(query: &RunsQuery, total: usize) -> String {
    if !is_filtered(query) {
        return String::new();
    }
    let plural = if total == 1 { "" } else { "s" };
    format!(
        r#"<div class="flex justify-between text-sm text-gray-600">
    <span>{total} result{plural} found</span>
    <a href="{}">Clear filters</a>
</div>"#,
        escape_html(&clear_filters_href(query))
    )
}

fn pagination(query: &RunsQuery, page: &Page) -> String {
    if page.total_pages <= 1 {
        return String::new();
    }

    let link = |n: usize, label: &str, enabled: bool| {
        if enabled {
            format!(
                r#"<a href="{}">{label}</a>"#,
                escape_html(&dashboard_href(query, n, query.sort_order))
            )
        } else {
            format!(r#"<span class="opacity-50">{label}</span>"#)
        }
    };

    let mut links = link(page.page.saturating_sub(1), "Previous", page.has_previous());
    for n in 1..=page.total_pages {
        if n == page.page {
            links.push_str(&format!(r#"<span aria-current="page">{n}</span>"#));
        } else {
            links.push_str(&link(n, &n.to_string(), true));
        }
    }
    links.push_str(&link(page.page.saturating_add(1), "Next", page.has_next()));

    format!(
        r#"<nav class="flex justify-between border-t border-gray-200 py-3">
    <p class="text-sm">Showing <span>{first}</span> to <span>{last}</span> of <span>{total}</span> results</p>
    <div class="flex gap-2">{links}</div>
</nav>"#,
        first = page.first_item(),
        last = page.last_item(),
        total = page.total,
    )
}

fn error_panel(query: &RunsQuery, err: &RunsError) -> String {
    let retry = if err.is_retryable() {
        format!(
            r#"<a href="{}" class="button">Retry</a>"#,
            escape_html(&dashboard_href(query, query.page, query.sort_order))
        )
    } else {
        r#"<a href="/" class="button">Reset filters</a>"#.to_string()
    };

    format!(
        r#"<div class="bg-red-50 border border-red-200 rounded-lg p-4" role="alert">
    <h3 class="text-red-800">Failed to load runs</h3>
    <p class="text-red-700">{message}</p>
    {retry}
</div>"#,
        message = escape_html(&err.to_string()),
    )
}

/// Render the dashboard for `query` and the listing outcome.
pub fn dashboard_page(query: &RunsQuery, outcome: &Result<Page, RunsError>) -> String {
    let body = match outcome {
        Ok(page) => format!(
            "{}{}{}",
            filter_summary(query, page.total),
            runs_table(query, page),
            pagination(query, page)
        ),
        Err(err) => format!("{}{}", filter_summary(query, 0), error_panel(query, err)),
    };
    html_shell("Runs", &format!("{}{body}", filter_form(query)))
}

fn timeline(status: RunStatus) -> String {
    let mut items = String::new();
    for step in execution_steps(status) {
        let indicator = match (step.completed, step.kind) {
            (false, _) => "step-pending",
            (true, StepKind::Failed) => "step-failed",
            (true, StepKind::Running) => "step-running",
            (true, StepKind::Queued | StepKind::Completed) => "step-done",
        };
        let description = step
            .description
            .map(|d| format!(r#"<p class="text-xs text-gray-500">{d}</p>"#))
            .unwrap_or_default();
        items.push_str(&format!(
            r#"<li class="{indicator}"><p>{label}</p>{description}</li>"#,
            label = step.label,
        ));
    }
    format!(r#"<h4>Execution Flow</h4><ol class="timeline">{items}</ol>"#)
}

/// Render the detail page for one run.
pub fn run_detail_page(run: &AgentRun) -> String {
    let error = run
        .error_message
        .as_deref()
        .map(|msg| {
            format!(
                r#"<div class="bg-red-50 border border-red-200 rounded-lg p-4">
    <h4 class="text-red-800">Error Message</h4>
    <p class="text-red-700">{}</p>
</div>"#,
                escape_html(msg)
            )
        })
        .unwrap_or_default();

    let id = escape_html(&run.run_id);
    let content = format!(
        r#"<a href="/">&larr; Back to runs</a>
<h2>Run Details: {id}</h2>
<dl class="grid grid-cols-2 gap-4">
    <div><dt>Run ID</dt><dd class="font-mono">{id}</dd></div>
    <div><dt>Agent Name</dt><dd>{agent}</dd></div>
    <div><dt>Status</dt><dd>{status}</dd></div>
    <div><dt>Started At</dt><dd>{started}</dd></div>
    <div><dt>Duration</dt><dd>{duration}</dd></div>
    <div><dt>Tokens Used</dt><dd>{tokens}</dd></div>
</dl>
{error}
{timeline}"#,
        agent = escape_html(&run.agent_name),
        status = status_badge(run.status),
        started = format_date(&run.started_at),
        duration = format_duration(run.duration),
        tokens = format_number(run.tokens_used),
        timeline = timeline(run.status),
    );
    html_shell(&format!("Run {}", run.run_id), &content)
}

/// Render the page shown when a run lookup fails.
pub fn run_error_page(run_id: &str, err: &RunsError) -> String {
    let content = format!(
        r#"<div class="text-center py-8" role="alert">
    <p class="text-gray-600">Failed to load run details</p>
    <p class="text-sm">{message}</p>
    <a href="/">Back to runs</a>
</div>"#,
        message = escape_html(&err.to_string()),
    );
    html_shell(&format!("Run {run_id}"), &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn run(status: RunStatus, error_message: Option<&str>) -> AgentRun {
        AgentRun {
            run_id: "run-04".to_string(),
            agent_name: "QueryOptimizer".to_string(),
            status,
            started_at: Utc::now(),
            duration: 125,
            tokens_used: 12_345,
            error_message: error_message.map(String::from),
        }
    }

    fn page_of(runs: Vec<AgentRun>, page: usize, total: usize) -> Page {
        Page {
            runs,
            total,
            page,
            page_size: 10,
            total_pages: total.div_ceil(10),
        }
    }

    #[test]
    fn test_dashboard_href_round_trips_filters() {
        let query = RunsQuery::new()
            .with_search("data proc&")
            .with_status(RunStatus::Failed);
        let href = dashboard_href(&query, 2, SortOrder::Asc);
        assert_eq!(
            href,
            "/?search=data+proc%26&status=Failed&sortOrder=asc&page=2&pageSize=10"
        );
    }

    #[test]
    fn test_dashboard_lists_rows_and_range() {
        let query = RunsQuery::new();
        let page = page_of(vec![run(RunStatus::Succeeded, None)], 2, 11);
        let html = dashboard_page(&query, &Ok(page));

        assert!(html.contains(r#"<a href="/runs/run-04">run-04</a>"#));
        assert!(html.contains("QueryOptimizer"));
        assert!(html.contains("2m 5s"));
        assert!(html.contains("12,345"));
        assert!(html.contains("Showing <span>11</span> to <span>11</span> of <span>11</span>"));
    }

    #[test]
    fn test_dashboard_single_page_has_no_pagination() {
        let page = page_of(vec![run(RunStatus::Queued, None)], 1, 1);
        let html = dashboard_page(&RunsQuery::new(), &Ok(page));
        assert!(!html.contains("Showing"));
    }

    #[test]
    fn test_dashboard_empty_result() {
        let page = page_of(vec![], 1, 0);
        let html = dashboard_page(&RunsQuery::new(), &Ok(page));
        assert!(html.contains("No runs found"));
        assert!(html.contains("No agent runs have been executed yet"));
        assert!(!html.contains("Clear filters"));
        assert!(!html.contains("results found"));
    }

    #[test]
    fn test_filtered_empty_result_offers_clear() {
        let query = RunsQuery::new()
            .with_search("nothing")
            .with_sort_order(SortOrder::Asc)
            .with_page_size(25);
        let html = dashboard_page(&query, &Ok(page_of(vec![], 1, 0)));

        assert!(html.contains("Try adjusting your filters"));
        assert!(html.contains("0 results found"));
        assert!(html.contains(
            r#"<a href="/?status=all&amp;sortOrder=asc&amp;page=1&amp;pageSize=25" class="button">Clear filters</a>"#
        ));
    }

    #[test]
    fn test_filter_summary_counts_results() {
        let query = RunsQuery::new().with_status(RunStatus::Queued);
        let one = dashboard_page(&query, &Ok(page_of(vec![run(RunStatus::Queued, None)], 1, 1)));
        assert!(one.contains("1 result found"));
        assert!(one.contains("Clear filters"));

        let many = dashboard_page(&query, &Ok(page_of(vec![run(RunStatus::Queued, None)], 1, 12)));
        assert!(many.contains("12 results found"));

        let unfiltered = dashboard_page(
            &RunsQuery::new(),
            &Ok(page_of(vec![run(RunStatus::Queued, None)], 1, 12)),
        );
        assert!(!unfiltered.contains("results found"));
    }

    #[test]
    fn test_refresh_links_to_current_view() {
        let query = RunsQuery::new().with_search("data").with_page(2);
        let html = dashboard_page(&query, &Ok(page_of(vec![], 2, 0)));
        assert!(html.contains(
            r#"<a href="/?search=data&amp;status=all&amp;sortOrder=desc&amp;page=2&amp;pageSize=10" class="button" aria-label="Refresh data">Refresh</a>"#
        ));
    }

    #[test]
    fn test_pagination_past_the_last_page() {
        let page = page_of(vec![], usize::MAX, 50);
        let html = dashboard_page(&RunsQuery::new().with_page(usize::MAX), &Ok(page));
        assert!(html.contains(r#"<span class="opacity-50">Next</span>"#));
        assert!(html.contains(&format!("page={}", usize::MAX - 1)));
    }

    #[test]
    fn test_transient_error_offers_retry() {
        let query = RunsQuery::new().with_page(3);
        let html = dashboard_page(&query, &Err(RunsError::Transient));
        assert!(html.contains("Failed to load runs"));
        assert!(html.contains("Retry"));
        assert!(html.contains("page=3"));
    }

    #[test]
    fn test_search_is_escaped() {
        let query = RunsQuery::new().with_search("<script>");
        let html = dashboard_page(&query, &Ok(page_of(vec![], 1, 0)));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_detail_page_for_failed_run() {
        let html = run_detail_page(&run(RunStatus::Failed, Some("Rate limit exceeded")));
        assert!(html.contains("Run Details: run-04"));
        assert!(html.contains("Rate limit exceeded"));
        assert!(html.contains("Execution encountered an error"));
        assert!(html.contains("step-failed"));
    }

    #[test]
    fn test_detail_page_for_queued_run() {
        let html = run_detail_page(&run(RunStatus::Queued, None));
        assert!(!html.contains("Error Message"));
        assert!(html.contains("step-pending"));
        assert!(!html.contains("Processing in progress"));
    }
}
