use super::Report;
use crate::record::Record;
use crate::view::RecordStats;

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn render_rows<R: Record>(items: &[R]) -> String {
    let mut out = String::new();
    for record in items {
        out.push_str("          <tr class=\"hover:bg-slate-50 dark:hover:bg-slate-800/40\">\n");
        for cell in record.cells() {
            out.push_str(&format!(
                "            <td class=\"px-6 py-4 text-sm\">{}</td>\n",
                escape_html(cell)
            ));
        }
        out.push_str("          </tr>\n");
    }
    out
}

fn render_counts(title: &str, counts: &std::collections::BTreeMap<String, usize>) -> String {
    if counts.is_empty() {
        return String::new();
    }
    let mut out = format!(
        "        <div>\n          <h3 class=\"text-xs uppercase tracking-widest text-slate-500 mb-2\">{}</h3>\n          <ul class=\"text-sm space-y-1\">\n",
        escape_html(title)
    );
    for (label, count) in counts {
        out.push_str(&format!(
            "            <li class=\"flex justify-between gap-6\"><span>{}</span><span class=\"font-bold\">{}</span></li>\n",
            escape_html(label),
            count
        ));
    }
    out.push_str("          </ul>\n        </div>\n");
    out
}

fn render_stats(stats: &RecordStats) -> String {
    let span = match (stats.earliest.as_deref(), stats.latest.as_deref()) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => "N/A".to_string(),
    };
    format!(
        r#"      <section class="bg-white dark:bg-slate-900 rounded-2xl border border-slate-200 dark:border-slate-800 p-6 mb-8 grid grid-cols-1 md:grid-cols-3 gap-8">
        <div>
          <h3 class="text-xs uppercase tracking-widest text-slate-500 mb-2">Matched</h3>
          <p class="text-3xl font-bold">{total}</p>
          <p class="text-xs text-slate-500 mt-1">{span} ({undated} undated)</p>
        </div>
{facets}{outcomes}      </section>
"#,
        total = stats.total,
        span = escape_html(&span),
        undated = stats.undated,
        facets = render_counts("By court / type", &stats.by_facet),
        outcomes = render_counts("By outcome", &stats.by_outcome),
    )
}

pub fn render_html<R: Record>(report: &Report<'_, R>) -> Vec<u8> {
    let headers: String = R::columns()
        .iter()
        .map(|c| {
            format!(
                "            <th class=\"px-6 py-4 text-[11px] uppercase tracking-widest\">{}</th>\n",
                escape_html(c)
            )
        })
        .collect();
    let rows = render_rows(&report.view.items);
    let stats = report.stats.map(render_stats).unwrap_or_default();
    let term = report.query.search_term().trim();
    let query_line = if term.is_empty() {
        format!(
            "sorted by {} ({})",
            report.query.sort_key(),
            report.query.sort_order()
        )
    } else {
        format!(
            "search \"{}\", sorted by {} ({})",
            term,
            report.query.sort_key(),
            report.query.sort_order()
        )
    };

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{kind_title} records</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-slate-50 dark:bg-slate-950 text-slate-900 dark:text-slate-100 min-h-screen">
  <main class="max-w-[1440px] mx-auto w-full px-8 py-10">
    <header class="mb-8">
      <h1 class="text-4xl font-extrabold uppercase tracking-tight">{kind_title} records</h1>
      <p class="text-slate-500 text-sm mt-2">{query_line}</p>
    </header>
{stats}    <div class="bg-white dark:bg-slate-900 border border-slate-200 dark:border-slate-800 rounded-2xl overflow-hidden">
      <table class="w-full text-left border-collapse">
        <thead>
          <tr class="bg-slate-50 dark:bg-slate-800/50 border-b border-slate-200 dark:border-slate-800">
{headers}          </tr>
        </thead>
        <tbody class="divide-y divide-slate-100 dark:divide-slate-800">
{rows}        </tbody>
      </table>
      <div class="px-8 py-5 border-t border-slate-100 dark:border-slate-800 text-sm font-bold text-slate-500">{summary}</div>
    </div>
  </main>
</body>
</html>
"####,
        kind_title = escape_html(&capitalize(report.kind.as_str())),
        query_line = escape_html(&query_line),
        stats = stats,
        headers = headers,
        rows = rows,
        summary = escape_html(&report.summary_line()),
    );
    html.into_bytes()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
