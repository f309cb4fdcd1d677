//! Server-rendered pages. The workflow page carries its initial status and
//! the status transition table; a small inline script does the rest.

use axum::{
    extract::Query,
    response::{Html, IntoResponse},
};
use serde::Deserialize;

use super::status::{CONNECT_FAILED, GENERIC_ERROR, InitialView, transition_table_json};

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #18181b; color: #fafafa; }
header { border-bottom: 1px solid #27272a; padding: 1rem 1.5rem; }
header a { color: inherit; text-decoration: none; font-weight: 700; }
main { max-width: 48rem; margin: 0 auto; padding: 3rem 1.5rem; }
.panel { background: #27272a80; border: 1px solid #3f3f46; border-radius: 0.75rem; padding: 2rem; text-align: center; margin-bottom: 1.5rem; }
.panel.ok { border-color: #15803d; }
.panel.err { border-color: #b91c1c; background: #7f1d1d33; }
.email { text-align: left; }
.email .from { color: #60a5fa; font-weight: 500; }
.email .date { float: right; font-size: 0.75rem; color: #71717a; }
button, .button { background: #2563eb; color: #fff; border: 0; border-radius: 0.5rem; padding: 0.75rem 2rem; font-size: 1rem; cursor: pointer; text-decoration: none; }
button:disabled { background: #3f3f46; cursor: not-allowed; }
.muted { color: #a1a1aa; }
"#;

const LANDING: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Inbox Digest</title><style>{{STYLE}}</style></head>
<body>
<header><a href="/">Inbox Digest</a></header>
<main>
  <h1>Powerful automations. One click.</h1>
  <p class="muted">Press a button and let it run.</p>
  <div class="panel">
    <h2>Gmail AI Summarizer</h2>
    <p class="muted">Connect your Gmail and get AI-powered summaries of your last 10 emails in seconds.</p>
    <a class="button" href="/workflows/gmail-summarizer">Run Workflow &rarr;</a>
  </div>
  <div class="panel">
    <h2>More Workflows Coming</h2>
    <p class="muted">New automations are on the way.</p>
    <button disabled>Coming Soon</button>
  </div>
</main>
</body>
</html>
"#;

const WORKFLOW: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Gmail AI Summarizer</title><style>{{STYLE}}</style></head>
<body>
<header><a href="/">&larr; Inbox Digest</a></header>
<main>
  <h1>Gmail AI Summarizer</h1>
  <p class="muted">Connect your Gmail and get AI-powered summaries of your last 10 emails in seconds.</p>

  <div id="idle" class="panel" hidden>
    <h2>Step 1: Connect Gmail</h2>
    <p class="muted">Read-only access. Nothing is sent, deleted or modified.</p>
    <button id="connect">Connect Gmail Account</button>
  </div>

  <div id="connected" class="panel ok" hidden>
    <h2>Gmail Connected!</h2>
    <p class="muted">Fetch your last 10 emails and generate AI summaries.</p>
    <button id="run">Run Summarizer &rarr;</button>
  </div>

  <div id="fetching" class="panel" hidden>
    <h2>Processing your emails...</h2>
    <p class="muted">Fetching your last 10 emails and generating AI summaries. This may take a moment.</p>
  </div>

  <div id="error" class="panel err" hidden>
    <h2>Something went wrong</h2>
    <p id="error-message" class="muted"></p>
    <button id="retry">Try Again</button>
  </div>

  <div id="done" hidden>
    <h2 id="done-title"></h2>
    <button id="again">Run Again</button>
    <div id="summaries"></div>
    <p><a href="/" class="muted">&larr; Back to all workflows</a></p>
  </div>
</main>
<script>
const TRANSITIONS = {{TRANSITIONS}};
const INITIAL = {{INITIAL}};
const GENERIC_ERROR = {{GENERIC_ERROR}};
const CONNECT_FAILED = {{CONNECT_FAILED}};

let status = INITIAL.status;

function show(next, error) {
  for (const id of ["idle", "connected", "fetching", "done", "error"]) {
    document.getElementById(id).hidden = id !== next;
  }
  document.getElementById("error-message").textContent = error || "";
}

function go(next, error) {
  if (!(TRANSITIONS[status] || []).includes(next)) {
    console.warn("illegal transition", status, "->", next);
    return false;
  }
  status = next;
  show(next, error);
  return true;
}

function render(summaries) {
  const list = document.getElementById("summaries");
  list.replaceChildren();
  document.getElementById("done-title").textContent = summaries.length
    ? `Your Email Summaries (${summaries.length})`
    : "No emails found";
  for (const email of summaries) {
    const card = document.createElement("div");
    card.className = "panel email";
    for (const [cls, text, tag] of [
      ["date", email.date, "span"],
      ["from", email.from, "span"],
      ["subject", email.subject, "h3"],
      ["summary", email.summary, "p"],
    ]) {
      const el = document.createElement(tag);
      el.className = cls;
      el.textContent = text;
      card.appendChild(el);
    }
    list.appendChild(card);
  }
}

document.getElementById("connect").onclick = async () => {
  try {
    const data = await (await fetch("/api/gmail/auth")).json();
    if (!data.authUrl) throw new Error();
    window.location.href = data.authUrl;
  } catch {
    go("error", CONNECT_FAILED);
  }
};

document.getElementById("run").onclick = async () => {
  if (!go("fetching")) return;
  try {
    const response = await fetch("/api/gmail/summarize", { method: "POST" });
    const data = await response.json();
    if (!response.ok) throw new Error(data.error || GENERIC_ERROR);
    render(data.summaries);
    go("done");
  } catch (err) {
    go("error", err.message || GENERIC_ERROR);
  }
};

document.getElementById("retry").onclick = () => go("idle");
document.getElementById("again").onclick = () => go("connected");

show(status, INITIAL.error);
</script>
</body>
</html>
"#;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    connected: Option<String>,
    error: Option<String>,
}

pub async fn landing() -> impl IntoResponse {
    Html(LANDING.replace("{{STYLE}}", STYLE))
}

pub async fn workflow_page(Query(params): Query<PageParams>) -> impl IntoResponse {
    let view = InitialView::from_query(params.connected.as_deref(), params.error.as_deref());
    Html(render_workflow(&view))
}

fn render_workflow(view: &InitialView) -> String {
    WORKFLOW
        .replace("{{STYLE}}", STYLE)
        .replace("{{TRANSITIONS}}", &script_json(&transition_table_json()))
        .replace("{{INITIAL}}", &script_json(view))
        .replace("{{GENERIC_ERROR}}", &script_json(&GENERIC_ERROR))
        .replace("{{CONNECT_FAILED}}", &script_json(&CONNECT_FAILED))
}

/// JSON safe to inline in a `<script>` element.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}
