use crate::chart::ChartData;
use crate::journal::Notice;
use crate::models::{MOOD_RATING_MAX, MOOD_RATING_MIN};
use crate::mood::Mood;
use crate::views::{CollectionRow, JournalView, StoryCard};
use std::f64::consts::PI;
use std::fmt::Write;

const RING_RADIUS: f64 = 70.0;
const RING_WIDTH: f64 = 36.0;

pub fn render_index(view: &JournalView) -> String {
    let (header_name, header_description) = match &view.header {
        Some(header) => (escape_html(&header.name), escape_html(&header.description)),
        None => (String::new(), String::new()),
    };

    INDEX_HTML
        .replace("{{NOTICES}}", &render_notices(&view.notices))
        .replace("{{COLLECTIONS}}", &render_collections(&view.collections))
        .replace("{{HEADER_NAME}}", &header_name)
        .replace("{{HEADER_DESCRIPTION}}", &header_description)
        .replace("{{CHART}}", &render_chart(&view.chart))
        .replace("{{LEGEND}}", &render_legend(&view.chart))
        .replace("{{FILTER_OPTIONS}}", &render_filter_options(view.mood_filter))
        .replace("{{MOOD_OPTIONS}}", &render_mood_options())
        .replace("{{RATING_OPTIONS}}", &render_rating_options())
        .replace(
            "{{STORY_FORM_STATE}}",
            if view.selected_collection_id == 0 { "disabled" } else { "" },
        )
        .replace("{{STORIES}}", &render_stories(&view.stories, view.selected_collection_id))
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Makes a URL safe to embed in a quoted CSS `url('...')` inside an HTML attribute.
fn css_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for ch in url.trim().chars() {
        match ch {
            '\'' => out.push_str("%27"),
            '"' => out.push_str("%22"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '\\' => out.push_str("%5C"),
            '\n' | '\r' => {}
            _ => out.push(ch),
        }
    }
    escape_html(&out)
}

fn render_notices(notices: &[Notice]) -> String {
    let mut out = String::new();
    for notice in notices {
        let _ = write!(
            out,
            r#"<div class="notice" data-kind="{kind}"><time>{time}</time> {message}</div>"#,
            kind = notice.kind,
            time = notice.raised_at.format("%H:%M:%S"),
            message = escape_html(&notice.message),
        );
    }
    out
}

fn render_collections(rows: &[CollectionRow]) -> String {
    if rows.is_empty() {
        return r#"<li class="empty">No collections yet.</li>"#.to_string();
    }
    let mut out = String::new();
    for row in rows {
        let name = escape_html(&row.name);
        let _ = write!(
            out,
            r#"<li class="collection-row{selected}">
          <form method="post" action="{select}" class="select-form"><button type="submit" class="collection-name">{name}</button></form>
          <form method="post" action="{delete}" class="delete-form" onsubmit="return confirm('{prompt}')"><input type="hidden" name="confirmed" value="yes" /><button type="submit" class="delete" aria-label="Delete {name}">x</button></form>
        </li>"#,
            selected = if row.selected { " selected" } else { "" },
            select = escape_html(&row.select_action),
            delete = escape_html(&row.delete_action),
            prompt = escape_html(row.delete_prompt),
        );
    }
    out
}

fn render_stories(cards: &[StoryCard], selected_collection_id: u64) -> String {
    if cards.is_empty() {
        let message = if selected_collection_id == 0 {
            "Pick a collection to see its stories."
        } else {
            "No stories here yet."
        };
        return format!(r#"<p class="empty">{message}</p>"#);
    }
    let mut out = String::new();
    for card in cards {
        let _ = write!(
            out,
            r#"<article class="story-card" data-mood="{color}" style="--accent: {accent}">
        <div class="photo-frame" style="padding: {padding}"{pending}>
          <div class="photo" style="background-image: url('{url}'); background-size: {size}"></div>
        </div>
        <hr class="divider" />
        <div class="story-extras">
          <span class="mood"><span>{mood}</span> - <span>{rating}</span></span>
          <form method="post" action="{reverse}"><button type="submit">Reverse</button></form>
        </div>
        <hr class="divider" />
        <p class="story-body">{content}</p>
      </article>"#,
            color = card.color,
            accent = card.accent,
            padding = card.photo.padding,
            pending = if card.photo.pending { " data-photo-pending" } else { "" },
            url = css_url(&card.photo.url),
            size = card.photo.background_size,
            mood = card.mood,
            rating = card.mood_rating,
            reverse = escape_html(&card.reverse_action),
            content = escape_html(&card.content),
        );
    }
    out
}

/// Doughnut drawn as dashed circle strokes, one per non-empty slice.
fn render_chart(chart: &ChartData) -> String {
    let circumference = 2.0 * PI * RING_RADIUS;
    let mut out = format!(
        r##"<svg id="doughnut-chart" viewBox="0 0 200 200" role="img" aria-label="{label}">
          <circle class="ring-track" cx="100" cy="100" r="{RING_RADIUS}" fill="none" stroke="#ece7df" stroke-width="{RING_WIDTH}" />"##,
        label = chart.label,
    );

    for slice in chart.slices() {
        let len = slice.len * circumference;
        let _ = write!(
            out,
            r#"
          <circle class="slice" data-mood="{name}" cx="100" cy="100" r="{RING_RADIUS}" fill="none" stroke="{fill}" stroke-width="{RING_WIDTH}" stroke-dasharray="{len:.3} {rest:.3}" stroke-dashoffset="{offset:.3}" transform="rotate(-90 100 100)"><title>{name}: {count}</title></circle>"#,
            name = chart.labels[slice.index],
            fill = chart.background_colors[slice.index],
            count = slice.count,
            rest = circumference - len,
            offset = -slice.start * circumference,
        );
    }

    let _ = write!(
        out,
        r#"
          <text x="100" y="106" text-anchor="middle" class="chart-total">{total}</text>
        </svg>"#,
        total = chart.total,
    );
    out
}

fn render_legend(chart: &ChartData) -> String {
    let mut out = String::new();
    for (index, label) in chart.labels.iter().enumerate() {
        let _ = write!(
            out,
            r#"<li><span class="swatch" style="background: {fill}; border-color: {border}"></span>{label}<span class="count">{count}</span></li>"#,
            fill = chart.background_colors[index],
            border = chart.border_colors[index],
            count = chart.data[index],
        );
    }
    out
}

fn render_filter_options(active: &str) -> String {
    let mut out = format!(
        r#"<option value="all"{}>All moods</option>"#,
        if active == "all" { " selected" } else { "" }
    );
    for mood in Mood::ALL {
        let _ = write!(
            out,
            r#"<option value="{mood}"{selected}>{mood}</option>"#,
            selected = if active == mood.name() { " selected" } else { "" },
        );
    }
    out
}

fn render_mood_options() -> String {
    Mood::ALL
        .iter()
        .map(|mood| format!(r#"<option value="{mood}">{mood}</option>"#))
        .collect()
}

fn render_rating_options() -> String {
    (MOOD_RATING_MIN..=MOOD_RATING_MAX)
        .map(|rating| format!(r#"<option value="{rating}">{rating}</option>"#))
        .collect()
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Mood Journal</title>
  <style>
    :root {
      --bg: #f7f3ec;
      --ink: #2b2a28;
      --muted: #6d6860;
      --accent: #4b3fbf;
      --card: #ffffff;
      --shadow: 0 12px 32px rgba(43, 42, 40, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
    }

    .layout {
      display: grid;
      grid-template-columns: 260px 1fr 300px;
      gap: 24px;
      padding: 24px;
    }

    aside, .chart-panel {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 18px;
      align-self: start;
    }

    h1, h2 {
      margin: 0 0 12px;
    }

    #collections-list {
      list-style: none;
      margin: 0 0 16px;
      padding: 0;
    }

    .collection-row {
      display: flex;
      align-items: center;
      border-radius: 8px;
    }

    .collection-row.selected, .collection-row:hover {
      background: var(--accent);
    }

    .collection-row.selected button, .collection-row:hover button {
      color: #fff;
    }

    .select-form {
      flex: 1;
    }

    .collection-row button {
      background: none;
      border: none;
      cursor: pointer;
      font: inherit;
      padding: 6px 8px;
      width: 100%;
      text-align: center;
    }

    .delete-form button {
      width: auto;
      font-weight: 600;
    }

    form.stacked {
      display: grid;
      gap: 8px;
    }

    form.stacked input, form.stacked select, form.stacked textarea {
      font: inherit;
      padding: 6px 8px;
      border: 1px solid #d8d2c8;
      border-radius: 8px;
    }

    fieldset {
      border: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    #collection-intro-description {
      color: var(--muted);
      margin-top: 0;
    }

    #storyboard {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(240px, 1fr));
      gap: 18px;
    }

    .story-card {
      background: var(--card);
      border-radius: 14px;
      box-shadow: var(--shadow);
      overflow: hidden;
      border-top: 6px solid var(--accent);
    }

    .story-card:hover {
      background: var(--accent);
    }

    .photo-frame {
      height: 180px;
    }

    .photo {
      width: 100%;
      height: 100%;
      background-position: center;
      background-repeat: no-repeat;
    }

    .divider {
      border: none;
      border-top: 1px solid #ece7df;
      margin: 0;
    }

    .story-extras {
      display: flex;
      justify-content: space-around;
      align-items: center;
      padding: 8px;
    }

    .story-body {
      padding: 16px;
      margin: 0;
      white-space: pre-wrap;
    }

    .chart-total {
      font-size: 28px;
      fill: var(--muted);
    }

    .legend {
      list-style: none;
      padding: 0;
      margin: 12px 0 0;
      display: grid;
      gap: 4px;
    }

    .legend li {
      display: flex;
      align-items: center;
      gap: 8px;
    }

    .legend .count {
      margin-left: auto;
      color: var(--muted);
    }

    .swatch {
      width: 14px;
      height: 14px;
      border: 1px solid;
      border-radius: 3px;
    }

    .notices {
      position: fixed;
      right: 24px;
      bottom: 24px;
      display: grid;
      gap: 8px;
    }

    .notice {
      background: #fff4f1;
      border-left: 4px solid #d64545;
      border-radius: 8px;
      box-shadow: var(--shadow);
      padding: 10px 14px;
      max-width: 420px;
    }

    .notice time {
      color: var(--muted);
      font-size: 0.85em;
    }

    .empty {
      color: var(--muted);
    }

    @media (max-width: 960px) {
      .layout {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <div class="notices">{{NOTICES}}</div>
  <main class="layout">
    <aside>
      <h2>Collections</h2>
      <ul id="collections-list">
        {{COLLECTIONS}}
      </ul>
      <form id="collection-form" class="stacked" method="post" action="/collections">
        <input id="collection-name-input" name="name" placeholder="Name" required />
        <input id="collection-description-input" name="description" placeholder="Description" />
        <button type="submit">Create collection</button>
      </form>
    </aside>

    <section>
      <h1 id="collection-intro-name">{{HEADER_NAME}}</h1>
      <p id="collection-intro-description">{{HEADER_DESCRIPTION}}</p>

      <form class="create-story-form stacked" method="post" action="/stories">
        <fieldset {{STORY_FORM_STATE}}>
          <textarea class="story-content-input" name="content" rows="3" placeholder="What happened?" required></textarea>
          <select class="mood-select" name="mood">{{MOOD_OPTIONS}}</select>
          <select class="mood-rating-select" name="mood_rating">{{RATING_OPTIONS}}</select>
          <input class="photo-url-input" name="photo_url" placeholder="Photo URL" />
          <button type="submit">Add story</button>
        </fieldset>
      </form>

      <form class="filter-form" method="get" action="/">
        <label>Show
          <select name="mood" onchange="this.form.submit()">{{FILTER_OPTIONS}}</select>
        </label>
      </form>

      <div id="storyboard">
        {{STORIES}}
      </div>
    </section>

    <section class="chart-panel">
      <h2>Moods</h2>
      {{CHART}}
      <ul class="legend">{{LEGEND}}</ul>
    </section>
  </main>

  <script>
    if (document.querySelector('[data-photo-pending]')) {
      setTimeout(() => window.location.reload(), 1500);
    }
  </script>
</body>
</html>
"#;
