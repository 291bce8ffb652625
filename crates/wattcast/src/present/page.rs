//! The single page served at `/`. Markup, styles, and the fetch-based page
//! script are embedded so the binary needs no asset directory.

pub const PAGE_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Energy Consumption Time Series Forecasting</title>
<style>
  :root {
    --ink: #1f2937;
    --muted: #6b7280;
    --line: #e5e7eb;
    --accent: #2563eb;
    --forecast: #d97706;
    --band: rgba(217, 119, 6, 0.18);
    --danger: #b91c1c;
  }
  * { box-sizing: border-box; }
  body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    color: var(--ink);
    background: #f9fafb;
  }
  header {
    background: #111827;
    color: #f9fafb;
    padding: 1.2rem 2rem;
  }
  header h1 { margin: 0; font-size: 1.3rem; font-weight: 600; }
  main { max-width: 960px; margin: 0 auto; padding: 1.5rem 2rem 3rem; }
  .card {
    background: #fff;
    border: 1px solid var(--line);
    border-radius: 8px;
    padding: 1.2rem 1.4rem;
    margin-bottom: 1.2rem;
  }
  .card h2 { margin: 0 0 0.8rem; font-size: 1.02rem; font-weight: 600; }
  .hint { color: var(--muted); font-size: 0.9rem; }
  #error-box {
    display: none;
    border-left: 4px solid var(--danger);
    background: #fef2f2;
    color: var(--danger);
    padding: 0.8rem 1rem;
    border-radius: 6px;
    margin-bottom: 1.2rem;
    font-size: 0.92rem;
  }
  #error-box .stage { text-transform: uppercase; font-size: 0.75rem; letter-spacing: 0.04em; }
  table { border-collapse: collapse; width: 100%; font-size: 0.88rem; }
  th, td { text-align: right; padding: 0.35rem 0.6rem; border-bottom: 1px solid var(--line); }
  th:first-child, td:first-child { text-align: left; }
  th { color: var(--muted); font-weight: 600; }
  .controls { display: flex; align-items: center; gap: 1rem; flex-wrap: wrap; }
  input[type=range] { flex: 1; min-width: 220px; accent-color: var(--accent); }
  .pill {
    background: #eef2ff;
    color: var(--accent);
    border-radius: 999px;
    padding: 0.15rem 0.7rem;
    font-variant-numeric: tabular-nums;
    font-size: 0.9rem;
  }
  button {
    font: inherit;
    border: 1px solid var(--line);
    border-radius: 6px;
    background: #fff;
    padding: 0.45rem 0.9rem;
    cursor: pointer;
  }
  button.danger { color: var(--danger); border-color: #fecaca; }
  svg { width: 100%; height: auto; display: block; }
  .meta { color: var(--muted); font-size: 0.85rem; margin-top: 0.6rem; }
  .hidden { display: none; }
</style>
</head>
<body>
<header><h1>Energy Consumption Time Series Forecasting</h1></header>
<main>
  <div id="error-box"></div>

  <div class="card">
    <h2>Dataset</h2>
    <p id="upload-prompt" class="hint">Please upload a CSV file to begin.</p>
    <div class="controls">
      <input type="file" id="file-input" accept=".csv,text/csv">
      <button id="remove-btn" class="danger hidden">Remove dataset</button>
    </div>
    <p class="hint">Expected columns: <b>Date</b> and <b>Consumption</b>.</p>
  </div>

  <div id="data-card" class="card hidden">
    <h2>Data preview</h2>
    <div id="data-table"></div>
    <p id="data-count" class="meta"></p>
    <div id="history-chart"></div>
  </div>

  <div id="horizon-card" class="card hidden">
    <h2>Forecast horizon</h2>
    <div class="controls">
      <input type="range" id="horizon-slider" min="30" max="365" step="1" value="90">
      <span class="pill"><span id="horizon-value">90</span> days</span>
    </div>
  </div>

  <div id="forecast-card" class="card hidden">
    <h2>Forecast</h2>
    <div id="forecast-chart"></div>
    <p id="forecast-meta" class="meta"></p>
    <div id="forecast-table"></div>
    <p id="forecast-count" class="meta"></p>
  </div>

  <div id="components-card" class="card hidden">
    <h2>Model components</h2>
    <div id="component-charts"></div>
  </div>
</main>
<script>
'use strict';

let session = null;

const $ = (id) => document.getElementById(id);

function esc(text) {
  const div = document.createElement('div');
  div.textContent = String(text);
  return div.innerHTML;
}

function showError(detail) {
  const box = $('error-box');
  if (!detail) { box.style.display = 'none'; box.innerHTML = ''; return; }
  box.innerHTML = '<div class="stage">' + esc(detail.stage || 'error') + '</div>'
    + '<div>' + esc(detail.message || detail.error || 'Request failed') + '</div>';
  box.style.display = 'block';
}

function fmt(value) {
  if (value == null || !isFinite(value)) { return '–'; }
  return Number(value).toFixed(2);
}

// Minimal SVG line renderer. Null and non-finite values break the path so
// gaps stay visible instead of being bridged.
function chartSvg(lines, band) {
  const W = 860, H = 300, PAD = 42;
  let ts = [], vs = [];
  const collect = (dates, values) => {
    dates.forEach((d, i) => {
      const v = values[i];
      if (v == null || !isFinite(v)) { return; }
      ts.push(Date.parse(d));
      vs.push(v);
    });
  };
  lines.forEach((l) => collect(l.dates, l.values));
  if (band) { collect(band.dates, band.lower); collect(band.dates, band.upper); }
  if (!ts.length) { return '<p class="hint">No data to plot.</p>'; }

  const t0 = Math.min(...ts), t1 = Math.max(...ts);
  let v0 = Math.min(...vs), v1 = Math.max(...vs);
  const vpad = (v1 - v0 || 1) * 0.06;
  v0 -= vpad; v1 += vpad;
  const sx = (t) => PAD + ((t - t0) / ((t1 - t0) || 1)) * (W - 2 * PAD);
  const sy = (v) => H - PAD - ((v - v0) / (v1 - v0)) * (H - 2 * PAD);

  const pathFor = (dates, values) => {
    let d = '', pen = false;
    dates.forEach((date, i) => {
      const v = values[i];
      if (v == null || !isFinite(v)) { pen = false; return; }
      const x = sx(Date.parse(date)).toFixed(1);
      const y = sy(v).toFixed(1);
      d += (pen ? 'L' : 'M') + x + ' ' + y;
      pen = true;
    });
    return d;
  };

  let svg = '<svg viewBox="0 0 ' + W + ' ' + H + '" role="img">';
  if (band) {
    let pts = '';
    band.dates.forEach((date, i) => {
      const v = band.upper[i];
      if (v == null || !isFinite(v)) { return; }
      pts += sx(Date.parse(date)).toFixed(1) + ',' + sy(v).toFixed(1) + ' ';
    });
    for (let i = band.dates.length - 1; i >= 0; i--) {
      const v = band.lower[i];
      if (v == null || !isFinite(v)) { continue; }
      pts += sx(Date.parse(band.dates[i])).toFixed(1) + ',' + sy(v).toFixed(1) + ' ';
    }
    svg += '<polygon points="' + pts.trim() + '" fill="var(--band)" stroke="none"/>';
  }
  lines.forEach((l) => {
    svg += '<path d="' + pathFor(l.dates, l.values) + '" fill="none" stroke="'
      + l.color + '" stroke-width="1.6"/>';
  });

  // Frame and min/max labels.
  svg += '<line x1="' + PAD + '" y1="' + (H - PAD) + '" x2="' + (W - PAD) + '" y2="'
    + (H - PAD) + '" stroke="var(--line)"/>';
  svg += '<text x="' + PAD + '" y="' + (H - 12) + '" font-size="11" fill="#6b7280">'
    + new Date(t0).toISOString().slice(0, 10) + '</text>';
  svg += '<text x="' + (W - PAD) + '" y="' + (H - 12) + '" text-anchor="end" font-size="11" fill="#6b7280">'
    + new Date(t1).toISOString().slice(0, 10) + '</text>';
  svg += '<text x="6" y="' + (sy(v1 - vpad) + 4) + '" font-size="11" fill="#6b7280">'
    + fmt(v1 - vpad) + '</text>';
  svg += '<text x="6" y="' + (sy(v0 + vpad) + 4) + '" font-size="11" fill="#6b7280">'
    + fmt(v0 + vpad) + '</text>';
  svg += '</svg>';
  return svg;
}

function tableHtml(headers, rows) {
  let html = '<table><thead><tr>';
  headers.forEach((h) => { html += '<th>' + esc(h) + '</th>'; });
  html += '</tr></thead><tbody>';
  rows.forEach((row) => {
    html += '<tr>';
    row.forEach((cell) => { html += '<td>' + esc(cell) + '</td>'; });
    html += '</tr>';
  });
  return html + '</tbody></table>';
}

function render() {
  showError(session ? session.forecast_error : null);

  const hasData = !!(session && session.presentation && session.presentation.data_preview);
  $('upload-prompt').classList.toggle('hidden', !!session);
  $('remove-btn').classList.toggle('hidden', !session);
  $('data-card').classList.toggle('hidden', !hasData);
  $('horizon-card').classList.toggle('hidden', !hasData);

  if (hasData) {
    const preview = session.presentation.data_preview;
    $('data-table').innerHTML = tableHtml(
      ['Date', 'Consumption'],
      preview.rows.map((r) => [r.date, fmt(r.value)])
    );
    $('data-count').textContent = 'Last ' + preview.rows.length + ' of '
      + preview.total_rows + ' rows.';

    const history = session.presentation.history_chart;
    $('history-chart').innerHTML = chartSvg(
      history.series.map((s) => ({ dates: s.dates, values: s.values, color: 'var(--accent)' })),
      null
    );

    $('horizon-slider').value = session.session.horizon_days;
    $('horizon-value').textContent = session.session.horizon_days;
  }

  const fc = session && session.presentation ? session.presentation.forecast : null;
  $('forecast-card').classList.toggle('hidden', !fc);
  $('components-card').classList.toggle('hidden', !fc);
  if (!fc) { return; }

  $('forecast-chart').innerHTML = chartSvg(
    [
      { dates: fc.chart.history.dates, values: fc.chart.history.values, color: 'var(--accent)' },
      { dates: fc.chart.forecast.dates, values: fc.chart.forecast.values, color: 'var(--forecast)' }
    ],
    fc.chart.band
  );

  let meta = 'Model: ' + esc(fc.model_type) + ' · horizon ' + fc.horizon_days
    + ' days · ' + Math.round(fc.chart.confidence_level * 100) + '% interval';
  if (fc.accuracy) {
    meta += ' · MAPE ' + fmt(fc.accuracy.mape) + '% · RMSE '
      + fmt(fc.accuracy.rmse) + ' · MAE ' + fmt(fc.accuracy.mae);
  }
  $('forecast-meta').innerHTML = meta;

  $('forecast-table').innerHTML = tableHtml(
    ['Date', 'Forecast', 'Lower', 'Upper'],
    fc.preview.rows.map((r) => [r.date, fmt(r.point_estimate), fmt(r.lower_bound), fmt(r.upper_bound)])
  );
  $('forecast-count').textContent = 'Last ' + fc.preview.rows.length + ' of '
    + fc.preview.total_rows + ' forecast points.';

  $('component-charts').innerHTML = fc.components.map((c) =>
    '<h2>' + esc(c.title) + '</h2>' + chartSvg(
      c.series.map((s) => ({ dates: s.dates, values: s.values, color: 'var(--accent)' })),
      null
    )
  ).join('');
}

async function refresh() {
  if (!session) { render(); return; }
  const res = await fetch('/api/v1/sessions/' + session.session.id);
  session = res.ok ? await res.json() : null;
  render();
}

async function upload(file) {
  const form = new FormData();
  form.append('file', file, file.name);
  const url = session
    ? '/api/v1/sessions/' + session.session.id + '/dataset'
    : '/api/v1/sessions';
  const res = await fetch(url, { method: 'POST', body: form });
  const body = await res.json();
  if (!res.ok) {
    showError(body);
    // A rejected replacement clears the dataset server-side.
    if (session) { await refresh(); showError(body); }
    return;
  }
  session = body;
  render();
}

async function setHorizon(days) {
  if (!session) { return; }
  const res = await fetch('/api/v1/sessions/' + session.session.id + '/horizon', {
    method: 'PUT',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ days: Number(days) })
  });
  const body = await res.json();
  if (!res.ok) { showError(body); return; }
  session = body;
  render();
}

async function removeDataset() {
  if (!session) { return; }
  await fetch('/api/v1/sessions/' + session.session.id, { method: 'DELETE' });
  session = null;
  $('file-input').value = '';
  render();
}

$('file-input').addEventListener('change', (e) => {
  if (e.target.files.length) { upload(e.target.files[0]); }
});
$('horizon-slider').addEventListener('input', (e) => {
  $('horizon-value').textContent = e.target.value;
});
$('horizon-slider').addEventListener('change', (e) => setHorizon(e.target.value));
$('remove-btn').addEventListener('click', removeDataset);

render();
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_carries_title_and_prompt() {
        assert!(PAGE_HTML.contains("Energy Consumption Time Series Forecasting"));
        assert!(PAGE_HTML.contains("Please upload a CSV file to begin."));
    }

    #[test]
    fn test_page_slider_matches_horizon_limits() {
        assert!(PAGE_HTML.contains(r#"min="30" max="365""#));
        assert!(PAGE_HTML.contains(r#"value="90""#));
    }

    #[test]
    fn test_page_targets_versioned_api() {
        assert!(PAGE_HTML.contains("/api/v1/sessions"));
    }
}
