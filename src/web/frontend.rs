//! Embedded HTML/CSS/JS frontend for the senti web dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies; the doughnut
//! chart is drawn as inline SVG.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Sentiment Dashboard</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --positive: #10b981;
  --negative: #ef4444;
  --neutral: #6b7280;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app { max-width: 1100px; margin: 0 auto; padding: 24px; }

header {
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 24px; font-weight: 600; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}
.card h2 { font-size: 16px; font-weight: 600; margin-bottom: 16px; }

textarea {
  width: 100%;
  background: var(--bg);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 10px;
  font-family: var(--font);
  font-size: 14px;
  resize: vertical;
}

button {
  border: none;
  border-radius: 6px;
  padding: 8px 16px;
  font-size: 13px;
  font-weight: 500;
  cursor: pointer;
}
button:disabled { opacity: 0.5; cursor: not-allowed; }
.analyze-btn { margin-top: 12px; background: var(--accent); color: #fff; }
.clear-btn { background: transparent; color: var(--negative); border: 1px solid var(--negative); }

.error {
  margin-top: 12px;
  padding: 10px 12px;
  border-radius: 6px;
  border: 1px solid var(--negative);
  color: var(--negative);
  display: none;
}

.dashboard { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
@media (max-width: 760px) { .dashboard { grid-template-columns: 1fr; } }

.chart-container { display: flex; flex-direction: column; align-items: center; gap: 12px; }
.legend { display: flex; gap: 16px; font-size: 12px; color: var(--text-muted); }
.legend span::before {
  content: '';
  display: inline-block;
  width: 10px; height: 10px;
  border-radius: 2px;
  margin-right: 6px;
  background: var(--swatch);
}

.stats-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; }
.stat-card {
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 14px;
  display: flex;
  flex-direction: column;
}
.stat-value { font-size: 26px; font-weight: 700; }
.stat-label { color: var(--text-muted); font-size: 12px; }
.stat-card.positive .stat-value { color: var(--positive); }
.stat-card.negative .stat-value { color: var(--negative); }
.stat-card.neutral .stat-value { color: var(--neutral); }

.history-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 16px; }
.history-header h2 { margin-bottom: 0; }
.history-item {
  display: grid;
  grid-template-columns: auto 1fr auto;
  gap: 12px;
  align-items: center;
  padding: 10px 0;
  border-bottom: 1px solid var(--border);
}
.history-item:last-child { border-bottom: none; }
.sentiment-badge {
  padding: 2px 10px;
  border-radius: 12px;
  font-size: 12px;
  font-weight: 600;
  color: #fff;
}
.history-time { color: var(--text-muted); font-size: 12px; white-space: nowrap; }

.empty { text-align: center; color: var(--text-muted); padding: 24px 0; }
.empty p { color: var(--text); font-weight: 500; }
</style>
</head>
<body>
<div class="app">
  <header>
    <h1>Sentiment Dashboard</h1>
    <p class="subtitle">Analyze text sentiment and track results over time</p>
  </header>

  <section class="card">
    <textarea id="text" rows="4" placeholder="Enter text to analyze sentiment..."></textarea>
    <button id="analyze" class="analyze-btn" disabled>Analyze Sentiment</button>
    <div id="error" class="error"></div>
  </section>

  <div class="dashboard">
    <section class="card">
      <h2>Sentiment Overview</h2>
      <div id="chart"></div>
    </section>

    <section class="card">
      <h2>Quick Stats</h2>
      <div class="stats-grid">
        <div class="stat-card"><span class="stat-value" id="stat-total">0</span><span class="stat-label">Total Analyzed</span></div>
        <div class="stat-card positive"><span class="stat-value" id="stat-positive">0</span><span class="stat-label">Positive</span></div>
        <div class="stat-card negative"><span class="stat-value" id="stat-negative">0</span><span class="stat-label">Negative</span></div>
        <div class="stat-card neutral"><span class="stat-value" id="stat-neutral">0</span><span class="stat-label">Neutral</span></div>
      </div>
    </section>
  </div>

  <section class="card">
    <div class="history-header">
      <h2>Analysis History</h2>
      <button id="clear" class="clear-btn" style="display:none">Clear All</button>
    </div>
    <div id="history"></div>
  </section>
</div>

<script>
const COLORS = { positive: '#10b981', negative: '#ef4444', neutral: '#6b7280' };

const els = {
  text: document.getElementById('text'),
  analyze: document.getElementById('analyze'),
  error: document.getElementById('error'),
  chart: document.getElementById('chart'),
  history: document.getElementById('history'),
  clear: document.getElementById('clear'),
};

let loading = false;

function escapeHtml(s) {
  return String(s ?? '').replace(/[&<>"']/g, c => ({
    '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
  }[c]));
}

function classify(label) {
  const s = (label || '').toLowerCase();
  if (s.includes('positive')) return 'positive';
  if (s.includes('negative')) return 'negative';
  return 'neutral';
}

function showError(msg) {
  els.error.textContent = msg || '';
  els.error.style.display = msg ? 'block' : 'none';
}

function updateButton() {
  els.analyze.disabled = loading || !els.text.value.trim();
  els.analyze.textContent = loading ? 'Analyzing...' : 'Analyze Sentiment';
}

function renderChart(stats) {
  if (!stats.total) {
    els.chart.innerHTML = '<div class="empty"><p>No data yet</p><span>Analyze some text to see the chart</span></div>';
    return;
  }
  const r = 70, c = 2 * Math.PI * r;
  let offset = 0;
  const arcs = stats.chart.data.map((value, i) => {
    const len = (value / stats.total) * c;
    const arc = `<circle r="${r}" cx="100" cy="100" fill="none" stroke="${stats.chart.colors[i]}"
      stroke-width="36" stroke-dasharray="${len} ${c - len}" stroke-dashoffset="${-offset}"
      transform="rotate(-90 100 100)"></circle>`;
    offset += len;
    return value ? arc : '';
  }).join('');
  const legend = stats.chart.labels.map((label, i) =>
    `<span style="--swatch:${stats.chart.colors[i]}">${label} (${stats.chart.data[i]})</span>`
  ).join('');
  els.chart.innerHTML = `<div class="chart-container">
    <svg width="200" height="200" viewBox="0 0 200 200">${arcs}</svg>
    <div class="legend">${legend}</div></div>`;
}

function renderStats(stats) {
  document.getElementById('stat-total').textContent = stats.total;
  document.getElementById('stat-positive').textContent = stats.counts.positive;
  document.getElementById('stat-negative').textContent = stats.counts.negative;
  document.getElementById('stat-neutral').textContent = stats.counts.neutral;
}

function renderHistory(entries) {
  els.clear.style.display = entries.length ? 'inline-block' : 'none';
  if (!entries.length) {
    els.history.innerHTML = '<div class="empty"><p>No analysis history yet</p><span>Start by analyzing some text above</span></div>';
    return;
  }
  els.history.innerHTML = entries.map(item => `
    <div class="history-item">
      <div class="sentiment-badge" style="background:${COLORS[classify(item.sentiment)]}">${escapeHtml(item.sentiment || 'unknown')}</div>
      <p class="history-text">${escapeHtml(item.text)}</p>
      <span class="history-time">${escapeHtml(item.timestamp)}</span>
    </div>`).join('');
}

async function refresh() {
  const [history, stats] = await Promise.all([
    fetch('/api/history').then(r => r.json()),
    fetch('/api/stats').then(r => r.json()),
  ]);
  renderHistory(history.entries || []);
  renderStats(stats);
  renderChart(stats);
}

async function analyze() {
  const text = els.text.value;
  if (!text.trim() || loading) return;
  loading = true;
  updateButton();
  showError('');
  try {
    const resp = await fetch('/api/analyze', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ text }),
    });
    const data = await resp.json();
    if (!resp.ok) {
      showError(data.error || 'Failed to analyze sentiment');
    } else if (data.result) {
      els.text.value = '';
      await refresh();
    }
  } catch (err) {
    showError('Request to the dashboard server failed.');
    console.error(err);
  } finally {
    loading = false;
    updateButton();
  }
}

async function clearHistory() {
  await fetch('/api/history', { method: 'DELETE' });
  await refresh();
}

els.text.addEventListener('input', updateButton);
els.analyze.addEventListener('click', analyze);
els.clear.addEventListener('click', clearHistory);

refresh().catch(err => showError('Could not load dashboard data.'));
</script>
</body>
</html>
"##;
