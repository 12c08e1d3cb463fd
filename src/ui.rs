use crate::models::{CHUNKS_PER_TASK, MINUTES_PER_CHUNK};

pub fn render_index(date: &str) -> String {
    INDEX_HTML
        .replace("{{DATE}}", date)
        .replace("{{CHUNKS_PER_TASK}}", &CHUNKS_PER_TASK.to_string())
        .replace("{{MINUTES_PER_CHUNK}}", &MINUTES_PER_CHUNK.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Chunk Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef1f8;
      --bg-2: #c9d3f5;
      --ink: #1f2433;
      --accent: #4f46e5;
      --accent-2: #16a34a;
      --muted: #6b7280;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(31, 36, 51, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #f6f7fb 70%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1080px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    header {
      text-align: center;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
      color: var(--accent);
    }

    h2 {
      margin: 0 0 14px;
      font-size: 1.25rem;
    }

    .subtitle {
      margin: 6px 0 0;
      color: var(--muted);
    }

    .layout {
      display: grid;
      grid-template-columns: 2fr 1fr;
      gap: 24px;
    }

    .card {
      background: var(--card);
      border-radius: 22px;
      box-shadow: var(--shadow);
      padding: 24px;
    }

    .task {
      display: flex;
      align-items: center;
      gap: 14px;
      padding: 14px 16px;
      border-radius: 16px;
      background: white;
      border: 1px solid rgba(31, 36, 51, 0.08);
      margin-bottom: 10px;
    }

    .task.done {
      background: #dcfce7;
    }

    .task.done .title {
      text-decoration: line-through;
      color: var(--muted);
    }

    .task .body {
      flex: 1;
    }

    .task .title {
      font-weight: 600;
      font-size: 1.05rem;
    }

    .chunks {
      display: flex;
      gap: 8px;
      margin-top: 8px;
    }

    .chunks input {
      width: 22px;
      height: 22px;
      accent-color: var(--accent);
      cursor: pointer;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 12px;
      padding: 10px 14px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
    }

    button:disabled {
      opacity: 0.5;
      cursor: not-allowed;
    }

    .btn-primary {
      background: var(--accent);
      color: white;
    }

    .btn-secondary {
      background: var(--accent-2);
      color: white;
    }

    .btn-ghost {
      background: transparent;
      color: var(--muted);
    }

    .btn-ghost:hover {
      color: #dc2626;
    }

    form.add {
      display: flex;
      gap: 8px;
    }

    form.add input {
      flex: 1;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid #d1d5db;
      font: inherit;
    }

    .suggestions {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
      margin-top: 12px;
    }

    .suggestions button {
      background: white;
      border: 1px solid #d1d5db;
      border-radius: 999px;
      font-weight: 500;
      padding: 6px 12px;
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 6px;
      background: rgba(31, 36, 51, 0.06);
      border-radius: 14px;
      margin-bottom: 16px;
    }

    .tab {
      flex: 1;
      background: transparent;
      color: var(--muted);
      padding: 8px 0;
    }

    .tab.active {
      background: var(--accent);
      color: white;
    }

    #chart {
      width: 100%;
      height: 220px;
      display: block;
    }

    .chart-bar {
      fill: var(--accent);
    }

    .chart-grid {
      stroke: rgba(31, 36, 51, 0.1);
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .totals {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 12px;
      margin-top: 16px;
      text-align: center;
    }

    .totals .value {
      font-size: 1.6rem;
      font-weight: 600;
      color: var(--accent);
    }

    .totals .value.minutes {
      color: var(--accent-2);
    }

    .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .backup {
      display: flex;
      gap: 8px;
      flex-wrap: wrap;
    }

    .status {
      min-height: 1.2em;
      font-size: 0.9rem;
      margin-top: 10px;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: #dc2626;
    }

    .status[data-type="ok"] {
      color: var(--accent-2);
    }

    .empty {
      color: var(--muted);
      text-align: center;
      padding: 24px 0;
    }

    @media (max-width: 820px) {
      .layout {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Chunk Tracker</h1>
      <p class="subtitle">Each task is {{CHUNKS_PER_TASK}} chunks of {{MINUTES_PER_CHUNK}} minutes. Today is <span id="date">{{DATE}}</span>.</p>
    </header>

    <div class="layout">
      <section class="card">
        <h2>Today's tasks</h2>
        <div id="tasks"></div>
      </section>

      <aside style="display: grid; gap: 24px; align-content: start;">
        <section class="card">
          <h2>Add a task</h2>
          <form class="add" id="add-form">
            <input id="title" type="text" placeholder="e.g. Practice scales" autocomplete="off" />
            <button class="btn-secondary" id="suggest-btn" type="button">Suggest</button>
            <button class="btn-primary" type="submit">Add</button>
          </form>
          <div class="suggestions" id="suggestions"></div>
          <div class="status" id="suggest-status"></div>
        </section>

        <section class="card">
          <h2>Your progress</h2>
          <div class="tabs" role="tablist">
            <button class="tab" type="button" data-period="today">Today</button>
            <button class="tab active" type="button" data-period="month">Month</button>
            <button class="tab" type="button" data-period="3-months">3M</button>
            <button class="tab" type="button" data-period="6-months">6M</button>
            <button class="tab" type="button" data-period="year">Year</button>
          </div>
          <svg id="chart" viewBox="0 0 320 220" aria-label="Chunks per period" role="img"></svg>
          <div class="totals">
            <div>
              <div class="label">Chunks</div>
              <div class="value" id="total-chunks">0</div>
            </div>
            <div>
              <div class="label">Minutes</div>
              <div class="value minutes" id="total-minutes">0</div>
            </div>
          </div>
        </section>

        <section class="card">
          <h2>Backup</h2>
          <div class="backup">
            <a href="/api/export" download><button class="btn-primary" type="button">Export</button></a>
            <button class="btn-secondary" id="import-btn" type="button">Import</button>
            <input id="import-file" type="file" accept="application/json" hidden />
          </div>
          <div class="status" id="backup-status"></div>
        </section>
      </aside>
    </div>
  </main>

  <script>
    const CHUNKS = {{CHUNKS_PER_TASK}};
    const tasksEl = document.getElementById('tasks');
    const titleEl = document.getElementById('title');
    const suggestionsEl = document.getElementById('suggestions');
    const suggestBtn = document.getElementById('suggest-btn');
    const suggestStatus = document.getElementById('suggest-status');
    const backupStatus = document.getElementById('backup-status');
    const chartEl = document.getElementById('chart');
    const tabs = Array.from(document.querySelectorAll('.tab'));

    let period = 'month';
    let suggestionRequest = 0;

    const setStatus = (el, message, type) => {
      el.textContent = message;
      el.dataset.type = type || '';
    };

    const request = async (url, options = {}) => {
      const res = await fetch(url, options);
      const body = await res.json().catch(() => ({}));
      if (!res.ok) {
        throw new Error(body.message || 'Request failed');
      }
      return body;
    };

    const sendJson = (url, method, payload) =>
      request(url, {
        method,
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(payload)
      });

    const escapeHtml = (text) =>
      text.replace(/[&<>"']/g, (c) => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' })[c]);

    const renderTasks = (data) => {
      if (!data.tasks.length) {
        tasksEl.innerHTML = '<p class="empty">No tasks yet. Add one to get started.</p>';
        return;
      }
      tasksEl.innerHTML = data.tasks
        .map((task) => {
          const boxes = Array.from({ length: CHUNKS }, (_, i) =>
            `<input type="checkbox" data-id="${escapeHtml(task.id)}" data-pos="${i}" ${i < task.checked ? 'checked' : ''} aria-label="Chunk ${i + 1}" />`
          ).join('');
          const done = task.checked === CHUNKS ? ' done' : '';
          return `<div class="task${done}">
            <div class="body">
              <div class="title">${escapeHtml(task.title)}</div>
              <div class="chunks">${boxes}</div>
            </div>
            <button class="btn-ghost" data-delete="${escapeHtml(task.id)}" type="button" aria-label="Delete task">Delete</button>
          </div>`;
        })
        .join('');
    };

    const renderChart = (buckets) => {
      if (!buckets.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }
      const width = 320;
      const height = 220;
      const padX = 30;
      const padY = 28;
      const top = 12;
      const max = Math.max(1, ...buckets.map((b) => b.chunks));
      const slot = (width - padX * 2) / buckets.length;
      const barWidth = Math.min(40, slot * 0.6);
      const scale = (height - top - padY) / max;

      let grid = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = (max * i) / 4;
        const y = height - padY - value * scale;
        grid += `<line class="chart-grid" x1="${padX}" y1="${y}" x2="${width - padX}" y2="${y}" />`;
        grid += `<text class="chart-label" x="${padX - 6}" y="${y + 4}" text-anchor="end">${Math.round(value)}</text>`;
      }

      const bars = buckets
        .map((b, i) => {
          const x = padX + slot * i + (slot - barWidth) / 2;
          const h = b.chunks * scale;
          return `<rect class="chart-bar" rx="4" x="${x}" y="${height - padY - h}" width="${barWidth}" height="${h}"><title>${b.chunks} chunks, ${b.minutes} min</title></rect>
            <text class="chart-label" x="${x + barWidth / 2}" y="${height - padY + 16}" text-anchor="middle">${escapeHtml(b.label)}</text>`;
        })
        .join('');

      chartEl.innerHTML = grid + bars;
    };

    const loadStats = async () => {
      const stats = await request(`/api/stats?period=${encodeURIComponent(period)}`);
      renderChart(stats.buckets);
      document.getElementById('total-chunks').textContent = stats.total_chunks;
      document.getElementById('total-minutes').textContent = stats.total_minutes.toLocaleString();
    };

    const refresh = async (data) => {
      renderTasks(data || (await request('/api/tasks')));
      await loadStats();
    };

    tasksEl.addEventListener('change', (event) => {
      const box = event.target;
      if (!box.dataset.id) {
        return;
      }
      sendJson(`/api/tasks/${encodeURIComponent(box.dataset.id)}/chunks/${box.dataset.pos}`, 'POST', {})
        .then(refresh)
        .catch((err) => setStatus(backupStatus, err.message, 'error'));
    });

    tasksEl.addEventListener('click', (event) => {
      const id = event.target.dataset.delete;
      if (!id) {
        return;
      }
      request(`/api/tasks/${encodeURIComponent(id)}`, { method: 'DELETE' })
        .then(refresh)
        .catch((err) => setStatus(backupStatus, err.message, 'error'));
    });

    document.getElementById('add-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const title = titleEl.value.trim();
      if (!title) {
        return;
      }
      sendJson('/api/tasks', 'POST', { title })
        .then((data) => {
          titleEl.value = '';
          suggestionRequest += 1;
          suggestionsEl.innerHTML = '';
          fetch('/api/suggestions/dismiss', { method: 'POST' });
          return refresh(data);
        })
        .catch((err) => setStatus(suggestStatus, err.message, 'error'));
    });

    suggestBtn.addEventListener('click', async () => {
      const topic = titleEl.value.trim();
      if (!topic) {
        setStatus(suggestStatus, 'Please enter a topic to get suggestions.', 'error');
        return;
      }
      const ticket = ++suggestionRequest;
      suggestionsEl.innerHTML = '';
      setStatus(suggestStatus, 'Getting suggestions...', 'info');
      suggestBtn.disabled = true;
      try {
        const result = await sendJson('/api/suggestions', 'POST', { topic });
        if (ticket !== suggestionRequest || result.stale) {
          return;
        }
        setStatus(suggestStatus, result.suggestions.length ? '' : 'No suggestions this time.', '');
        suggestionsEl.innerHTML = result.suggestions
          .map((s) => `<button type="button" data-suggestion="${escapeHtml(s)}">${escapeHtml(s)}</button>`)
          .join('');
      } catch (err) {
        if (ticket === suggestionRequest) {
          setStatus(suggestStatus, 'Failed to get suggestions. Please try again.', 'error');
        }
      } finally {
        if (ticket === suggestionRequest) {
          suggestBtn.disabled = false;
        }
      }
    });

    suggestionsEl.addEventListener('click', (event) => {
      const value = event.target.dataset.suggestion;
      if (value) {
        titleEl.value = value;
        suggestionsEl.innerHTML = '';
      }
    });

    tabs.forEach((tab) => {
      tab.addEventListener('click', () => {
        period = tab.dataset.period;
        tabs.forEach((t) => t.classList.toggle('active', t === tab));
        loadStats().catch((err) => setStatus(backupStatus, err.message, 'error'));
      });
    });

    const fileEl = document.getElementById('import-file');
    document.getElementById('import-btn').addEventListener('click', () => fileEl.click());
    fileEl.addEventListener('change', async () => {
      const file = fileEl.files[0];
      fileEl.value = '';
      if (!file) {
        return;
      }
      if (!window.confirm('Importing replaces all current tasks and history. Continue?')) {
        return;
      }
      try {
        const result = await request('/api/import', { method: 'POST', body: await file.text() });
        setStatus(backupStatus, result.message, 'ok');
        await refresh();
      } catch (err) {
        setStatus(backupStatus, `Import failed: ${err.message}`, 'error');
      }
    });

    refresh().catch((err) => setStatus(backupStatus, err.message, 'error'));
  </script>
</body>
</html>
"#;
