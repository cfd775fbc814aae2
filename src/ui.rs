use crate::calendar::Cell;
use crate::models::MonthResponse;

pub fn render_index(month: &MonthResponse) -> String {
    let status = if month.loading { "Loading…" } else { "" };
    INDEX_HTML
        .replace("{{LABEL}}", &month.label)
        .replace("{{WEEKDAYS}}", &render_weekdays(&month.weekdays))
        .replace("{{GRID}}", &render_cells(&month.cells, month.loading))
        .replace("{{LOADING}}", if month.loading { "true" } else { "false" })
        .replace("{{STATUS}}", status)
}

fn render_weekdays(weekdays: &[&str]) -> String {
    weekdays
        .iter()
        .map(|day| format!(r#"<div class="weekday">{day}</div>"#))
        .collect()
}

/// Day cells only become click targets once the month's counts are known.
fn render_cells(cells: &[Cell], loading: bool) -> String {
    let mut html = String::new();
    for cell in cells {
        match cell {
            Cell::Blank => html.push_str(r#"<div class="cell blank"></div>"#),
            Cell::Day {
                day,
                quantity,
                tier,
                ..
            } => {
                let class = tier.css_class();
                let body = format!(r#"<span class="num">{day}</span><span class="qty">{quantity}</span>"#);
                if loading {
                    html.push_str(&format!(
                        r#"<div class="cell day {class}" data-day="{day}">{body}</div>"#
                    ));
                } else {
                    html.push_str(&format!(
                        r#"<form class="day-form" method="post" action="/day/{day}/click"><button class="cell day {class}" type="submit" data-day="{day}">{body}</button></form>"#
                    ));
                }
            }
        }
    }
    html
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Soda Calendar</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&display=swap');

    :root {
      --bg: #f3f4f6;
      --ink: #1f2937;
      --card: #ffffff;
      --line: #e5e7eb;
      --shadow: 0 1px 3px rgba(0, 0, 0, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 48px 18px;
    }

    .card {
      width: min(768px, 100%);
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 8px;
      box-shadow: var(--shadow);
    }

    .card-header {
      padding: 24px;
    }

    .card-title {
      margin: 0;
      display: flex;
      justify-content: space-between;
      align-items: center;
      font-size: 1.5rem;
      font-weight: 600;
    }

    .card-content {
      padding: 0 24px 24px;
    }

    .nav button {
      appearance: none;
      border: none;
      border-radius: 6px;
      padding: 8px 16px;
      font-size: 1rem;
      background: var(--line);
      cursor: pointer;
    }

    .nav button:hover {
      background: #d1d5db;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 4px;
    }

    .weekdays {
      margin-bottom: 16px;
    }

    .weekday {
      text-align: center;
      font-weight: 600;
    }

    .day-form {
      margin: 0;
    }

    .cell {
      width: 100%;
      height: 48px;
      border: 1px solid var(--line);
    }

    .cell.day {
      display: flex;
      flex-direction: column;
      align-items: center;
      justify-content: center;
      color: white;
      font: inherit;
      cursor: pointer;
      transition: background-color 150ms ease;
    }

    .cell .qty {
      font-size: 0.75rem;
    }

    .tier-none { background: #22c55e; }
    .tier-low { background: #eab308; }
    .tier-medium { background: #f97316; }
    .tier-high { background: #ef4444; }
    .tier-severe { background: #000000; }

    .status {
      min-height: 1.2em;
      margin-top: 12px;
      font-size: 0.95rem;
      color: #6b7280;
    }
  </style>
</head>
<body>
  <main class="card" data-loading="{{LOADING}}">
    <div class="card-header">
      <h3 class="card-title">
        <form class="nav" method="post" action="/month/prev"><button type="submit" aria-label="Previous month">←</button></form>
        <span id="label">{{LABEL}}</span>
        <form class="nav" method="post" action="/month/next"><button type="submit" aria-label="Next month">→</button></form>
      </h3>
    </div>
    <div class="card-content">
      <div class="grid weekdays">{{WEEKDAYS}}</div>
      <div class="grid" id="days">{{GRID}}</div>
      <div class="status" id="status">{{STATUS}}</div>
    </div>
  </main>

  <script>
    const root = document.querySelector('main');
    const statusEl = document.getElementById('status');
    const tiers = ['tier-none', 'tier-low', 'tier-medium', 'tier-high', 'tier-severe'];
    let syncTimer = null;

    const setStatus = (message) => {
      statusEl.textContent = message;
    };

    const paintCell = (day, quantity, tier) => {
      const button = document.querySelector(`button[data-day="${day}"]`);
      if (!button) {
        return;
      }
      button.classList.remove(...tiers);
      button.classList.add(`tier-${tier}`);
      button.querySelector('.qty').textContent = quantity;
    };

    const loadMonth = async () => {
      const res = await fetch('/api/month');
      if (!res.ok) {
        throw new Error('Unable to load month');
      }
      return res.json();
    };

    const sync = async () => {
      const month = await loadMonth();
      if (month.label !== document.getElementById('label').textContent) {
        window.location.reload();
        return;
      }
      month.cells
        .filter((cell) => cell.kind === 'day')
        .forEach((cell) => paintCell(cell.day, cell.quantity, cell.tier));
      setStatus(month.loading ? 'Loading…' : '');
      return month;
    };

    const waitForLoad = async () => {
      const month = await loadMonth();
      if (month.loading) {
        setTimeout(() => waitForLoad().catch((err) => setStatus(err.message)), 400);
        return;
      }
      window.location.reload();
    };

    const click = async (day) => {
      const res = await fetch('/api/click', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ day })
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      const data = await res.json();
      paintCell(day, data.quantity, data.tier);

      clearTimeout(syncTimer);
      syncTimer = setTimeout(() => sync().catch((err) => setStatus(err.message)), 800);
    };

    document.querySelectorAll('.day-form').forEach((form) => {
      form.addEventListener('submit', (event) => {
        event.preventDefault();
        const day = Number(form.querySelector('button').dataset.day);
        click(day).catch((err) => setStatus(err.message));
      });
    });

    if (root.dataset.loading === 'true') {
      waitForLoad().catch((err) => setStatus(err.message));
    }
  </script>
</body>
</html>
"#;
