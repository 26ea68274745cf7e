//! Embedded dashboard assets. Presentation only: every number shown here
//! comes straight from the state endpoint.

pub const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>ecopolis</title>
  <link rel="stylesheet" href="/styles.css">
</head>
<body>
  <header>
    <h1>ecopolis</h1>
    <div id="stats"></div>
  </header>
  <main>
    <div id="grid"></div>
    <aside>
      <div id="palette"></div>
      <div id="mission"></div>
      <div id="log"></div>
    </aside>
  </main>
  <script src="/app.js"></script>
</body>
</html>
"#;

pub const STYLES_CSS: &str = r#"body { font-family: system-ui, sans-serif; margin: 0; background: #10151c; color: #e6e9ee; }
header { display: flex; align-items: baseline; gap: 2rem; padding: 0.5rem 1rem; background: #161d27; }
header h1 { font-size: 1.1rem; margin: 0; }
#stats span { margin-right: 1.2rem; color: #9fb2c8; }
main { display: flex; gap: 1rem; padding: 1rem; }
#grid { display: grid; grid-template-columns: repeat(10, 44px); gap: 2px; }
#grid .tile { width: 44px; height: 44px; background: #1d2735; border-radius: 3px; font-size: 0.6rem;
  display: flex; align-items: center; justify-content: center; cursor: pointer; text-align: center; }
#grid .tile.inactive { opacity: 0.45; }
#grid .tile.abandoned { outline: 2px solid #b3404a; }
aside { width: 280px; }
#palette button { margin: 0 4px 4px 0; }
#palette button.selected { outline: 2px solid #6ab0f3; }
#mission { margin-top: 1rem; font-size: 0.85rem; }
#mission .done { color: #69c17d; }
#log { margin-top: 1rem; font-size: 0.75rem; color: #9fb2c8; max-height: 14rem; overflow-y: auto; }
"#;

pub const APP_JS: &str = r#"const kinds = ["road","residential","water_plant","factory","solar_plant","park",
  "hospital","school","wind_turbine","recycling","transit","green_tower","eco_dome"];
const glyphs = {road:"=", residential:"H", water_plant:"W", factory:"F", solar_plant:"S",
  park:"P", hospital:"+", school:"E", wind_turbine:"T", recycling:"R", transit:"B",
  green_tower:"G", eco_dome:"O"};
let selected = null;
let demolish = false;

async function post(url, body) {
  await fetch(url, {method: "POST", headers: {"content-type": "application/json"},
    body: body ? JSON.stringify(body) : null});
  refresh();
}

function renderPalette(state) {
  const el = document.getElementById("palette");
  el.innerHTML = "";
  for (const kind of kinds) {
    const btn = document.createElement("button");
    btn.textContent = glyphs[kind] + " " + kind;
    btn.disabled = !state.unlocked_buildings.includes(kind);
    if (state.selected_building === kind) btn.classList.add("selected");
    btn.onclick = () => post("/api/select", {building: kind});
    el.appendChild(btn);
  }
  const dem = document.createElement("button");
  dem.textContent = "demolish";
  if (state.demolish_mode) dem.classList.add("selected");
  dem.onclick = () => post("/api/demolish-mode");
  el.appendChild(dem);
}

function renderGrid(state) {
  const el = document.getElementById("grid");
  el.innerHTML = "";
  for (const tile of state.grid.tiles) {
    const div = document.createElement("div");
    div.className = "tile";
    if (tile.building) {
      div.textContent = glyphs[tile.building];
      if (!tile.active) div.classList.add("inactive");
      if (tile.abandoned) div.classList.add("abandoned");
    }
    div.title = "pollution " + Math.round(tile.pollution) +
      (tile.happiness ? ", happiness " + Math.round(tile.happiness) : "");
    div.onclick = () => post("/api/place", {x: tile.pos.x, y: tile.pos.y});
    el.appendChild(div);
  }
}

function renderStats(state) {
  document.getElementById("stats").innerHTML =
    "<span>$" + state.money + "</span>" +
    "<span>level " + state.level + " (" + state.xp + " xp)</span>" +
    "<span>cycle " + state.cycles + "</span>" +
    "<span>happiness " + state.avg_happiness + "</span>" +
    "<span>pollution " + state.avg_pollution + "</span>" +
    "<span>income " + state.last_cycle_income + "</span>";
}

function renderMission(envelope) {
  const el = document.getElementById("mission");
  if (!envelope.current_mission) {
    el.innerHTML = envelope.state.game_complete ? "<b>All missions complete.</b>" : "";
    return;
  }
  const m = envelope.current_mission;
  el.innerHTML = "<b>" + m.title + "</b><br>" + m.description + "<ul>" +
    m.objectives.map(o =>
      "<li class=\"" + (o.current >= o.target ? "done" : "") + "\">" + o.label + "</li>"
    ).join("") + "</ul>reward: $" + m.reward_money + ", " + m.reward_xp + " xp";
}

async function refresh() {
  const envelope = await (await fetch("/api/state")).json();
  renderStats(envelope.state);
  renderGrid(envelope.state);
  renderPalette(envelope.state);
  renderMission(envelope);
}

const log = document.getElementById("log");
const events = new EventSource("/api/events");
events.onmessage = (msg) => {
  const frame = JSON.parse(msg.data);
  for (const ev of frame.summary.events) {
    const line = document.createElement("div");
    line.textContent = "cycle " + frame.summary.cycle + ": " + ev.event;
    log.prepend(line);
  }
  renderStats(frame.state.state);
  renderGrid(frame.state.state);
  renderMission(frame.state);
};

refresh();
"#;
