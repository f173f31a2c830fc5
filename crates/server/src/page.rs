//! The embedded dashboard page. All decisions live in `railside-view`; the
//! page is dumb plumbing: two poll loops, a generic patch applier, a modal,
//! clipboard copy and the slider/number pair.

use railside_view as view;

pub fn render(team: &str, backend_url: &str, poll_secs: u64) -> String {
    let poll_ms = poll_secs.max(1).saturating_mul(1000);
    PAGE_HTML
        .replace("__TEAM_HTML__", &html_escape::encode_text(team))
        .replace("__TEAM_JS__", &js_string(team))
        .replace(
            "__BACKEND_JS__",
            &js_string(backend_url.trim_end_matches('/')),
        )
        .replace("__POLL_MS__", &poll_ms.to_string())
        .replace("__PMIN__", &view::POINTS_MIN.to_string())
        .replace("__PMAX__", &view::POINTS_MAX.to_string())
}

/// JSON string literal, safe to splice into a script block.
fn js_string(s: &str) -> String {
    serde_json::to_string(s)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('<', "\\u003c")
}

const PAGE_HTML: &str = r###"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Railside Team Console</title>
  <style>
    :root{
      --bg:#0d1117;
      --panel:#161d27;
      --edge:#2c3a4d;
      --ink:#e8eef5;
      --muted:#8b9bb0;
      --accent:#5ec8a8;
      --warn:#e8b44c;
      --bad:#e06a7f;
    }
    *{box-sizing:border-box;margin:0;padding:0}
    body{
      font-family:system-ui,sans-serif;color:var(--ink);background:var(--bg);
      min-height:100vh;padding:16px;
    }
    .topbar{
      display:flex;align-items:center;justify-content:space-between;gap:12px;
      padding:12px 16px;border:1px solid var(--edge);border-radius:12px;
      background:var(--panel);margin-bottom:14px;
    }
    .topbar h1{font-size:16px;letter-spacing:1px}
    .topbar .sub{font-size:12px;color:var(--muted)}
    .pill{display:flex;align-items:center;gap:7px;font-size:12px;color:var(--muted)}
    .dot{width:8px;height:8px;border-radius:99px;background:var(--warn)}
    .dot.ok{background:var(--accent)}
    .grid{display:grid;grid-template-columns:1fr 1fr;gap:14px}
    @media (max-width:860px){.grid{grid-template-columns:1fr}}
    .card{
      border:1px solid var(--edge);border-radius:12px;background:var(--panel);
      padding:14px;margin-bottom:14px;
    }
    .card h2{font-size:13px;letter-spacing:.6px;color:var(--muted);margin-bottom:10px;text-transform:uppercase}
    .card h3{font-size:13px;margin:8px 0 4px}
    .card ul{list-style:none}
    .card li{padding:5px 8px;border-radius:8px;font-size:13px}
    .card li:nth-child(odd){background:#1b2431}
    #users\.list li.copy{cursor:pointer}
    #users\.list li.copy:hover{background:#243043}
    .status{font-size:14px;margin-bottom:6px}
    .row{display:flex;gap:8px;flex-wrap:wrap;align-items:center;margin-top:8px}
    input[type=text],input[type=number]{
      background:#0f1520;border:1px solid var(--edge);border-radius:8px;
      color:var(--ink);padding:7px 9px;font-size:13px;width:160px;
    }
    input[type=range]{flex:1;min-width:120px}
    button{
      border:1px solid #3d5270;background:#1d2a3c;color:var(--ink);
      border-radius:8px;padding:7px 12px;font-size:13px;cursor:pointer;
    }
    button:hover{border-color:var(--accent)}
    .overlay{
      position:fixed;inset:0;background:#000a;display:flex;
      align-items:center;justify-content:center;z-index:50;
    }
    .overlay .box{
      background:var(--panel);border:1px solid var(--edge);border-radius:12px;
      padding:20px;max-width:420px;width:90%;
    }
    .overlay .box h4{font-size:15px;margin-bottom:8px}
    .overlay .box p{font-size:13px;color:var(--muted);margin-bottom:14px}
    .overlay.success .box{border-color:var(--accent)}
    .overlay.warning .box{border-color:var(--warn)}
    .overlay.error .box{border-color:var(--bad)}
    #toast{
      position:fixed;left:50%;bottom:24px;transform:translateX(-50%);
      background:#1d2a3c;border:1px solid var(--accent);border-radius:10px;
      padding:8px 14px;font-size:13px;z-index:60;
    }
  </style>
</head>
<body>
  <header class="topbar">
    <div>
      <h1>RAILSIDE</h1>
      <div class="sub">Team <span id="team">__TEAM_HTML__</span></div>
    </div>
    <div class="pill"><span id="connDot" class="dot"></span><span id="connText">connecting</span></div>
  </header>

  <div class="grid">
    <section>
      <div class="card">
        <h2 id="roster.label">Teammates</h2>
        <div id="roster.admins"></div>
        <div id="roster.players"></div>
      </div>
      <div class="card">
        <h2 id="users.label">Unknown users</h2>
        <div id="users.list"></div>
      </div>
    </section>

    <section>
      <div class="card">
        <h2>Status</h2>
        <div id="mission.label" class="status"></div>
        <div id="position.label" class="status"></div>
        <div class="row">
          <button id="btn.finish">Finish mission</button>
          <button id="btn.skip">Skip mission</button>
          <button id="btn.arrive">Arrive at target</button>
          <button id="btn.dice">Roll the dice</button>
        </div>
      </div>

      <div class="card">
        <h2>Team</h2>
        <div class="row">
          <input id="join.name" type="text" placeholder="player name" />
          <button id="btn.join">Join team</button>
        </div>
        <div class="row">
          <input id="leave.name" type="text" placeholder="player name" />
          <button id="btn.leave">Leave team</button>
        </div>
      </div>

      <div class="card">
        <h2>Scoring</h2>
        <div class="row">
          <input id="points.slider" type="range" min="__PMIN__" max="__PMAX__" value="10" />
          <input id="points.number" type="number" min="__PMIN__" max="__PMAX__" value="10" />
          <button id="btn.points">Add points</button>
        </div>
      </div>

      <div id="station.setup" class="card" hidden>
        <h2>Starting station</h2>
        <div class="row">
          <input id="station.name" type="text" placeholder="station name" />
          <button id="btn.station">Set station</button>
        </div>
      </div>
    </section>
  </div>

  <div id="modal" class="overlay" hidden>
    <div class="box">
      <h4 id="modal.title"></h4>
      <p id="modal.text"></p>
      <div class="row">
        <button id="modal.ok">OK</button>
        <button id="modal.go" hidden>Go</button>
      </div>
    </div>
  </div>
  <div id="toast" hidden></div>

  <script>
  (function(){
    const $ = (id) => document.getElementById(id);

    const TEAM = __TEAM_JS__;
    const BACKEND = __BACKEND_JS__;
    const POLL_MS = __POLL_MS__;
    const TEAM_ERROR = "Error loading team data.";
    const USERS_ERROR = "Error loading unknown user data.";

    // Newest applied seq per event; older in-flight responses are dropped.
    const lastSeq = {};

    function apply(update){
      if ((lastSeq[update.event] || 0) >= update.seq) return;
      lastSeq[update.event] = update.seq;
      for (const p of update.patches || []){
        const el = document.getElementById(p.target);
        if (!el) continue;
        if (p.swap === "show") el.hidden = false;
        else if (p.swap === "hide") el.hidden = true;
        else el.innerHTML = p.html || "";
      }
    }

    async function fetchUpdate(path){
      const r = await fetch(path, { cache: "no-store" });
      if (!r.ok) throw new Error("http " + r.status);
      return r.json();
    }

    async function pollTeam(){
      try{
        apply(await fetchUpdate(`/api/ui/team/${encodeURIComponent(TEAM)}`));
      }catch(e){
        console.error("team poll failed:", e);
        $("roster.label").textContent = TEAM_ERROR;
      }
    }

    async function pollUsers(){
      try{
        apply(await fetchUpdate("/api/ui/users"));
      }catch(e){
        console.error("users poll failed:", e);
        $("users.label").textContent = USERS_ERROR;
      }
    }

    async function healthLoop(){
      for(;;){
        try{
          const r = await fetch("/health", { cache: "no-store" });
          if (!r.ok) throw new Error("bad");
          $("connDot").classList.add("ok");
          $("connText").textContent = "online";
        }catch(_e){
          $("connDot").classList.remove("ok");
          $("connText").textContent = "offline";
        }
        await new Promise(res => setTimeout(res, 5000));
      }
    }

    let pendingNotice = null;

    function showNotice(notice){
      if (!notice) return;
      if (notice.navigate && notice.route){
        window.location.href = BACKEND + notice.route;
        return;
      }
      pendingNotice = notice;
      $("modal.title").textContent = notice.title;
      $("modal.text").textContent = notice.text || "";
      $("modal").className = "overlay " + notice.kind;
      $("modal.go").hidden = !notice.route;
      $("modal").hidden = false;
    }

    function closeNotice(go){
      $("modal").hidden = true;
      const n = pendingNotice;
      pendingNotice = null;
      if (!n) return;
      if (go && n.route){
        window.location.href = BACKEND + n.route;
        return;
      }
      if (n.refresh) pollTeam();
    }

    $("modal.ok").addEventListener("click", () => closeNotice(false));
    $("modal.go").addEventListener("click", () => closeNotice(true));

    async function runAction(body){
      try{
        const r = await fetch("/api/action", {
          method: "POST",
          headers: { "content-type": "application/json" },
          body: JSON.stringify(body),
        });
        if (!r.ok) throw new Error("http " + r.status);
        const update = await r.json();
        showNotice(update.notice);
      }catch(e){
        console.error("action failed:", e);
        showNotice({ kind: "error", title: "Request failed",
                     text: "Could not reach the dashboard gateway." });
      }
    }

    $("btn.join").addEventListener("click", () =>
      runAction({ action: "join_team", team: TEAM, player: $("join.name").value }));
    $("btn.leave").addEventListener("click", () =>
      runAction({ action: "leave_team", player: $("leave.name").value }));
    $("btn.points").addEventListener("click", () =>
      runAction({ action: "add_point", team: TEAM, points: Number($("points.number").value) }));
    $("btn.station").addEventListener("click", () =>
      runAction({ action: "set_station", team: TEAM, station: $("station.name").value }));
    $("btn.finish").addEventListener("click", () =>
      runAction({ action: "finish_mission", team: TEAM }));
    $("btn.skip").addEventListener("click", () =>
      runAction({ action: "skip_mission", team: TEAM }));
    $("btn.arrive").addEventListener("click", () =>
      runAction({ action: "arrive_target", team: TEAM }));

    $("btn.dice").addEventListener("click", async () => {
      try{
        const update = await fetchUpdate(`/api/ui/dice/${encodeURIComponent(TEAM)}`);
        showNotice(update.notice);
      }catch(e){
        console.error("dice gate failed:", e);
        showNotice({ kind: "error", title: "Request failed",
                     text: "Could not reach the dashboard gateway." });
      }
    });

    let toastTimer = null;
    function toast(text){
      $("toast").textContent = text;
      $("toast").hidden = false;
      clearTimeout(toastTimer);
      toastTimer = setTimeout(() => { $("toast").hidden = true; }, 1600);
    }

    $("users.list").addEventListener("click", (e) => {
      const row = e.target.closest("li.copy");
      if (!row) return;
      const name = row.dataset.name;
      navigator.clipboard.writeText(name)
        .then(() => toast("Copied: " + name))
        .catch((err) => console.error("clipboard copy failed:", err));
    });

    // Slider and number stay numerically equal, clamped to the declared range.
    const slider = $("points.slider");
    const number = $("points.number");
    function syncPoints(src, dst){
      const v = Math.max(__PMIN__, Math.min(__PMAX__, Number(src.value) || 0));
      src.value = v;
      dst.value = v;
    }
    slider.addEventListener("input", () => syncPoints(slider, number));
    number.addEventListener("input", () => syncPoints(number, slider));

    pollTeam();
    pollUsers();
    setInterval(pollTeam, POLL_MS);
    setInterval(pollUsers, POLL_MS);
    healthLoop();
  })();
  </script>
</body>
</html>
"###;
