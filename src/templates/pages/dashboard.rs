use crate::templates::desktop_layout;
use maud::{html, Markup, PreEscaped};

// The table and the chat widget are filled in client-side against the
// JSON API, like the SPA this page replaced. The selected row rides
// along with every chat turn so "push" knows what to push.
const DASHBOARD_JS: &str = r#"
var selected = null;

function loadPolicies() {
  fetch('/api/data')
    .then(function (res) { return res.json(); })
    .then(renderRows)
    .catch(function () {
      document.querySelector('#policy-table tbody').innerHTML =
        '<tr><td colspan="8">Failed to load policies.</td></tr>';
    });
}

function renderRows(rows) {
  var tbody = document.querySelector('#policy-table tbody');
  tbody.innerHTML = '';
  rows.forEach(function (row) {
    var tr = document.createElement('tr');
    var m = row.metadata || {};
    [row.policy_id, m.u_change_id, m.u_application, m.u_source_address,
     m.u_destination_address, m.u_action, m.u_requestor].forEach(function (v) {
      var td = document.createElement('td');
      td.textContent = v == null ? '' : v;
      tr.appendChild(td);
    });
    var td = document.createElement('td');
    var btn = document.createElement('button');
    btn.textContent = 'Push';
    btn.onclick = function (e) { e.stopPropagation(); pushRow(row, btn); };
    td.appendChild(btn);
    tr.appendChild(td);
    tr.onclick = function () {
      selected = { policy_id: row.policy_id, metadata: m };
      tbody.querySelectorAll('tr').forEach(function (r) { r.classList.remove('selected'); });
      tr.classList.add('selected');
    };
    tbody.appendChild(tr);
  });
}

function pushRow(row, btn) {
  btn.disabled = true;
  btn.textContent = 'Pushing…';
  fetch('/api/push-firewall', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ metadata: row.metadata, policy_id: row.policy_id })
  })
    .then(function (res) { return res.json(); })
    .then(function (result) { alert(result.message || result.details || 'Policy pushed.'); })
    .catch(function () { alert('Failed to push policy.'); })
    .finally(function () { btn.disabled = false; btn.textContent = 'Push'; });
}

function appendChat(sender, text) {
  var log = document.getElementById('chat-log');
  var div = document.createElement('div');
  div.className = 'msg ' + sender;
  div.textContent = text;
  log.appendChild(div);
  log.scrollTop = log.scrollHeight;
}

document.getElementById('chat-form').onsubmit = function (e) {
  e.preventDefault();
  var input = document.getElementById('chat-input');
  var text = input.value.trim();
  if (!text) return;
  appendChat('user', text);
  input.value = '';
  fetch('/api/chat', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ input: text, selected: selected })
  })
    .then(function (res) { return res.json(); })
    .then(function (reply) {
      appendChat('bot', reply.message || reply.details || '…');
      if (reply.open_url) window.open(reply.open_url, '_blank');
    })
    .catch(function () { appendChat('bot', '⚠️ Something went wrong. Please try again.'); });
};

document.getElementById('sync-btn').onclick = function () {
  var out = document.getElementById('sync-result');
  out.textContent = 'Syncing…';
  fetch('/api/sync-servicenow', { method: 'POST' })
    .then(function (res) { return res.json(); })
    .then(function (r) {
      out.textContent = r.message || r.details || 'Sync finished.';
      loadPolicies();
    })
    .catch(function () { out.textContent = 'Sync failed.'; });
};

loadPolicies();
"#;

pub fn dashboard_page() -> Markup {
    desktop_layout(
        "DFX - Firewall Changes",
        html! {
            main class="container" {
                h1 { "Pending Firewall Changes" }

                section class="card" {
                    div class="toolbar" {
                        button id="sync-btn" { "Sync from ServiceNow" }
                        span id="sync-result" {}
                    }
                    table id="policy-table" {
                        thead {
                            tr {
                                th { "Policy" }
                                th { "Change ID" }
                                th { "Application" }
                                th { "Source Address" }
                                th { "Destination" }
                                th { "Action" }
                                th { "Requestor" }
                                th { "Push" }
                            }
                        }
                        tbody {
                            tr { td colspan="8" { "Loading…" } }
                        }
                    }
                }

                section class="card chatbox" {
                    h3 { "FireBot🔥 - Your Firewall Assistant" }
                    div id="chat-log" {
                        div class="msg bot" { "Hi there 👋 How can I help you today?" }
                    }
                    form id="chat-form" {
                        input id="chat-input" type="text" placeholder="Type your message…" autocomplete="off";
                        button type="submit" { "Send" }
                    }
                }
            }
            script { (PreEscaped(DASHBOARD_JS)) }
        },
    )
}
