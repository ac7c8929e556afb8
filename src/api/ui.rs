//! Web UI - single page phrase tracker
//!
//! The page reads `uid` from the query string, loads the saved phrase on
//! start, and offers manual notation entry plus sheet image upload. The
//! upload is encoded client-side as a data URL and posted for transcription.

use axum::response::{Html, IntoResponse};
use axum::{routing::get, Router};

use crate::AppState;

/// GET /
///
/// Phrase tracker page. All interaction goes through the JSON API.
pub async fn root_page() -> impl IntoResponse {
    Html(PAGE.replace("{version}", env!("CARGO_PKG_VERSION")))
}

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(root_page))
}

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Notekeep</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
            display: flex;
            justify-content: center;
            padding: 40px 20px;
        }
        .card {
            width: 100%;
            max-width: 480px;
            background-color: #2a2a2a;
            border: 1px solid #3a3a3a;
            border-radius: 8px;
            padding: 24px;
        }
        h1 { font-size: 24px; color: #4a9eff; margin-bottom: 4px; }
        .version { color: #888; font-size: 12px; margin-bottom: 20px; }
        h2 { font-size: 16px; margin: 20px 0 8px; }
        label { display: block; font-size: 14px; color: #aaa; margin-bottom: 6px; }
        input[type="text"], input[type="file"] {
            width: 100%;
            padding: 10px;
            background-color: #1a1a1a;
            border: 1px solid #3a3a3a;
            border-radius: 4px;
            color: #e0e0e0;
        }
        button {
            width: 100%;
            margin-top: 10px;
            padding: 10px;
            background-color: #4a9eff;
            border: none;
            border-radius: 4px;
            color: #fff;
            font-size: 14px;
            cursor: pointer;
        }
        button:hover { background-color: #3a8eef; }
        ul { list-style: disc; padding-left: 24px; color: #ccc; }
        #status { margin-top: 12px; font-size: 14px; color: #ff6b6b; min-height: 20px; }
        #loading { color: #888; }
    </style>
</head>
<body>
    <div class="card">
        <h1>Notekeep</h1>
        <div class="version">v{version}</div>

        <p id="loading" hidden>Loading...</p>

        <div id="saved-section" hidden>
            <h2>Saved Music</h2>
            <ul id="saved-list"></ul>
        </div>

        <h2>Manually Input Music</h2>
        <label for="manual-input">Comma-separated notes</label>
        <input type="text" id="manual-input" placeholder="e.g., A1, B2, C4">
        <button id="save-btn">Save Music</button>

        <h2>Upload Sheet Music (Image)</h2>
        <input type="file" id="sheet-upload" accept="image/*">
        <button id="extract-btn">Extract &amp; Save Music</button>

        <div id="status"></div>
    </div>

    <script>
        const uid = new URLSearchParams(window.location.search).get('uid');

        const statusEl = document.getElementById('status');
        const savedSection = document.getElementById('saved-section');
        const savedList = document.getElementById('saved-list');
        const loadingEl = document.getElementById('loading');

        function setStatus(message) {
            statusEl.textContent = message || '';
        }

        function renderNotes(notes) {
            savedList.innerHTML = '';
            for (const item of notes) {
                const li = document.createElement('li');
                li.textContent = item.note + ' (Duration: ' + item.duration + ')';
                savedList.appendChild(li);
            }
            savedSection.hidden = notes.length === 0;
        }

        async function readError(response) {
            try {
                const body = await response.json();
                return body.error.message;
            } catch (e) {
                return 'Request failed';
            }
        }

        async function loadSaved() {
            if (!uid) return;
            loadingEl.hidden = false;
            try {
                const response = await fetch('/api/phrases/' + encodeURIComponent(uid));
                if (response.ok) {
                    const body = await response.json();
                    renderNotes(body.notes);
                }
            } catch (e) {
                setStatus('Could not load saved music.');
            }
            loadingEl.hidden = true;
        }

        document.getElementById('save-btn').addEventListener('click', async () => {
            setStatus('');
            if (!uid) {
                setStatus('User ID not found. Please provide a valid user ID.');
                return;
            }
            const input = document.getElementById('manual-input').value;
            if (!input.trim()) {
                setStatus('Please enter a valid music input.');
                return;
            }
            try {
                const response = await fetch('/api/phrases/' + encodeURIComponent(uid), {
                    method: 'PUT',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ input })
                });
                if (response.ok) {
                    const body = await response.json();
                    renderNotes(body.notes);
                    document.getElementById('manual-input').value = '';
                } else {
                    setStatus(await readError(response));
                }
            } catch (e) {
                setStatus('Could not save music. Please try again.');
            }
        });

        document.getElementById('extract-btn').addEventListener('click', () => {
            setStatus('');
            if (!uid) {
                setStatus('User ID not found. Please provide a valid user ID.');
                return;
            }
            const picker = document.getElementById('sheet-upload');
            const file = picker.files[0];
            if (!file) {
                setStatus('Please choose a sheet image first.');
                return;
            }
            const reader = new FileReader();
            reader.onload = async () => {
                try {
                    const response = await fetch('/api/phrases/' + encodeURIComponent(uid) + '/transcribe', {
                        method: 'POST',
                        headers: { 'Content-Type': 'application/json' },
                        body: JSON.stringify({ image: reader.result })
                    });
                    if (response.ok) {
                        const body = await response.json();
                        renderNotes(body.notes);
                        picker.value = '';
                    } else {
                        setStatus(await readError(response));
                    }
                } catch (e) {
                    setStatus('Could not transcribe the sheet. Please try again.');
                }
            };
            reader.readAsDataURL(file);
        });

        loadSaved();
    </script>
</body>
</html>
"#;
