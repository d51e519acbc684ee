//! CSS styles for the notes application.
//!
//! Contains the main STYLE constant with all CSS for the web interface.

// ============================================================================
// CSS Styles
// ============================================================================

pub const STYLE: &str = r#"
/* Solarized Light Theme */
:root {
    --base01: #586e75;
    --base00: #657b83;
    --base1: #93a1a1;
    --base2: #eee8d5;
    --base3: #fdf6e3;

    --yellow: #b58900;
    --red: #dc322f;
    --violet: #6c71c4;
    --blue: #268bd2;
    --cyan: #2aa198;
    --green: #859900;

    --bg: var(--base3);
    --fg: var(--base00);
    --muted: var(--base1);
    --border: var(--base2);
    --link: var(--blue);
    --link-hover: var(--cyan);
    --accent: var(--base2);
    --highlight: #f7f2e2;
}

* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    color: var(--fg);
    background: var(--bg);
}

.container {
    max-width: 900px;
    margin: 0 auto;
    padding: 1rem;
}

a { color: var(--link); text-decoration: none; }
a:hover { color: var(--link-hover); text-decoration: underline; }

h1, h2, h3 { font-weight: 600; margin-bottom: 0.5em; }
h1 { font-size: 1.5rem; }

.nav-bar {
    position: sticky;
    top: 0;
    background: var(--bg);
    border-bottom: 1px solid var(--border);
    padding: 0.5rem 1rem;
    display: flex;
    gap: 1rem;
    align-items: center;
    flex-wrap: wrap;
    z-index: 100;
}

.nav-bar a { font-size: 0.9rem; }
.nav-bar .brand { font-weight: 700; color: var(--violet); }
.nav-bar .spacer { flex: 1; }
.nav-bar .who { font-size: 0.8rem; color: var(--muted); }

button, .button {
    padding: 0.4rem 0.9rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: var(--accent);
    color: var(--fg);
    cursor: pointer;
    font-family: inherit;
    font-size: 0.9rem;
}
button.primary, .button.primary { background: var(--violet); border-color: var(--violet); color: white; }
button.danger { color: var(--red); }
button:disabled { opacity: 0.5; cursor: default; }
button.link { background: none; border: none; color: var(--link); padding: 0; }

input[type=text], input[type=email], input[type=password], textarea, select {
    padding: 0.5rem 0.75rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: var(--bg);
    color: var(--fg);
    font-family: inherit;
    font-size: 0.95rem;
}

/* Toasts */
.toast {
    position: fixed;
    top: 1rem;
    right: 1rem;
    padding: 0.6rem 1rem;
    border-radius: 4px;
    background: var(--green);
    color: white;
    z-index: 200;
    animation: toast-fade 4s forwards;
}
.toast.error { background: var(--red); }
@keyframes toast-fade { 0%, 80% { opacity: 1; } 100% { opacity: 0; visibility: hidden; } }

/* Landing and auth */
.landing { text-align: center; padding: 5rem 1rem; }
.landing h1 { font-size: 3rem; }
.landing h1 span { color: var(--violet); }
.landing p { margin: 1rem auto 2.5rem; max-width: 36rem; }
.landing .actions { display: flex; gap: 1rem; justify-content: center; }

.auth-form { max-width: 340px; margin: 4rem auto; display: flex; flex-direction: column; gap: 0.75rem; }
.auth-form .message.error { color: var(--red); }

/* Notes page */
.notes-layout { display: flex; height: calc(100vh - 45px); }

.sidebar {
    width: 20rem;
    border-right: 1px solid var(--border);
    display: flex;
    flex-direction: column;
    overflow: hidden;
}
.sidebar.closed { width: 0; border-right: none; }
.sidebar-header { padding: 1rem; border-bottom: 1px solid var(--border); }
.sidebar-header .row { display: flex; justify-content: space-between; align-items: center; margin-bottom: 0.75rem; }
.sidebar-header input { width: 100%; }

.note-list { list-style: none; overflow-y: auto; flex: 1; padding: 0.5rem; }
.note-list .empty { padding: 1rem; text-align: center; color: var(--muted); }
.note-item a {
    display: block;
    padding: 0.6rem 0.75rem;
    border-radius: 4px;
    color: var(--fg);
    border: 1px solid transparent;
}
.note-item a:hover { background: var(--highlight); text-decoration: none; }
.note-item.selected a { background: var(--highlight); border-color: var(--base1); }
.note-item .title { font-weight: 600; display: flex; justify-content: space-between; gap: 0.5rem; }
.note-item .preview { font-size: 0.85rem; color: var(--muted); overflow: hidden; max-height: 2.8em; }
.note-item .meta { font-size: 0.75rem; color: var(--muted); }
.marker.favorite { color: var(--yellow); }
.marker.archived { color: var(--muted); }

.main { flex: 1; display: flex; flex-direction: column; min-width: 0; }
.main-header { padding: 0.75rem 1rem; border-bottom: 1px solid var(--border); display: flex; gap: 1rem; align-items: center; }
.main-header h2 { margin: 0; font-size: 1.1rem; font-weight: 500; }
.placeholder { flex: 1; display: flex; align-items: center; justify-content: center; color: var(--muted); text-align: center; }

/* Editor */
.editor { flex: 1; display: flex; flex-direction: column; overflow: hidden; }
.editor-toolbar { display: flex; gap: 0.5rem; align-items: center; padding: 0.75rem 1rem; border-bottom: 1px solid var(--border); }
.editor-toolbar .title-input { flex: 1; font-size: 1.4rem; font-weight: 700; border: none; background: transparent; }
.format-bar { display: flex; gap: 0.25rem; padding: 0.4rem 1rem; border-bottom: 1px solid var(--border); }
.format-bar button { padding: 0.15rem 0.5rem; font-size: 0.8rem; }
.rich-body { flex: 1; padding: 1rem; overflow-y: auto; outline: none; min-height: 300px; }
.rich-body:empty::before { content: attr(data-placeholder); color: var(--muted); }
.rich-body ul, .rich-body ol { margin-left: 1.5rem; }
.rich-body blockquote { border-left: 3px solid var(--border); padding-left: 1rem; color: var(--muted); }
.editor-footer { padding: 0.6rem 1rem; border-top: 1px solid var(--border); display: flex; flex-wrap: wrap; gap: 0.5rem; align-items: center; font-size: 0.85rem; }
.chip { display: inline-flex; align-items: center; gap: 0.25rem; padding: 0.05rem 0.5rem; border-radius: 999px; background: var(--accent); font-size: 0.8rem; }
.chip form { display: inline; }
.inline-form { display: inline-flex; gap: 0.25rem; }
.inline-form input { padding: 0.2rem 0.5rem; font-size: 0.8rem; width: 8rem; }

/* Collections */
.collection { border: 1px solid var(--border); border-radius: 6px; padding: 1rem; margin-bottom: 1rem; }
.collection-header { display: flex; align-items: center; gap: 0.75rem; }
.collection-header .swatch { width: 0.9rem; height: 0.9rem; border-radius: 50%; }
.collection-header h3 { margin: 0; flex: 1; }
.collection .description { color: var(--muted); font-size: 0.9rem; margin: 0.25rem 0 0.5rem; }
.collection ul { list-style: none; margin: 0.5rem 0; }
.collection li { display: flex; justify-content: space-between; padding: 0.2rem 0; }
.new-collection { display: flex; gap: 0.5rem; flex-wrap: wrap; margin-bottom: 1.5rem; }

/* AI chat */
.chat { display: flex; flex-direction: column; height: calc(100vh - 45px); max-width: 900px; margin: 0 auto; }
.chat-header { padding: 1rem; border-bottom: 1px solid var(--border); display: flex; justify-content: space-between; align-items: center; }
.chat-log { flex: 1; overflow-y: auto; padding: 1rem; display: flex; flex-direction: column; gap: 1rem; }
.chat-empty { text-align: center; color: var(--muted); margin-top: 2rem; }
.bubble { max-width: 80%; padding: 0.75rem; border-radius: 8px; white-space: pre-wrap; }
.bubble.user { align-self: flex-end; background: var(--violet); color: white; }
.bubble.assistant { align-self: flex-start; background: var(--accent); }
.bubble .stamp { font-size: 0.7rem; opacity: 0.7; display: block; margin-bottom: 0.25rem; }
.pending { align-self: flex-start; display: none; gap: 0.3rem; padding: 0.75rem; background: var(--accent); border-radius: 8px; }
.pending.active { display: flex; }
.pending span { width: 0.5rem; height: 0.5rem; border-radius: 50%; background: var(--base1); animation: bounce 1s infinite; }
.pending span:nth-child(2) { animation-delay: 0.1s; }
.pending span:nth-child(3) { animation-delay: 0.2s; }
@keyframes bounce { 0%, 100% { transform: translateY(0); } 50% { transform: translateY(-0.4rem); } }
.chat-form { padding: 1rem; border-top: 1px solid var(--border); display: flex; gap: 0.5rem; }
.chat-form input[type=text] { flex: 1; }
.context-note { font-size: 0.85rem; color: var(--muted); }
"#;
