//! Page shell.

use html_escape::{encode_double_quoted_attribute, encode_text};

/// Generate the HTML shell for the application.
#[must_use]
pub fn page(title: &str, htmx_src: &str, content: &str) -> String {
    let title = encode_text(title);
    let htmx_src = encode_double_quoted_attribute(htmx_src);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Chat with the assistant">
    <title>{title}</title>

    <!-- htmx (local); forms still work as plain posts without it -->
    <script src="{htmx_src}"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body class="app-body">
    <div id="app-shell" class="app-shell">
        <header class="app-header">
            <a href="/" class="app-brand">Assistant</a>
        </header>

        <main id="app" class="app-main">
            {content}
        </main>
    </div>
</body>
</html>"#
    )
}
