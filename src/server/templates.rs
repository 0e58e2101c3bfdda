//! HTML for the browse page.
//!
//! Hand-built templates; the page is a plain listing meant for eyeballing
//! the log without the full front-end.

use serde_json::Value;

use crate::display;

/// Base HTML page.
pub fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - publog</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 2rem; color: #222; }}
        table {{ border-collapse: collapse; width: 100%; }}
        th, td {{ border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; }}
        th {{ background: #f4f4f4; }}
        tr:nth-child(even) {{ background: #fafafa; }}
        .muted {{ color: #888; }}
    </style>
</head>
<body>
    <header>
        <h1><a href="/" style="color:inherit;text-decoration:none">publog</a></h1>
    </header>
    <main>
{}
    </main>
</body>
</html>"#,
        html_escape(title),
        content
    )
}

/// Listing table for a set of records.
pub fn records_table(rows: &[Value]) -> String {
    if rows.is_empty() {
        return r#"<p class="muted">Sin registros.</p>"#.to_string();
    }

    let mut out = String::from(
        "<table>\n<tr><th>ID</th><th>Fecha</th><th>Hora</th><th>Título</th>\
         <th>Editor</th><th>Categoría</th><th>Formato</th>\
         <th>YT</th><th>IG</th><th>TT</th><th>TH</th><th>X</th><th>Link</th></tr>\n",
    );

    for row in rows {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td></tr>\n",
            text_field(row, &["id", "id_post"]),
            html_escape(&display::display_date(row)),
            text_field(row, &["hora", "HORA"]),
            text_field(row, &["titulo"]),
            text_field(row, &["editor"]),
            text_field(row, &["categoria"]),
            text_field(row, &["formato"]),
            flag_field(row, &["yt", "YT"]),
            flag_field(row, &["ig", "IG"]),
            flag_field(row, &["tt", "TT"]),
            flag_field(row, &["th", "TH"]),
            flag_field(row, &["x", "X"]),
            link_field(row),
        ));
    }
    out.push_str("</table>\n");
    out
}

fn text_field(row: &Value, names: &[&str]) -> String {
    match display::field_alias(row, names) {
        Some(Value::String(s)) => html_escape(s),
        Some(other) => html_escape(&other.to_string()),
        None => String::new(),
    }
}

fn flag_field(row: &Value, names: &[&str]) -> String {
    match display::field_alias(row, names) {
        Some(value) => html_escape(&display::format_flag(value)),
        None => String::new(),
    }
}

fn link_field(row: &Value) -> String {
    match display::field_alias(row, &["url", "link", "LINK"]) {
        Some(Value::String(s)) => {
            let href = html_escape(s);
            format!(r#"<a href="{href}">{href}</a>"#)
        }
        _ => String::new(),
    }
}

/// Escape text for inclusion in HTML.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
