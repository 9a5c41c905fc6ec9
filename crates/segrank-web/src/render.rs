//! Minimal server-side HTML for leaderboards.

use segrank_core::leaderboard::Leaderboard;
use std::fmt::Write;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn page(title: &str, body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
            "<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n"
        ),
        escape_html(title),
        body
    )
}

pub fn board_title(board: &Leaderboard) -> String {
    format!("{} leaderboard: {}", board.board_type, board.column)
}

pub fn board_table(board: &Leaderboard) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(&board_title(board)));
    let _ = writeln!(
        html,
        "<table>\n<thead><tr><th>rank</th><th>{}</th><th>{}</th><th>average_speed</th></tr></thead>\n<tbody>",
        board.board_type.id_column(),
        escape_html(&board.column)
    );
    for e in &board.entries {
        let speed = e.average_speed.map(|s| format!("{:.2}", s)).unwrap_or_default();
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{:.1}</td><td>{}</td></tr>",
            e.rank, e.entity_id, e.score, speed
        );
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

/// Links to every board in `boards`. Column names are percent-encoded into
/// the path.
pub fn board_index<'a>(boards: impl Iterator<Item = &'a Leaderboard>) -> String {
    let mut html = String::from("<ul>\n");
    for b in boards {
        let _ = writeln!(
            html,
            "<li><a href=\"/leaderboards/{}/{}\">{}</a></li>",
            b.board_type,
            urlencoding::encode(&b.column),
            escape_html(&board_title(b))
        );
    }
    html.push_str("</ul>\n");
    html
}
