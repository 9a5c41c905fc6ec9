use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use segrank_core::analysis::FeatureCorrelation;
use segrank_core::leaderboard::Leaderboard;
use segrank_core::trainer::Evaluation;

fn right_align(table: &mut Table, columns: std::ops::RangeInclusive<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn leaderboard(board: &Leaderboard) {
    println!(
        "\n🏆 {} leaderboard: {}",
        board.board_type.to_string().to_uppercase(),
        board.column
    );

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Rank").add_attribute(Attribute::Bold),
        Cell::new(board.board_type.id_column()).add_attribute(Attribute::Bold),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Avg Speed (m/s)"),
    ]);
    right_align(&mut table, 0..=3);

    for e in &board.entries {
        let rank_cell = if e.rank == 1 {
            Cell::new(e.rank).fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            Cell::new(e.rank)
        };
        let speed = e
            .average_speed
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            rank_cell,
            Cell::new(e.entity_id),
            Cell::new(format!("{:.1}", e.score)).fg(Color::Cyan),
            Cell::new(speed),
        ]);
    }
    println!("{}", table);
}

pub fn evaluation(label: &str, eval: &Evaluation, baseline_rmse: Option<f64>) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new(format!("Fit ({})", label)).add_attribute(Attribute::Bold),
        Cell::new("RMSE").fg(Color::Cyan),
        Cell::new("MAE"),
        Cell::new("Pairs"),
        Cell::new("Skipped").fg(Color::Red),
    ]);
    right_align(&mut table, 1..=4);

    table.add_row(vec![
        Cell::new("model").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.4}", eval.rmse)).fg(Color::Cyan),
        Cell::new(format!("{:.4}", eval.mae)),
        Cell::new(eval.evaluated),
        Cell::new(eval.skipped).fg(Color::Red),
    ]);

    if let Some(base) = baseline_rmse {
        let gain = if base > 0.0 {
            (1.0 - eval.rmse / base) * 100.0
        } else {
            0.0
        };
        table.add_row(vec![
            Cell::new("global mean").add_attribute(Attribute::Bold),
            Cell::new(format!("{:.4}", base)),
            Cell::new(""),
            Cell::new(""),
            Cell::new(format!("{:+.1}% gain", gain)).fg(if gain > 0.0 {
                Color::Green
            } else {
                Color::Red
            }),
        ]);
    }
    println!("\n{}", table);
}

pub fn correlations(rows: &[FeatureCorrelation]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Feature").add_attribute(Attribute::Bold),
        Cell::new("Attribute"),
        Cell::new("Pearson r").fg(Color::Cyan),
        Cell::new("Segments"),
    ]);
    right_align(&mut table, 2..=3);

    for c in rows {
        let r_cell = match c.r {
            Some(r) if r.abs() >= 0.5 => Cell::new(format!("{:+.3}", r)).fg(Color::Green),
            Some(r) => Cell::new(format!("{:+.3}", r)),
            None => Cell::new("n/a").fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(&c.column).add_attribute(Attribute::Bold),
            Cell::new(c.attribute),
            r_cell,
            Cell::new(c.n),
        ]);
    }
    println!("\n{}", table);
}
