use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use mixforge::consts::{HARMONIC_NEIGHBOUR, HARMONIC_PARALLEL, HARMONIC_SAME};
use mixforge::optimizer::ProgressEvent;
use mixforge::scorer::{PairCache, ScoreBreakdown};
use mixforge::track::Track;
use tracing::info;

pub fn print_progress(event: &ProgressEvent) {
    info!(
        "Gen {:>6} | cost {:.6} | {:.1} gen/s",
        event.generation, event.score, event.generations_per_sec
    );
}

pub fn print_ordering(tracks: &[Track], cache: &PairCache) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Track").add_attribute(Attribute::Bold),
        Cell::new("Key"),
        Cell::new("Step").fg(Color::Cyan),
        Cell::new("BPM"),
        Cell::new("Energy"),
        Cell::new("Genre"),
        Cell::new("Artist"),
    ]);

    for i in [0, 3, 4, 5] {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    let mut prev: Option<usize> = None;
    for (pos, t) in tracks.iter().enumerate() {
        let step = prev.map(|p| cache.get(p, t.index).harmonic);
        let step_cell = match step {
            None => Cell::new("-"),
            Some(d) if d == HARMONIC_SAME || d == HARMONIC_NEIGHBOUR => {
                Cell::new(d).fg(Color::Green)
            }
            Some(d) if d == HARMONIC_PARALLEL => Cell::new(d).fg(Color::Yellow),
            Some(d) => Cell::new(d).fg(Color::Red),
        };

        table.add_row(vec![
            Cell::new(pos + 1),
            Cell::new(&t.path),
            Cell::new(t.key.map(|k| k.to_string()).unwrap_or_else(|| "?".into())),
            step_cell,
            Cell::new(if t.bpm > 0.0 {
                format!("{:.1}", t.bpm)
            } else {
                "?".into()
            }),
            Cell::new(if t.has_energy() {
                t.energy.to_string()
            } else {
                "?".into()
            }),
            Cell::new(&t.genre),
            Cell::new(&t.artist),
        ]);
        prev = Some(t.index);
    }
    println!("\n{}", table);
}

pub fn print_breakdown(b: &ScoreBreakdown) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Component").add_attribute(Attribute::Bold),
        Cell::new("Cost"),
        Cell::new("Share"),
    ]);
    for i in 1..=2 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (component, value) in b.components() {
        let share = if b.total.abs() > 0.0 {
            value / b.total * 100.0
        } else {
            0.0
        };
        table.add_row(vec![
            Cell::new(component),
            Cell::new(format!("{:.6}", value)),
            Cell::new(format!("{:.1}%", share)),
        ]);
    }

    table.add_row(vec![
        Cell::new("TOTAL").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.6}", b.total))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    println!("\n{}", table);
}
