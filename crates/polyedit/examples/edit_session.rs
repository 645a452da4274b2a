//! Scripted editing session on a single square cell.
//!
//! Usage:
//!   cargo run -p polyedit --example edit_session
//!   cargo run -p polyedit --example edit_session -- reject
//!
//! Default mode drags a vertex, splices a bump, slices the result, and prints
//! metrics after each commit. `reject` mode shows the refused operations.

use polyedit::prelude::*;

fn square() -> SegmentationData {
    let points = vec![
        Point::new(10.0, 10.0),
        Point::new(90.0, 10.0),
        Point::new(90.0, 90.0),
        Point::new(10.0, 90.0),
    ];
    SegmentationData {
        polygons: PolygonSet::from_polygons(vec![Polygon::new(
            PolygonId::new("cell"),
            points,
            PolygonKind::External,
        )]),
        image: Size::new(100.0, 100.0),
    }
}

fn main() {
    let mode = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "edit".to_string());
    let cfg = EditorCfg {
        id_seed: Some(2025),
        ..EditorCfg::default()
    };
    let mut ed = Editor::new(cfg);
    ed.load(square());
    match mode.as_str() {
        "edit" => show_edits(&mut ed),
        "reject" => show_rejections(&mut ed),
        _ => eprintln!("usage: edit_session [edit|reject]"),
    }
}

fn play(ed: &mut Editor, events: &[Event]) {
    for ev in events {
        let res = ed.handle(*ev);
        if res != Ok(Outcome::Ignored) && res != Ok(Outcome::Changed) {
            println!("{ev:?} -> {res:?}");
        }
        if res == Ok(Outcome::Committed) {
            summarize(ed);
        }
    }
}

fn summarize(ed: &Editor) {
    for (id, m) in ed.polygons().metrics() {
        println!(
            "  {id}: n={} area={:.1} perimeter={:.1} solidity={:.3} feret={:.1}/{:.1}",
            ed.polygons().get(&id).map_or(0, |p| p.points.len()),
            m.area,
            m.perimeter,
            m.solidity,
            m.feret_diameter_max,
            m.feret_diameter_min,
        );
    }
}

fn show_edits(ed: &mut Editor) {
    play(
        ed,
        &[
            Event::SelectMode {
                mode: EditMode::EditVertices,
            },
            Event::click(90.0, 90.0),
            Event::PointerMove {
                pos: Point::new(95.0, 95.0),
            },
            Event::PointerUp {
                pos: Point::new(95.0, 95.0),
            },
            Event::shift_click(10.0, 10.0),
            Event::click(40.0, 2.0),
            Event::click(60.0, 2.0),
            Event::click(90.0, 10.0),
            Event::SelectMode { mode: EditMode::Slice },
            Event::click(50.0, 50.0),
            Event::click(50.0, -5.0),
            Event::click(50.0, 105.0),
            Event::Undo,
        ],
    );
    println!("can_undo={} can_redo={}", ed.can_undo(), ed.can_redo());
}

fn show_rejections(ed: &mut Editor) {
    play(
        ed,
        &[
            Event::SelectMode { mode: EditMode::Slice },
            Event::click(50.0, 50.0),
            Event::click(0.0, 95.0),
            Event::click(100.0, 95.0),
            Event::SelectMode {
                mode: EditMode::EditVertices,
            },
            Event::double_click(10.0, 10.0),
            Event::double_click(90.0, 10.0),
        ],
    );
    println!("mode={:?} polygons={}", ed.mode(), ed.polygons().len());
}
