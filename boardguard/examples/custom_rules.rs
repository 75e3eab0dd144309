//! Example: building a board in code and checking it with a tuned rule set
//! (without BoardGuardCore).
//! Run with: cargo run --example custom_rules

use boardguard::{
    Board, DesignRules, DrcEngine, Pad, PcbObject, Point, Polygon, RulePreset, Severity, Trace,
    Via,
};

fn main() {
    let mut board = Board::new();
    board.subscribe(|event| println!("board: {:?}", event));

    board.add(
        PcbObject::new("top", Trace::new(Point::new(0.0, 0.0), Point::new(12.0, 0.0), 0.12))
            .with_net("SDA"),
    );
    board.add(PcbObject::new("top", Via::new(Point::new(12.0, 0.0), 0.45, 0.2)).with_net("SDA"));
    board.add(PcbObject::new("top", Pad::circle(Point::new(12.3, 0.0), 0.6)).with_net("SCL"));
    board.add(
        PcbObject::new(
            "bottom",
            Polygon::new(vec![
                Point::new(-2.0, -2.0),
                Point::new(16.0, -2.0),
                Point::new(16.0, 4.0),
                Point::new(-2.0, 4.0),
            ]),
        )
        .with_net("GND"),
    );
    board.recalculate_pours();

    let mut rules = DesignRules::from_preset(RulePreset::Aggressive);
    rules.set_rule("minViaClearance", 0.35);
    rules.set_rule("boardThickness", 0.8);

    let mut engine = DrcEngine::new(rules);
    let violations = engine.run(board.objects());

    println!("\nCustom DRC found {} violations", violations.len());
    for v in &violations {
        println!("  [{:?}] {} {}", v.severity, v.violation_type, v.message);
    }

    let errors = violations
        .iter()
        .filter(|v| v.severity == Severity::Error)
        .count();
    if errors > 0 {
        std::process::exit(1);
    }
}
