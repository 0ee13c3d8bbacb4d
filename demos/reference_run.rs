use adder_mlp::{Tolerance, TrainConfig};

fn main() {
    tracing_subscriber::fmt().compact().init();

    // Smaller than the default run; same architecture and learning rate.
    let cfg = TrainConfig {
        epochs: 500,
        samples: 200,
        seed: 42,
        test_input: vec![0.2, 0.3],
        tolerance: Tolerance::Absolute(0.01),
        report_every: 100,
        ..TrainConfig::default()
    };

    let report = adder_mlp::run(&cfg).unwrap();
    println!(
        "first_epoch_loss={:.6} final_epoch_loss={:.6}",
        report.fit.first_loss(),
        report.fit.final_loss()
    );
    println!("{}", report.evaluation);
}
