use adder_mlp::{Dataset, Dims, FitConfig, LogProgress, Network};

fn main() {
    tracing_subscriber::fmt().compact().init();

    let train = Dataset::addition_with_seed(200, 2, 1).unwrap();
    let mut net = Network::new_with_seed(Dims::new(2, 9, 1), 0).unwrap();
    net.fit(
        &train,
        FitConfig {
            epochs: 200,
            lr: 0.01,
        },
        &mut LogProgress::new(50),
    )
    .unwrap();

    let path = std::env::temp_dir().join("adder_mlp_network.json");
    net.save_json(&path).unwrap();
    let loaded = Network::load_json(&path).unwrap();

    // JSON floats may round-trip to the neighbouring f64.
    let max_diff = net
        .w1()
        .iter()
        .chain(net.b1())
        .chain(net.w2())
        .chain(net.b2())
        .zip(loaded.w1().iter().chain(loaded.b1()).chain(loaded.w2()).chain(loaded.b2()))
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);
    assert!(max_diff < 1e-12, "max parameter difference {max_diff}");
    println!(
        "saved {} and reloaded: 0.2 + 0.3 = {:.5}",
        path.display(),
        loaded.predict(&[0.2, 0.3]).unwrap()[0]
    );
}
