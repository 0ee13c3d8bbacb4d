use adder_mlp::{
    Dataset, Dims, Error, FitConfig, Network, Silent, Tolerance, TrainConfig, evaluate, run,
};

// inputWidth=2, hiddenWidth=9, outputWidth=1, lr=0.01, 200 samples, 500 epochs, seed 42.
fn reference_config() -> TrainConfig {
    TrainConfig {
        input_dim: 2,
        hidden_dim: 9,
        output_dim: 1,
        learning_rate: 0.01,
        epochs: 500,
        samples: 200,
        seed: 42,
        test_input: vec![0.2, 0.3],
        tolerance: Tolerance::Absolute(0.05),
        report_every: 100,
    }
}

#[test]
fn training_drives_loss_below_one_percent_of_first_epoch() {
    let report = run(&reference_config()).unwrap();
    let first = report.fit.first_loss();
    let last = report.fit.final_loss();

    assert_eq!(report.fit.epoch_losses.len(), 500);
    assert!(
        last < 0.01 * first,
        "first epoch loss {first}, final epoch loss {last}"
    );
    assert!(report.network.is_finite());
}

#[test]
fn trained_network_adds_held_out_input() {
    let report = run(&reference_config()).unwrap();
    let eval = &report.evaluation;

    assert_eq!(eval.expected, 0.2 + 0.3);
    assert!(
        (eval.predicted[0] - 0.5).abs() < 0.05,
        "predicted {}",
        eval.predicted[0]
    );
    assert!(eval.passed);
}

#[test]
fn identical_seed_gives_bit_identical_runs() {
    let a = run(&reference_config()).unwrap();
    let b = run(&reference_config()).unwrap();

    assert_eq!(a.network, b.network);
    assert_eq!(a.dataset, b.dataset);
    assert_eq!(a.fit.epoch_losses, b.fit.epoch_losses);
    assert_eq!(a.evaluation, b.evaluation);

    let other = run(&TrainConfig {
        seed: 43,
        epochs: 5,
        ..reference_config()
    })
    .unwrap();
    assert_ne!(a.dataset, other.dataset);
}

#[test]
fn identical_seed_gives_identical_sample_loss_sequence() {
    let data = Dataset::addition_with_seed(50, 2, 7).unwrap();

    let sample_losses = || {
        let mut net = Network::new_with_seed(Dims::new(2, 5, 1), 11).unwrap();
        let opt = adder_mlp::Sgd::new(0.01).unwrap();
        let mut trainer = net.trainer();
        let mut losses = Vec::new();
        for _ in 0..3 {
            for s in data.iter() {
                losses.push(trainer.step(&mut net, &opt, s.x, s.y).unwrap());
            }
        }
        (net, losses)
    };

    let (net_a, losses_a) = sample_losses();
    let (net_b, losses_b) = sample_losses();
    assert_eq!(losses_a.len(), 150);
    assert_eq!(losses_a, losses_b);
    assert_eq!(net_a, net_b);
}

#[test]
fn excessive_learning_rate_is_reported_as_divergence() {
    let data = Dataset::addition_with_seed(100, 2, 3).unwrap();
    let mut net = Network::new_with_seed(Dims::new(2, 9, 1), 3).unwrap();

    let err = net
        .fit(&data, FitConfig { epochs: 200, lr: 10.0 }, &mut Silent)
        .unwrap_err();
    match err {
        Error::Diverged { epoch, sample, .. } => {
            assert!(epoch < 200);
            assert!(sample < 100);
        }
        other => panic!("expected divergence, got {other:?}"),
    }
}

#[test]
fn degenerate_hidden_layer_learns_the_mean_target() {
    let cfg = TrainConfig {
        hidden_dim: 0,
        epochs: 50,
        ..reference_config()
    };
    let report = run(&cfg).unwrap();
    assert!(report.network.w1().is_empty());
    assert!(report.network.w2().is_empty());

    // The output is b2 for every input, pulled towards the mean target (~1.0).
    let b2 = report.network.b2()[0];
    assert!((b2 - 1.0).abs() < 0.2, "b2 = {b2}");
    let eval = evaluate(&report.network, &[5.0, 5.0], Tolerance::Absolute(0.05)).unwrap();
    assert_eq!(eval.predicted, vec![b2]);
    assert!(!eval.passed);
}

#[test]
fn configuration_errors_fail_before_training() {
    for cfg in [
        TrainConfig {
            learning_rate: 0.0,
            ..reference_config()
        },
        TrainConfig {
            epochs: 0,
            ..reference_config()
        },
        TrainConfig {
            samples: 0,
            ..reference_config()
        },
        TrainConfig {
            input_dim: 0,
            test_input: vec![],
            ..reference_config()
        },
        TrainConfig {
            test_input: vec![0.2],
            ..reference_config()
        },
    ] {
        assert!(matches!(run(&cfg), Err(Error::InvalidConfig(_))), "{cfg:?}");
    }
}
