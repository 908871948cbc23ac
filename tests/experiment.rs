use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use partition::experiment::{Experiment, ExperimentError};
use partition::generate::{generate_instances, GeneratorConfig, Strategy};
use partition::instance::Instance;
use partition::Algorithm;

fn small_instances(strategy: Strategy) -> Vec<Instance> {
    let config = GeneratorConfig {
        groups: vec![2, 3, 4],
        max_weights: 8,
        bits: vec![4, 8],
        repeat: 2,
        strategy,
    };
    generate_instances(&config, &mut StdRng::seed_from_u64(2024)).unwrap()
}

#[test]
fn csv_output() {
    let instances = small_instances(Strategy::Balanced);
    let experiment = Experiment::default();

    let mut out = Vec::new();
    let records = experiment.run(&instances, &mut out).unwrap();
    let csv = String::from_utf8(out).unwrap();

    let lines = csv.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), instances.len() + 1);
    assert_eq!(
        lines[0],
        "InstanceID,M,N,B,OptimalMakespan,\
         LS_MaxGroupSum,LS_Time(us),\
         LPT_MaxGroupSum,LPT_Time(us),\
         MULTIFIT_MaxGroupSum,MULTIFIT_Time(us),\
         LRM_MaxGroupSum,LRM_Time(us),\
         CGA_MaxGroupSum,CGA_Time(us)"
    );
    assert!(lines[1..].iter().all(|l| l.split(',').count() == 15));

    assert_eq!(records.len(), instances.len());
    for (record, instance) in records.iter().zip(instances.iter()) {
        assert_eq!(record.id, instance.id);
        assert_eq!(record.outcomes.len(), 5);
        assert!(lines[record.id].starts_with(&format!(
            "{},{},{},{},{},",
            record.id, record.m, record.n, record.b, record.optimal
        )));
    }
}

#[test]
fn cga_finds_recorded_optimum() {
    for strategy in [Strategy::Balanced, Strategy::Random] {
        let instances = small_instances(strategy);
        let experiment = Experiment::default();
        let records = experiment.run(&instances, std::io::sink()).unwrap();

        for record in records.iter() {
            let cga = &record.outcomes[4];
            assert_eq!(cga.algorithm.name(), "CGA");
            assert_eq!(cga.makespan, record.optimal);
            assert!(cga.proved_optimal);

            assert!(record.outcomes.iter().all(|o| o.makespan >= record.optimal));
        }

        let summary = experiment.summarize(&records);
        assert_eq!(summary.len(), 5);
        assert!(summary.iter().all(|s| s.instances == instances.len()));

        let cga = &summary[4];
        assert_eq!(cga.optimal_hits, instances.len());
        assert_eq!(cga.mean_error, 0.);
        assert_eq!(cga.max_error, 0.);
        assert!(summary.iter().all(|s| s.mean_error >= 0. && s.max_error >= s.mean_error));
    }
}

#[test]
fn invalid_instance_is_reported() {
    let instances = vec![Instance::new(9, 0, 4, 5, vec![1, 2])];
    let experiment = Experiment::new(vec![
        Algorithm::LPT,
        Algorithm::Cga {
            timeout: Some(Duration::from_secs(1)),
        },
    ]);

    assert!(matches!(
        experiment.run(&instances, std::io::sink()),
        Err(ExperimentError::Partition { id: 9, .. })
    ));
}
