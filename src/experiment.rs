//! Comparison of algorithms over a set of instances with CSV output.
use std::io::{self, Write};
use std::time::Duration;

use log::{debug, warn};
use thiserror::Error;

use crate::algorithm::Algorithm;
use crate::error::Error;
use crate::instance::Instance;

pub type ExperimentResult<T> = Result<T, ExperimentError>;

#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Instance {id}: {source}")]
    Partition {
        id: usize,
        #[source]
        source: Error,
    },
    #[error("Instance {id}: {algorithm} returned an incomplete partition")]
    Incomplete { id: usize, algorithm: Algorithm },
}

/// Result of a single algorithm on a single instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub algorithm: Algorithm,
    pub makespan: u64,
    pub elapsed: Duration,
    pub proved_optimal: bool,
}

/// Results of all algorithms on a single instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: usize,
    pub m: usize,
    pub n: usize,
    pub b: u32,
    /// optimal makespan as recorded in the instance
    pub optimal: u64,
    pub outcomes: Vec<Outcome>,
}

impl Record {
    /// Write this record as a CSV row matching [Experiment::write_header].
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(
            writer,
            "{},{},{},{},{}",
            self.id, self.m, self.n, self.b, self.optimal
        )?;
        for outcome in self.outcomes.iter() {
            write!(
                writer,
                ",{},{}",
                outcome.makespan,
                outcome.elapsed.as_micros()
            )?;
        }
        writeln!(writer)
    }
}

/// Aggregated results of one algorithm over all records.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub algorithm: Algorithm,
    pub instances: usize,
    /// mean relative error against the recorded optimum (in %)
    pub mean_error: f64,
    /// max relative error against the recorded optimum (in %), negative if every algorithm run
    /// beat the recorded optimum
    pub max_error: f64,
    /// no. instances solved to the recorded optimum
    pub optimal_hits: usize,
    /// mean running time in microseconds
    pub mean_time_us: f64,
}

/// Runs a fixed list of algorithms on instances and records their makespans and running times.
#[derive(Debug, Clone)]
pub struct Experiment {
    algorithms: Vec<Algorithm>,
}

impl Default for Experiment {
    fn default() -> Self {
        Self::new(Algorithm::all().to_vec())
    }
}

impl Experiment {
    pub fn new(algorithms: Vec<Algorithm>) -> Self {
        Self { algorithms }
    }

    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    /// Write the CSV header, e.g. `InstanceID,M,N,B,OptimalMakespan,LS_MaxGroupSum,LS_Time(us)`.
    pub fn write_header<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "InstanceID,M,N,B,OptimalMakespan")?;
        for algorithm in self.algorithms.iter() {
            write!(writer, ",{0}_MaxGroupSum,{0}_Time(us)", algorithm.name())?;
        }
        writeln!(writer)
    }

    /// Run all algorithms on a single instance.
    pub fn run_instance(&self, instance: &Instance) -> ExperimentResult<Record> {
        let mut outcomes = Vec::with_capacity(self.algorithms.len());

        for &algorithm in self.algorithms.iter() {
            let (partition, stats) = algorithm
                .partition(&instance.weights, instance.n)
                .map_err(|source| ExperimentError::Partition {
                    id: instance.id,
                    source,
                })?;

            if !partition.is_complete(&instance.weights, instance.n) {
                return Err(ExperimentError::Incomplete {
                    id: instance.id,
                    algorithm,
                });
            }

            if stats.makespan < instance.optimal
                || (stats.proved_optimal && stats.makespan != instance.optimal)
            {
                warn!(
                    "Instance {}: {algorithm} found makespan {} but the recorded optimum is {}",
                    instance.id, stats.makespan, instance.optimal
                );
            }

            outcomes.push(Outcome {
                algorithm,
                makespan: stats.makespan,
                elapsed: stats.elapsed,
                proved_optimal: stats.proved_optimal,
            });
        }

        debug!(
            "Instance {}: {}",
            instance.id,
            outcomes
                .iter()
                .map(|o| format!("{}={}", o.algorithm, o.makespan))
                .collect::<Vec<_>>()
                .join(" ")
        );

        Ok(Record {
            id: instance.id,
            m: instance.m,
            n: instance.n,
            b: instance.b,
            optimal: instance.optimal,
            outcomes,
        })
    }

    /// Run all algorithms on all `instances`, writing a CSV header and one row per instance.
    pub fn run<W: Write>(
        &self,
        instances: &[Instance],
        mut writer: W,
    ) -> ExperimentResult<Vec<Record>> {
        self.write_header(&mut writer)?;

        let mut records = Vec::with_capacity(instances.len());
        for instance in instances.iter() {
            let record = self.run_instance(instance)?;
            record.write_csv(&mut writer)?;
            records.push(record);
        }

        writer.flush()?;
        Ok(records)
    }

    /// Aggregate `records` produced by this experiment per algorithm.
    pub fn summarize(&self, records: &[Record]) -> Vec<Summary> {
        self.algorithms
            .iter()
            .enumerate()
            .map(|(k, &algorithm)| {
                let outcomes = records
                    .iter()
                    .filter_map(|r| r.outcomes.get(k).map(|o| (r.optimal, o)))
                    .collect::<Vec<_>>();

                let errors = outcomes
                    .iter()
                    .map(|&(optimal, o)| relative_error(o.makespan, optimal))
                    .collect::<Vec<_>>();

                Summary {
                    algorithm,
                    instances: outcomes.len(),
                    mean_error: mean(&errors),
                    max_error: errors.iter().copied().reduce(f64::max).unwrap_or(f64::NAN),
                    optimal_hits: outcomes
                        .iter()
                        .filter(|&&(optimal, o)| o.makespan == optimal)
                        .count(),
                    mean_time_us: mean(
                        &outcomes
                            .iter()
                            .map(|(_, o)| o.elapsed.as_secs_f64() * 1e6)
                            .collect::<Vec<_>>(),
                    ),
                }
            })
            .collect()
    }
}

/// Relative error of `makespan` w.r.t. `optimal` in percent.
fn relative_error(makespan: u64, optimal: u64) -> f64 {
    if optimal == 0 {
        return 0.;
    }
    100. * (makespan as f64 - optimal as f64) / optimal as f64
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(17, 15, 13.333333333333334)]
    #[case(15, 15, 0.)]
    #[case(0, 0, 0.)]
    fn relative_errors(#[case] makespan: u64, #[case] optimal: u64, #[case] expected: f64) {
        assert_eq!(relative_error(makespan, optimal), expected);
    }

    #[test]
    fn header() {
        let experiment = Experiment::new(vec![Algorithm::LS, Algorithm::Cga { timeout: None }]);
        let mut out = Vec::new();
        experiment.write_header(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "InstanceID,M,N,B,OptimalMakespan,LS_MaxGroupSum,LS_Time(us),CGA_MaxGroupSum,CGA_Time(us)\n"
        );
    }

    #[test]
    fn record_row() {
        let record = Record {
            id: 3,
            m: 5,
            n: 2,
            b: 4,
            optimal: 15,
            outcomes: vec![
                Outcome {
                    algorithm: Algorithm::LPT,
                    makespan: 17,
                    elapsed: Duration::from_micros(12),
                    proved_optimal: false,
                },
                Outcome {
                    algorithm: Algorithm::Cga { timeout: None },
                    makespan: 15,
                    elapsed: Duration::from_micros(40),
                    proved_optimal: true,
                },
            ],
        };

        let mut out = Vec::new();
        record.write_csv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3,5,2,4,15,17,12,15,40\n");
    }

    #[test]
    fn empty_summary() {
        let summary = Experiment::default().summarize(&[]);
        assert_eq!(summary.len(), 5);
        assert!(summary
            .iter()
            .all(|s| s.instances == 0 && s.mean_error.is_nan() && s.max_error.is_nan()));
    }

    #[test]
    fn summary_below_recorded_optimum() {
        let outcome = |makespan| Outcome {
            algorithm: Algorithm::LPT,
            makespan,
            elapsed: Duration::from_micros(10),
            proved_optimal: false,
        };
        let record = |id, makespan| Record {
            id,
            m: 4,
            n: 2,
            b: 4,
            optimal: 20,
            outcomes: vec![outcome(makespan)],
        };

        // a wrong recorded optimum shows up as a negative error
        let records = [record(1, 18), record(2, 19)];
        let summary = Experiment::new(vec![Algorithm::LPT]).summarize(&records);

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].max_error, -5.);
        assert_eq!(summary[0].mean_error, -7.5);
        assert_eq!(summary[0].optimal_hits, 0);
        assert_eq!(summary[0].mean_time_us, 10.);
    }
}
