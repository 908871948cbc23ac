//! Problem instances and their text file format.
//!
//! An instance file is a sequence of blocks of the form
//! ```text
//! # Instance <id>
//! <m> <n> <b> <optimal makespan>
//! <w_1> <w_2> ... <w_m>
//! ```
//! where `m` is the number of weights, `n` the number of groups and `b` the number of bits the
//! weights were generated with. Values may wrap over several lines, blank lines are ignored and
//! any other line starting with `#` is a comment.
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use itertools::Itertools;
use log::{debug, info};
use thiserror::Error;

const HEADER: &str = "# Instance";

pub type InstanceResult<T> = Result<T, InstanceError>;

#[derive(Error, Debug)]
pub enum InstanceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed instance file at line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("Instance {id} declares {expected} values but {found} were given")]
    Inconsistent {
        id: usize,
        expected: usize,
        found: usize,
    },
}

impl InstanceError {
    fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}

/// Single partitioning problem together with its known optimal makespan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// identifier from the `# Instance <id>` header
    pub id: usize,
    /// number of weights
    pub m: usize,
    /// number of groups
    pub n: usize,
    /// number of bits used to generate the weights
    pub b: u32,
    /// known optimal makespan
    pub optimal: u64,
    pub weights: Vec<u64>,
}

impl Instance {
    pub fn new(id: usize, n: usize, b: u32, optimal: u64, weights: Vec<u64>) -> Self {
        Self {
            id,
            m: weights.len(),
            n,
            b,
            optimal,
            weights,
        }
    }

    /// Write this instance as a block of the text format.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{HEADER} {}", self.id)?;
        writeln!(writer, "{} {} {} {}", self.m, self.n, self.b, self.optimal)?;
        writeln!(writer, "{}", self.weights.iter().join(" "))?;
        writeln!(writer)
    }
}

/// Write all `instances` in the text format.
pub fn write_instances<W: Write>(mut writer: W, instances: &[Instance]) -> io::Result<()> {
    for instance in instances.iter() {
        instance.write(&mut writer)?;
    }
    writer.flush()
}

/// Read and parse all instances from the file at `path`.
pub fn read_instances(path: impl AsRef<Path>) -> InstanceResult<Vec<Instance>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let instances = parse_instances(&contents)?;
    info!("Read {} instances from {}", instances.len(), path.display());
    Ok(instances)
}

/// Parse all instances from the text format.
///
/// ## Example
/// ```rust
/// # extern crate partition;
/// let input = "# Instance 1\n4 2 3 5\n1 4 2 3\n";
/// let instances = partition::instance::parse_instances(input).unwrap();
/// assert_eq!(instances.len(), 1);
/// assert_eq!(instances[0].weights, vec![1, 4, 2, 3]);
/// assert_eq!(instances[0].optimal, 5);
/// ```
pub fn parse_instances(input: &str) -> InstanceResult<Vec<Instance>> {
    let mut instances = Vec::new();

    // (id, line) of the last header whose metadata line has not been read yet
    let mut header: Option<(usize, usize)> = None;
    let mut current: Option<Instance> = None;

    for (k, line) in input.lines().enumerate() {
        let line_no = k + 1;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if let Some(id) = line.strip_prefix(HEADER) {
            if let Some((id, at)) = header {
                return Err(InstanceError::parse(
                    at,
                    format!("instance {id} has no metadata line"),
                ));
            }
            finish(current.take(), &mut instances)?;
            header = Some((parse_field(id.trim(), "instance id", line_no)?, line_no));
            continue;
        }

        // other comments
        if line.starts_with('#') {
            continue;
        }

        if let Some((id, _)) = header.take() {
            current = Some(parse_metadata(id, line, line_no)?);
            continue;
        }

        let instance = current
            .as_mut()
            .ok_or_else(|| InstanceError::parse(line_no, "values outside of an instance"))?;

        for value in line.split_whitespace() {
            instance
                .weights
                .push(parse_field(value, "weight", line_no)?);
        }
    }

    if let Some((id, at)) = header {
        return Err(InstanceError::parse(
            at,
            format!("instance {id} has no metadata line"),
        ));
    }
    finish(current, &mut instances)?;

    Ok(instances)
}

fn parse_metadata(id: usize, line: &str, line_no: usize) -> InstanceResult<Instance> {
    let fields = line.split_whitespace().collect_vec();

    if fields.len() != 4 {
        return Err(InstanceError::parse(
            line_no,
            format!("expected `m n b optimal` but found {} fields", fields.len()),
        ));
    }

    let m: usize = parse_field(fields[0], "number of weights", line_no)?;
    let n: usize = parse_field(fields[1], "number of groups", line_no)?;

    if n == 0 {
        return Err(InstanceError::parse(
            line_no,
            "number of groups must be positive",
        ));
    }

    Ok(Instance {
        id,
        m,
        n,
        b: parse_field(fields[2], "number of bits", line_no)?,
        optimal: parse_field(fields[3], "optimal makespan", line_no)?,
        weights: Vec::new(),
    })
}

fn finish(instance: Option<Instance>, instances: &mut Vec<Instance>) -> InstanceResult<()> {
    if let Some(instance) = instance {
        if instance.weights.len() != instance.m {
            return Err(InstanceError::Inconsistent {
                id: instance.id,
                expected: instance.m,
                found: instance.weights.len(),
            });
        }
        debug!(
            "Parsed instance {}: m={} n={} b={} optimal={}",
            instance.id, instance.m, instance.n, instance.b, instance.optimal
        );
        instances.push(instance);
    }
    Ok(())
}

fn parse_field<F: FromStr>(value: &str, what: &str, line: usize) -> InstanceResult<F> {
    value
        .parse()
        .map_err(|_| InstanceError::parse(line, format!("invalid {what} `{value}`")))
}
