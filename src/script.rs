//! Operation scripts, their expected outcomes, and replaying them against a container.
//!
//! A script is a text file whose first line is the number of operations, followed by one
//! operation per line:
//!
//! ```text
//! 0 <key>   insert <key>, with the key as its value
//! 1 <key>   query membership of <key>
//! 2 <key>   delete <key>
//! 3         list the keys in ascending order
//! 4         list the keys in descending order
//! ```
//!
//! The expectations file pairs with it: one line per query, `1` or `0` for a membership query and
//! the space-separated keys for a listing.
//!
//! # Examples
//!
//! ```
//! use baltree::script::{self, Expected, Script};
//! use baltree::RbTree;
//!
//! let script: Script = "4\n0 2\n0 1\n1 2\n3\n".parse().unwrap();
//! let expected = Expected::parse(&script, "1\n1 2\n").unwrap();
//!
//! script::check(&script, &expected, &mut RbTree::new()).unwrap();
//! ```

use crate::error::{Error, Result};
use crate::SearchTree;
use std::fmt::{self, Display};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// One scripted operation. Keys double as values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Insert(i64),
    Find(i64),
    Delete(i64),
    Ascending,
    Descending,
}

impl Op {
    /// Checks if the operation produces an outcome to compare against the expectations.
    pub fn is_query(&self) -> bool {
        match *self {
            Op::Insert(_) | Op::Delete(_) => false,
            Op::Find(_) | Op::Ascending | Op::Descending => true,
        }
    }

    fn parse(line: &str, number: usize) -> Result<Op> {
        let parse_error = |message: String| Error::Parse { line: number, message: message };
        let int = |field: &str| field.parse::<i64>()
            .map_err(|e| parse_error(format!("bad number {:?}: {}", field, e)));

        let fields: Vec<&str> = line.split_whitespace().collect();

        // A missing key reads as 0.
        let (code, key) = match fields[..] {
            [code] => (int(code)?, 0),
            [code, key] => (int(code)?, int(key)?),
            [] => return Err(parse_error("missing operation".to_string())),
            _ => return Err(parse_error(format!("expected at most 2 fields, got {}", fields.len()))),
        };

        match code {
            0 => Ok(Op::Insert(key)),
            1 => Ok(Op::Find(key)),
            2 => Ok(Op::Delete(key)),
            3 => Ok(Op::Ascending),
            4 => Ok(Op::Descending),
            _ => Err(parse_error(format!("unknown operation {}", code))),
        }
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Op::Insert(key) => write!(f, "0 {}", key),
            Op::Find(key) => write!(f, "1 {}", key),
            Op::Delete(key) => write!(f, "2 {}", key),
            Op::Ascending => f.write_str("3"),
            Op::Descending => f.write_str("4"),
        }
    }
}

/// A sequence of operations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    ops: Vec<Op>,
}

impl Script {
    pub fn new(ops: Vec<Op>) -> Self { Script { ops: ops } }

    pub fn ops(&self) -> &[Op] { &self.ops }

    pub fn len(&self) -> usize { self.ops.len() }

    pub fn is_empty(&self) -> bool { self.ops.is_empty() }

    /// Reads and parses a script file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Script> {
        let path = path.as_ref();
        let script: Script = fs::read_to_string(path)?.parse()?;
        debug!(path = %path.display(), ops = script.len(), "read script");
        Ok(script)
    }

    /// Writes the script in the format `read` accepts.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl FromStr for Script {
    type Err = Error;

    fn from_str(text: &str) -> Result<Script> {
        let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));

        let count = match lines.next() {
            Some((number, line)) => line.trim().parse::<usize>().map_err(|e|
                Error::Parse { line: number, message: format!("bad operation count: {}", e) })?,
            None => return Err(Error::Parse { line: 1, message: "empty script".to_string() }),
        };

        let mut ops = Vec::new();
        for _ in 0..count {
            match lines.next() {
                Some((number, line)) => ops.push(Op::parse(line, number)?),
                None => return Err(Error::Parse {
                    line: ops.len() + 2,
                    message: format!("expected {} operations, found {}", count, ops.len()),
                }),
            }
        }

        if let Some((number, _)) = lines.find(|&(_, line)| !line.trim().is_empty()) {
            return Err(Error::Parse { line: number, message: "trailing operations".to_string() });
        }

        Ok(Script::new(ops))
    }
}

impl Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.ops.len())?;
        for op in &self.ops { writeln!(f, "{}", op)?; }
        Ok(())
    }
}

/// The outcome of a query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Whether a membership query found its key.
    Member(bool),
    /// The keys a listing produced, in listing order.
    Keys(Vec<i64>),
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Outcome::Member(found) => f.write_str(if found { "1" } else { "0" }),
            Outcome::Keys(ref keys) => {
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 { f.write_str(" ")?; }
                    write!(f, "{}", key)?;
                }
                Ok(())
            }
        }
    }
}

/// The expected outcomes of a script's queries, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expected {
    outcomes: Vec<Outcome>,
}

impl Expected {
    pub fn new(outcomes: Vec<Outcome>) -> Self { Expected { outcomes: outcomes } }

    pub fn outcomes(&self) -> &[Outcome] { &self.outcomes }

    /// Parses an expectations file against the script it belongs to, which determines how each
    /// line is read.
    ///
    /// Lines past the end of the file read as empty, which is a valid listing of no keys.
    pub fn parse(script: &Script, text: &str) -> Result<Expected> {
        let mut lines = text.lines();
        let mut outcomes = vec![];

        for op in script.ops().iter().filter(|op| op.is_query()) {
            let number = outcomes.len() + 1;
            let line = lines.next().unwrap_or("").trim();

            let outcome = match *op {
                Op::Find(_) => match line {
                    "1" => Outcome::Member(true),
                    "0" => Outcome::Member(false),
                    _ => return Err(Error::Parse {
                        line: number,
                        message: format!("expected 1 or 0 for `{}`, got {:?}", op, line),
                    }),
                },
                _ => Outcome::Keys(line.split_whitespace().map(|field| field.parse::<i64>().map_err(|e|
                    Error::Parse { line: number, message: format!("bad key {:?}: {}", field, e) }))
                    .collect::<Result<_>>()?),
            };

            outcomes.push(outcome);
        }

        Ok(Expected::new(outcomes))
    }

    /// Reads and parses the expectations file of `script`.
    pub fn read<P: AsRef<Path>>(script: &Script, path: P) -> Result<Expected> {
        let path = path.as_ref();
        let expected = Expected::parse(script, &fs::read_to_string(path)?)?;
        debug!(path = %path.display(), outcomes = expected.outcomes.len(), "read expectations");
        Ok(expected)
    }

    /// Writes the expectations in the format `read` accepts.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for outcome in &self.outcomes { writeln!(f, "{}", outcome)?; }
        Ok(())
    }
}

/// Applies one operation to a container, returning its outcome if it is a query.
///
/// Listings walk the entries' successor and predecessor links from the minimum and maximum.
pub fn apply<T>(op: Op, tree: &mut T) -> Option<Outcome> where T: SearchTree<i64, i64> {
    match op {
        Op::Insert(key) => { tree.insert(key, key); None }
        Op::Find(key) => Some(Outcome::Member(tree.find(&key).is_some())),
        Op::Delete(key) => { tree.delete(&key); None }
        Op::Ascending => {
            let mut keys = Vec::with_capacity(tree.len());
            let mut entry = tree.find_min();
            while let Some(e) = entry {
                keys.push(*e.key());
                entry = e.successor();
            }
            Some(Outcome::Keys(keys))
        }
        Op::Descending => {
            let mut keys = Vec::with_capacity(tree.len());
            let mut entry = tree.find_max();
            while let Some(e) = entry {
                keys.push(*e.key());
                entry = e.predecessor();
            }
            Some(Outcome::Keys(keys))
        }
    }
}

/// Runs a script against a container, collecting the outcomes of its queries.
pub fn replay<T>(script: &Script, tree: &mut T) -> Vec<Outcome> where T: SearchTree<i64, i64> {
    debug!(ops = script.len(), "replaying script");
    script.ops().iter().filter_map(|&op| apply(op, tree)).collect()
}

/// Runs a script against a container, failing on the first query whose outcome disagrees with the
/// expectations.
pub fn check<T>(script: &Script, expected: &Expected, tree: &mut T) -> Result<()>
    where T: SearchTree<i64, i64> {

    debug!(ops = script.len(), outcomes = expected.outcomes.len(), "checking script");
    let mut outcomes = expected.outcomes.iter();

    for (i, &op) in script.ops().iter().enumerate() {
        let actual = match apply(op, tree) {
            Some(actual) => actual,
            None => continue,
        };

        let expected = outcomes.next().ok_or(Error::MissingOutcome { op: op })?;
        if *expected != actual {
            warn!(index = i, op = %op, "outcome mismatch");
            return Err(Error::Mismatch { op: op, expected: expected.clone(), actual: actual });
        }
    }

    Ok(())
}

#[cfg(feature = "generate")]
pub use self::generate::{generate, Case, Weights, CASES};

#[cfg(feature = "generate")]
mod generate {
    use rand::Rng;
    use std::collections::BTreeSet;
    use super::{Expected, Op, Outcome, Script};

    /// The probabilities of drawing each kind of operation. Leftover probability draws a
    /// descending listing.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct Weights {
        pub insert: f64,
        pub find: f64,
        pub delete: f64,
        pub ascending: f64,
        pub descending: f64,
    }

    /// The shape of one generated test case.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct Case {
        pub ops: usize,
        pub weights: Weights,
    }

    const MIXED: Weights =
        Weights { insert: 0.3, find: 0.3, delete: 0.3, ascending: 0.05, descending: 0.05 };

    /// The standard cases: a small one without listings, three mixed ones of growing size, and an
    /// insert-and-query-heavy one without deletes.
    pub const CASES: [Case; 5] = [
        Case {
            ops: 100,
            weights: Weights { insert: 0.4, find: 0.3, delete: 0.3, ascending: 0.0, descending: 0.0 },
        },
        Case { ops: 1_000, weights: MIXED },
        Case { ops: 10_000, weights: MIXED },
        Case { ops: 100_000, weights: MIXED },
        Case {
            ops: 50_000,
            weights: Weights { insert: 0.59, find: 0.4, delete: 0.0, ascending: 0.005, descending: 0.005 },
        },
    ];

    #[derive(Clone, Copy)]
    enum Pick { Insert, Find, Delete, Ascending, Descending }

    impl Weights {
        fn pick(&self, roll: f64) -> Pick {
            let picks = [
                (self.insert, Pick::Insert),
                (self.find, Pick::Find),
                (self.delete, Pick::Delete),
                (self.ascending, Pick::Ascending),
            ];

            let mut total = 0.0;
            for &(weight, pick) in &picks {
                total += weight;
                if roll < total { return pick; }
            }

            Pick::Descending
        }
    }

    /// Generates a script of `ops` random operations followed by an ascending and a descending
    /// listing, together with its expectations.
    ///
    /// Inserted keys are drawn from `0..=2 * ops` and are never live already. A membership query
    /// asks for a live key or, with one extra chance, any key of the range. Deletes always target
    /// a live key; a delete drawn while nothing is live is dropped and drawn again, so `weights`
    /// must not give deletes all of the probability.
    pub fn generate<R>(ops: usize, weights: &Weights, rng: &mut R) -> (Script, Expected)
        where R: Rng {

        let bound = 2 * ops as i64;
        let mut model = BTreeSet::new();
        let mut live = vec![];
        let mut script = Vec::with_capacity(ops + 2);
        let mut outcomes = vec![];

        while script.len() < ops {
            match weights.pick(rng.gen()) {
                Pick::Insert => {
                    let key = rng.gen_range(0..=bound);
                    if !model.insert(key) { continue; }
                    live.push(key);
                    script.push(Op::Insert(key));
                }
                Pick::Find => {
                    let i = rng.gen_range(0..=live.len());
                    let key = if i == live.len() { rng.gen_range(0..=bound) } else { live[i] };
                    script.push(Op::Find(key));
                    outcomes.push(Outcome::Member(model.contains(&key)));
                }
                Pick::Delete => {
                    if live.is_empty() { continue; }
                    let key = live.remove(rng.gen_range(0..live.len()));
                    model.remove(&key);
                    script.push(Op::Delete(key));
                }
                Pick::Ascending => {
                    script.push(Op::Ascending);
                    outcomes.push(Outcome::Keys(model.iter().cloned().collect()));
                }
                Pick::Descending => {
                    script.push(Op::Descending);
                    outcomes.push(Outcome::Keys(model.iter().rev().cloned().collect()));
                }
            }
        }

        script.push(Op::Ascending);
        outcomes.push(Outcome::Keys(model.iter().cloned().collect()));
        script.push(Op::Descending);
        outcomes.push(Outcome::Keys(model.iter().rev().cloned().collect()));

        (Script::new(script), Expected::new(outcomes))
    }
}
