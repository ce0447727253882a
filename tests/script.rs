use baltree::script::{self, Expected, Op, Outcome, Script};
use baltree::{AbTree, AvlTree, Error, RbTree, SearchTree};
use std::path::{Path, PathBuf};

fn data(name: &str) -> PathBuf { Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name) }

fn fixture() -> (Script, Expected) {
    let script = Script::read(data("small.in")).unwrap();
    let expected = Expected::read(&script, data("small.out")).unwrap();
    (script, expected)
}

fn passes<T: SearchTree<i64, i64>>(mut tree: T, script: &Script, expected: &Expected) {
    if let Err(e) = script::check(script, expected, &mut tree) {
        panic!("{}", e);
    }
}

#[test]
fn fixture_passes_on_every_tree() {
    let (script, expected) = fixture();
    assert_eq!(script.len(), 14);
    assert_eq!(expected.outcomes().len(), 8);

    passes(AvlTree::new(), &script, &expected);
    passes(RbTree::new(), &script, &expected);
    passes(AbTree::new(), &script, &expected);
    passes(AbTree::with_params(3, 5).unwrap(), &script, &expected);
}

#[test]
fn fixture_replays_to_its_expectations() {
    let (script, expected) = fixture();
    let mut tree = RbTree::new();
    assert_eq!(script::replay(&script, &mut tree), expected.outcomes());
    assert_eq!(tree.len(), 4);
    assert_eq!(expected.outcomes()[2], Outcome::Keys(vec![1, 3, 10]));
}

#[test]
fn wrong_expectations_are_reported() {
    let (script, _) = fixture();
    let expected = Expected::parse(&script, "1\n0\n1 3 10\n10 3 1\n0\n1 3 10\n0\n10 6 3 1\n").unwrap();

    match script::check(&script, &expected, &mut AvlTree::new()) {
        Err(Error::Mismatch { op: Op::Ascending, expected, actual }) => {
            assert_eq!(expected, Outcome::Keys(vec![1, 3, 10]));
            assert_eq!(actual, Outcome::Keys(vec![1, 3, 6, 10]));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    match Script::read(data("missing.in")) {
        Err(Error::Io(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[cfg(feature = "generate")]
mod generated {
    use baltree::script::{self, generate, Expected, Script, CASES};
    use baltree::{AbTree, AvlTree, RbTree};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use super::passes;

    #[test]
    fn standard_cases_pass_on_every_tree() {
        let mut rng = StdRng::seed_from_u64(42);

        // The largest case spends most of its time listing; the others cover the same mix.
        for case in CASES.iter().filter(|case| case.ops <= 50_000) {
            let (script, expected) = generate(case.ops, &case.weights, &mut rng);
            assert_eq!(script.len(), case.ops + 2);

            passes(AvlTree::new(), &script, &expected);
            passes(RbTree::new(), &script, &expected);
            passes(AbTree::new(), &script, &expected);
        }
    }

    #[test]
    fn generated_files_read_back() {
        let mut rng = StdRng::seed_from_u64(7);
        let (script, expected) = generate(CASES[1].ops, &CASES[1].weights, &mut rng);

        let dir = std::env::temp_dir().join(format!("baltree-script-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        script.write(dir.join("test.in")).unwrap();
        expected.write(dir.join("test.out")).unwrap();

        let read = Script::read(dir.join("test.in")).unwrap();
        assert_eq!(read, script);
        assert_eq!(Expected::read(&read, dir.join("test.out")).unwrap(), expected);

        passes(AbTree::with_params(3, 6).unwrap(), &read, &expected);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn same_seed_same_script() {
        let generate_with = |seed| generate(500, &CASES[2].weights, &mut StdRng::seed_from_u64(seed));
        assert_eq!(generate_with(1), generate_with(1));
        assert!(script::replay(&generate_with(2).0, &mut RbTree::new()).len() > 0);
    }
}
