use argshape::prelude::*;
use argshape::{DeclarationError, ShapeError};
use assert_matches::assert_matches;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

#[derive(Debug, Clone, PartialEq, ShapeEnum)]
#[argshape(rename_all = "SCREAMING_SNAKE_CASE")]
enum PrintFormat {
    LinePerEntry,
    Pretty,
}

#[derive(Debug, PartialEq, Shape)]
#[argshape(about = "List directory contents.")]
struct Ls {
    #[argshape(default_factory = Vec::new, help = "Patterns to skip.")]
    excludes: Vec<String>,
    #[argshape(default = PrintFormat::Pretty)]
    print_format: PrintFormat,
    #[argshape(positional)]
    paths: Vec<String>,
}

#[test]
fn repeated_option() {
    // Setup
    let parser = ArgumentParser::<Ls>::new("ls").unwrap();

    // Execute
    let ls = parser
        .parse_tokens(&["--exclude", "a", "--exclude", "b", "--exclude", "c"])
        .unwrap();

    // Verify
    assert_eq!(
        ls,
        Ls {
            excludes: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            print_format: PrintFormat::Pretty,
            paths: Vec::default(),
        }
    );
}

#[test]
fn repeated_positional() {
    // Setup
    let parser = ArgumentParser::<Ls>::new("ls").unwrap();

    // Execute
    let empty = parser.parse_tokens(&[]).unwrap();
    let ls = parser.parse_tokens(&["x1", "x2", "x3"]).unwrap();

    // Verify
    assert_eq!(empty.paths, Vec::<String>::default());
    assert_eq!(
        ls.paths,
        vec!["x1".to_string(), "x2".to_string(), "x3".to_string()]
    );
}

#[test]
fn enumeration() {
    // Setup
    let parser = ArgumentParser::<Ls>::new("ls").unwrap();

    // Execute
    let ls = parser
        .parse_tokens(&["--print-format", "LINE_PER_ENTRY"])
        .unwrap();
    let error = parser.parse_tokens(&["--print-format", "FANCY"]).unwrap_err();

    // Verify
    assert_eq!(ls.print_format, PrintFormat::LinePerEntry);
    assert_matches!(error, Error::Exit(1));
    let help = parser.help();
    assert!(help.contains("{LINE_PER_ENTRY, PRETTY}"), "{help}");
    assert!(help.contains("List directory contents."), "{help}");
}

#[test]
fn help_exits() {
    // Setup
    let parser = ArgumentParser::<Ls>::new("ls").unwrap();

    // Execute
    let error = parser.parse_tokens(&["--help"]).unwrap_err();

    // Verify
    assert_matches!(error, Error::Exit(0));
}

#[derive(Debug, PartialEq, Shape)]
struct Paint {
    #[argshape(default = true)]
    color: bool,
    #[argshape(default = false)]
    glossy: bool,
}

#[test]
fn toggles() {
    // Setup
    let parser = ArgumentParser::<Paint>::new("paint").unwrap();

    // Execute
    let defaults = parser.parse_tokens(&[]).unwrap();
    let toggled = parser.parse_tokens(&["--no-color", "--glossy"]).unwrap();

    // Verify
    assert_eq!(
        defaults,
        Paint {
            color: true,
            glossy: false,
        }
    );
    assert_eq!(
        toggled,
        Paint {
            color: false,
            glossy: true,
        }
    );
    assert_matches!(parser.parse_tokens(&["--color"]), Err(Error::Exit(1)));
    assert_matches!(parser.parse_tokens(&["--no-glossy"]), Err(Error::Exit(1)));
}

#[derive(Debug, PartialEq, Shape)]
#[argshape(multiple_positionals)]
struct Ln {
    #[argshape(positional)]
    input: String,
    #[argshape(positional)]
    output: String,
    #[argshape(default = false, allow_short_flag)]
    force: bool,
}

#[test]
fn sequential_positionals() {
    // Setup
    let parser = ArgumentParser::<Ln>::new("ln").unwrap();

    // Execute
    let ln = parser.parse_tokens(&["x1", "x2"]).unwrap();
    let forced = parser.parse_tokens(&["x1", "x2", "-f"]).unwrap();

    // Verify
    assert_eq!(
        ln,
        Ln {
            input: "x1".to_string(),
            output: "x2".to_string(),
            force: false,
        }
    );
    assert_eq!(
        forced,
        Ln {
            input: "x1".to_string(),
            output: "x2".to_string(),
            force: true,
        }
    );
}

#[derive(Debug, PartialEq, Shape)]
struct Special {
    #[argshape(positional)]
    my_special: Vec<u32>,
}

#[test]
fn positional_integers() {
    // Setup
    let parser = ArgumentParser::<Special>::new("special").unwrap();

    // Execute
    let special = parser.parse_tokens(&["2", "4", "6", "8"]).unwrap();

    // Verify
    assert_eq!(special.my_special, vec![2, 4, 6, 8]);
}

#[derive(Debug, Shape)]
struct Cp {
    #[argshape(positional)]
    source: String,
    #[argshape(positional)]
    destination: String,
}

#[test]
fn multiple_positionals_rejected() {
    // Execute
    let error = ArgumentParser::<Cp>::new("cp").unwrap_err();

    // Verify
    assert_eq!(
        error,
        DeclarationError::MultiplePositionalFields {
            first: "source".to_string(),
            second: "destination".to_string(),
        }
    );
    let message = error.to_string();
    assert!(message.contains("source"));
    assert!(message.contains("destination"));
}

#[derive(Debug, Shape)]
struct Cat {
    #[argshape(positional)]
    source: String,
}

#[test]
fn unsupplied_positional_scalar() {
    // Setup
    let parser = ArgumentParser::<Cat>::new("cat").unwrap();

    // Execute
    let error = parser.parse_tokens(&[]).unwrap_err();

    // Verify
    assert_eq!(
        error,
        Error::Shape(ShapeError::MissingField {
            shape: "Cat".to_string(),
            field: "source".to_string(),
        })
    );
    assert_eq!(parser.parse_tokens(&["x"]).unwrap().source, "x");
}

fn token() -> String {
    "t0k3n".to_string()
}

#[derive(Debug, PartialEq, Shape)]
struct Login {
    #[argshape(cmdline = false, default_factory = token)]
    token: String,
    #[argshape(default = 0)]
    retries: u8,
}

#[test]
fn cmdline_excluded() {
    // Setup
    let parser = ArgumentParser::<Login>::new("login").unwrap();

    // Execute
    let login = parser.parse_tokens(&["--retries", "3"]).unwrap();

    // Verify
    assert_eq!(
        login,
        Login {
            token: "t0k3n".to_string(),
            retries: 3,
        }
    );
    assert!(!parser.help().contains("token"));
    assert!(!parser.help().contains("TOKEN"));
    assert_matches!(parser.parse_tokens(&["--token", "x"]), Err(Error::Exit(1)));
}

#[derive(Debug, PartialEq, Shape)]
struct Compress {
    level: Option<u8>,
    #[argshape(args = ["-o", "--out"], default = String::from("out.gz"))]
    output: String,
    #[argshape(default = 1, short_flag = 'j')]
    jobs: u16,
}

#[test]
fn optional_and_explicit_flags() {
    // Setup
    let parser = ArgumentParser::<Compress>::new("compress").unwrap();

    // Execute
    let defaults = parser.parse_tokens(&[]).unwrap();
    let compress = parser
        .parse_tokens(&["--level", "9", "-o", "x.gz", "-j", "4"])
        .unwrap();

    // Verify
    assert_eq!(
        defaults,
        Compress {
            level: None,
            output: "out.gz".to_string(),
            jobs: 1,
        }
    );
    assert_eq!(
        compress,
        Compress {
            level: Some(9),
            output: "x.gz".to_string(),
            jobs: 4,
        }
    );
    assert_matches!(parser.parse_tokens(&["--output", "x.gz"]), Err(Error::Exit(1)));
}

#[derive(Debug, PartialEq, Shape)]
struct Common {
    #[argshape(default = false)]
    verbose: bool,
    #[argshape(default = 1)]
    depth: u8,
}

#[derive(Debug, PartialEq, Shape)]
struct Tree {
    #[argshape(base)]
    common: Common,
    #[argshape(default = 3)]
    depth: u8,
    #[argshape(positional)]
    root: Option<String>,
}

#[test]
fn inherited_fields() {
    // Setup
    let parser = ArgumentParser::<Tree>::new("tree").unwrap();

    // Execute
    let defaults = parser.parse_tokens(&[]).unwrap();
    let tree = parser
        .parse_tokens(&["--verbose", "--depth", "7", "here"])
        .unwrap();

    // Verify
    let fields: Vec<&str> = parser.schema().rules().iter().map(|r| r.field()).collect();
    assert_eq!(fields, vec!["verbose", "depth", "root"]);
    assert_eq!(
        defaults,
        Tree {
            common: Common {
                verbose: false,
                depth: 3,
            },
            depth: 3,
            root: None,
        }
    );
    assert_eq!(
        tree,
        Tree {
            common: Common {
                verbose: true,
                depth: 7,
            },
            depth: 7,
            root: Some("here".to_string()),
        }
    );
}

#[derive(Debug, Shape)]
struct Level {
    verbosity: u32,
}

#[derive(Debug, Shape)]
struct Narrowed {
    #[argshape(base)]
    level: Level,
    verbosity: u8,
}

#[test]
fn inherited_field_retyped() {
    // Execute
    let error = ArgumentParser::<Narrowed>::new("narrowed").unwrap_err();

    // Verify
    assert_eq!(
        error,
        DeclarationError::ShadowTypeMismatch {
            field: "verbosity".to_string(),
            type_name: "u8".to_string(),
            inherited: "u32".to_string(),
        }
    );
}

#[command(about = "Sum the items.")]
fn summer(#[argshape(positional)] items: Vec<u32>, #[argshape(default = 0)] start: u32) -> u32 {
    start + items.iter().sum::<u32>()
}

#[test]
fn command_expanded() {
    // Execute
    let sum = App::expanded::<SummerArgs>("summer")
        .run_tokens(&["1", "2", "3", "--start", "10"])
        .unwrap();
    let empty = App::expanded::<SummerArgs>("summer").run_tokens(&[]).unwrap();

    // Verify
    assert_eq!(sum, 16);
    assert_eq!(empty, 0);
    assert_eq!(summer(vec![1], 1), 2);
}

#[test]
fn command_instance() {
    // Execute
    let ls = App::new("ls", |ls: Ls| ls)
        .run_tokens(&["--exclude", "a", "x"])
        .unwrap();

    // Verify
    assert_eq!(ls.excludes, vec!["a".to_string()]);
    assert_eq!(ls.paths, vec!["x".to_string()]);
}

#[test]
fn signature_missing_annotation() {
    // Setup
    let signature = Signature::new("greet")
        .param(Param::new("name").typed::<String>())
        .param(Param::new("times"));

    // Execute
    let error = App::signature("greet", signature, |_| ())
        .run_tokens(&[])
        .unwrap_err();

    // Verify
    assert_eq!(
        error,
        Error::Declaration(DeclarationError::MissingAnnotation("times".to_string()))
    );
}

#[test]
fn signature_record() {
    // Setup
    let signature = Signature::new("greet")
        .param(Param::new("name").typed::<String>())
        .param(Param::new("times").typed::<u8>().default(2u8));

    // Execute
    let (name, times) = App::signature("greet", signature, |record| {
        (
            record.get::<String>("name").cloned(),
            record.get::<u8>("times").copied(),
        )
    })
    .run_tokens(&["--name", "ada"])
    .unwrap();

    // Verify
    assert_eq!(name, Some("ada".to_string()));
    assert_eq!(times, Some(2));
}

#[derive(Debug, PartialEq, Shape)]
struct Scalars {
    count: u32,
    offset: i64,
    ratio: f64,
    label: String,
}

#[test]
fn formatted_values_round_trip() {
    let mut rng = thread_rng();
    let parser = ArgumentParser::<Scalars>::new("scalars").unwrap();

    for _ in 0..20 {
        // Setup
        let length = rng.gen_range(1..12);
        let expected = Scalars {
            count: rng.gen(),
            offset: rng.gen(),
            ratio: rng.gen_range(-1000.0..1000.0),
            label: (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(length)
                .map(char::from)
                .collect(),
        };
        let count = expected.count.to_string();
        let offset = expected.offset.to_string();
        let ratio = expected.ratio.to_string();

        // Execute
        let scalars = parser
            .parse_tokens(&[
                "--count",
                &count,
                "--offset",
                &offset,
                "--ratio",
                &ratio,
                "--label",
                &expected.label,
            ])
            .unwrap();

        // Verify
        assert_eq!(scalars, expected);
    }
}
