use argshape::prelude::*;

#[derive(Debug, Clone, PartialEq, ShapeEnum)]
#[argshape(rename_all = "SCREAMING_SNAKE_CASE")]
enum PrintFormat {
    LinePerEntry,
    Pretty,
}

#[derive(Debug, Shape)]
#[argshape(about = "List directory contents.")]
struct Ls {
    #[argshape(default_factory = Vec::new, help = "Patterns to skip.")]
    excludes: Vec<String>,
    #[argshape(default = PrintFormat::LinePerEntry)]
    print_format: PrintFormat,
    #[argshape(default = false)]
    long: bool,
    #[argshape(positional, default_factory = Vec::new)]
    paths: Vec<String>,
}

fn main() -> Result<(), Error> {
    App::new("ls", |ls: Ls| println!("{ls:?}")).run()
}
