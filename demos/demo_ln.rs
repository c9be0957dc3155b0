use argshape::prelude::*;

#[derive(Debug, Shape)]
#[argshape(about = "Make links between files.", multiple_positionals)]
struct Ln {
    #[argshape(default = false, allow_short_flag, help = "Remove existing destination files.")]
    force: bool,
    #[argshape(default = false, allow_short_flag)]
    symbolic: bool,
    #[argshape(positional)]
    target: String,
    #[argshape(positional)]
    link_name: String,
}

fn main() {
    let parser = match ArgumentParser::<Ln>::new("ln") {
        Ok(parser) => parser,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    match parser.parse() {
        Ok(ln) => println!("{ln:?}"),
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    }
}
