use argshape::prelude::*;

#[command(about = "Sum the items.")]
fn summer(#[argshape(positional, help = "The items to sum.")] items: Vec<u32>) -> u32 {
    items.iter().sum()
}

fn main() -> Result<(), Error> {
    let sum = App::expanded::<SummerArgs>("summer").run()?;
    println!("Sum: {sum}");
    Ok(())
}
