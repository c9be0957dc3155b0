use argshape::prelude::*;

fn main() -> Result<(), Error> {
    let signature = Signature::new("greet")
        .param(Param::new("name").typed::<String>())
        .param(Param::new("times").typed::<u8>().default(1u8))
        .param(
            Param::new("shout")
                .typed::<bool>()
                .default(false)
                .metadata(Metadata::default().with("help", "Use capital letters.")),
        );

    App::signature("greet", signature, |record| {
        let name = record.get::<String>("name").cloned().unwrap_or_default();
        let times = record.get::<u8>("times").copied().unwrap_or(1);
        let greeting = if record.get::<bool>("shout") == Some(&true) {
            format!("HELLO {}", name.to_uppercase())
        } else {
            format!("Hello {name}")
        };

        for _ in 0..times {
            println!("{greeting}");
        }
    })
    .run()
}
