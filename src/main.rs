use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    gencontenthub::cli::main()
}
