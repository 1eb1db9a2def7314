use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    keyway::cli::main()
}
