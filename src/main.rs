use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    strata::cli::run_sample(std::env::args().skip(1))
}
