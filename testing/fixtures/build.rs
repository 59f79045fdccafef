fn main() -> Result<(), Box<dyn std::error::Error>> {
    bindery::build!("bindery.toml");

    Ok(())
}
