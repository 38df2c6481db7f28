fn main() -> anyhow::Result<()> {
    redactor::run()?;
    Ok(())
}
