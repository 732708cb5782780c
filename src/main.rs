fn main() -> anyhow::Result<()> {
    nfd_strategy_choice::run()?;
    Ok(())
}
