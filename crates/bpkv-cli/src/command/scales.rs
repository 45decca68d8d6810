use bpkv_core::scale::ScalePreset;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScalesArg {}

pub(crate) fn run(arg: &ScalesArg) -> anyhow::Result<()> {
    let ScalesArg {} = arg;
    println!("  {:<26} Values", "Preset");
    println!("  {}", "-".repeat(60));
    for preset in ScalePreset::ALL {
        let values = preset
            .values()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {:<26} {values}", preset.label());
    }
    println!();
    println!("Custom scales: pass comma-separated values, e.g. --scale 0,10,20");
    Ok(())
}
