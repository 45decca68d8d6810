mod command;
mod report;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
