use clap::Parser;

use ishpose::app;
use ishpose::config::Cli;
use ishpose::display;
use ishpose::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let output = app::run(&args)?;

    if !args.no_display && display::can_show() {
        let title = format!("ishpose - {}", args.image_path.display());
        display::show(&output.annotated, &title)?;
    }

    Ok(())
}
